//! DTOs module - Data Transfer Objects
//!
//! DTOs separate the API representation from the entities. Forms carry their
//! validation rules as `validator` attributes.

pub mod announcement;
pub mod appointment;
pub mod community;
pub mod content;
pub mod message;
pub mod moderation;
pub mod notification;
pub mod profile;
pub mod query;
pub mod question;
pub mod user;
pub mod ws_event;

pub use announcement::{AnnouncementDTO, CreateAnnouncementDTO};
pub use appointment::{
    AppointmentDTO, AvailabilityDTO, BookAppointmentDTO, CreateAppointmentDTO,
    UpdateAppointmentStatusDTO,
};
pub use community::{CreatePostDTO, CreateReplyDTO, PostSummaryDTO, PostThreadDTO, ReplyDTO};
pub use content::{CreateRecipeDTO, CreateRoutineDTO, RoutineQuery};
pub use message::{
    ChatMessageDTO, ConversationHistoryDTO, ConversationSummaryDTO, CreateMessageDTO,
    OpenConversationDTO, SendMessageDTO, WsSendMessageDTO,
};
pub use moderation::{ChangeRoleDTO, ModerationDeleteDTO};
pub use notification::{CreateNotificationDTO, NotificationDTO};
pub use profile::{
    CreateProfileDTO, HealthQuestionnaireDTO, ProfileDTO, QuestionnaireStepDTO, UpdateProfileDTO,
};
pub use query::{AvailabilityQuery, PageQuery};
pub use question::{AnswerDTO, CreateAnswerDTO, CreateQuestionDTO, QuestionDetailDTO, QuestionSummaryDTO};
pub use user::{CreateUserDTO, LoginDTO, RegisterDTO, SessionDTO, UserDTO};
pub use ws_event::{WsClientEventDTO, WsEventDTO};
