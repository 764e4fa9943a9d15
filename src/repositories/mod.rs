//! Repositories - database access, one repository per aggregate
//!
//! Queries are plain runtime `query_as` calls mapped through `sqlx::FromRow`;
//! every repository owns a clone of the pool. Errors stay `sqlx::Error` here
//! and become HTTP codes in `AppError`.

pub mod announcement;
pub mod appointment;
pub mod community;
pub mod content;
pub mod conversation;
pub mod message;
pub mod moderation;
pub mod notification;
pub mod profile;
pub mod question;
pub mod traits;
pub mod user;

pub use traits::{Create, Delete, Read, Update};

pub use announcement::AnnouncementRepository;
pub use appointment::AppointmentRepository;
pub use community::CommunityRepository;
pub use content::ContentRepository;
pub use conversation::ConversationRepository;
pub use message::MessageRepository;
pub use moderation::{ContentOwner, ModerationRepository, NewModerationAction};
pub use notification::NotificationRepository;
pub use profile::ProfileRepository;
pub use question::QuestionRepository;
pub use user::UserRepository;
