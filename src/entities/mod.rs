//! Entities module - rows persisted in the database
//!
//! Each entity maps one table created by `migrations/`.

pub mod announcement;
pub mod appointment;
pub mod community;
pub mod content;
pub mod conversation;
pub mod enums;
pub mod message;
pub mod moderation;
pub mod notification;
pub mod profile;
pub mod question;
pub mod user;

pub use announcement::Announcement;
pub use appointment::Appointment;
pub use community::{CommunityPost, CommunityReply};
pub use content::{Recipe, Routine};
pub use conversation::{Conversation, ordered_pair};
pub use enums::{AppointmentStatus, ContentSection, ModerationActionType, Role, TrainingEnvironment};
pub use message::ChatMessage;
pub use moderation::ModerationAction;
pub use notification::Notification;
pub use profile::Profile;
pub use question::{Answer, Question};
pub use user::User;
