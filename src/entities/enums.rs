//! Enumerations shared by entities and DTOs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role tag stored on the profile row: 0=regular, 1=professional, 2=moderator.
/// Travels as the bare integer both in the database and on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(into = "i64", try_from = "i64")]
#[repr(i64)]
pub enum Role {
    Regular = 0,
    Professional = 1,
    Moderator = 2,
}

impl From<Role> for i64 {
    fn from(role: Role) -> Self {
        role as i64
    }
}

impl TryFrom<i64> for Role {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Regular),
            1 => Ok(Role::Professional),
            2 => Ok(Role::Moderator),
            other => Err(format!("unknown role tag {other}")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TrainingEnvironment {
    Gym,
    Home,
    Outdoor,
}

/// Status of a cita. Values are persisted as-is.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pendiente,
    Confirmada,
    Cancelada,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ModerationActionType {
    DeleteContent,
    ChangeRole,
}

/// Content families a moderator can act on. The serialized name is also the
/// path segment used by `/moderation/{section}/{content_id}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ContentSection {
    CommunityPost,
    CommunityReply,
    Question,
    Answer,
    Announcement,
    Routine,
    Recipe,
}

impl ContentSection {
    /// Table, primary key column and author column backing the section.
    pub fn table(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            ContentSection::CommunityPost => ("community_posts", "post_id", "author_id"),
            ContentSection::CommunityReply => ("community_replies", "reply_id", "author_id"),
            ContentSection::Question => ("questions", "question_id", "author_id"),
            ContentSection::Answer => ("answers", "answer_id", "author_id"),
            ContentSection::Announcement => ("announcements", "announcement_id", "author_id"),
            ContentSection::Routine => ("routines", "routine_id", "author_id"),
            ContentSection::Recipe => ("recipes", "recipe_id", "author_id"),
        }
    }

    /// Whether the rows of this section carry an `image_path` column.
    pub fn has_image(&self) -> bool {
        !matches!(self, ContentSection::Answer)
    }
}

impl fmt::Display for ContentSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentSection::CommunityPost => "community_post",
            ContentSection::CommunityReply => "community_reply",
            ContentSection::Question => "question",
            ContentSection::Answer => "answer",
            ContentSection::Announcement => "announcement",
            ContentSection::Routine => "routine",
            ContentSection::Recipe => "recipe",
        };
        f.write_str(name)
    }
}
