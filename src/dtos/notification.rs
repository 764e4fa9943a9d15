//! Notification DTOs

use crate::entities::Notification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NotificationDTO {
    pub notification_id: i64,
    pub message: String,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDTO {
    fn from(value: Notification) -> Self {
        Self {
            notification_id: value.notification_id,
            message: value.message,
            link: value.link,
            read: value.read,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateNotificationDTO {
    pub user_id: i64,
    pub message: String,
    pub link: Option<String>,
}
