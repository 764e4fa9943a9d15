//! Moderation DTOs

use crate::entities::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Confirmation dialog payload
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ModerationDeleteDTO {
    #[validate(length(min = 10, max = 500, message = "Reason must be between 10 and 500 characters"))]
    pub reason: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ChangeRoleDTO {
    pub role: Role,
    #[validate(length(min = 10, max = 500, message = "Reason must be between 10 and 500 characters"))]
    pub reason: String,
}
