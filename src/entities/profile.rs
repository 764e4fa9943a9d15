//! Profile entity - public identity, role and training preferences

use super::enums::{Role, TrainingEnvironment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub user_id: i64,
    pub full_name: String,
    pub role: Role,
    pub training_environment: Option<TrainingEnvironment>,
    pub age: Option<i64>,
    pub height_cm: Option<i64>,
    pub weight_kg: Option<f64>,
    pub fitness_goal: Option<String>,
    pub activity_level: Option<String>,
    pub health_conditions: Option<String>,
    pub questionnaire_completed: bool,
    pub created_at: DateTime<Utc>,
}
