//! Profile DTOs, including the multi-step health questionnaire

use crate::entities::{Profile, Role, TrainingEnvironment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileDTO {
    pub user_id: i64,
    pub username: Option<String>,
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

impl From<Profile> for ProfileDTO {
    fn from(value: Profile) -> Self {
        Self {
            user_id: value.user_id,
            username: None,
            full_name: value.full_name,
            role: value.role,
            training_environment: value.training_environment,
            age: value.age,
            height_cm: value.height_cm,
            weight_kg: value.weight_kg,
            fitness_goal: value.fitness_goal,
            activity_level: value.activity_level,
            health_conditions: value.health_conditions,
            questionnaire_completed: value.questionnaire_completed,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateProfileDTO {
    pub user_id: i64,
    pub full_name: String,
    pub role: Role,
}

/// Profile screen form; only `Some(_)` fields change
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateProfileDTO {
    #[validate(length(min = 2, max = 80, message = "Name must be between 2 and 80 characters"))]
    pub full_name: Option<String>,
    pub training_environment: Option<TrainingEnvironment>,
}

/// Step 1: body measurements
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct BasicsStep {
    #[validate(range(min = 14, max = 100, message = "Age must be between 14 and 100"))]
    pub age: i64,
    #[validate(range(min = 100, max = 250, message = "Height must be between 100 and 250 cm"))]
    pub height_cm: i64,
    #[validate(range(min = 30.0, max = 300.0, message = "Weight must be between 30 and 300 kg"))]
    pub weight_kg: f64,
}

/// Step 2: training habits
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct HabitsStep {
    pub training_environment: TrainingEnvironment,
    #[validate(custom(function = "validate_activity_level"))]
    pub activity_level: String,
    #[validate(length(min = 3, max = 200, message = "Goal must be between 3 and 200 characters"))]
    pub fitness_goal: String,
}

/// Step 3: health conditions and consent
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct HealthStep {
    #[validate(length(max = 1000, message = "Health conditions must be at most 1000 characters"))]
    pub health_conditions: Option<String>,
    #[validate(custom(function = "validate_accepted"))]
    pub accepts_terms: bool,
}

/// Whole questionnaire as submitted after the last step
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct HealthQuestionnaireDTO {
    #[validate(nested)]
    pub basics: BasicsStep,
    #[validate(nested)]
    pub habits: HabitsStep,
    #[validate(nested)]
    pub health: HealthStep,
}

/// A single step, validated before the client moves to the next one
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "step", content = "data", rename_all = "lowercase")]
pub enum QuestionnaireStepDTO {
    Basics(BasicsStep),
    Habits(HabitsStep),
    Health(HealthStep),
}

impl QuestionnaireStepDTO {
    pub fn validate_step(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            QuestionnaireStepDTO::Basics(step) => step.validate(),
            QuestionnaireStepDTO::Habits(step) => step.validate(),
            QuestionnaireStepDTO::Health(step) => step.validate(),
        }
    }
}

const ACTIVITY_LEVELS: [&str; 4] = ["sedentary", "light", "moderate", "intense"];

fn validate_activity_level(value: &str) -> Result<(), ValidationError> {
    if ACTIVITY_LEVELS.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("activity_level")
            .with_message(Cow::Borrowed("Activity level must be sedentary, light, moderate or intense")))
    }
}

fn validate_accepted(value: &bool) -> Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(ValidationError::new("accepts_terms")
            .with_message(Cow::Borrowed("Terms must be accepted")))
    }
}
