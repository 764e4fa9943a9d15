//! Routine and recipe DTOs

use crate::entities::TrainingEnvironment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_routine_window"))]
pub struct CreateRoutineDTO {
    #[validate(length(min = 3, max = 120, message = "Title must be between 3 and 120 characters"))]
    pub title: String,
    #[validate(length(min = 10, max = 5000, message = "Description must be between 10 and 5000 characters"))]
    pub description: String,
    pub environment: Option<TrainingEnvironment>,
    #[validate(length(max = 512))]
    pub image_path: Option<String>,
    pub visible_from: Option<DateTime<Utc>>,
    pub visible_until: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_recipe_window"))]
pub struct CreateRecipeDTO {
    #[validate(length(min = 3, max = 120, message = "Title must be between 3 and 120 characters"))]
    pub title: String,
    #[validate(length(min = 3, max = 3000, message = "Ingredients must be between 3 and 3000 characters"))]
    pub ingredients: String,
    #[validate(length(min = 10, max = 5000, message = "Instructions must be between 10 and 5000 characters"))]
    pub instructions: String,
    #[validate(length(max = 512))]
    pub image_path: Option<String>,
    pub visible_from: Option<DateTime<Utc>>,
    pub visible_until: Option<DateTime<Utc>>,
}

/// Listing filter for routines
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct RoutineQuery {
    pub environment: Option<TrainingEnvironment>,
}

fn check_window(
    from: Option<&DateTime<Utc>>,
    until: Option<&DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (from, until) {
        (Some(from), Some(until)) if until <= from => Err(ValidationError::new("visibility_window")
            .with_message(Cow::Borrowed("visible_until must be after visible_from"))),
        _ => Ok(()),
    }
}

fn validate_routine_window(dto: &CreateRoutineDTO) -> Result<(), ValidationError> {
    check_window(dto.visible_from.as_ref(), dto.visible_until.as_ref())
}

fn validate_recipe_window(dto: &CreateRecipeDTO) -> Result<(), ValidationError> {
    check_window(dto.visible_from.as_ref(), dto.visible_until.as_ref())
}
