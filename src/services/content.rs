//! Routines and recipes: everyone reads what is currently visible, professionals publish

use super::image_url;
use crate::core::{AppError, AppState, Session, require_role};
use crate::dtos::{CreateRecipeDTO, CreateRoutineDTO, RoutineQuery};
use crate::entities::{Recipe, Role, Routine};
use crate::storage::validate_path;
use axum::{
    Extension,
    extract::{Json, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[derive(Serialize, Debug)]
pub struct RoutineDTO {
    #[serde(flatten)]
    pub routine: Routine,
    pub image_url: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct RecipeDTO {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub image_url: Option<String>,
}

#[instrument(skip(state, _session, query))]
pub async fn list_routines(
    State(state): State<Arc<AppState>>,
    Extension(_session): Extension<Session>,
    Query(query): Query<RoutineQuery>,
) -> Result<Json<Vec<RoutineDTO>>, AppError> {
    let routines = state
        .content
        .list_routines(&Utc::now(), query.environment)
        .await?
        .into_iter()
        .map(|routine| RoutineDTO {
            image_url: image_url(&state, routine.image_path.as_deref()),
            routine,
        })
        .collect();
    Ok(Json(routines))
}

#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn create_routine(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<CreateRoutineDTO>,
) -> Result<(StatusCode, Json<RoutineDTO>), AppError> {
    require_role(&session, &[Role::Professional])?;
    body.validate()?;
    if let Some(path) = &body.image_path {
        validate_path(path)?;
    }

    let routine = state.content.create_routine(session.user_id, &body).await?;
    info!(routine_id = routine.routine_id, "Routine published");
    Ok((
        StatusCode::CREATED,
        Json(RoutineDTO {
            image_url: image_url(&state, routine.image_path.as_deref()),
            routine,
        }),
    ))
}

#[instrument(skip(state, _session))]
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    Extension(_session): Extension<Session>,
) -> Result<Json<Vec<RecipeDTO>>, AppError> {
    let recipes = state
        .content
        .list_recipes(&Utc::now())
        .await?
        .into_iter()
        .map(|recipe| RecipeDTO {
            image_url: image_url(&state, recipe.image_path.as_deref()),
            recipe,
        })
        .collect();
    Ok(Json(recipes))
}

#[instrument(skip(state, session, body), fields(user_id = session.user_id))]
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<CreateRecipeDTO>,
) -> Result<(StatusCode, Json<RecipeDTO>), AppError> {
    require_role(&session, &[Role::Professional])?;
    body.validate()?;
    if let Some(path) = &body.image_path {
        validate_path(path)?;
    }

    let recipe = state.content.create_recipe(session.user_id, &body).await?;
    info!(recipe_id = recipe.recipe_id, "Recipe published");
    Ok((
        StatusCode::CREATED,
        Json(RecipeDTO {
            image_url: image_url(&state, recipe.image_path.as_deref()),
            recipe,
        }),
    ))
}
