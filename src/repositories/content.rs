//! ContentRepository - routines and recipes published inside a visibility window

use crate::dtos::{CreateRecipeDTO, CreateRoutineDTO};
use crate::entities::{Recipe, Routine, TrainingEnvironment};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const ROUTINE_COLUMNS: &str =
    "routine_id, author_id, title, description, environment, image_path, visible_from, visible_until";
const RECIPE_COLUMNS: &str =
    "recipe_id, author_id, title, ingredients, instructions, image_path, visible_from, visible_until";

pub struct ContentRepository {
    connection_pool: SqlitePool,
}

impl ContentRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Routines visible at `now`, optionally restricted to one environment
    pub async fn list_routines(
        &self,
        now: &DateTime<Utc>,
        environment: Option<TrainingEnvironment>,
    ) -> Result<Vec<Routine>, Error> {
        sqlx::query_as::<_, Routine>(&format!(
            r#"
            SELECT {ROUTINE_COLUMNS} FROM routines
            WHERE datetime(visible_from) <= datetime(?1)
              AND (visible_until IS NULL OR datetime(visible_until) > datetime(?1))
              AND (?2 IS NULL OR environment = ?2)
            ORDER BY visible_from DESC, routine_id DESC
            "#
        ))
        .bind(now)
        .bind(environment)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn create_routine(
        &self,
        author_id: i64,
        data: &CreateRoutineDTO,
    ) -> Result<Routine, Error> {
        sqlx::query_as::<_, Routine>(&format!(
            r#"
            INSERT INTO routines (author_id, title, description, environment, image_path, visible_from, visible_until)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {ROUTINE_COLUMNS}
            "#
        ))
        .bind(author_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.environment)
        .bind(&data.image_path)
        .bind(data.visible_from.unwrap_or_else(Utc::now))
        .bind(data.visible_until)
        .fetch_one(&self.connection_pool)
        .await
    }

    pub async fn list_recipes(&self, now: &DateTime<Utc>) -> Result<Vec<Recipe>, Error> {
        sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS} FROM recipes
            WHERE datetime(visible_from) <= datetime(?1)
              AND (visible_until IS NULL OR datetime(visible_until) > datetime(?1))
            ORDER BY visible_from DESC, recipe_id DESC
            "#
        ))
        .bind(now)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn create_recipe(&self, author_id: i64, data: &CreateRecipeDTO) -> Result<Recipe, Error> {
        sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (author_id, title, ingredients, instructions, image_path, visible_from, visible_until)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(author_id)
        .bind(&data.title)
        .bind(&data.ingredients)
        .bind(&data.instructions)
        .bind(&data.image_path)
        .bind(data.visible_from.unwrap_or_else(Utc::now))
        .bind(data.visible_until)
        .fetch_one(&self.connection_pool)
        .await
    }
}
