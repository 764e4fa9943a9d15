//! ProfileRepository - profile rows, role changes and questionnaire answers

use super::{Create, Read, Update};
use crate::dtos::{CreateProfileDTO, HealthQuestionnaireDTO, UpdateProfileDTO};
use crate::entities::{Profile, Role};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const PROFILE_COLUMNS: &str = r#"
    user_id, full_name, role, training_environment, age, height_cm, weight_kg,
    fitness_goal, activity_level, health_conditions, questionnaire_completed, created_at
"#;

pub struct ProfileRepository {
    connection_pool: SqlitePool,
}

impl ProfileRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Returns the profile, creating a regular one first if the row is missing
    pub async fn ensure_exists(&self, user_id: i64, full_name: &str) -> Result<Profile, Error> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO profiles (user_id, full_name, role, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(Role::Regular)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        self.read(&user_id).await?.ok_or(Error::RowNotFound)
    }

    pub async fn update_role(&self, user_id: i64, role: Role) -> Result<Profile, Error> {
        let result = sqlx::query("UPDATE profiles SET role = ? WHERE user_id = ?")
            .bind(role)
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        self.read(&user_id).await?.ok_or(Error::RowNotFound)
    }

    pub async fn save_questionnaire(
        &self,
        user_id: i64,
        answers: &HealthQuestionnaireDTO,
    ) -> Result<Profile, Error> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                age = ?, height_cm = ?, weight_kg = ?,
                training_environment = ?, activity_level = ?, fitness_goal = ?,
                health_conditions = ?, questionnaire_completed = 1
            WHERE user_id = ?
            "#,
        )
        .bind(answers.basics.age)
        .bind(answers.basics.height_cm)
        .bind(answers.basics.weight_kg)
        .bind(answers.habits.training_environment)
        .bind(&answers.habits.activity_level)
        .bind(&answers.habits.fitness_goal)
        .bind(&answers.health.health_conditions)
        .bind(user_id)
        .execute(&self.connection_pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        self.read(&user_id).await?.ok_or(Error::RowNotFound)
    }

    /// Display name for a user, falling back to the username
    pub async fn display_name(&self, user_id: i64) -> Result<Option<String>, Error> {
        let name: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT COALESCE(p.full_name, u.username)
            FROM users u LEFT JOIN profiles p ON p.user_id = u.user_id
            WHERE u.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await?;
        Ok(name.map(|(n,)| n))
    }
}

impl Create<Profile, CreateProfileDTO> for ProfileRepository {
    async fn create(&self, data: &CreateProfileDTO) -> Result<Profile, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (user_id, full_name, role, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(&data.full_name)
        .bind(data.role)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Read<Profile, i64> for ProfileRepository {
    async fn read(&self, id: &i64) -> Result<Option<Profile>, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<Profile, UpdateProfileDTO, i64> for ProfileRepository {
    async fn update(&self, id: &i64, data: &UpdateProfileDTO) -> Result<Profile, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        sqlx::query("UPDATE profiles SET full_name = ?, training_environment = ? WHERE user_id = ?")
            .bind(data.full_name.as_ref().unwrap_or(&current.full_name))
            .bind(data.training_environment.or(current.training_environment))
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}
