//! UserRepository - credentials rows

use super::{Create, Read};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use sqlx::{Error, SqlitePool};

pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Usernames are unique
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password) VALUES (?, ?)
            RETURNING user_id, username, password
            "#,
        )
        .bind(&data.username)
        .bind(&data.password)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Read<User, i64> for UserRepository {
    async fn read(&self, id: &i64) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT user_id, username, password FROM users WHERE user_id = ?")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}
