//! Users repository

use async_trait::async_trait;

use crate::{error::AppResult, models::Credential};

use super::postgres::{map_write_error, PgUnitOfWork};

#[async_trait]
pub trait UsersRepository: Send {
    /// Store a credential; a taken username is a `Conflict`
    async fn users_create(&mut self, username: &str, password_hash: &str, role: &str) -> AppResult<i32>;

    async fn users_get_by_username(&mut self, username: &str) -> AppResult<Option<Credential>>;
}

#[async_trait]
impl UsersRepository for PgUnitOfWork {
    async fn users_create(&mut self, username: &str, password_hash: &str, role: &str) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_write_error(e, "Username"))?;
        Ok(id)
    }

    async fn users_get_by_username(&mut self, username: &str) -> AppResult<Option<Credential>> {
        let credential = sqlx::query_as::<_, Credential>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(credential)
    }
}
