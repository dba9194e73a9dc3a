//! Genres and nationals repository

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::{Lookup, LookupKind},
};

use super::people::capitalize;
use super::postgres::{map_delete_error, map_write_error, PgUnitOfWork};

#[async_trait]
pub trait LookupsRepository: Send {
    async fn lookups_create(&mut self, kind: LookupKind, name: &str) -> AppResult<i32>;

    async fn lookups_update(&mut self, kind: LookupKind, id: i32, name: &str) -> AppResult<()>;

    async fn lookups_delete(&mut self, kind: LookupKind, id: i32) -> AppResult<()>;

    async fn lookups_get_by_id(&mut self, kind: LookupKind, id: i32) -> AppResult<Option<Lookup>>;

    async fn lookups_get_by_name(&mut self, kind: LookupKind, name: &str) -> AppResult<Option<Lookup>>;

    async fn lookups_list(&mut self, kind: LookupKind) -> AppResult<Vec<Lookup>>;

    /// Whether any movie, actor or director references the national
    async fn lookups_national_in_use(&mut self, national_id: i32) -> AppResult<bool>;
}

fn not_found(kind: LookupKind, id: i32) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", capitalize(kind.label()), id))
}

#[async_trait]
impl LookupsRepository for PgUnitOfWork {
    async fn lookups_create(&mut self, kind: LookupKind, name: &str) -> AppResult<i32> {
        let sql = format!(
            "INSERT INTO {} (name, created_at, updated_at) VALUES ($1, NOW(), NOW()) RETURNING id",
            kind.table()
        );
        let id: i32 = sqlx::query_scalar(&sql)
            .bind(name)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_write_error(e, &capitalize(kind.label())))?;
        Ok(id)
    }

    async fn lookups_update(&mut self, kind: LookupKind, id: i32, name: &str) -> AppResult<()> {
        let sql = format!("UPDATE {} SET name = $1, updated_at = NOW() WHERE id = $2", kind.table());
        let result = sqlx::query(&sql)
            .bind(name)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_write_error(e, &capitalize(kind.label())))?;

        if result.rows_affected() == 0 {
            return Err(not_found(kind, id));
        }
        Ok(())
    }

    async fn lookups_delete(&mut self, kind: LookupKind, id: i32) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_delete_error(e, &capitalize(kind.label())))?;

        if result.rows_affected() == 0 {
            return Err(not_found(kind, id));
        }
        Ok(())
    }

    async fn lookups_get_by_id(&mut self, kind: LookupKind, id: i32) -> AppResult<Option<Lookup>> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", kind.table());
        let lookup = sqlx::query_as::<_, Lookup>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(lookup)
    }

    async fn lookups_get_by_name(&mut self, kind: LookupKind, name: &str) -> AppResult<Option<Lookup>> {
        let sql = format!("SELECT * FROM {} WHERE name = $1", kind.table());
        let lookup = sqlx::query_as::<_, Lookup>(&sql)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(lookup)
    }

    async fn lookups_list(&mut self, kind: LookupKind) -> AppResult<Vec<Lookup>> {
        let sql = format!("SELECT * FROM {} ORDER BY id", kind.table());
        let lookups = sqlx::query_as::<_, Lookup>(&sql)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(lookups)
    }

    async fn lookups_national_in_use(&mut self, national_id: i32) -> AppResult<bool> {
        let in_use: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM movies WHERE nationality_id = $1)
                OR EXISTS(SELECT 1 FROM actors WHERE nationality_id = $1)
                OR EXISTS(SELECT 1 FROM directors WHERE nationality_id = $1)
            "#,
        )
        .bind(national_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(in_use)
    }
}
