//! Recommended movies

use async_trait::async_trait;

use crate::{error::AppResult, models::Movie};

use super::postgres::{map_write_error, PgUnitOfWork};

#[async_trait]
pub trait RecommendationsRepository: Send {
    async fn recommendations_insert(&mut self, movie_id: i32) -> AppResult<()>;

    async fn recommendations_delete(&mut self, movie_id: i32) -> AppResult<u64>;

    async fn recommendations_exists(&mut self, movie_id: i32) -> AppResult<bool>;

    /// Recommended movies, most recently recommended first
    async fn recommendations_list(&mut self) -> AppResult<Vec<Movie>>;
}

#[async_trait]
impl RecommendationsRepository for PgUnitOfWork {
    async fn recommendations_insert(&mut self, movie_id: i32) -> AppResult<()> {
        sqlx::query("INSERT INTO recommendation (movie_id, created_at) VALUES ($1, NOW())")
            .bind(movie_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_write_error(e, "Recommendation"))?;
        Ok(())
    }

    async fn recommendations_delete(&mut self, movie_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM recommendation WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn recommendations_exists(&mut self, movie_id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM recommendation WHERE movie_id = $1)")
                .bind(movie_id)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists)
    }

    async fn recommendations_list(&mut self) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT m.*
            FROM recommendation r
            JOIN movies m ON m.id = r.movie_id
            ORDER BY r.id DESC
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(movies)
    }
}
