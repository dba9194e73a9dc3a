//! movie_directors link table

use async_trait::async_trait;

use crate::{error::AppResult, models::LinkedDirector};

use super::postgres::{map_write_error, PgUnitOfWork};

#[async_trait]
pub trait MovieDirectorsRepository: Send {
    async fn movie_directors_insert(&mut self, movie_id: i32, director_id: i32) -> AppResult<()>;

    async fn movie_directors_delete(&mut self, movie_id: i32, director_id: i32) -> AppResult<u64>;

    async fn movie_directors_exists(&mut self, movie_id: i32, director_id: i32) -> AppResult<bool>;

    /// Directors linked to a movie, ordered by director id
    async fn movie_directors_list(&mut self, movie_id: i32) -> AppResult<Vec<LinkedDirector>>;

    async fn movie_directors_delete_by_movie(&mut self, movie_id: i32) -> AppResult<u64>;

    async fn movie_directors_delete_by_director(&mut self, director_id: i32) -> AppResult<u64>;
}

#[async_trait]
impl MovieDirectorsRepository for PgUnitOfWork {
    async fn movie_directors_insert(&mut self, movie_id: i32, director_id: i32) -> AppResult<()> {
        sqlx::query("INSERT INTO movie_directors (movie_id, director_id) VALUES ($1, $2)")
            .bind(movie_id)
            .bind(director_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_write_error(e, "Movie director link"))?;
        Ok(())
    }

    async fn movie_directors_delete(&mut self, movie_id: i32, director_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movie_directors WHERE movie_id = $1 AND director_id = $2")
            .bind(movie_id)
            .bind(director_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn movie_directors_exists(&mut self, movie_id: i32, director_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM movie_directors WHERE movie_id = $1 AND director_id = $2)",
        )
        .bind(movie_id)
        .bind(director_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(exists)
    }

    async fn movie_directors_list(&mut self, movie_id: i32) -> AppResult<Vec<LinkedDirector>> {
        let directors = sqlx::query_as::<_, LinkedDirector>(
            r#"
            SELECT d.id AS director_id, d.name, d.date_of_birth
            FROM movie_directors md
            JOIN directors d ON d.id = md.director_id
            WHERE md.movie_id = $1
            ORDER BY d.id
            "#,
        )
        .bind(movie_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(directors)
    }

    async fn movie_directors_delete_by_movie(&mut self, movie_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movie_directors WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn movie_directors_delete_by_director(&mut self, director_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movie_directors WHERE director_id = $1")
            .bind(director_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }
}
