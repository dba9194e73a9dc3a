//! movie_genres link table

use async_trait::async_trait;

use crate::{error::AppResult, models::LinkedGenre};

use super::postgres::{map_write_error, PgUnitOfWork};

#[async_trait]
pub trait MovieGenresRepository: Send {
    async fn movie_genres_insert(&mut self, movie_id: i32, genre_id: i32) -> AppResult<()>;

    /// Returns the number of rows removed
    async fn movie_genres_delete(&mut self, movie_id: i32, genre_id: i32) -> AppResult<u64>;

    /// Genres linked to a movie, ordered by genre id
    async fn movie_genres_list(&mut self, movie_id: i32) -> AppResult<Vec<LinkedGenre>>;

    async fn movie_genres_delete_by_movie(&mut self, movie_id: i32) -> AppResult<u64>;

    async fn movie_genres_delete_by_genre(&mut self, genre_id: i32) -> AppResult<u64>;
}

#[async_trait]
impl MovieGenresRepository for PgUnitOfWork {
    async fn movie_genres_insert(&mut self, movie_id: i32, genre_id: i32) -> AppResult<()> {
        sqlx::query("INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2)")
            .bind(movie_id)
            .bind(genre_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_write_error(e, "Movie genre link"))?;
        Ok(())
    }

    async fn movie_genres_delete(&mut self, movie_id: i32, genre_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1 AND genre_id = $2")
            .bind(movie_id)
            .bind(genre_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn movie_genres_list(&mut self, movie_id: i32) -> AppResult<Vec<LinkedGenre>> {
        let genres = sqlx::query_as::<_, LinkedGenre>(
            r#"
            SELECT g.id AS genre_id, g.name
            FROM movie_genres mg
            JOIN genres g ON g.id = mg.genre_id
            WHERE mg.movie_id = $1
            ORDER BY g.id
            "#,
        )
        .bind(movie_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(genres)
    }

    async fn movie_genres_delete_by_movie(&mut self, movie_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn movie_genres_delete_by_genre(&mut self, genre_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movie_genres WHERE genre_id = $1")
            .bind(genre_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }
}
