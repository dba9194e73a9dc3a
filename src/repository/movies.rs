//! Movies repository

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, NewMovie},
};

use super::postgres::{map_delete_error, map_write_error, PgUnitOfWork};

#[async_trait]
pub trait MoviesRepository: Send {
    /// Insert a movie and return its id
    async fn movies_create(&mut self, movie: &NewMovie) -> AppResult<i32>;

    /// Replace the scalar fields of a movie
    async fn movies_update(&mut self, id: i32, movie: &NewMovie) -> AppResult<()>;

    async fn movies_set_poster_url(&mut self, id: i32, poster_url: &str) -> AppResult<()>;

    /// Delete the movie row only; link rows are the caller's concern
    async fn movies_delete(&mut self, id: i32) -> AppResult<()>;

    async fn movies_get_by_id(&mut self, id: i32) -> AppResult<Option<Movie>>;

    async fn movies_get_by_title(&mut self, title: &str) -> AppResult<Option<Movie>>;

    async fn movies_list(&mut self) -> AppResult<Vec<Movie>>;

    /// Movies linked to a genre
    async fn movies_list_by_genre(&mut self, genre_id: i32) -> AppResult<Vec<Movie>>;
}

#[async_trait]
impl MoviesRepository for PgUnitOfWork {
    async fn movies_create(&mut self, movie: &NewMovie) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO movies (
                title, release_date, duration, plot, poster_url, trailer_url,
                language, nationality_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(&movie.title)
        .bind(movie.release_date)
        .bind(movie.duration)
        .bind(&movie.plot)
        .bind(&movie.poster_url)
        .bind(&movie.trailer_url)
        .bind(&movie.language)
        .bind(movie.nationality_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_write_error(e, "Movie"))?;

        Ok(id)
    }

    async fn movies_update(&mut self, id: i32, movie: &NewMovie) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE movies SET
                title = $1, release_date = $2, duration = $3, plot = $4,
                poster_url = $5, trailer_url = $6, language = $7,
                nationality_id = $8, updated_at = NOW()
            WHERE id = $9
            "#,
        )
        .bind(&movie.title)
        .bind(movie.release_date)
        .bind(movie.duration)
        .bind(&movie.plot)
        .bind(&movie.poster_url)
        .bind(&movie.trailer_url)
        .bind(&movie.language)
        .bind(movie.nationality_id)
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_write_error(e, "Movie"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Movie with id {} not found", id)));
        }
        Ok(())
    }

    async fn movies_set_poster_url(&mut self, id: i32, poster_url: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE movies SET poster_url = $1, updated_at = NOW() WHERE id = $2")
            .bind(poster_url)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Movie with id {} not found", id)));
        }
        Ok(())
    }

    async fn movies_delete(&mut self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_delete_error(e, "Movie"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Movie with id {} not found", id)));
        }
        Ok(())
    }

    async fn movies_get_by_id(&mut self, id: i32) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(movie)
    }

    async fn movies_get_by_title(&mut self, title: &str) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE title = $1")
            .bind(title)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(movie)
    }

    async fn movies_list(&mut self) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>("SELECT * FROM movies ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(movies)
    }

    async fn movies_list_by_genre(&mut self, genre_id: i32) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT m.*
            FROM movies m
            JOIN movie_genres mg ON mg.movie_id = m.id
            WHERE mg.genre_id = $1
            ORDER BY m.id
            "#,
        )
        .bind(genre_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(movies)
    }
}
