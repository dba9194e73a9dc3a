//! movie_actors link table, keyed by the (movie, actor) pair

use async_trait::async_trait;

use crate::{error::AppResult, models::LinkedActor};

use super::postgres::{map_write_error, PgUnitOfWork};

#[async_trait]
pub trait MovieActorsRepository: Send {
    async fn movie_actors_insert(&mut self, movie_id: i32, actor_id: i32, role: &str) -> AppResult<()>;

    async fn movie_actors_update_role(&mut self, movie_id: i32, actor_id: i32, role: &str) -> AppResult<u64>;

    async fn movie_actors_delete(&mut self, movie_id: i32, actor_id: i32) -> AppResult<u64>;

    async fn movie_actors_exists(&mut self, movie_id: i32, actor_id: i32) -> AppResult<bool>;

    /// Actors linked to a movie with their roles, ordered by actor id
    async fn movie_actors_list(&mut self, movie_id: i32) -> AppResult<Vec<LinkedActor>>;

    async fn movie_actors_delete_by_movie(&mut self, movie_id: i32) -> AppResult<u64>;

    async fn movie_actors_delete_by_actor(&mut self, actor_id: i32) -> AppResult<u64>;
}

#[async_trait]
impl MovieActorsRepository for PgUnitOfWork {
    async fn movie_actors_insert(&mut self, movie_id: i32, actor_id: i32, role: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO movie_actors (movie_id, actor_id, role) VALUES ($1, $2, $3)")
            .bind(movie_id)
            .bind(actor_id)
            .bind(role)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_write_error(e, "Movie actor link"))?;
        Ok(())
    }

    async fn movie_actors_update_role(&mut self, movie_id: i32, actor_id: i32, role: &str) -> AppResult<u64> {
        let result = sqlx::query("UPDATE movie_actors SET role = $1 WHERE movie_id = $2 AND actor_id = $3")
            .bind(role)
            .bind(movie_id)
            .bind(actor_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn movie_actors_delete(&mut self, movie_id: i32, actor_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movie_actors WHERE movie_id = $1 AND actor_id = $2")
            .bind(movie_id)
            .bind(actor_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn movie_actors_exists(&mut self, movie_id: i32, actor_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM movie_actors WHERE movie_id = $1 AND actor_id = $2)",
        )
        .bind(movie_id)
        .bind(actor_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(exists)
    }

    async fn movie_actors_list(&mut self, movie_id: i32) -> AppResult<Vec<LinkedActor>> {
        let actors = sqlx::query_as::<_, LinkedActor>(
            r#"
            SELECT a.id AS actor_id, a.name, a.date_of_birth, ma.role
            FROM movie_actors ma
            JOIN actors a ON a.id = ma.actor_id
            WHERE ma.movie_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(movie_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(actors)
    }

    async fn movie_actors_delete_by_movie(&mut self, movie_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movie_actors WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn movie_actors_delete_by_actor(&mut self, actor_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movie_actors WHERE actor_id = $1")
            .bind(actor_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }
}
