//! Movie ↔ actor associations, keyed by the (movie, actor) pair

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{association::MovieActors, MovieSummary, PersonKind},
    repository::{Store, Transaction},
};

use super::{require_movie, require_person};

#[derive(Clone)]
pub struct MovieActorsService {
    store: Arc<dyn Store>,
}

fn require_role(role: &str) -> AppResult<&str> {
    let role = role.trim();
    if role.is_empty() {
        return Err(AppError::Validation("Role is required".to_string()));
    }
    Ok(role)
}

fn not_linked(movie_id: i32, actor_id: i32) -> AppError {
    AppError::NotFound(format!("Actor {} is not linked to movie {}", actor_id, movie_id))
}

impl MovieActorsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Cast an actor in a movie with the given role
    pub async fn link(&self, movie_id: i32, actor_id: i32, role: &str) -> AppResult<()> {
        let role = require_role(role)?;

        let mut tx = Transaction::begin(self.store.as_ref(), "movie_actors.link").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_movie(uow, movie_id).await?;
            require_person(uow, PersonKind::Actor, actor_id).await?;
            if uow.movie_actors_exists(movie_id, actor_id).await? {
                return Err(AppError::AlreadyLinked(format!(
                    "Actor {} is already linked to movie {}",
                    actor_id, movie_id
                )));
            }
            uow.movie_actors_insert(movie_id, actor_id, role).await
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(movie_id, actor_id, role, "actor linked");
        Ok(())
    }

    /// Change the role of an existing link
    pub async fn update_role(&self, movie_id: i32, actor_id: i32, role: &str) -> AppResult<()> {
        let role = require_role(role)?;

        let mut tx = Transaction::begin(self.store.as_ref(), "movie_actors.update").await?;
        let result: AppResult<_> = async {
            let updated = tx.uow().movie_actors_update_role(movie_id, actor_id, role).await?;
            if updated == 0 {
                return Err(not_linked(movie_id, actor_id));
            }
            Ok(())
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(movie_id, actor_id, role, "actor role updated");
        Ok(())
    }

    pub async fn unlink(&self, movie_id: i32, actor_id: i32) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movie_actors.unlink").await?;
        let result: AppResult<_> = async {
            let removed = tx.uow().movie_actors_delete(movie_id, actor_id).await?;
            if removed == 0 {
                return Err(not_linked(movie_id, actor_id));
            }
            Ok(())
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(movie_id, actor_id, "actor unlinked");
        Ok(())
    }

    pub async fn actors_of(&self, movie_id: i32) -> AppResult<MovieActors> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movie_actors.list").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            let movie = require_movie(uow, movie_id).await?;
            let actors = uow.movie_actors_list(movie_id).await?;
            Ok(MovieActors {
                movie: MovieSummary::from(&movie),
                actors,
            })
        }
        .await;
        tx.finish(result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{LookupKind, NewMovie, NewPerson},
        services::fixtures,
    };
    use chrono::NaiveDate;

    /// Two movies and one actor
    async fn setup() -> (MovieActorsService, [i32; 2], i32) {
        let (_, store) = fixtures::store();
        let korea = fixtures::lookup(&store, LookupKind::National, "Korea").await;

        let mut tx = Transaction::begin(store.as_ref(), "fixture").await.unwrap();
        let ids: AppResult<([i32; 2], i32)> = async {
            let uow = tx.uow();
            let mut movies = [0; 2];
            for (slot, title) in movies.iter_mut().zip(["Parasite", "Memories of Murder"]) {
                *slot = uow
                    .movies_create(&NewMovie {
                        title: title.to_string(),
                        release_date: NaiveDate::from_ymd_opt(2019, 5, 30).unwrap(),
                        duration: 132,
                        plot: String::new(),
                        poster_url: String::new(),
                        trailer_url: String::new(),
                        language: "Korean".to_string(),
                        nationality_id: korea,
                    })
                    .await?;
            }
            let actor = uow
                .people_create(
                    PersonKind::Actor,
                    &NewPerson {
                        name: "Song Kang-ho".to_string(),
                        date_of_birth: NaiveDate::from_ymd_opt(1967, 1, 17).unwrap(),
                        nationality_id: korea,
                    },
                )
                .await?;
            Ok((movies, actor))
        }
        .await;
        let (movies, actor) = tx.finish(ids).await.unwrap();

        (MovieActorsService::new(store), movies, actor)
    }

    #[tokio::test]
    async fn test_actor_can_appear_in_many_movies() {
        let (service, movies, actor) = setup().await;
        service.link(movies[0], actor, "Kim Ki-taek").await.unwrap();
        service.link(movies[1], actor, "Park Doo-man").await.unwrap();

        let first = service.actors_of(movies[0]).await.unwrap();
        let second = service.actors_of(movies[1]).await.unwrap();
        assert_eq!(first.actors[0].role, "Kim Ki-taek");
        assert_eq!(second.actors[0].role, "Park Doo-man");

        service.unlink(movies[0], actor).await.unwrap();
        assert!(service.actors_of(movies[0]).await.unwrap().actors.is_empty());
        assert_eq!(service.actors_of(movies[1]).await.unwrap().actors.len(), 1);
    }

    #[tokio::test]
    async fn test_link_rejects_duplicates_and_empty_roles() {
        let (service, movies, actor) = setup().await;
        service.link(movies[0], actor, "Kim Ki-taek").await.unwrap();

        let err = service.link(movies[0], actor, "Someone else").await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyLinked(_)));
        let err = service.link(movies[1], actor, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = service.link(movies[1], 404, "Extra").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_role_only_touches_the_pair() {
        let (service, movies, actor) = setup().await;
        service.link(movies[0], actor, "Kim Ki-taek").await.unwrap();
        service.link(movies[1], actor, "Park Doo-man").await.unwrap();

        service.update_role(movies[0], actor, "Mr. Kim").await.unwrap();
        assert_eq!(service.actors_of(movies[0]).await.unwrap().actors[0].role, "Mr. Kim");
        assert_eq!(service.actors_of(movies[1]).await.unwrap().actors[0].role, "Park Doo-man");
    }

    #[tokio::test]
    async fn test_missing_pair_is_not_found() {
        let (service, movies, actor) = setup().await;
        let err = service.update_role(movies[0], actor, "Mr. Kim").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.unlink(movies[0], actor).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.actors_of(404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
