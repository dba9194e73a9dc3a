//! Movie ↔ director associations

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{association::MovieDirectors, MovieSummary, PersonKind},
    repository::{Store, Transaction},
};

use super::{require_movie, require_person};

#[derive(Clone)]
pub struct MovieDirectorsService {
    store: Arc<dyn Store>,
}

impl MovieDirectorsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Link a director to a movie; both must exist and the pair must be new
    pub async fn link(&self, movie_id: i32, director_id: i32) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movie_directors.link").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_movie(uow, movie_id).await?;
            require_person(uow, PersonKind::Director, director_id).await?;
            if uow.movie_directors_exists(movie_id, director_id).await? {
                return Err(AppError::AlreadyLinked(format!(
                    "Director {} is already linked to movie {}",
                    director_id, movie_id
                )));
            }
            uow.movie_directors_insert(movie_id, director_id).await
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(movie_id, director_id, "director linked");
        Ok(())
    }

    pub async fn unlink(&self, movie_id: i32, director_id: i32) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movie_directors.unlink").await?;
        let result: AppResult<_> = async {
            let removed = tx.uow().movie_directors_delete(movie_id, director_id).await?;
            if removed == 0 {
                return Err(AppError::NotFound(format!(
                    "Director {} is not linked to movie {}",
                    director_id, movie_id
                )));
            }
            Ok(())
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(movie_id, director_id, "director unlinked");
        Ok(())
    }

    /// Movie header plus its directors; an existing movie without
    /// directors yields an empty list
    pub async fn directors_of(&self, movie_id: i32) -> AppResult<MovieDirectors> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movie_directors.list").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            let movie = require_movie(uow, movie_id).await?;
            let directors = uow.movie_directors_list(movie_id).await?;
            Ok(MovieDirectors {
                movie: MovieSummary::from(&movie),
                directors,
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
        repository::MemoryStore,
        services::fixtures,
    };
    use chrono::NaiveDate;

    async fn setup() -> (MemoryStore, MovieDirectorsService, i32, Vec<i32>) {
        let (memory, store) = fixtures::store();
        let korea = fixtures::lookup(&store, LookupKind::National, "Korea").await;

        let mut tx = Transaction::begin(store.as_ref(), "fixture").await.unwrap();
        let ids: AppResult<(i32, Vec<i32>)> = async {
            let uow = tx.uow();
            let movie_id = uow
                .movies_create(&NewMovie {
                    title: "Parasite".to_string(),
                    release_date: NaiveDate::from_ymd_opt(2019, 5, 30).unwrap(),
                    duration: 132,
                    plot: String::new(),
                    poster_url: String::new(),
                    trailer_url: String::new(),
                    language: "Korean".to_string(),
                    nationality_id: korea,
                })
                .await?;
            let mut directors = Vec::new();
            for name in ["Bong Joon-ho", "Park Chan-wook"] {
                let person = NewPerson {
                    name: name.to_string(),
                    date_of_birth: NaiveDate::from_ymd_opt(1969, 9, 14).unwrap(),
                    nationality_id: korea,
                };
                directors.push(uow.people_create(PersonKind::Director, &person).await?);
            }
            Ok((movie_id, directors))
        }
        .await;
        let (movie_id, directors) = tx.finish(ids).await.unwrap();

        (memory, MovieDirectorsService::new(store), movie_id, directors)
    }

    #[tokio::test]
    async fn test_link_twice_is_already_linked() {
        let (_, service, movie_id, directors) = setup().await;
        service.link(movie_id, directors[0]).await.unwrap();

        let err = service.link(movie_id, directors[0]).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyLinked(_)));

        let view = service.directors_of(movie_id).await.unwrap();
        assert_eq!(view.directors.len(), 1);
        assert_eq!(view.directors[0].director_id, directors[0]);
    }

    #[tokio::test]
    async fn test_link_requires_existing_rows() {
        let (memory, service, movie_id, directors) = setup().await;
        let writes = memory.write_count();

        let err = service.link(404, directors[0]).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.link(movie_id, 404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(memory.write_count(), writes);
    }

    #[tokio::test]
    async fn test_directors_are_ordered_and_unlinkable() {
        let (_, service, movie_id, directors) = setup().await;
        service.link(movie_id, directors[1]).await.unwrap();
        service.link(movie_id, directors[0]).await.unwrap();

        let names: Vec<String> = service
            .directors_of(movie_id)
            .await
            .unwrap()
            .directors
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Bong Joon-ho", "Park Chan-wook"]);

        service.unlink(movie_id, directors[0]).await.unwrap();
        let err = service.unlink(movie_id, directors[0]).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_directors_of_missing_movie() {
        let (_, service, movie_id, _) = setup().await;
        assert!(service.directors_of(movie_id).await.unwrap().directors.is_empty());

        let err = service.directors_of(404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
