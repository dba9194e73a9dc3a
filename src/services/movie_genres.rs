//! Movie ↔ genre associations
//!
//! Genre membership is reconciled as a set: the desired ids are compared
//! with the current links and only the difference is written.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        association::{GenreDiff, MovieGenres},
        LookupKind, MovieSummary,
    },
    repository::{Store, Transaction, UnitOfWork},
};

use super::{require_lookup, require_movie};

#[derive(Clone)]
pub struct MovieGenresService {
    store: Arc<dyn Store>,
}

impl MovieGenresService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Make the movie's genres exactly `genre_ids`
    pub async fn set_genres(&self, movie_id: i32, genre_ids: &[i32]) -> AppResult<GenreDiff> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movie_genres.set").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_movie(uow, movie_id).await?;
            self.reconcile(uow, movie_id, genre_ids).await
        }
        .await;
        let diff = tx.finish(result).await?;

        if !diff.is_empty() {
            tracing::info!(movie_id, added = ?diff.added, removed = ?diff.removed, "movie genres reconciled");
        }
        Ok(diff)
    }

    /// Link additional genres; an existing pair is `AlreadyLinked`
    pub async fn add(&self, movie_id: i32, genre_ids: &[i32]) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movie_genres.add").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_movie(uow, movie_id).await?;
            let current: BTreeSet<i32> = current_genre_ids(uow, movie_id).await?;
            let requested: BTreeSet<i32> = genre_ids.iter().copied().collect();
            for genre_id in &requested {
                require_lookup(uow, LookupKind::Genre, *genre_id).await?;
                if current.contains(genre_id) {
                    return Err(AppError::AlreadyLinked(format!(
                        "Genre {} is already linked to movie {}",
                        genre_id, movie_id
                    )));
                }
            }
            for genre_id in &requested {
                uow.movie_genres_insert(movie_id, *genre_id).await?;
            }
            Ok(())
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(movie_id, genre_ids = ?genre_ids, "movie genres linked");
        Ok(())
    }

    pub async fn unlink(&self, movie_id: i32, genre_id: i32) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movie_genres.unlink").await?;
        let result: AppResult<_> = async {
            let removed = tx.uow().movie_genres_delete(movie_id, genre_id).await?;
            if removed == 0 {
                return Err(AppError::NotFound(format!(
                    "Genre {} is not linked to movie {}",
                    genre_id, movie_id
                )));
            }
            Ok(())
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(movie_id, genre_id, "movie genre unlinked");
        Ok(())
    }

    /// Movie header plus its genres ordered by id
    pub async fn genres_of(&self, movie_id: i32) -> AppResult<MovieGenres> {
        let mut tx = Transaction::begin(self.store.as_ref(), "movie_genres.list").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            let movie = require_movie(uow, movie_id).await?;
            let genres = uow.movie_genres_list(movie_id).await?;
            Ok(MovieGenres {
                movie: MovieSummary::from(&movie),
                genres,
            })
        }
        .await;
        tx.finish(result).await
    }

    /// Apply the difference between the current and desired genre sets
    /// inside the caller's unit of work. Duplicate ids collapse; every
    /// added genre must exist.
    pub(crate) async fn reconcile(
        &self,
        uow: &mut dyn UnitOfWork,
        movie_id: i32,
        desired: &[i32],
    ) -> AppResult<GenreDiff> {
        let desired: BTreeSet<i32> = desired.iter().copied().collect();
        let current = current_genre_ids(uow, movie_id).await?;

        let added: Vec<i32> = desired.difference(&current).copied().collect();
        let removed: Vec<i32> = current.difference(&desired).copied().collect();

        for genre_id in &added {
            require_lookup(uow, LookupKind::Genre, *genre_id).await?;
        }
        for genre_id in &added {
            uow.movie_genres_insert(movie_id, *genre_id).await?;
        }
        for genre_id in &removed {
            uow.movie_genres_delete(movie_id, *genre_id).await?;
        }

        Ok(GenreDiff { added, removed })
    }
}

async fn current_genre_ids(uow: &mut dyn UnitOfWork, movie_id: i32) -> AppResult<BTreeSet<i32>> {
    Ok(uow
        .movie_genres_list(movie_id)
        .await?
        .into_iter()
        .map(|g| g.genre_id)
        .collect())
}
