//! Repository layer for database operations
//!
//! Every repository is a trait over a single unit of work (one database
//! transaction). A [`Store`] opens units of work; [`Transaction`] wraps one
//! and guarantees it is committed or rolled back on every exit path.

pub mod lookups;
pub mod memory;
pub mod movie_actors;
pub mod movie_directors;
pub mod movie_genres;
pub mod movies;
pub mod people;
pub mod postgres;
pub mod recommendations;
pub mod users;

use async_trait::async_trait;

use crate::error::AppResult;

pub use lookups::LookupsRepository;
pub use memory::MemoryStore;
pub use movie_actors::MovieActorsRepository;
pub use movie_directors::MovieDirectorsRepository;
pub use movie_genres::MovieGenresRepository;
pub use movies::MoviesRepository;
pub use people::PeopleRepository;
pub use postgres::PgStore;
pub use recommendations::RecommendationsRepository;
pub use users::UsersRepository;

/// One open transaction exposing every repository
#[async_trait]
pub trait UnitOfWork:
    MoviesRepository
    + PeopleRepository
    + LookupsRepository
    + UsersRepository
    + MovieGenresRepository
    + MovieDirectorsRepository
    + MovieActorsRepository
    + RecommendationsRepository
    + Send
{
    async fn commit(self: Box<Self>) -> AppResult<()>;

    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Source of units of work (a connection pool, or the in-memory store)
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}

/// Scoped transaction: commit on success, rollback on error.
///
/// A guard dropped without [`Transaction::finish`] (a panic, or a cancelled
/// request future) drops the unit of work uncommitted, which discards it.
pub struct Transaction {
    uow: Box<dyn UnitOfWork>,
    operation: &'static str,
}

impl Transaction {
    pub async fn begin(store: &dyn Store, operation: &'static str) -> AppResult<Self> {
        let uow = store.begin().await?;
        tracing::trace!(operation, "transaction started");
        Ok(Self { uow, operation })
    }

    pub fn uow(&mut self) -> &mut dyn UnitOfWork {
        &mut *self.uow
    }

    /// Commit if `result` is `Ok`, roll back otherwise.
    ///
    /// A failed rollback is logged and the original error returned; a failed
    /// commit is returned to the caller.
    pub async fn finish<T>(self, result: AppResult<T>) -> AppResult<T> {
        let operation = self.operation;
        match result {
            Ok(value) => {
                if let Err(e) = self.uow.commit().await {
                    tracing::error!(operation, error = %e, "commit failed");
                    return Err(e);
                }
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.uow.rollback().await {
                    tracing::error!(
                        operation,
                        error = %rollback_err,
                        cause = %err,
                        "rollback failed"
                    );
                } else {
                    tracing::debug!(operation, cause = %err, "transaction rolled back");
                }
                Err(err)
            }
        }
    }
}
