//! Curated list of recommended movies

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::MovieResponse,
    repository::{Store, Transaction},
};

use super::{movie_views, require_movie};

#[derive(Clone)]
pub struct RecommendationsService {
    store: Arc<dyn Store>,
}

impl RecommendationsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn recommend(&self, movie_id: i32) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "recommendations.add").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_movie(uow, movie_id).await?;
            if uow.recommendations_exists(movie_id).await? {
                return Err(AppError::Conflict(format!("Movie {} is already recommended", movie_id)));
            }
            uow.recommendations_insert(movie_id).await
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(movie_id, "movie recommended");
        Ok(())
    }

    pub async fn unrecommend(&self, movie_id: i32) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "recommendations.remove").await?;
        let result: AppResult<_> = async {
            if tx.uow().recommendations_delete(movie_id).await? == 0 {
                return Err(AppError::NotFound(format!("Movie {} is not recommended", movie_id)));
            }
            Ok(())
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(movie_id, "recommendation removed");
        Ok(())
    }

    /// Recommended movies, newest recommendation first
    pub async fn list(&self) -> AppResult<Vec<MovieResponse>> {
        let mut tx = Transaction::begin(self.store.as_ref(), "recommendations.list").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            let movies = uow.recommendations_list().await?;
            movie_views(uow, movies).await
        }
        .await;
        tx.finish(result).await
    }
}
