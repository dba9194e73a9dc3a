//! Genre and national management

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Lookup, LookupKind},
    repository::{Store, Transaction},
};

use super::require_lookup;

#[derive(Clone)]
pub struct LookupsService {
    store: Arc<dyn Store>,
    kind: LookupKind,
}

fn require_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(name)
}

impl LookupsService {
    pub fn new(store: Arc<dyn Store>, kind: LookupKind) -> Self {
        Self { store, kind }
    }

    pub fn kind(&self) -> LookupKind {
        self.kind
    }

    fn duplicate(&self) -> AppError {
        AppError::Conflict(format!("{} name already exists", self.kind))
    }

    pub async fn create(&self, name: &str) -> AppResult<i32> {
        let name = require_name(name)?;

        let mut tx = Transaction::begin(self.store.as_ref(), "lookups.create").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            if uow.lookups_get_by_name(self.kind, name).await?.is_some() {
                return Err(self.duplicate());
            }
            uow.lookups_create(self.kind, name).await
        }
        .await;
        let id = tx.finish(result).await?;

        tracing::info!(kind = %self.kind, id, name, "lookup created");
        Ok(id)
    }

    pub async fn update(&self, id: i32, name: &str) -> AppResult<()> {
        let name = require_name(name)?;

        let mut tx = Transaction::begin(self.store.as_ref(), "lookups.update").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_lookup(uow, self.kind, id).await?;
            if let Some(other) = uow.lookups_get_by_name(self.kind, name).await? {
                if other.id != id {
                    return Err(self.duplicate());
                }
            }
            uow.lookups_update(self.kind, id, name).await
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(kind = %self.kind, id, name, "lookup updated");
        Ok(())
    }

    /// Delete a genre with its movie links, or a national nothing refers to
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "lookups.delete").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_lookup(uow, self.kind, id).await?;
            match self.kind {
                LookupKind::Genre => {
                    uow.movie_genres_delete_by_genre(id).await?;
                }
                LookupKind::National => {
                    if uow.lookups_national_in_use(id).await? {
                        return Err(AppError::Conflict(format!(
                            "National {} is still referenced by movies or people",
                            id
                        )));
                    }
                }
            }
            uow.lookups_delete(self.kind, id).await
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(kind = %self.kind, id, "lookup deleted");
        Ok(())
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Lookup> {
        let mut tx = Transaction::begin(self.store.as_ref(), "lookups.get").await?;
        let result = require_lookup(tx.uow(), self.kind, id).await;
        tx.finish(result).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<Lookup>> {
        let mut tx = Transaction::begin(self.store.as_ref(), "lookups.list").await?;
        let result = tx.uow().lookups_list(self.kind).await;
        tx.finish(result).await
    }

    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<Lookup>> {
        let mut tx = Transaction::begin(self.store.as_ref(), "lookups.search").await?;
        let result = tx.uow().lookups_get_by_name(self.kind, name.trim()).await;
        Ok(tx.finish(result).await?.into_iter().collect())
    }
}
