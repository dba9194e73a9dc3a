//! Actor and director management

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{person::PersonRequest, LookupKind, Person, PersonKind},
    repository::{Store, Transaction},
};

use super::{require_lookup, require_person};

/// CRUD for one kind of person
#[derive(Clone)]
pub struct PeopleService {
    store: Arc<dyn Store>,
    kind: PersonKind,
}

impl PeopleService {
    pub fn new(store: Arc<dyn Store>, kind: PersonKind) -> Self {
        Self { store, kind }
    }

    pub fn kind(&self) -> PersonKind {
        self.kind
    }

    fn duplicate(&self) -> AppError {
        AppError::Conflict(format!("{} name already exists", self.kind))
    }

    pub async fn create(&self, request: &PersonRequest) -> AppResult<i32> {
        let person = request.to_new_person()?;

        let mut tx = Transaction::begin(self.store.as_ref(), "people.create").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            if uow.people_get_by_name(self.kind, &person.name).await?.is_some() {
                return Err(self.duplicate());
            }
            require_lookup(uow, LookupKind::National, person.nationality_id).await?;
            uow.people_create(self.kind, &person).await
        }
        .await;
        let id = tx.finish(result).await?;

        tracing::info!(kind = %self.kind, id, name = %person.name, "person created");
        Ok(id)
    }

    pub async fn update(&self, id: i32, request: &PersonRequest) -> AppResult<()> {
        let person = request.to_new_person()?;

        let mut tx = Transaction::begin(self.store.as_ref(), "people.update").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_person(uow, self.kind, id).await?;
            if let Some(other) = uow.people_get_by_name(self.kind, &person.name).await? {
                if other.id != id {
                    return Err(self.duplicate());
                }
            }
            require_lookup(uow, LookupKind::National, person.nationality_id).await?;
            uow.people_update(self.kind, id, &person).await
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(kind = %self.kind, id, "person updated");
        Ok(())
    }

    /// Delete a person together with the movie links that point at them
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = Transaction::begin(self.store.as_ref(), "people.delete").await?;
        let result: AppResult<_> = async {
            let uow = tx.uow();
            require_person(uow, self.kind, id).await?;
            let links = match self.kind {
                PersonKind::Actor => uow.movie_actors_delete_by_actor(id).await?,
                PersonKind::Director => uow.movie_directors_delete_by_director(id).await?,
            };
            uow.people_delete(self.kind, id).await?;
            Ok(links)
        }
        .await;
        let links = tx.finish(result).await?;

        tracing::info!(kind = %self.kind, id, links, "person deleted");
        Ok(())
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Person> {
        let mut tx = Transaction::begin(self.store.as_ref(), "people.get").await?;
        let result = require_person(tx.uow(), self.kind, id).await;
        tx.finish(result).await
    }

    pub async fn find_all(&self, national_id: Option<i32>) -> AppResult<Vec<Person>> {
        let mut tx = Transaction::begin(self.store.as_ref(), "people.list").await?;
        let result = tx.uow().people_list(self.kind, national_id).await;
        tx.finish(result).await
    }

    /// Exact name match; zero or one result
    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<Person>> {
        let mut tx = Transaction::begin(self.store.as_ref(), "people.search").await?;
        let result = tx.uow().people_get_by_name(self.kind, name.trim()).await;
        Ok(tx.finish(result).await?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;

    #[tokio::test]
    async fn test_crud_round() {
        let (_, store) = fixtures::store();
        let korea = fixtures::lookup(&store, LookupKind::National, "Korea").await;
        let service = PeopleService::new(store, PersonKind::Actor);

        let id = service
            .create(&fixtures::person_request("Song Kang-ho", korea))
            .await
            .unwrap();
        let actor = service.find_by_id(id).await.unwrap();
        assert_eq!(actor.name, "Song Kang-ho");
        assert_eq!(actor.date_of_birth.to_string(), "1969-09-14");

        service
            .update(id, &fixtures::person_request("Song Kang-ho", korea))
            .await
            .unwrap();
        assert_eq!(service.search_by_name("Song Kang-ho").await.unwrap().len(), 1);
        assert!(service.search_by_name("Nobody").await.unwrap().is_empty());

        service.delete(id).await.unwrap();
        let err = service.find_by_id(id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_validation_failures() {
        let (_, store) = fixtures::store();
        let korea = fixtures::lookup(&store, LookupKind::National, "Korea").await;
        let service = PeopleService::new(store, PersonKind::Director);
        service
            .create(&fixtures::person_request("Bong Joon-ho", korea))
            .await
            .unwrap();

        let err = service
            .create(&fixtures::person_request("Bong Joon-ho", korea))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = service
            .create(&fixtures::person_request("Park Chan-wook", 999))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let mut request = fixtures::person_request("Park Chan-wook", korea);
        request.date_of_birth = "23/08/1963".to_string();
        let err = service.create(&request).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
    }

    #[tokio::test]
    async fn test_filter_by_national() {
        let (_, store) = fixtures::store();
        let korea = fixtures::lookup(&store, LookupKind::National, "Korea").await;
        let japan = fixtures::lookup(&store, LookupKind::National, "Japan").await;
        let service = PeopleService::new(store, PersonKind::Actor);
        service.create(&fixtures::person_request("Song Kang-ho", korea)).await.unwrap();
        service.create(&fixtures::person_request("Koji Yakusho", japan)).await.unwrap();

        assert_eq!(service.find_all(None).await.unwrap().len(), 2);
        let japanese = service.find_all(Some(japan)).await.unwrap();
        assert_eq!(japanese.len(), 1);
        assert_eq!(japanese[0].name, "Koji Yakusho");
    }
}
