//! Actor and director endpoints

use axum::extract::State;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        lookup::NameQuery,
        person::{PersonQuery, PersonRequest},
        Person,
    },
    services::people::PeopleService,
};

use super::{
    created, done,
    extract::{Json, Path, Query},
    ok, ApiResult, AuthenticatedUser, Created,
};

pub(crate) fn required_name(query: NameQuery) -> AppResult<String> {
    match query.name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(AppError::Validation("Query parameter 'name' is required".to_string())),
    }
}

async fn list(service: &PeopleService, query: PersonQuery) -> ApiResult<Vec<Person>> {
    let people = service.find_all(query.national_id).await?;
    ok(format!("{}s retrieved", service.kind()), people)
}

async fn search(service: &PeopleService, query: NameQuery) -> ApiResult<Vec<Person>> {
    let name = required_name(query)?;
    let people = service.search_by_name(&name).await?;
    ok(format!("{}s retrieved", service.kind()), people)
}

async fn get(service: &PeopleService, id: i32) -> ApiResult<Person> {
    let person = service.find_by_id(id).await?;
    ok(format!("{} retrieved", service.kind()), person)
}

async fn create(service: &PeopleService, request: PersonRequest) -> ApiResult<Created> {
    request.validate()?;
    let id = service.create(&request).await?;
    created(format!("{} created", service.kind()), Created { id })
}

async fn update(service: &PeopleService, id: i32, request: PersonRequest) -> ApiResult<Person> {
    request.validate()?;
    service.update(id, &request).await?;
    ok(format!("{} updated", service.kind()), service.find_by_id(id).await?)
}

async fn delete(service: &PeopleService, id: i32) -> ApiResult<()> {
    service.delete(id).await?;
    done(format!("{} deleted", service.kind()))
}

// Actors

#[utoipa::path(
    get,
    path = "/api/actors",
    tag = "actors",
    params(PersonQuery),
    responses((status = 200, description = "List of actors", body = Vec<Person>))
)]
pub async fn list_actors(
    State(state): State<crate::AppState>,
    Query(query): Query<PersonQuery>,
) -> ApiResult<Vec<Person>> {
    list(&state.services.actors, query).await
}

#[utoipa::path(
    get,
    path = "/api/actors/search",
    tag = "actors",
    params(NameQuery),
    responses((status = 200, description = "Zero or one actor", body = Vec<Person>))
)]
pub async fn search_actors(
    State(state): State<crate::AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Vec<Person>> {
    search(&state.services.actors, query).await
}

#[utoipa::path(
    get,
    path = "/api/actors/{id}",
    tag = "actors",
    params(("id" = i32, Path, description = "Actor ID")),
    responses(
        (status = 200, description = "Actor details", body = Person),
        (status = 404, description = "Actor not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_actor(State(state): State<crate::AppState>, Path(id): Path<i32>) -> ApiResult<Person> {
    get(&state.services.actors, id).await
}

#[utoipa::path(
    post,
    path = "/api/actors",
    tag = "actors",
    security(("bearer_auth" = [])),
    request_body = PersonRequest,
    responses(
        (status = 201, description = "Actor created", body = Created),
        (status = 400, description = "Invalid input or duplicate name", body = crate::error::ErrorResponse),
        (status = 404, description = "National not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_actor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<PersonRequest>,
) -> ApiResult<Created> {
    create(&state.services.actors, request).await
}

#[utoipa::path(
    put,
    path = "/api/actors/{id}",
    tag = "actors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Actor ID")),
    request_body = PersonRequest,
    responses(
        (status = 200, description = "Actor updated", body = Person),
        (status = 404, description = "Actor or national not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_actor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<PersonRequest>,
) -> ApiResult<Person> {
    update(&state.services.actors, id, request).await
}

/// Delete an actor and its movie links
#[utoipa::path(
    delete,
    path = "/api/actors/{id}",
    tag = "actors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Actor ID")),
    responses(
        (status = 200, description = "Actor deleted"),
        (status = 404, description = "Actor not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_actor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    delete(&state.services.actors, id).await
}

// Directors

#[utoipa::path(
    get,
    path = "/api/directors",
    tag = "directors",
    params(PersonQuery),
    responses((status = 200, description = "List of directors", body = Vec<Person>))
)]
pub async fn list_directors(
    State(state): State<crate::AppState>,
    Query(query): Query<PersonQuery>,
) -> ApiResult<Vec<Person>> {
    list(&state.services.directors, query).await
}

#[utoipa::path(
    get,
    path = "/api/directors/search",
    tag = "directors",
    params(NameQuery),
    responses((status = 200, description = "Zero or one director", body = Vec<Person>))
)]
pub async fn search_directors(
    State(state): State<crate::AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Vec<Person>> {
    search(&state.services.directors, query).await
}

#[utoipa::path(
    get,
    path = "/api/directors/{id}",
    tag = "directors",
    params(("id" = i32, Path, description = "Director ID")),
    responses(
        (status = 200, description = "Director details", body = Person),
        (status = 404, description = "Director not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_director(State(state): State<crate::AppState>, Path(id): Path<i32>) -> ApiResult<Person> {
    get(&state.services.directors, id).await
}

#[utoipa::path(
    post,
    path = "/api/directors",
    tag = "directors",
    security(("bearer_auth" = [])),
    request_body = PersonRequest,
    responses(
        (status = 201, description = "Director created", body = Created),
        (status = 400, description = "Invalid input or duplicate name", body = crate::error::ErrorResponse),
        (status = 404, description = "National not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_director(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<PersonRequest>,
) -> ApiResult<Created> {
    create(&state.services.directors, request).await
}

#[utoipa::path(
    put,
    path = "/api/directors/{id}",
    tag = "directors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Director ID")),
    request_body = PersonRequest,
    responses(
        (status = 200, description = "Director updated", body = Person),
        (status = 404, description = "Director or national not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_director(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<PersonRequest>,
) -> ApiResult<Person> {
    update(&state.services.directors, id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/directors/{id}",
    tag = "directors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Director ID")),
    responses(
        (status = 200, description = "Director deleted"),
        (status = 404, description = "Director not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_director(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    delete(&state.services.directors, id).await
}
