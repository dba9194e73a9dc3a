//! Genre and national endpoints

use axum::extract::State;
use validator::Validate;

use crate::{
    models::{
        lookup::{LookupRequest, NameQuery},
        Lookup,
    },
    services::lookups::LookupsService,
};

use super::{
    created, done,
    extract::{Json, Path, Query},
    ok,
    people::required_name,
    ApiResult, AuthenticatedUser, Created,
};

async fn list(service: &LookupsService) -> ApiResult<Vec<Lookup>> {
    let rows = service.find_all().await?;
    ok(format!("{}s retrieved", service.kind()), rows)
}

async fn search(service: &LookupsService, query: NameQuery) -> ApiResult<Vec<Lookup>> {
    let name = required_name(query)?;
    let rows = service.search_by_name(&name).await?;
    ok(format!("{}s retrieved", service.kind()), rows)
}

async fn get(service: &LookupsService, id: i32) -> ApiResult<Lookup> {
    let row = service.find_by_id(id).await?;
    ok(format!("{} retrieved", service.kind()), row)
}

async fn create(service: &LookupsService, request: LookupRequest) -> ApiResult<Created> {
    request.validate()?;
    let id = service.create(&request.name).await?;
    created(format!("{} created", service.kind()), Created { id })
}

async fn update(service: &LookupsService, id: i32, request: LookupRequest) -> ApiResult<Lookup> {
    request.validate()?;
    service.update(id, &request.name).await?;
    ok(format!("{} updated", service.kind()), service.find_by_id(id).await?)
}

async fn delete(service: &LookupsService, id: i32) -> ApiResult<()> {
    service.delete(id).await?;
    done(format!("{} deleted", service.kind()))
}

// Genres

#[utoipa::path(
    get,
    path = "/api/genres",
    tag = "genres",
    responses((status = 200, description = "List of genres", body = Vec<Lookup>))
)]
pub async fn list_genres(State(state): State<crate::AppState>) -> ApiResult<Vec<Lookup>> {
    list(&state.services.genres).await
}

#[utoipa::path(
    get,
    path = "/api/genres/search",
    tag = "genres",
    params(NameQuery),
    responses((status = 200, description = "Zero or one genre", body = Vec<Lookup>))
)]
pub async fn search_genres(
    State(state): State<crate::AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Vec<Lookup>> {
    search(&state.services.genres, query).await
}

#[utoipa::path(
    get,
    path = "/api/genres/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre details", body = Lookup),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(State(state): State<crate::AppState>, Path(id): Path<i32>) -> ApiResult<Lookup> {
    get(&state.services.genres, id).await
}

#[utoipa::path(
    post,
    path = "/api/genres",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = LookupRequest,
    responses(
        (status = 201, description = "Genre created", body = Created),
        (status = 400, description = "Invalid input or duplicate name", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<LookupRequest>,
) -> ApiResult<Created> {
    create(&state.services.genres, request).await
}

#[utoipa::path(
    put,
    path = "/api/genres/{id}",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = LookupRequest,
    responses(
        (status = 200, description = "Genre updated", body = Lookup),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<LookupRequest>,
) -> ApiResult<Lookup> {
    update(&state.services.genres, id, request).await
}

/// Delete a genre and its movie links
#[utoipa::path(
    delete,
    path = "/api/genres/{id}",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre deleted"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    delete(&state.services.genres, id).await
}

// Nationals

#[utoipa::path(
    get,
    path = "/api/nationals",
    tag = "nationals",
    responses((status = 200, description = "List of nationals", body = Vec<Lookup>))
)]
pub async fn list_nationals(State(state): State<crate::AppState>) -> ApiResult<Vec<Lookup>> {
    list(&state.services.nationals).await
}

#[utoipa::path(
    get,
    path = "/api/nationals/search",
    tag = "nationals",
    params(NameQuery),
    responses((status = 200, description = "Zero or one national", body = Vec<Lookup>))
)]
pub async fn search_nationals(
    State(state): State<crate::AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Vec<Lookup>> {
    search(&state.services.nationals, query).await
}

#[utoipa::path(
    get,
    path = "/api/nationals/{id}",
    tag = "nationals",
    params(("id" = i32, Path, description = "National ID")),
    responses(
        (status = 200, description = "National details", body = Lookup),
        (status = 404, description = "National not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_national(State(state): State<crate::AppState>, Path(id): Path<i32>) -> ApiResult<Lookup> {
    get(&state.services.nationals, id).await
}

#[utoipa::path(
    post,
    path = "/api/nationals",
    tag = "nationals",
    security(("bearer_auth" = [])),
    request_body = LookupRequest,
    responses(
        (status = 201, description = "National created", body = Created),
        (status = 400, description = "Invalid input or duplicate name", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_national(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<LookupRequest>,
) -> ApiResult<Created> {
    create(&state.services.nationals, request).await
}

#[utoipa::path(
    put,
    path = "/api/nationals/{id}",
    tag = "nationals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "National ID")),
    request_body = LookupRequest,
    responses(
        (status = 200, description = "National updated", body = Lookup),
        (status = 404, description = "National not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_national(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<LookupRequest>,
) -> ApiResult<Lookup> {
    update(&state.services.nationals, id, request).await
}

/// Delete a national nothing refers to
#[utoipa::path(
    delete,
    path = "/api/nationals/{id}",
    tag = "nationals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "National ID")),
    responses(
        (status = 200, description = "National deleted"),
        (status = 400, description = "National still referenced", body = crate::error::ErrorResponse),
        (status = 404, description = "National not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_national(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    delete(&state.services.nationals, id).await
}
