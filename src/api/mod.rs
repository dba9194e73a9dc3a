//! API handlers for eFilm REST endpoints

pub mod auth;
pub mod extract;
pub mod health;
pub mod lookups;
pub mod movie_links;
pub mod movies;
pub mod openapi;
pub mod people;
pub mod recommendations;

use std::time::Duration;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts},
    http::{request::Parts, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use utoipa::ToSchema;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult},
    models::user::UserClaims,
    AppState,
};

/// Extractor for authenticated user from a `Bearer` session token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Missing or invalid authorization header".to_string()))?;

        let claims = state.services.tokens.validate(bearer.token())?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Response envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Id of a newly created row
#[derive(Debug, Serialize, ToSchema)]
pub struct Created {
    pub id: i32,
}

pub type ApiResult<T> = AppResult<(StatusCode, Json<ApiResponse<T>>)>;

fn envelope<T>(status: StatusCode, message: impl Into<String>, data: Option<T>) -> ApiResult<T> {
    Ok((
        status,
        Json(ApiResponse {
            code: status.as_u16(),
            status: status.canonical_reason().unwrap_or("OK").to_string(),
            message: message.into(),
            data,
        }),
    ))
}

/// 200 with data
pub fn ok<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    envelope(StatusCode::OK, message, Some(data))
}

/// 201 with data
pub fn created<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    envelope(StatusCode::CREATED, message, Some(data))
}

/// 200 without data
pub fn done(message: impl Into<String>) -> ApiResult<()> {
    envelope(StatusCode::OK, message, None)
}

/// Build the application router with all routes and layers
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let body_limit = state.config.storage.max_upload_bytes;

    let api = Router::new()
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/me", get(auth::me))
        // Movies
        .route("/movies", get(movies::list_movies).post(movies::create_movie))
        .route("/movies/search", get(movies::search_movies))
        .route(
            "/movies/:movie_id",
            get(movies::get_movie).put(movies::update_movie).delete(movies::delete_movie),
        )
        .route("/movies/:movie_id/upload_poster", post(movies::upload_poster))
        // Movie associations
        .route(
            "/movies/:movie_id/actors",
            get(movie_links::list_movie_actors).post(movie_links::link_actor),
        )
        .route(
            "/movies/:movie_id/actors/:actor_id",
            put(movie_links::update_actor_role).delete(movie_links::unlink_actor),
        )
        .route(
            "/movies/:movie_id/directors",
            get(movie_links::list_movie_directors).post(movie_links::link_director),
        )
        .route("/movies/:movie_id/directors/:director_id", delete(movie_links::unlink_director))
        .route(
            "/movies/:movie_id/genres",
            get(movie_links::list_movie_genres)
                .post(movie_links::add_genres)
                .put(movie_links::set_genres),
        )
        .route("/movies/:movie_id/genres/:genre_id", delete(movie_links::unlink_genre))
        // Actors
        .route("/actors", get(people::list_actors).post(people::create_actor))
        .route("/actors/search", get(people::search_actors))
        .route(
            "/actors/:id",
            get(people::get_actor).put(people::update_actor).delete(people::delete_actor),
        )
        // Directors
        .route("/directors", get(people::list_directors).post(people::create_director))
        .route("/directors/search", get(people::search_directors))
        .route(
            "/directors/:id",
            get(people::get_director).put(people::update_director).delete(people::delete_director),
        )
        // Genres
        .route("/genres", get(lookups::list_genres).post(lookups::create_genre))
        .route("/genres/search", get(lookups::search_genres))
        .route(
            "/genres/:id",
            get(lookups::get_genre).put(lookups::update_genre).delete(lookups::delete_genre),
        )
        .route("/genres/:id/movies", get(movies::list_movies_by_genre))
        // Nationals
        .route("/nationals", get(lookups::list_nationals).post(lookups::create_national))
        .route("/nationals/search", get(lookups::search_nationals))
        .route(
            "/nationals/:id",
            get(lookups::get_national).put(lookups::update_national).delete(lookups::delete_national),
        )
        // Recommendations
        .route(
            "/recommendations",
            get(recommendations::list_recommendations).post(recommendations::recommend_movie),
        )
        .route("/recommendations/:movie_id", delete(recommendations::remove_recommendation))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
