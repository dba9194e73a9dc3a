//! Movie endpoints

use axum::extract::State;
use axum_extra::extract::{multipart::MultipartRejection, Multipart};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppError,
    models::movie::{MovieCreated, MovieRequest, MovieResponse, MovieSearchQuery},
};

use super::{
    created, done,
    extract::{Json, Path, Query},
    ok, ApiResult, AuthenticatedUser,
};

/// Multipart field carrying the poster image
pub const POSTER_FIELD: &str = "poster_file";

#[derive(Debug, Serialize, ToSchema)]
pub struct PosterUploaded {
    pub poster_url: String,
}

/// List all movies
#[utoipa::path(
    get,
    path = "/api/movies",
    tag = "movies",
    responses(
        (status = 200, description = "List of movies", body = Vec<MovieResponse>)
    )
)]
pub async fn list_movies(State(state): State<crate::AppState>) -> ApiResult<Vec<MovieResponse>> {
    let movies = state.services.movies.find_all().await?;
    ok("Movies retrieved", movies)
}

/// Search a movie by exact title
#[utoipa::path(
    get,
    path = "/api/movies/search",
    tag = "movies",
    params(MovieSearchQuery),
    responses(
        (status = 200, description = "Zero or one movie", body = Vec<MovieResponse>)
    )
)]
pub async fn search_movies(
    State(state): State<crate::AppState>,
    Query(query): Query<MovieSearchQuery>,
) -> ApiResult<Vec<MovieResponse>> {
    let title = query.title.unwrap_or_default();
    if title.trim().is_empty() {
        return Err(AppError::Validation("Query parameter 'title' is required".to_string()));
    }

    let movies = state.services.movies.find_by_title(&title).await?;
    ok("Movies retrieved", movies.into_iter().collect())
}

/// Get a movie with its genre ids
#[utoipa::path(
    get,
    path = "/api/movies/{movie_id}",
    tag = "movies",
    params(("movie_id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie details", body = MovieResponse),
        (status = 404, description = "Movie not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_movie(
    State(state): State<crate::AppState>,
    Path(movie_id): Path<i32>,
) -> ApiResult<MovieResponse> {
    let movie = state.services.movies.find_by_id(movie_id).await?;
    ok("Movie retrieved", movie)
}

/// Create a movie and its genre links
#[utoipa::path(
    post,
    path = "/api/movies",
    tag = "movies",
    security(("bearer_auth" = [])),
    request_body = MovieRequest,
    responses(
        (status = 201, description = "Movie created", body = MovieCreated),
        (status = 400, description = "Invalid input or duplicate title", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown national or genre", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_movie(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<MovieRequest>,
) -> ApiResult<MovieCreated> {
    request.validate()?;

    let movie_id = state.services.movies.create(&request).await?;
    created("Movie created", MovieCreated { movie_id })
}

/// Update a movie and reconcile its genres
#[utoipa::path(
    put,
    path = "/api/movies/{movie_id}",
    tag = "movies",
    security(("bearer_auth" = [])),
    params(("movie_id" = i32, Path, description = "Movie ID")),
    request_body = MovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = MovieResponse),
        (status = 400, description = "Invalid input or duplicate title", body = crate::error::ErrorResponse),
        (status = 404, description = "Movie, national or genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_movie(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(movie_id): Path<i32>,
    Json(request): Json<MovieRequest>,
) -> ApiResult<MovieResponse> {
    request.validate()?;

    state.services.movies.update(movie_id, &request).await?;
    let movie = state.services.movies.find_by_id(movie_id).await?;
    ok("Movie updated", movie)
}

/// Delete a movie with all of its links
#[utoipa::path(
    delete,
    path = "/api/movies/{movie_id}",
    tag = "movies",
    security(("bearer_auth" = [])),
    params(("movie_id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie deleted"),
        (status = 404, description = "Movie not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_movie(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(movie_id): Path<i32>,
) -> ApiResult<()> {
    state.services.movies.delete(movie_id).await?;
    done("Movie deleted")
}

/// Upload a poster image (multipart field `poster_file`)
#[utoipa::path(
    post,
    path = "/api/movies/{movie_id}/upload_poster",
    tag = "movies",
    security(("bearer_auth" = [])),
    params(("movie_id" = i32, Path, description = "Movie ID")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Field `poster_file` with a png or jpeg image"),
    responses(
        (status = 200, description = "Poster stored", body = PosterUploaded),
        (status = 400, description = "Missing poster field", body = crate::error::ErrorResponse),
        (status = 404, description = "Movie not found", body = crate::error::ErrorResponse),
        (status = 415, description = "Unsupported image type", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_poster(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(movie_id): Path<i32>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<PosterUploaded> {
    let mut multipart =
        multipart.map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(POSTER_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read poster: {}", e)))?;

        let poster_url = state
            .services
            .movies
            .upload_poster(movie_id, bytes.to_vec(), &content_type)
            .await?;
        return ok("Poster uploaded", PosterUploaded { poster_url });
    }

    Err(AppError::Validation(format!("Multipart field '{}' is required", POSTER_FIELD)))
}

/// List movies of a genre
#[utoipa::path(
    get,
    path = "/api/genres/{id}/movies",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Movies of the genre", body = Vec<MovieResponse>),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_movies_by_genre(
    State(state): State<crate::AppState>,
    Path(genre_id): Path<i32>,
) -> ApiResult<Vec<MovieResponse>> {
    let movies = state.services.movies.find_all_by_genre(genre_id).await?;
    ok("Movies retrieved", movies)
}
