//! Movie association endpoints: actors, directors and genres of a movie

use axum::extract::State;
use validator::Validate;

use crate::models::association::{
    GenreDiff, GenreIdsRequest, LinkActorRequest, LinkDirectorRequest, MovieActors, MovieDirectors,
    MovieGenres, UpdateActorRoleRequest,
};

use super::{
    created, done,
    extract::{Json, Path},
    ok, ApiResult, AuthenticatedUser,
};

// Actors

/// Actors of a movie with their roles
#[utoipa::path(
    get,
    path = "/api/movies/{movie_id}/actors",
    tag = "movie-links",
    params(("movie_id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Linked actors", body = MovieActors),
        (status = 404, description = "Movie not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_movie_actors(
    State(state): State<crate::AppState>,
    Path(movie_id): Path<i32>,
) -> ApiResult<MovieActors> {
    let actors = state.services.movie_actors.actors_of(movie_id).await?;
    ok("Movie actors retrieved", actors)
}

#[utoipa::path(
    post,
    path = "/api/movies/{movie_id}/actors",
    tag = "movie-links",
    security(("bearer_auth" = [])),
    params(("movie_id" = i32, Path, description = "Movie ID")),
    request_body = LinkActorRequest,
    responses(
        (status = 201, description = "Actor linked", body = MovieActors),
        (status = 400, description = "Missing role or already linked", body = crate::error::ErrorResponse),
        (status = 404, description = "Movie or actor not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn link_actor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(movie_id): Path<i32>,
    Json(request): Json<LinkActorRequest>,
) -> ApiResult<MovieActors> {
    request.validate()?;

    let links = &state.services.movie_actors;
    links.link(movie_id, request.actor_id, &request.role).await?;
    created("Actor linked to movie", links.actors_of(movie_id).await?)
}

#[utoipa::path(
    put,
    path = "/api/movies/{movie_id}/actors/{actor_id}",
    tag = "movie-links",
    security(("bearer_auth" = [])),
    params(
        ("movie_id" = i32, Path, description = "Movie ID"),
        ("actor_id" = i32, Path, description = "Actor ID")
    ),
    request_body = UpdateActorRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = MovieActors),
        (status = 404, description = "Link not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_actor_role(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path((movie_id, actor_id)): Path<(i32, i32)>,
    Json(request): Json<UpdateActorRoleRequest>,
) -> ApiResult<MovieActors> {
    request.validate()?;

    let links = &state.services.movie_actors;
    links.update_role(movie_id, actor_id, &request.role).await?;
    ok("Actor role updated", links.actors_of(movie_id).await?)
}

#[utoipa::path(
    delete,
    path = "/api/movies/{movie_id}/actors/{actor_id}",
    tag = "movie-links",
    security(("bearer_auth" = [])),
    params(
        ("movie_id" = i32, Path, description = "Movie ID"),
        ("actor_id" = i32, Path, description = "Actor ID")
    ),
    responses(
        (status = 200, description = "Actor unlinked"),
        (status = 404, description = "Link not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn unlink_actor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path((movie_id, actor_id)): Path<(i32, i32)>,
) -> ApiResult<()> {
    state.services.movie_actors.unlink(movie_id, actor_id).await?;
    done("Actor unlinked from movie")
}

// Directors

#[utoipa::path(
    get,
    path = "/api/movies/{movie_id}/directors",
    tag = "movie-links",
    params(("movie_id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Linked directors", body = MovieDirectors),
        (status = 404, description = "Movie not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_movie_directors(
    State(state): State<crate::AppState>,
    Path(movie_id): Path<i32>,
) -> ApiResult<MovieDirectors> {
    let directors = state.services.movie_directors.directors_of(movie_id).await?;
    ok("Movie directors retrieved", directors)
}

#[utoipa::path(
    post,
    path = "/api/movies/{movie_id}/directors",
    tag = "movie-links",
    security(("bearer_auth" = [])),
    params(("movie_id" = i32, Path, description = "Movie ID")),
    request_body = LinkDirectorRequest,
    responses(
        (status = 201, description = "Director linked", body = MovieDirectors),
        (status = 400, description = "Already linked", body = crate::error::ErrorResponse),
        (status = 404, description = "Movie or director not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn link_director(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(movie_id): Path<i32>,
    Json(request): Json<LinkDirectorRequest>,
) -> ApiResult<MovieDirectors> {
    let links = &state.services.movie_directors;
    links.link(movie_id, request.director_id).await?;
    created("Director linked to movie", links.directors_of(movie_id).await?)
}

#[utoipa::path(
    delete,
    path = "/api/movies/{movie_id}/directors/{director_id}",
    tag = "movie-links",
    security(("bearer_auth" = [])),
    params(
        ("movie_id" = i32, Path, description = "Movie ID"),
        ("director_id" = i32, Path, description = "Director ID")
    ),
    responses(
        (status = 200, description = "Director unlinked"),
        (status = 404, description = "Link not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn unlink_director(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path((movie_id, director_id)): Path<(i32, i32)>,
) -> ApiResult<()> {
    state.services.movie_directors.unlink(movie_id, director_id).await?;
    done("Director unlinked from movie")
}

// Genres

#[utoipa::path(
    get,
    path = "/api/movies/{movie_id}/genres",
    tag = "movie-links",
    params(("movie_id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Linked genres", body = MovieGenres),
        (status = 404, description = "Movie not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_movie_genres(
    State(state): State<crate::AppState>,
    Path(movie_id): Path<i32>,
) -> ApiResult<MovieGenres> {
    let genres = state.services.movie_genres.genres_of(movie_id).await?;
    ok("Movie genres retrieved", genres)
}

/// Add genres to a movie; every pair must be new
#[utoipa::path(
    post,
    path = "/api/movies/{movie_id}/genres",
    tag = "movie-links",
    security(("bearer_auth" = [])),
    params(("movie_id" = i32, Path, description = "Movie ID")),
    request_body = GenreIdsRequest,
    responses(
        (status = 201, description = "Genres linked", body = MovieGenres),
        (status = 400, description = "Already linked", body = crate::error::ErrorResponse),
        (status = 404, description = "Movie or genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_genres(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(movie_id): Path<i32>,
    Json(request): Json<GenreIdsRequest>,
) -> ApiResult<MovieGenres> {
    let links = &state.services.movie_genres;
    links.add(movie_id, &request.genre_ids).await?;
    created("Genres linked to movie", links.genres_of(movie_id).await?)
}

/// Replace the genre set of a movie, applying only the delta
#[utoipa::path(
    put,
    path = "/api/movies/{movie_id}/genres",
    tag = "movie-links",
    security(("bearer_auth" = [])),
    params(("movie_id" = i32, Path, description = "Movie ID")),
    request_body = GenreIdsRequest,
    responses(
        (status = 200, description = "Applied delta", body = GenreDiff),
        (status = 404, description = "Movie or genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_genres(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(movie_id): Path<i32>,
    Json(request): Json<GenreIdsRequest>,
) -> ApiResult<GenreDiff> {
    let diff = state
        .services
        .movie_genres
        .set_genres(movie_id, &request.genre_ids)
        .await?;
    ok("Movie genres updated", diff)
}

#[utoipa::path(
    delete,
    path = "/api/movies/{movie_id}/genres/{genre_id}",
    tag = "movie-links",
    security(("bearer_auth" = [])),
    params(
        ("movie_id" = i32, Path, description = "Movie ID"),
        ("genre_id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre unlinked"),
        (status = 404, description = "Link not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn unlink_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path((movie_id, genre_id)): Path<(i32, i32)>,
) -> ApiResult<()> {
    state.services.movie_genres.unlink(movie_id, genre_id).await?;
    done("Genre unlinked from movie")
}
