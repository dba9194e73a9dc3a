//! Recommended movies endpoints

use axum::extract::State;

use crate::models::{association::RecommendRequest, movie::MovieResponse};

use super::{
    created, done,
    extract::{Json, Path},
    ok, ApiResult, AuthenticatedUser,
};

/// Recommended movies, newest first
#[utoipa::path(
    get,
    path = "/api/recommendations",
    tag = "recommendations",
    responses((status = 200, description = "Recommended movies", body = Vec<MovieResponse>))
)]
pub async fn list_recommendations(State(state): State<crate::AppState>) -> ApiResult<Vec<MovieResponse>> {
    let movies = state.services.recommendations.list().await?;
    ok("Recommendations retrieved", movies)
}

#[utoipa::path(
    post,
    path = "/api/recommendations",
    tag = "recommendations",
    security(("bearer_auth" = [])),
    request_body = RecommendRequest,
    responses(
        (status = 201, description = "Movie recommended", body = MovieResponse),
        (status = 400, description = "Already recommended", body = crate::error::ErrorResponse),
        (status = 404, description = "Movie not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn recommend_movie(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<RecommendRequest>,
) -> ApiResult<MovieResponse> {
    state.services.recommendations.recommend(request.movie_id).await?;
    let movie = state.services.movies.find_by_id(request.movie_id).await?;
    created("Movie recommended", movie)
}

#[utoipa::path(
    delete,
    path = "/api/recommendations/{movie_id}",
    tag = "recommendations",
    security(("bearer_auth" = [])),
    params(("movie_id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Recommendation removed"),
        (status = 404, description = "Movie is not recommended", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_recommendation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(movie_id): Path<i32>,
) -> ApiResult<()> {
    state.services.recommendations.unrecommend(movie_id).await?;
    done("Recommendation removed")
}
