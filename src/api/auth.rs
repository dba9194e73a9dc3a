//! Authentication endpoints

use axum::extract::State;
use validator::Validate;

use crate::models::user::{AuthRequest, LoginResponse, Registered, UserInfo};

use super::{created, extract::Json, ok, ApiResult, AuthenticatedUser};

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = AuthRequest,
    responses(
        (status = 201, description = "Account created", body = Registered),
        (status = 400, description = "Invalid input or username taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<AuthRequest>,
) -> ApiResult<Registered> {
    request.validate()?;

    let user_id = state
        .services
        .auth
        .register(&request.username, &request.password)
        .await?;

    created("Registration successful", Registered { user_id })
}

/// Exchange credentials for a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Wrong password", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown username", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<AuthRequest>,
) -> ApiResult<LoginResponse> {
    request.validate()?;

    let response = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;

    ok("Login successful", response)
}

/// Get the current user from the session token
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> ApiResult<UserInfo> {
    ok("Current user", UserInfo::from(claims))
}
