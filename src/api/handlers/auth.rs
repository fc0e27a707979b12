//! Login handler.

use axum::extract::State;
use axum::http::header::{self, HeaderName};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{AuthenticationRequest, AuthenticationResponse};
use crate::api::extract::ValidJson;
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// Response header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "userid";

/// `POST /auth/login`: Exchange credentials for a bearer token.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for a malformed body and
/// [`ApiError::InvalidCredentials`] for an unknown email or wrong password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Verifies email and password. On success the token is returned in the `Authorization` header as `Bearer <token>` and the user id in the `UserId` header.",
    request_body = AuthenticationRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthenticationResponse,
         headers(
             ("Authorization" = String, description = "Bearer token"),
             ("UserId" = String, description = "Authenticated user id"),
         )),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<AuthenticationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .auth_service
        .authenticate(req.email.trim(), req.password)
        .await?;

    let body = AuthenticationResponse {
        user_id: outcome.user_id,
        token_type: "Bearer".to_string(),
        expires_in: state.gate.tokens().ttl().num_seconds(),
    };
    Ok((
        StatusCode::OK,
        [
            (header::AUTHORIZATION, format!("Bearer {}", outcome.token)),
            (HeaderName::from_static(USER_ID_HEADER), outcome.user_id.to_string()),
        ],
        Json(body),
    ))
}

/// Authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}
