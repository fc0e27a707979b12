//! User handlers: register, get, list.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateUserRequest, GetUserParams, PaginationParams};
use crate::api::extract::{ApiQuery, ValidJson};
use crate::app_state::AppState;
use crate::auth::{Principal, authorize_owner};
use crate::domain::{UserId, UserProfile};
use crate::error::{ApiError, ErrorResponse};

/// `POST /users`: Register a new user.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for invalid fields and
/// [`ApiError::Conflict`] if the email is already registered.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    summary = "Register a user",
    description = "Creates a user account. Public. Every invalid field is reported in one response.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserProfile,
         headers(("Location" = String, description = "URI of the new user"))),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_service.create_user(req.into()).await?;
    let location = format!("/users/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(user),
    ))
}

/// `GET /users/{id}`: Read one user. Only the owner may read it.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] when the caller is not the owner,
/// whether or not the id exists, and [`ApiError::UserNotFound`] when the
/// caller's own record is gone.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    summary = "Get a user",
    description = "Returns the caller's own user record. `include=albums` attaches albums from the albums service when it is reachable.",
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
        GetUserParams,
    ),
    responses(
        (status = 200, description = "User found", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner, existing or not", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiQuery(params): ApiQuery<GetUserParams>,
) -> Result<Json<UserProfile>, ApiError> {
    let user_id: UserId = id
        .parse()
        .map_err(|_| ApiError::InvalidRequest(format!("invalid user id: {id}")))?;

    let fetched = state.user_service.get_user(user_id).await?;
    let Some(user) = authorize_owner(&principal, user_id, fetched)? else {
        return Err(ApiError::UserNotFound(*user_id.as_uuid()));
    };

    let user = if params.wants_albums() {
        state.user_service.with_albums(user).await
    } else {
        user
    };
    Ok(Json(user))
}

/// `GET /users`: List users, one page at a time.
///
/// # Errors
///
/// Returns [`ApiError::Persistence`] on storage failure.
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    summary = "List users",
    description = "Returns one zero-based page of users in registration order. `offset` is accepted as an alias of `page`.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserProfile>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let params = params.clamped();
    let users = state
        .user_service
        .list_users(params.page, params.limit)
        .await?;
    Ok(Json(users))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/{id}", get(get_user))
}
