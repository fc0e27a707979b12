//! Server-sent event stream of user registrations.

use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures_util::{Stream, StreamExt};

use crate::app_state::AppState;
use crate::auth::Principal;
use crate::domain::UserEvent;
use crate::error::ErrorResponse;

/// SSE event name for a registration.
pub const USER_CREATED_EVENT: &str = "user_created";

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// `GET /users/stream`: Live feed of newly registered users.
///
/// Each event carries the new user's public projection as JSON. Only
/// users created after the connection opens are sent.
#[utoipa::path(
    get,
    path = "/users/stream",
    tag = "Users",
    summary = "Stream user registrations",
    description = "Server-sent events: one `user_created` event per registration, with the user's public projection as data. A comment keep-alive is sent every 15 seconds.",
    responses(
        (status = 200, description = "Event stream", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn stream_users(
    State(state): State<AppState>,
    principal: Principal,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    tracing::info!(subject = principal.subject(), "user stream subscriber connected");
    let events = state.user_service.stream_users().into_stream().map(to_sse);
    Sse::new(events).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

fn to_sse(event: UserEvent) -> Result<Event, axum::Error> {
    Event::default()
        .event(event.event_type_str())
        .json_data(event.user())
}

/// Stream routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users/stream", get(stream_users))
}
