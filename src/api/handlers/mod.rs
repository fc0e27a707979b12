//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod stream;
pub mod system;
pub mod user;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes except the event stream.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(user::routes())
        .merge(system::routes())
}
