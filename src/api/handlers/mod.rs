//! REST endpoint handlers organized by resource.

pub mod corrections;
pub mod directory;
pub mod events;
pub mod records;
pub mod sessions;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(events::routes())
        .merge(sessions::routes())
        .merge(records::routes())
        .merge(corrections::routes())
        .merge(directory::routes())
}
