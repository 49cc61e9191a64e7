//! API module for all HTTP handlers
//!
//! Health and project listing, plus the build-event endpoint that triggers notifications

pub mod handlers;
pub mod notify;
pub mod projects;

use axum::{Router, routing};

use crate::SharedState;

// Re-export handlers
pub use handlers::root;
pub use notify::{NotifyResponse, handle_notify};
pub use projects::get_projects;

/// Builds the relay's router
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", routing::get(root))
        .route("/api/projects", routing::get(get_projects))
        .route("/notify/{project}", routing::post(handle_notify))
        .with_state(state)
}
