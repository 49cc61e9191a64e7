//! Projects API endpoints

use axum::{Json, extract::State as AxumState};
use serde::Serialize;

use crate::SharedState;

/// What the relay will do with a project's build events
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub notifications_enabled: bool,
    pub show_commits: bool,
    pub requires_signature: bool,
}

/// GET /api/projects - List configured projects. Webhook URLs and secrets are not exposed.
pub async fn get_projects(AxumState(state): AxumState<SharedState>) -> Json<Vec<ProjectSummary>> {
    let summaries = state
        .config
        .project
        .iter()
        .map(|p| ProjectSummary {
            name: p.name.clone(),
            notifications_enabled: !p.notification.webhook_url.trim().is_empty(),
            show_commits: p.notification.show_commits,
            requires_signature: p.needs_event_secret(),
        })
        .collect();

    Json(summaries)
}
