//! Build-event handler: one finished build in, one Discord notification out

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::SharedState;
use crate::build::BuildContext;
use crate::notifier;
use crate::utils::{SIGNATURE_HEADER, find_project, verify_signature};

/// Result of handling one build event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotifyResponse {
    pub delivery_id: String,
    pub status: String, // sent, disabled, skipped, failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /notify/{project} - Announce a finished build on the project's Discord webhook.
///
/// Delivery failures are reported in the body with a 200: a broken webhook must
/// never turn into a failed step on the CI side.
pub async fn handle_notify(
    AxumState(state): AxumState<SharedState>,
    Path(project_name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(project) = find_project(&state.config, &project_name).cloned() else {
        warn!("No project named '{}', ignoring build event.", project_name);
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown project '{}'", project_name) })),
        )
            .into_response();
    };

    // Per-project event signature validation if required
    if project.needs_event_secret() {
        let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
            error!(
                "Project '{}' requires an event secret, but no signature header supplied.",
                project.name
            );
            return StatusCode::UNAUTHORIZED.into_response();
        };
        let Some(secret) = project.event_secret.as_deref().filter(|s| !s.is_empty()) else {
            error!(
                "Project '{}' requires an event secret, but none was configured.",
                project.name
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };
        if !verify_signature(secret, &body, signature) {
            error!("Signature verification failed for project '{}'!", project.name);
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let ctx: BuildContext = match serde_json::from_slice(&body) {
        Ok(ctx) => ctx,
        Err(e) => {
            info!("Could not parse build event: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid build event: {}", e) })),
            )
                .into_response();
        }
    };

    let delivery_id = Uuid::now_v7().to_string();
    info!(
        delivery_id = %delivery_id,
        project = %project.name,
        build = %ctx.build_id,
        result = %ctx.result,
        commits = ctx.commits.len(),
        "Received build event"
    );

    // The webhook client blocks, keep it off the async workers
    let span = info_span!("notify", delivery_id = %delivery_id, project = %project.name);
    let outcome = tokio::task::spawn_blocking(move || {
        let _enter = span.enter();
        notifier::perform(&project.notification, &ctx)
    })
    .await;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Notification task for delivery {} failed: {}", delivery_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    Json(NotifyResponse {
        delivery_id,
        status: outcome.as_str().to_string(),
        error: outcome.error().map(|e| e.to_string()),
    })
    .into_response()
}
