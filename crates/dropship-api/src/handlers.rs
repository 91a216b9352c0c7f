//! REST API handlers.
//!
//! Failures are always `{"message": "..."}` bodies; the deploy route never
//! leaks anything but the uniform failure message.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use dropship_state::NewDeployment;

use crate::ApiState;
use crate::auth::authenticate;

/// Body of every error response.
#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

fn error_response(msg: impl Into<String>, status: StatusCode) -> Response {
    (
        status,
        Json(MessageBody {
            message: msg.into(),
        }),
    )
        .into_response()
}

fn invalid_body(rejection: JsonRejection) -> Response {
    error_response(
        format!("Invalid request body: {}", rejection.body_text()),
        StatusCode::BAD_REQUEST,
    )
}

/// Fallback for unsupported methods on known paths.
pub async fn method_not_allowed() -> Response {
    error_response("Method not allowed", StatusCode::METHOD_NOT_ALLOWED)
}

// ── Deploy ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    #[serde(default)]
    pub code: Option<String>,
}

/// POST /api/deploy
pub async fn deploy(
    State(state): State<ApiState>,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(rejection),
    };

    match state.orchestrator.handle(request.code.as_deref()).await {
        Ok(deployment) => (StatusCode::OK, Json(deployment)).into_response(),
        Err(failure) => {
            let status = if failure.kind.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            error_response(failure.message, status)
        }
    }
}

// ── Deployment history ─────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentRequest {
    #[serde(default)]
    pub deployment_id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
}

impl CreateDeploymentRequest {
    fn into_new_deployment(self) -> Option<NewDeployment> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(NewDeployment {
            deployment_id: present(self.deployment_id)?,
            code: present(self.code)?,
            language: present(self.language)?,
            live_url: present(self.live_url)?,
        })
    }
}

/// GET /api/deployments
pub async fn list_deployments(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    let Some(user_id) = authenticate(state.sessions.as_ref(), &headers) else {
        return error_response("Unauthorized", StatusCode::UNAUTHORIZED);
    };

    match state.history.list_for_user(&user_id) {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!(%user_id, error = %e, "failed to list deployments");
            error_response("Failed to fetch deployments", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/deployments
pub async fn create_deployment(
    State(state): State<ApiState>,
    headers: HeaderMap,
    payload: Result<Json<CreateDeploymentRequest>, JsonRejection>,
) -> Response {
    let Some(user_id) = authenticate(state.sessions.as_ref(), &headers) else {
        return error_response("Unauthorized", StatusCode::UNAUTHORIZED);
    };

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(rejection),
    };
    let Some(new) = request.into_new_deployment() else {
        warn!(%user_id, "deployment record missing fields");
        return error_response("Missing required fields", StatusCode::BAD_REQUEST);
    };

    match state.history.create(&user_id, new) {
        Ok(record) => {
            info!(%user_id, deployment_id = %record.deployment_id, "deployment recorded");
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => {
            error!(%user_id, error = %e, "failed to record deployment");
            error_response("Failed to create deployment", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
