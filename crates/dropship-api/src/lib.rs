//! dropship-api — REST API for dropship.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/api/deploy` | Classify, scaffold and publish submitted code |
//! | GET | `/api/deployments` | List the caller's recorded deployments |
//! | POST | `/api/deployments` | Record a deployment for the caller |
//! | GET | `/api/docs` | Machine-readable description of `/api/deploy` |
//!
//! Any other method on these paths gets a JSON 405.

pub mod auth;
pub mod docs;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use dropship_deploy::Orchestrator;
use dropship_state::HistoryStore;

use crate::auth::SessionValidator;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Orchestrator,
    pub history: HistoryStore,
    pub sessions: Arc<dyn SessionValidator>,
}

impl ApiState {
    pub fn new(
        orchestrator: Orchestrator,
        history: HistoryStore,
        sessions: Arc<dyn SessionValidator>,
    ) -> Self {
        Self {
            orchestrator,
            history,
            sessions,
        }
    }
}

/// Build the complete API router.
pub fn build_router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route(
            "/deploy",
            post(handlers::deploy).fallback(handlers::method_not_allowed),
        )
        .route(
            "/deployments",
            get(handlers::list_deployments)
                .post(handlers::create_deployment)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/docs",
            get(docs::api_docs).fallback(handlers::method_not_allowed),
        )
        .with_state(state);

    Router::new().nest("/api", api_routes)
}
