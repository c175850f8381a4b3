//! HTTP routes for the reference auth service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use authflow_core::api::ReferenceAuthService;
use authflow_core::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReferenceAuthService>,
}

pub fn router(service: ReferenceAuthService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn status_for(success: bool) -> StatusCode {
    if success {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> (StatusCode, Json<LoginResponse>) {
    let response = state.service.authenticate(&request);
    (status_for(response.success), Json(response))
}

async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> (StatusCode, Json<RefreshResponse>) {
    let response = state.service.renew(&request);
    (status_for(response.success), Json(response))
}
