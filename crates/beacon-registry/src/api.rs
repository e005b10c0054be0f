//! HTTP API for the registry.

use crate::access;
use crate::node::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use beacon_assign::{Assignment, Correction};
use beacon_render::{render_node_config, ConfigFile, NodeConfig};
use beacon_store::StoreError;
use beacon_topology::SlotId;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

type AppStateRef = Arc<AppState>;

/// Build the API router.
///
/// Claim and audit sit behind the allow-list; the read endpoints are
/// open to the mesh.
pub fn build_router(state: AppStateRef) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let guarded = Router::new()
        .route("/api/v1/nodes/claim", post(claim))
        .route("/api/v1/audit", get(audit))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            access::require_authorized,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/status", get(status))
        .route("/api/v1/nodes/resolve/:host", get(resolve))
        .route("/api/v1/nodes/:slot_id/config", get(node_config))
        .route("/api/v1/nodes/:slot_id/config/files", get(node_config_files))
        .merge(guarded)
        .layer(cors)
        .with_state(state)
}

// --- Error mapping ---

/// Transport-level error: a machine-readable kind plus human detail,
/// so callers can distinguish failure modes programmatically.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    detail: String,
}

impl ApiError {
    pub fn forbidden(peer: IpAddr) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            kind: "forbidden",
            detail: format!("caller {} is not on the allow-list", peer),
        }
    }
}

impl From<beacon_assign::Error> for ApiError {
    fn from(e: beacon_assign::Error) -> Self {
        let status = match e.kind() {
            "invalid_input" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            "slot_occupied" | "store_conflict" => StatusCode::CONFLICT,
            "unsupported_region" => StatusCode::UNPROCESSABLE_ENTITY,
            "region_undetermined" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            kind: e.kind(),
            detail: e.to_string(),
        }
    }
}

impl From<beacon_render::Error> for ApiError {
    fn from(e: beacon_render::Error) -> Self {
        let (status, kind) = match e {
            beacon_render::Error::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            beacon_render::Error::MissingReflector => {
                (StatusCode::INTERNAL_SERVER_ERROR, "invalid_topology")
            }
        };
        Self {
            status,
            kind,
            detail: e.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let (status, kind) = match e {
            StoreError::Conflict { .. } => (StatusCode::CONFLICT, "store_conflict"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "store"),
        };
        Self {
            status,
            kind,
            detail: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.kind,
            "detail": self.detail,
        }));
        (self.status, body).into_response()
    }
}

// --- Health endpoint ---

async fn health() -> &'static str {
    "OK"
}

// --- Claim / resolve endpoints ---

#[derive(Debug, Deserialize)]
struct ClaimRequest {
    endpoint: String,
}

async fn claim(
    State(state): State<AppStateRef>,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<Assignment>, ApiError> {
    let outcome = state.assigner.claim(&request.endpoint).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
struct ResolveResponse {
    slot_id: SlotId,
}

async fn resolve(
    State(state): State<AppStateRef>,
    Path(host): Path<String>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let slot_id = state.assigner.resolve(&host).await?;
    Ok(Json(ResolveResponse { slot_id }))
}

// --- Config endpoints ---

async fn node_config(
    State(state): State<AppStateRef>,
    Path(slot_id): Path<String>,
) -> Result<Json<NodeConfig>, ApiError> {
    let (record, _) = state.store.load().await?;
    let config = render_node_config(&record, &SlotId::new(slot_id))?;
    Ok(Json(config))
}

#[derive(Debug, Serialize)]
struct FileBundleResponse {
    slot_id: SlotId,
    files: Vec<ConfigFile>,
}

async fn node_config_files(
    State(state): State<AppStateRef>,
    Path(slot_id): Path<String>,
) -> Result<Json<FileBundleResponse>, ApiError> {
    let slot_id = SlotId::new(slot_id);
    let (record, _) = state.store.load().await?;
    let config = render_node_config(&record, &slot_id)?;
    Ok(Json(FileBundleResponse {
        slot_id,
        files: config.file_set(),
    }))
}

// --- Audit endpoint ---

#[derive(Debug, Serialize)]
struct AuditResponse {
    corrections: Vec<Correction>,
}

async fn audit(State(state): State<AppStateRef>) -> Result<Json<AuditResponse>, ApiError> {
    let corrections = state.assigner.audit().await?;
    Ok(Json(AuditResponse { corrections }))
}

// --- Status endpoint ---

#[derive(Debug, Serialize)]
struct StatusResponse {
    service: String,
    version: String,
    status: &'static str,
    total_slots: usize,
    occupied_slots: usize,
    revision: u64,
}

async fn status(State(state): State<AppStateRef>) -> Result<Json<StatusResponse>, ApiError> {
    let (record, version) = state.store.load().await?;
    Ok(Json(StatusResponse {
        service: record.service_info.name.clone(),
        version: record.service_info.version.clone(),
        status: "healthy",
        total_slots: record.slots.len(),
        occupied_slots: record.occupied().count(),
        revision: version.value(),
    }))
}
