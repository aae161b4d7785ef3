// zija_node_rust/src/api_service.rs
use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::blockchain::checkpoints::Checkpoints;
use crate::blockchain::progress::ChainPositionSample;
use crate::chainparams::Base58Type;
use crate::network_selector::NetworkSelector;
use crate::util::{uint256_from_hex, uint256_to_hex};

// Shared application state available to all handlers
#[derive(Clone)]
pub struct ApiAppState {
    pub selector: Arc<NetworkSelector>,
    pub checkpoints: Arc<Checkpoints>,
}

// --- API Error Handling ---
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}

// --- Response Structs ---
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NetworkResponse {
    network: String,
    network_id: String,
    magic: String,
    default_port: u16,
    rpc_port: u16,
    genesis_hash: String,
    genesis_merkle_root: String,
    last_pow_height: i32,
    subsidy_halving_interval: i32,
    stake_min_age: i64,
    stake_max_age: i64,
    data_dir: String,
    dns_seeds: Vec<String>,
    fixed_seed_count: usize,
    pubkey_address_prefix: String,
    script_address_prefix: String,
    require_rpc_password: bool,
}

#[derive(Debug, Serialize)]
struct ApiCheckpoint {
    height: i32,
    hash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckpointsResponse {
    network: String,
    enabled: bool,
    revision: u32,
    total_blocks_estimate: i32,
    time_last_checkpoint: i64,
    transactions_last_checkpoint: i64,
    transactions_per_day: f64,
    checkpoints: Vec<ApiCheckpoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckBlockResponse {
    height: i32,
    hash: String,
    has_checkpoint: bool,
    accepted: bool,
}

#[derive(Deserialize)]
struct ProgressParams {
    chain_tx: Option<u64>,
    time: Option<i64>,
    sigchecks: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressResponse {
    network: String,
    sigchecks: bool,
    progress: f64,
}

// --- Handlers ---
async fn network_handler(State(app_state): State<ApiAppState>) -> Json<NetworkResponse> {
    let params = app_state.selector.params();
    Json(NetworkResponse {
        network: params.network.to_string(),
        network_id: params.network_id.to_string(),
        magic: hex::encode(params.message_start),
        default_port: params.default_port,
        rpc_port: params.rpc_port,
        genesis_hash: uint256_to_hex(&params.hash_genesis_block),
        genesis_merkle_root: uint256_to_hex(&params.genesis.header.merkle_root),
        last_pow_height: params.last_pow_height,
        subsidy_halving_interval: params.subsidy_halving_interval,
        stake_min_age: params.stake_min_age,
        stake_max_age: params.stake_max_age,
        data_dir: params.data_dir.to_string(),
        dns_seeds: params.dns_seeds.iter().map(|s| s.host.clone()).collect(),
        fixed_seed_count: params.fixed_seeds.len(),
        pubkey_address_prefix: hex::encode(params.base58_prefix(Base58Type::PubkeyAddress)),
        script_address_prefix: hex::encode(params.base58_prefix(Base58Type::ScriptAddress)),
        require_rpc_password: params.require_rpc_password,
    })
}

async fn checkpoints_handler(State(app_state): State<ApiAppState>) -> Json<CheckpointsResponse> {
    let checkpoints = &app_state.checkpoints;
    let data = checkpoints.active_data();
    Json(CheckpointsResponse {
        network: app_state.selector.network().to_string(),
        enabled: checkpoints.is_enabled(),
        revision: data.revision,
        total_blocks_estimate: checkpoints.total_blocks_estimate(),
        time_last_checkpoint: data.time_last_checkpoint,
        transactions_last_checkpoint: data.transactions_last_checkpoint,
        transactions_per_day: data.transactions_per_day,
        checkpoints: data
            .checkpoints
            .iter()
            .map(|(&height, hash)| ApiCheckpoint { height, hash: uint256_to_hex(hash) })
            .collect(),
    })
}

async fn check_block_handler(
    Path((height, hash_hex)): Path<(i32, String)>,
    State(app_state): State<ApiAppState>,
) -> Result<Json<CheckBlockResponse>, ApiError> {
    if height < 0 {
        return Err(ApiError::BadRequest(format!("Invalid height: {}", height)));
    }
    let hash = uint256_from_hex(&hash_hex).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let checkpoints = &app_state.checkpoints;
    Ok(Json(CheckBlockResponse {
        height,
        hash: uint256_to_hex(&hash),
        has_checkpoint: checkpoints.is_enabled() && checkpoints.active_data().checkpoints.contains_key(&height),
        accepted: checkpoints.check_block(height, &hash),
    }))
}

async fn progress_handler(
    Query(params): Query<ProgressParams>,
    State(app_state): State<ApiAppState>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let sample = match (params.chain_tx, params.time) {
        (Some(chain_tx), Some(time)) => Some(ChainPositionSample { chain_tx, time }),
        (None, None) => None,
        _ => return Err(ApiError::BadRequest("chain_tx and time must be given together".to_string())),
    };
    let sigchecks = params.sigchecks.unwrap_or(true);
    Ok(Json(ProgressResponse {
        network: app_state.selector.network().to_string(),
        sigchecks,
        progress: app_state.checkpoints.guess_verification_progress(sample.as_ref(), sigchecks),
    }))
}

pub fn create_router(app_state: ApiAppState) -> Router {
    // Read-only API; any origin may query it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/v1/network", get(network_handler))
        .route("/api/v1/checkpoints", get(checkpoints_handler))
        .route("/api/v1/checkpoints/:height/:hash", get(check_block_handler))
        .route("/api/v1/progress", get(progress_handler))
        .layer(cors)
        .with_state(app_state)
}
