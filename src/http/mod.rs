//! HTTP surface: the axum router a Pylon instance exposes to validators
//! and operators. Nested router with an auth middleware layer, `TraceLayer`
//! and a permissive `CorsLayer` applied last. Auth is a bearer token
//! compared in constant time against every configured identity
//! (`config::Identity::token`), not a hotkey signature.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::cache::MetagraphCache;
use crate::chain::adapter::{ChainClient, ChainClientError};
use crate::config::Identity;
use crate::domain::{
    BlockNumber, CertificateAlgorithm, Hotkey, Metagraph, NetUid, NeuronCertificate,
    NeuronCertificateKeypair, SubnetNeurons,
};
use crate::jobs::{ApplyWeightsError, ApplyWeightsJob};
use crate::store::SharedWeightStore;

pub struct AppState {
    pub client: Arc<dyn ChainClient>,
    pub cache: Arc<MetagraphCache>,
    pub store: SharedWeightStore,
    pub netuid: NetUid,
    pub hotkey: Hotkey,
    pub identities: Vec<Identity>,
    pub weights_retry_attempts: u32,
    pub weights_retry_delay: std::time::Duration,
}

/// Every failure this surface can produce, collapsed to one response type.
#[derive(Debug, thiserror::Error)]
pub enum PylonError {
    #[error(transparent)]
    Chain(#[from] ChainClientError),
    #[error(transparent)]
    ApplyWeights(#[from] ApplyWeightsError),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
}

impl IntoResponse for PylonError {
    fn into_response(self) -> Response {
        let status = match &self {
            PylonError::Validation(_) => StatusCode::BAD_REQUEST,
            PylonError::Unauthorized => StatusCode::UNAUTHORIZED,
            PylonError::NotFound => StatusCode::NOT_FOUND,
            PylonError::Chain(ChainClientError::SubnetNotFound(_)) => StatusCode::NOT_FOUND,
            PylonError::Chain(ChainClientError::NotOpen) => StatusCode::SERVICE_UNAVAILABLE,
            PylonError::Chain(_) => StatusCode::BAD_GATEWAY,
            PylonError::ApplyWeights(ApplyWeightsError::TempoExpired(_)) => StatusCode::CONFLICT,
            PylonError::ApplyWeights(_) => StatusCode::BAD_GATEWAY,
        };
        (status, self.to_string()).into_response()
    }
}

/// Constant-time bearer-token check against every configured identity.
/// The first layer every request passes through.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: Next,
) -> Result<Response, PylonError> {
    let provided = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(PylonError::Unauthorized)?;

    let authorized = state
        .identities
        .iter()
        .any(|identity| bool::from(identity.token.as_bytes().ct_eq(provided.as_bytes())));

    if !authorized {
        warn!("rejected request with invalid bearer token");
        return Err(PylonError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize, Default)]
struct BlockQuery {
    block: Option<BlockNumber>,
}

async fn get_metagraph(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlockQuery>,
) -> Result<Json<Metagraph>, PylonError> {
    if let Some(block) = query.block {
        if let Some(cached) = state.cache.get(state.netuid, block).await {
            return Ok(Json((*cached).clone()));
        }
    }
    let metagraph = state.client.get_metagraph(state.netuid, query.block).await?;
    state
        .cache
        .insert(state.netuid, metagraph.block.number, metagraph.clone())
        .await;
    Ok(Json(metagraph))
}

async fn get_neurons_at_block(
    State(state): State<Arc<AppState>>,
    Path((netuid, block_number)): Path<(NetUid, BlockNumber)>,
) -> Result<Json<SubnetNeurons>, PylonError> {
    if netuid != state.netuid {
        return Err(PylonError::NotFound);
    }
    let neurons = state.client.get_neurons(state.netuid, Some(block_number)).await?;
    let block = state
        .client
        .get_block(block_number)
        .await?
        .ok_or(PylonError::NotFound)?;
    Ok(Json(SubnetNeurons {
        netuid: state.netuid,
        block,
        neurons,
    }))
}

async fn get_latest_neurons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubnetNeurons>, PylonError> {
    let latest = state.client.get_latest_block().await?;
    let neurons = state.client.get_neurons(state.netuid, Some(latest.number)).await?;
    Ok(Json(SubnetNeurons {
        netuid: state.netuid,
        block: latest,
        neurons,
    }))
}

async fn get_certificates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlockQuery>,
) -> Result<Json<HashMap<Hotkey, NeuronCertificate>>, PylonError> {
    let certs = state.client.get_certificates(state.netuid, query.block).await?;
    Ok(Json(certs))
}

async fn get_certificate(
    State(state): State<Arc<AppState>>,
    Path(hotkey): Path<String>,
    Query(query): Query<BlockQuery>,
) -> Result<Json<NeuronCertificate>, PylonError> {
    let hotkey = Hotkey::from(hotkey);
    state
        .client
        .get_certificate(state.netuid, Some(&hotkey), query.block)
        .await?
        .map(Json)
        .ok_or(PylonError::NotFound)
}

async fn get_own_certificate(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NeuronCertificate>, PylonError> {
    state
        .client
        .get_certificate(state.netuid, Some(&state.hotkey), None)
        .await?
        .map(Json)
        .ok_or(PylonError::NotFound)
}

#[derive(Debug, Deserialize, Default)]
struct GenerateCertificateBody {
    #[serde(default)]
    algorithm: Option<u8>,
}

async fn generate_own_certificate(
    State(state): State<Arc<AppState>>,
    body: Option<Json<GenerateCertificateBody>>,
) -> Result<Json<NeuronCertificateKeypair>, PylonError> {
    let algorithm_code = body
        .and_then(|Json(b)| b.algorithm)
        .unwrap_or(CertificateAlgorithm::ED25519_CODE);
    let algorithm = CertificateAlgorithm::from(algorithm_code);
    if !matches!(algorithm, CertificateAlgorithm::Ed25519) {
        return Err(PylonError::Validation("algorithm must be ED25519".to_string()));
    }
    state
        .client
        .generate_certificate_keypair(state.netuid, algorithm)
        .await?
        .map(Json)
        .ok_or(PylonError::NotFound)
}

#[derive(Debug, Deserialize)]
struct SetWeightsBody {
    weights: HashMap<Hotkey, f64>,
}

async fn set_weights(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetWeightsBody>,
) -> Result<StatusCode, PylonError> {
    if body.weights.is_empty() {
        return Err(PylonError::Validation("weights must not be empty".to_string()));
    }
    let latest = state.client.get_latest_block().await?;
    state.store.set(latest.number, body.weights.clone()).await;

    let job = ApplyWeightsJob::new(
        state.client.clone(),
        state.netuid,
        state.hotkey.clone(),
        state.weights_retry_attempts,
        state.weights_retry_delay,
    );
    job.run(body.weights).await?;
    Ok(StatusCode::ACCEPTED)
}

async fn metrics() -> Result<String, PylonError> {
    crate::metrics::render().map_err(|e| PylonError::Validation(e.to_string()))
}

pub fn router(state: Arc<AppState>) -> Router {
    let authenticated = Router::new()
        .route("/metagraph", get(get_metagraph))
        .route("/subnet/:netuid/neurons/:block", get(get_neurons_at_block))
        .route("/neurons/latest", get(get_latest_neurons))
        .route("/certificates", get(get_certificates))
        .route(
            "/certificates/self",
            get(get_own_certificate).post(generate_own_certificate),
        )
        .route("/certificates/:hotkey", get(get_certificate))
        .route("/subnet/weights", put(set_weights))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/v1", authenticated)
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChainClient;
    use crate::store::InMemoryWeightStore;

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            client: Arc::new(MockChainClient::new()),
            cache: Arc::new(MetagraphCache::default()),
            store: Arc::new(InMemoryWeightStore::default()),
            netuid: 1,
            hotkey: Hotkey::from("5Test"),
            identities: vec![Identity {
                name: "validator".to_string(),
                wallet_name: "default".to_string(),
                hotkey_name: "default".to_string(),
                netuid: 1,
                token: "secret-token".to_string(),
            }],
            weights_retry_attempts: 1,
            weights_retry_delay: std::time::Duration::from_millis(1),
        })
    }

    #[test]
    fn router_builds_without_panicking() {
        let _ = router(state());
    }
}
