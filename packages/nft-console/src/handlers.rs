//! HTTP request handlers.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::error::Error;
use crate::gateway;
use crate::ops;
use crate::response::{
    ConnectResponse, HealthResponse, InitializeResponse, InvokeResponse, MetadataResponse,
    MintResponse, OwnerResponse, StatusEntry, WalletResponse,
};
use crate::session::NftDraft;
use crate::state::AppState;
use crate::wallet::{self, WalletConnector};

/// Health check with a session summary.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let wallet_available = state.wallet.check_availability().await;
    let (contract_ready, wallet_connected) = {
        let s = state.session.read().await;
        (s.contract.is_some(), s.wallet.is_connected())
    };
    let status = if wallet_available { "ok" } else { "degraded" };
    Json(HealthResponse {
        status,
        contract_ready,
        wallet_available,
        wallet_connected,
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
    })
}

/// Status board: one phase per operation slot.
pub async fn statuses(State(state): State<Arc<AppState>>) -> Json<Vec<StatusEntry>> {
    let s = state.session.read().await;
    Json(
        s.statuses()
            .into_iter()
            .map(|(slot, phase)| StatusEntry { slot, phase })
            .collect(),
    )
}

/// Wallet session snapshot. Read-only: no probe, no prompt.
pub async fn wallet_status(State(state): State<Arc<AppState>>) -> Json<WalletResponse> {
    let s = state.session.read().await;
    Json(WalletResponse {
        available: s.wallet.available,
        connected: s.wallet.is_connected(),
        address: s.wallet.address.clone(),
    })
}

/// Probe the wallet agent. Absence is a valid `false`, not an error.
pub async fn wallet_probe(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WalletResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let available = wallet::probe(&state.session, &state.wallet).await?;
    let s = state.session.read().await;
    Ok(Json(WalletResponse {
        available: Some(available),
        connected: s.wallet.is_connected(),
        address: s.wallet.address.clone(),
    }))
}

/// Connect the wallet, prompting the user through the agent.
pub async fn wallet_connect(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConnectResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let address = wallet::connect(&state.session, &state.wallet).await?;
    Ok(Json(ConnectResponse {
        success: true,
        address,
    }))
}

/// Read an already-granted address without prompting.
pub async fn wallet_address(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConnectResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let address = wallet::passive(&state.session, &state.wallet).await?;
    Ok(Json(ConnectResponse {
        success: true,
        address,
    }))
}

#[derive(Deserialize, Default)]
pub struct InitializeRequest {
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

/// Bind the contract gateway. Body fields override the configuration;
/// send `{}` to use it as-is.
pub async fn contract_initialize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InitializeRequest>,
) -> Result<Json<InitializeResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let endpoint = req
        .endpoint_url
        .unwrap_or_else(|| state.config.rpc_url.clone());
    let address = req
        .contract_address
        .unwrap_or_else(|| state.config.contract_id.clone());

    let built = gateway::initialize(&state.session, &endpoint, &address).await?;
    let handle = built.handle();
    *state.gateway.write().await = Some(Arc::new(built));

    Ok(Json(InitializeResponse {
        success: true,
        endpoint_url: handle.endpoint_url,
        contract_address: handle.contract_address,
    }))
}

#[derive(Deserialize)]
pub struct CollectionRequest {
    pub collection_name: String,
    pub symbol: String,
}

/// Bootstrap the collection with the connected wallet as admin.
pub async fn initialize_collection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CollectionRequest>,
) -> Result<Json<InvokeResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let gateway = state.require_gateway().await?;
    let result = ops::initialize_collection(
        &state.session,
        gateway.as_ref(),
        &req.collection_name,
        &req.symbol,
    )
    .await?;
    Ok(Json(InvokeResponse {
        success: true,
        result,
    }))
}

#[derive(Deserialize)]
pub struct MintRequest {
    pub token_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base64-encoded image payload.
    #[serde(default)]
    pub image_base64: String,
}

/// Publish metadata and mint the token to the connected wallet.
pub async fn mint(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MintRequest>,
) -> Result<Json<MintResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let image = if req.image_base64.is_empty() {
        None
    } else {
        Some(
            BASE64
                .decode(req.image_base64.as_bytes())
                .map_err(|e| Error::Validation(format!("image_base64 is not valid base64: {e}")))?,
        )
    };
    let draft = NftDraft {
        name: req.name,
        description: req.description,
        image,
        token_id: req.token_id,
    };

    let gateway = state.require_gateway().await?;
    let receipt = ops::mint(&state.session, gateway.as_ref(), &state.pinning, draft).await?;

    Ok(Json(MintResponse {
        success: true,
        token_id: receipt.token_id,
        owner: receipt.owner,
        cid: receipt.published.cid,
        metadata: receipt.published.metadata,
        result: receipt.result,
    }))
}

/// Owner lookup.
pub async fn get_owner(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<String>,
) -> Result<Json<OwnerResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let gateway = state.require_gateway().await?;
    let owner = ops::get_owner(&state.session, gateway.as_ref(), &token_id).await?;
    Ok(Json(OwnerResponse { token_id, owner }))
}

/// Metadata reference lookup.
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<String>,
) -> Result<Json<MetadataResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let gateway = state.require_gateway().await?;
    let metadata = ops::get_metadata(&state.session, gateway.as_ref(), &token_id).await?;
    Ok(Json(MetadataResponse { token_id, metadata }))
}

#[derive(Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
}

/// Transfer the token; `from` must match the connected wallet.
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<String>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<InvokeResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let gateway = state.require_gateway().await?;
    let result =
        ops::transfer(&state.session, gateway.as_ref(), &token_id, &req.from, &req.to).await?;
    Ok(Json(InvokeResponse {
        success: true,
        result,
    }))
}

#[derive(Deserialize)]
pub struct BurnRequest {
    pub caller: String,
}

/// Burn the token; `caller` must match the connected wallet.
pub async fn burn(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<String>,
    Json(req): Json<BurnRequest>,
) -> Result<Json<InvokeResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let gateway = state.require_gateway().await?;
    let result = ops::burn(&state.session, gateway.as_ref(), &token_id, &req.caller).await?;
    Ok(Json(InvokeResponse {
        success: true,
        result,
    }))
}
