//! Response types for the console API.

use serde::Serialize;
use serde_json::Value;

use crate::session::{NftMetadata, Phase, Slot};

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub contract_ready: bool,
    pub wallet_available: bool,
    pub wallet_connected: bool,
    pub uptime_secs: u64,
    pub requests: u64,
}

/// Wallet session snapshot.
#[derive(Serialize)]
pub struct WalletResponse {
    /// `null` until the agent has been probed.
    pub available: Option<bool>,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub success: bool,
    pub address: String,
}

#[derive(Serialize)]
pub struct InitializeResponse {
    pub success: bool,
    pub endpoint_url: String,
    pub contract_address: String,
}

#[derive(Serialize)]
pub struct MintResponse {
    pub success: bool,
    pub token_id: String,
    pub owner: String,
    pub cid: String,
    pub metadata: NftMetadata,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub result: Value,
}

#[derive(Serialize)]
pub struct OwnerResponse {
    pub token_id: String,
    pub owner: String,
}

#[derive(Serialize)]
pub struct MetadataResponse {
    pub token_id: String,
    pub metadata: String,
}

/// Generic invocation response (transfer, burn, collection bootstrap).
#[derive(Serialize)]
pub struct InvokeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub result: Value,
}

/// One entry of the status board.
#[derive(Serialize)]
pub struct StatusEntry {
    pub slot: Slot,
    #[serde(flatten)]
    pub phase: Phase,
}
