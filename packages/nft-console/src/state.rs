//! Application state shared across handlers.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::gateway::ContractGateway;
use crate::pinning::PinningClient;
use crate::session::Session;
use crate::wallet::HttpWalletBridge;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session: RwLock<Session>,
    pub wallet: HttpWalletBridge,
    pub pinning: PinningClient,
    pub gateway: RwLock<Option<Arc<ContractGateway>>>,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(config: Config) -> Result<Self, Error> {
        let wallet = HttpWalletBridge::new(&config.wallet_bridge_url)?;
        let pinning = PinningClient::new(&config.pinning_endpoint, &config.pinning_api_key)?;

        info!(
            bridge = %config.wallet_bridge_url,
            pinning = %config.pinning_endpoint,
            "console state ready"
        );

        Ok(Self {
            wallet,
            pinning,
            config,
            session: RwLock::new(Session::new()),
            gateway: RwLock::new(None),
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        })
    }

    /// Current gateway, or the precondition error for uninitialized use.
    pub async fn require_gateway(&self) -> Result<Arc<ContractGateway>, Error> {
        self.gateway
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::Precondition("contract not initialized".into()))
    }
}
