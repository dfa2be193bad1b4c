//! Wallet agent bridge.
//!
//! The wallet agent (a Freighter-style extension host) owns the user's
//! keys; the console only ever asks it for an address. The agent's
//! published interface has three operations: a capability probe, an
//! address request that may prompt the user, and a passive read of an
//! already-granted address.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Error;
use crate::session::{begin_slot, Phase, RequestToken, Session, Slot};

/// Prompt requests wait on a human.
const BRIDGE_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const BRIDGE_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Published wallet agent interface.
pub trait WalletConnector {
    /// Probe the agent. An unreachable or missing agent is `false`, not an
    /// error.
    fn check_availability(&self) -> impl Future<Output = bool> + Send;

    /// Ask the agent for the user's address, prompting if needed.
    fn request_address(&self) -> impl Future<Output = Result<String, Error>> + Send;

    /// Read an already-granted address without prompting.
    fn passive_address(&self) -> impl Future<Output = Result<String, Error>> + Send;
}

#[derive(Deserialize)]
struct AvailableBody {
    available: bool,
}

#[derive(Deserialize)]
struct AddressBody {
    address: Option<String>,
    error: Option<String>,
}

/// HTTP bridge to the local wallet agent.
pub struct HttpWalletBridge {
    http: reqwest::Client,
    base_url: String,
}

impl HttpWalletBridge {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(BRIDGE_REQUEST_TIMEOUT)
            .connect_timeout(BRIDGE_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("wallet bridge client build failed: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn address_from(&self, response: reqwest::Response, what: &str) -> Result<String, Error> {
        let status = response.status();
        let body: AddressBody = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("{what}: invalid bridge response: {e}")))?;
        if status.is_success() {
            match body.address {
                Some(address) if !address.is_empty() => Ok(address),
                _ => Err(Error::Transport(format!(
                    "{what}: bridge returned no address"
                ))),
            }
        } else {
            Err(Error::Rejection(body.error.unwrap_or_else(|| {
                format!("{what}: agent declined (HTTP {status})")
            })))
        }
    }
}

impl WalletConnector for HttpWalletBridge {
    async fn check_availability(&self) -> bool {
        let url = format!("{}/available", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response
                .json::<AvailableBody>()
                .await
                .map(|b| b.available)
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn request_address(&self) -> Result<String, Error> {
        let url = format!("{}/access", self.base_url);
        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("wallet bridge unreachable: {e}")))?;
        self.address_from(response, "request_address").await
    }

    async fn passive_address(&self) -> Result<String, Error> {
        let url = format!("{}/address", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("wallet bridge unreachable: {e}")))?;
        self.address_from(response, "passive_address").await
    }
}

/// Probe the agent and record the result. Absence is a valid `false`, so
/// the only error here is a refused duplicate trigger.
pub async fn probe<W: WalletConnector>(
    session: &tokio::sync::RwLock<Session>,
    wallet: &W,
) -> Result<bool, Error> {
    let token = begin_slot(session, Slot::Wallet).await?;
    let available = wallet.check_availability().await;

    let mut s = session.write().await;
    let detail = if available { "agent available" } else { "agent absent" };
    *s = s
        .with_wallet_availability(available)
        .settle(token, Phase::Success(detail.into()));
    info!(available, "wallet availability probed");
    Ok(available)
}

/// Connect workflow: prompt the agent for the user's address.
pub async fn connect<W: WalletConnector>(
    session: &tokio::sync::RwLock<Session>,
    wallet: &W,
) -> Result<String, Error> {
    let token = begin_slot(session, Slot::Wallet).await?;
    let outcome = wallet.request_address().await;
    settle_address(session, token, &outcome).await;
    outcome
}

/// Passive workflow: read an already-granted address, no prompt.
pub async fn passive<W: WalletConnector>(
    session: &tokio::sync::RwLock<Session>,
    wallet: &W,
) -> Result<String, Error> {
    let token = begin_slot(session, Slot::Wallet).await?;
    let outcome = wallet.passive_address().await;
    settle_address(session, token, &outcome).await;
    outcome
}

/// Commit an address outcome: success stores the address, failure clears
/// it. Both settle the wallet slot under the same token guard.
async fn settle_address(
    session: &tokio::sync::RwLock<Session>,
    token: RequestToken,
    outcome: &Result<String, Error>,
) {
    let mut s = session.write().await;
    match outcome {
        Ok(address) => {
            *s = s
                .with_wallet_address(address.clone())
                .settle(token, Phase::Success(format!("connected {address}")));
            info!(address = %address, "wallet connected");
        }
        Err(e) => {
            *s = s
                .with_wallet_cleared()
                .settle(token, Phase::Failed(e.to_string()));
            warn!(error = %e, "wallet address request failed");
        }
    }
}
