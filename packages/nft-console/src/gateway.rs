//! Contract gateway.
//!
//! A handle to the deployed contract behind a JSON-RPC endpoint. The
//! gateway exposes named entry-point invocation with a JSON argument
//! payload; transaction assembly, signing, and fees live behind the
//! endpoint.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Error;
use crate::session::{begin_slot, ContractHandle, Phase, Session, Slot};

const GATEWAY_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const GATEWAY_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Named entry-point invocation against the bound contract.
pub trait ContractInvoker {
    fn invoke(
        &self,
        entry_point: &str,
        args: Value,
    ) -> impl Future<Output = Result<Value, Error>> + Send;
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC client bound to one {endpoint, contract address} pair.
#[derive(Debug)]
pub struct ContractGateway {
    http: reqwest::Client,
    endpoint: Url,
    contract_address: String,
    next_id: AtomicU64,
}

impl ContractGateway {
    /// Build a handle. The only failures here are malformed inputs;
    /// endpoint reachability is discovered by the first invocation.
    pub fn new(endpoint_url: &str, contract_address: &str) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint_url)
            .map_err(|e| Error::Validation(format!("invalid endpoint URL: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "unsupported endpoint scheme: {}",
                endpoint.scheme()
            )));
        }
        let contract_address = contract_address.trim();
        if contract_address.is_empty() {
            return Err(Error::Validation("contract address must not be empty".into()));
        }
        if contract_address.contains(char::is_whitespace) {
            return Err(Error::Validation(
                "contract address must not contain whitespace".into(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(GATEWAY_REQUEST_TIMEOUT)
            .connect_timeout(GATEWAY_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("gateway client build failed: {e}")))?;
        Ok(Self {
            http,
            endpoint,
            contract_address: contract_address.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn handle(&self) -> ContractHandle {
        ContractHandle {
            endpoint_url: self.endpoint.to_string(),
            contract_address: self.contract_address.clone(),
        }
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }
}

impl ContractInvoker for ContractGateway {
    async fn invoke(&self, entry_point: &str, args: Value) -> Result<Value, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "invoke",
            "params": {
                "contract": self.contract_address,
                "function": entry_point,
                "args": args,
            }
        });
        debug!(entry_point, id, "invoking contract entry point");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("contract endpoint unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("contract endpoint HTTP {status}")));
        }

        let parsed: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("invalid gateway response: {e}")))?;

        if let Some(err) = parsed.error {
            warn!(entry_point, code = err.code, error = %err.message, "contract rejected invocation");
            return Err(Error::Rejection(err.message));
        }
        Ok(parsed.result.unwrap_or(Value::Null))
    }
}

/// Initialize workflow: a one-shot handshake, not a network probe. On
/// failure the session's contract handle stays as it was; no retry, the
/// caller re-triggers.
pub async fn initialize(
    session: &tokio::sync::RwLock<Session>,
    endpoint_url: &str,
    contract_address: &str,
) -> Result<ContractGateway, Error> {
    let token = begin_slot(session, Slot::Contract).await?;

    let built = ContractGateway::new(endpoint_url, contract_address);

    let mut s = session.write().await;
    match &built {
        Ok(gateway) => {
            let handle = gateway.handle();
            info!(endpoint = %handle.endpoint_url, contract = %handle.contract_address, "contract session ready");
            *s = s
                .with_contract(handle)
                .settle(token, Phase::Success("contract session ready".into()));
        }
        Err(e) => {
            warn!(error = %e, "contract initialize failed");
            *s = s.settle(token, Phase::Failed(e.to_string()));
        }
    }
    built
}
