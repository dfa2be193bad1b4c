//! Shared fakes and helpers for the console test suite.
//!
//! Every fake counts its calls, so tests can assert that validation and
//! precondition failures issue zero collaborator requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::{RwLock, Semaphore};

use nft_console::gateway::ContractInvoker;
use nft_console::pinning::PinningStore;
use nft_console::session::{ContractHandle, Session};
use nft_console::wallet::WalletConnector;
use nft_console::Error;

pub const SELF_ADDRESS: &str = "GADDR_SELF";
pub const CONTRACT_ADDRESS: &str = "CCONTRACT";
pub const ENDPOINT_URL: &str = "https://soroban-testnet.stellar.org/";

pub fn contract_handle() -> ContractHandle {
    ContractHandle {
        endpoint_url: ENDPOINT_URL.into(),
        contract_address: CONTRACT_ADDRESS.into(),
    }
}

/// Session cell with wallet and contract ready.
pub fn ready_session() -> RwLock<Session> {
    RwLock::new(
        Session::new()
            .with_wallet_address(SELF_ADDRESS.into())
            .with_contract(contract_handle()),
    )
}

/// Session cell with the contract bound but no wallet.
pub fn contract_only_session() -> RwLock<Session> {
    RwLock::new(Session::new().with_contract(contract_handle()))
}

pub fn empty_session() -> RwLock<Session> {
    RwLock::new(Session::new())
}

// ── Wallet fake ─────────────────────────────────────────────────────

pub struct FakeWallet {
    pub available: bool,
    pub response: Result<String, Error>,
    calls: AtomicUsize,
}

impl FakeWallet {
    pub fn granting(address: &str) -> Self {
        Self {
            available: true,
            response: Ok(address.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn declining(reason: &str) -> Self {
        Self {
            available: true,
            response: Err(Error::Rejection(reason.into())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn absent() -> Self {
        Self {
            available: false,
            response: Err(Error::Transport("wallet bridge unreachable".into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Address requests issued (probe is not counted).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WalletConnector for FakeWallet {
    async fn check_availability(&self) -> bool {
        self.available
    }

    async fn request_address(&self) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }

    async fn passive_address(&self) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

// ── Gateway fakes ───────────────────────────────────────────────────

/// Records every invocation and replies with a fixed response.
pub struct FakeGateway {
    pub response: Result<Value, Error>,
    invocations: Mutex<Vec<(String, Value)>>,
}

impl FakeGateway {
    pub fn returning(value: Value) -> Self {
        Self {
            response: Ok(value),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            response: Err(Error::Rejection(reason.into())),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_transport(reason: &str) -> Self {
        Self {
            response: Err(Error::Transport(reason.into())),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    pub fn invocation(&self, idx: usize) -> (String, Value) {
        self.invocations.lock().unwrap()[idx].clone()
    }
}

impl ContractInvoker for FakeGateway {
    async fn invoke(&self, entry_point: &str, args: Value) -> Result<Value, Error> {
        self.invocations
            .lock()
            .unwrap()
            .push((entry_point.to_string(), args));
        self.response.clone()
    }
}

/// Gateway whose invocation parks until released, for overlap tests.
pub struct BlockingGateway {
    pub gate: Semaphore,
    calls: AtomicUsize,
}

impl BlockingGateway {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContractInvoker for BlockingGateway {
    async fn invoke(&self, _entry_point: &str, _args: Value) -> Result<Value, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| Error::Transport("gate closed".into()))?;
        Ok(Value::Null)
    }
}

// ── Pinning fake ────────────────────────────────────────────────────

pub struct FakePinning {
    pub response: Result<String, Error>,
    calls: AtomicUsize,
}

impl FakePinning {
    pub fn returning(cid: &str) -> Self {
        Self {
            response: Ok(cid.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            response: Err(Error::Rejection(reason.into())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PinningStore for FakePinning {
    async fn pin_image(&self, _bytes: Vec<u8>) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}
