//! Session state shared by the four workflows.
//!
//! The session is an explicit value: workflows read it, validate their
//! preconditions, and produce an updated copy through the pure methods
//! below. Each operation slot carries a request token, so a response that
//! lost the race to a newer trigger of the same slot is dropped instead of
//! overwriting its status.

use std::collections::HashMap;

use crate::error::Error;

/// Wallet agent state for this session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    /// `None` until the agent has been probed at least once.
    pub available: Option<bool>,
    /// Public address granted by the agent. Cleared on connect failure.
    pub address: Option<String>,
}

impl WalletSession {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}

/// Handle to the deployed contract. Immutable once created; initialize
/// again to point the console elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractHandle {
    pub endpoint_url: String,
    pub contract_address: String,
}

/// Draft NFT form fields, consumed by mint.
#[derive(Debug, Clone, Default)]
pub struct NftDraft {
    pub name: String,
    pub description: String,
    pub image: Option<Vec<u8>>,
    pub token_id: String,
}

/// Metadata object pinned alongside the image.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    /// `ipfs://<cid>/image.png`, with the CID of this publish call.
    pub image: String,
}

/// Result of one publish call. Never cached: a repeated mint re-uploads.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PublishedMetadata {
    pub cid: String,
    pub metadata: NftMetadata,
}

/// Status slot categories. One live status per slot, last write wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Wallet,
    Contract,
    Collection,
    Publish,
    Mint,
    Query,
    Transfer,
    Burn,
}

impl Slot {
    pub const ALL: [Slot; 8] = [
        Slot::Wallet,
        Slot::Contract,
        Slot::Collection,
        Slot::Publish,
        Slot::Mint,
        Slot::Query,
        Slot::Transfer,
        Slot::Burn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Slot::Wallet => "wallet",
            Slot::Contract => "contract",
            Slot::Collection => "collection",
            Slot::Publish => "publish",
            Slot::Mint => "mint",
            Slot::Query => "query",
            Slot::Transfer => "transfer",
            Slot::Burn => "burn",
        }
    }
}

/// Identifies one workflow invocation within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    slot: Slot,
    seq: u64,
}

impl RequestToken {
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

/// Lifecycle of one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    InFlight,
    Success(String),
    Failed(String),
}

static IDLE: Phase = Phase::Idle;

#[derive(Debug, Clone, Default)]
struct SlotState {
    seq: u64,
    phase: Phase,
}

/// One console session. Cheap to clone; the HTTP layer keeps the current
/// value in a cell and swaps it for the copies these methods return.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub wallet: WalletSession,
    pub contract: Option<ContractHandle>,
    slots: HashMap<Slot, SlotState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, slot: Slot) -> &Phase {
        self.slots.get(&slot).map_or(&IDLE, |s| &s.phase)
    }

    /// Start a workflow on `slot`. Refused while a previous invocation is
    /// still in flight, so a doubled trigger never issues a second call.
    pub fn begin(&self, slot: Slot) -> Result<(Session, RequestToken), Error> {
        if matches!(self.phase(slot), Phase::InFlight) {
            return Err(Error::Busy(format!(
                "{} operation is already in flight",
                slot.name()
            )));
        }
        let mut next = self.clone();
        let state = next.slots.entry(slot).or_default();
        state.seq += 1;
        state.phase = Phase::InFlight;
        let token = RequestToken {
            slot,
            seq: state.seq,
        };
        Ok((next, token))
    }

    /// Commit a terminal phase for `token`. A stale token (the slot has
    /// since been re-triggered) leaves the session unchanged.
    pub fn settle(&self, token: RequestToken, phase: Phase) -> Session {
        let current = self.slots.get(&token.slot).map(|s| s.seq).unwrap_or(0);
        if current != token.seq {
            return self.clone();
        }
        let mut next = self.clone();
        if let Some(state) = next.slots.get_mut(&token.slot) {
            state.phase = phase;
        }
        next
    }

    /// Connected wallet address, or the precondition error that must
    /// surface before any call goes out.
    pub fn require_wallet(&self) -> Result<&str, Error> {
        self.wallet
            .address
            .as_deref()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| Error::Precondition("no wallet connected".into()))
    }

    pub fn require_contract(&self) -> Result<&ContractHandle, Error> {
        self.contract
            .as_ref()
            .ok_or_else(|| Error::Precondition("contract not initialized".into()))
    }

    pub fn with_wallet_availability(&self, available: bool) -> Session {
        let mut next = self.clone();
        next.wallet.available = Some(available);
        if !available {
            next.wallet.address = None;
        }
        next
    }

    pub fn with_wallet_address(&self, address: String) -> Session {
        let mut next = self.clone();
        next.wallet.available = Some(true);
        next.wallet.address = Some(address);
        next
    }

    pub fn with_wallet_cleared(&self) -> Session {
        let mut next = self.clone();
        next.wallet.address = None;
        next
    }

    pub fn with_contract(&self, handle: ContractHandle) -> Session {
        let mut next = self.clone();
        next.contract = Some(handle);
        next
    }

    /// Snapshot of every slot's phase, for the status endpoint.
    pub fn statuses(&self) -> Vec<(Slot, Phase)> {
        Slot::ALL
            .iter()
            .map(|s| (*s, self.phase(*s).clone()))
            .collect()
    }
}

/// Flip `slot` in flight inside the shared session cell.
pub async fn begin_slot(
    cell: &tokio::sync::RwLock<Session>,
    slot: Slot,
) -> Result<RequestToken, Error> {
    let mut session = cell.write().await;
    let (next, token) = session.begin(slot)?;
    *session = next;
    Ok(token)
}

/// Settle `token` inside the shared session cell.
pub async fn settle_slot(cell: &tokio::sync::RwLock<Session>, token: RequestToken, phase: Phase) {
    let mut session = cell.write().await;
    *session = session.settle(token, phase);
}
