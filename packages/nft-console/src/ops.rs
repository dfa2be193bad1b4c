//! Token operations.
//!
//! Each operation validates its inputs and checks the session
//! preconditions before any network call, flips its status slot, performs
//! the contract invocation, and settles the slot with the outcome. The two
//! queries skip the wallet requirement.

use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::Error;
use crate::gateway::ContractInvoker;
use crate::pinning::{publish_metadata, PinningStore};
use crate::session::{begin_slot, settle_slot, NftDraft, Phase, PublishedMetadata, Session, Slot};

/// Contract entry points, as deployed.
mod entry {
    pub const INITIALIZE: &str = "initialize_contract";
    pub const MINT: &str = "mint_nft";
    pub const GET_OWNER: &str = "get_owner";
    pub const GET_METADATA: &str = "get_metadata";
    pub const TRANSFER: &str = "transfer_nft";
    pub const BURN: &str = "burn_nft";
}

/// Outcome of a successful mint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MintReceipt {
    pub token_id: String,
    pub owner: String,
    pub published: PublishedMetadata,
    pub result: Value,
}

fn require_field(value: &str, what: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Mint: publish metadata first, then invoke the contract with the fresh
/// CID. The connected wallet address is the owner.
pub async fn mint<C, P>(
    session: &RwLock<Session>,
    gateway: &C,
    store: &P,
    draft: NftDraft,
) -> Result<MintReceipt, Error>
where
    C: ContractInvoker,
    P: PinningStore,
{
    require_field(&draft.token_id, "token_id")?;
    if !matches!(&draft.image, Some(bytes) if !bytes.is_empty()) {
        return Err(Error::Validation(
            "draft image is required before publishing".into(),
        ));
    }
    let owner = {
        let s = session.read().await;
        s.require_contract()?;
        s.require_wallet()?.to_string()
    };

    let mint_token = begin_slot(session, Slot::Mint).await?;

    // Publish phase, tracked on its own slot.
    let publish_token = match begin_slot(session, Slot::Publish).await {
        Ok(token) => token,
        Err(e) => {
            settle_slot(session, mint_token, Phase::Failed(e.to_string())).await;
            return Err(e);
        }
    };
    let published = match publish_metadata(store, &draft).await {
        Ok(published) => {
            settle_slot(
                session,
                publish_token,
                Phase::Success(format!("pinned {}", published.cid)),
            )
            .await;
            published
        }
        Err(e) => {
            settle_slot(session, publish_token, Phase::Failed(e.to_string())).await;
            settle_slot(session, mint_token, Phase::Failed(e.to_string())).await;
            return Err(e);
        }
    };

    // The argument map carries the CID returned by the publish call above,
    // never a placeholder.
    let args = json!({
        "owner": owner,
        "token_id": draft.token_id,
        "metadata_ipfs_hash": published.cid,
    });

    match gateway.invoke(entry::MINT, args).await {
        Ok(result) => {
            info!(token_id = %draft.token_id, owner = %owner, cid = %published.cid, "NFT minted");
            settle_slot(
                session,
                mint_token,
                Phase::Success(format!("minted {}", draft.token_id)),
            )
            .await;
            Ok(MintReceipt {
                token_id: draft.token_id,
                owner,
                published,
                result,
            })
        }
        Err(e) => {
            warn!(token_id = %draft.token_id, error = %e, "mint failed");
            settle_slot(session, mint_token, Phase::Failed(e.to_string())).await;
            Err(e)
        }
    }
}

/// Owner lookup. Read-only: requires the contract, not the wallet.
pub async fn get_owner<C: ContractInvoker>(
    session: &RwLock<Session>,
    gateway: &C,
    token_id: &str,
) -> Result<String, Error> {
    query_string(session, gateway, entry::GET_OWNER, token_id, "owner").await
}

/// Metadata lookup. Read-only: requires the contract, not the wallet.
pub async fn get_metadata<C: ContractInvoker>(
    session: &RwLock<Session>,
    gateway: &C,
    token_id: &str,
) -> Result<String, Error> {
    query_string(session, gateway, entry::GET_METADATA, token_id, "metadata").await
}

async fn query_string<C: ContractInvoker>(
    session: &RwLock<Session>,
    gateway: &C,
    entry_point: &'static str,
    token_id: &str,
    what: &str,
) -> Result<String, Error> {
    require_field(token_id, "token_id")?;
    {
        session.read().await.require_contract()?;
    }

    let token = begin_slot(session, Slot::Query).await?;

    let outcome = gateway
        .invoke(entry_point, json!({ "token_id": token_id }))
        .await
        .and_then(|value| match value {
            Value::Null => Err(Error::NotFound(format!(
                "token {token_id} has no {what} on record"
            ))),
            Value::String(text) => Ok(text),
            _ => Err(Error::Transport(format!(
                "unexpected {what} payload from gateway"
            ))),
        });

    match &outcome {
        Ok(_) => {
            settle_slot(session, token, Phase::Success(format!("{what} of {token_id}"))).await
        }
        Err(e) => settle_slot(session, token, Phase::Failed(e.to_string())).await,
    }
    outcome
}

/// Transfer: `from` must be the connected wallet address. The contract is
/// still the final authority on ownership.
pub async fn transfer<C: ContractInvoker>(
    session: &RwLock<Session>,
    gateway: &C,
    token_id: &str,
    from: &str,
    to: &str,
) -> Result<Value, Error> {
    require_field(token_id, "token_id")?;
    require_field(from, "from")?;
    require_field(to, "to")?;
    {
        let s = session.read().await;
        s.require_contract()?;
        let connected = s.require_wallet()?;
        if from != connected {
            return Err(Error::Precondition(
                "'from' does not match the connected wallet address".into(),
            ));
        }
    }

    let token = begin_slot(session, Slot::Transfer).await?;

    let outcome = gateway
        .invoke(
            entry::TRANSFER,
            json!({ "token_id": token_id, "from": from, "to": to }),
        )
        .await;

    match &outcome {
        Ok(_) => {
            info!(token_id, from, to, "NFT transferred");
            settle_slot(
                session,
                token,
                Phase::Success(format!("transferred {token_id} to {to}")),
            )
            .await;
        }
        Err(e) => {
            warn!(token_id, error = %e, "transfer failed");
            settle_slot(session, token, Phase::Failed(e.to_string())).await;
        }
    }
    outcome
}

/// Burn: `caller` must be the connected wallet address.
pub async fn burn<C: ContractInvoker>(
    session: &RwLock<Session>,
    gateway: &C,
    token_id: &str,
    caller: &str,
) -> Result<Value, Error> {
    require_field(token_id, "token_id")?;
    require_field(caller, "caller")?;
    {
        let s = session.read().await;
        s.require_contract()?;
        let connected = s.require_wallet()?;
        if caller != connected {
            return Err(Error::Precondition(
                "'caller' does not match the connected wallet address".into(),
            ));
        }
    }

    let token = begin_slot(session, Slot::Burn).await?;

    let outcome = gateway
        .invoke(entry::BURN, json!({ "token_id": token_id, "caller": caller }))
        .await;

    match &outcome {
        Ok(_) => {
            info!(token_id, caller, "NFT burned");
            settle_slot(session, token, Phase::Success(format!("burned {token_id}"))).await;
        }
        Err(e) => {
            warn!(token_id, error = %e, "burn failed");
            settle_slot(session, token, Phase::Failed(e.to_string())).await;
        }
    }
    outcome
}

/// Collection bootstrap: the contract's `initialize_contract` entry point
/// with the connected wallet as admin.
pub async fn initialize_collection<C: ContractInvoker>(
    session: &RwLock<Session>,
    gateway: &C,
    collection_name: &str,
    symbol: &str,
) -> Result<Value, Error> {
    require_field(collection_name, "collection_name")?;
    require_field(symbol, "symbol")?;
    let admin = {
        let s = session.read().await;
        s.require_contract()?;
        s.require_wallet()?.to_string()
    };

    let token = begin_slot(session, Slot::Collection).await?;

    let outcome = gateway
        .invoke(
            entry::INITIALIZE,
            json!({ "admin": admin, "collection_name": collection_name, "symbol": symbol }),
        )
        .await;

    match &outcome {
        Ok(_) => {
            info!(collection_name, symbol, "collection initialized");
            settle_slot(
                session,
                token,
                Phase::Success(format!("collection {collection_name} ready")),
            )
            .await;
        }
        Err(e) => {
            warn!(error = %e, "collection initialize failed");
            settle_slot(session, token, Phase::Failed(e.to_string())).await;
        }
    }
    outcome
}
