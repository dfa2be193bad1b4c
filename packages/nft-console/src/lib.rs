//! # NFT Console
//!
//! A headless minting console for Soroban NFT contracts. Four workflows
//! share one session: wallet connection through a local agent bridge,
//! contract session setup, metadata publishing to a pinning service, and
//! token operations (mint, owner/metadata lookup, transfer, burn).
//!
//! ## Quick Start
//! ```bash
//! CONSOLE_CONTRACT_ID=C... cargo run --bin nft-console
//! ```
//!
//! ## Endpoints
//! - `GET /health` - liveness with session summary
//! - `POST /wallet/connect` - prompt the wallet agent for an address
//! - `POST /contract/initialize` - bind the contract gateway
//! - `POST /nfts` - publish metadata and mint

pub mod config;
mod error;
pub mod gateway;
mod handlers;
mod middleware;
pub mod ops;
pub mod pinning;
mod response;
mod router;
pub mod session;
mod state;
pub mod wallet;

pub use config::Config;
pub use error::Error;
pub use router::create as create_router;
pub use state::AppState;
