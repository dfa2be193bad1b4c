//! Console configuration.

use serde::Deserialize;

/// Configuration for the NFT console.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Contract gateway JSON-RPC endpoint.
    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    /// Deployed NFT contract address.
    #[serde(default = "defaults::contract_id")]
    pub contract_id: String,

    /// Local wallet agent bridge.
    #[serde(default = "defaults::wallet_bridge_url")]
    pub wallet_bridge_url: String,

    /// Pinning service upload endpoint.
    #[serde(default = "defaults::pinning_endpoint")]
    pub pinning_endpoint: String,

    /// Pinning service API key. Uploads are declined upstream without it.
    #[serde(default = "defaults::pinning_api_key")]
    pub pinning_api_key: String,

    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: defaults::rpc_url(),
            contract_id: defaults::contract_id(),
            wallet_bridge_url: defaults::wallet_bridge_url(),
            pinning_endpoint: defaults::pinning_endpoint(),
            pinning_api_key: defaults::pinning_api_key(),
            bind_address: defaults::bind_address(),
        }
    }
}

mod defaults {
    fn network() -> String {
        std::env::var("CONSOLE_NETWORK")
            .or_else(|_| std::env::var("STELLAR_NETWORK"))
            .unwrap_or_else(|_| "testnet".into())
    }

    pub fn rpc_url() -> String {
        if let Ok(url) = std::env::var("CONSOLE_RPC_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        if network().contains("mainnet") {
            "https://mainnet.sorobanrpc.com".into()
        } else {
            "https://soroban-testnet.stellar.org".into()
        }
    }

    pub fn contract_id() -> String {
        std::env::var("CONSOLE_CONTRACT_ID").unwrap_or_default()
    }

    pub fn wallet_bridge_url() -> String {
        "http://127.0.0.1:8765".into()
    }

    pub fn pinning_endpoint() -> String {
        "https://api.pinata.cloud/pinning/pinFileToIPFS".into()
    }

    pub fn pinning_api_key() -> String {
        std::env::var("CONSOLE_PINNING_API_KEY").unwrap_or_default()
    }

    pub fn bind_address() -> String {
        "0.0.0.0:3050".into()
    }
}
