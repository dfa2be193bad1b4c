//! Metadata publisher.
//!
//! Uploads the draft image to the pinning service and builds the metadata
//! object around the returned CID. Nothing is cached; a repeated mint
//! re-uploads identical content.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Error;
use crate::session::{NftDraft, NftMetadata, PublishedMetadata};

/// Image uploads can be slow on residential links.
const PIN_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const PIN_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Published pinning service interface: store bytes, get a CID back.
pub trait PinningStore {
    fn pin_image(&self, bytes: Vec<u8>) -> impl Future<Output = Result<String, Error>> + Send;
}

#[derive(Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// HTTP client for a Pinata-style pinning endpoint.
pub struct PinningClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl PinningClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(PIN_REQUEST_TIMEOUT)
            .connect_timeout(PIN_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("pinning client build failed: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl PinningStore for PinningClient {
    async fn pin_image(&self, bytes: Vec<u8>) -> Result<String, Error> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| Error::Config(format!("multipart build failed: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("pinning service unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "pinning service declined upload");
            return Err(Error::Rejection(format!(
                "pinning service HTTP {status}: {body}"
            )));
        }

        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("invalid pinning response: {e}")))?;
        if pinned.ipfs_hash.is_empty() {
            return Err(Error::Transport("pinning service returned an empty CID".into()));
        }
        info!(cid = %pinned.ipfs_hash, "image pinned");
        Ok(pinned.ipfs_hash)
    }
}

/// Validate the draft and publish its image plus metadata object.
///
/// The metadata's image URI always carries the CID returned by this call's
/// upload, never a placeholder.
pub async fn publish_metadata<P: PinningStore>(
    store: &P,
    draft: &NftDraft,
) -> Result<PublishedMetadata, Error> {
    let image = match &draft.image {
        Some(bytes) if !bytes.is_empty() => bytes.clone(),
        _ => {
            return Err(Error::Validation(
                "draft image is required before publishing".into(),
            ))
        }
    };

    let cid = store.pin_image(image).await?;

    let metadata = NftMetadata {
        name: draft.name.clone(),
        description: draft.description.clone(),
        image: format!("ipfs://{cid}/image.png"),
    };

    Ok(PublishedMetadata { cid, metadata })
}
