//! Metadata publisher tests.
//!
//! The publisher must never fabricate a CID: the metadata image URI always
//! carries the CID returned by the upload for that same call, and a draft
//! without an image fails before any HTTP request.

use nft_console::pinning::publish_metadata;
use nft_console::session::NftDraft;
use nft_console::Error;

use crate::utils::FakePinning;

fn draft_with_image(image: Option<Vec<u8>>) -> NftDraft {
    NftDraft {
        name: "Art1".into(),
        description: "desc".into(),
        image,
        token_id: "7".into(),
    }
}

#[tokio::test]
async fn publish_without_image_is_validation_with_zero_calls() {
    let store = FakePinning::returning("QmABC123");

    let err = publish_metadata(&store, &draft_with_image(None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn publish_with_empty_blob_is_validation_with_zero_calls() {
    let store = FakePinning::returning("QmABC123");

    let err = publish_metadata(&store, &draft_with_image(Some(Vec::new())))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn publish_builds_uri_from_returned_cid() {
    let store = FakePinning::returning("QmABC123");

    let published = publish_metadata(&store, &draft_with_image(Some(vec![7u8; 512])))
        .await
        .unwrap();

    assert_eq!(store.call_count(), 1);
    assert_eq!(published.cid, "QmABC123");
    assert_eq!(published.metadata.image, "ipfs://QmABC123/image.png");
    assert_eq!(published.metadata.name, "Art1");
    assert_eq!(published.metadata.description, "desc");
}

#[tokio::test]
async fn publish_upload_rejection_carries_cause() {
    let store = FakePinning::rejecting("pinning service HTTP 401: bad key");

    let err = publish_metadata(&store, &draft_with_image(Some(vec![1u8; 16])))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Rejection(_)));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn repeated_publish_reuploads_identical_content() {
    let store = FakePinning::returning("QmSAME");
    let draft = draft_with_image(Some(vec![9u8; 64]));

    publish_metadata(&store, &draft).await.unwrap();
    publish_metadata(&store, &draft).await.unwrap();

    assert_eq!(store.call_count(), 2);
}
