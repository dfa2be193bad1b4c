//! Wallet session workflow tests.
//!
//! Covers the three agent operations: the availability probe (absence is a
//! plain `false`), the prompting connect, and the passive address read,
//! plus the in-flight trigger guard.

use nft_console::session::{begin_slot, Phase, Slot};
use nft_console::wallet;
use nft_console::Error;

use crate::utils::{empty_session, FakeWallet, SELF_ADDRESS};

#[tokio::test]
async fn probe_absence_is_false_not_error() {
    let session = empty_session();
    let agent = FakeWallet::absent();

    let available = wallet::probe(&session, &agent).await.unwrap();
    assert!(!available);

    let s = session.read().await;
    assert_eq!(s.wallet.available, Some(false));
    assert!(!s.wallet.is_connected());
    assert!(matches!(s.phase(Slot::Wallet), Phase::Success(_)));
}

#[tokio::test]
async fn probe_refused_while_wallet_slot_in_flight() {
    let session = empty_session();
    let agent = FakeWallet::granting(SELF_ADDRESS);

    let _token = begin_slot(&session, Slot::Wallet).await.unwrap();

    let err = wallet::probe(&session, &agent).await.unwrap_err();
    assert!(matches!(err, Error::Busy(_)));
}

#[tokio::test]
async fn connect_success_stores_address() {
    let session = empty_session();
    let agent = FakeWallet::granting(SELF_ADDRESS);

    let address = wallet::connect(&session, &agent).await.unwrap();
    assert_eq!(address, SELF_ADDRESS);
    assert_eq!(agent.call_count(), 1);

    let s = session.read().await;
    assert_eq!(s.wallet.address.as_deref(), Some(SELF_ADDRESS));
    assert!(matches!(s.phase(Slot::Wallet), Phase::Success(_)));
}

#[tokio::test]
async fn connect_rejection_clears_address_and_fails_status() {
    let session = empty_session();
    {
        // A previously granted address must not survive a failed connect.
        let mut s = session.write().await;
        *s = s.with_wallet_address("GADDR_OLD".into());
    }
    let agent = FakeWallet::declining("User declined access");

    let err = wallet::connect(&session, &agent).await.unwrap_err();
    assert!(matches!(err, Error::Rejection(_)));
    assert!(err.to_string().contains("User declined access"));

    let s = session.read().await;
    assert!(!s.wallet.is_connected());
    assert!(matches!(s.phase(Slot::Wallet), Phase::Failed(_)));
}

#[tokio::test]
async fn connect_refused_while_in_flight_issues_no_call() {
    let session = empty_session();
    let agent = FakeWallet::granting(SELF_ADDRESS);

    let _token = begin_slot(&session, Slot::Wallet).await.unwrap();

    let err = wallet::connect(&session, &agent).await.unwrap_err();
    assert!(matches!(err, Error::Busy(_)));
    assert_eq!(agent.call_count(), 0);
}

#[tokio::test]
async fn passive_read_uses_same_failure_contract() {
    let session = empty_session();
    let agent = FakeWallet::declining("no address granted");

    let err = wallet::passive(&session, &agent).await.unwrap_err();
    assert!(matches!(err, Error::Rejection(_)));

    let s = session.read().await;
    assert!(!s.wallet.is_connected());
    assert!(matches!(s.phase(Slot::Wallet), Phase::Failed(_)));
}

#[tokio::test]
async fn passive_success_connects_without_prompt() {
    let session = empty_session();
    let agent = FakeWallet::granting(SELF_ADDRESS);

    let address = wallet::passive(&session, &agent).await.unwrap();
    assert_eq!(address, SELF_ADDRESS);

    let s = session.read().await;
    assert!(s.wallet.is_connected());
}
