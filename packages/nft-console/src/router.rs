//! HTTP router setup.

use crate::handlers;
use crate::middleware::{api_key_auth, inject_request_id};
use crate::state::AppState;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/status", get(handlers::statuses))
        .route("/wallet", get(handlers::wallet_status))
        .route("/wallet/probe", post(handlers::wallet_probe))
        .route("/wallet/connect", post(handlers::wallet_connect))
        .route("/wallet/address", post(handlers::wallet_address))
        .route("/contract/initialize", post(handlers::contract_initialize))
        .route("/collection/initialize", post(handlers::initialize_collection))
        .route("/nfts", post(handlers::mint))
        .route("/nfts/{token_id}/owner", get(handlers::get_owner))
        .route("/nfts/{token_id}/metadata", get(handlers::get_metadata))
        .route("/nfts/{token_id}/transfer", post(handlers::transfer))
        .route("/nfts/{token_id}/burn", post(handlers::burn))
        .route_layer(from_fn(api_key_auth));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .layer(from_fn(inject_request_id))
        .layer(TraceLayer::new_for_http())
        // The expected caller is a browser UI on another origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
