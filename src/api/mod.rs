//! HTTP boundary: routing, request validation and the error envelope.

pub mod currencies;
pub mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::service::CurrencyService;

/// Shared state handed to request handlers.
pub struct AppState {
    pub currency_service: CurrencyService,
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .merge(currencies::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
