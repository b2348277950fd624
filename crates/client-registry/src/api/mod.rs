//! HTTP API for the registration service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use phonenumber::country;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::notify::Notifier;
use crate::store::ClientStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Client store
    pub store: Arc<dyn ClientStore>,
    /// Admin notification channel
    pub notifier: Arc<dyn Notifier>,
    /// Region every registered number must belong to
    pub default_region: country::Id,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        store: Arc<dyn ClientStore>,
        notifier: Arc<dyn Notifier>,
        default_region: country::Id,
    ) -> Self {
        Self {
            store,
            notifier,
            default_region,
        }
    }
}

/// Create the API router.
///
/// `webhook_path` is where the Telegram webhook posts updates. When
/// `frontend_origin` is set, CORS is restricted to that origin.
pub fn create_router(state: AppState, webhook_path: &str, frontend_origin: Option<&str>) -> Router {
    let cors = match frontend_origin.and_then(|origin| origin.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/clients/", post(handlers::create_client))
        .route(webhook_path, post(handlers::bot_webhook))
        .layer(cors)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
