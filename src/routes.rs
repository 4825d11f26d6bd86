//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET   /`         - Redirect to the configured index URL
//! - `GET   /{token}`  - Short link redirect
//! - `POST  /`         - Create a short link (form body, key required)
//! - `PATCH /`         - Reload configuration
//! - anything else     - 404 with the not-found page
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{
    create_handler, index_handler, not_found_handler, redirect_handler, reload_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route(
            "/",
            get(index_handler).post(create_handler).patch(reload_handler),
        )
        .route("/{token}", get(redirect_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
