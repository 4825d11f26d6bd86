//! Handlers for token redirects and the index route.

use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use crate::state::AppState;

/// `302 Found` pointing at `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// `404 Not Found` carrying the configured HTML page.
pub(crate) fn not_found_page(page: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(page.to_string())).into_response()
}

/// Redirects a short token to its target.
///
/// # Endpoint
///
/// `GET /{token}`
///
/// # Responses
///
/// - `302 Found` with `Location` set to the stored target
/// - `404 Not Found` with the not-found page for malformed tokens, unknown
///   or expired links
///
/// A path segment that does not percent-decode to UTF-8 cannot be a token
/// and is answered like any other malformed token. Store failures are logged
/// and answered with the not-found page as well; the visitor cannot act on them.
pub async fn redirect_handler(
    State(state): State<AppState>,
    token: Result<Path<String>, PathRejection>,
) -> Response {
    let runtime = state.current();

    let token = match token {
        Ok(Path(token)) => token,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Unreadable token path");
            return not_found_page(&runtime.not_found_page);
        }
    };

    match runtime.links.resolve(&token).await {
        Ok(target) => found(&target),
        Err(err) if err.is_not_found() => not_found_page(&runtime.not_found_page),
        Err(err) => {
            tracing::error!(token = %token, details = %err.details(), "Link lookup failed");
            not_found_page(&runtime.not_found_page)
        }
    }
}

/// `GET /`: redirects to the configured index URL, or serves the not-found page.
pub async fn index_handler(State(state): State<AppState>) -> Response {
    let runtime = state.current();

    match runtime.index_url.as_deref() {
        Some(index_url) => found(index_url),
        None => not_found_page(&runtime.not_found_page),
    }
}

/// Any path no route matches.
pub async fn not_found_handler(State(state): State<AppState>) -> Response {
    not_found_page(&state.current().not_found_page)
}
