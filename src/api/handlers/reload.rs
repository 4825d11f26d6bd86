//! Handler for configuration reload.

use axum::{Json, extract::State};
use serde_json::json;

use crate::api::dto::envelope::Envelope;
use crate::error::AppError;
use crate::state::AppState;

/// Re-reads the configuration and swaps in a new runtime snapshot.
///
/// # Endpoint
///
/// `PATCH /`
///
/// # Errors
///
/// Returns 500 `error` if the config cannot be loaded or the store cannot be
/// connected; the previous configuration stays active.
pub async fn reload_handler(State(state): State<AppState>) -> Result<Json<Envelope>, AppError> {
    state.runtime.reload().await.map_err(|e| {
        AppError::internal("error", json!({ "reload": format!("{:#}", e) }))
    })?;

    Ok(Json(Envelope::success("")))
}
