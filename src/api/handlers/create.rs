//! Handler for link creation.

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::create_link::CreateLinkForm;
use crate::api::dto::envelope::Envelope;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /` (`application/x-www-form-urlencoded`)
///
/// # Form Fields
///
/// - `key` - credential from the configured allow-list
/// - `link` - target URL
/// - `validity` - optional Unix timestamp, must be in the future
///
/// # Response
///
/// ```json
/// { "ok": true, "message": "successful", "content": "Ab3xYz" }
/// ```
///
/// # Errors
///
/// - 400 `bad field(s)` - missing field, unreadable form, bad `validity`
/// - 403 `forbidden` - key not on the allow-list
/// - 500 `error` - store failure
pub async fn create_handler(
    State(state): State<AppState>,
    form: Result<Form<CreateLinkForm>, FormRejection>,
) -> Result<Json<Envelope>, AppError> {
    let Form(form) = form.map_err(|rejection| {
        AppError::bad_request("bad field(s)", json!({ "reason": rejection.body_text() }))
    })?;
    form.validate()?;

    let token = state
        .current()
        .links
        .create(&form.key, &form.link, form.validity())
        .await?;

    Ok(Json(Envelope::success(token)))
}
