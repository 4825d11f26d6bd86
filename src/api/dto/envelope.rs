//! JSON envelope shared by every JSON endpoint.

use serde::{Deserialize, Serialize};

/// Response body `{ "ok": bool, "message": string, "content": string }`.
///
/// `content` carries the payload on success (e.g. the new token) and is
/// empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    pub message: String,
    pub content: String,
}

impl Envelope {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: "successful".to_string(),
            content: content.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            content: String::new(),
        }
    }
}
