//! Form payload for link creation.

use serde::Deserialize;
use validator::Validate;

/// `POST /` form fields.
///
/// Every field defaults to the empty string so that a missing field is
/// reported as `400 bad field(s)` rather than as a form rejection.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateLinkForm {
    /// Caller credential, checked against the allow-list.
    #[validate(length(min = 1))]
    pub key: String,

    /// Redirect target.
    #[validate(length(min = 1))]
    pub link: String,

    /// Optional Unix timestamp after which the link expires. Empty means never.
    pub validity: String,
}

impl CreateLinkForm {
    /// Returns `validity` as an option, treating the empty string as absent.
    pub fn validity(&self) -> Option<&str> {
        Some(self.validity.as_str()).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_fail_validation() {
        let form = CreateLinkForm {
            key: String::new(),
            link: "https://example.com".to_string(),
            validity: String::new(),
        };

        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("key"));
    }

    #[test]
    fn test_empty_validity_is_absent() {
        let form = CreateLinkForm::default();
        assert!(form.validity().is_none());

        let form = CreateLinkForm {
            validity: "1900000000".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validity(), Some("1900000000"));
    }
}
