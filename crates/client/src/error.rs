use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Error body the backend attaches to non-2xx responses.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    /// Field-level validation messages, keyed by field name.
    #[serde(default)]
    pub data: BTreeMap<String, FieldError>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FieldError {
    pub message: String,
}

#[derive(Clone, Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("backend returned {code}")]
    Status { code: u16, body: ErrorBody },
    #[error("{0}")]
    Other(String),
}

const FALLBACK: &str = "Something went wrong. Please try again.";

impl ApiError {
    /// Derive the string a view should display.
    ///
    /// Precedence: first field-level message in the response body, then the
    /// body's top-level message, then the error's own message with two
    /// substring rewrites, then a literal fallback.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Status { body, .. } => {
                if let Some(field) = body.data.values().next() {
                    return field.message.clone();
                }
                if let Some(msg) = &body.message {
                    if !msg.is_empty() {
                        return rewrite(msg);
                    }
                }
                FALLBACK.to_string()
            }
            ApiError::Network(msg) | ApiError::Decode(msg) | ApiError::Other(msg) => {
                if msg.is_empty() {
                    FALLBACK.to_string()
                } else {
                    rewrite(msg)
                }
            }
        }
    }
}

fn rewrite(msg: &str) -> String {
    let lower = msg.to_lowercase();
    if lower.contains("invalid credentials") || lower.contains("failed to authenticate") {
        return "Invalid email or password.".to_string();
    }
    if lower.contains("email") && lower.contains("invalid") {
        return "Please enter a valid email address.".to_string();
    }
    msg.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(body: ErrorBody) -> ApiError {
        ApiError::Status { code: 400, body }
    }

    #[test]
    fn field_message_wins_over_top_level() {
        let mut data = BTreeMap::new();
        data.insert("title".to_string(), FieldError { message: "Title is required.".into() });
        let e = status(ErrorBody { message: Some("Failed to create record.".into()), data });
        assert_eq!(e.display_message(), "Title is required.");
    }

    #[test]
    fn top_level_message_used_when_no_field_errors() {
        let e = status(ErrorBody { message: Some("Record not found.".into()), data: BTreeMap::new() });
        assert_eq!(e.display_message(), "Record not found.");
    }

    #[test]
    fn invalid_credentials_is_rewritten() {
        let e = ApiError::Other("400 invalid credentials".into());
        assert_eq!(e.display_message(), "Invalid email or password.");
    }

    #[test]
    fn invalid_email_is_rewritten() {
        let e = ApiError::Other("The email is invalid.".into());
        assert_eq!(e.display_message(), "Please enter a valid email address.");
    }

    #[test]
    fn plain_messages_pass_through() {
        let e = ApiError::Other("Export failed".into());
        assert_eq!(e.display_message(), "Export failed");
    }

    #[test]
    fn empty_body_falls_back_to_literal() {
        let e = status(ErrorBody::default());
        assert_eq!(e.display_message(), FALLBACK);
    }
}
