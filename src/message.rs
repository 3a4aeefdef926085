// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

#[derive(Debug, Default)]
pub struct ChatRequest {
    pub message: Option<String>,
}

impl ChatRequest {
    /// Decodes a raw request body.
    ///
    /// A body that is not JSON, or has no `message`, yields an empty request.
    /// A `message` that is present but not a string is an internal error.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Ok(Self::default());
        };

        match value.get("message") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::String(message)) => Ok(Self {
                message: Some(message.clone()),
            }),
            Some(other) => Err(AppError::Internal(format!(
                "message is not a string: {}",
                other
            ))),
        }
    }

    /// The message with surrounding whitespace removed, or `None` when nothing is left.
    pub fn trimmed_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

impl ChatResponse {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_message() {
        let req = ChatRequest::from_body(br#"{"message": "  Bonjour \n"}"#).unwrap();
        assert_eq!(req.trimmed_message(), Some("Bonjour"));
    }

    #[test]
    fn blank_or_missing_message_is_none() {
        for body in [
            r#"{"message": "   "}"#,
            r#"{"other": "x"}"#,
            r#"{"message": null}"#,
            "not json",
            "null",
            "[1, 2]",
            "",
        ] {
            let req = ChatRequest::from_body(body.as_bytes()).unwrap();
            assert_eq!(req.trimmed_message(), None);
        }
    }

    #[test]
    fn non_string_message_is_internal() {
        for body in [r#"{"message": 42}"#, r#"{"message": {"text": "hi"}}"#] {
            let err = ChatRequest::from_body(body.as_bytes()).unwrap_err();
            assert!(matches!(err, AppError::Internal(_)));
        }
    }
}
