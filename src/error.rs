// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::message::ChatResponse;

pub const EMPTY_MESSAGE_REPLY: &str = "Tu n'as rien écrit !";
pub const MISSING_CREDENTIAL_REPLY: &str = "Erreur de configuration serveur.";
pub const INTERNAL_REPLY: &str = "Erreur technique.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("request carried no message")]
    EmptyMessage,
    #[error("upstream credential is not configured")]
    MissingCredential,
    #[error("upstream answered {status}: {body}")]
    Upstream { status: StatusCode, body: String },
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EmptyMessage => StatusCode::BAD_REQUEST,
            AppError::MissingCredential | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            // Passed through as-is, whatever the upstream meant by it.
            AppError::Upstream { status, .. } => *status,
        }
    }

    /// The caller-facing reply carried in the JSON body.
    pub fn reply(&self) -> String {
        match self {
            AppError::EmptyMessage => EMPTY_MESSAGE_REPLY.to_string(),
            AppError::MissingCredential => MISSING_CREDENTIAL_REPLY.to_string(),
            AppError::Upstream { status, .. } => {
                format!("Désolé, l'IA est fatiguée ({}).", status.as_u16())
            }
            AppError::Internal(_) => INTERNAL_REPLY.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::EmptyMessage => warn!("rejected chat request without a message"),
            AppError::MissingCredential => error!("upstream credential missing, cannot relay"),
            AppError::Upstream { status, body } => error!(%status, %body, "upstream error"),
            AppError::Internal(msg) => error!("internal error: {}", msg),
        }

        (self.status(), Json(ChatResponse::new(self.reply()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses() {
        assert_eq!(AppError::EmptyMessage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::MissingCredential.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let upstream = AppError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "{}".into(),
        };
        assert_eq!(upstream.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn upstream_reply_embeds_status_code() {
        let err = AppError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        };
        assert_eq!(err.reply(), "Désolé, l'IA est fatiguée (503).");
    }

    #[test]
    fn internal_reply_hides_details() {
        let err = AppError::Internal("connection reset by peer".into());
        assert_eq!(err.reply(), INTERNAL_REPLY);
    }
}
