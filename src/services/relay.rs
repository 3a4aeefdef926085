// src/services/relay.rs
use super::completion::{CompletionClient, CompletionRequest};
use crate::error::AppError;

pub const FALLBACK_REPLY: &str = "L'IA n'a pas trouvé de réponse.";

/// Forwards one user message upstream and returns the reply text.
///
/// The message is expected to be trimmed and non-empty already.
pub async fn relay_message(
    client: &dyn CompletionClient,
    message: &str,
) -> Result<String, AppError> {
    let request = CompletionRequest::for_message(message);
    let response = client.complete(&request).await?;

    Ok(response
        .first_text()
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
}
