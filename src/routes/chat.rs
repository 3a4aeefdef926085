use axum::{Json, body::Bytes, extract::State};
use tracing::info;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::relay::relay_message,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let request = ChatRequest::from_body(&body)?;
    let message = request.trimmed_message().ok_or(AppError::EmptyMessage)?;

    let client = state.completions().ok_or(AppError::MissingCredential)?;

    info!("user: {}", message);
    let reply = relay_message(client.as_ref(), message).await?;
    info!("assistant: {}", reply);

    Ok(Json(ChatResponse { reply }))
}
