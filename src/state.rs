// src/state.rs
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::completion::{CompletionClient, GroqClient};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    completions: Option<Arc<dyn CompletionClient>>,
}

impl AppState {
    /// Builds the upstream client from the startup configuration. Without a
    /// credential the state stays unconfigured and chat requests answer 500.
    pub fn new(config: &RelayConfig) -> Self {
        let completions = config.api_key.as_ref().map(|key| {
            Arc::new(GroqClient::new(key.clone(), config.upstream_url.clone()))
                as Arc<dyn CompletionClient>
        });
        Self { completions }
    }

    pub fn with_client(client: Arc<dyn CompletionClient>) -> Self {
        Self { completions: Some(client) }
    }

    pub fn unconfigured() -> Self {
        Self { completions: None }
    }

    pub fn completions(&self) -> Option<&Arc<dyn CompletionClient>> {
        self.completions.as_ref()
    }
}
