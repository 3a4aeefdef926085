use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::events::{EventBus, UiEvent};

pub const DEFAULT_LANG: &str = "fr-FR";

#[derive(Debug, Error, PartialEq)]
pub enum SpeechError {
    #[error("speech recognition is not supported on this host")]
    Unsupported,
    #[error("speech recognition returned no result")]
    NoResult,
    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    pub lang: String,
    pub interim_results: bool,
    pub max_alternatives: u32,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    pub transcript: String,
    pub confidence: f32,
}

/// The host's native speech recognizer.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    fn is_supported(&self) -> bool {
        true
    }

    /// Listens once. Each result holds up to `max_alternatives` alternatives,
    /// best first.
    async fn recognize(
        &self,
        options: &RecognitionOptions,
    ) -> Result<Vec<Vec<Alternative>>, SpeechError>;
}

pub struct SpeechListener<R> {
    recognizer: R,
    options: RecognitionOptions,
    events: EventBus,
}

impl<R: SpeechRecognizer> SpeechListener<R> {
    pub fn new(recognizer: R, events: EventBus) -> Self {
        Self {
            recognizer,
            options: RecognitionOptions::default(),
            events,
        }
    }

    pub fn with_options(mut self, options: RecognitionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RecognitionOptions {
        &self.options
    }

    /// Runs one recognition and publishes the best transcript of the first result.
    pub async fn listen(&self) -> Result<String, SpeechError> {
        if !self.recognizer.is_supported() {
            return Err(SpeechError::Unsupported);
        }

        let results = self.recognizer.recognize(&self.options).await?;
        let text = results
            .first()
            .and_then(|alternatives| alternatives.first())
            .map(|best| best.transcript.clone())
            .ok_or(SpeechError::NoResult)?;

        info!(lang = %self.options.lang, "speech recognized");
        self.events.publish(UiEvent::SpeechResult(text.clone()));
        Ok(text)
    }
}
