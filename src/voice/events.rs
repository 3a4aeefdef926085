use serde::Serialize;
use tokio::sync::broadcast;

pub const VOICE_MESSAGE: &str = "voiceMessage";
pub const SPEECH_RESULT: &str = "speechResult";

/// Events raised for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "detail")]
pub enum UiEvent {
    /// Finished recording, as a `data:audio/webm;base64,...` URI.
    #[serde(rename = "voiceMessage")]
    VoiceMessage(String),
    /// Recognized text.
    #[serde(rename = "speechResult")]
    SpeechResult(String),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::VoiceMessage(_) => VOICE_MESSAGE,
            UiEvent::SpeechResult(_) => SPEECH_RESULT,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            UiEvent::VoiceMessage(detail) | UiEvent::SpeechResult(detail) => detail,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<UiEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.sender.subscribe()
    }

    /// Fire-and-forget. Returns how many listeners received the event.
    pub fn publish(&self, event: UiEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_like_a_custom_event() {
        let event = UiEvent::SpeechResult("bonjour".into());
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "speechResult", "detail": "bonjour"})
        );
        assert_eq!(event.name(), SPEECH_RESULT);
        assert_eq!(event.detail(), "bonjour");
    }

    #[tokio::test]
    async fn publish_without_listeners_is_fine() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(UiEvent::VoiceMessage("data:".into())), 0);

        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(UiEvent::VoiceMessage("data:x".into())), 1);
        assert_eq!(rx.recv().await.unwrap(), UiEvent::VoiceMessage("data:x".into()));
    }
}
