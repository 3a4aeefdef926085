use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use super::events::{EventBus, UiEvent};

pub const AUDIO_MIME: &str = "audio/webm";

#[derive(Debug, Error, PartialEq)]
pub enum CaptureError {
    #[error("microphone capture is not supported on this host")]
    Unsupported,
    #[error("microphone access refused: {0}")]
    PermissionDenied(String),
    #[error("a capture session is already running")]
    AlreadyActive,
    #[error("capture session ended abnormally")]
    Aborted,
}

/// Microphone access provided by the host.
#[async_trait]
pub trait AudioInput: Send + Sync {
    fn is_supported(&self) -> bool {
        true
    }

    /// Starts recording and returns the stream of encoded audio chunks.
    /// The host stops recording once the receiver is dropped.
    async fn open(&self) -> Result<mpsc::Receiver<Vec<u8>>, CaptureError>;
}

/// Clears the recorder's busy flag when the session goes away.
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// An in-progress recording. Hand it back to [`VoiceRecorder::end`] to get the audio.
pub struct CaptureSession {
    id: Uuid,
    started_at: Instant,
    stop: oneshot::Sender<()>,
    collector: JoinHandle<Vec<Vec<u8>>>,
    _guard: ActiveGuard,
}

impl CaptureSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    async fn finish(self) -> Result<Vec<u8>, CaptureError> {
        let _ = self.stop.send(());
        let chunks = self.collector.await.map_err(|_| CaptureError::Aborted)?;
        debug!(
            session = %self.id,
            chunks = chunks.len(),
            elapsed_ms = self.started_at.elapsed().as_millis() as u64,
            "capture finished"
        );
        Ok(chunks.concat())
    }
}

pub struct VoiceRecorder<I> {
    input: I,
    events: EventBus,
    active: Arc<AtomicBool>,
}

impl<I: AudioInput> VoiceRecorder<I> {
    pub fn new(input: I, events: EventBus) -> Self {
        Self {
            input,
            events,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Opens the microphone and starts buffering chunks.
    ///
    /// Only one session may be alive at a time.
    pub async fn begin(&self) -> Result<CaptureSession, CaptureError> {
        if !self.input.is_supported() {
            return Err(CaptureError::Unsupported);
        }
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CaptureError::AlreadyActive);
        }
        let guard = ActiveGuard(self.active.clone());

        let chunks = self.input.open().await?;
        let (stop, stopped) = oneshot::channel();
        let collector = tokio::spawn(collect_chunks(chunks, stopped));

        let id = Uuid::new_v4();
        info!(session = %id, "recording started");

        Ok(CaptureSession {
            id,
            started_at: Instant::now(),
            stop,
            collector,
            _guard: guard,
        })
    }

    /// Stops the session, publishes the recording as a data URI and returns it.
    pub async fn end(&self, session: CaptureSession) -> Result<String, CaptureError> {
        let id = session.id;
        let audio = session.finish().await?;
        let uri = to_data_uri(AUDIO_MIME, &audio);

        info!(session = %id, bytes = audio.len(), "recording stopped");
        self.events.publish(UiEvent::VoiceMessage(uri.clone()));
        Ok(uri)
    }
}

async fn collect_chunks(
    mut chunks: mpsc::Receiver<Vec<u8>>,
    mut stopped: oneshot::Receiver<()>,
) -> Vec<Vec<u8>> {
    let mut buffered = Vec::new();
    loop {
        tokio::select! {
            chunk = chunks.recv() => match chunk {
                Some(data) if !data.is_empty() => buffered.push(data),
                Some(_) => {}
                None => break,
            },
            // Also taken when the session is dropped without being ended.
            _ = &mut stopped => {
                chunks.close();
                while let Some(data) = chunks.recv().await {
                    if !data.is_empty() {
                        buffered.push(data);
                    }
                }
                break;
            }
        }
    }
    buffered
}

pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_format() {
        assert_eq!(to_data_uri(AUDIO_MIME, b"abc"), "data:audio/webm;base64,YWJj");
        assert_eq!(to_data_uri(AUDIO_MIME, b""), "data:audio/webm;base64,");
    }
}
