//! Host-side voice input: microphone capture and speech recognition.
//!
//! Neither talks to the relay. Both hand their results to the UI through
//! the [`events::EventBus`].

pub mod capture;
pub mod events;
pub mod speech;
