//! # Recording Module
//!
//! The client side of the voice demo: a headless controller that drives
//! microphone capture through a four-state workflow and submits the captured
//! audio to the transcription relay.
//!
//! ## Key Components:
//! - **DemoState / transition**: the `idle → recording → processing → done`
//!   state machine as pure data and a pure function, testable without any
//!   capture device or network
//! - **CaptureSource**: small trait over the microphone so tests can
//!   substitute a fake capture source
//! - **VoiceDemo**: the controller owning the capture session, elapsed-time
//!   counter, transcript, and error message
//! - **RelayClient**: posts the recorded payload to the backend's
//!   `/api/transcribe` endpoint

pub mod capture;
pub mod controller;
pub mod relay;
pub mod state;

pub use capture::{CaptureError, CaptureSource};
pub use controller::VoiceDemo;
pub use relay::RelayClient;
pub use state::{transition, DemoEvent, DemoState};
