//! The voice-demo controller.
//!
//! Owns one capture source and drives it through the state machine in
//! `state.rs`. Invariants it maintains:
//! - at most one active capture session at a time
//! - the capture device is released on every path out of `Recording`
//!   (stop, error, or drop of the controller)
//! - exactly one relay call per recording session

use super::capture::{CaptureError, CaptureSource};
use super::state::{transition, DemoEvent, DemoState};
use crate::transcription::Transcriber;
use std::sync::Arc;
use tracing::{debug, warn};

/// Headless recording-and-transcription workflow.
pub struct VoiceDemo<C: CaptureSource> {
    state: DemoState,
    capture: C,
    relay: Arc<dyn Transcriber>,
    error: Option<String>,
}

impl<C: CaptureSource> VoiceDemo<C> {
    pub fn new(capture: C, relay: Arc<dyn Transcriber>) -> Self {
        Self {
            state: DemoState::Idle,
            capture,
            relay,
            error: None,
        }
    }

    pub fn state(&self) -> &DemoState {
        &self.state
    }

    /// Seconds recorded so far; 0 outside of `Recording`.
    pub fn elapsed_seconds(&self) -> u32 {
        match self.state {
            DemoState::Recording { elapsed_seconds } => elapsed_seconds,
            _ => 0,
        }
    }

    /// The transcript, once a session has completed.
    pub fn transcript(&self) -> Option<&str> {
        match &self.state {
            DemoState::Done { transcript } => Some(transcript),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a recording session. Only valid in `Idle`; anywhere else this
    /// is a no-op. A capture failure (permission refused, no device) is
    /// reported through `error_message` and the session stays idle.
    pub fn start(&mut self) {
        if self.state != DemoState::Idle {
            return;
        }
        self.error = None;

        match self.capture.start() {
            Ok(()) => {
                self.state = transition(self.state.clone(), DemoEvent::Start);
                debug!("Recording started");
            }
            Err(e @ CaptureError::PermissionDenied) => {
                // Reported, not retried
                self.error = Some(e.to_string());
                warn!("Microphone access denied");
            }
            Err(e) => {
                self.error = Some(e.to_string());
                warn!(error = %e, "Capture failed to start");
            }
        }
    }

    /// Advance the elapsed-time counter by one second. Only has an effect
    /// while recording.
    pub fn tick(&mut self) {
        self.state = transition(self.state.clone(), DemoEvent::Tick);
    }

    /// Stop the recording and submit the captured audio to the relay.
    ///
    /// Only valid in `Recording`; anywhere else this is a no-op and no
    /// network call is made. Zero captured fragments still submit an empty
    /// payload. The call either settles into `Done` with the transcript or
    /// falls back to `Idle` with an error message; there is no cancellation
    /// of an in-flight call.
    pub async fn stop(&mut self) {
        if !matches!(self.state, DemoState::Recording { .. }) {
            return;
        }

        self.capture.stop();
        let chunks = self.capture.take_chunks();
        let payload: Vec<u8> = chunks.into_iter().flatten().collect();
        let media_type = self.capture.media_type().to_string();
        self.state = transition(self.state.clone(), DemoEvent::Stop);

        debug!(bytes = payload.len(), media_type = %media_type, "Submitting recording");

        let relay = Arc::clone(&self.relay);
        match relay.transcribe(payload, &media_type).await {
            Ok(text) => {
                self.state = transition(self.state.clone(), DemoEvent::RelaySuccess(text));
            }
            Err(e) => {
                self.error = Some(e.message.clone());
                self.state = transition(self.state.clone(), DemoEvent::RelayFailure);
                warn!(error = %e, "Transcription relay failed");
            }
        }
    }

    /// Dismiss a finished transcript and return to `Idle`, clearing the
    /// transcript, error message, and counter.
    pub fn reset(&mut self) {
        self.error = None;
        self.state = transition(self.state.clone(), DemoEvent::Reset);
    }
}

/// The device must not leak if the controller goes away mid-recording.
impl<C: CaptureSource> Drop for VoiceDemo<C> {
    fn drop(&mut self) {
        if self.capture.is_active() {
            self.capture.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::TranscribeError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Capture fake with externally observable start/stop accounting.
    struct FakeCapture {
        deny: bool,
        chunks: Vec<Vec<u8>>,
        active: Arc<AtomicBool>,
        stop_calls: Arc<AtomicUsize>,
    }

    impl FakeCapture {
        fn new(chunks: Vec<Vec<u8>>) -> Self {
            Self {
                deny: false,
                chunks,
                active: Arc::new(AtomicBool::new(false)),
                stop_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn denied() -> Self {
            Self {
                deny: true,
                ..Self::new(Vec::new())
            }
        }
    }

    impl CaptureSource for FakeCapture {
        fn start(&mut self) -> Result<(), CaptureError> {
            if self.deny {
                return Err(CaptureError::PermissionDenied);
            }
            self.active.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn stop(&mut self) {
            if self.active.swap(false, Ordering::SeqCst) {
                self.stop_calls.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn take_chunks(&mut self) -> Vec<Vec<u8>> {
            std::mem::take(&mut self.chunks)
        }

        fn media_type(&self) -> &str {
            "audio/webm"
        }

        fn is_active(&self) -> bool {
            self.active.load(Ordering::SeqCst)
        }
    }

    /// Relay fake recording the payloads it receives.
    struct FakeRelay {
        result: Result<String, String>,
        calls: AtomicUsize,
        payloads: Mutex<Vec<Vec<u8>>>,
    }

    impl FakeRelay {
        fn ok(text: &str) -> Self {
            Self {
                result: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                payloads: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                payloads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transcriber for FakeRelay {
        async fn transcribe(
            &self,
            audio: Vec<u8>,
            _media_type: &str,
        ) -> Result<String, TranscribeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(audio);
            self.result.clone().map_err(TranscribeError::new)
        }
    }

    #[tokio::test]
    async fn test_stop_before_start_is_noop() {
        let relay = Arc::new(FakeRelay::ok("hello"));
        let mut demo = VoiceDemo::new(FakeCapture::new(Vec::new()), relay.clone());

        demo.stop().await;

        assert_eq!(*demo.state(), DemoState::Idle);
        assert_eq!(relay.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_start_while_recording_is_noop() {
        let relay = Arc::new(FakeRelay::ok("hello"));
        let mut demo = VoiceDemo::new(FakeCapture::new(Vec::new()), relay);

        demo.start();
        demo.tick();
        demo.tick();
        demo.start();

        assert_eq!(demo.elapsed_seconds(), 2);
    }

    #[tokio::test]
    async fn test_permission_denied_reports_fixed_message() {
        let relay = Arc::new(FakeRelay::ok("hello"));
        let capture = FakeCapture::denied();
        let active = capture.active.clone();
        let mut demo = VoiceDemo::new(capture, relay);

        demo.start();

        assert_eq!(*demo.state(), DemoState::Idle);
        assert_eq!(demo.error_message(), Some("Microphone access denied"));
        assert!(!active.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_successful_session() {
        let relay = Arc::new(FakeRelay::ok("buy milk"));
        let capture = FakeCapture::new(vec![vec![1, 2], vec![3]]);
        let stop_calls = capture.stop_calls.clone();
        let mut demo = VoiceDemo::new(capture, relay.clone());

        demo.start();
        demo.tick();
        assert_eq!(demo.elapsed_seconds(), 1);
        demo.stop().await;

        assert_eq!(demo.transcript(), Some("buy milk"));
        assert_eq!(demo.error_message(), None);
        // Counter cleared on leaving Recording
        assert_eq!(demo.elapsed_seconds(), 0);
        // Device released exactly once, fragments concatenated in order
        assert_eq!(stop_calls.load(Ordering::SeqCst), 1);
        assert_eq!(relay.calls.load(Ordering::SeqCst), 1);
        assert_eq!(relay.payloads.lock().unwrap()[0], vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_relay_failure_returns_to_idle() {
        let relay = Arc::new(FakeRelay::failing("Failed to transcribe audio"));
        let capture = FakeCapture::new(vec![vec![1]]);
        let active = capture.active.clone();
        let mut demo = VoiceDemo::new(capture, relay);

        demo.start();
        demo.stop().await;

        assert_eq!(*demo.state(), DemoState::Idle);
        assert_eq!(demo.transcript(), None);
        assert_eq!(demo.error_message(), Some("Failed to transcribe audio"));
        assert!(!active.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_empty_recording_still_submits() {
        let relay = Arc::new(FakeRelay::ok(""));
        let mut demo = VoiceDemo::new(FakeCapture::new(Vec::new()), relay.clone());

        demo.start();
        demo.stop().await;

        assert_eq!(relay.calls.load(Ordering::SeqCst), 1);
        assert!(relay.payloads.lock().unwrap()[0].is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_session() {
        let relay = Arc::new(FakeRelay::ok("buy milk"));
        let mut demo = VoiceDemo::new(FakeCapture::new(vec![vec![1]]), relay);

        demo.start();
        demo.stop().await;
        assert!(demo.transcript().is_some());

        demo.reset();

        assert_eq!(*demo.state(), DemoState::Idle);
        assert_eq!(demo.transcript(), None);
        assert_eq!(demo.error_message(), None);
        assert_eq!(demo.elapsed_seconds(), 0);
    }

    #[tokio::test]
    async fn test_drop_releases_device() {
        let relay = Arc::new(FakeRelay::ok("hello"));
        let capture = FakeCapture::new(Vec::new());
        let stop_calls = capture.stop_calls.clone();
        let active = capture.active.clone();

        {
            let mut demo = VoiceDemo::new(capture, relay);
            demo.start();
            assert!(active.load(Ordering::SeqCst));
        }

        assert!(!active.load(Ordering::SeqCst));
        assert_eq!(stop_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_session_after_failure() {
        let relay = Arc::new(FakeRelay::ok("second try"));
        let mut demo = VoiceDemo::new(FakeCapture::new(vec![vec![9]]), relay);

        demo.start();
        demo.stop().await;
        // Session consumed; a new start records from a clean counter
        demo.reset();
        demo.start();
        assert_eq!(demo.elapsed_seconds(), 0);
        assert!(matches!(demo.state(), DemoState::Recording { .. }));
    }
}
