//! Voice-demo state machine.
//!
//! Transitions are a pure function of (state, event) so the workflow can be
//! tested without a capture device, a network, or a UI. Invalid pairs leave
//! the state unchanged; the controller treats them as no-ops.

/// State of one recording-and-transcription session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoState {
    /// Not recording, ready to start
    Idle,
    /// Actively capturing audio; `elapsed_seconds` ticks at one-second
    /// resolution and is strictly increasing while in this state
    Recording { elapsed_seconds: u32 },
    /// Capture stopped, waiting for the transcription relay to settle
    Processing,
    /// Transcript received; waiting for an explicit reset
    Done { transcript: String },
}

impl Default for DemoState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Events that drive the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoEvent {
    /// User started a recording (capture already acquired)
    Start,
    /// One second of recording elapsed
    Tick,
    /// User stopped the recording; payload is being submitted
    Stop,
    /// The relay returned a transcript
    RelaySuccess(String),
    /// The relay call failed; the session falls back to idle
    RelayFailure,
    /// User dismissed the finished transcript
    Reset,
}

/// Apply an event to a state, returning the new state.
///
/// Valid transitions:
/// - `Idle --Start--> Recording` (counter at 0)
/// - `Recording --Tick--> Recording` (counter + 1)
/// - `Recording --Stop--> Processing`
/// - `Processing --RelaySuccess--> Done`
/// - `Processing --RelayFailure--> Idle`
/// - `Done --Reset--> Idle`
///
/// Any other pair returns the state unchanged.
pub fn transition(state: DemoState, event: DemoEvent) -> DemoState {
    match (state, event) {
        (DemoState::Idle, DemoEvent::Start) => DemoState::Recording { elapsed_seconds: 0 },
        (DemoState::Recording { elapsed_seconds }, DemoEvent::Tick) => DemoState::Recording {
            elapsed_seconds: elapsed_seconds + 1,
        },
        (DemoState::Recording { .. }, DemoEvent::Stop) => DemoState::Processing,
        (DemoState::Processing, DemoEvent::RelaySuccess(transcript)) => {
            DemoState::Done { transcript }
        }
        (DemoState::Processing, DemoEvent::RelayFailure) => DemoState::Idle,
        (DemoState::Done { .. }, DemoEvent::Reset) => DemoState::Idle,
        (state, _) => state,
    }
}
