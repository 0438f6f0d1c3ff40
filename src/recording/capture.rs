//! Capture-source abstraction over the microphone.
//!
//! Capability access is mediated by the host environment: the device may not
//! exist, and the user may refuse the permission prompt. Either way the
//! failure is reported once and never retried.

use std::fmt;

/// Why a capture session could not be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user declined microphone access, or no input device exists
    PermissionDenied,
    /// The device failed after access was granted
    Device(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Fixed user-facing message, matching the demo UI copy
            CaptureError::PermissionDenied => write!(f, "Microphone access denied"),
            CaptureError::Device(msg) => write!(f, "Capture device error: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

/// A source of recorded audio fragments.
///
/// Implementations wrap whatever recording facility the host provides; the
/// controller only needs start/stop, the accumulated fragments, and the
/// media type the source records in.
pub trait CaptureSource {
    /// Acquire the device and begin capturing fragments.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop capturing and release the device. Idempotent.
    fn stop(&mut self);

    /// Drain the fragments captured so far, in capture order.
    fn take_chunks(&mut self) -> Vec<Vec<u8>>;

    /// Media type of the recorded payload (e.g. `audio/webm`).
    fn media_type(&self) -> &str;

    /// Whether the device is currently held.
    fn is_active(&self) -> bool;
}
