pub mod transcribe;
pub mod waitlist;

pub use transcribe::*;
pub use waitlist::*;
