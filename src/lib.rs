//! # voicelist-backend
//!
//! Backend for the landing page: a waitlist signup relay and a voice-demo
//! transcription relay, both thin pass-throughs to external services, plus
//! the headless recording workflow used by native demo clients.
//!
//! ## Modules:
//! - **config**: configuration from config.toml + environment variables
//! - **state**: shared application state and request metrics
//! - **error**: error taxonomy and HTTP error responses
//! - **middleware**: request logging and metrics collection
//! - **handlers**: the two relay endpoints
//! - **transcription**: client for the external speech-to-text API
//! - **waitlist**: signup logic over the external data store
//! - **recording**: client-side recording workflow (state machine, capture
//!   abstraction, relay client)
//! - **health**: health check endpoint

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod recording;
pub mod state;
pub mod transcription;
pub mod waitlist;
