//! # Waitlist Module
//!
//! Signup handling for the landing-page waitlist. The actual records live in
//! an external REST-queryable data store; this module owns validation,
//! email normalization, and the check-then-insert sequence, and treats the
//! store as an opaque collaborator behind the [`WaitlistStore`] trait.
//!
//! The deduplication key is the **normalized email**: lowercased, with
//! leading/trailing whitespace removed. At most one entry exists per
//! normalized email; entries are never mutated or deleted here.

pub mod supabase;

pub use supabase::SupabaseStore;

use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Failure reported by the external data store.
#[derive(Debug, Clone)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

/// External data store holding waitlist entries.
///
/// Supports exactly what the relay needs: equality lookup on the email
/// field, row insertion, and an exact total count.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Whether an entry with this (already normalized) email exists.
    async fn contains(&self, email: &str) -> Result<bool, StoreError>;

    /// Insert a new entry. `email` must already be normalized.
    async fn insert(&self, email: &str, source: &str) -> Result<(), StoreError>;

    /// Total number of registered entries.
    async fn count(&self) -> Result<u64, StoreError>;
}

/// Result of a signup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStatus {
    /// A new entry was created
    Created,
    /// An entry with this normalized email already existed; nothing written
    AlreadyRegistered,
}

impl SignupStatus {
    /// The user-facing message for this status.
    pub fn message(&self) -> &'static str {
        match self {
            SignupStatus::Created => "Success",
            SignupStatus::AlreadyRegistered => "Already registered",
        }
    }
}

/// Outcome of a successful submit: what happened plus the current total.
#[derive(Debug, Clone, Copy)]
pub struct SignupOutcome {
    pub status: SignupStatus,
    pub count: u64,
}

/// Lowercase and trim an email for use as the deduplication key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// The waitlist relay: validates, normalizes, and runs the
/// check-then-insert sequence against the store.
#[derive(Clone)]
pub struct WaitlistService {
    store: Arc<dyn WaitlistStore>,
    source_tag: String,
}

impl WaitlistService {
    pub fn new(store: Arc<dyn WaitlistStore>, source_tag: impl Into<String>) -> Self {
        Self {
            store,
            source_tag: source_tag.into(),
        }
    }

    /// Submit an email to the waitlist.
    ///
    /// Validation rejects empty input and anything without an `@`; nothing
    /// is written in that case. An existing entry short-circuits to
    /// `AlreadyRegistered` without a write.
    ///
    /// The check-then-insert sequence is not atomic: two concurrent submits
    /// of the same email can both pass the lookup and insert twice. The
    /// store enforces no uniqueness constraint, so the race is tolerated.
    ///
    /// `source` overrides the configured origin tag for this entry.
    pub async fn submit(&self, email: &str, source: Option<&str>) -> AppResult<SignupOutcome> {
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::ValidationError("Invalid email".to_string()));
        }

        let normalized = normalize_email(email);

        let exists = self
            .store
            .contains(&normalized)
            .await
            .map_err(upstream_error)?;

        if exists {
            let count = self.store.count().await.map_err(upstream_error)?;
            return Ok(SignupOutcome {
                status: SignupStatus::AlreadyRegistered,
                count,
            });
        }

        let source = source.unwrap_or(&self.source_tag);
        self.store
            .insert(&normalized, source)
            .await
            .map_err(upstream_error)?;

        let count = self.store.count().await.map_err(upstream_error)?;
        info!(email = %normalized, count, "Waitlist signup");

        Ok(SignupOutcome {
            status: SignupStatus::Created,
            count,
        })
    }

    /// Best-effort total count for display. A store failure is logged and
    /// swallowed, yielding 0; this value is not a source of truth.
    pub async fn count(&self) -> u64 {
        match self.store.count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Waitlist count lookup failed, defaulting to 0");
                0
            }
        }
    }
}

/// The store's failure detail is logged here and not surfaced: the signup
/// endpoint's error body carries only the fixed message.
fn upstream_error(e: StoreError) -> AppError {
    error!(error = %e.message, "Waitlist store request failed");
    AppError::Upstream {
        message: "Failed to join waitlist".to_string(),
        details: None,
    }
}
