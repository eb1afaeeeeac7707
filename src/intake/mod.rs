//! Remote intake for finalized entries.

/// HTTP webhook implementation.
pub mod webhook;

use async_trait::async_trait;

use crate::entry::Entry;

pub use self::webhook::WebhookIntake;

/// Failure of a single remote submission. Never fatal to the local log.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// The request never completed.
    #[error("transport: {0}")]
    Transport(String),
    /// The endpoint answered with a non-success status.
    #[error("endpoint returned status {0}")]
    Status(u16),
    /// The entry could not be encoded.
    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One-way relay of entries to an external collaborator.
#[async_trait]
pub trait Intake: Send + Sync {
    /// Delivers `entry`. Implementations must not read or depend on any
    /// response body.
    async fn submit(&self, entry: &Entry) -> Result<(), IntakeError>;
}
