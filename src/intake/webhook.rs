//! Spreadsheet webhook intake over HTTP.

use async_trait::async_trait;
use tracing::debug;

use crate::entry::Entry;

use super::{Intake, IntakeError};

/// Posts entries as JSON text to a fixed endpoint.
///
/// The body is sent as `text/plain` so script-hosted endpoints accept it
/// without a preflight.
#[derive(Debug, Clone)]
pub struct WebhookIntake {
    url: String,
    client: reqwest::Client,
}

impl WebhookIntake {
    /// Intake with a default `reqwest` client.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    /// Intake sharing an existing client.
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// Endpoint receiving the posts.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Intake for WebhookIntake {
    async fn submit(&self, entry: &Entry) -> Result<(), IntakeError> {
        let body = entry.to_json()?;
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| IntakeError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(url = %self.url, status = status.as_u16(), "webhook responded");
        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(IntakeError::Status(status.as_u16()))
        }
    }
}
