//! Runtime and form configuration.

use serde::Deserialize;

/// Default namespace key for the stored entry log.
pub const DEFAULT_STORAGE_KEY: &str = "wedding_rsvps_v1";
/// Default download name for the CSV export.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "wedding-rsvps.csv";

/// Errors raised while reading configuration text.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML could not be parsed into [`RsvpConfig`].
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings for one RSVP desk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RsvpConfig {
    /// Spreadsheet intake endpoint. `None` keeps submissions local.
    pub webhook_url: Option<String>,
    /// Namespace key under which entries are stored.
    pub storage_key: String,
    /// File name used by the CSV export surface.
    pub export_file_name: String,
    /// Environment descriptor stamped on every entry.
    pub client_context: String,
    /// Capacity of the event broadcast channel.
    pub event_buffer: usize,
}

impl Default for RsvpConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            client_context: default_client_context(),
            event_buffer: 256,
        }
    }
}

impl RsvpConfig {
    /// Parses TOML; omitted keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// `rsvplog/<version> (<os>; <arch>)`.
pub fn default_client_context() -> String {
    format!(
        "{}/{} ({}; {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
