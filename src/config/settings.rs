//! User settings for VenueSender
//!
//! One JSON file describes the SMTP endpoint, the sender identity, and the
//! venue sources. Loading fails fast: a missing required key or a failed
//! sanity check is a startup error, not something discovered mid-send.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::KeyDerivationParams;
use crate::error::{VenueError, VenueResult};
use crate::models::is_valid_email;

/// SMTP endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    /// SMTP server hostname
    pub server: String,
    /// SMTP port
    pub port: u16,
    /// Login username
    pub username: String,
    /// Use implicit TLS (SMTPS); otherwise STARTTLS is attempted
    #[serde(default = "default_true")]
    pub use_ssl: bool,
    /// Verify the server certificate chain
    #[serde(default = "default_true")]
    pub verify_peer: bool,
    /// Verify the server hostname against its certificate
    #[serde(default = "default_true")]
    pub verify_host: bool,
    /// Emit transport-level diagnostics
    #[serde(default)]
    pub verbose: bool,
    /// Overall per-message timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds (the tighter of the two bounds the
    /// socket timeout handed to the transport)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Optional at-rest encryption settings for the venue database
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EncryptionSettings {
    /// Key derivation parameters (salt, memory cost, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_params: Option<KeyDerivationParams>,
    /// Base64 sealed verification secret, used to reject a wrong passphrase
    /// before touching the database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sealed_check: Option<String>,
}

/// Top-level VenueSender settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// SMTP endpoint
    pub smtp: SmtpSettings,
    /// Sender address placed in the From header
    pub sender_email: String,
    /// Path to the venues CSV file (preferred source)
    pub venues_csv: PathBuf,
    /// Path to the encrypted venue database (fallback source)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venues_db: Option<PathBuf>,
    /// At-rest encryption settings for the database fallback
    #[serde(default)]
    pub encryption: EncryptionSettings,
    /// Maximum menu entries shown per filter stage
    #[serde(default = "default_max_displayed")]
    pub max_displayed: usize,
}

fn default_max_displayed() -> usize {
    5
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> VenueResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VenueError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| VenueError::Config(format!("Failed to parse config file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Sanity-check required fields
    pub fn validate(&self) -> VenueResult<()> {
        if self.smtp.server.trim().is_empty() {
            return Err(VenueError::Config("SMTP server must not be empty".into()));
        }
        if self.smtp.username.trim().is_empty() {
            return Err(VenueError::Config("SMTP username must not be empty".into()));
        }
        if self.smtp.port == 0 {
            return Err(VenueError::Config("SMTP port must be greater than 0".into()));
        }
        if self.sender_email.trim().is_empty() {
            return Err(VenueError::Config("Sender email must not be empty".into()));
        }
        if !is_valid_email(&self.sender_email) {
            return Err(VenueError::Config(format!(
                "Sender email is not a valid address: {}",
                self.sender_email
            )));
        }
        if self.max_displayed == 0 {
            return Err(VenueError::Config(
                "max_displayed must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> VenueResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| VenueError::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path, contents)
            .map_err(|e| VenueError::Io(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }
}
