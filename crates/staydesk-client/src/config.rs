//! # Client Configuration
//!
//! Configuration for talking to the booking service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     STAYDESK_API_URL=https://api.example-hotel.in/v1                    │
//! │     STAYDESK_FETCH_TIMEOUT_MS=3000                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/staydesk/client.toml (Linux)                              │
//! │     ~/Library/Application Support/com.staydesk.booking/client.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api.example-hotel.in/v1"
//! token = "..."
//! branch_id = "branch-1"
//!
//! [availability]
//! fetch_timeout_ms = 4000
//!
//! [booking]
//! submit_timeout_secs = 30
//! default_gst_option = "withGST"
//! default_payment_method = "pay_at_hotel"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use staydesk_core::{GstOption, PaymentMethod};

use crate::error::{ClientError, ClientResult};

/// Per-day availability fetches must stay in single-digit seconds.
pub const MAX_FETCH_TIMEOUT_MS: u64 = 9_999;

// =============================================================================
// API Settings
// =============================================================================

/// Where the booking service lives and how to authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the booking service, e.g. `https://api.example-hotel.in/v1`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token of the signed-in user, if any.
    #[serde(default)]
    pub token: Option<String>,

    /// Branch the screens open on.
    #[serde(default)]
    pub branch_id: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            token: None,
            branch_id: None,
        }
    }
}

// =============================================================================
// Availability Settings
// =============================================================================

/// Availability lookups.
///
/// A slow day fetch fails open: after the timeout the day is shown as free
/// and the booking service rejects a clash at submit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySettings {
    /// Timeout for one (room, date) lookup (milliseconds).
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,
}

fn default_fetch_timeout() -> u64 {
    4_000
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        AvailabilitySettings {
            fetch_timeout_ms: default_fetch_timeout(),
        }
    }
}

// =============================================================================
// Booking Settings
// =============================================================================

/// Submission behaviour and form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSettings {
    /// Timeout for posting a booking (seconds).
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,

    /// Tax regime pre-selected on the form.
    #[serde(default)]
    pub default_gst_option: GstOption,

    /// Payment method pre-selected on the form.
    #[serde(default)]
    pub default_payment_method: PaymentMethod,
}

fn default_submit_timeout() -> u64 {
    30
}

impl Default for BookingSettings {
    fn default() -> Self {
        BookingSettings {
            submit_timeout_secs: default_submit_timeout(),
            default_gst_option: GstOption::default(),
            default_payment_method: PaymentMethod::default(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub availability: AvailabilitySettings,

    #[serde(default)]
    pub booking: BookingSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.availability.fetch_timeout_ms == 0
            || self.availability.fetch_timeout_ms > MAX_FETCH_TIMEOUT_MS
        {
            return Err(ClientError::InvalidConfig(format!(
                "fetch_timeout_ms must be between 1 and {}",
                MAX_FETCH_TIMEOUT_MS
            )));
        }

        if self.booking.submit_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "submit_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("STAYDESK_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(token) = std::env::var("STAYDESK_API_TOKEN") {
            self.api.token = Some(token);
        }

        if let Ok(branch) = std::env::var("STAYDESK_BRANCH_ID") {
            self.api.branch_id = Some(branch);
        }

        if let Ok(ms) = std::env::var("STAYDESK_FETCH_TIMEOUT_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => self.availability.fetch_timeout_ms = ms,
                Err(_) => warn!(value = %ms, "Ignoring non-numeric STAYDESK_FETCH_TIMEOUT_MS"),
            }
        }

        if let Ok(secs) = std::env::var("STAYDESK_SUBMIT_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.booking.submit_timeout_secs = secs,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric STAYDESK_SUBMIT_TIMEOUT_SECS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "staydesk", "booking")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.availability.fetch_timeout_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.booking.submit_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(4));
        assert_eq!(config.submit_timeout(), Duration::from_secs(30));
        assert_eq!(config.booking.default_gst_option, GstOption::WithoutGst);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ws://localhost:8080".into();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "https://api.example-hotel.in/v1".into();
        assert!(config.validate().is_ok());

        config.availability.fetch_timeout_ms = 15_000;
        assert!(config.validate().is_err());
        config.availability.fetch_timeout_ms = 0;
        assert!(config.validate().is_err());
        config.availability.fetch_timeout_ms = 2_500;

        config.booking.submit_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example-hotel.in/v1"

            [booking]
            default_gst_option = "withIGST"
            default_payment_method = "upi"
            "#,
        )
        .unwrap();

        assert_eq!(config.availability.fetch_timeout_ms, 4_000);
        assert_eq!(config.booking.default_gst_option, GstOption::WithIgst);
        assert_eq!(config.booking.default_payment_method, PaymentMethod::Upi);
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_toml_serialization() {
        let config = ClientConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[availability]"));
        assert!(toml_str.contains("[booking]"));
    }
}
