//! # Client Error Types
//!
//! Error types for booking service access.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐  │
//! │  │  Configuration  │  │   Transport     │  │     Protocol            │  │
//! │  │                 │  │                 │  │                         │  │
//! │  │  InvalidConfig  │  │  Connection     │  │  InvalidResponse        │  │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Deserialization        │  │
//! │  │  ConfigLoad/Save│  │  Http (status)  │  │                         │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘  │
//! │                                                                         │
//! │  SubmitError: what a booking submission ends in                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐    │
//! │  │  Conflict    │ │  Rejected    │ │  Network     │ │ Unavailable  │    │
//! │  │  re-select   │ │  fix form    │ │  retry       │ │  retry       │    │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A 2xx whose body cannot be read is `AcceptedUnreadable`: the booking
//! exists, so it is never offered for retry.
//!
//! Availability failures never surface as errors to screens: the store
//! logs them and fails open. `ClientError` there only travels as far as the
//! store's own log line.

use thiserror::Error;

use staydesk_core::CoreError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering config, transport and protocol failures.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request never got a response (DNS, refused, reset, TLS).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request exceeded its deadline.
    #[error("Request timed out")]
    Timeout,

    /// Service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Authentication required")]
    Unauthorized,

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// Response was well-formed JSON but not what the contract says.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    // =========================================================================
    // Domain / State Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Calendar operation needs a month view that has not been loaded.
    #[error("No month loaded in this calendar session")]
    NoMonthLoaded,

    /// Day is in the past, fully booked, or outside the loaded month.
    #[error("Date {0} cannot be selected")]
    DayNotSelectable(chrono::NaiveDate),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Deserialization(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Deserialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the same request may succeed if sent again.
    ///
    /// ## Retryable Errors
    /// - Connection failures and timeouts
    /// - 5xx responses
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::ConnectionFailed(_) | ClientError::Timeout => true,
            ClientError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// Submission Errors
// =============================================================================

/// Outcome of a failed booking submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The slot was taken by someone else first. Prompt re-selection.
    #[error("Selected time is no longer available: {message}")]
    Conflict { message: String },

    /// The service refused the payload itself.
    #[error("Booking rejected ({code}): {message}")]
    Rejected { code: String, message: String },

    /// The request failed in transit, before any response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// The service accepted the booking but its confirmation could not be
    /// read. The booking exists; never resubmit.
    #[error("Booking accepted (HTTP {status}) but the confirmation could not be read: {message}")]
    AcceptedUnreadable { status: u16, message: String },

    /// The service failed internally.
    #[error("Booking service unavailable (HTTP {status}): {message}")]
    Unavailable { status: u16, message: String },

    /// The room is marked as not offered.
    #[error("Room {room_id} is not available for booking")]
    RoomUnavailable { room_id: String },

    /// Caller passed a room that is not the one on the request.
    #[error("Request is for room {requested}, but room {given} was supplied")]
    RoomMismatch { requested: String, given: String },
}

impl SubmitError {
    /// Returns true if the screen should offer a retry of the same payload.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Network(_) | SubmitError::Unavailable { .. })
    }

    /// Returns true if a booking may already exist on the service.
    pub fn booking_may_exist(&self) -> bool {
        matches!(self, SubmitError::AcceptedUnreadable { .. })
    }

    /// Returns true if the guest must pick a different date or hour.
    pub fn requires_reselection(&self) -> bool {
        matches!(self, SubmitError::Conflict { .. })
    }
}

impl From<ClientError> for SubmitError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http { status, message } if status >= 500 => {
                SubmitError::Unavailable { status, message }
            }
            ClientError::Http { status, message } => SubmitError::Rejected {
                code: status.to_string(),
                message,
            },
            ClientError::Unauthorized => SubmitError::Rejected {
                code: "UNAUTHORIZED".to_string(),
                message: "authentication required".to_string(),
            },
            ClientError::ConnectionFailed(message) => SubmitError::Network(message),
            ClientError::Timeout => SubmitError::Network("request timed out".to_string()),
            other => SubmitError::Rejected {
                code: "CLIENT_ERROR".to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::ConnectionFailed("refused".into()).is_retryable());
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::Http { status: 503, message: "down".into() }.is_retryable());

        assert!(!ClientError::Http { status: 404, message: "nope".into() }.is_retryable());
        assert!(!ClientError::InvalidConfig("bad".into()).is_retryable());
        assert!(!ClientError::Deserialization("eof".into()).is_retryable());
    }

    #[test]
    fn test_config_errors() {
        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
        assert!(!ClientError::Unauthorized.is_config_error());
    }

    #[test]
    fn test_submit_error_from_client_error() {
        let err: SubmitError = ClientError::Timeout.into();
        assert!(matches!(err, SubmitError::Network(_)));
        assert!(err.is_retryable());

        let err: SubmitError = ClientError::Http { status: 502, message: "bad gateway".into() }.into();
        assert!(matches!(err, SubmitError::Unavailable { status: 502, .. }));

        let err: SubmitError = ClientError::Unauthorized.into();
        assert!(matches!(err, SubmitError::Rejected { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_only_transport_failures_map_to_network() {
        let err: SubmitError = ClientError::ConnectionFailed("reset".into()).into();
        assert!(matches!(err, SubmitError::Network(_)));

        let err: SubmitError = ClientError::Deserialization("eof".into()).into();
        assert!(matches!(err, SubmitError::Rejected { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_accepted_unreadable_is_never_retried() {
        let err = SubmitError::AcceptedUnreadable {
            status: 201,
            message: "invalid hour".into(),
        };
        assert!(!err.is_retryable());
        assert!(!err.requires_reselection());
        assert!(err.booking_may_exist());
    }

    #[test]
    fn test_conflict_requires_reselection() {
        let err = SubmitError::Conflict { message: "slot taken".into() };
        assert!(err.requires_reselection());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("slot taken"));
    }
}
