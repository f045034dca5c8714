//! # Error Types
//!
//! Domain-specific error types for staydesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  staydesk-core errors (this file)                                       │
//! │  ├── CoreError        - Bad domain input (month, hour, amount)          │
//! │  └── ValidationError  - Field-level booking form failures               │
//! │                                                                         │
//! │  staydesk-client errors (separate crate)                                │
//! │  ├── ClientError      - Config, transport, protocol failures            │
//! │  └── SubmitError      - What a booking submission can end in            │
//! │                                                                         │
//! │  Flow: ValidationError → shown inline per field on the form             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Year/month pair does not name a calendar month.
    #[error("Invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    /// Not a whole hour between 00:00 and 23:00.
    #[error("Invalid hour: '{0}'")]
    InvalidHour(String),

    /// Amount string could not be read as a decimal currency value.
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),

    /// Stay total does not fit in the money representation.
    #[error("Price of {nights} night(s) at {rate} is out of range")]
    PriceOverflow { rate: crate::money::Money, nights: u32 },

    #[error("Unknown GST option: '{0}'. Valid options: withoutGST, withGST, withIGST")]
    InvalidGstOption(String),

    #[error("Unknown payment method: '{0}'")]
    InvalidPaymentMethod(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Booking Fields
// =============================================================================

/// Form fields a validation error can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum BookingField {
    RoomId,
    BranchId,
    RequesterId,
    GuestName,
    GuestPhone,
    GuestEmail,
    GuestGstNumber,
    CheckInDate,
    CheckInHour,
    CheckOutDate,
    CheckOutHour,
}

impl std::fmt::Display for BookingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingField::RoomId => "room",
            BookingField::BranchId => "branch",
            BookingField::RequesterId => "requester",
            BookingField::GuestName => "guest name",
            BookingField::GuestPhone => "phone number",
            BookingField::GuestEmail => "email",
            BookingField::GuestGstNumber => "GST number",
            BookingField::CheckInDate => "check-in date",
            BookingField::CheckInHour => "check-in time",
            BookingField::CheckOutDate => "check-out date",
            BookingField::CheckOutHour => "check-out time",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Category of a validation failure, for screens that style by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    Required,
    InvalidFormat,
    OutOfRange,
    InPast,
    NotAfter,
}

/// Field-level booking form failures.
///
/// Expected bad input never panics; it ends up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: BookingField },

    /// Field value does not match its pattern.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: BookingField, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: BookingField, min: i64, max: i64 },

    /// Date lies before today.
    #[error("{field} cannot be in the past")]
    InPast { field: BookingField },

    /// Date must come strictly after another one.
    #[error("{field} must be after {other}")]
    NotAfter { field: BookingField, other: BookingField },
}

impl ValidationError {
    pub fn field(&self) -> BookingField {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InPast { field }
            | ValidationError::NotAfter { field, .. } => *field,
        }
    }

    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::Required { .. } => ValidationErrorKind::Required,
            ValidationError::InvalidFormat { .. } => ValidationErrorKind::InvalidFormat,
            ValidationError::OutOfRange { .. } => ValidationErrorKind::OutOfRange,
            ValidationError::InPast { .. } => ValidationErrorKind::InPast,
            ValidationError::NotAfter { .. } => ValidationErrorKind::NotAfter,
        }
    }

    /// Serializable view for the form: kind + field + message.
    pub fn to_field_error(&self) -> FieldError {
        FieldError {
            kind: self.kind(),
            field: self.field(),
            message: self.to_string(),
        }
    }
}

/// What a screen renders next to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub kind: ValidationErrorKind,
    pub field: BookingField,
    pub message: String,
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
