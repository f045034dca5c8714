//! # Validation Module
//!
//! Booking form validation. Pure and synchronous; "today" is passed in so
//! the same form always validates the same way.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Booking screen                                                │
//! │  └── Immediate per-keystroke feedback                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Required fields, patterns (phone, email, GSTIN)                    │
//! │  └── Stay dates: not in the past, check-out after check-in              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Booking service                                               │
//! │  └── Authoritative slot conflict check                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use staydesk_core::validation::{validate_gst_number, validate_phone};
//!
//! assert!(validate_phone("9876543210").is_ok());
//! assert!(validate_phone("12345").is_err());
//! assert!(validate_gst_number("22AAAAA0000A1Z5").is_ok());
//! ```

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{BookingField, ValidationError};
use crate::slots::LAST_HOUR;
use crate::types::{BookingForm, BookingRequest, GuestDetails};

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum guest name length.
pub const MAX_NAME_LEN: usize = 100;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex")
});

static GSTIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$").expect("valid regex")
});

// =============================================================================
// Guest Field Validators
// =============================================================================

/// Validates the guest name. Returns it trimmed.
pub fn validate_guest_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: BookingField::GuestName,
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::InvalidFormat {
            field: BookingField::GuestName,
            reason: format!("must be at most {} characters", MAX_NAME_LEN),
        });
    }

    Ok(name.to_string())
}

/// Validates a phone number: exactly 10 digits.
///
/// ```rust
/// use staydesk_core::validation::validate_phone;
///
/// assert_eq!(validate_phone(" 9876543210 ").unwrap(), "9876543210");
/// assert!(validate_phone("98765-43210").is_err());
/// assert!(validate_phone("").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: BookingField::GuestPhone,
        });
    }

    if !PHONE_RE.is_match(phone) {
        return Err(ValidationError::InvalidFormat {
            field: BookingField::GuestPhone,
            reason: "must be a 10-digit number".to_string(),
        });
    }

    Ok(phone.to_string())
}

/// Validates an optional email. Empty input is accepted and stays empty.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Ok(String::new());
    }

    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidFormat {
            field: BookingField::GuestEmail,
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(email.to_lowercase())
}

/// Validates an optional GSTIN. Empty input is accepted and stays empty.
///
/// The pattern is checked as typed; lowercase input is not silently
/// upper-cased into validity.
///
/// ```rust
/// use staydesk_core::validation::validate_gst_number;
///
/// assert!(validate_gst_number("").is_ok());
/// assert!(validate_gst_number("22AAAAA0000A1Z5").is_ok());
/// assert!(validate_gst_number("22AAAAA0000A1Z").is_err()); // 14 chars
/// ```
pub fn validate_gst_number(gst_number: &str) -> ValidationResult<String> {
    let gst_number = gst_number.trim();

    if gst_number.is_empty() {
        return Ok(String::new());
    }

    if !GSTIN_RE.is_match(gst_number) {
        return Err(ValidationError::InvalidFormat {
            field: BookingField::GuestGstNumber,
            reason: "must be a 15-character GSTIN".to_string(),
        });
    }

    Ok(gst_number.to_string())
}

// =============================================================================
// Stay Validators
// =============================================================================

/// Validates an hour picked from the slot grid.
pub fn validate_hour(hour: Option<u8>, field: BookingField) -> ValidationResult<u8> {
    match hour {
        None => Err(ValidationError::Required { field }),
        Some(h) if h > LAST_HOUR => Err(ValidationError::OutOfRange {
            field,
            min: 0,
            max: LAST_HOUR as i64,
        }),
        Some(h) => Ok(h),
    }
}

/// Validates stay dates (date-only comparison).
///
/// ## Rules
/// - Both dates present
/// - Check-in not before `today`
/// - Check-out strictly after check-in, so a stay is at least one night
///
/// Collects every failure rather than stopping at the first.
pub fn validate_stay_dates(
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if check_in.is_none() {
        errors.push(ValidationError::Required {
            field: BookingField::CheckInDate,
        });
    }
    if check_out.is_none() {
        errors.push(ValidationError::Required {
            field: BookingField::CheckOutDate,
        });
    }

    if let Some(check_in) = check_in {
        if check_in < today {
            errors.push(ValidationError::InPast {
                field: BookingField::CheckInDate,
            });
        }
    }

    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        if check_out <= check_in {
            errors.push(ValidationError::NotAfter {
                field: BookingField::CheckOutDate,
                other: BookingField::CheckInDate,
            });
        }
    }

    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) if errors.is_empty() => Ok((check_in, check_out)),
        _ => Err(errors),
    }
}

fn require_id(value: &str, field: BookingField) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(value.to_string())
}

// =============================================================================
// Booking Form
// =============================================================================

/// Validates a whole booking form.
///
/// Returns the normalized [`BookingRequest`] or every field error found.
pub fn validate_booking(
    form: &BookingForm,
    today: NaiveDate,
) -> Result<BookingRequest, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut collect = |result: ValidationResult<String>| match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let room_id = collect(require_id(&form.room_id, BookingField::RoomId));
    let branch_id = collect(require_id(&form.branch_id, BookingField::BranchId));
    let requester_id = collect(require_id(&form.requester_id, BookingField::RequesterId));
    let name = collect(validate_guest_name(&form.guest.name));
    let phone = collect(validate_phone(&form.guest.phone));
    let email = collect(validate_email(&form.guest.email));
    let gst_number = collect(validate_gst_number(&form.guest.gst_number));

    let dates = match validate_stay_dates(form.check_in_date, form.check_out_date, today) {
        Ok(dates) => Some(dates),
        Err(date_errors) => {
            errors.extend(date_errors);
            None
        }
    };

    let check_in_hour = validate_hour(form.check_in_hour, BookingField::CheckInHour)
        .map_err(|e| errors.push(e))
        .ok();
    let check_out_hour = validate_hour(form.check_out_hour, BookingField::CheckOutHour)
        .map_err(|e| errors.push(e))
        .ok();

    match (
        room_id,
        branch_id,
        requester_id,
        name,
        phone,
        email,
        gst_number,
        dates,
        check_in_hour,
        check_out_hour,
    ) {
        (
            Some(room_id),
            Some(branch_id),
            Some(requester_id),
            Some(name),
            Some(phone),
            Some(email),
            Some(gst_number),
            Some((check_in_date, check_out_date)),
            Some(check_in_hour),
            Some(check_out_hour),
        ) if errors.is_empty() => Ok(BookingRequest {
            room_id,
            branch_id,
            requester_id,
            guest: GuestDetails {
                name,
                phone,
                email,
                gst_number,
            },
            check_in_date,
            check_in_hour,
            check_out_date,
            check_out_hour,
            gst_option: form.gst_option,
            payment_method: form.payment_method,
        }),
        _ => Err(errors),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;
    use crate::types::{GstOption, PaymentMethod};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn today() -> NaiveDate {
        date("2026-10-19")
    }

    fn valid_form() -> BookingForm {
        BookingForm {
            room_id: "room-204".into(),
            branch_id: "branch-1".into(),
            requester_id: "user-7".into(),
            guest: GuestDetails {
                name: "  Asha Rao ".into(),
                phone: "9876543210".into(),
                email: "Asha@Example.com".into(),
                gst_number: String::new(),
            },
            check_in_date: Some(date("2026-10-20")),
            check_in_hour: Some(14),
            check_out_date: Some(date("2026-10-21")),
            check_out_hour: Some(11),
            gst_option: GstOption::WithGst,
            payment_method: PaymentMethod::Upi,
        }
    }

    fn fields(errors: &[ValidationError]) -> Vec<BookingField> {
        errors.iter().map(|e| e.field()).collect()
    }

    #[test]
    fn test_valid_form_is_normalized() {
        let request = validate_booking(&valid_form(), today()).unwrap();
        assert_eq!(request.guest.name, "Asha Rao");
        assert_eq!(request.guest.email, "asha@example.com");
        assert_eq!(request.nights(), 1);
        assert_eq!(request.gst_option, GstOption::WithGst);
        assert_eq!(request.payment_method, PaymentMethod::Upi);
    }

    #[test]
    fn test_one_night_accepted_same_day_rejected() {
        let mut form = valid_form();
        form.check_out_date = form.check_in_date;
        let errors = validate_booking(&form, today()).unwrap_err();
        assert_eq!(fields(&errors), vec![BookingField::CheckOutDate]);
        assert_eq!(errors[0].kind(), ValidationErrorKind::NotAfter);

        form.check_out_date = form.check_in_date.map(|d| d.succ_opt().unwrap());
        assert!(validate_booking(&form, today()).is_ok());
    }

    #[test]
    fn test_check_in_today_allowed_yesterday_rejected() {
        let mut form = valid_form();
        form.check_in_date = Some(today());
        assert!(validate_booking(&form, today()).is_ok());

        form.check_in_date = Some(date("2026-10-18"));
        let errors = validate_booking(&form, today()).unwrap_err();
        assert_eq!(fields(&errors), vec![BookingField::CheckInDate]);
        assert_eq!(errors[0].kind(), ValidationErrorKind::InPast);
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("98765432101").is_err());
        assert!(validate_phone("98765abcde").is_err());
        assert!(matches!(
            validate_phone("  "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_gst_number_rules() {
        assert!(validate_gst_number("22AAAAA0000A1Z5").is_ok());
        assert!(validate_gst_number("27ABCDE1234F1ZX").is_ok());
        assert!(validate_gst_number("22AAAAA0000A1Z").is_err());
        assert!(validate_gst_number("22AAAAA0000A0Z5").is_err()); // 13th char cannot be 0
        assert!(validate_gst_number("22AAAAA0000A1Y5").is_err()); // 14th char must be Z
        assert!(validate_gst_number("22aaaaa0000a1z5").is_err());
        assert_eq!(validate_gst_number("   ").unwrap(), "");
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(validate_email("").unwrap(), "");
        assert!(validate_email("guest@hotel.in").is_ok());
        assert!(validate_email("guest@hotel").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("a b@hotel.in").is_err());
    }

    #[test]
    fn test_optional_fields_validated_only_when_present() {
        let mut form = valid_form();
        form.guest.email = "not-an-email".into();
        form.guest.gst_number = "22AAAAA0000A1Z".into();
        let errors = validate_booking(&form, today()).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec![BookingField::GuestEmail, BookingField::GuestGstNumber]
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let form = BookingForm::default();
        let errors = validate_booking(&form, today()).unwrap_err();
        let found = fields(&errors);
        for field in [
            BookingField::RoomId,
            BookingField::BranchId,
            BookingField::RequesterId,
            BookingField::GuestName,
            BookingField::GuestPhone,
            BookingField::CheckInDate,
            BookingField::CheckOutDate,
            BookingField::CheckInHour,
            BookingField::CheckOutHour,
        ] {
            assert!(found.contains(&field), "missing {field:?}");
        }
        assert!(!found.contains(&BookingField::GuestEmail));
        assert!(errors.iter().all(|e| e.kind() == ValidationErrorKind::Required));
    }

    #[test]
    fn test_hour_out_of_range() {
        let mut form = valid_form();
        form.check_out_hour = Some(24);
        let errors = validate_booking(&form, today()).unwrap_err();
        assert_eq!(errors[0].kind(), ValidationErrorKind::OutOfRange);
        assert_eq!(errors[0].field(), BookingField::CheckOutHour);
    }

    #[test]
    fn test_guest_name_too_long() {
        assert!(validate_guest_name(&"A".repeat(101)).is_err());
        assert!(validate_guest_name(&"A".repeat(100)).is_ok());
    }
}
