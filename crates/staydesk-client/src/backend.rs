//! # Booking Backend
//!
//! The capability the client needs from the booking service, plus the JSON
//! shapes that cross the wire.
//!
//! ```text
//! AvailabilityStore ─┐
//! CalendarSession ───┼──► Arc<dyn BookingBackend> ──► HttpBackend (reqwest)
//! BookingSubmitter ──┘                           └──► in-memory fake (tests)
//! ```
//!
//! Wire DTOs are kept separate from the core types: the service sends prices
//! as numbers or strings and times as `"14:00"`, while the core works with
//! integer paise and hour numbers.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use staydesk_core::slots::{hour_value, parse_hour_value};
use staydesk_core::{
    Booking, BookingRequest, BookingStatus, Branch, GstOption, Money, PaymentMethod,
    PriceBreakdown, Room, UserProfile,
};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Backend Trait
// =============================================================================

/// Remote booking service operations.
///
/// Implementations report transport and protocol failures as
/// [`ClientError`]. A refused booking is not an error at this level: it is a
/// [`CreateBookingReply::Rejected`] the submitter interprets.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Raw booked hours of a room on a date, exactly as the service sent them.
    async fn booked_hours(&self, room_id: &str, date: NaiveDate) -> ClientResult<Vec<i64>>;

    /// Posts a booking once.
    async fn create_booking(&self, payload: &BookingPayload) -> ClientResult<CreateBookingReply>;

    async fn list_rooms(&self, branch_id: &str) -> ClientResult<Vec<Room>>;

    async fn list_branches(&self) -> ClientResult<Vec<Branch>>;

    /// Profile of the signed-in user.
    async fn current_user(&self) -> ClientResult<UserProfile>;
}

/// What the service said about a booking post.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateBookingReply {
    Accepted(Booking),
    /// The service answered 2xx but its body could not be read. The booking
    /// exists; resubmitting would book the room twice.
    AcceptedUnreadable { status: u16, reason: String },
    Rejected {
        status: u16,
        error_code: Option<String>,
        message: String,
    },
}

// =============================================================================
// Availability DTOs
// =============================================================================

/// `GET /rooms/{room_id}/booked-slots?date=YYYY-MM-DD`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlotsResponse {
    #[serde(default)]
    pub booked_hours: Vec<i64>,
}

// =============================================================================
// Booking Payload
// =============================================================================

/// Body of `POST /bookings`.
///
/// Amounts are decimal strings (`"18880.00"`) so the service never sees a
/// binary float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub room_id: String,
    pub branch_id: String,
    pub requester_id: String,

    pub guest_name: String,
    pub guest_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,

    pub check_in_date: NaiveDate,
    pub check_in_time: String,
    pub check_out_date: NaiveDate,
    pub check_out_time: String,

    pub nights: u32,
    pub rate: String,
    pub base_amount: String,
    pub gst_option: GstOption,
    pub gst_percent: u32,
    pub cgst: String,
    pub sgst: String,
    pub igst: String,
    pub tax_amount: String,
    pub total_amount: String,

    pub payment_method: PaymentMethod,
}

impl BookingPayload {
    /// Assembles the payload from a validated request and its price.
    pub fn new(request: &BookingRequest, price: &PriceBreakdown) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        BookingPayload {
            room_id: request.room_id.clone(),
            branch_id: request.branch_id.clone(),
            requester_id: request.requester_id.clone(),
            guest_name: request.guest.name.clone(),
            guest_phone: request.guest.phone.clone(),
            guest_email: non_empty(&request.guest.email),
            gst_number: non_empty(&request.guest.gst_number),
            check_in_date: request.check_in_date,
            check_in_time: hour_value(request.check_in_hour),
            check_out_date: request.check_out_date,
            check_out_time: hour_value(request.check_out_hour),
            nights: price.nights,
            rate: price.rate.to_decimal_string(),
            base_amount: price.base_amount.to_decimal_string(),
            gst_option: price.gst_option,
            gst_percent: price.gst_percent(),
            cgst: price.cgst().to_decimal_string(),
            sgst: price.sgst().to_decimal_string(),
            igst: price.igst().to_decimal_string(),
            tax_amount: price.tax_amount().to_decimal_string(),
            total_amount: price.total_amount.to_decimal_string(),
            payment_method: request.payment_method,
        }
    }
}

/// Success body of `POST /bookings`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingResponse {
    pub booking: BookingDto,
}

/// Error body the service sends with a non-success status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Entity DTOs
// =============================================================================

/// A booking as the service returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: String,
    pub room_id: String,
    #[serde(default = "default_status")]
    pub status: BookingStatus,
    pub check_in_date: NaiveDate,
    pub check_in_time: String,
    pub check_out_date: NaiveDate,
    pub check_out_time: String,
    pub total_amount: serde_json::Value,
}

fn default_status() -> BookingStatus {
    BookingStatus::Pending
}

impl BookingDto {
    pub fn into_booking(self) -> ClientResult<Booking> {
        Ok(Booking {
            check_in_hour: parse_hour_value(&self.check_in_time)?,
            check_out_hour: parse_hour_value(&self.check_out_time)?,
            total_amount: money_from_json(&self.total_amount)?,
            id: self.id,
            room_id: self.room_id,
            status: self.status,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
        })
    }
}

/// A room as the service returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub price: serde_json::Value,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub branch_id: String,
}

fn default_available() -> bool {
    true
}

impl RoomDto {
    pub fn into_room(self) -> ClientResult<Room> {
        Ok(Room {
            rate: money_from_json(&self.price)?,
            id: self.id,
            name: self.name,
            is_available: self.is_available,
            branch_id: self.branch_id,
        })
    }
}

/// Reads a rupee amount sent either as a JSON number or a decimal string.
///
/// Numbers are rounded half away from zero to the paisa, since services
/// serialising from floating point send artefacts like `16800.000000000004`.
/// Strings are parsed exactly.
pub fn money_from_json(value: &serde_json::Value) -> ClientResult<Money> {
    match value {
        serde_json::Value::Number(n) => money_from_number(n),
        serde_json::Value::String(s) => Ok(Money::parse_decimal(s)?),
        other => Err(ClientError::InvalidResponse(format!(
            "expected an amount, got {}",
            other
        ))),
    }
}

fn money_from_number(n: &serde_json::Number) -> ClientResult<Money> {
    if let Some(major) = n.as_i64() {
        return major
            .checked_mul(staydesk_core::money::MINOR_PER_MAJOR)
            .map(Money::from_minor)
            .ok_or_else(|| ClientError::InvalidResponse(format!("amount out of range: {}", n)));
    }

    let paise = n.as_f64().map(|f| (f * 100.0).round());
    match paise {
        // i64::MAX as f64 rounds up to 2^63, so the bound is exclusive.
        Some(p) if p.is_finite() && p.abs() < i64::MAX as f64 => Ok(Money::from_minor(p as i64)),
        _ => Err(ClientError::InvalidResponse(format!("amount out of range: {}", n))),
    }
}

/// Converts a room listing, skipping rooms that cannot be read.
pub fn rooms_from_dtos(dtos: Vec<RoomDto>) -> Vec<Room> {
    dtos.into_iter()
        .filter_map(|dto| {
            let id = dto.id.clone();
            match dto.into_room() {
                Ok(room) => Some(room),
                Err(e) => {
                    warn!(room_id = %id, error = %e, "Skipping unreadable room");
                    None
                }
            }
        })
        .collect()
}
