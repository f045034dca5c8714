//! # Domain Types
//!
//! Core domain types shared by the booking screens and the client crate.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │     Room        │   │  BookingForm    │   │    Booking      │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id             │   │  raw screen     │   │  id (backend)   │        │
//! │  │  rate (Money)   │──►│  input          │   │  status         │        │
//! │  │  branch_id      │   │       │         │   │  total_amount   │        │
//! │  └─────────────────┘   │  validate()     │   └─────────────────┘        │
//! │                        │       ▼         │            ▲               │
//! │                        │ BookingRequest  │── submit ──┘               │
//! │                        └─────────────────┘                            │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    TaxRate      │   │   GstOption     │   │ PaymentMethod   │        │
//! │  │  bps (u32)      │   │  WithoutGst     │   │  PayAtHotel     │        │
//! │  │  900 = 9%       │   │  WithGst        │   │  Card / Upi     │        │
//! │  └─────────────────┘   │  WithIgst       │   │  Cash           │        │
//! │                        └─────────────────┘   └─────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::pricing::{self, PriceBreakdown};
use crate::slots::SlotRange;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1800 bps = 18%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a whole percentage.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        TaxRate(percent * 100)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Whole percent, e.g. 9 for 900 bps. GST slabs are always whole percents.
    #[inline]
    pub const fn percent(&self) -> u32 {
        self.0 / 100
    }

    /// The per-component rate of a CGST/SGST split.
    #[inline]
    pub const fn half(&self) -> Self {
        TaxRate(self.0 / 2)
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// GST Option
// =============================================================================

/// The tax regime chosen for a stay.
///
/// ```text
/// WithoutGst  no tax at all
/// WithGst     intra-state: CGST + SGST, each half the slab
/// WithIgst    inter-state: IGST, the full slab
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GstOption {
    #[default]
    #[serde(rename = "withoutGST")]
    WithoutGst,
    #[serde(rename = "withGST")]
    WithGst,
    #[serde(rename = "withIGST")]
    WithIgst,
}

impl std::fmt::Display for GstOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GstOption::WithoutGst => write!(f, "withoutGST"),
            GstOption::WithGst => write!(f, "withGST"),
            GstOption::WithIgst => write!(f, "withIGST"),
        }
    }
}

impl std::str::FromStr for GstOption {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "withoutgst" | "none" | "nogst" => Ok(GstOption::WithoutGst),
            "withgst" | "gst" | "cgstsgst" | "intrastate" => Ok(GstOption::WithGst),
            "withigst" | "igst" | "interstate" => Ok(GstOption::WithIgst),
            _ => Err(CoreError::InvalidGstOption(s.to_string())),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the guest intends to pay. Recorded on the booking, never charged here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    PayAtHotel,
    Card,
    Upi,
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::PayAtHotel => write!(f, "pay_at_hotel"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Upi => write!(f, "upi"),
            PaymentMethod::Cash => write!(f, "cash"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pay_at_hotel" | "payathotel" | "hotel" => Ok(PaymentMethod::PayAtHotel),
            "card" | "credit_card" | "debit_card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(CoreError::InvalidPaymentMethod(other.to_string())),
        }
    }
}

// =============================================================================
// Room & Branch
// =============================================================================

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,

    /// Display name, e.g. "Deluxe 204".
    pub name: String,

    /// Nightly rate.
    pub rate: Money,

    /// Whether the hotel currently offers this room at all.
    pub is_available: bool,

    /// Branch (property) the room belongs to.
    pub branch_id: String,
}

impl Room {
    /// Prices a stay in this room. Delegates to [`pricing::compute_price`].
    pub fn quote(&self, nights: u32, gst_option: GstOption) -> PriceBreakdown {
        pricing::compute_price(self.rate, nights, gst_option)
    }
}

/// A hotel branch (property).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
}

// =============================================================================
// Guest
// =============================================================================

/// The signed-in user's profile. Only used to pre-fill the guest form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Guest contact details as typed on the booking form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetails {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// GSTIN, only needed for business invoices.
    #[serde(default)]
    pub gst_number: String,
}

impl GuestDetails {
    /// Pre-fills name, phone and email from the user's profile.
    pub fn prefilled_from(profile: &UserProfile) -> Self {
        GuestDetails {
            name: profile.name.clone(),
            phone: profile.phone.clone(),
            email: profile.email.clone(),
            gst_number: String::new(),
        }
    }
}

// =============================================================================
// Booking Form (unvalidated)
// =============================================================================

/// Everything the booking screen collects, before validation.
///
/// Dates and hours are optional because the screen may submit before the
/// guest has picked them; the validator reports each missing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub room_id: String,
    pub branch_id: String,
    pub requester_id: String,
    pub guest: GuestDetails,
    #[ts(as = "Option<String>")]
    pub check_in_date: Option<NaiveDate>,
    pub check_in_hour: Option<u8>,
    #[ts(as = "Option<String>")]
    pub check_out_date: Option<NaiveDate>,
    pub check_out_hour: Option<u8>,
    #[serde(default)]
    pub gst_option: GstOption,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Booking Request (validated)
// =============================================================================

/// A validated, normalized booking request ready to be priced and submitted.
///
/// [`crate::validation::validate_booking`] is the normal way to build one.
/// The fields are public and the type deserializes, so consumers that accept
/// a request from elsewhere re-check what they depend on (the submitter
/// refuses stays of less than one night).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub room_id: String,
    pub branch_id: String,
    pub requester_id: String,
    pub guest: GuestDetails,
    #[ts(as = "String")]
    pub check_in_date: NaiveDate,
    pub check_in_hour: u8,
    #[ts(as = "String")]
    pub check_out_date: NaiveDate,
    pub check_out_hour: u8,
    pub gst_option: GstOption,
    pub payment_method: PaymentMethod,
}

impl BookingRequest {
    /// Number of nights charged for this stay.
    pub fn nights(&self) -> u32 {
        pricing::nights(self.check_in_date, self.check_out_date)
    }

    /// The half-open span of hourly slots this stay occupies.
    pub fn slot_range(&self) -> SlotRange {
        SlotRange::new(
            self.check_in_date,
            self.check_in_hour,
            self.check_out_date,
            self.check_out_hour,
        )
    }

    /// Prices this stay at the given nightly rate.
    pub fn quote(&self, rate: Money) -> PriceBreakdown {
        pricing::compute_price(rate, self.nights(), self.gst_option)
    }
}

// =============================================================================
// Booking (persisted by the backend)
// =============================================================================

/// Lifecycle of a booking on the booking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Active bookings hold their slots. Cancelled ones release them.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

/// A booking accepted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub room_id: String,
    pub status: BookingStatus,
    #[ts(as = "String")]
    pub check_in_date: NaiveDate,
    pub check_in_hour: u8,
    #[ts(as = "String")]
    pub check_out_date: NaiveDate,
    pub check_out_hour: u8,
    pub total_amount: Money,
}

impl Booking {
    pub fn slot_range(&self) -> SlotRange {
        SlotRange::new(
            self.check_in_date,
            self.check_in_hour,
            self.check_out_date,
            self.check_out_hour,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
