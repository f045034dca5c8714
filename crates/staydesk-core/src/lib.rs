//! # staydesk-core: Pure Booking Logic for Staydesk
//!
//! Room availability, pricing and booking validation as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Staydesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    Booking Screens                              │    │
//! │  │   Room picker ──► Calendar ──► Hour picker ──► Guest form       │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    staydesk-client                              │    │
//! │  │   AvailabilityStore, CalendarSession, BookingSubmitter          │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ staydesk-core (THIS CRATE) ★                    │    │
//! │  │                                                                 │    │
//! │  │   ┌─────────┐ ┌───────────┐ ┌─────────┐ ┌────────────┐          │    │
//! │  │   │  slots  │ │ occupancy │ │ pricing │ │ validation │          │    │
//! │  │   │ 24-hour │ │ DayOcc.   │ │ GST     │ │ guest form │          │    │
//! │  │   │  grid   │ │ month map │ │ slabs   │ │ stay dates │          │    │
//! │  │   └─────────┘ └───────────┘ └─────────┘ └────────────┘          │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Room, booking form/request, GST option, payment method
//! - [`money`] - Money in integer paise
//! - [`slots`] - Hourly slot grid and stay slot ranges
//! - [`occupancy`] - Day and month occupancy views
//! - [`pricing`] - Nights, base amount and GST breakdown
//! - [`validation`] - Booking form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use staydesk_core::{compute_price, GstOption, Money};
//!
//! let price = compute_price(Money::from_major(5000), 3, GstOption::WithIgst);
//! assert_eq!(price.igst(), Money::from_major(1800));
//! assert_eq!(price.total_amount, Money::from_major(16800));
//! ```

pub mod error;
pub mod money;
pub mod occupancy;
pub mod pricing;
pub mod slots;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{BookingField, CoreError, CoreResult, FieldError, ValidationError, ValidationErrorKind};
pub use money::Money;
pub use occupancy::{month_days, selectable_days, DayOccupancy, MonthOccupancy};
pub use pricing::{compute_price, nights, try_compute_price, PriceBreakdown, TaxComponents};
pub use slots::{generate_slots, Slot, SlotRange, TimeSlot};
pub use types::*;
pub use validation::validate_booking;
