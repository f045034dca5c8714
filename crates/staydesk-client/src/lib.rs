//! # staydesk-client: Booking Service Access for Staydesk
//!
//! Availability lookups, the per-screen month cache and booking submission,
//! on top of the pure logic in `staydesk-core`.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Booking Screen                                   │
//! │                                                                         │
//! │  Directory ──► rooms, branches, guest pre-fill                          │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  CalendarSession ──► AvailabilityStore ──► month fan-out (join_all)     │
//! │      │  month cache,     per-day fetch, timeout, fail-open              │
//! │      │  hour re-check                                                   │
//! │      ▼                                                                  │
//! │  validate_booking (core) ──► BookingSubmitter ──► POST /bookings        │
//! │                                  Conflict / Rejected / Network /        │
//! │                                  Unavailable                            │
//! │                                                                         │
//! │  All of the above talk to Arc<dyn BookingBackend>:                      │
//! │  HttpBackend in production, an in-memory fake in tests.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Client configuration (API URL, token, timeouts, form defaults)
//! - [`error`] - Client and submission error types
//! - [`backend`] - `BookingBackend` trait and wire DTOs
//! - [`http`] - reqwest implementation of the backend
//! - [`availability`] - Per-day and per-month availability, fail-open
//! - [`calendar`] - Per-screen month cache
//! - [`submitter`] - Booking submission and outcome mapping
//! - [`directory`] - Rooms, branches and profile pre-fill
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use staydesk_client::{AvailabilityStore, CalendarSession, ClientConfig, HttpBackend};
//!
//! let config = ClientConfig::load_or_default(None);
//! let backend = Arc::new(HttpBackend::new(&config)?);
//!
//! let mut calendar = CalendarSession::new(AvailabilityStore::from_config(backend, &config));
//! let month = calendar.show_month("room-204", 2026, 11).await?;
//! println!("{} days loaded", month.len());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod backend;
pub mod calendar;
pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod submitter;

#[cfg(test)]
mod fake;

// =============================================================================
// Re-exports
// =============================================================================

pub use availability::{AvailabilityStore, MonthReport};
pub use backend::{BookingBackend, BookingPayload, CreateBookingReply};
pub use calendar::CalendarSession;
pub use config::{ApiSettings, AvailabilitySettings, BookingSettings, ClientConfig};
pub use directory::Directory;
pub use error::{ClientError, ClientResult, SubmitError};
pub use http::HttpBackend;
pub use submitter::BookingSubmitter;
