//! # Booking Submitter
//!
//! Prices a validated request and posts it to the booking service once.
//!
//! ## Outcome Mapping
//! ```text
//! ┌──────────────────────────────────────┬──────────────────────────────────┐
//! │ Service / transport                  │ Result                           │
//! ├──────────────────────────────────────┼──────────────────────────────────┤
//! │ 2xx { booking }                      │ Ok(Booking)                      │
//! │ 2xx, body unreadable                 │ AcceptedUnreadable → no retry    │
//! │ 409, or errorCode SLOT_CONFLICT      │ Conflict     → re-select slot    │
//! │ errorCode VALIDATION_FAILED, 4xx     │ Rejected     → fix the form      │
//! │ 5xx                                  │ Unavailable  → retry offered     │
//! │ timeout, refused, reset              │ Network      → retry offered     │
//! └──────────────────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! Nothing is retried here. A retry sends the same [`BookingPayload`]
//! through [`BookingSubmitter::submit_payload`]; idempotency is the
//! service's business.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use staydesk_core::{try_compute_price, Booking, BookingRequest, Room};

use crate::backend::{BookingBackend, BookingPayload, CreateBookingReply};
use crate::config::ClientConfig;
use crate::error::SubmitError;

/// Error code the service sends when the slot was taken first.
pub const SLOT_CONFLICT: &str = "SLOT_CONFLICT";

/// Error code the service sends when it refuses the payload itself.
pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";

/// Local refusal of a stay shorter than one night.
pub const INVALID_STAY: &str = "INVALID_STAY";

/// Local refusal of a price that cannot be represented.
pub const INVALID_PRICE: &str = "INVALID_PRICE";

#[derive(Clone)]
pub struct BookingSubmitter {
    backend: Arc<dyn BookingBackend>,
    timeout: Duration,
}

impl BookingSubmitter {
    pub fn new(backend: Arc<dyn BookingBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn from_config(backend: Arc<dyn BookingBackend>, config: &ClientConfig) -> Self {
        Self::new(backend, config.submit_timeout())
    }

    /// Builds the payload: the request plus its price at the room's rate.
    pub fn prepare(&self, request: &BookingRequest, room: &Room) -> Result<BookingPayload, SubmitError> {
        if request.room_id != room.id {
            return Err(SubmitError::RoomMismatch {
                requested: request.room_id.clone(),
                given: room.id.clone(),
            });
        }
        if !room.is_available {
            return Err(SubmitError::RoomUnavailable {
                room_id: room.id.clone(),
            });
        }

        let nights = request.nights();
        if nights == 0 {
            return Err(SubmitError::Rejected {
                code: INVALID_STAY.to_string(),
                message: format!(
                    "check-out {} must be at least one night after check-in {}",
                    request.check_out_date, request.check_in_date
                ),
            });
        }

        let price = try_compute_price(room.rate, nights, request.gst_option).map_err(|e| {
            SubmitError::Rejected {
                code: INVALID_PRICE.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(BookingPayload::new(request, &price))
    }

    /// Prices and posts a booking.
    pub async fn submit(&self, request: &BookingRequest, room: &Room) -> Result<Booking, SubmitError> {
        let payload = self.prepare(request, room)?;
        self.submit_payload(&payload).await
    }

    /// Posts an already prepared payload once.
    pub async fn submit_payload(&self, payload: &BookingPayload) -> Result<Booking, SubmitError> {
        let reply = match tokio::time::timeout(self.timeout, self.backend.create_booking(payload)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!(room_id = %payload.room_id, error = %e, "Booking submission failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(room_id = %payload.room_id, timeout = ?self.timeout, "Booking submission timed out");
                return Err(SubmitError::Network(format!(
                    "no response within {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        match reply {
            CreateBookingReply::Accepted(booking) => {
                info!(
                    booking_id = %booking.id,
                    room_id = %booking.room_id,
                    total = %booking.total_amount,
                    "Booking accepted"
                );
                Ok(booking)
            }
            CreateBookingReply::AcceptedUnreadable { status, reason } => {
                warn!(
                    room_id = %payload.room_id,
                    status,
                    reason = %reason,
                    "Booking accepted but confirmation unreadable"
                );
                Err(SubmitError::AcceptedUnreadable {
                    status,
                    message: reason,
                })
            }
            CreateBookingReply::Rejected {
                status,
                error_code,
                message,
            } => {
                let err = classify_rejection(status, error_code, message);
                warn!(room_id = %payload.room_id, status, error = %err, "Booking rejected");
                Err(err)
            }
        }
    }
}

/// Maps a refused booking to what the screen should do about it.
pub fn classify_rejection(status: u16, error_code: Option<String>, message: String) -> SubmitError {
    if status == 409 || error_code.as_deref() == Some(SLOT_CONFLICT) {
        return SubmitError::Conflict { message };
    }
    if status >= 500 {
        return SubmitError::Unavailable { status, message };
    }
    SubmitError::Rejected {
        code: error_code.unwrap_or_else(|| status.to_string()),
        message,
    }
}
