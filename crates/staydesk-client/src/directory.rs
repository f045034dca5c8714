//! Branches, rooms and the signed-in profile: the reads a booking screen
//! makes before the calendar opens.

use std::sync::Arc;

use tracing::{debug, warn};

use staydesk_core::{BookingForm, Branch, GuestDetails, Room};

use crate::backend::BookingBackend;
use crate::config::BookingSettings;
use crate::error::ClientResult;

#[derive(Clone)]
pub struct Directory {
    backend: Arc<dyn BookingBackend>,
}

impl Directory {
    pub fn new(backend: Arc<dyn BookingBackend>) -> Self {
        Self { backend }
    }

    pub async fn branches(&self) -> ClientResult<Vec<Branch>> {
        self.backend.list_branches().await
    }

    /// Rooms of a branch that are currently offered.
    pub async fn bookable_rooms(&self, branch_id: &str) -> ClientResult<Vec<Room>> {
        let rooms = self.backend.list_rooms(branch_id).await?;
        let total = rooms.len();
        let bookable: Vec<Room> = rooms.into_iter().filter(|r| r.is_available).collect();
        debug!(branch_id = %branch_id, total, bookable = bookable.len(), "Rooms loaded");
        Ok(bookable)
    }

    /// Guest details pre-filled from the profile. Empty if it can't be read.
    pub async fn guest_prefill(&self) -> GuestDetails {
        match self.backend.current_user().await {
            Ok(profile) => GuestDetails::prefilled_from(&profile),
            Err(e) => {
                warn!(error = %e, "Profile unavailable, guest form starts empty");
                GuestDetails::default()
            }
        }
    }

    /// A fresh booking form for a room, with configured defaults applied.
    pub async fn start_form(
        &self,
        room: &Room,
        requester_id: &str,
        settings: &BookingSettings,
    ) -> BookingForm {
        BookingForm {
            room_id: room.id.clone(),
            branch_id: room.branch_id.clone(),
            requester_id: requester_id.to_string(),
            guest: self.guest_prefill().await,
            gst_option: settings.default_gst_option,
            payment_method: settings.default_payment_method,
            ..BookingForm::default()
        }
    }
}
