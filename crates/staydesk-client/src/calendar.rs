//! # Calendar Session
//!
//! The month cache owned by one booking screen.
//!
//! ```text
//! show_month(room, y, m) ──► same (room, y, m) as loaded? ──► cached view
//!                                      │ no
//!                                      ▼
//!                       AvailabilityStore::fetch_month_report
//!                                      │
//!                                      ▼
//!                       replace view, clear selected day
//! ```
//!
//! Nothing outlives the session. Switching room or month discards the old
//! view; there is no invalidation protocol.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use staydesk_core::{generate_slots, selectable_days, DayOccupancy, MonthOccupancy, TimeSlot};

use crate::availability::AvailabilityStore;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone)]
struct MonthView {
    room_id: String,
    year: i32,
    month: u32,
    occupancy: MonthOccupancy,
    failed: BTreeSet<NaiveDate>,
}

impl MonthView {
    fn is(&self, room_id: &str, year: i32, month: u32) -> bool {
        self.room_id == room_id && self.year == year && self.month == month
    }
}

/// Per-screen month view over an [`AvailabilityStore`].
pub struct CalendarSession {
    store: AvailabilityStore,
    view: Option<MonthView>,
    selected_day: Option<NaiveDate>,
}

impl CalendarSession {
    pub fn new(store: AvailabilityStore) -> Self {
        Self {
            store,
            view: None,
            selected_day: None,
        }
    }

    /// Shows a room's month, fetching only when room or month changed.
    pub async fn show_month(
        &mut self,
        room_id: &str,
        year: i32,
        month: u32,
    ) -> ClientResult<&MonthOccupancy> {
        let cached = self
            .view
            .as_ref()
            .is_some_and(|v| v.is(room_id, year, month));

        if cached {
            debug!(room_id = %room_id, year, month, "Month view served from session cache");
        } else {
            self.load(room_id.to_string(), year, month).await?;
        }

        self.occupancy().ok_or(ClientError::NoMonthLoaded)
    }

    /// Re-fetches the month currently shown.
    pub async fn refresh(&mut self) -> ClientResult<&MonthOccupancy> {
        let (room_id, year, month) = {
            let view = self.view.as_ref().ok_or(ClientError::NoMonthLoaded)?;
            (view.room_id.clone(), view.year, view.month)
        };
        self.load(room_id, year, month).await?;
        self.occupancy().ok_or(ClientError::NoMonthLoaded)
    }

    async fn load(&mut self, room_id: String, year: i32, month: u32) -> ClientResult<()> {
        let report = self.store.fetch_month_report(&room_id, year, month).await?;

        self.view = Some(MonthView {
            room_id,
            year,
            month,
            occupancy: report.occupancy,
            failed: report.failed.into_keys().collect(),
        });
        self.selected_day = None;
        Ok(())
    }

    /// Drops the cached month, e.g. when the screen is closed.
    pub fn clear(&mut self) {
        self.view = None;
        self.selected_day = None;
    }

    /// `(room_id, year, month)` of the loaded view.
    pub fn current_month(&self) -> Option<(&str, i32, u32)> {
        self.view
            .as_ref()
            .map(|v| (v.room_id.as_str(), v.year, v.month))
    }

    pub fn occupancy(&self) -> Option<&MonthOccupancy> {
        self.view.as_ref().map(|v| &v.occupancy)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayOccupancy> {
        self.view.as_ref().and_then(|v| v.occupancy.get(&date))
    }

    /// Days whose fetch failed and are shown as free.
    pub fn unverified_days(&self) -> Vec<NaiveDate> {
        self.view
            .as_ref()
            .map(|v| v.failed.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn selectable_days(&self, today: NaiveDate) -> Vec<NaiveDate> {
        self.occupancy()
            .map(|m| selectable_days(m, today))
            .unwrap_or_default()
    }

    pub fn can_select_day(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.day(date).is_some_and(|d| d.is_selectable(today))
    }

    /// Selects a day of the loaded month.
    pub fn select_day(&mut self, date: NaiveDate, today: NaiveDate) -> ClientResult<&DayOccupancy> {
        if self.view.is_none() {
            return Err(ClientError::NoMonthLoaded);
        }
        if !self.can_select_day(date, today) {
            return Err(ClientError::DayNotSelectable(date));
        }
        self.selected_day = Some(date);
        self.day(date).ok_or(ClientError::DayNotSelectable(date))
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected_day
    }

    /// Hour slots still free on a day of the loaded month.
    pub fn free_slots(&self, date: NaiveDate) -> Vec<TimeSlot> {
        let Some(day) = self.day(date) else {
            return Vec::new();
        };
        generate_slots()
            .into_iter()
            .filter(|slot| day.is_hour_available(slot.hour))
            .collect()
    }

    /// Re-checks one hour against the service before it is picked.
    ///
    /// The fresh day replaces the cached one, so a slot booked since the
    /// month was loaded disappears from the picker.
    pub async fn recheck_hour(&mut self, date: NaiveDate, hour: u8) -> ClientResult<bool> {
        let room_id = self
            .view
            .as_ref()
            .map(|v| v.room_id.clone())
            .ok_or(ClientError::NoMonthLoaded)?;

        let fresh = self.store.fetch_day(&room_id, date).await;
        let available = fresh.is_hour_available(hour);

        if let Some(view) = self.view.as_mut() {
            if let Some(cached) = view.occupancy.get_mut(&date) {
                *cached = fresh;
            }
        }

        debug!(room_id = %room_id, date = %date, hour, available, "Hour re-checked");
        Ok(available)
    }
}
