//! # Day & Month Occupancy
//!
//! Derived views over booked hours. Nothing here is persisted: the client
//! builds these from fresh fetches and drops them when the calendar view
//! changes.
//!
//! ```text
//! booked_hours = {}          → has_bookings = false, selectable
//! booked_hours = {9, 10, 11} → has_bookings = true,  selectable (partial)
//! booked_hours = {0..=23}    → is_fully_booked,      NOT selectable
//! ```

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::slots::{SlotRange, HOURS_PER_DAY, LAST_HOUR};

// =============================================================================
// Day Occupancy
// =============================================================================

/// Booked hours of one room on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DayOccupancy {
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "Vec<u8>")]
    booked_hours: BTreeSet<u8>,
}

impl DayOccupancy {
    /// Builds a day from booked hours. Hours outside 0-23 are dropped.
    pub fn new(date: NaiveDate, hours: impl IntoIterator<Item = u8>) -> Self {
        DayOccupancy {
            date,
            booked_hours: hours.into_iter().filter(|h| *h <= LAST_HOUR).collect(),
        }
    }

    /// A day with nothing booked.
    pub fn empty(date: NaiveDate) -> Self {
        DayOccupancy {
            date,
            booked_hours: BTreeSet::new(),
        }
    }

    pub fn booked_hours(&self) -> &BTreeSet<u8> {
        &self.booked_hours
    }

    pub fn has_bookings(&self) -> bool {
        !self.booked_hours.is_empty()
    }

    pub fn is_fully_booked(&self) -> bool {
        self.booked_hours.len() == HOURS_PER_DAY as usize
    }

    pub fn is_hour_available(&self, hour: u8) -> bool {
        hour <= LAST_HOUR && !self.booked_hours.contains(&hour)
    }

    /// Hours still free, in order.
    pub fn free_hours(&self) -> Vec<u8> {
        (0..HOURS_PER_DAY)
            .filter(|h| !self.booked_hours.contains(h))
            .collect()
    }

    /// A date is selectable iff it is not in the past and not fully booked.
    pub fn is_selectable(&self, today: NaiveDate) -> bool {
        self.date >= today && !self.is_fully_booked()
    }

    /// Booked hours on this date that a stay would overlap.
    pub fn conflicts_with(&self, range: &SlotRange) -> BTreeSet<u8> {
        range
            .hours_on(self.date)
            .intersection(&self.booked_hours)
            .copied()
            .collect()
    }
}

// =============================================================================
// Month Occupancy
// =============================================================================

/// Occupancy of one room for every day of a calendar month, keyed by date.
pub type MonthOccupancy = BTreeMap<NaiveDate, DayOccupancy>;

/// Every date of `year`-`month`, in order.
///
/// ```rust
/// use staydesk_core::occupancy::month_days;
///
/// assert_eq!(month_days(2028, 2).unwrap().len(), 29);
/// assert!(month_days(2026, 13).is_err());
/// ```
pub fn month_days(year: i32, month: u32) -> CoreResult<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(CoreError::InvalidMonth { year, month })?;

    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month && d.year() == year)
        .collect())
}

/// Dates of a month view that the guest may pick.
pub fn selectable_days(month: &MonthOccupancy, today: NaiveDate) -> Vec<NaiveDate> {
    month
        .values()
        .filter(|day| day.is_selectable(today))
        .map(|day| day.date)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
