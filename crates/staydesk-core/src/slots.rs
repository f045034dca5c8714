//! # Hourly Slot Grid
//!
//! A slot is one bookable hour of one room on one calendar date. Every
//! (room, date) pair has the same 24-slot grid, `00:00` through `23:00`.
//!
//! ## Stay Coverage
//! ```text
//! check-in 2026-10-20 14:00          check-out 2026-10-22 11:00
//!        │                                   │
//!        ▼                                   ▼
//! 10-20  ..............|██████████   (14..=23)
//! 10-21  ████████████████████████    (0..=23)
//! 10-22  ███████████|.............   (0..=10)   ← check-out hour excluded
//! ```

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Number of hourly slots in a day.
pub const HOURS_PER_DAY: u8 = 24;

/// Highest valid hour value.
pub const LAST_HOUR: u8 = HOURS_PER_DAY - 1;

// =============================================================================
// Time Slot Descriptor
// =============================================================================

/// One entry of the hourly picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Hour of day, 0-23.
    pub hour: u8,
    /// 24-hour value, `"00:00"`..`"23:00"`.
    pub value: String,
    /// 12-hour display label, `"12:00 AM"`..`"11:00 PM"`.
    pub label: String,
}

/// Generates the canonical 24-slot grid in hour order.
///
/// ```rust
/// use staydesk_core::slots::generate_slots;
///
/// let slots = generate_slots();
/// assert_eq!(slots.len(), 24);
/// assert_eq!(slots[13].value, "13:00");
/// assert_eq!(slots[13].label, "1:00 PM");
/// ```
pub fn generate_slots() -> Vec<TimeSlot> {
    (0..HOURS_PER_DAY)
        .map(|hour| TimeSlot {
            hour,
            value: hour_value(hour),
            label: hour_label(hour),
        })
        .collect()
}

/// 24-hour value for an hour, e.g. `"07:00"`.
pub fn hour_value(hour: u8) -> String {
    format!("{:02}:00", hour)
}

/// 12-hour display label for an hour, e.g. `"7:00 AM"`.
pub fn hour_label(hour: u8) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:00 {}", display, suffix)
}

/// Parses a 24-hour value (`"14:00"`, `"9:00"`, `"14"`) back to an hour.
///
/// Only whole hours are valid slot boundaries; `"14:30"` is rejected.
pub fn parse_hour_value(value: &str) -> CoreResult<u8> {
    let invalid = || CoreError::InvalidHour(value.to_string());

    let trimmed = value.trim();
    let (hour_part, minute_part) = match trimmed.split_once(':') {
        Some((h, m)) => (h, m),
        None => (trimmed, "00"),
    };

    if minute_part != "00" || hour_part.is_empty() || hour_part.len() > 2 {
        return Err(invalid());
    }

    let hour: u8 = hour_part.parse().map_err(|_| invalid())?;
    if hour > LAST_HOUR {
        return Err(invalid());
    }
    Ok(hour)
}

// =============================================================================
// Slot & Slot Range
// =============================================================================

/// The atomic unit of occupancy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub room_id: String,
    pub date: NaiveDate,
    pub hour: u8,
}

/// Half-open span of slots from (check-in date, hour) up to but excluding
/// (check-out date, hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRange {
    pub start_date: NaiveDate,
    pub start_hour: u8,
    pub end_date: NaiveDate,
    pub end_hour: u8,
}

impl SlotRange {
    pub fn new(start_date: NaiveDate, start_hour: u8, end_date: NaiveDate, end_hour: u8) -> Self {
        SlotRange {
            start_date,
            start_hour,
            end_date,
            end_hour,
        }
    }

    /// True when the range covers no slot at all.
    pub fn is_empty(&self) -> bool {
        (self.end_date, self.end_hour) <= (self.start_date, self.start_hour)
    }

    /// True when (date, hour) falls inside the range.
    pub fn contains(&self, date: NaiveDate, hour: u8) -> bool {
        hour <= LAST_HOUR
            && (self.start_date, self.start_hour) <= (date, hour)
            && (date, hour) < (self.end_date, self.end_hour)
    }

    /// Hours of `date` covered by this range.
    pub fn hours_on(&self, date: NaiveDate) -> BTreeSet<u8> {
        (0..HOURS_PER_DAY)
            .filter(|&hour| self.contains(date, hour))
            .collect()
    }

    /// Every calendar date that has at least one covered hour.
    pub fn dates(&self) -> Vec<NaiveDate> {
        if self.is_empty() {
            return Vec::new();
        }
        self.start_date
            .iter_days()
            .take_while(|d| *d <= self.end_date)
            .filter(|d| !self.hours_on(*d).is_empty())
            .collect()
    }

    /// Expands the range into concrete slots for `room_id`.
    pub fn slots(&self, room_id: &str) -> Vec<Slot> {
        self.dates()
            .into_iter()
            .flat_map(|date| {
                self.hours_on(date).into_iter().map(move |hour| Slot {
                    room_id: room_id.to_string(),
                    date,
                    hour,
                })
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
