//! # Availability Store
//!
//! Fetches booked hours per (room, date) and aggregates a calendar month.
//!
//! ## Fail-Open Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch (room, date) ──► Ok(hours)        ──► DayOccupancy(hours)        │
//! │                    └──► Err / timeout    ──► DayOccupancy(empty) + warn │
//! │                                                                         │
//! │  A day that could not be read looks free. The booking service is the   │
//! │  authority: a clash is rejected at submit time as a conflict.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Month Fan-Out
//! ```text
//! month_days(y, m) ──► [d1, d2, ... d31]
//!                        │   │        │     concurrent, independent reads
//!                        ▼   ▼        ▼
//!                      join_all (keyed by date)
//!                        │
//!                        ▼
//!                 MonthReport { occupancy, failed }
//! ```
//!
//! Dropping the month future abandons all in-flight day fetches.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use staydesk_core::slots::LAST_HOUR;
use staydesk_core::{month_days, DayOccupancy, MonthOccupancy};

use crate::backend::BookingBackend;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Result of aggregating one month for one room.
#[derive(Debug, Clone, Default)]
pub struct MonthReport {
    /// One entry per day of the month. Failed days are present and empty.
    pub occupancy: MonthOccupancy,
    /// Days whose fetch failed, with the reason.
    pub failed: BTreeMap<NaiveDate, String>,
}

impl MonthReport {
    /// True when every day was actually read from the service.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Per-day availability lookups against the booking service.
///
/// Cheap to clone; each screen owns its own copy and its own month cache
/// (see [`crate::calendar::CalendarSession`]).
#[derive(Clone)]
pub struct AvailabilityStore {
    backend: Arc<dyn BookingBackend>,
    fetch_timeout: Duration,
}

impl AvailabilityStore {
    pub fn new(backend: Arc<dyn BookingBackend>, fetch_timeout: Duration) -> Self {
        Self {
            backend,
            fetch_timeout,
        }
    }

    pub fn from_config(backend: Arc<dyn BookingBackend>, config: &ClientConfig) -> Self {
        Self::new(backend, config.fetch_timeout())
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Booked hours of a room on a date, or the reason they could not be read.
    pub async fn try_fetch_booked_hours(
        &self,
        room_id: &str,
        date: NaiveDate,
    ) -> ClientResult<BTreeSet<u8>> {
        let raw = tokio::time::timeout(self.fetch_timeout, self.backend.booked_hours(room_id, date))
            .await
            .map_err(|_| ClientError::Timeout)??;

        Ok(sanitize_hours(room_id, date, raw))
    }

    /// Booked hours of a room on a date. Any failure yields an empty set.
    pub async fn fetch_booked_hours(&self, room_id: &str, date: NaiveDate) -> BTreeSet<u8> {
        match self.try_fetch_booked_hours(room_id, date).await {
            Ok(hours) => hours,
            Err(e) => {
                warn!(room_id = %room_id, date = %date, error = %e, "Availability fetch failed, assuming free");
                BTreeSet::new()
            }
        }
    }

    /// Occupancy of a single day, fail-open.
    pub async fn fetch_day(&self, room_id: &str, date: NaiveDate) -> DayOccupancy {
        DayOccupancy::new(date, self.fetch_booked_hours(room_id, date).await)
    }

    /// Whether `hour` is free for the room on `date`. Always re-fetched.
    ///
    /// Advisory only: nothing is held, and a concurrent booking may still
    /// take the hour before submission.
    pub async fn is_hour_available(&self, room_id: &str, date: NaiveDate, hour: u8) -> bool {
        !self.fetch_booked_hours(room_id, date).await.contains(&hour)
    }

    /// Fetches every day of the month concurrently.
    ///
    /// Fails only for an invalid `(year, month)`; day-level failures are
    /// recorded in [`MonthReport::failed`] and their days left empty.
    pub async fn fetch_month_report(
        &self,
        room_id: &str,
        year: i32,
        month: u32,
    ) -> ClientResult<MonthReport> {
        let days = month_days(year, month)?;
        debug!(room_id = %room_id, year, month, days = days.len(), "Fetching month occupancy");

        let results = join_all(days.into_iter().map(|date| async move {
            (date, self.try_fetch_booked_hours(room_id, date).await)
        }))
        .await;

        let mut report = MonthReport::default();
        for (date, result) in results {
            let day = match result {
                Ok(hours) => DayOccupancy::new(date, hours),
                Err(e) => {
                    warn!(room_id = %room_id, date = %date, error = %e, "Availability fetch failed, assuming free");
                    report.failed.insert(date, e.to_string());
                    DayOccupancy::empty(date)
                }
            };
            report.occupancy.insert(date, day);
        }

        info!(
            room_id = %room_id,
            year,
            month,
            booked_days = report.occupancy.values().filter(|d| d.has_bookings()).count(),
            failed_days = report.failed.len(),
            "Month occupancy loaded"
        );

        Ok(report)
    }

    /// Month occupancy keyed by date, fail-open per day.
    pub async fn fetch_month_occupancy(
        &self,
        room_id: &str,
        year: i32,
        month: u32,
    ) -> ClientResult<MonthOccupancy> {
        Ok(self.fetch_month_report(room_id, year, month).await?.occupancy)
    }
}

/// Keeps hours in 0..=23 and drops the rest.
fn sanitize_hours(room_id: &str, date: NaiveDate, raw: Vec<i64>) -> BTreeSet<u8> {
    let total = raw.len();
    let hours: BTreeSet<u8> = raw
        .into_iter()
        .filter_map(|h| u8::try_from(h).ok())
        .filter(|h| *h <= LAST_HOUR)
        .collect();

    let kept: usize = hours.len();
    if kept < total {
        debug!(room_id = %room_id, date = %date, total, kept, "Dropped out-of-range or duplicate hours");
    }
    hours
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeBackend;
    use chrono::Datelike;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn store(fake: &Arc<FakeBackend>) -> AvailabilityStore {
        AvailabilityStore::new(fake.clone(), Duration::from_secs(4))
    }

    #[tokio::test]
    async fn test_fetch_booked_hours() {
        let fake = Arc::new(FakeBackend::new());
        fake.book("r-1", date("2026-11-02"), [9, 10, 11]);

        let hours = store(&fake).fetch_booked_hours("r-1", date("2026-11-02")).await;
        assert_eq!(hours, BTreeSet::from([9, 10, 11]));

        let other_room = store(&fake).fetch_booked_hours("r-2", date("2026-11-02")).await;
        assert!(other_room.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_hours_are_dropped() {
        let fake = Arc::new(FakeBackend::new());
        fake.book("r-1", date("2026-11-02"), [-1, 0, 23, 24, 300, 23]);

        let hours = store(&fake).fetch_booked_hours("r-1", date("2026-11-02")).await;
        assert_eq!(hours, BTreeSet::from([0, 23]));
    }

    #[tokio::test]
    async fn test_failure_fails_open() {
        let fake = Arc::new(FakeBackend::new());
        fake.book("r-1", date("2026-11-02"), [14]);
        fake.fail_on(date("2026-11-02"));

        let store = store(&fake);
        assert!(store.try_fetch_booked_hours("r-1", date("2026-11-02")).await.is_err());
        assert!(store.fetch_booked_hours("r-1", date("2026-11-02")).await.is_empty());
        assert!(store.is_hour_available("r-1", date("2026-11-02"), 14).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_times_out_to_empty() {
        let fake = Arc::new(FakeBackend::new());
        fake.book("r-1", date("2026-11-02"), [14]);
        fake.delay_on(date("2026-11-02"), Duration::from_secs(30));

        let store = store(&fake);
        assert!(matches!(
            store.try_fetch_booked_hours("r-1", date("2026-11-02")).await,
            Err(ClientError::Timeout)
        ));
        assert!(store.fetch_day("r-1", date("2026-11-02")).await.booked_hours().is_empty());
    }

    #[tokio::test]
    async fn test_is_hour_available_refetches() {
        let fake = Arc::new(FakeBackend::new());
        let store = store(&fake);
        let day = date("2026-11-02");

        assert!(store.is_hour_available("r-1", day, 14).await);
        fake.book("r-1", day, [14]);
        assert!(!store.is_hour_available("r-1", day, 14).await);
        assert!(store.is_hour_available("r-1", day, 15).await);
        assert_eq!(fake.availability_calls(), 3);
    }

    #[tokio::test]
    async fn test_month_covers_every_day() {
        let fake = Arc::new(FakeBackend::new());
        let store = store(&fake);

        let feb = store.fetch_month_occupancy("r-1", 2028, 2).await.unwrap();
        assert_eq!(feb.len(), 29);
        assert_eq!(fake.availability_calls(), 29);

        let oct = store.fetch_month_occupancy("r-1", 2026, 10).await.unwrap();
        assert_eq!(oct.len(), 31);
        assert!(oct.keys().all(|d| d.month() == 10));
    }

    #[tokio::test]
    async fn test_month_fully_and_partially_booked_days() {
        let fake = Arc::new(FakeBackend::new());
        fake.book("r-1", date("2026-11-05"), 0..24);
        fake.book("r-1", date("2026-11-06"), [9, 10]);

        let month = store(&fake).fetch_month_occupancy("r-1", 2026, 11).await.unwrap();
        let today = date("2026-11-01");

        let full = &month[&date("2026-11-05")];
        assert!(full.is_fully_booked());
        assert!(!full.is_selectable(today));

        let partial = &month[&date("2026-11-06")];
        assert!(partial.has_bookings());
        assert!(partial.is_selectable(today));

        for day in month.values() {
            assert_eq!(day.is_fully_booked(), day.booked_hours().len() == 24);
        }
    }

    #[tokio::test]
    async fn test_month_with_failing_days_degrades_per_day() {
        let fake = Arc::new(FakeBackend::new());
        fake.book("r-1", date("2026-11-10"), [12, 13]);
        fake.book("r-1", date("2026-11-20"), 0..24);
        for d in ["2026-11-03", "2026-11-15", "2026-11-20"] {
            fake.fail_on(date(d));
        }

        let report = store(&fake).fetch_month_report("r-1", 2026, 11).await.unwrap();

        assert_eq!(report.occupancy.len(), 30);
        assert_eq!(report.failed.len(), 3);
        assert!(!report.is_complete());
        assert!(report.failed.contains_key(&date("2026-11-15")));

        // Failed days look free, even one that is really fully booked.
        assert!(report.occupancy[&date("2026-11-20")].booked_hours().is_empty());
        assert_eq!(
            report.occupancy[&date("2026-11-10")].booked_hours(),
            &BTreeSet::from([12, 13])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_month_slow_day_does_not_block_others() {
        let fake = Arc::new(FakeBackend::new());
        fake.book("r-1", date("2026-11-09"), [8]);
        fake.delay_on(date("2026-11-10"), Duration::from_secs(60));

        let report = store(&fake).fetch_month_report("r-1", 2026, 11).await.unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed.contains_key(&date("2026-11-10")));
        assert!(report.occupancy[&date("2026-11-09")].has_bookings());
    }

    #[tokio::test]
    async fn test_invalid_month_is_caller_error() {
        let fake = Arc::new(FakeBackend::new());
        let err = store(&fake).fetch_month_occupancy("r-1", 2026, 13).await.unwrap_err();
        assert!(matches!(err, ClientError::Core(_)));
        assert_eq!(fake.availability_calls(), 0);
    }
}
