//! In-memory [`BookingBackend`] for unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use staydesk_core::slots::parse_hour_value;
use staydesk_core::{Booking, BookingStatus, Branch, Money, Room, UserProfile};

use crate::backend::{BookingBackend, BookingPayload, CreateBookingReply};
use crate::error::{ClientError, ClientResult};

#[derive(Default)]
pub struct FakeBackend {
    booked: Mutex<HashMap<(String, NaiveDate), Vec<i64>>>,
    failing: Mutex<HashSet<NaiveDate>>,
    slow: Mutex<HashMap<NaiveDate, Duration>>,
    replies: Mutex<VecDeque<ClientResult<CreateBookingReply>>>,
    create_delay: Mutex<Option<Duration>>,
    posted: Mutex<Vec<BookingPayload>>,
    rooms: Mutex<Vec<Room>>,
    profile: Mutex<Option<UserProfile>>,
    availability_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(&self, room_id: &str, date: NaiveDate, hours: impl IntoIterator<Item = i64>) {
        self.booked
            .lock()
            .unwrap()
            .entry((room_id.to_string(), date))
            .or_default()
            .extend(hours);
    }

    pub fn fail_on(&self, date: NaiveDate) {
        self.failing.lock().unwrap().insert(date);
    }

    pub fn delay_on(&self, date: NaiveDate, delay: Duration) {
        self.slow.lock().unwrap().insert(date, delay);
    }

    pub fn delay_create(&self, delay: Duration) {
        *self.create_delay.lock().unwrap() = Some(delay);
    }

    pub fn push_reply(&self, reply: ClientResult<CreateBookingReply>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn reject_next(&self, status: u16, error_code: Option<&str>, message: &str) {
        self.push_reply(Ok(CreateBookingReply::Rejected {
            status,
            error_code: error_code.map(str::to_string),
            message: message.to_string(),
        }));
    }

    pub fn add_room(&self, room: Room) {
        self.rooms.lock().unwrap().push(room);
    }

    pub fn set_profile(&self, profile: UserProfile) {
        *self.profile.lock().unwrap() = Some(profile);
    }

    pub fn posted(&self) -> Vec<BookingPayload> {
        self.posted.lock().unwrap().clone()
    }

    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }
}

fn accept(payload: &BookingPayload, seq: usize) -> ClientResult<CreateBookingReply> {
    Ok(CreateBookingReply::Accepted(Booking {
        id: format!("bk-{}", seq),
        room_id: payload.room_id.clone(),
        status: BookingStatus::Pending,
        check_in_date: payload.check_in_date,
        check_in_hour: parse_hour_value(&payload.check_in_time)?,
        check_out_date: payload.check_out_date,
        check_out_hour: parse_hour_value(&payload.check_out_time)?,
        total_amount: Money::parse_decimal(&payload.total_amount)?,
    }))
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn booked_hours(&self, room_id: &str, date: NaiveDate) -> ClientResult<Vec<i64>> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.slow.lock().unwrap().get(&date).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(&date) {
            return Err(ClientError::ConnectionFailed(format!("no route for {}", date)));
        }

        Ok(self
            .booked
            .lock()
            .unwrap()
            .get(&(room_id.to_string(), date))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_booking(&self, payload: &BookingPayload) -> ClientResult<CreateBookingReply> {
        let delay = *self.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let seq = {
            let mut posted = self.posted.lock().unwrap();
            posted.push(payload.clone());
            posted.len()
        };

        let queued = self.replies.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| accept(payload, seq))
    }

    async fn list_rooms(&self, branch_id: &str) -> ClientResult<Vec<Room>> {
        Ok(self
            .rooms
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.branch_id == branch_id)
            .cloned()
            .collect())
    }

    async fn list_branches(&self) -> ClientResult<Vec<Branch>> {
        Ok(vec![Branch {
            id: "b-1".into(),
            name: "Staydesk Residency".into(),
            city: Some("Pune".into()),
        }])
    }

    async fn current_user(&self) -> ClientResult<UserProfile> {
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or(ClientError::Unauthorized)
    }
}
