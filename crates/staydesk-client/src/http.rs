//! HTTP implementation of [`BookingBackend`] over the booking service's
//! JSON REST API.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use staydesk_core::{Booking, Branch, Room, UserProfile};

use crate::backend::{
    BookedSlotsResponse, BookingBackend, BookingPayload, CreateBookingReply,
    rooms_from_dtos, CreateBookingResponse, ErrorResponse, RoomDto,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Booking service client.
///
/// Holds no per-request deadline of its own: callers wrap each call in
/// `tokio::time::timeout` so availability and submission can use different
/// budgets.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: Url::parse(config.base_url())?,
            token: config.api.token.clone(),
        })
    }

    /// Sets the bearer token of the signed-in user.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Builds `{base_url}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        debug!(%url, "GET");
        let mut request = self.client.get(url);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                _ => Err(ClientError::Http {
                    status: status.as_u16(),
                    message: error_message(status.as_u16(), &text),
                }),
            };
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}

#[async_trait]
impl BookingBackend for HttpBackend {
    async fn booked_hours(&self, room_id: &str, date: NaiveDate) -> ClientResult<Vec<i64>> {
        let mut url = self.endpoint(&["rooms", room_id, "booked-slots"])?;
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string());

        let body: BookedSlotsResponse = self.get(url).await?;
        Ok(body.booked_hours)
    }

    async fn create_booking(&self, payload: &BookingPayload) -> ClientResult<CreateBookingReply> {
        let url = self.endpoint(&["bookings"])?;
        let request_id = Uuid::new_v4();
        debug!(%url, %request_id, room_id = %payload.room_id, "POST booking");

        let mut request = self
            .client
            .post(url)
            .header("X-Request-Id", request_id.to_string())
            .json(payload);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if is_success(status) => {
                warn!(%request_id, status, error = %e, "Booking accepted but body was lost");
                return Ok(CreateBookingReply::AcceptedUnreadable {
                    status,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let reply = interpret_create_reply(status, &body);
        if let Ok(CreateBookingReply::AcceptedUnreadable { reason, .. }) = &reply {
            warn!(%request_id, status, reason = %reason, "Unreadable booking confirmation");
        }
        reply
    }

    async fn list_rooms(&self, branch_id: &str) -> ClientResult<Vec<Room>> {
        let mut url = self.endpoint(&["rooms"])?;
        url.query_pairs_mut().append_pair("branchId", branch_id);

        let rooms: Vec<RoomDto> = self.get(url).await?;
        Ok(rooms_from_dtos(rooms))
    }

    async fn list_branches(&self) -> ClientResult<Vec<Branch>> {
        self.get(self.endpoint(&["branches"])?).await
    }

    async fn current_user(&self) -> ClientResult<UserProfile> {
        self.get(self.endpoint(&["me"])?).await
    }
}

/// Reads the body of a `POST /bookings` response.
///
/// A 2xx always means the booking exists: a body that cannot be read
/// becomes [`CreateBookingReply::AcceptedUnreadable`], never an error.
/// Any non-success status other than 401 becomes a
/// [`CreateBookingReply::Rejected`]; the submitter decides what it means.
pub fn interpret_create_reply(status: u16, body: &str) -> ClientResult<CreateBookingReply> {
    if is_success(status) {
        return Ok(match read_accepted(body) {
            Ok(booking) => CreateBookingReply::Accepted(booking),
            Err(e) => CreateBookingReply::AcceptedUnreadable {
                status,
                reason: e.to_string(),
            },
        });
    }

    if status == StatusCode::UNAUTHORIZED.as_u16() {
        return Err(ClientError::Unauthorized);
    }

    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
    Ok(CreateBookingReply::Rejected {
        status,
        error_code: parsed.error_code,
        message: parsed
            .message
            .unwrap_or_else(|| error_message(status, body)),
    })
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn read_accepted(body: &str) -> ClientResult<Booking> {
    let parsed: CreateBookingResponse = serde_json::from_str(body)?;
    parsed.booking.into_booking()
}

/// Prefers the service's `message` field, then the raw body, then the
/// status reason.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(ErrorResponse { message: Some(message), .. }) = serde_json::from_str::<ErrorResponse>(body) {
        return message;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use staydesk_core::Money;

    fn backend(base: &str) -> HttpBackend {
        let mut config = ClientConfig::default();
        config.api.base_url = base.to_string();
        HttpBackend::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_and_encodes_segments() {
        let http = backend("https://api.example-hotel.in/v1/");
        let url = http.endpoint(&["rooms", "deluxe 204", "booked-slots"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example-hotel.in/v1/rooms/deluxe%20204/booked-slots"
        );

        let http = backend("http://localhost:8080/api");
        assert_eq!(
            http.endpoint(&["bookings"]).unwrap().as_str(),
            "http://localhost:8080/api/bookings"
        );
    }

    #[test]
    fn test_auth_header() {
        let http = backend("http://localhost:8080/api");
        assert!(http.auth_header().is_none());
        let http = http.with_token("abc");
        assert_eq!(http.auth_header().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn test_interpret_accepted_booking() {
        let body = r#"{"booking":{"id":"bk-7","roomId":"r-204","status":"pending",
            "checkInDate":"2026-11-02","checkInTime":"14:00",
            "checkOutDate":"2026-11-04","checkOutTime":"11:00","totalAmount":"18880.00"}}"#;

        match interpret_create_reply(201, body).unwrap() {
            CreateBookingReply::Accepted(booking) => {
                assert_eq!(booking.id, "bk-7");
                assert_eq!(booking.total_amount, Money::from_major(18880));
            }
            other => panic!("expected accepted booking, got {:?}", other),
        }
    }

    #[test]
    fn test_interpret_slot_conflict() {
        let body = r#"{"errorCode":"SLOT_CONFLICT","message":"Hour 14 is already booked"}"#;
        let reply = interpret_create_reply(409, body).unwrap();
        assert_eq!(
            reply,
            CreateBookingReply::Rejected {
                status: 409,
                error_code: Some("SLOT_CONFLICT".into()),
                message: "Hour 14 is already booked".into(),
            }
        );
    }

    #[test]
    fn test_interpret_non_json_error_body() {
        let reply = interpret_create_reply(502, "Bad Gateway from upstream").unwrap();
        assert_eq!(
            reply,
            CreateBookingReply::Rejected {
                status: 502,
                error_code: None,
                message: "Bad Gateway from upstream".into(),
            }
        );

        match interpret_create_reply(503, "").unwrap() {
            CreateBookingReply::Rejected { message, .. } => {
                assert_eq!(message, "Service Unavailable")
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_interpret_unauthorized_and_garbage() {
        assert!(matches!(
            interpret_create_reply(401, ""),
            Err(ClientError::Unauthorized)
        ));
        assert!(matches!(
            interpret_create_reply(200, "<html>"),
            Ok(CreateBookingReply::AcceptedUnreadable { status: 200, .. })
        ));
    }

    #[test]
    fn test_interpret_accepted_with_float_total() {
        let body = r#"{"booking":{"id":"bk-8","roomId":"r-204","status":"confirmed",
            "checkInDate":"2026-11-02","checkInTime":"14:00",
            "checkOutDate":"2026-11-05","checkOutTime":"11:00","totalAmount":16800.000000000004}}"#;

        match interpret_create_reply(201, body).unwrap() {
            CreateBookingReply::Accepted(booking) => {
                assert_eq!(booking.total_amount, Money::from_major(16800))
            }
            other => panic!("expected accepted booking, got {:?}", other),
        }
    }

    #[test]
    fn test_interpret_accepted_but_unreadable() {
        let half_hour = r#"{"booking":{"id":"bk-9","roomId":"r-204","status":"pending",
            "checkInDate":"2026-11-02","checkInTime":"14:30",
            "checkOutDate":"2026-11-04","checkOutTime":"11:00","totalAmount":"18880.00"}}"#;
        let missing_total = r#"{"booking":{"id":"bk-9","roomId":"r-204",
            "checkInDate":"2026-11-02","checkInTime":"14:00",
            "checkOutDate":"2026-11-04","checkOutTime":"11:00"}}"#;

        for body in [half_hour, missing_total] {
            match interpret_create_reply(201, body).unwrap() {
                CreateBookingReply::AcceptedUnreadable { status, reason } => {
                    assert_eq!(status, 201);
                    assert!(!reason.is_empty());
                }
                other => panic!("expected unreadable acceptance, got {:?}", other),
            }
        }
    }
}
