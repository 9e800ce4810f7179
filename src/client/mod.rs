//! HTTP client for the booking API, plus the draft the booking form fills in.

pub mod draft;

use chrono::NaiveDate;
use serde_json::json;

pub use draft::{BookingDraft, DraftError, SlotBoard};

use crate::handlers::bookings::SubmitBookingResponse;
use crate::models::{slot, Service};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("incomplete booking: {0}")]
    Draft(#[from] DraftError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
}

pub struct BookingClient {
    base_url: String,
    client: reqwest::Client,
}

impl BookingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body: serde_json::Value = resp.json().await.unwrap_or_default();
        let message = body["error"]
            .as_str()
            .unwrap_or("an error occurred")
            .to_string();
        tracing::error!(status = status.as_u16(), %message, "booking API error");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn services(&self, service_type: Option<&str>) -> Result<Vec<Service>, ClientError> {
        let mut req = self.client.get(format!("{}/services", self.base_url));
        if let Some(service_type) = service_type {
            req = req.query(&[("serviceType", service_type)]);
        }
        let resp = Self::check(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    /// Slot labels already taken on `date`.
    pub async fn booked_times(&self, date: NaiveDate) -> Result<Vec<String>, ClientError> {
        let resp = self
            .client
            .post(format!("{}/booked-times", self.base_url))
            .json(&json!({ "date": slot::date_to_storage(&date) }))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn slot_board(&self, date: NaiveDate) -> Result<SlotBoard, ClientError> {
        let booked = self.booked_times(date).await?;
        Ok(SlotBoard::new(date, &booked))
    }

    pub async fn submit(&self, draft: &BookingDraft) -> Result<SubmitBookingResponse, ClientError> {
        let body = draft.submission()?;
        tracing::debug!(?body, "submitting booking");

        let resp = self
            .client
            .post(format!("{}/submit-booking", self.base_url))
            .json(&body)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let created: SubmitBookingResponse = resp.json().await?;

        tracing::info!(booking_id = created.booking.id, "booking submitted");
        Ok(created)
    }
}
