use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{slot, BookingListing, BookingRequest, BookingStatus};
use crate::services::booking::{self, Acceptance};
use crate::state::AppState;

// GET /bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookingListing>>, AppError> {
    let db = state.db();
    let bookings = queries::list_bookings(&db).map_err(AppError::db("retrieving bookings"))?;
    Ok(Json(bookings))
}

// POST /submit-booking
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitBookingResponse {
    pub message: String,
    pub booking: CreatedBooking,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedBooking {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub status: BookingStatus,
}

pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<SubmitBookingResponse>), AppError> {
    let created = booking::submit_booking(&state, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitBookingResponse {
            message: "Booking created successfully, confirmation email sent".to_string(),
            booking: CreatedBooking {
                id: created.id,
                date: created.date,
                time: created.time,
                status: created.status,
            },
        }),
    ))
}

// POST /booked-times
#[derive(Deserialize)]
pub struct BookedTimesRequest {
    pub date: String,
}

pub async fn booked_times(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookedTimesRequest>,
) -> Result<Json<Vec<String>>, AppError> {
    tracing::debug!(date = %req.date, "booked times requested");

    let Some(date) = slot::normalize_date(&req.date) else {
        return Ok(Json(vec![]));
    };

    let times = {
        let db = state.db();
        queries::booked_times(&db, &slot::date_to_storage(&date))
            .map_err(AppError::db("fetching booked times"))?
    };

    Ok(Json(times.iter().map(|t| slot::storage_to_label(t)).collect()))
}

// PUT /bookings/accept/:id
pub async fn accept_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = {
        let mut db = state.db();
        booking::accept_booking(&mut db, id)?
    };

    let message = match outcome {
        Acceptance::Completed { credited } => {
            tracing::info!(booking_id = id, credited, "booking accepted");
            "Booking status updated successfully"
        }
        Acceptance::AlreadyCompleted => "Booking is already completed",
    };

    Ok(Json(serde_json::json!({ "message": message })))
}

// DELETE /bookings/delete/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = {
        let db = state.db();
        queries::delete_booking(&db, id).map_err(AppError::db("deleting booking"))?
    };

    if !deleted {
        return Err(AppError::NotFound("Booking"));
    }

    tracing::info!(booking_id = id, "booking deleted");
    Ok(Json(serde_json::json!({ "message": "Booking deleted successfully" })))
}
