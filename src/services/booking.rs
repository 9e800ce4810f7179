use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::slot;
use crate::models::{Booking, BookingRequest, NewBooking, PaymentMethod};
use crate::services::mail::booking_confirmation;
use crate::state::AppState;

/// Normalizes a submitted form: date to `YYYY-MM-DD`, time label to `HH:MM:SS`.
pub fn normalize(req: &BookingRequest) -> Result<NewBooking, AppError> {
    let date = slot::normalize_date(&req.date)
        .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", req.date)))?;
    let time = slot::parse_label(&req.time)
        .ok_or_else(|| AppError::Validation(format!("Invalid time slot: {}", req.time)))?;
    let payment_method = PaymentMethod::parse(&req.payment_method).ok_or_else(|| {
        AppError::Validation(format!("Unsupported payment method: {}", req.payment_method))
    })?;

    Ok(NewBooking {
        name: req.name.clone(),
        contact_no: req.contact_no.clone(),
        email: req.email.clone(),
        service_type: req.service.clone(),
        date: slot::date_to_storage(&date),
        time: slot::to_storage(&time),
        time_label: req.time.trim().to_string(),
        payment_method,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Writes the customer and booking rows in one transaction. A taken slot is
/// detected by the unique index on (date, time) and reported as
/// `SlotAlreadyBooked`; the customer insert is rolled back with it.
pub fn store_booking(conn: &mut Connection, new: &NewBooking) -> Result<Booking, AppError> {
    let service = queries::find_service(conn, &new.service_type)
        .map_err(AppError::db("fetching service ID"))?
        .ok_or(AppError::ServiceNotFound)?;

    let tx = conn
        .transaction()
        .map_err(AppError::db("starting booking transaction"))?;

    let customer_id = queries::insert_customer(&tx, &new.name, &new.contact_no, &new.email)
        .map_err(AppError::db("inserting customer data"))?;

    let booking_id = match queries::insert_booking(&tx, customer_id, &service, new) {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => return Err(AppError::SlotAlreadyBooked),
        Err(e) => return Err(AppError::db("inserting booking data")(e)),
    };

    let booking = queries::get_booking(&tx, booking_id)
        .map_err(AppError::db("inserting booking data"))?
        .ok_or(AppError::NotFound("Booking"))?;

    tx.commit().map_err(AppError::db("inserting booking data"))?;
    Ok(booking)
}

/// Removes a still-pending booking and the customer row created with it.
/// Returns false, leaving both rows, if the booking was accepted meanwhile.
fn withdraw_booking(conn: &mut Connection, booking: &Booking) -> Result<bool, AppError> {
    let tx = conn
        .transaction()
        .map_err(AppError::db("withdrawing booking"))?;
    if !queries::delete_pending_booking(&tx, booking.id)
        .map_err(AppError::db("withdrawing booking"))?
    {
        return Ok(false);
    }
    queries::delete_customer(&tx, booking.customer_id)
        .map_err(AppError::db("withdrawing booking"))?;
    tx.commit().map_err(AppError::db("withdrawing booking"))?;
    Ok(true)
}

pub async fn submit_booking(state: &AppState, req: &BookingRequest) -> Result<Booking, AppError> {
    let new = normalize(req)?;

    let booking = {
        let mut db = state.db();
        store_booking(&mut db, &new)?
    };

    let email = booking_confirmation(
        &new.email,
        &new.name,
        &new.service_type,
        &new.date,
        &new.time_label,
    );

    if let Err(e) = state.mailer.send(&email).await {
        let mut db = state.db();
        if withdraw_booking(&mut db, &booking)? {
            tracing::warn!(booking_id = booking.id, "confirmation failed, booking withdrawn");
            return Err(AppError::Notification(e));
        }

        // accepted while the mail was in flight; the booking stands
        tracing::warn!(
            booking_id = booking.id,
            error = %e,
            "confirmation failed for an accepted booking, keeping it"
        );
        let current = queries::get_booking(&db, booking.id)
            .map_err(AppError::db("fetching booking"))?
            .unwrap_or(booking);
        return Ok(current);
    }

    tracing::info!(
        booking_id = booking.id,
        date = %booking.date,
        time = %booking.time,
        service = %new.service_type,
        "booking created"
    );

    Ok(booking)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Acceptance {
    Completed { credited: f64 },
    AlreadyCompleted,
}

/// Completes a pending booking and credits its service price to the income
/// counter in the same transaction. Accepting a completed booking changes nothing.
pub fn accept_booking(conn: &mut Connection, id: i64) -> Result<Acceptance, AppError> {
    let tx = conn
        .transaction()
        .map_err(AppError::db("updating booking status"))?;

    let price = queries::booking_price(&tx, id)
        .map_err(AppError::db("fetching service price"))?
        .ok_or(AppError::NotFound("Booking"))?;

    if !queries::mark_completed(&tx, id).map_err(AppError::db("updating booking status"))? {
        return Ok(Acceptance::AlreadyCompleted);
    }

    queries::add_income(&tx, price).map_err(AppError::db("updating total income"))?;
    tx.commit().map_err(AppError::db("updating total income"))?;

    Ok(Acceptance::Completed { credited: price })
}
