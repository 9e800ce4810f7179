use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub customer_id: i64,
    pub service_id: i64,
    pub staff_id: i64,
    pub name: String,
    pub contact_no: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
    pub created_at: String,
}

/// A booking joined with its customer, service and staff, as listed to the admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListing {
    pub id: i64,
    pub customer_name: String,
    pub contact_no: String,
    pub service_type: String,
    pub staff_name: String,
    pub service_price: f64,
    pub date: String,
    pub time: String,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Completed" => BookingStatus::Completed,
            _ => BookingStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    PayInStore,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::PayInStore => "pay_in_store",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pay_in_store" => Some(PaymentMethod::PayInStore),
            _ => None,
        }
    }
}

/// The booking form as submitted by a client. Fields are free text until
/// normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub payment_method: String,
    pub email: String,
    pub contact_no: String,
}

/// A validated booking ready to be written: date and time are already in
/// storage form.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub contact_no: String,
    pub email: String,
    pub service_type: String,
    pub date: String,
    pub time: String,
    /// The slot label as the customer picked it, used in the confirmation.
    pub time_label: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_bookings: i64,
    pub total_income: f64,
}
