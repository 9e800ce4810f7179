use chrono::NaiveDate;

use crate::models::slot;
use crate::models::{BookingRequest, PaymentMethod};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must not be blank")]
    Blank(&'static str),
}

/// Availability of every slot on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBoard {
    date: NaiveDate,
    slots: Vec<(String, bool)>,
}

impl SlotBoard {
    /// `booked` is the list returned by the availability query for `date`.
    pub fn new(date: NaiveDate, booked: &[String]) -> Self {
        let slots = slot::slot_labels()
            .into_iter()
            .map(|label| {
                let taken = booked.iter().any(|b| b == &label);
                (label, taken)
            })
            .collect();
        Self { date, slots }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_booked(&self, label: &str) -> bool {
        self.slots.iter().any(|(l, taken)| l == label && *taken)
    }

    pub fn is_selectable(&self, label: &str) -> bool {
        self.slots.iter().any(|(l, taken)| l == label && !*taken)
    }

    pub fn available(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|(_, taken)| !taken)
            .map(|(l, _)| l.as_str())
    }

    /// Slots in display order with their booked flag.
    pub fn slots(&self) -> impl Iterator<Item = (&str, bool)> {
        self.slots.iter().map(|(l, taken)| (l.as_str(), *taken))
    }
}

/// The booking form as it moves through the service, customer and
/// date/time/payment steps. Each step returns a new draft; nothing is checked
/// until [`BookingDraft::submission`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    service: Option<String>,
    name: Option<String>,
    email: Option<String>,
    contact_no: Option<String>,
    date: Option<NaiveDate>,
    time: Option<String>,
    payment_method: Option<PaymentMethod>,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(self, service: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            ..self
        }
    }

    pub fn with_customer(
        self,
        name: impl Into<String>,
        email: impl Into<String>,
        contact_no: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            contact_no: Some(contact_no.into()),
            ..self
        }
    }

    /// Changing the date drops the selected time, which belonged to the old date.
    pub fn with_date(self, date: NaiveDate) -> Self {
        let time = if self.date == Some(date) { self.time } else { None };
        Self {
            date: Some(date),
            time,
            ..self
        }
    }

    /// Picks a slot from `board`. Booked or unknown slots, or a board for
    /// another date, leave the draft unchanged.
    pub fn select_time(self, board: &SlotBoard, label: &str) -> Self {
        if self.date != Some(board.date()) || !board.is_selectable(label) {
            return self;
        }
        Self {
            time: Some(label.to_string()),
            ..self
        }
    }

    pub fn with_payment(self, payment_method: PaymentMethod) -> Self {
        Self {
            payment_method: Some(payment_method),
            ..self
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.submission().is_ok()
    }

    /// Validates the whole draft and produces the request body.
    pub fn submission(&self) -> Result<BookingRequest, DraftError> {
        fn text(value: &Option<String>, field: &'static str) -> Result<String, DraftError> {
            let value = value.as_deref().ok_or(DraftError::Missing(field))?;
            if value.trim().is_empty() {
                return Err(DraftError::Blank(field));
            }
            Ok(value.trim().to_string())
        }

        let service = text(&self.service, "service")?;
        let name = text(&self.name, "name")?;
        let email = text(&self.email, "email")?;
        let contact_no = text(&self.contact_no, "contact number")?;
        let date = self.date.ok_or(DraftError::Missing("date"))?;
        let time = self.time.clone().ok_or(DraftError::Missing("time"))?;
        let payment_method = self
            .payment_method
            .ok_or(DraftError::Missing("payment method"))?;

        Ok(BookingRequest {
            name,
            service,
            date: slot::date_to_storage(&date),
            time,
            payment_method: payment_method.as_str().to_string(),
            email,
            contact_no,
        })
    }
}
