pub mod log_only;
pub mod relay;

use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> anyhow::Result<()>;
}

/// Confirmation sent after a booking is stored. `time_label` is the slot as the
/// customer picked it, not the stored 24-hour form.
pub fn booking_confirmation(
    to: &str,
    name: &str,
    service: &str,
    date: &str,
    time_label: &str,
) -> Email {
    Email {
        to: to.to_string(),
        subject: "Booking Confirmation".to_string(),
        text: format!(
            "Dear {name},\n\nYour booking for {service} on {date} at {time_label} has been confirmed.\n\nThank you for choosing us!\n\nBest regards,\nYour Barbershop"
        ),
    }
}
