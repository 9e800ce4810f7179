pub mod booking;
pub mod customer;
pub mod service;
pub mod slot;

pub use booking::{
    Booking, BookingListing, BookingRequest, BookingStatus, NewBooking, PaymentMethod, Totals,
};
pub use customer::Customer;
pub use service::Service;
