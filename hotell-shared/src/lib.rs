pub mod models;
pub mod pii;

pub use models::booking::{Booking, BookingRequest, BookingRooms, BookingSummary, RoomRequestLine};
pub use pii::MaskedEmail;
