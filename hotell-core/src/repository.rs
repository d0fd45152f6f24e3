use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hotell_shared::{Booking, BookingRooms, RoomRequestLine};
use std::error::Error;

/// Failure reported by a booking store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("booking {0} does not exist in the store")]
    Missing(String),

    #[error("{0}")]
    Backend(#[source] Box<dyn Error + Send + Sync>),
}

impl StorageError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        StorageError::Backend(err.into())
    }
}

/// Fields replaced by an update. Id and creation time stay as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingUpdate {
    pub guest_name: String,
    pub guest_email: String,
    pub guests: u32,
    pub rooms: Vec<RoomRequestLine>,
    pub total_price: u64,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingUpdate {
    pub fn apply_to(&self, booking: &mut Booking) {
        booking.guest_name = self.guest_name.clone();
        booking.guest_email = self.guest_email.clone();
        booking.guests = self.guests;
        booking.rooms = self.rooms.clone();
        booking.total_price = self.total_price;
        booking.check_in = self.check_in;
        booking.check_out = self.check_out;
        booking.updated_at = self.updated_at;
    }
}

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Room mix of every stored booking
    async fn scan_room_quantities(&self) -> Result<Vec<BookingRooms>, StorageError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Booking>, StorageError>;

    /// All bookings, oldest first
    async fn list(&self) -> Result<Vec<Booking>, StorageError>;

    async fn put(&self, booking: &Booking) -> Result<(), StorageError>;

    /// Returns the stored record after the update, or `StorageError::Missing`
    async fn update(&self, id: &str, update: &BookingUpdate) -> Result<Booking, StorageError>;

    /// `StorageError::Missing` if nothing was deleted
    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}
