pub mod admission;
pub mod cancellation;
pub mod identity;
pub mod repository;
pub mod service;

use hotell_catalog::{scope_suffix, InventoryError, RoomTypeCode};

pub use admission::{AdmissionEngine, AdmissionRules, AssessedStay, UnknownRoomTypePolicy};
pub use cancellation::{can_cancel, CancellationWindow};
pub use identity::{BookingIdSource, SequenceIdSource, UuidIdSource};
pub use repository::{BookingRepository, BookingUpdate, StorageError};
pub use service::BookingService;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Unknown room type: {0}")]
    UnknownRoomType(String),

    #[error("Room capacity does not match number of guests: {room_capacity} beds for {guests} guests")]
    CapacityMismatch { guests: u32, room_capacity: u32 },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Check-out date must be after check-in date")]
    InvalidDateRange,

    #[error("Not enough rooms available{scope}: {current} booked, {requested} requested, limit {limit}", scope = scope_suffix(.room_type))]
    InventoryExceeded {
        current: u32,
        requested: u32,
        limit: u32,
        room_type: Option<RoomTypeCode>,
    },

    #[error("Bookings can only be cancelled at least {window_hours} hours before check-in")]
    CancellationWindowViolation { window_hours: i64 },

    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl BookingError {
    /// Stable machine-readable code, one per kind
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::MissingFields(_) => "MissingFields",
            BookingError::UnknownRoomType(_) => "UnknownRoomType",
            BookingError::CapacityMismatch { .. } => "CapacityMismatch",
            BookingError::InvalidDate(_) => "InvalidDate",
            BookingError::InvalidDateRange => "InvalidDateRange",
            BookingError::InventoryExceeded { .. } => "InventoryExceeded",
            BookingError::CancellationWindowViolation { .. } => "CancellationWindowViolation",
            BookingError::NotFound(_) => "NotFound",
            BookingError::Storage(_) => "StorageError",
        }
    }

    /// True for rejections of the request itself, as opposed to store failures
    /// or conflicts with current state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::MissingFields(_)
                | BookingError::UnknownRoomType(_)
                | BookingError::CapacityMismatch { .. }
                | BookingError::InvalidDate(_)
                | BookingError::InvalidDateRange
        )
    }
}

impl From<InventoryError> for BookingError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Exceeded {
                current,
                requested,
                limit,
                room_type,
            } => BookingError::InventoryExceeded {
                current,
                requested,
                limit,
                room_type,
            },
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
