use async_trait::async_trait;
use hotell_core::{BookingRepository, BookingUpdate, StorageError};
use hotell_shared::{Booking, BookingRooms};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local booking table. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryBookingRepository {
    bookings: RwLock<HashMap<String, Booking>>,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bookings(bookings: impl IntoIterator<Item = Booking>) -> Self {
        let map = bookings
            .into_iter()
            .map(|booking| (booking.id.clone(), booking))
            .collect();
        Self {
            bookings: RwLock::new(map),
        }
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn scan_room_quantities(&self) -> Result<Vec<BookingRooms>, StorageError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.values().map(Booking::allocation).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Booking>, StorageError> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Booking>, StorageError> {
        let mut all: Vec<Booking> = self.bookings.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn put(&self, booking: &Booking) -> Result<(), StorageError> {
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id.clone(), booking.clone());
        debug!(booking_id = %booking.id, total = bookings.len(), "Stored booking");
        Ok(())
    }

    async fn update(&self, id: &str, update: &BookingUpdate) -> Result<Booking, StorageError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(id)
            .ok_or_else(|| StorageError::Missing(id.to_string()))?;
        update.apply_to(booking);
        Ok(booking.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        match self.bookings.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StorageError::Missing(id.to_string())),
        }
    }
}
