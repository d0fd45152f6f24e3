use crate::admission::AdmissionEngine;
use crate::cancellation::CancellationWindow;
use crate::repository::{BookingRepository, BookingUpdate, StorageError};
use crate::{BookingError, BookingResult};
use chrono::{DateTime, Utc};
use hotell_catalog::{Availability, InventoryLedger, RoomType};
use hotell_shared::{Booking, BookingRequest, BookingSummary, MaskedEmail};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Booking operations on top of a store.
///
/// Every operation that changes occupancy runs while holding the ledger
/// lock, so the inventory check and the store write happen as one step for
/// this process. The ledger is only touched after the store write succeeded.
pub struct BookingService {
    repo: Arc<dyn BookingRepository>,
    engine: AdmissionEngine,
    cancellation: CancellationWindow,
    ledger: Mutex<InventoryLedger>,
}

impl BookingService {
    /// Seed the occupancy ledger from the store. Fails if the scan fails.
    pub async fn open(
        repo: Arc<dyn BookingRepository>,
        engine: AdmissionEngine,
        cancellation: CancellationWindow,
    ) -> BookingResult<Self> {
        let snapshot = repo.scan_room_quantities().await?;
        let ledger = InventoryLedger::from_snapshot(&snapshot);

        info!(
            bookings = ledger.bookings(),
            rooms_booked = ledger.total_booked(),
            room_limit = engine.rules().inventory.total_rooms,
            "Inventory ledger loaded"
        );

        Ok(Self {
            repo,
            engine,
            cancellation,
            ledger: Mutex::new(ledger),
        })
    }

    pub fn room_types(&self) -> &[RoomType] {
        self.engine.catalog().list()
    }

    pub async fn availability(&self) -> Availability {
        let ledger = self.ledger.lock().await;
        ledger.availability(&self.engine.rules().inventory)
    }

    pub async fn create_booking(&self, request: BookingRequest) -> BookingResult<BookingSummary> {
        let mut ledger = self.ledger.lock().await;

        let summary = self.engine.admit(&request, &*ledger, None)?;
        let booking = Booking::from_summary(summary.clone(), Utc::now());

        self.repo.put(&booking).await?;
        ledger.record(&booking.id, &booking.rooms);

        info!(
            booking_id = %booking.id,
            guest = %MaskedEmail(&booking.guest_email),
            rooms = booking.room_count(),
            total_price = booking.total_price,
            "Booking created"
        );
        Ok(summary)
    }

    pub async fn get_booking(&self, id: &str) -> BookingResult<Booking> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }

    pub async fn list_bookings(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.repo.list().await?)
    }

    /// Re-run admission against the new room mix and dates, not counting the
    /// booking's current rooms. Name and e-mail default to the stored values.
    pub async fn update_booking(&self, id: &str, mut request: BookingRequest) -> BookingResult<Booking> {
        let mut ledger = self.ledger.lock().await;

        let current = self.get_booking(id).await?;
        if request.guest_name.is_none() {
            request.guest_name = Some(current.guest_name.clone());
        }
        if request.guest_email.is_none() {
            request.guest_email = Some(current.guest_email.clone());
        }

        let stay = self.engine.assess(&request, &*ledger, Some(id))?;
        let update = BookingUpdate {
            guest_name: stay.guest_name,
            guest_email: stay.guest_email,
            guests: stay.guests,
            rooms: stay.rooms,
            total_price: stay.quote.total_price,
            check_in: stay.check_in,
            check_out: stay.check_out,
            updated_at: Utc::now(),
        };

        let updated = self.repo.update(id, &update).await.map_err(not_found_or_storage)?;
        ledger.record(&updated.id, &updated.rooms);

        info!(
            booking_id = %updated.id,
            rooms = updated.room_count(),
            total_price = updated.total_price,
            "Booking updated"
        );
        Ok(updated)
    }

    /// Delete a booking unless check-in is inside the cancellation window
    pub async fn cancel_booking(&self, id: &str, now: DateTime<Utc>) -> BookingResult<Booking> {
        let mut ledger = self.ledger.lock().await;

        let booking = self.get_booking(id).await?;
        if let Err(err) = self.cancellation.ensure_cancellable(&booking, now) {
            warn!(booking_id = %id, check_in = %booking.check_in, "Cancellation refused inside window");
            return Err(err);
        }

        self.repo.delete(id).await.map_err(not_found_or_storage)?;
        ledger.release(id);

        info!(booking_id = %id, "Booking cancelled");
        Ok(booking)
    }
}

fn not_found_or_storage(err: StorageError) -> BookingError {
    match err {
        StorageError::Missing(id) => BookingError::NotFound(id),
        other => BookingError::Storage(other),
    }
}
