use hotell_core::BookingService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
}

impl AppState {
    pub fn new(bookings: BookingService) -> Self {
        Self {
            bookings: Arc::new(bookings),
        }
    }
}
