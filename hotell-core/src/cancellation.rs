use crate::{BookingError, BookingResult};
use chrono::{DateTime, Duration, Utc};
use hotell_shared::Booking;

pub const DEFAULT_CANCELLATION_WINDOW_HOURS: i64 = 48;

/// Minimum notice before check-in for a cancellation to be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationWindow {
    min_notice: Duration,
}

impl Default for CancellationWindow {
    fn default() -> Self {
        Self::from_hours(DEFAULT_CANCELLATION_WINDOW_HOURS)
    }
}

impl CancellationWindow {
    pub fn new(min_notice: Duration) -> Self {
        Self { min_notice }
    }

    pub fn from_hours(hours: i64) -> Self {
        Self::new(Duration::hours(hours))
    }

    pub fn can_cancel(&self, booking: &Booking, now: DateTime<Utc>) -> bool {
        booking.check_in - now >= self.min_notice
    }

    pub fn ensure_cancellable(&self, booking: &Booking, now: DateTime<Utc>) -> BookingResult<()> {
        if self.can_cancel(booking, now) {
            Ok(())
        } else {
            Err(BookingError::CancellationWindowViolation {
                window_hours: self.min_notice.num_hours(),
            })
        }
    }
}

/// Cancellation is allowed only when check-in is at least two days away
pub fn can_cancel(booking: &Booking, now: DateTime<Utc>) -> bool {
    CancellationWindow::default().can_cancel(booking, now)
}
