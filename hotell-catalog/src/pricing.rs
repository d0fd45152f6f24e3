use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_NIGHT: i64 = 24 * 60 * 60 * 1000;

/// Number of nights billed for a stay: the length of the stay in days,
/// rounded up. `None` unless `check_out` is strictly after `check_in`.
pub fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Option<u32> {
    let millis = (check_out - check_in).num_milliseconds();
    if millis <= 0 {
        return None;
    }

    let nights = (millis + MILLIS_PER_NIGHT - 1) / MILLIS_PER_NIGHT;
    u32::try_from(nights).ok()
}

/// Price of a stay at a flat nightly rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayQuote {
    pub nightly_price: u64,
    pub nights: u32,
    pub total_price: u64,
}

impl StayQuote {
    pub fn new(nightly_price: u64, nights: u32) -> Self {
        Self {
            nightly_price,
            nights,
            total_price: nightly_price.saturating_mul(u64::from(nights)),
        }
    }
}
