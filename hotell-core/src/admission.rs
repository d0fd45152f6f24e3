use crate::identity::BookingIdSource;
use crate::{BookingError, BookingResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use hotell_catalog::{nights_between, InventoryPolicy, OccupancySnapshot, RoomCatalog, RoomDemand, StayQuote};
use hotell_shared::{BookingRequest, BookingSummary, RoomRequestLine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// What to do with a room line whose type code is not in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRoomTypePolicy {
    #[default]
    Reject,
    /// Skip the line: it adds no capacity, no price and no rooms
    Ignore,
}

#[derive(Debug, Clone, Default)]
pub struct AdmissionRules {
    pub inventory: InventoryPolicy,
    pub unknown_room_types: UnknownRoomTypePolicy,
}

/// A request that passed validation, pricing and the inventory check but has
/// no identifier yet
#[derive(Debug, Clone, PartialEq)]
pub struct AssessedStay {
    pub guest_name: String,
    pub guest_email: String,
    pub guests: u32,
    pub rooms: Vec<RoomRequestLine>,
    pub quote: StayQuote,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

impl AssessedStay {
    pub fn into_summary(self, booking_id: String) -> BookingSummary {
        BookingSummary {
            booking_id,
            guest_name: self.guest_name,
            guest_email: self.guest_email,
            guests: self.guests,
            rooms: self.rooms,
            nightly_price: self.quote.nightly_price,
            nights: self.quote.nights,
            total_price: self.quote.total_price,
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }
}

/// Decides whether a booking request is admitted.
///
/// Pure with respect to its inputs: the occupancy snapshot is supplied by the
/// caller and nothing is written. Checks run in a fixed order and the first
/// failure is returned.
pub struct AdmissionEngine {
    catalog: Arc<RoomCatalog>,
    rules: AdmissionRules,
    ids: Arc<dyn BookingIdSource>,
}

impl AdmissionEngine {
    pub fn new(catalog: Arc<RoomCatalog>, rules: AdmissionRules, ids: Arc<dyn BookingIdSource>) -> Self {
        Self { catalog, rules, ids }
    }

    pub fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &AdmissionRules {
        &self.rules
    }

    /// Validate, price and admit a new booking, assigning it a fresh id
    pub fn admit<S>(&self, request: &BookingRequest, existing: &S, exclude_id: Option<&str>) -> BookingResult<BookingSummary>
    where
        S: OccupancySnapshot + ?Sized,
    {
        let stay = self.assess(request, existing, exclude_id)?;
        Ok(stay.into_summary(self.ids.next_id()))
    }

    /// Every admission check except identifier assignment. Used directly by
    /// updates, which keep their id.
    pub fn assess<S>(&self, request: &BookingRequest, existing: &S, exclude_id: Option<&str>) -> BookingResult<AssessedStay>
    where
        S: OccupancySnapshot + ?Sized,
    {
        let fields = RequiredFields::extract(request)?;

        let tally = self.tally(fields.rooms)?;
        if tally.capacity != fields.guests {
            return Err(BookingError::CapacityMismatch {
                guests: fields.guests,
                room_capacity: tally.capacity,
            });
        }

        let check_in = parse_stay_date(fields.check_in)
            .ok_or_else(|| BookingError::InvalidDate(fields.check_in.to_string()))?;
        let check_out = parse_stay_date(fields.check_out)
            .ok_or_else(|| BookingError::InvalidDate(fields.check_out.to_string()))?;

        let nights = nights_between(check_in, check_out).ok_or(BookingError::InvalidDateRange)?;
        let quote = StayQuote::new(tally.nightly_price, nights);

        self.rules.inventory.check(existing, &tally.demand, exclude_id)?;

        Ok(AssessedStay {
            guest_name: fields.guest_name.to_string(),
            guest_email: fields.guest_email.to_string(),
            guests: fields.guests,
            rooms: tally.rooms,
            quote,
            check_in,
            check_out,
        })
    }

    fn tally(&self, lines: &[RoomRequestLine]) -> BookingResult<RoomTally> {
        let mut tally = RoomTally::default();

        for line in lines {
            let Some(room_type) = self.catalog.lookup(&line.room_type) else {
                match self.rules.unknown_room_types {
                    UnknownRoomTypePolicy::Reject => {
                        return Err(BookingError::UnknownRoomType(line.room_type.clone()));
                    }
                    UnknownRoomTypePolicy::Ignore => {
                        debug!(room_type = %line.room_type, "Skipping unknown room type");
                        continue;
                    }
                }
            };

            tally.capacity = tally
                .capacity
                .saturating_add(room_type.capacity.saturating_mul(line.quantity));
            tally.nightly_price = tally
                .nightly_price
                .saturating_add(room_type.nightly_price.saturating_mul(u64::from(line.quantity)));
            tally.demand.add(room_type.code.as_str(), line.quantity);
            tally.rooms.push(line.clone());
        }

        Ok(tally)
    }
}

#[derive(Debug, Default)]
struct RoomTally {
    capacity: u32,
    nightly_price: u64,
    demand: RoomDemand,
    // lines that matched the catalog; skipped ones are not stored
    rooms: Vec<RoomRequestLine>,
}

struct RequiredFields<'a> {
    guests: u32,
    rooms: &'a [RoomRequestLine],
    guest_name: &'a str,
    guest_email: &'a str,
    check_in: &'a str,
    check_out: &'a str,
}

impl<'a> RequiredFields<'a> {
    /// Zero guests, an empty room list and blank strings count as missing
    fn extract(request: &'a BookingRequest) -> BookingResult<Self> {
        let guests = request.guests.filter(|guests| *guests > 0);
        let rooms = request.rooms.as_deref().filter(|rooms| !rooms.is_empty());
        let guest_name = non_blank(&request.guest_name);
        let guest_email = non_blank(&request.guest_email);
        let check_in = non_blank(&request.check_in);
        let check_out = non_blank(&request.check_out);

        match (guests, rooms, guest_name, guest_email, check_in, check_out) {
            (Some(guests), Some(rooms), Some(guest_name), Some(guest_email), Some(check_in), Some(check_out)) => {
                Ok(Self {
                    guests,
                    rooms,
                    guest_name,
                    guest_email,
                    check_in,
                    check_out,
                })
            }
            _ => {
                let missing = [
                    ("guests", guests.is_none()),
                    ("rooms", rooms.is_none()),
                    ("name", guest_name.is_none()),
                    ("email", guest_email.is_none()),
                    ("checkInDate", check_in.is_none()),
                    ("checkOutDate", check_out.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(BookingError::MissingFields(missing))
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a stay date. Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS`
/// (taken as UTC) and plain `YYYY-MM-DD` (midnight UTC).
pub fn parse_stay_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
