use crate::room_type::RoomTypeCode;
use hotell_shared::{BookingRooms, RoomRequestLine};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Rooms the hotel can have booked at the same time, across all types
pub const DEFAULT_ROOM_LIMIT: u32 = 20;

/// Read access to the rooms held by current bookings.
///
/// `exclude` names a booking whose rooms must not be counted, which is how an
/// update avoids counting its own previous allocation twice.
pub trait OccupancySnapshot {
    fn booked_rooms(&self, exclude: Option<&str>) -> u32;

    fn booked_rooms_of_type(&self, room_type: &str, exclude: Option<&str>) -> u32;
}

/// A full scan of the booking table
impl OccupancySnapshot for [BookingRooms] {
    fn booked_rooms(&self, exclude: Option<&str>) -> u32 {
        self.iter()
            .filter(|booking| Some(booking.booking_id.as_str()) != exclude)
            .flat_map(|booking| booking.rooms.iter())
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    fn booked_rooms_of_type(&self, room_type: &str, exclude: Option<&str>) -> u32 {
        self.iter()
            .filter(|booking| Some(booking.booking_id.as_str()) != exclude)
            .flat_map(|booking| booking.rooms.iter())
            .filter(|line| line.room_type == room_type)
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }
}

/// Room quantities, in total and per type code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDemand {
    pub total: u32,
    pub by_type: BTreeMap<String, u32>,
}

impl RoomDemand {
    pub fn from_lines(lines: &[RoomRequestLine]) -> Self {
        let mut demand = Self::default();
        for line in lines {
            demand.add(&line.room_type, line.quantity);
        }
        demand
    }

    pub fn add(&mut self, room_type: &str, quantity: u32) {
        self.total = self.total.saturating_add(quantity);
        let entry = self.by_type.entry(room_type.to_string()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    fn subtract(&mut self, other: &RoomDemand) {
        self.total = self.total.saturating_sub(other.total);
        for (room_type, quantity) in &other.by_type {
            if let Some(entry) = self.by_type.get_mut(room_type) {
                *entry = entry.saturating_sub(*quantity);
                if *entry == 0 {
                    self.by_type.remove(room_type);
                }
            }
        }
    }

    pub fn of_type(&self, room_type: &str) -> u32 {
        self.by_type.get(room_type).copied().unwrap_or(0)
    }
}

/// Inventory caps: one global limit plus optional per-type limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryPolicy {
    pub total_rooms: u32,
    pub per_type: BTreeMap<RoomTypeCode, u32>,
}

impl Default for InventoryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_LIMIT)
    }
}

impl InventoryPolicy {
    pub fn new(total_rooms: u32) -> Self {
        Self {
            total_rooms,
            per_type: BTreeMap::new(),
        }
    }

    pub fn with_type_limit(mut self, code: RoomTypeCode, limit: u32) -> Self {
        self.per_type.insert(code, limit);
        self
    }

    /// Check that `demand` fits on top of what `snapshot` already holds.
    /// The global cap is checked first, then each capped type in code order.
    pub fn check<S>(&self, snapshot: &S, demand: &RoomDemand, exclude: Option<&str>) -> Result<(), InventoryError>
    where
        S: OccupancySnapshot + ?Sized,
    {
        let current = snapshot.booked_rooms(exclude);
        if current.saturating_add(demand.total) > self.total_rooms {
            return Err(InventoryError::Exceeded {
                current,
                requested: demand.total,
                limit: self.total_rooms,
                room_type: None,
            });
        }

        for (code, limit) in &self.per_type {
            let requested = demand.of_type(code.as_str());
            if requested == 0 {
                continue;
            }

            let current = snapshot.booked_rooms_of_type(code.as_str(), exclude);
            if current.saturating_add(requested) > *limit {
                return Err(InventoryError::Exceeded {
                    current,
                    requested,
                    limit: *limit,
                    room_type: Some(*code),
                });
            }
        }

        Ok(())
    }
}

/// Occupancy aggregate kept up to date as bookings are written, so that
/// admission never has to rescan the booking table.
#[derive(Debug, Default)]
pub struct InventoryLedger {
    allocations: HashMap<String, RoomDemand>,
    totals: RoomDemand,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: &[BookingRooms]) -> Self {
        let mut ledger = Self::new();
        for booking in snapshot {
            ledger.record(&booking.booking_id, &booking.rooms);
        }
        ledger
    }

    /// Record the rooms held by a booking, replacing any previous allocation
    pub fn record(&mut self, booking_id: &str, rooms: &[RoomRequestLine]) {
        self.release(booking_id);

        let demand = RoomDemand::from_lines(rooms);
        self.totals.total = self.totals.total.saturating_add(demand.total);
        for (room_type, quantity) in &demand.by_type {
            let entry = self.totals.by_type.entry(room_type.clone()).or_insert(0);
            *entry = entry.saturating_add(*quantity);
        }
        self.allocations.insert(booking_id.to_string(), demand);
    }

    /// Drop a booking's allocation. Returns false if it was not tracked.
    pub fn release(&mut self, booking_id: &str) -> bool {
        match self.allocations.remove(booking_id) {
            Some(demand) => {
                self.totals.subtract(&demand);
                true
            }
            None => false,
        }
    }

    pub fn total_booked(&self) -> u32 {
        self.totals.total
    }

    pub fn booked_of_type(&self, room_type: &str) -> u32 {
        self.totals.of_type(room_type)
    }

    pub fn bookings(&self) -> usize {
        self.allocations.len()
    }

    pub fn availability(&self, policy: &InventoryPolicy) -> Availability {
        let booked = self.total_booked();
        let per_type = RoomTypeCode::ALL
            .into_iter()
            .map(|code| {
                let booked = self.booked_of_type(code.as_str());
                let limit = policy.per_type.get(&code).copied();
                TypeAvailability {
                    room_type: code,
                    booked,
                    limit,
                    remaining: limit.map(|limit| limit.saturating_sub(booked)),
                }
            })
            .collect();

        Availability {
            limit: policy.total_rooms,
            booked,
            remaining: policy.total_rooms.saturating_sub(booked),
            per_type,
        }
    }

    fn own(&self, exclude: Option<&str>) -> Option<&RoomDemand> {
        exclude.and_then(|id| self.allocations.get(id))
    }
}

impl OccupancySnapshot for InventoryLedger {
    fn booked_rooms(&self, exclude: Option<&str>) -> u32 {
        let own = self.own(exclude).map_or(0, |demand| demand.total);
        self.totals.total.saturating_sub(own)
    }

    fn booked_rooms_of_type(&self, room_type: &str, exclude: Option<&str>) -> u32 {
        let own = self.own(exclude).map_or(0, |demand| demand.of_type(room_type));
        self.totals.of_type(room_type).saturating_sub(own)
    }
}

/// Occupancy report for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub limit: u32,
    pub booked: u32,
    pub remaining: u32,
    pub per_type: Vec<TypeAvailability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAvailability {
    pub room_type: RoomTypeCode,
    pub booked: u32,
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Not enough rooms available{scope}: {current} booked, {requested} requested, limit {limit}", scope = scope_suffix(.room_type))]
    Exceeded {
        current: u32,
        requested: u32,
        limit: u32,
        room_type: Option<RoomTypeCode>,
    },
}

/// `" for suite rooms"` for a per-type cap, empty for the global one
pub fn scope_suffix(room_type: &Option<RoomTypeCode>) -> String {
    match room_type {
        Some(code) => format!(" for {} rooms", code),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: &str, rooms: &[(&str, u32)]) -> BookingRooms {
        BookingRooms {
            booking_id: id.to_string(),
            rooms: rooms.iter().map(|(t, q)| RoomRequestLine::new(*t, *q)).collect(),
        }
    }

    fn demand(rooms: &[(&str, u32)]) -> RoomDemand {
        let lines: Vec<RoomRequestLine> = rooms.iter().map(|(t, q)| RoomRequestLine::new(*t, *q)).collect();
        RoomDemand::from_lines(&lines)
    }

    #[test]
    fn test_scan_counts_and_exclusion() {
        let scan = vec![
            booking("a", &[("single", 2), ("double", 1)]),
            booking("b", &[("suite", 4)]),
        ];

        assert_eq!(scan.booked_rooms(None), 7);
        assert_eq!(scan.booked_rooms(Some("b")), 3);
        assert_eq!(scan.booked_rooms_of_type("single", None), 2);
        assert_eq!(scan.booked_rooms_of_type("suite", Some("b")), 0);
    }

    #[test]
    fn test_global_cap_boundary() {
        let policy = InventoryPolicy::default();
        let scan = vec![booking("a", &[("double", 12)]), booking("b", &[("single", 3)])];

        // 15 booked, 5 remain
        assert!(policy.check(&scan[..], &demand(&[("single", 5)]), None).is_ok());

        let err = policy.check(&scan[..], &demand(&[("single", 6)]), None).unwrap_err();
        assert_eq!(
            err,
            InventoryError::Exceeded { current: 15, requested: 6, limit: 20, room_type: None }
        );
    }

    #[test]
    fn test_per_type_cap() {
        let policy = InventoryPolicy::default().with_type_limit(RoomTypeCode::Suite, 2);
        let scan = vec![booking("a", &[("suite", 2)])];

        let err = policy.check(&scan[..], &demand(&[("suite", 1)]), None).unwrap_err();
        assert_eq!(
            err,
            InventoryError::Exceeded {
                current: 2,
                requested: 1,
                limit: 2,
                room_type: Some(RoomTypeCode::Suite)
            }
        );
        assert_eq!(
            err.to_string(),
            "Not enough rooms available for suite rooms: 2 booked, 1 requested, limit 2"
        );

        // other types are not affected by the suite limit
        assert!(policy.check(&scan[..], &demand(&[("double", 3)]), None).is_ok());
        // an update of booking "a" does not count its own suites
        assert!(policy.check(&scan[..], &demand(&[("suite", 2)]), Some("a")).is_ok());
    }

    #[test]
    fn test_ledger_lifecycle() {
        let mut ledger = InventoryLedger::from_snapshot(&[
            booking("a", &[("single", 2)]),
            booking("b", &[("double", 3), ("single", 1)]),
        ]);
        assert_eq!(ledger.total_booked(), 6);
        assert_eq!(ledger.booked_of_type("single"), 3);

        // re-recording replaces the previous allocation
        ledger.record("a", &[RoomRequestLine::new("suite", 1)]);
        assert_eq!(ledger.total_booked(), 5);
        assert_eq!(ledger.booked_of_type("single"), 1);
        assert_eq!(ledger.booked_rooms(Some("b")), 1);

        assert!(ledger.release("b"));
        assert!(!ledger.release("b"));
        assert_eq!(ledger.total_booked(), 1);
        assert_eq!(ledger.bookings(), 1);
    }

    #[test]
    fn test_ledger_agrees_with_scan() {
        let scan = vec![
            booking("a", &[("single", 2), ("single", 1)]),
            booking("b", &[("suite", 4)]),
        ];
        let ledger = InventoryLedger::from_snapshot(&scan);

        for exclude in [None, Some("a"), Some("b"), Some("missing")] {
            assert_eq!(ledger.booked_rooms(exclude), scan.booked_rooms(exclude));
            for code in RoomTypeCode::ALL {
                assert_eq!(
                    ledger.booked_rooms_of_type(code.as_str(), exclude),
                    scan.booked_rooms_of_type(code.as_str(), exclude)
                );
            }
        }
    }

    #[test]
    fn test_availability_report() {
        let policy = InventoryPolicy::default().with_type_limit(RoomTypeCode::Double, 5);
        let ledger = InventoryLedger::from_snapshot(&[booking("a", &[("double", 4), ("single", 1)])]);

        let report = ledger.availability(&policy);
        assert_eq!(report.booked, 5);
        assert_eq!(report.remaining, 15);

        let double = report.per_type.iter().find(|t| t.room_type == RoomTypeCode::Double).unwrap();
        assert_eq!(double.remaining, Some(1));
        let suite = report.per_type.iter().find(|t| t.room_type == RoomTypeCode::Suite).unwrap();
        assert_eq!(suite.limit, None);
    }
}
