use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of a requested room mix, e.g. `{"type": "suite", "quantity": 1}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRequestLine {
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(default)]
    pub quantity: u32,
}

impl RoomRequestLine {
    pub fn new(room_type: impl Into<String>, quantity: u32) -> Self {
        Self {
            room_type: room_type.into(),
            quantity,
        }
    }
}

/// Incoming booking request as sent by the client.
///
/// Every field is optional so that an incomplete body is reported as a
/// missing-fields rejection instead of a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    pub guests: Option<u32>,
    pub rooms: Option<Vec<RoomRequestLine>>,
    #[serde(rename = "name")]
    pub guest_name: Option<String>,
    #[serde(rename = "email")]
    pub guest_email: Option<String>,
    #[serde(rename = "checkInDate")]
    pub check_in: Option<String>,
    #[serde(rename = "checkOutDate")]
    pub check_out: Option<String>,
}

/// Persisted booking record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "bookingId")]
    pub id: String,
    #[serde(rename = "name")]
    pub guest_name: String,
    #[serde(rename = "email")]
    pub guest_email: String,
    pub guests: u32,
    pub rooms: Vec<RoomRequestLine>,
    pub total_price: u64,
    #[serde(rename = "checkInDate")]
    pub check_in: DateTime<Utc>,
    #[serde(rename = "checkOutDate")]
    pub check_out: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build the record to persist from an accepted admission
    pub fn from_summary(summary: BookingSummary, now: DateTime<Utc>) -> Self {
        Self {
            id: summary.booking_id,
            guest_name: summary.guest_name,
            guest_email: summary.guest_email,
            guests: summary.guests,
            rooms: summary.rooms,
            total_price: summary.total_price,
            check_in: summary.check_in,
            check_out: summary.check_out,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn room_count(&self) -> u32 {
        self.rooms
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    pub fn allocation(&self) -> BookingRooms {
        BookingRooms {
            booking_id: self.id.clone(),
            rooms: self.rooms.clone(),
        }
    }
}

/// Room mix held by one stored booking, as returned by an inventory scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRooms {
    pub booking_id: String,
    pub rooms: Vec<RoomRequestLine>,
}

/// Outcome of a successful admission, ready to be persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub booking_id: String,
    #[serde(rename = "name")]
    pub guest_name: String,
    #[serde(rename = "email")]
    pub guest_email: String,
    pub guests: u32,
    pub rooms: Vec<RoomRequestLine>,
    pub nightly_price: u64,
    pub nights: u32,
    pub total_price: u64,
    #[serde(rename = "checkInDate")]
    pub check_in: DateTime<Utc>,
    #[serde(rename = "checkOutDate")]
    pub check_out: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_request_uses_wire_names() {
        let body = r#"{
            "guests": 3,
            "rooms": [{"type": "suite", "quantity": 1}],
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "checkInDate": "2030-05-01",
            "checkOutDate": "2030-05-03"
        }"#;

        let req: BookingRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.guests, Some(3));
        assert_eq!(req.rooms.unwrap(), vec![RoomRequestLine::new("suite", 1)]);
        assert_eq!(req.guest_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(req.check_out.as_deref(), Some("2030-05-03"));
    }

    #[test]
    fn test_incomplete_request_still_decodes() {
        let req: BookingRequest = serde_json::from_str(r#"{"guests": 2}"#).unwrap();
        assert_eq!(req.guests, Some(2));
        assert!(req.rooms.is_none());
        assert!(req.guest_email.is_none());
    }

    #[test]
    fn test_booking_room_count_sums_duplicate_lines() {
        let at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let booking = Booking {
            id: "b-1".to_string(),
            guest_name: "Grace".to_string(),
            guest_email: "grace@example.com".to_string(),
            guests: 4,
            rooms: vec![
                RoomRequestLine::new("double", 1),
                RoomRequestLine::new("double", 1),
            ],
            total_price: 2000,
            check_in: at,
            check_out: at + chrono::Duration::days(1),
            created_at: at,
            updated_at: at,
        };

        assert_eq!(booking.room_count(), 2);

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["bookingId"], "b-1");
        assert_eq!(json["totalPrice"], 2000);
        assert_eq!(json["rooms"][0]["type"], "double");
    }

    #[test]
    fn test_room_count_saturates() {
        let at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let booking = Booking {
            id: "b-2".to_string(),
            guest_name: "Grace".to_string(),
            guest_email: "grace@example.com".to_string(),
            guests: 1,
            rooms: vec![
                RoomRequestLine::new("single", u32::MAX),
                RoomRequestLine::new("single", 1),
            ],
            total_price: 500,
            check_in: at,
            check_out: at + chrono::Duration::days(1),
            created_at: at,
            updated_at: at,
        };

        assert_eq!(booking.room_count(), u32::MAX);
    }
}
