use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hotell_core::{BookingRepository, BookingUpdate, StorageError};
use hotell_shared::{Booking, BookingRooms, RoomRequestLine};
use sqlx::types::Json;
use sqlx::PgPool;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: String,
    guest_name: String,
    guest_email: String,
    guests: i32,
    rooms: Json<Vec<RoomRequestLine>>,
    total_price: i64,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StorageError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let guests = u32::try_from(row.guests)
            .map_err(|_| StorageError::backend(format!("booking {} has invalid guest count {}", row.id, row.guests)))?;
        let total_price = u64::try_from(row.total_price)
            .map_err(|_| StorageError::backend(format!("booking {} has negative total price", row.id)))?;

        Ok(Booking {
            id: row.id,
            guest_name: row.guest_name,
            guest_email: row.guest_email,
            guests,
            rooms: row.rooms.0,
            total_price,
            check_in: row.check_in,
            check_out: row.check_out,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn guests_param(guests: u32) -> Result<i32, StorageError> {
    i32::try_from(guests).map_err(StorageError::backend)
}

fn price_param(price: u64) -> Result<i64, StorageError> {
    i64::try_from(price).map_err(StorageError::backend)
}

const BOOKING_COLUMNS: &str =
    "id, guest_name, guest_email, guests, rooms, total_price, check_in, check_out, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn scan_room_quantities(&self) -> Result<Vec<BookingRooms>, StorageError> {
        let rows: Vec<(String, Json<Vec<RoomRequestLine>>)> = sqlx::query_as("SELECT id, rooms FROM bookings")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::backend)?;

        Ok(rows
            .into_iter()
            .map(|(booking_id, rooms)| BookingRooms {
                booking_id,
                rooms: rooms.0,
            })
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Booking>, StorageError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::backend)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Booking>, StorageError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings ORDER BY created_at, id",
            BOOKING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::backend)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn put(&self, booking: &Booking) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, guest_name, guest_email, guests, rooms, total_price, check_in, check_out, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.guest_name)
        .bind(&booking.guest_email)
        .bind(guests_param(booking.guests)?)
        .bind(Json(&booking.rooms))
        .bind(price_param(booking.total_price)?)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::backend)?;

        Ok(())
    }

    async fn update(&self, id: &str, update: &BookingUpdate) -> Result<Booking, StorageError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            r#"
            UPDATE bookings
            SET guest_name = $2, guest_email = $3, guests = $4, rooms = $5, total_price = $6,
                check_in = $7, check_out = $8, updated_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(id)
        .bind(&update.guest_name)
        .bind(&update.guest_email)
        .bind(guests_param(update.guests)?)
        .bind(Json(&update.rooms))
        .bind(price_param(update.total_price)?)
        .bind(update.check_in)
        .bind(update.check_out)
        .bind(update.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::backend)?;

        match row {
            Some(row) => Booking::try_from(row),
            None => Err(StorageError::Missing(id.to_string())),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::backend)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Missing(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(guests: i32, total_price: i64) -> BookingRow {
        let at = Utc.with_ymd_and_hms(2030, 4, 1, 14, 0, 0).unwrap();
        BookingRow {
            id: "bk-9".to_string(),
            guest_name: "Ada".to_string(),
            guest_email: "ada@example.com".to_string(),
            guests,
            rooms: Json(vec![RoomRequestLine::new("suite", 1)]),
            total_price,
            check_in: at,
            check_out: at + chrono::Duration::days(2),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_row_conversion() {
        let booking = Booking::try_from(row(3, 3000)).unwrap();
        assert_eq!(booking.guests, 3);
        assert_eq!(booking.total_price, 3000);
        assert_eq!(booking.rooms, vec![RoomRequestLine::new("suite", 1)]);
    }

    #[test]
    fn test_corrupt_rows_are_storage_errors() {
        assert!(matches!(Booking::try_from(row(-1, 3000)), Err(StorageError::Backend(_))));
        assert!(matches!(Booking::try_from(row(3, -5)), Err(StorageError::Backend(_))));
    }
}
