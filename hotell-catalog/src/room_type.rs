use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Room types offered by the hotel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomTypeCode {
    Single,
    Double,
    Suite,
}

impl RoomTypeCode {
    pub const ALL: [RoomTypeCode; 3] = [RoomTypeCode::Single, RoomTypeCode::Double, RoomTypeCode::Suite];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomTypeCode::Single => "single",
            RoomTypeCode::Double => "double",
            RoomTypeCode::Suite => "suite",
        }
    }
}

impl fmt::Display for RoomTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomTypeCode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomTypeCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownCode(s.to_string()))
    }
}

/// Per-unit capacity and nightly rate of a room type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    pub code: RoomTypeCode,
    pub capacity: u32,
    pub nightly_price: u64,
}

impl RoomType {
    pub fn new(code: RoomTypeCode, capacity: u32, nightly_price: u64) -> Self {
        Self {
            code,
            capacity,
            nightly_price,
        }
    }
}

/// Static rate and capacity table. Read-only once built.
#[derive(Debug, Clone)]
pub struct RoomCatalog {
    room_types: Vec<RoomType>,
}

impl RoomCatalog {
    pub fn new(room_types: Vec<RoomType>) -> Result<Self, CatalogError> {
        for (i, room_type) in room_types.iter().enumerate() {
            if room_type.capacity == 0 {
                return Err(CatalogError::InvalidCapacity(room_type.code));
            }
            if room_types[..i].iter().any(|other| other.code == room_type.code) {
                return Err(CatalogError::DuplicateCode(room_type.code));
            }
        }

        Ok(Self { room_types })
    }

    /// single (1 guest, 500), double (2 guests, 1000), suite (3 guests, 1500)
    pub fn standard() -> Self {
        Self {
            room_types: vec![
                RoomType::new(RoomTypeCode::Single, 1, 500),
                RoomType::new(RoomTypeCode::Double, 2, 1000),
                RoomType::new(RoomTypeCode::Suite, 3, 1500),
            ],
        }
    }

    /// Look up a room type by its wire code. Codes are matched exactly.
    pub fn lookup(&self, code: &str) -> Option<&RoomType> {
        self.room_types.iter().find(|room_type| room_type.code.as_str() == code)
    }

    pub fn list(&self) -> &[RoomType] {
        &self.room_types
    }
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown room type: {0}")]
    UnknownCode(String),

    #[error("Room type {0} must hold at least one guest")]
    InvalidCapacity(RoomTypeCode),

    #[error("Room type {0} is listed more than once")]
    DuplicateCode(RoomTypeCode),
}
