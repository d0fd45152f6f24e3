pub mod room_type;
pub mod pricing;
pub mod inventory;

pub use room_type::{CatalogError, RoomCatalog, RoomType, RoomTypeCode};
pub use pricing::{nights_between, StayQuote};
pub use inventory::{
    scope_suffix, Availability, InventoryError, InventoryLedger, InventoryPolicy, OccupancySnapshot,
    RoomDemand, DEFAULT_ROOM_LIMIT,
};
