use hotell_catalog::{CatalogError, InventoryPolicy, RoomCatalog, RoomType, RoomTypeCode, DEFAULT_ROOM_LIMIT};
use hotell_core::cancellation::DEFAULT_CANCELLATION_WINDOW_HOURS;
use hotell_core::{AdmissionRules, CancellationWindow, UnknownRoomTypePolicy};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            database_url: None,
            max_connections: default_max_connections(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
            run_migrations: true,
        }
    }
}

impl StorageConfig {
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }
}

fn default_max_connections() -> u32 { 5 }
fn default_acquire_timeout_ms() -> u64 { 3000 }
fn default_true() -> bool { true }

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_total_rooms")]
    pub total_rooms: u32,
    /// Optional cap per room type code, e.g. `suite = 4`
    #[serde(default)]
    pub per_type_limits: HashMap<String, u32>,
    #[serde(default = "default_cancellation_window_hours")]
    pub cancellation_window_hours: i64,
    #[serde(default)]
    pub unknown_room_types: UnknownRoomTypePolicy,
}

fn default_total_rooms() -> u32 { DEFAULT_ROOM_LIMIT }
fn default_cancellation_window_hours() -> i64 { DEFAULT_CANCELLATION_WINDOW_HOURS }

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            total_rooms: DEFAULT_ROOM_LIMIT,
            per_type_limits: HashMap::new(),
            cancellation_window_hours: DEFAULT_CANCELLATION_WINDOW_HOURS,
            unknown_room_types: UnknownRoomTypePolicy::default(),
        }
    }
}

impl BusinessRules {
    pub fn admission_rules(&self) -> Result<AdmissionRules, SettingsError> {
        let mut inventory = InventoryPolicy::new(self.total_rooms);
        for (code, limit) in &self.per_type_limits {
            let code: RoomTypeCode = code.parse()?;
            inventory = inventory.with_type_limit(code, *limit);
        }

        Ok(AdmissionRules {
            inventory,
            unknown_room_types: self.unknown_room_types,
        })
    }

    pub fn cancellation_window(&self) -> CancellationWindow {
        CancellationWindow::from_hours(self.cancellation_window_hours)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoomTypeConfig {
    pub code: String,
    pub capacity: u32,
    pub nightly_price: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "standard_room_types")]
    pub room_types: Vec<RoomTypeConfig>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            room_types: standard_room_types(),
        }
    }
}

fn standard_room_types() -> Vec<RoomTypeConfig> {
    RoomCatalog::standard()
        .list()
        .iter()
        .map(|room_type| RoomTypeConfig {
            code: room_type.code.as_str().to_string(),
            capacity: room_type.capacity,
            nightly_price: room_type.nightly_price,
        })
        .collect()
}

impl CatalogConfig {
    pub fn build(&self) -> Result<RoomCatalog, SettingsError> {
        let room_types = self
            .room_types
            .iter()
            .map(|entry| Ok(RoomType::new(entry.code.parse()?, entry.capacity, entry.nightly_price)))
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(RoomCatalog::new(room_types)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("invalid catalog settings: {0}")]
    Catalog(#[from] CatalogError),

    #[error("storage.database_url must be set for the postgres backend")]
    MissingDatabaseUrl,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. HOTELL__SERVER__PORT=9000
            .add_source(config::Environment::with_prefix("HOTELL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse("[server]\nport = 8080\n");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.business_rules.total_rooms, 20);
        assert_eq!(config.business_rules.cancellation_window_hours, 48);

        let rules = config.business_rules.admission_rules().unwrap();
        assert!(rules.inventory.per_type.is_empty());
        assert_eq!(rules.unknown_room_types, UnknownRoomTypePolicy::Reject);

        let catalog = config.catalog.build().unwrap();
        assert_eq!(catalog.lookup("suite").unwrap().nightly_price, 1500);
    }

    #[test]
    fn test_business_rules_and_catalog_overrides() {
        let config = parse(
            r#"
            [server]
            port = 9000

            [storage]
            backend = "postgres"
            database_url = "postgres://hotell@localhost/hotell"

            [business_rules]
            total_rooms = 12
            unknown_room_types = "ignore"
            cancellation_window_hours = 24

            [business_rules.per_type_limits]
            suite = 2

            [[catalog.room_types]]
            code = "single"
            capacity = 1
            nightly_price = 650

            [[catalog.room_types]]
            code = "double"
            capacity = 2
            nightly_price = 1200
            "#,
        );

        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.storage.database_url().unwrap(), "postgres://hotell@localhost/hotell");

        let rules = config.business_rules.admission_rules().unwrap();
        assert_eq!(rules.inventory.total_rooms, 12);
        assert_eq!(rules.inventory.per_type.get(&RoomTypeCode::Suite), Some(&2));
        assert_eq!(rules.unknown_room_types, UnknownRoomTypePolicy::Ignore);
        assert_eq!(
            config.business_rules.cancellation_window(),
            CancellationWindow::from_hours(24)
        );

        let catalog = config.catalog.build().unwrap();
        assert_eq!(catalog.list().len(), 2);
        assert_eq!(catalog.lookup("single").unwrap().nightly_price, 650);
        assert!(catalog.lookup("suite").is_none());
    }

    #[test]
    fn test_invalid_settings() {
        let mut rules = BusinessRules::default();
        rules.per_type_limits.insert("penthouse".to_string(), 1);
        assert!(matches!(rules.admission_rules(), Err(SettingsError::Catalog(_))));

        let storage = StorageConfig {
            backend: StorageBackend::Postgres,
            ..StorageConfig::default()
        };
        assert!(matches!(storage.database_url(), Err(SettingsError::MissingDatabaseUrl)));
    }
}
