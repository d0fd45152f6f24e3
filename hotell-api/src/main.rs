use anyhow::Context;
use hotell_api::{app, AppState};
use hotell_core::{AdmissionEngine, BookingRepository, BookingService, UuidIdSource};
use hotell_store::app_config::{Config, StorageBackend};
use hotell_store::{DbClient, MemoryBookingRepository, PgBookingRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotell_api=debug,hotell_core=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Hotell API on port {}", config.server.port);

    let repo = open_store(&config).await?;

    let catalog = Arc::new(config.catalog.build()?);
    let rules = config.business_rules.admission_rules()?;
    let engine = AdmissionEngine::new(catalog, rules, Arc::new(UuidIdSource));
    let service = BookingService::open(repo, engine, config.business_rules.cancellation_window())
        .await
        .context("Failed to load current inventory from the booking store")?;

    let app = app(AppState::new(service));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn BookingRepository>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory booking store, bookings are lost on restart");
            Ok(Arc::new(MemoryBookingRepository::new()))
        }
        StorageBackend::Postgres => {
            let url = config.storage.database_url()?;
            let db = DbClient::from_config(url, &config.storage)
                .await
                .context("Failed to connect to Postgres")?;
            if config.storage.run_migrations {
                db.migrate().await?;
            }
            Ok(Arc::new(PgBookingRepository::new(db.pool.clone())))
        }
    }
}
