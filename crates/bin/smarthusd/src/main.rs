//! # smarthusd
//!
//! Composition root. Loads configuration, opens the `SQLite` database,
//! wires the storage adapter into the application services, and runs the
//! interactive management console.

mod config;
mod demo;
mod menu;

use smarthus_adapter_storage_sqlite_sqlx::{
    Config as DatabaseConfig, SqliteDeviceRepository, SqliteDeviceStateStore,
    SqliteMeasurementStore, SqliteRoomRepository,
};
use smarthus_app::services::{AnalyticsService, DeviceControlService, HouseService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = config::Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&settings.logging.filter))
        .init();

    let database = DatabaseConfig {
        database_url: settings.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = database.pool().clone();

    let houses = HouseService::new(
        SqliteRoomRepository::new(pool.clone()),
        SqliteDeviceRepository::new(pool.clone()),
    );
    let control = DeviceControlService::new(SqliteDeviceStateStore::new(pool.clone()));
    let analytics = AnalyticsService::new(SqliteMeasurementStore::new(pool.clone()));
    let measurements = SqliteMeasurementStore::new(pool);

    let mut house = houses.load_house().await?;
    if house.no_of_rooms() == 0 {
        tracing::info!("empty database, seeding demo house");
        house = demo::seed(&houses, &control).await?;
    }
    tracing::info!(
        floors = house.no_of_floors(),
        rooms = house.no_of_rooms(),
        devices = house.no_of_devices(),
        "house loaded"
    );

    println!(
        "smarthus: {} floors, {} rooms ({:.2} m²), {} devices ({} sensors, {} actuators)",
        house.no_of_floors(),
        house.no_of_rooms(),
        house.total_area(),
        house.no_of_devices(),
        house.no_of_sensors(),
        house.no_of_actuators()
    );
    println!("type 'help' for commands");

    menu::Console::new(&mut house, &houses, &control, &analytics, &measurements)
        .run()
        .await?;
    Ok(())
}
