//! End-to-end smoke tests for the full smarthusd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real
//! repos, real services) and drives it the way the console does — no process
//! is spawned and no terminal is attached.

use chrono::{Duration, TimeZone, Utc};
use smarthus_adapter_storage_sqlite_sqlx::{
    Config, SqliteDeviceRepository, SqliteDeviceStateStore, SqliteMeasurementStore,
    SqliteRoomRepository,
};
use smarthus_app::ports::MeasurementStore;
use smarthus_app::services::{AnalyticsService, DeviceControlService, HouseService};
use smarthus_domain::device::{Device, DeviceKind};
use smarthus_domain::error::SmartHusError;
use smarthus_domain::house::House;
use smarthus_domain::id::SerialNo;
use smarthus_domain::measurement::Measurement;
use smarthus_domain::time::Timestamp;

struct App {
    houses: HouseService<SqliteRoomRepository, SqliteDeviceRepository>,
    control: DeviceControlService<SqliteDeviceStateStore>,
    analytics: AnalyticsService<SqliteMeasurementStore>,
    measurements: SqliteMeasurementStore,
}

/// Build fully-wired services backed by an in-memory `SQLite` database.
async fn app() -> App {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let pool = db.pool().clone();

    App {
        houses: HouseService::new(
            SqliteRoomRepository::new(pool.clone()),
            SqliteDeviceRepository::new(pool.clone()),
        ),
        control: DeviceControlService::new(SqliteDeviceStateStore::new(pool.clone())),
        analytics: AnalyticsService::new(SqliteMeasurementStore::new(pool.clone())),
        measurements: SqliteMeasurementStore::new(pool),
    }
}

fn device(serial: &str, kind: DeviceKind) -> Device {
    Device::builder()
        .serial_no(serial)
        .producer("Bosch")
        .product_name("Thermo 3000")
        .kind(kind)
        .build()
        .unwrap()
}

fn base_time() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn should_rebuild_house_from_storage_after_restart() {
    let app = app().await;
    let mut house = House::new();

    let living_room = app
        .houses
        .create_room(&mut house, 1, 39.75, "Living Room")
        .await
        .unwrap();
    let office = app
        .houses
        .create_room(&mut house, 2, 11.75, "Office")
        .await
        .unwrap();
    app.houses
        .register_device(
            &mut house,
            device("sn-temp", DeviceKind::TemperatureSensor),
            living_room.id,
        )
        .await
        .unwrap();
    app.houses
        .register_device(&mut house, device("sn-lamp", DeviceKind::LightBulb), office.id)
        .await
        .unwrap();

    // A fresh load from the same database stands in for a process restart.
    let reloaded = app.houses.load_house().await.unwrap();
    assert_eq!(reloaded.no_of_floors(), 2);
    assert_eq!(reloaded.no_of_rooms(), 2);
    assert_eq!(reloaded.no_of_devices(), 2);
    assert_eq!(
        reloaded
            .get_room_with_device(&SerialNo::from("sn-temp"))
            .unwrap()
            .name,
        "Living Room"
    );
}

#[tokio::test]
async fn should_report_live_status_after_state_writes() {
    let app = app().await;
    let mut house = House::new();
    let room = app
        .houses
        .create_room(&mut house, 1, 10.0, "Kitchen")
        .await
        .unwrap();

    let sensor = device("sn-temp", DeviceKind::TemperatureSensor);
    let lamp = device("sn-lamp", DeviceKind::LightBulb);
    let pump = device("sn-pump", DeviceKind::HeatPump);
    for d in [&sensor, &lamp, &pump] {
        app.houses
            .register_device(&mut house, d.clone(), room.id)
            .await
            .unwrap();
    }

    app.control.set_current_value(&sensor, 18.1).await.unwrap();
    app.control.turn_on(&lamp).await.unwrap();
    app.control.set_temperature(&pump, 21.0).await.unwrap();

    assert_eq!(app.control.status_message(&sensor).await.unwrap(), "18.10 °C");
    assert_eq!(app.control.status_message(&lamp).await.unwrap(), "ON");
    assert_eq!(app.control.status_message(&pump).await.unwrap(), "21.0 °C");

    app.control.turn_off(&lamp).await.unwrap();
    app.control.turn_off(&pump).await.unwrap();
    assert_eq!(app.control.status_message(&lamp).await.unwrap(), "OFF");
    assert_eq!(app.control.status_message(&pump).await.unwrap(), "OFF");
}

#[tokio::test]
async fn should_return_not_found_for_sensor_without_state() {
    let app = app().await;
    let sensor = device("sn-ghost", DeviceKind::HumiditySensor);

    let result = app.control.status_message(&sensor).await;
    assert!(matches!(result, Err(SmartHusError::NotFound(_))));
}

#[tokio::test]
async fn should_compute_room_statistics_from_recorded_measurements() {
    let app = app().await;
    let mut house = House::new();
    let living_room = app
        .houses
        .create_room(&mut house, 1, 39.75, "Living Room")
        .await
        .unwrap();
    let office = app
        .houses
        .create_room(&mut house, 2, 11.75, "Office")
        .await
        .unwrap();

    let warm = device("sn-warm", DeviceKind::TemperatureSensor);
    let cold = device("sn-cold", DeviceKind::TemperatureSensor);
    app.houses
        .register_device(&mut house, warm.clone(), living_room.id)
        .await
        .unwrap();
    app.houses
        .register_device(&mut house, cold.clone(), office.id)
        .await
        .unwrap();

    let t0 = base_time();
    for (serial, values) in [("sn-warm", [20.0, 22.0]), ("sn-cold", [14.0, 16.0])] {
        for (i, value) in values.into_iter().enumerate() {
            let offset = Duration::hours(i64::try_from(i).unwrap());
            app.measurements
                .append(Measurement::new(serial, t0 + offset, value))
                .await
                .unwrap();
        }
    }

    let coldest = app.analytics.coldest_room(&house).await.unwrap();
    assert_eq!(coldest.name, "Office");

    let summaries = app
        .analytics
        .describe_temperature_in_rooms(&house)
        .await
        .unwrap();
    assert_eq!(summaries.len(), 2);
    let living = &summaries["Living Room"];
    assert_eq!(living.min, 20.0);
    assert_eq!(living.max, 22.0);
    assert_eq!(living.avg, 21.0);

    let latest = app.analytics.most_recent_reading(&warm).await.unwrap();
    assert_eq!(latest, Some(22.0));

    let readings = app
        .analytics
        .readings_in_timespan(&cold, t0, t0 + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(readings, vec![14.0, 16.0]);
}

#[tokio::test]
async fn should_survive_move_between_rooms_across_reload() {
    let app = app().await;
    let mut house = House::new();
    let a = app.houses.create_room(&mut house, 1, 10.0, "A").await.unwrap();
    let b = app.houses.create_room(&mut house, 1, 10.0, "B").await.unwrap();
    let d = device("sn-1", DeviceKind::SmartOutlet);
    let serial = d.serial_no.clone();
    app.houses
        .register_device(&mut house, d, a.id)
        .await
        .unwrap();

    app.houses
        .move_device(&mut house, &serial, a.id, b.id)
        .await
        .unwrap();

    let reloaded = app.houses.load_house().await.unwrap();
    assert_eq!(reloaded.get_room_with_device(&serial).unwrap().id, b.id);
}
