//! `SQLite` implementation of [`DeviceRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthus_app::ports::DeviceRepository;
use smarthus_domain::device::{Device, DeviceKind};
use smarthus_domain::error::SmartHusError;
use smarthus_domain::id::{DeviceId, RoomId, SerialNo};

use crate::error::StorageError;

/// Wrapper for converting database rows into a domain [`Device`] plus its
/// room placement.
struct Wrapper(Device, RoomId);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let room: uuid::Uuid = row.try_get("room")?;
        let kind: String = row.try_get("kind")?;
        let producer: String = row.try_get("producer")?;
        let product_name: String = row.try_get("product_name")?;
        let nickname: Option<String> = row.try_get("nickname")?;
        let serial_no: String = row.try_get("serial_no")?;

        let kind =
            DeviceKind::from_str(&kind).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(
            Device {
                id: DeviceId::from_uuid(id),
                serial_no: SerialNo::new(serial_no),
                producer,
                product_name,
                nickname,
                kind,
            },
            RoomId::from_uuid(room),
        ))
    }
}

const INSERT: &str = r"
    INSERT INTO devices (id, room, kind, producer, product_name, nickname, serial_no)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

const SELECT_ALL: &str = "SELECT * FROM devices";

const UPDATE_ROOM: &str = "UPDATE devices SET room = ? WHERE serial_no = ?";

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn create(
        &self,
        device: Device,
        room: RoomId,
    ) -> impl Future<Output = Result<Device, SmartHusError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(device.id.as_uuid())
                .bind(room.as_uuid())
                .bind(device.kind.as_str())
                .bind(&device.producer)
                .bind(&device.product_name)
                .bind(&device.nickname)
                .bind(device.serial_no.as_str())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(device)
        }
    }

    fn get_all(
        &self,
    ) -> impl Future<Output = Result<Vec<(Device, RoomId)>, SmartHusError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| (w.0, w.1)).collect())
        }
    }

    fn update_room(
        &self,
        serial_no: &SerialNo,
        room: RoomId,
    ) -> impl Future<Output = Result<(), SmartHusError>> + Send {
        let pool = self.pool.clone();
        let serial_no = serial_no.clone();
        async move {
            sqlx::query(UPDATE_ROOM)
                .bind(room.as_uuid())
                .bind(serial_no.as_str())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use crate::room_repo::SqliteRoomRepository;
    use smarthus_app::ports::RoomRepository;
    use smarthus_domain::house::Room;

    async fn setup() -> (SqliteDeviceRepository, RoomId, RoomId) {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let pool = db.pool().clone();

        let rooms = SqliteRoomRepository::new(pool.clone());
        let a = Room {
            id: RoomId::new(),
            floor: 1,
            area: 10.0,
            name: "A".to_string(),
        };
        let b = Room {
            id: RoomId::new(),
            floor: 1,
            area: 10.0,
            name: "B".to_string(),
        };
        let (a_id, b_id) = (a.id, b.id);
        rooms.create(a).await.unwrap();
        rooms.create(b).await.unwrap();

        (SqliteDeviceRepository::new(pool), a_id, b_id)
    }

    fn test_device(serial: &str, kind: DeviceKind) -> Device {
        Device::builder()
            .serial_no(serial)
            .producer("Polar")
            .product_name("PL-1")
            .kind(kind)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_list_devices_with_placement() {
        let (repo, room_a, _) = setup().await;
        let device = test_device("sn-1", DeviceKind::TemperatureSensor);
        let id = device.id;

        repo.create(device, room_a).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        let (fetched, placed_in) = &all[0];
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.serial_no.as_str(), "sn-1");
        assert_eq!(fetched.kind, DeviceKind::TemperatureSensor);
        assert_eq!(fetched.producer, "Polar");
        assert_eq!(*placed_in, room_a);
    }

    #[tokio::test]
    async fn should_reject_duplicate_serial_no_at_database_level() {
        let (repo, room_a, room_b) = setup().await;
        repo.create(test_device("sn-1", DeviceKind::LightBulb), room_a)
            .await
            .unwrap();

        let result = repo
            .create(test_device("sn-1", DeviceKind::HeatPump), room_b)
            .await;
        assert!(matches!(result, Err(SmartHusError::Storage(_))));
    }

    #[tokio::test]
    async fn should_update_room_placement() {
        let (repo, room_a, room_b) = setup().await;
        let device = test_device("sn-1", DeviceKind::SmartOutlet);
        let serial = device.serial_no.clone();
        repo.create(device, room_a).await.unwrap();

        repo.update_room(&serial, room_b).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all[0].1, room_b);
    }

    #[tokio::test]
    async fn should_roundtrip_every_device_kind() {
        let (repo, room_a, _) = setup().await;
        for kind in DeviceKind::ALL {
            repo.create(test_device(kind.as_str(), kind), room_a)
                .await
                .unwrap();
        }

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), DeviceKind::ALL.len());
        for (device, _) in &all {
            assert_eq!(device.serial_no.as_str(), device.kind.as_str());
        }
    }
}
