//! `SQLite` implementation of [`RoomRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthus_app::ports::RoomRepository;
use smarthus_domain::error::SmartHusError;
use smarthus_domain::house::Room;
use smarthus_domain::id::RoomId;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Room`]s.
struct Wrapper(Room);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let floor: i64 = row.try_get("floor")?;
        let area: f64 = row.try_get("area")?;
        let name: String = row.try_get("name")?;

        let floor =
            u32::try_from(floor).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Room {
            id: RoomId::from_uuid(id),
            floor,
            area,
            name,
        }))
    }
}

const INSERT: &str = "INSERT INTO rooms (id, floor, area, name) VALUES (?, ?, ?, ?)";
const SELECT_ALL: &str = "SELECT * FROM rooms";

/// `SQLite`-backed room repository.
pub struct SqliteRoomRepository {
    pool: SqlitePool,
}

impl SqliteRoomRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RoomRepository for SqliteRoomRepository {
    fn create(&self, room: Room) -> impl Future<Output = Result<Room, SmartHusError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(room.id.as_uuid())
                .bind(i64::from(room.floor))
                .bind(room.area)
                .bind(&room.name)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(room)
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Room>, SmartHusError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteRoomRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteRoomRepository::new(db.pool().clone())
    }

    fn test_room(name: &str) -> Room {
        Room {
            id: RoomId::new(),
            floor: 1,
            area: 12.5,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn should_create_and_list_rooms() {
        let repo = setup().await;
        let room = test_room("Living Room");
        let id = room.id;

        repo.create(room).await.unwrap();
        repo.create(test_room("Office")).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        let fetched = all.iter().find(|r| r.id == id).unwrap();
        assert_eq!(fetched.name, "Living Room");
        assert_eq!(fetched.floor, 1);
        assert_eq!(fetched.area, 12.5);
    }

    #[tokio::test]
    async fn should_return_empty_list_when_no_rooms_exist() {
        let repo = setup().await;
        let all = repo.get_all().await.unwrap();
        assert!(all.is_empty());
    }
}
