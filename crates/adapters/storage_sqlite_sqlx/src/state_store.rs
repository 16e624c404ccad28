//! `SQLite` implementation of [`DeviceStateStore`].

use std::future::Future;

use sqlx::SqlitePool;

use smarthus_app::ports::DeviceStateStore;
use smarthus_domain::error::SmartHusError;
use smarthus_domain::id::SerialNo;

use crate::error::StorageError;

const SELECT_VALUE: &str = "SELECT value FROM device_state WHERE serial_no = ?";

const UPSERT_VALUE: &str = r"
    INSERT INTO device_state (serial_no, value)
    VALUES (?, ?)
    ON CONFLICT (serial_no) DO UPDATE SET value = excluded.value
";

/// `SQLite`-backed current-state store.
pub struct SqliteDeviceStateStore {
    pool: SqlitePool,
}

impl SqliteDeviceStateStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceStateStore for SqliteDeviceStateStore {
    fn read_current_state(
        &self,
        serial_no: &SerialNo,
    ) -> impl Future<Output = Result<Option<f64>, SmartHusError>> + Send {
        let pool = self.pool.clone();
        let serial_no = serial_no.clone();
        async move {
            let row: Option<(f64,)> = sqlx::query_as(SELECT_VALUE)
                .bind(serial_no.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|(value,)| value))
        }
    }

    fn write_current_state(
        &self,
        serial_no: &SerialNo,
        value: f64,
    ) -> impl Future<Output = Result<(), SmartHusError>> + Send {
        let pool = self.pool.clone();
        let serial_no = serial_no.clone();
        async move {
            // One statement per transaction; a failed execute drops the
            // transaction and rolls back, so no partial write is observable.
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            sqlx::query(UPSERT_VALUE)
                .bind(serial_no.as_str())
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            tx.commit().await.map_err(StorageError::from)?;
            Ok(())
        }
    }
}
