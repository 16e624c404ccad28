//! `SQLite` implementation of [`MeasurementStore`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthus_app::ports::MeasurementStore;
use smarthus_domain::error::SmartHusError;
use smarthus_domain::id::SerialNo;
use smarthus_domain::measurement::Measurement;
use smarthus_domain::time::Timestamp;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Measurement`]s without
/// polluting domain structs with database concerns.
struct Wrapper(Measurement);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let serial_no: String = row.try_get("serial_no")?;
        let time_stamp: String = row.try_get("time_stamp")?;
        let value: f64 = row.try_get("value")?;

        let timestamp = chrono::DateTime::parse_from_rfc3339(&time_stamp)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(Measurement::new(serial_no, timestamp, value)))
    }
}

const INSERT: &str = r"
    INSERT INTO measurements (serial_no, time_stamp, value)
    VALUES (?, ?, ?)
";

const SELECT_LATEST: &str = r"
    SELECT * FROM measurements
    WHERE serial_no = ?
    ORDER BY time_stamp DESC
    LIMIT 1
";

const SELECT_IN_RANGE: &str = r"
    SELECT * FROM measurements
    WHERE serial_no = ? AND time_stamp >= ? AND time_stamp <= ?
    ORDER BY time_stamp ASC
";

const SELECT_ALL: &str = r"
    SELECT * FROM measurements
    WHERE serial_no = ?
    ORDER BY time_stamp ASC
";

/// `SQLite`-backed append-only measurement log.
pub struct SqliteMeasurementStore {
    pool: SqlitePool,
}

impl SqliteMeasurementStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MeasurementStore for SqliteMeasurementStore {
    fn append(
        &self,
        measurement: Measurement,
    ) -> impl Future<Output = Result<Measurement, SmartHusError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(measurement.serial_no.as_str())
                .bind(measurement.timestamp.to_rfc3339())
                .bind(measurement.value)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(measurement)
        }
    }

    fn find_latest(
        &self,
        serial_no: &SerialNo,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHusError>> + Send {
        let pool = self.pool.clone();
        let serial_no = serial_no.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_LATEST)
                .bind(serial_no.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn find_in_range(
        &self,
        serial_no: &SerialNo,
        from: Timestamp,
        to: Timestamp,
    ) -> impl Future<Output = Result<Vec<Measurement>, SmartHusError>> + Send {
        let pool = self.pool.clone();
        let serial_no = serial_no.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_IN_RANGE)
                .bind(serial_no.as_str())
                .bind(from.to_rfc3339())
                .bind(to.to_rfc3339())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn find_all(
        &self,
        serial_no: &SerialNo,
    ) -> impl Future<Output = Result<Vec<Measurement>, SmartHusError>> + Send {
        let pool = self.pool.clone();
        let serial_no = serial_no.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .bind(serial_no.as_str())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
