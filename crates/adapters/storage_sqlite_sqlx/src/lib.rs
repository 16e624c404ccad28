//! # smarthus-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the port traits defined in `smarthus-app::ports::storage`
//! - Manage the `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! Every query is parameterized through `bind`; no value is ever
//! interpolated into query text.
//!
//! ## Dependency rule
//! Depends on `smarthus-app` (for port traits) and `smarthus-domain` (for
//! domain types). The `app` and `domain` crates must never reference this
//! adapter.

pub mod device_repo;
pub mod error;
pub mod measurement_store;
pub mod pool;
pub mod room_repo;
pub mod state_store;

pub use device_repo::SqliteDeviceRepository;
pub use error::StorageError;
pub use measurement_store::SqliteMeasurementStore;
pub use pool::{Config, Database};
pub use room_repo::SqliteRoomRepository;
pub use state_store::SqliteDeviceStateStore;
