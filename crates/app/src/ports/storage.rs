//! Storage ports — the sole boundary between the core and the relational
//! store.

use std::future::Future;

use smarthus_domain::device::Device;
use smarthus_domain::error::SmartHusError;
use smarthus_domain::house::Room;
use smarthus_domain::id::{RoomId, SerialNo};
use smarthus_domain::measurement::Measurement;
use smarthus_domain::time::Timestamp;

/// Current device state — one latest value per device, distinct from the
/// historical measurement log.
pub trait DeviceStateStore {
    /// Read the latest persisted value for a device, `None` when no state
    /// row exists.
    fn read_current_state(
        &self,
        serial_no: &SerialNo,
    ) -> impl Future<Output = Result<Option<f64>, SmartHusError>> + Send;

    /// Persist a new current value as a single atomic transaction. On
    /// failure the write rolls back entirely; a partial write is never
    /// observable.
    fn write_current_state(
        &self,
        serial_no: &SerialNo,
        value: f64,
    ) -> impl Future<Output = Result<(), SmartHusError>> + Send;
}

/// Append-only measurement log.
pub trait MeasurementStore {
    /// Append a measurement. Measurements are never updated or deleted.
    fn append(
        &self,
        measurement: Measurement,
    ) -> impl Future<Output = Result<Measurement, SmartHusError>> + Send;

    /// The most recent measurement for a device, by timestamp descending.
    fn find_latest(
        &self,
        serial_no: &SerialNo,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHusError>> + Send;

    /// All measurements for a device with timestamp in the inclusive range
    /// `[from, to]`, ordered by timestamp ascending.
    fn find_in_range(
        &self,
        serial_no: &SerialNo,
        from: Timestamp,
        to: Timestamp,
    ) -> impl Future<Output = Result<Vec<Measurement>, SmartHusError>> + Send;

    /// Every measurement ever recorded for a device, ordered by timestamp
    /// ascending.
    fn find_all(
        &self,
        serial_no: &SerialNo,
    ) -> impl Future<Output = Result<Vec<Measurement>, SmartHusError>> + Send;
}

/// Persistence for the room structure of the house.
pub trait RoomRepository {
    /// Persist a new room.
    fn create(&self, room: Room) -> impl Future<Output = Result<Room, SmartHusError>> + Send;

    /// All persisted rooms.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Room>, SmartHusError>> + Send;
}

/// Persistence for registered devices and their room placement.
pub trait DeviceRepository {
    /// Persist a new device placed in the given room.
    fn create(
        &self,
        device: Device,
        room: RoomId,
    ) -> impl Future<Output = Result<Device, SmartHusError>> + Send;

    /// All persisted devices with their placement.
    fn get_all(
        &self,
    ) -> impl Future<Output = Result<Vec<(Device, RoomId)>, SmartHusError>> + Send;

    /// Persist a placement change for an already-registered device.
    fn update_room(
        &self,
        serial_no: &SerialNo,
        room: RoomId,
    ) -> impl Future<Output = Result<(), SmartHusError>> + Send;
}
