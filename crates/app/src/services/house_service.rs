//! House service — keeps the in-memory registry and the persisted house
//! structure in sync.
//!
//! The [`House`] aggregate enforces placement invariants in memory; this
//! service applies each structural change to the aggregate first (so
//! conflicts and lookups fail before any write) and then persists it through
//! the repositories.

use smarthus_domain::device::Device;
use smarthus_domain::error::SmartHusError;
use smarthus_domain::house::{House, Room};
use smarthus_domain::id::{RoomId, SerialNo};

use crate::ports::{DeviceRepository, RoomRepository};

/// Application service for loading and mutating the house registry.
pub struct HouseService<R, D> {
    rooms: R,
    devices: D,
}

impl<R: RoomRepository, D: DeviceRepository> HouseService<R, D> {
    /// Create a new service backed by the given repositories.
    pub fn new(rooms: R, devices: D) -> Self {
        Self { rooms, devices }
    }

    /// Rebuild the house aggregate from storage: rooms with their persisted
    /// identities, then devices with their placements.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the repositories, or any invariant
    /// violation found in the stored data.
    pub async fn load_house(&self) -> Result<House, SmartHusError> {
        let mut house = House::new();
        let mut rooms = self.rooms.get_all().await?;
        rooms.sort_by(|a, b| a.floor.cmp(&b.floor).then_with(|| a.name.cmp(&b.name)));
        for room in rooms {
            house.insert_room(room)?;
        }
        for (device, room) in self.devices.get_all().await? {
            house.register_device(device, room)?;
        }
        Ok(house)
    }

    /// Create a room in the aggregate and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] when the area is not positive,
    /// or a storage error from the room repository.
    #[tracing::instrument(skip(self, house))]
    pub async fn create_room(
        &self,
        house: &mut House,
        floor: u32,
        area: f64,
        name: &str,
    ) -> Result<Room, SmartHusError> {
        let room = house.create_room(floor, area, name)?;
        self.rooms.create(room.clone()).await?;
        Ok(room)
    }

    /// Register a device into a room and persist it, as one logical step.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Conflict`] on a duplicate serial number,
    /// [`SmartHusError::NotFound`] on an unknown room, or a storage error
    /// from the device repository.
    #[tracing::instrument(skip(self, house, device), fields(serial_no = %device.serial_no))]
    pub async fn register_device(
        &self,
        house: &mut House,
        device: Device,
        room: RoomId,
    ) -> Result<Device, SmartHusError> {
        house.register_device(device.clone(), room)?;
        self.devices.create(device.clone(), room).await?;
        Ok(device)
    }

    /// Move a device between rooms and persist the new placement.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::NotFound`] when the device is not currently
    /// in `from` or `to` does not exist, or a storage error from the device
    /// repository.
    #[tracing::instrument(skip(self, house))]
    pub async fn move_device(
        &self,
        house: &mut House,
        serial_no: &SerialNo,
        from: RoomId,
        to: RoomId,
    ) -> Result<(), SmartHusError> {
        house.move_device(serial_no, from, to)?;
        self.devices.update_room(serial_no, to).await
    }
}
