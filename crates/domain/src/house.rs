//! House — the aggregate root owning floors, rooms, and device placement.
//!
//! The placement relation is total and exclusive: every registered device is
//! in exactly one room at all times, and no intermediate zero-room or
//! two-room state is ever observable. All counters are computed on demand;
//! nothing is cached.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::device::{Capability, Device};
use crate::error::{ConflictError, NotFoundError, SmartHusError, ValidationError};
use crate::id::{RoomId, SerialNo};

/// A floor of the house. Floors carry nothing but their ordinal level and
/// are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub level: u32,
}

/// A room on a floor. Immutable after creation; moving devices reassigns
/// placement, never the room itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub floor: u32,
    pub area: f64,
    pub name: String,
}

/// The house registry: floors, rooms, registered devices, and the
/// device-to-room placement relation.
#[derive(Debug, Default)]
pub struct House {
    floors: Vec<Floor>,
    rooms: Vec<Room>,
    devices: Vec<Device>,
    placement: HashMap<SerialNo, RoomId>,
}

impl House {
    /// Create an empty house.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new floor above the existing ones.
    pub fn create_floor(&mut self) -> Floor {
        let floor = Floor {
            level: u32::try_from(self.floors.len()).unwrap_or(u32::MAX) + 1,
        };
        self.floors.push(floor);
        floor
    }

    /// Create a room on the given floor.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] when `area` is not positive.
    pub fn create_room(
        &mut self,
        floor: u32,
        area: f64,
        name: impl Into<String>,
    ) -> Result<Room, SmartHusError> {
        if area <= 0.0 {
            return Err(ValidationError::NonPositiveArea.into());
        }
        let room = Room {
            id: RoomId::new(),
            floor,
            area,
            name: name.into(),
        };
        self.rooms.push(room.clone());
        Ok(room)
    }

    /// Restore a room with its persisted identity, extending the floor list
    /// to cover its level. Used when rebuilding the registry from storage.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] when the room's area is not
    /// positive.
    pub fn insert_room(&mut self, room: Room) -> Result<(), SmartHusError> {
        if room.area <= 0.0 {
            return Err(ValidationError::NonPositiveArea.into());
        }
        while u32::try_from(self.floors.len()).unwrap_or(u32::MAX) < room.floor {
            self.create_floor();
        }
        self.rooms.push(room);
        Ok(())
    }

    /// Register a device and place it in a room, as one logical step.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Conflict`] when a device with the same serial
    /// number is already registered, and [`SmartHusError::NotFound`] when the
    /// room does not exist.
    pub fn register_device(&mut self, device: Device, room: RoomId) -> Result<(), SmartHusError> {
        device.validate()?;
        if self.devices.iter().any(|d| d.serial_no == device.serial_no) {
            return Err(ConflictError::DuplicateSerialNo {
                serial_no: device.serial_no.to_string(),
            }
            .into());
        }
        if self.room(room).is_none() {
            return Err(room_not_found(room).into());
        }
        self.placement.insert(device.serial_no.clone(), room);
        self.devices.push(device);
        Ok(())
    }

    /// Move a device from one room to another.
    ///
    /// The reassignment is atomic: the single placement entry is overwritten,
    /// so no state where the device belongs to zero or two rooms can be
    /// observed.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::NotFound`] when the device is not currently
    /// placed in `from`, or when `to` does not exist.
    pub fn move_device(
        &mut self,
        serial_no: &SerialNo,
        from: RoomId,
        to: RoomId,
    ) -> Result<(), SmartHusError> {
        if self.room(to).is_none() {
            return Err(room_not_found(to).into());
        }
        match self.placement.get(serial_no) {
            Some(current) if *current == from => {
                self.placement.insert(serial_no.clone(), to);
                Ok(())
            }
            _ => Err(NotFoundError {
                entity: "Device",
                id: serial_no.to_string(),
            }
            .into()),
        }
    }

    /// Look up a registered device by serial number.
    #[must_use]
    pub fn find_device_by_serial_no(&self, serial_no: &SerialNo) -> Option<&Device> {
        self.devices.iter().find(|d| &d.serial_no == serial_no)
    }

    /// The room a registered device is placed in.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::NotFound`] when the device is not registered.
    pub fn get_room_with_device(&self, serial_no: &SerialNo) -> Result<&Room, SmartHusError> {
        self.placement
            .get(serial_no)
            .and_then(|id| self.room(*id))
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Device",
                    id: serial_no.to_string(),
                }
                .into()
            })
    }

    /// All registered devices, in registration order.
    #[must_use]
    pub fn get_all_devices(&self) -> &[Device] {
        &self.devices
    }

    /// All rooms, in creation order.
    #[must_use]
    pub fn get_all_rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Look up a room by id.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Devices currently placed in the given room.
    #[must_use]
    pub fn devices_in_room(&self, room: RoomId) -> Vec<&Device> {
        self.devices
            .iter()
            .filter(|d| self.placement.get(&d.serial_no) == Some(&room))
            .collect()
    }

    /// Number of floors.
    #[must_use]
    pub fn no_of_floors(&self) -> usize {
        self.floors.len()
    }

    /// Number of rooms.
    #[must_use]
    pub fn no_of_rooms(&self) -> usize {
        self.rooms.len()
    }

    /// Sum of all room areas.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.rooms.iter().map(|r| r.area).sum()
    }

    /// Number of registered devices.
    #[must_use]
    pub fn no_of_devices(&self) -> usize {
        self.devices.len()
    }

    /// Number of registered sensors.
    #[must_use]
    pub fn no_of_sensors(&self) -> usize {
        self.count_by_capability(Capability::Sensor)
    }

    /// Number of registered actuators.
    #[must_use]
    pub fn no_of_actuators(&self) -> usize {
        self.count_by_capability(Capability::Actuator)
    }

    fn count_by_capability(&self, capability: Capability) -> usize {
        self.devices
            .iter()
            .filter(|d| d.capability() == capability)
            .count()
    }
}

fn room_not_found(id: RoomId) -> NotFoundError {
    NotFoundError {
        entity: "Room",
        id: id.to_string(),
    }
}
