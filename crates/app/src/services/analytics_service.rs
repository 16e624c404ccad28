//! Analytics — derived statistics over the persisted measurement history,
//! correlated with the house registry's placement data.
//!
//! All aggregation happens here, in one pass over store results; nothing is
//! cached between calls.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use smarthus_domain::device::{Device, DeviceKind};
use smarthus_domain::error::{NotFoundError, SmartHusError};
use smarthus_domain::house::{House, Room};
use smarthus_domain::id::RoomId;
use smarthus_domain::measurement::Measurement;
use smarthus_domain::time::Timestamp;

use crate::ports::MeasurementStore;

/// Hours of a day with more than this many above-baseline readings qualify
/// as humidity anomalies.
const HUMIDITY_ANOMALY_THRESHOLD: usize = 3;

/// Per-room temperature statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Application service computing read-only derived statistics.
pub struct AnalyticsService<M> {
    measurements: M,
}

impl<M: MeasurementStore> AnalyticsService<M> {
    /// Create a new service backed by the given measurement store.
    pub fn new(measurements: M) -> Self {
        Self { measurements }
    }

    /// The most recent recorded value for a device, or `None` when the
    /// device has no measurements at all. Never an error.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the measurement store.
    pub async fn most_recent_reading(
        &self,
        device: &Device,
    ) -> Result<Option<f64>, SmartHusError> {
        let latest = self.measurements.find_latest(&device.serial_no).await?;
        Ok(latest.map(|m| m.value))
    }

    /// All recorded values for a device in the inclusive range `[from, to]`,
    /// ordered by timestamp ascending.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the measurement store.
    pub async fn readings_in_timespan(
        &self,
        device: &Device,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<f64>, SmartHusError> {
        let measurements = self
            .measurements
            .find_in_range(&device.serial_no, from, to)
            .await?;
        Ok(measurements.into_iter().map(|m| m.value).collect())
    }

    /// The room with the lowest mean temperature over all recorded
    /// temperature-sensor measurements. Ties are broken by the
    /// lexicographically smallest room name.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::NotFound`] when no temperature measurement
    /// exists anywhere in the house, or a storage error from the store.
    pub async fn coldest_room(&self, house: &House) -> Result<Room, SmartHusError> {
        let mut coldest: Option<(f64, Room)> = None;
        for (room, values) in self.temperatures_by_room(house).await? {
            #[allow(clippy::cast_precision_loss)]
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let replace = match &coldest {
                None => true,
                Some((best_mean, best_room)) => match mean.total_cmp(best_mean) {
                    Ordering::Less => true,
                    Ordering::Equal => room.name < best_room.name,
                    Ordering::Greater => false,
                },
            };
            if replace {
                coldest = Some((mean, room));
            }
        }
        coldest.map(|(_, room)| room).ok_or_else(|| {
            NotFoundError {
                entity: "Room",
                id: "with temperature measurements".to_string(),
            }
            .into()
        })
    }

    /// Minimum, maximum, and mean temperature per room name.
    ///
    /// The result holds one entry for every room with at least one
    /// temperature sensor that has at least one measurement; rooms without
    /// temperature data do not appear. The size is data-driven.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the measurement store.
    pub async fn describe_temperature_in_rooms(
        &self,
        house: &House,
    ) -> Result<BTreeMap<String, TemperatureSummary>, SmartHusError> {
        let mut result = BTreeMap::new();
        for (room, values) in self.temperatures_by_room(house).await? {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            #[allow(clippy::cast_precision_loss)]
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            result.insert(room.name, TemperatureSummary { min, max, avg });
        }
        Ok(result)
    }

    /// Hours of `day` (0–23, ascending) during which strictly more than
    /// three humidity readings in the given room were strictly above the
    /// room's all-time mean humidity.
    ///
    /// The baseline is the mean of every humidity measurement ever recorded
    /// by humidity sensors placed in the room. Empty when no hour qualifies.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::NotFound`] when the room does not exist, or
    /// a storage error from the store.
    pub async fn hours_when_humidity_above_average(
        &self,
        house: &House,
        room: RoomId,
        day: NaiveDate,
    ) -> Result<Vec<u32>, SmartHusError> {
        if house.room(room).is_none() {
            return Err(NotFoundError {
                entity: "Room",
                id: room.to_string(),
            }
            .into());
        }

        let mut all: Vec<Measurement> = Vec::new();
        for device in house
            .devices_in_room(room)
            .into_iter()
            .filter(|d| d.kind == DeviceKind::HumiditySensor)
        {
            all.extend(self.measurements.find_all(&device.serial_no).await?);
        }
        if all.is_empty() {
            return Ok(Vec::new());
        }

        #[allow(clippy::cast_precision_loss)]
        let baseline = all.iter().map(|m| m.value).sum::<f64>() / all.len() as f64;

        let mut counts = [0usize; 24];
        for m in &all {
            if m.timestamp.date_naive() == day && m.value > baseline {
                counts[m.timestamp.hour() as usize] += 1;
            }
        }

        Ok((0u32..24)
            .filter(|hour| counts[*hour as usize] > HUMIDITY_ANOMALY_THRESHOLD)
            .collect())
    }

    /// Collect all temperature-sensor readings grouped by the room of the
    /// owning device. Rooms without readings are absent.
    async fn temperatures_by_room(
        &self,
        house: &House,
    ) -> Result<Vec<(Room, Vec<f64>)>, SmartHusError> {
        let mut by_room: BTreeMap<String, (Room, Vec<f64>)> = BTreeMap::new();
        for device in house
            .get_all_devices()
            .iter()
            .filter(|d| d.kind == DeviceKind::TemperatureSensor)
        {
            let measurements = self.measurements.find_all(&device.serial_no).await?;
            if measurements.is_empty() {
                continue;
            }
            let room = house.get_room_with_device(&device.serial_no)?;
            let entry = by_room
                .entry(room.name.clone())
                .or_insert_with(|| (room.clone(), Vec::new()));
            entry.1.extend(measurements.into_iter().map(|m| m.value));
        }
        Ok(by_room.into_values().collect())
    }
}
