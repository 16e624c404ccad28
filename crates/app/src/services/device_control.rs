//! Device status and actuation — use-cases reading and writing current
//! device state through the [`DeviceStateStore`] port.
//!
//! Status is never cached on the device entity: every query goes to the
//! store at call time.

use smarthus_domain::device::{ActuatorKind, Device};
use smarthus_domain::error::{NotFoundError, SmartHusError, ValidationError};

use crate::ports::DeviceStateStore;

/// Application service for per-device status queries and actuator commands.
pub struct DeviceControlService<S> {
    states: S,
}

impl<S: DeviceStateStore> DeviceControlService<S> {
    /// Create a new service backed by the given state store.
    pub fn new(states: S) -> Self {
        Self { states }
    }

    /// Format the current status of a device.
    ///
    /// - Sensors report their fresh current value rounded to two decimals,
    ///   followed by the kind's fixed unit (e.g. `18.10 °C`).
    /// - On/off actuators report `ON` when the persisted value is `1` and
    ///   `OFF` otherwise; an absent state row is `OFF`, not an error.
    /// - Heat-control actuators report `OFF` for `0` (or an absent row) and
    ///   the set-point in `°C` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::NotFound`] when a sensor has no current-state
    /// row, or a storage error from the store.
    pub async fn status_message(&self, device: &Device) -> Result<String, SmartHusError> {
        match device.kind.actuator_kind() {
            None => {
                let value = self.current_value(device).await?;
                let unit = device.kind.unit().unwrap_or_default();
                Ok(format!("{value:.2} {unit}"))
            }
            Some(ActuatorKind::OnOff) => {
                let state = self.states.read_current_state(&device.serial_no).await?;
                Ok(match state {
                    Some(value) if value == 1.0 => "ON".to_string(),
                    _ => "OFF".to_string(),
                })
            }
            Some(ActuatorKind::HeatControl) => {
                let state = self.states.read_current_state(&device.serial_no).await?;
                Ok(match state {
                    Some(value) if value != 0.0 => format!("{value:.1} °C"),
                    _ => "OFF".to_string(),
                })
            }
        }
    }

    /// Read the fresh current value of a sensor.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] when the device is not a sensor
    /// and [`SmartHusError::NotFound`] when no current-state row exists.
    pub async fn current_value(&self, device: &Device) -> Result<f64, SmartHusError> {
        if !device.is_sensor() {
            return Err(ValidationError::NotASensor.into());
        }
        self.states
            .read_current_state(&device.serial_no)
            .await?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Current state for device",
                    id: device.serial_no.to_string(),
                }
                .into()
            })
    }

    /// Overwrite the current value of a sensor.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] when the device is not a
    /// sensor, or a storage error from the store.
    #[tracing::instrument(skip(self, device), fields(serial_no = %device.serial_no))]
    pub async fn set_current_value(
        &self,
        device: &Device,
        value: f64,
    ) -> Result<(), SmartHusError> {
        if !device.is_sensor() {
            return Err(ValidationError::NotASensor.into());
        }
        self.states
            .write_current_state(&device.serial_no, value)
            .await
    }

    /// Switch an on/off actuator on.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] when the device is not an
    /// on/off actuator, or a storage error from the store.
    #[tracing::instrument(skip(self, device), fields(serial_no = %device.serial_no))]
    pub async fn turn_on(&self, device: &Device) -> Result<(), SmartHusError> {
        if device.kind.actuator_kind() != Some(ActuatorKind::OnOff) {
            return Err(ValidationError::NotAnOnOffActuator.into());
        }
        self.states.write_current_state(&device.serial_no, 1.0).await
    }

    /// Switch any actuator off.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] when the device is not an
    /// actuator, or a storage error from the store.
    #[tracing::instrument(skip(self, device), fields(serial_no = %device.serial_no))]
    pub async fn turn_off(&self, device: &Device) -> Result<(), SmartHusError> {
        if !device.is_actuator() {
            return Err(ValidationError::NotAnActuator.into());
        }
        self.states.write_current_state(&device.serial_no, 0.0).await
    }

    /// Set the target temperature of a heat-control actuator.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] when the device is not a
    /// heat-control actuator, or a storage error from the store.
    #[tracing::instrument(skip(self, device), fields(serial_no = %device.serial_no))]
    pub async fn set_temperature(
        &self,
        device: &Device,
        value: f64,
    ) -> Result<(), SmartHusError> {
        if device.kind.actuator_kind() != Some(ActuatorKind::HeatControl) {
            return Err(ValidationError::NotAHeatActuator.into());
        }
        self.states
            .write_current_state(&device.serial_no, value)
            .await
    }
}
