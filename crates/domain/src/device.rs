//! Device taxonomy — the closed set of device kinds and the device entity.
//!
//! A device's kind is fixed at construction and never changes. Everything
//! derivable from the kind (capability, unit, actuator shape) is computed on
//! demand and never stored redundantly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SmartHusError, ValidationError};
use crate::id::{DeviceId, SerialNo};

/// Whether a device observes the world or acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// Produces readings (temperature, humidity, energy, air quality).
    Sensor,
    /// Receives commands (switching, heat set-points).
    Actuator,
}

impl Capability {
    /// Human-readable category label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sensor => "Sensor",
            Self::Actuator => "Actuator",
        }
    }
}

/// State shape of an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorKind {
    /// Boolean persisted state: `1` is on, anything else is off.
    OnOff,
    /// Numeric set-point in degrees Celsius; `0` means off.
    HeatControl,
}

/// The closed set of device kinds known to the system.
///
/// This is deliberately not an open plugin mechanism: the set is part of the
/// domain contract, and extending it means extending this enum and the
/// [`DeviceVisitor`](crate::visitor::DeviceVisitor) trait together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    TemperatureSensor,
    HumiditySensor,
    EnergyMeter,
    AirQualitySensor,
    LightBulb,
    SmartCharger,
    SmartOutlet,
    Dehumidifier,
    HeatOven,
    HeatPump,
    FloorHeatingPanel,
}

impl DeviceKind {
    /// All kinds, in a stable order.
    pub const ALL: [Self; 11] = [
        Self::TemperatureSensor,
        Self::HumiditySensor,
        Self::EnergyMeter,
        Self::AirQualitySensor,
        Self::LightBulb,
        Self::SmartCharger,
        Self::SmartOutlet,
        Self::Dehumidifier,
        Self::HeatOven,
        Self::HeatPump,
        Self::FloorHeatingPanel,
    ];

    /// Capability derived from the kind.
    #[must_use]
    pub fn capability(self) -> Capability {
        match self {
            Self::TemperatureSensor
            | Self::HumiditySensor
            | Self::EnergyMeter
            | Self::AirQualitySensor => Capability::Sensor,
            Self::LightBulb
            | Self::SmartCharger
            | Self::SmartOutlet
            | Self::Dehumidifier
            | Self::HeatOven
            | Self::HeatPump
            | Self::FloorHeatingPanel => Capability::Actuator,
        }
    }

    /// State shape for actuators, `None` for sensors.
    #[must_use]
    pub fn actuator_kind(self) -> Option<ActuatorKind> {
        match self {
            Self::LightBulb | Self::SmartCharger | Self::SmartOutlet | Self::Dehumidifier => {
                Some(ActuatorKind::OnOff)
            }
            Self::HeatOven | Self::HeatPump | Self::FloorHeatingPanel => {
                Some(ActuatorKind::HeatControl)
            }
            _ => None,
        }
    }

    /// Fixed measurement unit for sensors, `None` for actuators.
    #[must_use]
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Self::TemperatureSensor => Some("°C"),
            Self::HumiditySensor => Some("%"),
            Self::EnergyMeter => Some("kWh"),
            Self::AirQualitySensor => Some("g/m³"),
            _ => None,
        }
    }

    /// Human-readable type name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TemperatureSensor => "Temperature Sensor",
            Self::HumiditySensor => "Humidity Sensor",
            Self::EnergyMeter => "Energy Meter",
            Self::AirQualitySensor => "Air Quality Sensor",
            Self::LightBulb => "Light Bulb",
            Self::SmartCharger => "Smart Charger",
            Self::SmartOutlet => "Smart Outlet",
            Self::Dehumidifier => "Dehumidifier",
            Self::HeatOven => "Heat Oven",
            Self::HeatPump => "Heat Pump",
            Self::FloorHeatingPanel => "Floor Heating Panel",
        }
    }

    /// Stable storage encoding.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TemperatureSensor => "temperature_sensor",
            Self::HumiditySensor => "humidity_sensor",
            Self::EnergyMeter => "energy_meter",
            Self::AirQualitySensor => "air_quality_sensor",
            Self::LightBulb => "light_bulb",
            Self::SmartCharger => "smart_charger",
            Self::SmartOutlet => "smart_outlet",
            Self::Dehumidifier => "dehumidifier",
            Self::HeatOven => "heat_oven",
            Self::HeatPump => "heat_pump",
            Self::FloorHeatingPanel => "floor_heating_panel",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when decoding an unknown device kind from storage.
#[derive(Debug, thiserror::Error)]
#[error("unknown device kind '{0}'")]
pub struct UnknownDeviceKind(String);

impl FromStr for DeviceKind {
    type Err = UnknownDeviceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownDeviceKind(s.to_string()))
    }
}

/// A physical device installed somewhere in the house.
///
/// Identity is the manufacturer [`SerialNo`]; the [`DeviceId`] only anchors
/// the storage row. Current values and persisted state live in the stores,
/// never on this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub serial_no: SerialNo,
    pub producer: String,
    pub product_name: String,
    pub nickname: Option<String>,
    pub kind: DeviceKind,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Capability derived from the kind; never queries storage.
    #[must_use]
    pub fn capability(&self) -> Capability {
        self.kind.capability()
    }

    /// `"Sensor"` or `"Actuator"`.
    #[must_use]
    pub fn category(&self) -> &'static str {
        self.capability().label()
    }

    /// Whether this device produces readings.
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        self.capability() == Capability::Sensor
    }

    /// Whether this device receives commands.
    #[must_use]
    pub fn is_actuator(&self) -> bool {
        self.capability() == Capability::Actuator
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] when the serial number is empty.
    pub fn validate(&self) -> Result<(), SmartHusError> {
        if self.serial_no.is_empty() {
            return Err(ValidationError::EmptySerialNo.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    serial_no: Option<SerialNo>,
    producer: Option<String>,
    product_name: Option<String>,
    nickname: Option<String>,
    kind: Option<DeviceKind>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn serial_no(mut self, serial_no: impl Into<SerialNo>) -> Self {
        self.serial_no = Some(serial_no.into());
        self
    }

    #[must_use]
    pub fn producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    #[must_use]
    pub fn product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = Some(product_name.into());
        self
    }

    #[must_use]
    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartHusError::Validation`] if the kind is missing or the
    /// serial number is empty.
    pub fn build(self) -> Result<Device, SmartHusError> {
        let kind = self.kind.ok_or(ValidationError::MissingKind)?;
        let device = Device {
            id: self.id.unwrap_or_default(),
            serial_no: self.serial_no.unwrap_or_else(|| SerialNo::new("")),
            producer: self.producer.unwrap_or_default(),
            product_name: self.product_name.unwrap_or_default(),
            nickname: self.nickname,
            kind,
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor() -> Device {
        Device::builder()
            .serial_no("a1b2c3")
            .producer("Bosch")
            .product_name("Thermo 3000")
            .kind(DeviceKind::TemperatureSensor)
            .build()
            .unwrap()
    }

    #[test]
    fn should_derive_capability_from_kind() {
        assert_eq!(
            DeviceKind::TemperatureSensor.capability(),
            Capability::Sensor
        );
        assert_eq!(DeviceKind::HumiditySensor.capability(), Capability::Sensor);
        assert_eq!(DeviceKind::LightBulb.capability(), Capability::Actuator);
        assert_eq!(DeviceKind::HeatPump.capability(), Capability::Actuator);
    }

    #[test]
    fn should_split_actuators_into_on_off_and_heat_control() {
        assert_eq!(
            DeviceKind::SmartOutlet.actuator_kind(),
            Some(ActuatorKind::OnOff)
        );
        assert_eq!(
            DeviceKind::Dehumidifier.actuator_kind(),
            Some(ActuatorKind::OnOff)
        );
        assert_eq!(
            DeviceKind::FloorHeatingPanel.actuator_kind(),
            Some(ActuatorKind::HeatControl)
        );
        assert_eq!(DeviceKind::EnergyMeter.actuator_kind(), None);
    }

    #[test]
    fn should_expose_fixed_units_for_sensors_only() {
        assert_eq!(DeviceKind::TemperatureSensor.unit(), Some("°C"));
        assert_eq!(DeviceKind::HumiditySensor.unit(), Some("%"));
        assert_eq!(DeviceKind::EnergyMeter.unit(), Some("kWh"));
        assert_eq!(DeviceKind::AirQualitySensor.unit(), Some("g/m³"));
        assert_eq!(DeviceKind::HeatOven.unit(), None);
    }

    #[test]
    fn should_report_category_without_touching_storage() {
        let device = sensor();
        assert_eq!(device.category(), "Sensor");
        assert!(device.is_sensor());
        assert!(!device.is_actuator());
    }

    #[test]
    fn should_roundtrip_every_kind_through_storage_encoding() {
        for kind in DeviceKind::ALL {
            let parsed: DeviceKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn should_return_error_when_decoding_unknown_kind() {
        let result: Result<DeviceKind, _> = "toaster".parse();
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_build_when_kind_is_missing() {
        let result = Device::builder().serial_no("a1").build();
        assert!(matches!(
            result,
            Err(SmartHusError::Validation(ValidationError::MissingKind))
        ));
    }

    #[test]
    fn should_reject_build_when_serial_no_is_empty() {
        let result = Device::builder().kind(DeviceKind::LightBulb).build();
        assert!(matches!(
            result,
            Err(SmartHusError::Validation(ValidationError::EmptySerialNo))
        ));
    }

    #[test]
    fn should_roundtrip_device_through_serde_json() {
        let device = sensor();
        let json = serde_json::to_string(&device).unwrap();
        let parsed: Device = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.serial_no, device.serial_no);
        assert_eq!(parsed.kind, device.kind);
        assert_eq!(parsed.producer, "Bosch");
    }
}
