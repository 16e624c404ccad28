//! Visitor dispatch over the closed device-kind set.
//!
//! External code that needs to react differently per concrete kind implements
//! [`DeviceVisitor`] and calls [`Device::accept`]. Dispatch is an exhaustive
//! match, so adding a kind to [`DeviceKind`](crate::device::DeviceKind) forces
//! every visitor to grow a handler. There is intentionally no default or
//! fallback handler.

use crate::device::{Device, DeviceKind};

/// One handler per device kind.
pub trait DeviceVisitor {
    fn visit_temperature_sensor(&mut self, device: &Device);
    fn visit_humidity_sensor(&mut self, device: &Device);
    fn visit_energy_meter(&mut self, device: &Device);
    fn visit_air_quality_sensor(&mut self, device: &Device);
    fn visit_light_bulb(&mut self, device: &Device);
    fn visit_smart_charger(&mut self, device: &Device);
    fn visit_smart_outlet(&mut self, device: &Device);
    fn visit_dehumidifier(&mut self, device: &Device);
    fn visit_heat_oven(&mut self, device: &Device);
    fn visit_heat_pump(&mut self, device: &Device);
    fn visit_floor_heating_panel(&mut self, device: &Device);
}

impl Device {
    /// Dispatch to exactly one handler on `visitor`, chosen by kind.
    pub fn accept<V: DeviceVisitor + ?Sized>(&self, visitor: &mut V) {
        match self.kind {
            DeviceKind::TemperatureSensor => visitor.visit_temperature_sensor(self),
            DeviceKind::HumiditySensor => visitor.visit_humidity_sensor(self),
            DeviceKind::EnergyMeter => visitor.visit_energy_meter(self),
            DeviceKind::AirQualitySensor => visitor.visit_air_quality_sensor(self),
            DeviceKind::LightBulb => visitor.visit_light_bulb(self),
            DeviceKind::SmartCharger => visitor.visit_smart_charger(self),
            DeviceKind::SmartOutlet => visitor.visit_smart_outlet(self),
            DeviceKind::Dehumidifier => visitor.visit_dehumidifier(self),
            DeviceKind::HeatOven => visitor.visit_heat_oven(self),
            DeviceKind::HeatPump => visitor.visit_heat_pump(self),
            DeviceKind::FloorHeatingPanel => visitor.visit_floor_heating_panel(self),
        }
    }
}
