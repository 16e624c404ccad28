//! Demo house used when the database is empty on first start.

use smarthus_app::ports::{DeviceRepository, DeviceStateStore, RoomRepository};
use smarthus_app::services::{DeviceControlService, HouseService};
use smarthus_domain::device::{Device, DeviceKind};
use smarthus_domain::error::SmartHusError;
use smarthus_domain::house::House;

/// Seed a two-floor house covering every device kind, with plausible
/// initial sensor values, and persist all of it.
///
/// # Errors
///
/// Returns any error from the house service or the state store.
pub async fn seed<R, D, S>(
    houses: &HouseService<R, D>,
    control: &DeviceControlService<S>,
) -> Result<House, SmartHusError>
where
    R: RoomRepository,
    D: DeviceRepository,
    S: DeviceStateStore,
{
    let mut house = House::new();
    house.create_floor();
    house.create_floor();

    let living_room = houses.create_room(&mut house, 1, 39.75, "Living Room").await?;
    let kitchen = houses.create_room(&mut house, 1, 14.25, "Kitchen").await?;
    houses.create_room(&mut house, 1, 13.5, "Entrance").await?;
    let bathroom_1 = houses.create_room(&mut house, 1, 6.3, "Bathroom 1").await?;
    houses.create_room(&mut house, 1, 8.0, "Guest Room").await?;
    let garage = houses.create_room(&mut house, 1, 19.0, "Garage").await?;
    let office = houses.create_room(&mut house, 2, 11.75, "Office").await?;
    let bathroom_2 = houses.create_room(&mut house, 2, 9.25, "Bathroom 2").await?;
    let bedroom = houses.create_room(&mut house, 2, 17.0, "Master Bedroom").await?;

    let devices = [
        (
            device("tmp-4632-baaa", "Bosch", "Thermo 3000", DeviceKind::TemperatureSensor)?,
            living_room.id,
        ),
        (
            device("tmp-9001-cafe", "Bosch", "Thermo 3000", DeviceKind::TemperatureSensor)?,
            office.id,
        ),
        (
            device("hum-2210-aaab", "Netatmo", "HumidSense", DeviceKind::HumiditySensor)?,
            bathroom_1.id,
        ),
        (
            device("nrg-7731-0042", "Tibber", "Pulse", DeviceKind::EnergyMeter)?,
            garage.id,
        ),
        (
            device("air-5512-01ab", "Airthings", "Wave Plus", DeviceKind::AirQualitySensor)?,
            bedroom.id,
        ),
        (
            device("lmp-0041-cdef", "Philips", "Hue White", DeviceKind::LightBulb)?,
            living_room.id,
        ),
        (
            device("chg-8800-e901", "Easee", "Home", DeviceKind::SmartCharger)?,
            garage.id,
        ),
        (
            device("out-1207-77fa", "Shelly", "Plug S", DeviceKind::SmartOutlet)?,
            office.id,
        ),
        (
            device("deh-3302-bb10", "Wood's", "MDK11", DeviceKind::Dehumidifier)?,
            bathroom_2.id,
        ),
        (
            device("ovn-6104-90d3", "Siemens", "HB674", DeviceKind::HeatOven)?,
            kitchen.id,
        ),
        (
            device("pmp-5520-31e0", "Mitsubishi", "Kaiteki", DeviceKind::HeatPump)?,
            living_room.id,
        ),
        (
            device("pnl-4419-02c7", "Adax", "Neo", DeviceKind::FloorHeatingPanel)?,
            bathroom_1.id,
        ),
    ];

    for (device, room) in devices {
        let registered = houses.register_device(&mut house, device, room).await?;
        match registered.kind {
            DeviceKind::TemperatureSensor => {
                control.set_current_value(&registered, 18.1).await?;
            }
            DeviceKind::HumiditySensor => {
                control.set_current_value(&registered, 52.0).await?;
            }
            DeviceKind::EnergyMeter => {
                control.set_current_value(&registered, 1.52).await?;
            }
            DeviceKind::AirQualitySensor => {
                control.set_current_value(&registered, 0.012).await?;
            }
            DeviceKind::HeatPump => {
                control.set_temperature(&registered, 21.0).await?;
            }
            DeviceKind::LightBulb => {
                control.turn_on(&registered).await?;
            }
            _ => {}
        }
    }

    Ok(house)
}

fn device(
    serial: &str,
    producer: &str,
    product: &str,
    kind: DeviceKind,
) -> Result<Device, SmartHusError> {
    Device::builder()
        .serial_no(serial)
        .producer(producer)
        .product_name(product)
        .kind(kind)
        .build()
}
