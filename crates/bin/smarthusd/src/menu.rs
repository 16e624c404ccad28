//! Interactive management console over stdin/stdout.

use chrono::NaiveDate;

use smarthus_app::ports::{DeviceRepository, DeviceStateStore, MeasurementStore, RoomRepository};
use smarthus_app::services::{AnalyticsService, DeviceControlService, HouseService};
use smarthus_domain::device::Device;
use smarthus_domain::error::SmartHusError;
use smarthus_domain::house::House;
use smarthus_domain::id::SerialNo;
use smarthus_domain::measurement::Measurement;
use smarthus_domain::time;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// One parsed console command.
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Rooms,
    Devices,
    Find { serial: String },
    Move { serial: String, room: String },
    Record { serial: String, value: f64 },
    TurnOn { serial: String },
    TurnOff { serial: String },
    SetTemperature { serial: String, value: f64 },
    Report,
    Humidity { day: NaiveDate, room: String },
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Self::Empty;
        };
        let rest: Vec<&str> = words.collect();
        match (verb, rest.as_slice()) {
            ("help", []) => Self::Help,
            ("rooms", []) => Self::Rooms,
            ("devices", []) => Self::Devices,
            ("find", [serial]) => Self::Find {
                serial: (*serial).to_string(),
            },
            ("move", [serial, room @ ..]) if !room.is_empty() => Self::Move {
                serial: (*serial).to_string(),
                room: room.join(" "),
            },
            ("record", [serial, value]) => match value.parse() {
                Ok(value) => Self::Record {
                    serial: (*serial).to_string(),
                    value,
                },
                Err(_) => Self::Unknown(line.to_string()),
            },
            ("on", [serial]) => Self::TurnOn {
                serial: (*serial).to_string(),
            },
            ("off", [serial]) => Self::TurnOff {
                serial: (*serial).to_string(),
            },
            ("set", [serial, value]) => match value.parse() {
                Ok(value) => Self::SetTemperature {
                    serial: (*serial).to_string(),
                    value,
                },
                Err(_) => Self::Unknown(line.to_string()),
            },
            ("report", []) => Self::Report,
            ("humidity", [day, room @ ..]) if !room.is_empty() => match day.parse() {
                Ok(day) => Self::Humidity {
                    day,
                    room: room.join(" "),
                },
                Err(_) => Self::Unknown(line.to_string()),
            },
            ("quit" | "exit", []) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

const HELP: &str = "\
commands:
  rooms                      list rooms with floor and area
  devices                    list devices with room and live status
  find <serial>              show one device
  move <serial> <room name>  move a device to another room
  record <serial> <value>    append a measurement and refresh current state
  on <serial>                switch an on/off actuator on
  off <serial>               switch an actuator off
  set <serial> <celsius>     set a heat actuator's target temperature
  report                     temperature statistics and coldest room
  humidity <date> <room>     hours with unusually many high humidity readings
  quit                       leave the console";

/// Console session state and the services it drives.
pub struct Console<'a, R, D, S, M> {
    house: &'a mut House,
    houses: &'a HouseService<R, D>,
    control: &'a DeviceControlService<S>,
    analytics: &'a AnalyticsService<M>,
    measurements: &'a M,
}

impl<'a, R, D, S, M> Console<'a, R, D, S, M>
where
    R: RoomRepository,
    D: DeviceRepository,
    S: DeviceStateStore,
    M: MeasurementStore,
{
    pub fn new(
        house: &'a mut House,
        houses: &'a HouseService<R, D>,
        control: &'a DeviceControlService<S>,
        analytics: &'a AnalyticsService<M>,
        measurements: &'a M,
    ) -> Self {
        Self {
            house,
            houses,
            control,
            analytics,
            measurements,
        }
    }

    /// Read commands from stdin until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error when stdin or stdout fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Command::Quit => break,
                Command::Empty => {}
                command => {
                    let output = self.dispatch(command).await;
                    stdout.write_all(output.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                }
            }
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
        }
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> String {
        match command {
            Command::Help => HELP.to_string(),
            Command::Rooms => self.list_rooms(),
            Command::Devices => self.list_devices().await,
            Command::Find { serial } => self.find_device(&serial).await,
            Command::Move { serial, room } => self.move_device(&serial, &room).await,
            Command::Record { serial, value } => self.record(&serial, value).await,
            Command::TurnOn { serial } => self.actuate(&serial, Actuation::On).await,
            Command::TurnOff { serial } => self.actuate(&serial, Actuation::Off).await,
            Command::SetTemperature { serial, value } => {
                self.actuate(&serial, Actuation::Temperature(value)).await
            }
            Command::Report => self.report().await,
            Command::Humidity { day, room } => self.humidity(day, &room).await,
            Command::Unknown(line) => format!("unknown command '{line}', try 'help'"),
            Command::Quit | Command::Empty => String::new(),
        }
    }

    fn list_rooms(&self) -> String {
        let mut out = String::new();
        for room in self.house.get_all_rooms() {
            out.push_str(&format!(
                "{:<16} floor {:>2}  {:>6.2} m²\n",
                room.name, room.floor, room.area
            ));
        }
        out.push_str(&format!("total area: {:.2} m²", self.house.total_area()));
        out
    }

    async fn list_devices(&self) -> String {
        let mut out = String::new();
        for device in self.house.get_all_devices() {
            let room = self
                .house
                .get_room_with_device(&device.serial_no)
                .map(|r| r.name.clone())
                .unwrap_or_else(|_| "?".to_string());
            let status = self.status_or_unavailable(device).await;
            out.push_str(&format!(
                "{:<16} {:<20} {:<16} {}\n",
                device.serial_no, device.kind.label(), room, status
            ));
        }
        out.push_str(&format!(
            "{} devices ({} sensors, {} actuators)",
            self.house.no_of_devices(),
            self.house.no_of_sensors(),
            self.house.no_of_actuators()
        ));
        out
    }

    async fn find_device(&self, serial: &str) -> String {
        let serial = SerialNo::from(serial);
        let Some(device) = self.house.find_device_by_serial_no(&serial) else {
            return format!("no device with serial '{serial}'");
        };
        let room = self
            .house
            .get_room_with_device(&serial)
            .map(|r| r.name.clone())
            .unwrap_or_else(|_| "?".to_string());
        let status = self.status_or_unavailable(device).await;
        let latest = match self.analytics.most_recent_reading(device).await {
            Ok(Some(value)) => format!("{value}"),
            Ok(None) => "none".to_string(),
            Err(err) => format!("error: {err}"),
        };
        format!(
            "{} {} ({}) by {}\n  room:   {}\n  status: {}\n  last measurement: {}",
            device.kind.label(),
            device.product_name,
            device.category(),
            device.producer,
            room,
            status,
            latest
        )
    }

    async fn move_device(&mut self, serial: &str, room_name: &str) -> String {
        let serial = SerialNo::from(serial);
        let Ok(from) = self.house.get_room_with_device(&serial).map(|r| r.id) else {
            return format!("no device with serial '{serial}'");
        };
        let Some(to) = self
            .house
            .get_all_rooms()
            .iter()
            .find(|r| r.name == room_name)
            .map(|r| r.id)
        else {
            return format!("no room named '{room_name}'");
        };
        match self.houses.move_device(self.house, &serial, from, to).await {
            Ok(()) => format!("moved {serial} to {room_name}"),
            Err(err) => format!("error: {err}"),
        }
    }

    async fn record(&self, serial: &str, value: f64) -> String {
        let serial = SerialNo::from(serial);
        let Some(device) = self.house.find_device_by_serial_no(&serial) else {
            return format!("no device with serial '{serial}'");
        };
        // Refresh current state first: its sensor check rejects actuator
        // serials before anything lands in the log.
        let measurement = Measurement::new(serial.clone(), time::now(), value);
        let result = async {
            self.control.set_current_value(device, value).await?;
            self.measurements.append(measurement).await?;
            Ok::<(), SmartHusError>(())
        }
        .await;
        match result {
            Ok(()) => format!("recorded {value} for {serial}"),
            Err(err) => format!("error: {err}"),
        }
    }

    async fn actuate(&self, serial: &str, actuation: Actuation) -> String {
        let serial = SerialNo::from(serial);
        let Some(device) = self.house.find_device_by_serial_no(&serial) else {
            return format!("no device with serial '{serial}'");
        };
        let result = match actuation {
            Actuation::On => self.control.turn_on(device).await,
            Actuation::Off => self.control.turn_off(device).await,
            Actuation::Temperature(value) => self.control.set_temperature(device, value).await,
        };
        match result {
            Ok(()) => self.status_or_unavailable(device).await,
            Err(err) => format!("error: {err}"),
        }
    }

    async fn report(&self) -> String {
        let mut out = String::new();
        match self.analytics.describe_temperature_in_rooms(self.house).await {
            Ok(summaries) if summaries.is_empty() => {
                out.push_str("no temperature measurements recorded yet");
                return out;
            }
            Ok(summaries) => {
                for (name, summary) in summaries {
                    out.push_str(&format!(
                        "{:<16} min {:>6.2}  max {:>6.2}  avg {:>6.2}\n",
                        name, summary.min, summary.max, summary.avg
                    ));
                }
            }
            Err(err) => return format!("error: {err}"),
        }
        match self.analytics.coldest_room(self.house).await {
            Ok(room) => out.push_str(&format!("coldest room: {}", room.name)),
            Err(err) => out.push_str(&format!("coldest room: {err}")),
        }
        out
    }

    async fn humidity(&self, day: NaiveDate, room_name: &str) -> String {
        let Some(room) = self
            .house
            .get_all_rooms()
            .iter()
            .find(|r| r.name == room_name)
        else {
            return format!("no room named '{room_name}'");
        };
        match self
            .analytics
            .hours_when_humidity_above_average(self.house, room.id, day)
            .await
        {
            Ok(hours) if hours.is_empty() => {
                format!("no unusually humid hours in {room_name} on {day}")
            }
            Ok(hours) => {
                let hours: Vec<String> = hours.iter().map(|h| format!("{h:02}:00")).collect();
                format!("humid hours in {room_name} on {day}: {}", hours.join(", "))
            }
            Err(err) => format!("error: {err}"),
        }
    }

    async fn status_or_unavailable(&self, device: &Device) -> String {
        match self.control.status_message(device).await {
            Ok(status) => status,
            Err(SmartHusError::NotFound(_)) => "unavailable".to_string(),
            Err(err) => format!("error: {err}"),
        }
    }
}

enum Actuation {
    On,
    Off,
    Temperature(f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthus_adapter_storage_sqlite_sqlx::{
        Config, SqliteDeviceRepository, SqliteDeviceStateStore, SqliteMeasurementStore,
        SqliteRoomRepository,
    };
    use smarthus_domain::device::DeviceKind;

    struct Fixture {
        houses: HouseService<SqliteRoomRepository, SqliteDeviceRepository>,
        control: DeviceControlService<SqliteDeviceStateStore>,
        analytics: AnalyticsService<SqliteMeasurementStore>,
        measurements: SqliteMeasurementStore,
        house: House,
    }

    async fn fixture_with_device(kind: DeviceKind) -> Fixture {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let pool = db.pool().clone();

        let houses = HouseService::new(
            SqliteRoomRepository::new(pool.clone()),
            SqliteDeviceRepository::new(pool.clone()),
        );
        let control = DeviceControlService::new(SqliteDeviceStateStore::new(pool.clone()));
        let analytics = AnalyticsService::new(SqliteMeasurementStore::new(pool.clone()));
        let measurements = SqliteMeasurementStore::new(pool);

        let mut house = House::new();
        house.create_floor();
        let room = houses
            .create_room(&mut house, 1, 10.0, "Office")
            .await
            .unwrap();
        let device = Device::builder()
            .serial_no("sn-1")
            .kind(kind)
            .build()
            .unwrap();
        houses
            .register_device(&mut house, device, room.id)
            .await
            .unwrap();

        Fixture {
            houses,
            control,
            analytics,
            measurements,
            house,
        }
    }

    #[tokio::test]
    async fn should_leave_log_untouched_when_record_is_rejected() {
        let mut fx = fixture_with_device(DeviceKind::LightBulb).await;
        let mut console = Console::new(
            &mut fx.house,
            &fx.houses,
            &fx.control,
            &fx.analytics,
            &fx.measurements,
        );

        let output = console
            .dispatch(Command::Record {
                serial: "sn-1".to_string(),
                value: 55.0,
            })
            .await;

        assert!(output.starts_with("error"), "unexpected output: {output}");
        let logged = fx
            .measurements
            .find_all(&SerialNo::from("sn-1"))
            .await
            .unwrap();
        assert!(logged.is_empty());
    }

    #[tokio::test]
    async fn should_append_measurement_and_refresh_state_for_sensor() {
        let mut fx = fixture_with_device(DeviceKind::HumiditySensor).await;
        let mut console = Console::new(
            &mut fx.house,
            &fx.houses,
            &fx.control,
            &fx.analytics,
            &fx.measurements,
        );

        let output = console
            .dispatch(Command::Record {
                serial: "sn-1".to_string(),
                value: 55.0,
            })
            .await;

        assert_eq!(output, "recorded 55 for sn-1");
        let logged = fx
            .measurements
            .find_all(&SerialNo::from("sn-1"))
            .await
            .unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].value, 55.0);

        let device = fx
            .house
            .find_device_by_serial_no(&SerialNo::from("sn-1"))
            .unwrap();
        assert_eq!(fx.control.current_value(device).await.unwrap(), 55.0);
    }

    #[test]
    fn should_parse_bare_commands() {
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("rooms"), Command::Rooms);
        assert_eq!(Command::parse("devices"), Command::Devices);
        assert_eq!(Command::parse("report"), Command::Report);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("exit"), Command::Quit);
    }

    #[test]
    fn should_parse_find_with_serial() {
        assert_eq!(
            Command::parse("find tmp-4632-baaa"),
            Command::Find {
                serial: "tmp-4632-baaa".to_string()
            }
        );
    }

    #[test]
    fn should_parse_move_with_multi_word_room_name() {
        assert_eq!(
            Command::parse("move lmp-0041-cdef Living Room"),
            Command::Move {
                serial: "lmp-0041-cdef".to_string(),
                room: "Living Room".to_string()
            }
        );
    }

    #[test]
    fn should_parse_record_with_numeric_value() {
        assert_eq!(
            Command::parse("record tmp-4632-baaa 19.5"),
            Command::Record {
                serial: "tmp-4632-baaa".to_string(),
                value: 19.5
            }
        );
    }

    #[test]
    fn should_parse_humidity_with_date_and_room() {
        assert_eq!(
            Command::parse("humidity 2024-03-01 Bathroom 1"),
            Command::Humidity {
                day: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                room: "Bathroom 1".to_string()
            }
        );
    }

    #[test]
    fn should_treat_blank_line_as_empty() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse(""), Command::Empty);
    }

    #[test]
    fn should_report_unknown_for_malformed_input() {
        assert!(matches!(Command::parse("move"), Command::Unknown(_)));
        assert!(matches!(
            Command::parse("record sn-1 not-a-number"),
            Command::Unknown(_)
        ));
        assert!(matches!(
            Command::parse("humidity yesterday Office"),
            Command::Unknown(_)
        ));
        assert!(matches!(Command::parse("blargh"), Command::Unknown(_)));
    }
}
