//! Use-case services orchestrating domain objects through the ports.

pub mod analytics_service;
pub mod device_control;
pub mod house_service;

pub use analytics_service::{AnalyticsService, TemperatureSummary};
pub use device_control::DeviceControlService;
pub use house_service::HouseService;
