//! # smarthus-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that the storage adapter implements
//!   (driven/outbound ports):
//!   - [`ports::DeviceStateStore`] — latest persisted value per device
//!   - [`ports::MeasurementStore`] — append-only measurement log
//!   - [`ports::RoomRepository`] / [`ports::DeviceRepository`] — house
//!     structure persistence
//! - Provide use-case services:
//!   - [`services::device_control::DeviceControlService`] — status
//!     formatting and actuation
//!   - [`services::analytics_service::AnalyticsService`] — derived
//!     statistics over the measurement log
//!   - [`services::house_service::HouseService`] — registry persistence
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `smarthus-domain` only. Never imports adapter crates; adapters
//! depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
