//! # smarthus-domain
//!
//! Pure domain model for the smarthus building-management system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **device taxonomy** (closed set of device kinds, their
//!   capability, units, and visitor dispatch)
//! - Define the **house aggregate** (floors, rooms, and the device-to-room
//!   placement relation)
//! - Define **measurements** (immutable timestamped facts)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod house;
pub mod measurement;
pub mod visitor;
