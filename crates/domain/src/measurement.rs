//! Measurement — an immutable, timestamped value in the historical log.

use serde::{Deserialize, Serialize};

use crate::id::SerialNo;
use crate::time::Timestamp;

/// A single recorded reading for a device. Measurements are append-only
/// facts: never updated, never deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub serial_no: SerialNo,
    pub timestamp: Timestamp,
    pub value: f64,
}

impl Measurement {
    /// Create a new measurement fact.
    pub fn new(serial_no: impl Into<SerialNo>, timestamp: Timestamp, value: f64) -> Self {
        Self {
            serial_no: serial_no.into(),
            timestamp,
            value,
        }
    }
}
