//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`SmartHusError`]
//! via `#[from]` or by boxing into the `Storage` variant. Failures are always
//! returned to the caller; the core never prints and never panics.

/// Top-level error type returned by all fallible domain and application
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum SmartHusError {
    /// A domain invariant was violated by the caller's input.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A device, room, or current-state row does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The operation conflicts with already-registered state.
    #[error("conflict")]
    Conflict(#[from] ConflictError),

    /// The persistence layer failed. A failed write implies a completed
    /// rollback; no partial effect is observable.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// A lookup failed because the referenced thing does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} '{id}' not found")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Device"`, `"Room"`).
    pub entity: &'static str,
    /// The identifier that failed to resolve.
    pub id: String,
}

/// The operation would violate a uniqueness or placement invariant.
#[derive(Debug, thiserror::Error)]
pub enum ConflictError {
    /// A device with this serial number is already registered.
    #[error("device with serial number '{serial_no}' is already registered")]
    DuplicateSerialNo {
        /// The serial number that collided.
        serial_no: String,
    },
}

/// Caller input violated a domain invariant.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A serial number was empty.
    #[error("serial number must not be empty")]
    EmptySerialNo,

    /// A device was built without a kind.
    #[error("device kind is required")]
    MissingKind,

    /// A room was created with a non-positive area.
    #[error("room area must be greater than zero")]
    NonPositiveArea,

    /// A sensor-only operation was invoked on an actuator.
    #[error("operation requires a sensor device")]
    NotASensor,

    /// An actuator-only operation was invoked on a sensor.
    #[error("operation requires an actuator device")]
    NotAnActuator,

    /// The operation requires an on/off actuator.
    #[error("operation requires an on/off actuator")]
    NotAnOnOffActuator,

    /// The operation requires a heat-control actuator.
    #[error("operation requires a heat-control actuator")]
    NotAHeatActuator,
}
