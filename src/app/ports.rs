//! Port traits — the hexagonal boundary between the door controller and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DoorController (domain)
//! ```
//!
//! Driven adapters (relay, clock, property/event sinks, config storage)
//! implement these traits.  The [`DoorController`](super::controller::DoorController)
//! consumes them via generics, so the domain core never touches a pin.
//!
//! The sinks are push-only: the controller writes current property values
//! and fires domain events, it never reads anything back from them.

use core::time::Duration;

use crate::config::DeviceConfig;

use super::events::{DoorEvent, PropertyUpdate};

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the controller issues pulse intents through this.
///
/// Implementations must return immediately.  The timed return to
/// inactive belongs to the hardware side, and the observed relay level
/// comes back later as a `RelayFeedback` event.
pub trait RelayPort {
    /// Drive the relay active for `active_for`, then release it.
    fn pulse(&mut self, active_for: Duration);
}

// ───────────────────────────────────────────────────────────────
// Sink ports (driven adapters: domain → network exposure / logging)
// ───────────────────────────────────────────────────────────────

/// Receives every property value the controller publishes.
pub trait PropertySink {
    fn publish(&mut self, update: PropertyUpdate);
}

/// Receives every domain event the controller fires.
pub trait EventSink {
    fn emit(&mut self, event: DoorEvent);
}

/// Fan out to two sinks, first `A` then `B`.
impl<A: PropertySink, B: PropertySink> PropertySink for (A, B) {
    fn publish(&mut self, update: PropertyUpdate) {
        self.0.publish(update);
        self.1.publish(update);
    }
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: DoorEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.  Timestamps are offsets from an arbitrary origin
/// fixed when the clock is created.
pub trait Clock {
    fn now(&self) -> Duration;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists device configuration.
///
/// Implementations MUST validate before persisting and MUST return
/// validated configuration from `load`.  Invalid ranges are rejected with
/// [`ConfigError::ValidationFailed`], never clamped.
pub trait ConfigPort {
    /// Load configuration, returning [`DeviceConfig::default()`] when nothing is stored.
    fn load(&self) -> Result<DeviceConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &DeviceConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config could not be deserialized.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for ConfigError {}
