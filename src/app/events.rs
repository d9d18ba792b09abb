//! Outbound property updates and domain events.
//!
//! The [`DoorController`](super::controller::DoorController) pushes these
//! through the [`PropertySink`](super::ports::PropertySink) and
//! [`EventSink`](super::ports::EventSink) ports.  Adapters on the other
//! side decide what to do with them — log to the console, forward to the
//! network-exposure layer, etc.

use serde_json::Value;

/// Upper bound of the `openduration` property (one hour).
pub const MAX_OPEN_DURATION_SECS: u32 = 60 * 60;

/// A new value for one of the device's three properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyUpdate {
    /// `open`: whether the door is open.
    Open(bool),
    /// `relay`: whether the relay is observed active.
    Relay(bool),
    /// `openduration`: whole seconds the door has been open, 0–3600.
    OpenDuration(u32),
}

impl PropertyUpdate {
    /// Property name as exposed to remote observers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::Relay(_) => "relay",
            Self::OpenDuration(_) => "openduration",
        }
    }

    pub fn value(&self) -> Value {
        match *self {
            Self::Open(v) | Self::Relay(v) => Value::Bool(v),
            Self::OpenDuration(secs) => Value::from(secs),
        }
    }
}

/// Name-only domain events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorEvent {
    /// A previously closed door was opened.
    Opened,
    /// A previously open door was closed.
    Closed,
    /// The relay was pulsed on request.
    Activated,
}

impl DoorEvent {
    pub const ALL: [DoorEvent; 3] = [Self::Opened, Self::Closed, Self::Activated];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Opened => "Opened",
            Self::Closed => "Closed",
            Self::Activated => "Activated",
        }
    }
}

impl core::fmt::Display for DoorEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
