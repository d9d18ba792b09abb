//! Door and relay state types.

use serde::Serialize;

/// Door position, derived solely from the latest debounced sensor edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Open,
    Closed,
}

impl DoorState {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Observed relay level as reported by feedback, not the commanded pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayState {
    Active,
    Inactive,
}

impl RelayState {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Levels read from the hardware once, before the controller starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialLevels {
    pub door: DoorState,
    pub relay: RelayState,
}

impl Default for InitialLevels {
    fn default() -> Self {
        Self {
            door: DoorState::Closed,
            relay: RelayState::Inactive,
        }
    }
}

/// A point-in-time view of the controller, suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DoorSnapshot {
    pub door: DoorState,
    pub relay: RelayState,
    pub open_duration_secs: u32,
}
