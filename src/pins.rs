//! GPIO assignments and electrical polarity for the garage door board.
//!
//! Single source of truth for default pin numbers and active levels.
//! [`DeviceConfig`](crate::config::DeviceConfig) starts from these values;
//! drivers never hard-code a level.
//!
//! Pin numbers follow the BCM numbering of the Raspberry Pi header
//! (wiringPi 0 and 2) and map 1:1 to GPIO numbers on ESP32 boards.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Door position sensor (reed switch to ground, internal pull-up)
// ---------------------------------------------------------------------------

/// Digital input: door position reed switch.
pub const DOOR_SENSOR_GPIO: u8 = 17;
/// Pulled-up input reads HIGH when the magnet is away, i.e. the door is open.
pub const DOOR_OPEN_LEVEL: PinLevel = PinLevel::High;

// ---------------------------------------------------------------------------
// Opener relay (active-low relay module)
// ---------------------------------------------------------------------------

/// Digital output: relay driving the opener's push-button contacts.
pub const RELAY_GPIO: u8 = 27;
/// Relay modules on this board energise the coil when the line is LOW.
pub const RELAY_ACTIVE_LEVEL: PinLevel = PinLevel::Low;

// ---------------------------------------------------------------------------
// Logic level
// ---------------------------------------------------------------------------

/// Electrical level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    pub fn from_high(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    pub fn inverse(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}
