//! Device configuration parameters
//!
//! All tunable parameters for the garage door controller.
//! Values can be overridden from a JSON file on the host (see
//! [`JsonFileConfig`](crate::adapters::config_file::JsonFileConfig)).

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins::{self, PinLevel};

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    // --- Pins ---
    /// Door position sensor input
    pub door_sensor_gpio: u8,
    /// Opener relay output
    pub relay_gpio: u8,
    /// Sensor level that means the door is open
    pub door_open_level: PinLevel,
    /// Relay level that energises the coil
    pub relay_active_level: PinLevel,

    // --- Door sensor ---
    /// A sensor level must hold this long before it is reported (milliseconds)
    pub sensor_debounce_ms: u32,
    /// Sensor sampling period (milliseconds)
    pub sensor_poll_interval_ms: u32,

    // --- Relay ---
    /// How long the relay is held active per activation (milliseconds)
    pub relay_pulse_ms: u32,
    /// Minimum time between granted activations (milliseconds).
    /// `None` means twice the pulse duration.
    pub min_activation_interval_ms: Option<u32>,

    // --- Timing ---
    /// Open-duration refresh tick (milliseconds)
    pub tick_interval_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Pins
            door_sensor_gpio: pins::DOOR_SENSOR_GPIO,
            relay_gpio: pins::RELAY_GPIO,
            door_open_level: pins::DOOR_OPEN_LEVEL,
            relay_active_level: pins::RELAY_ACTIVE_LEVEL,

            // Door sensor
            sensor_debounce_ms: 1000,
            sensor_poll_interval_ms: 20, // 50 Hz

            // Relay
            relay_pulse_ms: 500,
            min_activation_interval_ms: None,

            // Timing
            tick_interval_ms: 1000, // 1 Hz
        }
    }
}

impl DeviceConfig {
    pub fn sensor_debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.sensor_debounce_ms))
    }

    pub fn sensor_poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.sensor_poll_interval_ms))
    }

    pub fn relay_pulse(&self) -> Duration {
        Duration::from_millis(u64::from(self.relay_pulse_ms))
    }

    /// Effective activation rate limit, falling back to twice the pulse.
    pub fn min_activation_interval(&self) -> Duration {
        match self.min_activation_interval_ms {
            Some(ms) => Duration::from_millis(u64::from(ms)),
            None => self.relay_pulse() * 2,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.door_sensor_gpio == self.relay_gpio {
            return Err(ConfigError::ValidationFailed(
                "door_sensor_gpio and relay_gpio must differ",
            ));
        }
        if !(50..=10_000).contains(&self.relay_pulse_ms) {
            return Err(ConfigError::ValidationFailed(
                "relay_pulse_ms must be 50–10000",
            ));
        }
        if let Some(min) = self.min_activation_interval_ms {
            if min < self.relay_pulse_ms {
                return Err(ConfigError::ValidationFailed(
                    "min_activation_interval_ms must be >= relay_pulse_ms",
                ));
            }
        }
        if !(100..=60_000).contains(&self.tick_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "tick_interval_ms must be 100–60000",
            ));
        }
        if self.sensor_debounce_ms > 10_000 {
            return Err(ConfigError::ValidationFailed(
                "sensor_debounce_ms must be 0–10000",
            ));
        }
        if !(1..=1000).contains(&self.sensor_poll_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "sensor_poll_interval_ms must be 1–1000",
            ));
        }
        Ok(())
    }
}
