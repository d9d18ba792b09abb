//! Door opener relay driver.
//!
//! The relay shorts the opener's push-button contacts for one pulse.
//! The driver is a dumb actuator: timing the pulse is the runtime's job,
//! rate limiting is the controller's.  The state it reports is read back
//! from the output latch, not remembered, so observers see what the pin
//! actually does.

use embedded_hal::digital::StatefulOutputPin;

use crate::app::state::RelayState;
use crate::error::HardwareError;
use crate::pins::PinLevel;

pub struct RelayDriver<P> {
    pin: P,
    active_level: PinLevel,
}

impl<P: StatefulOutputPin> RelayDriver<P> {
    /// Take the pin and drive it to the inactive level.
    pub fn new(pin: P, active_level: PinLevel) -> Result<Self, HardwareError> {
        let mut relay = Self { pin, active_level };
        relay.release()?;
        Ok(relay)
    }

    pub fn activate(&mut self) -> Result<(), HardwareError> {
        self.drive(self.active_level)
    }

    pub fn release(&mut self) -> Result<(), HardwareError> {
        self.drive(self.active_level.inverse())
    }

    /// Relay state as read back from the pin.
    pub fn state(&mut self) -> Result<RelayState, HardwareError> {
        let high = self
            .pin
            .is_set_high()
            .map_err(|_| HardwareError::RelayReadFailed)?;
        Ok(if high == self.active_level.is_high() {
            RelayState::Active
        } else {
            RelayState::Inactive
        })
    }

    fn drive(&mut self, level: PinLevel) -> Result<(), HardwareError> {
        match level {
            PinLevel::High => self.pin.set_high(),
            PinLevel::Low => self.pin.set_low(),
        }
        .map_err(|_| HardwareError::RelayWriteFailed)
    }
}
