//! Door position sensor (reed switch) driver.
//!
//! Wraps any embedded-hal [`InputPin`] — an ESP-IDF `PinDriver`, a Linux
//! GPIO line, or a [`SimInputPin`](super::sim_pin::SimInputPin) on the
//! host — and turns sampled levels into debounced [`DoorState`] edges.
//!
//! The driver knows nothing about the event queue; the runtime polls it
//! and forwards edges.

use core::time::Duration;

use embedded_hal::digital::InputPin;

use crate::app::state::DoorState;
use crate::error::HardwareError;
use crate::pins::PinLevel;

use super::debounce::Debouncer;

pub struct DoorSensor<P> {
    pin: P,
    open_level: PinLevel,
    debouncer: Debouncer,
}

impl<P: InputPin> DoorSensor<P> {
    /// Read the current level once; it becomes the initial stable state.
    pub fn new(mut pin: P, open_level: PinLevel, debounce: Duration) -> Result<Self, HardwareError> {
        let high = pin.is_high().map_err(|_| HardwareError::SensorReadFailed)?;
        let open = high == open_level.is_high();
        Ok(Self {
            pin,
            open_level,
            debouncer: Debouncer::new(open, debounce),
        })
    }

    /// Debounced door state.
    pub fn state(&self) -> DoorState {
        if self.debouncer.stable() {
            DoorState::Open
        } else {
            DoorState::Closed
        }
    }

    /// Sample the pin at `now`.  Returns the new state on a debounced edge.
    pub fn poll(&mut self, now: Duration) -> Result<Option<DoorState>, HardwareError> {
        let high = self
            .pin
            .is_high()
            .map_err(|_| HardwareError::SensorReadFailed)?;
        let open = high == self.open_level.is_high();
        Ok(self.debouncer.update(open, now).map(|open| {
            if open { DoorState::Open } else { DoorState::Closed }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::sim_pin::SimLine;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn initial_level_maps_through_polarity() {
        let line = SimLine::new(PinLevel::High);
        let sensor = DoorSensor::new(line.input(), PinLevel::High, ms(100)).unwrap();
        assert_eq!(sensor.state(), DoorState::Open);

        let sensor = DoorSensor::new(line.input(), PinLevel::Low, ms(100)).unwrap();
        assert_eq!(sensor.state(), DoorState::Closed);
    }

    #[test]
    fn unreadable_line_fails_construction() {
        let line = SimLine::new(PinLevel::High);
        line.set_failing(true);
        let err = DoorSensor::new(line.input(), PinLevel::High, ms(100)).err();
        assert_eq!(err, Some(HardwareError::SensorReadFailed));
    }

    #[test]
    fn edge_reported_after_debounce() {
        let line = SimLine::new(PinLevel::Low);
        let mut sensor = DoorSensor::new(line.input(), PinLevel::High, ms(100)).unwrap();
        assert_eq!(sensor.state(), DoorState::Closed);

        line.set(PinLevel::High);
        assert_eq!(sensor.poll(ms(0)).unwrap(), None);
        assert_eq!(sensor.poll(ms(50)).unwrap(), None);
        assert_eq!(sensor.poll(ms(100)).unwrap(), Some(DoorState::Open));
        assert_eq!(sensor.poll(ms(150)).unwrap(), None);
        assert_eq!(sensor.state(), DoorState::Open);
    }
}
