//! Simulated GPIO lines for host builds and tests.
//!
//! A [`SimLine`] is a shared electrical level.  Input and output pin
//! handles created from the same line see each other's writes, and the
//! line itself can be driven from anywhere (stdin commands in the host
//! binary, assertions in tests).  A line can also be told to fail every
//! access so error paths can be exercised.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin, StatefulOutputPin};

use crate::pins::PinLevel;

/// Error returned by a simulated pin whose line is set to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Default)]
struct LineState {
    high: AtomicBool,
    failing: AtomicBool,
}

/// Shared handle to one simulated line.
#[derive(Clone, Default)]
pub struct SimLine {
    state: Arc<LineState>,
}

impl SimLine {
    pub fn new(level: PinLevel) -> Self {
        let line = Self::default();
        line.set(level);
        line
    }

    pub fn set(&self, level: PinLevel) {
        self.state.high.store(level.is_high(), Ordering::Release);
    }

    pub fn level(&self) -> PinLevel {
        PinLevel::from_high(self.state.high.load(Ordering::Acquire))
    }

    /// Make every pin access on this line fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::Release);
    }

    pub fn input(&self) -> SimInputPin {
        SimInputPin { line: self.clone() }
    }

    pub fn output(&self) -> SimOutputPin {
        SimOutputPin { line: self.clone() }
    }

    fn check(&self) -> Result<(), SimPinError> {
        if self.state.failing.load(Ordering::Acquire) {
            Err(SimPinError)
        } else {
            Ok(())
        }
    }
}

pub struct SimInputPin {
    line: SimLine,
}

impl ErrorType for SimInputPin {
    type Error = SimPinError;
}

impl InputPin for SimInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.line.check()?;
        Ok(self.line.level().is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_high()?)
    }
}

pub struct SimOutputPin {
    line: SimLine,
}

impl ErrorType for SimOutputPin {
    type Error = SimPinError;
}

impl OutputPin for SimOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.line.check()?;
        self.line.set(PinLevel::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.line.check()?;
        self.line.set(PinLevel::High);
        Ok(())
    }
}

impl StatefulOutputPin for SimOutputPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.line.check()?;
        Ok(self.line.level().is_high())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_set_high()?)
    }
}
