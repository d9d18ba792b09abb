//! Activation gate — rate limiting for the opener relay.
//!
//! Garage door openers treat every button press as "next step"
//! (open → stop → close).  Two pulses in quick succession would stop the
//! door right after starting it, so requests closer together than
//! `min_interval` are dropped.
//!
//! The comparison is strict: a request exactly `min_interval` after the
//! last granted one is granted.  A request never granted before is always
//! granted.

use core::time::Duration;

use log::info;

/// Why a gate could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// `min_interval` would let a new pulse start before the last one ends.
    IntervalShorterThanPulse,
}

impl core::fmt::Display for GateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IntervalShorterThanPulse => {
                write!(f, "minimum activation interval shorter than relay pulse")
            }
        }
    }
}

impl core::error::Error for GateError {}

/// Outcome of [`ActivationGate::try_activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Caller must pulse the relay for [`ActivationGate::pulse_duration`].
    Granted,
    /// Too soon after the last grant; drop the request.
    Denied,
}

/// Minimum-interval rate limiter plus the pulse length it protects.
#[derive(Debug, Clone)]
pub struct ActivationGate {
    /// Timestamp of the last granted activation, `None` before the first.
    last_activation: Option<Duration>,
    min_interval: Duration,
    pulse_duration: Duration,
}

impl ActivationGate {
    /// Build a gate.  `min_interval` must cover at least one pulse.
    pub fn new(pulse_duration: Duration, min_interval: Duration) -> Result<Self, GateError> {
        if min_interval < pulse_duration {
            return Err(GateError::IntervalShorterThanPulse);
        }
        Ok(Self {
            last_activation: None,
            min_interval,
            pulse_duration,
        })
    }

    /// Default policy: the interval is twice the pulse.
    pub fn with_pulse(pulse_duration: Duration) -> Self {
        Self {
            last_activation: None,
            min_interval: pulse_duration * 2,
            pulse_duration,
        }
    }

    /// Decide whether an activation at `now` is honoured.  A grant records
    /// `now` as the new reference point; a denial changes nothing.
    pub fn try_activate(&mut self, now: Duration) -> Activation {
        if let Some(last) = self.last_activation {
            let since = now.saturating_sub(last);
            if since < self.min_interval {
                info!(
                    "Activation denied: {}ms since last, minimum {}ms",
                    since.as_millis(),
                    self.min_interval.as_millis()
                );
                return Activation::Denied;
            }
        }
        self.last_activation = Some(now);
        Activation::Granted
    }

    pub fn pulse_duration(&self) -> Duration {
        self.pulse_duration
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Timestamp of the last grant, if any.
    pub fn last_activation(&self) -> Option<Duration> {
        self.last_activation
    }
}
