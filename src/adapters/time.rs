//! Monotonic clock adapter.
//!
//! - **`target_os = "espidf"`** wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** uses `std::time::Instant` for host
//!   runs and tests.
//!
//! Timestamps are offsets from the moment the clock was created.

use core::time::Duration;

use crate::app::ports::Clock;

pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    #[cfg(target_os = "espidf")]
    start_us: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
            #[cfg(target_os = "espidf")]
            start_us: Self::timer_us(),
        }
    }

    #[cfg(target_os = "espidf")]
    fn timer_us() -> u64 {
        // SAFETY: esp_timer_get_time has no preconditions once the system is up.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }
}

impl Clock for MonotonicClock {
    #[cfg(target_os = "espidf")]
    fn now(&self) -> Duration {
        Duration::from_micros(Self::timer_us().saturating_sub(self.start_us))
    }

    #[cfg(not(target_os = "espidf"))]
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}
