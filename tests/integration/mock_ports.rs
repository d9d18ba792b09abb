//! Mock port adapters for integration tests.
//!
//! Records every publication and pulse so tests can assert on the full
//! output history without pins, timers or a network layer.

use core::cell::{Cell, RefCell};
use core::time::Duration;

use garagedoor::app::events::{DoorEvent, PropertyUpdate};
use garagedoor::app::ports::{Clock, ConfigError, ConfigPort, EventSink, PropertySink, RelayPort};
use garagedoor::config::DeviceConfig;

// ── Output record ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    Property(PropertyUpdate),
    Event(DoorEvent),
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub log: Vec<Published>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DoorEvent> {
        self.log
            .iter()
            .filter_map(|p| match p {
                Published::Event(e) => Some(*e),
                Published::Property(_) => None,
            })
            .collect()
    }

    pub fn properties(&self) -> Vec<PropertyUpdate> {
        self.log
            .iter()
            .filter_map(|p| match p {
                Published::Property(u) => Some(*u),
                Published::Event(_) => None,
            })
            .collect()
    }

    /// Values published for `relay`, in order.
    pub fn relay_values(&self) -> Vec<bool> {
        self.properties()
            .into_iter()
            .filter_map(|u| match u {
                PropertyUpdate::Relay(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl PropertySink for RecordingSink {
    fn publish(&mut self, update: PropertyUpdate) {
        self.log.push(Published::Property(update));
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: DoorEvent) {
        self.log.push(Published::Event(event));
    }
}

// ── MockRelay ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRelay {
    pub pulses: Vec<Duration>,
}

impl RelayPort for MockRelay {
    fn pulse(&mut self, active_for: Duration) {
        self.pulses.push(active_for);
    }
}

// ── FakeClock ─────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeClock {
    now: Cell<Duration>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

// ── MemoryConfig ──────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryConfig {
    stored: RefCell<Option<DeviceConfig>>,
}

#[allow(dead_code)]
impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigPort for MemoryConfig {
    fn load(&self) -> Result<DeviceConfig, ConfigError> {
        let cfg = self.stored.borrow().clone().unwrap_or_default();
        cfg.validate()?;
        Ok(cfg)
    }

    fn save(&self, config: &DeviceConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.stored.borrow_mut() = Some(config.clone());
        Ok(())
    }
}
