//! Log-based property and event sink.
//!
//! Implements [`PropertySink`] and [`EventSink`] by writing every
//! publication to the logger (serial console on the device, stderr on
//! the host).  A network-exposure adapter implements the same traits.

use log::info;

use crate::app::events::{DoorEvent, PropertyUpdate};
use crate::app::ports::{EventSink, PropertySink};

/// Adapter that logs every property update and domain event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl PropertySink for LogSink {
    fn publish(&mut self, update: PropertyUpdate) {
        info!("PROP  | {}={}", update.name(), update.value());
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: DoorEvent) {
        info!("EVENT | {}", event);
    }
}
