//! Outbound notification queue for the network-exposure layer.
//!
//! The controller publishes synchronously from the consumer task; a
//! remote-exposure layer (HTTP, MQTT, ...) drains these notifications on
//! its own schedule.  When the queue is full the newest notification is
//! dropped with a warning, and the controller never blocks on observers.
//!
//! ```text
//!  DoorController ──▶ Outbox ──▶ [channel] ──▶ OutboxReceiver ──▶ transport
//! ```

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;
use serde_json::{Value, json};

use crate::app::events::{DoorEvent, PropertyUpdate};
use crate::app::ports::{EventSink, PropertySink};

pub const OUTBOX_DEPTH: usize = 64;

/// One publication from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Property(PropertyUpdate),
    Event(DoorEvent),
}

impl Notification {
    /// Wire shape: `{"property": name, "value": v}` or `{"event": name}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Property(update) => json!({ "property": update.name(), "value": update.value() }),
            Self::Event(event) => json!({ "event": event.name() }),
        }
    }
}

type OutboxChannel = Channel<CriticalSectionRawMutex, Notification, OUTBOX_DEPTH>;

/// Sink half, handed to the controller.
#[derive(Clone)]
pub struct Outbox {
    channel: Arc<OutboxChannel>,
}

/// Drain half, owned by the transport.
pub struct OutboxReceiver {
    channel: Arc<OutboxChannel>,
}

impl Outbox {
    pub fn new() -> (Self, OutboxReceiver) {
        let channel = Arc::new(Channel::new());
        (
            Self {
                channel: Arc::clone(&channel),
            },
            OutboxReceiver { channel },
        )
    }

    fn offer(&self, notification: Notification) {
        if self.channel.try_send(notification).is_err() {
            warn!("Outbox full, dropping {:?}", notification);
        }
    }
}

impl PropertySink for Outbox {
    fn publish(&mut self, update: PropertyUpdate) {
        self.offer(Notification::Property(update));
    }
}

impl EventSink for Outbox {
    fn emit(&mut self, event: DoorEvent) {
        self.offer(Notification::Event(event));
    }
}

impl OutboxReceiver {
    pub async fn recv(&self) -> Notification {
        self.channel.receive().await
    }

    pub fn try_recv(&self) -> Option<Notification> {
        self.channel.try_receive().ok()
    }

    /// Everything pending, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        core::iter::from_fn(|| self.try_recv()).collect()
    }
}
