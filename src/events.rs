//! Inbound event queue.
//!
//! Events are produced by:
//! - the door sensor watcher (debounced edges)
//! - the relay driver (observed line level after every write)
//! - the periodic tick timer
//! - the action dispatcher (remote `activate` requests)
//!
//! Events are consumed by exactly one task, which owns the
//! [`DoorController`](crate::app::controller::DoorController) and
//! processes them one at a time in arrival order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Sensor edge │────▶│              │     │              │
//! │ Relay level │────▶│  Event Queue │────▶│  Controller  │
//! │ Timer tick  │────▶│   (MPSC)     │     │  (consumer)  │
//! │ Activate    │────▶│              │     │              │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::state::{DoorState, RelayState};

/// Maximum number of pending events.
pub const EVENT_QUEUE_DEPTH: usize = 32;

/// Everything the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Debounced door sensor level change.
    SensorEdge(DoorState),
    /// Observed relay line level.
    RelayFeedback(RelayState),
    /// Periodic open-duration refresh.
    TimerTick,
    /// Remote request to pulse the relay.
    ActivateRequest,
}

type EventChannel = Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;

/// Consumer half.  Deliberately not `Clone`: there is one consumer.
pub struct EventQueue {
    channel: Arc<EventChannel>,
}

/// Producer half.  Cheap to clone and `Send`, so every source gets its own.
#[derive(Clone)]
pub struct EventProducer {
    channel: Arc<EventChannel>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            channel: Arc::new(Channel::new()),
        }
    }

    /// Hand out a producer for another event source.
    pub fn producer(&self) -> EventProducer {
        EventProducer {
            channel: Arc::clone(&self.channel),
        }
    }

    /// Wait for the next event.  This is the consumer's only suspension point.
    pub async fn next(&self) -> Event {
        self.channel.receive().await
    }

    /// Pop the next event without waiting.
    pub fn try_next(&self) -> Option<Event> {
        self.channel.try_receive().ok()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.try_next() {
            handler(event);
        }
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl EventProducer {
    /// Enqueue without waiting.  Returns `false` if the queue is full
    /// (event dropped).
    pub fn push(&self, event: Event) -> bool {
        if self.channel.try_send(event).is_err() {
            warn!("Event queue full, dropping {:?}", event);
            return false;
        }
        true
    }

    /// Enqueue, waiting for space.  Use from tasks on the runtime executor.
    pub async fn send(&self, event: Event) {
        self.channel.send(event).await;
    }

    /// Enqueue from a foreign thread, blocking it until there is space.
    ///
    /// Must not be called from the runtime thread: the consumer would
    /// never get to run.
    pub fn send_blocking(&self, event: Event) {
        futures_lite::future::block_on(self.send(event));
    }
}
