//! Door controller — the hexagonal core.
//!
//! [`DoorController`] is the single owner of door state, relay state, the
//! open episode and the activation gate.  Every inbound [`Event`] goes
//! through [`DoorController::handle`], one at a time, so nothing here
//! needs a lock.  All I/O flows through port traits injected at call
//! sites, making the controller testable with mock adapters and a fake
//! clock.
//!
//! ```text
//!  Event queue ──▶ ┌────────────────────────┐ ──▶ PropertySink
//!                  │     DoorController     │ ──▶ EventSink
//!    RelayPort ◀── │  door · relay · gate   │
//!                  └────────────────────────┘
//! ```

use core::time::Duration;

use log::{debug, info};

use crate::config::DeviceConfig;
use crate::events::Event;
use crate::gate::{Activation, ActivationGate};

use super::events::{DoorEvent, MAX_OPEN_DURATION_SECS, PropertyUpdate};
use super::ports::{ConfigError, EventSink, PropertySink, RelayPort};
use super::state::{DoorSnapshot, DoorState, InitialLevels, RelayState};

/// The interval during which the door is continuously open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEpisode {
    opened_at: Duration,
}

/// Whole seconds since `opened_at`, truncated and clamped to 0–3600.
fn open_duration_secs(opened_at: Duration, now: Duration) -> u32 {
    let secs = now.saturating_sub(opened_at).as_secs();
    secs.min(u64::from(MAX_OPEN_DURATION_SECS)) as u32
}

// ───────────────────────────────────────────────────────────────
// DoorController
// ───────────────────────────────────────────────────────────────

pub struct DoorController {
    door: DoorState,
    relay: RelayState,
    /// Present iff `door == Open`.
    episode: Option<OpenEpisode>,
    open_duration_secs: u32,
    /// Last `openduration` value pushed to the sink.
    published_duration: Option<u32>,
    gate: ActivationGate,
}

impl DoorController {
    /// Construct the controller from the initial pin levels.
    ///
    /// Does **not** publish anything — call [`start`](Self::start) next.
    pub fn new(gate: ActivationGate, initial: InitialLevels, now: Duration) -> Self {
        let episode = initial
            .door
            .is_open()
            .then_some(OpenEpisode { opened_at: now });
        Self {
            door: initial.door,
            relay: initial.relay,
            episode,
            open_duration_secs: 0,
            published_duration: None,
            gate,
        }
    }

    /// Construct with the gate described by `config`.
    pub fn from_config(
        config: &DeviceConfig,
        initial: InitialLevels,
        now: Duration,
    ) -> Result<Self, ConfigError> {
        let gate = ActivationGate::new(config.relay_pulse(), config.min_activation_interval())
            .map_err(|_| {
                ConfigError::ValidationFailed("min_activation_interval_ms must be >= relay_pulse_ms")
            })?;
        Ok(Self::new(gate, initial, now))
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Publish the initial value of every property.
    pub fn start(&mut self, sink: &mut impl PropertySink) {
        sink.publish(PropertyUpdate::Open(self.door.is_open()));
        sink.publish(PropertyUpdate::Relay(self.relay.is_active()));
        sink.publish(PropertyUpdate::OpenDuration(self.open_duration_secs));
        self.published_duration = Some(self.open_duration_secs);
        info!(
            "DoorController started: door={:?} relay={:?}",
            self.door, self.relay
        );
    }

    // ── Event handling ────────────────────────────────────────

    /// Process one inbound event at time `now`.
    pub fn handle(
        &mut self,
        event: Event,
        now: Duration,
        relay: &mut impl RelayPort,
        sink: &mut (impl PropertySink + EventSink),
    ) {
        match event {
            Event::SensorEdge(level) => self.on_sensor_edge(level, now, sink),
            Event::RelayFeedback(level) => self.on_relay_feedback(level, sink),
            Event::TimerTick => self.on_tick(now, sink),
            Event::ActivateRequest => self.on_activate(now, relay, sink),
        }

        debug_assert_eq!(self.episode.is_some(), self.door.is_open());
        debug_assert!(self.door.is_open() || self.open_duration_secs == 0);
    }

    fn on_sensor_edge(
        &mut self,
        level: DoorState,
        now: Duration,
        sink: &mut (impl PropertySink + EventSink),
    ) {
        if level == self.door {
            debug!("Door sensor repeated {:?}, ignoring", level);
            return;
        }

        self.door = level;
        self.open_duration_secs = 0;
        match level {
            DoorState::Open => {
                info!("Door opened");
                self.episode = Some(OpenEpisode { opened_at: now });
                sink.publish(PropertyUpdate::Open(true));
                sink.publish(PropertyUpdate::OpenDuration(0));
                sink.emit(DoorEvent::Opened);
            }
            DoorState::Closed => {
                info!("Door closed");
                self.episode = None;
                sink.publish(PropertyUpdate::Open(false));
                sink.publish(PropertyUpdate::OpenDuration(0));
                sink.emit(DoorEvent::Closed);
            }
        }
        self.published_duration = Some(0);
    }

    fn on_relay_feedback(&mut self, level: RelayState, sink: &mut impl PropertySink) {
        if level == self.relay {
            debug!("Relay feedback repeated {:?}, ignoring", level);
            return;
        }
        info!("Relay {:?}", level);
        self.relay = level;
        sink.publish(PropertyUpdate::Relay(level.is_active()));
    }

    fn on_tick(&mut self, now: Duration, sink: &mut impl PropertySink) {
        let Some(episode) = self.episode else {
            return;
        };
        let secs = open_duration_secs(episode.opened_at, now);
        self.open_duration_secs = secs;
        if self.published_duration != Some(secs) {
            sink.publish(PropertyUpdate::OpenDuration(secs));
            self.published_duration = Some(secs);
        }
    }

    fn on_activate(
        &mut self,
        now: Duration,
        relay: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        match self.gate.try_activate(now) {
            Activation::Granted => {
                info!("Performing relay activation");
                sink.emit(DoorEvent::Activated);
                relay.pulse(self.gate.pulse_duration());
            }
            Activation::Denied => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self) -> DoorSnapshot {
        DoorSnapshot {
            door: self.door,
            relay: self.relay,
            open_duration_secs: self.open_duration_secs,
        }
    }

    pub fn door_state(&self) -> DoorState {
        self.door
    }

    pub fn relay_state(&self) -> RelayState {
        self.relay
    }

    pub fn open_duration_secs(&self) -> u32 {
        self.open_duration_secs
    }

    /// When the current open episode started, if the door is open.
    pub fn opened_at(&self) -> Option<Duration> {
        self.episode.map(|e| e.opened_at)
    }

    pub fn gate(&self) -> &ActivationGate {
        &self.gate
    }
}
