//! Fuzz target: `DoorController::handle`
//!
//! Decodes arbitrary bytes into a timeline of events (two bytes each:
//! event kind, then a time step) and asserts the controller's state
//! invariants after every event.
//!
//! cargo fuzz run fuzz_event_sequence

#![no_main]

use core::time::Duration;

use garagedoor::app::controller::DoorController;
use garagedoor::app::events::{DoorEvent, MAX_OPEN_DURATION_SECS, PropertyUpdate};
use garagedoor::app::ports::{EventSink, PropertySink, RelayPort};
use garagedoor::app::state::{DoorState, InitialLevels, RelayState};
use garagedoor::events::Event;
use garagedoor::gate::ActivationGate;
use libfuzzer_sys::fuzz_target;

struct Null;

impl PropertySink for Null {
    fn publish(&mut self, _: PropertyUpdate) {}
}

impl EventSink for Null {
    fn emit(&mut self, _: DoorEvent) {}
}

impl RelayPort for Null {
    fn pulse(&mut self, _: Duration) {}
}

fn decode(kind: u8) -> Event {
    match kind % 6 {
        0 => Event::SensorEdge(DoorState::Open),
        1 => Event::SensorEdge(DoorState::Closed),
        2 => Event::RelayFeedback(RelayState::Active),
        3 => Event::RelayFeedback(RelayState::Inactive),
        4 => Event::TimerTick,
        _ => Event::ActivateRequest,
    }
}

fuzz_target!(|data: &[u8]| {
    let mut controller = DoorController::new(
        ActivationGate::with_pulse(Duration::from_millis(500)),
        InitialLevels::default(),
        Duration::ZERO,
    );
    let mut now = Duration::ZERO;
    let mut last_edge = DoorState::Closed;

    for step in data.chunks_exact(2) {
        // Steps of 0..=255 × 100ms reach the 3600s clamp quickly.
        now += Duration::from_millis(u64::from(step[1]) * 100);
        let event = decode(step[0]);
        if let Event::SensorEdge(level) = event {
            last_edge = level;
        }
        controller.handle(event, now, &mut Null, &mut Null);

        assert_eq!(controller.door_state(), last_edge);
        assert!(controller.open_duration_secs() <= MAX_OPEN_DURATION_SECS);
        assert_eq!(controller.opened_at().is_some(), last_edge.is_open());
    }
});
