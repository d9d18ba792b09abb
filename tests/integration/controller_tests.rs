//! Integration tests: config port → controller, actions → queue → controller.

use core::time::Duration;

use garagedoor::adapters::log_sink::LogSink;
use garagedoor::adapters::outbox::{Notification, Outbox};
use garagedoor::app::commands::{ActionError, DoorAction, invoke_action};
use garagedoor::app::controller::DoorController;
use garagedoor::app::events::{DoorEvent, PropertyUpdate};
use garagedoor::app::ports::{Clock, ConfigError, ConfigPort};
use garagedoor::app::state::{DoorState, InitialLevels};
use garagedoor::config::DeviceConfig;
use garagedoor::events::{Event, EventQueue};

use crate::mock_ports::{FakeClock, MemoryConfig, MockRelay, RecordingSink};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn controller_from(port: &MemoryConfig, clock: &FakeClock) -> DoorController {
    let cfg = port.load().unwrap();
    DoorController::from_config(&cfg, InitialLevels::default(), clock.now()).unwrap()
}

// ── Config → gate ─────────────────────────────────────────────

#[test]
fn stored_config_sets_pulse_and_rate_limit() {
    let port = MemoryConfig::new();
    port.save(&DeviceConfig {
        relay_pulse_ms: 300,
        min_activation_interval_ms: Some(1000),
        ..Default::default()
    })
    .unwrap();

    let clock = FakeClock::new();
    let mut c = controller_from(&port, &clock);
    let mut relay = MockRelay::default();
    let mut sink = RecordingSink::new();

    for at in [0, 999, 1000, 1999, 2000] {
        clock.set(ms(at));
        c.handle(Event::ActivateRequest, clock.now(), &mut relay, &mut sink);
    }
    assert_eq!(relay.pulses, [ms(300), ms(300), ms(300)]);
    assert_eq!(sink.events().len(), 3);
}

#[test]
fn empty_store_loads_defaults() {
    let port = MemoryConfig::new();
    let clock = FakeClock::new();
    let c = controller_from(&port, &clock);
    assert_eq!(c.gate().pulse_duration(), ms(500));
    assert_eq!(c.gate().min_interval(), ms(1000));
}

#[test]
fn invalid_config_never_stored() {
    let port = MemoryConfig::new();
    let bad = DeviceConfig {
        tick_interval_ms: 50,
        ..Default::default()
    };
    assert!(matches!(port.save(&bad), Err(ConfigError::ValidationFailed(_))));
    assert_eq!(port.load().unwrap(), DeviceConfig::default());
}

// ── Actions → queue → controller ──────────────────────────────

#[test]
fn activate_action_reaches_relay_through_queue() {
    let queue = EventQueue::new();
    let producer = queue.producer();
    assert_eq!(invoke_action("activate", &producer), Ok(DoorAction::Activate));
    assert_eq!(invoke_action("open", &producer), Err(ActionError::UnknownAction));
    assert_eq!(queue.len(), 1);

    let clock = FakeClock::new();
    let mut c = controller_from(&MemoryConfig::new(), &clock);
    let mut relay = MockRelay::default();
    let mut sink = RecordingSink::new();
    queue.drain(|e| c.handle(e, clock.now(), &mut relay, &mut sink));

    assert_eq!(sink.events(), [DoorEvent::Activated]);
    assert_eq!(relay.pulses, [ms(500)]);
}

#[test]
fn edges_from_many_threads_are_serialized() {
    let queue = EventQueue::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let p = queue.producer();
            std::thread::spawn(move || {
                let level = if i % 2 == 0 { DoorState::Open } else { DoorState::Closed };
                p.send_blocking(Event::SensorEdge(level));
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let clock = FakeClock::new();
    let mut c = controller_from(&MemoryConfig::new(), &clock);
    let mut relay = MockRelay::default();
    let mut sink = RecordingSink::new();
    let mut last = None;
    queue.drain(|e| {
        if let Event::SensorEdge(level) = e {
            last = Some(level);
        }
        clock.advance(ms(10));
        c.handle(e, clock.now(), &mut relay, &mut sink);
    });

    assert_eq!(Some(c.door_state()), last);
    // Opened and Closed strictly alternate, starting from Closed.
    let events = sink.events();
    for pair in events.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    assert_eq!(events.first(), Some(&DoorEvent::Opened));
}

// ── Fan-out to log + outbox ───────────────────────────────────

#[test]
fn outbox_sees_everything_the_controller_publishes() {
    let (outbox, rx) = Outbox::new();
    let mut sink = (LogSink::new(), outbox);
    let clock = FakeClock::new();
    let mut c = controller_from(&MemoryConfig::new(), &clock);
    let mut relay = MockRelay::default();

    c.start(&mut sink);
    c.handle(Event::SensorEdge(DoorState::Open), clock.now(), &mut relay, &mut sink);

    assert_eq!(
        rx.drain(),
        [
            Notification::Property(PropertyUpdate::Open(false)),
            Notification::Property(PropertyUpdate::Relay(false)),
            Notification::Property(PropertyUpdate::OpenDuration(0)),
            Notification::Property(PropertyUpdate::Open(true)),
            Notification::Property(PropertyUpdate::OpenDuration(0)),
            Notification::Event(DoorEvent::Opened),
        ]
    );
}
