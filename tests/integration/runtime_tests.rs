//! Integration tests: the full runtime on simulated pins.
//!
//! These run the real executor, timers and drivers, so they use short
//! pulses and generous waits.

use core::time::Duration;

use async_io_mini::Timer;

use garagedoor::adapters::outbox::{Notification, Outbox, OutboxReceiver};
use garagedoor::adapters::time::MonotonicClock;
use garagedoor::app::ports::ConfigError;
use garagedoor::app::events::{DoorEvent, PropertyUpdate};
use garagedoor::app::state::{DoorState, RelayState};
use garagedoor::config::DeviceConfig;
use garagedoor::drivers::door_sensor::DoorSensor;
use garagedoor::drivers::relay::RelayDriver;
use garagedoor::drivers::sim_pin::{SimInputPin, SimLine, SimOutputPin};
use garagedoor::error::{Error, HardwareError};
use garagedoor::events::Event;
use garagedoor::pins::PinLevel;
use garagedoor::runtime::DoorRuntime;

type SimRuntime = DoorRuntime<SimInputPin, SimOutputPin, MonotonicClock, Outbox>;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn fast_config(pulse_ms: u32) -> DeviceConfig {
    DeviceConfig {
        door_open_level: PinLevel::High,
        relay_active_level: PinLevel::Low,
        sensor_debounce_ms: 0,
        sensor_poll_interval_ms: 5,
        relay_pulse_ms: pulse_ms,
        tick_interval_ms: 100,
        ..Default::default()
    }
}

struct Rig {
    runtime: SimRuntime,
    sensor_line: SimLine,
    relay_line: SimLine,
    rx: OutboxReceiver,
}

fn rig(config: DeviceConfig, door: PinLevel) -> Rig {
    let sensor_line = SimLine::new(door);
    let relay_line = SimLine::new(PinLevel::Low);
    let sensor =
        DoorSensor::new(sensor_line.input(), config.door_open_level, config.sensor_debounce())
            .unwrap();
    let relay = RelayDriver::new(relay_line.output(), config.relay_active_level).unwrap();
    let (outbox, rx) = Outbox::new();
    let runtime = DoorRuntime::new(config, sensor, relay, MonotonicClock::new(), outbox);
    Rig {
        runtime,
        sensor_line,
        relay_line,
        rx,
    }
}

fn relay_values(notes: &[Notification]) -> Vec<bool> {
    notes
        .iter()
        .filter_map(|n| match n {
            Notification::Property(PropertyUpdate::Relay(v)) => Some(*v),
            _ => None,
        })
        .collect()
}

#[test]
fn start_publishes_initial_state() {
    let r = rig(fast_config(50), PinLevel::High);
    let snapshot = r
        .runtime
        .run(async {
            Timer::after(ms(20)).await;
        })
        .unwrap();

    let notes = r.rx.drain();
    assert_eq!(
        notes[..3],
        [
            Notification::Property(PropertyUpdate::Open(true)),
            Notification::Property(PropertyUpdate::Relay(false)),
            Notification::Property(PropertyUpdate::OpenDuration(0)),
        ]
    );
    assert_eq!(snapshot.door, DoorState::Open);
}

#[test]
fn activation_pulses_relay_and_reports_feedback() {
    let r = rig(fast_config(50), PinLevel::Low);
    assert!(r.runtime.producer().push(Event::ActivateRequest));

    let snapshot = r
        .runtime
        .run(async {
            Timer::after(ms(300)).await;
        })
        .unwrap();

    let notes = r.rx.drain();
    assert!(notes.contains(&Notification::Event(DoorEvent::Activated)));
    // Initial publish, then active, then released.
    assert_eq!(relay_values(&notes), [false, true, false]);
    assert_eq!(snapshot.relay, RelayState::Inactive);
    assert_eq!(r.relay_line.level(), PinLevel::High);
}

#[test]
fn sensor_line_change_becomes_door_event() {
    let r = rig(fast_config(50), PinLevel::Low);
    let line = r.sensor_line.clone();

    let snapshot = r
        .runtime
        .run(async move {
            Timer::after(ms(30)).await;
            line.set(PinLevel::High);
            Timer::after(ms(150)).await;
        })
        .unwrap();

    let notes = r.rx.drain();
    assert!(notes.contains(&Notification::Property(PropertyUpdate::Open(true))));
    assert!(notes.contains(&Notification::Event(DoorEvent::Opened)));
    assert_eq!(snapshot.door, DoorState::Open);
    assert_eq!(snapshot.open_duration_secs, 0);
}

#[test]
fn shutdown_releases_relay_mid_pulse() {
    let r = rig(fast_config(5000), PinLevel::Low);
    assert!(r.runtime.producer().push(Event::ActivateRequest));

    let relay_line = r.relay_line.clone();
    let snapshot = r
        .runtime
        .run(async move {
            Timer::after(ms(100)).await;
            assert_eq!(relay_line.level(), PinLevel::Low, "relay held active");
        })
        .unwrap();

    assert_eq!(snapshot.relay, RelayState::Active);
    assert_eq!(r.relay_line.level(), PinLevel::High);
}

#[test]
fn rate_limited_requests_pulse_once() {
    let r = rig(fast_config(50), PinLevel::Low);
    let producer = r.runtime.producer();
    for _ in 0..3 {
        assert!(producer.push(Event::ActivateRequest));
    }

    r.runtime
        .run(async {
            Timer::after(ms(300)).await;
        })
        .unwrap();

    let notes = r.rx.drain();
    let activations = notes
        .iter()
        .filter(|n| **n == Notification::Event(DoorEvent::Activated))
        .count();
    assert_eq!(activations, 1);
    assert_eq!(relay_values(&notes), [false, true, false]);
}

#[test]
fn failing_sensor_does_not_stop_activation() {
    let r = rig(fast_config(50), PinLevel::Low);
    r.sensor_line.set_failing(true);
    assert!(r.runtime.producer().push(Event::ActivateRequest));

    r.runtime
        .run(async {
            Timer::after(ms(200)).await;
        })
        .unwrap();

    let notes = r.rx.drain();
    assert!(notes.contains(&Notification::Event(DoorEvent::Activated)));
    assert_eq!(relay_values(&notes), [false, true, false]);
}

#[test]
fn zero_poll_interval_is_rejected_before_start() {
    let config = DeviceConfig {
        sensor_poll_interval_ms: 0,
        ..fast_config(50)
    };
    let r = rig(config, PinLevel::Low);
    let err = r.runtime.run(async {}).err();
    assert!(matches!(
        err,
        Some(Error::Config(ConfigError::ValidationFailed(_)))
    ));
    assert!(r.rx.drain().is_empty());
}

#[test]
fn zero_tick_interval_is_rejected_before_start() {
    let config = DeviceConfig {
        tick_interval_ms: 0,
        ..fast_config(50)
    };
    let r = rig(config, PinLevel::Low);
    let err = r.runtime.run(async {}).err();
    assert!(matches!(
        err,
        Some(Error::Config(ConfigError::ValidationFailed(_)))
    ));
}

#[test]
fn unreadable_relay_at_start_is_fatal() {
    let r = rig(fast_config(50), PinLevel::Low);
    r.relay_line.set_failing(true);
    let err = r.runtime.run(async {}).err();
    assert_eq!(err, Some(Error::Hardware(HardwareError::RelayReadFailed)));
    assert!(r.rx.drain().is_empty());
}
