//! Door runtime — wires drivers, queue and controller onto one executor.
//!
//! Runs on a dedicated thread using `edge-executor` for cooperative
//! scheduling and `async-io-mini` for reactor-driven timers.  Four
//! concurrent futures:
//!
//! 1. **Consumer** — awaits the event queue and feeds the controller,
//!    one event at a time (the only place door state changes)
//! 2. **Ticker** — pushes a `TimerTick` every tick interval
//! 3. **Sensor watcher** — samples the door sensor every poll interval
//!    and pushes debounced edges
//! 4. **Pulse driver** — wakes on a pulse request, drives the relay
//!    active, waits the pulse, releases it, and records the level read
//!    back after each write
//! 5. **Feedback forwarder** — moves recorded relay levels onto the
//!    event queue, so a busy queue never stretches a pulse
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │  Door thread                                                 │
//!  │  ┌────────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                          │  │
//!  │  │                                                        │  │
//!  │  │  ┌────────┐  ┌────────┐   events   ┌──────────────┐    │  │
//!  │  │  │ Ticker │  │ Sensor │──────────▶ │   Consumer   │    │  │
//!  │  │  │ tick ⏱ │  │ poll ⏱ │            │ (controller) │    │  │
//!  │  │  └────────┘  └────────┘            └──────┬───────┘    │  │
//!  │  │       ▲                        pulses     │            │  │
//!  │  │       │ feedback   ┌─────────────┐ ◀──────┘            │  │
//!  │  │       └────────────│ Pulse driver│                     │  │
//!  │  │                    └─────────────┘                     │  │
//!  │  └────────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Remote producers (actions arriving from the network layer, the host
//! console) hold an [`EventProducer`] and may live on any thread.

use core::cell::RefCell;
use core::future::Future;
use core::time::Duration;

use async_io_mini::Timer;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::digital::{InputPin, StatefulOutputPin};
use log::{info, warn};

use crate::app::controller::DoorController;
use crate::app::ports::{Clock, EventSink, PropertySink, RelayPort};
use crate::app::state::{DoorSnapshot, InitialLevels, RelayState};
use crate::config::DeviceConfig;
use crate::drivers::door_sensor::DoorSensor;
use crate::drivers::relay::RelayDriver;
use crate::error::Result;
use crate::events::{Event, EventProducer, EventQueue};

/// Pending pulse requests.  The gate keeps this from ever filling up.
const PULSE_QUEUE_DEPTH: usize = 4;

type PulseChannel = Channel<NoopRawMutex, Duration, PULSE_QUEUE_DEPTH>;

/// Two read-backs per pulse.
const FEEDBACK_QUEUE_DEPTH: usize = 2 * PULSE_QUEUE_DEPTH;

type FeedbackChannel = Channel<NoopRawMutex, RelayState, FEEDBACK_QUEUE_DEPTH>;

// ── Relay port over the pulse channel ────────────────────────

/// Controller-side relay port: queues the pulse for the pulse driver.
struct PulseRequests<'a> {
    channel: &'a PulseChannel,
}

impl RelayPort for PulseRequests<'_> {
    fn pulse(&mut self, active_for: Duration) {
        if self.channel.try_send(active_for).is_err() {
            warn!("Pulse queue full, dropping {:?} pulse", active_for);
        }
    }
}

// ── Tasks ────────────────────────────────────────────────────

async fn consume<K: Clock, O: PropertySink + EventSink>(
    queue: &EventQueue,
    clock: &K,
    controller: &mut DoorController,
    pulses: &PulseChannel,
    sink: &mut O,
) {
    let mut relay = PulseRequests { channel: pulses };
    loop {
        let event = queue.next().await;
        controller.handle(event, clock.now(), &mut relay, sink);
    }
}

async fn tick_loop(producer: EventProducer, every: Duration) {
    loop {
        Timer::after(every).await;
        producer.send(Event::TimerTick).await;
    }
}

async fn sensor_loop<P: InputPin, K: Clock>(
    mut sensor: DoorSensor<P>,
    clock: &K,
    producer: EventProducer,
    every: Duration,
) {
    let mut failing = false;
    loop {
        match sensor.poll(clock.now()) {
            Ok(edge) => {
                if failing {
                    info!("Door sensor readable again");
                    failing = false;
                }
                if let Some(state) = edge {
                    producer.send(Event::SensorEdge(state)).await;
                }
            }
            Err(e) => {
                if !failing {
                    warn!("{}", e);
                    failing = true;
                }
            }
        }
        Timer::after(every).await;
    }
}

/// Write the relay and read its level back.  Write failures are logged;
/// the read-back is reported whatever happened.
fn drive_relay<P: StatefulOutputPin>(
    relay: &RefCell<RelayDriver<P>>,
    active: bool,
) -> (bool, Option<RelayState>) {
    let mut relay = relay.borrow_mut();
    let written = if active {
        relay.activate()
    } else {
        relay.release()
    };
    if let Err(e) = written {
        warn!("{}", e);
    }
    let observed = relay
        .state()
        .map_err(|e| warn!("{}", e))
        .ok();
    (written.is_ok(), observed)
}

fn record_feedback(feedback: &FeedbackChannel, observed: Option<RelayState>) {
    if let Some(state) = observed {
        if feedback.try_send(state).is_err() {
            warn!("Relay feedback queue full, dropping {:?}", state);
        }
    }
}

/// Pulse timing never waits on the event queue.
async fn pulse_loop<P: StatefulOutputPin>(
    relay: &RefCell<RelayDriver<P>>,
    pulses: &PulseChannel,
    feedback: &FeedbackChannel,
) {
    loop {
        let active_for = pulses.receive().await;

        let (activated, observed) = drive_relay(relay, true);
        record_feedback(feedback, observed);
        if activated {
            Timer::after(active_for).await;
        }

        let (_, observed) = drive_relay(relay, false);
        record_feedback(feedback, observed);
    }
}

async fn forward_feedback(feedback: &FeedbackChannel, producer: EventProducer) {
    loop {
        let state = feedback.receive().await;
        producer.send(Event::RelayFeedback(state)).await;
    }
}

// ── DoorRuntime ──────────────────────────────────────────────

/// Everything the door thread owns.
pub struct DoorRuntime<S, R, K, O> {
    config: DeviceConfig,
    queue: EventQueue,
    sensor: DoorSensor<S>,
    relay: RelayDriver<R>,
    clock: K,
    sink: O,
}

impl<S, R, K, O> DoorRuntime<S, R, K, O>
where
    S: InputPin,
    R: StatefulOutputPin,
    K: Clock,
    O: PropertySink + EventSink,
{
    pub fn new(
        config: DeviceConfig,
        sensor: DoorSensor<S>,
        relay: RelayDriver<R>,
        clock: K,
        sink: O,
    ) -> Self {
        Self {
            config,
            queue: EventQueue::new(),
            sensor,
            relay,
            clock,
            sink,
        }
    }

    /// Producer for event sources outside the runtime.
    pub fn producer(&self) -> EventProducer {
        self.queue.producer()
    }

    /// Run until `until` completes, then force the relay inactive.
    ///
    /// Returns the controller's final snapshot.
    pub fn run(self, until: impl Future<Output = ()>) -> Result<DoorSnapshot> {
        let Self {
            config,
            queue,
            sensor,
            mut relay,
            clock,
            mut sink,
        } = self;

        config.validate()?;

        let initial = InitialLevels {
            door: sensor.state(),
            relay: relay.state()?,
        };
        let mut controller = DoorController::from_config(&config, initial, clock.now())?;
        controller.start(&mut sink);

        let relay = RefCell::new(relay);
        let pulses = PulseChannel::new();
        let feedback = FeedbackChannel::new();
        let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

        executor
            .spawn(tick_loop(queue.producer(), config.tick_interval()))
            .detach();
        executor
            .spawn(sensor_loop(
                sensor,
                &clock,
                queue.producer(),
                config.sensor_poll_interval(),
            ))
            .detach();
        executor
            .spawn(pulse_loop(&relay, &pulses, &feedback))
            .detach();
        executor
            .spawn(forward_feedback(&feedback, queue.producer()))
            .detach();

        info!(
            "Door runtime started (tick {:?}, poll {:?}, pulse {:?})",
            config.tick_interval(),
            config.sensor_poll_interval(),
            config.relay_pulse()
        );

        let consumer = consume(&queue, &clock, &mut controller, &pulses, &mut sink);
        futures_lite::future::block_on(executor.run(futures_lite::future::or(consumer, until)));
        drop(executor);

        let mut relay = relay.into_inner();
        if let Err(e) = relay.release() {
            warn!("Shutdown: {}", e);
        }
        info!("Door runtime stopped");
        Ok(controller.snapshot())
    }
}
