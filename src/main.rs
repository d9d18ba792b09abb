//! Garage door controller — main entry point.
//!
//! Hexagonal architecture with a single event-serializing consumer.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  DoorSensor      RelayDriver     LogSink        MonotonicClock │
//! │  (InputPin)      (OutputPin)     (Prop+Event)   (Clock)        │
//! │  JsonFileConfig  Outbox                                        │
//! │  (ConfigPort)    (network exposure)                            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            DoorController (pure logic)                 │    │
//! │  │  door · relay · open duration · activation gate        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  DoorRuntime (executor: consumer · ticker · sensor · pulse)    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On the host the pins are simulated and driven from stdin:
//! `activate`, `open`, `close`, `status`, `describe`, `quit`.
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Platform bootstrap + logging ───────────────────────
    platform::init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GarageDoor v{}                   ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = platform::load_config();
    info!("Config: {:?}", config);

    // ── 3. Drivers, runtime, run ──────────────────────────────
    platform::run(config)
}

// ── ESP-IDF target ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod platform {
    use anyhow::Result;
    use esp_idf_svc::hal::gpio::{PinDriver, Pull};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use log::{info, warn};

    use garagedoor::adapters::log_sink::LogSink;
    use garagedoor::adapters::time::MonotonicClock;
    use garagedoor::config::DeviceConfig;
    use garagedoor::drivers::door_sensor::DoorSensor;
    use garagedoor::drivers::relay::RelayDriver;
    use garagedoor::error::Error;
    use garagedoor::pins;
    use garagedoor::runtime::DoorRuntime;

    pub fn init_logging() -> Result<()> {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
        Ok(())
    }

    pub fn load_config() -> DeviceConfig {
        DeviceConfig::default()
    }

    pub fn run(config: DeviceConfig) -> Result<()> {
        let peripherals =
            Peripherals::take().map_err(|_| Error::Init("peripherals already taken"))?;

        if config.door_sensor_gpio != pins::DOOR_SENSOR_GPIO || config.relay_gpio != pins::RELAY_GPIO {
            warn!(
                "Board is wired to GPIO{} (sensor) / GPIO{} (relay), ignoring configured pins",
                pins::DOOR_SENSOR_GPIO,
                pins::RELAY_GPIO
            );
        }

        let mut sensor_pin = PinDriver::input(peripherals.pins.gpio17)?;
        sensor_pin.set_pull(Pull::Up)?;
        let relay_pin = PinDriver::output(peripherals.pins.gpio27)?;

        let sensor = DoorSensor::new(sensor_pin, config.door_open_level, config.sensor_debounce())
            .map_err(Error::from)?;
        let relay = RelayDriver::new(relay_pin, config.relay_active_level).map_err(Error::from)?;

        let runtime = DoorRuntime::new(config, sensor, relay, MonotonicClock::new(), LogSink::new());
        let snapshot = runtime.run(core::future::pending())?;
        info!("Door runtime exited: {:?}", snapshot);
        Ok(())
    }
}

// ── Host target (simulated pins, stdin console) ───────────────

#[cfg(not(target_os = "espidf"))]
mod platform {
    use std::io::BufRead;
    use std::sync::Arc;

    use anyhow::{Result, anyhow};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::signal::Signal;
    use log::{info, warn};
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    use garagedoor::adapters::config_file::JsonFileConfig;
    use garagedoor::adapters::log_sink::LogSink;
    use garagedoor::adapters::time::MonotonicClock;
    use garagedoor::app::commands::invoke_action;
    use garagedoor::app::description::describe;
    use garagedoor::app::ports::ConfigPort;
    use garagedoor::config::DeviceConfig;
    use garagedoor::drivers::door_sensor::DoorSensor;
    use garagedoor::drivers::relay::RelayDriver;
    use garagedoor::drivers::sim_pin::SimLine;
    use garagedoor::error::Error;
    use garagedoor::runtime::DoorRuntime;

    pub fn init_logging() -> Result<()> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init()?;
        Ok(())
    }

    /// `GARAGEDOOR_CONFIG` or the first argument names a JSON file.
    /// Any failure falls back to defaults.
    pub fn load_config() -> DeviceConfig {
        let Some(port) = JsonFileConfig::from_env_or(std::env::args().nth(1)) else {
            info!("No config file given, using defaults");
            return DeviceConfig::default();
        };
        match port.load() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Config {} load failed ({}), using defaults", port.path().display(), e);
                DeviceConfig::default()
            }
        }
    }

    pub fn run(config: DeviceConfig) -> Result<()> {
        // Door starts closed, relay released.
        let sensor_line = SimLine::new(config.door_open_level.inverse());
        let relay_line = SimLine::new(config.relay_active_level.inverse());

        let sensor = DoorSensor::new(
            sensor_line.input(),
            config.door_open_level,
            config.sensor_debounce(),
        )
        .map_err(Error::from)?;
        let relay =
            RelayDriver::new(relay_line.output(), config.relay_active_level).map_err(Error::from)?;

        let open_level = config.door_open_level;
        let active_level = config.relay_active_level;
        let runtime = DoorRuntime::new(config, sensor, relay, MonotonicClock::new(), LogSink::new());
        let producer = runtime.producer();

        let stop = Arc::new(Signal::<CriticalSectionRawMutex, ()>::new());
        let door_thread = {
            let stop = Arc::clone(&stop);
            std::thread::Builder::new()
                .name("door".into())
                .spawn(move || runtime.run(async move { stop.wait().await }))?
        };

        info!("Commands: activate | open | close | status | describe | quit");
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            match line.trim() {
                "" => {}
                "open" => sensor_line.set(open_level),
                "close" => sensor_line.set(open_level.inverse()),
                "status" => info!(
                    "Sensor line {:?} (door {}), relay line {:?} (relay {})",
                    sensor_line.level(),
                    if sensor_line.level() == open_level { "open" } else { "closed" },
                    relay_line.level(),
                    if relay_line.level() == active_level { "active" } else { "inactive" },
                ),
                "describe" => info!("{}", serde_json::to_string_pretty(&describe())?),
                "quit" | "exit" => break,
                name => {
                    if let Err(e) = invoke_action(name, &producer) {
                        warn!("{}: {}", name, e);
                    }
                }
            }
        }

        stop.signal(());
        let snapshot = door_thread
            .join()
            .map_err(|_| anyhow!("door thread panicked"))??;
        info!("Final state: {}", serde_json::to_string(&snapshot)?);
        Ok(())
    }
}
