//! Garage door controller library.
//!
//! Serializes door sensor edges, relay feedback, periodic ticks and
//! remote activation requests through one event queue into a single
//! [`DoorController`](app::controller::DoorController).  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module, so everything here builds and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod gate;
pub mod pins;
pub mod runtime;
