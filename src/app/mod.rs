//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the garage door: door
//! and relay state, open-duration accounting and activation rate
//! limiting.  All interaction with hardware and observers happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real pins or timers.

pub mod commands;
pub mod controller;
pub mod description;
pub mod events;
pub mod ports;
pub mod state;
