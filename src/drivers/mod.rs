//! Sensor and actuator drivers over embedded-hal digital pins.

pub mod debounce;
pub mod door_sensor;
pub mod relay;
pub mod sim_pin;
