//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements               | Connects to               |
//! |---------------|--------------------------|---------------------------|
//! | `config_file` | ConfigPort               | JSON file on the host     |
//! | `log_sink`    | PropertySink, EventSink  | Serial / stderr log       |
//! | `outbox`      | PropertySink, EventSink  | Network-exposure layer    |
//! | `time`        | Clock                    | ESP32 timer / `Instant`   |

pub mod config_file;
pub mod log_sink;
pub mod outbox;
pub mod time;
