//! Device description for the network-exposure layer.
//!
//! Remote gateways discover what the device offers from this document:
//! the three read-only properties with their schema, the `activate`
//! action and the name-only events.

use serde_json::{Map, Value, json};

use super::commands::ACTIONS;
use super::events::{DoorEvent, MAX_OPEN_DURATION_SECS};

pub const DEVICE_ID: &str = "urn:dev:ops:garagedoor";
pub const DEVICE_TITLE: &str = "Garage door";

fn event_metadata(event: DoorEvent) -> Value {
    let (title, description) = match event {
        DoorEvent::Opened => ("Door opened", "Previously closed door was opened"),
        DoorEvent::Closed => ("Door closed", "Previously opened door was closed"),
        DoorEvent::Activated => ("Door activated", "Door relay was activated"),
    };
    json!({ "title": title, "description": description })
}

/// Build the full device description.
pub fn describe() -> Value {
    let properties = json!({
        "open": {
            "@type": "OpenProperty",
            "title": "State",
            "type": "boolean",
            "description": "Whether the door is open",
            "readOnly": true,
        },
        "relay": {
            "@type": "OnOffProperty",
            "title": "Relay active",
            "type": "boolean",
            "description": "Door relay active status",
            "readOnly": true,
        },
        "openduration": {
            "@type": "LevelProperty",
            "title": "Open time",
            "type": "integer",
            "unit": "seconds",
            "minimum": 0,
            "maximum": MAX_OPEN_DURATION_SECS,
            "description": "Door has been open this long",
            "readOnly": true,
        },
    });

    let actions: Map<String, Value> = ACTIONS
        .iter()
        .map(|d| {
            (
                d.name.to_string(),
                json!({ "title": d.title, "description": d.description }),
            )
        })
        .collect();

    let events: Map<String, Value> = DoorEvent::ALL
        .iter()
        .map(|e| (e.name().to_string(), event_metadata(*e)))
        .collect();

    json!({
        "id": DEVICE_ID,
        "title": DEVICE_TITLE,
        "@type": ["DoorSensor", "OnOffSwitch"],
        "description": "Door stuff",
        "properties": properties,
        "actions": actions,
        "events": events,
    })
}
