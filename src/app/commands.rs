//! Externally invocable actions.
//!
//! The exposure layer receives actions by name.  Names resolve against a
//! fixed table of [`ActionDescriptor`]s built at compile time; each row
//! carries the handler that turns the action into an inbound event.
//!
//! ```text
//! ┌──────────┬──────────┬───────────────────────────┬──────────────┐
//! │ action   │ title    │ description               │ invoke       │
//! ├──────────┼──────────┼───────────────────────────┼──────────────┤
//! │ activate │ Activate │ Open, Close or Stop door  │ fn(producer) │
//! └──────────┴──────────┴───────────────────────────┴──────────────┘
//! ```

use core::fmt;

use log::info;

use crate::events::{Event, EventProducer};

/// Commands that external adapters can send into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DoorAction {
    /// Pulse the opener relay (subject to rate limiting).
    Activate = 0,
}

impl DoorAction {
    /// Total number of actions — sizes the descriptor table.
    pub const COUNT: usize = 1;

    pub fn name(self) -> &'static str {
        ACTIONS[self as usize].name
    }

    /// Resolve an exposed action name.
    pub fn from_name(name: &str) -> Option<Self> {
        ACTIONS.iter().find(|d| d.name == name).map(|d| d.action)
    }

    /// The inbound event this action becomes.
    pub fn to_event(self) -> Event {
        match self {
            Self::Activate => Event::ActivateRequest,
        }
    }
}

/// Signature of an action handler.  Returns `false` if the request
/// could not be enqueued.
pub type ActionHandlerFn = fn(&EventProducer) -> bool;

/// Static descriptor for a single action.
pub struct ActionDescriptor {
    pub action: DoorAction,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub invoke: ActionHandlerFn,
}

fn invoke_activate(producer: &EventProducer) -> bool {
    producer.push(DoorAction::Activate.to_event())
}

/// Fixed-size table indexed by `DoorAction as usize`.
pub static ACTIONS: [ActionDescriptor; DoorAction::COUNT] = [ActionDescriptor {
    action: DoorAction::Activate,
    name: "activate",
    title: "Activate",
    description: "Open, Close or Stop door",
    invoke: invoke_activate,
}];

/// Errors from [`invoke_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// No action with that name exists.
    UnknownAction,
    /// The event queue was full; the request was dropped.
    QueueFull,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction => write!(f, "unknown action"),
            Self::QueueFull => write!(f, "event queue full"),
        }
    }
}

impl core::error::Error for ActionError {}

/// Dispatch an action by its exposed name.
///
/// Success means the request was queued, not that it was granted: the
/// controller may still drop it under rate limiting.
pub fn invoke_action(name: &str, producer: &EventProducer) -> Result<DoorAction, ActionError> {
    let action = DoorAction::from_name(name).ok_or(ActionError::UnknownAction)?;
    info!("Action requested: {}", name);
    if (ACTIONS[action as usize].invoke)(producer) {
        Ok(action)
    } else {
        Err(ActionError::QueueFull)
    }
}
