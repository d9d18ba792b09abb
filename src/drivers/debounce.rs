//! Stable-level debouncer for digital inputs.
//!
//! A reed switch on a moving door chatters for a while around each
//! transition.  The debouncer reports a new level only after the raw
//! input has held it for the whole window; any flicker back to the
//! stable level restarts the wait.
//!
//! ```text
//! raw     ‾‾‾|_|‾|___________________
//! stable  ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾|_________
//!                  ◀─window─▶
//! ```

use core::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Stable,
    /// Raw level differs from the stable one since `since`.
    Settling { since: Duration },
}

pub struct Debouncer {
    window: Duration,
    stable: bool,
    state: DebounceState,
}

impl Debouncer {
    /// Start out trusting `initial` as the stable level.
    pub fn new(initial: bool, window: Duration) -> Self {
        Self {
            window,
            stable: initial,
            state: DebounceState::Stable,
        }
    }

    /// Feed one raw sample taken at `now`.  Returns the new stable level
    /// when it changes.
    pub fn update(&mut self, raw: bool, now: Duration) -> Option<bool> {
        if raw == self.stable {
            self.state = DebounceState::Stable;
            return None;
        }

        let since = match self.state {
            DebounceState::Stable => {
                self.state = DebounceState::Settling { since: now };
                now
            }
            DebounceState::Settling { since } => since,
        };

        if now.saturating_sub(since) >= self.window {
            self.stable = raw;
            self.state = DebounceState::Stable;
            return Some(raw);
        }
        None
    }

    pub fn stable(&self) -> bool {
        self.stable
    }
}
