use std::time::Duration;

use crate::request::ApiRequest;
use crate::token::{FetchTarget, FetchToken};

/// Debounce timers owned by the jobs screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKey {
    SearchText,
    Typeahead,
    Salary,
}

impl TimerKey {
    pub const ALL: [TimerKey; 3] = [TimerKey::SearchText, TimerKey::Typeahead, TimerKey::Salary];

    pub fn index(self) -> u64 {
        match self {
            TimerKey::SearchText => 0,
            TimerKey::Typeahead => 1,
            TimerKey::Salary => 2,
        }
    }

    pub fn from_index(index: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|timer| timer.index() == index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Overwrite the current history entry with `location`.
    ReplaceLocation { location: String },
    /// Issue `request`; report back with `Msg::FetchResolved` carrying `token`.
    Fetch {
        target: FetchTarget,
        token: FetchToken,
        request: ApiRequest,
    },
    /// Arm `timer`, replacing any armed instance; report back with
    /// `Msg::TimerElapsed` carrying `generation`.
    StartTimer {
        timer: TimerKey,
        generation: u64,
        delay: Duration,
    },
    CancelTimer { timer: TimerKey },
    /// Teardown: disarm every timer and abandon every in-flight fetch.
    CancelAll,
}
