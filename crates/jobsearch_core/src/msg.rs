use crate::effect::TimerKey;
use crate::filter::{DaysWindow, SortMode};
use crate::query::ErrorKind;
use crate::token::{FetchTarget, FetchToken};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Screen opened at `location`; filters are read from its query string.
    Mount { location: String },
    /// Raw keystrokes in the free-text search box (debounced).
    TextInput(String),
    /// Skill box edited or a suggestion picked. Applies immediately.
    SkillInput(String),
    /// `None` selects all cities.
    CitySelected(Option<String>),
    DaysSelected(DaysWindow),
    SortSelected(SortMode),
    PageRequested(u32),
    NextPage,
    PrevPage,
    /// A debounce timer armed by `Effect::StartTimer` fired.
    TimerElapsed { timer: TimerKey, generation: u64 },
    /// A fetch issued by `Effect::Fetch` completed, successfully or not.
    FetchResolved {
        target: FetchTarget,
        token: FetchToken,
        outcome: Result<serde_json::Value, ErrorKind>,
    },
    /// Screen closed. Every later message is ignored.
    Teardown,
}
