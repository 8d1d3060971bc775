//! Jobsearch core: pure filter-state machine, location codec and the
//! debounce/cancellation bookkeeping behind every fetch of the jobs screen.
mod controller;
mod debounce;
mod effect;
mod filter;
mod listing;
mod location;
mod msg;
mod query;
mod request;
mod state;
mod token;
mod tuning;
mod update;
mod view_model;

pub use controller::{FailurePolicy, QueryController};
pub use debounce::Debounce;
pub use effect::{Effect, TimerKey};
pub use filter::{DaysWindow, FilterState, SortMode, DAY_WINDOWS, PAGE_SIZE};
pub use listing::{
    arrange_rows, clamp_page, display_place, showing_range, total_pages, work_mode, WorkMode,
};
pub use location::{
    parse_location, route_part, serialize_location, serialize_query, ParsedLocation,
    ValidationError,
};
pub use msg::Msg;
pub use query::{
    decode, CityCount, ErrorKind, JobRecord, ListingPage, Payload, QueryResult, RisingSkill,
    SalaryPercentiles,
};
pub use request::{ApiRequest, ParamValue};
pub use state::{AppState, Phase, DEFAULT_ROUTE};
pub use token::{FetchTarget, FetchToken, TokenRegistry};
pub use tuning::{CityFacetParams, RisingParams, Tuning};
pub use update::update;
pub use view_model::{
    format_delta, format_thousands, AppViewModel, CityOption, JobRowView, ListingView,
    ResultsView, RisingRowView, RisingView, SalaryView,
};
