use jobsearch_logging::search_info;

use crate::controller::{FailurePolicy, QueryController};
use crate::debounce::Debounce;
use crate::effect::{Effect, TimerKey};
use crate::filter::FilterState;
use crate::listing::total_pages;
use crate::location::{parse_location, route_part, serialize_location, ValidationError};
use crate::query::{CityCount, ErrorKind, ListingPage, QueryResult, RisingSkill, SalaryPercentiles};
use crate::request::ApiRequest;
use crate::token::{FetchTarget, FetchToken, TokenRegistry};
use crate::tuning::Tuning;
use crate::view_model::AppViewModel;

/// Route used when the mounted location has no path.
pub const DEFAULT_ROUTE: &str = "/jobs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Unmounted,
    Mounted,
    TornDown,
}

/// Everything the jobs screen knows. Only [`crate::update`] mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    tuning: Tuning,
    phase: Phase,
    route: String,
    filter: FilterState,
    text_input: String,
    text_debounce: Debounce<String>,
    tokens: TokenRegistry,
    listing: QueryController<ListingPage>,
    suggestions: QueryController<Vec<String>>,
    cities: QueryController<Vec<CityCount>>,
    rising: QueryController<Vec<RisingSkill>>,
    salary: QueryController<SalaryPercentiles>,
    last_total_pages: Option<u32>,
    corrections: Vec<ValidationError>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_tuning(Tuning::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            phase: Phase::Unmounted,
            route: DEFAULT_ROUTE.to_string(),
            filter: FilterState::default(),
            text_input: String::new(),
            text_debounce: Debounce::new(tuning.text_quiet),
            tokens: TokenRegistry::new(),
            listing: QueryController::immediate(FetchTarget::Listing, FailurePolicy::Surface),
            suggestions: QueryController::debounced(
                FetchTarget::Suggestions,
                TimerKey::Typeahead,
                tuning.typeahead_quiet,
                FailurePolicy::Absorb,
            ),
            cities: QueryController::immediate(FetchTarget::Cities, FailurePolicy::Absorb),
            rising: QueryController::immediate(FetchTarget::RisingSkills, FailurePolicy::Absorb),
            salary: QueryController::debounced(
                FetchTarget::Salary,
                TimerKey::Salary,
                tuning.salary_quiet,
                FailurePolicy::Absorb,
            ),
            last_total_pages: None,
            corrections: Vec::new(),
            dirty: false,
            tuning,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Raw search box contents, ahead of the debounced `filter().text()`.
    pub fn text_input(&self) -> &str {
        &self.text_input
    }

    pub fn location(&self) -> String {
        serialize_location(&self.route, &self.filter)
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }

    pub fn corrections(&self) -> &[ValidationError] {
        &self.corrections
    }

    pub fn listing(&self) -> &QueryResult<ListingPage> {
        self.listing.result()
    }

    pub fn suggestions(&self) -> &QueryResult<Vec<String>> {
        self.suggestions.result()
    }

    pub fn cities(&self) -> &QueryResult<Vec<CityCount>> {
        self.cities.result()
    }

    pub fn rising_skills(&self) -> &QueryResult<Vec<RisingSkill>> {
        self.rising.result()
    }

    pub fn salary(&self) -> &QueryResult<SalaryPercentiles> {
        self.salary.result()
    }

    /// Page count from the most recent successful listing.
    pub fn known_total_pages(&self) -> Option<u32> {
        self.last_total_pages
    }

    /// Requested page, clamped to the known page count.
    pub fn displayed_page(&self) -> u32 {
        match self.last_total_pages {
            Some(pages) => self.filter.page().min(pages),
            None => self.filter.page(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mount(&mut self, location: &str) -> Vec<Effect> {
        let parsed = parse_location(location);
        for correction in &parsed.corrections {
            search_info!("Location corrected: {}", correction);
        }
        let route = route_part(location);
        if !route.is_empty() {
            self.route = route.to_string();
        }
        self.filter = parsed.filter;
        self.text_input = self.filter.text().to_string();
        self.corrections = parsed.corrections;
        self.phase = Phase::Mounted;
        self.mark_dirty();

        let mut effects = Vec::new();
        let canonical = self.location();
        if canonical != location {
            effects.push(Effect::ReplaceLocation {
                location: canonical,
            });
        }
        effects.extend(self.reconcile());
        effects
    }

    /// Install `next` as the current filter snapshot. Emits the location
    /// write and whatever fetches the new snapshot calls for.
    pub(crate) fn commit_filter(&mut self, next: FilterState) -> Vec<Effect> {
        if next == self.filter {
            return Vec::new();
        }
        self.filter = next;
        self.mark_dirty();

        let mut effects = vec![Effect::ReplaceLocation {
            location: self.location(),
        }];
        effects.extend(self.reconcile());
        effects
    }

    pub(crate) fn text_changed(&mut self, raw: String) -> Vec<Effect> {
        if raw == self.text_input {
            return Vec::new();
        }
        self.text_input = raw.clone();
        self.mark_dirty();
        let generation = self.text_debounce.input(raw);
        vec![Effect::StartTimer {
            timer: TimerKey::SearchText,
            generation,
            delay: self.text_debounce.quiet_period(),
        }]
    }

    pub(crate) fn timer_elapsed(&mut self, timer: TimerKey, generation: u64) -> Vec<Effect> {
        match timer {
            TimerKey::SearchText => match self.text_debounce.elapsed(generation) {
                Some(text) => {
                    let next = self.filter.clone().with_text(text);
                    self.commit_filter(next)
                }
                None => Vec::new(),
            },
            TimerKey::Typeahead => self.suggestions.timer_elapsed(&mut self.tokens, generation),
            TimerKey::Salary => self.salary.timer_elapsed(&mut self.tokens, generation),
        }
    }

    pub(crate) fn resolve(
        &mut self,
        target: FetchTarget,
        token: FetchToken,
        outcome: Result<serde_json::Value, ErrorKind>,
    ) {
        let tokens = &mut self.tokens;
        let applied = match target {
            FetchTarget::Listing => self.listing.resolve(tokens, token, outcome),
            FetchTarget::Suggestions => self.suggestions.resolve(tokens, token, outcome),
            FetchTarget::Cities => self.cities.resolve(tokens, token, outcome),
            FetchTarget::RisingSkills => self.rising.resolve(tokens, token, outcome),
            FetchTarget::Salary => self.salary.resolve(tokens, token, outcome),
        };
        if !applied {
            return;
        }
        if target == FetchTarget::Listing {
            self.last_total_pages = self
                .listing
                .result()
                .success()
                .map(|page| total_pages(page.total, page.page_size));
        }
        self.mark_dirty();
    }

    pub(crate) fn teardown(&mut self) -> Vec<Effect> {
        self.tokens.invalidate_all();
        self.text_debounce.cancel();
        self.listing.teardown();
        self.suggestions.teardown();
        self.cities.teardown();
        self.rising.teardown();
        self.salary.teardown();
        self.phase = Phase::TornDown;
        vec![Effect::CancelAll]
    }

    /// Hand every controller its currently wanted request.
    fn reconcile(&mut self) -> Vec<Effect> {
        let listing = Some(ApiRequest::listing(&self.filter));
        let suggestions = self.wanted_suggestions();
        let cities = Some(ApiRequest::cities(&self.tuning.city_facet));
        let rising = Some(ApiRequest::rising_skills(&self.tuning.rising, self.filter.city()));
        let salary = self.wanted_salary();

        let tokens = &mut self.tokens;
        let mut effects = self.listing.observe(tokens, listing);
        effects.extend(self.suggestions.observe(tokens, suggestions));
        effects.extend(self.cities.observe(tokens, cities));
        effects.extend(self.rising.observe(tokens, rising));
        effects.extend(self.salary.observe(tokens, salary));
        effects
    }

    fn wanted_suggestions(&self) -> Option<ApiRequest> {
        let skill = self.filter.skill();
        (skill.chars().count() >= self.tuning.typeahead_min_len)
            .then(|| ApiRequest::skill_suggestions(skill))
    }

    fn wanted_salary(&self) -> Option<ApiRequest> {
        let skill = self.filter.skill();
        (!skill.trim().is_empty()).then(|| ApiRequest::salary_by_skill(skill, self.filter.city()))
    }
}
