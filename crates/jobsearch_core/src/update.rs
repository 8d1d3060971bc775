use crate::state::Phase;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// Nothing but `Msg::Mount` is accepted before mounting, and nothing at all
/// after `Msg::Teardown`.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    match (state.phase(), &msg) {
        (Phase::TornDown, _) => return (state, Vec::new()),
        (Phase::Unmounted, Msg::Mount { .. }) => {}
        (Phase::Unmounted, _) => return (state, Vec::new()),
        (Phase::Mounted, Msg::Mount { .. }) => return (state, Vec::new()),
        (Phase::Mounted, _) => {}
    }

    let effects = match msg {
        Msg::Mount { location } => state.mount(&location),
        Msg::TextInput(raw) => state.text_changed(raw),
        Msg::SkillInput(skill) => {
            let next = state.filter().clone().with_skill(skill);
            state.commit_filter(next)
        }
        Msg::CitySelected(city) => {
            let next = state.filter().clone().with_city(city);
            state.commit_filter(next)
        }
        Msg::DaysSelected(days) => {
            let next = state.filter().clone().with_days(days);
            state.commit_filter(next)
        }
        Msg::SortSelected(sort) => {
            let next = state.filter().clone().with_sort(sort);
            state.commit_filter(next)
        }
        Msg::PageRequested(page) => {
            let next = state.filter().clone().with_page(page);
            state.commit_filter(next)
        }
        Msg::NextPage => {
            let current = state.displayed_page();
            let at_end = state
                .known_total_pages()
                .is_some_and(|pages| current >= pages);
            if at_end {
                Vec::new()
            } else {
                let next = state.filter().clone().with_page(current + 1);
                state.commit_filter(next)
            }
        }
        Msg::PrevPage => {
            let current = state.displayed_page();
            if current <= 1 {
                Vec::new()
            } else {
                let next = state.filter().clone().with_page(current - 1);
                state.commit_filter(next)
            }
        }
        Msg::TimerElapsed { timer, generation } => state.timer_elapsed(timer, generation),
        Msg::FetchResolved {
            target,
            token,
            outcome,
        } => {
            state.resolve(target, token, outcome);
            Vec::new()
        }
        Msg::Teardown => state.teardown(),
    };

    (state, effects)
}
