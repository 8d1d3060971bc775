#![allow(dead_code)]

use std::sync::Once;

use jobsearch_core::{
    update, ApiRequest, AppState, Effect, ErrorKind, FetchTarget, FetchToken, Msg, TimerKey,
};
use serde_json::{json, Value};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobsearch_logging::initialize_for_tests);
}

pub fn mount(location: &str) -> (AppState, Vec<Effect>) {
    init_logging();
    update(
        AppState::new(),
        Msg::Mount {
            location: location.to_string(),
        },
    )
}

pub fn fetch_for(effects: &[Effect], wanted: FetchTarget) -> Option<(FetchToken, ApiRequest)> {
    effects.iter().find_map(|effect| match effect {
        Effect::Fetch {
            target,
            token,
            request,
        } if *target == wanted => Some((*token, request.clone())),
        _ => None,
    })
}

pub fn timer_for(effects: &[Effect], wanted: TimerKey) -> Option<u64> {
    effects.iter().find_map(|effect| match effect {
        Effect::StartTimer {
            timer, generation, ..
        } if *timer == wanted => Some(*generation),
        _ => None,
    })
}

pub fn location_write(effects: &[Effect]) -> Option<&str> {
    effects.iter().find_map(|effect| match effect {
        Effect::ReplaceLocation { location } => Some(location.as_str()),
        _ => None,
    })
}

pub fn sent_params(request: &ApiRequest) -> Vec<(&'static str, String)> {
    request
        .present_params()
        .map(|(name, value)| (name, value.to_string()))
        .collect()
}

pub fn resolve(
    state: AppState,
    target: FetchTarget,
    token: FetchToken,
    outcome: Result<Value, ErrorKind>,
) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::FetchResolved {
            target,
            token,
            outcome,
        },
    )
}

pub fn fire(state: AppState, timer: TimerKey, generation: u64) -> (AppState, Vec<Effect>) {
    update(state, Msg::TimerElapsed { timer, generation })
}

pub fn job(id: &str, title: &str, company: &str) -> Value {
    json!({
        "job_id": id,
        "title": title,
        "company": company,
        "city": "Austin",
        "region": "TX",
        "country": "US",
        "posted_at": null,
        "created_at": "2024-06-01T12:00:00Z",
        "url": format!("https://jobs.example.com/{id}"),
        "remote_flag": false
    })
}

pub fn listing_json(total: u64, page: u32, items: Vec<Value>) -> Value {
    json!({ "total": total, "page": page, "page_size": 20, "items": items })
}

pub fn server_error() -> ErrorKind {
    ErrorKind::Transport {
        status: Some(500),
        message: "Internal Server Error".to_string(),
    }
}
