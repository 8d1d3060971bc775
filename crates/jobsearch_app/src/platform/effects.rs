use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use jobsearch_core::{ApiRequest, Effect, ErrorKind, FetchTarget, FetchToken, Msg, ParamValue, TimerKey};
use jobsearch_engine::{
    EngineEvent, EngineHandle, FailureKind, FetchError, QueryParams, RequestId, Scalar,
};
use jobsearch_logging::{search_debug, search_info, search_trace, search_warn};

use super::location::LocationBar;

/// Executes core effects on the engine and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
    next_request: RequestId,
    in_flight: HashMap<RequestId, (FetchTarget, FetchToken)>,
    /// Timer to the generation it was last armed with.
    armed: BTreeMap<TimerKey, u64>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            next_request: 1,
            in_flight: HashMap::new(),
            armed: BTreeMap::new(),
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>, location: &mut LocationBar) {
        for effect in effects {
            match effect {
                Effect::ReplaceLocation { location: next } => {
                    if location.replace(next) {
                        search_debug!(
                            "Location replaced (write {}): {}",
                            location.writes(),
                            location.current()
                        );
                    }
                }
                Effect::Fetch {
                    target,
                    token,
                    request,
                } => {
                    let request_id = self.next_request;
                    self.next_request += 1;
                    search_info!(
                        "Fetch {} request_id={} token={} path={}",
                        target,
                        request_id,
                        token.id(),
                        request.path
                    );
                    self.in_flight.insert(request_id, (target, token));
                    self.engine
                        .fetch(request_id, target.index(), request.path, to_params(&request));
                }
                Effect::StartTimer {
                    timer,
                    generation,
                    delay,
                } => {
                    search_trace!("Timer {:?} armed generation={} delay={:?}", timer, generation, delay);
                    self.armed.insert(timer, generation);
                    self.engine.start_timer(timer.index(), generation, delay);
                }
                Effect::CancelTimer { timer } => {
                    self.armed.remove(&timer);
                    self.engine.cancel_timer(timer.index());
                }
                Effect::CancelAll => {
                    self.armed.clear();
                    self.in_flight.clear();
                    self.engine.cancel_all();
                }
            }
        }
    }

    /// Wait up to `timeout` for the next engine event that still matters.
    pub fn poll(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        self.translate(event)
    }

    /// No fetch in flight and no timer armed.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty() && self.armed.is_empty()
    }

    fn translate(&mut self, event: EngineEvent) -> Option<Msg> {
        match event {
            EngineEvent::FetchCompleted { request_id, result } => {
                let Some((target, token)) = self.in_flight.remove(&request_id) else {
                    search_debug!("Completion for unknown request_id={}", request_id);
                    return None;
                };
                let outcome = match result {
                    Ok(value) => Ok(value),
                    Err(err) if err.kind == FailureKind::Cancelled => {
                        search_debug!("Fetch {} request_id={} aborted", target, request_id);
                        return None;
                    }
                    Err(err) => {
                        search_warn!("Fetch {} request_id={} failed: {}", target, request_id, err);
                        Err(map_failure(err))
                    }
                };
                Some(Msg::FetchResolved {
                    target,
                    token,
                    outcome,
                })
            }
            EngineEvent::TimerFired {
                timer_id,
                generation,
            } => {
                let timer = TimerKey::from_index(timer_id)?;
                // A generation that fired just before a restart must not
                // disarm the newer one.
                if self.armed.get(&timer) == Some(&generation) {
                    self.armed.remove(&timer);
                }
                Some(Msg::TimerElapsed { timer, generation })
            }
        }
    }
}

pub fn to_params(request: &ApiRequest) -> QueryParams {
    request
        .params
        .iter()
        .map(|(name, value)| (name.to_string(), value.as_ref().map(to_scalar)))
        .collect()
}

fn to_scalar(value: &ParamValue) -> Scalar {
    match value {
        ParamValue::Str(text) => Scalar::Str(text.clone()),
        ParamValue::Int(number) => Scalar::Int(*number),
        ParamValue::Bool(flag) => Scalar::Bool(*flag),
    }
}

pub fn map_failure(err: FetchError) -> ErrorKind {
    match err.kind {
        FailureKind::HttpStatus(code) => ErrorKind::Transport {
            status: Some(code),
            message: err.message,
        },
        FailureKind::InvalidJson => ErrorKind::Parse(err.message),
        FailureKind::InvalidUrl
        | FailureKind::Timeout
        | FailureKind::TooLarge { .. }
        | FailureKind::Cancelled
        | FailureKind::Network => ErrorKind::Transport {
            status: None,
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use jobsearch_core::FilterState;
    use jobsearch_engine::QueryClient;
    use pretty_assertions::assert_eq;

    struct Unreachable;

    #[async_trait::async_trait]
    impl QueryClient for Unreachable {
        async fn fetch_json(
            &self,
            _path: &str,
            _params: &[(String, Option<Scalar>)],
        ) -> Result<serde_json::Value, FetchError> {
            Err(FetchError::new(FailureKind::Network, "offline"))
        }
    }

    #[test]
    fn late_fire_of_old_generation_keeps_newer_timer_armed() {
        let engine = EngineHandle::with_client(Arc::new(Unreachable)).unwrap();
        let mut runner = EffectRunner::new(engine);
        let mut location = LocationBar::new("/jobs");
        let arm = |generation, millis| Effect::StartTimer {
            timer: TimerKey::SearchText,
            generation,
            delay: Duration::from_millis(millis),
        };

        runner.run(vec![arm(1, 5)], &mut location);
        std::thread::sleep(Duration::from_millis(100));
        runner.run(vec![arm(2, 300)], &mut location);

        assert_eq!(
            runner.poll(Duration::from_millis(50)),
            Some(Msg::TimerElapsed {
                timer: TimerKey::SearchText,
                generation: 1
            })
        );
        assert!(!runner.is_idle());

        assert_eq!(
            runner.poll(Duration::from_secs(5)),
            Some(Msg::TimerElapsed {
                timer: TimerKey::SearchText,
                generation: 2
            })
        );
        assert!(runner.is_idle());
    }

    #[test]
    fn absent_params_stay_absent() {
        let request = ApiRequest::listing(&FilterState::new().with_skill("rust"));
        let params = to_params(&request);
        assert_eq!(params[0], ("q".to_string(), None));
        assert!(params.contains(&("skill".to_string(), Some(Scalar::Str("rust".to_string())))));
        assert!(params.contains(&("page_size".to_string(), Some(Scalar::Int(20)))));
    }

    #[test]
    fn status_failures_keep_code_and_reason() {
        let err = FetchError::new(FailureKind::HttpStatus(500), "Internal Server Error");
        assert_eq!(
            map_failure(err).to_string(),
            "HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn body_failures_are_parse_errors() {
        let err = FetchError::new(FailureKind::InvalidJson, "expected value at line 1");
        assert_eq!(
            map_failure(err),
            ErrorKind::Parse("expected value at line 1".to_string())
        );
        let err = FetchError::new(FailureKind::Timeout, "deadline");
        assert!(matches!(map_failure(err), ErrorKind::Transport { status: None, .. }));
    }
}
