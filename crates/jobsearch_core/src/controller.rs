use std::time::Duration;

use jobsearch_logging::{search_debug, search_info, search_warn};

use crate::debounce::Debounce;
use crate::effect::{Effect, TimerKey};
use crate::query::{decode, ErrorKind, Payload, QueryResult};
use crate::request::ApiRequest;
use crate::token::{FetchTarget, FetchToken, TokenRegistry};

/// What a failed fetch does to the visible result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep the error as `QueryResult::Failure`.
    Surface,
    /// Log it and show the empty payload instead.
    Absorb,
}

/// One fetch target: decides when its request changes, debounces it if
/// configured, issues the fetch, and applies only the current response.
///
/// The wanted request is recomputed from the filter state after every
/// change and passed to [`QueryController::observe`]; nothing is fetched
/// unless it differs from the last committed request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryController<T> {
    target: FetchTarget,
    timer: Option<TimerKey>,
    policy: FailurePolicy,
    debounce: Debounce<ApiRequest>,
    committed: Option<ApiRequest>,
    result: QueryResult<T>,
}

impl<T: Payload> QueryController<T> {
    pub fn immediate(target: FetchTarget, policy: FailurePolicy) -> Self {
        Self {
            target,
            timer: None,
            policy,
            debounce: Debounce::new(Duration::ZERO),
            committed: None,
            result: QueryResult::Idle,
        }
    }

    pub fn debounced(
        target: FetchTarget,
        timer: TimerKey,
        quiet: Duration,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            timer: Some(timer),
            debounce: Debounce::new(quiet),
            ..Self::immediate(target, policy)
        }
    }

    pub fn target(&self) -> FetchTarget {
        self.target
    }

    pub fn result(&self) -> &QueryResult<T> {
        &self.result
    }

    /// Last request handed to the transport.
    pub fn committed(&self) -> Option<&ApiRequest> {
        self.committed.as_ref()
    }

    pub fn is_scheduled(&self) -> bool {
        self.debounce.is_pending()
    }

    /// React to the currently wanted request. `None` clears the target to
    /// `Idle` without a request.
    pub fn observe(&mut self, tokens: &mut TokenRegistry, wanted: Option<ApiRequest>) -> Vec<Effect> {
        let Some(request) = wanted else {
            let effects = self.disarm();
            self.committed = None;
            tokens.invalidate(self.target);
            self.result = QueryResult::Idle;
            return effects;
        };

        if self.committed.as_ref() == Some(&request) {
            return self.disarm();
        }
        if self.debounce.pending() == Some(&request) {
            return Vec::new();
        }

        match self.timer {
            None => self.begin(tokens, request),
            Some(timer) => {
                let generation = self.debounce.input(request);
                vec![Effect::StartTimer {
                    timer,
                    generation,
                    delay: self.debounce.quiet_period(),
                }]
            }
        }
    }

    pub fn timer_elapsed(&mut self, tokens: &mut TokenRegistry, generation: u64) -> Vec<Effect> {
        match self.debounce.elapsed(generation) {
            Some(request) => self.begin(tokens, request),
            None => Vec::new(),
        }
    }

    /// Apply a response if `token` is still current for this target.
    /// Returns whether the visible result changed.
    pub fn resolve(
        &mut self,
        tokens: &mut TokenRegistry,
        token: FetchToken,
        outcome: Result<serde_json::Value, ErrorKind>,
    ) -> bool {
        if !tokens.finish(self.target, token) {
            search_debug!(
                "Discarding stale {} response token={}",
                self.target,
                token.id()
            );
            return false;
        }

        self.result = match outcome.and_then(decode::<T>) {
            Ok(payload) => QueryResult::Success(payload),
            Err(err) => match self.policy {
                FailurePolicy::Surface => {
                    search_warn!("{} fetch failed: {}", self.target, err);
                    QueryResult::Failure(err)
                }
                FailurePolicy::Absorb => {
                    search_warn!("{} fetch failed, showing empty result: {}", self.target, err);
                    QueryResult::Success(T::default())
                }
            },
        };
        true
    }

    /// Drop any pending timer. Tokens are invalidated by the owner.
    pub fn teardown(&mut self) {
        self.debounce.cancel();
    }

    fn begin(&mut self, tokens: &mut TokenRegistry, request: ApiRequest) -> Vec<Effect> {
        let token = tokens.begin_fetch(self.target);
        search_info!(
            "Fetching {} path={} token={}",
            self.target,
            request.path,
            token.id()
        );
        self.committed = Some(request.clone());
        self.result = QueryResult::Loading;
        vec![Effect::Fetch {
            target: self.target,
            token,
            request,
        }]
    }

    fn disarm(&mut self) -> Vec<Effect> {
        if !self.debounce.is_pending() {
            return Vec::new();
        }
        self.debounce.cancel();
        self.timer
            .map(|timer| vec![Effect::CancelTimer { timer }])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn typeahead() -> QueryController<Vec<String>> {
        QueryController::debounced(
            FetchTarget::Suggestions,
            TimerKey::Typeahead,
            Duration::from_millis(200),
            FailurePolicy::Absorb,
        )
    }

    #[test]
    fn debounced_controller_fetches_after_timer() {
        let mut tokens = TokenRegistry::new();
        let mut controller = typeahead();
        let effects = controller.observe(&mut tokens, Some(ApiRequest::skill_suggestions("py")));
        let generation = match effects.as_slice() {
            [Effect::StartTimer { generation, .. }] => *generation,
            other => panic!("unexpected effects {other:?}"),
        };
        assert!(controller.result().success().is_none());

        let effects = controller.timer_elapsed(&mut tokens, generation);
        assert!(matches!(effects.as_slice(), [Effect::Fetch { .. }]));
        assert!(controller.result().is_loading());
    }

    #[test]
    fn absorbed_failure_degrades_to_empty() {
        let mut tokens = TokenRegistry::new();
        let mut controller = QueryController::<Vec<String>>::immediate(
            FetchTarget::Suggestions,
            FailurePolicy::Absorb,
        );
        let effects = controller.observe(&mut tokens, Some(ApiRequest::skill_suggestions("go")));
        let token = match effects.as_slice() {
            [Effect::Fetch { token, .. }] => *token,
            other => panic!("unexpected effects {other:?}"),
        };
        let applied = controller.resolve(
            &mut tokens,
            token,
            Err(ErrorKind::Transport {
                status: Some(502),
                message: "Bad Gateway".into(),
            }),
        );
        assert!(applied);
        assert_eq!(controller.result(), &QueryResult::Success(Vec::new()));
    }

    #[test]
    fn unchanged_request_is_not_refetched() {
        let mut tokens = TokenRegistry::new();
        let mut controller = QueryController::<Vec<String>>::immediate(
            FetchTarget::Suggestions,
            FailurePolicy::Surface,
        );
        let request = ApiRequest::skill_suggestions("rust");
        assert_eq!(controller.observe(&mut tokens, Some(request.clone())).len(), 1);
        assert!(controller.observe(&mut tokens, Some(request)).is_empty());
    }

    #[test]
    fn clearing_discards_in_flight_response() {
        let mut tokens = TokenRegistry::new();
        let mut controller = QueryController::<Vec<String>>::immediate(
            FetchTarget::Suggestions,
            FailurePolicy::Surface,
        );
        let effects = controller.observe(&mut tokens, Some(ApiRequest::skill_suggestions("rust")));
        let token = match effects.as_slice() {
            [Effect::Fetch { token, .. }] => *token,
            other => panic!("unexpected effects {other:?}"),
        };
        controller.observe(&mut tokens, None);
        assert!(!controller.resolve(&mut tokens, token, Ok(json!(["rust"]))));
        assert_eq!(controller.result(), &QueryResult::Idle);
    }
}
