use std::sync::Arc;
use std::time::Duration;

use jobsearch_engine::{
    EngineEvent, EngineHandle, FailureKind, FetchError, QueryClient, Scalar,
};
use serde_json::{json, Value};

/// Answers after a delay taken from the `delay_ms` parameter.
struct SlowEcho;

#[async_trait::async_trait]
impl QueryClient for SlowEcho {
    async fn fetch_json(
        &self,
        path: &str,
        params: &[(String, Option<Scalar>)],
    ) -> Result<Value, FetchError> {
        let delay = params
            .iter()
            .find(|(name, _)| name == "delay_ms")
            .and_then(|(_, value)| match value {
                Some(Scalar::Int(ms)) => Some(*ms as u64),
                _ => None,
            })
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        if path == "/fail" {
            return Err(FetchError::new(FailureKind::HttpStatus(503), "Service Unavailable"));
        }
        Ok(json!({ "path": path }))
    }
}

fn engine() -> EngineHandle {
    EngineHandle::with_client(Arc::new(SlowEcho)).expect("engine")
}

fn delay(ms: i64) -> Vec<(String, Option<Scalar>)> {
    vec![("delay_ms".to_string(), Some(Scalar::Int(ms)))]
}

fn collect(engine: &EngineHandle, count: usize) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while events.len() < count {
        match engine.recv_timeout(Duration::from_secs(5)) {
            Some(event) => events.push(event),
            None => break,
        }
    }
    events
}

#[test]
fn newer_fetch_in_same_slot_cancels_the_older() {
    let engine = engine();
    engine.fetch(1, 0, "/slow", delay(2_000));
    engine.fetch(2, 0, "/fast", delay(10));

    let events = collect(&engine, 2);
    assert_eq!(events.len(), 2);
    for event in events {
        match event {
            EngineEvent::FetchCompleted { request_id: 1, result } => {
                assert_eq!(result.unwrap_err().kind, FailureKind::Cancelled);
            }
            EngineEvent::FetchCompleted { request_id: 2, result } => {
                assert_eq!(result.unwrap(), json!({ "path": "/fast" }));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}

#[test]
fn fetches_in_different_slots_run_independently() {
    let engine = engine();
    engine.fetch(1, 0, "/a", delay(20));
    engine.fetch(2, 1, "/fail", delay(0));

    let mut events = collect(&engine, 2);
    events.sort_by_key(|event| match event {
        EngineEvent::FetchCompleted { request_id, .. } => *request_id,
        EngineEvent::TimerFired { .. } => u64::MAX,
    });
    match &events[..] {
        [EngineEvent::FetchCompleted { result: first, .. }, EngineEvent::FetchCompleted { result: second, .. }] =>
        {
            assert!(first.is_ok());
            assert_eq!(second.as_ref().unwrap_err().kind, FailureKind::HttpStatus(503));
        }
        other => panic!("unexpected events {other:?}"),
    }
}

#[test]
fn restarted_timer_fires_only_latest_generation() {
    let engine = engine();
    engine.start_timer(7, 1, Duration::from_millis(40));
    engine.start_timer(7, 2, Duration::from_millis(40));

    let events = collect(&engine, 1);
    assert_eq!(
        events,
        vec![EngineEvent::TimerFired {
            timer_id: 7,
            generation: 2
        }]
    );
    assert!(engine.recv_timeout(Duration::from_millis(150)).is_none());
}

#[test]
fn cancelled_timer_never_fires() {
    let engine = engine();
    engine.start_timer(3, 1, Duration::from_millis(40));
    engine.cancel_timer(3);
    assert!(engine.recv_timeout(Duration::from_millis(200)).is_none());
}

#[test]
fn cancel_all_aborts_fetches_and_timers() {
    let engine = engine();
    engine.start_timer(1, 1, Duration::from_millis(100));
    engine.fetch(9, 4, "/slow", delay(2_000));
    engine.cancel_all();

    let events = collect(&engine, 1);
    match &events[..] {
        [EngineEvent::FetchCompleted { request_id: 9, result }] => {
            assert_eq!(result.as_ref().unwrap_err().kind, FailureKind::Cancelled);
        }
        other => panic!("unexpected events {other:?}"),
    }
    assert!(engine.recv_timeout(Duration::from_millis(250)).is_none());
}
