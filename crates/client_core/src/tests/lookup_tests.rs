use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use serde_json::json;

use super::*;
use crate::error::EMPTY_QUERY_MESSAGE;

struct ScriptedSource {
    outcome: Result<Value, LookupError>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn returning(outcome: Result<Value, LookupError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderSource for ScriptedSource {
    async fn fetch_order(&self, query: &OrderQuery) -> Result<Value, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .expect("queries lock")
            .push(query.as_str().to_string());
        self.outcome.clone()
    }
}

fn controller(ordering: ResponseOrdering) -> LookupController {
    LookupController::new(ordering, OrderRenderer::utc())
}

fn order(uid: &str) -> Value {
    json!({ "order_uid": uid, "delivery": {}, "payment": {}, "items": [] })
}

#[test]
fn query_is_trimmed_and_must_not_be_empty() {
    assert_eq!(OrderQuery::parse("  12345\t").expect("query").as_str(), "12345");
    assert_eq!(OrderQuery::parse(""), Err(LookupError::Validation));
    assert_eq!(OrderQuery::parse(" \n\t "), Err(LookupError::Validation));
}

#[test]
fn starts_idle() {
    let controller = controller(ResponseOrdering::LatestInitiated);
    assert_eq!(controller.state(), &LookupState::Idle);
}

#[test]
fn empty_query_moves_to_error_without_pending_lookup() {
    let mut controller = controller(ResponseOrdering::LatestInitiated);
    assert!(controller.begin("   ").is_none());
    assert_eq!(controller.state().error_message(), Some(EMPTY_QUERY_MESSAGE));
}

#[test]
fn valid_query_moves_to_loading() {
    let mut controller = controller(ResponseOrdering::LatestInitiated);
    let pending = controller.begin(" 12345 ").expect("pending");
    assert_eq!(pending.query.as_str(), "12345");
    assert!(controller.state().is_loading());
}

#[test]
fn success_replaces_previous_error() {
    let mut controller = controller(ResponseOrdering::LatestInitiated);
    controller.begin("");
    let pending = controller.begin("12345").expect("pending");
    assert_eq!(
        controller.complete(pending.ticket, Ok(order("12345"))),
        Completion::Applied
    );

    let rendered = controller.state().result().expect("result");
    assert_eq!(rendered.view.field("Order UID"), Some("12345"));
    assert!(controller.state().error_message().is_none());
}

#[test]
fn failures_map_to_error_text() {
    let mut controller = controller(ResponseOrdering::LatestInitiated);

    let pending = controller.begin("missing").expect("pending");
    controller.complete(pending.ticket, Err(LookupError::NotFound));
    assert_eq!(controller.state().error_message(), Some("Order not found"));

    let pending = controller.begin("boom").expect("pending");
    controller.complete(pending.ticket, Err(LookupError::Service { status: 500 }));
    assert_eq!(controller.state().error_message(), Some("Server error: 500"));

    let pending = controller.begin("offline").expect("pending");
    controller.complete(
        pending.ticket,
        Err(LookupError::Transport("connection refused".into())),
    );
    assert_eq!(controller.state().error_message(), Some("connection refused"));
}

#[test]
fn unreadable_record_ends_in_error() {
    let mut controller = controller(ResponseOrdering::LatestInitiated);
    let pending = controller.begin("12345").expect("pending");
    controller.complete(pending.ticket, Ok(json!({ "order_uid": "12345" })));

    assert_eq!(
        controller.state().error_message(),
        Some("Cannot read properties of undefined (reading 'name')")
    );
}

#[test]
fn latest_initiated_discards_superseded_response() {
    let mut controller = controller(ResponseOrdering::LatestInitiated);
    let first = controller.begin("first").expect("first");
    let second = controller.begin("second").expect("second");

    assert_eq!(
        controller.complete(second.ticket, Ok(order("second"))),
        Completion::Applied
    );
    assert_eq!(
        controller.complete(first.ticket, Err(LookupError::NotFound)),
        Completion::Discarded
    );

    let rendered = controller.state().result().expect("result");
    assert_eq!(rendered.view.field("Order UID"), Some("second"));
}

#[test]
fn latest_initiated_keeps_loading_until_current_resolves() {
    let mut controller = controller(ResponseOrdering::LatestInitiated);
    let first = controller.begin("first").expect("first");
    let _second = controller.begin("second").expect("second");

    assert_eq!(
        controller.complete(first.ticket, Ok(order("first"))),
        Completion::Discarded
    );
    assert!(controller.state().is_loading());
}

#[test]
fn last_to_resolve_applies_every_completion() {
    let mut controller = controller(ResponseOrdering::LastToResolve);
    let first = controller.begin("first").expect("first");
    let second = controller.begin("second").expect("second");

    controller.complete(second.ticket, Ok(order("second")));
    assert_eq!(
        controller.complete(first.ticket, Ok(order("first"))),
        Completion::Applied
    );

    let rendered = controller.state().result().expect("result");
    assert_eq!(rendered.view.field("Order UID"), Some("first"));
}

#[test]
fn rejected_query_supersedes_in_flight_lookup() {
    let mut controller = controller(ResponseOrdering::LatestInitiated);
    let in_flight = controller.begin("12345").expect("pending");
    assert!(controller.begin(" ").is_none());

    assert_eq!(
        controller.complete(in_flight.ticket, Ok(order("12345"))),
        Completion::Discarded
    );
    assert_eq!(controller.state().error_message(), Some(EMPTY_QUERY_MESSAGE));
}

#[tokio::test]
async fn lookup_skips_source_for_blank_input() {
    let source = ScriptedSource::returning(Ok(order("12345")));
    let mut controller = controller(ResponseOrdering::LatestInitiated);

    let state = controller.lookup(&source, "  ").await;
    assert_eq!(state.error_message(), Some(EMPTY_QUERY_MESSAGE));
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn lookup_fetches_trimmed_query_once() {
    let source = ScriptedSource::returning(Ok(order("12345")));
    let mut controller = controller(ResponseOrdering::LatestInitiated);

    let state = controller.lookup(&source, " 12345 ").await;
    assert!(state.result().is_some());
    assert_eq!(source.calls(), 1);
    assert_eq!(
        source.queries.lock().expect("queries lock").as_slice(),
        ["12345".to_string()]
    );
}
