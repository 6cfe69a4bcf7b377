// Unit tests for the request state machine.
//
// Drives the session with an in-memory backend so every transition
// (validation failure, duplicate submit, stale response, retry) can be
// checked without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use postwise::form::model::{FieldUpdate, FormModel};
use postwise::prediction::client::PredictionBackend;
use postwise::prediction::error::{ErrorKind, PredictionError};
use postwise::prediction::payload::PredictionPayload;
use postwise::prediction::result::{PredictionResult, SentimentCategory};
use postwise::session::machine::RequestStateMachine;
use postwise::session::state::{Phase, RequestState};

/// Backend that replays scripted outcomes and counts calls.
struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<PredictionResult, PredictionError>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(outcomes: Vec<Result<PredictionResult, PredictionError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionBackend for ScriptedBackend {
    async fn predict(
        &self,
        _payload: &PredictionPayload,
    ) -> Result<PredictionResult, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PredictionError::network("no scripted outcome")))
    }
}

fn tech_result() -> PredictionResult {
    PredictionResult::from_json(
        r#"{"best_day": 2, "best_hour": 14, "nlp_insights": {"topic": "Tech",
            "sentiment_category": "positive", "toxicity_score": 3.2, "language": "en"}}"#,
    )
    .unwrap()
}

fn valid_form() -> FormModel {
    FormModel::default().with(FieldUpdate::Caption("Big launch today #rust".to_string()))
}

// ============================================================
// Validation failures never reach the backend
// ============================================================

#[tokio::test]
async fn non_numeric_followers_fail_without_network_call() {
    let backend = ScriptedBackend::new(vec![Ok(tech_result())]);
    let mut session = RequestStateMachine::new();
    let form = valid_form().with(FieldUpdate::Followers("ten thousand".to_string()));

    let state = session.submit(&form, &backend).await;

    assert_eq!(state.phase(), Phase::Failed);
    assert_eq!(state.error().map(PredictionError::kind), Some(ErrorKind::Validation));
    assert!(state.result().is_none());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn blank_caption_fails_without_network_call() {
    let backend = ScriptedBackend::new(vec![]);
    let mut session = RequestStateMachine::new();

    session.submit(&FormModel::default(), &backend).await;

    assert_eq!(session.state().phase(), Phase::Failed);
    assert_eq!(backend.calls(), 0);
}

// ============================================================
// Success and failure outcomes
// ============================================================

#[tokio::test]
async fn success_stores_exact_result_and_clears_error() {
    let backend = ScriptedBackend::new(vec![
        Err(PredictionError::Server {
            status: 500,
            message: "Model not loaded".into(),
        }),
        Ok(tech_result()),
    ]);
    let mut session = RequestStateMachine::new();

    session.submit(&valid_form(), &backend).await;
    assert_eq!(session.state().phase(), Phase::Failed);

    let state = session.submit(&valid_form(), &backend).await;
    assert_eq!(state, &RequestState::Succeeded(tech_result()));
    assert!(state.error().is_none());

    let result = state.result().unwrap();
    assert_eq!(result.best_day, 2);
    assert_eq!(result.best_hour, 14);
    assert_eq!(result.nlp_insights.topic, "Tech");
    assert_eq!(
        result.nlp_insights.sentiment_category,
        SentimentCategory::Positive
    );
    assert_eq!(result.nlp_insights.language, "en");
}

#[tokio::test]
async fn failure_after_success_clears_result() {
    let backend = ScriptedBackend::new(vec![
        Ok(tech_result()),
        Err(PredictionError::parse("missing required field `nlp_insights`")),
    ]);
    let mut session = RequestStateMachine::new();

    session.submit(&valid_form(), &backend).await;
    assert!(session.state().result().is_some());

    let state = session.submit(&valid_form(), &backend).await;
    assert_eq!(state.phase(), Phase::Failed);
    assert_eq!(state.error().map(PredictionError::kind), Some(ErrorKind::Parse));
    assert!(state.result().is_none());
}

#[tokio::test]
async fn retry_after_network_failure() {
    let backend = ScriptedBackend::new(vec![
        Err(PredictionError::network("connection refused")),
        Ok(tech_result()),
    ]);
    let mut session = RequestStateMachine::new();

    session.submit(&valid_form(), &backend).await;
    assert_eq!(
        session.state().error().map(PredictionError::kind),
        Some(ErrorKind::Network)
    );

    // From Failed, a new submit goes through Submitting again
    let pending = session.begin(&valid_form()).expect("submit allowed from Failed");
    assert_eq!(session.state().phase(), Phase::Submitting);
    assert!(session.state().error().is_none());

    let outcome = backend.predict(&pending.payload).await;
    assert!(session.complete(pending.request_id, outcome));
    assert_eq!(session.state().phase(), Phase::Succeeded);
    assert_eq!(backend.calls(), 2);
}

// ============================================================
// Single request in flight
// ============================================================

#[test]
fn submit_while_submitting_is_ignored() {
    let mut session = RequestStateMachine::new();
    let first = session.begin(&valid_form()).unwrap();
    let before = session.state().clone();

    assert!(session.begin(&valid_form()).is_none());
    assert_eq!(session.state(), &before);

    // Even an invalid form doesn't disturb the in-flight request
    let bad = valid_form().with(FieldUpdate::Followers("x".to_string()));
    assert!(session.begin(&bad).is_none());
    assert_eq!(session.state(), &before);

    assert!(session.complete(first.request_id, Ok(tech_result())));
    assert_eq!(session.state().phase(), Phase::Succeeded);
}

#[test]
fn response_for_old_request_is_discarded() {
    let mut session = RequestStateMachine::new();

    let first = session.begin(&valid_form()).unwrap();
    assert!(session.complete(first.request_id, Ok(tech_result())));

    let second = session.begin(&valid_form()).unwrap();
    assert_ne!(first.request_id, second.request_id);

    // A late duplicate of the first response must not land on the second submit
    assert!(!session.complete(
        first.request_id,
        Err(PredictionError::network("late"))
    ));
    assert_eq!(session.state().phase(), Phase::Submitting);

    assert!(session.complete(second.request_id, Ok(tech_result())));
    assert_eq!(session.state().phase(), Phase::Succeeded);
}

#[test]
fn cancel_discards_late_response() {
    let mut session = RequestStateMachine::new();
    assert!(!session.cancel());

    let pending = session.begin(&valid_form()).unwrap();
    assert!(session.cancel());
    assert_eq!(session.state(), &RequestState::Idle);

    assert!(!session.complete(pending.request_id, Ok(tech_result())));
    assert_eq!(session.state(), &RequestState::Idle);
}

#[test]
fn complete_without_submit_is_ignored() {
    let mut session = RequestStateMachine::new();
    assert!(!session.complete(1, Ok(tech_result())));
    assert_eq!(session.state(), &RequestState::Idle);
}

#[test]
fn pending_payload_reflects_form() {
    let mut session = RequestStateMachine::new();
    let form = valid_form()
        .with(FieldUpdate::Verified(true))
        .with(FieldUpdate::Followers(" 42 ".to_string()));

    let pending = session.begin(&form).unwrap();
    assert_eq!(pending.payload.followers, 42);
    assert_eq!(pending.payload.verified.as_int(), 1);
    assert_eq!(pending.payload.cross_platform_spread.as_int(), 0);
}
