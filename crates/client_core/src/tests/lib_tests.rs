use super::*;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use shared::form::{ViolationKind, HOST_FORM, PERFORMER_FORM};
use tokio::{net::TcpListener, sync::Notify};
use url::Url;

const RECIPIENT: &str = "bookings@artloop.example";

#[derive(Clone)]
struct EndpointState {
    status: StatusCode,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    payloads: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn handle_submission(
    State(state): State<EndpointState>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.payloads.lock().await.push(payload);
    tokio::time::sleep(state.delay).await;
    state.status
}

async fn spawn_form_endpoint(status: StatusCode, delay: Duration) -> (Url, EndpointState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = EndpointState {
        status,
        delay,
        hits: Arc::new(AtomicUsize::new(0)),
        payloads: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/f/test-form", post(handle_submission))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let url = Url::parse(&format!("http://{addr}/f/test-form")).expect("url");
    (url, state)
}

fn http_form(schema: &'static FormSchema, endpoint: Url) -> RegistrationForm {
    RegistrationForm::new(schema, RECIPIENT, Arc::new(HttpFormSubmitter::new(endpoint)))
}

async fn fill_host(form: &RegistrationForm) {
    for (name, value) in [
        ("fullName", "John Smith"),
        ("email", "john@example.com"),
        ("phone", "+1 (555) 123-4567"),
        ("organization", "Smith & Co"),
        ("eventType", "gala"),
        ("guestCount", "100-200"),
        ("message", "Jazz trio for a fundraiser"),
    ] {
        form.set_field(name, value).await.expect("host field");
    }
}

/// Holds every submission until released, counting calls.
struct GatedSubmitter {
    gate: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl FormSubmitter for GatedSubmitter {
    async fn submit(&self, _payload: &SubmissionPayload) -> Result<(), SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(())
    }
}

#[tokio::test]
async fn new_form_starts_idle_with_blank_draft() {
    let (endpoint, _state) = spawn_form_endpoint(StatusCode::OK, Duration::ZERO).await;
    let form = http_form(&PERFORMER_FORM, endpoint);
    let snapshot = form.snapshot().await;
    assert_eq!(snapshot.status, SubmissionStatus::Idle);
    assert!(snapshot.draft.is_blank());
    assert!(!snapshot.submitting);
}

#[tokio::test]
async fn set_field_updates_only_that_key() {
    let (endpoint, _state) = spawn_form_endpoint(StatusCode::OK, Duration::ZERO).await;
    let form = http_form(&HOST_FORM, endpoint);
    fill_host(&form).await;
    let before = form.snapshot().await.draft;

    form.set_field("phone", "555-0100").await.expect("phone");
    let after = form.snapshot().await.draft;
    for (name, value) in after.iter() {
        if name == "phone" {
            assert_eq!(value, "555-0100");
        } else {
            assert_eq!(Some(value), before.get(name), "{name} changed");
        }
    }

    assert!(form.set_field("genre", "jazz").await.is_err());
}

#[tokio::test]
async fn successful_submit_clears_draft_and_confirms_email() {
    let (endpoint, state) = spawn_form_endpoint(StatusCode::OK, Duration::ZERO).await;
    let form = http_form(&HOST_FORM, endpoint);
    fill_host(&form).await;

    let outcome = form.submit().await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Submitted { ref email } if email == "john@example.com"
    ));

    let snapshot = form.snapshot().await;
    assert!(snapshot.draft.is_blank());
    assert!(!snapshot.submitting);
    let SubmissionStatus::Success { email } = snapshot.status.clone() else {
        panic!("expected success status");
    };
    assert!(HOST_FORM.success_message(&email).contains("john@example.com"));

    let payloads = state.payloads.lock().await;
    assert_eq!(payloads.len(), 1);
    let body = &payloads[0];
    assert_eq!(body["fullName"], "John Smith");
    assert_eq!(body["organization"], "Smith & Co");
    assert_eq!(body["_replyto"], "john@example.com");
    assert_eq!(body["_subject"], "New Host Registration - ArtLoop Events");
    assert_eq!(body["_to"], RECIPIENT);
    assert_eq!(body["registrationType"], "Host");
}

#[tokio::test]
async fn rejected_submit_keeps_draft_and_reports_error() {
    let (endpoint, state) =
        spawn_form_endpoint(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
    let form = http_form(&HOST_FORM, endpoint);
    fill_host(&form).await;
    let before = form.snapshot().await.draft;

    let outcome = form.submit().await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(SubmitError::Rejected { status: 500 })
    ));

    let snapshot = form.snapshot().await;
    assert_eq!(snapshot.status, SubmissionStatus::Error);
    assert_eq!(snapshot.draft, before);
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_endpoint_reports_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let endpoint = Url::parse(&format!("http://{addr}/f/closed")).expect("url");
    let form = http_form(&HOST_FORM, endpoint);
    fill_host(&form).await;
    let before = form.snapshot().await.draft;

    let outcome = form.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::Transport(_))));
    assert_eq!(form.status().await, SubmissionStatus::Error);
    assert_eq!(form.snapshot().await.draft, before);
}

#[tokio::test]
async fn missing_required_field_blocks_the_outbound_call() {
    let (endpoint, state) = spawn_form_endpoint(StatusCode::OK, Duration::ZERO).await;
    let form = http_form(&HOST_FORM, endpoint);
    fill_host(&form).await;
    form.set_field("phone", "").await.expect("phone");

    let outcome = form.submit().await;
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.for_field("phone"), Some(ViolationKind::Missing));
    assert_eq!(state.hits.load(Ordering::SeqCst), 0);
    assert_eq!(form.status().await, SubmissionStatus::Idle);
}

#[tokio::test]
async fn second_submit_while_in_flight_sends_nothing() {
    let (endpoint, state) =
        spawn_form_endpoint(StatusCode::OK, Duration::from_millis(150)).await;
    let form = http_form(&HOST_FORM, endpoint);
    fill_host(&form).await;

    let (first, second) = tokio::join!(form.submit(), form.submit());
    let outcomes = [first, second];
    let submitted = outcomes
        .iter()
        .filter(|o| matches!(o, SubmitOutcome::Submitted { .. }))
        .count();
    let refused = outcomes
        .iter()
        .filter(|o| matches!(o, SubmitOutcome::AlreadySubmitting))
        .count();
    assert_eq!((submitted, refused), (1, 1));
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fields_stay_editable_while_submission_is_pending() {
    let submitter = Arc::new(GatedSubmitter {
        gate: Notify::new(),
        calls: AtomicUsize::new(0),
    });
    let form = RegistrationForm::new(&HOST_FORM, RECIPIENT, submitter.clone());
    fill_host(&form).await;

    let (outcome, ()) = tokio::join!(form.submit(), async {
        tokio::task::yield_now().await;
        assert!(form.is_submitting().await);
        form.set_field("message", "edited mid-flight")
            .await
            .expect("editable");
        assert!(matches!(form.submit().await, SubmitOutcome::AlreadySubmitting));
        submitter.gate.notify_one();
    });

    assert!(matches!(outcome, SubmitOutcome::Submitted { .. }));
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
    assert!(!form.is_submitting().await);
    assert!(form.snapshot().await.draft.is_blank());
}

#[tokio::test]
async fn error_status_persists_until_next_attempt_resolves() {
    let (failing, _) = spawn_form_endpoint(StatusCode::BAD_GATEWAY, Duration::ZERO).await;
    let form = http_form(&HOST_FORM, failing);
    fill_host(&form).await;
    form.submit().await;
    assert_eq!(form.status().await, SubmissionStatus::Error);

    form.set_field("phone", "").await.expect("phone");
    assert!(matches!(form.submit().await, SubmitOutcome::Invalid(_)));
    assert_eq!(form.status().await, SubmissionStatus::Error);
}

#[tokio::test]
async fn timed_out_submit_reports_error_and_keeps_draft() {
    let (endpoint, state) = spawn_form_endpoint(StatusCode::OK, Duration::from_secs(3)).await;
    let submitter =
        HttpFormSubmitter::with_timeout(endpoint, Duration::from_millis(200)).expect("client");
    let form = RegistrationForm::new(&HOST_FORM, RECIPIENT, Arc::new(submitter));
    fill_host(&form).await;
    let before = form.snapshot().await.draft;

    let outcome = form.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::Transport(_))));

    let snapshot = form.snapshot().await;
    assert_eq!(snapshot.status, SubmissionStatus::Error);
    assert_eq!(snapshot.draft, before);
    assert!(!snapshot.submitting);
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}
