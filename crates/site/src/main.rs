use std::{net::SocketAddr, sync::Arc};

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use client_core::{
    FormSnapshot, HttpFormSubmitter, RegistrationForm, SubmissionStatus, SubmitOutcome,
};
use shared::{
    domain::{find_event, EventId, RegistrationType, UPCOMING_EVENTS},
    error::{ApiError, ErrorCode},
    form::{FormDraft, FormSchema},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod pages;

use app_state::{AppState, SiteInfo};
use config::load_settings;
use pages::{EventPage, HomePage, NotFoundPage, RegisterPage};

const MAX_FORM_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings()?;
    let endpoint = settings.form_endpoint_url()?;
    let submitter = match settings.submit_timeout() {
        Some(timeout) => HttpFormSubmitter::with_timeout(endpoint, timeout)?,
        None => HttpFormSubmitter::new(endpoint),
    };
    info!(endpoint = %submitter.endpoint(), "relaying registrations to form endpoint");

    let state = AppState {
        site: SiteInfo {
            title: settings.site_title,
            tagline: settings.site_tagline,
            contact_email: settings.contact_email,
        },
        form_recipient: settings.form_recipient,
        submitter: Arc::new(submitter),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "site listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/events/:event_id", get(event_detail))
        .route("/register/:kind", get(register_form).post(register_submit))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BODY_BYTES))
        .with_state(state)
}

struct SiteError(ApiError);

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.0)).into_response()
    }
}

fn render(page: &impl Template, status: StatusCode) -> Result<Response, SiteError> {
    let body = page.render().map_err(|error| {
        error!(%error, "failed to render page");
        SiteError(ApiError::internal(error.to_string()))
    })?;
    Ok((status, Html(body)).into_response())
}

fn schema_for(kind: &str) -> Option<&'static FormSchema> {
    kind.parse::<RegistrationType>()
        .ok()
        .map(FormSchema::for_type)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn home(State(state): State<Arc<AppState>>) -> Result<Response, SiteError> {
    render(&HomePage::new(&state.site, UPCOMING_EVENTS), StatusCode::OK)
}

async fn not_found(State(state): State<Arc<AppState>>) -> Result<Response, SiteError> {
    render(&NotFoundPage::new(&state.site), StatusCode::NOT_FOUND)
}

async fn event_detail(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Response, SiteError> {
    let Some(event) = event_id.parse::<EventId>().ok().and_then(find_event) else {
        return render(&NotFoundPage::new(&state.site), StatusCode::NOT_FOUND);
    };

    render(
        &EventPage {
            site_title: &state.site.title,
            page_title: event.title,
            description: event.description,
            event,
        },
        StatusCode::OK,
    )
}

async fn register_form(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Response, SiteError> {
    let Some(schema) = schema_for(&kind) else {
        return render(&NotFoundPage::new(&state.site), StatusCode::NOT_FOUND);
    };

    let snapshot = FormSnapshot {
        draft: FormDraft::empty(schema),
        status: SubmissionStatus::Idle,
        submitting: false,
    };
    render(
        &RegisterPage::new(&state.site, schema, &snapshot, None),
        StatusCode::OK,
    )
}

/// Server-side rendition of the form's submit handler: the posted fields
/// become the draft of a fresh form instance, which submits once and is
/// rendered with whatever status it ends up in.
async fn register_submit(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, SiteError> {
    let Some(schema) = schema_for(&kind) else {
        return render(&NotFoundPage::new(&state.site), StatusCode::NOT_FOUND);
    };

    let form = RegistrationForm::with_draft(
        schema,
        state.form_recipient.clone(),
        state.submitter.clone(),
        FormDraft::from_pairs(schema, fields),
    );
    let outcome = form.submit().await;
    let snapshot = form.snapshot().await;

    let (status, errors) = match outcome {
        SubmitOutcome::Invalid(errors) => {
            info!(
                registration_type = %schema.registration_type,
                violations = errors.0.len(),
                "registration blocked by field validation"
            );
            (StatusCode::UNPROCESSABLE_ENTITY, Some(errors))
        }
        _ => (StatusCode::OK, None),
    };

    render(
        &RegisterPage::new(&state.site, schema, &snapshot, errors.as_ref()),
        status,
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
