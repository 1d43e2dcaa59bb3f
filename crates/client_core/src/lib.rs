use std::sync::Arc;

use shared::{
    form::{validate, FormDraft, FormSchema, UnknownField, ValidationErrors},
    protocol::SubmissionPayload,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

pub mod transport;

pub use transport::{FormSubmitter, HttpFormSubmitter, SubmitError};

/// Outcome of the most recent submit attempt. Stays put until the next
/// attempt resolves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    /// Accepted by the endpoint; carries the address the confirmation is
    /// sent to, since the draft itself is cleared.
    Success { email: String },
    Error,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Submitted { email: String },
    Failed(SubmitError),
    /// Native field constraints blocked the submit; nothing was sent.
    Invalid(ValidationErrors),
    /// Another submit from this form is still in flight; nothing was sent.
    AlreadySubmitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub draft: FormDraft,
    pub status: SubmissionStatus,
    pub submitting: bool,
}

struct FormState {
    draft: FormDraft,
    status: SubmissionStatus,
    submitting: bool,
}

/// One live registration form: its draft, its submission status and the
/// in-flight guard that keeps it to a single outstanding request.
pub struct RegistrationForm {
    schema: &'static FormSchema,
    recipient: String,
    submitter: Arc<dyn FormSubmitter>,
    state: Mutex<FormState>,
}

impl RegistrationForm {
    pub fn new(
        schema: &'static FormSchema,
        recipient: impl Into<String>,
        submitter: Arc<dyn FormSubmitter>,
    ) -> Self {
        Self::with_draft(schema, recipient, submitter, FormDraft::empty(schema))
    }

    pub fn with_draft(
        schema: &'static FormSchema,
        recipient: impl Into<String>,
        submitter: Arc<dyn FormSubmitter>,
        draft: FormDraft,
    ) -> Self {
        Self {
            schema,
            recipient: recipient.into(),
            submitter,
            state: Mutex::new(FormState {
                draft,
                status: SubmissionStatus::Idle,
                submitting: false,
            }),
        }
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub async fn set_field(&self, name: &str, value: impl Into<String>) -> Result<(), UnknownField> {
        self.state.lock().await.draft.set(name, value)
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.state.lock().await;
        FormSnapshot {
            draft: state.draft.clone(),
            status: state.status.clone(),
            submitting: state.submitting,
        }
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.state.lock().await.status.clone()
    }

    pub async fn is_submitting(&self) -> bool {
        self.state.lock().await.submitting
    }

    /// Validates and sends the current draft once. The lock is released for
    /// the duration of the outbound call, so fields stay editable while the
    /// request is in flight.
    pub async fn submit(&self) -> SubmitOutcome {
        let payload = {
            let mut state = self.state.lock().await;
            if state.submitting {
                return SubmitOutcome::AlreadySubmitting;
            }
            if let Err(errors) = validate(self.schema, &state.draft) {
                return SubmitOutcome::Invalid(errors);
            }
            state.submitting = true;
            SubmissionPayload::new(self.schema, &state.draft, &self.recipient)
        };

        let result = self.submitter.submit(&payload).await;

        let mut state = self.state.lock().await;
        state.submitting = false;
        match result {
            Ok(()) => {
                info!(
                    registration_type = %self.schema.registration_type,
                    "registration submitted"
                );
                state.draft.clear();
                state.status = SubmissionStatus::Success {
                    email: payload.reply_to.clone(),
                };
                SubmitOutcome::Submitted {
                    email: payload.reply_to,
                }
            }
            Err(error) => {
                warn!(
                    registration_type = %self.schema.registration_type,
                    %error,
                    "form submission error"
                );
                state.status = SubmissionStatus::Error;
                SubmitOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
