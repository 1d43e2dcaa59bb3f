use serde::Serialize;

use crate::{
    domain::RegistrationType,
    form::{FormDraft, FormSchema},
};

/// JSON body posted to the form-processing endpoint: every draft field at the
/// top level plus the fixed routing metadata the endpoint understands.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub fields: FormDraft,
    #[serde(rename = "_replyto")]
    pub reply_to: String,
    #[serde(rename = "_subject")]
    pub subject: String,
    #[serde(rename = "_to")]
    pub to: String,
    #[serde(rename = "registrationType")]
    pub registration_type: RegistrationType,
}

impl SubmissionPayload {
    pub fn new(schema: &FormSchema, draft: &FormDraft, recipient: &str) -> Self {
        Self {
            fields: draft.clone(),
            reply_to: draft.email().to_string(),
            subject: schema.subject.to_string(),
            to: recipient.to_string(),
            registration_type: schema.registration_type,
        }
    }
}
