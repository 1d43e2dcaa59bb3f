use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::SubmissionPayload;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form endpoint rejected the submission with HTTP {status}")]
    Rejected { status: u16 },
    #[error("form endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Delivers one submission to wherever registrations are processed.
///
/// Implementations make exactly one attempt per call; callers decide what a
/// failure means for the form.
#[async_trait]
pub trait FormSubmitter: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmitError>;
}

/// Posts submissions as JSON to a hosted form-processing endpoint. Only the
/// response status is inspected.
#[derive(Debug, Clone)]
pub struct HttpFormSubmitter {
    http: Client,
    endpoint: Url,
}

impl HttpFormSubmitter {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl FormSubmitter for HttpFormSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmitError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
