use std::sync::Arc;

use client_core::FormSubmitter;

/// Values from the site configuration that pages read but never change.
#[derive(Debug, Clone)]
pub(crate) struct SiteInfo {
    pub(crate) title: String,
    pub(crate) tagline: String,
    pub(crate) contact_email: String,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) site: SiteInfo,
    pub(crate) form_recipient: String,
    pub(crate) submitter: Arc<dyn FormSubmitter>,
}
