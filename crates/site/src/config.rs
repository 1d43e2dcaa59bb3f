use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "site.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub site_title: String,
    pub site_tagline: String,
    /// Hosted form-processing endpoint every registration is posted to.
    pub form_endpoint: String,
    /// Sent as `_to`; where the endpoint forwards registrations.
    pub form_recipient: String,
    /// Shown to visitors when a submission fails.
    pub contact_email: String,
    pub submit_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            site_title: "ArtLoop Events".into(),
            site_tagline: "Curated events connecting hosts and performers".into(),
            form_endpoint: "https://formspree.io/f/YOUR_FORM_ID".into(),
            form_recipient: "bookings@artloop.example".into(),
            contact_email: "bookings@artloop.example".into(),
            submit_timeout_secs: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    site_title: Option<String>,
    site_tagline: Option<String>,
    form_endpoint: Option<String>,
    form_recipient: Option<String>,
    contact_email: Option<String>,
    submit_timeout_secs: Option<u64>,
}

/// Defaults, then `site.toml` (or the file named by `SITE_CONFIG`), then
/// environment variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = std::env::var("SITE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    if let Some(raw) = read_optional(Path::new(&path))? {
        settings
            .apply_file(&raw)
            .with_context(|| format!("invalid settings file '{path}'"))?;
    }

    settings.apply_env(|key| std::env::var(key).ok())?;
    settings.form_endpoint_url()?;
    Ok(settings)
}

fn read_optional(path: &Path) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
        Err(error) => {
            Err(error).with_context(|| format!("failed to read '{}'", path.display()))
        }
    }
}

impl Settings {
    pub fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;

        if let Some(v) = file_cfg.bind_addr {
            self.bind_addr = v;
        }
        if let Some(v) = file_cfg.site_title {
            self.site_title = v;
        }
        if let Some(v) = file_cfg.site_tagline {
            self.site_tagline = v;
        }
        if let Some(v) = file_cfg.form_endpoint {
            self.form_endpoint = v;
        }
        if let Some(v) = file_cfg.form_recipient {
            self.form_recipient = v;
        }
        if let Some(v) = file_cfg.contact_email {
            self.contact_email = v;
        }
        if file_cfg.submit_timeout_secs.is_some() {
            self.submit_timeout_secs = file_cfg.submit_timeout_secs;
        }
        Ok(())
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = lookup("SITE_BIND") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("APP__BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("APP__SITE_TITLE") {
            self.site_title = v;
        }
        if let Some(v) = lookup("APP__SITE_TAGLINE") {
            self.site_tagline = v;
        }
        if let Some(v) = lookup("APP__FORM_ENDPOINT") {
            self.form_endpoint = v;
        }
        if let Some(v) = lookup("APP__FORM_RECIPIENT") {
            self.form_recipient = v;
        }
        if let Some(v) = lookup("APP__CONTACT_EMAIL") {
            self.contact_email = v;
        }
        if let Some(v) = lookup("APP__SUBMIT_TIMEOUT_SECS") {
            let secs = v
                .parse::<u64>()
                .with_context(|| format!("APP__SUBMIT_TIMEOUT_SECS is not a number: '{v}'"))?;
            self.submit_timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn form_endpoint_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.form_endpoint)
            .with_context(|| format!("form endpoint '{}' is not a valid URL", self.form_endpoint))
    }

    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
