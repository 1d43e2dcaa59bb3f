//! HTML views. Each page struct carries the layout fields `base.html` reads
//! (`site_title`, `page_title`, `description`) plus its own content.

use askama::Template;
use client_core::{FormSnapshot, SubmissionStatus};
use shared::{
    domain::{Event, RegistrationType},
    form::{FieldKind, FieldSpec, FormSchema, InfoCard, InfoStyle, ValidationErrors},
};

use crate::app_state::SiteInfo;

#[derive(Template)]
#[template(path = "index.html")]
pub(crate) struct HomePage<'a> {
    pub(crate) site_title: &'a str,
    pub(crate) page_title: String,
    pub(crate) description: &'a str,
    pub(crate) tagline: &'a str,
    pub(crate) host_href: String,
    pub(crate) performer_href: String,
    pub(crate) cards: Vec<EventCard>,
}

impl<'a> HomePage<'a> {
    pub(crate) fn new(site: &'a SiteInfo, events: &[Event]) -> Self {
        Self {
            site_title: &site.title,
            page_title: format!("Welcome to {}", site.title),
            description: "Curated events connecting hosts and performers",
            tagline: &site.tagline,
            host_href: RegistrationType::Host.register_path(),
            performer_href: RegistrationType::Performer.register_path(),
            cards: event_cards(events),
        }
    }
}

/// One catalog card. Cards keep the order of the events they come from.
#[derive(Debug, Clone)]
pub(crate) struct EventCard {
    pub(crate) event: Event,
    pub(crate) href: String,
}

pub(crate) fn event_cards(events: &[Event]) -> Vec<EventCard> {
    events
        .iter()
        .map(|event| EventCard {
            event: event.clone(),
            href: event.detail_path(),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "event.html")]
pub(crate) struct EventPage<'a> {
    pub(crate) site_title: &'a str,
    pub(crate) page_title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) event: &'a Event,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub(crate) struct NotFoundPage<'a> {
    pub(crate) site_title: &'a str,
    pub(crate) page_title: &'a str,
    pub(crate) description: &'a str,
}

impl<'a> NotFoundPage<'a> {
    pub(crate) fn new(site: &'a SiteInfo) -> Self {
        Self {
            site_title: &site.title,
            page_title: "Page Not Found",
            description: "We could not find what you were looking for",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OptionView {
    pub(crate) value: &'static str,
    pub(crate) label: &'static str,
    pub(crate) selected: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct FieldView {
    pub(crate) name: &'static str,
    pub(crate) label: &'static str,
    pub(crate) required: bool,
    pub(crate) placeholder: &'static str,
    pub(crate) value: String,
    pub(crate) input_type: &'static str,
    pub(crate) is_select: bool,
    pub(crate) is_textarea: bool,
    pub(crate) prompt: &'static str,
    pub(crate) options: Vec<OptionView>,
    pub(crate) rows: u8,
    /// Empty when the field passed validation.
    pub(crate) violation: &'static str,
}

impl FieldView {
    fn new(field: &FieldSpec, value: &str, errors: Option<&ValidationErrors>) -> Self {
        let mut view = Self {
            name: field.name,
            label: field.label,
            required: field.required,
            placeholder: field.placeholder.unwrap_or_default(),
            value: value.to_string(),
            input_type: field.kind.input_type().unwrap_or("text"),
            is_select: false,
            is_textarea: false,
            prompt: "",
            options: Vec::new(),
            rows: 0,
            violation: errors
                .and_then(|errors| errors.for_field(field.name))
                .map(|kind| kind.message())
                .unwrap_or_default(),
        };

        match field.kind {
            FieldKind::Select { prompt, options } => {
                view.is_select = true;
                view.prompt = prompt;
                view.options = options
                    .iter()
                    .map(|option| OptionView {
                        value: option.value,
                        label: option.label,
                        selected: option.value == value,
                    })
                    .collect();
            }
            FieldKind::TextArea { rows } => {
                view.is_textarea = true;
                view.rows = rows;
            }
            _ => {}
        }
        view
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CardView {
    pub(crate) title: &'static str,
    pub(crate) numbered: bool,
    pub(crate) contact: bool,
    pub(crate) items: &'static [&'static str],
    pub(crate) notes: &'static [(&'static str, &'static str)],
}

impl From<&InfoCard> for CardView {
    fn from(card: &InfoCard) -> Self {
        Self {
            title: card.title,
            numbered: card.style == InfoStyle::Steps,
            contact: card.style == InfoStyle::Contact,
            items: card.items,
            notes: card.notes,
        }
    }
}

#[derive(Template)]
#[template(path = "register.html")]
pub(crate) struct RegisterPage<'a> {
    pub(crate) site_title: &'a str,
    pub(crate) page_title: &'static str,
    pub(crate) description: &'static str,
    pub(crate) heading: &'static str,
    pub(crate) tagline: &'static str,
    pub(crate) action: String,
    pub(crate) fields: Vec<FieldView>,
    pub(crate) submitting: bool,
    pub(crate) success_message: String,
    pub(crate) error_message: String,
    pub(crate) cards: Vec<CardView>,
    pub(crate) contact_email: &'a str,
}

impl<'a> RegisterPage<'a> {
    pub(crate) fn new(
        site: &'a SiteInfo,
        schema: &'static FormSchema,
        snapshot: &FormSnapshot,
        errors: Option<&ValidationErrors>,
    ) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|field| {
                let value = snapshot.draft.get(field.name).unwrap_or_default();
                FieldView::new(field, value, errors)
            })
            .collect();

        let (success_message, error_message) = match &snapshot.status {
            SubmissionStatus::Idle => (String::new(), String::new()),
            SubmissionStatus::Success { email } => (schema.success_message(email), String::new()),
            SubmissionStatus::Error => (
                String::new(),
                format!(
                    "There was an error submitting your registration. Please email us directly at {}.",
                    site.contact_email
                ),
            ),
        };

        Self {
            site_title: &site.title,
            page_title: schema.page_title,
            description: schema.description,
            heading: schema.heading,
            tagline: schema.tagline,
            action: schema.registration_type.register_path(),
            fields,
            submitting: snapshot.submitting,
            success_message,
            error_message,
            cards: schema.info_cards.iter().map(CardView::from).collect(),
            contact_email: &site.contact_email,
        }
    }
}
