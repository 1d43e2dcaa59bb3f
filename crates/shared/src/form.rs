//! Schema-driven registration forms.
//!
//! A [`FormSchema`] describes the ordered fields of one registration variant
//! together with the fixed metadata sent alongside every submission. A
//! [`FormDraft`] holds the values typed so far, keyed by field name.
//! [`validate`] applies the constraints a browser enforces natively before it
//! lets a form submit; nothing beyond those is checked.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::domain::RegistrationType;

/// Name of the field whose value becomes `_replyto` and is echoed in the
/// confirmation message.
pub const EMAIL_FIELD: &str = "email";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Url,
    Date,
    Select {
        prompt: &'static str,
        options: &'static [SelectOption],
    },
    TextArea {
        rows: u8,
    },
}

impl FieldKind {
    /// The `type` attribute for kinds rendered as `<input>`.
    pub fn input_type(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Email => Some("email"),
            Self::Tel => Some("tel"),
            Self::Url => Some("url"),
            Self::Date => Some("date"),
            Self::Select { .. } | Self::TextArea { .. } => None,
        }
    }

    /// Email and url inputs drop surrounding whitespace before they are
    /// checked or sent.
    pub fn sanitize<'v>(&self, value: &'v str) -> &'v str {
        match self {
            Self::Email | Self::Url => value.trim(),
            _ => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<&'static str>,
}

impl FieldSpec {
    const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            placeholder: None,
        }
    }

    const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            placeholder: None,
        }
    }

    const fn hint(self, placeholder: &'static str) -> Self {
        Self {
            placeholder: Some(placeholder),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoStyle {
    Bullets,
    Steps,
    /// Free paragraphs, then the configured contact address, then the
    /// card's labelled notes.
    Contact,
}

/// A sidebar card shown next to a registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoCard {
    pub title: &'static str,
    pub style: InfoStyle,
    pub items: &'static [&'static str],
    /// `(label, value)` lines shown after the contact address.
    pub notes: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSchema {
    pub registration_type: RegistrationType,
    pub page_title: &'static str,
    pub description: &'static str,
    pub heading: &'static str,
    pub tagline: &'static str,
    pub subject: &'static str,
    /// Confirmation text; `{email}` is replaced with the submitted address.
    pub success_template: &'static str,
    pub fields: &'static [FieldSpec],
    pub info_cards: &'static [InfoCard],
}

impl FormSchema {
    pub fn for_type(registration_type: RegistrationType) -> &'static FormSchema {
        match registration_type {
            RegistrationType::Host => &HOST_FORM,
            RegistrationType::Performer => &PERFORMER_FORM,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn success_message(&self, email: &str) -> String {
        self.success_template.replace("{email}", email)
    }
}

const PHONE_HINT: &str = "+1 (555) 123-4567";

const EVENT_TYPES: &[SelectOption] = &[
    opt("corporate", "Corporate Event"),
    opt("private", "Private Party"),
    opt("wedding", "Wedding"),
    opt("gala", "Gala/Fundraiser"),
    opt("other", "Other"),
];

const GUEST_COUNTS: &[SelectOption] = &[
    opt("25-50", "25-50"),
    opt("50-100", "50-100"),
    opt("100-200", "100-200"),
    opt("200+", "200+"),
];

const BUDGETS: &[SelectOption] = &[
    opt("5000-10000", "$5,000 - $10,000"),
    opt("10000-25000", "$10,000 - $25,000"),
    opt("25000-50000", "$25,000 - $50,000"),
    opt("50000+", "$50,000+"),
];

const PERFORMANCE_TYPES: &[SelectOption] = &[
    opt("solo", "Solo Artist"),
    opt("band", "Band/Group"),
    opt("dj", "DJ"),
    opt("orchestra", "Orchestra/Ensemble"),
    opt("other", "Other"),
];

const GENRES: &[SelectOption] = &[
    opt("jazz", "Jazz"),
    opt("classical", "Classical"),
    opt("rock", "Rock"),
    opt("pop", "Pop"),
    opt("acoustic", "Acoustic"),
    opt("electronic", "Electronic"),
    opt("blues", "Blues"),
    opt("folk", "Folk"),
    opt("other", "Other"),
];

const EXPERIENCE_LEVELS: &[SelectOption] = &[
    opt("1-3", "1-3 years"),
    opt("3-5", "3-5 years"),
    opt("5-10", "5-10 years"),
    opt("10+", "10+ years"),
];

pub static HOST_FORM: FormSchema = FormSchema {
    registration_type: RegistrationType::Host,
    page_title: "Register as Host",
    description: "Host curated events with top performers",
    heading: "Become a Host",
    tagline: "Create unforgettable experiences for your guests",
    subject: "New Host Registration - ArtLoop Events",
    success_template: "Thank you for your registration! We'll contact you shortly at {email}.",
    fields: &[
        FieldSpec::required("fullName", "Full Name", FieldKind::Text).hint("John Smith"),
        FieldSpec::required("email", "Email Address", FieldKind::Email).hint("john@example.com"),
        FieldSpec::required("phone", "Phone Number", FieldKind::Tel).hint(PHONE_HINT),
        FieldSpec::optional("organization", "Organization/Company", FieldKind::Text)
            .hint("Your Company Name"),
        FieldSpec::required(
            "eventType",
            "Event Type",
            FieldKind::Select {
                prompt: "Select event type",
                options: EVENT_TYPES,
            },
        ),
        FieldSpec::optional("preferredDate", "Preferred Date", FieldKind::Date),
        FieldSpec::required(
            "guestCount",
            "Expected Number of Guests",
            FieldKind::Select {
                prompt: "Select range",
                options: GUEST_COUNTS,
            },
        ),
        FieldSpec::optional(
            "budget",
            "Budget Range",
            FieldKind::Select {
                prompt: "Select budget range",
                options: BUDGETS,
            },
        ),
        FieldSpec::optional(
            "message",
            "Tell us about your event vision",
            FieldKind::TextArea { rows: 5 },
        )
        .hint("Share your ideas, requirements, or any specific requests..."),
    ],
    info_cards: &[
        InfoCard {
            title: "Why Host with Us?",
            style: InfoStyle::Bullets,
            items: &[
                "Curated selection of talented performers",
                "Full event planning and coordination",
                "Customized experiences for your guests",
                "Professional event management",
                "Memorable and unique entertainment",
            ],
            notes: &[],
        },
        InfoCard {
            title: "How It Works",
            style: InfoStyle::Steps,
            items: &[
                "Submit your registration form",
                "We'll contact you to discuss details",
                "Get matched with perfect performers",
                "We handle all the planning",
                "Enjoy your unforgettable event!",
            ],
            notes: &[],
        },
        InfoCard {
            title: "Need Help?",
            style: InfoStyle::Contact,
            items: &["Have questions about hosting an event?"],
            notes: &[("Phone", "Available after registration")],
        },
    ],
};

pub static PERFORMER_FORM: FormSchema = FormSchema {
    registration_type: RegistrationType::Performer,
    page_title: "Register as Performer",
    description: "Showcase your talent at curated events",
    heading: "Register as Performer",
    tagline: "Share your talent with exclusive audiences",
    subject: "New Performer Registration - ArtLoop Events",
    success_template: "Thank you for your registration! We'll review your profile and contact you at {email}.",
    fields: &[
        FieldSpec::required("fullName", "Full Name", FieldKind::Text).hint("Jane Doe"),
        FieldSpec::required("stageName", "Stage/Artist Name", FieldKind::Text)
            .hint("The Jane Doe Quartet"),
        FieldSpec::required("email", "Email Address", FieldKind::Email).hint("jane@example.com"),
        FieldSpec::required("phone", "Phone Number", FieldKind::Tel).hint(PHONE_HINT),
        FieldSpec::required(
            "performanceType",
            "Performance Type",
            FieldKind::Select {
                prompt: "Select performance type",
                options: PERFORMANCE_TYPES,
            },
        ),
        FieldSpec::required(
            "genre",
            "Primary Genre",
            FieldKind::Select {
                prompt: "Select genre",
                options: GENRES,
            },
        ),
        FieldSpec::required(
            "experience",
            "Years of Experience",
            FieldKind::Select {
                prompt: "Select experience level",
                options: EXPERIENCE_LEVELS,
            },
        ),
        FieldSpec::required("location", "Location/City", FieldKind::Text).hint("Los Angeles, CA"),
        FieldSpec::optional("website", "Website/Portfolio", FieldKind::Url)
            .hint("https://yourwebsite.com"),
        FieldSpec::optional("socialMedia", "Social Media Links", FieldKind::Text)
            .hint("Instagram, YouTube, etc."),
        FieldSpec::optional(
            "message",
            "Tell us about your performance style",
            FieldKind::TextArea { rows: 5 },
        )
        .hint("Describe your performance style, notable achievements, equipment needs, etc."),
    ],
    info_cards: &[
        InfoCard {
            title: "Why Perform with Us?",
            style: InfoStyle::Bullets,
            items: &[
                "Exclusive, high-quality events",
                "Professional event coordination",
                "Competitive compensation",
                "Network with top venues and hosts",
                "Grow your audience and reputation",
            ],
            notes: &[],
        },
        InfoCard {
            title: "How It Works",
            style: InfoStyle::Steps,
            items: &[
                "Submit your performer profile",
                "We review your experience and style",
                "Get matched with suitable events",
                "Receive booking details and contracts",
                "Perform and get paid!",
            ],
            notes: &[],
        },
        InfoCard {
            title: "What We Look For",
            style: InfoStyle::Bullets,
            items: &[
                "Professional performance experience",
                "Reliable and punctual",
                "Quality equipment and setup",
                "Engaging stage presence",
                "Positive references",
            ],
            notes: &[],
        },
        InfoCard {
            title: "Questions?",
            style: InfoStyle::Contact,
            items: &["Want to learn more about performing at our events?"],
            notes: &[],
        },
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("form has no field named '{0}'")]
pub struct UnknownField(pub String);

/// In-progress values of one form instance. Every schema field is present
/// from creation on; only values change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormDraft {
    values: BTreeMap<&'static str, String>,
}

impl FormDraft {
    pub fn empty(schema: &FormSchema) -> Self {
        Self {
            values: schema
                .fields
                .iter()
                .map(|field| (field.name, String::new()))
                .collect(),
        }
    }

    /// Builds a draft from posted name/value pairs. Names the schema does not
    /// know are dropped.
    pub fn from_pairs<I, K, V>(schema: &FormSchema, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut draft = Self::empty(schema);
        for (name, value) in pairs {
            let _ = draft.set(name.as_ref(), value);
        }
        draft
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Replaces the value of exactly one field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), UnknownField> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| UnknownField(name.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.values.values_mut().for_each(String::clear);
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    pub fn email(&self) -> &str {
        FieldKind::Email.sanitize(self.get(EMAIL_FIELD).unwrap_or_default())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.values.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    InvalidEmail,
    InvalidUrl,
    InvalidDate,
    UnknownOption,
}

impl ViolationKind {
    /// Wording modelled on the messages browsers show for the same checks.
    pub fn message(self) -> &'static str {
        match self {
            Self::Missing => "Please fill out this field.",
            Self::InvalidEmail => "Please enter an email address.",
            Self::InvalidUrl => "Please enter a URL.",
            Self::InvalidDate => "Please enter a valid date.",
            Self::UnknownOption => "Please select an item in the list.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    pub fn for_field(&self, name: &str) -> Option<ViolationKind> {
        self.0
            .iter()
            .find(|violation| violation.field == name)
            .map(|violation| violation.kind)
    }
}

/// Checks the draft against the schema's native field constraints, in
/// schema order.
pub fn validate(schema: &FormSchema, draft: &FormDraft) -> Result<(), ValidationErrors> {
    let violations: Vec<FieldViolation> = schema
        .fields
        .iter()
        .filter_map(|field| {
            let value = draft.get(field.name).unwrap_or_default();
            check_field(field, value).map(|kind| FieldViolation {
                field: field.name,
                kind,
            })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

fn check_field(field: &FieldSpec, value: &str) -> Option<ViolationKind> {
    let value = field.kind.sanitize(value);
    if value.is_empty() {
        return field.required.then_some(ViolationKind::Missing);
    }

    match field.kind {
        FieldKind::Email if !is_valid_email(value) => Some(ViolationKind::InvalidEmail),
        FieldKind::Url if Url::parse(value).is_err() => Some(ViolationKind::InvalidUrl),
        FieldKind::Date if !is_valid_date(value) => Some(ViolationKind::InvalidDate),
        FieldKind::Select { options, .. } if !options.iter().any(|o| o.value == value) => {
            Some(ViolationKind::UnknownOption)
        }
        _ => None,
    }
}

fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.split('.').all(|label| !label.is_empty())
}

fn is_valid_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
