use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<$inner>().map(Self)
            }
        }
    };
}

id_newtype!(EventId, u32);

/// Which registration form a submission came from. Serialized as the
/// `registrationType` tag of the outbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationType {
    Host,
    Performer,
}

impl RegistrationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::Performer => "Performer",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Performer => "performer",
        }
    }

    pub fn register_path(self) -> String {
        format!("/register/{}", self.slug())
    }
}

impl fmt::Display for RegistrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "host" => Ok(Self::Host),
            "performer" => Ok(Self::Performer),
            other => Err(format!("unknown registration type '{other}'")),
        }
    }
}

/// A bookable event shown in the catalog. Compiled into the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: EventId,
    pub title: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub venue: &'static str,
    pub performer: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub price: &'static str,
}

impl Event {
    pub fn detail_path(&self) -> String {
        event_detail_path(self.id)
    }
}

pub fn event_detail_path(id: EventId) -> String {
    format!("/events/{id}")
}

pub const UPCOMING_EVENTS: &[Event] = &[
    Event {
        id: EventId(1),
        title: "Acoustic Bollywood",
        date: "January 15, 2026",
        time: "7:00 PM - 10:00 PM",
        venue: "The Grand Hall",
        performer: "Vikram Kumar",
        description: "An intimate evening of smooth Bollywood music paired with premium wines",
        image: "https://images.unsplash.com/photo-1514320291840-2e0a9bf2a9ae?w=800&q=80",
        price: "$35",
    },
    Event {
        id: EventId(2),
        title: "Acoustic Sunset Session",
        date: "January 28, 2026",
        time: "6:00 PM - 9:00 PM",
        venue: "Rooftop Terrace",
        performer: "Alex Rivera",
        description: "Soulful acoustic melodies as the sun sets over the city",
        image: "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=800&q=80",
        price: "$65",
    },
    Event {
        id: EventId(3),
        title: "Classical Gala Night",
        date: "February 10, 2026",
        time: "8:00 PM - 11:00 PM",
        venue: "Symphony Center",
        performer: "Metropolitan Chamber Orchestra",
        description: "A sophisticated evening of classical masterpieces",
        image: "https://images.unsplash.com/photo-1465847899084-d164df4dedc6?w=800&q=80",
        price: "$95",
    },
];

pub fn find_event(id: EventId) -> Option<&'static Event> {
    UPCOMING_EVENTS.iter().find(|event| event.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<EventId> = UPCOMING_EVENTS.iter().map(|event| event.id).collect();
        assert_eq!(ids.len(), UPCOMING_EVENTS.len());
    }

    #[test]
    fn detail_path_is_keyed_by_id() {
        assert_eq!(UPCOMING_EVENTS[1].detail_path(), "/events/2");
    }

    #[test]
    fn find_event_misses_unknown_id() {
        assert_eq!(find_event(EventId(3)).map(|e| e.title), Some("Classical Gala Night"));
        assert!(find_event(EventId(42)).is_none());
    }

    #[test]
    fn registration_type_parses_case_insensitively() {
        assert_eq!("Host".parse::<RegistrationType>(), Ok(RegistrationType::Host));
        assert_eq!("performer".parse::<RegistrationType>(), Ok(RegistrationType::Performer));
        assert!("guest".parse::<RegistrationType>().is_err());
        assert_eq!(RegistrationType::Performer.register_path(), "/register/performer");
    }

    #[test]
    fn event_id_parses_from_path_segment() {
        assert_eq!("7".parse::<EventId>().expect("id"), EventId(7));
        assert!("seven".parse::<EventId>().is_err());
    }
}
