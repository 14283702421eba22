//! Rule tables of RFC 5545 §3.6 (components) and §3.8 (property placement).

use phf::phf_map;

use super::{ConformanceError, alarm::check_alarm};
use crate::component::{ComponentKind, ComponentRef};
use ComponentKind::{
    Alarm, Calendar, Daylight, Event, FreeBusy, Journal, Standard, Timezone, Todo,
};

/// Kinds a component may be nested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parents {
    Any,
    /// Only valid as the root of a document.
    TopLevel,
    OneOf(&'static [ComponentKind]),
}

impl Parents {
    pub fn allows(self, parent: ComponentKind) -> bool {
        match self {
            Self::Any => true,
            Self::TopLevel => false,
            Self::OneOf(kinds) => kinds.contains(&parent),
        }
    }
}

pub type KindCheck = fn(ComponentRef<'_>) -> Result<(), ConformanceError>;

#[derive(Debug, Clone, Copy)]
pub struct ComponentRule {
    pub required: &'static [&'static str],
    pub parents: Parents,
    /// Semantic checks on top of the generic ones.
    pub check: Option<KindCheck>,
}

static CALENDAR: ComponentRule = ComponentRule {
    required: &["PRODID", "VERSION"],
    parents: Parents::TopLevel,
    check: None,
};

static CALENDAR_ITEM: ComponentRule = ComponentRule {
    required: &["UID", "DTSTAMP"],
    parents: Parents::OneOf(&[ComponentKind::Calendar]),
    check: None,
};

static FREE_BUSY: ComponentRule = ComponentRule {
    required: &[],
    parents: Parents::OneOf(&[ComponentKind::Calendar]),
    check: None,
};

static TIMEZONE: ComponentRule = ComponentRule {
    required: &["TZID"],
    parents: Parents::OneOf(&[ComponentKind::Calendar]),
    check: None,
};

static OBSERVANCE: ComponentRule = ComponentRule {
    required: &["DTSTART", "TZOFFSETFROM", "TZOFFSETTO"],
    parents: Parents::OneOf(&[ComponentKind::Timezone]),
    check: None,
};

static ALARM: ComponentRule = ComponentRule {
    required: &["ACTION", "TRIGGER"],
    parents: Parents::OneOf(&[ComponentKind::Event, ComponentKind::Todo]),
    check: Some(check_alarm),
};

impl ComponentKind {
    /// The rules of this kind, `None` for extensions.
    pub fn rule(self) -> Option<&'static ComponentRule> {
        match self {
            Self::Calendar => Some(&CALENDAR),
            Self::Event | Self::Todo | Self::Journal => Some(&CALENDAR_ITEM),
            Self::FreeBusy => Some(&FREE_BUSY),
            Self::Timezone => Some(&TIMEZONE),
            Self::Standard | Self::Daylight => Some(&OBSERVANCE),
            Self::Alarm => Some(&ALARM),
            Self::Extension => None,
        }
    }
}

/// Components each RFC 5545 property may be specified in.
static PROPERTY_HOSTS: phf::Map<&'static str, &'static [ComponentKind]> = phf_map! {
    // Calendar properties
    "CALSCALE" => &[Calendar],
    "METHOD" => &[Calendar],
    "PRODID" => &[Calendar],
    "VERSION" => &[Calendar],
    // Descriptive
    "ATTACH" => &[Event, Todo, Journal, Alarm],
    "CATEGORIES" => &[Event, Todo, Journal],
    "CLASS" => &[Event, Todo, Journal],
    "COMMENT" => &[Event, Todo, Journal, FreeBusy, Standard, Daylight],
    "DESCRIPTION" => &[Event, Todo, Journal, Alarm],
    "GEO" => &[Event, Todo],
    "LOCATION" => &[Event, Todo],
    "PERCENT-COMPLETE" => &[Todo],
    "PRIORITY" => &[Event, Todo],
    "RESOURCES" => &[Event, Todo],
    "STATUS" => &[Event, Todo, Journal],
    "SUMMARY" => &[Event, Todo, Journal, Alarm],
    // Date and time
    "COMPLETED" => &[Todo],
    "DTEND" => &[Event, FreeBusy],
    "DUE" => &[Todo],
    "DTSTART" => &[Event, Todo, Journal, FreeBusy, Standard, Daylight],
    "DURATION" => &[Event, Todo, FreeBusy, Alarm],
    "FREEBUSY" => &[FreeBusy],
    "TRANSP" => &[Event],
    // Time zone
    "TZID" => &[Timezone],
    "TZNAME" => &[Standard, Daylight],
    "TZOFFSETFROM" => &[Standard, Daylight],
    "TZOFFSETTO" => &[Standard, Daylight],
    "TZURL" => &[Timezone],
    // Relationship
    "ATTENDEE" => &[Event, Todo, Journal, FreeBusy, Alarm],
    "CONTACT" => &[Event, Todo, Journal, FreeBusy],
    "ORGANIZER" => &[Event, Todo, Journal, FreeBusy],
    "RECURRENCE-ID" => &[Event, Todo, Journal],
    "RELATED-TO" => &[Event, Todo, Journal],
    "URL" => &[Event, Todo, Journal, FreeBusy],
    "UID" => &[Event, Todo, Journal, FreeBusy],
    // Recurrence
    "EXDATE" => &[Event, Todo, Journal, Standard, Daylight],
    "EXRULE" => &[Event, Todo, Journal],
    "RDATE" => &[Event, Todo, Journal, Standard, Daylight],
    "RRULE" => &[Event, Todo, Journal, Standard, Daylight],
    // Alarm
    "ACTION" => &[Alarm],
    "REPEAT" => &[Alarm],
    "TRIGGER" => &[Alarm],
    // Change management
    "CREATED" => &[Event, Todo, Journal],
    "DTSTAMP" => &[Event, Todo, Journal, FreeBusy],
    "LAST-MODIFIED" => &[Event, Todo, Journal, Timezone],
    "SEQUENCE" => &[Event, Todo, Journal],
    // Miscellaneous
    "REQUEST-STATUS" => &[Event, Todo, Journal, FreeBusy],
};

/// The kinds `name` may be specified in, `None` if the property is not
/// restricted.
pub fn property_hosts(name: &str) -> Option<&'static [ComponentKind]> {
    PROPERTY_HOSTS.get(name).copied()
}
