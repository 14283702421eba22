//! Property name to value type lookup.
//!
//! The parser consults a `TypeRegistry` for every property it builds: the
//! registry decides which value type the raw text is coerced to and whether
//! the property may appear more than once on one component.

use phf::{phf_map, phf_set};

use crate::types::ValueType;

pub trait TypeRegistry {
    /// The default value type of a property, `None` if the name is unknown.
    fn value_type(&self, name: &str) -> Option<ValueType>;

    fn is_repeatable(&self, name: &str) -> bool;

    /// Unknown properties are TEXT.
    #[inline]
    fn resolve(&self, name: &str) -> ValueType {
        self.value_type(name).unwrap_or(ValueType::Text)
    }
}

impl<R: TypeRegistry + ?Sized> TypeRegistry for &R {
    #[inline]
    fn value_type(&self, name: &str) -> Option<ValueType> {
        (**self).value_type(name)
    }

    #[inline]
    fn is_repeatable(&self, name: &str) -> bool {
        (**self).is_repeatable(name)
    }
}

/// Default value types of the properties defined in RFC 5545 §3.7 and §3.8.
static PROPERTY_TYPES: phf::Map<&'static str, ValueType> = phf_map! {
    // Calendar properties
    "CALSCALE" => ValueType::Text,
    "METHOD" => ValueType::Text,
    "PRODID" => ValueType::Text,
    "VERSION" => ValueType::Text,
    // Descriptive
    "ATTACH" => ValueType::Uri,
    "CATEGORIES" => ValueType::Text,
    "CLASS" => ValueType::Text,
    "COMMENT" => ValueType::Text,
    "DESCRIPTION" => ValueType::Text,
    "GEO" => ValueType::Text,
    "LOCATION" => ValueType::Text,
    "PERCENT-COMPLETE" => ValueType::Integer,
    "PRIORITY" => ValueType::Integer,
    "RESOURCES" => ValueType::Text,
    "STATUS" => ValueType::Text,
    "SUMMARY" => ValueType::Text,
    // Date and time
    "COMPLETED" => ValueType::DateTime,
    "DTEND" => ValueType::DateTime,
    "DUE" => ValueType::DateTime,
    "DTSTART" => ValueType::DateTime,
    "DURATION" => ValueType::Duration,
    "FREEBUSY" => ValueType::Period,
    "TRANSP" => ValueType::Text,
    // Time zone
    "TZID" => ValueType::Text,
    "TZNAME" => ValueType::Text,
    "TZOFFSETFROM" => ValueType::UtcOffset,
    "TZOFFSETTO" => ValueType::UtcOffset,
    "TZURL" => ValueType::Uri,
    // Relationship
    "ATTENDEE" => ValueType::CalAddress,
    "CONTACT" => ValueType::Text,
    "ORGANIZER" => ValueType::CalAddress,
    "RECURRENCE-ID" => ValueType::DateTime,
    "RELATED-TO" => ValueType::Text,
    "URL" => ValueType::Uri,
    "UID" => ValueType::Text,
    // Recurrence
    "EXDATE" => ValueType::DateTime,
    "EXRULE" => ValueType::Recur,
    "RDATE" => ValueType::DateTime,
    "RRULE" => ValueType::Recur,
    // Alarm
    "ACTION" => ValueType::Text,
    "REPEAT" => ValueType::Integer,
    "TRIGGER" => ValueType::Duration,
    // Change management
    "CREATED" => ValueType::DateTime,
    "DTSTAMP" => ValueType::DateTime,
    "LAST-MODIFIED" => ValueType::DateTime,
    "SEQUENCE" => ValueType::Integer,
    // Miscellaneous
    "REQUEST-STATUS" => ValueType::Text,
};

/// Properties that MUST NOT occur more than once in a component.
static SINGULAR: phf::Set<&'static str> = phf_set! {
    "ACTION",
    "CALSCALE",
    "CLASS",
    "COMPLETED",
    "CREATED",
    "DTEND",
    "DTSTAMP",
    "DTSTART",
    "DUE",
    "DURATION",
    "GEO",
    "LAST-MODIFIED",
    "LOCATION",
    "METHOD",
    "ORGANIZER",
    "PERCENT-COMPLETE",
    "PRIORITY",
    "PRODID",
    "RECURRENCE-ID",
    "REPEAT",
    "SEQUENCE",
    "STATUS",
    "SUMMARY",
    "TRANSP",
    "TRIGGER",
    "TZID",
    "TZOFFSETFROM",
    "TZOFFSETTO",
    "TZURL",
    "UID",
    "URL",
    "VERSION",
};

/// The registry of RFC 5545. Names are matched case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rfc5545Registry;

impl TypeRegistry for Rfc5545Registry {
    fn value_type(&self, name: &str) -> Option<ValueType> {
        PROPERTY_TYPES
            .get(name)
            .or_else(|| PROPERTY_TYPES.get(name.to_ascii_uppercase().as_str()))
            .copied()
    }

    fn is_repeatable(&self, name: &str) -> bool {
        !(SINGULAR.contains(name) || SINGULAR.contains(name.to_ascii_uppercase().as_str()))
    }
}
