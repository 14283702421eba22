//! Value types of RFC 5545 §3.3 and the coercion of raw property text into
//! them.
//!
//! Coercion only checks and structures the text. No calendar arithmetic
//! happens here: a `DURATION` becomes a `chrono::Duration`, a `RECUR` an
//! unvalidated `rrule::RRule`, but nothing is expanded or resolved.

use std::str::FromStr;

use derive_more::Display;

mod datetime;
pub use datetime::*;
mod duration;
pub use duration::*;
mod text;
pub use text::*;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid DATE value: {0}")]
    InvalidDate(String),
    #[error("invalid DATE-TIME value: {0}")]
    InvalidDateTime(String),
    #[error("invalid TIME value: {0}")]
    InvalidTime(String),
    #[error(transparent)]
    InvalidDuration(#[from] InvalidDuration),
    #[error("invalid PERIOD value: {0}")]
    InvalidPeriod(String),
    #[error("invalid INTEGER value: {0}")]
    InvalidInteger(String),
    #[error("invalid FLOAT value: {0}")]
    InvalidFloat(String),
    #[error("invalid BOOLEAN value: {0}")]
    InvalidBoolean(String),
    #[error("invalid UTC-OFFSET value: {0}")]
    InvalidUtcOffset(String),
    #[error("invalid RECUR value: {0}")]
    InvalidRecur(#[from] rrule::RRuleError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ValueType {
    #[display("BINARY")]
    Binary,
    #[display("BOOLEAN")]
    Boolean,
    #[display("CAL-ADDRESS")]
    CalAddress,
    #[display("DATE")]
    Date,
    #[display("DATE-TIME")]
    DateTime,
    #[display("DURATION")]
    Duration,
    #[display("FLOAT")]
    Float,
    #[display("INTEGER")]
    Integer,
    #[display("PERIOD")]
    Period,
    #[display("RECUR")]
    Recur,
    #[display("TEXT")]
    Text,
    #[display("TIME")]
    Time,
    #[display("URI")]
    Uri,
    #[display("UTC-OFFSET")]
    UtcOffset,
    /// A `VALUE=` type this crate does not know.
    #[display("UNKNOWN")]
    Unknown,
}

impl ValueType {
    /// Parse the value of a `VALUE=` parameter.
    pub fn from_param(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "BINARY" => Self::Binary,
            "BOOLEAN" => Self::Boolean,
            "CAL-ADDRESS" => Self::CalAddress,
            "DATE" => Self::Date,
            "DATE-TIME" => Self::DateTime,
            "DURATION" => Self::Duration,
            "FLOAT" => Self::Float,
            "INTEGER" => Self::Integer,
            "PERIOD" => Self::Period,
            "RECUR" => Self::Recur,
            "TEXT" => Self::Text,
            "TIME" => Self::Time,
            "URI" => Self::Uri,
            "UTC-OFFSET" => Self::UtcOffset,
            _ => Self::Unknown,
        }
    }

    /// Coerce raw (still escaped) property text into a value of this type.
    pub fn coerce(self, raw: &str) -> Result<Value, ValueError> {
        Ok(match self {
            Self::Text => Value::Text(unescape_text(raw)),
            Self::Date => Value::list(raw, |item| parse_date(item).map(Value::Date))?,
            Self::DateTime => Value::list(raw, |item| {
                // Producers regularly omit VALUE=DATE on whole-day values
                if item.contains('T') {
                    CalDateTime::parse(item).map(Value::DateTime)
                } else {
                    parse_date(item).map(Value::Date)
                }
            })?,
            Self::Period => Value::list(raw, |item| Period::parse(item).map(Value::Period))?,
            Self::Time => Value::list(raw, |item| CalTime::parse(item).map(Value::Time))?,
            Self::Duration => Value::Duration(parse_duration(raw)?),
            Self::Integer => Value::Integer(
                i32::from_str(raw).map_err(|_| ValueError::InvalidInteger(raw.to_owned()))?,
            ),
            Self::Float => Value::Float(
                f64::from_str(raw).map_err(|_| ValueError::InvalidFloat(raw.to_owned()))?,
            ),
            Self::Boolean => Value::Boolean(parse_boolean(raw)?),
            Self::Recur => Value::Recur(Box::new(rrule::RRule::<rrule::Unvalidated>::from_str(
                raw,
            )?)),
            Self::UtcOffset => Value::UtcOffset(parse_utc_offset(raw)?),
            Self::Uri => Value::Uri(raw.to_owned()),
            Self::CalAddress => Value::CalAddress(raw.to_owned()),
            Self::Binary => Value::Binary(raw.to_owned()),
            Self::Unknown => Value::Unknown(raw.to_owned()),
        })
    }
}

/// A coerced property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unescaped text.
    Text(String),
    Integer(i32),
    Float(f64),
    Boolean(bool),
    Date(chrono::NaiveDate),
    DateTime(CalDateTime),
    Time(CalTime),
    Duration(chrono::Duration),
    Period(Period),
    Recur(Box<rrule::RRule<rrule::Unvalidated>>),
    UtcOffset(chrono::FixedOffset),
    Uri(String),
    CalAddress(String),
    /// Still base64 encoded.
    Binary(String),
    /// Comma separated values of a multi-valued property (EXDATE, RDATE, FREEBUSY).
    List(Vec<Value>),
    Unknown(String),
}

impl Value {
    fn list(
        raw: &str,
        parse: impl Fn(&str) -> Result<Value, ValueError>,
    ) -> Result<Value, ValueError> {
        if !raw.contains(',') {
            return parse(raw);
        }
        raw.trim_end_matches(',')
            .split(',')
            .map(|item| parse(item.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[inline]
    pub fn as_duration(&self) -> Option<chrono::Duration> {
        match self {
            Self::Duration(duration) => Some(*duration),
            _ => None,
        }
    }
}

fn parse_boolean(raw: &str) -> Result<bool, ValueError> {
    if raw.eq_ignore_ascii_case("TRUE") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("FALSE") {
        Ok(false)
    } else {
        Err(ValueError::InvalidBoolean(raw.to_owned()))
    }
}
