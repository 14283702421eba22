use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

use super::{ValueError, parse_duration};

lazy_static! {
    static ref RE_DATE: Regex = Regex::new(r"^\d{8}$").unwrap();
    static ref RE_DATE_TIME: Regex = Regex::new(r"^\d{8}T\d{6}Z?$").unwrap();
    static ref RE_TIME: Regex = Regex::new(r"^\d{6}Z?$").unwrap();
    static ref RE_UTC_OFFSET: Regex = Regex::new(r"^([+-])(\d{2})(\d{2})(\d{2})?$").unwrap();
}

const DATE_FORMAT: &str = "%Y%m%d";
const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
const TIME_FORMAT: &str = "%H%M%S";

pub fn parse_date(value: &str) -> Result<NaiveDate, ValueError> {
    if !RE_DATE.is_match(value) {
        return Err(ValueError::InvalidDate(value.to_owned()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValueError::InvalidDate(value.to_owned()))
}

/// A DATE-TIME in either floating (local) or UTC form.
///
/// Which timezone a floating value with a TZID parameter refers to is not
/// resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalDateTime {
    pub naive: NaiveDateTime,
    pub utc: bool,
}

impl CalDateTime {
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        if !RE_DATE_TIME.is_match(value) {
            return Err(ValueError::InvalidDateTime(value.to_owned()));
        }
        let (digits, utc) = match value.strip_suffix('Z') {
            Some(digits) => (digits, true),
            None => (value, false),
        };
        let naive = NaiveDateTime::parse_from_str(digits, DATE_TIME_FORMAT)
            .map_err(|_| ValueError::InvalidDateTime(value.to_owned()))?;
        Ok(Self { naive, utc })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalTime {
    pub naive: NaiveTime,
    pub utc: bool,
}

impl CalTime {
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        if !RE_TIME.is_match(value) {
            return Err(ValueError::InvalidTime(value.to_owned()));
        }
        let (digits, utc) = match value.strip_suffix('Z') {
            Some(digits) => (digits, true),
            None => (value, false),
        };
        let naive = NaiveTime::parse_from_str(digits, TIME_FORMAT)
            .map_err(|_| ValueError::InvalidTime(value.to_owned()))?;
        Ok(Self { naive, utc })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodEnd {
    DateTime(CalDateTime),
    Duration(chrono::Duration),
}

/// `start/end` or `start/duration` (RFC 5545 §3.3.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub start: CalDateTime,
    pub end: PeriodEnd,
}

impl Period {
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let invalid = || ValueError::InvalidPeriod(value.to_owned());
        let (start, end) = value.split_once('/').ok_or_else(invalid)?;
        let start = CalDateTime::parse(start).map_err(|_| invalid())?;
        let end = if end.starts_with(['P', '+', '-']) {
            PeriodEnd::Duration(parse_duration(end).map_err(|_| invalid())?)
        } else {
            PeriodEnd::DateTime(CalDateTime::parse(end).map_err(|_| invalid())?)
        };
        Ok(Self { start, end })
    }
}

/// `(+|-)hhmm[ss]`
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, ValueError> {
    let invalid = || ValueError::InvalidUtcOffset(value.to_owned());
    let captures = RE_UTC_OFFSET.captures(value).ok_or_else(invalid)?;
    let field = |idx: usize| -> i32 {
        captures
            .get(idx)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds) = (field(2), field(3), field(4));
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }
    let total = hours * 3600 + minutes * 60 + seconds;
    let total = if &captures[1] == "-" { -total } else { total };
    FixedOffset::east_opt(total).ok_or_else(invalid)
}
