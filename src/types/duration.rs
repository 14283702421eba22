use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_DURATION: Regex =
        Regex::new(r"^([+-])?P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
            .unwrap();
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("invalid DURATION value: {0}")]
pub struct InvalidDuration(pub String);

const SECONDS_PER_UNIT: [i64; 5] = [7 * 86400, 86400, 3600, 60, 1];

/// Parse a DURATION value (RFC 5545 §3.3.6), e.g. `-PT15M` or `P1W`.
pub fn parse_duration(value: &str) -> Result<chrono::Duration, InvalidDuration> {
    let invalid = || InvalidDuration(value.to_owned());
    let captures = RE_DURATION.captures(value).ok_or_else(invalid)?;

    let mut total: i64 = 0;
    let mut any_unit = false;
    for (idx, seconds) in SECONDS_PER_UNIT.iter().enumerate() {
        let Some(amount) = captures.get(idx + 2) else {
            continue;
        };
        any_unit = true;
        let amount: i64 = amount.as_str().parse().map_err(|_| invalid())?;
        total = amount
            .checked_mul(*seconds)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(invalid)?;
    }
    let has_time_units = (4..=6).any(|idx| captures.get(idx).is_some());
    // "P", "PT" and "P1DT" carry no amount
    if !any_unit || (value.contains('T') && !has_time_units) {
        return Err(invalid());
    }

    if captures.get(1).is_some_and(|sign| sign.as_str() == "-") {
        total = -total;
    }
    chrono::Duration::try_seconds(total).ok_or_else(invalid)
}
