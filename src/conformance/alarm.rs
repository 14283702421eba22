//! VALARM rules of RFC 5545 §3.6.6.

use super::{ConformanceError, PropertyConformanceError};
use crate::{component::ComponentRef, types::ValueType};

/// Properties each ACTION needs besides ACTION and TRIGGER.
fn action_requirements(action: &str) -> &'static [&'static str] {
    match action {
        "DISPLAY" => &["DESCRIPTION"],
        "EMAIL" => &["DESCRIPTION", "SUMMARY", "ATTENDEE"],
        _ => &[],
    }
}

pub(super) fn check_alarm(alarm: ComponentRef<'_>) -> Result<(), ConformanceError> {
    check_action(alarm)?;
    check_repeat(alarm)?;
    check_trigger(alarm)
}

fn check_action(alarm: ComponentRef<'_>) -> Result<(), ConformanceError> {
    let Some(action) = alarm.property("ACTION") else {
        return Ok(());
    };
    let action = action.raw_value().to_ascii_uppercase();
    match action_requirements(&action)
        .iter()
        .copied()
        .find(|name| !alarm.has_property(name))
    {
        Some(property) => Err(ConformanceError::RequiredProperty {
            component: alarm.name().to_owned(),
            property,
        }),
        None => Ok(()),
    }
}

/// REPEAT and DURATION come in pairs.
fn check_repeat(alarm: ComponentRef<'_>) -> Result<(), ConformanceError> {
    if alarm.has_property("REPEAT") != alarm.has_property("DURATION") {
        return Err(PropertyConformanceError::RepeatWithoutDuration.into());
    }
    Ok(())
}

/// A relative trigger needs the parent property it is relative to.
fn check_trigger(alarm: ComponentRef<'_>) -> Result<(), ConformanceError> {
    let Some(trigger) = alarm.property("TRIGGER") else {
        return Ok(());
    };
    // Absolute triggers (VALUE=DATE-TIME) do not depend on the parent
    if trigger.value_type() != ValueType::Duration {
        return Ok(());
    }
    let Some(parent) = alarm.parent() else {
        return Ok(());
    };

    let related = trigger
        .param("RELATED")
        .map(str::to_ascii_uppercase)
        .unwrap_or_else(|| "START".to_owned());
    let err = match related.as_str() {
        "START" if !parent.has_property("DTSTART") => {
            PropertyConformanceError::TriggerRelatedStart
        }
        "END"
            if !(parent.has_property("DTEND")
                || parent.has_property("DUE")
                || (parent.has_property("DTSTART") && parent.has_property("DURATION"))) =>
        {
            PropertyConformanceError::TriggerRelatedEnd
        }
        "START" | "END" => return Ok(()),
        _ => PropertyConformanceError::InvalidTriggerRelation(related),
    };
    Err(err.into())
}
