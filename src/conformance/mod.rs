//! Check a component tree against the structural and semantic rules of
//! RFC 5545.
//!
//! Rules are looked up by component kind and property name (see `rules`).
//! The walk is a single pre-order traversal that stops at the first
//! violation.
//!
//! # Examples
//!
//! ```rust
//! use caltree::conformance::ConformanceError;
//!
//! let input = "BEGIN:VCALENDAR\r\n\
//!              PRODID:-//Example//EN\r\n\
//!              VERSION:2.0\r\n\
//!              BEGIN:VALARM\r\n\
//!              ACTION:AUDIO\r\n\
//!              TRIGGER:-PT15M\r\n\
//!              END:VALARM\r\n\
//!              END:VCALENDAR\r\n";
//! let document = caltree::parse(input).unwrap();
//!
//! let err = caltree::conform(document.root()).unwrap_err();
//! assert!(matches!(err, ConformanceError::AllowedParent { .. }));
//! assert_eq!(
//!     err.to_string(),
//!     "VALARM component cannot be nested within VCALENDAR component"
//! );
//! ```

use crate::{
    component::{ComponentKind, ComponentRef, Visitor},
    property::Property,
};

mod alarm;
pub mod rules;
pub use rules::{ComponentRule, Parents};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PropertyConformanceError {
    #[error("{property} property cannot be specified in {component} component")]
    AllowedComponent { property: String, component: String },
    #[error(
        "VALARM parent component must have DTSTART property if VALARM is set to trigger in relation to parent's start"
    )]
    TriggerRelatedStart,
    #[error(
        "VALARM parent component must have DTEND or DTSTART/DURATION property if VALARM is set to trigger in relation to parent's end"
    )]
    TriggerRelatedEnd,
    #[error("Repeating VALARM requires both REPEAT and DURATION properties")]
    RepeatWithoutDuration,
    #[error("invalid RELATED parameter of TRIGGER: {0}")]
    InvalidTriggerRelation(String),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConformanceError {
    #[error("{component} component requires {property} property")]
    RequiredProperty {
        component: String,
        property: &'static str,
    },
    #[error("{component} component cannot be nested within {parent} component")]
    AllowedParent { component: String, parent: String },
    #[error(transparent)]
    PropertyConformance(#[from] PropertyConformanceError),
}

/// Visitor applying the rule tables, fail-fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConformanceVisitor;

impl ConformanceVisitor {
    fn check_component(component: ComponentRef<'_>) -> Result<(), ConformanceError> {
        let Some(rule) = component.kind().rule() else {
            return Ok(());
        };

        if let Some(property) = rule
            .required
            .iter()
            .copied()
            .find(|name| !component.has_property(name))
        {
            return Err(ConformanceError::RequiredProperty {
                component: component.name().to_owned(),
                property,
            });
        }

        if let Some(parent) = component.parent()
            && !rule.parents.allows(parent.kind())
        {
            return Err(ConformanceError::AllowedParent {
                component: component.name().to_owned(),
                parent: parent.name().to_owned(),
            });
        }

        match rule.check {
            Some(check) => check(component),
            None => Ok(()),
        }
    }

    fn check_property(owner: ComponentRef<'_>, property: &Property) -> Result<(), ConformanceError> {
        if owner.kind() == ComponentKind::Extension {
            return Ok(());
        }
        match rules::property_hosts(property.name()) {
            Some(hosts) if !hosts.contains(&owner.kind()) => {
                Err(PropertyConformanceError::AllowedComponent {
                    property: property.name().to_owned(),
                    component: owner.name().to_owned(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

impl Visitor for ConformanceVisitor {
    type Error = ConformanceError;

    fn visit_component(&mut self, component: ComponentRef<'_>) -> Result<(), ConformanceError> {
        Self::check_component(component).inspect_err(|err| {
            tracing::debug!(component = component.name(), %err, "conformance violation");
        })
    }

    fn visit_property(
        &mut self,
        owner: ComponentRef<'_>,
        property: &Property,
    ) -> Result<(), ConformanceError> {
        Self::check_property(owner, property).inspect_err(|err| {
            tracing::debug!(
                component = owner.name(),
                property = property.name(),
                %err,
                "conformance violation"
            );
        })
    }
}

/// Check `component` and everything below it, returning the first violation.
///
/// The check only reads the tree, so it can be repeated at will.
pub fn conform(component: ComponentRef<'_>) -> Result<(), ConformanceError> {
    component.accept(&mut ConformanceVisitor)
}
