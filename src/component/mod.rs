//! The element model: components, the document tree that owns them and the
//! visitor contract used to walk it.
//!
//! Properties and child components are owned by a `Document`. A component
//! only knows its parent through a `ComponentId`, which is resolved through
//! the document and never keeps the parent alive.

use derive_more::Display;

use crate::property::Property;

mod document;
pub use document::{ComponentId, ComponentRef, Document};
mod visitor;
pub use visitor::Visitor;

/// The component kinds of RFC 5545 §3.6.
///
/// Every other name, `X-` or IANA registered, is an `Extension`. Its literal
/// name is kept on the `Component`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ComponentKind {
    #[display("VCALENDAR")]
    Calendar,
    #[display("VEVENT")]
    Event,
    #[display("VTODO")]
    Todo,
    #[display("VJOURNAL")]
    Journal,
    #[display("VFREEBUSY")]
    FreeBusy,
    #[display("VTIMEZONE")]
    Timezone,
    #[display("STANDARD")]
    Standard,
    #[display("DAYLIGHT")]
    Daylight,
    #[display("VALARM")]
    Alarm,
    /// Named `X-EXTENSION` when built from the kind alone.
    #[display("X-EXTENSION")]
    Extension,
}

impl ComponentKind {
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "VCALENDAR" => Self::Calendar,
            "VEVENT" => Self::Event,
            "VTODO" => Self::Todo,
            "VJOURNAL" => Self::Journal,
            "VFREEBUSY" => Self::FreeBusy,
            "VTIMEZONE" => Self::Timezone,
            "STANDARD" => Self::Standard,
            "DAYLIGHT" => Self::Daylight,
            "VALARM" => Self::Alarm,
            _ => Self::Extension,
        }
    }
}

/// What adding a second instance of a singular property does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Fail with `TreeError::DuplicateProperty`.
    #[default]
    Reject,
    /// Replace the existing property in place.
    Replace,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("no component with id {0}")]
    UnknownComponent(ComponentId),
    #[error("attaching {child} below {parent} would create a cycle")]
    Cycle {
        parent: ComponentId,
        child: ComponentId,
    },
    #[error("component {0} already has a parent")]
    AlreadyAttached(ComponentId),
    #[error("the root component cannot be attached")]
    RootAttach,
    #[error("component {child} is not a child of {parent}")]
    NotAChild {
        parent: ComponentId,
        child: ComponentId,
    },
    #[error("duplicate property: {0}")]
    DuplicateProperty(String),
    #[error("component {0} must be detached first")]
    AttachedSubtree(ComponentId),
}

/// A component and its properties, without its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    kind: ComponentKind,
    name: String,
    properties: Vec<Property>,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            name: kind.to_string(),
            properties: Vec::new(),
        }
    }

    /// Build a component from the value of a `BEGIN` line.
    pub fn named(name: &str) -> Self {
        Self {
            kind: ComponentKind::parse(name),
            name: name.to_ascii_uppercase(),
            properties: Vec::new(),
        }
    }

    /// Add properties without any duplicate check, for building fixtures.
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.properties.extend(properties);
        self
    }

    #[inline]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The first property called `name`.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|prop| prop.name().eq_ignore_ascii_case(name))
    }

    pub fn properties_named(&self, name: &str) -> impl Iterator<Item = &Property> {
        self.properties
            .iter()
            .filter(move |prop| prop.name().eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Add a property.
    ///
    /// A repeatable property is always appended. A singular one that is
    /// already present is handled according to `policy`, the replaced
    /// property is returned.
    pub fn add_property(
        &mut self,
        property: Property,
        policy: DuplicatePolicy,
    ) -> Result<Option<Property>, TreeError> {
        if !property.is_repeatable()
            && let Some(pos) = self
                .properties
                .iter()
                .position(|prop| prop.name() == property.name())
        {
            return match policy {
                DuplicatePolicy::Reject => {
                    Err(TreeError::DuplicateProperty(property.name().to_owned()))
                }
                DuplicatePolicy::Replace => {
                    Ok(Some(std::mem::replace(&mut self.properties[pos], property)))
                }
            };
        }
        self.properties.push(property);
        Ok(None)
    }

    /// Remove every property called `name` and return them.
    pub fn remove_property(&mut self, name: &str) -> Vec<Property> {
        let (removed, kept) = std::mem::take(&mut self.properties)
            .into_iter()
            .partition(|prop| prop.name().eq_ignore_ascii_case(name));
        self.properties = kept;
        removed
    }
}
