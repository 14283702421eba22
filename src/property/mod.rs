use derive_more::{Deref, From};

use crate::{
    parser::ContentLine,
    types::{Value, ValueError, ValueType, escape_text},
};

pub mod registry;
pub use registry::{Rfc5545Registry, TypeRegistry};

/// A property parameter such as `RELATED=END`.
///
/// The name is stored in uppercase, values are kept in order and already
/// stripped of their quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: String,
    pub values: Vec<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_values(name, vec![value.into()])
    }

    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// The first value of the parameter.
    #[inline]
    pub fn value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or_default()
    }
}

/// Parameters of one property, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, From, Deref)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0
            .iter()
            .find(|param| param.name.eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.get(name).map(Parameter::value)
    }

    #[inline]
    pub fn get_value_type(&self) -> Option<&str> {
        self.get_param("VALUE")
    }

    /// Add a parameter, replacing one with the same name in place.
    pub fn insert(&mut self, param: Parameter) {
        if let Some(pos) = self.0.iter().position(|p| p.name == param.name) {
            self.0[pos] = param;
        } else {
            self.0.push(param);
        }
    }

    /// Append a parameter, keeping an earlier one with the same name.
    #[inline]
    pub fn push(&mut self, param: Parameter) {
        self.0.push(param);
    }

    #[inline]
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|p| !p.name.eq_ignore_ascii_case(name));
    }
}

impl FromIterator<Parameter> for Parameters {
    fn from_iter<T: IntoIterator<Item = Parameter>>(iter: T) -> Self {
        let mut params = Self::default();
        for param in iter {
            params.insert(param);
        }
        params
    }
}

/// A typed iCalendar property.
///
/// The value is coerced once, when the property is built. The raw text is
/// kept next to it so the property can be written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    params: Parameters,
    value: Value,
    value_type: ValueType,
    raw: String,
    repeatable: bool,
}

impl Property {
    /// Build a property with the RFC 5545 registry.
    ///
    /// ```rust
    /// use caltree::{property::Property, types::{Value, ValueType}};
    ///
    /// let repeat = Property::new("repeat", "4").unwrap();
    /// assert_eq!(repeat.name(), "REPEAT");
    /// assert_eq!(repeat.value_type(), ValueType::Integer);
    /// assert_eq!(repeat.value(), &Value::Integer(4));
    /// ```
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Result<Self, ValueError> {
        Self::with_params(name, Parameters::default(), raw)
    }

    pub fn with_params(
        name: impl Into<String>,
        params: Parameters,
        raw: impl Into<String>,
    ) -> Result<Self, ValueError> {
        Self::build(name.into(), params, raw.into(), &Rfc5545Registry)
    }

    /// Build a TEXT property from unescaped text.
    pub fn text(name: impl Into<String>, text: &str) -> Self {
        let raw = escape_text(text);
        let name = name.into().to_ascii_uppercase();
        Self {
            repeatable: Rfc5545Registry.is_repeatable(&name),
            name,
            params: Parameters::default(),
            value: Value::Text(text.to_owned()),
            value_type: ValueType::Text,
            raw,
        }
    }

    pub fn from_content_line(
        line: &ContentLine,
        registry: &impl TypeRegistry,
    ) -> Result<Self, ValueError> {
        Self::build(
            line.name.clone(),
            line.params.clone(),
            line.value.clone(),
            registry,
        )
    }

    /// Keep the raw value without coercing it.
    pub(crate) fn uncoerced(line: &ContentLine, registry: &impl TypeRegistry) -> Self {
        let name = line.name.to_ascii_uppercase();
        Self {
            value_type: Self::resolve_type(&name, &line.params, registry),
            repeatable: registry.is_repeatable(&name),
            value: Value::Unknown(line.value.clone()),
            raw: line.value.clone(),
            params: line.params.clone(),
            name,
        }
    }

    fn resolve_type(name: &str, params: &Parameters, registry: &impl TypeRegistry) -> ValueType {
        params
            .get_value_type()
            .map(ValueType::from_param)
            .unwrap_or_else(|| registry.resolve(name))
    }

    fn build(
        name: String,
        params: Parameters,
        raw: String,
        registry: &impl TypeRegistry,
    ) -> Result<Self, ValueError> {
        let name = name.to_ascii_uppercase();
        let value_type = Self::resolve_type(&name, &params, registry);
        let value = value_type.coerce(&raw)?;
        Ok(Self {
            repeatable: registry.is_repeatable(&name),
            name,
            params,
            value,
            value_type,
            raw,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get_param(name)
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The value as it appeared in the content line, still escaped.
    #[inline]
    pub fn raw_value(&self) -> &str {
        &self.raw
    }

    /// Whether a component may carry this property more than once.
    #[inline]
    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }
}

impl From<&Property> for ContentLine {
    fn from(prop: &Property) -> Self {
        ContentLine {
            name: prop.name.clone(),
            params: prop.params.clone(),
            value: prop.raw.clone(),
            line: 0,
        }
    }
}
