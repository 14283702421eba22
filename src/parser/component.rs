use crate::{
    ParserError,
    component::{Component, ComponentId, Document},
    parser::{ContentLine, ContentLineParser, ParserOptions, Reader},
    property::{Property, Rfc5545Registry, TypeRegistry},
};

/// Builds a `Document` from iCalendar text.
///
/// The first `BEGIN` opens the root component, every later one a child of
/// the innermost open component. Anything after the root is closed is an
/// error.
pub struct ComponentParser<'a, R: TypeRegistry = Rfc5545Registry> {
    line_parser: ContentLineParser<'a>,
    options: ParserOptions,
    registry: R,
}

impl<'a> ComponentParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::from_reader(Reader::new(input))
    }

    /// Return a new `ComponentParser` from a `Reader`.
    pub fn from_reader(reader: Reader<'a>) -> Self {
        ComponentParser {
            line_parser: ContentLineParser::from_reader(reader),
            options: Default::default(),
            registry: Rfc5545Registry,
        }
    }
}

/// A component that saw its BEGIN but not its END yet.
struct Open {
    id: ComponentId,
    name: String,
    line: usize,
}

impl<'a, R: TypeRegistry> ComponentParser<'a, R> {
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Use another property type registry.
    pub fn with_registry<T: TypeRegistry>(self, registry: T) -> ComponentParser<'a, T> {
        ComponentParser {
            line_parser: self.line_parser,
            options: self.options,
            registry,
        }
    }

    #[tracing::instrument(skip(self), fields(options = ?self.options))]
    pub fn parse(mut self) -> Result<Document, ParserError> {
        let mut document: Option<Document> = None;
        let mut stack: Vec<Open> = Vec::new();

        while let Some(line) = self.line_parser.next() {
            let line = line?;
            match line.name.as_str() {
                "BEGIN" => self.begin(&mut document, &mut stack, line)?,
                "END" => Self::end(&mut stack, line)?,
                _ => {
                    let (Some(document), Some(open)) = (document.as_mut(), stack.last()) else {
                        return Err(ParserError::PropertyOutsideComponent {
                            line: line.line,
                            name: line.name,
                        });
                    };
                    let property = self.property(&line)?;
                    document
                        .add_property(open.id, property)
                        .map_err(|source| ParserError::Tree {
                            line: line.line,
                            source,
                        })?;
                }
            }
        }

        if let Some(open) = stack.pop() {
            return Err(ParserError::Unterminated {
                line: open.line,
                name: open.name,
            });
        }
        let document = document.ok_or(ParserError::EmptyInput)?;
        tracing::debug!(components = document.len(), "parsed document");
        Ok(document)
    }

    fn begin(
        &self,
        document: &mut Option<Document>,
        stack: &mut Vec<Open>,
        line: ContentLine,
    ) -> Result<(), ParserError> {
        let name = line.value.trim();
        if name.is_empty() {
            return Err(ParserError::MissingComponentName { line: line.line });
        }
        let component = Component::named(name);
        let name = component.name().to_owned();
        tracing::trace!(line = line.line, component = %name, "open component");

        let id = if let Some(document) = document.as_mut() {
            let Some(parent) = stack.last() else {
                return Err(ParserError::TooManyComponents { line: line.line });
            };
            let id = document.create(component);
            document
                .attach(parent.id, id)
                .map_err(|source| ParserError::Tree {
                    line: line.line,
                    source,
                })?;
            id
        } else {
            let root = Document::with_policy(component, self.options.duplicate_policy);
            let id = root.root_id();
            *document = Some(root);
            id
        };

        stack.push(Open {
            id,
            name,
            line: line.line,
        });
        Ok(())
    }

    fn end(stack: &mut Vec<Open>, line: ContentLine) -> Result<(), ParserError> {
        let name = line.value.trim();
        let Some(open) = stack.pop() else {
            return Err(ParserError::UnexpectedEnd {
                line: line.line,
                name: name.to_owned(),
            });
        };
        if !open.name.eq_ignore_ascii_case(name) {
            return Err(ParserError::MismatchedEnd {
                line: line.line,
                expected: open.name,
                found: name.to_owned(),
            });
        }
        tracing::trace!(line = line.line, component = %open.name, "close component");
        Ok(())
    }

    fn property(&self, line: &ContentLine) -> Result<Property, ParserError> {
        match Property::from_content_line(line, &self.registry) {
            Ok(property) => Ok(property),
            Err(err) if self.options.lenient_values => {
                tracing::warn!(line = line.line, property = %line.name, %err, "keeping invalid value as is");
                Ok(Property::uncoerced(line, &self.registry))
            }
            Err(source) => Err(ParserError::InvalidValue {
                line: line.line,
                property: line.name.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ComponentParser;
    use crate::{
        ParserError,
        component::{ComponentKind, DuplicatePolicy, TreeError},
        parser::ParserOptions,
        property::TypeRegistry,
        types::{Value, ValueType},
    };
    use rstest::rstest;

    const FREEBUSY: &str = "BEGIN:VFREEBUSY\r\n\
                            ORGANIZER:MAILTO:jane_doe@host1.com\r\n\
                            ATTENDEE:MAILTO:john_public@host2.com\r\n\
                            DTSTART:19971015T050000Z\r\n\
                            DTEND:19971016T050000Z\r\n\
                            DTSTAMP:19970901T083000Z\r\n\
                            END:VFREEBUSY\r\n";

    #[test_log::test]
    fn single_component() {
        let doc = ComponentParser::new(FREEBUSY).parse().unwrap();
        let root = doc.root();
        assert_eq!(root.kind(), ComponentKind::FreeBusy);
        assert_eq!(root.properties().len(), 5);
        assert_eq!(root.children().count(), 0);
        assert_eq!(
            root.property("DTSTART").map(|p| p.value_type()),
            Some(ValueType::DateTime)
        );
    }

    #[test]
    fn nesting() {
        let input = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nUID:1\nBEGIN:VALARM\nACTION:AUDIO\n\
                     END:VALARM\nEND:VEVENT\nBEGIN:VTODO\nEND:VTODO\nEND:VCALENDAR\n";
        let doc = ComponentParser::new(input).parse().unwrap();
        let kinds: Vec<_> = doc.root().children().map(|c| c.kind()).collect();
        assert_eq!(kinds, [ComponentKind::Event, ComponentKind::Todo]);
        let alarm = doc.root().children().next().unwrap().children().next().unwrap();
        assert_eq!(alarm.kind(), ComponentKind::Alarm);
        assert_eq!(alarm.parent().map(|p| p.kind()), Some(ComponentKind::Event));
        assert_eq!(alarm.property("ACTION").map(|p| p.raw_value()), Some("AUDIO"));
    }

    #[test]
    fn unknown_names_are_kept() {
        let input = "BEGIN:VCALENDAR\r\nX-WR-CALNAME:Work\r\nBEGIN:X-THING\r\nFOO;BAR=1:baz\r\nEND:x-thing\r\nEND:VCALENDAR\r\n";
        let doc = ComponentParser::new(input).parse().unwrap();
        assert_eq!(
            doc.root().property("X-WR-CALNAME").map(|p| p.value()),
            Some(&Value::Text("Work".to_owned()))
        );
        let thing = doc.root().children().next().unwrap();
        assert_eq!(thing.kind(), ComponentKind::Extension);
        assert_eq!(thing.name(), "X-THING");
        assert_eq!(thing.property("FOO").and_then(|p| p.param("BAR")), Some("1"));
    }

    #[rstest]
    #[case("", ParserError::EmptyInput)]
    #[case("\r\n\r\n", ParserError::EmptyInput)]
    #[case("SUMMARY:x\r\n", ParserError::PropertyOutsideComponent { line: 1, name: "SUMMARY".to_owned() })]
    #[case("BEGIN:VEVENT\r\nEND:VTODO\r\n", ParserError::MismatchedEnd { line: 2, expected: "VEVENT".to_owned(), found: "VTODO".to_owned() })]
    #[case("END:VEVENT\r\n", ParserError::UnexpectedEnd { line: 1, name: "VEVENT".to_owned() })]
    #[case("BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nEND:VEVENT\r\n", ParserError::Unterminated { line: 1, name: "VCALENDAR".to_owned() })]
    #[case("BEGIN:VEVENT\r\nEND:VEVENT\r\nBEGIN:VTODO\r\n", ParserError::TooManyComponents { line: 3 })]
    #[case("BEGIN:VEVENT\r\nEND:VEVENT\r\nUID:1\r\n", ParserError::PropertyOutsideComponent { line: 3, name: "UID".to_owned() })]
    #[case("BEGIN:\r\n", ParserError::MissingComponentName { line: 1 })]
    fn structure_errors(#[case] input: &str, #[case] expected: ParserError) {
        assert_eq!(ComponentParser::new(input).parse(), Err(expected));
    }

    #[test]
    fn missing_colon_reports_line() {
        let err = ComponentParser::new("BEGIN:VEVENT\r\nSUMMARY\r\nEND:VEVENT\r\n")
            .parse()
            .unwrap_err();
        assert_eq!(err.line(), Some(2));
        insta::assert_snapshot!(err, @r#"Line 2: Missing a ":" delimiter."#);
    }

    #[test]
    fn invalid_value() {
        let input = "BEGIN:VALARM\r\nREPEAT:four\r\nEND:VALARM\r\n";
        let err = ComponentParser::new(input).parse().unwrap_err();
        assert_eq!(err.line(), Some(2));
        insta::assert_snapshot!(err, @"Line 2: invalid value for REPEAT: invalid INTEGER value: four");

        let doc = ComponentParser::new(input)
            .with_options(ParserOptions::default().with_lenient_values(true))
            .parse()
            .unwrap();
        let repeat = doc.root().property("REPEAT").unwrap();
        assert_eq!(repeat.value(), &Value::Unknown("four".to_owned()));
        assert_eq!(repeat.value_type(), ValueType::Integer);
    }

    #[test]
    fn duplicate_singular_property() {
        let input = "BEGIN:VEVENT\r\nUID:1\r\nUID:2\r\nEND:VEVENT\r\n";
        assert_eq!(
            ComponentParser::new(input).parse(),
            Err(ParserError::Tree {
                line: 3,
                source: TreeError::DuplicateProperty("UID".to_owned())
            })
        );

        let doc = ComponentParser::new(input)
            .with_options(ParserOptions::default().with_duplicate_policy(DuplicatePolicy::Replace))
            .parse()
            .unwrap();
        assert_eq!(doc.policy(), DuplicatePolicy::Replace);
        assert_eq!(doc.root().properties().len(), 1);
        assert_eq!(doc.root().property("UID").map(|p| p.raw_value()), Some("2"));
    }

    struct AllText;

    impl TypeRegistry for AllText {
        fn value_type(&self, _name: &str) -> Option<ValueType> {
            Some(ValueType::Text)
        }

        fn is_repeatable(&self, _name: &str) -> bool {
            true
        }
    }

    #[test]
    fn custom_registry() {
        let input = "BEGIN:VEVENT\r\nDTSTART:tomorrow\r\nDTSTART:later\r\nEND:VEVENT\r\n";
        let doc = ComponentParser::new(input)
            .with_registry(AllText)
            .parse()
            .unwrap();
        assert_eq!(doc.root().properties_named("DTSTART").count(), 2);
        assert_eq!(
            doc.root().property("DTSTART").map(|p| p.value_type()),
            Some(ValueType::Text)
        );
    }
}
