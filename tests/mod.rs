use caltree::{ComponentKind, ComponentRef, Document, component::ComponentId};

/// Id of the first component of `kind`, in document order.
pub fn find(document: &Document, kind: ComponentKind) -> ComponentId {
    fn walk(component: ComponentRef<'_>, kind: ComponentKind) -> Option<ComponentId> {
        if component.kind() == kind {
            return Some(component.id());
        }
        component.children().find_map(|child| walk(child, kind))
    }
    walk(document.root(), kind).unwrap_or_else(|| panic!("no {kind} in document"))
}

pub fn calendar() -> Document {
    caltree::parse(include_str!("./resources/calendar.ics")).unwrap()
}

pub mod scenarios {
    use caltree::{
        Component, ComponentKind, ConformanceError, Document, ParserError,
        conformance::PropertyConformanceError, property::Property,
    };

    fn prop(name: &str, raw: &str) -> Property {
        Property::new(name, raw).unwrap()
    }

    fn calendar() -> Document {
        Document::new(
            Component::new(ComponentKind::Calendar)
                .with_properties([prop("PRODID", "-//Example//EN"), prop("VERSION", "2.0")]),
        )
    }

    /// A calendar with an event without DTSTART, holding an alarm with
    /// `alarm_props`.
    fn event_with_alarm(alarm_props: Vec<Property>) -> Document {
        let mut doc = calendar();
        let event = doc.create(
            Component::new(ComponentKind::Event)
                .with_properties([prop("UID", "1@example.com"), prop("DTSTAMP", "19970901T083000Z")]),
        );
        let alarm = doc.create(Component::new(ComponentKind::Alarm).with_properties(alarm_props));
        doc.attach(doc.root_id(), event).unwrap();
        doc.attach(event, alarm).unwrap();
        doc
    }

    #[test_log::test]
    fn freebusy_request() {
        let freebusy = caltree::parse(include_str!("./resources/freebusy_request.ics")).unwrap();
        assert_eq!(freebusy.root().kind(), ComponentKind::FreeBusy);
        assert_eq!(freebusy.root().properties().len(), 5);
        assert_eq!(freebusy.root().children().count(), 0);

        let mut doc = calendar();
        let id = doc.graft(doc.root_id(), freebusy).unwrap();
        assert_eq!(doc.get(id).unwrap().parent().map(|p| p.kind()), Some(ComponentKind::Calendar));
        assert_eq!(caltree::conform(doc.root()), Ok(()));
    }

    #[test_log::test]
    fn trigger_without_parent_start() {
        let doc = event_with_alarm(vec![prop("ACTION", "AUDIO"), prop("TRIGGER", "PT15M")]);
        assert_eq!(
            caltree::conform(doc.root()),
            Err(ConformanceError::PropertyConformance(
                PropertyConformanceError::TriggerRelatedStart
            ))
        );
    }

    #[test]
    fn repeat_without_duration() {
        let doc = event_with_alarm(vec![
            prop("ACTION", "AUDIO"),
            prop("TRIGGER", "PT15M"),
            prop("REPEAT", "4"),
        ]);
        assert_eq!(
            caltree::conform(doc.root()),
            Err(ConformanceError::from(
                PropertyConformanceError::RepeatWithoutDuration
            ))
        );
    }

    #[test]
    fn alarm_at_top_level() {
        let mut doc = calendar();
        let alarm = doc.create(
            Component::new(ComponentKind::Alarm)
                .with_properties([prop("ACTION", "AUDIO"), prop("TRIGGER", "PT15M")]),
        );
        doc.attach(doc.root_id(), alarm).unwrap();
        let err = caltree::conform(doc.root()).unwrap_err();
        assert!(matches!(err, ConformanceError::AllowedParent { .. }));
        insta::assert_snapshot!(err, @"VALARM component cannot be nested within VCALENDAR component");
    }

    #[test]
    fn content_line_without_colon() {
        let input = "BEGIN:VCALENDAR\r\nPRODID:x\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nSUMMARY\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let err = caltree::parse(input).unwrap_err();
        assert!(matches!(err, ParserError::ContentLine(_)));
        assert_eq!(err.line(), Some(5));
    }
}

pub mod conformance {
    use crate::{calendar, find};
    use caltree::{
        ComponentKind, ConformanceError, conformance::PropertyConformanceError,
        property::{Parameter, Parameters, Property},
    };

    #[test_log::test]
    fn full_calendar() {
        let doc = calendar();
        let kinds: Vec<_> = doc.root().children().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            [
                ComponentKind::Event,
                ComponentKind::FreeBusy,
                ComponentKind::Journal,
                ComponentKind::Timezone,
                ComponentKind::Todo
            ]
        );
        assert_eq!(doc.len(), 10);
        assert_eq!(doc.conform(), Ok(()));
    }

    #[test]
    fn freebusy_reply() {
        let doc = caltree::parse(include_str!("./resources/freebusy_reply.ics")).unwrap();
        assert_eq!(doc.conform(), Ok(()));
        let freebusy = doc.root().children().next().unwrap();
        assert_eq!(freebusy.properties_named("FREEBUSY").count(), 2);
        assert_eq!(
            freebusy.property("COMMENT").and_then(|p| p.value().as_text()),
            Some("This iCalendar file contains busy time information for the next three months.")
        );
        assert_eq!(
            freebusy.property("ATTENDEE").and_then(|p| p.param("CN")),
            Some("Public, John")
        );
    }

    #[test]
    fn idempotent() {
        let doc = calendar();
        let before = doc.clone();
        assert_eq!(doc.conform(), Ok(()));
        assert_eq!(doc.conform(), Ok(()));
        assert_eq!(doc, before);
    }

    #[test]
    fn related_start_without_dtstart() {
        let mut doc = calendar();
        let event = find(&doc, ComponentKind::Event);
        assert_eq!(doc.remove_property(event, "DTSTART").unwrap().len(), 1);
        let err = doc.conform().unwrap_err();
        insta::assert_snapshot!(err, @"VALARM parent component must have DTSTART property if VALARM is set to trigger in relation to parent's start");
    }

    fn relate_event_alarm_to_end(doc: &mut caltree::Document) {
        let alarm = find(doc, ComponentKind::Alarm);
        doc.remove_property(alarm, "TRIGGER").unwrap();
        let params: Parameters = vec![Parameter::new("RELATED", "END")].into();
        let trigger = Property::with_params("TRIGGER", params, "PT15M").unwrap();
        doc.add_property(alarm, trigger).unwrap();
    }

    #[test]
    fn related_end_without_dtend() {
        let mut doc = calendar();
        relate_event_alarm_to_end(&mut doc);
        assert_eq!(
            doc.conform(),
            Err(ConformanceError::from(
                PropertyConformanceError::TriggerRelatedEnd
            ))
        );

        // DTSTART and DURATION together stand in for DTEND
        let event = find(&doc, ComponentKind::Event);
        doc.add_property(event, Property::new("DURATION", "PT1H").unwrap())
            .unwrap();
        assert_eq!(doc.conform(), Ok(()));
    }

    #[test]
    fn related_end_with_duration_only() {
        let mut doc = calendar();
        relate_event_alarm_to_end(&mut doc);
        let event = find(&doc, ComponentKind::Event);
        doc.remove_property(event, "DTSTART").unwrap();
        doc.add_property(event, Property::new("DURATION", "PT5M").unwrap())
            .unwrap();
        let err = doc.conform().unwrap_err();
        insta::assert_snapshot!(err, @"VALARM parent component must have DTEND or DTSTART/DURATION property if VALARM is set to trigger in relation to parent's end");
    }

    #[test]
    fn repeat_requires_duration() {
        let mut doc = calendar();
        let alarm = find(&doc, ComponentKind::Alarm);
        doc.add_property(alarm, Property::new("REPEAT", "4").unwrap())
            .unwrap();
        let err = doc.conform().unwrap_err();
        insta::assert_snapshot!(err, @"Repeating VALARM requires both REPEAT and DURATION properties");
    }

    #[test]
    fn misplaced_property() {
        let mut doc = calendar();
        let journal = find(&doc, ComponentKind::Journal);
        doc.add_property(journal, Property::new("DUE", "20140101T000000Z").unwrap())
            .unwrap();
        assert_eq!(
            doc.conform(),
            Err(ConformanceError::PropertyConformance(
                PropertyConformanceError::AllowedComponent {
                    property: "DUE".to_owned(),
                    component: "VJOURNAL".to_owned()
                }
            ))
        );
    }
}

pub mod invariants {
    use crate::{calendar, find};
    use caltree::{Component, ComponentKind, ConformanceError, property::Property};
    use rstest::rstest;

    #[rstest]
    #[case(ComponentKind::Calendar, "PRODID")]
    #[case(ComponentKind::Calendar, "VERSION")]
    #[case(ComponentKind::Event, "UID")]
    #[case(ComponentKind::Event, "DTSTAMP")]
    #[case(ComponentKind::Todo, "UID")]
    #[case(ComponentKind::Todo, "DTSTAMP")]
    #[case(ComponentKind::Journal, "UID")]
    #[case(ComponentKind::Journal, "DTSTAMP")]
    #[case(ComponentKind::Timezone, "TZID")]
    #[case(ComponentKind::Standard, "DTSTART")]
    #[case(ComponentKind::Standard, "TZOFFSETFROM")]
    #[case(ComponentKind::Daylight, "TZOFFSETTO")]
    #[case(ComponentKind::Alarm, "ACTION")]
    #[case(ComponentKind::Alarm, "TRIGGER")]
    fn required_property(#[case] kind: ComponentKind, #[case] property: &'static str) {
        let mut doc = calendar();
        let id = find(&doc, kind);
        assert_eq!(doc.remove_property(id, property).unwrap().len(), 1);
        assert_eq!(
            doc.conform(),
            Err(ConformanceError::RequiredProperty {
                component: kind.to_string(),
                property
            })
        );
    }

    /// A component of `kind` carrying its required properties.
    fn minimal(kind: ComponentKind) -> Component {
        let props: &[(&str, &str)] = match kind {
            ComponentKind::Calendar => &[("PRODID", "x"), ("VERSION", "2.0")],
            ComponentKind::Event | ComponentKind::Todo | ComponentKind::Journal => {
                &[("UID", "new@example.com"), ("DTSTAMP", "20140101T000000Z")]
            }
            ComponentKind::Timezone => &[("TZID", "Europe/Berlin")],
            ComponentKind::Standard | ComponentKind::Daylight => &[
                ("DTSTART", "19971026T020000"),
                ("TZOFFSETFROM", "+0200"),
                ("TZOFFSETTO", "+0100"),
            ],
            ComponentKind::Alarm => &[("ACTION", "AUDIO"), ("TRIGGER", "PT15M")],
            ComponentKind::FreeBusy | ComponentKind::Extension => &[],
        };
        Component::new(kind).with_properties(
            props
                .iter()
                .map(|(name, raw)| Property::new(*name, *raw).unwrap()),
        )
    }

    #[rstest]
    #[case(ComponentKind::Calendar, ComponentKind::Event)]
    #[case(ComponentKind::Event, ComponentKind::Todo)]
    #[case(ComponentKind::Todo, ComponentKind::Journal)]
    #[case(ComponentKind::Journal, ComponentKind::Event)]
    #[case(ComponentKind::FreeBusy, ComponentKind::Timezone)]
    #[case(ComponentKind::Timezone, ComponentKind::Event)]
    #[case(ComponentKind::Standard, ComponentKind::Calendar)]
    #[case(ComponentKind::Daylight, ComponentKind::Todo)]
    #[case(ComponentKind::Alarm, ComponentKind::Calendar)]
    #[case(ComponentKind::Alarm, ComponentKind::Journal)]
    #[case(ComponentKind::Alarm, ComponentKind::Alarm)]
    fn allowed_parent(#[case] kind: ComponentKind, #[case] parent: ComponentKind) {
        let mut doc = calendar();
        let parent_id = find(&doc, parent);
        let child = doc.create(minimal(kind));
        doc.attach(parent_id, child).unwrap();
        assert_eq!(
            doc.conform(),
            Err(ConformanceError::AllowedParent {
                component: kind.to_string(),
                parent: parent.to_string(),
            })
        );
    }

    #[test]
    fn extension_parent_is_unrestricted() {
        let mut doc = calendar();
        let extension = doc.create(Component::named("X-GROUP"));
        let event = doc.create(minimal(ComponentKind::Event));
        doc.attach(doc.root_id(), extension).unwrap();
        doc.attach(extension, event).unwrap();
        assert!(matches!(
            doc.conform(),
            Err(ConformanceError::AllowedParent { .. })
        ));

        doc.detach(extension, event).unwrap();
        let nested = doc.create(Component::named("X-ITEM"));
        doc.attach(extension, nested).unwrap();
        assert_eq!(doc.conform(), Ok(()));
    }
}

pub mod roundtrip {
    use caltree::{
        ComponentKind, generator::Emitter, property::Property, types::ValueType,
    };
    use rstest::rstest;

    #[rstest]
    #[case(include_str!("./resources/calendar.ics"))]
    #[case(include_str!("./resources/freebusy_request.ics"))]
    #[case(include_str!("./resources/freebusy_reply.ics"))]
    fn parse_generate_parse(#[case] input: &str) {
        let doc = caltree::parse(input).unwrap();
        let output = doc.generate();
        assert!(output.split("\r\n").all(|line| line.len() <= 75));
        similar_asserts::assert_eq!(caltree::parse(&output).unwrap(), doc);
    }

    #[rstest]
    #[case(include_str!("./resources/calendar.ics"))]
    #[case(include_str!("./resources/freebusy_request.ics"))]
    fn canonical_input_is_reproduced(#[case] input: &str) {
        let doc = caltree::parse(input).unwrap();
        similar_asserts::assert_eq!(doc.generate(), input);
    }

    #[test]
    fn line_endings_are_normalised() {
        let input = include_str!("./resources/freebusy_request.ics");
        let lf = input.replace("\r\n", "\n");
        let cr = input.replace("\r\n", "\r");
        let expected = caltree::parse(input).unwrap();
        assert_eq!(caltree::parse(&lf).unwrap(), expected);
        assert_eq!(caltree::parse(&cr).unwrap(), expected);
        similar_asserts::assert_eq!(caltree::parse(&lf).unwrap().generate(), input);
    }

    #[test]
    fn long_values_fold_and_unfold() {
        let mut doc = crate::calendar();
        let journal = crate::find(&doc, ComponentKind::Journal);
        let text = "Grüße aus Köln; ein sehr, sehr langer Eintrag. ".repeat(12);
        doc.remove_property(journal, "DESCRIPTION").unwrap();
        doc.add_property(journal, Property::text("DESCRIPTION", &text))
            .unwrap();

        let output = doc.generate();
        assert!(output.split("\r\n").all(|line| line.len() <= 75));
        let reparsed = caltree::parse(&output).unwrap();
        let description = reparsed
            .get(journal)
            .and_then(|journal| journal.property("DESCRIPTION"))
            .unwrap();
        assert_eq!(description.value_type(), ValueType::Text);
        assert_eq!(description.value().as_text(), Some(text.as_str()));
        assert_eq!(reparsed, doc);
    }
}

pub mod nesting {
    use caltree::{Component, ComponentKind, Document, generator::Emitter, property::Property};

    const DEPTH: usize = 100_000;

    fn deep_calendar() -> String {
        let mut input = String::from("BEGIN:VCALENDAR\r\nPRODID:x\r\nVERSION:2.0\r\n");
        input += &"BEGIN:X-A\r\n".repeat(DEPTH);
        input += &"END:X-A\r\n".repeat(DEPTH);
        input + "END:VCALENDAR\r\n"
    }

    #[test]
    fn deep_nesting_is_walked_without_recursion() {
        let input = deep_calendar();
        let doc = caltree::parse(&input).unwrap();
        assert_eq!(doc.len(), DEPTH + 1);
        assert_eq!(doc.conform(), Ok(()));
        assert_eq!(doc.generate(), input);
    }

    #[test]
    fn deep_subtree_moves_between_documents() {
        let input = deep_calendar();
        let mut doc = caltree::parse(&input).unwrap();
        let outer = doc.root().children().next().unwrap().id();
        doc.detach(doc.root_id(), outer).unwrap();
        let subtree = doc.extract(outer).unwrap();
        assert_eq!(subtree.len(), DEPTH);

        let mut calendar = Document::new(Component::new(ComponentKind::Calendar).with_properties([
            Property::new("PRODID", "x").unwrap(),
            Property::new("VERSION", "2.0").unwrap(),
        ]));
        calendar.graft(calendar.root_id(), subtree).unwrap();
        assert_eq!(calendar.conform(), Ok(()));
        assert_eq!(calendar.generate(), input);
    }
}
