//! Parse iCalendar (RFC 5545) text into a component tree and check it
//! against the conformance rules of the RFC.
//!
//! # Examples
//!
//! ```rust
//! let input = "BEGIN:VCALENDAR\r\n\
//!              PRODID:-//Example//EN\r\n\
//!              VERSION:2.0\r\n\
//!              BEGIN:VEVENT\r\n\
//!              UID:19970901T130000Z-123401@example.com\r\n\
//!              DTSTAMP:19970901T130000Z\r\n\
//!              DTSTART:19970903T163000Z\r\n\
//!              SUMMARY:Annual Employee Review\r\n\
//!              END:VEVENT\r\n\
//!              END:VCALENDAR\r\n";
//!
//! let calendar = caltree::parse(input).unwrap();
//! let event = calendar.root().children().next().unwrap();
//! assert_eq!(event.name(), "VEVENT");
//! assert!(caltree::conform(calendar.root()).is_ok());
//! ```

const PARAM_VALUE_DELIMITER: char = ',';
const VALUE_DELIMITER: char = ':';
const PARAM_DELIMITER: char = ';';
const PARAM_NAME_DELIMITER: char = '=';
const PARAM_QUOTE: char = '"';

pub mod component;
pub use component::{Component, ComponentKind, ComponentRef, Document};

pub mod parser;
pub use parser::{ComponentParser, ContentLineParser, ParserError, ParserOptions};

pub mod property;

pub mod conformance;
pub use conformance::{ConformanceError, conform};

pub mod generator;

pub mod types;

/// Parse `input` with the default options.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> Result<Document, ParserError> {
    ComponentParser::new(input).parse()
}
