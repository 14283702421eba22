mod error;
pub use error::ParserError;

mod reader;
pub use reader::{Position, Reader};

mod lexer;
pub use lexer::{Lexer, Token, TokenKind};

mod content_line;
pub use content_line::{ContentLine, ContentLineError, ContentLineParser};

mod component;
pub use component::ComponentParser;

use crate::component::DuplicatePolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// What a second instance of a singular property in one component does.
    /// The parsed document keeps this policy for later `add_property` calls.
    pub duplicate_policy: DuplicatePolicy,
    /// Keep values that do not match their value type as
    /// `Value::Unknown` instead of failing.
    pub lenient_values: bool,
}

impl ParserOptions {
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_lenient_values(mut self, lenient: bool) -> Self {
        self.lenient_values = lenient;
        self
    }
}
