use crate::{component::TreeError, parser::ContentLineError, types::ValueError};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParserError {
    #[error("empty input")]
    EmptyInput,
    #[error("Line {line}: content after the closing END of the root component")]
    TooManyComponents { line: usize },
    #[error("Line {line}: BEGIN without a component name")]
    MissingComponentName { line: usize },
    #[error("Line {line}: property {name} outside of any component")]
    PropertyOutsideComponent { line: usize, name: String },
    #[error("Line {line}: END:{name} without a matching BEGIN")]
    UnexpectedEnd { line: usize, name: String },
    #[error("Line {line}: expected END:{expected}, found END:{found}")]
    MismatchedEnd {
        line: usize,
        expected: String,
        found: String,
    },
    #[error("Line {line}: component {name} is never closed")]
    Unterminated { line: usize, name: String },
    #[error("Line {line}: invalid value for {property}: {source}")]
    InvalidValue {
        line: usize,
        property: String,
        source: ValueError,
    },
    #[error("Line {line}: {source}")]
    Tree { line: usize, source: TreeError },
    #[error(transparent)]
    ContentLine(#[from] ContentLineError),
}

impl ParserError {
    /// The input line the error was found on, `None` for empty input.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::EmptyInput => None,
            Self::TooManyComponents { line }
            | Self::MissingComponentName { line }
            | Self::PropertyOutsideComponent { line, .. }
            | Self::UnexpectedEnd { line, .. }
            | Self::MismatchedEnd { line, .. }
            | Self::Unterminated { line, .. }
            | Self::InvalidValue { line, .. }
            | Self::Tree { line, .. } => Some(*line),
            Self::ContentLine(err) => Some(err.line()),
        }
    }
}
