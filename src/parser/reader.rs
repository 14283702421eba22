//! Character cursor over an input buffer.
//!
//! The `Reader` hands out one `char` at a time and can un-read the most
//! recently returned one. Only a single level of pushback exists: the lexer
//! never needs to look further ahead than one character past a run.

/// A location inside the input.
///
/// `line` and `column` are 1-based, `offset` is the byte offset of the next
/// character to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a str,
    position: Position,
    // Position before the last accepted char, None once it was backed up
    // or when the last read hit the end of input.
    previous: Option<Position>,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: Position::default(),
            previous: None,
        }
    }

    /// Return the next character, or `None` at the end of input.
    pub fn get_char(&mut self) -> Option<char> {
        let Some(c) = self.input[self.position.offset..].chars().next() else {
            self.previous = None;
            return None;
        };
        self.previous = Some(self.position);
        self.position.offset += c.len_utf8();

        // CR only ends a line on its own, CRLF counts once at the LF
        let ends_line = match c {
            '\n' => true,
            '\r' => !self.input[self.position.offset..].starts_with('\n'),
            _ => false,
        };
        if ends_line {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    /// Un-read the character returned by the last `get_char` call.
    ///
    /// Backing up twice in a row, or after `get_char` returned `None`, is a
    /// no-op.
    pub fn back_up(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.position = previous;
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The input text between `start` and the current position.
    #[inline]
    pub fn slice_from(&self, start: Position) -> &'a str {
        &self.input[start.offset..self.position.offset]
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.position.offset >= self.input.len()
    }
}
