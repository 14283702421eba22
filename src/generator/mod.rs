//! Write components back to iCalendar text.
//!
//! Output uses CRLF line endings and folds content lines at 75 octets.

mod ical;

/// Maximum line length in octets, without the line break.
const MAX_LINE_OCTETS: usize = 75;

pub trait Emitter {
    fn generate(&self) -> String;
}

impl<T: Emitter> Emitter for [T] {
    fn generate(&self) -> String {
        self.iter().map(Emitter::generate).collect()
    }
}

/// Fold a logical content line into physical lines of at most 75 octets,
/// terminated by CRLF.
///
/// Continuation lines start with one space. UTF-8 sequences are never split.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return format!("{line}\r\n");
    }

    let mut out = String::with_capacity(line.len() + (line.len() / MAX_LINE_OCTETS + 1) * 3);
    let mut rest = line;
    let mut first = true;
    while !rest.is_empty() {
        // The leading space counts against the limit
        let max_len = if first {
            MAX_LINE_OCTETS
        } else {
            MAX_LINE_OCTETS - 1
        };
        let mut end = rest.len().min(max_len);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }

        if !first {
            out.push(' ');
        }
        out.push_str(&rest[..end]);
        out.push_str("\r\n");
        rest = &rest[end..];
        first = false;
    }
    out
}

/// RFC 6868 caret encoding plus quoting for parameter values containing
/// delimiters.
pub(crate) fn encode_param_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '^' => out.push_str("^^"),
            '\n' => out.push_str("^n"),
            '"' => out.push_str("^'"),
            _ => out.push(c),
        }
    }
    if out.contains([crate::VALUE_DELIMITER, crate::PARAM_DELIMITER, crate::PARAM_VALUE_DELIMITER]) {
        format!("{q}{out}{q}", q = crate::PARAM_QUOTE)
    } else {
        out
    }
}
