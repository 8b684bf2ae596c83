#![allow(clippy::module_inception)]

use std::fmt::Display;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A location in the source text.
///
/// `offset` is a byte offset, `line` is 1-based and `column` is 0-based so
/// that a line's indentation equals the column of its first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(offset: u32, line: u32, column: u32) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }

    pub fn null() -> Self {
        Position::new(0, 1, 0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::null()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Returns a span from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

/// Returns the text of the 1-based `line` in `source`, without its line break.
pub fn get_line_at_position(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth((line - 1) as usize)
        .map(|text| text.trim_end_matches('\r'))
}

/// Renders an error as a small source excerpt with a caret under the
/// offending column.
pub fn format_error(error: &Error, source: &str, file: &str) -> String {
    /*
        Error: message
        -> main.tila:2:6
          |
        2 | b = (c
          | ------^
    */

    let position = error.get_position();
    let line_text = get_line_at_position(source, position.line).unwrap_or("");

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}:{}\n", file, position));
    out.push_str(&format!("{:>padding$}\n", "|"));
    out.push_str(&format!("{} | {}\n", line_string, line_text));

    let arrows = position.column as usize + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

pub fn display_error(error: &Error, source: &str, file: &str) {
    eprint!("{}", format_error(error, source, file));
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nsecond\r\n\n  Testing [ ]\n";

        assert_eq!(super::get_line_at_position(source, 1), Some("Hello, world!"));
        assert_eq!(super::get_line_at_position(source, 2), Some("second"));
        assert_eq!(super::get_line_at_position(source, 3), Some(""));
        assert_eq!(super::get_line_at_position(source, 4), Some("  Testing [ ]"));
        assert_eq!(super::get_line_at_position(source, 0), None);
        assert_eq!(super::get_line_at_position(source, 9), None);
    }

    #[test]
    fn test_format_error() {
        use crate::errors::errors::{Error, ErrorImpl};
        use crate::lexer::tokens::TokenKind;
        use crate::Position;

        let source = "a = 1\nb = (c\n";
        let error = Error::new(
            ErrorImpl::UnexpectedToken {
                expected: TokenKind::CloseParen,
                found: TokenKind::Newline,
                lexeme: String::from("\n"),
            },
            Position::new(12, 2, 6),
        );

        let rendered = super::format_error(&error, source, "main.tila");
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].starts_with("Error: UnexpectedToken"));
        assert_eq!(lines[1], "-> main.tila:2:6");
        assert_eq!(lines[2], "  |");
        assert_eq!(lines[3], "2 | b = (c");
        assert_eq!(lines[4], "  | ------^");
    }
}
