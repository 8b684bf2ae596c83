use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Newline,

    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Question,
    Comma,
    Arrow,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    True,
    False,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A lexical unit. Tokens carry no text of their own, only the span of
/// source they cover; use [`Token::text`] to recover the lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Byte length of the lexeme.
    pub fn len(&self) -> usize {
        (self.span.end.offset - self.span.start.offset) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    pub fn column(&self) -> u32 {
        self.span.start.column
    }

    /// The source text this token covers. Returns an empty string when the
    /// span lies outside `src`.
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        src.get(self.span.start.offset as usize..self.span.end.offset as usize)
            .unwrap_or("")
    }

    /// One line of a token listing: `line:column kind text`.
    pub fn describe(&self, src: &str) -> String {
        let text = match self.kind {
            TokenKind::Newline => "\\n",
            _ => self.text(src),
        };

        format!(
            "{:>4}:{:<4} {:>15} {}",
            self.line(),
            self.column(),
            self.kind.to_string(),
            text
        )
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.span.start)
    }
}
