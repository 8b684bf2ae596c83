use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error} at {position}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NoPrefixParser { .. } => "NoPrefixParser",
            ErrorImpl::NoInfixParser { .. } => "NoInfixParser",
            ErrorImpl::IndentationViolation { .. } => "IndentationViolation",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::RecursionLimitExceeded { .. } => "RecursionLimitExceeded",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedEndOfInput => ErrorTip::Suggestion(String::from(
                "The input ended in the middle of an expression",
            )),
            ErrorImpl::UnexpectedToken {
                expected,
                found,
                lexeme,
            } => ErrorTip::Suggestion(format!(
                "Expected `{}`, found `{}` {:?}",
                expected, found, lexeme
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NoPrefixParser { kind } => ErrorTip::Suggestion(format!(
                "`{}` cannot start an expression",
                kind
            )),
            ErrorImpl::NoInfixParser { kind } => ErrorTip::Suggestion(format!(
                "`{}` has a precedence but no infix parser, check the parser setup",
                kind
            )),
            ErrorImpl::IndentationViolation { expected, found } => ErrorTip::Suggestion(format!(
                "Expected indentation of {} columns, found {}",
                expected, found
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`",
                token
            )),
            ErrorImpl::RecursionLimitExceeded { limit } => ErrorTip::Suggestion(format!(
                "Expressions may not be nested more than {} levels deep",
                limit
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("unexpected token: expected {expected}, found {found} {lexeme:?}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        lexeme: String,
    },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("no prefix parser for {kind}")]
    NoPrefixParser { kind: TokenKind },
    #[error("no infix parser for {kind}")]
    NoInfixParser { kind: TokenKind },
    #[error("bad indentation: expected column {expected}, found {found}")]
    IndentationViolation { expected: u32, found: u32 },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("expression nesting exceeds {limit} levels")]
    RecursionLimitExceeded { limit: usize },
}
