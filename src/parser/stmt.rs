use log::debug;

use crate::{ast::ast::Node, errors::errors::{Error, ErrorImpl}, lexer::tokens::{Token, TokenKind}};

use super::{lookups::BindingPower, parser::Parser};

fn skip_newlines(parser: &mut Parser<'_, Node>) {
    while parser.match_token(TokenKind::Newline) {}
}

fn indentation_error(token: Token, expected: u32) -> Error {
    Error::new(
        ErrorImpl::IndentationViolation {
            expected,
            found: token.column(),
        },
        token.span.start,
    )
}

/// Parses one statement: an expression that ends the line.
///
/// A statement whose last token was already a line break (an indented body
/// that ran until a dedent) needs no further terminator.
pub fn parse_stmt(parser: &mut Parser<'_, Node>) -> Result<Node, Error> {
    let stmt = parser.parse_expression(BindingPower::Default.into())?;

    if !parser.done() && !parser.last_was_newline() {
        parser.require(TokenKind::Newline)?;
    }

    Ok(stmt)
}

/// Parses statements indented exactly `level` columns, stopping at the end
/// of input or at the first line indented less.
pub fn parse_block(parser: &mut Parser<'_, Node>, level: u32) -> Result<Vec<Node>, Error> {
    let mut body = vec![];

    loop {
        skip_newlines(parser);

        if parser.done() || !parser.has_indentation(level) {
            break;
        }

        if parser.has_indentation(level + 1) {
            return Err(indentation_error(parser.current()?, level));
        }

        body.push(parse_stmt(parser)?);
    }

    debug!("parsed block of {} statements at column {}", body.len(), level);
    Ok(body)
}

/// Parses the body of `->` or `?`.
///
/// When the operator ends its line the body is an indented block one step
/// deeper than the current level; otherwise it is the single expression on
/// the rest of the line.
pub fn parse_body(parser: &mut Parser<'_, Node>) -> Result<Vec<Node>, Error> {
    if !parser.match_token(TokenKind::Newline) {
        let expr = parser.parse_expression(BindingPower::Default.into())?;
        return Ok(vec![expr]);
    }

    skip_newlines(parser);

    let level = parser.increase_indentation();
    let body = match parser.current() {
        Err(error) => Err(error),
        Ok(token) if !parser.has_indentation(level) => Err(indentation_error(token, level)),
        Ok(_) => parse_block(parser, level),
    };
    parser.decrease_indentation();

    body
}
