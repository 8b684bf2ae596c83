use crate::{
    ast::ast::{Node, NodeKind, Operator},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_body};

fn detailed_error(parser: &Parser<'_, Node>, token: &Token, message: &str) -> Error {
    Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.text(token).to_string(),
            message: String::from(message),
        },
        token.span.start,
    )
}

fn skip_newlines(parser: &mut Parser<'_, Node>) {
    while parser.match_token(TokenKind::Newline) {}
}

/// Parses comma separated expressions up to and including `close`.
/// Line breaks inside the brackets are ignored and a trailing comma is allowed.
fn parse_sequence(parser: &mut Parser<'_, Node>, close: TokenKind) -> Result<(Vec<Node>, Token), Error> {
    parser.open_group();
    let items = parse_items(parser, close);
    parser.close_group();

    let items = items?;
    let end = parser.require(close)?;
    Ok((items, end))
}

fn parse_items(parser: &mut Parser<'_, Node>, close: TokenKind) -> Result<Vec<Node>, Error> {
    let mut items = vec![];

    loop {
        skip_newlines(parser);
        if parser.is_next(close) {
            break;
        }

        items.push(parser.parse_expression(BindingPower::Default.into())?);

        skip_newlines(parser);
        if !parser.match_token(TokenKind::Comma) {
            break;
        }
    }

    skip_newlines(parser);
    Ok(items)
}

fn body_span(start: &Span, body: &[Node]) -> Span {
    match body.last() {
        Some(last) => start.to(last.get_span()),
        None => *start,
    }
}

pub fn parse_identifier_expr(parser: &mut Parser<'_, Node>, token: Token) -> Result<Node, Error> {
    let name = parser.text(&token).to_string();
    Ok(Node::new(NodeKind::Identifier(name), token.span))
}

pub fn parse_number_expr(parser: &mut Parser<'_, Node>, token: Token) -> Result<Node, Error> {
    let text = parser.text(&token);

    match text.parse() {
        Ok(value) => Ok(Node::new(NodeKind::Number(value), token.span)),
        Err(_) => Err(Error::new(
            ErrorImpl::NumberParseError {
                token: text.to_string(),
            },
            token.span.start,
        )),
    }
}

pub fn parse_string_expr(parser: &mut Parser<'_, Node>, token: Token) -> Result<Node, Error> {
    let text = parser.text(&token);
    let inner = text
        .strip_prefix('"')
        .and_then(|text| text.strip_suffix('"'))
        .ok_or_else(|| detailed_error(parser, &token, "expected a quoted string"))?;

    Ok(Node::new(NodeKind::String(unescape(inner)), token.span))
}

pub fn parse_boolean_expr(_parser: &mut Parser<'_, Node>, token: Token) -> Result<Node, Error> {
    Ok(Node::new(
        NodeKind::Boolean(token.kind == TokenKind::True),
        token.span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser<'_, Node>, token: Token) -> Result<Node, Error> {
    let operator = Operator::unary(token.kind)
        .ok_or_else(|| detailed_error(parser, &token, "expected a unary operator"))?;
    let operand = parser.parse_expression(BindingPower::Unary.into())?;
    let span = token.span.to(operand.get_span());

    Ok(Node::new(
        NodeKind::Unary {
            operator,
            operand: Box::new(operand),
        },
        span,
    ))
}

/// `(` starting an expression: a parameter list when `->` follows the
/// closing parenthesis, otherwise a single parenthesised expression.
pub fn parse_arguments_expr(parser: &mut Parser<'_, Node>, token: Token) -> Result<Node, Error> {
    let (items, end) = parse_sequence(parser, TokenKind::CloseParen)?;
    let span = token.span.to(&end.span);

    if parser.is_next(TokenKind::Arrow) {
        let mut names = vec![];
        for item in &items {
            match &item.kind {
                NodeKind::Identifier(name) => names.push(name.clone()),
                _ => {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedTokenDetailed {
                            token: item.to_string(),
                            message: String::from("parameters must be identifiers"),
                        },
                        item.span.start,
                    ))
                }
            }
        }

        return Ok(Node::new(NodeKind::Arguments(names), span));
    }

    match <[Node; 1]>::try_from(items) {
        Ok([mut inner]) => {
            inner.span = span;
            Ok(inner)
        }
        // `()` and `(a, b)` only make sense as parameters
        Err(_) => match parser.current() {
            Ok(next) => Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    expected: TokenKind::Arrow,
                    found: next.kind,
                    lexeme: parser.text(&next).to_string(),
                },
                next.span.start,
            )),
            Err(_) => Err(detailed_error(parser, &end, "expected `->` after a parameter list")),
        },
    }
}

pub fn parse_list_expr(parser: &mut Parser<'_, Node>, token: Token) -> Result<Node, Error> {
    let (items, end) = parse_sequence(parser, TokenKind::CloseBracket)?;
    Ok(Node::new(NodeKind::List(items), token.span.to(&end.span)))
}

pub fn parse_binary_expr(parser: &mut Parser<'_, Node>, left: Node, token: Token) -> Result<Node, Error> {
    let operator = Operator::binary(token.kind)
        .ok_or_else(|| detailed_error(parser, &token, "expected a binary operator"))?;
    let right = parser.parse_expression(parser.precedence_of(token.kind))?;
    let span = left.get_span().to(right.get_span());

    Ok(Node::new(
        NodeKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    ))
}

/// Assignment is right associative: `a = b = c` is `a = (b = c)`.
pub fn parse_assignment_expr(parser: &mut Parser<'_, Node>, left: Node, token: Token) -> Result<Node, Error> {
    if !left.is_assignable() {
        return Err(detailed_error(parser, &token, "left side of `=` must be a name or an index"));
    }

    let value = parser.parse_expression(parser.precedence_of(token.kind) - 1)?;
    let span = left.get_span().to(value.get_span());

    Ok(Node::new(
        NodeKind::Assign {
            target: Box::new(left),
            value: Box::new(value),
        },
        span,
    ))
}

/// `condition ? body`
pub fn parse_conditional_expr(parser: &mut Parser<'_, Node>, left: Node, _token: Token) -> Result<Node, Error> {
    let body = parse_body(parser)?;
    let span = body_span(left.get_span(), &body);

    Ok(Node::new(
        NodeKind::Conditional {
            condition: Box::new(left),
            body,
        },
        span,
    ))
}

/// `(a, b) -> body` or `a -> body`
pub fn parse_function_expr(parser: &mut Parser<'_, Node>, left: Node, token: Token) -> Result<Node, Error> {
    let params = match left.kind {
        NodeKind::Arguments(names) => names,
        NodeKind::Identifier(name) => vec![name],
        _ => return Err(detailed_error(parser, &token, "expected a parameter list before `->`")),
    };

    let body = parse_body(parser)?;
    let span = body_span(&left.span, &body);

    Ok(Node::new(NodeKind::Function { params, body }, span))
}

pub fn parse_call_expr(parser: &mut Parser<'_, Node>, left: Node, _token: Token) -> Result<Node, Error> {
    let (arguments, end) = parse_sequence(parser, TokenKind::CloseParen)?;
    let span = left.get_span().to(&end.span);

    Ok(Node::new(
        NodeKind::Call {
            callee: Box::new(left),
            arguments,
        },
        span,
    ))
}

/// List access, `a[0]`.
pub fn parse_index_expr(parser: &mut Parser<'_, Node>, left: Node, _token: Token) -> Result<Node, Error> {
    parser.open_group();
    let index = parser.parse_expression(BindingPower::Default.into());
    skip_newlines(parser);
    parser.close_group();

    let index = index?;
    let end = parser.require(TokenKind::CloseBracket)?;
    let span = left.get_span().to(&end.span);

    Ok(Node::new(
        NodeKind::Index {
            target: Box::new(left),
            index: Box::new(index),
        },
        span,
    ))
}

/// Resolves backslash escapes in a string literal body.
pub fn unescape(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();

                while hex.len() < 2 {
                    match chars.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => {
                            hex.push(*ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    // Not a valid escape, keep it as written
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
            }
            _ => result.push(ch), // Keep the backslash
        }
    }

    result
}
