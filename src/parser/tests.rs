//! Unit tests for the parser module.
//!
//! This module contains tests for:
//! - Cursor primitives and their failure modes
//! - Precedence climbing and associativity
//! - Handler registration and lookup failures
//! - Indentation tracking
//! - The tila grammar: literals, operators, functions, blocks

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
};

use super::{
    config::ParserConfig,
    expr::unescape,
    lookups::{HandlerRegistry, PrecedenceTable},
    parser::{parse, parse_with_config, Parser},
};

// Handlers that build strings, so the engine is exercised with a node type
// it knows nothing about.

fn name(parser: &mut Parser<'_, String>, token: Token) -> Result<String, Error> {
    Ok(parser.text(&token).to_string())
}

fn shout(_parser: &mut Parser<'_, String>, _token: Token) -> Result<String, Error> {
    Ok(String::from("X"))
}

fn group(parser: &mut Parser<'_, String>, _token: Token) -> Result<String, Error> {
    let inner = parser.parse_expression(0)?;
    parser.require(TokenKind::CloseParen)?;
    Ok(inner)
}

fn left_assoc(parser: &mut Parser<'_, String>, left: String, token: Token) -> Result<String, Error> {
    let right = parser.parse_expression(parser.precedence_of(token.kind))?;
    Ok(format!("({} {} {})", left, parser.text(&token), right))
}

fn right_assoc(parser: &mut Parser<'_, String>, left: String, token: Token) -> Result<String, Error> {
    let right = parser.parse_expression(parser.precedence_of(token.kind) - 1)?;
    Ok(format!("({} {} {})", left, parser.text(&token), right))
}

fn arithmetic<'a>(tokens: &'a [Token], source: &'a str) -> Parser<'a, String> {
    let mut parser = Parser::new(tokens, source);
    parser.prefix(TokenKind::Identifier, name);
    parser.prefix(TokenKind::OpenParen, group);
    parser.infix(TokenKind::Plus, 10, left_assoc);
    parser.infix(TokenKind::Dash, 10, left_assoc);
    parser.infix(TokenKind::Star, 20, left_assoc);
    parser.infix(TokenKind::Assignment, 5, right_assoc);
    parser
}

fn parse_arithmetic(source: &str) -> Result<String, Error> {
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);
    parser.parse_expression(0)
}

fn parse_source(source: &str) -> Result<Vec<String>, Error> {
    let tokens = tokenize(source)?;
    Ok(parse(&tokens, source)?
        .iter()
        .map(|node| node.to_string())
        .collect())
}

fn parse_error(source: &str) -> ErrorImpl {
    parse_source(source).unwrap_err().kind().clone()
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(parse_arithmetic("a + b * c").unwrap(), "(a + (b * c))");
    assert_eq!(parse_arithmetic("a * b + c").unwrap(), "((a * b) + c)");
}

#[test]
fn test_equal_precedence_is_left_associative() {
    assert_eq!(parse_arithmetic("a - b - c").unwrap(), "((a - b) - c)");
    assert_eq!(parse_arithmetic("a + b - c + d").unwrap(), "(((a + b) - c) + d)");
}

#[test]
fn test_reentering_below_precedence_is_right_associative() {
    assert_eq!(parse_arithmetic("a = b = c").unwrap(), "(a = (b = c))");
    assert_eq!(parse_arithmetic("a = b + c").unwrap(), "(a = (b + c))");
}

#[test]
fn test_prefix_handler_recurses() {
    assert_eq!(parse_arithmetic("(a + b) * c").unwrap(), "((a + b) * c)");
}

#[test]
fn test_climbing_stops_at_min_precedence() {
    let source = "a + b";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);

    assert_eq!(parser.parse_expression(10).unwrap(), "a");
    assert_eq!(parser.position(), 1);
    assert!(parser.is_next(TokenKind::Plus));
}

#[test]
fn test_climbing_stops_at_unregistered_token() {
    let source = "a + b c";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);

    assert_eq!(parser.parse_expression(0).unwrap(), "(a + b)");
    assert!(parser.is_next(TokenKind::Identifier));
    assert!(!parser.done());
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "a = b * (c - d) + e * f";

    assert_eq!(parse_arithmetic(source).unwrap(), parse_arithmetic(source).unwrap());
}

#[test]
fn test_missing_prefix_parser() {
    let error = parse_arithmetic("* a").unwrap_err();

    assert_eq!(
        error.kind(),
        &ErrorImpl::NoPrefixParser {
            kind: TokenKind::Star
        }
    );
    assert_eq!(error.get_position().column, 0);
}

#[test]
fn test_precedence_without_infix_parser() {
    let source = "a % b";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);
    parser.set_precedence(TokenKind::Percent, 30);

    let error = parser.parse_expression(0).unwrap_err();

    assert_eq!(
        error.kind(),
        &ErrorImpl::NoInfixParser {
            kind: TokenKind::Percent
        }
    );
    assert_eq!(error.get_position().column, 2);
}

#[test]
fn test_expression_cut_short() {
    let error = parse_arithmetic("a +").unwrap_err();

    assert_eq!(error.kind(), &ErrorImpl::UnexpectedEndOfInput);
    assert_eq!(error.get_position().offset, 3);
}

#[test]
fn test_last_registration_wins() {
    let source = "a";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);
    parser.register_prefix(TokenKind::Identifier, shout);

    assert_eq!(parser.parse_expression(0).unwrap(), "X");
}

#[test]
fn test_precedence_table_defaults_to_zero() {
    let mut table = PrecedenceTable::new();
    assert_eq!(table.get(TokenKind::Plus), 0);

    table.set(TokenKind::Plus, 10);
    table.set(TokenKind::Plus, 15);
    assert_eq!(table.get(TokenKind::Plus), 15);
    assert_eq!(table.get(TokenKind::Star), 0);
}

#[test]
fn test_registry_lookup_miss() {
    let mut registry: HandlerRegistry<'_, String> = HandlerRegistry::new();
    assert!(registry.prefix(TokenKind::Identifier).is_none());

    registry.register_prefix(TokenKind::Identifier, name);
    assert!(registry.prefix(TokenKind::Identifier).is_some());
    assert!(registry.infix(TokenKind::Identifier).is_none());
}

#[test]
fn test_require_mismatch_does_not_advance() {
    let source = "a + b";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);

    let error = parser.require(TokenKind::Star).unwrap_err();

    assert_eq!(
        error.kind(),
        &ErrorImpl::UnexpectedToken {
            expected: TokenKind::Star,
            found: TokenKind::Identifier,
            lexeme: String::from("a"),
        }
    );
    assert_eq!(parser.position(), 0);

    let token = parser.require(TokenKind::Identifier).unwrap();
    assert_eq!(parser.text(&token), "a");
    assert_eq!(parser.position(), 1);
}

#[test]
fn test_match_token() {
    let source = "a + b";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);

    assert!(!parser.match_token(TokenKind::Plus));
    assert_eq!(parser.position(), 0);

    assert!(parser.match_token(TokenKind::Identifier));
    assert_eq!(parser.position(), 1);

    assert!(parser.match_token(TokenKind::Plus));
    assert_eq!(parser.position(), 2);
}

#[test]
fn test_reading_past_the_end() {
    let source = "a";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);

    assert!(!parser.done());
    assert_eq!(parser.consume().unwrap().kind, TokenKind::Identifier);
    assert!(parser.done());
    assert_eq!(parser.position(), tokens.len());

    assert_eq!(parser.current().unwrap_err().kind(), &ErrorImpl::UnexpectedEndOfInput);
    assert_eq!(parser.consume().unwrap_err().kind(), &ErrorImpl::UnexpectedEndOfInput);
    assert_eq!(parser.position(), tokens.len());

    assert!(!parser.is_next(TokenKind::Identifier));
    assert!(!parser.match_token(TokenKind::Identifier));
    assert_eq!(parser.precedence(), 0);
}

#[test]
fn test_empty_stream() {
    let tokens: Vec<Token> = vec![];
    let mut parser = arithmetic(&tokens, "");

    assert!(parser.done());
    assert_eq!(
        parser.parse_expression(0).unwrap_err().kind(),
        &ErrorImpl::UnexpectedEndOfInput
    );
}

#[test]
fn test_line_break_ends_expression() {
    let source = "a\n+ b";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);

    parser.consume().unwrap();
    assert!(!parser.last_was_newline());

    parser.consume().unwrap();
    assert!(parser.last_was_newline());
    assert_eq!(parser.precedence(), 0);
    assert_eq!(parser.precedence_of(TokenKind::Plus), 10);

    parser.consume().unwrap();
    assert!(!parser.last_was_newline());
}

#[test]
fn test_line_breaks_can_continue_expressions() {
    let source = "a\n+ b";
    let tokens = tokenize(source).unwrap();
    let config = ParserConfig::default().with_line_breaks_end_expressions(false);
    let mut parser: Parser<'_, String> = Parser::with_config(&tokens, source, config);
    parser.prefix(TokenKind::Identifier, name);
    parser.infix(TokenKind::Plus, 10, left_assoc);

    assert!(!parser.config().line_breaks_end_expressions);

    parser.consume().unwrap();
    parser.consume().unwrap();
    assert!(parser.last_was_newline());
    assert_eq!(parser.precedence(), 10);
}

#[test]
fn test_groups_look_past_line_breaks() {
    let source = "a\n\n+ b";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);

    assert!(!parser.in_group());
    parser.open_group();
    assert!(parser.in_group());

    assert_eq!(parser.parse_expression(0).unwrap(), "(a + b)");
    assert!(parser.done());

    parser.close_group();
    assert!(!parser.in_group());
}

#[test]
fn test_block_inside_group_is_line_sensitive() {
    let source = "a";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);

    parser.open_group();
    parser.increase_indentation();
    assert!(!parser.in_group());

    parser.decrease_indentation();
    assert!(parser.in_group());
}

#[test]
#[should_panic(expected = "without a matching open_group")]
fn test_unbalanced_close_group_panics() {
    let tokens: Vec<Token> = vec![];
    let mut parser = arithmetic(&tokens, "");
    parser.close_group();
}

#[test]
fn test_indentation_is_balanced() {
    let tokens: Vec<Token> = vec![];
    let mut parser = arithmetic(&tokens, "");

    assert_eq!(parser.indentation(), 0);
    assert_eq!(parser.increase_indentation(), 2);
    assert_eq!(parser.increase_indentation(), 4);
    assert_eq!(parser.increase_indentation(), 6);
    parser.decrease_indentation();
    parser.decrease_indentation();
    parser.decrease_indentation();
    assert_eq!(parser.indentation(), 0);
}

#[test]
#[should_panic]
fn test_unbalanced_decrease_panics() {
    let tokens: Vec<Token> = vec![];
    let mut parser = arithmetic(&tokens, "");
    parser.decrease_indentation();
}

#[test]
fn test_has_indentation() {
    let source = "a\n  b";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);

    assert!(parser.has_indentation(0));
    assert!(!parser.has_indentation(1));

    parser.consume().unwrap();
    parser.consume().unwrap();
    assert!(parser.has_indentation(2));
    assert!(!parser.has_indentation(3));

    parser.consume().unwrap();
    assert!(!parser.has_indentation(0));
}

#[test]
fn test_recursion_limit() {
    let source = "((((((a))))))";
    let tokens = tokenize(source).unwrap();
    let mut parser = arithmetic(&tokens, source);
    parser.parse_expression(0).unwrap();

    let config = ParserConfig::default().with_max_depth(4);
    let mut limited = Parser::with_config(&tokens, source, config);
    limited.prefix(TokenKind::Identifier, name);
    limited.prefix(TokenKind::OpenParen, group);

    assert_eq!(
        limited.parse_expression(0).unwrap_err().kind(),
        &ErrorImpl::RecursionLimitExceeded { limit: 4 }
    );
}

// Default grammar

#[test]
fn test_parse_literals() {
    assert_eq!(
        parse_source("a\n42\n3.5\n\"hi\"\ntrue\nfalse").unwrap(),
        vec!["a", "42", "3.5", "\"hi\"", "true", "false"]
    );
}

#[test]
fn test_parse_string_escapes() {
    let source = r#""tab\there\x41\"""#;
    let tokens = tokenize(source).unwrap();
    let nodes = parse(&tokens, source).unwrap();

    assert_eq!(nodes[0].kind, NodeKind::String(String::from("tab\there\x41\"")));
}

#[test]
fn test_unescape() {
    assert_eq!(unescape("plain"), "plain");
    assert_eq!(unescape("a\\nb"), "a\nb");
    assert_eq!(unescape("\\\\"), "\\");
    assert_eq!(unescape("\\x41\\x4a"), "AJ");
    assert_eq!(unescape("\\q"), "\\q");
    assert_eq!(unescape("\\xzz"), "\\xzz");
}

#[test]
fn test_parse_operator_precedence() {
    assert_eq!(
        parse_source("1 + 2 * 3 - 4").unwrap(),
        vec!["(- (+ 1 (* 2 3)) 4)"]
    );
    assert_eq!(
        parse_source("a < b + 1 == c % 2 >= d").unwrap(),
        vec!["(== (< a (+ b 1)) (>= (% c 2) d))"]
    );
}

#[test]
fn test_parse_unary() {
    assert_eq!(parse_source("-a * b").unwrap(), vec!["(* (- a) b)"]);
    assert_eq!(parse_source("!f(x)").unwrap(), vec!["(! (call f x))"]);
    assert_eq!(parse_source("a - -b").unwrap(), vec!["(- a (- b))"]);
}

#[test]
fn test_parse_grouping() {
    assert_eq!(parse_source("(1 + 2) * 3").unwrap(), vec!["(* (+ 1 2) 3)"]);
}

#[test]
fn test_parse_call() {
    assert_eq!(parse_source("f(a, b + 1)").unwrap(), vec!["(call f a (+ b 1))"]);
    assert_eq!(parse_source("f()").unwrap(), vec!["(call f)"]);
    assert_eq!(parse_source("f(a)(b)").unwrap(), vec!["(call (call f a) b)"]);
}

#[test]
fn test_parse_list_and_index() {
    assert_eq!(
        parse_source("[1, 2, [3]]").unwrap(),
        vec!["(list 1 2 (list 3))"]
    );
    assert_eq!(parse_source("[]").unwrap(), vec!["(list)"]);
    assert_eq!(
        parse_source("xs[0][i + 1]").unwrap(),
        vec!["(index (index xs 0) (+ i 1))"]
    );
}

#[test]
fn test_parse_multiline_list() {
    assert_eq!(
        parse_source("xs = [\n  1,\n  2,\n]\nxs").unwrap(),
        vec!["(= xs (list 1 2))", "xs"]
    );
}

#[test]
fn test_parse_assignment() {
    assert_eq!(
        parse_source("xs[0] = a = 1").unwrap(),
        vec!["(= (index xs 0) (= a 1))"]
    );
    assert!(matches!(
        parse_error("1 = 2"),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
}

#[test]
fn test_parse_conditional() {
    assert_eq!(parse_source("a == b ? c").unwrap(), vec!["(? (== a b) c)"]);
    assert_eq!(parse_source("x = a ? b").unwrap(), vec!["(= x (? a b))"]);
}

#[test]
fn test_parse_inline_functions() {
    assert_eq!(
        parse_source("inc = (x) -> x + 1").unwrap(),
        vec!["(= inc (fn (x) (+ x 1)))"]
    );
    assert_eq!(parse_source("id = x -> x").unwrap(), vec!["(= id (fn (x) x))"]);
    assert_eq!(parse_source("f = () -> 1").unwrap(), vec!["(= f (fn () 1))"]);
    assert_eq!(
        parse_source("map(xs, (a, b) -> a * b)").unwrap(),
        vec!["(call map xs (fn (a b) (* a b)))"]
    );
}

#[test]
fn test_parse_function_block() {
    let source = "add = (a, b) ->\n  c = a + b\n  c\nadd(1, 2)\n";

    assert_eq!(
        parse_source(source).unwrap(),
        vec!["(= add (fn (a b) (= c (+ a b)) c))", "(call add 1 2)"]
    );
}

#[test]
fn test_parse_nested_blocks() {
    let source = "outer = () ->\n  inner = (x) ->\n    x * 2\n  inner(3)\nouter()";

    assert_eq!(
        parse_source(source).unwrap(),
        vec![
            "(= outer (fn () (= inner (fn (x) (* x 2))) (call inner 3)))",
            "(call outer)"
        ]
    );
}

#[test]
fn test_parse_conditional_block() {
    let source = "x > 1 ?\n  print(\"big\")\n  x\ny";

    assert_eq!(
        parse_source(source).unwrap(),
        vec!["(? (> x 1) (call print \"big\") x)", "y"]
    );
}

#[test]
fn test_block_does_not_leak_into_next_line() {
    let source = "f = () ->\n  1\n(a) -> a\n";

    assert_eq!(
        parse_source(source).unwrap(),
        vec!["(= f (fn () 1))", "(fn (a) a)"]
    );
}

#[test]
fn test_block_closed_inside_call() {
    let source = "run(() ->\n  1\n)";

    assert_eq!(parse_source(source).unwrap(), vec!["(call run (fn () 1))"]);
}

#[test]
fn test_blank_lines_and_comments_in_block() {
    let source = "f = () ->\n\n  // first\n  1\n\n  2\n\ng";

    assert_eq!(
        parse_source(source).unwrap(),
        vec!["(= f (fn () 1 2))", "g"]
    );
}

#[test]
fn test_body_must_be_indented() {
    assert_eq!(
        parse_error("f = () ->\nx"),
        ErrorImpl::IndentationViolation {
            expected: 2,
            found: 0
        }
    );
}

#[test]
fn test_body_indented_too_far() {
    assert_eq!(
        parse_error("f = () ->\n    x"),
        ErrorImpl::IndentationViolation {
            expected: 2,
            found: 4
        }
    );
}

#[test]
fn test_top_level_indented() {
    assert_eq!(
        parse_error("  x"),
        ErrorImpl::IndentationViolation {
            expected: 0,
            found: 2
        }
    );
}

#[test]
fn test_dedent_to_unknown_level() {
    let source = "f = (x) ->\n  g = () ->\n    a\n   b";
    let error = parse_source(source).unwrap_err();

    assert_eq!(
        error.kind(),
        &ErrorImpl::IndentationViolation {
            expected: 2,
            found: 3
        }
    );
    assert_eq!(error.get_position().line, 4);
}

#[test]
fn test_body_missing_at_end_of_input() {
    assert_eq!(parse_error("f = () ->\n"), ErrorImpl::UnexpectedEndOfInput);
}

#[test]
fn test_custom_indent_width() {
    let source = "f = () ->\n    1";
    let tokens = tokenize(source).unwrap();
    let config = ParserConfig::default().with_indent_width(4);

    let nodes = parse_with_config(&tokens, source, config).unwrap();
    assert_eq!(nodes[0].to_string(), "(= f (fn () 1))");

    let source = "f = () ->\n  1";
    let tokens = tokenize(source).unwrap();
    let error = parse_with_config(&tokens, source, config).unwrap_err();
    assert_eq!(
        error.kind(),
        &ErrorImpl::IndentationViolation {
            expected: 4,
            found: 2
        }
    );
}

#[test]
fn test_statements_need_line_breaks() {
    assert_eq!(
        parse_error("a b"),
        ErrorImpl::UnexpectedToken {
            expected: TokenKind::Newline,
            found: TokenKind::Identifier,
            lexeme: String::from("b"),
        }
    );
}

#[test]
fn test_unclosed_call() {
    assert_eq!(parse_error("f(a"), ErrorImpl::UnexpectedEndOfInput);
    assert_eq!(
        parse_error("f(a\n"),
        ErrorImpl::UnexpectedEndOfInput
    );
}

#[test]
fn test_parameter_lists() {
    assert_eq!(
        parse_error("(a, b) + 1"),
        ErrorImpl::UnexpectedToken {
            expected: TokenKind::Arrow,
            found: TokenKind::Plus,
            lexeme: String::from("+"),
        }
    );
    assert!(matches!(
        parse_error("(1) -> 1"),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
    assert!(matches!(
        parse_error("a + b -> 1"),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
}

#[test]
fn test_no_prefix_parser_in_grammar() {
    let error = parse_source("x = )").unwrap_err();

    assert_eq!(
        error.kind(),
        &ErrorImpl::NoPrefixParser {
            kind: TokenKind::CloseParen
        }
    );
    assert_eq!(error.get_position().column, 4);
}

#[test]
fn test_nesting_limit_in_grammar() {
    let source = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    let tokens = tokenize(&source).unwrap();
    let config = ParserConfig::default().with_max_depth(16);

    let error = parse_with_config(&tokens, &source, config).unwrap_err();
    assert_eq!(error.kind(), &ErrorImpl::RecursionLimitExceeded { limit: 16 });
}

#[test]
fn test_node_spans() {
    let source = "a + bc\nf(x)";
    let tokens = tokenize(source).unwrap();
    let nodes: Vec<Node> = parse(&tokens, source).unwrap();

    assert_eq!(nodes[0].span.start.offset, 0);
    assert_eq!(nodes[0].span.end.offset, 6);
    assert_eq!(nodes[1].span.start.line, 2);
    assert_eq!(nodes[1].span.end.offset, 11);
}

#[test]
fn test_empty_program() {
    assert!(parse_source("").unwrap().is_empty());
    assert!(parse_source("\n\n// nothing\n").unwrap().is_empty());
}

#[test]
fn test_line_breaks_inside_brackets() {
    assert_eq!(parse_source("f(a\n+ b)").unwrap(), vec!["(call f (+ a b))"]);
    assert_eq!(parse_source("x = (a\n+ b)").unwrap(), vec!["(= x (+ a b))"]);
    assert_eq!(parse_source("[a +\n b]").unwrap(), vec!["(list (+ a b))"]);
    assert_eq!(
        parse_source("xs[i\n  + 1]\ny").unwrap(),
        vec!["(index xs (+ i 1))", "y"]
    );
}

#[test]
fn test_block_inside_brackets_ends_lines() {
    assert_eq!(
        parse_error("run(() ->\n  a\n  + 1\n)"),
        ErrorImpl::NoPrefixParser {
            kind: TokenKind::Plus
        }
    );
}

#[test]
fn test_empty_parameter_list_at_end_of_input() {
    assert_eq!(
        parse_error("()"),
        ErrorImpl::UnexpectedTokenDetailed {
            token: String::from(")"),
            message: String::from("expected `->` after a parameter list"),
        }
    );
}
