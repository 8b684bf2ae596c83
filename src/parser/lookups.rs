use std::collections::HashMap;

use crate::{ast::ast::Node, errors::errors::Error, lexer::tokens::{Token, TokenKind}};

use super::{expr::*, parser::Parser};

/// Binding powers of the default grammar, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default = 0,
    Assignment = 10,
    Conditional = 20,
    Function = 30,
    Equality = 40,
    Relational = 50,
    Additive = 60,
    Multiplicative = 70,
    Unary = 80,
    Call = 90,
}

impl From<BindingPower> for i32 {
    fn from(bp: BindingPower) -> Self {
        bp as i32
    }
}

pub type PrefixHandler<'a, N> = fn(&mut Parser<'a, N>, Token) -> Result<N, Error>;
pub type InfixHandler<'a, N> = fn(&mut Parser<'a, N>, N, Token) -> Result<N, Error>;

/// Binding power per token kind. Kinds without an entry bind at 0, which
/// never continues an expression.
#[derive(Debug, Clone, Default)]
pub struct PrecedenceTable {
    precedences: HashMap<TokenKind, i32>,
}

impl PrecedenceTable {
    pub fn new() -> Self {
        PrecedenceTable::default()
    }

    pub fn set(&mut self, kind: TokenKind, precedence: i32) {
        self.precedences.insert(kind, precedence);
    }

    pub fn get(&self, kind: TokenKind) -> i32 {
        self.precedences.get(&kind).copied().unwrap_or(0)
    }
}

/// Prefix and infix handlers keyed by token kind. Registering a kind twice
/// replaces the earlier handler.
pub struct HandlerRegistry<'a, N> {
    prefix: HashMap<TokenKind, PrefixHandler<'a, N>>,
    infix: HashMap<TokenKind, InfixHandler<'a, N>>,
}

impl<'a, N> HandlerRegistry<'a, N> {
    pub fn new() -> Self {
        HandlerRegistry {
            prefix: HashMap::new(),
            infix: HashMap::new(),
        }
    }

    pub fn register_prefix(&mut self, kind: TokenKind, handler: PrefixHandler<'a, N>) {
        self.prefix.insert(kind, handler);
    }

    pub fn register_infix(&mut self, kind: TokenKind, handler: InfixHandler<'a, N>) {
        self.infix.insert(kind, handler);
    }

    pub fn prefix(&self, kind: TokenKind) -> Option<PrefixHandler<'a, N>> {
        self.prefix.get(&kind).copied()
    }

    pub fn infix(&self, kind: TokenKind) -> Option<InfixHandler<'a, N>> {
        self.infix.get(&kind).copied()
    }
}

impl<'a, N> Default for HandlerRegistry<'a, N> {
    fn default() -> Self {
        HandlerRegistry::new()
    }
}

/// Registers the tila grammar on `parser`.
pub fn create_token_lookups(parser: &mut Parser<'_, Node>) {
    parser.infix(TokenKind::Assignment, BindingPower::Assignment.into(), parse_assignment_expr);
    parser.infix(TokenKind::Question, BindingPower::Conditional.into(), parse_conditional_expr);
    parser.infix(TokenKind::Arrow, BindingPower::Function.into(), parse_function_expr);

    // Equality and relational
    parser.infix(TokenKind::Equals, BindingPower::Equality.into(), parse_binary_expr);
    parser.infix(TokenKind::NotEquals, BindingPower::Equality.into(), parse_binary_expr);
    parser.infix(TokenKind::Less, BindingPower::Relational.into(), parse_binary_expr);
    parser.infix(TokenKind::LessEquals, BindingPower::Relational.into(), parse_binary_expr);
    parser.infix(TokenKind::Greater, BindingPower::Relational.into(), parse_binary_expr);
    parser.infix(TokenKind::GreaterEquals, BindingPower::Relational.into(), parse_binary_expr);

    // Additive and multiplicative
    parser.infix(TokenKind::Plus, BindingPower::Additive.into(), parse_binary_expr);
    parser.infix(TokenKind::Dash, BindingPower::Additive.into(), parse_binary_expr);
    parser.infix(TokenKind::Star, BindingPower::Multiplicative.into(), parse_binary_expr);
    parser.infix(TokenKind::Slash, BindingPower::Multiplicative.into(), parse_binary_expr);
    parser.infix(TokenKind::Percent, BindingPower::Multiplicative.into(), parse_binary_expr);

    // Call and list access
    parser.infix(TokenKind::OpenParen, BindingPower::Call.into(), parse_call_expr);
    parser.infix(TokenKind::OpenBracket, BindingPower::Call.into(), parse_index_expr);

    // Literals and symbols
    parser.prefix(TokenKind::Identifier, parse_identifier_expr);
    parser.prefix(TokenKind::Number, parse_number_expr);
    parser.prefix(TokenKind::String, parse_string_expr);
    parser.prefix(TokenKind::True, parse_boolean_expr);
    parser.prefix(TokenKind::False, parse_boolean_expr);
    parser.prefix(TokenKind::OpenParen, parse_arguments_expr);
    parser.prefix(TokenKind::OpenBracket, parse_list_expr);
    parser.prefix(TokenKind::Dash, parse_prefix_expr);
    parser.prefix(TokenKind::Not, parse_prefix_expr);
}
