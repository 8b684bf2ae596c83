//! Parser engine for building the Abstract Syntax Tree.
//!
//! This module contains the `Parser` struct and the program entry point.
//! The parser is a Pratt parser: it knows nothing about the grammar itself
//! and instead dispatches to prefix and infix handlers registered per token
//! kind, climbing while the next token binds tighter than the caller asked.
//!
//! It maintains:
//! - A forward-only cursor over a borrowed token slice
//! - A precedence table and a handler registry
//! - An indentation stack and whether the last consumed token was a line break
//! - How many brackets are open inside the innermost block

use log::{debug, info, trace};

use crate::{
    ast::ast::Node,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::{
    config::ParserConfig,
    indentation::Indentation,
    lookups::{create_token_lookups, HandlerRegistry, InfixHandler, PrecedenceTable, PrefixHandler},
    stmt::parse_block,
};

/// The parser engine, generic over the node type its handlers build.
///
/// Handlers receive `&mut Parser` and drive it through the public cursor
/// and indentation methods; the engine never looks inside an `N`.
pub struct Parser<'a, N> {
    /// The tokens being parsed
    tokens: &'a [Token],
    /// The source the tokens were produced from
    src: &'a str,
    /// Index of the current token, never decreases
    pos: usize,
    /// Whether the most recently consumed token was a line break
    last_nl: bool,
    /// Required indentation for each open block
    indentation: Indentation,
    /// Open brackets per block, innermost last. Line breaks are
    /// insignificant while the innermost count is non-zero.
    groups: Vec<usize>,
    precedences: PrecedenceTable,
    handlers: HandlerRegistry<'a, N>,
    /// Current nesting of `parse_expression`
    depth: usize,
    config: ParserConfig,
}

impl<'a, N> Parser<'a, N> {
    /// Creates a parser over `tokens` with empty tables and the default config.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Tokens to parse, borrowed for the parser's lifetime
    /// * `src` - The source text the tokens were lexed from
    pub fn new(tokens: &'a [Token], src: &'a str) -> Self {
        Parser::with_config(tokens, src, ParserConfig::default())
    }

    pub fn with_config(tokens: &'a [Token], src: &'a str, config: ParserConfig) -> Self {
        Parser {
            tokens,
            src,
            pos: 0,
            last_nl: false,
            indentation: Indentation::new(config.indent_width),
            groups: vec![0],
            precedences: PrecedenceTable::new(),
            handlers: HandlerRegistry::new(),
            depth: 0,
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    // Setup

    pub fn set_precedence(&mut self, kind: TokenKind, precedence: i32) {
        self.precedences.set(kind, precedence);
    }

    pub fn register_prefix(&mut self, kind: TokenKind, handler: PrefixHandler<'a, N>) {
        self.handlers.register_prefix(kind, handler);
    }

    pub fn register_infix(&mut self, kind: TokenKind, handler: InfixHandler<'a, N>) {
        self.handlers.register_infix(kind, handler);
    }

    /// Registers a prefix (null denotation) handler for a token.
    pub fn prefix(&mut self, kind: TokenKind, handler: PrefixHandler<'a, N>) {
        debug!("registering prefix parser for {}", kind);
        self.register_prefix(kind, handler);
    }

    /// Registers an infix (left denotation) handler together with its
    /// precedence, keeping both tables consistent.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `precedence` - The binding power of this operator
    /// * `handler` - The handler for this infix operator
    pub fn infix(&mut self, kind: TokenKind, precedence: i32, handler: InfixHandler<'a, N>) {
        debug!("registering infix parser for {} at {}", kind, precedence);
        self.set_precedence(kind, precedence);
        self.register_infix(kind, handler);
    }

    // Cursor

    /// Returns the current token without advancing.
    pub fn current(&self) -> Result<Token, Error> {
        self.tokens
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.end_of_input())
    }

    /// Returns the current token and advances past it.
    pub fn consume(&mut self) -> Result<Token, Error> {
        let token = self.current()?;
        self.pos += 1;
        self.last_nl = token.kind == TokenKind::Newline;
        Ok(token)
    }

    pub fn is_next(&self, kind: TokenKind) -> bool {
        matches!(self.tokens.get(self.pos), Some(token) if token.kind == kind)
    }

    /// Consumes the current token if it is of `kind`.
    pub fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.is_next(kind) {
            self.pos += 1;
            self.last_nl = kind == TokenKind::Newline;
            true
        } else {
            false
        }
    }

    /// Consumes and returns the current token, which must be of `kind`.
    /// On mismatch the cursor does not move.
    pub fn require(&mut self, kind: TokenKind) -> Result<Token, Error> {
        let token = self.current()?;
        if token.kind != kind {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    expected: kind,
                    found: token.kind,
                    lexeme: self.text(&token).to_string(),
                },
                token.span.start,
            ));
        }

        self.consume()
    }

    pub fn done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn last_was_newline(&self) -> bool {
        self.last_nl
    }

    /// Binding power of the current token.
    ///
    /// Zero when the input is exhausted or the kind has no entry. With
    /// `ParserConfig::line_breaks_end_expressions` it is also zero when the
    /// previous token was a line break, so a token that starts a line never
    /// continues the expression on the line before. Inside brackets line
    /// breaks are looked past instead.
    pub fn precedence(&self) -> i32 {
        if self.in_group() {
            return match self.tokens[self.pos..]
                .iter()
                .find(|token| token.kind != TokenKind::Newline)
            {
                Some(token) => self.precedences.get(token.kind),
                None => 0,
            };
        }

        if self.last_nl && self.config.line_breaks_end_expressions {
            return 0;
        }

        match self.tokens.get(self.pos) {
            Some(token) => self.precedences.get(token.kind),
            None => 0,
        }
    }

    pub fn precedence_of(&self, kind: TokenKind) -> i32 {
        self.precedences.get(kind)
    }

    /// The source text of `token`.
    pub fn text(&self, token: &Token) -> &'a str {
        token.text(self.src)
    }

    // Brackets

    /// Marks a bracket as open. Until the matching [`Parser::close_group`],
    /// line breaks inside expressions are skipped, except within an indented
    /// block opened in the meantime.
    pub fn open_group(&mut self) {
        if let Some(open) = self.groups.last_mut() {
            *open += 1;
        }
    }

    /// # Panics
    ///
    /// Panics if no bracket is open in the innermost block.
    pub fn close_group(&mut self) {
        match self.groups.last_mut() {
            Some(open) if *open > 0 => *open -= 1,
            _ => panic!("close_group called without a matching open_group"),
        }
    }

    pub fn in_group(&self) -> bool {
        matches!(self.groups.last(), Some(open) if *open > 0)
    }

    fn skip_grouped_line_breaks(&mut self) {
        if self.in_group() {
            while self.match_token(TokenKind::Newline) {}
        }
    }

    // Indentation

    /// Opens a block one indentation step deeper and returns its level.
    pub fn increase_indentation(&mut self) -> u32 {
        let level = self.indentation.increase();
        self.groups.push(0);
        trace!("indentation increased to {}", level);
        level
    }

    /// Closes the innermost block.
    ///
    /// # Panics
    ///
    /// Panics if no block is open.
    pub fn decrease_indentation(&mut self) -> u32 {
        let level = self.indentation.decrease();
        self.groups.pop();
        trace!("indentation decreased to {}", level);
        level
    }

    pub fn indentation(&self) -> u32 {
        self.indentation.current()
    }

    /// Whether the current token sits at or beyond `column`.
    pub fn has_indentation(&self, column: u32) -> bool {
        matches!(self.tokens.get(self.pos), Some(token) if token.column() >= column)
    }

    // Expressions

    /// Parses an expression, extending it with infix handlers while the next
    /// token binds tighter than `min_precedence`.
    ///
    /// Operators at equal precedence associate to the left; an infix handler
    /// gets right associativity by parsing its right side at
    /// `precedence - 1`.
    pub fn parse_expression(&mut self, min_precedence: i32) -> Result<N, Error> {
        if self.depth >= self.config.max_depth {
            let position = self.current_position();
            return Err(Error::new(
                ErrorImpl::RecursionLimitExceeded {
                    limit: self.config.max_depth,
                },
                position,
            ));
        }

        self.depth += 1;
        let result = self.climb(min_precedence);
        self.depth -= 1;
        result
    }

    fn climb(&mut self, min_precedence: i32) -> Result<N, Error> {
        self.skip_grouped_line_breaks();
        let token = self.consume()?;
        trace!("prefix {} at {} (min {})", token.kind, token.span.start, min_precedence);

        let prefix = self.handlers.prefix(token.kind).ok_or_else(|| {
            Error::new(ErrorImpl::NoPrefixParser { kind: token.kind }, token.span.start)
        })?;
        let mut left = prefix(self, token)?;

        while !self.done() && self.precedence() > min_precedence {
            self.skip_grouped_line_breaks();
            let token = self.consume()?;
            trace!("infix {} at {} (min {})", token.kind, token.span.start, min_precedence);

            let infix = self.handlers.infix(token.kind).ok_or_else(|| {
                Error::new(ErrorImpl::NoInfixParser { kind: token.kind }, token.span.start)
            })?;
            left = infix(self, left, token)?;
        }

        Ok(left)
    }

    fn current_position(&self) -> Position {
        match self.tokens.get(self.pos) {
            Some(token) => token.span.start,
            None => self.end_position(),
        }
    }

    fn end_position(&self) -> Position {
        self.tokens
            .last()
            .map(|token| token.span.end)
            .unwrap_or_default()
    }

    fn end_of_input(&self) -> Error {
        Error::new(ErrorImpl::UnexpectedEndOfInput, self.end_position())
    }
}

/// Parses a token stream into the statements of a tila program.
///
/// This is the main entry point for parsing. It creates a parser, registers
/// the default grammar and parses statements at indentation zero until the
/// tokens run out.
///
/// # Arguments
///
/// * `tokens` - Tokens produced by the lexer
/// * `src` - The source text the tokens were lexed from
pub fn parse(tokens: &[Token], src: &str) -> Result<Vec<Node>, Error> {
    parse_with_config(tokens, src, ParserConfig::default())
}

pub fn parse_with_config(tokens: &[Token], src: &str, config: ParserConfig) -> Result<Vec<Node>, Error> {
    let mut parser = Parser::with_config(tokens, src, config);
    create_token_lookups(&mut parser);

    info!(
        "parsing {} tokens (indent width {})",
        tokens.len(),
        parser.config().indent_width
    );

    let body = parse_block(&mut parser, 0)?;

    info!("parsed {} statements", body.len());
    Ok(body)
}
