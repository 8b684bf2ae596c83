//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains a Pratt parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. The engine is grammar agnostic:
//!
//! - Prefix (null denotation) handlers start expressions
//! - Infix (left denotation) handlers extend them, gated by binding power
//! - Blocks are delimited by indentation rather than braces
//!
//! The tila grammar itself is a set of handlers registered by
//! `lookups::create_token_lookups`.

pub mod config;
pub mod expr;
pub mod indentation;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
