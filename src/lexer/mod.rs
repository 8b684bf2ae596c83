//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of reserved words, identifiers, literals and operators
//! - Line and column tracking, which the parser uses for indentation
//! - Line breaks as tokens, comments and whitespace skipping

pub mod lexer;
pub mod tokens;
