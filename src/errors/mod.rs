//! Error types and error handling for the front end.
//!
//! This module defines the error types shared by the lexer and the parser.
//! It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing and parsing failures
//! - Helpful error messages and suggestions

pub mod errors;
