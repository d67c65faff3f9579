//! Lexical analysis module.
//!
//! Converts C-minus source text into a stream of tokens using an ordered
//! table of anchored regex patterns. Whitespace and both comment styles are
//! skipped; every token records the line it started on.

pub mod lexer;
pub mod tokens;
