//! Error types and diagnostic reporting.
//!
//! Front-end errors (lexing, parsing) are fatal and travel as `Result`s.
//! Semantic problems use the same `Error` type but are collected by a
//! [`reporter::Reporter`], which keeps analysis going after each one.

pub mod errors;
pub mod reporter;

#[cfg(test)]
mod tests;
