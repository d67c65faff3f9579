//! Semantic analysis.
//!
//! A generic [`traverse::traverse`] drives [`traverse::Visitor`] passes over
//! the syntax tree. [`builder::SymbolTableBuilder`] fills the symbol table
//! and [`analyzer::build_symbol_table`] runs the whole phase.

pub mod analyzer;
pub mod builder;
pub mod context;
pub mod traverse;

#[cfg(test)]
mod tests;
