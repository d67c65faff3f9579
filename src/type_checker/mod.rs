//! Type checking over the syntax tree.
//!
//! Runs after the symbol table is built and relies on it for the return
//! type of every called function.

pub mod type_checker;
