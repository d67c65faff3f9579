//! Parser module for building the syntax tree.
//!
//! Declarations and statements are parsed by recursive descent; expressions
//! use a Pratt parser driven by NUD (null denotation) and LED (left
//! denotation) tables with binding powers for precedence.
//!
//! Node shapes follow the child-slot layout documented on
//! [`crate::ast::ast::StmtKind`] and [`crate::ast::ast::ExprKind`].

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
