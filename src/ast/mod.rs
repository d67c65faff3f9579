/// AST (Abstract Syntax Tree) module
/// Contains the syntax tree consumed by semantic analysis
///
/// Submodules:
/// - ast: Node kinds, tree nodes and the node arena
/// - types: Data types and node attributes
pub mod ast;
pub mod types;
