//! Symbol table storage.
//!
//! [`symtab::SymbolStore`] is the interface semantic analysis talks to;
//! [`symtab::SymbolTable`] is the in-memory implementation used by the driver.

pub mod symtab;
