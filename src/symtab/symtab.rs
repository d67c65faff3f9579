use std::{collections::HashMap, fmt::Display, io::{self, Write}};

use log::trace;

use crate::ast::types::DataType;

/// Scope name of symbols visible everywhere.
pub const GLOBAL_SCOPE: &str = "global";

/// Location passed for use sites and re-declarations: no storage is reserved.
pub const USE_SITE: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Function,
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Variable => write!(f, "var"),
            SymbolKind::Function => write!(f, "func"),
        }
    }
}

/// Storage interface used by semantic analysis.
///
/// Lookups are by name only; any scope filtering is up to the implementation.
pub trait SymbolStore {
    /// Inserts a new entry or records another reference to an existing one.
    fn insert(&mut self, name: &str, line: u32, location: usize, scope: &str, data_type: DataType, kind: SymbolKind);
    /// Memory location of the entry for `name`, if one exists.
    fn lookup(&self, name: &str) -> Option<usize>;
    /// Location and kind of the entry `name` refers to from inside `scope`:
    /// one declared in `scope` itself, else a global one.
    fn lookup_in_scope(&self, name: &str, scope: &str) -> Option<(usize, SymbolKind)>;
    /// Data type recorded for `name`.
    fn function_type(&self, name: &str) -> Option<DataType>;
    /// Whether a function called `name` has been declared in global scope.
    fn has_entry_point(&self, name: &str) -> bool;
    /// Renders the whole table.
    fn print_table(&self, out: &mut dyn Write) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub scope: String,
    pub kind: SymbolKind,
    pub data_type: DataType,
    pub location: usize,
    pub lines: Vec<u32>,
}

/// Default [`SymbolStore`]: entries in creation order, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: HashMap<String, Vec<usize>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Most recently created entry for `name`, in any scope.
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.by_name
            .get(name)
            .and_then(|indices| indices.last())
            .map(|&index| &self.symbols[index])
    }

    /// Entry for `name` declared exactly in `scope`.
    pub fn get_in_scope(&self, name: &str, scope: &str) -> Option<&Symbol> {
        self.visible_index(name, scope, false)
            .map(|index| &self.symbols[index])
    }

    fn visible_index(&self, name: &str, scope: &str, include_global: bool) -> Option<usize> {
        let indices = self.by_name.get(name)?;

        indices
            .iter()
            .rev()
            .find(|&&index| self.symbols[index].scope == scope)
            .or_else(|| {
                if include_global {
                    indices.iter().rev().find(|&&index| self.symbols[index].scope == GLOBAL_SCOPE)
                } else {
                    None
                }
            })
            .copied()
    }

    fn create(&mut self, symbol: Symbol) {
        trace!("new symbol {} in {} at {}", symbol.name, symbol.scope, symbol.location);

        self.by_name
            .entry(symbol.name.clone())
            .or_default()
            .push(self.symbols.len());
        self.symbols.push(symbol);
    }
}

impl SymbolStore for SymbolTable {
    fn insert(&mut self, name: &str, line: u32, location: usize, scope: &str, data_type: DataType, kind: SymbolKind) {
        if location == USE_SITE {
            if let Some(index) = self.visible_index(name, scope, true) {
                self.symbols[index].lines.push(line);
                return;
            }
        }

        self.create(Symbol {
            name: name.to_string(),
            scope: scope.to_string(),
            kind,
            data_type,
            location,
            lines: vec![line],
        });
    }

    fn lookup(&self, name: &str) -> Option<usize> {
        self.get(name).map(|symbol| symbol.location)
    }

    fn lookup_in_scope(&self, name: &str, scope: &str) -> Option<(usize, SymbolKind)> {
        self.visible_index(name, scope, true)
            .map(|index| (self.symbols[index].location, self.symbols[index].kind))
    }

    fn function_type(&self, name: &str) -> Option<DataType> {
        self.get(name).map(|symbol| symbol.data_type)
    }

    fn has_entry_point(&self, name: &str) -> bool {
        self.by_name
            .get(name)
            .map(|indices| {
                indices.iter().any(|&index| {
                    let symbol = &self.symbols[index];
                    symbol.kind == SymbolKind::Function && symbol.scope == GLOBAL_SCOPE
                })
            })
            .unwrap_or(false)
    }

    fn print_table(&self, out: &mut dyn Write) -> io::Result<()> {
        let rule = "-".repeat(72);

        writeln!(out, "{}", rule)?;
        writeln!(out, "{:<10} {:<10} {:<6} {:<9} {:<8} Lines", "Name", "Scope", "Kind", "Data Type", "Location")?;
        writeln!(out, "{}", rule)?;

        for symbol in &self.symbols {
            write!(
                out,
                "{:<10} {:<10} {:<6} {:<9} {:<8}",
                symbol.name,
                symbol.scope,
                symbol.kind.to_string(),
                symbol.data_type.to_string(),
                symbol.location
            )?;
            for line in &symbol.lines {
                write!(out, " {:>3}", line)?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}
