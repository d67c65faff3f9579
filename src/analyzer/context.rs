use std::fmt::Display;

use crate::symtab::symtab::GLOBAL_SCOPE;

/// The scope names are flat: either global or the function being traversed.
/// Functions cannot nest, so entering one never needs to remember an outer function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Global,
    Function(String),
}

impl Scope {
    pub fn as_str(&self) -> &str {
        match self {
            Scope::Global => GLOBAL_SCOPE,
            Scope::Function(name) => name,
        }
    }

    pub fn is_global(&self) -> bool {
        *self == Scope::Global
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable state of one analysis run, threaded through every pass.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub scope: Scope,
    next_location: usize,
}

impl AnalysisContext {
    pub fn new() -> Self {
        AnalysisContext::default()
    }

    pub fn next_location(&self) -> usize {
        self.next_location
    }

    /// Reserves `size` consecutive locations and returns the first one.
    pub fn allocate(&mut self, size: usize) -> usize {
        let location = self.next_location;
        self.next_location += size;
        location
    }

    /// Back to location 0 and global scope, ready for an unrelated program.
    pub fn reset(&mut self) {
        self.next_location = 0;
        self.scope = Scope::Global;
    }
}
