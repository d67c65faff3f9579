use std::io::Write;

use log::{error, info};

use crate::{
    ast::{ast::SyntaxTree, types::DataType},
    errors::{
        errors::{Error, ErrorImpl},
        reporter::Reporter,
    },
    symtab::symtab::{SymbolKind, SymbolStore, GLOBAL_SCOPE},
    type_checker::type_checker::type_check,
};

use super::{
    builder::SymbolTableBuilder,
    context::AnalysisContext,
    traverse::traverse,
};

const ENTRY_POINT: &str = "main";

/// Semantic analysis of one parsed program.
///
/// Registers the built-in functions, builds the symbol table, checks void
/// misuse and the presence of `main`. When nothing was reported the symbol
/// table is written to the reporter's stream.
///
/// # Arguments
///
/// * `tree` - The parsed program
/// * `ctx` - Scope and location state; pass a fresh or reset context
/// * `store` - Receives every declaration and reference
/// * `reporter` - Collects diagnostics and receives the listing
///
/// # Returns
///
/// `true` when no diagnostic was reported.
pub fn build_symbol_table<S: SymbolStore, W: Write>(
    tree: &SyntaxTree,
    ctx: &mut AnalysisContext,
    store: &mut S,
    reporter: &mut Reporter<W>,
) -> bool {
    info!("building symbol table");

    register_builtins(ctx, store);

    let mut builder = SymbolTableBuilder::new(store, reporter);
    traverse(tree, tree.root(), &mut builder, ctx);

    type_check(tree, ctx, store, reporter);

    if !store.has_entry_point(ENTRY_POINT) {
        reporter.report(Error::at_line(ErrorImpl::MainNotDeclared, 0));
    }

    if reporter.failed() {
        info!("semantic analysis failed with {} error(s)", reporter.diagnostics().len());
        return false;
    }

    if let Err(err) = write_table(store, reporter.out()) {
        error!("failed to write symbol table: {}", err);
    }

    true
}

fn register_builtins<S: SymbolStore>(ctx: &mut AnalysisContext, store: &mut S) {
    store.insert("input", 0, ctx.allocate(1), GLOBAL_SCOPE, DataType::Int, SymbolKind::Function);
    store.insert("output", 0, ctx.allocate(1), GLOBAL_SCOPE, DataType::Void, SymbolKind::Function);
}

fn write_table<S: SymbolStore, W: Write>(store: &S, out: &mut W) -> std::io::Result<()> {
    write!(out, "\nSymbol table:\n\n")?;
    store.print_table(out)
}

/// Owns everything one analysis needs so it can be run again on another program.
pub struct Analyzer<S: SymbolStore + Default, W: Write> {
    ctx: AnalysisContext,
    store: S,
    reporter: Reporter<W>,
}

impl<S: SymbolStore + Default, W: Write> Analyzer<S, W> {
    pub fn new(out: W) -> Self {
        Analyzer {
            ctx: AnalysisContext::new(),
            store: S::default(),
            reporter: Reporter::new(out),
        }
    }

    /// Analyzes `tree`. Call [`Analyzer::reset`] first when reusing the analyzer.
    pub fn analyze(&mut self, tree: &SyntaxTree) -> bool {
        build_symbol_table(tree, &mut self.ctx, &mut self.store, &mut self.reporter)
    }

    /// Location counter back to 0, scope back to global and an empty store.
    /// Diagnostics and the failure flag are kept; see [`Reporter::clear`].
    pub fn reset(&mut self) {
        self.ctx.reset();
        self.store = S::default();
    }

    pub fn failed(&self) -> bool {
        self.reporter.failed()
    }

    pub fn diagnostics(&self) -> &[Error] {
        self.reporter.diagnostics()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.ctx
    }

    pub fn reporter_mut(&mut self) -> &mut Reporter<W> {
        &mut self.reporter
    }

    pub fn into_output(self) -> W {
        self.reporter.into_inner()
    }
}
