use std::{collections::HashSet, io::Write};

use log::debug;

use crate::{
    ast::{
        ast::{ExprKind, NodeId, NodeKind, StmtKind, SyntaxTree, TreeNode},
        types::DataType,
    },
    errors::{
        errors::{Error, ErrorImpl},
        reporter::Reporter,
    },
    symtab::symtab::{SymbolKind, SymbolStore, GLOBAL_SCOPE, USE_SITE},
};

use super::{context::AnalysisContext, traverse::Visitor};

/// Functions every program may call without declaring them.
pub const BUILTINS: [&str; 2] = ["input", "output"];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Pre-visit pass that fills the symbol table.
///
/// Declarations reserve locations from the context's counter; uses are
/// recorded at [`USE_SITE`]. Names resolve through
/// [`SymbolStore::lookup_in_scope`], so a local of one function is invisible
/// from another. Assignment targets are remembered in `registered` so the
/// identifier rule does not record them a second time.
pub struct SymbolTableBuilder<'a, S: SymbolStore, W: Write> {
    store: &'a mut S,
    reporter: &'a mut Reporter<W>,
    registered: HashSet<NodeId>,
}

impl<'a, S: SymbolStore, W: Write> SymbolTableBuilder<'a, S, W> {
    pub fn new(store: &'a mut S, reporter: &'a mut Reporter<W>) -> Self {
        SymbolTableBuilder {
            store,
            reporter,
            registered: HashSet::new(),
        }
    }

    pub fn is_registered(&self, node: NodeId) -> bool {
        self.registered.contains(&node)
    }

    fn register_assignment(&mut self, tree: &SyntaxTree, assign: &TreeNode, ctx: &AnalysisContext) {
        let Some(target_id) = assign.child(0) else {
            return;
        };
        let name = tree.node(target_id).name().unwrap_or_default();

        match self.store.lookup_in_scope(name, ctx.scope.as_str()) {
            None => self.reporter.report(Error::at_line(
                ErrorImpl::VariableNotDeclared { variable: name.to_string() },
                assign.line,
            )),
            Some((_, SymbolKind::Function)) => self.reporter.report(Error::at_line(
                ErrorImpl::NameUsedForFunction { name: name.to_string() },
                assign.line,
            )),
            Some((_, SymbolKind::Variable)) => {
                self.store.insert(name, assign.line, USE_SITE, ctx.scope.as_str(), DataType::Int, SymbolKind::Variable);
            }
        }

        self.registered.insert(target_id);
    }

    fn register_use(&mut self, id: NodeId, node: &TreeNode, ctx: &AnalysisContext) {
        if self.is_registered(id) {
            return;
        }
        let name = node.name().unwrap_or_default();

        if self.store.lookup_in_scope(name, ctx.scope.as_str()).is_none() {
            self.reporter.report(Error::at_line(
                ErrorImpl::VariableNotDeclared { variable: name.to_string() },
                node.line,
            ));
        } else {
            // Uses are recorded with the function kind; the store only keeps the kind of a fresh entry.
            self.store.insert(name, node.line, USE_SITE, ctx.scope.as_str(), DataType::Int, SymbolKind::Function);
        }
    }

    fn declare(&mut self, tree: &SyntaxTree, type_node: &TreeNode, ctx: &mut AnalysisContext) {
        let Some(declared_id) = type_node.child(0) else {
            return;
        };
        let declared = tree.node(declared_id);

        match declared.kind {
            NodeKind::Expr(ExprKind::Var) => self.declare_variable(tree, type_node, declared, ctx),
            NodeKind::Expr(ExprKind::Func) => self.declare_function(declared, ctx),
            _ => {}
        }
    }

    /// A name already visible from the current scope is not given new storage.
    fn declare_variable(&mut self, tree: &SyntaxTree, type_node: &TreeNode, var: &TreeNode, ctx: &mut AnalysisContext) {
        let name = var.name().unwrap_or_default();
        let scope = ctx.scope.to_string();

        match self.store.lookup_in_scope(name, &scope) {
            Some((_, SymbolKind::Function)) => {
                self.reporter.report(Error::at_line(
                    ErrorImpl::NameUsedForFunction { name: name.to_string() },
                    type_node.line,
                ));
                return;
            }
            Some((_, SymbolKind::Variable)) => {
                debug!("{} redeclared in {}, no storage reserved", name, scope);
                self.store.insert(name, type_node.line, USE_SITE, &scope, DataType::Int, SymbolKind::Variable);
                return;
            }
            None => {}
        }

        let size = match var.child(0) {
            Some(length) => tree
                .node(length)
                .attr
                .value()
                .and_then(|value| usize::try_from(value).ok())
                .unwrap_or(1),
            None => 1,
        };
        let location = ctx.allocate(size);

        debug!("{} declared in {} at {} ({} cells)", name, scope, location, size);
        self.store.insert(name, type_node.line, location, &scope, DataType::Int, SymbolKind::Variable);
    }

    fn declare_function(&mut self, func: &TreeNode, ctx: &mut AnalysisContext) {
        let name = func.name().unwrap_or_default();

        if self.store.lookup_in_scope(name, GLOBAL_SCOPE).is_some() {
            self.reporter.report(Error::at_line(
                ErrorImpl::FunctionAlreadyDeclared { function: name.to_string() },
                func.line,
            ));
            return;
        }

        let location = ctx.allocate(1);
        debug!("function {} declared at {}", name, location);
        self.store.insert(name, func.line, location, GLOBAL_SCOPE, func.data_type, SymbolKind::Function);
    }

    fn register_call(&mut self, call: &TreeNode, ctx: &AnalysisContext) {
        let name = call.name().unwrap_or_default();

        if self.store.lookup_in_scope(name, ctx.scope.as_str()).is_none() && !is_builtin(name) {
            self.reporter.report(Error::at_line(
                ErrorImpl::FunctionNotDeclared { function: name.to_string() },
                call.line,
            ));
        } else {
            self.store.insert(name, call.line, USE_SITE, ctx.scope.as_str(), DataType::Unset, SymbolKind::Function);
        }
    }

    fn declare_param(&mut self, param: &TreeNode, ctx: &mut AnalysisContext) {
        let name = param.name().unwrap_or_default();
        let location = ctx.allocate(1);

        debug!("parameter {} of {} at {}", name, ctx.scope, location);
        self.store.insert(name, param.line, location, ctx.scope.as_str(), DataType::Int, SymbolKind::Variable);
    }
}

impl<S: SymbolStore, W: Write> Visitor for SymbolTableBuilder<'_, S, W> {
    fn pre_visit(&mut self, tree: &SyntaxTree, id: NodeId, ctx: &mut AnalysisContext) {
        let node = tree.node(id);

        match node.kind {
            NodeKind::Stmt(StmtKind::Assign) => self.register_assignment(tree, node, ctx),
            NodeKind::Stmt(StmtKind::If | StmtKind::While | StmtKind::Return | StmtKind::Compound) => {}
            NodeKind::Expr(ExprKind::Id) => self.register_use(id, node, ctx),
            NodeKind::Expr(ExprKind::Type) => self.declare(tree, node, ctx),
            NodeKind::Expr(ExprKind::Call) => self.register_call(node, ctx),
            NodeKind::Expr(ExprKind::Param) => self.declare_param(node, ctx),
            NodeKind::Expr(ExprKind::Op | ExprKind::Const | ExprKind::Var | ExprKind::Func) => {}
        }
    }
}
