use std::io::Write;

use log::{debug, info};

use crate::{
    analyzer::{
        context::AnalysisContext,
        traverse::{traverse, Visitor},
    },
    ast::{
        ast::{ExprKind, NodeId, NodeKind, StmtKind, SyntaxTree, TreeNode},
        types::DataType,
    },
    errors::{
        errors::{Error, ErrorImpl},
        reporter::Reporter,
    },
    symtab::symtab::SymbolStore,
};

/// Post-visit pass rejecting values taken from void functions.
///
/// Only the cases C-minus can express are checked: a void call used as an
/// arithmetic or relational operand and a void call on the right of `=`.
pub struct TypeChecker<'a, S: SymbolStore, W: Write> {
    store: &'a S,
    reporter: &'a mut Reporter<W>,
}

impl<'a, S: SymbolStore, W: Write> TypeChecker<'a, S, W> {
    pub fn new(store: &'a S, reporter: &'a mut Reporter<W>) -> Self {
        TypeChecker { store, reporter }
    }

    /// The call node behind `slot`, if it calls a function declared void.
    fn void_call<'t>(&self, tree: &'t SyntaxTree, node: &TreeNode, slot: usize) -> Option<&'t TreeNode> {
        let child = tree.node(node.child(slot)?);
        if !child.kind.is_expr(ExprKind::Call) {
            return None;
        }

        let name = child.name()?;
        match self.store.function_type(name) {
            Some(DataType::Void) => Some(child),
            _ => None,
        }
    }

    fn check_operation(&mut self, tree: &SyntaxTree, op: &TreeNode) {
        let Some(call) = self.void_call(tree, op, 0).or_else(|| self.void_call(tree, op, 1)) else {
            return;
        };

        let line = op.child(0).map(|left| tree.node(left).line).unwrap_or(op.line);
        debug!("void operand {:?} at line {}", call.name(), line);

        self.reporter.report(Error::at_line(
            ErrorImpl::VoidOperand { function: call.name().unwrap_or_default().to_string() },
            line,
        ));
    }

    fn check_assignment(&mut self, tree: &SyntaxTree, assign: &TreeNode) {
        let Some(call) = self.void_call(tree, assign, 1) else {
            return;
        };

        self.reporter.report(Error::at_line(
            ErrorImpl::VoidAssignment { function: call.name().unwrap_or_default().to_string() },
            call.line,
        ));
    }
}

impl<S: SymbolStore, W: Write> Visitor for TypeChecker<'_, S, W> {
    fn post_visit(&mut self, tree: &SyntaxTree, id: NodeId, _ctx: &mut AnalysisContext) {
        let node = tree.node(id);

        match node.kind {
            NodeKind::Expr(ExprKind::Op) => self.check_operation(tree, node),
            NodeKind::Stmt(StmtKind::Assign) => self.check_assignment(tree, node),
            NodeKind::Stmt(StmtKind::If | StmtKind::While | StmtKind::Return | StmtKind::Compound) => {}
            NodeKind::Expr(
                ExprKind::Const
                | ExprKind::Id
                | ExprKind::Var
                | ExprKind::Type
                | ExprKind::Param
                | ExprKind::Func
                | ExprKind::Call,
            ) => {}
        }
    }
}

/// Runs the void-misuse checks over the whole tree. Errors go to `reporter`.
pub fn type_check<S: SymbolStore, W: Write>(
    tree: &SyntaxTree,
    ctx: &mut AnalysisContext,
    store: &S,
    reporter: &mut Reporter<W>,
) {
    info!("checking types");

    let mut checker = TypeChecker::new(store, reporter);
    traverse(tree, tree.root(), &mut checker, ctx);
}
