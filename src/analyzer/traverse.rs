use log::trace;

use crate::ast::ast::{ExprKind, NodeId, SyntaxTree};

use super::context::{AnalysisContext, Scope};

/// Per-node actions of one traversal pass. Both default to doing nothing.
pub trait Visitor {
    fn pre_visit(&mut self, _tree: &SyntaxTree, _node: NodeId, _ctx: &mut AnalysisContext) {}
    fn post_visit(&mut self, _tree: &SyntaxTree, _node: NodeId, _ctx: &mut AnalysisContext) {}
}

/// Walks `node`, its children and then its siblings.
///
/// Each node gets `pre_visit` before its children and `post_visit` after them.
/// A node whose first child is a function declaration switches the scope to
/// that function for its whole subtree; the scope returns to global once the
/// subtree is done.
///
/// # Arguments
///
/// * `tree` - The tree being walked
/// * `node` - First node of the sibling chain; `None` walks nothing
/// * `visitor` - The pass to run
/// * `ctx` - Current scope and location counter
pub fn traverse<V: Visitor>(tree: &SyntaxTree, node: Option<NodeId>, visitor: &mut V, ctx: &mut AnalysisContext) {
    let mut current = node;

    while let Some(id) = current {
        let entered_function = enter_function(tree, id, ctx);

        visitor.pre_visit(tree, id, ctx);

        for child in tree.node(id).children {
            traverse(tree, child, visitor, ctx);
        }

        if entered_function {
            trace!("leaving scope {}", ctx.scope);
            ctx.scope = Scope::Global;
        }

        visitor.post_visit(tree, id, ctx);

        current = tree.node(id).sibling;
    }
}

fn enter_function(tree: &SyntaxTree, id: NodeId, ctx: &mut AnalysisContext) -> bool {
    let function = tree
        .node(id)
        .child(0)
        .map(|child| tree.node(child))
        .filter(|child| child.kind.is_expr(ExprKind::Func));

    match function {
        Some(function) => {
            let name = function.name().unwrap_or_default().to_string();
            trace!("entering scope {}", name);
            ctx.scope = Scope::Function(name);
            true
        }
        None => false,
    }
}
