use std::fmt::Display;

use super::types::{Attribute, DataType};

/// Number of child slots on every node.
pub const MAX_CHILDREN: usize = 3;

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Statement Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StmtKind {
    /// 0: condition, 1: then branch, 2: optional else branch
    If,
    /// 0: condition, 1: body
    While,
    /// 0: target `Id`, 1: value
    Assign,
    /// 0: optional value
    Return,
    /// 0: local declarations, 1: statements
    Compound,
}

/// Expression Types
///
/// Declarations are expression nodes as well: a `Type` node wraps the
/// declared `Var` or `Func`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// 0, 1: operands
    Op,
    Const,
    /// 0: optional index expression
    Id,
    /// 0: optional array length `Const`
    Var,
    /// 0: declared `Var` or `Func`
    Type,
    Param,
    /// 0: parameters, 1: body
    Func,
    /// 0: arguments
    Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Stmt(StmtKind),
    Expr(ExprKind),
}

impl NodeKind {
    pub fn is_expr(&self, kind: ExprKind) -> bool {
        *self == NodeKind::Expr(kind)
    }

    pub fn is_stmt(&self, kind: StmtKind) -> bool {
        *self == NodeKind::Stmt(kind)
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub attr: Attribute,
    pub children: [Option<NodeId>; MAX_CHILDREN],
    pub sibling: Option<NodeId>,
    pub line: u32,
    pub data_type: DataType,
}

impl TreeNode {
    pub fn new(kind: NodeKind, attr: Attribute, line: u32) -> Self {
        TreeNode {
            kind,
            attr,
            children: [None; MAX_CHILDREN],
            sibling: None,
            line,
            data_type: DataType::Unset,
        }
    }

    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn child(&self, slot: usize) -> Option<NodeId> {
        self.children.get(slot).copied().flatten()
    }

    /// The identifier carried by `Id`, `Var`, `Func`, `Call` and `Param` nodes.
    pub fn name(&self) -> Option<&str> {
        self.attr.name()
    }
}

/// Arena holding every node of one parsed program.
///
/// The root is the first node of the top-level declaration chain; the rest of
/// the program hangs off it through child and sibling links.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<TreeNode>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        SyntaxTree::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_node(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    pub fn set_child(&mut self, parent: NodeId, slot: usize, child: Option<NodeId>) {
        self.nodes[parent.0].children[slot] = child;
    }

    /// Node kind of a child slot, if the slot is filled.
    pub fn child_kind(&self, parent: NodeId, slot: usize) -> Option<NodeKind> {
        self.node(parent).child(slot).map(|child| self.node(child).kind)
    }

    /// Chains `nodes` through their sibling links and returns the head.
    pub fn link_siblings(&mut self, nodes: &[NodeId]) -> Option<NodeId> {
        for pair in nodes.windows(2) {
            self.nodes[pair[0].0].sibling = Some(pair[1]);
        }
        nodes.first().copied()
    }

    /// Iterates a sibling chain starting at `head`.
    pub fn siblings(&self, head: Option<NodeId>) -> Siblings<'_> {
        Siblings { tree: self, next: head }
    }
}

pub struct Siblings<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.node(current).sibling;
        Some(current)
    }
}
