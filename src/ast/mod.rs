use lachs::Span;

pub mod expression;
pub mod node;
pub mod statement;

pub use node::{IdentRole, Node, NodeKind};

use statement::Statement;

/// Stable identity of a syntax node, assigned by the parser in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<Statement>,
    pub id: NodeId,
    pub position: Span,
}
