//! A thin, borrowed navigation wrapper around [`ASTNode<AstNode>`], giving the transformer and
//! compiler the single typed lookup helper the design notes ask for instead of a set of
//! per-name accessors (`service_fragment`, `block`, `if_statement`, ...).

use crate::story::grammar::AstNode;
use crate::{ASTNode, Code};

#[derive(Clone, Copy)]
pub struct Tree<'c, 't> {
    node: &'t ASTNode<AstNode>,
    code: &'c Code<'c>,
}

impl<'c, 't> Tree<'c, 't> {
    pub fn new(node: &'t ASTNode<AstNode>, code: &'c Code<'c>) -> Self {
        Self { node, code }
    }

    pub fn data(&self) -> AstNode {
        self.node.node
    }

    pub fn raw(&self) -> &'t ASTNode<AstNode> {
        self.node
    }

    pub fn children(&self) -> impl Iterator<Item = Tree<'c, 't>> + 't {
        let code = self.code;
        self.node.children.iter().map(move |child| Tree::new(child, code))
    }

    pub fn child(&self, i: usize) -> Option<Tree<'c, 't>> {
        self.node.children.get(i).map(|n| Tree::new(n, self.code))
    }

    /// First descendant (depth-first, pre-order) whose tag equals `name`, self included.
    pub fn node(&self, name: AstNode) -> Option<Tree<'c, 't>> {
        self.node
            .find_tree_with_node(&name)
            .map(|n| Tree::new(n, self.code))
    }

    /// Lazy-in-spirit (collected, but never over more than one subtree) sequence of every
    /// descendant with that tag.
    pub fn find_data(&self, name: AstNode) -> impl Iterator<Item = Tree<'c, 't>> + 't {
        let code = self.code;
        self.node
            .list_tree_with_token(&name)
            .into_iter()
            .map(move |n| Tree::new(n, code))
    }

    /// The node's source line number (1-indexed), computed on demand from its byte offset.
    pub fn line(&self) -> usize {
        self.code.obtain_position(self.node.start).line
    }

    /// The raw source slice this node spans.
    pub fn text(&self) -> &'c str {
        std::str::from_utf8(&self.code.value[self.node.start..self.node.end]).unwrap_or("")
    }
}
