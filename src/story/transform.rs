//! Bottom-up rewrite of the concrete syntax tree into the normalized tree the compiler consumes.
//!
//! Applied once, after parsing completes, as a distinct pass over the owned [`ASTNode<AstNode>`]
//! forest — not interleaved with grammar reductions, since this crate's own [`DefaultParser`]
//! already hands back a complete concrete tree before any caller-side pass runs.

use crate::story::error::StoryError;
use crate::story::grammar::AstNode;
use crate::story::tree::Tree;
use crate::{ASTNode, Code};

pub fn transform(node: ASTNode<AstNode>, code: &Code) -> Result<ASTNode<AstNode>, StoryError> {
    let children = node
        .children
        .into_iter()
        .map(|child| transform(child, code))
        .collect::<Result<Vec<_>, _>>()?;
    let node = ASTNode::new(node.node, node.start, node.end, node.bound, children);

    match node.node {
        AstNode::Argument => transform_argument(node, code),
        AstNode::Assignment => transform_assignment(node, code),
        AstNode::Command | AstNode::ServiceFragment => transform_service_block(node),
        _ => Ok(node),
    }
}

/// Short-hand argument expansion: when an `argument` node was produced from a bare value (no
/// `name: value` pair), synthesize the name as that value's own leading identifier sub-tree
/// rather than requiring the grammar to spell the name out twice. The synthesized name node
/// simply reuses that identifier's existing byte span, so later stages read it back through the
/// ordinary [`Tree::text`] path instead of a side channel.
///
/// A bare-token match (a value with no identifier sub-child at all) has already been rejected at
/// parse time by the grammar-level validator on `argument_shorthand` — see `grammar.rs` — so by
/// the time this pass runs, every single-child `argument` node is guaranteed to resolve a name.
fn transform_argument(node: ASTNode<AstNode>, code: &Code) -> Result<ASTNode<AstNode>, StoryError> {
    if node.children.len() != 1 {
        return Ok(node);
    }
    let value = node.children.into_iter().next().unwrap();
    let name_span = Tree::new(&value, code)
        .node(AstNode::Identifier)
        .map(|t| (t.raw().start, t.raw().end))
        .ok_or_else(|| {
            StoryError::syntax("generic", code.obtain_position(value.start).line, None)
        })?;
    let name_leaf = ASTNode::leaf(AstNode::Identifier, name_span.0, name_span.1, None);
    Ok(ASTNode::new(
        AstNode::Argument,
        name_leaf.start,
        value.end,
        None,
        vec![name_leaf, value],
    ))
}

/// Rejects identifiers containing `/` or `-`, per the `variables-backslash`/`variables-dash`
/// classifiers.
fn transform_assignment(
    node: ASTNode<AstNode>,
    code: &Code,
) -> Result<ASTNode<AstNode>, StoryError> {
    let tree = Tree::new(&node, code);
    if let Some(path) = tree.node(AstNode::Path) {
        if let Some(ident) = path.node(AstNode::Identifier) {
            let lexeme = ident.text();
            let line = ident.line();
            if lexeme.contains('/') {
                return Err(StoryError::syntax(
                    "variables-backslash",
                    line,
                    Some(lexeme.to_string()),
                ));
            }
            if lexeme.contains('-') {
                return Err(StoryError::syntax(
                    "variables-dash",
                    line,
                    Some(lexeme.to_string()),
                ));
            }
        }
    }
    Ok(node)
}

/// Hoists indented continuation arguments into the service call they belong to. In this
/// grammar a command's arguments are already attached to its `service_fragment` by the parser
/// (there is no separate indented-suite production for command continuations, unlike
/// conditional/loop bodies), so this pass is a pass-through for every tree the current grammar
/// can produce; it is kept as its own named step, rather than folded into the default branch,
/// so a future grammar extension that reintroduces an indented argument suite has a single place
/// to hoist it into the first child's arguments list.
fn transform_service_block(node: ASTNode<AstNode>) -> Result<ASTNode<AstNode>, StoryError> {
    Ok(node)
}
