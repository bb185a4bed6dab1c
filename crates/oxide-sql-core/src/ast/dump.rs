//! Serializable tree view of an AST, used for JSON and indented output.

use std::fmt::Write;

use serde::Serialize;

use super::arena::Ast;
use super::node::NodeId;
use crate::lexer::Span;

/// A node and its subtree, detached from the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeDump {
    /// Node kind name.
    pub kind: &'static str,
    /// The node's own attribute, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Source span.
    pub span: Span,
    /// Children in traversal order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeDump>,
}

impl TreeDump {
    /// Renders the tree with two spaces of indentation per level.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let _ = write!(out, "{:indent$}{}", "", self.kind, indent = depth * 2);
        if let Some(label) = &self.label {
            let _ = write!(out, " {label}");
        }
        out.push('\n');
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
    }
}

impl Ast {
    /// Builds a [`TreeDump`] of the subtree rooted at `id`.
    #[must_use]
    pub fn dump(&self, id: NodeId) -> TreeDump {
        let node = self.node(id);
        TreeDump {
            kind: node.kind().name(),
            label: node.kind().label(),
            span: node.span(),
            children: node.kind().children().into_iter().map(|c| self.dump(c)).collect(),
        }
    }
}
