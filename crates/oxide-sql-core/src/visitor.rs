//! AST traversal.
//!
//! [`Ast::accept`] walks a subtree depth first. For every node it calls
//! [`Visitor::visit`]; when the node is a table source it also calls the
//! role hook [`Visitor::visit_table_source`]. Children are visited only if
//! every hook returned `true`, in [`NodeKind::slots`] order. The matching
//! `end_visit` hooks run afterwards whatever the hooks returned.

use std::collections::BTreeMap;

use tracing::trace;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::hash::name_hash;

/// Callbacks for [`Ast::accept`].
///
/// Implementors dispatch on the node kind with a `match` on
/// [`Ast::kind`]; every method has a no-op default.
pub trait Visitor {
    /// Called before the children of `id`. Returning `false` skips them.
    fn visit(&mut self, _ast: &Ast, _id: NodeId) -> bool {
        true
    }

    /// Called after the children of `id`.
    fn end_visit(&mut self, _ast: &Ast, _id: NodeId) {}

    /// Called after [`Visitor::visit`] for table sources. Returning
    /// `false` skips the children.
    fn visit_table_source(&mut self, _ast: &Ast, _id: NodeId) -> bool {
        true
    }

    /// Called before [`Visitor::end_visit`] for table sources.
    fn end_visit_table_source(&mut self, _ast: &Ast, _id: NodeId) {}
}

impl Ast {
    /// Walks the subtree rooted at `id` with `visitor`.
    pub fn accept<V: Visitor + ?Sized>(&self, id: NodeId, visitor: &mut V) {
        let table_source = self.kind(id).is_table_source();
        let mut descend = visitor.visit(self, id);
        if table_source {
            descend &= visitor.visit_table_source(self, id);
        }
        if descend {
            for child in self.children(id) {
                self.accept(child, visitor);
            }
        } else {
            trace!(node = %id, kind = self.kind(id).name(), "visitor skipped children");
        }
        if table_source {
            visitor.end_visit_table_source(self, id);
        }
        visitor.end_visit(self, id);
    }
}

/// Collects the names of the tables a statement reads, in first-seen
/// order, without duplicates. Names bound by `WITH` are left out.
#[derive(Debug, Clone, Default)]
pub struct TableCollector {
    tables: Vec<String>,
    ctes: Vec<u64>,
}

impl TableCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the collector over `id` and returns the table names.
    #[must_use]
    pub fn collect(ast: &Ast, id: NodeId) -> Vec<String> {
        let mut collector = Self::new();
        ast.accept(id, &mut collector);
        collector.into_tables()
    }

    /// Returns the collected names.
    #[must_use]
    pub fn into_tables(self) -> Vec<String> {
        let ctes = self.ctes;
        self.tables
            .into_iter()
            .filter(|t| !ctes.contains(&name_hash(t)))
            .collect()
    }
}

impl Visitor for TableCollector {
    fn visit(&mut self, ast: &Ast, id: NodeId) -> bool {
        if let NodeKind::WithEntry { name, .. } = ast.kind(id) {
            self.ctes.push(name_hash(name));
        }
        true
    }

    fn visit_table_source(&mut self, ast: &Ast, id: NodeId) -> bool {
        if let NodeKind::ExprTableSource { expr, .. } = ast.kind(id) {
            if matches!(
                ast.kind(*expr),
                NodeKind::Identifier(_) | NodeKind::Property { .. }
            ) {
                let name = ast.to_sql(*expr);
                if !self.tables.contains(&name) {
                    self.tables.push(name);
                }
            }
        }
        true
    }
}

/// Counts visited nodes by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCounter {
    /// Count per [`NodeKind::name`].
    pub by_kind: BTreeMap<&'static str, usize>,
    /// Number of table-source nodes.
    pub table_sources: usize,
}

impl NodeCounter {
    /// Returns the total number of visited nodes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_kind.values().sum()
    }
}

impl Visitor for NodeCounter {
    fn visit(&mut self, ast: &Ast, id: NodeId) -> bool {
        *self.by_kind.entry(ast.kind(id).name()).or_default() += 1;
        true
    }

    fn visit_table_source(&mut self, _ast: &Ast, _id: NodeId) -> bool {
        self.table_sources += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip_binary: bool,
    }

    impl Visitor for Recorder {
        fn visit(&mut self, ast: &Ast, id: NodeId) -> bool {
            self.events.push(format!("visit {}", ast.kind(id).name()));
            !(self.skip_binary && matches!(ast.kind(id), NodeKind::Binary { .. }))
        }

        fn end_visit(&mut self, ast: &Ast, id: NodeId) {
            self.events.push(format!("end {}", ast.kind(id).name()));
        }

        fn visit_table_source(&mut self, ast: &Ast, id: NodeId) -> bool {
            self.events.push(format!("table {}", ast.kind(id).name()));
            true
        }

        fn end_visit_table_source(&mut self, ast: &Ast, id: NodeId) {
            self.events.push(format!("end table {}", ast.kind(id).name()));
        }
    }

    fn sample(ast: &mut Ast) -> NodeId {
        let a = ast.alloc(NodeKind::Identifier(String::from("a")));
        let b = ast.alloc(NodeKind::Integer(1));
        ast.alloc(NodeKind::Binary {
            op: BinaryOp::Equality,
            left: a,
            right: b,
        })
    }

    #[test]
    fn test_visit_order() {
        let mut ast = Ast::new();
        let root = sample(&mut ast);
        let mut recorder = Recorder::default();
        ast.accept(root, &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "visit Binary",
                "visit Identifier",
                "end Identifier",
                "visit Integer",
                "end Integer",
                "end Binary",
            ]
        );
    }

    #[test]
    fn test_skip_children_still_ends() {
        let mut ast = Ast::new();
        let root = sample(&mut ast);
        let mut recorder = Recorder {
            skip_binary: true,
            ..Recorder::default()
        };
        ast.accept(root, &mut recorder);
        assert_eq!(recorder.events, vec!["visit Binary", "end Binary"]);
    }

    #[test]
    fn test_table_source_role_hook() {
        let mut ast = Ast::new();
        let name = ast.alloc(NodeKind::Identifier(String::from("t")));
        let table = ast.alloc(NodeKind::ExprTableSource {
            expr: name,
            alias: None,
        });
        let mut recorder = Recorder::default();
        ast.accept(table, &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "visit ExprTableSource",
                "table ExprTableSource",
                "visit Identifier",
                "end Identifier",
                "end table ExprTableSource",
                "end ExprTableSource",
            ]
        );

        let mut counter = NodeCounter::default();
        ast.accept(table, &mut counter);
        assert_eq!(counter.total(), 2);
        assert_eq!(counter.table_sources, 1);
    }
}
