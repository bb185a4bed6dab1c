//! Arena storage for AST nodes.
//!
//! Nodes are owned by an [`Ast`] and addressed by [`NodeId`]. Ownership is
//! tree shaped: every node is referenced by at most one slot of one parent,
//! and its `parent` link always names that owner. The link is a lookup aid
//! only; nothing walks it to reach ownership.

use std::cell::OnceCell;
use std::hash::{Hash, Hasher};

use crate::hash::FnvHasher;
use crate::lexer::Span;

use super::node::{NodeId, NodeKind, SlotMut};
use super::types::StaticType;

/// Errors raised by structural edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AstError {
    /// The node is not a child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// A required slot cannot be emptied.
    #[error("node {child} fills a required slot of {parent}")]
    RequiredSlot { parent: NodeId, child: NodeId },
    /// The node already has an owner.
    #[error("node {0} is already attached")]
    AlreadyAttached(NodeId),
    /// The slot index is out of range or has the wrong shape.
    #[error("node {parent} has no slot {slot} of that shape")]
    NoSuchSlot { parent: NodeId, slot: usize },
    /// Attaching the node would make it its own ancestor.
    #[error("node {0} cannot own one of its ancestors")]
    Cycle(NodeId),
}

/// A node and its metadata.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    span: Span,
    parenthesized: bool,
    comments: Vec<String>,
    hash: OnceCell<u64>,
    static_type: OnceCell<Option<StaticType>>,
}

impl Node {
    fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            parent: None,
            span,
            parenthesized: false,
            comments: Vec::new(),
            hash: OnceCell::new(),
            static_type: OnceCell::new(),
        }
    }

    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the owning node, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns true if the node was written inside parentheses.
    #[must_use]
    pub const fn parenthesized(&self) -> bool {
        self.parenthesized
    }

    /// Returns the comments attached to the node.
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }
}

/// An arena of AST nodes.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Returns the number of allocated nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node was allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a node with an empty span.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.alloc_at(kind, Span::default())
    }

    /// Allocates a node and takes ownership of its children.
    ///
    /// The children must be unattached; their parent link is set to the
    /// new node.
    ///
    /// # Panics
    ///
    /// Panics if the arena outgrows `u32::MAX` nodes.
    pub fn alloc_at(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        assert!(id != NodeId::PLACEHOLDER, "AST arena is full");
        for child in kind.children() {
            debug_assert!(
                self.nodes[child.index()].parent.is_none(),
                "{child} is already attached"
            );
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(Node::new(kind, span));
        id
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the kind of `id`.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns the owner of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of `id` in traversal order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Returns the source span of `id`.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Returns true if `id` was written inside parentheses.
    #[must_use]
    pub fn is_parenthesized(&self, id: NodeId) -> bool {
        self.node(id).parenthesized
    }

    /// Marks `id` as written inside parentheses.
    pub fn set_parenthesized(&mut self, id: NodeId, parenthesized: bool) {
        self.nodes[id.index()].parenthesized = parenthesized;
    }

    /// Sets the source span of `id`.
    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.index()].span = span;
    }

    /// Appends comments to `id`.
    pub fn add_comments(&mut self, id: NodeId, comments: impl IntoIterator<Item = String>) {
        self.nodes[id.index()].comments.extend(comments);
    }

    /// Walks the parent links from `id` up to its root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |p| self.parent(*p))
    }

    /// Returns the root of the tree containing `id`.
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Changes attributes of `id` in place.
    ///
    /// `edit` may rewire child slots; children that leave the node are
    /// detached and children that enter it are adopted.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::AlreadyAttached`] if `edit` introduces a child
    /// owned elsewhere; the node is left unchanged in that case.
    pub fn update(&mut self, id: NodeId, edit: impl FnOnce(&mut NodeKind)) -> Result<(), AstError> {
        let before = self.children(id);
        let mut kind = self.kind(id).clone();
        edit(&mut kind);
        let after = kind.children();
        for child in &after {
            if !before.contains(child) {
                self.check_adoptable(id, *child)?;
            }
        }
        for child in &before {
            if !after.contains(child) {
                self.nodes[child.index()].parent = None;
            }
        }
        for child in &after {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes[id.index()].kind = kind;
        self.invalidate(id);
        Ok(())
    }

    /// Fills the `slot`-th single-valued slot of `parent` with `child`.
    ///
    /// Slots are numbered in [`NodeKind::slots`] order. Passing `None`
    /// clears an optional slot. The previous occupant is detached and
    /// returned.
    ///
    /// # Errors
    ///
    /// Fails if the slot does not exist or is a list, if `None` targets a
    /// required slot, or if `child` is owned elsewhere.
    pub fn set_child(
        &mut self,
        parent: NodeId,
        slot: usize,
        child: Option<NodeId>,
    ) -> Result<Option<NodeId>, AstError> {
        if let Some(child) = child {
            self.check_adoptable(parent, child)?;
        }
        let mut kind = self.kind(parent).clone();
        let previous = match kind.slots_mut().into_iter().nth(slot) {
            Some(SlotMut::One(current)) => {
                let Some(child) = child else {
                    return Err(AstError::RequiredSlot {
                        parent,
                        child: *current,
                    });
                };
                Some(std::mem::replace(current, child))
            }
            Some(SlotMut::Opt(current)) => std::mem::replace(current, child),
            _ => return Err(AstError::NoSuchSlot { parent, slot }),
        };
        if let Some(old) = previous {
            self.nodes[old.index()].parent = None;
        }
        if let Some(child) = child {
            self.nodes[child.index()].parent = Some(parent);
        }
        self.nodes[parent.index()].kind = kind;
        self.invalidate(parent);
        Ok(previous)
    }

    /// Appends `child` to the `slot`-th slot of `parent`, which must be a
    /// list.
    ///
    /// # Errors
    ///
    /// Fails if the slot is not a list or if `child` is owned elsewhere.
    pub fn push_child(&mut self, parent: NodeId, slot: usize, child: NodeId) -> Result<(), AstError> {
        self.check_adoptable(parent, child)?;
        let mut kind = self.kind(parent).clone();
        match kind.slots_mut().into_iter().nth(slot) {
            Some(SlotMut::Many(items)) => items.push(child),
            _ => return Err(AstError::NoSuchSlot { parent, slot }),
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].kind = kind;
        self.invalidate(parent);
        Ok(())
    }

    /// Replaces `old` with `new` wherever `parent` references it. `None`
    /// removes `old` from an optional or list slot.
    ///
    /// # Errors
    ///
    /// Fails if `old` is not a child of `parent`, if `None` targets a
    /// required slot, or if `new` is owned elsewhere.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: Option<NodeId>,
    ) -> Result<(), AstError> {
        if let Some(new) = new {
            self.check_adoptable(parent, new)?;
        }
        let mut kind = self.kind(parent).clone();
        let mut found = false;
        for slot in kind.slots_mut() {
            match slot {
                SlotMut::One(current) if *current == old => {
                    let Some(new) = new else {
                        return Err(AstError::RequiredSlot { parent, child: old });
                    };
                    *current = new;
                    found = true;
                }
                SlotMut::Opt(current) if *current == Some(old) => {
                    *current = new;
                    found = true;
                }
                SlotMut::Many(items) => {
                    if let Some(pos) = items.iter().position(|c| *c == old) {
                        match new {
                            Some(new) => items[pos] = new,
                            None => {
                                items.remove(pos);
                            }
                        }
                        found = true;
                    }
                }
                _ => {}
            }
            if found {
                break;
            }
        }
        if !found {
            return Err(AstError::NotAChild { parent, child: old });
        }
        self.nodes[old.index()].parent = None;
        if let Some(new) = new {
            self.nodes[new.index()].parent = Some(parent);
        }
        self.nodes[parent.index()].kind = kind;
        self.invalidate(parent);
        Ok(())
    }

    /// Removes `id` from its owner. Detaching a root is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::RequiredSlot`] if `id` fills a required slot.
    pub fn detach(&mut self, id: NodeId) -> Result<(), AstError> {
        match self.parent(id) {
            Some(parent) => self.replace_child(parent, id, None),
            None => Ok(()),
        }
    }

    fn check_adoptable(&self, parent: NodeId, child: NodeId) -> Result<(), AstError> {
        if self.parent(child).is_some() {
            return Err(AstError::AlreadyAttached(child));
        }
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(AstError::Cycle(child));
        }
        Ok(())
    }

    // Cached hashes and types depend on descendants.
    fn invalidate(&mut self, id: NodeId) {
        let mut next = Some(id);
        while let Some(current) = next {
            let node = &mut self.nodes[current.index()];
            node.hash.take();
            node.static_type.take();
            next = node.parent;
        }
    }

    /// Copies the subtree rooted at `id` within this arena. The copy is
    /// unattached and caches are recomputed on demand.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let source = self.node(id);
        let (mut kind, span) = (source.kind.clone(), source.span);
        let (parenthesized, comments) = (source.parenthesized, source.comments.clone());
        kind.map_children(|child| self.deep_clone(child));
        let copy = self.alloc_at(kind, span);
        let node = &mut self.nodes[copy.index()];
        node.parenthesized = parenthesized;
        node.comments = comments;
        copy
    }

    /// Copies the subtree rooted at `id` into `dest`. The copy is
    /// unattached.
    pub fn clone_into(&self, id: NodeId, dest: &mut Self) -> NodeId {
        let source = self.node(id);
        let mut kind = source.kind.clone();
        kind.map_children(|child| self.clone_into(child, dest));
        let copy = dest.alloc_at(kind, source.span);
        let node = &mut dest.nodes[copy.index()];
        node.parenthesized = source.parenthesized;
        node.comments.clone_from(&source.comments);
        copy
    }

    /// Returns a content hash of the subtree rooted at `id`.
    ///
    /// The hash covers kinds, attributes and children. Spans, comments
    /// and parenthesization are ignored. The value is cached until the
    /// subtree is edited.
    #[must_use]
    pub fn structural_hash(&self, id: NodeId) -> u64 {
        let node = self.node(id);
        *node.hash.get_or_init(|| {
            let mut hasher = FnvHasher::default();
            node.kind.shape().hash(&mut hasher);
            for child in node.kind.children() {
                hasher.write_u64(self.structural_hash(child));
            }
            hasher.finish()
        })
    }

    /// Compares the subtree `a` of this arena with the subtree `b` of
    /// `other`, under the same rules as [`Ast::structural_hash`].
    #[must_use]
    pub fn structural_eq(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        let (left, right) = (self.kind(a), other.kind(b));
        if left.shape() != right.shape() {
            return false;
        }
        let (lc, rc) = (left.children(), right.children());
        lc.len() == rc.len()
            && lc
                .iter()
                .zip(&rc)
                .all(|(x, y)| self.structural_eq(*x, other, *y))
    }

    /// Returns the statically known type of `id`, cached until edited.
    #[must_use]
    pub fn data_type_of(&self, id: NodeId) -> Option<StaticType> {
        *self
            .node(id)
            .static_type
            .get_or_init(|| StaticType::compute(self, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ops::BinaryOp;

    fn ident(ast: &mut Ast, name: &str) -> NodeId {
        ast.alloc(NodeKind::Identifier(name.to_string()))
    }

    fn add(ast: &mut Ast, left: NodeId, right: NodeId) -> NodeId {
        ast.alloc(NodeKind::Binary {
            op: BinaryOp::Add,
            left,
            right,
        })
    }

    #[test]
    fn test_alloc_sets_parent() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let sum = add(&mut ast, a, b);
        assert_eq!(ast.parent(a), Some(sum));
        assert_eq!(ast.parent(b), Some(sum));
        assert_eq!(ast.parent(sum), None);
        assert_eq!(ast.children(sum), vec![a, b]);
    }

    #[test]
    fn test_set_child_moves_parent() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let c = ident(&mut ast, "c");
        let sum = add(&mut ast, a, b);

        let previous = ast.set_child(sum, 1, Some(c)).unwrap();
        assert_eq!(previous, Some(b));
        assert_eq!(ast.parent(b), None);
        assert_eq!(ast.parent(c), Some(sum));
        assert_eq!(ast.children(sum), vec![a, c]);
    }

    #[test]
    fn test_required_slot_cannot_be_cleared() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let sum = add(&mut ast, a, b);
        assert!(matches!(
            ast.set_child(sum, 0, None),
            Err(AstError::RequiredSlot { .. })
        ));
        assert!(matches!(ast.detach(a), Err(AstError::RequiredSlot { .. })));
        assert_eq!(ast.parent(a), Some(sum));
    }

    #[test]
    fn test_optional_slot_clear_and_list_detach() {
        let mut ast = Ast::new();
        let cond = ident(&mut ast, "c");
        let res = ident(&mut ast, "r");
        let when = ast.alloc(NodeKind::CaseWhen {
            condition: cond,
            result: res,
        });
        let other = ident(&mut ast, "e");
        let case = ast.alloc(NodeKind::Case {
            value: None,
            whens: vec![when],
            else_result: Some(other),
        });

        assert_eq!(ast.set_child(case, 2, None).unwrap(), Some(other));
        assert_eq!(ast.parent(other), None);

        ast.detach(when).unwrap();
        assert_eq!(ast.parent(when), None);
        assert!(ast.children(case).is_empty());

        ast.push_child(case, 1, when).unwrap();
        assert_eq!(ast.parent(when), Some(case));
    }

    #[test]
    fn test_attach_rejects_owned_and_cycles() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let sum = add(&mut ast, a, b);
        let c = ident(&mut ast, "c");
        let d = ident(&mut ast, "d");
        let outer = add(&mut ast, c, d);

        assert!(matches!(
            ast.set_child(outer, 0, Some(a)),
            Err(AstError::AlreadyAttached(_))
        ));
        ast.replace_child(outer, d, Some(sum)).unwrap();
        assert_eq!(ast.parent(sum), Some(outer));
        assert_eq!(ast.parent(d), None);

        ast.replace_child(sum, b, Some(d)).unwrap();
        assert_eq!(ast.root_of(d), outer);
        assert!(matches!(
            ast.set_child(sum, 0, Some(outer)),
            Err(AstError::Cycle(_))
        ));
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let sum = add(&mut ast, a, b);
        ast.set_parenthesized(sum, true);

        let copy = ast.deep_clone(sum);
        assert_ne!(copy, sum);
        assert_eq!(ast.parent(copy), None);
        assert!(ast.is_parenthesized(copy));
        for child in ast.children(copy) {
            assert_eq!(ast.parent(child), Some(copy));
            assert!(!ast.children(sum).contains(&child));
        }
        assert!(ast.structural_eq(sum, &ast, copy));
        assert_eq!(ast.structural_hash(sum), ast.structural_hash(copy));
    }

    #[test]
    fn test_hash_invalidated_on_edit() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let sum = add(&mut ast, a, b);
        let before = ast.structural_hash(sum);

        ast.update(b, |kind| *kind = NodeKind::Identifier(String::from("z")))
            .unwrap();
        assert_ne!(ast.structural_hash(sum), before);

        ast.update(b, |kind| *kind = NodeKind::Identifier(String::from("b")))
            .unwrap();
        assert_eq!(ast.structural_hash(sum), before);
    }

    #[test]
    fn test_structural_eq_across_arenas() {
        let mut left = Ast::new();
        let a = ident(&mut left, "a");
        let b = ident(&mut left, "b");
        let x = add(&mut left, a, b);

        let mut right = Ast::new();
        let pad = ident(&mut right, "pad");
        let copy = left.clone_into(x, &mut right);
        assert_ne!(pad, copy);
        assert!(left.structural_eq(x, &right, copy));

        right.set_parenthesized(copy, true);
        assert!(left.structural_eq(x, &right, copy));
        right
            .update(copy, |kind| {
                if let NodeKind::Binary { op, .. } = kind {
                    *op = BinaryOp::Subtract;
                }
            })
            .unwrap();
        assert!(!left.structural_eq(x, &right, copy));
    }
}
