//! Abstract Syntax Tree (AST) for SQL expressions and statements.
//!
//! Nodes live in an [`Ast`] arena and are addressed by [`NodeId`]. Each
//! node records its owner, so parent lookups are O(1) without reference
//! cycles.

mod arena;
mod dump;
mod node;
pub mod ops;
mod printer;
mod types;

pub use arena::{Ast, AstError, Node};
pub use dump::TreeDump;
pub use node::{
    BoundKind, FrameUnit, IntegerWidth, JoinType, NodeId, NodeKind, NullTreatment, NullsOrder,
    Quantifier, SequenceFunction, SetOperator, SetQuantifier, Slot, SlotMut, SortDirection,
    TrimOption, TypedLiteralKind,
};
pub use ops::{BinaryOp, UnaryOp};
pub use printer::{SqlDisplay, StringStyle};
pub use types::StaticType;
