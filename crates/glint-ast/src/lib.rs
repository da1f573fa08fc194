//! AST and visitor infrastructure for the glint front end.
//!
//! The AST is a closed set of node kinds stored in an index-based arena
//! ([`Module`]). A [`NodeId`] is a stable handle: replacing a node's
//! payload in place (the desugaring operation) leaves every existing
//! handle observing the new kind, so parents never rewrite child slots.
//!
//! Traversal is double dispatch: [`Visitor`] has one overridable method
//! per node kind, each defaulting to child traversal, and
//! [`dispatch_node`] is the single exhaustive match that routes a node to
//! its method. Adding a node kind is a compile error in that match, not a
//! silent default.

mod node;
mod visit;

pub use node::{
    AccessorKind, AddressSpace, LogicalOp, Module, Node, NodeId, NodeKind, StructAccessor,
};
pub use visit::{Visitor, dispatch_node, walk_children};
