//! Facade over the glint front-end crates.
//!
//! The work lives in the member crates:
//!
//! - [`glint_core`] - spans, the error hierarchy, and the byte-buffer
//!   value model accessor implementations run against.
//! - [`glint_ast`] - the node arena, the closed node-kind set, and the
//!   visitor.
//! - [`glint_sema`] - accessor synthesis, name resolution, and type
//!   computation, in that pipeline order.
//!
//! Most callers only need the prelude:
//!
//! ```
//! use glint::prelude::*;
//!
//! let mut m = Module::new();
//! let program = m.alloc(
//!     NodeKind::Program {
//!         declarations: Vec::new(),
//!     },
//!     Span::point(1, 1),
//! );
//! synthesize_struct_accessors(&mut m, program).unwrap();
//! resolve_program(&mut m, program).unwrap();
//! ```

pub use glint_ast as ast;
pub use glint_core::{ExecError, GlintError, InternalError, SemanticError, TrapError};
pub use glint_sema as sema;

// Re-export main types
pub mod prelude {
    pub use glint_ast::{
        AccessorKind, AddressSpace, LogicalOp, Module, Node, NodeId, NodeKind, StructAccessor,
        Visitor, dispatch_node, walk_children,
    };
    pub use glint_core::{
        ExecError, GlintError, InternalError, Pointer, SemanticError, Span, Storage, TrapError,
        Value,
    };
    pub use glint_sema::{
        AccessorData, AccessorState, NameResolver, Namespace, ScopeId, Scopes, call_accessor,
        did_layout, instantiate, resolve_program, synthesize_struct_accessors, type_of,
        visit_implementation_data,
    };
}
