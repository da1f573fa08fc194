//! Semantic analysis for the glint front end.
//!
//! Three components, run in pipeline order:
//!
//! 1. [`synthesize_struct_accessors`] - per struct field, declare the
//!    getter / setter / ander native functions so overload sets can see
//!    them. Their bodies read struct layout through a deferred protocol
//!    and never before the layout pass runs.
//! 2. [`NameResolver`] - binds every reference node to a declaration,
//!    one lexical scope per nested construct, desugaring enum-qualified
//!    access and call-as-cast in place.
//! 3. [`type_of`] - the exhaustive type-computation function used by the
//!    resolver's cast fallback, accessor layout queries, and the
//!    downstream checker.
//!
//! The struct layout pass itself is an external collaborator: it
//! populates `StructType::size`, `NativeType::size`, and `Field::offset`
//! as a side effect of visiting types, strictly between
//! [`visit_implementation_data`] and [`did_layout`].

mod accessors;
mod resolver;
mod scopes;
mod type_of;

pub use accessors::{
    AccessorData, AccessorState, call_accessor, did_layout, instantiate,
    synthesize_struct_accessors, visit_implementation_data,
};
pub use resolver::{NameResolver, resolve_program};
pub use scopes::{Namespace, ScopeId, Scopes};
pub use type_of::type_of;
