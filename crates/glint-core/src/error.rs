//! Error types for the glint front end.
//!
//! Three disjoint kinds, kept separate because they mean different things:
//!
//! ```text
//! GlintError (top-level wrapper)
//! ├── SemanticError  - user-facing: bad names, missing members, empty
//! │                    overload sets; aborts the current pass
//! ├── InternalError  - compiler-bug class: a pass asked a question that
//! │                    has no answer (type of a statement, layout read
//! │                    before the layout pass ran)
//! └── TrapError      - runtime traps raised by synthesized accessor
//!                      implementations after successful compilation
//! ```
//!
//! [`ExecError`] combines the internal and trap kinds at the accessor-call
//! boundary, where both can occur.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Semantic Errors
// ============================================================================

/// Errors in the user's program found during name resolution.
///
/// Each carries the span of the offending construct. The first semantic
/// error aborts the current pass; there is no multi-error accumulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// A variable reference did not resolve to any declaration.
    #[error("Could not find variable named '{name}' at {span}")]
    UnknownVariable { name: String, span: Span },

    /// A type reference did not resolve to any declaration.
    #[error("Could not find type named '{name}' at {span}")]
    UnknownType { name: String, span: Span },

    /// Enum-qualified access named a member the enum does not have.
    #[error("'{enum_name}' does not have a member named '{member}' at {span}")]
    UnknownEnumMember {
        enum_name: String,
        member: String,
        span: Span,
    },

    /// A call resolved to an empty overload set, and the cast fallback
    /// found nothing either.
    #[error("Cannot find any possible overloads for '{name}' at {span}")]
    NoOverloads { name: String, span: Span },

    /// Property access with neither a getter nor an address-of accessor.
    /// A setter alone is not enough to read or take the address of a
    /// property.
    #[error("Property '{name}' has neither a getter nor an ander at {span}")]
    NoPropertyAccess { name: String, span: Span },
}

impl SemanticError {
    /// The span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            SemanticError::UnknownVariable { span, .. } => *span,
            SemanticError::UnknownType { span, .. } => *span,
            SemanticError::UnknownEnumMember { span, .. } => *span,
            SemanticError::NoOverloads { span, .. } => *span,
            SemanticError::NoPropertyAccess { span, .. } => *span,
        }
    }
}

// ============================================================================
// Internal Errors
// ============================================================================

/// Compiler-bug conditions.
///
/// These are never caused by the user's program. They fire when a pass
/// violates a protocol this front end defines: asking for the type of a
/// statement, reading struct layout before the layout pass ran, or
/// instantiating a generic accessor with an incomplete substitution.
/// None of them may ever be defaulted away.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InternalError {
    /// `type_of` was invoked on a node kind that has no type.
    #[error("{kind} has no type ({span})")]
    HasNoType { kind: &'static str, span: Span },

    /// `type_of` was invoked on a node kind whose typing is an explicit,
    /// preserved gap.
    #[error("type of {kind} is not implemented ({span})")]
    NotImplemented { kind: &'static str, span: Span },

    /// A reference node was consulted before name resolution bound it.
    #[error("{kind} consulted before resolution ({span})")]
    Unresolved { kind: &'static str, span: Span },

    /// A node of an unexpected kind reached a place with a narrower
    /// contract.
    #[error("expected {expected}, found {found} ({span})")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
        span: Span,
    },

    /// Generic instantiation was missing a substitute for a type
    /// parameter.
    #[error("no substitution for type parameter '{name}'")]
    MissingSubstitution { name: String },

    /// Accessor layout data was read before the struct layout pass
    /// populated it.
    #[error("struct layout has not run: missing {what} for field '{field}'")]
    MissingLayout { what: &'static str, field: String },

    /// A synthesized accessor implementation received a value of the
    /// wrong shape.
    #[error("accessor argument: expected {expected} ({span})")]
    InvalidArgument { expected: &'static str, span: Span },
}

// ============================================================================
// Runtime Traps
// ============================================================================

/// Traps raised while a synthesized accessor implementation executes
/// against real values. Distinct from the compile-time kinds because they
/// occur after successful compilation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrapError {
    /// A null pointer was dereferenced by an address-of accessor.
    #[error("Null dereference at {span}")]
    NullDereference { span: Span },
}

// ============================================================================
// Combined Kinds
// ============================================================================

/// Errors that can escape a synthesized accessor call: either a trap from
/// the running implementation, or an internal error from invoking it
/// before its layout data exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    #[error(transparent)]
    Internal(#[from] InternalError),

    #[error(transparent)]
    Trap(#[from] TrapError),
}

/// Top-level error wrapper for callers that drive the whole front end.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GlintError {
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Internal(#[from] InternalError),

    #[error(transparent)]
    Trap(#[from] TrapError),
}

impl From<ExecError> for GlintError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Internal(e) => GlintError::Internal(e),
            ExecError::Trap(e) => GlintError::Trap(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_error_message_names_the_variable() {
        let err = SemanticError::UnknownVariable {
            name: "foo".into(),
            span: Span::new(3, 7, 3),
        };
        assert_eq!(
            err.to_string(),
            "Could not find variable named 'foo' at 3:7"
        );
        assert_eq!(err.span(), Span::new(3, 7, 3));
    }

    #[test]
    fn internal_error_names_the_kind() {
        let err = InternalError::HasNoType {
            kind: "IfStatement",
            span: Span::point(1, 1),
        };
        assert!(err.to_string().contains("IfStatement has no type"));
    }

    #[test]
    fn exec_error_distinguishes_trap_from_internal() {
        let trap: ExecError = TrapError::NullDereference {
            span: Span::point(2, 2),
        }
        .into();
        assert!(matches!(trap, ExecError::Trap(_)));

        let internal: ExecError = InternalError::MissingLayout {
            what: "offset",
            field: "b".into(),
        }
        .into();
        assert!(matches!(internal, ExecError::Internal(_)));
    }

    #[test]
    fn glint_error_wraps_all_kinds() {
        let err: GlintError = SemanticError::UnknownType {
            name: "vec5".into(),
            span: Span::point(1, 1),
        }
        .into();
        assert!(matches!(err, GlintError::Semantic(_)));
    }
}
