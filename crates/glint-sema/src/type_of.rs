//! Exhaustive type computation.
//!
//! [`type_of`] answers "what is the type of this node" for every node
//! kind, in one table. The result is the [`NodeId`] of a type node -
//! visiting a type node *as a type* returns the node itself, and
//! reference-shaped nodes chase their resolved binding, so the returned
//! id is always a concrete type node (or a type variable).
//!
//! The table is deliberately total over the node set with no default
//! arm. Statement-shaped nodes have no type: asking for one is a caller
//! bug and returns [`InternalError::HasNoType`], never a placeholder.
//! Two expression kinds are explicit, preserved gaps and return
//! [`InternalError::NotImplemented`].
//!
//! The only mutation is allocation: `&mut` on `MakePtrExpression` and
//! `ConvertPtrToArrayRefExpression`, which construct their result type
//! node. Everything else is read-only, so the function is safely
//! re-entrant.

use glint_ast::{AddressSpace, Module, NodeId, NodeKind};
use glint_core::InternalError;

/// Compute the type of a node, as the id of a type node.
pub fn type_of(m: &mut Module, id: NodeId) -> Result<NodeId, InternalError> {
    let span = m.span(id);
    match m.kind(id) {
        // ------------------------------------------------------------------
        // Declaration-shaped nodes: the type of their declared type node,
        // re-visited so a TypeRef yields its underlying type.
        // ------------------------------------------------------------------
        NodeKind::VariableDecl { ty, .. }
        | NodeKind::Field { ty, .. }
        | NodeKind::FuncParameter { ty, .. }
        | NodeKind::AnonymousVariable { ty } => {
            let ty = *ty;
            type_of(m, ty)
        }
        NodeKind::Assignment { ty: Some(ty), .. } => {
            let ty = *ty;
            type_of(m, ty)
        }
        NodeKind::Assignment { ty: None, .. } => Err(InternalError::Unresolved {
            kind: "Assignment",
            span,
        }),

        // ------------------------------------------------------------------
        // Pass-through nodes: the type of their designated sub-part.
        // ------------------------------------------------------------------
        NodeKind::IdentityExpression { target } => {
            let target = *target;
            type_of(m, target)
        }
        NodeKind::CommaExpression { expressions } => match expressions.last() {
            Some(&last) => type_of(m, last),
            None => Err(InternalError::Unresolved {
                kind: "CommaExpression",
                span,
            }),
        },
        NodeKind::LogicalNot { operand } => {
            let operand = *operand;
            type_of(m, operand)
        }
        NodeKind::DereferenceExpression { ptr } => {
            let ptr = *ptr;
            let ptr_ty = type_of(m, ptr)?;
            match m.kind(ptr_ty) {
                NodeKind::PtrType { element_type, .. } => {
                    let element_type = *element_type;
                    type_of(m, element_type)
                }
                other => Err(InternalError::UnexpectedNode {
                    expected: "PtrType",
                    found: other.name(),
                    span,
                }),
            }
        }
        NodeKind::TypeDef { ty, .. } | NodeKind::GenericLiteralType { ty } => {
            let ty = *ty;
            type_of(m, ty)
        }
        NodeKind::TypeRef { resolved: Some(r), .. } => {
            let r = *r;
            type_of(m, r)
        }
        NodeKind::TypeRef { resolved: None, .. } => Err(InternalError::Unresolved {
            kind: "TypeRef",
            span,
        }),
        NodeKind::GenericLiteral { ty, .. } | NodeKind::NullLiteral { ty } => {
            let ty = *ty;
            type_of(m, ty)
        }

        // ------------------------------------------------------------------
        // Resolved-reference nodes: a single concrete binding is attached
        // by the time anyone asks; no overload re-resolution here.
        // ------------------------------------------------------------------
        NodeKind::CallExpression {
            func: Some(f), ..
        } => {
            let f = *f;
            type_of(m, f)
        }
        NodeKind::CallExpression {
            func: None,
            cast_type: Some(c),
            ..
        } => {
            let c = *c;
            type_of(m, c)
        }
        NodeKind::CallExpression { .. } => Err(InternalError::Unresolved {
            kind: "CallExpression",
            span,
        }),
        NodeKind::VariableRef {
            binding: Some(b), ..
        } => {
            let b = *b;
            type_of(m, b)
        }
        NodeKind::VariableRef { binding: None, .. } => Err(InternalError::Unresolved {
            kind: "VariableRef",
            span,
        }),
        NodeKind::DotExpression {
            field_decl: Some(f),
            ..
        } => {
            let f = *f;
            type_of(m, f)
        }
        NodeKind::DotExpression {
            field_decl: None, ..
        } => Err(InternalError::Unresolved {
            kind: "DotExpression",
            span,
        }),
        NodeKind::IndexExpression { base, .. } => {
            let base = *base;
            let base_ty = type_of(m, base)?;
            match m.kind(base_ty) {
                NodeKind::ArrayType { element_type, .. }
                | NodeKind::ArrayRefType { element_type, .. }
                | NodeKind::VectorType { element_type, .. }
                | NodeKind::MatrixType { element_type, .. } => {
                    let element_type = *element_type;
                    type_of(m, element_type)
                }
                other => Err(InternalError::UnexpectedNode {
                    expected: "an indexable type",
                    found: other.name(),
                    span,
                }),
            }
        }

        // ------------------------------------------------------------------
        // Pointer/reference constructors.
        // ------------------------------------------------------------------
        NodeKind::MakePtrExpression { lvalue } => {
            let lvalue = *lvalue;
            let element_type = type_of(m, lvalue)?;
            Ok(m.alloc(
                NodeKind::PtrType {
                    address_space: AddressSpace::Thread,
                    element_type,
                },
                span,
            ))
        }
        NodeKind::ConvertPtrToArrayRefExpression { lvalue } => {
            let lvalue = *lvalue;
            let ptr_ty = type_of(m, lvalue)?;
            match m.kind(ptr_ty) {
                NodeKind::PtrType {
                    address_space,
                    element_type,
                } => {
                    let address_space = *address_space;
                    let element_type = *element_type;
                    Ok(m.alloc(
                        NodeKind::ArrayRefType {
                            address_space,
                            element_type,
                        },
                        span,
                    ))
                }
                other => Err(InternalError::UnexpectedNode {
                    expected: "PtrType",
                    found: other.name(),
                    span,
                }),
            }
        }
        NodeKind::MakeArrayRefExpression { ty: Some(ty), .. } => {
            let ty = *ty;
            type_of(m, ty)
        }
        NodeKind::MakeArrayRefExpression { ty: None, .. } => Err(InternalError::Unresolved {
            kind: "MakeArrayRefExpression",
            span,
        }),

        // ------------------------------------------------------------------
        // Terminal type nodes: visiting a type as a type yields itself.
        // ------------------------------------------------------------------
        NodeKind::NativeType { .. }
        | NodeKind::NativeTypeInstance { .. }
        | NodeKind::StructType { .. }
        | NodeKind::EnumType { .. }
        | NodeKind::PtrType { .. }
        | NodeKind::ArrayType { .. }
        | NodeKind::ArrayRefType { .. }
        | NodeKind::VectorType { .. }
        | NodeKind::MatrixType { .. }
        | NodeKind::ReferenceType { .. }
        | NodeKind::NullType
        | NodeKind::TypeVariable { .. } => Ok(id),

        // ------------------------------------------------------------------
        // Func-like nodes: their declared return type, re-visited.
        // ------------------------------------------------------------------
        NodeKind::FuncDef { return_type, .. } | NodeKind::NativeFunc { return_type, .. } => {
            let return_type = *return_type;
            type_of(m, return_type)
        }
        NodeKind::NativeFuncInstance { base, .. } => {
            let base = *base;
            type_of(m, base)
        }
        NodeKind::FunctionLikeBlock {
            return_type: Some(ret),
            ..
        } => {
            let ret = *ret;
            type_of(m, ret)
        }
        NodeKind::FunctionLikeBlock {
            return_type: None, ..
        } => Err(InternalError::Unresolved {
            kind: "FunctionLikeBlock",
            span,
        }),

        // ------------------------------------------------------------------
        // Statement-shaped nodes have no type; asking is a caller bug.
        // ------------------------------------------------------------------
        NodeKind::Program { .. }
        | NodeKind::Block { .. }
        | NodeKind::Return { .. }
        | NodeKind::IfStatement { .. }
        | NodeKind::WhileLoop { .. }
        | NodeKind::DoWhileLoop { .. }
        | NodeKind::ForLoop { .. }
        | NodeKind::SwitchStatement { .. }
        | NodeKind::SwitchCase { .. }
        | NodeKind::Break
        | NodeKind::Continue
        | NodeKind::TrapStatement
        | NodeKind::BoolLiteral { .. }
        | NodeKind::EnumLiteral { .. }
        | NodeKind::EnumMember { .. }
        | NodeKind::ProtocolDecl { .. }
        | NodeKind::ProtocolFuncDecl { .. }
        | NodeKind::ProtocolRef { .. }
        | NodeKind::ConstexprTypeParameter { .. } => Err(InternalError::HasNoType {
            kind: m.kind(id).name(),
            span,
        }),

        // ------------------------------------------------------------------
        // Explicit, preserved gaps.
        // ------------------------------------------------------------------
        NodeKind::LogicalExpression { .. } | NodeKind::ReadModifyWriteExpression { .. } => {
            Err(InternalError::NotImplemented {
                kind: m.kind(id).name(),
                span,
            })
        }
    }
}
