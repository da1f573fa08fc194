//! Struct-field accessor synthesis.
//!
//! For every field `f` of every struct `S` declared in a program,
//! [`synthesize_struct_accessors`] declares six bodiless native
//! functions:
//!
//! - `operator.f(S) -> F` - the getter, copies the field out by value
//! - `operator.f=(S, F) -> S` - the setter, returns an updated struct
//! - `operator&.f(ptr<AS, S>) -> ptr<AS, F>` - one ander per address
//!   space, offsets a pointer without touching memory
//!
//! Their implementations are pure byte manipulation, but the byte
//! offsets come from the struct layout pass, which runs *after*
//! synthesis. The gap is bridged by a three-phase protocol per
//! specialization:
//!
//! 1. [`instantiate`] fixes the type arguments and yields an
//!    [`AccessorData`] in the `Pending` state. No layout is read.
//! 2. The caller runs its layout visitor over the data's type via
//!    [`visit_implementation_data`], populating sizes and offsets as a
//!    side effect.
//! 3. [`did_layout`] reads the now-populated layout and moves the data
//!    to `Complete`. Only then may [`call_accessor`] run.
//!
//! Reading layout in any other order is a protocol violation and fails
//! with [`InternalError::MissingLayout`], never a wrong answer.

use glint_ast::{
    AccessorKind, AddressSpace, Module, NodeId, NodeKind, StructAccessor, Visitor,
};
use glint_core::{ExecError, InternalError, Pointer, TrapError, Value};
use rustc_hash::FxHashMap;

// ============================================================================
// Synthesis
// ============================================================================

/// Synthesize getter, setter, and ander declarations for every field of
/// every struct declared directly in `program`, appending them to the
/// program's declaration list. Returns the new declaration ids.
///
/// Runs before name resolution so the synthesized names participate in
/// overload sets like hand-written functions do.
pub fn synthesize_struct_accessors(
    m: &mut Module,
    program: NodeId,
) -> Result<Vec<NodeId>, InternalError> {
    let declarations = match m.kind(program) {
        NodeKind::Program { declarations } => declarations.clone(),
        other => {
            return Err(InternalError::UnexpectedNode {
                expected: "Program",
                found: other.name(),
                span: m.span(program),
            });
        }
    };

    let mut synthesized = Vec::new();
    for decl in declarations {
        if let NodeKind::StructType { fields, .. } = m.kind(decl) {
            let fields = fields.clone();
            for field in fields {
                synthesized.extend(synthesize_field_accessors(m, decl, field)?);
            }
        }
    }

    if let NodeKind::Program { declarations } = m.kind_mut(program) {
        declarations.extend(&synthesized);
    }
    Ok(synthesized)
}

/// The six accessors for one field of one struct.
fn synthesize_field_accessors(
    m: &mut Module,
    struct_type: NodeId,
    field: NodeId,
) -> Result<Vec<NodeId>, InternalError> {
    let span = m.span(struct_type);
    let (field_name, field_ty) = match m.kind(field) {
        NodeKind::Field { name, ty, .. } => (name.clone(), *ty),
        other => {
            return Err(InternalError::UnexpectedNode {
                expected: "Field",
                found: other.name(),
                span: m.span(field),
            });
        }
    };

    let mut out = Vec::new();

    // Getter: operator.f(S) -> F
    {
        let type_parameters = fresh_type_parameters(m, struct_type);
        let param = m.alloc_parameter("self", struct_type, span);
        out.push(m.alloc(
            NodeKind::NativeFunc {
                name: format!("operator.{field_name}"),
                type_parameters,
                parameters: vec![param],
                return_type: field_ty,
                accessor: Some(StructAccessor {
                    kind: AccessorKind::Getter,
                    struct_type,
                    field_name: field_name.clone(),
                }),
            },
            span,
        ));
    }

    // Setter: operator.f=(S, F) -> S
    {
        let type_parameters = fresh_type_parameters(m, struct_type);
        let this = m.alloc_parameter("self", struct_type, span);
        let value = m.alloc_parameter("value", field_ty, span);
        out.push(m.alloc(
            NodeKind::NativeFunc {
                name: format!("operator.{field_name}="),
                type_parameters,
                parameters: vec![this, value],
                return_type: struct_type,
                accessor: Some(StructAccessor {
                    kind: AccessorKind::Setter,
                    struct_type,
                    field_name: field_name.clone(),
                }),
            },
            span,
        ));
    }

    // Anders: operator&.f(ptr<AS, S>) -> ptr<AS, F>, one per address
    // space.
    for address_space in AddressSpace::ALL {
        let type_parameters = fresh_type_parameters(m, struct_type);
        let param_ty = m.alloc(
            NodeKind::PtrType {
                address_space,
                element_type: struct_type,
            },
            span,
        );
        let return_type = m.alloc(
            NodeKind::PtrType {
                address_space,
                element_type: field_ty,
            },
            span,
        );
        let param = m.alloc_parameter("self", param_ty, span);
        out.push(m.alloc(
            NodeKind::NativeFunc {
                name: format!("operator&.{field_name}"),
                type_parameters,
                parameters: vec![param],
                return_type,
                accessor: Some(StructAccessor {
                    kind: AccessorKind::Ander(address_space),
                    struct_type,
                    field_name: field_name.clone(),
                }),
            },
            span,
        ));
    }

    Ok(out)
}

/// Fresh `TypeVariable` copies of a struct's type parameters.
///
/// Each synthesized function owns its own parameter nodes so that
/// specializing one function never aliases the inference state of
/// another. The copies keep the original names; substitution is keyed by
/// name.
fn fresh_type_parameters(m: &mut Module, struct_type: NodeId) -> Vec<NodeId> {
    let params = match m.kind(struct_type) {
        NodeKind::StructType {
            type_parameters, ..
        } => type_parameters.clone(),
        _ => Vec::new(),
    };
    params
        .into_iter()
        .map(|p| {
            let span = m.span(p);
            let kind = m.kind(p).clone();
            m.alloc(kind, span)
        })
        .collect()
}

// ============================================================================
// Deferred Layout Protocol
// ============================================================================

/// Layout state of one accessor specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorState {
    /// Instantiated; layout has not been read.
    Pending,
    /// Layout read; the accessor is callable.
    Complete {
        /// Byte offset of the field within the struct.
        offset: u32,
        /// Size of the whole struct value in bytes.
        struct_size: u32,
        /// Size of the field value in bytes.
        field_size: u32,
    },
}

/// One specialization of a synthesized accessor, carrying the concrete
/// type it operates on and its layout state.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorData {
    /// The concrete struct type of this specialization. For generic
    /// structs this is a substituted copy; layout populated on it never
    /// leaks into the generic original.
    pub ty: NodeId,
    /// The field the accessor reads or writes.
    pub field_name: String,
    pub state: AccessorState,
}

/// Specialize a synthesized accessor to concrete type arguments.
///
/// `func` must be a [`NodeKind::NativeFunc`] carrying an accessor
/// payload. Type arguments are matched positionally against the
/// function's type parameters; for generic structs the result type is a
/// deep substituted copy with its own unset layout slots.
pub fn instantiate(
    m: &mut Module,
    func: NodeId,
    type_arguments: &[NodeId],
) -> Result<AccessorData, InternalError> {
    let span = m.span(func);
    let (type_parameters, accessor) = match m.kind(func) {
        NodeKind::NativeFunc {
            type_parameters,
            accessor: Some(accessor),
            ..
        } => (type_parameters.clone(), accessor.clone()),
        other => {
            return Err(InternalError::UnexpectedNode {
                expected: "NativeFunc with an accessor payload",
                found: other.name(),
                span,
            });
        }
    };

    let ty = if type_parameters.is_empty() {
        accessor.struct_type
    } else {
        let mut substitutions = FxHashMap::default();
        for (i, &param) in type_parameters.iter().enumerate() {
            let name = match m.kind(param) {
                NodeKind::TypeVariable { name, .. }
                | NodeKind::ConstexprTypeParameter { name, .. } => name.clone(),
                other => {
                    return Err(InternalError::UnexpectedNode {
                        expected: "TypeVariable",
                        found: other.name(),
                        span: m.span(param),
                    });
                }
            };
            match type_arguments.get(i) {
                Some(&arg) => {
                    substitutions.insert(name, arg);
                }
                None => return Err(InternalError::MissingSubstitution { name }),
            }
        }
        substitute(m, accessor.struct_type, &substitutions)?
    };

    Ok(AccessorData {
        ty,
        field_name: accessor.field_name,
        state: AccessorState::Pending,
    })
}

/// Deep-copy a type node, replacing every `TypeVariable` with its
/// substitute. The copy starts with unset layout slots.
///
/// Nodes with no type variables underneath (native types, enums) are
/// shared, not copied.
fn substitute(
    m: &mut Module,
    ty: NodeId,
    substitutions: &FxHashMap<String, NodeId>,
) -> Result<NodeId, InternalError> {
    let span = m.span(ty);
    match m.kind(ty) {
        NodeKind::TypeVariable { name, .. } => match substitutions.get(name) {
            Some(&sub) => Ok(sub),
            None => Err(InternalError::MissingSubstitution { name: name.clone() }),
        },
        NodeKind::NativeType { .. }
        | NodeKind::NativeTypeInstance { .. }
        | NodeKind::EnumType { .. }
        | NodeKind::NullType => Ok(ty),
        NodeKind::StructType { name, fields, .. } => {
            let name = name.clone();
            let fields = fields.clone();
            let mut new_fields = Vec::with_capacity(fields.len());
            for field in fields {
                let (field_name, field_ty) = match m.kind(field) {
                    NodeKind::Field { name, ty, .. } => (name.clone(), *ty),
                    other => {
                        return Err(InternalError::UnexpectedNode {
                            expected: "Field",
                            found: other.name(),
                            span: m.span(field),
                        });
                    }
                };
                let new_ty = substitute(m, field_ty, substitutions)?;
                new_fields.push(m.alloc_field(&field_name, new_ty, span));
            }
            Ok(m.alloc(
                NodeKind::StructType {
                    name,
                    type_parameters: Vec::new(),
                    fields: new_fields,
                    size: None,
                },
                span,
            ))
        }
        NodeKind::PtrType {
            address_space,
            element_type,
        } => {
            let address_space = *address_space;
            let element_type = *element_type;
            let element_type = substitute(m, element_type, substitutions)?;
            Ok(m.alloc(
                NodeKind::PtrType {
                    address_space,
                    element_type,
                },
                span,
            ))
        }
        NodeKind::ArrayType {
            element_type,
            length,
        } => {
            let length = *length;
            let element_type = *element_type;
            let element_type = substitute(m, element_type, substitutions)?;
            Ok(m.alloc(
                NodeKind::ArrayType {
                    element_type,
                    length,
                },
                span,
            ))
        }
        NodeKind::ArrayRefType {
            address_space,
            element_type,
        } => {
            let address_space = *address_space;
            let element_type = *element_type;
            let element_type = substitute(m, element_type, substitutions)?;
            Ok(m.alloc(
                NodeKind::ArrayRefType {
                    address_space,
                    element_type,
                },
                span,
            ))
        }
        NodeKind::ReferenceType { element_type } => {
            let element_type = *element_type;
            let element_type = substitute(m, element_type, substitutions)?;
            Ok(m.alloc(NodeKind::ReferenceType { element_type }, span))
        }
        NodeKind::VectorType {
            element_type,
            length,
        } => {
            let length = *length;
            let element_type = *element_type;
            let element_type = substitute(m, element_type, substitutions)?;
            Ok(m.alloc(
                NodeKind::VectorType {
                    element_type,
                    length,
                },
                span,
            ))
        }
        NodeKind::MatrixType {
            element_type,
            rows,
            columns,
        } => {
            let (rows, columns) = (*rows, *columns);
            let element_type = *element_type;
            let element_type = substitute(m, element_type, substitutions)?;
            Ok(m.alloc(
                NodeKind::MatrixType {
                    element_type,
                    rows,
                    columns,
                },
                span,
            ))
        }
        NodeKind::TypeRef {
            resolved: Some(r), ..
        } => {
            let r = *r;
            substitute(m, r, substitutions)
        }
        NodeKind::TypeDef { ty, .. } | NodeKind::GenericLiteralType { ty } => {
            let ty = *ty;
            substitute(m, ty, substitutions)
        }
        other => Err(InternalError::UnexpectedNode {
            expected: "a type",
            found: other.name(),
            span,
        }),
    }
}

/// Run a visitor over the type an accessor specialization operates on.
///
/// This is the hook the struct layout pass attaches to: visiting the
/// type populates `StructType::size`, `NativeType::size`, and
/// `Field::offset` as a side effect.
pub fn visit_implementation_data<V: Visitor>(
    m: &mut Module,
    data: &AccessorData,
    visitor: &mut V,
) -> Result<(), V::Error> {
    visitor.visit_node(m, data.ty)
}

/// Read the layout populated by the layout pass and make the accessor
/// callable.
///
/// Fails with [`InternalError::MissingLayout`] if any required slot is
/// still unset, which means the pass ordering was violated.
pub fn did_layout(m: &Module, data: &mut AccessorData) -> Result<(), InternalError> {
    let (struct_size, field) = match m.kind(data.ty) {
        NodeKind::StructType { size, .. } => {
            let size = (*size).ok_or(InternalError::MissingLayout {
                what: "struct size",
                field: data.field_name.clone(),
            })?;
            let field = m
                .field_by_name(data.ty, &data.field_name)
                .ok_or(InternalError::MissingLayout {
                    what: "field",
                    field: data.field_name.clone(),
                })?;
            (size, field)
        }
        other => {
            return Err(InternalError::UnexpectedNode {
                expected: "StructType",
                found: other.name(),
                span: m.span(data.ty),
            });
        }
    };

    let (offset, field_ty) = match m.kind(field) {
        NodeKind::Field { ty, offset, .. } => {
            let offset = (*offset).ok_or(InternalError::MissingLayout {
                what: "field offset",
                field: data.field_name.clone(),
            })?;
            (offset, *ty)
        }
        // field_by_name only returns Field nodes.
        _ => unreachable!(),
    };

    let field_size = size_of_type(m, field_ty).ok_or(InternalError::MissingLayout {
        what: "field type size",
        field: data.field_name.clone(),
    })?;

    data.state = AccessorState::Complete {
        offset,
        struct_size,
        field_size,
    };
    Ok(())
}

/// The laid-out size of a type, if its layout slot has been populated.
fn size_of_type(m: &Module, ty: NodeId) -> Option<u32> {
    match m.kind(ty) {
        NodeKind::NativeType { size, .. } => *size,
        NodeKind::StructType { size, .. } => *size,
        NodeKind::TypeRef { resolved, .. } => size_of_type(m, (*resolved)?),
        NodeKind::TypeDef { ty, .. } | NodeKind::GenericLiteralType { ty } => {
            size_of_type(m, *ty)
        }
        NodeKind::ArrayType {
            element_type,
            length,
        } => Some(size_of_type(m, *element_type)? * length),
        NodeKind::VectorType {
            element_type,
            length,
        } => Some(size_of_type(m, *element_type)? * length),
        _ => None,
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Execute a synthesized accessor against runtime values.
///
/// The accessor's layout state must be `Complete`; a `Pending` accessor
/// fails with [`InternalError::MissingLayout`] rather than guessing at
/// offsets.
pub fn call_accessor(
    m: &Module,
    func: NodeId,
    data: &AccessorData,
    args: &[Value],
) -> Result<Value, ExecError> {
    let span = m.span(func);
    let kind = match m.kind(func) {
        NodeKind::NativeFunc {
            accessor: Some(accessor),
            ..
        } => accessor.kind,
        other => {
            return Err(InternalError::UnexpectedNode {
                expected: "NativeFunc with an accessor payload",
                found: other.name(),
                span,
            }
            .into());
        }
    };

    let AccessorState::Complete {
        offset,
        struct_size,
        field_size,
    } = data.state
    else {
        return Err(InternalError::MissingLayout {
            what: "accessor layout",
            field: data.field_name.clone(),
        }
        .into());
    };
    let (offset, struct_size, field_size) =
        (offset as usize, struct_size as usize, field_size as usize);

    match kind {
        AccessorKind::Getter => {
            let bytes = expect_struct_bytes(args.first(), struct_size, span)?;
            Ok(Value::Bytes(bytes[offset..offset + field_size].to_vec()))
        }
        AccessorKind::Setter => {
            let bytes = expect_struct_bytes(args.first(), struct_size, span)?;
            let new_value = match args.get(1).and_then(Value::as_bytes) {
                Some(b) if b.len() == field_size => b,
                _ => {
                    return Err(InternalError::InvalidArgument {
                        expected: "a field-sized byte value",
                        span,
                    }
                    .into());
                }
            };
            // By-value semantics: the result is a fresh buffer, the
            // argument is untouched.
            let mut out = bytes.to_vec();
            out[offset..offset + field_size].copy_from_slice(new_value);
            Ok(Value::Bytes(out))
        }
        AccessorKind::Ander(_) => {
            let ptr: &Pointer = match args.first().and_then(Value::as_ptr) {
                Some(Some(ptr)) => ptr,
                Some(None) => return Err(TrapError::NullDereference { span }.into()),
                None => {
                    return Err(InternalError::InvalidArgument {
                        expected: "a pointer value",
                        span,
                    }
                    .into());
                }
            };
            Ok(Value::Ptr(Some(ptr.offset_by(offset))))
        }
    }
}

fn expect_struct_bytes<'a>(
    arg: Option<&'a Value>,
    struct_size: usize,
    span: glint_core::Span,
) -> Result<&'a [u8], ExecError> {
    match arg.and_then(|v| v.as_bytes()) {
        Some(bytes) if bytes.len() == struct_size => Ok(bytes),
        _ => Err(InternalError::InvalidArgument {
            expected: "a struct-sized byte value",
            span,
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::Span;

    /// A struct { a: i32, b: i32 } program, returning
    /// (program, struct id, i32 id).
    fn two_field_struct(m: &mut Module) -> (NodeId, NodeId, NodeId) {
        let i32_ty = m.alloc_native_type("i32", Span::point(1, 1));
        let a = m.alloc_field("a", i32_ty, Span::point(2, 5));
        let b = m.alloc_field("b", i32_ty, Span::point(3, 5));
        let s = m.alloc(
            NodeKind::StructType {
                name: "S".into(),
                type_parameters: Vec::new(),
                fields: vec![a, b],
                size: None,
            },
            Span::point(1, 1),
        );
        let program = m.alloc(
            NodeKind::Program {
                declarations: vec![s],
            },
            Span::point(1, 1),
        );
        (program, s, i32_ty)
    }

    /// Populate layout by hand: i32 is 4 bytes, fields packed in order.
    fn lay_out(m: &mut Module, s: NodeId) {
        let fields = match m.kind(s) {
            NodeKind::StructType { fields, .. } => fields.clone(),
            _ => unreachable!(),
        };
        let mut at = 0;
        for field in &fields {
            let ty = match m.kind_mut(*field) {
                NodeKind::Field { ty, offset, .. } => {
                    *offset = Some(at);
                    *ty
                }
                _ => unreachable!(),
            };
            if let NodeKind::NativeType { size, .. } = m.kind_mut(ty) {
                *size = Some(4);
            }
            at += 4;
        }
        if let NodeKind::StructType { size, .. } = m.kind_mut(s) {
            *size = Some(at);
        }
    }

    fn find_accessor(m: &Module, ids: &[NodeId], name: &str) -> NodeId {
        ids.iter()
            .copied()
            .find(|&id| matches!(m.kind(id), NodeKind::NativeFunc { name: n, .. } if n == name))
            .unwrap()
    }

    #[test]
    fn six_accessors_per_field() {
        let mut m = Module::new();
        let (program, _, _) = two_field_struct(&mut m);

        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        // Two fields, six accessors each.
        assert_eq!(ids.len(), 12);

        let names: Vec<&str> = ids
            .iter()
            .map(|&id| match m.kind(id) {
                NodeKind::NativeFunc { name, .. } => name.as_str(),
                _ => panic!("synthesized declaration is not a native func"),
            })
            .collect();
        assert_eq!(names.iter().filter(|n| **n == "operator.a").count(), 1);
        assert_eq!(names.iter().filter(|n| **n == "operator.a=").count(), 1);
        assert_eq!(names.iter().filter(|n| **n == "operator&.a").count(), 4);

        // And they were appended to the program's declarations.
        match m.kind(program) {
            NodeKind::Program { declarations } => assert_eq!(declarations.len(), 1 + 12),
            _ => unreachable!(),
        }
    }

    #[test]
    fn anders_cover_every_address_space() {
        let mut m = Module::new();
        let (program, _, _) = two_field_struct(&mut m);
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();

        let mut spaces: Vec<AddressSpace> = ids
            .iter()
            .filter_map(|&id| match m.kind(id) {
                NodeKind::NativeFunc {
                    accessor:
                        Some(StructAccessor {
                            kind: AccessorKind::Ander(space),
                            field_name,
                            ..
                        }),
                    ..
                } if field_name == "b" => Some(*space),
                _ => None,
            })
            .collect();
        spaces.sort_by_key(|s| AddressSpace::ALL.iter().position(|a| a == s));
        assert_eq!(spaces, AddressSpace::ALL);
    }

    #[test]
    fn getter_copies_field_bytes() {
        let mut m = Module::new();
        let (program, s, _) = two_field_struct(&mut m);
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        let getter = find_accessor(&m, &ids, "operator.b");

        let mut data = instantiate(&mut m, getter, &[]).unwrap();
        lay_out(&mut m, s);
        did_layout(&m, &mut data).unwrap();
        assert_eq!(
            data.state,
            AccessorState::Complete {
                offset: 4,
                struct_size: 8,
                field_size: 4,
            }
        );

        let arg = Value::Bytes(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let result = call_accessor(&m, getter, &data, &[arg]).unwrap();
        assert_eq!(result.as_bytes(), Some(&[5u8, 6, 7, 8][..]));
    }

    #[test]
    fn setter_returns_updated_copy() {
        let mut m = Module::new();
        let (program, s, _) = two_field_struct(&mut m);
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        let setter = find_accessor(&m, &ids, "operator.a=");

        let mut data = instantiate(&mut m, setter, &[]).unwrap();
        lay_out(&mut m, s);
        did_layout(&m, &mut data).unwrap();

        let original = Value::Bytes(vec![0, 0, 0, 0, 9, 9, 9, 9]);
        let new_value = Value::Bytes(vec![7, 7, 7, 7]);
        let result = call_accessor(&m, setter, &data, &[original.clone(), new_value]).unwrap();
        assert_eq!(result.as_bytes(), Some(&[7u8, 7, 7, 7, 9, 9, 9, 9][..]));
        // By-value: the argument buffer is untouched.
        assert_eq!(original.as_bytes(), Some(&[0u8, 0, 0, 0, 9, 9, 9, 9][..]));
    }

    #[test]
    fn ander_offsets_without_copying() {
        let mut m = Module::new();
        let (program, s, _) = two_field_struct(&mut m);
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        let ander = find_accessor(&m, &ids, "operator&.b");

        let mut data = instantiate(&mut m, ander, &[]).unwrap();
        lay_out(&mut m, s);
        did_layout(&m, &mut data).unwrap();

        let storage = glint_core::Storage::new(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let arg = Value::Ptr(Some(Pointer::new(storage.clone(), 0)));
        let result = call_accessor(&m, ander, &data, &[arg]).unwrap();

        let ptr = result.as_ptr().unwrap().unwrap();
        assert_eq!(ptr.offset(), 4);
        // The result aliases the original storage: writing through it is
        // visible in the source buffer.
        ptr.write(&[0, 0, 0, 0]);
        assert_eq!(storage.to_vec(), vec![1, 2, 3, 4, 0, 0, 0, 0]);
    }

    #[test]
    fn ander_traps_on_null() {
        let mut m = Module::new();
        let (program, s, _) = two_field_struct(&mut m);
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        let ander = find_accessor(&m, &ids, "operator&.a");

        let mut data = instantiate(&mut m, ander, &[]).unwrap();
        lay_out(&mut m, s);
        did_layout(&m, &mut data).unwrap();

        let result = call_accessor(&m, ander, &data, &[Value::null()]);
        assert!(matches!(
            result,
            Err(ExecError::Trap(TrapError::NullDereference { .. }))
        ));
    }

    #[test]
    fn calling_before_layout_is_an_internal_error() {
        let mut m = Module::new();
        let (program, _, _) = two_field_struct(&mut m);
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        let getter = find_accessor(&m, &ids, "operator.a");

        let data = instantiate(&mut m, getter, &[]).unwrap();
        assert_eq!(data.state, AccessorState::Pending);

        let arg = Value::Bytes(vec![0; 8]);
        let result = call_accessor(&m, getter, &data, &[arg]);
        assert!(matches!(
            result,
            Err(ExecError::Internal(InternalError::MissingLayout { .. }))
        ));
    }

    #[test]
    fn did_layout_before_layout_pass_fails() {
        let mut m = Module::new();
        let (program, _, _) = two_field_struct(&mut m);
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        let getter = find_accessor(&m, &ids, "operator.a");

        let mut data = instantiate(&mut m, getter, &[]).unwrap();
        // No layout pass ran: the struct size slot is still unset.
        assert!(matches!(
            did_layout(&m, &mut data),
            Err(InternalError::MissingLayout {
                what: "struct size",
                ..
            })
        ));
    }

    #[test]
    fn generic_instantiation_substitutes_by_name() {
        let mut m = Module::new();
        let span = Span::point(1, 1);
        let t = m.alloc(
            NodeKind::TypeVariable {
                name: "T".into(),
                protocol: None,
            },
            span,
        );
        let field = m.alloc_field("value", t, span);
        let boxed = m.alloc(
            NodeKind::StructType {
                name: "Box".into(),
                type_parameters: vec![t],
                fields: vec![field],
                size: None,
            },
            span,
        );
        let program = m.alloc(
            NodeKind::Program {
                declarations: vec![boxed],
            },
            span,
        );
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        let getter = find_accessor(&m, &ids, "operator.value");

        // The getter owns a fresh copy of T, not the struct's node.
        match m.kind(getter) {
            NodeKind::NativeFunc {
                type_parameters, ..
            } => assert_ne!(type_parameters, &vec![t]),
            _ => unreachable!(),
        }

        let i32_ty = m.alloc_native_type("i32", span);
        let data = instantiate(&mut m, getter, &[i32_ty]).unwrap();

        // The specialized type is a copy of Box with T replaced by i32
        // and its own layout slots.
        assert_ne!(data.ty, boxed);
        match m.kind(data.ty) {
            NodeKind::StructType {
                fields,
                size: None,
                type_parameters,
                ..
            } => {
                assert!(type_parameters.is_empty());
                let field = fields[0];
                match m.kind(field) {
                    NodeKind::Field { ty, .. } => assert_eq!(*ty, i32_ty),
                    _ => unreachable!(),
                }
            }
            _ => panic!("specialized type is not a struct"),
        }
    }

    #[test]
    fn missing_type_argument_is_reported() {
        let mut m = Module::new();
        let span = Span::point(1, 1);
        let t = m.alloc(
            NodeKind::TypeVariable {
                name: "T".into(),
                protocol: None,
            },
            span,
        );
        let field = m.alloc_field("value", t, span);
        let boxed = m.alloc(
            NodeKind::StructType {
                name: "Box".into(),
                type_parameters: vec![t],
                fields: vec![field],
                size: None,
            },
            span,
        );
        let program = m.alloc(
            NodeKind::Program {
                declarations: vec![boxed],
            },
            span,
        );
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        let getter = find_accessor(&m, &ids, "operator.value");

        assert_eq!(
            instantiate(&mut m, getter, &[]),
            Err(InternalError::MissingSubstitution { name: "T".into() })
        );
    }

    #[test]
    fn specializations_do_not_share_layout() {
        let mut m = Module::new();
        let span = Span::point(1, 1);
        let t = m.alloc(
            NodeKind::TypeVariable {
                name: "T".into(),
                protocol: None,
            },
            span,
        );
        let field = m.alloc_field("value", t, span);
        let boxed = m.alloc(
            NodeKind::StructType {
                name: "Box".into(),
                type_parameters: vec![t],
                fields: vec![field],
                size: None,
            },
            span,
        );
        let program = m.alloc(
            NodeKind::Program {
                declarations: vec![boxed],
            },
            span,
        );
        let ids = synthesize_struct_accessors(&mut m, program).unwrap();
        let getter = find_accessor(&m, &ids, "operator.value");

        let i32_ty = m.alloc_native_type("i32", span);
        let f32_ty = m.alloc_native_type("f32", span);
        let a = instantiate(&mut m, getter, &[i32_ty]).unwrap();
        let b = instantiate(&mut m, getter, &[f32_ty]).unwrap();

        // Two specializations, two distinct substituted copies.
        assert_ne!(a.ty, b.ty);
    }
}
