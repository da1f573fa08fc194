//! End-to-end tests over the whole front-end pipeline: accessor
//! synthesis, name resolution, type computation, and accessor execution
//! against real byte buffers.
//!
//! Struct layout is not part of the front end, so these tests carry
//! their own layout visitor: natural alignment, fields packed in
//! declaration order. It plugs into the same deferred-layout protocol a
//! production layout pass would.

use glint::prelude::*;

// ============================================================================
// Test Harness
// ============================================================================

/// A minimal layout pass: scalar sizes by name, struct fields packed in
/// declaration order at natural alignment.
struct NaturalLayout;

impl NaturalLayout {
    fn size_of(m: &Module, ty: NodeId) -> Option<u32> {
        match m.kind(ty) {
            NodeKind::NativeType { size, .. } => *size,
            NodeKind::StructType { size, .. } => *size,
            NodeKind::TypeRef { resolved, .. } => Self::size_of(m, (*resolved)?),
            _ => None,
        }
    }
}

impl Visitor for NaturalLayout {
    type Error = InternalError;

    fn visit_native_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), InternalError> {
        let scalar = match m.kind(id) {
            NodeKind::NativeType { name, .. } => match name.as_str() {
                "bool" => Some(1),
                "i32" | "u32" | "f32" => Some(4),
                _ => None,
            },
            _ => None,
        };
        if let NodeKind::NativeType { size, .. } = m.kind_mut(id) {
            *size = scalar;
        }
        Ok(())
    }

    fn visit_struct_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), InternalError> {
        // Size the field types first.
        walk_children(self, m, id)?;

        let fields = match m.kind(id) {
            NodeKind::StructType { fields, .. } => fields.clone(),
            other => {
                return Err(InternalError::UnexpectedNode {
                    expected: "StructType",
                    found: other.name(),
                    span: m.span(id),
                });
            }
        };

        let mut at = 0u32;
        let mut align = 1u32;
        for field in fields {
            let field_ty = match m.kind(field) {
                NodeKind::Field { ty, .. } => *ty,
                _ => unreachable!(),
            };
            let size = Self::size_of(m, field_ty).ok_or(InternalError::MissingLayout {
                what: "field type size",
                field: format!("{field}"),
            })?;
            at = at.next_multiple_of(size);
            align = align.max(size);
            if let NodeKind::Field { offset, .. } = m.kind_mut(field) {
                *offset = Some(at);
            }
            at += size;
        }
        if let NodeKind::StructType { size, .. } = m.kind_mut(id) {
            *size = Some(at.next_multiple_of(align));
        }
        Ok(())
    }
}

fn point_struct(m: &mut Module) -> NodeId {
    let span = Span::point(1, 1);
    let i32_ty = m.alloc_native_type("i32", span);
    let a = m.alloc_field("a", i32_ty, Span::point(2, 5));
    let b = m.alloc_field("b", i32_ty, Span::point(3, 5));
    m.alloc(
        NodeKind::StructType {
            name: "Point".into(),
            type_parameters: Vec::new(),
            fields: vec![a, b],
            size: None,
        },
        span,
    )
}

fn program(m: &mut Module, declarations: Vec<NodeId>) -> NodeId {
    m.alloc(NodeKind::Program { declarations }, Span::point(1, 1))
}

fn empty_func(m: &mut Module, name: &str, statements: Vec<NodeId>) -> NodeId {
    let ret = m.alloc_native_type("void", Span::point(1, 1));
    let body = m.alloc(NodeKind::Block { statements }, Span::point(1, 1));
    m.alloc(
        NodeKind::FuncDef {
            name: name.into(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: ret,
            body,
        },
        Span::point(1, 1),
    )
}

fn native_func(m: &mut Module, name: &str, parameters: Vec<NodeId>, return_type: NodeId) -> NodeId {
    m.alloc(
        NodeKind::NativeFunc {
            name: name.into(),
            type_parameters: Vec::new(),
            parameters,
            return_type,
            accessor: None,
        },
        Span::point(1, 1),
    )
}

/// Synthesize, resolve, and return the accessor with the given name.
fn pipeline(m: &mut Module, p: NodeId, accessor_name: &str) -> NodeId {
    let ids = synthesize_struct_accessors(m, p).unwrap();
    resolve_program(m, p).unwrap();
    ids.iter()
        .copied()
        .find(|&id| matches!(m.kind(id), NodeKind::NativeFunc { name, .. } if name == accessor_name))
        .unwrap()
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn dot_access_sees_synthesized_accessors() {
    let mut m = Module::new();
    let point = point_struct(&mut m);

    let point_ref = m.alloc_type_ref("Point", Span::point(5, 5));
    let decl = m.alloc(
        NodeKind::VariableDecl {
            name: "p".into(),
            ty: point_ref,
            initializer: None,
        },
        Span::point(5, 1),
    );
    let base = m.alloc_variable_ref("p", Span::point(6, 1));
    let dot = m.alloc_dot(base, "a", Span::point(6, 1));
    let f = empty_func(&mut m, "main", vec![decl, dot]);
    let p = program(&mut m, vec![point, f]);

    synthesize_struct_accessors(&mut m, p).unwrap();
    resolve_program(&mut m, p).unwrap();

    match m.kind(dot) {
        NodeKind::DotExpression {
            possible_get_overloads,
            possible_set_overloads,
            possible_and_overloads,
            ..
        } => {
            assert_eq!(possible_get_overloads.len(), 1);
            assert_eq!(possible_set_overloads.len(), 1);
            // One ander per address space.
            assert_eq!(possible_and_overloads.len(), 4);
        }
        other => panic!("dot expression became {}", other.name()),
    }
}

#[test]
fn property_with_no_accessors_is_fatal() {
    let mut m = Module::new();
    let point = point_struct(&mut m);

    let point_ref = m.alloc_type_ref("Point", Span::point(5, 5));
    let decl = m.alloc(
        NodeKind::VariableDecl {
            name: "p".into(),
            ty: point_ref,
            initializer: None,
        },
        Span::point(5, 1),
    );
    let base = m.alloc_variable_ref("p", Span::point(6, 1));
    // No field `c`, so no synthesized accessors for it.
    let dot = m.alloc_dot(base, "c", Span::point(6, 1));
    let f = empty_func(&mut m, "main", vec![decl, dot]);
    let p = program(&mut m, vec![point, f]);

    synthesize_struct_accessors(&mut m, p).unwrap();
    let err = resolve_program(&mut m, p).unwrap_err();
    assert!(matches!(err, SemanticError::NoPropertyAccess { name, .. } if name == "c"));
}

#[test]
fn setter_alone_is_not_property_access() {
    let mut m = Module::new();
    let i32_ty = m.alloc_native_type("i32", Span::point(1, 1));
    // Hand-declared setter with no getter and no ander.
    let this = m.alloc_parameter("self", i32_ty, Span::point(1, 1));
    let value = m.alloc_parameter("value", i32_ty, Span::point(1, 1));
    let setter = native_func(&mut m, "operator.secret=", vec![this, value], i32_ty);

    let decl = m.alloc(
        NodeKind::VariableDecl {
            name: "x".into(),
            ty: i32_ty,
            initializer: None,
        },
        Span::point(2, 1),
    );
    let base = m.alloc_variable_ref("x", Span::point(3, 1));
    let dot = m.alloc_dot(base, "secret", Span::point(3, 1));
    let f = empty_func(&mut m, "main", vec![decl, dot]);
    let p = program(&mut m, vec![setter, f]);

    let err = resolve_program(&mut m, p).unwrap_err();
    assert!(matches!(err, SemanticError::NoPropertyAccess { name, .. } if name == "secret"));
}

#[test]
fn hand_written_getter_joins_the_overload_set() {
    let mut m = Module::new();
    let point = point_struct(&mut m);

    // A user-defined `operator.a` overload on a different receiver type.
    let f32_ty = m.alloc_native_type("f32", Span::point(1, 1));
    let this = m.alloc_parameter("self", f32_ty, Span::point(1, 1));
    let custom = native_func(&mut m, "operator.a", vec![this], f32_ty);

    let point_ref = m.alloc_type_ref("Point", Span::point(5, 5));
    let decl = m.alloc(
        NodeKind::VariableDecl {
            name: "p".into(),
            ty: point_ref,
            initializer: None,
        },
        Span::point(5, 1),
    );
    let base = m.alloc_variable_ref("p", Span::point(6, 1));
    let dot = m.alloc_dot(base, "a", Span::point(6, 1));
    let f = empty_func(&mut m, "main", vec![decl, dot]);
    let p = program(&mut m, vec![point, custom, f]);

    synthesize_struct_accessors(&mut m, p).unwrap();
    resolve_program(&mut m, p).unwrap();

    // Overload accumulation: the set holds both the hand-written and the
    // synthesized getter; narrowing is a later pass's job.
    match m.kind(dot) {
        NodeKind::DotExpression {
            possible_get_overloads,
            ..
        } => {
            assert_eq!(possible_get_overloads.len(), 2);
            assert!(possible_get_overloads.contains(&custom));
        }
        other => panic!("dot expression became {}", other.name()),
    }
}

#[test]
fn call_collects_every_overload_of_the_name() {
    let mut m = Module::new();
    let i32_ty = m.alloc_native_type("i32", Span::point(1, 1));
    let f32_ty = m.alloc_native_type("f32", Span::point(1, 1));

    // Two functions named `f` with different signatures.
    let int_param = m.alloc_parameter("x", i32_ty, Span::point(1, 8));
    let f_int = native_func(&mut m, "f", vec![int_param], i32_ty);
    let float_param = m.alloc_parameter("x", f32_ty, Span::point(2, 8));
    let f_float = native_func(&mut m, "f", vec![float_param], f32_ty);

    let arg_decl = m.alloc(
        NodeKind::VariableDecl {
            name: "v".into(),
            ty: i32_ty,
            initializer: None,
        },
        Span::point(3, 1),
    );
    let arg = m.alloc_variable_ref("v", Span::point(4, 3));
    let call = m.alloc_call("f", vec![arg], Span::point(4, 1));
    let f = empty_func(&mut m, "main", vec![arg_decl, call]);
    let p = program(&mut m, vec![f_int, f_float, f]);

    resolve_program(&mut m, p).unwrap();

    // Both overloads land in the set; narrowing to one is the
    // downstream checker's job, and no cast fallback fires.
    match m.kind(call) {
        NodeKind::CallExpression {
            possible_overloads,
            cast_type: None,
            ..
        } => assert_eq!(possible_overloads, &vec![f_int, f_float]),
        other => panic!("call resolved to {other:?}"),
    }
}

#[test]
fn call_on_type_name_becomes_a_cast() {
    let mut m = Module::new();
    let i32_ty = m.alloc_native_type("i32", Span::point(1, 1));
    let f32_ty = m.alloc_native_type("f32", Span::point(1, 1));
    let arg_decl = m.alloc(
        NodeKind::VariableDecl {
            name: "x".into(),
            ty: f32_ty,
            initializer: None,
        },
        Span::point(2, 1),
    );
    let from = m.alloc_parameter("from", f32_ty, Span::point(1, 1));
    let cast = native_func(&mut m, "operator cast", vec![from], i32_ty);

    let arg = m.alloc_variable_ref("x", Span::point(3, 5));
    let call = m.alloc_call("i32", vec![arg], Span::point(3, 1));
    let f = empty_func(&mut m, "main", vec![arg_decl, call]);
    let p = program(&mut m, vec![i32_ty, f32_ty, cast, f]);

    resolve_program(&mut m, p).unwrap();

    match m.kind(call) {
        NodeKind::CallExpression {
            possible_overloads,
            cast_type: Some(cast_type),
            ..
        } => {
            assert_eq!(possible_overloads, &vec![cast]);
            assert!(matches!(
                m.kind(*cast_type),
                NodeKind::TypeRef { resolved: Some(r), .. } if *r == i32_ty
            ));
        }
        other => panic!("call resolved to {other:?}"),
    }
}

#[test]
fn cast_fallback_without_cast_overloads_is_fatal() {
    let mut m = Module::new();
    let i32_ty = m.alloc_native_type("i32", Span::point(1, 1));
    // `i32` names a type, but no `operator cast` exists anywhere.
    let call = m.alloc_call("i32", Vec::new(), Span::new(2, 1, 6));
    let f = empty_func(&mut m, "main", vec![call]);
    let p = program(&mut m, vec![i32_ty, f]);

    let err = resolve_program(&mut m, p).unwrap_err();
    assert!(matches!(err, SemanticError::NoOverloads { name, .. } if name == "i32"));
}

#[test]
fn resolving_a_program_twice_changes_nothing() {
    let mut m = Module::new();
    let point = point_struct(&mut m);
    let point_ref = m.alloc_type_ref("Point", Span::point(5, 5));
    let decl = m.alloc(
        NodeKind::VariableDecl {
            name: "p".into(),
            ty: point_ref,
            initializer: None,
        },
        Span::point(5, 1),
    );
    let base = m.alloc_variable_ref("p", Span::point(6, 1));
    let dot = m.alloc_dot(base, "b", Span::point(6, 1));
    let f = empty_func(&mut m, "main", vec![decl, dot]);
    let p = program(&mut m, vec![point, f]);

    synthesize_struct_accessors(&mut m, p).unwrap();
    resolve_program(&mut m, p).unwrap();
    let node_count = m.len();
    let overloads_before = match m.kind(dot) {
        NodeKind::DotExpression {
            possible_get_overloads,
            ..
        } => possible_get_overloads.clone(),
        _ => unreachable!(),
    };

    resolve_program(&mut m, p).unwrap();

    assert_eq!(m.len(), node_count);
    match m.kind(dot) {
        NodeKind::DotExpression {
            possible_get_overloads,
            ..
        } => assert_eq!(possible_get_overloads, &overloads_before),
        _ => unreachable!(),
    }
}

#[test]
fn enum_qualified_access_desugars_before_binding() {
    let mut m = Module::new();
    let red = m.alloc(
        NodeKind::EnumMember {
            name: "Red".into(),
            value: 0,
        },
        Span::point(1, 14),
    );
    let green = m.alloc(
        NodeKind::EnumMember {
            name: "Green".into(),
            value: 1,
        },
        Span::point(1, 19),
    );
    let color = m.alloc(
        NodeKind::EnumType {
            name: "Color".into(),
            members: vec![red, green],
        },
        Span::point(1, 1),
    );
    let base = m.alloc_variable_ref("Color", Span::point(3, 1));
    let dot = m.alloc_dot(base, "Green", Span::point(3, 1));
    let f = empty_func(&mut m, "main", vec![dot]);
    let p = program(&mut m, vec![color, f]);

    resolve_program(&mut m, p).unwrap();

    // The dot node itself became the literal; its id is unchanged.
    assert!(matches!(
        m.kind(dot),
        NodeKind::EnumLiteral { enum_type, member }
            if *enum_type == color && *member == green
    ));
    // The base VariableRef was never bound as a variable.
    assert!(matches!(
        m.kind(base),
        NodeKind::VariableRef { binding: None, .. }
    ));
}

// ============================================================================
// Type Computation After Resolution
// ============================================================================

#[test]
fn type_of_chases_resolved_references() {
    let mut m = Module::new();
    let point = point_struct(&mut m);
    let point_ref = m.alloc_type_ref("Point", Span::point(5, 5));
    let decl = m.alloc(
        NodeKind::VariableDecl {
            name: "p".into(),
            ty: point_ref,
            initializer: None,
        },
        Span::point(5, 1),
    );
    let reference = m.alloc_variable_ref("p", Span::point(6, 1));
    let f = empty_func(&mut m, "main", vec![decl, reference]);
    let p = program(&mut m, vec![point, f]);

    resolve_program(&mut m, p).unwrap();

    // VariableRef -> VariableDecl -> TypeRef -> StructType.
    assert_eq!(type_of(&mut m, reference).unwrap(), point);
}

#[test]
fn type_of_an_unresolved_reference_is_an_internal_error() {
    let mut m = Module::new();
    let reference = m.alloc_variable_ref("p", Span::point(1, 1));
    // Resolution never ran.
    assert!(matches!(
        type_of(&mut m, reference),
        Err(InternalError::Unresolved { kind: "VariableRef", .. })
    ));
}

// ============================================================================
// Accessor Semantics
// ============================================================================

#[test]
fn getter_reads_laid_out_field_bytes() {
    let mut m = Module::new();
    let point = point_struct(&mut m);
    let p = program(&mut m, vec![point]);
    let getter = pipeline(&mut m, p, "operator.b");

    let mut data = instantiate(&mut m, getter, &[]).unwrap();
    let mut layout = NaturalLayout;
    visit_implementation_data(&mut m, &data, &mut layout).unwrap();
    did_layout(&m, &mut data).unwrap();

    assert_eq!(
        data.state,
        AccessorState::Complete {
            offset: 4,
            struct_size: 8,
            field_size: 4,
        }
    );

    let value = Value::Bytes(vec![1, 0, 0, 0, 2, 0, 0, 0]);
    let result = call_accessor(&m, getter, &data, &[value]).unwrap();
    assert_eq!(result.as_bytes(), Some(&[2u8, 0, 0, 0][..]));
}

#[test]
fn setter_produces_an_updated_struct_value() {
    let mut m = Module::new();
    let point = point_struct(&mut m);
    let p = program(&mut m, vec![point]);
    let setter = pipeline(&mut m, p, "operator.a=");

    let mut data = instantiate(&mut m, setter, &[]).unwrap();
    let mut layout = NaturalLayout;
    visit_implementation_data(&mut m, &data, &mut layout).unwrap();
    did_layout(&m, &mut data).unwrap();

    let original = Value::Bytes(vec![1, 0, 0, 0, 2, 0, 0, 0]);
    let new_a = Value::Bytes(vec![9, 0, 0, 0]);
    let result = call_accessor(&m, setter, &data, &[original.clone(), new_a]).unwrap();

    assert_eq!(result.as_bytes(), Some(&[9u8, 0, 0, 0, 2, 0, 0, 0][..]));
    assert_eq!(original.as_bytes(), Some(&[1u8, 0, 0, 0, 2, 0, 0, 0][..]));
}

#[test]
fn ander_aliases_the_source_storage() {
    let mut m = Module::new();
    let point = point_struct(&mut m);
    let p = program(&mut m, vec![point]);
    let ander = pipeline(&mut m, p, "operator&.b");

    let mut data = instantiate(&mut m, ander, &[]).unwrap();
    let mut layout = NaturalLayout;
    visit_implementation_data(&mut m, &data, &mut layout).unwrap();
    did_layout(&m, &mut data).unwrap();

    let storage = Storage::new(vec![1, 0, 0, 0, 2, 0, 0, 0]);
    let arg = Value::Ptr(Some(Pointer::new(storage.clone(), 0)));
    let result = call_accessor(&m, ander, &data, &[arg]).unwrap();

    let field_ptr = result.as_ptr().unwrap().unwrap();
    assert_eq!(field_ptr.offset(), 4);
    assert!(field_ptr.storage().same_buffer(&storage));

    // Writing through the field pointer mutates the original struct.
    field_ptr.write(&[7, 0, 0, 0]);
    assert_eq!(storage.to_vec(), vec![1, 0, 0, 0, 7, 0, 0, 0]);
}

#[test]
fn ander_on_null_pointer_traps() {
    let mut m = Module::new();
    let point = point_struct(&mut m);
    let p = program(&mut m, vec![point]);
    let ander = pipeline(&mut m, p, "operator&.a");

    let mut data = instantiate(&mut m, ander, &[]).unwrap();
    let mut layout = NaturalLayout;
    visit_implementation_data(&mut m, &data, &mut layout).unwrap();
    did_layout(&m, &mut data).unwrap();

    let result = call_accessor(&m, ander, &data, &[Value::null()]);
    assert!(matches!(
        result,
        Err(ExecError::Trap(TrapError::NullDereference { .. }))
    ));
}

#[test]
fn layout_protocol_order_is_enforced() {
    let mut m = Module::new();
    let point = point_struct(&mut m);
    let p = program(&mut m, vec![point]);
    let getter = pipeline(&mut m, p, "operator.a");

    let mut data = instantiate(&mut m, getter, &[]).unwrap();

    // did_layout before the layout visitor ran: nothing is populated.
    assert!(matches!(
        did_layout(&m, &mut data),
        Err(InternalError::MissingLayout { .. })
    ));

    // Calling a still-pending accessor is equally fatal, never a guess.
    let arg = Value::Bytes(vec![0; 8]);
    assert!(matches!(
        call_accessor(&m, getter, &data, &[arg]),
        Err(ExecError::Internal(InternalError::MissingLayout { .. }))
    ));

    // Running the protocol in order makes the same accessor callable.
    let mut layout = NaturalLayout;
    visit_implementation_data(&mut m, &data, &mut layout).unwrap();
    did_layout(&m, &mut data).unwrap();
    let arg = Value::Bytes(vec![5, 0, 0, 0, 6, 0, 0, 0]);
    let result = call_accessor(&m, getter, &data, &[arg]).unwrap();
    assert_eq!(result.as_bytes(), Some(&[5u8, 0, 0, 0][..]));
}

#[test]
fn generic_struct_specializations_lay_out_independently() {
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
    let p = program(&mut m, vec![boxed]);
    let getter = pipeline(&mut m, p, "operator.value");

    let i32_ty = m.alloc_native_type("i32", span);
    let bool_ty = m.alloc_native_type("bool", span);

    let mut for_i32 = instantiate(&mut m, getter, &[i32_ty]).unwrap();
    let mut for_bool = instantiate(&mut m, getter, &[bool_ty]).unwrap();
    let mut layout = NaturalLayout;
    visit_implementation_data(&mut m, &for_i32, &mut layout).unwrap();
    visit_implementation_data(&mut m, &for_bool, &mut layout).unwrap();
    did_layout(&m, &mut for_i32).unwrap();
    did_layout(&m, &mut for_bool).unwrap();

    assert_eq!(
        for_i32.state,
        AccessorState::Complete {
            offset: 0,
            struct_size: 4,
            field_size: 4,
        }
    );
    assert_eq!(
        for_bool.state,
        AccessorState::Complete {
            offset: 0,
            struct_size: 1,
            field_size: 1,
        }
    );
    // The generic original never gained a size.
    assert!(matches!(
        m.kind(boxed),
        NodeKind::StructType { size: None, .. }
    ));
}
