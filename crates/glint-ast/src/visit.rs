//! Double-dispatch traversal over the node set.
//!
//! [`Visitor`] exposes one overridable method per node kind, each
//! defaulting to [`walk_children`]. [`dispatch_node`] is the exhaustive
//! match routing a node to its method; it has no default arm, so adding a
//! node kind is a compile-time decision for every pass.
//!
//! Passes that consider a kind invalid for their purpose must return an
//! error from the override, never fall through to a silent default.

use crate::{Module, NodeId, NodeKind};

/// A tree pass. Override only the kinds the pass cares about.
pub trait Visitor: Sized {
    type Error;

    /// Visit one node, dispatching on its kind.
    fn visit_node(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        dispatch_node(self, m, id)
    }

    fn visit_program(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_func_def(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_native_func(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_native_func_instance(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_func_parameter(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_variable_decl(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_type_def(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_field(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_enum_member(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_protocol_decl(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_protocol_func_decl(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_type_variable(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_constexpr_type_parameter(
        &mut self,
        m: &mut Module,
        id: NodeId,
    ) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_struct_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_enum_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_native_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_native_type_instance(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_ptr_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_array_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_array_ref_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_reference_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_vector_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_matrix_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_type_ref(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_generic_literal_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_null_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_protocol_ref(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_block(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_function_like_block(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_return(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_if_statement(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_while_loop(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_do_while_loop(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_for_loop(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_switch_statement(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_switch_case(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_break(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_continue(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_trap_statement(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_variable_ref(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_call_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_dot_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_index_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_assignment(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_comma_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_identity_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_logical_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_logical_not(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_read_modify_write_expression(
        &mut self,
        m: &mut Module,
        id: NodeId,
    ) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_dereference_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_make_ptr_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_make_array_ref_expression(
        &mut self,
        m: &mut Module,
        id: NodeId,
    ) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_convert_ptr_to_array_ref_expression(
        &mut self,
        m: &mut Module,
        id: NodeId,
    ) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_anonymous_variable(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_bool_literal(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_generic_literal(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_null_literal(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
    fn visit_enum_literal(&mut self, m: &mut Module, id: NodeId) -> Result<(), Self::Error> {
        walk_children(self, m, id)
    }
}

/// Route a node to its per-kind visitor method.
///
/// No default arm: every node kind appears here.
pub fn dispatch_node<V: Visitor>(v: &mut V, m: &mut Module, id: NodeId) -> Result<(), V::Error> {
    match m.kind(id) {
        NodeKind::Program { .. } => v.visit_program(m, id),
        NodeKind::FuncDef { .. } => v.visit_func_def(m, id),
        NodeKind::NativeFunc { .. } => v.visit_native_func(m, id),
        NodeKind::NativeFuncInstance { .. } => v.visit_native_func_instance(m, id),
        NodeKind::FuncParameter { .. } => v.visit_func_parameter(m, id),
        NodeKind::VariableDecl { .. } => v.visit_variable_decl(m, id),
        NodeKind::TypeDef { .. } => v.visit_type_def(m, id),
        NodeKind::Field { .. } => v.visit_field(m, id),
        NodeKind::EnumMember { .. } => v.visit_enum_member(m, id),
        NodeKind::ProtocolDecl { .. } => v.visit_protocol_decl(m, id),
        NodeKind::ProtocolFuncDecl { .. } => v.visit_protocol_func_decl(m, id),
        NodeKind::TypeVariable { .. } => v.visit_type_variable(m, id),
        NodeKind::ConstexprTypeParameter { .. } => v.visit_constexpr_type_parameter(m, id),
        NodeKind::StructType { .. } => v.visit_struct_type(m, id),
        NodeKind::EnumType { .. } => v.visit_enum_type(m, id),
        NodeKind::NativeType { .. } => v.visit_native_type(m, id),
        NodeKind::NativeTypeInstance { .. } => v.visit_native_type_instance(m, id),
        NodeKind::PtrType { .. } => v.visit_ptr_type(m, id),
        NodeKind::ArrayType { .. } => v.visit_array_type(m, id),
        NodeKind::ArrayRefType { .. } => v.visit_array_ref_type(m, id),
        NodeKind::ReferenceType { .. } => v.visit_reference_type(m, id),
        NodeKind::VectorType { .. } => v.visit_vector_type(m, id),
        NodeKind::MatrixType { .. } => v.visit_matrix_type(m, id),
        NodeKind::TypeRef { .. } => v.visit_type_ref(m, id),
        NodeKind::GenericLiteralType { .. } => v.visit_generic_literal_type(m, id),
        NodeKind::NullType => v.visit_null_type(m, id),
        NodeKind::ProtocolRef { .. } => v.visit_protocol_ref(m, id),
        NodeKind::Block { .. } => v.visit_block(m, id),
        NodeKind::FunctionLikeBlock { .. } => v.visit_function_like_block(m, id),
        NodeKind::Return { .. } => v.visit_return(m, id),
        NodeKind::IfStatement { .. } => v.visit_if_statement(m, id),
        NodeKind::WhileLoop { .. } => v.visit_while_loop(m, id),
        NodeKind::DoWhileLoop { .. } => v.visit_do_while_loop(m, id),
        NodeKind::ForLoop { .. } => v.visit_for_loop(m, id),
        NodeKind::SwitchStatement { .. } => v.visit_switch_statement(m, id),
        NodeKind::SwitchCase { .. } => v.visit_switch_case(m, id),
        NodeKind::Break => v.visit_break(m, id),
        NodeKind::Continue => v.visit_continue(m, id),
        NodeKind::TrapStatement => v.visit_trap_statement(m, id),
        NodeKind::VariableRef { .. } => v.visit_variable_ref(m, id),
        NodeKind::CallExpression { .. } => v.visit_call_expression(m, id),
        NodeKind::DotExpression { .. } => v.visit_dot_expression(m, id),
        NodeKind::IndexExpression { .. } => v.visit_index_expression(m, id),
        NodeKind::Assignment { .. } => v.visit_assignment(m, id),
        NodeKind::CommaExpression { .. } => v.visit_comma_expression(m, id),
        NodeKind::IdentityExpression { .. } => v.visit_identity_expression(m, id),
        NodeKind::LogicalExpression { .. } => v.visit_logical_expression(m, id),
        NodeKind::LogicalNot { .. } => v.visit_logical_not(m, id),
        NodeKind::ReadModifyWriteExpression { .. } => v.visit_read_modify_write_expression(m, id),
        NodeKind::DereferenceExpression { .. } => v.visit_dereference_expression(m, id),
        NodeKind::MakePtrExpression { .. } => v.visit_make_ptr_expression(m, id),
        NodeKind::MakeArrayRefExpression { .. } => v.visit_make_array_ref_expression(m, id),
        NodeKind::ConvertPtrToArrayRefExpression { .. } => {
            v.visit_convert_ptr_to_array_ref_expression(m, id)
        }
        NodeKind::AnonymousVariable { .. } => v.visit_anonymous_variable(m, id),
        NodeKind::BoolLiteral { .. } => v.visit_bool_literal(m, id),
        NodeKind::GenericLiteral { .. } => v.visit_generic_literal(m, id),
        NodeKind::NullLiteral { .. } => v.visit_null_literal(m, id),
        NodeKind::EnumLiteral { .. } => v.visit_enum_literal(m, id),
    }
}

/// Visit every direct child of a node, in source order.
pub fn walk_children<V: Visitor>(v: &mut V, m: &mut Module, id: NodeId) -> Result<(), V::Error> {
    for child in m.children(id) {
        v.visit_node(m, child)?;
    }
    Ok(())
}
