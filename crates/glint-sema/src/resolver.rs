//! Name resolution.
//!
//! [`NameResolver`] walks the tree once, binding every reference node to
//! a declaration. A fresh child scope is entered for every source-level
//! nesting: function signature, function body (separate from the
//! signature, so parameters are visible in the body but not vice versa),
//! each block, loop body, if/else arm, struct/typedef body, and each
//! reference-type's pointee type.
//!
//! Two desugarings happen in place via [`Module::replace`]:
//! - `Color.Red`, parsed as `VariableRef` + dot, becomes an
//!   `EnumLiteral` when `Color` names a visible enum type.
//! - a call whose name matches no function but names a visible type is
//!   reinterpreted as a cast and resolved under `operator cast`.
//!
//! Resolution is idempotent: every binding lives in an `Option` or a
//! starts-empty `Vec` on the node, and an already-filled node is skipped.
//! The first failure aborts the pass with a [`SemanticError`].

use glint_ast::{Module, NodeId, NodeKind, Visitor, walk_children};
use glint_core::SemanticError;

use crate::scopes::{ScopeId, Scopes};

/// The reserved name casts resolve under.
const CAST_NAME: &str = "operator cast";

/// Resolve a whole program with a fresh scope chain.
pub fn resolve_program(m: &mut Module, program: NodeId) -> Result<(), SemanticError> {
    let mut scopes = Scopes::new();
    let mut resolver = NameResolver::new(&mut scopes);
    resolver.visit_node(m, program)
}

/// The name-resolution pass. One instance wraps one scope chain; the
/// `scope` field tracks the scope for the construct currently being
/// visited.
pub struct NameResolver<'s> {
    scopes: &'s mut Scopes,
    scope: ScopeId,
}

impl<'s> NameResolver<'s> {
    /// Create a resolver rooted at the scope chain's global scope.
    pub fn new(scopes: &'s mut Scopes) -> Self {
        let scope = scopes.root();
        Self { scopes, scope }
    }

    /// Run `f` inside a fresh child of the current scope.
    fn in_child<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.scope;
        self.scope = self.scopes.child(saved);
        let out = f(self);
        self.scope = saved;
        out
    }

    /// Resolve the three accessor overload sets for a property access and
    /// enforce that reading it is possible at all.
    fn resolve_property(
        &mut self,
        m: &Module,
        id: NodeId,
        display: &str,
        getter: &str,
        setter: &str,
        ander: &str,
    ) -> Result<(Vec<NodeId>, Vec<NodeId>, Vec<NodeId>), SemanticError> {
        let get = self.scopes.get_funcs(self.scope, getter);
        let set = self.scopes.get_funcs(self.scope, setter);
        let and = self.scopes.get_funcs(self.scope, ander);
        // A setter alone cannot be read or addressed.
        if get.is_empty() && and.is_empty() {
            return Err(SemanticError::NoPropertyAccess {
                name: display.to_string(),
                span: m.span(id),
            });
        }
        Ok((get, set, and))
    }
}

impl Visitor for NameResolver<'_> {
    type Error = SemanticError;

    fn visit_program(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        // Top-level declarations are all visible to each other, so bind
        // them all before resolving any bodies.
        let NodeKind::Program { declarations } = m.kind(id) else {
            unreachable!("dispatch sent a non-Program here");
        };
        let declarations = declarations.clone();
        for &decl in &declarations {
            self.scopes.add(self.scope, m, decl);
        }
        for decl in declarations {
            self.visit_node(m, decl)?;
        }
        Ok(())
    }

    fn visit_func_def(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::FuncDef {
            type_parameters,
            parameters,
            return_type,
            body,
            ..
        } = m.kind(id)
        else {
            unreachable!("dispatch sent a non-FuncDef here");
        };
        let type_parameters = type_parameters.clone();
        let parameters = parameters.clone();
        let return_type = *return_type;
        let body = *body;

        self.scopes.enter_statement(id);
        let result = self.in_child(|r| {
            for tp in type_parameters {
                r.scopes.add(r.scope, m, tp);
                r.visit_node(m, tp)?;
            }
            for p in parameters {
                r.scopes.add(r.scope, m, p);
                r.visit_node(m, p)?;
            }
            r.visit_node(m, return_type)?;
            // The body scope is a child of the signature scope:
            // parameters are visible inside, body locals are not visible
            // to the signature.
            r.in_child(|r| r.visit_node(m, body))
        });
        self.scopes.exit_statement();
        result
    }

    fn visit_native_func(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::NativeFunc {
            type_parameters,
            parameters,
            return_type,
            ..
        } = m.kind(id)
        else {
            unreachable!("dispatch sent a non-NativeFunc here");
        };
        let type_parameters = type_parameters.clone();
        let parameters = parameters.clone();
        let return_type = *return_type;

        self.in_child(|r| {
            for tp in type_parameters {
                r.scopes.add(r.scope, m, tp);
                r.visit_node(m, tp)?;
            }
            for p in parameters {
                r.scopes.add(r.scope, m, p);
                r.visit_node(m, p)?;
            }
            r.visit_node(m, return_type)
        })
    }

    fn visit_function_like_block(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::FunctionLikeBlock {
            parameters,
            return_type,
            body,
        } = m.kind(id)
        else {
            unreachable!("dispatch sent a non-FunctionLikeBlock here");
        };
        let parameters = parameters.clone();
        let return_type = *return_type;
        let body = body.clone();

        self.in_child(|r| {
            for p in parameters {
                r.scopes.add(r.scope, m, p);
                r.visit_node(m, p)?;
            }
            if let Some(ret) = return_type {
                r.visit_node(m, ret)?;
            }
            r.in_child(|r| {
                for stmt in body {
                    r.visit_node(m, stmt)?;
                }
                Ok(())
            })
        })
    }

    fn visit_block(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        self.in_child(|r| walk_children(r, m, id))
    }

    fn visit_if_statement(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::IfStatement {
            condition,
            then_body,
            else_body,
        } = m.kind(id)
        else {
            unreachable!("dispatch sent a non-IfStatement here");
        };
        let condition = *condition;
        let then_body = *then_body;
        let else_body = *else_body;

        self.visit_node(m, condition)?;
        self.in_child(|r| r.visit_node(m, then_body))?;
        if let Some(else_body) = else_body {
            self.in_child(|r| r.visit_node(m, else_body))?;
        }
        Ok(())
    }

    fn visit_while_loop(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::WhileLoop { condition, body } = m.kind(id) else {
            unreachable!("dispatch sent a non-WhileLoop here");
        };
        let condition = *condition;
        let body = *body;

        self.visit_node(m, condition)?;
        self.in_child(|r| r.visit_node(m, body))
    }

    fn visit_do_while_loop(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::DoWhileLoop { body, condition } = m.kind(id) else {
            unreachable!("dispatch sent a non-DoWhileLoop here");
        };
        let body = *body;
        let condition = *condition;

        self.in_child(|r| r.visit_node(m, body))?;
        self.visit_node(m, condition)
    }

    fn visit_for_loop(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        // The whole loop gets one scope (the init declaration lives in
        // it), and the body a nested one.
        let NodeKind::ForLoop {
            initialization,
            condition,
            increment,
            body,
        } = m.kind(id)
        else {
            unreachable!("dispatch sent a non-ForLoop here");
        };
        let initialization = *initialization;
        let condition = *condition;
        let increment = *increment;
        let body = *body;

        self.in_child(|r| {
            if let Some(init) = initialization {
                r.visit_node(m, init)?;
            }
            if let Some(cond) = condition {
                r.visit_node(m, cond)?;
            }
            if let Some(inc) = increment {
                r.visit_node(m, inc)?;
            }
            r.in_child(|r| r.visit_node(m, body))
        })
    }

    fn visit_struct_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::StructType {
            type_parameters, ..
        } = m.kind(id)
        else {
            unreachable!("dispatch sent a non-StructType here");
        };
        let type_parameters = type_parameters.clone();

        self.in_child(|r| {
            for tp in type_parameters {
                r.scopes.add(r.scope, m, tp);
            }
            walk_children(r, m, id)
        })
    }

    fn visit_type_def(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        self.in_child(|r| walk_children(r, m, id))
    }

    fn visit_ptr_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        self.in_child(|r| walk_children(r, m, id))
    }

    fn visit_array_ref_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        self.in_child(|r| walk_children(r, m, id))
    }

    fn visit_reference_type(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        self.in_child(|r| walk_children(r, m, id))
    }

    fn visit_variable_decl(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        // Bind before resolving the declared type and initializer: the
        // new binding shadows an outer one for everything after it in
        // source order, including its own initializer.
        self.scopes.add(self.scope, m, id);
        walk_children(self, m, id)
    }

    fn visit_variable_ref(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::VariableRef { name, binding } = m.kind(id) else {
            unreachable!("dispatch sent a non-VariableRef here");
        };
        if binding.is_some() {
            return Ok(());
        }
        let found = self.scopes.get_value(self.scope, name);
        let span = m.span(id);
        let name = name.clone();
        match found {
            Some(decl) => {
                if let NodeKind::VariableRef { binding, .. } = m.kind_mut(id) {
                    *binding = Some(decl);
                }
                Ok(())
            }
            None => Err(SemanticError::UnknownVariable { name, span }),
        }
    }

    fn visit_type_ref(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::TypeRef { resolved, .. } = m.kind(id) else {
            unreachable!("dispatch sent a non-TypeRef here");
        };
        if resolved.is_some() {
            return Ok(());
        }
        walk_children(self, m, id)?;

        let NodeKind::TypeRef { name, .. } = m.kind(id) else {
            unreachable!("TypeRef changed kind mid-visit");
        };
        let found = self.scopes.get_type(self.scope, name);
        let span = m.span(id);
        let name = name.clone();
        match found {
            Some(decl) => {
                if let NodeKind::TypeRef { resolved, .. } = m.kind_mut(id) {
                    *resolved = Some(decl);
                }
                Ok(())
            }
            None => Err(SemanticError::UnknownType { name, span }),
        }
    }

    fn visit_protocol_ref(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::ProtocolRef { name, resolved } = m.kind(id) else {
            unreachable!("dispatch sent a non-ProtocolRef here");
        };
        if resolved.is_some() {
            return Ok(());
        }
        let found = self.scopes.get_type(self.scope, name);
        let span = m.span(id);
        let name = name.clone();
        match found {
            Some(decl) => {
                if let NodeKind::ProtocolRef { resolved, .. } = m.kind_mut(id) {
                    *resolved = Some(decl);
                }
                Ok(())
            }
            None => Err(SemanticError::UnknownType { name, span }),
        }
    }

    fn visit_dot_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::DotExpression {
            base,
            field,
            possible_get_overloads,
            possible_and_overloads,
            ..
        } = m.kind(id)
        else {
            unreachable!("dispatch sent a non-DotExpression here");
        };
        let base = *base;
        let field = field.clone();
        let already_resolved =
            !possible_get_overloads.is_empty() || !possible_and_overloads.is_empty();

        // Enum-qualified access: `Color.Red` parses as a VariableRef
        // base. If that name denotes a visible enum type, the whole dot
        // expression becomes an enum literal, in place.
        if let NodeKind::VariableRef {
            name,
            binding: None,
        } = m.kind(base)
        {
            if let Some(ty) = self.scopes.get_type(self.scope, name) {
                if matches!(m.kind(ty), NodeKind::EnumType { .. }) {
                    let enum_name = name.clone();
                    let Some(member) = m.enum_member_by_name(ty, &field) else {
                        return Err(SemanticError::UnknownEnumMember {
                            enum_name,
                            member: field,
                            span: m.span(id),
                        });
                    };
                    m.replace(
                        id,
                        NodeKind::EnumLiteral {
                            enum_type: ty,
                            member,
                        },
                    );
                    return Ok(());
                }
            }
        }

        self.visit_node(m, base)?;
        if already_resolved {
            return Ok(());
        }

        let getter = format!("operator.{field}");
        let setter = format!("operator.{field}=");
        let ander = format!("operator&.{field}");
        let (get, set, and) = self.resolve_property(m, id, &field, &getter, &setter, &ander)?;
        if let NodeKind::DotExpression {
            possible_get_overloads,
            possible_set_overloads,
            possible_and_overloads,
            ..
        } = m.kind_mut(id)
        {
            *possible_get_overloads = get;
            *possible_set_overloads = set;
            *possible_and_overloads = and;
        }
        Ok(())
    }

    fn visit_index_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::IndexExpression {
            base,
            index,
            possible_get_overloads,
            possible_and_overloads,
            ..
        } = m.kind(id)
        else {
            unreachable!("dispatch sent a non-IndexExpression here");
        };
        let base = *base;
        let index = *index;
        let already_resolved =
            !possible_get_overloads.is_empty() || !possible_and_overloads.is_empty();

        self.visit_node(m, base)?;
        self.visit_node(m, index)?;
        if already_resolved {
            return Ok(());
        }

        let (get, set, and) =
            self.resolve_property(m, id, "[]", "operator[]", "operator[]=", "operator&[]")?;
        if let NodeKind::IndexExpression {
            possible_get_overloads,
            possible_set_overloads,
            possible_and_overloads,
            ..
        } = m.kind_mut(id)
        {
            *possible_get_overloads = get;
            *possible_set_overloads = set;
            *possible_and_overloads = and;
        }
        Ok(())
    }

    fn visit_call_expression(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        let NodeKind::CallExpression {
            name,
            arguments,
            possible_overloads,
            ..
        } = m.kind(id)
        else {
            unreachable!("dispatch sent a non-CallExpression here");
        };
        let name = name.clone();
        let arguments = arguments.clone();
        let already_resolved = !possible_overloads.is_empty();

        for arg in arguments {
            self.visit_node(m, arg)?;
        }
        if already_resolved {
            return Ok(());
        }

        let mut overloads = self.scopes.get_funcs(self.scope, &name);
        let mut cast_type = None;
        if overloads.is_empty() && name != CAST_NAME {
            // No function of this name. If the name denotes a type, the
            // call is an implicit cast resolved under the universal cast
            // name.
            if let Some(ty) = self.scopes.get_type(self.scope, &name) {
                let span = m.span(id);
                let type_ref = m.alloc(
                    NodeKind::TypeRef {
                        name: name.clone(),
                        type_arguments: Vec::new(),
                        resolved: Some(ty),
                    },
                    span,
                );
                cast_type = Some(type_ref);
                overloads = self.scopes.get_funcs(self.scope, CAST_NAME);
            }
        }
        if overloads.is_empty() {
            return Err(SemanticError::NoOverloads {
                name,
                span: m.span(id),
            });
        }

        if let NodeKind::CallExpression {
            possible_overloads,
            cast_type: slot,
            ..
        } = m.kind_mut(id)
        {
            *possible_overloads = overloads;
            *slot = cast_type;
        }
        Ok(())
    }

    fn visit_return(&mut self, m: &mut Module, id: NodeId) -> Result<(), SemanticError> {
        walk_children(self, m, id)?;
        let enclosing = self.scopes.current_statement();
        if let NodeKind::Return { func, .. } = m.kind_mut(id) {
            if func.is_none() {
                *func = enclosing;
            }
        }
        Ok(())
    }
}
