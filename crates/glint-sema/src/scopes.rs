//! Lexical scope chain for name resolution.
//!
//! Scopes live in an arena linked by parent *index*, not owning pointers,
//! so a child never keeps its parent alive and the chain cannot form an
//! ownership cycle. The resolver creates one child scope per nested
//! construct and drops back to the parent id when the construct closes.
//!
//! Three namespaces:
//! - `Value` and `Type` hold a single binding per name per scope; an
//!   inner binding shadows an outer one.
//! - `Func` holds an overload list per name. Lookup never shadows: it
//!   unions the lists from every scope on the ancestor chain, innermost
//!   first.

use glint_ast::{Module, NodeId, NodeKind};
use rustc_hash::FxHashMap;

/// Index of a scope within [`Scopes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

/// Which namespace a declaration binds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Value,
    Type,
    Func,
}

#[derive(Debug, Default)]
struct ScopeRec {
    parent: Option<ScopeId>,
    values: FxHashMap<String, NodeId>,
    types: FxHashMap<String, NodeId>,
    funcs: FxHashMap<String, Vec<NodeId>>,
}

/// The scope arena, plus the current-statement stack used to stamp
/// `Return` nodes with their enclosing function.
#[derive(Debug)]
pub struct Scopes {
    scopes: Vec<ScopeRec>,
    statements: Vec<NodeId>,
}

impl Scopes {
    /// Create an arena holding only the root (global) scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeRec::default()],
            statements: Vec::new(),
        }
    }

    /// The root scope.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a child of `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeRec {
            parent: Some(parent),
            ..ScopeRec::default()
        });
        id
    }

    fn rec(&self, id: ScopeId) -> &ScopeRec {
        &self.scopes[id.0 as usize]
    }

    fn rec_mut(&mut self, id: ScopeId) -> &mut ScopeRec {
        &mut self.scopes[id.0 as usize]
    }

    // ==========================================================================
    // Binding
    // ==========================================================================

    /// The namespace a declaration kind binds into, or `None` for nodes
    /// that declare nothing.
    pub fn namespace_of(kind: &NodeKind) -> Option<Namespace> {
        match kind {
            NodeKind::VariableDecl { .. }
            | NodeKind::FuncParameter { .. }
            | NodeKind::EnumMember { .. }
            | NodeKind::AnonymousVariable { .. } => Some(Namespace::Value),
            NodeKind::TypeDef { .. }
            | NodeKind::StructType { .. }
            | NodeKind::EnumType { .. }
            | NodeKind::NativeType { .. }
            | NodeKind::TypeVariable { .. }
            | NodeKind::ConstexprTypeParameter { .. }
            | NodeKind::ProtocolDecl { .. } => Some(Namespace::Type),
            NodeKind::FuncDef { .. } | NodeKind::NativeFunc { .. } => Some(Namespace::Func),
            _ => None,
        }
    }

    /// The name a declaration kind binds, if it binds one.
    pub fn name_of(kind: &NodeKind) -> Option<&str> {
        match kind {
            NodeKind::VariableDecl { name, .. }
            | NodeKind::FuncParameter { name, .. }
            | NodeKind::EnumMember { name, .. }
            | NodeKind::TypeDef { name, .. }
            | NodeKind::StructType { name, .. }
            | NodeKind::EnumType { name, .. }
            | NodeKind::NativeType { name, .. }
            | NodeKind::TypeVariable { name, .. }
            | NodeKind::ConstexprTypeParameter { name, .. }
            | NodeKind::ProtocolDecl { name, .. }
            | NodeKind::FuncDef { name, .. }
            | NodeKind::NativeFunc { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Bind a declaration node into `scope` under its own namespace and
    /// name. Declarations that bind nothing are ignored.
    ///
    /// `Value` and `Type` bindings replace an existing binding of the
    /// same name at this scope level (last added wins); `Func` bindings
    /// append to the overload list instead.
    pub fn add(&mut self, scope: ScopeId, m: &Module, decl: NodeId) {
        let kind = m.kind(decl);
        let (Some(ns), Some(name)) = (Self::namespace_of(kind), Self::name_of(kind)) else {
            return;
        };
        let name = name.to_string();
        match ns {
            Namespace::Value => {
                self.rec_mut(scope).values.insert(name, decl);
            }
            Namespace::Type => {
                self.rec_mut(scope).types.insert(name, decl);
            }
            Namespace::Func => {
                self.rec_mut(scope).funcs.entry(name).or_default().push(decl);
            }
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Look up a `Value` binding, walking outward from `scope`.
    pub fn get_value(&self, scope: ScopeId, name: &str) -> Option<NodeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(&binding) = self.rec(id).values.get(name) {
                return Some(binding);
            }
            current = self.rec(id).parent;
        }
        None
    }

    /// Look up a `Type` binding, walking outward from `scope`.
    pub fn get_type(&self, scope: ScopeId, name: &str) -> Option<NodeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(&binding) = self.rec(id).types.get(name) {
                return Some(binding);
            }
            current = self.rec(id).parent;
        }
        None
    }

    /// Accumulate the `Func` overload set for `name`, unioning the lists
    /// from every scope on the ancestor chain, innermost first.
    pub fn get_funcs(&self, scope: ScopeId, name: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(list) = self.rec(id).funcs.get(name) {
                out.extend(list.iter().copied());
            }
            current = self.rec(id).parent;
        }
        out
    }

    // ==========================================================================
    // Current Statement
    // ==========================================================================

    /// Record `statement` as the innermost enclosing statement for the
    /// duration of a nested visit. Must be paired with
    /// [`Scopes::exit_statement`].
    pub fn enter_statement(&mut self, statement: NodeId) {
        self.statements.push(statement);
    }

    /// Pop the innermost enclosing statement.
    pub fn exit_statement(&mut self) {
        self.statements.pop();
    }

    /// The innermost enclosing statement, if any.
    pub fn current_statement(&self) -> Option<NodeId> {
        self.statements.last().copied()
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}
