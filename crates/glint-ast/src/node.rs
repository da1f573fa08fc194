//! AST node kinds and the node arena.
//!
//! Nodes live in a [`Module`]: a flat `Vec` indexed by [`NodeId`]. Child
//! links are `NodeId`s, never owned boxes, which gives two properties the
//! front end depends on:
//!
//! - **Stable identity.** [`Module::replace`] swaps a node's payload in
//!   place. Desugaring (`Color.Red` becoming an enum literal) does not
//!   invalidate any handle held elsewhere.
//! - **Shared structure.** Synthesized declarations may point at existing
//!   type nodes (a getter's return type is the field's declared type
//!   node) without cloning subtrees.
//!
//! Resolution state (`binding`, `resolved`, overload sets, `offset`,
//! `size`) lives directly on the nodes as `Option`s / `Vec`s that start
//! empty and are filled in by later passes. An already-filled field is
//! what makes a second resolution pass a no-op.

use std::fmt;

use glint_core::Span;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable index of a node within its [`Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The raw index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// ============================================================================
// Supporting Types
// ============================================================================

/// Where a pointer's referent is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSpace {
    Thread,
    Threadgroup,
    Device,
    Constant,
}

impl AddressSpace {
    /// All four address spaces, in declaration order.
    pub const ALL: [AddressSpace; 4] = [
        AddressSpace::Thread,
        AddressSpace::Threadgroup,
        AddressSpace::Device,
        AddressSpace::Constant,
    ];

    /// The source-level keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            AddressSpace::Thread => "thread",
            AddressSpace::Threadgroup => "threadgroup",
            AddressSpace::Device => "device",
            AddressSpace::Constant => "constant",
        }
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Short-circuiting logical operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// Which struct-field accessor a synthesized [`NodeKind::NativeFunc`]
/// implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// `operator.<field>(S) -> FieldType`
    Getter,
    /// `operator.<field>=(S, FieldType) -> S`
    Setter,
    /// `operator&.<field>(ptr<AS, S>) -> ptr<AS, FieldType>`
    Ander(AddressSpace),
}

/// Payload attached to a synthesized struct-field accessor, identifying
/// the struct and field it reads or writes.
#[derive(Debug, Clone, PartialEq)]
pub struct StructAccessor {
    pub kind: AccessorKind,
    /// The `StructType` node the accessor was synthesized for.
    pub struct_type: NodeId,
    pub field_name: String,
}

// ============================================================================
// Node Kinds
// ============================================================================

/// The closed set of AST node kinds.
///
/// Every pass over the tree matches on this enum exhaustively; a new kind
/// forces every pass to decide what to do with it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------
    /// Top-level program: an ordered list of declarations.
    Program { declarations: Vec<NodeId> },

    /// A function definition with a body.
    FuncDef {
        name: String,
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        return_type: NodeId,
        body: NodeId,
    },

    /// A bodiless native function. Synthesized struct accessors carry a
    /// [`StructAccessor`] payload; other natives carry `None`.
    NativeFunc {
        name: String,
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        return_type: NodeId,
        accessor: Option<StructAccessor>,
    },

    /// A native function specialized to concrete type arguments.
    NativeFuncInstance {
        base: NodeId,
        type_arguments: Vec<NodeId>,
    },

    /// A function parameter.
    FuncParameter { name: String, ty: NodeId },

    /// A local or global variable declaration.
    VariableDecl {
        name: String,
        ty: NodeId,
        initializer: Option<NodeId>,
    },

    /// A type alias.
    TypeDef { name: String, ty: NodeId },

    /// A struct field. `offset` starts unset and is populated only by the
    /// external layout pass.
    Field {
        name: String,
        ty: NodeId,
        offset: Option<u32>,
    },

    /// A member of an enum.
    EnumMember { name: String, value: i64 },

    /// A protocol (constraint set on type parameters).
    ProtocolDecl { name: String, funcs: Vec<NodeId> },

    /// A function signature required by a protocol.
    ProtocolFuncDecl {
        name: String,
        parameters: Vec<NodeId>,
        return_type: NodeId,
    },

    /// A generic type parameter.
    TypeVariable {
        name: String,
        protocol: Option<NodeId>,
    },

    /// A compile-time value parameter of a generic.
    ConstexprTypeParameter { name: String, ty: NodeId },

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------
    /// A struct type. `size` starts unset and is populated only by the
    /// external layout pass as a side effect of visiting the type.
    StructType {
        name: String,
        type_parameters: Vec<NodeId>,
        fields: Vec<NodeId>,
        size: Option<u32>,
    },

    /// An enum type.
    EnumType { name: String, members: Vec<NodeId> },

    /// A built-in scalar type. `size` is populated by the external layout
    /// pass like struct sizes are.
    NativeType { name: String, size: Option<u32> },

    /// A built-in generic type specialized to concrete arguments.
    NativeTypeInstance {
        base: NodeId,
        type_arguments: Vec<NodeId>,
    },

    /// `ptr<AS, T>`.
    PtrType {
        address_space: AddressSpace,
        element_type: NodeId,
    },

    /// A fixed-length array type.
    ArrayType { element_type: NodeId, length: u32 },

    /// A bounds-carrying reference to an array in some address space.
    ArrayRefType {
        address_space: AddressSpace,
        element_type: NodeId,
    },

    /// A language-level reference type.
    ReferenceType { element_type: NodeId },

    /// `vecN<T>`.
    VectorType { element_type: NodeId, length: u32 },

    /// `matNxM<T>`.
    MatrixType {
        element_type: NodeId,
        rows: u32,
        columns: u32,
    },

    /// A by-name reference to a type. `resolved` is bound by name
    /// resolution.
    TypeRef {
        name: String,
        type_arguments: Vec<NodeId>,
        resolved: Option<NodeId>,
    },

    /// The type of an untyped literal, carrying its preferred type.
    GenericLiteralType { ty: NodeId },

    /// The type of the `null` literal.
    NullType,

    /// A by-name reference to a protocol.
    ProtocolRef {
        name: String,
        resolved: Option<NodeId>,
    },

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------
    /// `{ ... }`
    Block { statements: Vec<NodeId> },

    /// A block that behaves like a function body: parameters and an
    /// optional return type. Produced by desugaring.
    FunctionLikeBlock {
        parameters: Vec<NodeId>,
        return_type: Option<NodeId>,
        body: Vec<NodeId>,
    },

    /// `return expr;` - `func` is stamped with the enclosing function
    /// during name resolution.
    Return {
        value: Option<NodeId>,
        func: Option<NodeId>,
    },

    IfStatement {
        condition: NodeId,
        then_body: NodeId,
        else_body: Option<NodeId>,
    },

    WhileLoop { condition: NodeId, body: NodeId },

    DoWhileLoop { body: NodeId, condition: NodeId },

    ForLoop {
        initialization: Option<NodeId>,
        condition: Option<NodeId>,
        increment: Option<NodeId>,
        body: NodeId,
    },

    SwitchStatement { value: NodeId, cases: Vec<NodeId> },

    /// A switch case; `value` of `None` is `default`.
    SwitchCase { value: Option<NodeId>, body: NodeId },

    Break,

    Continue,

    /// `trap;` - unconditionally aborts execution.
    TrapStatement,

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------
    /// A by-name reference to a variable. `binding` is bound by name
    /// resolution.
    VariableRef {
        name: String,
        binding: Option<NodeId>,
    },

    /// A call. Name resolution fills `possible_overloads`; if the name
    /// turns out to be a type with no function overloads, the call is
    /// reinterpreted as a cast and `cast_type` is set. The downstream
    /// checker narrows the set to a single `func`.
    CallExpression {
        name: String,
        arguments: Vec<NodeId>,
        possible_overloads: Vec<NodeId>,
        cast_type: Option<NodeId>,
        func: Option<NodeId>,
    },

    /// `base.field` - property access. Name resolution fills the three
    /// accessor overload sets; the downstream checker picks and stamps
    /// `field_decl` for struct field access.
    DotExpression {
        base: NodeId,
        field: String,
        possible_get_overloads: Vec<NodeId>,
        possible_set_overloads: Vec<NodeId>,
        possible_and_overloads: Vec<NodeId>,
        field_decl: Option<NodeId>,
    },

    /// `base[index]` - indexed access, with the same three overload sets
    /// as dot access.
    IndexExpression {
        base: NodeId,
        index: NodeId,
        possible_get_overloads: Vec<NodeId>,
        possible_set_overloads: Vec<NodeId>,
        possible_and_overloads: Vec<NodeId>,
    },

    /// `lhs = rhs` - `ty` is stamped by the downstream checker.
    Assignment {
        lhs: NodeId,
        rhs: NodeId,
        ty: Option<NodeId>,
    },

    /// `(a, b, c)` - evaluates all, yields the last.
    CommaExpression { expressions: Vec<NodeId> },

    /// A no-op wrapper introduced by desugaring.
    IdentityExpression { target: NodeId },

    /// `a && b` / `a || b`.
    LogicalExpression {
        op: LogicalOp,
        lhs: NodeId,
        rhs: NodeId,
    },

    /// `!a`.
    LogicalNot { operand: NodeId },

    /// `a += b` and friends, desugared into read/modify/write parts.
    ReadModifyWriteExpression {
        lvalue: NodeId,
        new_value: NodeId,
        result: NodeId,
    },

    /// `*ptr`.
    DereferenceExpression { ptr: NodeId },

    /// `&lvalue` - produces a thread-space pointer.
    MakePtrExpression { lvalue: NodeId },

    /// `@lvalue` - produces an array reference; `ty` is stamped by the
    /// downstream checker.
    MakeArrayRefExpression {
        lvalue: NodeId,
        ty: Option<NodeId>,
    },

    /// Reinterpret a pointer as a one-element array reference.
    ConvertPtrToArrayRefExpression { lvalue: NodeId },

    /// A checker-introduced temporary with a known type.
    AnonymousVariable { ty: NodeId },

    BoolLiteral { value: bool },

    /// An untyped numeric literal and its generic literal type.
    GenericLiteral { value: i64, ty: NodeId },

    /// `null`, carrying its `NullType` node.
    NullLiteral { ty: NodeId },

    /// `Enum.Member` after desugaring.
    EnumLiteral { enum_type: NodeId, member: NodeId },
}

impl NodeKind {
    /// The human-readable kind name, used in internal error messages.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::FuncDef { .. } => "FuncDef",
            NodeKind::NativeFunc { .. } => "NativeFunc",
            NodeKind::NativeFuncInstance { .. } => "NativeFuncInstance",
            NodeKind::FuncParameter { .. } => "FuncParameter",
            NodeKind::VariableDecl { .. } => "VariableDecl",
            NodeKind::TypeDef { .. } => "TypeDef",
            NodeKind::Field { .. } => "Field",
            NodeKind::EnumMember { .. } => "EnumMember",
            NodeKind::ProtocolDecl { .. } => "ProtocolDecl",
            NodeKind::ProtocolFuncDecl { .. } => "ProtocolFuncDecl",
            NodeKind::TypeVariable { .. } => "TypeVariable",
            NodeKind::ConstexprTypeParameter { .. } => "ConstexprTypeParameter",
            NodeKind::StructType { .. } => "StructType",
            NodeKind::EnumType { .. } => "EnumType",
            NodeKind::NativeType { .. } => "NativeType",
            NodeKind::NativeTypeInstance { .. } => "NativeTypeInstance",
            NodeKind::PtrType { .. } => "PtrType",
            NodeKind::ArrayType { .. } => "ArrayType",
            NodeKind::ArrayRefType { .. } => "ArrayRefType",
            NodeKind::ReferenceType { .. } => "ReferenceType",
            NodeKind::VectorType { .. } => "VectorType",
            NodeKind::MatrixType { .. } => "MatrixType",
            NodeKind::TypeRef { .. } => "TypeRef",
            NodeKind::GenericLiteralType { .. } => "GenericLiteralType",
            NodeKind::NullType => "NullType",
            NodeKind::ProtocolRef { .. } => "ProtocolRef",
            NodeKind::Block { .. } => "Block",
            NodeKind::FunctionLikeBlock { .. } => "FunctionLikeBlock",
            NodeKind::Return { .. } => "Return",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::WhileLoop { .. } => "WhileLoop",
            NodeKind::DoWhileLoop { .. } => "DoWhileLoop",
            NodeKind::ForLoop { .. } => "ForLoop",
            NodeKind::SwitchStatement { .. } => "SwitchStatement",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
            NodeKind::TrapStatement => "TrapStatement",
            NodeKind::VariableRef { .. } => "VariableRef",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::DotExpression { .. } => "DotExpression",
            NodeKind::IndexExpression { .. } => "IndexExpression",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::CommaExpression { .. } => "CommaExpression",
            NodeKind::IdentityExpression { .. } => "IdentityExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::LogicalNot { .. } => "LogicalNot",
            NodeKind::ReadModifyWriteExpression { .. } => "ReadModifyWriteExpression",
            NodeKind::DereferenceExpression { .. } => "DereferenceExpression",
            NodeKind::MakePtrExpression { .. } => "MakePtrExpression",
            NodeKind::MakeArrayRefExpression { .. } => "MakeArrayRefExpression",
            NodeKind::ConvertPtrToArrayRefExpression { .. } => "ConvertPtrToArrayRefExpression",
            NodeKind::AnonymousVariable { .. } => "AnonymousVariable",
            NodeKind::BoolLiteral { .. } => "BoolLiteral",
            NodeKind::GenericLiteral { .. } => "GenericLiteral",
            NodeKind::NullLiteral { .. } => "NullLiteral",
            NodeKind::EnumLiteral { .. } => "EnumLiteral",
        }
    }
}

/// One AST node: a kind payload plus the source span it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

// ============================================================================
// Module (node arena)
// ============================================================================

/// The node arena for one translation unit.
#[derive(Debug, Default)]
pub struct Module {
    nodes: Vec<Node>,
}

impl Module {
    /// Create an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the module has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node and return its id.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, span });
        id
    }

    /// The node behind an id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The kind of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Mutable access to a node's kind, for passes that fill in
    /// resolution state.
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    /// The span of a node.
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// Replace a node's payload in place, preserving its identity and
    /// span. Every `NodeId` pointing at the node observes the new kind.
    /// Returns the old payload.
    pub fn replace(&mut self, id: NodeId, kind: NodeKind) -> NodeKind {
        std::mem::replace(&mut self.nodes[id.index()].kind, kind)
    }

    /// Look up a struct's field node by name.
    ///
    /// Returns `None` if `struct_ty` is not a `StructType` or has no such
    /// field.
    pub fn field_by_name(&self, struct_ty: NodeId, name: &str) -> Option<NodeId> {
        match self.kind(struct_ty) {
            NodeKind::StructType { fields, .. } => fields.iter().copied().find(|&f| {
                matches!(self.kind(f), NodeKind::Field { name: n, .. } if n == name)
            }),
            _ => None,
        }
    }

    /// Look up an enum's member node by name.
    pub fn enum_member_by_name(&self, enum_ty: NodeId, name: &str) -> Option<NodeId> {
        match self.kind(enum_ty) {
            NodeKind::EnumType { members, .. } => members.iter().copied().find(|&m| {
                matches!(self.kind(m), NodeKind::EnumMember { name: n, .. } if n == name)
            }),
            _ => None,
        }
    }

    /// The direct children of a node, in source order.
    ///
    /// This is one of the two exhaustive matches over the node set (the
    /// other is visitor dispatch). A new node kind must decide its
    /// children here before anything compiles.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self.kind(id) {
            NodeKind::Program { declarations } => out.extend(declarations),
            NodeKind::FuncDef {
                type_parameters,
                parameters,
                return_type,
                body,
                ..
            } => {
                out.extend(type_parameters);
                out.extend(parameters);
                out.push(*return_type);
                out.push(*body);
            }
            NodeKind::NativeFunc {
                type_parameters,
                parameters,
                return_type,
                ..
            } => {
                out.extend(type_parameters);
                out.extend(parameters);
                out.push(*return_type);
            }
            NodeKind::NativeFuncInstance {
                base,
                type_arguments,
            } => {
                out.push(*base);
                out.extend(type_arguments);
            }
            NodeKind::FuncParameter { ty, .. } => out.push(*ty),
            NodeKind::VariableDecl {
                ty, initializer, ..
            } => {
                out.push(*ty);
                out.extend(initializer);
            }
            NodeKind::TypeDef { ty, .. } => out.push(*ty),
            NodeKind::Field { ty, .. } => out.push(*ty),
            NodeKind::EnumMember { .. } => {}
            NodeKind::ProtocolDecl { funcs, .. } => out.extend(funcs),
            NodeKind::ProtocolFuncDecl {
                parameters,
                return_type,
                ..
            } => {
                out.extend(parameters);
                out.push(*return_type);
            }
            NodeKind::TypeVariable { protocol, .. } => out.extend(protocol),
            NodeKind::ConstexprTypeParameter { ty, .. } => out.push(*ty),
            NodeKind::StructType {
                type_parameters,
                fields,
                ..
            } => {
                out.extend(type_parameters);
                out.extend(fields);
            }
            NodeKind::EnumType { members, .. } => out.extend(members),
            NodeKind::NativeType { .. } => {}
            NodeKind::NativeTypeInstance {
                base,
                type_arguments,
            } => {
                out.push(*base);
                out.extend(type_arguments);
            }
            NodeKind::PtrType { element_type, .. } => out.push(*element_type),
            NodeKind::ArrayType { element_type, .. } => out.push(*element_type),
            NodeKind::ArrayRefType { element_type, .. } => out.push(*element_type),
            NodeKind::ReferenceType { element_type } => out.push(*element_type),
            NodeKind::VectorType { element_type, .. } => out.push(*element_type),
            NodeKind::MatrixType { element_type, .. } => out.push(*element_type),
            NodeKind::TypeRef { type_arguments, .. } => out.extend(type_arguments),
            NodeKind::GenericLiteralType { ty } => out.push(*ty),
            NodeKind::NullType => {}
            NodeKind::ProtocolRef { .. } => {}
            NodeKind::Block { statements } => out.extend(statements),
            NodeKind::FunctionLikeBlock {
                parameters,
                return_type,
                body,
            } => {
                out.extend(parameters);
                out.extend(return_type);
                out.extend(body);
            }
            NodeKind::Return { value, .. } => out.extend(value),
            NodeKind::IfStatement {
                condition,
                then_body,
                else_body,
            } => {
                out.push(*condition);
                out.push(*then_body);
                out.extend(else_body);
            }
            NodeKind::WhileLoop { condition, body } => {
                out.push(*condition);
                out.push(*body);
            }
            NodeKind::DoWhileLoop { body, condition } => {
                out.push(*body);
                out.push(*condition);
            }
            NodeKind::ForLoop {
                initialization,
                condition,
                increment,
                body,
            } => {
                out.extend(initialization);
                out.extend(condition);
                out.extend(increment);
                out.push(*body);
            }
            NodeKind::SwitchStatement { value, cases } => {
                out.push(*value);
                out.extend(cases);
            }
            NodeKind::SwitchCase { value, body } => {
                out.extend(value);
                out.push(*body);
            }
            NodeKind::Break | NodeKind::Continue | NodeKind::TrapStatement => {}
            NodeKind::VariableRef { .. } => {}
            NodeKind::CallExpression { arguments, .. } => out.extend(arguments),
            NodeKind::DotExpression { base, .. } => out.push(*base),
            NodeKind::IndexExpression { base, index, .. } => {
                out.push(*base);
                out.push(*index);
            }
            NodeKind::Assignment { lhs, rhs, .. } => {
                out.push(*lhs);
                out.push(*rhs);
            }
            NodeKind::CommaExpression { expressions } => out.extend(expressions),
            NodeKind::IdentityExpression { target } => out.push(*target),
            NodeKind::LogicalExpression { lhs, rhs, .. } => {
                out.push(*lhs);
                out.push(*rhs);
            }
            NodeKind::LogicalNot { operand } => out.push(*operand),
            NodeKind::ReadModifyWriteExpression {
                lvalue,
                new_value,
                result,
            } => {
                out.push(*lvalue);
                out.push(*new_value);
                out.push(*result);
            }
            NodeKind::DereferenceExpression { ptr } => out.push(*ptr),
            NodeKind::MakePtrExpression { lvalue } => out.push(*lvalue),
            NodeKind::MakeArrayRefExpression { lvalue, .. } => out.push(*lvalue),
            NodeKind::ConvertPtrToArrayRefExpression { lvalue } => out.push(*lvalue),
            NodeKind::AnonymousVariable { ty } => out.push(*ty),
            NodeKind::BoolLiteral { .. } => {}
            NodeKind::GenericLiteral { ty, .. } => out.push(*ty),
            NodeKind::NullLiteral { ty } => out.push(*ty),
            NodeKind::EnumLiteral { .. } => {}
        }
        out
    }

    // ==========================================================================
    // Constructors
    // ==========================================================================

    /// Allocate a `NativeType` with no size yet.
    pub fn alloc_native_type(&mut self, name: &str, span: Span) -> NodeId {
        self.alloc(
            NodeKind::NativeType {
                name: name.to_string(),
                size: None,
            },
            span,
        )
    }

    /// Allocate an unresolved `TypeRef`.
    pub fn alloc_type_ref(&mut self, name: &str, span: Span) -> NodeId {
        self.alloc(
            NodeKind::TypeRef {
                name: name.to_string(),
                type_arguments: Vec::new(),
                resolved: None,
            },
            span,
        )
    }

    /// Allocate an unbound `VariableRef`.
    pub fn alloc_variable_ref(&mut self, name: &str, span: Span) -> NodeId {
        self.alloc(
            NodeKind::VariableRef {
                name: name.to_string(),
                binding: None,
            },
            span,
        )
    }

    /// Allocate a struct field with no offset yet.
    pub fn alloc_field(&mut self, name: &str, ty: NodeId, span: Span) -> NodeId {
        self.alloc(
            NodeKind::Field {
                name: name.to_string(),
                ty,
                offset: None,
            },
            span,
        )
    }

    /// Allocate a function parameter.
    pub fn alloc_parameter(&mut self, name: &str, ty: NodeId, span: Span) -> NodeId {
        self.alloc(
            NodeKind::FuncParameter {
                name: name.to_string(),
                ty,
            },
            span,
        )
    }

    /// Allocate a call expression with empty resolution state.
    pub fn alloc_call(&mut self, name: &str, arguments: Vec<NodeId>, span: Span) -> NodeId {
        self.alloc(
            NodeKind::CallExpression {
                name: name.to_string(),
                arguments,
                possible_overloads: Vec::new(),
                cast_type: None,
                func: None,
            },
            span,
        )
    }

    /// Allocate a dot expression with empty resolution state.
    pub fn alloc_dot(&mut self, base: NodeId, field: &str, span: Span) -> NodeId {
        self.alloc(
            NodeKind::DotExpression {
                base,
                field: field.to_string(),
                possible_get_overloads: Vec::new(),
                possible_set_overloads: Vec::new(),
                possible_and_overloads: Vec::new(),
                field_decl: None,
            },
            span,
        )
    }
}
