//! Name resolution.
//!
//! A name occurrence is classified by its syntactic role, which decides the
//! kinds of declarations it may refer to. The resolver then walks outward
//! through the lexical scopes of the context tree:
//!
//! ```text
//! block (declarations before the occurrence)
//!   → for / for-each / catch variables
//!   → method parameters and type parameters
//!   → type members, then the superclass chain
//!   → compilation unit types
//!   → external classes: explicit imports → default imports → java.lang
//! ```
//!
//! Chains such as `a.b().c` resolve inside-out: the receiver's type is
//! inferred first and the member is looked up in it. Any link that fails
//! makes the whole chain [`Resolution::Unresolved`], which is an ordinary
//! outcome while the user is typing.

use std::cell::Cell;

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::parser::{
    Ast, BinaryOp, LiteralKind, Modifiers, NodeId, NodeKind, Primitive, TypeDeclKind, UnaryOp,
};
use crate::project::{ClassInfo, ClassLookup, DEFAULT_IMPORTS, IMPLICIT_PACKAGE};
use crate::syntax::ImportStatement;

use super::decl::{DeclKind, DeclKinds, DeclarationNode, declaration_of, member_declarations};
use super::scope::{ScopeProvider, WalkStart};

const OBJECT: &str = "java.lang.Object";
const STRING: &str = "java.lang.String";
const MAX_DEPTH: u32 = 48;

static DEFAULT_PACKAGES: Lazy<Vec<SmolStr>> =
    Lazy::new(|| DEFAULT_IMPORTS.iter().map(|p| SmolStr::new(p)).collect());

// ============================================================================
// RESULTS
// ============================================================================

/// A predefined or library class, method or field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExternalMember {
    Class {
        qualified: SmolStr,
    },
    Method {
        class: SmolStr,
        name: SmolStr,
        return_type: SmolStr,
        is_static: bool,
    },
    Field {
        class: SmolStr,
        name: SmolStr,
        ty: SmolStr,
        is_static: bool,
    },
}

impl ExternalMember {
    pub fn name(&self) -> &str {
        match self {
            ExternalMember::Class { qualified } => {
                qualified.rsplit_once('.').map_or(qualified, |(_, n)| n)
            }
            ExternalMember::Method { name, .. } | ExternalMember::Field { name, .. } => name,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            ExternalMember::Class { .. } => true,
            ExternalMember::Method { is_static, .. } | ExternalMember::Field { is_static, .. } => {
                *is_static
            }
        }
    }

    fn method(class: &ClassInfo, name: &str) -> Option<Self> {
        let method = class.method(name)?;
        Some(ExternalMember::Method {
            class: class.qualified_name(),
            name: method.name.clone(),
            return_type: method.return_type.clone(),
            is_static: method.is_static,
        })
    }

    fn field(class: &ClassInfo, name: &str) -> Option<Self> {
        let field = class.field(name)?;
        Some(ExternalMember::Field {
            class: class.qualified_name(),
            name: field.name.clone(),
            ty: field.ty.clone(),
            is_static: field.is_static,
        })
    }
}

/// What a name occurrence refers to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    Local(DeclarationNode),
    External(ExternalMember),
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Unresolved)
    }

    pub fn as_local(&self) -> Option<&DeclarationNode> {
        match self {
            Resolution::Local(decl) => Some(decl),
            _ => None,
        }
    }
}

/// The static type of an expression, as far as it can be known.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    /// A type declared in the context tree.
    Local(NodeId),
    /// The body of an anonymous class (`new T() { ... }`).
    Anonymous(NodeId),
    /// A predefined or library class, by qualified name.
    External(SmolStr),
    Primitive(Primitive),
    Array(Box<ResolvedType>),
}

impl ResolvedType {
    fn array_of(self, dims: u8) -> Self {
        (0..dims).fold(self, |ty, _| ResolvedType::Array(Box::new(ty)))
    }
}

/// The receiver of a member access. `static_only` is set when the receiver
/// is a type name rather than a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receiver {
    pub ty: ResolvedType,
    pub static_only: bool,
}

impl Receiver {
    fn value(ty: ResolvedType) -> Self {
        Self {
            ty,
            static_only: false,
        }
    }

    fn type_name(ty: ResolvedType) -> Self {
        Self {
            ty,
            static_only: true,
        }
    }
}

// ============================================================================
// ROLES
// ============================================================================

/// The syntactic role of a name occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The name a declaration introduces.
    Declaration,
    /// `foo(...)` without a receiver.
    CallTarget,
    /// `x.foo(...)`.
    MemberCall,
    /// `x.foo`.
    MemberAccess,
    /// The receiver `x` of `x.foo`.
    Qualifier,
    /// A bare identifier in an expression.
    Identifier,
    /// A type in a declaration, cast or similar.
    TypeName,
    /// The type after `new`.
    ConstructorType,
}

impl Role {
    /// Declaration kinds the role can refer to.
    pub fn constraints(self) -> DeclKinds {
        match self {
            Role::Declaration => DeclKinds::all(),
            Role::CallTarget | Role::MemberCall => DeclKinds::METHOD,
            Role::MemberAccess => DeclKinds::FIELD | DeclKinds::TYPE,
            Role::Qualifier => DeclKinds::VARIABLE | DeclKinds::TYPE,
            Role::Identifier => DeclKinds::VARIABLE,
            Role::TypeName => DeclKinds::TYPE_NAME,
            Role::ConstructorType => DeclKinds::TYPE | DeclKinds::CONSTRUCTOR,
        }
    }
}

/// Classify `node`, or `None` if it carries no name.
pub fn role_of(ast: &Ast, node: NodeId) -> Option<Role> {
    if declaration_of(ast, node).is_some() {
        return Some(Role::Declaration);
    }
    let role = match ast.kind(node) {
        NodeKind::Call { receiver: None, .. } => Role::CallTarget,
        NodeKind::Call { .. } => Role::MemberCall,
        NodeKind::FieldAccess { .. } => Role::MemberAccess,
        NodeKind::Name { .. } if is_receiver(ast, node) => Role::Qualifier,
        NodeKind::Name { .. } => Role::Identifier,
        NodeKind::TypeRef { .. } => match ast.parent(node).map(|p| ast.kind(p)) {
            Some(NodeKind::New { ty, .. }) if *ty == node => Role::ConstructorType,
            _ => Role::TypeName,
        },
        _ => return None,
    };
    Some(role)
}

fn is_receiver(ast: &Ast, node: NodeId) -> bool {
    match ast.parent(node).map(|p| ast.kind(p)) {
        Some(NodeKind::FieldAccess { receiver, .. }) => *receiver == node,
        Some(NodeKind::Call { receiver, .. }) => *receiver == Some(node),
        _ => false,
    }
}

/// Dotted text of a `Name`/`FieldAccess` chain, e.g. `java.util.List`.
pub fn qualified_path(ast: &Ast, node: NodeId) -> Option<String> {
    match ast.kind(node) {
        NodeKind::Name { name } => Some(name.text.to_string()),
        NodeKind::FieldAccess { receiver, name } => {
            Some(format!("{}.{}", qualified_path(ast, *receiver)?, name.text))
        }
        _ => None,
    }
}

/// Dotted text of a `TypeRef` including its qualifiers.
pub fn type_path(ast: &Ast, node: NodeId) -> Option<String> {
    match ast.kind(node) {
        NodeKind::TypeRef {
            qualifier, name, ..
        } => match qualifier {
            Some(q) => Some(format!("{}.{}", type_path(ast, *q)?, name.text)),
            None => Some(name.text.to_string()),
        },
        _ => None,
    }
}

/// Modifiers of the declaration a member node belongs to.
pub fn declared_modifiers(ast: &Ast, node: NodeId) -> Modifiers {
    match ast.kind(node) {
        NodeKind::TypeDecl { modifiers, .. }
        | NodeKind::Method { modifiers, .. }
        | NodeKind::Constructor { modifiers, .. }
        | NodeKind::Param { modifiers, .. } => *modifiers,
        NodeKind::EnumConstant { .. } => Modifiers::STATIC | Modifiers::FINAL,
        NodeKind::VarDeclarator { .. } => match ast.parent(node).map(|p| ast.kind(p)) {
            Some(NodeKind::Field { modifiers, .. } | NodeKind::LocalVar { modifiers, .. }) => {
                *modifiers
            }
            _ => Modifiers::empty(),
        },
        _ => Modifiers::empty(),
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Visit {
    Node(NodeId),
    Class(SmolStr),
}

/// Resolves names against a [`ScopeProvider`] and the bound classpath.
pub struct Resolver<'a, S: ScopeProvider + ?Sized> {
    scope: &'a S,
    classes: Option<&'a dyn ClassLookup>,
    imports: &'a [ImportStatement],
    default_imports: &'a [SmolStr],
    depth: Cell<u32>,
}

impl<'a, S: ScopeProvider + ?Sized> Resolver<'a, S> {
    pub fn new(
        scope: &'a S,
        classes: Option<&'a dyn ClassLookup>,
        imports: &'a [ImportStatement],
    ) -> Self {
        Self {
            scope,
            classes,
            imports,
            default_imports: &DEFAULT_PACKAGES,
            depth: Cell::new(0),
        }
    }

    /// Replace the packages imported into every sketch.
    pub fn with_default_imports(mut self, packages: &'a [SmolStr]) -> Self {
        self.default_imports = packages;
        self
    }

    fn occ(&self) -> &'a Ast {
        self.scope.occurrence_tree()
    }

    fn ctx(&self) -> &'a Ast {
        self.scope.context_tree()
    }

    pub fn classes(&self) -> Option<&'a dyn ClassLookup> {
        self.classes
    }

    pub fn class(&self, qualified: &str) -> Option<&'a ClassInfo> {
        self.classes?.class(qualified)
    }

    /// Run `f` one level deeper, giving up on pathological nesting such as
    /// cyclic supertypes.
    fn nested<T>(&self, f: impl FnOnce() -> Option<T>) -> Option<T> {
        let depth = self.depth.get();
        if depth >= MAX_DEPTH {
            tracing::debug!("[RESOLVE] depth limit reached");
            return None;
        }
        self.depth.set(depth + 1);
        let result = f();
        self.depth.set(depth);
        result
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Resolve the name carried by `occurrence` in the occurrence tree.
    pub fn resolve(&self, occurrence: NodeId) -> Resolution {
        let ast = self.occ();
        let Some(role) = role_of(ast, occurrence) else {
            return Resolution::Unresolved;
        };
        let start = self.scope.walk_start(occurrence);
        let resolution = match (role, ast.kind(occurrence)) {
            (Role::Declaration, _) => declaration_of(ast, occurrence).map(Resolution::Local),
            (Role::Identifier, NodeKind::Name { name }) => {
                Some(self.resolve_simple(&name.text, DeclKinds::VARIABLE, start))
            }
            (Role::Qualifier, NodeKind::Name { name }) => {
                let variable = self.resolve_simple(&name.text, DeclKinds::VARIABLE, start);
                if variable.is_resolved() {
                    Some(variable)
                } else {
                    Some(self.resolve_simple(&name.text, DeclKinds::TYPE_NAME, start))
                }
            }
            (Role::CallTarget, NodeKind::Call { name, .. }) => {
                Some(self.resolve_simple(&name.text, DeclKinds::METHOD, start))
            }
            (
                Role::MemberCall,
                NodeKind::Call {
                    receiver: Some(receiver),
                    name,
                    ..
                },
            ) => self
                .infer(*receiver)
                .and_then(|r| self.member(&r.ty, &name.text, DeclKinds::METHOD)),
            (Role::MemberAccess, NodeKind::FieldAccess { receiver, name }) => {
                match self.infer(*receiver) {
                    Some(r) => self.member(&r.ty, &name.text, Role::MemberAccess.constraints()),
                    None => qualified_path(ast, occurrence)
                        .filter(|path| self.class(path).is_some())
                        .map(|qualified| {
                            Resolution::External(ExternalMember::Class {
                                qualified: qualified.into(),
                            })
                        }),
                }
            }
            (Role::TypeName, _) => self.resolve_type_occurrence(occurrence, start),
            (Role::ConstructorType, _) => self.resolve_constructor(occurrence, start),
            _ => None,
        };
        let resolution = resolution.unwrap_or(Resolution::Unresolved);
        tracing::trace!("[RESOLVE] {:?} → {:?}", ast.name(occurrence), resolution);
        resolution
    }

    /// Infer the type of an expression of the occurrence tree.
    pub fn infer(&self, expr: NodeId) -> Option<Receiver> {
        self.nested(|| self.infer_inner(expr))
    }

    fn infer_inner(&self, expr: NodeId) -> Option<Receiver> {
        let ast = self.occ();
        let start = self.scope.walk_start(expr);
        match ast.kind(expr) {
            NodeKind::Name { name } => {
                let variable = self.resolve_simple(&name.text, DeclKinds::VARIABLE, start);
                if variable.is_resolved() {
                    return self.type_of(&variable).map(Receiver::value);
                }
                let ty = self.resolve_type_name(&name.text, start)?;
                Some(Receiver::type_name(ty))
            }
            NodeKind::FieldAccess { receiver, name } => match self.infer(*receiver) {
                Some(r) => {
                    let member = self.member(&r.ty, &name.text, DeclKinds::FIELD | DeclKinds::TYPE)?;
                    let is_type = matches!(
                        member,
                        Resolution::Local(DeclarationNode {
                            kind: DeclKind::Type,
                            ..
                        }) | Resolution::External(ExternalMember::Class { .. })
                    );
                    let ty = self.type_of(&member)?;
                    Some(Receiver {
                        ty,
                        static_only: is_type,
                    })
                }
                None => {
                    let path = qualified_path(ast, expr)?;
                    self.class(&path)?;
                    Some(Receiver::type_name(ResolvedType::External(path.into())))
                }
            },
            NodeKind::Call { receiver, name, .. } => {
                let method = match receiver {
                    Some(receiver) => {
                        let r = self.infer(*receiver)?;
                        self.member(&r.ty, &name.text, DeclKinds::METHOD)?
                    }
                    None => self.resolve_simple(&name.text, DeclKinds::METHOD, start),
                };
                self.type_of(&method).map(Receiver::value)
            }
            NodeKind::This => self.enclosing_type(start).map(Receiver::value),
            NodeKind::Super => {
                let this = self.enclosing_type(start)?;
                self.supertypes(&this).into_iter().next().map(Receiver::value)
            }
            NodeKind::New { ty, body, .. } => {
                if body.is_some() && std::ptr::eq(ast, self.ctx()) {
                    return Some(Receiver::value(ResolvedType::Anonymous(expr)));
                }
                self.resolve_type_node(ast, *ty, start).map(Receiver::value)
            }
            NodeKind::NewArray {
                elem,
                dims,
                extra_dims,
                ..
            } => {
                let elem = self.resolve_type_node(ast, *elem, start)?;
                let total = dims.len() as u8 + *extra_dims;
                Some(Receiver::value(elem.array_of(total)))
            }
            NodeKind::Cast { ty, .. } => self.resolve_type_node(ast, *ty, start).map(Receiver::value),
            NodeKind::Paren { expr } => self.infer(*expr),
            NodeKind::Literal { kind } => {
                let ty = match kind {
                    LiteralKind::Number(prim) => ResolvedType::Primitive(*prim),
                    LiteralKind::String => ResolvedType::External(SmolStr::new_static(STRING)),
                    LiteralKind::Char => ResolvedType::Primitive(Primitive::Char),
                    LiteralKind::Bool => ResolvedType::Primitive(Primitive::Boolean),
                    LiteralKind::Null => return None,
                };
                Some(Receiver::value(ty))
            }
            NodeKind::Index { base, .. } => match self.infer(*base)?.ty {
                ResolvedType::Array(elem) => Some(Receiver::value(*elem)),
                _ => None,
            },
            NodeKind::Ternary { then_value, .. } => self.infer(*then_value),
            NodeKind::Assign { target, .. } => self.infer(*target),
            NodeKind::Unary { op, operand } => match op {
                UnaryOp::Not => Some(Receiver::value(ResolvedType::Primitive(Primitive::Boolean))),
                _ => self.infer(*operand),
            },
            NodeKind::Binary { op, lhs, rhs } => {
                if op.is_boolean() {
                    return Some(Receiver::value(ResolvedType::Primitive(Primitive::Boolean)));
                }
                let left = self.infer(*lhs);
                if *op == BinaryOp::Add {
                    let string = ResolvedType::External(SmolStr::new_static(STRING));
                    let right = self.infer(*rhs);
                    if left.as_ref().is_some_and(|r| r.ty == string)
                        || right.as_ref().is_some_and(|r| r.ty == string)
                    {
                        return Some(Receiver::value(string));
                    }
                }
                left
            }
            NodeKind::InstanceOf { .. } => {
                Some(Receiver::value(ResolvedType::Primitive(Primitive::Boolean)))
            }
            NodeKind::ClassLit { .. } => Some(Receiver::value(ResolvedType::External(
                SmolStr::new_static("java.lang.Class"),
            ))),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Simple names
    // ------------------------------------------------------------------------

    /// Resolve an unqualified name: lexical scopes first, then static
    /// imports and external classes.
    pub fn resolve_simple(&self, name: &str, kinds: DeclKinds, start: WalkStart) -> Resolution {
        if let Some(hit) = self.lookup_lexical(name, kinds, start) {
            return hit;
        }
        if kinds.intersects(DeclKinds::METHOD | DeclKinds::FIELD) {
            if let Some(member) = self.static_import_member(name, kinds) {
                return Resolution::External(member);
            }
        }
        if kinds.contains(DeclKinds::TYPE) {
            if let Some(qualified) = self.external_type(name) {
                return Resolution::External(ExternalMember::Class { qualified });
            }
        }
        Resolution::Unresolved
    }

    fn lookup_lexical(&self, name: &str, kinds: DeclKinds, start: WalkStart) -> Option<Resolution> {
        self.nested(|| self.lookup_lexical_inner(name, kinds, start))
    }

    fn lookup_lexical_inner(
        &self,
        name: &str,
        kinds: DeclKinds,
        start: WalkStart,
    ) -> Option<Resolution> {
        let ast = self.ctx();
        let matches = |decl: &DeclarationNode| decl.name == name && kinds.accepts(decl.kind);
        let local = |node: NodeId| declaration_of(ast, node).filter(|d| matches(d));
        let mut child: Option<NodeId> = None;

        for node in ast.ancestors(start.node) {
            match ast.kind(node) {
                NodeKind::Block { stmts } | NodeKind::SwitchCase { body: stmts, .. } => {
                    for &stmt in stmts {
                        if ast.range(stmt).start() >= start.offset {
                            break;
                        }
                        if let Some(hit) = self.statement_declaration(stmt, &matches) {
                            return Some(Resolution::Local(hit));
                        }
                    }
                }
                NodeKind::For { init, .. } => {
                    for &stmt in init {
                        if let Some(hit) = self.statement_declaration(stmt, &matches) {
                            return Some(Resolution::Local(hit));
                        }
                    }
                }
                NodeKind::ForEach { var, .. } if child != Some(*var) => {
                    if let Some(hit) = self.statement_declaration(*var, &matches) {
                        return Some(Resolution::Local(hit));
                    }
                }
                NodeKind::Catch { param, .. } => {
                    if let Some(hit) = local(*param) {
                        return Some(Resolution::Local(hit));
                    }
                }
                NodeKind::Method {
                    params,
                    type_params,
                    ..
                } => {
                    if let Some(hit) = params.iter().chain(type_params).find_map(|p| local(*p)) {
                        return Some(Resolution::Local(hit));
                    }
                }
                NodeKind::Constructor { params, .. } => {
                    if let Some(hit) = params.iter().find_map(|p| local(*p)) {
                        return Some(Resolution::Local(hit));
                    }
                }
                NodeKind::TypeDecl { type_params, .. } => {
                    if let Some(hit) = type_params.iter().find_map(|p| local(*p)) {
                        return Some(Resolution::Local(hit));
                    }
                    if let Some(hit) = self.member(&ResolvedType::Local(node), name, kinds) {
                        return Some(hit);
                    }
                }
                NodeKind::New {
                    body: Some(members),
                    ..
                } if child.is_some_and(|c| members.contains(&c)) => {
                    if let Some(hit) = self.member(&ResolvedType::Anonymous(node), name, kinds) {
                        return Some(hit);
                    }
                }
                NodeKind::CompilationUnit { types, .. } => {
                    if let Some(hit) = types.iter().find_map(|t| local(*t)) {
                        return Some(Resolution::Local(hit));
                    }
                }
                _ => {}
            }
            child = Some(node);
        }
        None
    }

    /// A declaration made by a block statement: local variables and local
    /// classes.
    fn statement_declaration(
        &self,
        stmt: NodeId,
        matches: &dyn Fn(&DeclarationNode) -> bool,
    ) -> Option<DeclarationNode> {
        let ast = self.ctx();
        match ast.kind(stmt) {
            NodeKind::LocalVar { declarators, .. } => declarators
                .iter()
                .filter_map(|d| declaration_of(ast, *d))
                .find(|d| matches(d)),
            NodeKind::TypeDecl { .. } => declaration_of(ast, stmt).filter(|d| matches(d)),
            _ => None,
        }
    }

    fn static_import_member(&self, name: &str, kinds: DeclKinds) -> Option<ExternalMember> {
        self.imports
            .iter()
            .filter(|i| i.is_static)
            .filter(|i| i.is_wildcard() || i.name.rsplit_once('.').is_some_and(|(_, n)| n == name))
            .filter_map(|i| self.class(i.type_name()?))
            .find_map(|class| {
                let method = kinds
                    .contains(DeclKinds::METHOD)
                    .then(|| ExternalMember::method(class, name))
                    .flatten();
                method.or_else(|| {
                    kinds
                        .contains(DeclKinds::FIELD)
                        .then(|| ExternalMember::field(class, name))
                        .flatten()
                })
            })
    }

    /// Qualified name of an external class visible under `name`.
    pub fn external_type(&self, name: &str) -> Option<SmolStr> {
        if name.contains('.') {
            return self.class(name).map(|c| c.qualified_name());
        }
        for import in self.imports.iter().filter(|i| !i.is_static) {
            if import.simple_name() == Some(name) {
                return Some(import.name.clone());
            }
        }
        for import in self.imports.iter().filter(|i| !i.is_static && i.is_wildcard()) {
            let qualified = format!("{}.{name}", import.package());
            if self.class(&qualified).is_some() {
                return Some(qualified.into());
            }
        }
        self.default_imports
            .iter()
            .map(SmolStr::as_str)
            .chain([IMPLICIT_PACKAGE])
            .map(|package| format!("{package}.{name}"))
            .find(|qualified| self.class(qualified).is_some())
            .map(SmolStr::from)
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    fn resolve_type_occurrence(&self, node: NodeId, start: WalkStart) -> Option<Resolution> {
        let ast = self.occ();
        let NodeKind::TypeRef {
            qualifier, name, ..
        } = ast.kind(node)
        else {
            return None;
        };
        match qualifier {
            None => Some(self.resolve_simple(&name.text, DeclKinds::TYPE_NAME, start)),
            Some(q) => {
                let path = type_path(ast, node)?;
                if let Some(class) = self.class(&path) {
                    return Some(Resolution::External(ExternalMember::Class {
                        qualified: class.qualified_name(),
                    }));
                }
                let outer = self.resolve_type_node(ast, *q, start)?;
                self.member(&outer, &name.text, DeclKinds::TYPE)
            }
        }
    }

    /// `new T(...)` refers to a constructor of `T` when `T` declares one,
    /// preferring one with a matching parameter count.
    fn resolve_constructor(&self, node: NodeId, start: WalkStart) -> Option<Resolution> {
        let ty = self.resolve_type_occurrence(node, start)?;
        let Resolution::Local(decl) = &ty else {
            return Some(ty);
        };
        let ctx = self.ctx();
        let NodeKind::TypeDecl { members, .. } = ctx.kind(decl.node) else {
            return Some(ty);
        };
        let arity = match self.occ().parent(node).map(|p| self.occ().kind(p)) {
            Some(NodeKind::New { args, .. }) => args.len(),
            _ => 0,
        };
        let constructors: Vec<NodeId> = members
            .iter()
            .copied()
            .filter(|m| matches!(ctx.kind(*m), NodeKind::Constructor { .. }))
            .collect();
        let chosen = constructors
            .iter()
            .copied()
            .find(|c| matches!(ctx.kind(*c), NodeKind::Constructor { params, .. } if params.len() == arity))
            .or_else(|| constructors.first().copied());
        Some(
            chosen
                .and_then(|c| declaration_of(ctx, c))
                .map_or(ty, Resolution::Local),
        )
    }

    /// Resolve a type node of `ast` (either tree) to a type.
    pub fn resolve_type_node(&self, ast: &Ast, node: NodeId, start: WalkStart) -> Option<ResolvedType> {
        self.nested(|| match ast.kind(node) {
            NodeKind::PrimitiveType { prim, dims } => {
                Some(ResolvedType::Primitive(*prim).array_of(*dims))
            }
            NodeKind::TypeRef {
                qualifier,
                name,
                dims,
                ..
            } => {
                let base = match qualifier {
                    None => self.resolve_type_name(&name.text, start)?,
                    Some(q) => {
                        let path = type_path(ast, node)?;
                        if self.class(&path).is_some() {
                            ResolvedType::External(path.into())
                        } else {
                            let outer = self.resolve_type_node(ast, *q, start)?;
                            let member = self.member(&outer, &name.text, DeclKinds::TYPE)?;
                            self.type_of(&member)?
                        }
                    }
                };
                Some(base.array_of(*dims))
            }
            _ => None,
        })
    }

    /// Resolve a simple type name. Type parameters have no known type.
    pub fn resolve_type_name(&self, name: &str, start: WalkStart) -> Option<ResolvedType> {
        match self.resolve_simple(name, DeclKinds::TYPE_NAME, start) {
            Resolution::Local(decl) if decl.kind == DeclKind::Type => {
                Some(ResolvedType::Local(decl.node))
            }
            Resolution::External(ExternalMember::Class { qualified }) => {
                Some(ResolvedType::External(qualified))
            }
            _ => None,
        }
    }

    /// The type a resolved name has when used as a value, or the type it
    /// names.
    pub fn type_of(&self, resolution: &Resolution) -> Option<ResolvedType> {
        match resolution {
            Resolution::Local(decl) => self.declared_type(decl),
            Resolution::External(member) => match member {
                ExternalMember::Class { qualified } => {
                    Some(ResolvedType::External(qualified.clone()))
                }
                ExternalMember::Method {
                    class, return_type, ..
                } => self.member_type(class, return_type),
                ExternalMember::Field { class, ty, .. } => self.member_type(class, ty),
            },
            Resolution::Unresolved => None,
        }
    }

    fn declared_type(&self, decl: &DeclarationNode) -> Option<ResolvedType> {
        let ast = self.ctx();
        let at = |ty: NodeId| self.resolve_type_node(ast, ty, WalkStart::at(ast, ty));
        match ast.kind(decl.node) {
            NodeKind::TypeDecl { .. } => Some(ResolvedType::Local(decl.node)),
            NodeKind::VarDeclarator { dims, .. } => {
                let parent = ast.parent(decl.node)?;
                match ast.kind(parent) {
                    NodeKind::Field { ty, .. } | NodeKind::LocalVar { ty, .. } => {
                        Some(at(*ty)?.array_of(*dims))
                    }
                    _ => None,
                }
            }
            NodeKind::Param { ty, varargs, .. } => {
                Some(at(*ty)?.array_of(u8::from(*varargs)))
            }
            NodeKind::Method { ret, .. } => at(*ret),
            NodeKind::Constructor { .. } | NodeKind::EnumConstant { .. } => {
                let owner = ast.parent(decl.node)?;
                matches!(ast.kind(owner), NodeKind::TypeDecl { .. })
                    .then_some(ResolvedType::Local(owner))
            }
            _ => None,
        }
    }

    /// Resolve a member type written in a class description, relative to
    /// the class that declares it.
    fn member_type(&self, owner: &str, written: &str) -> Option<ResolvedType> {
        let mut base = written;
        let mut dims = 0u8;
        while let Some(inner) = base.strip_suffix("[]") {
            base = inner;
            dims += 1;
        }
        if let Some(prim) = Primitive::from_name(base) {
            return Some(ResolvedType::Primitive(prim).array_of(dims));
        }
        let package = owner.rsplit_once('.').map_or("", |(p, _)| p);
        let candidates = [
            base.to_string(),
            format!("{package}.{base}"),
            format!("{IMPLICIT_PACKAGE}.{base}"),
        ];
        let found = candidates
            .into_iter()
            .find(|q| q.contains('.') && self.class(q).is_some())?;
        Some(ResolvedType::External(found.into()).array_of(dims))
    }

    /// The innermost class body enclosing `start`.
    pub fn enclosing_type(&self, start: WalkStart) -> Option<ResolvedType> {
        let ast = self.ctx();
        let mut child: Option<NodeId> = None;
        for node in ast.ancestors(start.node) {
            match ast.kind(node) {
                NodeKind::TypeDecl { .. } => return Some(ResolvedType::Local(node)),
                NodeKind::New {
                    body: Some(members),
                    ..
                } if child.is_some_and(|c| members.contains(&c)) => {
                    return Some(ResolvedType::Anonymous(node));
                }
                _ => {}
            }
            child = Some(node);
        }
        None
    }

    /// Direct supertypes in lookup order; classes without `extends`
    /// inherit from `java.lang.Object`.
    pub fn supertypes(&self, ty: &ResolvedType) -> Vec<ResolvedType> {
        let ast = self.ctx();
        let object = || ResolvedType::External(SmolStr::new_static(OBJECT));
        match ty {
            ResolvedType::Local(node) => {
                let NodeKind::TypeDecl {
                    extends,
                    implements,
                    ..
                } = ast.kind(*node)
                else {
                    return Vec::new();
                };
                let start = WalkStart {
                    node: ast.parent(*node).unwrap_or(*node),
                    offset: ast.range(*node).start(),
                };
                let mut out: Vec<ResolvedType> = extends
                    .iter()
                    .chain(implements)
                    .filter_map(|t| self.resolve_type_node(ast, *t, start))
                    .collect();
                if extends.is_empty() {
                    out.push(object());
                }
                out
            }
            ResolvedType::Anonymous(node) => {
                let NodeKind::New { ty, .. } = ast.kind(*node) else {
                    return Vec::new();
                };
                let start = WalkStart::at(ast, *node);
                self.resolve_type_node(ast, *ty, start).into_iter().collect()
            }
            ResolvedType::External(qualified) => {
                let Some(class) = self.class(qualified) else {
                    return Vec::new();
                };
                let mut out: Vec<ResolvedType> = class
                    .supertypes()
                    .map(|s| ResolvedType::External(s.clone()))
                    .collect();
                if class.superclass.is_none() && qualified != OBJECT {
                    out.push(object());
                }
                out
            }
            ResolvedType::Array(_) => vec![object()],
            ResolvedType::Primitive(_) => Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    /// Look `name` up among the members of `ty` and its supertypes.
    pub fn member(&self, ty: &ResolvedType, name: &str, kinds: DeclKinds) -> Option<Resolution> {
        let mut visited = FxHashSet::default();
        self.nested(|| self.member_inner(ty, name, kinds, &mut visited))
    }

    fn member_inner(
        &self,
        ty: &ResolvedType,
        name: &str,
        kinds: DeclKinds,
        visited: &mut FxHashSet<Visit>,
    ) -> Option<Resolution> {
        let ast = self.ctx();
        let own = match ty {
            ResolvedType::Local(node) | ResolvedType::Anonymous(node) => {
                if !visited.insert(Visit::Node(*node)) {
                    return None;
                }
                let members = match ast.kind(*node) {
                    NodeKind::TypeDecl { members, .. } => members.as_slice(),
                    NodeKind::New {
                        body: Some(members),
                        ..
                    } => members.as_slice(),
                    _ => &[],
                };
                member_declarations(ast, members)
                    .into_iter()
                    .find(|d| d.name == name && kinds.accepts(d.kind))
                    .map(Resolution::Local)
            }
            ResolvedType::External(qualified) => {
                if !visited.insert(Visit::Class(qualified.clone())) {
                    return None;
                }
                let class = self.class(qualified)?;
                let method = kinds
                    .contains(DeclKinds::METHOD)
                    .then(|| ExternalMember::method(class, name))
                    .flatten();
                method
                    .or_else(|| {
                        kinds
                            .contains(DeclKinds::FIELD)
                            .then(|| ExternalMember::field(class, name))
                            .flatten()
                    })
                    .map(Resolution::External)
            }
            ResolvedType::Array(_) => (name == "length" && kinds.contains(DeclKinds::FIELD))
                .then(|| {
                    Resolution::External(ExternalMember::Field {
                        class: SmolStr::default(),
                        name: SmolStr::new_static("length"),
                        ty: SmolStr::new_static("int"),
                        is_static: false,
                    })
                }),
            ResolvedType::Primitive(_) => return None,
        };
        if own.is_some() {
            return own;
        }
        self.supertypes(ty)
            .iter()
            .find_map(|sup| self.member_inner(sup, name, kinds, visited))
    }

    /// Every member of `ty`: its own in declaration order, then inherited
    /// ones, nearest supertype first. Shadowed names appear once.
    pub fn members(&self, ty: &ResolvedType) -> Vec<Resolution> {
        let mut out = Vec::new();
        let mut visited = FxHashSet::default();
        self.collect_members(ty, &mut out, &mut visited);
        out
    }

    fn collect_members(
        &self,
        ty: &ResolvedType,
        out: &mut Vec<Resolution>,
        visited: &mut FxHashSet<Visit>,
    ) {
        if self.depth.get() >= MAX_DEPTH {
            return;
        }
        let ast = self.ctx();
        match ty {
            ResolvedType::Local(node) | ResolvedType::Anonymous(node) => {
                if !visited.insert(Visit::Node(*node)) {
                    return;
                }
                let members = match ast.kind(*node) {
                    NodeKind::TypeDecl { members, .. } => members.as_slice(),
                    NodeKind::New {
                        body: Some(members),
                        ..
                    } => members.as_slice(),
                    _ => &[],
                };
                out.extend(
                    member_declarations(ast, members)
                        .into_iter()
                        .filter(|d| d.kind != DeclKind::Constructor)
                        .map(Resolution::Local),
                );
            }
            ResolvedType::External(qualified) => {
                if !visited.insert(Visit::Class(qualified.clone())) {
                    return;
                }
                let Some(class) = self.class(qualified) else {
                    return;
                };
                out.extend(
                    class
                        .fields
                        .iter()
                        .filter_map(|f| ExternalMember::field(class, &f.name))
                        .chain(
                            class
                                .methods
                                .iter()
                                .filter_map(|m| ExternalMember::method(class, &m.name)),
                        )
                        .map(Resolution::External),
                );
            }
            ResolvedType::Array(_) => {
                out.push(Resolution::External(ExternalMember::Field {
                    class: SmolStr::default(),
                    name: SmolStr::new_static("length"),
                    ty: SmolStr::new_static("int"),
                    is_static: false,
                }));
            }
            ResolvedType::Primitive(_) => return,
        }
        self.depth.set(self.depth.get() + 1);
        for sup in self.supertypes(ty) {
            self.collect_members(&sup, out, visited);
        }
        self.depth.set(self.depth.get() - 1);
    }

    /// Whether every member of `ty` and of all its supertypes is known, so
    /// that a missing member is a real error.
    pub fn hierarchy_known(&self, ty: &ResolvedType) -> bool {
        let mut visited = FxHashSet::default();
        self.hierarchy_known_inner(ty, &mut visited)
    }

    fn hierarchy_known_inner(&self, ty: &ResolvedType, visited: &mut FxHashSet<Visit>) -> bool {
        let ast = self.ctx();
        match ty {
            ResolvedType::Primitive(_) | ResolvedType::Array(_) => true,
            ResolvedType::Local(node) | ResolvedType::Anonymous(node) => {
                if !visited.insert(Visit::Node(*node)) {
                    return true;
                }
                let declared = match ast.kind(*node) {
                    NodeKind::TypeDecl {
                        kind: TypeDeclKind::Enum,
                        ..
                    } => return false,
                    NodeKind::TypeDecl {
                        extends,
                        implements,
                        ..
                    } => extends.len() + implements.len(),
                    NodeKind::New { .. } => 1,
                    _ => return false,
                };
                let supertypes = self.supertypes(ty);
                let implicit = matches!(ast.kind(*node), NodeKind::TypeDecl { extends, .. } if extends.is_empty());
                supertypes.len() == declared + usize::from(implicit)
                    && supertypes
                        .iter()
                        .all(|s| self.hierarchy_known_inner(s, visited))
            }
            ResolvedType::External(qualified) => {
                if !visited.insert(Visit::Class(qualified.clone())) {
                    return true;
                }
                let Some(class) = self.class(qualified) else {
                    return false;
                };
                class.members_known
                    && class
                        .supertypes()
                        .all(|s| self.hierarchy_known_inner(&ResolvedType::External(s.clone()), visited))
            }
        }
    }

    /// Every declaration and inherited member visible from `start`, inner
    /// scopes first.
    pub fn visible(&self, start: WalkStart) -> Vec<Resolution> {
        let ast = self.ctx();
        let mut out = Vec::new();
        let mut child: Option<NodeId> = None;
        let push = |out: &mut Vec<Resolution>, node: NodeId| {
            if let Some(decl) = declaration_of(ast, node) {
                out.push(Resolution::Local(decl));
            }
        };
        for node in ast.ancestors(start.node) {
            match ast.kind(node) {
                NodeKind::Block { stmts } | NodeKind::SwitchCase { body: stmts, .. } => {
                    for &stmt in stmts {
                        if ast.range(stmt).start() >= start.offset {
                            break;
                        }
                        match ast.kind(stmt) {
                            NodeKind::LocalVar { declarators, .. } => {
                                declarators.iter().for_each(|d| push(&mut out, *d));
                            }
                            NodeKind::TypeDecl { .. } => push(&mut out, stmt),
                            _ => {}
                        }
                    }
                }
                NodeKind::For { init, .. } => {
                    for &stmt in init {
                        if let NodeKind::LocalVar { declarators, .. } = ast.kind(stmt) {
                            declarators.iter().for_each(|d| push(&mut out, *d));
                        }
                    }
                }
                NodeKind::ForEach { var, .. } if child != Some(*var) => {
                    if let NodeKind::LocalVar { declarators, .. } = ast.kind(*var) {
                        declarators.iter().for_each(|d| push(&mut out, *d));
                    }
                }
                NodeKind::Catch { param, .. } => push(&mut out, *param),
                NodeKind::Method {
                    params,
                    type_params,
                    ..
                } => params
                    .iter()
                    .chain(type_params)
                    .for_each(|p| push(&mut out, *p)),
                NodeKind::Constructor { params, .. } => {
                    params.iter().for_each(|p| push(&mut out, *p));
                }
                NodeKind::TypeDecl { type_params, .. } => {
                    type_params.iter().for_each(|p| push(&mut out, *p));
                    out.extend(self.members(&ResolvedType::Local(node)));
                }
                NodeKind::New {
                    body: Some(members),
                    ..
                } if child.is_some_and(|c| members.contains(&c)) => {
                    out.extend(self.members(&ResolvedType::Anonymous(node)));
                }
                NodeKind::CompilationUnit { types, .. } => {
                    types.iter().for_each(|t| push(&mut out, *t));
                }
                _ => {}
            }
            child = Some(node);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;
    use crate::hir::scope::{FragmentScope, TreeScope};
    use crate::parser::{parse, parse_expression};
    use crate::project::core_classes;
    use crate::syntax::extract_imports;
    use text_size::TextSize;

    fn find_name(ast: &Ast, text: &str) -> NodeId {
        ast.ids()
            .filter(|id| role_of(ast, *id).is_some_and(|r| r != Role::Declaration))
            .filter(|id| ast.name(*id).is_some_and(|n| n.text == text))
            .min_by_key(|id| ast.name(*id).map(|n| n.range.start()))
            .expect("occurrence exists")
    }

    fn resolve_in(source: &str, name: &str) -> (Ast, Resolution) {
        let ast = parse(source).ast;
        let node = find_name(&ast, name);
        let scope = TreeScope::new(&ast);
        let resolution = Resolver::new(&scope, Some(core_classes()), &[]).resolve(node);
        (ast, resolution)
    }

    #[test]
    fn test_local_variable_before_use() {
        let (_, resolution) = resolve_in("class A { void m() { int x = 1; x++; } }", "x");
        let decl = resolution.as_local().unwrap();
        assert_eq!(decl.kind, DeclKind::Local);
    }

    #[test]
    fn test_variable_declared_after_use_is_not_visible() {
        let (_, resolution) = resolve_in("class A { void m() { y = 2; int y; } }", "y");
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[test]
    fn test_parameter_and_field() {
        let (_, param) = resolve_in("class A { int v; void m(int v) { v = 3; } }", "v");
        assert_eq!(param.as_local().unwrap().kind, DeclKind::Parameter);
        let (_, field) = resolve_in("class A { int v; void m() { v = 3; } }", "v");
        assert_eq!(field.as_local().unwrap().kind, DeclKind::Field);
    }

    #[test]
    fn test_inherited_method_through_receiver() {
        let source = "class Sketch { \
                      class Base { void move() {} } \
                      class Child extends Base { } \
                      void run() { Child obj = new Child(); obj.move(); } }";
        let (ast, resolution) = resolve_in(source, "move");
        let decl = resolution.as_local().unwrap();
        assert_eq!(decl.kind, DeclKind::Method);
        let owner = ast.parent(decl.node).unwrap();
        assert_eq!(ast.name(owner).unwrap().text, "Base");
    }

    #[test]
    fn test_predefined_members_through_superclass() {
        let source = "class Sketch extends PApplet { void draw() { ellipse(mouseX, 1, 2, 3); } }";
        let (_, call) = resolve_in(source, "ellipse");
        assert!(matches!(
            call,
            Resolution::External(ExternalMember::Method { ref class, .. }) if class == "processing.core.PApplet"
        ));
        let (_, field) = resolve_in(source, "mouseX");
        assert!(matches!(field, Resolution::External(ExternalMember::Field { .. })));
    }

    #[test]
    fn test_chain_resolution_and_failure() {
        let source = "class A { void m() { PVector p = new PVector(); p.copy().normalize(); p.copy().bogus().x = 1; } }";
        let (_, resolution) = resolve_in(source, "normalize");
        assert!(resolution.is_resolved());
        let (_, broken) = resolve_in(source, "x");
        assert_eq!(broken, Resolution::Unresolved);
    }

    #[test]
    fn test_static_receiver_and_java_lang() {
        let (_, resolution) = resolve_in("class A { float f = Math.abs(-1); }", "abs");
        assert!(matches!(
            resolution,
            Resolution::External(ExternalMember::Method { is_static: true, .. })
        ));
        let (_, out) = resolve_in("class A { void m() { System.out.println(1); } }", "println");
        assert!(out.is_resolved());
    }

    #[test]
    fn test_constructor_under_new() {
        let source = "class A { class P { P() {} P(int a) {} } void m() { Object o = new P(1); } }";
        let ast = parse(source).ast;
        let node = ast
            .ids()
            .find(|id| role_of(&ast, *id) == Some(Role::ConstructorType))
            .unwrap();
        let scope = TreeScope::new(&ast);
        let resolution = Resolver::new(&scope, Some(core_classes()), &[]).resolve(node);
        let decl = resolution.as_local().unwrap();
        assert_eq!(decl.kind, DeclKind::Constructor);
        assert!(matches!(ast.kind(decl.node), NodeKind::Constructor { params, .. } if params.len() == 1));
    }

    #[test]
    fn test_explicit_import_wins_over_defaults() {
        let imports = extract_imports(FileId::new(0), "import java.awt.List;").imports;
        let ast = parse("class A { List l; }").ast;
        let node = find_name(&ast, "List");
        let scope = TreeScope::new(&ast);
        let resolution = Resolver::new(&scope, Some(core_classes()), &imports).resolve(node);
        assert_eq!(
            resolution,
            Resolution::External(ExternalMember::Class {
                qualified: "java.awt.List".into()
            })
        );
    }

    #[test]
    fn test_fragment_resolves_against_context() {
        let source = "class A { void m() { PVector pos = null; int k; } }";
        let context = parse(source).ast;
        let caret = TextSize::new((source.find("int k;").unwrap() + 6) as u32);
        let fragment = parse_expression("pos.copy()").ast;
        let scope = FragmentScope::new(&fragment, &context, caret);
        let resolver = Resolver::new(&scope, Some(core_classes()), &[]);
        let receiver = resolver.infer(fragment.root()).unwrap();
        assert_eq!(
            receiver.ty,
            ResolvedType::External("processing.core.PVector".into())
        );
        assert!(!receiver.static_only);
    }

    #[test]
    fn test_hierarchy_knowledge() {
        let ast = parse("class A extends PApplet {} class B extends Unknown {}").ast;
        let scope = TreeScope::new(&ast);
        let resolver = Resolver::new(&scope, Some(core_classes()), &[]);
        let types: Vec<NodeId> = ast
            .ids()
            .filter(|id| matches!(ast.kind(*id), NodeKind::TypeDecl { .. }))
            .collect();
        let known: Vec<bool> = types
            .iter()
            .map(|t| resolver.hierarchy_known(&ResolvedType::Local(*t)))
            .collect();
        assert_eq!(known.len(), 2);
        assert_eq!(known.iter().filter(|k| **k).count(), 1);
    }
}
