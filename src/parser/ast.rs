//! Arena AST for the base language.
//!
//! Nodes live in a flat arena owned by [`Ast`] and refer to each other by
//! [`NodeId`]. Every node kind is one arm of [`NodeKind`], so passes over the
//! tree are exhaustive matches. Parent links are filled in once the parser
//! has finished, after which the tree is never mutated.

use bitflags::bitflags;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

/// Index of a node in its [`Ast`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An identifier together with the range it was written at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Name {
    pub text: SmolStr,
    pub range: TextRange,
}

impl Name {
    pub fn new(text: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            text: text.into(),
            range,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const NATIVE = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const TRANSIENT = 1 << 8;
        const VOLATILE = 1 << 9;
        const STRICTFP = 1 << 10;
        const DEFAULT = 1 << 11;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
}

/// Primitive types, including `void` for method return types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "char" => Primitive::Char,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "void" => Primitive::Void,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Number(Primitive),
    String,
    Char,
    Bool,
    Null,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    UShr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
}

impl BinaryOp {
    /// Operators whose result is always `boolean`.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::Le
                | BinaryOp::Ge
                | BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::And
                | BinaryOp::Or
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

/// The kind and payload of one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    // =========================================================================
    // DECLARATIONS
    // =========================================================================
    CompilationUnit {
        imports: Vec<NodeId>,
        types: Vec<NodeId>,
    },
    Import {
        path: SmolStr,
        is_static: bool,
        wildcard: bool,
    },
    TypeDecl {
        kind: TypeDeclKind,
        modifiers: Modifiers,
        name: Name,
        type_params: Vec<NodeId>,
        extends: Vec<NodeId>,
        implements: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    EnumConstant {
        name: Name,
        args: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    TypeParam {
        name: Name,
        bounds: Vec<NodeId>,
    },
    Field {
        modifiers: Modifiers,
        ty: NodeId,
        declarators: Vec<NodeId>,
    },
    Method {
        modifiers: Modifiers,
        type_params: Vec<NodeId>,
        ret: NodeId,
        name: Name,
        params: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: Option<NodeId>,
    },
    Constructor {
        modifiers: Modifiers,
        name: Name,
        params: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: NodeId,
    },
    Initializer {
        is_static: bool,
        body: NodeId,
    },
    Param {
        modifiers: Modifiers,
        ty: NodeId,
        name: Name,
        varargs: bool,
    },
    VarDeclarator {
        name: Name,
        dims: u8,
        init: Option<NodeId>,
    },

    // =========================================================================
    // TYPES
    // =========================================================================
    PrimitiveType {
        prim: Primitive,
        dims: u8,
    },
    TypeRef {
        qualifier: Option<NodeId>,
        name: Name,
        args: Vec<NodeId>,
        dims: u8,
    },
    Wildcard {
        bound: Option<NodeId>,
    },

    // =========================================================================
    // STATEMENTS
    // =========================================================================
    Block {
        stmts: Vec<NodeId>,
    },
    LocalVar {
        modifiers: Modifiers,
        ty: NodeId,
        declarators: Vec<NodeId>,
    },
    ExprStmt {
        expr: NodeId,
    },
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        cond: NodeId,
    },
    For {
        init: Vec<NodeId>,
        cond: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    },
    ForEach {
        var: NodeId,
        iterable: NodeId,
        body: NodeId,
    },
    Switch {
        selector: NodeId,
        cases: Vec<NodeId>,
    },
    /// `labels` is empty for `default:`.
    SwitchCase {
        labels: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    Try {
        body: NodeId,
        catches: Vec<NodeId>,
        finally: Option<NodeId>,
    },
    Catch {
        param: NodeId,
        body: NodeId,
    },
    Return {
        value: Option<NodeId>,
    },
    Throw {
        value: NodeId,
    },
    Break {
        label: Option<Name>,
    },
    Continue {
        label: Option<Name>,
    },
    Labeled {
        label: Name,
        body: NodeId,
    },
    Synchronized {
        lock: NodeId,
        body: NodeId,
    },
    Assert {
        cond: NodeId,
        message: Option<NodeId>,
    },
    Empty,

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================
    /// A bare identifier in expression position.
    Name {
        name: Name,
    },
    FieldAccess {
        receiver: NodeId,
        name: Name,
    },
    Call {
        receiver: Option<NodeId>,
        name: Name,
        args: Vec<NodeId>,
    },
    /// `this(...)` or `super(...)` at the start of a constructor body.
    ExplicitCtorCall {
        is_super: bool,
        args: Vec<NodeId>,
    },
    New {
        ty: NodeId,
        args: Vec<NodeId>,
        body: Option<Vec<NodeId>>,
    },
    NewArray {
        elem: NodeId,
        dims: Vec<NodeId>,
        extra_dims: u8,
        init: Option<NodeId>,
    },
    ArrayInit {
        elements: Vec<NodeId>,
    },
    Literal {
        kind: LiteralKind,
    },
    This,
    Super,
    ClassLit {
        ty: NodeId,
    },
    Index {
        base: NodeId,
        index: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Assign {
        op: AssignOp,
        target: NodeId,
        value: NodeId,
    },
    Ternary {
        cond: NodeId,
        then_value: NodeId,
        else_value: NodeId,
    },
    Cast {
        ty: NodeId,
        expr: NodeId,
    },
    InstanceOf {
        expr: NodeId,
        ty: NodeId,
    },
    Paren {
        expr: NodeId,
    },
    /// Placeholder left behind by error recovery.
    Error,
}

impl NodeKind {
    /// Child nodes in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            NodeKind::CompilationUnit { imports, types } => {
                out.extend(imports);
                out.extend(types);
            }
            NodeKind::TypeDecl {
                type_params,
                extends,
                implements,
                members,
                ..
            } => {
                out.extend(type_params);
                out.extend(extends);
                out.extend(implements);
                out.extend(members);
            }
            NodeKind::EnumConstant { args, body, .. } => {
                out.extend(args);
                out.extend(body);
            }
            NodeKind::TypeParam { bounds, .. } => out.extend(bounds),
            NodeKind::Field {
                ty, declarators, ..
            }
            | NodeKind::LocalVar {
                ty, declarators, ..
            } => {
                out.push(*ty);
                out.extend(declarators);
            }
            NodeKind::Method {
                type_params,
                ret,
                params,
                throws,
                body,
                ..
            } => {
                out.extend(type_params);
                out.push(*ret);
                out.extend(params);
                out.extend(throws);
                out.extend(body);
            }
            NodeKind::Constructor {
                params,
                throws,
                body,
                ..
            } => {
                out.extend(params);
                out.extend(throws);
                out.push(*body);
            }
            NodeKind::Initializer { body, .. } => out.push(*body),
            NodeKind::Param { ty, .. } => out.push(*ty),
            NodeKind::VarDeclarator { init, .. } => out.extend(init),
            NodeKind::TypeRef {
                qualifier, args, ..
            } => {
                out.extend(qualifier);
                out.extend(args);
            }
            NodeKind::Wildcard { bound } => out.extend(bound),
            NodeKind::Block { stmts } => out.extend(stmts),
            NodeKind::ExprStmt { expr } | NodeKind::Paren { expr } => out.push(*expr),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push(*cond);
                out.push(*then_branch);
                out.extend(else_branch);
            }
            NodeKind::While { cond, body } => {
                out.push(*cond);
                out.push(*body);
            }
            NodeKind::DoWhile { body, cond } => {
                out.push(*body);
                out.push(*cond);
            }
            NodeKind::For {
                init,
                cond,
                update,
                body,
            } => {
                out.extend(init);
                out.extend(cond);
                out.extend(update);
                out.push(*body);
            }
            NodeKind::ForEach {
                var,
                iterable,
                body,
            } => {
                out.push(*var);
                out.push(*iterable);
                out.push(*body);
            }
            NodeKind::Switch { selector, cases } => {
                out.push(*selector);
                out.extend(cases);
            }
            NodeKind::SwitchCase { labels, body } => {
                out.extend(labels);
                out.extend(body);
            }
            NodeKind::Try {
                body,
                catches,
                finally,
            } => {
                out.push(*body);
                out.extend(catches);
                out.extend(finally);
            }
            NodeKind::Catch { param, body } => {
                out.push(*param);
                out.push(*body);
            }
            NodeKind::Return { value } => out.extend(value),
            NodeKind::Throw { value } => out.push(*value),
            NodeKind::Labeled { body, .. } => out.push(*body),
            NodeKind::Synchronized { lock, body } => {
                out.push(*lock);
                out.push(*body);
            }
            NodeKind::Assert { cond, message } => {
                out.push(*cond);
                out.extend(message);
            }
            NodeKind::FieldAccess { receiver, .. } => out.push(*receiver),
            NodeKind::Call { receiver, args, .. } => {
                out.extend(receiver);
                out.extend(args);
            }
            NodeKind::ExplicitCtorCall { args, .. } => out.extend(args),
            NodeKind::New { ty, args, body } => {
                out.push(*ty);
                out.extend(args);
                if let Some(body) = body {
                    out.extend(body);
                }
            }
            NodeKind::NewArray {
                elem, dims, init, ..
            } => {
                out.push(*elem);
                out.extend(dims);
                out.extend(init);
            }
            NodeKind::ArrayInit { elements } => out.extend(elements),
            NodeKind::ClassLit { ty } => out.push(*ty),
            NodeKind::Index { base, index } => {
                out.push(*base);
                out.push(*index);
            }
            NodeKind::Unary { operand, .. } => out.push(*operand),
            NodeKind::Binary { lhs, rhs, .. } => {
                out.push(*lhs);
                out.push(*rhs);
            }
            NodeKind::Assign { target, value, .. } => {
                out.push(*target);
                out.push(*value);
            }
            NodeKind::Ternary {
                cond,
                then_value,
                else_value,
            } => {
                out.push(*cond);
                out.push(*then_value);
                out.push(*else_value);
            }
            NodeKind::Cast { ty, expr } => {
                out.push(*ty);
                out.push(*expr);
            }
            NodeKind::InstanceOf { expr, ty } => {
                out.push(*expr);
                out.push(*ty);
            }
            NodeKind::Import { .. }
            | NodeKind::PrimitiveType { .. }
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::Empty
            | NodeKind::Name { .. }
            | NodeKind::Literal { .. }
            | NodeKind::This
            | NodeKind::Super
            | NodeKind::Error => {}
        }
        out
    }

    /// The identifier this node introduces or refers to, if any.
    pub fn name(&self) -> Option<&Name> {
        match self {
            NodeKind::TypeDecl { name, .. }
            | NodeKind::EnumConstant { name, .. }
            | NodeKind::TypeParam { name, .. }
            | NodeKind::Method { name, .. }
            | NodeKind::Constructor { name, .. }
            | NodeKind::Param { name, .. }
            | NodeKind::VarDeclarator { name, .. }
            | NodeKind::TypeRef { name, .. }
            | NodeKind::Name { name }
            | NodeKind::FieldAccess { name, .. }
            | NodeKind::Call { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::Name { .. }
                | NodeKind::FieldAccess { .. }
                | NodeKind::Call { .. }
                | NodeKind::ExplicitCtorCall { .. }
                | NodeKind::New { .. }
                | NodeKind::NewArray { .. }
                | NodeKind::ArrayInit { .. }
                | NodeKind::Literal { .. }
                | NodeKind::This
                | NodeKind::Super
                | NodeKind::ClassLit { .. }
                | NodeKind::Index { .. }
                | NodeKind::Unary { .. }
                | NodeKind::Binary { .. }
                | NodeKind::Assign { .. }
                | NodeKind::Ternary { .. }
                | NodeKind::Cast { .. }
                | NodeKind::InstanceOf { .. }
                | NodeKind::Paren { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: TextRange,
    pub parent: Option<NodeId>,
}

/// An immutable syntax tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        self.nodes[id.index()].range
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn name(&self, id: NodeId) -> Option<&Name> {
        self.kind(id).name()
    }

    /// All node ids, children before parents.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |node| self.parent(*node))
    }

    /// Pre-order walk of the subtree rooted at `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children = self.kind(node).children();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Innermost node whose range contains `offset` (end inclusive).
    pub fn covering_node(&self, offset: TextSize) -> NodeId {
        let mut current = self.root;
        'descend: loop {
            for child in self.kind(current).children() {
                let range = self.range(child);
                if range.start() <= offset && offset <= range.end() {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Innermost node whose name covers `offset`, so a caret placed right
    /// after an identifier still finds it.
    pub fn name_at(&self, offset: TextSize) -> Option<NodeId> {
        self.ids()
            .filter_map(|id| {
                let range = self.name(id)?.range;
                (range.start() <= offset && offset <= range.end()).then_some((id, range))
            })
            .min_by_key(|(_, range)| range.len())
            .map(|(id, _)| id)
    }
}

/// Allocates nodes bottom-up and links parents when finished.
#[derive(Default)]
pub(crate) struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub(crate) fn alloc(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            range,
            parent: None,
        });
        id
    }

    pub(crate) fn range(&self, id: NodeId) -> TextRange {
        self.nodes[id.index()].range
    }

    pub(crate) fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub(crate) fn finish(mut self, root: NodeId) -> Ast {
        for index in 0..self.nodes.len() {
            let parent = NodeId(index as u32);
            for child in self.nodes[index].kind.children() {
                self.nodes[child.index()].parent = Some(parent);
            }
        }
        Ast {
            nodes: self.nodes,
            root,
        }
    }
}
