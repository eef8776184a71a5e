//! Declarations and kind constraints.

use bitflags::bitflags;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::parser::{Ast, NodeId, NodeKind};

/// What a declaration declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    Type,
    TypeParameter,
    Method,
    Constructor,
    Field,
    Parameter,
    Local,
}

impl DeclKind {
    pub fn display(self) -> &'static str {
        match self {
            DeclKind::Type => "type",
            DeclKind::TypeParameter => "type parameter",
            DeclKind::Method => "method",
            DeclKind::Constructor => "constructor",
            DeclKind::Field => "field",
            DeclKind::Parameter => "parameter",
            DeclKind::Local => "local variable",
        }
    }
}

bitflags! {
    /// A set of acceptable declaration kinds.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DeclKinds: u8 {
        const TYPE = 1 << 0;
        const TYPE_PARAMETER = 1 << 1;
        const METHOD = 1 << 2;
        const CONSTRUCTOR = 1 << 3;
        const FIELD = 1 << 4;
        const PARAMETER = 1 << 5;
        const LOCAL = 1 << 6;

        const VARIABLE = Self::FIELD.bits() | Self::PARAMETER.bits() | Self::LOCAL.bits();
        const TYPE_NAME = Self::TYPE.bits() | Self::TYPE_PARAMETER.bits();
    }
}

impl DeclKinds {
    pub fn accepts(self, kind: DeclKind) -> bool {
        self.contains(DeclKinds::from(kind))
    }
}

impl From<DeclKind> for DeclKinds {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Type => DeclKinds::TYPE,
            DeclKind::TypeParameter => DeclKinds::TYPE_PARAMETER,
            DeclKind::Method => DeclKinds::METHOD,
            DeclKind::Constructor => DeclKinds::CONSTRUCTOR,
            DeclKind::Field => DeclKinds::FIELD,
            DeclKind::Parameter => DeclKinds::PARAMETER,
            DeclKind::Local => DeclKinds::LOCAL,
        }
    }
}

/// A declaration in the Translated Unit's tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclarationNode {
    pub node: NodeId,
    pub kind: DeclKind,
    pub name: SmolStr,
    /// Range of the declared name.
    pub range: TextRange,
}

/// The declaration `node` introduces, if it introduces one.
pub fn declaration_of(ast: &Ast, node: NodeId) -> Option<DeclarationNode> {
    let kind = match ast.kind(node) {
        NodeKind::TypeDecl { .. } => DeclKind::Type,
        NodeKind::TypeParam { .. } => DeclKind::TypeParameter,
        NodeKind::Method { .. } => DeclKind::Method,
        NodeKind::Constructor { .. } => DeclKind::Constructor,
        NodeKind::EnumConstant { .. } => DeclKind::Field,
        NodeKind::Param { .. } => DeclKind::Parameter,
        NodeKind::VarDeclarator { .. } => match ast.parent(node).map(|p| ast.kind(p)) {
            Some(NodeKind::Field { .. }) => DeclKind::Field,
            _ => DeclKind::Local,
        },
        _ => return None,
    };
    let name = ast.name(node)?;
    Some(DeclarationNode {
        node,
        kind,
        name: name.text.clone(),
        range: name.range,
    })
}

/// Every declaration in the tree, in source order.
pub fn declarations(ast: &Ast) -> Vec<DeclarationNode> {
    ast.descendants(ast.root())
        .into_iter()
        .filter_map(|id| declaration_of(ast, id))
        .collect()
}

/// Declarations a type body introduces directly.
pub(crate) fn member_declarations(ast: &Ast, members: &[NodeId]) -> Vec<DeclarationNode> {
    let mut out = Vec::new();
    for &member in members {
        match ast.kind(member) {
            NodeKind::Field { declarators, .. } => {
                out.extend(declarators.iter().filter_map(|d| declaration_of(ast, *d)));
            }
            NodeKind::Initializer { .. } => {}
            _ => out.extend(declaration_of(ast, member)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_declarations_in_source_order() {
        let ast = parse(
            "class A<T> { int x, y; A(int a) {} void m(String s) { float f = 1; } enum E { ONE } }",
        )
        .ast;
        let found: Vec<(DeclKind, String)> = declarations(&ast)
            .into_iter()
            .map(|d| (d.kind, d.name.to_string()))
            .collect();
        assert_eq!(
            found,
            vec![
                (DeclKind::Type, "A".to_string()),
                (DeclKind::TypeParameter, "T".to_string()),
                (DeclKind::Field, "x".to_string()),
                (DeclKind::Field, "y".to_string()),
                (DeclKind::Constructor, "A".to_string()),
                (DeclKind::Parameter, "a".to_string()),
                (DeclKind::Method, "m".to_string()),
                (DeclKind::Parameter, "s".to_string()),
                (DeclKind::Local, "f".to_string()),
                (DeclKind::Type, "E".to_string()),
                (DeclKind::Field, "ONE".to_string()),
            ]
        );
    }

    #[test]
    fn test_kind_sets() {
        assert!(DeclKinds::VARIABLE.accepts(DeclKind::Local));
        assert!(DeclKinds::VARIABLE.accepts(DeclKind::Field));
        assert!(!DeclKinds::VARIABLE.accepts(DeclKind::Method));
        assert!(DeclKinds::TYPE_NAME.accepts(DeclKind::TypeParameter));
    }
}
