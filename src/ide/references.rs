//! Find-all-occurrences implementation.

use rayon::prelude::*;

use crate::base::FileId;
use crate::hir::{DeclKind, DeclarationNode, Resolution, Role, TreeScope, role_of};
use crate::parser::{Ast, NodeId};

use super::analysis::Snapshot;

/// A place in the edited files where a declaration is named.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occurrence {
    pub file: FileId,
    /// Line (0-indexed).
    pub line: usize,
    /// Column (0-indexed).
    pub col: usize,
    /// Length of the name in characters.
    pub len: usize,
    /// Whether this is the declaration itself (vs a use).
    pub is_declaration: bool,
}

/// Every occurrence of `decl` in the snapshot's tree, sorted by position.
///
/// Candidate nodes are resolved in parallel; each worker owns its resolver.
/// Occurrences inside generated scaffolding are left out.
pub fn find_all_occurrences(snapshot: &Snapshot, decl: &DeclarationNode) -> Vec<Occurrence> {
    let Some(ast) = snapshot.ast.as_deref() else {
        return Vec::new();
    };
    if decl.node.index() >= ast.len() {
        return Vec::new();
    }
    let scope = TreeScope::new(ast);
    let candidates: Vec<NodeId> = ast
        .ids()
        .filter(|id| ast.name(*id).is_some_and(|n| n.text == decl.name))
        .collect();

    let mut found: Vec<Occurrence> = candidates
        .par_iter()
        .map_init(
            || snapshot.resolver(&scope),
            |resolver, &id| {
                let resolution = resolver.resolve(id);
                if !refers_to(ast, &resolution, decl) {
                    return None;
                }
                let name = ast.name(id)?;
                let occurrence = snapshot.locate(name.range)?;
                Some(Occurrence {
                    is_declaration: role_of(ast, id) == Some(Role::Declaration),
                    ..occurrence
                })
            },
        )
        .flatten()
        .collect();
    found.sort();
    found.dedup();
    tracing::debug!("[REFERENCES] {} → {} occurrences", decl.name, found.len());
    found
}

/// Whether `resolution` names `decl`. A class is also named by its
/// constructors and by `new` expressions that pick one of them.
fn refers_to(ast: &Ast, resolution: &Resolution, decl: &DeclarationNode) -> bool {
    let Resolution::Local(target) = resolution else {
        return false;
    };
    target.node == decl.node
        || (decl.kind == DeclKind::Type
            && target.kind == DeclKind::Constructor
            && ast.parent(target.node) == Some(decl.node))
}
