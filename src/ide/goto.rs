//! Find-declaration implementation.

use text_size::TextSize;

use crate::base::FileId;
use crate::hir::{Resolution, TreeScope};
use crate::parser::{Ast, NodeId};

use super::analysis::Snapshot;

/// Resolve the name `name` at `file:line:col`.
///
/// # Arguments
/// * `snapshot` - The published snapshot to query
/// * `file` - The file containing the caret
/// * `line` - Caret line (0-indexed)
/// * `col` - Caret column (0-indexed), anywhere on or right after the name
/// * `name` - The identifier the host sees under the caret
///
/// # Returns
/// The declaration, predefined member, or `Resolution::Unresolved`.
pub fn find_declaration(
    snapshot: &Snapshot,
    file: FileId,
    line: usize,
    col: usize,
    name: &str,
) -> Resolution {
    let (Some(unit), Some(ast)) = (snapshot.unit.as_deref(), snapshot.ast.as_deref()) else {
        return Resolution::Unresolved;
    };
    let Some(offset) = unit
        .mapper()
        .to_unit_position(file, line, col)
        .and_then(|(unit_line, unit_col)| unit.offset(unit_line, unit_col))
    else {
        tracing::debug!("[GOTO] {file}:{line}:{col} is outside the unit");
        return Resolution::Unresolved;
    };
    let Some(node) = name_node_at(ast, offset, name) else {
        return Resolution::Unresolved;
    };

    let scope = TreeScope::new(ast);
    snapshot.resolver(&scope).resolve(node)
}

/// Innermost node named `name` whose name covers `offset`.
fn name_node_at(ast: &Ast, offset: TextSize, name: &str) -> Option<NodeId> {
    ast.ids()
        .filter_map(|id| {
            let found = ast.name(id)?;
            (found.text == name && found.range.start() <= offset && offset <= found.range.end())
                .then_some((id, found.range.len()))
        })
        .min_by_key(|(_, len)| *len)
        .map(|(id, _)| id)
}
