//! Scope providers.
//!
//! Resolution always walks the scopes of one *context* tree. The name being
//! resolved may live in that same tree ([`TreeScope`]) or in a separately
//! parsed fragment, such as the receiver text typed before a `.` during
//! completion ([`FragmentScope`]). In the latter case the walk starts at the
//! caret's position in the real tree.

use text_size::TextSize;

use crate::parser::{Ast, NodeId};

/// Where the outward scope walk for an occurrence begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkStart {
    /// Innermost context node whose scopes are visible.
    pub node: NodeId,
    /// Declarations in blocks must start before this offset.
    pub offset: TextSize,
}

impl WalkStart {
    /// Start at `node` itself, seeing only what is declared before it.
    pub fn at(ast: &Ast, node: NodeId) -> Self {
        Self {
            node,
            offset: ast.range(node).start(),
        }
    }
}

/// Supplies the trees and starting point for a resolution.
pub trait ScopeProvider {
    /// Tree the occurrence and its chain belong to.
    fn occurrence_tree(&self) -> &Ast;

    /// Tree whose declarations are visible.
    fn context_tree(&self) -> &Ast;

    /// Scope walk origin for a node of the occurrence tree.
    fn walk_start(&self, occurrence: NodeId) -> WalkStart;
}

/// Resolves occurrences against the tree they appear in.
#[derive(Clone, Copy, Debug)]
pub struct TreeScope<'a> {
    ast: &'a Ast,
}

impl<'a> TreeScope<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }
}

impl ScopeProvider for TreeScope<'_> {
    fn occurrence_tree(&self) -> &Ast {
        self.ast
    }

    fn context_tree(&self) -> &Ast {
        self.ast
    }

    fn walk_start(&self, occurrence: NodeId) -> WalkStart {
        WalkStart::at(self.ast, occurrence)
    }
}

/// Resolves a detached expression fragment as if it were written at
/// `offset` inside `context`.
#[derive(Clone, Copy, Debug)]
pub struct FragmentScope<'a> {
    fragment: &'a Ast,
    context: &'a Ast,
    anchor: NodeId,
    offset: TextSize,
}

impl<'a> FragmentScope<'a> {
    pub fn new(fragment: &'a Ast, context: &'a Ast, offset: TextSize) -> Self {
        Self {
            fragment,
            context,
            anchor: context.covering_node(offset),
            offset,
        }
    }

    pub fn anchor(&self) -> NodeId {
        self.anchor
    }
}

impl ScopeProvider for FragmentScope<'_> {
    fn occurrence_tree(&self) -> &Ast {
        self.fragment
    }

    fn context_tree(&self) -> &Ast {
        self.context
    }

    fn walk_start(&self, _occurrence: NodeId) -> WalkStart {
        WalkStart {
            node: self.anchor,
            offset: self.offset,
        }
    }
}
