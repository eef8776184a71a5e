//! Snapshot and Analysis: the read side of the pipeline.
//!
//! Every analysis cycle ends by publishing one immutable [`Snapshot`]. An
//! [`Analysis`] is a cheap handle on one snapshot; all queries made through
//! the same handle see the same unit, tree and diagnostics, however many
//! cycles run in the meantime.
//!
//! ## Usage
//!
//! ```ignore
//! let analysis = service.analysis();
//!
//! for diagnostic in analysis.diagnostics() { /* ... */ }
//! let target = analysis.find_declaration(file, line, col, "ellipse");
//! let items = analysis.completions_for(file, line, col, "  pos.no");
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use smol_str::SmolStr;
use text_size::TextRange;

use crate::base::FileId;
use crate::hir::{DeclarationNode, Diagnostic, Resolution, Resolver, ScopeProvider};
use crate::parser::Ast;
use crate::project::{ClassLookup, DEFAULT_IMPORTS};
use crate::syntax::TranslatedUnit;

use super::completion::{CompletionCandidate, completions};
use super::goto::find_declaration;
use super::references::{Occurrence, find_all_occurrences};

/// When a cycle started and when its snapshot was complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleTiming {
    pub started: Instant,
    pub finished: Instant,
}

impl CycleTiming {
    pub fn duration(&self) -> Duration {
        self.finished.saturating_duration_since(self.started)
    }
}

/// Everything one analysis cycle produced.
///
/// The unit and tree are absent until the first cycle has translated the
/// sketch. `classes` is absent when no classpath could be bound.
pub struct Snapshot {
    /// Number of the cycle that published this snapshot; 0 before the first.
    pub generation: u64,
    pub unit: Option<Arc<TranslatedUnit>>,
    pub ast: Option<Arc<Ast>>,
    pub diagnostics: Arc<[Diagnostic]>,
    pub classes: Option<Arc<dyn ClassLookup>>,
    pub default_imports: Arc<[SmolStr]>,
    /// `None` before the first cycle.
    pub timing: Option<CycleTiming>,
}

impl Snapshot {
    /// The snapshot visible before any cycle has run.
    pub fn empty() -> Self {
        Self {
            generation: 0,
            unit: None,
            ast: None,
            diagnostics: Arc::from(Vec::new()),
            classes: None,
            default_imports: DEFAULT_IMPORTS.iter().map(|p| SmolStr::new(p)).collect(),
            timing: None,
        }
    }

    /// A resolver over `scope`, bound to this snapshot's classpath and imports.
    pub(crate) fn resolver<'a, S: ScopeProvider + ?Sized>(&'a self, scope: &'a S) -> Resolver<'a, S> {
        let imports = self.unit.as_deref().map_or(&[][..], |u| &u.imports[..]);
        Resolver::new(scope, self.classes.as_deref(), imports)
            .with_default_imports(&self.default_imports)
    }

    /// Position of a unit range in the edited files, or `None` when it starts
    /// in scaffolding.
    pub(crate) fn locate(&self, range: TextRange) -> Option<Occurrence> {
        let unit = self.unit.as_deref()?;
        let start = unit.line_index.line_col(&unit.text, range.start());
        let position = unit
            .mapper()
            .to_file_position(start.line as usize, start.col as usize)?;
        let len = unit.text.get(std::ops::Range::<usize>::from(range))?.chars().count();
        Some(Occurrence {
            file: position.file,
            line: position.line,
            col: position.col,
            len,
            is_declaration: false,
        })
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("generation", &self.generation)
            .field("has_unit", &self.unit.is_some())
            .field("diagnostics", &self.diagnostics.len())
            .field("classes_bound", &self.classes.is_some())
            .field("timing", &self.timing)
            .finish()
    }
}

/// An immutable handle on one published snapshot.
///
/// All queries go through this struct to ensure consistent results.
#[derive(Clone, Debug)]
pub struct Analysis {
    snapshot: Arc<Snapshot>,
}

impl Analysis {
    pub fn new(snapshot: Arc<Snapshot>) -> Self {
        Self { snapshot }
    }

    // ==================== Accessors ====================

    /// Generation of the underlying snapshot.
    pub fn generation(&self) -> u64 {
        self.snapshot.generation
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Timing of the cycle that produced this snapshot.
    pub fn timing(&self) -> Option<CycleTiming> {
        self.snapshot.timing
    }

    /// The Translated Unit, once one has been built.
    pub fn unit(&self) -> Option<&TranslatedUnit> {
        self.snapshot.unit.as_deref()
    }

    /// Diagnostics of the last completed cycle, in file coordinates.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.snapshot.diagnostics
    }

    /// Diagnostics shown in one file.
    pub fn diagnostics_for(&self, file: FileId) -> Vec<Diagnostic> {
        self.diagnostics()
            .iter()
            .filter(|d| d.file == file)
            .cloned()
            .collect()
    }

    // ==================== Queries ====================

    /// What the name `name` at `file:line:col` refers to.
    ///
    /// `Resolution::Unresolved` is the normal answer for positions that hold
    /// no resolvable name, such as comments or scaffolding.
    pub fn find_declaration(&self, file: FileId, line: usize, col: usize, name: &str) -> Resolution {
        find_declaration(&self.snapshot, file, line, col, name)
    }

    /// Where a local declaration's name sits in the edited files.
    pub fn declaration_position(&self, decl: &DeclarationNode) -> Option<Occurrence> {
        self.snapshot.locate(decl.range).map(|o| Occurrence {
            is_declaration: true,
            ..o
        })
    }

    /// Every place in the edited files that names `decl`, the declaration
    /// itself included, sorted by position.
    pub fn find_all_occurrences(&self, decl: &DeclarationNode) -> Vec<Occurrence> {
        find_all_occurrences(&self.snapshot, decl)
    }

    /// Completion candidates for the text typed before the caret.
    pub fn completions_for(
        &self,
        file: FileId,
        line: usize,
        col: usize,
        prefix: &str,
    ) -> Vec<CompletionCandidate> {
        completions(&self.snapshot, file, line, col, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_answers_nothing() {
        let analysis = Analysis::new(Arc::new(Snapshot::empty()));
        assert_eq!(analysis.generation(), 0);
        assert!(analysis.diagnostics().is_empty());
        assert!(analysis.unit().is_none());
        assert_eq!(
            analysis.find_declaration(FileId::new(0), 0, 0, "x"),
            Resolution::Unresolved
        );
        assert!(
            analysis
                .completions_for(FileId::new(0), 0, 0, "ell")
                .is_empty()
        );
    }
}
