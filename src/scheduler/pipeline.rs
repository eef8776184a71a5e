//! One analysis cycle: translate, check, publish.
//!
//! ```text
//! Idle → Translating → SyntaxChecking ─┬─ problems ──────────────┬→ Publishing → Idle
//!                                      └→ SemanticChecking ──────┘
//! ```
//!
//! A cycle always runs to the end. A stage that panics is logged and
//! skipped; whatever the earlier stages produced is still published.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

use smol_str::SmolStr;

use crate::hir::{Diagnostic, DiagnosticCollector, check_sources, check_unit};
use crate::ide::{CycleTiming, Snapshot};
use crate::parser::{Ast, parse};
use crate::project::{
    ClassLoader, ClassLookup, ClassTable, ClasspathCache, LayeredClasses, core_classes,
};
use crate::syntax::{SourceFile, TranslatedUnit, Translator};

use super::config::AnalysisConfig;

// ============================================================================
// PHASES
// ============================================================================

/// Where the worker is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    Idle = 0,
    Translating = 1,
    SyntaxChecking = 2,
    SemanticChecking = 3,
    Publishing = 4,
}

impl Phase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Phase::Translating,
            2 => Phase::SyntaxChecking,
            3 => Phase::SemanticChecking,
            4 => Phase::Publishing,
            _ => Phase::Idle,
        }
    }
}

/// The current phase, readable from any thread.
#[derive(Debug, Default)]
pub struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub fn get(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, phase: Phase) {
        self.0.store(phase as u8, Ordering::Release);
    }
}

/// Run `stage`, turning a panic into `None`.
fn guarded<T>(stage: &str, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::error!("[CYCLE] {stage} stage panicked, publishing partial results");
            None
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// The state carried from one cycle to the next.
pub struct Pipeline {
    translator: Translator,
    classpath: ClasspathCache,
    semantic_checks: bool,
    default_imports: Arc<[SmolStr]>,
    /// Lookup for queries while no classpath is bound.
    fallback: Arc<dyn ClassLookup>,
    generation: u64,
    last: Option<(Arc<TranslatedUnit>, Option<Arc<Ast>>)>,
}

impl Pipeline {
    pub fn new(config: &AnalysisConfig, loader: impl ClassLoader + 'static) -> Self {
        Self {
            translator: Translator::new(config.translate_options()),
            classpath: ClasspathCache::new(config.library_roots.clone(), config.code_folder.clone())
                .with_loader(loader),
            semantic_checks: config.semantic_checks,
            default_imports: config.default_imports.iter().cloned().collect(),
            fallback: Arc::new(LayeredClasses::new(core_classes(), ClassTable::new())),
            generation: 0,
            last: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn classpath(&self) -> &ClasspathCache {
        &self.classpath
    }

    /// Run one full cycle over `files` and return the snapshot to publish.
    pub fn run_cycle(&mut self, files: &[SourceFile], phase: &PhaseCell) -> Snapshot {
        let started = Instant::now();
        self.generation += 1;

        phase.set(Phase::Translating);
        let translated = guarded("translate", || self.translator.translate(files)).map(Arc::new);

        let mut collector = DiagnosticCollector::new();
        let mut ast = None;
        if let Some(unit) = translated.as_deref() {
            phase.set(Phase::SyntaxChecking);
            let source_problems = guarded("source", || check_sources(unit)).unwrap_or_default();
            if let Some(parsed) = guarded("syntax", || parse(&unit.text)) {
                // Text-level problems explain the parser errors they cause.
                if source_problems.is_empty() {
                    for error in &parsed.errors {
                        collector.syntax_error(unit, error);
                    }
                }
                ast = Some(Arc::new(parsed.ast));
            }
            collector.extend(source_problems);

            if self.semantic_checks && !collector.has_errors() {
                if let Some(ast) = ast.as_deref() {
                    phase.set(Phase::SemanticChecking);
                    self.semantic_phase(unit, ast, &mut collector);
                }
            }
        }

        phase.set(Phase::Publishing);
        let (unit, ast) = match translated {
            Some(unit) => {
                self.last = Some((unit.clone(), ast.clone()));
                (Some(unit), ast)
            }
            None => match &self.last {
                Some((unit, ast)) => (Some(unit.clone()), ast.clone()),
                None => (None, None),
            },
        };

        let mut diagnostics: Vec<Diagnostic> = collector.finish();
        diagnostics.sort_by_key(|d| (d.file, d.line, d.col));
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        tracing::info!(
            "[CYCLE] #{} finished in {:?}: {} errors, {} warnings",
            self.generation,
            started.elapsed(),
            errors,
            diagnostics.len() - errors
        );

        Snapshot {
            generation: self.generation,
            unit,
            ast,
            diagnostics: diagnostics.into(),
            classes: Some(self.classpath.handle().unwrap_or_else(|| self.fallback.clone())),
            default_imports: self.default_imports.clone(),
            timing: Some(CycleTiming {
                started,
                finished: Instant::now(),
            }),
        }
    }

    fn semantic_phase(&mut self, unit: &TranslatedUnit, ast: &Ast, collector: &mut DiagnosticCollector) {
        let classpath = &mut self.classpath;
        if guarded("classpath", || classpath.update(&unit.imports)).is_none() {
            return;
        }
        // The cache keeps the statements of its last reload, so positions
        // come from this cycle's imports.
        let unresolved = self.classpath.unresolved();
        for (unit_line, import) in unit.imports.iter().enumerate() {
            if unresolved.iter().any(|u| u.name == import.name) {
                collector.library_not_found(unit_line, import);
            }
        }

        let Some(classes) = self.classpath.handle() else {
            tracing::debug!("[CYCLE] no bound classpath, skipping semantic checks");
            return;
        };
        let default_imports = &self.default_imports;
        let search = self.classpath.search();
        if let Some(found) = guarded("semantic", || {
            check_unit(unit, ast, classes.as_ref(), search, default_imports)
        }) {
            collector.extend(found);
        }
    }
}
