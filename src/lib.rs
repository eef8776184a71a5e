//! # sketchcheck-base
//!
//! Incremental analysis pipeline for multi-file sketches written in a
//! Java-like dialect: translation into one compilable unit, position
//! mapping back to the edited files, background checking, and caret
//! queries (find declaration, find occurrences, completion).
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! scheduler → Worker thread, backlog, AnalysisService
//!   ↓
//! ide       → Snapshot queries (declaration, occurrences, completion)
//!   ↓
//! hir       → Declarations, resolver, semantic checks, diagnostics
//!   ↓
//! project   → Predefined classes, library jars, classpath cache
//!   ↓
//! syntax ⇄ mapping → Import extraction, sugar, Translated Unit / line table, alignment
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, arena AST
//!   ↓
//! base      → Primitives (FileId, LineIndex, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax/mapping → project → hir → ide → scheduler)
// ============================================================================

/// Foundation types: FileId, LineIndex, TextRange
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, arena AST
pub mod parser;

/// Syntax: source files, import extraction, sugar expansion, translation
pub mod syntax;

/// Mapping between Translated Unit and source file positions
pub mod mapping;

/// Project: predefined classes, library discovery, classpath cache
pub mod project;

/// High-level IR: declarations, name resolution, semantic checks
pub mod hir;

/// IDE features: find declaration, find occurrences, completion
pub mod ide;

/// Background scheduling and the host-facing service
pub mod scheduler;

// Re-export foundation types
pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};

// Re-export the host-facing surface
pub use hir::{Diagnostic, Resolution, Severity};
pub use ide::{Analysis, CompletionCandidate, CompletionKind, Occurrence};
pub use scheduler::{AnalysisConfig, AnalysisService, PauseGuard, Phase, ServiceError};
pub use syntax::{SharedSources, SourceFile, SourceProvider};
