//! Syntax and semantic problem reporting.
//!
//! Diagnostics are produced against the Translated Unit and then located in
//! the source file the user edits, through the unit's position mapper.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::FileId;
use crate::mapping::FilePosition;
use crate::parser::SyntaxError;
use crate::syntax::{ImportStatement, TranslatedUnit};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A problem with its position in the unit and in the edited file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable identifier (e.g., "E0101").
    pub code: Arc<str>,
    pub message: Arc<str>,
    /// Line in the Translated Unit (0-indexed).
    pub unit_line: usize,
    /// Column in the Translated Unit (0-indexed, characters).
    pub unit_col: usize,
    /// Number of characters the problem covers.
    pub len: usize,
    /// The source file the problem is shown in.
    pub file: FileId,
    /// Line in `file` (0-indexed).
    pub line: usize,
    /// Column in `file` (0-indexed, characters).
    pub col: usize,
    /// Qualified class names an import statement could bring in to fix the
    /// problem.
    pub import_suggestions: Vec<SmolStr>,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        code: &str,
        unit_line: usize,
        unit_col: usize,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            severity,
            code: Arc::from(code),
            message: message.into(),
            unit_line,
            unit_col,
            len: 0,
            file: FileId::new(0),
            line: 0,
            col: 0,
            import_suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic at a unit position.
    pub fn error(code: &str, unit_line: usize, unit_col: usize, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, code, unit_line, unit_col, message)
    }

    /// Create a new warning diagnostic at a unit position.
    pub fn warning(
        code: &str,
        unit_line: usize,
        unit_col: usize,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(Severity::Warning, code, unit_line, unit_col, message)
    }

    /// Set the number of characters covered.
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Set the file position directly.
    pub fn with_file_position(mut self, position: FilePosition) -> Self {
        self.file = position.file;
        self.line = position.line;
        self.col = position.col;
        self
    }

    pub fn with_import_suggestions(mut self, suggestions: Vec<SmolStr>) -> Self {
        self.import_suggestions = suggestions;
        self
    }

    /// Locate the diagnostic in the edited files. Positions on scaffolding
    /// lines clamp to the nearest file line.
    pub fn located(self, unit: &TranslatedUnit) -> Self {
        let position = unit
            .mapper()
            .to_file_position_clamped(self.unit_line, self.unit_col);
        self.with_file_position(position)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
///
/// ## Code Ranges
///
/// - **E0001-E0099**: Syntax problems, found by the parser or by scanning
///   the source text
/// - **E0101-E0199**: Semantic problems (name resolution)
/// - **W0101-W0199**: Classpath warnings
pub mod codes {
    /// Syntax error.
    pub const SYNTAX_ERROR: &str = "E0001";
    /// Typographic quote where a straight quote belongs.
    pub const CURLY_QUOTE: &str = "E0002";
    /// A `}` without an open `{` in the same tab.
    pub const MISSING_LEFT_BRACE: &str = "E0003";
    /// A `{` never closed in the same tab.
    pub const MISSING_RIGHT_BRACE: &str = "E0004";

    /// Type name not found.
    pub const UNRESOLVED_TYPE: &str = "E0101";
    /// Variable name not found.
    pub const UNRESOLVED_VARIABLE: &str = "E0102";
    /// Method not defined for the enclosing type.
    pub const UNDEFINED_METHOD: &str = "E0103";
    /// Member not defined for a receiver type.
    pub const UNDEFINED_MEMBER: &str = "E0104";

    /// No library provides an imported package.
    pub const LIBRARY_NOT_FOUND: &str = "W0101";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during one analysis pass.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add a parser error, located through `unit`.
    pub fn syntax_error(&mut self, unit: &TranslatedUnit, error: &SyntaxError) {
        let start = unit.line_index.line_col(&unit.text, error.range.start());
        let end = unit.line_index.line_col(&unit.text, error.range.end());
        let len = if end.line == start.line {
            (end.col - start.col) as usize
        } else {
            0
        };
        self.add(
            Diagnostic::error(
                codes::SYNTAX_ERROR,
                start.line as usize,
                start.col as usize,
                error.message.clone(),
            )
            .with_len(len)
            .located(unit),
        );
    }

    /// Warn that no library provides the package of `import`. The warning is
    /// shown on the original import statement.
    pub fn library_not_found(&mut self, unit_line: usize, import: &ImportStatement) {
        let package = import.package();
        self.add(
            Diagnostic::warning(
                codes::LIBRARY_NOT_FOUND,
                unit_line,
                0,
                format!("No library found for {package}"),
            )
            .with_len(import.len)
            .with_file_position(FilePosition::new(import.file, import.line, import.column)),
        );
    }

    /// Get all collected diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take all diagnostics, consuming the collector.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Get error count.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Get warning count.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }
}
