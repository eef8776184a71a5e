//! Salsa database memoizing per-file preprocessing.
//!
//! Import scraping and sugar rewriting only depend on one file's text, so
//! between cycles only the files that actually changed are re-scanned.

use rustc_hash::FxHashMap;
use salsa::Setter;

use crate::base::FileId;

use super::imports::{ImportStatement, extract_imports};
use super::source::SourceFile;
use super::sugar::{RewriteLog, expand_sugar};

// ============================================================================
// INPUTS
// ============================================================================

/// Input: The raw text content of a file.
#[salsa::input]
pub struct SourceText {
    pub file: FileId,
    #[return_ref]
    pub text: String,
}

// ============================================================================
// DATABASE
// ============================================================================

/// The Salsa database backing the translator.
#[salsa::db]
#[derive(Default, Clone)]
pub struct SketchDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for SketchDatabase {
    fn salsa_event(&self, _event: &dyn Fn() -> salsa::Event) {
        // Default no-op implementation
    }
}

impl SketchDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// PREPARED FILE
// ============================================================================

/// A file with imports lifted out and sugar expanded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedFile {
    pub imports: Vec<ImportStatement>,
    pub text: String,
    pub rewrites: RewriteLog,
}

// ============================================================================
// TRACKED QUERIES
// ============================================================================

/// Extract imports and expand sugar for one file.
///
/// Memoized; recomputed only when the file's `SourceText` changes.
#[salsa::tracked]
pub fn prepare_file(db: &dyn salsa::Database, source: SourceText) -> PreparedFile {
    let file = source.file(db);
    let extracted = extract_imports(file, source.text(db));
    let rewritten = expand_sugar(&extracted.text);
    PreparedFile {
        imports: extracted.imports,
        text: rewritten.text,
        rewrites: rewritten.log,
    }
}

/// Owns the database and one input per file.
#[derive(Default)]
pub struct Preprocessor {
    db: SketchDatabase,
    inputs: FxHashMap<FileId, SourceText>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(&mut self, file: &SourceFile) -> PreparedFile {
        let input = match self.inputs.get(&file.id).copied() {
            Some(input) => {
                let changed = input.text(&self.db).as_str() != &*file.text;
                if changed {
                    input.set_text(&mut self.db).to(file.text.to_string());
                }
                input
            }
            None => {
                let input = SourceText::new(&self.db, file.id, file.text.to_string());
                self.inputs.insert(file.id, input);
                input
            }
        };
        prepare_file(&self.db, input)
    }

    /// Forget inputs for files that are no longer part of the sketch.
    pub fn retain_files(&mut self, count: usize) {
        self.inputs.retain(|id, _| id.index() < count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_file_query() {
        let db = SketchDatabase::new();
        let source = SourceText::new(
            &db,
            FileId::new(0),
            "import java.util.List;\ncolor c = #00FF00;".to_string(),
        );
        let prepared = prepare_file(&db, source);
        assert_eq!(prepared.imports.len(), 1);
        assert_eq!(
            prepared.text,
            "                      \nint c = 0xff00FF00;"
        );
        assert_eq!(prepared.rewrites.len(), 2);
    }

    #[test]
    fn test_preprocessor_tracks_edits() {
        let mut preprocessor = Preprocessor::new();
        let mut file = SourceFile::new(FileId::new(0), "main", "int a = int(x);");
        let first = preprocessor.prepare(&file);
        assert!(first.rewrites.touches(0));

        file.text = "int a = 1;".into();
        let second = preprocessor.prepare(&file);
        assert_eq!(second.text, "int a = 1;");
        assert!(second.rewrites.is_empty());

        let again = preprocessor.prepare(&file);
        assert_eq!(again, second);
    }
}
