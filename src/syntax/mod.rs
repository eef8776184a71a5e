//! Sketch sources and their translation into one compilable unit.
//!
//! - [`source`]: the files of a sketch and how the host provides them
//! - [`imports`]: import scraping
//! - [`sugar`]: dialect shorthand rewriting
//! - [`db`]: salsa memoization of per-file preprocessing
//! - [`translate`]: Translated Unit assembly

pub mod db;
pub mod imports;
pub mod source;
pub mod sugar;
pub mod translate;

pub use db::{PreparedFile, Preprocessor, SketchDatabase, SourceText, prepare_file};
pub use imports::{ExtractedImports, ImportStatement, extract_imports};
pub use source::{SharedSources, SourceFile, SourceProvider};
pub use sugar::{Rewrite, RewriteLog, Rewritten, expand_sugar};
pub use translate::{TranslateOptions, TranslatedUnit, Translator, UnitFile, translate};
