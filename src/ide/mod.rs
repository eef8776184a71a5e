//! IDE features: caret queries answered from the last published snapshot.
//!
//! This module provides the interface between the semantic model (HIR)
//! and the host editor. Queries never start an analysis cycle and never
//! block on one; they read whatever [`Snapshot`] was published last.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take a snapshot in, return data out
//! 2. **File coordinates**: Callers pass and receive positions in the
//!    files they edit, never in the Translated Unit
//! 3. **Misses are values**: `Resolution::Unresolved`, empty lists
//!
//! ## Usage
//!
//! ```ignore
//! let analysis = service.analysis();
//! let resolution = analysis.find_declaration(file, 4, 2, "ellipse");
//! let candidates = analysis.completions_for(file, 4, 5, "  pos.");
//! ```

mod analysis;
mod completion;
mod goto;
mod references;
pub mod text_utils;

pub use analysis::{Analysis, CycleTiming, Snapshot};
pub use completion::{CompletionCandidate, CompletionKind, completions};
pub use goto::find_declaration;
pub use references::{Occurrence, find_all_occurrences};
