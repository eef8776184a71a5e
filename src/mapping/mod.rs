//! Position mapping between sketch files and the translated unit.
//!
//! - [`LineTable`] converts whole lines using per-file line counts and the
//!   import list.
//! - [`AlignmentTable`] recovers columns on a line that sugar rewriting
//!   changed, via edit-distance alignment of the two line texts.
//! - [`PositionMapper`] combines both for one [`TranslatedUnit`].
//!
//! Lookups that land on scaffolding or fall out of range return `None`.
//!
//! [`TranslatedUnit`]: crate::syntax::TranslatedUnit

mod align;
mod line_table;
mod mapper;

pub use align::{AlignmentTable, align_column, align_column_reverse};
pub use line_table::{FileLine, LineTable, UnitRegion};
pub use mapper::{FilePosition, PositionMapper};
