//! Full position mapping for one Translated Unit.

use crate::base::FileId;
use crate::syntax::TranslatedUnit;

use super::align::{align_column, align_column_reverse};
use super::line_table::{FileLine, UnitRegion};

/// A 0-based position inside one source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilePosition {
    pub file: FileId,
    pub line: usize,
    pub col: usize,
}

impl FilePosition {
    pub fn new(file: FileId, line: usize, col: usize) -> Self {
        Self { file, line, col }
    }
}

/// Maps lines and columns between source files and a Translated Unit.
///
/// Columns only go through alignment on lines that sugar rewriting
/// touched; everywhere else they pass through unchanged.
#[derive(Clone, Copy, Debug)]
pub struct PositionMapper<'a> {
    unit: &'a TranslatedUnit,
}

impl<'a> PositionMapper<'a> {
    pub fn new(unit: &'a TranslatedUnit) -> Self {
        Self { unit }
    }

    pub fn to_file_line(&self, unit_line: usize) -> Option<FileLine> {
        self.unit.line_table.to_file_line(unit_line)
    }

    pub fn to_translated_line(&self, file: FileId, line: usize) -> Option<usize> {
        self.unit.line_table.to_translated_line(file, line)
    }

    /// Map a unit position back to the file that produced it.
    pub fn to_file_position(&self, unit_line: usize, unit_col: usize) -> Option<FilePosition> {
        match self.unit.line_table.region(unit_line) {
            UnitRegion::Import(index) => self.import_position(index, unit_col),
            UnitRegion::File(line) => Some(self.file_position(line, unit_col)),
            _ => None,
        }
    }

    /// Like [`to_file_position`](Self::to_file_position) but lands on the
    /// nearest user line when the unit position is scaffolding. Used for
    /// diagnostics, which must always point somewhere.
    pub fn to_file_position_clamped(&self, unit_line: usize, unit_col: usize) -> FilePosition {
        if let Some(position) = self.to_file_position(unit_line, unit_col) {
            return position;
        }
        let line = self.unit.line_table.to_file_line_clamped(unit_line);
        let col = match self.unit.line_table.region(unit_line) {
            UnitRegion::Header => 0,
            _ => self
                .unit
                .file(line.file)
                .and_then(|f| f.original_line(line.line))
                .map_or(0, |text| text.chars().count()),
        };
        FilePosition::new(line.file, line.line, col)
    }

    /// Map a file position into the unit.
    pub fn to_unit_position(&self, file: FileId, line: usize, col: usize) -> Option<(usize, usize)> {
        let unit_line = self.to_translated_line(file, line)?;
        let unit_file = self.unit.file(file)?;
        if !unit_file.rewrites.touches(line) {
            return Some((unit_line, col));
        }
        let original = unit_file.original_line(line)?;
        let processed = unit_file.processed_line(line)?;
        Some((unit_line, align_column(original, processed, col)))
    }

    fn file_position(&self, line: FileLine, unit_col: usize) -> FilePosition {
        let col = self
            .unit
            .file(line.file)
            .filter(|f| f.rewrites.touches(line.line))
            .and_then(|f| Some((f.original_line(line.line)?, f.processed_line(line.line)?)))
            .map_or(unit_col, |(original, processed)| {
                align_column_reverse(original, processed, unit_col)
            });
        FilePosition::new(line.file, line.line, col)
    }

    /// Import lines are normalized, so the column is aligned against the
    /// statement as it was written.
    fn import_position(&self, index: usize, unit_col: usize) -> Option<FilePosition> {
        let import = self.unit.imports.get(index)?;
        let written = self
            .unit
            .file(import.file)
            .and_then(|f| f.original_line(import.line))
            .map(|line| {
                line.chars()
                    .skip(import.column)
                    .take(import.len)
                    .collect::<String>()
            })
            .unwrap_or_default();
        let col = import.column + align_column_reverse(&written, &import.text, unit_col);
        Some(FilePosition::new(import.file, import.line, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{SourceFile, TranslateOptions, translate};

    fn unit(texts: &[&str]) -> TranslatedUnit {
        let files: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| SourceFile::new(FileId::from(i), format!("tab{i}"), *t))
            .collect();
        translate(&files, &TranslateOptions::default())
    }

    #[test]
    fn test_untouched_lines_keep_columns() {
        let unit = unit(&["void setup() {\n  rect(1, 2, 3, 4);\n}"]);
        let mapper = unit.mapper();
        let (line, col) = mapper.to_unit_position(FileId::new(0), 1, 2).unwrap();
        assert_eq!(line, unit.class_offset + 1);
        assert_eq!(col, 2);
        assert_eq!(
            mapper.to_file_position(line, col),
            Some(FilePosition::new(FileId::new(0), 1, 2))
        );
    }

    #[test]
    fn test_rewritten_line_is_aligned() {
        let unit = unit(&["void setup() {\nint k = int(4.5);\n}"]);
        let mapper = unit.mapper();
        let (line, col) = mapper.to_unit_position(FileId::new(0), 1, 16).unwrap();
        let text = unit.line_text(line).unwrap();
        assert_eq!(text, "int k = PApplet.parseInt(4.5);");
        assert_eq!(text.chars().nth(col), Some(';'));
        assert_eq!(
            mapper.to_file_position(line, col),
            Some(FilePosition::new(FileId::new(0), 1, 16))
        );
    }

    #[test]
    fn test_import_line_maps_to_written_statement() {
        let unit = unit(&["void setup() {}\n  import   java.util.Map;"]);
        let mapper = unit.mapper();
        assert_eq!(unit.line_text(0), Some("import java.util.Map;"));
        // Column 8 is the `a` after `j` in the normalized statement.
        let position = mapper.to_file_position(0, 8).unwrap();
        assert_eq!(position.line, 1);
        assert_eq!(position.file, FileId::new(0));
        let written = unit.file(FileId::new(0)).unwrap().original_line(1).unwrap();
        assert_eq!(written.chars().nth(position.col), Some('a'));
        assert_eq!(position.col, 12);
    }

    #[test]
    fn test_scaffolding_is_a_miss() {
        let unit = unit(&["rect(1, 2, 3, 4);"]);
        let mapper = unit.mapper();
        assert_eq!(mapper.to_file_position(0, 0), None);
        assert_eq!(mapper.to_file_position(1, 0), None);
        assert_eq!(mapper.to_file_position(999, 0), None);
        assert_eq!(mapper.to_unit_position(FileId::new(0), 5, 0), None);
        assert_eq!(mapper.to_unit_position(FileId::new(3), 0, 0), None);
    }

    #[test]
    fn test_clamped_trailing_scaffolding() {
        let unit = unit(&["rect(1, 2, 3, 4);\nline(0, 0, 1, 1);"]);
        let mapper = unit.mapper();
        let last = unit.line_count() - 1;
        assert_eq!(
            mapper.to_file_position_clamped(last, 0),
            FilePosition::new(FileId::new(0), 1, 17)
        );
    }
}
