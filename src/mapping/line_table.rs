//! Line-level mapping.

use crate::base::FileId;

/// A 0-based line within one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileLine {
    pub file: FileId,
    pub line: usize,
}

impl FileLine {
    pub fn new(file: FileId, line: usize) -> Self {
        Self { file, line }
    }
}

/// What a translated-unit line holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitRegion {
    /// The n-th hoisted import.
    Import(usize),
    /// Class and `setup()` header lines.
    Header,
    /// A line of user code.
    File(FileLine),
    /// The blank line after a file.
    Separator(FileId),
    /// Closing scaffolding after the last file.
    Footer,
    OutOfRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct FileBlock {
    file: FileId,
    start: usize,
    lines: usize,
}

/// Per-file line counts and starting lines of a translated unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineTable {
    imports: Vec<FileLine>,
    class_offset: usize,
    blocks: Vec<FileBlock>,
    total_lines: usize,
}

impl LineTable {
    /// `files` holds each file's line count in unit order. Every file is
    /// followed by one blank separator line.
    pub fn new(
        imports: Vec<FileLine>,
        class_offset: usize,
        files: &[(FileId, usize)],
        total_lines: usize,
    ) -> Self {
        let mut start = class_offset;
        let blocks = files
            .iter()
            .map(|&(file, lines)| {
                let block = FileBlock { file, start, lines };
                start += lines + 1;
                block
            })
            .collect();
        Self {
            imports,
            class_offset,
            blocks,
            total_lines,
        }
    }

    pub fn class_offset(&self) -> usize {
        self.class_offset
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Translated line at which `file` starts.
    pub fn file_start(&self, file: FileId) -> Option<usize> {
        self.block(file).map(|b| b.start)
    }

    pub fn file_line_count(&self, file: FileId) -> Option<usize> {
        self.block(file).map(|b| b.lines)
    }

    fn block(&self, file: FileId) -> Option<&FileBlock> {
        self.blocks.iter().find(|b| b.file == file)
    }

    /// Classify a translated line.
    pub fn region(&self, translated: usize) -> UnitRegion {
        if translated >= self.total_lines {
            return UnitRegion::OutOfRange;
        }
        if translated < self.imports.len() {
            return UnitRegion::Import(translated);
        }
        if translated < self.class_offset {
            return UnitRegion::Header;
        }
        let index = self.blocks.partition_point(|b| b.start <= translated);
        let Some(block) = index.checked_sub(1).and_then(|i| self.blocks.get(i)) else {
            return UnitRegion::Header;
        };
        let relative = translated - block.start;
        if relative < block.lines {
            UnitRegion::File(FileLine::new(block.file, relative))
        } else if relative == block.lines {
            UnitRegion::Separator(block.file)
        } else {
            UnitRegion::Footer
        }
    }

    /// Map a translated line back to its file line.
    ///
    /// Import lines resolve to where the import was written. Scaffolding
    /// and separator lines have no file line.
    pub fn to_file_line(&self, translated: usize) -> Option<FileLine> {
        match self.region(translated) {
            UnitRegion::Import(i) => self.imports.get(i).copied(),
            UnitRegion::File(line) => Some(line),
            _ => None,
        }
    }

    /// Like [`to_file_line`](Self::to_file_line) but never misses: a
    /// separator clamps to the last line of the file before it, header
    /// lines to the first line of the first file and everything past the
    /// user code to the last line of the last file.
    pub fn to_file_line_clamped(&self, translated: usize) -> FileLine {
        let last_line_of = |block: &FileBlock| FileLine::new(block.file, block.lines.saturating_sub(1));
        match self.region(translated) {
            UnitRegion::Import(i) => self.imports[i],
            UnitRegion::File(line) => line,
            UnitRegion::Separator(file) => self
                .block(file)
                .map(last_line_of)
                .unwrap_or(FileLine::new(file, 0)),
            UnitRegion::Header => self
                .blocks
                .first()
                .map(|b| FileLine::new(b.file, 0))
                .unwrap_or_else(first_line),
            UnitRegion::Footer | UnitRegion::OutOfRange => self
                .blocks
                .last()
                .map(last_line_of)
                .unwrap_or_else(first_line),
        }
    }

    /// Map a file line to its translated line.
    pub fn to_translated_line(&self, file: FileId, line: usize) -> Option<usize> {
        let block = self.block(file)?;
        (line < block.lines).then(|| block.start + line)
    }
}

fn first_line() -> FileLine {
    FileLine::new(FileId::new(0), 0)
}
