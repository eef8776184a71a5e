//! Byte offset to line/column conversion.

use text_size::{TextRange, TextSize};

/// A 0-indexed line and character column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Line start table for one text.
///
/// Columns count `char`s so that they line up with what an editor shows,
/// even when a line holds non-ASCII text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of each line start. Always holds at least one entry.
    starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![TextSize::new(0)];
        starts.extend(
            text.match_indices('\n')
                .map(|(at, _)| TextSize::new(at as u32 + 1)),
        );
        Self {
            starts,
            len: TextSize::of(text),
        }
    }

    /// Number of lines; a trailing newline opens one more (empty) line.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Byte range of `line`, excluding its line break.
    pub fn line_range(&self, text: &str, line: usize) -> Option<TextRange> {
        let start = *self.starts.get(line)?;
        let end = match self.starts.get(line + 1) {
            Some(next) => *next - TextSize::new(1),
            None => self.len,
        };
        let mut range = TextRange::new(start, end);
        if text[range].ends_with('\r') {
            range = TextRange::new(start, end - TextSize::new(1));
        }
        Some(range)
    }

    /// Text of `line` without its line break.
    pub fn line_text<'a>(&self, text: &'a str, line: usize) -> Option<&'a str> {
        self.line_range(text, line).map(|range| &text[range])
    }

    /// Convert a byte offset into a line and character column.
    pub fn line_col(&self, text: &str, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self.starts.partition_point(|start| *start <= offset) - 1;
        let start = self.starts[line];
        let col = text[TextRange::new(start, offset)].chars().count();
        LineCol::new(line as u32, col as u32)
    }

    /// Convert a line and character column back into a byte offset.
    ///
    /// A column past the end of the line clamps to the line end; a line
    /// past the end of the text is a miss.
    pub fn offset(&self, text: &str, pos: LineCol) -> Option<TextSize> {
        let range = self.line_range(text, pos.line as usize)?;
        let line = &text[range];
        let byte = line
            .char_indices()
            .nth(pos.col as usize)
            .map(|(at, _)| at)
            .unwrap_or(line.len());
        Some(range.start() + TextSize::new(byte as u32))
    }
}
