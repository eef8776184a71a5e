//! Checks over the text of each tab as the user wrote it.
//!
//! Both checks run before parser errors are reported: a curly quote or an
//! unbalanced brace breaks the parse in ways whose parser messages point
//! far away from the actual mistake. String literals and comments are
//! skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use text_size::TextSize;

use crate::base::LineIndex;
use crate::mapping::FilePosition;
use crate::parser::literal_and_comment_ranges;
use crate::syntax::{TranslatedUnit, UnitFile};

use super::diagnostics::{Diagnostic, codes};

static CURLY_QUOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("[\u{201C}\u{201D}\u{2018}\u{2019}]").expect("curly quote pattern is valid")
});

/// Curly quotes first; brace balance is only checked when there are none.
pub fn check_sources(unit: &TranslatedUnit) -> Vec<Diagnostic> {
    let quotes = curly_quotes(unit);
    if !quotes.is_empty() {
        tracing::debug!("[CHECK] {} curly quotes", quotes.len());
        return quotes;
    }
    let braces = missing_braces(unit);
    if !braces.is_empty() {
        tracing::debug!("[CHECK] unbalanced braces in {} tabs", braces.len());
    }
    braces
}

/// One error per typographic quote outside literals and comments.
pub fn curly_quotes(unit: &TranslatedUnit) -> Vec<Diagnostic> {
    let mut found = Vec::new();
    for file in &unit.files {
        let text = file.original.as_ref();
        if !CURLY_QUOTE.is_match(text) {
            continue;
        }
        let masked = literal_and_comment_ranges(text);
        let index = LineIndex::new(text);
        for quote in CURLY_QUOTE.find_iter(text) {
            let start = TextSize::new(quote.start() as u32);
            if masked.iter().any(|range| range.contains(start)) {
                continue;
            }
            let straight = if matches!(quote.as_str(), "\u{2018}" | "\u{2019}") {
                '\''
            } else {
                '"'
            };
            let message = format!(
                "Curly quotes like {} do not work, use straight quotes like {straight}",
                quote.as_str()
            );
            found.push(at(unit, file, &index, start, codes::CURLY_QUOTE, message));
        }
    }
    found
}

/// At most one error per tab: the first `}` with nothing to close, or else
/// the end of a tab that leaves a `{` open.
pub fn missing_braces(unit: &TranslatedUnit) -> Vec<Diagnostic> {
    unit.files
        .iter()
        .filter_map(|file| {
            let text = file.original.as_ref();
            let (code, offset, message) = match brace_balance(text)? {
                Unbalanced::MissingOpen(offset) => (
                    codes::MISSING_LEFT_BRACE,
                    offset,
                    "Found one too many } characters without a { to match it",
                ),
                Unbalanced::MissingClose(offset) => (
                    codes::MISSING_RIGHT_BRACE,
                    offset,
                    "Found one too many { characters without a } to match it",
                ),
            };
            let index = LineIndex::new(text);
            Some(at(unit, file, &index, offset, code, message.to_string()))
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Unbalanced {
    /// The `}` at this offset closes nothing.
    MissingOpen(TextSize),
    /// A `{` is still open; the offset is the last character of code.
    MissingClose(TextSize),
}

fn brace_balance(text: &str) -> Option<Unbalanced> {
    let masked = literal_and_comment_ranges(text);
    let mut masked = masked.iter().peekable();
    let mut depth = 0usize;
    let mut last_code = None;
    for (offset, ch) in text.char_indices() {
        let offset = TextSize::new(offset as u32);
        while masked.next_if(|range| range.end() <= offset).is_some() {}
        if masked.peek().is_some_and(|range| range.contains(offset)) {
            continue;
        }
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(Unbalanced::MissingOpen(offset)),
            '}' => depth -= 1,
            _ => {}
        }
        if !ch.is_whitespace() {
            last_code = Some(offset);
        }
    }
    if depth > 0 {
        last_code.map(Unbalanced::MissingClose)
    } else {
        None
    }
}

fn at(
    unit: &TranslatedUnit,
    file: &UnitFile,
    index: &LineIndex,
    offset: TextSize,
    code: &str,
    message: String,
) -> Diagnostic {
    let text = file.original.as_ref();
    let position = index.line_col(text, offset);
    let (line, col) = (position.line as usize, position.col as usize);
    let (unit_line, unit_col) = unit
        .mapper()
        .to_unit_position(file.id, line, col)
        .unwrap_or_default();
    Diagnostic::error(code, unit_line, unit_col, message)
        .with_len(1)
        .with_file_position(FilePosition::new(file.id, line, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;
    use crate::syntax::{SourceFile, TranslateOptions, translate};

    fn unit(sources: &[&str]) -> TranslatedUnit {
        let files: Vec<SourceFile> = sources
            .iter()
            .enumerate()
            .map(|(i, text)| SourceFile::new(FileId::new(i as u32), format!("tab{i}"), *text))
            .collect();
        translate(&files, &TranslateOptions::default())
    }

    #[test]
    fn test_curly_quotes_outside_literals() {
        let unit = unit(&[
            "void setup() {\n  println(\u{201C}hi\u{201D});\n  String s = \"it\u{2019}s\"; // \u{2018}ok\u{2019}\n}\n",
        ]);
        let found = curly_quotes(&unit);
        let positions: Vec<(usize, usize)> = found.iter().map(|d| (d.line, d.col)).collect();
        assert_eq!(positions, vec![(1, 10), (1, 13)]);
        assert!(found.iter().all(|d| d.code.as_ref() == codes::CURLY_QUOTE && d.len == 1));
        assert!(found[0].message.contains('"'));
    }

    #[test]
    fn test_brace_balance() {
        assert_eq!(brace_balance("void a() {\n  if (x) { }\n}\n"), None);
        assert_eq!(brace_balance("\"{\" /* { */ // {\n'{'"), None);
        assert_eq!(
            brace_balance("void a() {\n}\n}\n"),
            Some(Unbalanced::MissingOpen(TextSize::new(13)))
        );
        assert_eq!(
            brace_balance("void a() {\n  x();\n"),
            Some(Unbalanced::MissingClose(TextSize::new(16)))
        );
    }

    #[test]
    fn test_missing_braces_are_checked_per_tab() {
        // The extra } in tab 1 would balance tab 0 if the tabs were joined.
        let unit = unit(&["void setup() {\n  size(100, 100);\n", "void draw() {\n}\n}\n"]);
        let found = missing_braces(&unit);
        let reported: Vec<(&str, FileId, usize, usize)> = found
            .iter()
            .map(|d| (d.code.as_ref(), d.file, d.line, d.col))
            .collect();
        assert_eq!(
            reported,
            vec![
                (codes::MISSING_RIGHT_BRACE, FileId::new(0), 1, 16),
                (codes::MISSING_LEFT_BRACE, FileId::new(1), 2, 0),
            ]
        );
    }

    #[test]
    fn test_curly_quotes_hide_brace_problems() {
        let unit = unit(&["void setup() {\n  println(\u{2018}a\u{2019});\n"]);
        let found = check_sources(&unit);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|d| d.code.as_ref() == codes::CURLY_QUOTE));
    }
}
