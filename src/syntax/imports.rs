//! Import scraping.
//!
//! Import declarations are lifted out of each file before translation and
//! replaced by the same number of spaces, so every other offset in the
//! file stays where it was.

use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;
use text_size::TextSize;

use crate::base::{FileId, LineIndex};
use crate::parser::literal_and_comment_ranges;

static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"import[ \t]+(static[ \t]+)?([A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*(?:\.\*)?)[ \t]*;",
    )
    .expect("import pattern is valid")
});

/// One import declaration lifted out of a source file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportStatement {
    /// Normalized declaration, e.g. `import java.util.ArrayList;`.
    pub text: SmolStr,
    /// Dotted target, e.g. `java.util.ArrayList` or `processing.video.*`.
    pub name: SmolStr,
    pub is_static: bool,
    pub file: FileId,
    /// 0-based line of the declaration in its file.
    pub line: usize,
    /// 0-based character column of the declaration in its file.
    pub column: usize,
    /// Number of characters blanked out.
    pub len: usize,
}

impl ImportStatement {
    pub fn is_wildcard(&self) -> bool {
        self.name.ends_with(".*")
    }

    /// The class the import names (`a.b.C` for `import static a.b.C.m;`),
    /// or `None` for a package wildcard.
    pub fn type_name(&self) -> Option<&str> {
        match (self.is_static, self.is_wildcard()) {
            (false, true) => None,
            (false, false) => Some(&self.name),
            (true, true) => self.name.strip_suffix(".*"),
            (true, false) => self.name.rsplit_once('.').map(|(class, _)| class),
        }
    }

    /// Simple name brought into scope by a single-type import.
    pub fn simple_name(&self) -> Option<&str> {
        if self.is_static || self.is_wildcard() {
            return None;
        }
        Some(self.name.rsplit_once('.').map_or(&*self.name, |(_, n)| n))
    }

    /// Package the import draws from.
    pub fn package(&self) -> &str {
        if !self.is_static && self.is_wildcard() {
            return self.name.strip_suffix(".*").unwrap_or(&self.name);
        }
        let class = self.type_name().unwrap_or(&self.name);
        class.rsplit_once('.').map_or("", |(package, _)| package)
    }
}

/// A file with its imports blanked out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedImports {
    pub text: String,
    pub imports: Vec<ImportStatement>,
}

/// Lift every import declaration out of `text`.
///
/// A declaration counts only when it starts a line or follows a `;`, and
/// is not inside a comment or string literal. Malformed declarations are
/// left in place so the parser reports them.
pub fn extract_imports(file: FileId, text: &str) -> ExtractedImports {
    let masked = literal_and_comment_ranges(text);
    let index = LineIndex::new(text);
    let mut out = String::with_capacity(text.len());
    let mut imports = Vec::new();
    let mut copied = 0usize;

    for captures in IMPORT.captures_iter(text) {
        let Some(found) = captures.get(0) else {
            continue;
        };
        let start = TextSize::new(found.start() as u32);
        if masked.iter().any(|range| range.contains(start)) {
            continue;
        }
        let line_start = text[..found.start()].rfind('\n').map_or(0, |at| at + 1);
        let before = text[line_start..found.start()].trim_end_matches([' ', '\t']);
        if !(before.is_empty() || before.ends_with(';')) {
            continue;
        }

        let is_static = captures.get(1).is_some();
        let name = SmolStr::new(captures.get(2).map_or("", |m| m.as_str()));
        let position = index.line_col(text, start);
        let statement = if is_static {
            format!("import static {name};")
        } else {
            format!("import {name};")
        };
        tracing::trace!("[IMPORT] {file} line {}: {statement}", position.line);
        imports.push(ImportStatement {
            text: SmolStr::new(statement),
            name,
            is_static,
            file,
            line: position.line as usize,
            column: position.col as usize,
            len: found.len(),
        });

        out.push_str(&text[copied..found.start()]);
        out.extend(std::iter::repeat_n(' ', found.len()));
        copied = found.end();
    }
    out.push_str(&text[copied..]);

    ExtractedImports { text: out, imports }
}
