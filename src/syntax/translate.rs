//! Translated Unit assembly.
//!
//! All files of a sketch are joined into one compilation unit: hoisted
//! imports first, then a class wrapping every file's processed text. When
//! the sketch declares no function at all it is in bare statement mode and
//! the code additionally goes into a synthetic `setup()` body.

use std::fmt::Write as _;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;
use text_size::TextSize;

use crate::base::{FileId, LineIndex};
use crate::mapping::{FileLine, LineTable, PositionMapper};
use crate::parser::literal_and_comment_ranges;

use super::db::Preprocessor;
use super::imports::ImportStatement;
use super::source::SourceFile;
use super::sugar::RewriteLog;

static FUNCTION_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)(?:^|;)[ \t]*(?:(?:public|private|protected|final|static)[ \t]+)*(?:void|int|float|double|String|char|byte|boolean|long|short)(?:[ \t]*\[[ \t]*\])?[ \t]+[A-Za-z_$][A-Za-z0-9_$]*[ \t]*\(",
    )
    .expect("function declaration pattern is valid")
});

/// Names used for the generated scaffolding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslateOptions {
    pub class_name: SmolStr,
    pub base_class: SmolStr,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            class_name: SmolStr::new_static("Sketch"),
            base_class: SmolStr::new_static("PApplet"),
        }
    }
}

/// One source file as it appears inside a Translated Unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitFile {
    pub id: FileId,
    pub name: SmolStr,
    /// Text as the user wrote it.
    pub original: Arc<str>,
    /// Text with imports blanked and sugar expanded.
    pub processed: String,
    pub rewrites: RewriteLog,
    original_lines: LineIndex,
    processed_lines: LineIndex,
}

impl UnitFile {
    fn new(file: &SourceFile, processed: String, rewrites: RewriteLog) -> Self {
        Self {
            id: file.id,
            name: file.name.clone(),
            original_lines: LineIndex::new(&file.text),
            processed_lines: LineIndex::new(&processed),
            original: file.text.clone(),
            processed,
            rewrites,
        }
    }

    /// `count('\n') + 1`.
    pub fn line_count(&self) -> usize {
        self.processed_lines.line_count()
    }

    pub fn original_line(&self, line: usize) -> Option<&str> {
        self.original_lines.line_text(&self.original, line)
    }

    pub fn processed_line(&self, line: usize) -> Option<&str> {
        self.processed_lines.line_text(&self.processed, line)
    }
}

/// The single compilable unit built from all files of a sketch.
///
/// Rebuilt from scratch on every pass and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslatedUnit {
    pub text: String,
    /// First translated line holding user code.
    pub class_offset: usize,
    pub is_bare_mode: bool,
    pub imports: Vec<ImportStatement>,
    pub files: Vec<UnitFile>,
    pub line_table: LineTable,
    pub line_index: LineIndex,
}

impl TranslatedUnit {
    pub fn file(&self, id: FileId) -> Option<&UnitFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.line_index.line_text(&self.text, line)
    }

    /// Dotted import targets in order; the classpath cache key.
    pub fn import_names(&self) -> Vec<SmolStr> {
        self.imports.iter().map(|i| i.name.clone()).collect()
    }

    pub fn offset(&self, line: usize, col: usize) -> Option<TextSize> {
        self.line_index.offset(
            &self.text,
            crate::base::LineCol::new(line as u32, col as u32),
        )
    }

    pub fn mapper(&self) -> PositionMapper<'_> {
        PositionMapper::new(self)
    }
}

/// Builds Translated Units, memoizing per-file preprocessing across calls.
#[derive(Default)]
pub struct Translator {
    options: TranslateOptions,
    preprocessor: Preprocessor,
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self {
            options,
            preprocessor: Preprocessor::new(),
        }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    pub fn translate(&mut self, files: &[SourceFile]) -> TranslatedUnit {
        self.preprocessor.retain_files(files.len());

        let mut imports = Vec::new();
        let mut unit_files = Vec::with_capacity(files.len());
        for file in files {
            let prepared = self.preprocessor.prepare(file);
            imports.extend(prepared.imports);
            unit_files.push(UnitFile::new(file, prepared.text, prepared.rewrites));
        }

        let is_bare_mode = !declares_function(&unit_files);
        let class_offset = imports.len() + 1 + usize::from(is_bare_mode);

        let mut text = String::new();
        for import in &imports {
            text.push_str(&import.text);
            text.push('\n');
        }
        let _ = writeln!(
            text,
            "public class {} extends {} {{",
            self.options.class_name, self.options.base_class
        );
        if is_bare_mode {
            text.push_str("public void setup() {\n");
        }
        for file in &unit_files {
            text.push_str(&file.processed);
            text.push_str("\n\n");
        }
        if is_bare_mode {
            text.push_str("noLoop();\n}\n");
        }
        text.push_str("}\n");

        let line_index = LineIndex::new(&text);
        let line_table = LineTable::new(
            imports
                .iter()
                .map(|i| FileLine::new(i.file, i.line))
                .collect(),
            class_offset,
            &unit_files
                .iter()
                .map(|f| (f.id, f.line_count()))
                .collect::<Vec<_>>(),
            line_index.line_count(),
        );

        tracing::debug!(
            "[TRANSLATE] {} files, {} imports, bare mode: {}",
            unit_files.len(),
            imports.len(),
            is_bare_mode
        );

        TranslatedUnit {
            text,
            class_offset,
            is_bare_mode,
            imports,
            files: unit_files,
            line_table,
            line_index,
        }
    }
}

/// Translate without keeping the memo tables around.
pub fn translate(files: &[SourceFile], options: &TranslateOptions) -> TranslatedUnit {
    Translator::new(options.clone()).translate(files)
}

fn declares_function(files: &[UnitFile]) -> bool {
    let joined = files
        .iter()
        .map(|f| f.processed.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let masked = literal_and_comment_ranges(&joined);
    FUNCTION_DECL.find_iter(&joined).any(|found| {
        let start = TextSize::new(found.start() as u32);
        !masked.iter().any(|range| range.contains(start))
    })
}
