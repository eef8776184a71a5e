//! Translated Unit construction across tabs.

use sketchcheck::FileId;
use sketchcheck::syntax::{TranslateOptions, Translator, translate};

use crate::helpers::sketch_helpers::sources;

// =============================================================================
// SCAFFOLDING
// =============================================================================

#[test]
fn test_statement_only_sketch_is_wrapped_in_setup() {
    let unit = translate(&sources(&["foo(1,2)\n"]), &TranslateOptions::default());
    assert!(unit.is_bare_mode);
    // `public class Sketch extends PApplet {` + `public void setup() {`
    assert_eq!(unit.class_offset, 2);
    assert_eq!(unit.line_text(2), Some("foo(1,2)"));
    assert!(unit.text.contains("noLoop();"));
}

#[test]
fn test_function_anywhere_disables_bare_mode() {
    let unit = translate(
        &sources(&["size(100, 100);\n", "void helper() {\n}\n"]),
        &TranslateOptions::default(),
    );
    assert!(!unit.is_bare_mode);
    assert_eq!(unit.class_offset, 1);
}

#[test]
fn test_function_inside_comment_keeps_bare_mode() {
    let unit = translate(
        &sources(&["// void setup() {\nellipse(1, 2, 3, 4);\n"]),
        &TranslateOptions::default(),
    );
    assert!(unit.is_bare_mode);
}

#[test]
fn test_function_inside_block_comment_keeps_bare_mode() {
    let unit = translate(
        &sources(&["/*\nvoid draw() {\n*/\nellipse(1, 2, 3, 4);\n"]),
        &TranslateOptions::default(),
    );
    assert!(unit.is_bare_mode);
}

#[test]
fn test_block_commented_code_is_left_alone() {
    let text = "/*\nimport a.b.C;\ncolor c = #FF0000;\n*/\nvoid setup() {}\n";
    let unit = translate(&sources(&[text]), &TranslateOptions::default());
    assert!(unit.imports.is_empty());
    let tab = unit.file(FileId::new(0)).unwrap();
    assert_eq!(tab.processed, text);
    assert!(tab.rewrites.is_empty());
}

// =============================================================================
// IMPORTS
// =============================================================================

#[test]
fn test_import_in_second_tab_is_hoisted_and_blanked() {
    let unit = translate(
        &sources(&[
            "void setup() {\n}\n",
            "// tab two\n\n\nimport a.b.C;\nvoid helper() {}\n",
        ]),
        &TranslateOptions::default(),
    );
    assert_eq!(unit.imports.len(), 1);
    let import = &unit.imports[0];
    assert_eq!(import.text, "import a.b.C;");
    assert_eq!((import.file, import.line), (FileId::new(1), 3));

    let tab = unit.file(FileId::new(1)).unwrap();
    assert_eq!(tab.processed_line(3), Some(" ".repeat(13).as_str()));
    assert_eq!(unit.line_text(0), Some("import a.b.C;"));
    assert_eq!(unit.class_offset, 2);
}

#[test]
fn test_imports_keep_tab_order() {
    let unit = translate(
        &sources(&[
            "import java.util.Map;\nvoid setup() {}\n",
            "import toxi.geom.*;\n",
        ]),
        &TranslateOptions::default(),
    );
    assert_eq!(
        unit.import_names(),
        vec!["java.util.Map".to_string(), "toxi.geom.*".to_string()]
    );
}

// =============================================================================
// IDEMPOTENCE
// =============================================================================

#[test]
fn test_translator_reuses_work_without_changing_output() {
    let mut translator = Translator::new(TranslateOptions::default());
    let first = sources(&[
        "import java.util.List;\ncolor c = #FF0000;\nvoid setup() {}\n",
        "int k = int(4.5);\n",
    ]);
    let edited = sources(&[
        "import java.util.List;\ncolor c = #00FF00;\nvoid setup() {}\n",
        "int k = int(4.5);\n",
    ]);

    let a = translator.translate(&first);
    let b = translator.translate(&first);
    assert_eq!(a, b);

    let changed = translator.translate(&edited);
    assert_ne!(a.text, changed.text);
    assert_eq!(translator.translate(&first), a);
    assert_eq!(a, translate(&first, &TranslateOptions::default()));
}
