//! Diagnostics are reported in the tab and line the user wrote them.

use sketchcheck::hir::codes;
use sketchcheck::{AnalysisConfig, FileId, Severity};

use crate::helpers::library_fixtures::write_library;
use crate::helpers::sketch_helpers::{analyze, analyze_with, codes};

// =============================================================================
// SYNTAX
// =============================================================================

#[test]
fn test_syntax_error_in_third_tab_is_reported_there() {
    let analysis = analyze(&[
        "void setup() {\n  size(100, 100);\n}\n",
        "void draw() {\n  background(0);\n}\n",
        "void helper() {\n  int y = 3\n}\n",
    ]);
    let diagnostics = analysis.diagnostics();
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(|d| d.code.as_ref() == codes::SYNTAX_ERROR));
    let first = &diagnostics[0];
    assert_eq!(first.file, FileId::new(2));
    assert!((1..=2).contains(&first.line), "line {}", first.line);
    assert_eq!(first.severity, Severity::Error);
}

#[test]
fn test_block_comments_are_not_syntax_errors() {
    let analysis = analyze(&[
        "/* header comment */\nvoid setup() {\n  /* inline */ size(100, 100);\n}\n",
        "/**\n * Helper.\n **/\nvoid helper() {\n  nope();\n}\n",
    ]);
    // The semantic phase still runs and finds the real problem.
    assert_eq!(codes(analysis.diagnostics()), vec![codes::UNDEFINED_METHOD]);
    let diagnostic = &analysis.diagnostics()[0];
    assert_eq!((diagnostic.file, diagnostic.line, diagnostic.col), (FileId::new(1), 4, 2));
}

#[test]
fn test_curly_quotes_are_reported_where_typed() {
    let analysis = analyze(&[
        "void setup() {\n  size(100, 100);\n}\n",
        "void draw() {\n  text(\u{201C}score\u{201D}, 10, 10);\n  // \u{2018}fine\u{2019}\n}\n",
    ]);
    let diagnostics = analysis.diagnostics();
    assert_eq!(codes(diagnostics), vec![codes::CURLY_QUOTE, codes::CURLY_QUOTE]);
    let positions: Vec<(FileId, usize, usize)> =
        diagnostics.iter().map(|d| (d.file, d.line, d.col)).collect();
    assert_eq!(positions, vec![(FileId::new(1), 1, 7), (FileId::new(1), 1, 13)]);
}

#[test]
fn test_unclosed_brace_is_reported_in_its_own_tab() {
    let analysis = analyze(&[
        "void setup() {\n  size(100, 100);\n",
        "void draw() {\n  background(0);\n}\n",
    ]);
    let diagnostics = analysis.diagnostics();
    assert_eq!(codes(diagnostics), vec![codes::MISSING_RIGHT_BRACE]);
    assert_eq!((diagnostics[0].file, diagnostics[0].line, diagnostics[0].col), (FileId::new(0), 1, 16));
}

#[test]
fn test_extra_closing_brace_is_reported_where_it_is() {
    let analysis = analyze(&["void setup() {\n  size(100, 100);\n}\n}\n"]);
    let diagnostics = analysis.diagnostics();
    assert_eq!(codes(diagnostics), vec![codes::MISSING_LEFT_BRACE]);
    assert_eq!((diagnostics[0].line, diagnostics[0].col), (3, 0));
}

#[test]
fn test_syntax_error_blocks_semantic_errors() {
    let analysis = analyze(&["void setup() {\n  undefinedCall();\n  int x = ;\n}\n"]);
    assert!(
        codes(analysis.diagnostics())
            .iter()
            .all(|c| *c == codes::SYNTAX_ERROR)
    );
}

// =============================================================================
// SEMANTIC
// =============================================================================

#[test]
fn test_clean_multi_tab_sketch() {
    let analysis = analyze(&[
        "ArrayList<Ball> balls = new ArrayList<Ball>();\n\
         \n\
         void setup() {\n\
         \x20 size(400, 400);\n\
         \x20 for (int i = 0; i < 10; i++) {\n\
         \x20   balls.add(new Ball(random(width), random(height)));\n\
         \x20 }\n\
         }\n\
         \n\
         void draw() {\n\
         \x20 background(255);\n\
         \x20 for (Ball b : balls) {\n\
         \x20   b.update();\n\
         \x20   b.display();\n\
         \x20 }\n\
         }\n",
        "class Ball {\n\
         \x20 PVector pos;\n\
         \x20 color c = #FF8800;\n\
         \n\
         \x20 Ball(float x, float y) {\n\
         \x20   pos = new PVector(x, y);\n\
         \x20 }\n\
         \n\
         \x20 void update() {\n\
         \x20   pos.x += int(1.5);\n\
         \x20 }\n\
         \n\
         \x20 void display() {\n\
         \x20   fill(c);\n\
         \x20   ellipse(pos.x, pos.y, 10, 10);\n\
         \x20 }\n\
         }\n",
    ]);
    assert!(
        analysis.diagnostics().is_empty(),
        "{:#?}",
        analysis.diagnostics()
    );
}

#[test]
fn test_undefined_method_in_second_tab() {
    let analysis = analyze(&[
        "void setup() {\n  helper();\n}\n",
        "void helper() {\n  undefinedThing(3);\n}\n",
    ]);
    let diagnostics = analysis.diagnostics();
    assert_eq!(codes(diagnostics), vec![codes::UNDEFINED_METHOD]);
    let d = &diagnostics[0];
    assert_eq!((d.file, d.line, d.col, d.len), (FileId::new(1), 1, 2, 14));
    assert!(d.message.contains("undefinedThing"));
}

#[test]
fn test_unresolved_names() {
    let analysis = analyze(&["void setup() {\n  Widget w = null;\n  println(missing);\n}\n"]);
    let diagnostics = analysis.diagnostics();
    assert_eq!(
        codes(diagnostics),
        vec![codes::UNRESOLVED_TYPE, codes::UNRESOLVED_VARIABLE]
    );
    assert_eq!((diagnostics[0].line, diagnostics[0].col), (1, 2));
    assert_eq!((diagnostics[1].line, diagnostics[1].col), (2, 10));
}

#[test]
fn test_missing_member_of_sketch_class() {
    let analysis = analyze(&[
        "Ball b = new Ball();\nvoid draw() {\n  b.bounce();\n}\n",
        "class Ball {\n  void move() {}\n}\n",
    ]);
    let diagnostics = analysis.diagnostics();
    assert_eq!(codes(diagnostics), vec![codes::UNDEFINED_MEMBER]);
    assert_eq!(
        (diagnostics[0].file, diagnostics[0].line, diagnostics[0].col),
        (FileId::new(0), 2, 4)
    );
}

#[test]
fn test_sugar_lines_report_original_columns() {
    let analysis = analyze(&["void setup() {\n  color c = int(2.5) + nope;\n}\n"]);
    let diagnostics = analysis.diagnostics();
    assert_eq!(codes(diagnostics), vec![codes::UNRESOLVED_VARIABLE]);
    // `nope` starts at column 23 of the line as written.
    assert_eq!((diagnostics[0].line, diagnostics[0].col), (1, 23));
}

#[test]
fn test_semantic_checks_can_be_disabled() {
    let config = AnalysisConfig::default().with_semantic_checks(false);
    let analysis = analyze_with(&config, &["void setup() {\n  nothing();\n}\n"]);
    assert!(analysis.diagnostics().is_empty());
}

// =============================================================================
// CLASSPATH
// =============================================================================

#[test]
fn test_missing_library_is_a_warning_on_the_import() {
    let analysis = analyze(&[
        "void setup() {}\n",
        "// geometry\n  import toxi.geom.*;\nVec3D v;\n",
    ]);
    let diagnostics = analysis.diagnostics();
    assert_eq!(codes(diagnostics), vec![codes::LIBRARY_NOT_FOUND]);
    let warning = &diagnostics[0];
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!((warning.file, warning.line, warning.col), (FileId::new(1), 1, 2));
    assert_eq!(warning.message.as_ref(), "No library found for toxi.geom");
}

#[test]
fn test_unresolved_type_suggests_library_import() {
    let root = tempfile::tempdir().unwrap();
    write_library(root.path(), "toxiclibs", &["toxi/geom/Vec3D", "toxi/geom/Line3D"]);
    let config = AnalysisConfig::default().with_library_root(root.path());

    let analysis = analyze_with(&config, &["Vec3D v;\nvoid setup() {}\n"]);
    let diagnostics = analysis.diagnostics();
    assert_eq!(codes(diagnostics), vec![codes::UNRESOLVED_TYPE]);
    assert_eq!(diagnostics[0].message.as_ref(), "Vec3D cannot be resolved to a type");
    assert_eq!(diagnostics[0].import_suggestions, vec!["toxi.geom.Vec3D"]);
}
