//! Find-declaration and find-all-occurrences across tabs.

use sketchcheck::hir::{DeclKind, ExternalMember};
use sketchcheck::{Analysis, FileId, Resolution};

use crate::helpers::sketch_helpers::analyze;

const MAIN: &str = "Ball b;\n\
\n\
void setup() {\n\
\x20 b = new Ball(10);\n\
\x20 b.move();\n\
}\n\
\n\
void draw() {\n\
\x20 b.move();\n\
\x20 b.display();\n\
}\n";

const CLASSES: &str = "class Thing {\n\
\x20 float x;\n\
\x20 void move() {\n\
\x20   x += 1;\n\
\x20 }\n\
}\n\
\n\
class Ball extends Thing {\n\
\x20 float r;\n\
\x20 Ball(float r) {\n\
\x20   this.r = r;\n\
\x20 }\n\
\x20 void display() {\n\
\x20   ellipse(x, 0, r, r);\n\
\x20 }\n\
}\n";

fn sketch() -> Analysis {
    analyze(&[MAIN, CLASSES])
}

fn positions(analysis: &Analysis, resolution: &Resolution) -> Vec<(usize, usize, usize, bool)> {
    let decl = resolution.as_local().expect("local declaration");
    analysis
        .find_all_occurrences(decl)
        .into_iter()
        .map(|o| (o.file.index(), o.line, o.col, o.is_declaration))
        .collect()
}

// =============================================================================
// FIND DECLARATION
// =============================================================================

#[test]
fn test_inherited_method_resolves_to_superclass() {
    let analysis = sketch();
    let resolution = analysis.find_declaration(FileId::new(0), 4, 4, "move");
    let decl = resolution.as_local().expect("move resolves locally");
    assert_eq!(decl.kind, DeclKind::Method);

    let position = analysis.declaration_position(decl).unwrap();
    assert_eq!((position.file, position.line, position.col), (FileId::new(1), 2, 7));
    assert!(position.is_declaration);
}

#[test]
fn test_caret_at_end_of_name_still_resolves() {
    let analysis = sketch();
    let at_start = analysis.find_declaration(FileId::new(0), 9, 4, "display");
    let at_end = analysis.find_declaration(FileId::new(0), 9, 11, "display");
    assert!(at_start.is_resolved());
    assert_eq!(at_start, at_end);
}

#[test]
fn test_inherited_field_used_in_subclass() {
    let analysis = sketch();
    let resolution = analysis.find_declaration(FileId::new(1), 13, 12, "x");
    let decl = resolution.as_local().unwrap();
    assert_eq!(decl.kind, DeclKind::Field);
    let position = analysis.declaration_position(decl).unwrap();
    assert_eq!((position.file, position.line, position.col), (FileId::new(1), 1, 8));
}

#[test]
fn test_parameter_shadows_field() {
    let analysis = sketch();
    // `this.r = r;` - the right-hand `r` is the constructor parameter.
    let resolution = analysis.find_declaration(FileId::new(1), 10, 13, "r");
    assert_eq!(resolution.as_local().unwrap().kind, DeclKind::Parameter);
    // `this.r` names the field.
    let field = analysis.find_declaration(FileId::new(1), 10, 9, "r");
    assert_eq!(field.as_local().unwrap().kind, DeclKind::Field);
}

#[test]
fn test_local_shadows_global() {
    let analysis = analyze(&["int x = 1;\nvoid setup() {\n  int x = 2;\n  println(x);\n}\n"]);
    let resolution = analysis.find_declaration(FileId::new(0), 3, 10, "x");
    let decl = resolution.as_local().unwrap();
    assert_eq!(decl.kind, DeclKind::Local);
    let position = analysis.declaration_position(decl).unwrap();
    assert_eq!((position.line, position.col), (2, 6));
}

#[test]
fn test_predefined_method_resolves_externally() {
    let analysis = sketch();
    match analysis.find_declaration(FileId::new(1), 13, 4, "ellipse") {
        Resolution::External(ExternalMember::Method { class, name, .. }) => {
            assert_eq!(class, "processing.core.PApplet");
            assert_eq!(name, "ellipse");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_positions_without_a_name_are_unresolved() {
    let analysis = analyze(&["// move\nvoid setup() {}\n"]);
    assert_eq!(
        analysis.find_declaration(FileId::new(0), 0, 4, "move"),
        Resolution::Unresolved
    );
    assert_eq!(
        analysis.find_declaration(FileId::new(3), 0, 0, "setup"),
        Resolution::Unresolved
    );
}

// =============================================================================
// FIND ALL OCCURRENCES
// =============================================================================

#[test]
fn test_method_occurrences_span_tabs() {
    let analysis = sketch();
    let resolution = analysis.find_declaration(FileId::new(0), 8, 4, "move");
    assert_eq!(
        positions(&analysis, &resolution),
        vec![(0, 4, 4, false), (0, 8, 4, false), (1, 2, 7, true)]
    );
}

#[test]
fn test_class_occurrences_include_constructors() {
    let analysis = sketch();
    let resolution = analysis.find_declaration(FileId::new(1), 7, 6, "Ball");
    assert_eq!(resolution.as_local().unwrap().kind, DeclKind::Type);
    assert_eq!(
        positions(&analysis, &resolution),
        vec![
            (0, 0, 0, false),
            (0, 3, 10, false),
            (1, 7, 6, true),
            (1, 9, 2, true),
        ]
    );
}

#[test]
fn test_occurrence_lengths_are_name_lengths() {
    let analysis = sketch();
    let resolution = analysis.find_declaration(FileId::new(0), 9, 4, "display");
    let decl = resolution.as_local().unwrap();
    let found = analysis.find_all_occurrences(decl);
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|o| o.len == "display".len()));
}
