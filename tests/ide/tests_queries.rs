//! Queries against one published snapshot.

use sketchcheck::hir::{DeclKind, codes};
use sketchcheck::{FileId, Resolution};

use crate::helpers::sketch_helpers::analyze;

#[test]
fn test_snapshot_carries_unit_and_generation() {
    let analysis = analyze(&["void setup() {}\n", "class A {}\n"]);
    assert_eq!(analysis.generation(), 1);
    let unit = analysis.unit().unwrap();
    assert_eq!(unit.files.len(), 2);
    assert!(!unit.is_bare_mode);
}

#[test]
fn test_diagnostics_for_one_tab() {
    let analysis = analyze(&[
        "void setup() {\n  first();\n}\n",
        "void helper() {\n  second();\n  third();\n}\n",
    ]);
    assert_eq!(analysis.diagnostics().len(), 3);
    let second_tab = analysis.diagnostics_for(FileId::new(1));
    assert_eq!(second_tab.len(), 2);
    assert!(
        second_tab
            .iter()
            .all(|d| d.code.as_ref() == codes::UNDEFINED_METHOD)
    );
    assert!(analysis.diagnostics_for(FileId::new(2)).is_empty());
}

#[test]
fn test_occurrences_on_rewritten_lines_use_original_columns() {
    let analysis = analyze(&["color c = #FF0000;\nvoid setup() {\n  fill(c);\n  color d = c;\n}\n"]);
    let resolution = analysis.find_declaration(FileId::new(0), 2, 7, "c");
    let decl = resolution.as_local().unwrap();
    assert_eq!(decl.kind, DeclKind::Field);

    let found: Vec<(usize, usize, bool)> = analysis
        .find_all_occurrences(decl)
        .iter()
        .map(|o| (o.line, o.col, o.is_declaration))
        .collect();
    assert_eq!(found, vec![(0, 6, true), (2, 7, false), (3, 12, false)]);
}

#[test]
fn test_bare_sketch_queries() {
    let analysis = analyze(&["int n = 3;\nprintln(n);\n"]);
    assert!(analysis.unit().unwrap().is_bare_mode);
    assert!(analysis.diagnostics().is_empty(), "{:?}", analysis.diagnostics());

    let resolution = analysis.find_declaration(FileId::new(0), 1, 8, "n");
    let decl = resolution.as_local().unwrap();
    assert_eq!(decl.kind, DeclKind::Local);
    assert_eq!(analysis.find_all_occurrences(decl).len(), 2);
}

#[test]
fn test_scaffolding_names_are_not_reachable() {
    let analysis = analyze(&["int n = 3;\nprintln(n);\n"]);
    // `setup` only exists in generated scaffolding.
    assert_eq!(
        analysis.find_declaration(FileId::new(0), 0, 0, "setup"),
        Resolution::Unresolved
    );
}
