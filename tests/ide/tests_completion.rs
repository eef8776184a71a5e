//! Completion at a caret.

use sketchcheck::{Analysis, CompletionCandidate, CompletionKind, FileId};

use crate::helpers::sketch_helpers::analyze;

const MAIN: &str = "PVector pos = new PVector(1, 2);\n\
float speed = 2;\n\
Ball b = new Ball();\n\
\n\
void setup() {\n\
\x20 float s = speed;\n\
\x20 ellipse(mouseX, mouseY, 5, 5);\n\
\x20 pos.normalize();\n\
\x20 float m = Math.abs(s);\n\
\x20 b.grow(1);\n\
}\n";

const BALL: &str = "class Ball {\n\
\x20 float r;\n\
\x20 void grow(float by) {\n\
\x20   r += by;\n\
\x20 }\n\
}\n";

fn sketch() -> Analysis {
    analyze(&[MAIN, BALL])
}

fn complete(analysis: &Analysis, line: usize, prefix: &str) -> Vec<CompletionCandidate> {
    analysis.completions_for(FileId::new(0), line, prefix.len(), prefix)
}

fn names(candidates: &[CompletionCandidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.name()).collect()
}

// =============================================================================
// MEMBER COMPLETION
// =============================================================================

#[test]
fn test_members_of_predefined_class() {
    let candidates = complete(&sketch(), 7, "  pos.no");
    assert!(names(&candidates).contains(&"normalize"));
    assert!(
        candidates
            .iter()
            .all(|c| c.name().to_lowercase().starts_with("no"))
    );
    let normalize = candidates.iter().find(|c| c.name() == "normalize").unwrap();
    assert_eq!(normalize.kind, CompletionKind::PredefinedMethod);
    assert_eq!(normalize.insert_text.as_ref(), "normalize(");
}

#[test]
fn test_static_receiver_lists_static_members() {
    let candidates = complete(&sketch(), 8, "  float m = Math.ab");
    let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_ref()).collect();
    assert_eq!(labels, vec!["abs()"]);
}

#[test]
fn test_sketch_class_without_statics_offers_nothing_statically() {
    assert!(complete(&sketch(), 9, "  Ball.").is_empty());
}

#[test]
fn test_trailing_dot_lists_own_members_first() {
    let candidates = complete(&sketch(), 9, "  b.");
    assert!(candidates.len() > 2);
    assert_eq!(candidates[0].name(), "r");
    assert_eq!(candidates[0].kind, CompletionKind::Field);
    assert_eq!(candidates[0].detail.as_deref(), Some("float"));
    assert_eq!(candidates[1].label.as_ref(), "grow(float by)");
    assert_eq!(candidates[1].insert_text.as_ref(), "grow(");
    assert!(
        candidates[2..]
            .iter()
            .all(|c| c.kind == CompletionKind::PredefinedMethod)
    );
}

// =============================================================================
// SCOPE COMPLETION
// =============================================================================

#[test]
fn test_sketch_field_ranks_first() {
    let candidates = complete(&sketch(), 5, "  float s = spe");
    assert_eq!(candidates[0].name(), "speed");
    assert_eq!(candidates[0].kind, CompletionKind::Field);
}

#[test]
fn test_predefined_fields_are_visible() {
    let candidates = complete(&sketch(), 6, "  ellipse(mou");
    let mouse_x = candidates.iter().find(|c| c.name() == "mouseX").unwrap();
    assert_eq!(mouse_x.kind, CompletionKind::PredefinedField);
    assert!(names(&candidates).contains(&"mouseY"));
}

#[test]
fn test_locals_rank_before_everything() {
    let candidates = complete(&sketch(), 8, "  float m = Math.abs(s");
    assert_eq!(candidates[0].name(), "s");
    assert_eq!(candidates[0].kind, CompletionKind::Local);
    assert!(names(&candidates).contains(&"speed"));
    assert!(names(&candidates).contains(&"setup"));
    // Ranking is by kind first.
    assert!(candidates.windows(2).all(|w| w[0].kind <= w[1].kind));
}

#[test]
fn test_keywords_come_last() {
    let candidates = complete(&sketch(), 5, "  whi");
    let last = candidates.last().unwrap();
    assert_eq!(last.kind, CompletionKind::Keyword);
    assert!(names(&candidates).contains(&"while"));
}

#[test]
fn test_sketch_types_and_predefined_types() {
    let candidates = complete(&sketch(), 5, "  Ba");
    let ball = candidates.iter().find(|c| c.name() == "Ball").unwrap();
    assert_eq!(ball.kind, CompletionKind::Type);
    assert_eq!(ball.detail.as_deref(), Some("class"));

    let candidates = complete(&sketch(), 5, "  PVec");
    let vector = candidates.iter().find(|c| c.name() == "PVector").unwrap();
    assert_eq!(vector.kind, CompletionKind::PredefinedType);
    assert_eq!(vector.detail.as_deref(), Some("processing.core"));
}

// =============================================================================
// EDGE CASES
// =============================================================================

#[test]
fn test_nothing_typed_offers_nothing() {
    assert!(complete(&sketch(), 5, "  ").is_empty());
    assert!(complete(&sketch(), 5, "  float s = (").is_empty());
}

#[test]
fn test_unknown_file_offers_nothing() {
    let analysis = sketch();
    assert!(
        analysis
            .completions_for(FileId::new(5), 0, 3, "ell")
            .is_empty()
    );
}

#[test]
fn test_completion_survives_syntax_errors_elsewhere() {
    let analysis = analyze(&[
        "void setup() {\n  ellipse(mouseX, 1, 2, 3);\n}\n",
        "void helper() {\n  int y = 3\n}\n",
    ]);
    assert!(!analysis.diagnostics().is_empty());
    let candidates = analysis.completions_for(FileId::new(0), 1, 13, "  ellipse(mou");
    assert!(names(&candidates).contains(&"mouseX"));
}
