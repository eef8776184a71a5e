//! Position mapping between tabs and the Translated Unit.

use rstest::rstest;
use sketchcheck::FileId;
use sketchcheck::mapping::{FileLine, align_column, align_column_reverse};
use sketchcheck::syntax::{TranslateOptions, TranslatedUnit, translate};

use crate::helpers::sketch_helpers::sources;

fn sketch() -> TranslatedUnit {
    translate(
        &sources(&[
            "import java.util.List;\n\nvoid setup() {\n  size(200, 200);\n}\n",
            "class Ball {\n  float r;\n}\n",
            "void helper() {\n  int k = int(4.5);\n}\n",
        ]),
        &TranslateOptions::default(),
    )
}

// =============================================================================
// LINES
// =============================================================================

#[test]
fn test_every_file_line_round_trips() {
    let unit = sketch();
    let mapper = unit.mapper();
    for file in &unit.files {
        for line in 0..file.line_count() {
            let translated = mapper.to_translated_line(file.id, line).unwrap();
            assert_eq!(
                mapper.to_file_line(translated),
                Some(FileLine::new(file.id, line)),
                "{} line {line}",
                file.name
            );
        }
    }
}

#[test]
fn test_scaffolding_lines_have_no_file_line() {
    let unit = sketch();
    let mapper = unit.mapper();
    let header = unit.class_offset - 1;
    assert_eq!(mapper.to_file_line(header), None);
    assert_eq!(mapper.to_file_line(unit.line_count() + 10), None);
    assert_eq!(mapper.to_translated_line(FileId::new(7), 0), None);
}

#[test]
fn test_hoisted_import_maps_to_its_tab() {
    let unit = sketch();
    let position = unit.mapper().to_file_position(0, 7).unwrap();
    assert_eq!((position.file, position.line, position.col), (FileId::new(0), 0, 7));
}

// =============================================================================
// COLUMNS
// =============================================================================

#[rstest]
#[case(8, 8)]
#[case(17, 26)]
fn test_parse_call_rewrite_alignment(#[case] original: usize, #[case] translated: usize) {
    assert_eq!(
        align_column("int k = int(4.5);", "int k = Lib.parseInt(4.5);", original),
        translated
    );
}

#[test]
fn test_identical_lines_are_identity() {
    let line = "  ellipse(x, y, 10, 10);";
    for col in 0..=line.len() {
        assert_eq!(align_column(line, line, col), col);
        assert_eq!(align_column_reverse(line, line, col), col);
    }
}

#[test]
fn test_rewritten_line_columns_through_mapper() {
    let unit = sketch();
    let mapper = unit.mapper();
    let file = FileId::new(2);
    let unit_line = mapper.to_translated_line(file, 1).unwrap();
    let processed = unit.line_text(unit_line).unwrap();
    assert_eq!(processed, "  int k = PApplet.parseInt(4.5);");

    assert_eq!(mapper.to_unit_position(file, 1, 0), Some((unit_line, 0)));
    let end = "  int k = int(4.5);".len();
    assert_eq!(
        mapper.to_unit_position(file, 1, end),
        Some((unit_line, processed.len()))
    );
    let back = mapper.to_file_position(unit_line, processed.len()).unwrap();
    assert_eq!((back.file, back.line, back.col), (file, 1, end));
}
