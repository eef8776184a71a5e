//! Library jars on the classpath.

use sketchcheck::hir::{ExternalMember, codes};
use sketchcheck::{AnalysisConfig, FileId, Resolution};

use crate::helpers::library_fixtures::{write_jar, write_library};
use crate::helpers::sketch_helpers::{analyze_with, codes};

const TOXI_SKETCH: &str = "import toxi.geom.*;\n\
\n\
Vec3D v = new Vec3D(1, 2, 3);\n\
\n\
void setup() {\n\
\x20 v.normalize();\n\
}\n";

#[test]
fn test_library_folder_satisfies_wildcard_import() {
    let root = tempfile::tempdir().unwrap();
    write_library(root.path(), "toxiclibs", &["toxi/geom/Vec3D", "toxi/geom/Line3D"]);
    let config = AnalysisConfig::default().with_library_root(root.path());

    let analysis = analyze_with(&config, &[TOXI_SKETCH]);
    assert!(
        analysis.diagnostics().is_empty(),
        "{:#?}",
        analysis.diagnostics()
    );

    match analysis.find_declaration(FileId::new(0), 2, 0, "Vec3D") {
        Resolution::External(ExternalMember::Class { qualified }) => {
            assert_eq!(qualified, "toxi.geom.Vec3D");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_known_package_rejects_unknown_class() {
    let root = tempfile::tempdir().unwrap();
    write_library(root.path(), "toxiclibs", &["toxi/geom/Vec3D"]);
    let config = AnalysisConfig::default().with_library_root(root.path());

    let analysis = analyze_with(
        &config,
        &["import toxi.geom.*;\nVec3D a;\nVec4D b;\nvoid setup() {}\n"],
    );
    let diagnostics = analysis.diagnostics();
    assert_eq!(codes(diagnostics), vec![codes::UNRESOLVED_TYPE]);
    assert_eq!(diagnostics[0].line, 2);
    assert!(diagnostics[0].message.starts_with("Vec4D"));
}

#[test]
fn test_code_folder_jars_join_when_import_is_missing() {
    let sketch = tempfile::tempdir().unwrap();
    let code = sketch.path().join("code");
    std::fs::create_dir_all(&code).unwrap();
    write_jar(&code.join("helpers.jar"), &["com/example/Util"]);
    let config = AnalysisConfig::default().with_code_folder(&code);

    let analysis = analyze_with(
        &config,
        &["import com.example.Util;\nvoid setup() {\n  Util u = null;\n}\n"],
    );
    assert!(
        analysis.diagnostics().is_empty(),
        "{:#?}",
        analysis.diagnostics()
    );
}

#[test]
fn test_unreadable_jar_is_skipped() {
    let root = tempfile::tempdir().unwrap();
    let broken = root.path().join("broken").join("library");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("broken.jar"), b"not a zip").unwrap();
    let config = AnalysisConfig::default().with_library_root(root.path());

    let analysis = analyze_with(&config, &["import broken.pkg.*;\nvoid setup() {}\n"]);
    assert_eq!(codes(analysis.diagnostics()), vec![codes::LIBRARY_NOT_FOUND]);
}
