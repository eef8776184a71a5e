//! On-disk library folders for classpath tests.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Write `<root>/<library>/library/<library>.jar` holding empty class
/// entries named after `classes` (`a/b/C.class`).
pub fn write_library(root: &Path, library: &str, classes: &[&str]) -> PathBuf {
    let dir = root.join(library).join("library");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{library}.jar"));
    write_jar(&path, classes);
    path
}

pub fn write_jar(path: &Path, classes: &[&str]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file("META-INF/MANIFEST.MF", options).unwrap();
    for class in classes {
        zip.start_file(format!("{class}.class"), options).unwrap();
    }
    zip.finish().unwrap();
}
