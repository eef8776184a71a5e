//! Binding a resolved classpath to a class lookup.

use std::sync::Arc;

use super::classes::{ClassLookup, ClassTable, LayeredClasses};
use super::classpath::ClasspathEntry;
use super::core_classes::core_classes;
use super::error::ClasspathError;
use super::library_index::read_jar;

/// Loads the classes of a classpath and makes them queryable.
///
/// Binding is the expensive step of classpath handling; callers only bind
/// when the set of imports changed.
pub trait ClassLoader: Send + Sync {
    fn bind(&self, entries: &[ClasspathEntry]) -> Result<Arc<dyn ClassLookup>, ClasspathError>;
}

/// Reads class names out of every jar and layers them over the predefined
/// classes. Library classes carry no member information. A jar that cannot
/// be read is logged and left out of the binding.
#[derive(Clone, Copy, Debug, Default)]
pub struct JarClassLoader;

impl ClassLoader for JarClassLoader {
    fn bind(&self, entries: &[ClasspathEntry]) -> Result<Arc<dyn ClassLookup>, ClasspathError> {
        let mut libraries = ClassTable::new();
        for entry in entries {
            let jar = match read_jar(&entry.path) {
                Ok(jar) => jar,
                Err(e) => {
                    tracing::warn!("[CLASSPATH] skipping {}: {e}", entry.path.display());
                    continue;
                }
            };
            for class in jar.class_infos() {
                libraries.insert(class);
            }
        }
        tracing::debug!(
            "[CLASSPATH] bound {} entries, {} library classes",
            entries.len(),
            libraries.len()
        );
        Ok(Arc::new(LayeredClasses::new(core_classes(), libraries)))
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::path::{Path, PathBuf};

    use smol_str::SmolStr;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn entry(path: PathBuf, packages: &[&str]) -> ClasspathEntry {
        ClasspathEntry {
            path,
            library: SmolStr::new("lib"),
            packages: packages.iter().map(|p| SmolStr::new(*p)).collect(),
        }
    }

    fn write_jar(path: &Path, classes: &[&str]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for class in classes {
            zip.start_file(format!("{class}.class"), SimpleFileOptions::default())
                .unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_bind_skips_missing_and_broken_jars() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.jar");
        write_jar(&good, &["toxi/geom/Vec3D"]);
        let broken = dir.path().join("broken.jar");
        std::fs::write(&broken, b"not a zip").unwrap();

        let entries = [
            entry(dir.path().join("missing.jar"), &["gone"]),
            entry(broken, &["broken"]),
            entry(good, &["toxi.geom"]),
        ];
        let lookup = JarClassLoader.bind(&entries).unwrap();
        assert!(lookup.class("toxi.geom.Vec3D").is_some());
        assert!(!lookup.has_package("broken"));
        assert!(lookup.class("java.lang.String").is_some());
    }
}
