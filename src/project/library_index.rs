//! Discovery of library jars and the packages they provide.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use walkdir::WalkDir;
use zip::ZipArchive;

use super::classes::ClassInfo;
use super::error::ClasspathError;

/// One jar and what it contains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibraryJar {
    pub path: PathBuf,
    /// Name of the library the jar belongs to.
    pub library: SmolStr,
    /// Packages with at least one class, sorted.
    pub packages: Vec<SmolStr>,
    /// Qualified top-level class names, sorted.
    pub classes: Vec<SmolStr>,
}

impl LibraryJar {
    pub fn provides(&self, package: &str) -> bool {
        self.packages
            .binary_search_by(|p| p.as_str().cmp(package))
            .is_ok()
    }

    /// The jar's classes, known by name only.
    pub fn class_infos(&self) -> impl Iterator<Item = ClassInfo> + '_ {
        self.classes.iter().map(|class| {
            let (package, name) = class.rsplit_once('.').unwrap_or(("", class.as_str()));
            ClassInfo::opaque(package, name)
        })
    }
}

/// All jars found under a set of directories.
#[derive(Clone, Debug, Default)]
pub struct LibraryIndex {
    jars: Vec<LibraryJar>,
}

impl LibraryIndex {
    /// Walk `roots` for `*.jar` files and read them in parallel. Jars that
    /// cannot be read are logged and skipped.
    pub fn scan(roots: &[PathBuf]) -> Self {
        let paths: Vec<PathBuf> = roots
            .iter()
            .filter(|root| root.is_dir())
            .flat_map(|root| collect_jars(root))
            .collect();
        Self::from_paths(paths)
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        let jars: Vec<LibraryJar> = paths
            .par_iter()
            .filter_map(|path| match read_jar(path) {
                Ok(jar) => Some(jar),
                Err(e) => {
                    tracing::warn!("[CLASSPATH] skipping {}: {e}", path.display());
                    None
                }
            })
            .collect();
        tracing::debug!("[CLASSPATH] indexed {} jars", jars.len());
        Self { jars }
    }

    pub fn jars(&self) -> &[LibraryJar] {
        &self.jars
    }

    pub fn is_empty(&self) -> bool {
        self.jars.is_empty()
    }

    /// Jars providing `package`, in discovery order.
    pub fn providers<'a>(&'a self, package: &'a str) -> impl Iterator<Item = &'a LibraryJar> + 'a {
        self.jars.iter().filter(move |jar| jar.provides(package))
    }
}

/// `*.jar` files below `root`, sorted for a stable order.
pub fn collect_jars(root: &Path) -> Vec<PathBuf> {
    let mut jars: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"))
        })
        .collect();
    jars.sort();
    jars
}

/// Read the class entries of one jar.
pub fn read_jar(path: &Path) -> Result<LibraryJar, ClasspathError> {
    let file = File::open(path)?;
    let archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ClasspathError::archive(path, e.to_string()))?;

    let mut packages = FxHashSet::default();
    let mut classes = Vec::new();
    for name in archive.file_names() {
        if let Some(class) = class_name_of_entry(name) {
            if let Some((package, _)) = class.rsplit_once('.') {
                packages.insert(SmolStr::new(package));
            }
            classes.push(class);
        }
    }
    let mut packages: Vec<SmolStr> = packages.into_iter().collect();
    packages.sort();
    classes.sort();

    Ok(LibraryJar {
        path: path.to_path_buf(),
        library: library_name(path),
        packages,
        classes,
    })
}

/// `a/b/C.class` → `a.b.C`. Nested, anonymous and module-info entries
/// are skipped.
fn class_name_of_entry(entry: &str) -> Option<SmolStr> {
    let stem = entry.strip_suffix(".class")?;
    if stem.contains('$') || stem.ends_with("module-info") || stem.ends_with("package-info") {
        return None;
    }
    if stem.starts_with("META-INF/") {
        return None;
    }
    Some(SmolStr::new(stem.replace('/', ".")))
}

/// Libraries are laid out as `<name>/library/<name>.jar`; fall back to the
/// jar's own stem.
fn library_name(path: &Path) -> SmolStr {
    let parent = path.parent();
    let library = parent
        .filter(|dir| dir.file_name().is_some_and(|n| n == "library"))
        .and_then(|dir| dir.parent())
        .and_then(|dir| dir.file_name())
        .or_else(|| path.file_stem());
    SmolStr::new(library.map_or_else(String::new, |n| n.to_string_lossy().into_owned()))
}
