//! The classpath cache.
//!
//! Maps the import list of a sketch to library jars and keeps one bound
//! [`ClassLookup`] for it. The binding is reused until the sequence of
//! imported names changes; moving an import to another line does not
//! count as a change.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::syntax::ImportStatement;

use super::classes::{ClassLookup, ClassTable, LayeredClasses};
use super::core_classes::{core_classes, is_provided_package};
use super::library_index::{LibraryIndex, LibraryJar, collect_jars};
use super::loader::{ClassLoader, JarClassLoader};

/// One jar on the classpath.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClasspathEntry {
    pub path: PathBuf,
    pub library: SmolStr,
    pub packages: Vec<SmolStr>,
}

impl From<&LibraryJar> for ClasspathEntry {
    fn from(jar: &LibraryJar) -> Self {
        Self {
            path: jar.path.clone(),
            library: jar.library.clone(),
            packages: jar.packages.clone(),
        }
    }
}

/// Result of mapping imports to jars.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedClasspath {
    pub entries: Vec<ClasspathEntry>,
    /// Imports no jar provides.
    pub unresolved: Vec<ImportStatement>,
}

/// Map every import to the jars providing its package.
///
/// Imports from predefined packages need no jar. When some import is not
/// found and a code folder exists, every jar of the code folder joins the
/// classpath once; imports that still have no provider are reported.
pub fn resolve_imports(
    imports: &[ImportStatement],
    index: &LibraryIndex,
    code_folder: Option<&Path>,
) -> ResolvedClasspath {
    let mut resolved = ResolvedClasspath::default();
    let mut seen = FxHashSet::default();
    let mut pending = Vec::new();

    for import in imports {
        let package = import.package();
        if is_provided_package(package) || core_classes().has_package(package) {
            continue;
        }
        let mut found = false;
        for jar in index.providers(package) {
            found = true;
            if seen.insert(jar.path.clone()) {
                resolved.entries.push(ClasspathEntry::from(jar));
            }
        }
        if !found {
            pending.push(import.clone());
        }
    }

    if pending.is_empty() {
        return resolved;
    }

    let code_jars = code_folder
        .filter(|dir| dir.is_dir())
        .map(|dir| LibraryIndex::from_paths(collect_jars(dir)))
        .unwrap_or_default();
    for jar in code_jars.jars() {
        if seen.insert(jar.path.clone()) {
            resolved.entries.push(ClasspathEntry::from(jar));
        }
    }
    for import in pending {
        if code_jars.providers(import.package()).next().is_none() {
            tracing::warn!(
                "[CLASSPATH] no library provides {} ({} line {})",
                import.name,
                import.file,
                import.line
            );
            resolved.unresolved.push(import);
        }
    }
    resolved
}

/// Every class an import could bring in: the predefined classes, all
/// library jars and the jars of the code folder.
pub fn search_classes(index: &LibraryIndex, code_folder: Option<&Path>) -> LayeredClasses {
    let code_jars = code_folder
        .filter(|dir| dir.is_dir())
        .map(|dir| LibraryIndex::from_paths(collect_jars(dir)))
        .unwrap_or_default();
    let libraries: ClassTable = index
        .jars()
        .iter()
        .chain(code_jars.jars())
        .flat_map(|jar| jar.class_infos())
        .collect();
    LayeredClasses::new(core_classes(), libraries)
}

/// Cached classpath and its bound class lookup.
pub struct ClasspathCache {
    library_roots: Vec<PathBuf>,
    code_folder: Option<PathBuf>,
    loader: Box<dyn ClassLoader>,
    key: Option<Vec<SmolStr>>,
    resolved: ResolvedClasspath,
    handle: Option<Arc<dyn ClassLookup>>,
    /// Searched for import suggestions; not limited to imported packages.
    search: Arc<dyn ClassLookup>,
    reloads: usize,
}

impl ClasspathCache {
    pub fn new(library_roots: Vec<PathBuf>, code_folder: Option<PathBuf>) -> Self {
        Self {
            library_roots,
            code_folder,
            loader: Box::new(JarClassLoader),
            key: None,
            resolved: ResolvedClasspath::default(),
            handle: None,
            search: Arc::new(LayeredClasses::new(core_classes(), ClassTable::new())),
            reloads: 0,
        }
    }

    pub fn with_loader(mut self, loader: impl ClassLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Re-resolve and rebind if the imported names changed.
    ///
    /// Returns `true` when a reload happened.
    pub fn update(&mut self, imports: &[ImportStatement]) -> bool {
        let key: Vec<SmolStr> = imports.iter().map(|i| i.name.clone()).collect();
        if self.key.as_ref() == Some(&key) {
            tracing::trace!("[CLASSPATH] imports unchanged, reusing binding");
            return false;
        }
        self.reload(imports);
        self.key = Some(key);
        true
    }

    fn reload(&mut self, imports: &[ImportStatement]) {
        self.reloads += 1;
        let index = LibraryIndex::scan(&self.library_roots);
        self.resolved = resolve_imports(imports, &index, self.code_folder.as_deref());
        self.search = Arc::new(search_classes(&index, self.code_folder.as_deref()));
        self.handle = match self.loader.bind(&self.resolved.entries) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("[CLASSPATH] binding failed, semantic checks disabled: {e}");
                None
            }
        };
        tracing::info!(
            "[CLASSPATH] reload #{}: {} entries, {} unresolved imports",
            self.reloads,
            self.resolved.entries.len(),
            self.resolved.unresolved.len()
        );
    }

    /// The bound lookup, or `None` when binding failed.
    pub fn handle(&self) -> Option<Arc<dyn ClassLookup>> {
        self.handle.clone()
    }

    /// All classes known to the sketch's environment, imported or not.
    pub fn search(&self) -> &dyn ClassLookup {
        self.search.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    pub fn entries(&self) -> &[ClasspathEntry] {
        &self.resolved.entries
    }

    pub fn unresolved(&self) -> &[ImportStatement] {
        &self.resolved.unresolved
    }

    pub fn reload_count(&self) -> usize {
        self.reloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;
    use crate::project::ClasspathError;
    use crate::syntax::extract_imports;

    fn imports(text: &str) -> Vec<ImportStatement> {
        extract_imports(FileId::new(0), text).imports
    }

    struct FailingLoader;

    impl ClassLoader for FailingLoader {
        fn bind(&self, _: &[ClasspathEntry]) -> Result<Arc<dyn ClassLookup>, ClasspathError> {
            Err(ClasspathError::bind("no runtime"))
        }
    }

    #[test]
    fn test_unchanged_names_do_not_reload() {
        let mut cache = ClasspathCache::new(Vec::new(), None);
        assert!(cache.update(&imports("import java.util.List;")));
        assert!(!cache.update(&imports("\n\n   import java.util.List;")));
        assert_eq!(cache.reload_count(), 1);
        assert!(cache.update(&imports("import java.util.Map;")));
        assert_eq!(cache.reload_count(), 2);
    }

    #[test]
    fn test_predefined_imports_need_no_entries() {
        let mut cache = ClasspathCache::new(Vec::new(), None);
        cache.update(&imports("import processing.sound.*;\nimport java.awt.Color;"));
        assert!(cache.entries().is_empty());
        assert!(cache.unresolved().is_empty());
        assert!(cache.is_bound());
    }

    #[test]
    fn test_missing_library_is_reported_not_fatal() {
        let mut cache = ClasspathCache::new(vec![PathBuf::from("/nonexistent")], None);
        cache.update(&imports("import toxi.geom.*;"));
        assert_eq!(cache.unresolved().len(), 1);
        assert_eq!(cache.unresolved()[0].name, "toxi.geom.*");
        assert!(cache.is_bound());
    }

    #[test]
    fn test_search_covers_libraries_that_are_not_imported() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("toxiclibs").join("library");
        std::fs::create_dir_all(&lib).unwrap();
        let mut zip = zip::ZipWriter::new(std::fs::File::create(lib.join("toxiclibs.jar")).unwrap());
        zip.start_file("toxi/geom/Vec3D.class", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.finish().unwrap();

        let mut cache = ClasspathCache::new(vec![dir.path().to_path_buf()], None);
        cache.update(&[]);
        assert!(cache.entries().is_empty());
        let handle = cache.handle().unwrap();
        assert!(handle.class("toxi.geom.Vec3D").is_none());
        assert!(cache.search().class("toxi.geom.Vec3D").is_some());
        assert_eq!(cache.search().classes_named("vec3d").len(), 1);
    }

    #[test]
    fn test_bind_failure_disables_handle_until_imports_change() {
        let mut cache = ClasspathCache::new(Vec::new(), None).with_loader(FailingLoader);
        cache.update(&[]);
        assert!(!cache.is_bound());
        assert!(!cache.update(&[]));
        assert!(cache.handle().is_none());
    }
}
