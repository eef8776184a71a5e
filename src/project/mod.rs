//! Classpath handling: predefined classes, library discovery and the
//! cached binding used by semantic checks.

mod classes;
mod classpath;
mod core_classes;
mod error;
mod library_index;
mod loader;

pub use classes::{
    ClassInfo, ClassKind, ClassLookup, ClassTable, FieldInfo, LayeredClasses, MethodInfo,
};
pub use classpath::{
    ClasspathCache, ClasspathEntry, ResolvedClasspath, resolve_imports, search_classes,
};
pub use core_classes::{
    DEFAULT_IMPORTS, IMPLICIT_PACKAGE, PROVIDED_PREFIXES, core_classes, is_provided_package,
};
pub use error::ClasspathError;
pub use library_index::{LibraryIndex, LibraryJar, collect_jars, read_jar};
pub use loader::{ClassLoader, JarClassLoader};
