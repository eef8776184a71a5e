//! Class descriptions for predefined and library types.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

/// A field of a predefined class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldInfo {
    pub name: SmolStr,
    /// Type as written: a primitive, a simple or qualified class name, an
    /// array of those, or a type variable.
    pub ty: SmolStr,
    pub is_static: bool,
}

/// A method of a predefined class. Overloads share one entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodInfo {
    pub name: SmolStr,
    pub return_type: SmolStr,
    pub is_static: bool,
}

/// A class, interface or enum known through the classpath.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassInfo {
    pub name: SmolStr,
    pub package: SmolStr,
    pub kind: ClassKind,
    /// Qualified superclass name.
    pub superclass: Option<SmolStr>,
    /// Qualified interface names.
    pub interfaces: Vec<SmolStr>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    /// Whether `fields` and `methods` list every public member. Classes
    /// read from a jar only have a name, so nothing can be concluded from
    /// a missing member.
    pub members_known: bool,
}

impl ClassInfo {
    pub fn new(package: &str, name: &str, kind: ClassKind) -> Self {
        let superclass = (kind == ClassKind::Class && !(package == "java.lang" && name == "Object"))
            .then(|| SmolStr::new_static("java.lang.Object"));
        Self {
            name: SmolStr::new(name),
            package: SmolStr::new(package),
            kind,
            superclass,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            members_known: true,
        }
    }

    pub fn class(package: &str, name: &str) -> Self {
        Self::new(package, name, ClassKind::Class)
    }

    pub fn interface(package: &str, name: &str) -> Self {
        Self::new(package, name, ClassKind::Interface)
    }

    /// A class seen only by name, e.g. a jar entry.
    pub fn opaque(package: &str, name: &str) -> Self {
        Self {
            superclass: None,
            members_known: false,
            ..Self::class(package, name)
        }
    }

    pub fn qualified_name(&self) -> SmolStr {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            SmolStr::new(format!("{}.{}", self.package, self.name))
        }
    }

    pub fn with_superclass(mut self, superclass: &str) -> Self {
        self.superclass = Some(SmolStr::new(superclass));
        self
    }

    pub fn with_interfaces(mut self, interfaces: &[&str]) -> Self {
        self.interfaces
            .extend(interfaces.iter().map(|i| SmolStr::new(i)));
        self
    }

    /// Add fields written as `[static] Type name`.
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        for decl in fields {
            if let Some((is_static, ty, name)) = split_member(decl) {
                self.fields.push(FieldInfo {
                    name: SmolStr::new(name),
                    ty: SmolStr::new(ty),
                    is_static,
                });
            }
        }
        self
    }

    /// Add methods written as `[static] ReturnType name`.
    pub fn with_methods(mut self, methods: &[&str]) -> Self {
        for decl in methods {
            if let Some((is_static, ty, name)) = split_member(decl) {
                self.methods.push(MethodInfo {
                    name: SmolStr::new(name),
                    return_type: SmolStr::new(ty),
                    is_static,
                });
            }
        }
        self
    }

    /// Mark the member list as incomplete.
    pub fn partial(mut self) -> Self {
        self.members_known = false;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Supertypes in lookup order: superclass first, then interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &SmolStr> {
        self.superclass.iter().chain(self.interfaces.iter())
    }
}

fn split_member(decl: &str) -> Option<(bool, &str, &str)> {
    let mut parts = decl.split_whitespace();
    let first = parts.next()?;
    let (is_static, ty) = if first == "static" {
        (true, parts.next()?)
    } else {
        (false, first)
    };
    Some((is_static, ty, parts.next()?))
}

/// Read access to the classes visible to a sketch.
///
/// Implementations are immutable once built and shared between threads.
pub trait ClassLookup: Send + Sync {
    /// Look a class up by qualified name.
    fn class(&self, qualified: &str) -> Option<&ClassInfo>;

    /// Whether `package` (or a package below it) holds any known class.
    fn has_package(&self, package: &str) -> bool;

    /// Classes directly inside `package`, in insertion order.
    fn classes_in_package(&self, package: &str) -> Vec<&ClassInfo>;

    /// Classes whose simple name is `name`, ignoring case.
    fn classes_named(&self, name: &str) -> Vec<&ClassInfo>;
}

/// A flat table of classes keyed by qualified name.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    classes: IndexMap<SmolStr, ClassInfo>,
    packages: FxHashSet<SmolStr>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a class. An existing entry with the same name wins.
    pub fn insert(&mut self, class: ClassInfo) {
        let mut package = class.package.as_str();
        while !package.is_empty() {
            self.packages.insert(SmolStr::new(package));
            package = package.rsplit_once('.').map_or("", |(parent, _)| parent);
        }
        self.classes.entry(class.qualified_name()).or_insert(class);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }
}

impl FromIterator<ClassInfo> for ClassTable {
    fn from_iter<I: IntoIterator<Item = ClassInfo>>(iter: I) -> Self {
        let mut table = Self::new();
        for class in iter {
            table.insert(class);
        }
        table
    }
}

impl ClassLookup for ClassTable {
    fn class(&self, qualified: &str) -> Option<&ClassInfo> {
        self.classes.get(qualified)
    }

    fn has_package(&self, package: &str) -> bool {
        self.packages.contains(package)
    }

    fn classes_in_package(&self, package: &str) -> Vec<&ClassInfo> {
        self.classes
            .values()
            .filter(|c| c.package == package)
            .collect()
    }

    fn classes_named(&self, name: &str) -> Vec<&ClassInfo> {
        self.classes
            .values()
            .filter(|c| c.name.eq_ignore_ascii_case(name))
            .collect()
    }
}

/// Library classes layered over the predefined ones. Predefined classes
/// shadow library classes of the same name.
pub struct LayeredClasses {
    base: &'static ClassTable,
    libraries: ClassTable,
}

impl LayeredClasses {
    pub fn new(base: &'static ClassTable, libraries: ClassTable) -> Self {
        Self { base, libraries }
    }

    pub fn library_count(&self) -> usize {
        self.libraries.len()
    }
}

impl ClassLookup for LayeredClasses {
    fn class(&self, qualified: &str) -> Option<&ClassInfo> {
        self.base
            .class(qualified)
            .or_else(|| self.libraries.class(qualified))
    }

    fn has_package(&self, package: &str) -> bool {
        self.base.has_package(package) || self.libraries.has_package(package)
    }

    fn classes_in_package(&self, package: &str) -> Vec<&ClassInfo> {
        let mut classes = self.base.classes_in_package(package);
        classes.extend(
            self.libraries
                .classes_in_package(package)
                .into_iter()
                .filter(|c| self.base.class(&c.qualified_name()).is_none()),
        );
        classes
    }

    fn classes_named(&self, name: &str) -> Vec<&ClassInfo> {
        let mut classes = self.base.classes_named(name);
        classes.extend(
            self.libraries
                .classes_named(name)
                .into_iter()
                .filter(|c| self.base.class(&c.qualified_name()).is_none()),
        );
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_declarations() {
        let class = ClassInfo::class("p", "Dot")
            .with_fields(&["float x", "static int COUNT"])
            .with_methods(&["void move", "static Dot origin"]);
        assert_eq!(class.field("x").unwrap().ty, "float");
        assert!(class.field("COUNT").unwrap().is_static);
        assert!(class.method("origin").unwrap().is_static);
        assert!(!class.method("move").unwrap().is_static);
        assert_eq!(class.qualified_name(), "p.Dot");
        assert_eq!(class.superclass.as_deref(), Some("java.lang.Object"));
    }

    #[test]
    fn test_table_tracks_package_prefixes() {
        let table: ClassTable = [ClassInfo::class("a.b.c", "D")].into_iter().collect();
        assert!(table.has_package("a"));
        assert!(table.has_package("a.b"));
        assert!(table.has_package("a.b.c"));
        assert!(!table.has_package("a.b.c.D"));
        assert_eq!(table.classes_in_package("a.b.c").len(), 1);
        assert!(table.classes_in_package("a.b").is_empty());
    }

    #[test]
    fn test_classes_named_ignores_case() {
        let table: ClassTable = [
            ClassInfo::class("toxi.geom", "Vec3D"),
            ClassInfo::opaque("lib", "VEC3D"),
            ClassInfo::class("toxi.geom", "Vec2D"),
        ]
        .into_iter()
        .collect();
        let found: Vec<SmolStr> = table
            .classes_named("vec3D")
            .into_iter()
            .map(ClassInfo::qualified_name)
            .collect();
        assert_eq!(found, vec!["toxi.geom.Vec3D", "lib.VEC3D"]);
        assert!(table.classes_named("Vec").is_empty());
    }

    #[test]
    fn test_opaque_classes_have_unknown_members() {
        let class = ClassInfo::opaque("lib", "Thing");
        assert!(!class.members_known);
        assert!(class.superclass.is_none());
    }
}
