//! Semantic checks over a parsed Translated Unit.
//!
//! Every name occurrence is resolved and the ones that fail are reported,
//! unless the failure cannot be told apart from an incomplete class
//! description: a missing member is only an error when every class in the
//! relevant hierarchy has a fully known member list.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::parser::{Ast, NodeId, NodeKind};
use crate::project::{ClassInfo, ClassLookup};
use crate::syntax::TranslatedUnit;

use super::diagnostics::{Diagnostic, DiagnosticCollector, codes};
use super::resolve::{Resolution, ResolvedType, Resolver, Role, role_of};
use super::scope::{TreeScope, WalkStart};

/// Check `ast`, the parse of `unit`, against the bound classes.
///
/// Unresolved type and variable names carry import suggestions found in
/// `search`, which may know classes the sketch does not import.
pub fn check_unit(
    unit: &TranslatedUnit,
    ast: &Ast,
    classes: &dyn ClassLookup,
    search: &dyn ClassLookup,
    default_imports: &[SmolStr],
) -> Vec<Diagnostic> {
    let scope = TreeScope::new(ast);
    let resolver =
        Resolver::new(&scope, Some(classes), &unit.imports).with_default_imports(default_imports);
    let checker = SemanticChecker::new(unit, ast, classes, &resolver).with_search(search);
    let diagnostics = checker.run();
    tracing::debug!("[CHECK] {} semantic problems", diagnostics.len());
    diagnostics
}

/// Reports unresolved names in one unit.
pub struct SemanticChecker<'a> {
    unit: &'a TranslatedUnit,
    ast: &'a Ast,
    classes: &'a dyn ClassLookup,
    search: &'a dyn ClassLookup,
    resolver: &'a Resolver<'a, TreeScope<'a>>,
    suggestions: FxHashMap<SmolStr, Vec<SmolStr>>,
    /// A wildcard import whose classes are unknown may supply any type name.
    open_wildcard: bool,
    /// A static import from an unknown class may supply any member name.
    open_static: bool,
    collector: DiagnosticCollector,
}

impl<'a> SemanticChecker<'a> {
    pub fn new(
        unit: &'a TranslatedUnit,
        ast: &'a Ast,
        classes: &'a dyn ClassLookup,
        resolver: &'a Resolver<'a, TreeScope<'a>>,
    ) -> Self {
        let open_wildcard = unit
            .imports
            .iter()
            .filter(|i| !i.is_static && i.is_wildcard())
            .any(|i| classes.classes_in_package(i.package()).is_empty());
        let open_static = unit.imports.iter().filter(|i| i.is_static).any(|i| {
            i.type_name()
                .and_then(|name| classes.class(name))
                .is_none_or(|class| !class.members_known)
        });
        Self {
            unit,
            ast,
            classes,
            search: classes,
            resolver,
            suggestions: FxHashMap::default(),
            open_wildcard,
            open_static,
            collector: DiagnosticCollector::new(),
        }
    }

    /// Look import suggestions up in `search` instead of the bound classes.
    pub fn with_search(mut self, search: &'a dyn ClassLookup) -> Self {
        self.search = search;
        self
    }

    pub fn run(mut self) -> Vec<Diagnostic> {
        let mut nodes: Vec<(NodeId, TextRange)> = self
            .ast
            .ids()
            .filter_map(|id| Some((id, self.ast.name(id)?.range)))
            .collect();
        nodes.sort_by_key(|(_, range)| range.start());

        for (node, range) in nodes {
            let Some(role) = role_of(self.ast, node) else {
                continue;
            };
            match role {
                Role::Declaration => {}
                Role::TypeName | Role::ConstructorType => self.check_type(node, range),
                Role::Identifier | Role::Qualifier => self.check_variable(node, range),
                Role::CallTarget => self.check_call(node, range),
                Role::MemberCall | Role::MemberAccess => self.check_member(node, range, role),
            }
        }
        self.collector.finish()
    }

    fn report(&mut self, code: &str, range: TextRange, message: String) {
        let diagnostic = self.diagnostic(code, range, message);
        self.collector.add(diagnostic);
    }

    fn report_with_suggestions(
        &mut self,
        code: &str,
        range: TextRange,
        name: &str,
        message: String,
    ) {
        let suggestions = self.import_suggestions(name);
        let diagnostic = self
            .diagnostic(code, range, message)
            .with_import_suggestions(suggestions);
        self.collector.add(diagnostic);
    }

    fn diagnostic(&self, code: &str, range: TextRange, message: String) -> Diagnostic {
        let start = self.unit.line_index.line_col(&self.unit.text, range.start());
        let len = self.unit.text[range].chars().count();
        Diagnostic::error(code, start.line as usize, start.col as usize, message)
            .with_len(len)
            .located(self.unit)
    }

    /// Qualified names of the classes called `name`, ignoring case, with
    /// `java` packages first. Computed once per name.
    fn import_suggestions(&mut self, name: &str) -> Vec<SmolStr> {
        if let Some(found) = self.suggestions.get(name) {
            return found.clone();
        }
        let mut found: Vec<SmolStr> = self
            .search
            .classes_named(name)
            .into_iter()
            .map(ClassInfo::qualified_name)
            .collect();
        found.sort_by(|a, b| {
            (!a.starts_with("java"))
                .cmp(&!b.starts_with("java"))
                .then_with(|| a.cmp(b))
        });
        found.dedup();
        self.suggestions.insert(SmolStr::new(name), found.clone());
        found
    }

    fn name(&self, node: NodeId) -> SmolStr {
        self.ast
            .name(node)
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    fn check_type(&mut self, node: NodeId, range: TextRange) {
        let NodeKind::TypeRef { qualifier, .. } = self.ast.kind(node) else {
            return;
        };
        let is_qualifier = matches!(
            self.ast.parent(node).map(|p| self.ast.kind(p)),
            Some(NodeKind::TypeRef { qualifier: Some(q), .. }) if *q == node
        );
        if qualifier.is_some() || is_qualifier || self.open_wildcard {
            return;
        }
        if self.resolver.resolve(node).is_resolved() {
            return;
        }
        let name = self.name(node);
        self.report_with_suggestions(
            codes::UNRESOLVED_TYPE,
            range,
            &name,
            format!("{name} cannot be resolved to a type"),
        );
    }

    fn check_variable(&mut self, node: NodeId, range: TextRange) {
        if self.open_static || self.is_case_label(node) {
            return;
        }
        let name = self.name(node);
        if self.classes.has_package(&name) || !self.enclosing_known(node) {
            return;
        }
        if self.resolver.resolve(node).is_resolved() {
            return;
        }
        self.report_with_suggestions(
            codes::UNRESOLVED_VARIABLE,
            range,
            &name,
            format!("{name} cannot be resolved to a variable"),
        );
    }

    fn check_call(&mut self, node: NodeId, range: TextRange) {
        if self.open_static || !self.enclosing_known(node) {
            return;
        }
        if self.resolver.resolve(node).is_resolved() {
            return;
        }
        let name = self.name(node);
        let owner = self
            .resolver
            .enclosing_type(WalkStart::at(self.ast, node))
            .map(|ty| self.display(&ty))
            .unwrap_or_default();
        self.report(
            codes::UNDEFINED_METHOD,
            range,
            format!("The method {name}() is undefined for the type {owner}"),
        );
    }

    /// Missing members are only reported on receivers declared in the
    /// sketch itself (and arrays), whose hierarchy is fully known.
    fn check_member(&mut self, node: NodeId, range: TextRange, role: Role) {
        let receiver = match self.ast.kind(node) {
            NodeKind::Call {
                receiver: Some(r), ..
            } => *r,
            NodeKind::FieldAccess { receiver, .. } => *receiver,
            _ => return,
        };
        let Some(receiver) = self.resolver.infer(receiver) else {
            return;
        };
        let decidable = match &receiver.ty {
            ResolvedType::Local(_) | ResolvedType::Anonymous(_) => {
                self.resolver.hierarchy_known(&receiver.ty)
            }
            ResolvedType::Array(_) => true,
            ResolvedType::External(_) | ResolvedType::Primitive(_) => false,
        };
        if !decidable || self.resolver.resolve(node) != Resolution::Unresolved {
            return;
        }
        let name = self.name(node);
        let message = if role == Role::MemberCall {
            format!(
                "The method {name}() is undefined for the type {}",
                self.display(&receiver.ty)
            )
        } else {
            format!("{name} cannot be resolved or is not a field")
        };
        self.report(codes::UNDEFINED_MEMBER, range, message);
    }

    /// Enum constants in `case` labels are written unqualified.
    fn is_case_label(&self, node: NodeId) -> bool {
        matches!(
            self.ast.parent(node).map(|p| self.ast.kind(p)),
            Some(NodeKind::SwitchCase { labels, .. }) if labels.contains(&node)
        )
    }

    /// Whether every class body around `node` has a fully known hierarchy,
    /// so an unqualified name missing from all of them is a real error.
    fn enclosing_known(&self, node: NodeId) -> bool {
        let mut child = node;
        for ancestor in self.ast.ancestors(node) {
            let known = match self.ast.kind(ancestor) {
                NodeKind::TypeDecl { .. } => {
                    self.resolver.hierarchy_known(&ResolvedType::Local(ancestor))
                }
                NodeKind::New {
                    body: Some(members),
                    ..
                } if members.contains(&child) => self
                    .resolver
                    .hierarchy_known(&ResolvedType::Anonymous(ancestor)),
                _ => true,
            };
            if !known {
                return false;
            }
            child = ancestor;
        }
        true
    }

    fn display(&self, ty: &ResolvedType) -> String {
        match ty {
            ResolvedType::Local(node) => self.name(*node).to_string(),
            ResolvedType::Anonymous(node) => match self.ast.kind(*node) {
                NodeKind::New { ty, .. } => format!("new {}(){{}}", self.name(*ty)),
                _ => String::new(),
            },
            ResolvedType::External(qualified) => qualified
                .rsplit_once('.')
                .map_or(qualified.as_str(), |(_, name)| name)
                .to_string(),
            ResolvedType::Primitive(prim) => prim.name().to_string(),
            ResolvedType::Array(inner) => format!("{}[]", self.display(inner)),
        }
    }
}
