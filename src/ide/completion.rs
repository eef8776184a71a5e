//! Completion candidates.
//!
//! Two modes, chosen by the text before the caret:
//!
//! - **Member**: `receiver.pre` lists the members of the receiver's type
//!   (own, then inherited). The receiver is parsed as a detached fragment
//!   and resolved as if written at the caret. A trailing `.` lists every
//!   member.
//! - **Scope**: `pre` lists what is visible at the caret: locals,
//!   parameters, members of the enclosing classes, types, keywords.
//!
//! Candidates are filtered by case-insensitive prefix, deduplicated by
//! label and ranked by [`CompletionKind`], then name.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use text_size::TextSize;

use crate::base::FileId;
use crate::hir::{
    DeclKind, DeclarationNode, ExternalMember, FragmentScope, Resolution, WalkStart,
    declared_modifiers,
};
use crate::parser::{Ast, Modifiers, NodeKind, TypeDeclKind, parse_expression};
use crate::project::IMPLICIT_PACKAGE;
use crate::syntax::expand_sugar;

use super::analysis::Snapshot;
use super::text_utils::{split_receiver, starts_with_ignore_case, trailing_expression};

/// Kind of completion candidate, in ranking order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompletionKind {
    Local,
    Field,
    Method,
    Type,
    PredefinedField,
    PredefinedMethod,
    PredefinedType,
    Keyword,
}

impl CompletionKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::Local => 6,                                     // Variable
            CompletionKind::Field | CompletionKind::PredefinedField => 5,   // Field
            CompletionKind::Method | CompletionKind::PredefinedMethod => 2, // Method
            CompletionKind::Type | CompletionKind::PredefinedType => 7,     // Class
            CompletionKind::Keyword => 14,                                  // Keyword
        }
    }
}

/// A completion suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionCandidate {
    /// Text shown in the list.
    pub label: Arc<str>,
    /// Text inserted in place of the typed prefix.
    pub insert_text: Arc<str>,
    pub kind: CompletionKind,
    /// Detail text (type or owner).
    pub detail: Option<Arc<str>>,
    /// Name the prefix is matched against.
    name: Arc<str>,
}

impl CompletionCandidate {
    /// Create a candidate whose label and insert text are `name`.
    pub fn new(name: impl Into<Arc<str>>, kind: CompletionKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            insert_text: name.clone(),
            kind,
            detail: None,
            name,
        }
    }

    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_insert_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.insert_text = text.into();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

const KEYWORDS: &[&str] = &[
    "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "continue",
    "default", "do", "double", "else", "enum", "extends", "false", "final", "finally", "float",
    "for", "if", "implements", "import", "instanceof", "int", "interface", "long", "new", "null",
    "private", "protected", "public", "return", "short", "static", "super", "switch", "this",
    "throw", "throws", "true", "try", "void", "while", "color",
];

/// Completion candidates for the text `prefix` typed before the caret at
/// `file:line:col`.
pub fn completions(
    snapshot: &Snapshot,
    file: FileId,
    line: usize,
    col: usize,
    prefix: &str,
) -> Vec<CompletionCandidate> {
    let (Some(unit), Some(ast)) = (snapshot.unit.as_deref(), snapshot.ast.as_deref()) else {
        return Vec::new();
    };
    let Some(offset) = unit
        .mapper()
        .to_unit_position(file, line, col)
        .and_then(|(unit_line, unit_col)| unit.offset(unit_line, unit_col))
    else {
        return Vec::new();
    };

    let phrase = expand_sugar(trailing_expression(prefix)).text;
    let candidates = match split_receiver(&phrase) {
        (Some(receiver), member) => {
            let all = member.is_empty();
            member_candidates(snapshot, ast, offset, receiver)
                .into_iter()
                .filter(|c| all || starts_with_ignore_case(c.name(), member))
                .collect()
        }
        (None, word) if !word.is_empty() => scope_candidates(snapshot, ast, offset)
            .into_iter()
            .filter(|c| starts_with_ignore_case(c.name(), word))
            .collect(),
        (None, _) => Vec::new(),
    };
    let ranked = rank(candidates);
    tracing::debug!("[COMPLETE] {:?} → {} candidates", phrase, ranked.len());
    ranked
}

/// Drop repeated labels, keeping the innermost, and sort by kind then name.
fn rank(candidates: Vec<CompletionCandidate>) -> Vec<CompletionCandidate> {
    let mut seen = FxHashSet::default();
    let mut out: Vec<CompletionCandidate> = candidates
        .into_iter()
        .filter(|c| seen.insert(c.label.clone()))
        .collect();
    out.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    out
}

fn member_candidates(
    snapshot: &Snapshot,
    ast: &Ast,
    offset: TextSize,
    receiver: &str,
) -> Vec<CompletionCandidate> {
    let fragment = parse_expression(receiver).ast;
    let scope = FragmentScope::new(&fragment, ast, offset);
    let resolver = snapshot.resolver(&scope);
    let Some(receiver) = resolver.infer(fragment.root()) else {
        return Vec::new();
    };
    resolver
        .members(&receiver.ty)
        .iter()
        .filter(|member| !receiver.static_only || is_static(ast, member))
        .filter_map(|member| candidate(ast, member))
        .collect()
}

fn is_static(ast: &Ast, member: &Resolution) -> bool {
    match member {
        Resolution::Local(decl) => {
            decl.kind == DeclKind::Type
                || declared_modifiers(ast, decl.node).contains(Modifiers::STATIC)
        }
        Resolution::External(member) => member.is_static(),
        Resolution::Unresolved => false,
    }
}

fn scope_candidates(snapshot: &Snapshot, ast: &Ast, offset: TextSize) -> Vec<CompletionCandidate> {
    let scope = FragmentScope::new(ast, ast, offset);
    let resolver = snapshot.resolver(&scope);
    let start = WalkStart {
        node: scope.anchor(),
        offset,
    };
    let mut out: Vec<CompletionCandidate> = resolver
        .visible(start)
        .iter()
        .filter_map(|r| candidate(ast, r))
        .collect();

    if let Some(classes) = snapshot.classes.as_deref() {
        let imports = snapshot.unit.as_deref().map_or(&[][..], |u| &u.imports[..]);
        for import in imports.iter().filter(|i| !i.is_static && !i.is_wildcard()) {
            if let Some(class) = classes.class(&import.name) {
                out.push(external_type(&class.name, &class.package));
            }
        }
        let packages = snapshot
            .default_imports
            .iter()
            .map(|p| p.as_str())
            .chain([IMPLICIT_PACKAGE])
            .chain(imports.iter().filter(|i| !i.is_static && i.is_wildcard()).map(|i| i.package()));
        for package in packages {
            for class in classes.classes_in_package(package) {
                out.push(external_type(&class.name, &class.package));
            }
        }
    }
    out.extend(
        KEYWORDS
            .iter()
            .map(|k| CompletionCandidate::new(*k, CompletionKind::Keyword)),
    );
    out
}

fn external_type(name: &str, package: &str) -> CompletionCandidate {
    CompletionCandidate::new(name, CompletionKind::PredefinedType).with_detail(package)
}

/// Source text of a type node, for candidate details.
fn type_text(ast: &Ast, node: crate::parser::NodeId) -> String {
    match ast.kind(node) {
        NodeKind::PrimitiveType { prim, dims } => {
            format!("{}{}", prim.name(), "[]".repeat(*dims as usize))
        }
        NodeKind::TypeRef { name, args, dims, .. } => {
            let args = if args.is_empty() {
                String::new()
            } else {
                let inner: Vec<String> = args.iter().map(|a| type_text(ast, *a)).collect();
                format!("<{}>", inner.join(", "))
            };
            format!("{}{args}{}", name.text, "[]".repeat(*dims as usize))
        }
        NodeKind::Wildcard { .. } => "?".to_string(),
        _ => String::new(),
    }
}

fn candidate(ast: &Ast, resolution: &Resolution) -> Option<CompletionCandidate> {
    match resolution {
        Resolution::Local(decl) => Some(local_candidate(ast, decl)),
        Resolution::External(member) => Some(external_candidate(member)),
        Resolution::Unresolved => None,
    }
}

fn local_candidate(ast: &Ast, decl: &DeclarationNode) -> CompletionCandidate {
    let name = decl.name.as_str();
    match (decl.kind, ast.kind(decl.node)) {
        (DeclKind::Method, NodeKind::Method { ret, params, .. }) => {
            let shown: Vec<String> = params
                .iter()
                .filter_map(|p| match ast.kind(*p) {
                    NodeKind::Param { ty, name, varargs, .. } => Some(format!(
                        "{}{} {}",
                        type_text(ast, *ty),
                        if *varargs { "..." } else { "" },
                        name.text
                    )),
                    _ => None,
                })
                .collect();
            let insert = if params.is_empty() {
                format!("{name}()")
            } else {
                format!("{name}(")
            };
            CompletionCandidate::new(name, CompletionKind::Method)
                .with_label(format!("{name}({})", shown.join(", ")))
                .with_insert_text(insert)
                .with_detail(type_text(ast, *ret))
        }
        (DeclKind::Type, NodeKind::TypeDecl { kind, .. }) => {
            let detail = match kind {
                TypeDeclKind::Class => "class",
                TypeDeclKind::Interface => "interface",
                TypeDeclKind::Enum => "enum",
            };
            CompletionCandidate::new(name, CompletionKind::Type).with_detail(detail)
        }
        (DeclKind::TypeParameter, _) => {
            CompletionCandidate::new(name, CompletionKind::Type).with_detail("type parameter")
        }
        (DeclKind::Field, _) => {
            let candidate = CompletionCandidate::new(name, CompletionKind::Field);
            match variable_type(ast, decl) {
                Some(ty) => candidate.with_detail(ty),
                None => candidate,
            }
        }
        _ => {
            let candidate = CompletionCandidate::new(name, CompletionKind::Local);
            match variable_type(ast, decl) {
                Some(ty) => candidate.with_detail(ty),
                None => candidate,
            }
        }
    }
}

fn variable_type(ast: &Ast, decl: &DeclarationNode) -> Option<String> {
    match ast.kind(decl.node) {
        NodeKind::Param { ty, .. } => Some(type_text(ast, *ty)),
        NodeKind::VarDeclarator { dims, .. } => {
            let parent = ast.parent(decl.node)?;
            match ast.kind(parent) {
                NodeKind::Field { ty, .. } | NodeKind::LocalVar { ty, .. } => Some(format!(
                    "{}{}",
                    type_text(ast, *ty),
                    "[]".repeat(*dims as usize)
                )),
                _ => None,
            }
        }
        _ => None,
    }
}

fn simple(qualified: &str) -> &str {
    qualified.rsplit_once('.').map_or(qualified, |(_, name)| name)
}

fn external_candidate(member: &ExternalMember) -> CompletionCandidate {
    match member {
        ExternalMember::Class { qualified } => {
            let package = qualified.rsplit_once('.').map_or("", |(p, _)| p);
            external_type(simple(qualified), package)
        }
        ExternalMember::Method {
            class,
            name,
            return_type,
            ..
        } => CompletionCandidate::new(name.as_str(), CompletionKind::PredefinedMethod)
            .with_label(format!("{name}()"))
            .with_insert_text(format!("{name}("))
            .with_detail(format!("{} - {}", simple(return_type), simple(class))),
        ExternalMember::Field { class, name, ty, .. } => {
            let owner = if class.is_empty() { "array" } else { simple(class) };
            CompletionCandidate::new(name.as_str(), CompletionKind::PredefinedField)
                .with_detail(format!("{} - {owner}", simple(ty)))
        }
    }
}
