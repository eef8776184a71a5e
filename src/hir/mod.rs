//! High-level IR (HIR): declarations, name resolution and semantic checks.
//!
//! ## Key Types
//!
//! - [`DeclarationNode`]: A declaration in the Translated Unit's tree
//! - [`ScopeProvider`]: Supplies the trees a resolution walks
//! - [`Resolver`]: Role-directed name resolver over a [`ScopeProvider`]
//! - [`Diagnostic`]: A problem located in both the unit and a source file
//!
//! ## Layers
//!
//! ```text
//! check_sources(tabs)        ← curly quotes, unbalanced braces
//!     │
//!     ▼
//! parse(unit text)           ← arena AST
//!     │
//!     ▼
//! declarations / roles       ← what each name node declares or refers to
//!     │
//!     ▼
//! Resolver                   ← lexical walk → superclass chain → classpath
//!     │
//!     ▼
//! check_unit                 ← semantic diagnostics
//! ```

mod checker;
mod decl;
mod diagnostics;
mod resolve;
mod scope;
mod source_checks;

pub use checker::{SemanticChecker, check_unit};
pub use decl::{DeclKind, DeclKinds, DeclarationNode, declaration_of, declarations};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use resolve::{
    ExternalMember, Receiver, Resolution, ResolvedType, Resolver, Role, declared_modifiers,
    qualified_path, role_of, type_path,
};
pub use scope::{FragmentScope, ScopeProvider, TreeScope, WalkStart};
pub use source_checks::{check_sources, curly_quotes, missing_braces};
