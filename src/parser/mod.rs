//! Parser for the base language the translated unit is written in.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind (trivia included)
//!     ↓
//! Parser → arena Ast (NodeKind sum type) + SyntaxErrors
//!     ↓
//! HIR → declarations, scopes, resolution
//! ```
//!
//! The parser always produces a tree. Syntax problems are collected as
//! [`SyntaxError`]s and parsing resumes at the next statement or member.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod lexer;

pub use ast::{
    AssignOp, Ast, BinaryOp, LiteralKind, Modifiers, Name, Node, NodeId, NodeKind, Primitive,
    TypeDeclKind, UnaryOp,
};
pub use lexer::{Lexer, Token, TokenKind, literal_and_comment_ranges, tokenize};
pub use parser::{Parse, SyntaxError, parse, parse_expression};
