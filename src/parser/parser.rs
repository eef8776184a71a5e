//! Recursive descent parser for the base language
//!
//! Builds an arena [`Ast`] from tokens. Supports error recovery: every
//! problem is recorded as a [`SyntaxError`] and parsing carries on, so a
//! tree is always produced.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::ast::{
    AssignOp, Ast, AstBuilder, BinaryOp, LiteralKind, Modifiers, Name, NodeId, NodeKind,
    Primitive, TypeDeclKind, UnaryOp,
};
use super::lexer::{Lexer, Token, TokenKind};

/// Parse result containing the tree and any errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub ast: Ast,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse a whole compilation unit.
pub fn parse(input: &str) -> Parse {
    let mut parser = Parser::new(input);
    let root = parser.parse_compilation_unit();
    parser.finish(root)
}

/// Parse a standalone expression, such as the receiver text typed before
/// a `.` during completion. The expression is the root of the tree.
pub fn parse_expression(input: &str) -> Parse {
    let mut parser = Parser::new(input);
    let root = parser.parse_expr();
    if !parser.at_eof() {
        parser.error("unexpected input after expression");
    }
    parser.finish(root)
}

/// The parser state
struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    end: TextSize,
    prev_end: TextSize,
    builder: AstBuilder,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            tokens: Lexer::new(input).filter(|t| !t.kind.is_trivia()).collect(),
            pos: 0,
            end: TextSize::of(input),
            prev_end: TextSize::new(0),
            builder: AstBuilder::default(),
            errors: Vec::new(),
        }
    }

    fn finish(self, root: NodeId) -> Parse {
        Parse {
            ast: self.builder.finish(root),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn kind_at(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.nth(0) == Some(kind)
    }

    fn at_any(&self, kinds: &[TokenKind]) -> bool {
        self.nth(0).is_some_and(|k| kinds.contains(&k))
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn offset(&self) -> TextSize {
        self.current().map(|t| t.offset).unwrap_or(self.end)
    }

    /// Whether token `n` ahead starts exactly where token `n - 1` ends.
    fn adjacent(&self, n: usize) -> bool {
        match (self.tokens.get(self.pos + n - 1), self.tokens.get(self.pos + n)) {
            (Some(a), Some(b)) => a.range().end() == b.offset,
            _ => false,
        }
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.prev_end = token.range().end();
            self.pos += 1;
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {}", kind.describe()));
            false
        }
    }

    fn expect_name(&mut self) -> Name {
        match self.current() {
            Some(token) if token.kind == TokenKind::Ident => {
                let name = Name::new(token.text, token.range());
                self.bump();
                name
            }
            _ => {
                self.error("expected identifier");
                Name::new(SmolStr::default(), TextRange::empty(self.offset()))
            }
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        let (found, range) = match self.current() {
            Some(token) => (format!("`{}`", token.text), token.range()),
            None => ("end of input".to_string(), TextRange::empty(self.end)),
        };
        self.errors
            .push(SyntaxError::new(format!("{message}, found {found}"), range));
    }

    /// Skip to one of `recovery` (not consumed). Always consumes at least
    /// one token when not already at a recovery point.
    fn recover(&mut self, recovery: &[TokenKind]) {
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() && !self.at_any(recovery) {
            self.bump();
        }
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn node(&mut self, kind: NodeKind, start: TextSize) -> NodeId {
        let end = self.prev_end.max(start);
        self.builder.alloc(kind, TextRange::new(start, end))
    }

    fn start_of(&self, id: NodeId) -> TextSize {
        self.builder.range(id).start()
    }

    fn error_node(&mut self) -> NodeId {
        let at = self.offset();
        self.builder.alloc(NodeKind::Error, TextRange::empty(at))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_compilation_unit(&mut self) -> NodeId {
        let mut imports = Vec::new();
        let mut types = Vec::new();

        if self.at(TokenKind::PackageKw) {
            self.bump();
            self.parse_qualified_name();
            self.expect(TokenKind::Semicolon);
        }
        while self.at(TokenKind::ImportKw) {
            imports.push(self.parse_import());
        }
        while !self.at_eof() {
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            let pos_before = self.pos;
            let member_start = self.offset();
            let modifiers = self.parse_modifiers();
            if self.at_any(&[
                TokenKind::ClassKw,
                TokenKind::InterfaceKw,
                TokenKind::EnumKw,
            ]) {
                types.push(self.parse_type_decl(modifiers, member_start));
            } else {
                self.error("expected class, interface, or enum");
                self.recover(&[
                    TokenKind::ClassKw,
                    TokenKind::InterfaceKw,
                    TokenKind::EnumKw,
                ]);
            }
            if self.pos == pos_before {
                self.bump();
            }
        }
        self.builder.alloc(
            NodeKind::CompilationUnit { imports, types },
            TextRange::up_to(self.end),
        )
    }

    fn parse_qualified_name(&mut self) -> (SmolStr, bool) {
        let mut path = String::new();
        let mut wildcard = false;
        if let Some(token) = self.current().filter(|t| t.kind == TokenKind::Ident) {
            path.push_str(token.text);
            self.bump();
        } else {
            self.error("expected identifier");
            return (SmolStr::default(), false);
        }
        while self.at(TokenKind::Dot) {
            match self.nth(1) {
                Some(TokenKind::Ident) => {
                    self.bump();
                    if let Some(token) = self.current() {
                        path.push('.');
                        path.push_str(token.text);
                    }
                    self.bump();
                }
                Some(TokenKind::Star) => {
                    self.bump_n(2);
                    wildcard = true;
                    break;
                }
                _ => break,
            }
        }
        (SmolStr::new(path), wildcard)
    }

    fn parse_import(&mut self) -> NodeId {
        let start = self.offset();
        self.bump();
        let is_static = self.eat(TokenKind::StaticKw);
        let (path, wildcard) = self.parse_qualified_name();
        self.expect(TokenKind::Semicolon);
        self.node(
            NodeKind::Import {
                path,
                is_static,
                wildcard,
            },
            start,
        )
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        loop {
            let flag = match self.nth(0) {
                Some(TokenKind::PublicKw) => Modifiers::PUBLIC,
                Some(TokenKind::PrivateKw) => Modifiers::PRIVATE,
                Some(TokenKind::ProtectedKw) => Modifiers::PROTECTED,
                Some(TokenKind::StaticKw) => Modifiers::STATIC,
                Some(TokenKind::FinalKw) => Modifiers::FINAL,
                Some(TokenKind::AbstractKw) => Modifiers::ABSTRACT,
                Some(TokenKind::NativeKw) => Modifiers::NATIVE,
                Some(TokenKind::SynchronizedKw) if self.nth(1) != Some(TokenKind::LParen) => {
                    Modifiers::SYNCHRONIZED
                }
                Some(TokenKind::TransientKw) => Modifiers::TRANSIENT,
                Some(TokenKind::VolatileKw) => Modifiers::VOLATILE,
                Some(TokenKind::StrictfpKw) => Modifiers::STRICTFP,
                Some(TokenKind::DefaultKw) if self.nth(1) != Some(TokenKind::Colon) => {
                    Modifiers::DEFAULT
                }
                Some(TokenKind::At) if self.nth(1) == Some(TokenKind::Ident) => {
                    self.skip_annotation();
                    continue;
                }
                _ => return modifiers,
            };
            self.bump();
            modifiers |= flag;
        }
    }

    /// Annotations carry nothing the analysis needs.
    fn skip_annotation(&mut self) {
        self.bump();
        self.parse_qualified_name();
        if self.at(TokenKind::LParen) {
            let mut depth = 0usize;
            while let Some(kind) = self.nth(0) {
                self.bump();
                match kind {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn parse_type_decl(&mut self, modifiers: Modifiers, start: TextSize) -> NodeId {
        let kind = match self.nth(0) {
            Some(TokenKind::InterfaceKw) => TypeDeclKind::Interface,
            Some(TokenKind::EnumKw) => TypeDeclKind::Enum,
            _ => TypeDeclKind::Class,
        };
        self.bump();
        let name = self.expect_name();
        let type_params = if self.at(TokenKind::Lt) {
            self.parse_type_params()
        } else {
            Vec::new()
        };
        let mut extends = Vec::new();
        let mut implements = Vec::new();
        if self.eat(TokenKind::ExtendsKw) {
            extends = self.parse_type_list();
        }
        if self.eat(TokenKind::ImplementsKw) {
            implements = self.parse_type_list();
        }

        let mut members = Vec::new();
        if self.expect(TokenKind::LBrace) {
            if kind == TypeDeclKind::Enum {
                members.extend(self.parse_enum_constants());
            }
            members.extend(self.parse_class_body_members());
            self.expect(TokenKind::RBrace);
        }

        self.node(
            NodeKind::TypeDecl {
                kind,
                modifiers,
                name,
                type_params,
                extends,
                implements,
                members,
            },
            start,
        )
    }

    fn parse_type_list(&mut self) -> Vec<NodeId> {
        let mut types = Vec::new();
        loop {
            match self.parse_type() {
                Some(ty) => types.push(ty),
                None => break,
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        types
    }

    fn parse_type_params(&mut self) -> Vec<NodeId> {
        let mut params = Vec::new();
        self.bump();
        loop {
            let start = self.offset();
            let name = self.expect_name();
            let mut bounds = Vec::new();
            if self.eat(TokenKind::ExtendsKw) {
                loop {
                    match self.parse_type() {
                        Some(bound) => bounds.push(bound),
                        None => break,
                    }
                    if !self.eat(TokenKind::Amp) {
                        break;
                    }
                }
            }
            params.push(self.node(NodeKind::TypeParam { name, bounds }, start));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt);
        params
    }

    fn parse_enum_constants(&mut self) -> Vec<NodeId> {
        let mut constants = Vec::new();
        while self.at(TokenKind::Ident) || self.at(TokenKind::At) {
            self.parse_modifiers();
            let start = self.offset();
            let name = self.expect_name();
            let args = if self.at(TokenKind::LParen) {
                self.parse_args()
            } else {
                Vec::new()
            };
            let body = if self.eat(TokenKind::LBrace) {
                let body = self.parse_class_body_members();
                self.expect(TokenKind::RBrace);
                body
            } else {
                Vec::new()
            };
            constants.push(self.node(NodeKind::EnumConstant { name, args, body }, start));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.eat(TokenKind::Semicolon);
        constants
    }

    /// Members up to (not including) the closing brace.
    fn parse_class_body_members(&mut self) -> Vec<NodeId> {
        let mut members = Vec::new();
        while !self.at_eof() && !self.at(TokenKind::RBrace) {
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            let pos_before = self.pos;
            if let Some(member) = self.parse_member() {
                members.push(member);
            }
            if self.pos == pos_before {
                self.error("expected member declaration");
                self.bump();
            }
        }
        members
    }

    fn parse_member(&mut self) -> Option<NodeId> {
        let start = self.offset();
        if self.at(TokenKind::LBrace) {
            let body = self.parse_block();
            return Some(self.node(
                NodeKind::Initializer {
                    is_static: false,
                    body,
                },
                start,
            ));
        }
        if self.at(TokenKind::StaticKw) && self.nth(1) == Some(TokenKind::LBrace) {
            self.bump();
            let body = self.parse_block();
            return Some(self.node(
                NodeKind::Initializer {
                    is_static: true,
                    body,
                },
                start,
            ));
        }

        let modifiers = self.parse_modifiers();
        if self.at_any(&[
            TokenKind::ClassKw,
            TokenKind::InterfaceKw,
            TokenKind::EnumKw,
        ]) {
            return Some(self.parse_type_decl(modifiers, start));
        }

        let type_params = if self.at(TokenKind::Lt) {
            self.parse_type_params()
        } else {
            Vec::new()
        };

        if self.at(TokenKind::Ident) && self.nth(1) == Some(TokenKind::LParen) {
            let name = self.expect_name();
            let params = self.parse_params();
            let throws = self.parse_throws();
            let body = if self.at(TokenKind::LBrace) {
                self.parse_block()
            } else {
                self.error("expected constructor body");
                self.recover(&[TokenKind::Semicolon, TokenKind::RBrace]);
                self.eat(TokenKind::Semicolon);
                self.error_node()
            };
            return Some(self.node(
                NodeKind::Constructor {
                    modifiers,
                    name,
                    params,
                    throws,
                    body,
                },
                start,
            ));
        }

        let ty = if self.at(TokenKind::VoidKw) {
            let void_start = self.offset();
            self.bump();
            self.node(
                NodeKind::PrimitiveType {
                    prim: Primitive::Void,
                    dims: 0,
                },
                void_start,
            )
        } else {
            match self.parse_type() {
                Some(ty) => ty,
                None => {
                    self.recover(&[TokenKind::Semicolon, TokenKind::RBrace]);
                    self.eat(TokenKind::Semicolon);
                    return None;
                }
            }
        };

        let name = self.expect_name();
        if self.at(TokenKind::LParen) {
            let params = self.parse_params();
            self.skip_dims();
            let throws = self.parse_throws();
            let body = if self.at(TokenKind::LBrace) {
                Some(self.parse_block())
            } else {
                self.expect(TokenKind::Semicolon);
                None
            };
            return Some(self.node(
                NodeKind::Method {
                    modifiers,
                    type_params,
                    ret: ty,
                    name,
                    params,
                    throws,
                    body,
                },
                start,
            ));
        }

        let declarators = self.parse_declarators(name);
        if !self.expect(TokenKind::Semicolon) {
            self.recover(&[TokenKind::Semicolon, TokenKind::RBrace]);
            self.eat(TokenKind::Semicolon);
        }
        Some(self.node(
            NodeKind::Field {
                modifiers,
                ty,
                declarators,
            },
            start,
        ))
    }

    fn parse_params(&mut self) -> Vec<NodeId> {
        let mut params = Vec::new();
        self.bump();
        if !self.at(TokenKind::RParen) {
            loop {
                let start = self.offset();
                let modifiers = self.parse_modifiers();
                let Some(ty) = self.parse_type() else {
                    break;
                };
                let varargs = self.eat(TokenKind::Ellipsis);
                let name = self.expect_name();
                self.skip_dims();
                params.push(self.node(
                    NodeKind::Param {
                        modifiers,
                        ty,
                        name,
                        varargs,
                    },
                    start,
                ));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        if !self.expect(TokenKind::RParen) {
            self.recover(&[TokenKind::RParen, TokenKind::LBrace, TokenKind::Semicolon]);
            self.eat(TokenKind::RParen);
        }
        params
    }

    fn parse_throws(&mut self) -> Vec<NodeId> {
        if self.eat(TokenKind::ThrowsKw) {
            self.parse_type_list()
        } else {
            Vec::new()
        }
    }

    fn parse_declarators(&mut self, first: Name) -> Vec<NodeId> {
        let mut declarators = Vec::new();
        let mut name = first;
        loop {
            let start = name.range.start();
            let dims = self.parse_dims();
            let init = if self.eat(TokenKind::Eq) {
                Some(self.parse_var_init())
            } else {
                None
            };
            declarators.push(self.node(NodeKind::VarDeclarator { name, dims, init }, start));
            if !self.eat(TokenKind::Comma) {
                break;
            }
            name = self.expect_name();
        }
        declarators
    }

    fn parse_var_init(&mut self) -> NodeId {
        if self.at(TokenKind::LBrace) {
            self.parse_array_init()
        } else {
            self.parse_expr()
        }
    }

    fn parse_array_init(&mut self) -> NodeId {
        let start = self.offset();
        self.bump();
        let mut elements = Vec::new();
        while !self.at_eof() && !self.at(TokenKind::RBrace) {
            elements.push(self.parse_var_init());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace);
        self.node(NodeKind::ArrayInit { elements }, start)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_dims(&mut self) -> u8 {
        let mut dims = 0u8;
        while self.at(TokenKind::LBracket) && self.nth(1) == Some(TokenKind::RBracket) {
            self.bump_n(2);
            dims = dims.saturating_add(1);
        }
        dims
    }

    fn skip_dims(&mut self) {
        self.parse_dims();
    }

    fn parse_type(&mut self) -> Option<NodeId> {
        self.parse_type_inner(true)
    }

    fn parse_type_inner(&mut self, allow_dims: bool) -> Option<NodeId> {
        let start = self.offset();
        if let Some(prim) = self.nth(0).and_then(primitive_of) {
            self.bump();
            let dims = if allow_dims { self.parse_dims() } else { 0 };
            return Some(self.node(NodeKind::PrimitiveType { prim, dims }, start));
        }
        if !self.at(TokenKind::Ident) {
            self.error("expected type");
            return None;
        }

        let mut segments = Vec::new();
        loop {
            let name = self.expect_name();
            let args = if self.at(TokenKind::Lt) {
                self.parse_type_args()
            } else {
                Vec::new()
            };
            segments.push((name, args, self.prev_end));
            if self.at(TokenKind::Dot) && self.nth(1) == Some(TokenKind::Ident) {
                self.bump();
            } else {
                break;
            }
        }
        let dims = if allow_dims { self.parse_dims() } else { 0 };

        let last = segments.len() - 1;
        let mut qualifier = None;
        for (i, (name, args, end)) in segments.into_iter().enumerate() {
            let (dims, end) = if i == last {
                (dims, self.prev_end)
            } else {
                (0, end)
            };
            let id = self.builder.alloc(
                NodeKind::TypeRef {
                    qualifier,
                    name,
                    args,
                    dims,
                },
                TextRange::new(start, end),
            );
            qualifier = Some(id);
        }
        qualifier
    }

    fn parse_type_args(&mut self) -> Vec<NodeId> {
        let mut args = Vec::new();
        self.bump();
        if self.eat(TokenKind::Gt) {
            // diamond
            return args;
        }
        loop {
            if self.at(TokenKind::Question) {
                let start = self.offset();
                self.bump();
                let bound = if self.eat(TokenKind::ExtendsKw) || self.eat(TokenKind::SuperKw) {
                    self.parse_type()
                } else {
                    None
                };
                args.push(self.node(NodeKind::Wildcard { bound }, start));
            } else {
                match self.parse_type() {
                    Some(ty) => args.push(ty),
                    None => break,
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt);
        args
    }

    /// Token index just past a type starting at `index`, without consuming.
    fn scan_type(&self, mut index: usize) -> Option<usize> {
        match self.kind_at(index)? {
            kind if kind.is_primitive_type() => index += 1,
            TokenKind::Ident => {
                index += 1;
                loop {
                    if self.kind_at(index) == Some(TokenKind::Lt) {
                        index = self.scan_type_args(index)?;
                    }
                    if self.kind_at(index) == Some(TokenKind::Dot)
                        && self.kind_at(index + 1) == Some(TokenKind::Ident)
                    {
                        index += 2;
                    } else {
                        break;
                    }
                }
            }
            _ => return None,
        }
        while self.kind_at(index) == Some(TokenKind::LBracket)
            && self.kind_at(index + 1) == Some(TokenKind::RBracket)
        {
            index += 2;
        }
        Some(index)
    }

    fn scan_type_args(&self, mut index: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            let kind = self.kind_at(index)?;
            index += 1;
            match kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                TokenKind::Ident
                | TokenKind::Dot
                | TokenKind::Comma
                | TokenKind::Question
                | TokenKind::ExtendsKw
                | TokenKind::SuperKw
                | TokenKind::Amp
                | TokenKind::LBracket
                | TokenKind::RBracket => {}
                kind if kind.is_primitive_type() => {}
                _ => return None,
            }
        }
    }

    /// `Type name` followed by something a declaration can continue with.
    fn looks_like_local_var(&self) -> bool {
        let mut index = self.pos;
        while let Some(kind) = self.kind_at(index) {
            if kind == TokenKind::FinalKw {
                index += 1;
            } else if kind == TokenKind::At && self.kind_at(index + 1) == Some(TokenKind::Ident) {
                return true;
            } else {
                break;
            }
        }
        let Some(after_type) = self.scan_type(index) else {
            return false;
        };
        self.kind_at(after_type) == Some(TokenKind::Ident)
            && matches!(
                self.kind_at(after_type + 1),
                Some(
                    TokenKind::Eq
                        | TokenKind::Semicolon
                        | TokenKind::Comma
                        | TokenKind::LBracket
                        | TokenKind::Colon
                )
            )
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> NodeId {
        let start = self.offset();
        self.expect(TokenKind::LBrace);
        let mut stmts = Vec::new();
        while !self.at_eof() && !self.at(TokenKind::RBrace) {
            let pos_before = self.pos;
            stmts.push(self.parse_statement());
            if self.pos == pos_before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace);
        self.node(NodeKind::Block { stmts }, start)
    }

    fn parse_statement(&mut self) -> NodeId {
        let start = self.offset();
        match self.nth(0) {
            Some(TokenKind::LBrace) => self.parse_block(),
            Some(TokenKind::Semicolon) => {
                self.bump();
                self.node(NodeKind::Empty, start)
            }
            Some(TokenKind::IfKw) => {
                self.bump();
                let cond = self.parse_paren_condition();
                let then_branch = self.parse_statement();
                let else_branch = if self.eat(TokenKind::ElseKw) {
                    Some(self.parse_statement())
                } else {
                    None
                };
                self.node(
                    NodeKind::If {
                        cond,
                        then_branch,
                        else_branch,
                    },
                    start,
                )
            }
            Some(TokenKind::WhileKw) => {
                self.bump();
                let cond = self.parse_paren_condition();
                let body = self.parse_statement();
                self.node(NodeKind::While { cond, body }, start)
            }
            Some(TokenKind::DoKw) => {
                self.bump();
                let body = self.parse_statement();
                self.expect(TokenKind::WhileKw);
                let cond = self.parse_paren_condition();
                self.expect(TokenKind::Semicolon);
                self.node(NodeKind::DoWhile { body, cond }, start)
            }
            Some(TokenKind::ForKw) => self.parse_for(start),
            Some(TokenKind::SwitchKw) => self.parse_switch(start),
            Some(TokenKind::TryKw) => self.parse_try(start),
            Some(TokenKind::ReturnKw) => {
                self.bump();
                let value = if self.at(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr())
                };
                self.expect_statement_end();
                self.node(NodeKind::Return { value }, start)
            }
            Some(TokenKind::ThrowKw) => {
                self.bump();
                let value = self.parse_expr();
                self.expect_statement_end();
                self.node(NodeKind::Throw { value }, start)
            }
            Some(kind @ (TokenKind::BreakKw | TokenKind::ContinueKw)) => {
                self.bump();
                let label = if self.at(TokenKind::Ident) {
                    Some(self.expect_name())
                } else {
                    None
                };
                self.expect_statement_end();
                let node = if kind == TokenKind::BreakKw {
                    NodeKind::Break { label }
                } else {
                    NodeKind::Continue { label }
                };
                self.node(node, start)
            }
            Some(TokenKind::SynchronizedKw) => {
                self.bump();
                let lock = self.parse_paren_condition();
                let body = self.parse_block();
                self.node(NodeKind::Synchronized { lock, body }, start)
            }
            Some(TokenKind::AssertKw) => {
                self.bump();
                let cond = self.parse_expr();
                let message = if self.eat(TokenKind::Colon) {
                    Some(self.parse_expr())
                } else {
                    None
                };
                self.expect_statement_end();
                self.node(NodeKind::Assert { cond, message }, start)
            }
            Some(TokenKind::Ident) if self.nth(1) == Some(TokenKind::Colon) => {
                let label = self.expect_name();
                self.bump();
                let body = self.parse_statement();
                self.node(NodeKind::Labeled { label, body }, start)
            }
            Some(
                TokenKind::ClassKw
                | TokenKind::InterfaceKw
                | TokenKind::EnumKw
                | TokenKind::AbstractKw
                | TokenKind::StaticKw,
            ) => {
                let modifiers = self.parse_modifiers();
                if self.at_any(&[
                    TokenKind::ClassKw,
                    TokenKind::InterfaceKw,
                    TokenKind::EnumKw,
                ]) {
                    self.parse_type_decl(modifiers, start)
                } else {
                    self.error("expected class declaration");
                    self.recover(&[TokenKind::Semicolon, TokenKind::RBrace]);
                    self.eat(TokenKind::Semicolon);
                    self.node(NodeKind::Error, start)
                }
            }
            Some(TokenKind::FinalKw)
                if matches!(self.nth(1), Some(TokenKind::ClassKw)) =>
            {
                let modifiers = self.parse_modifiers();
                self.parse_type_decl(modifiers, start)
            }
            _ if self.looks_like_local_var() => {
                let local = self.parse_local_var(start);
                self.expect_statement_end();
                local
            }
            _ => {
                let expr = self.parse_expr();
                if matches!(self.builder_kind(expr), NodeKind::Error) {
                    self.recover(&[TokenKind::Semicolon, TokenKind::RBrace]);
                    self.eat(TokenKind::Semicolon);
                    return self.node(NodeKind::Error, start);
                }
                self.expect_statement_end();
                self.node(NodeKind::ExprStmt { expr }, start)
            }
        }
    }

    fn builder_kind(&self, id: NodeId) -> &NodeKind {
        self.builder.kind(id)
    }

    fn expect_statement_end(&mut self) {
        self.expect(TokenKind::Semicolon);
    }

    fn parse_paren_condition(&mut self) -> NodeId {
        self.expect(TokenKind::LParen);
        let cond = self.parse_expr();
        if !self.expect(TokenKind::RParen) {
            self.recover(&[TokenKind::RParen, TokenKind::LBrace, TokenKind::Semicolon]);
            self.eat(TokenKind::RParen);
        }
        cond
    }

    fn parse_local_var(&mut self, start: TextSize) -> NodeId {
        let modifiers = self.parse_modifiers();
        let ty = match self.parse_type() {
            Some(ty) => ty,
            None => self.error_node(),
        };
        let name = self.expect_name();
        let declarators = self.parse_declarators(name);
        self.node(
            NodeKind::LocalVar {
                modifiers,
                ty,
                declarators,
            },
            start,
        )
    }

    fn parse_for(&mut self, start: TextSize) -> NodeId {
        self.bump();
        self.expect(TokenKind::LParen);

        let mut init = Vec::new();
        if self.looks_like_local_var() {
            let var_start = self.offset();
            let modifiers = self.parse_modifiers();
            let ty = match self.parse_type() {
                Some(ty) => ty,
                None => self.error_node(),
            };
            let name = self.expect_name();
            if self.at(TokenKind::Colon) {
                let decl_start = name.range.start();
                let declarator = self.node(
                    NodeKind::VarDeclarator {
                        name,
                        dims: 0,
                        init: None,
                    },
                    decl_start,
                );
                let var = self.node(
                    NodeKind::LocalVar {
                        modifiers,
                        ty,
                        declarators: vec![declarator],
                    },
                    var_start,
                );
                self.bump();
                let iterable = self.parse_expr();
                self.expect(TokenKind::RParen);
                let body = self.parse_statement();
                return self.node(
                    NodeKind::ForEach {
                        var,
                        iterable,
                        body,
                    },
                    start,
                );
            }
            let declarators = self.parse_declarators(name);
            init.push(self.node(
                NodeKind::LocalVar {
                    modifiers,
                    ty,
                    declarators,
                },
                var_start,
            ));
        } else {
            init = self.parse_expr_list(TokenKind::Semicolon);
        }
        self.expect(TokenKind::Semicolon);
        let cond = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect(TokenKind::Semicolon);
        let update = self.parse_expr_list(TokenKind::RParen);
        if !self.expect(TokenKind::RParen) {
            self.recover(&[TokenKind::RParen, TokenKind::LBrace]);
            self.eat(TokenKind::RParen);
        }
        let body = self.parse_statement();
        self.node(
            NodeKind::For {
                init,
                cond,
                update,
                body,
            },
            start,
        )
    }

    fn parse_expr_list(&mut self, terminator: TokenKind) -> Vec<NodeId> {
        let mut exprs = Vec::new();
        if self.at(terminator) {
            return exprs;
        }
        loop {
            exprs.push(self.parse_expr());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        exprs
    }

    fn parse_switch(&mut self, start: TextSize) -> NodeId {
        self.bump();
        let selector = self.parse_paren_condition();
        let mut cases = Vec::new();
        self.expect(TokenKind::LBrace);
        while !self.at_eof() && !self.at(TokenKind::RBrace) {
            let case_start = self.offset();
            let mut labels = Vec::new();
            if self.eat(TokenKind::CaseKw) {
                labels.push(self.parse_expr());
                self.expect(TokenKind::Colon);
            } else if self.eat(TokenKind::DefaultKw) {
                self.expect(TokenKind::Colon);
            } else {
                self.error("expected `case` or `default`");
                self.recover(&[TokenKind::CaseKw, TokenKind::DefaultKw, TokenKind::RBrace]);
                continue;
            }
            let mut body = Vec::new();
            while !self.at_eof()
                && !self.at_any(&[TokenKind::CaseKw, TokenKind::DefaultKw, TokenKind::RBrace])
            {
                let pos_before = self.pos;
                body.push(self.parse_statement());
                if self.pos == pos_before {
                    self.bump();
                }
            }
            cases.push(self.node(NodeKind::SwitchCase { labels, body }, case_start));
        }
        self.expect(TokenKind::RBrace);
        self.node(NodeKind::Switch { selector, cases }, start)
    }

    fn parse_try(&mut self, start: TextSize) -> NodeId {
        self.bump();
        let body = self.parse_block();
        let mut catches = Vec::new();
        while self.at(TokenKind::CatchKw) {
            let catch_start = self.offset();
            self.bump();
            self.expect(TokenKind::LParen);
            let param_start = self.offset();
            let modifiers = self.parse_modifiers();
            let ty = match self.parse_type() {
                Some(ty) => ty,
                None => self.error_node(),
            };
            while self.eat(TokenKind::Pipe) {
                self.parse_type();
            }
            let name = self.expect_name();
            let param = self.node(
                NodeKind::Param {
                    modifiers,
                    ty,
                    name,
                    varargs: false,
                },
                param_start,
            );
            self.expect(TokenKind::RParen);
            let catch_body = self.parse_block();
            catches.push(self.node(
                NodeKind::Catch {
                    param,
                    body: catch_body,
                },
                catch_start,
            ));
        }
        let finally = if self.eat(TokenKind::FinallyKw) {
            Some(self.parse_block())
        } else {
            None
        };
        if catches.is_empty() && finally.is_none() {
            self.error("expected `catch` or `finally`");
        }
        self.node(
            NodeKind::Try {
                body,
                catches,
                finally,
            },
            start,
        )
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) -> NodeId {
        let start = self.offset();
        let target = self.parse_ternary();
        if let Some((op, len)) = self.peek_assign_op() {
            self.bump_n(len);
            let value = self.parse_expr();
            return self.node(NodeKind::Assign { op, target, value }, start);
        }
        target
    }

    fn parse_ternary(&mut self) -> NodeId {
        let cond = self.parse_binary(1);
        if !self.eat(TokenKind::Question) {
            return cond;
        }
        let start = self.start_of(cond);
        let then_value = self.parse_expr();
        self.expect(TokenKind::Colon);
        let else_value = self.parse_ternary();
        self.node(
            NodeKind::Ternary {
                cond,
                then_value,
                else_value,
            },
            start,
        )
    }

    fn parse_binary(&mut self, min_prec: u8) -> NodeId {
        let mut lhs = self.parse_unary();
        loop {
            if self.at(TokenKind::InstanceofKw) {
                if INSTANCEOF_PREC < min_prec {
                    break;
                }
                self.bump();
                let start = self.start_of(lhs);
                let ty = match self.parse_type() {
                    Some(ty) => ty,
                    None => self.error_node(),
                };
                lhs = self.node(NodeKind::InstanceOf { expr: lhs, ty }, start);
                continue;
            }
            let Some((op, prec, len)) = self.peek_binary_op() else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.bump_n(len);
            let rhs = self.parse_binary(prec + 1);
            let start = self.start_of(lhs);
            lhs = self.node(NodeKind::Binary { op, lhs, rhs }, start);
        }
        lhs
    }

    fn peek_binary_op(&self) -> Option<(BinaryOp, u8, usize)> {
        let kind = self.nth(0)?;
        let (op, len) = match kind {
            TokenKind::PipePipe => (BinaryOp::Or, 1),
            TokenKind::AmpAmp => (BinaryOp::And, 1),
            TokenKind::Pipe => (BinaryOp::BitOr, 1),
            TokenKind::Caret => (BinaryOp::BitXor, 1),
            TokenKind::Amp => (BinaryOp::BitAnd, 1),
            TokenKind::EqEq => (BinaryOp::Eq, 1),
            TokenKind::BangEq => (BinaryOp::Ne, 1),
            TokenKind::Lt => (BinaryOp::Lt, 1),
            TokenKind::LtEq => (BinaryOp::Le, 1),
            TokenKind::GtEq => (BinaryOp::Ge, 1),
            TokenKind::Shl => (BinaryOp::Shl, 1),
            TokenKind::Plus => (BinaryOp::Add, 1),
            TokenKind::Minus => (BinaryOp::Sub, 1),
            TokenKind::Star => (BinaryOp::Mul, 1),
            TokenKind::Slash => (BinaryOp::Div, 1),
            TokenKind::Percent => (BinaryOp::Rem, 1),
            TokenKind::Gt => match self.gt_run() {
                GtRun::Single => (BinaryOp::Gt, 1),
                GtRun::Shr => (BinaryOp::Shr, 2),
                GtRun::UShr => (BinaryOp::UShr, 3),
                GtRun::Assign(..) => return None,
            },
            _ => return None,
        };
        let prec = match op {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::BitOr => 3,
            BinaryOp::BitXor => 4,
            BinaryOp::BitAnd => 5,
            BinaryOp::Eq | BinaryOp::Ne => 6,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => INSTANCEOF_PREC,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 8,
            BinaryOp::Add | BinaryOp::Sub => 9,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 10,
        };
        Some((op, prec, len))
    }

    fn peek_assign_op(&self) -> Option<(AssignOp, usize)> {
        let op = match self.nth(0)? {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Rem,
            TokenKind::AmpEq => AssignOp::BitAnd,
            TokenKind::PipeEq => AssignOp::BitOr,
            TokenKind::CaretEq => AssignOp::BitXor,
            TokenKind::ShlEq => AssignOp::Shl,
            TokenKind::Gt => match self.gt_run() {
                GtRun::Assign(op, len) => return Some((op, len)),
                _ => return None,
            },
            _ => return None,
        };
        Some((op, 1))
    }

    /// Classify a run of adjacent `>` tokens starting at the current one.
    fn gt_run(&self) -> GtRun {
        let second = self.adjacent(1).then(|| self.nth(1)).flatten();
        match second {
            Some(TokenKind::GtEq) => GtRun::Assign(AssignOp::Shr, 2),
            Some(TokenKind::Gt) => {
                let third = self.adjacent(2).then(|| self.nth(2)).flatten();
                match third {
                    Some(TokenKind::GtEq) => GtRun::Assign(AssignOp::UShr, 3),
                    Some(TokenKind::Gt) => GtRun::UShr,
                    _ => GtRun::Shr,
                }
            }
            _ => GtRun::Single,
        }
    }

    fn parse_unary(&mut self) -> NodeId {
        let start = self.offset();
        let op = match self.nth(0) {
            Some(TokenKind::PlusPlus) => Some(UnaryOp::PreInc),
            Some(TokenKind::MinusMinus) => Some(UnaryOp::PreDec),
            Some(TokenKind::Plus) => Some(UnaryOp::Plus),
            Some(TokenKind::Minus) => Some(UnaryOp::Neg),
            Some(TokenKind::Bang) => Some(UnaryOp::Not),
            Some(TokenKind::Tilde) => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let operand = self.parse_unary();
            return self.node(NodeKind::Unary { op, operand }, start);
        }
        if self.at(TokenKind::LParen) && self.is_cast() {
            self.bump();
            let ty = match self.parse_type() {
                Some(ty) => ty,
                None => self.error_node(),
            };
            self.expect(TokenKind::RParen);
            let expr = self.parse_unary();
            return self.node(NodeKind::Cast { ty, expr }, start);
        }
        let primary = self.parse_primary();
        self.parse_postfix(primary)
    }

    fn is_cast(&self) -> bool {
        let Some(after_type) = self.scan_type(self.pos + 1) else {
            return false;
        };
        if self.kind_at(after_type) != Some(TokenKind::RParen) {
            return false;
        }
        if self.kind_at(self.pos + 1).is_some_and(TokenKind::is_primitive_type) {
            return true;
        }
        match self.kind_at(after_type + 1) {
            Some(kind) => {
                kind.is_literal()
                    || matches!(
                        kind,
                        TokenKind::Ident
                            | TokenKind::LParen
                            | TokenKind::Bang
                            | TokenKind::Tilde
                            | TokenKind::ThisKw
                            | TokenKind::SuperKw
                            | TokenKind::NewKw
                    )
            }
            None => false,
        }
    }

    fn parse_postfix(&mut self, mut expr: NodeId) -> NodeId {
        loop {
            let start = self.start_of(expr);
            match self.nth(0) {
                Some(TokenKind::Dot) => match self.nth(1) {
                    Some(TokenKind::Ident) => {
                        self.bump();
                        let name = self.expect_name();
                        expr = if self.at(TokenKind::LParen) {
                            let args = self.parse_args();
                            self.node(
                                NodeKind::Call {
                                    receiver: Some(expr),
                                    name,
                                    args,
                                },
                                start,
                            )
                        } else {
                            self.node(
                                NodeKind::FieldAccess {
                                    receiver: expr,
                                    name,
                                },
                                start,
                            )
                        };
                    }
                    Some(TokenKind::ClassKw) => {
                        self.bump_n(2);
                        expr = self.node(NodeKind::ClassLit { ty: expr }, start);
                    }
                    Some(TokenKind::ThisKw) => {
                        self.bump_n(2);
                        expr = self.node(NodeKind::This, start);
                    }
                    _ => {
                        self.bump();
                        self.error("expected identifier");
                        return expr;
                    }
                },
                Some(TokenKind::LBracket) => {
                    self.bump();
                    let index = self.parse_expr();
                    self.expect(TokenKind::RBracket);
                    expr = self.node(NodeKind::Index { base: expr, index }, start);
                }
                Some(TokenKind::PlusPlus) => {
                    self.bump();
                    expr = self.node(
                        NodeKind::Unary {
                            op: UnaryOp::PostInc,
                            operand: expr,
                        },
                        start,
                    );
                }
                Some(TokenKind::MinusMinus) => {
                    self.bump();
                    expr = self.node(
                        NodeKind::Unary {
                            op: UnaryOp::PostDec,
                            operand: expr,
                        },
                        start,
                    );
                }
                _ => return expr,
            }
        }
    }

    fn parse_args(&mut self) -> Vec<NodeId> {
        self.bump();
        let args = self.parse_expr_list(TokenKind::RParen);
        if !self.expect(TokenKind::RParen) {
            self.recover(&[TokenKind::RParen, TokenKind::Semicolon, TokenKind::RBrace]);
            self.eat(TokenKind::RParen);
        }
        args
    }

    fn parse_primary(&mut self) -> NodeId {
        let start = self.offset();
        let Some(token) = self.current() else {
            self.error("expected expression");
            return self.error_node();
        };
        let kind = token.kind;
        let text = token.text;
        match kind {
            TokenKind::IntLit | TokenKind::FloatLit => {
                let prim = number_type(kind, text);
                self.bump();
                self.node(
                    NodeKind::Literal {
                        kind: LiteralKind::Number(prim),
                    },
                    start,
                )
            }
            TokenKind::StringLit | TokenKind::CharLit | TokenKind::TrueKw
            | TokenKind::FalseKw | TokenKind::NullKw => {
                let literal = match kind {
                    TokenKind::StringLit => LiteralKind::String,
                    TokenKind::CharLit => LiteralKind::Char,
                    TokenKind::NullKw => LiteralKind::Null,
                    _ => LiteralKind::Bool,
                };
                self.bump();
                self.node(NodeKind::Literal { kind: literal }, start)
            }
            TokenKind::ThisKw | TokenKind::SuperKw => {
                self.bump();
                let is_super = kind == TokenKind::SuperKw;
                if self.at(TokenKind::LParen) {
                    let args = self.parse_args();
                    self.node(NodeKind::ExplicitCtorCall { is_super, args }, start)
                } else if is_super {
                    self.node(NodeKind::Super, start)
                } else {
                    self.node(NodeKind::This, start)
                }
            }
            TokenKind::Ident => {
                let name = self.expect_name();
                if self.at(TokenKind::LParen) {
                    let args = self.parse_args();
                    self.node(
                        NodeKind::Call {
                            receiver: None,
                            name,
                            args,
                        },
                        start,
                    )
                } else {
                    self.node(NodeKind::Name { name }, start)
                }
            }
            TokenKind::LParen => {
                self.bump();
                let expr = self.parse_expr();
                self.expect(TokenKind::RParen);
                self.node(NodeKind::Paren { expr }, start)
            }
            TokenKind::NewKw => self.parse_creator(start),
            TokenKind::LBrace => self.parse_array_init(),
            kind if kind.is_primitive_type() || kind == TokenKind::VoidKw => {
                let ty = if kind == TokenKind::VoidKw {
                    self.bump();
                    self.node(
                        NodeKind::PrimitiveType {
                            prim: Primitive::Void,
                            dims: 0,
                        },
                        start,
                    )
                } else {
                    match self.parse_type() {
                        Some(ty) => ty,
                        None => self.error_node(),
                    }
                };
                if self.at(TokenKind::Dot) && self.nth(1) == Some(TokenKind::ClassKw) {
                    self.bump_n(2);
                    self.node(NodeKind::ClassLit { ty }, start)
                } else {
                    self.error("expected `.class`");
                    self.node(NodeKind::Error, start)
                }
            }
            _ => {
                self.error("expected expression");
                self.error_node()
            }
        }
    }

    fn parse_creator(&mut self, start: TextSize) -> NodeId {
        self.bump();
        let ty = match self.parse_type_inner(false) {
            Some(ty) => ty,
            None => return self.node(NodeKind::Error, start),
        };
        if self.at(TokenKind::LBracket) {
            let mut dims = Vec::new();
            let mut extra_dims = 0u8;
            while self.eat(TokenKind::LBracket) {
                if self.eat(TokenKind::RBracket) {
                    extra_dims = extra_dims.saturating_add(1);
                    continue;
                }
                dims.push(self.parse_expr());
                self.expect(TokenKind::RBracket);
            }
            let init = if self.at(TokenKind::LBrace) {
                Some(self.parse_array_init())
            } else {
                None
            };
            return self.node(
                NodeKind::NewArray {
                    elem: ty,
                    dims,
                    extra_dims,
                    init,
                },
                start,
            );
        }
        let args = if self.at(TokenKind::LParen) {
            self.parse_args()
        } else {
            self.error("expected `(`");
            Vec::new()
        };
        let body = if self.eat(TokenKind::LBrace) {
            let members = self.parse_class_body_members();
            self.expect(TokenKind::RBrace);
            Some(members)
        } else {
            None
        };
        self.node(NodeKind::New { ty, args, body }, start)
    }
}

const INSTANCEOF_PREC: u8 = 7;

enum GtRun {
    Single,
    Shr,
    UShr,
    Assign(AssignOp, usize),
}

fn primitive_of(kind: TokenKind) -> Option<Primitive> {
    Some(match kind {
        TokenKind::BooleanKw => Primitive::Boolean,
        TokenKind::ByteKw => Primitive::Byte,
        TokenKind::CharKw => Primitive::Char,
        TokenKind::ShortKw => Primitive::Short,
        TokenKind::IntKw => Primitive::Int,
        TokenKind::LongKw => Primitive::Long,
        TokenKind::FloatKw => Primitive::Float,
        TokenKind::DoubleKw => Primitive::Double,
        _ => return None,
    })
}

fn number_type(kind: TokenKind, text: &str) -> Primitive {
    let last = text.chars().last().unwrap_or('0');
    match kind {
        TokenKind::IntLit if matches!(last, 'l' | 'L') => Primitive::Long,
        TokenKind::IntLit => Primitive::Int,
        _ if matches!(last, 'f' | 'F') => Primitive::Float,
        _ => Primitive::Double,
    }
}
