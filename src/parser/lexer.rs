//! Logos-based lexer for the base language.
//!
//! Trivia (whitespace and comments) is kept as tokens so that callers
//! scanning raw text (import scraping, sugar rewriting) see the same
//! literal and comment boundaries as the parser.

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.inner.next()?;
        let span = self.inner.span();
        let kind = token.unwrap_or(TokenKind::Error);
        Some(Token {
            kind,
            text: self.inner.slice(),
            offset: TextSize::new(span.start as u32),
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Byte ranges of string/char literals and comments in `text`.
///
/// Text scanners use this to leave literal and commented-out code alone.
pub fn literal_and_comment_ranges(text: &str) -> Vec<TextRange> {
    Lexer::new(text)
        .filter(|token| {
            matches!(
                token.kind,
                TokenKind::LineComment
                    | TokenKind::BlockComment
                    | TokenKind::StringLit
                    | TokenKind::CharLit
            )
        })
        .map(|token| token.range())
        .collect()
}

/// Extend a `/*` token through the matching `*/`. An unterminated comment
/// runs to the end of the input and lexes as an error.
fn block_comment(lex: &mut logos::Lexer<'_, TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*[lL]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    IntLit,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFdD]?")]
    #[regex(r"[0-9]+[fFdD]")]
    FloatLit,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLit,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    CharLit,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("abstract")]
    AbstractKw,
    #[token("assert")]
    AssertKw,
    #[token("boolean")]
    BooleanKw,
    #[token("break")]
    BreakKw,
    #[token("byte")]
    ByteKw,
    #[token("case")]
    CaseKw,
    #[token("catch")]
    CatchKw,
    #[token("char")]
    CharKw,
    #[token("class")]
    ClassKw,
    #[token("continue")]
    ContinueKw,
    #[token("default")]
    DefaultKw,
    #[token("do")]
    DoKw,
    #[token("double")]
    DoubleKw,
    #[token("else")]
    ElseKw,
    #[token("enum")]
    EnumKw,
    #[token("extends")]
    ExtendsKw,
    #[token("false")]
    FalseKw,
    #[token("final")]
    FinalKw,
    #[token("finally")]
    FinallyKw,
    #[token("float")]
    FloatKw,
    #[token("for")]
    ForKw,
    #[token("if")]
    IfKw,
    #[token("implements")]
    ImplementsKw,
    #[token("import")]
    ImportKw,
    #[token("instanceof")]
    InstanceofKw,
    #[token("int")]
    IntKw,
    #[token("interface")]
    InterfaceKw,
    #[token("long")]
    LongKw,
    #[token("native")]
    NativeKw,
    #[token("new")]
    NewKw,
    #[token("null")]
    NullKw,
    #[token("package")]
    PackageKw,
    #[token("private")]
    PrivateKw,
    #[token("protected")]
    ProtectedKw,
    #[token("public")]
    PublicKw,
    #[token("return")]
    ReturnKw,
    #[token("short")]
    ShortKw,
    #[token("static")]
    StaticKw,
    #[token("strictfp")]
    StrictfpKw,
    #[token("super")]
    SuperKw,
    #[token("switch")]
    SwitchKw,
    #[token("synchronized")]
    SynchronizedKw,
    #[token("this")]
    ThisKw,
    #[token("throw")]
    ThrowKw,
    #[token("throws")]
    ThrowsKw,
    #[token("transient")]
    TransientKw,
    #[token("true")]
    TrueKw,
    #[token("try")]
    TryKw,
    #[token("void")]
    VoidKw,
    #[token("volatile")]
    VolatileKw,
    #[token("while")]
    WhileKw,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("...")]
    Ellipsis,
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<")]
    Shl,
    #[token("<<=")]
    ShlEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    // `>` is always lexed alone; shifts are recognized from adjacent tokens
    // so that nested type arguments close correctly.
    #[token(">")]
    Gt,
    #[token("@")]
    At,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token("!")]
    Bang,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,

    /// Anything the lexer does not recognize.
    Error,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            TokenKind::BooleanKw
                | TokenKind::ByteKw
                | TokenKind::CharKw
                | TokenKind::ShortKw
                | TokenKind::IntKw
                | TokenKind::LongKw
                | TokenKind::FloatKw
                | TokenKind::DoubleKw
        )
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::PublicKw
                | TokenKind::PrivateKw
                | TokenKind::ProtectedKw
                | TokenKind::StaticKw
                | TokenKind::FinalKw
                | TokenKind::AbstractKw
                | TokenKind::NativeKw
                | TokenKind::SynchronizedKw
                | TokenKind::TransientKw
                | TokenKind::VolatileKw
                | TokenKind::StrictfpKw
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLit
                | TokenKind::FloatLit
                | TokenKind::StringLit
                | TokenKind::CharLit
                | TokenKind::TrueKw
                | TokenKind::FalseKw
                | TokenKind::NullKw
        )
    }

    /// Human readable description used in syntax error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::IntLit | TokenKind::FloatLit => "number",
            TokenKind::StringLit => "string literal",
            TokenKind::CharLit => "character literal",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Eq => "`=`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::WhileKw => "`while`",
            TokenKind::Error => "invalid character",
            _ => "token",
        }
    }
}
