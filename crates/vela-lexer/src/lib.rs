mod kind;
pub use kind::{Keyword, TokenKind};

mod keywords;
pub use keywords::{KeywordVersion, classify};

mod value;
pub use value::{Base, BitVector, LogicBit, ParsedInt, TokenValue};

mod lexer;
pub use lexer::{Lexer, relex_single};

use smol_str::SmolStr;
use vela_source::{SourceLocation, SourceRange, TextSize};

/// What the lexer should produce next.
///
/// The preprocessor switches modes per token fetch: `Directive` terminates
/// at the first unescaped newline with an `EndOfDirective` token and
/// recognizes the macro stringify/paste markers; `IncludeFileName` lexes
/// one `"path"` or `<path>` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerMode {
    Normal,
    Directive,
    IncludeFileName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaKind {
    Whitespace,
    LineComment,
    BlockComment,
    LineContinuation,
    /// A preprocessor directive consumed in place; the raw directive text
    /// rides along so tooling can still see it.
    Directive,
}

/// Whitespace, comments, and consumed directives carried on the following
/// token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub text: SmolStr,
}

impl Trivia {
    pub fn new(kind: TriviaKind, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn directive(text: impl Into<SmolStr>) -> Self {
        Self::new(TriviaKind::Directive, text)
    }
}

/// One lexical element: kind, raw text, leading trivia, an absolute
/// location, and the computed value for literals.
///
/// Tokens are plain values; cloning one is cheap because the text is a
/// `SmolStr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub trivia: Vec<Trivia>,
    pub location: SourceLocation,
    pub value: Option<TokenValue>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            trivia: Vec::new(),
            location,
            value: None,
        }
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The `[location, location + len)` range of the raw text.
    pub fn range(&self) -> SourceRange {
        SourceRange::new(self.location, self.location.offset_by(self.len()))
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    /// Directive name without the leading backtick, for directive tokens.
    pub fn directive_name(&self) -> Option<&str> {
        (self.kind == TokenKind::Directive).then(|| self.text.trim_start_matches('`'))
    }
}
