use vela_diag::Diagnostics;
use vela_lexer::{KeywordVersion, Lexer, LexerMode, Token, TokenKind};
use vela_source::SourceManager;

/// Lex `src` fully in normal mode, returning all tokens including EOF.
pub fn lex(src: &str) -> Vec<Token> {
    let (tokens, diags) = lex_collect(src, KeywordVersion::V1800_2023);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    tokens
}

/// Like [`lex`] but hands back the diagnostics instead of asserting.
pub fn lex_collect(src: &str, version: KeywordVersion) -> (Vec<Token>, Diagnostics) {
    let mut sm = SourceManager::new();
    let buf = sm.assign_text(src);
    let mut lexer = Lexer::new(&buf);
    let mut diags = Diagnostics::new();
    let mut tokens = Vec::new();
    loop {
        let tok = lexer
            .next(LexerMode::Normal, version, &mut diags)
            .expect("lexing should not hit a fatal error");
        let done = tok.kind == TokenKind::EndOfFile;
        tokens.push(tok);
        if done {
            break;
        }
    }
    (tokens, diags)
}

/// Token kinds excluding the trailing EOF.
pub fn kinds(src: &str) -> Vec<TokenKind> {
    let mut tokens = lex(src);
    tokens.pop();
    tokens.into_iter().map(|t| t.kind).collect()
}

/// The single token `src` lexes to.
pub fn single(src: &str) -> Token {
    let tokens = lex(src);
    assert_eq!(tokens.len(), 2, "expected exactly one token in {src:?}");
    tokens.into_iter().next().expect("one token")
}
