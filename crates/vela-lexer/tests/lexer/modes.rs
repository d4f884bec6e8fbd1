use vela_diag::Diagnostics;
use vela_lexer::{KeywordVersion, Lexer, LexerMode, TokenKind, TokenValue};
use vela_source::SourceManager;

fn lexer_over(src: &str) -> (SourceManager, Lexer) {
    let mut sm = SourceManager::new();
    let buf = sm.assign_text(src);
    let lexer = Lexer::new(&buf);
    (sm, lexer)
}

fn next(lexer: &mut Lexer, mode: LexerMode) -> vela_lexer::Token {
    let mut diags = Diagnostics::new();
    let tok = lexer
        .next(mode, KeywordVersion::V1800_2023, &mut diags)
        .expect("no fatal error");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    tok
}

#[test]
fn directive_mode_stops_at_newline() {
    let (_sm, mut lexer) = lexer_over("`define FOO 1\nwire");
    assert_eq!(next(&mut lexer, LexerMode::Directive).kind, TokenKind::Directive);
    assert_eq!(next(&mut lexer, LexerMode::Directive).kind, TokenKind::Identifier);
    assert_eq!(next(&mut lexer, LexerMode::Directive).kind, TokenKind::IntLiteral);
    assert_eq!(
        next(&mut lexer, LexerMode::Directive).kind,
        TokenKind::EndOfDirective
    );
    // Back in normal mode the newline is ordinary trivia.
    let wire = next(&mut lexer, LexerMode::Normal);
    assert_eq!(wire.kind, TokenKind::Keyword(vela_lexer::Keyword::Wire));
}

#[test]
fn escaped_newline_continues_the_directive() {
    let (_sm, mut lexer) = lexer_over("`define M a \\\n b\n");
    assert_eq!(next(&mut lexer, LexerMode::Directive).kind, TokenKind::Directive);
    assert_eq!(next(&mut lexer, LexerMode::Directive).kind, TokenKind::Identifier);
    assert_eq!(next(&mut lexer, LexerMode::Directive).kind, TokenKind::Identifier);
    // The continuation keeps `b` on the same logical line.
    assert_eq!(next(&mut lexer, LexerMode::Directive).kind, TokenKind::Identifier);
    assert_eq!(
        next(&mut lexer, LexerMode::Directive).kind,
        TokenKind::EndOfDirective
    );
}

#[test]
fn directive_mode_at_eof_ends_the_directive() {
    let (_sm, mut lexer) = lexer_over("`define FOO");
    assert_eq!(next(&mut lexer, LexerMode::Directive).kind, TokenKind::Directive);
    assert_eq!(next(&mut lexer, LexerMode::Directive).kind, TokenKind::Identifier);
    assert_eq!(
        next(&mut lexer, LexerMode::Directive).kind,
        TokenKind::EndOfDirective
    );
    assert_eq!(next(&mut lexer, LexerMode::Normal).kind, TokenKind::EndOfFile);
}

#[test]
fn include_file_name_mode_lexes_quoted_paths() {
    let (_sm, mut lexer) = lexer_over("\"dir/file.svh\"\n");
    let tok = next(&mut lexer, LexerMode::IncludeFileName);
    assert_eq!(tok.kind, TokenKind::IncludeFileName);
    assert_eq!(tok.text, "\"dir/file.svh\"");
    assert_eq!(tok.value, Some(TokenValue::Str("dir/file.svh".into())));
}

#[test]
fn include_file_name_mode_lexes_angle_paths() {
    let (_sm, mut lexer) = lexer_over("<uvm_macros.svh>\n");
    let tok = next(&mut lexer, LexerMode::IncludeFileName);
    assert_eq!(tok.kind, TokenKind::IncludeFileName);
    assert_eq!(tok.value, Some(TokenValue::Str("uvm_macros.svh".into())));
}

#[test]
fn include_file_name_mode_falls_back_for_other_tokens() {
    let (_sm, mut lexer) = lexer_over("wire\n");
    let tok = next(&mut lexer, LexerMode::IncludeFileName);
    assert_eq!(tok.kind, TokenKind::Keyword(vela_lexer::Keyword::Wire));
}
