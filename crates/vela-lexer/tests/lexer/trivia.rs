use vela_diag::{DiagnosticCode, Diagnostics};
use vela_lexer::{KeywordVersion, Lexer, LexerMode, TokenKind, TriviaKind};
use vela_source::SourceManager;

use super::common::lex;

#[test]
fn whitespace_and_comments_ride_on_the_next_token() {
    let tokens = lex("  // note\nwire");
    assert_eq!(tokens[0].kind, TokenKind::Keyword(vela_lexer::Keyword::Wire));
    let kinds: Vec<_> = tokens[0].trivia.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![
        TriviaKind::Whitespace,
        TriviaKind::LineComment,
        TriviaKind::Whitespace,
    ]);
    assert_eq!(tokens[0].trivia[1].text, "// note");
}

#[test]
fn block_comments_do_not_nest() {
    let tokens = lex("/* a /* b */ x");
    // The comment ends at the first `*/`; `x` is a real token.
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "x");
    assert_eq!(tokens[0].trivia[0].kind, TriviaKind::BlockComment);
    assert_eq!(tokens[0].trivia[0].text, "/* a /* b */");
}

#[test]
fn eof_collects_trailing_trivia() {
    let tokens = lex("wire /* tail */ ");
    let eof = tokens.last().expect("eof");
    assert_eq!(eof.kind, TokenKind::EndOfFile);
    assert!(eof.trivia.iter().any(|t| t.kind == TriviaKind::BlockComment));
}

#[test]
fn line_continuation_is_trivia() {
    let tokens = lex("a \\\n b");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert!(
        tokens[1]
            .trivia
            .iter()
            .any(|t| t.kind == TriviaKind::LineContinuation)
    );
}

#[test]
fn unterminated_block_comment_is_fatal() {
    let mut sm = SourceManager::new();
    let buf = sm.assign_text("wire /* never closed");
    let mut lexer = Lexer::new(&buf);
    let mut diags = Diagnostics::new();

    let first = lexer.next(LexerMode::Normal, KeywordVersion::V1800_2023, &mut diags);
    assert!(first.is_ok());

    let second = lexer.next(LexerMode::Normal, KeywordVersion::V1800_2023, &mut diags);
    let fatal = second.expect_err("open block comment at EOF must be fatal");
    assert_eq!(
        fatal.diagnostic.code,
        DiagnosticCode::UNTERMINATED_BLOCK_COMMENT
    );
}

#[test]
fn token_locations_are_absolute_offsets() {
    let tokens = lex("wire w;");
    assert_eq!(u32::from(tokens[0].location.offset), 0);
    assert_eq!(u32::from(tokens[1].location.offset), 5);
    assert_eq!(u32::from(tokens[2].location.offset), 6);
    assert_eq!(tokens[0].location.buffer, tokens[1].location.buffer);
}
