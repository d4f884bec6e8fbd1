use vela_lexer::{Keyword, KeywordVersion, TokenKind};

use super::common::{kinds, lex_collect, single};

#[test]
fn plain_identifiers() {
    assert_eq!(single("my_signal").kind, TokenKind::Identifier);
    assert_eq!(single("_tmp0").kind, TokenKind::Identifier);
    assert_eq!(single("busy$flag").kind, TokenKind::Identifier);
}

#[test]
fn keywords_classify() {
    assert_eq!(single("module").kind, TokenKind::Keyword(Keyword::Module));
    assert_eq!(single("logic").kind, TokenKind::Keyword(Keyword::Logic));
    assert_eq!(single("endmodule").kind, TokenKind::Keyword(Keyword::Endmodule));
}

#[test]
fn keyword_version_gates_classification() {
    let (tokens, diags) = lex_collect("logic wire", KeywordVersion::V1364_2001);
    assert!(diags.is_empty());
    // In Verilog-2001 `logic` is a plain identifier; `wire` is reserved.
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Wire));
}

#[test]
fn system_identifiers() {
    let tok = single("$display");
    assert_eq!(tok.kind, TokenKind::SystemIdentifier);
    assert_eq!(tok.text, "$display");

    // A bare dollar is its own token (queue bound syntax).
    assert_eq!(kinds("[$]"), vec![
        TokenKind::LBracket,
        TokenKind::Dollar,
        TokenKind::RBracket,
    ]);
}

#[test]
fn escaped_identifiers() {
    let tokens = super::common::lex("\\bus.sel rest");
    assert_eq!(tokens[0].kind, TokenKind::EscapedIdentifier);
    assert_eq!(tokens[0].text, "\\bus.sel");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn directive_tokens() {
    let tokens = super::common::lex("`define");
    assert_eq!(tokens[0].kind, TokenKind::Directive);
    assert_eq!(tokens[0].text, "`define");
    assert_eq!(tokens[0].directive_name(), Some("define"));
}

#[test]
fn macro_markers() {
    assert_eq!(single("``").kind, TokenKind::MacroPaste);
    assert_eq!(single("`\"").kind, TokenKind::MacroQuote);
}
