use vela_diag::DiagnosticCode;
use vela_lexer::TriviaKind;

use super::common::preprocess;

#[test]
fn object_like_expansion_with_locations() {
    let out = preprocess("`define FOO 1+2\nint x = `FOO;\n");
    assert_eq!(out.texts(), ["int", "x", "=", "1", "+", "2", ";"]);
    assert!(out.diags.is_empty());

    // `FOO sits at offset 24 in the input.
    let use_site = 24u32;
    for tok in &out.tokens[3..6] {
        assert!(out.sm.is_macro_loc(tok.location), "{:?}", tok.text);
        assert_eq!(out.sm.get_macro_name(tok.location).as_deref(), Some("FOO"));
        let range = out.sm.get_expansion_range(tok.location);
        assert_eq!(u32::from(range.start.offset), use_site);
        assert_eq!(u32::from(range.end.offset), use_site + 4);
        let expanded = out.sm.get_fully_expanded_loc(tok.location);
        assert!(out.sm.is_file_loc(expanded));
        assert_eq!(u32::from(expanded.offset), use_site);
    }

    // Tokens written directly in the file resolve to their own text.
    for tok in &out.tokens[..3] {
        assert!(out.sm.is_file_loc(tok.location));
        let text = out.sm.get_source_text(tok.location.buffer).expect("text");
        let start = u32::from(tok.location.offset) as usize;
        assert_eq!(&text[start..start + tok.text.len()], tok.text.as_str());
    }
}

#[test]
fn macro_body_tokens_keep_original_positions() {
    let out = preprocess("`define FOO 1+2\nint x = `FOO;\n");
    // "1" was written at offset 12, "+" at 13, "2" at 14.
    let offsets: Vec<u32> = out.tokens[3..6]
        .iter()
        .map(|t| u32::from(out.sm.get_fully_original_loc(t.location).offset))
        .collect();
    assert_eq!(offsets, vec![12, 13, 14]);
}

#[test]
fn last_define_wins() {
    let out = preprocess("`define X 1\n`define X 2\nx = `X;\n");
    assert_eq!(out.texts(), ["x", "=", "2", ";"]);
    assert!(out.diags.is_empty());
}

#[test]
fn empty_body_expands_to_nothing() {
    let out = preprocess("`define NOTHING\na `NOTHING b\n");
    assert_eq!(out.texts(), ["a", "b"]);
}

#[test]
fn undef_removes_definition() {
    let out = preprocess("`define X 1\n`undef X\n`X\n");
    assert_eq!(out.texts(), Vec::<&str>::new());
    assert!(
        out.diags
            .iter()
            .any(|d| d.code == DiagnosticCode::UNKNOWN_DIRECTIVE)
    );
}

#[test]
fn undef_of_undefined_is_silent() {
    let out = preprocess("`undef NEVER_DEFINED\nwire w;\n");
    assert_eq!(out.texts(), ["wire", "w", ";"]);
    assert!(out.diags.is_empty());
}

#[test]
fn undefineall_clears_table() {
    let out = preprocess("`define A 1\n`define B 2\n`undefineall\n`ifdef A\nx\n`endif\n`ifdef B\ny\n`endif\n");
    assert_eq!(out.texts(), Vec::<&str>::new());
    assert!(out.diags.is_empty());
}

#[test]
fn defining_a_directive_name_is_an_error() {
    let out = preprocess("`define include 1\nwire w;\n");
    assert!(
        out.diags
            .iter()
            .any(|d| d.code == DiagnosticCode::ILLEGAL_MACRO_NAME)
    );
    assert_eq!(out.texts(), ["wire", "w", ";"]);
}

#[test]
fn define_without_name_is_an_error() {
    let out = preprocess("`define\nwire w;\n");
    assert!(
        out.diags
            .iter()
            .any(|d| d.code == DiagnosticCode::DIRECTIVE_SYNTAX)
    );
    assert_eq!(out.texts(), ["wire", "w", ";"]);
}

#[test]
fn consumed_directives_become_trivia() {
    let out = preprocess("`define FOO 1\nwire w;\n");
    let wire = &out.tokens[0];
    assert!(
        wire.trivia
            .iter()
            .any(|t| t.kind == TriviaKind::Directive && t.text == "`define")
    );
}

#[test]
fn multi_line_body_via_continuation() {
    let out = preprocess("`define PAIR a \\\n b\n`PAIR\n");
    assert_eq!(out.texts(), ["a", "b"]);
}

#[test]
fn predefines_are_installed() {
    let mut options = vela_preprocess::PreprocessorOptions::default();
    options
        .predefines
        .push(("WIDTH".into(), "8".into()));
    let out = super::common::preprocess_with("wire [`WIDTH-1:0] w;\n", options);
    assert_eq!(out.texts(), ["wire", "[", "8", "-", "1", ":", "0", "]", "w", ";"]);
    assert!(out.diags.is_empty());
}
