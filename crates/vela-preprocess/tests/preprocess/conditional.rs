use vela_diag::DiagnosticCode;

use super::common::preprocess;

#[test]
fn ifdef_true_emits_body() {
    let out = preprocess("`define FOO\n`ifdef FOO\nwire w;\n`endif\n");
    assert_eq!(out.texts(), ["wire", "w", ";"]);
    assert!(out.diags.is_empty());
}

#[test]
fn ifdef_false_suppresses_every_token() {
    let out = preprocess("`ifdef FOO\nwire w;\nassign x = 1;\n`endif\n");
    assert_eq!(out.texts(), Vec::<&str>::new());
    assert!(out.diags.is_empty());
}

#[test]
fn ifndef_inverts() {
    let out = preprocess("`ifndef FOO\nwire a;\n`endif\n");
    assert_eq!(out.texts(), ["wire", "a", ";"]);

    let out = preprocess("`define FOO\n`ifndef FOO\nwire a;\n`endif\n");
    assert_eq!(out.texts(), Vec::<&str>::new());
}

#[test]
fn else_takes_untaken_branch() {
    let out = preprocess("`ifdef FOO\nwire a;\n`else\nwire b;\n`endif\n");
    assert_eq!(out.texts(), ["wire", "b", ";"]);

    let out = preprocess("`define FOO\n`ifdef FOO\nwire a;\n`else\nwire b;\n`endif\n");
    assert_eq!(out.texts(), ["wire", "a", ";"]);
}

#[test]
fn elsif_selects_first_defined() {
    let text = "`define B\n`ifdef A\nwire a;\n`elsif B\nwire b;\n`elsif C\nwire c;\n`else\nwire d;\n`endif\n";
    let out = preprocess(text);
    assert_eq!(out.texts(), ["wire", "b", ";"]);
}

#[test]
fn taken_branch_disables_later_siblings() {
    let text = "`define A\n`define B\n`ifdef A\nwire a;\n`elsif B\nwire b;\n`else\nwire c;\n`endif\n";
    let out = preprocess(text);
    assert_eq!(out.texts(), ["wire", "a", ";"]);
}

#[test]
fn nested_conditionals() {
    let text = "`define A\n`ifdef A\n`ifdef B\nmodule m; endmodule\n`else\nmodule n; endmodule\n`endif\n`endif\n";
    let out = preprocess(text);
    assert_eq!(out.texts(), ["module", "n", ";", "endmodule"]);
    assert!(out.diags.is_empty());
}

#[test]
fn inactive_outer_suppresses_active_inner() {
    let text = "`ifdef A\n`ifndef B\nwire w;\n`endif\n`endif\n";
    let out = preprocess(text);
    assert_eq!(out.texts(), Vec::<&str>::new());
}

#[test]
fn elsif_after_else_is_an_error_but_tokenizing_continues() {
    let text = "`ifdef A\nwire a;\n`else\nwire b;\n`elsif C\nwire c;\n`endif\nwire after;\n";
    let out = preprocess(text);
    assert!(
        out.diags
            .iter()
            .any(|d| d.code == DiagnosticCode::ELSE_AFTER_ELSE)
    );
    // The else branch keeps emitting and trailing code is intact.
    assert_eq!(out.texts(), ["wire", "b", ";", "wire", "c", ";", "wire", "after", ";"]);
}

#[test]
fn duplicate_else_is_an_error() {
    let out = preprocess("`ifdef A\n`else\n`else\n`endif\n");
    assert!(
        out.diags
            .iter()
            .any(|d| d.code == DiagnosticCode::ELSE_AFTER_ELSE)
    );
}

#[test]
fn endif_without_ifdef_is_an_error() {
    let out = preprocess("wire w;\n`endif\n");
    assert!(
        out.diags
            .iter()
            .any(|d| d.code == DiagnosticCode::ENDIF_WITHOUT_IFDEF)
    );
    assert_eq!(out.texts(), ["wire", "w", ";"]);
}

#[test]
fn else_without_ifdef_is_an_error() {
    let out = preprocess("`else\nwire w;\n");
    assert!(
        out.diags
            .iter()
            .any(|d| d.code == DiagnosticCode::ELSE_WITHOUT_IFDEF)
    );
}

#[test]
fn unmatched_ifdef_at_eof_is_diagnosed() {
    let out = preprocess("`ifdef FOO\nwire w;\n");
    assert!(
        out.diags
            .iter()
            .any(|d| d.code == DiagnosticCode::UNMATCHED_CONDITIONAL)
    );
}

#[test]
fn defines_in_inactive_regions_are_inert() {
    let text = "`ifdef A\n`define X 1\n`endif\n`ifdef X\nwire w;\n`endif\n";
    let out = preprocess(text);
    assert_eq!(out.texts(), Vec::<&str>::new());
    assert!(out.diags.is_empty());
}

#[test]
fn macro_uses_in_inactive_regions_are_ignored() {
    let out = preprocess("`ifdef A\n`TOTALLY_UNDEFINED\n`endif\n");
    assert!(out.diags.is_empty());
    assert_eq!(out.texts(), Vec::<&str>::new());
}

#[test]
fn includes_in_inactive_regions_are_skipped() {
    let out = preprocess("`ifdef A\n`include \"does_not_exist.svh\"\n`endif\n");
    assert!(out.diags.is_empty());
}
