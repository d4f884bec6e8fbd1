use smol_str::SmolStr;
use vela_source::{ExpansionKind, SourceLocation, SourceManager, SourceRange};

#[test]
fn assigned_buffers_get_synthetic_names() {
    let mut sm = SourceManager::new();
    let a = sm.assign_text("module m;\n");
    let b = sm.assign_text("module n;\n");
    assert_ne!(a.id, b.id);
    assert_eq!(sm.get_raw_file_name(a.id), "source0");
    assert_eq!(sm.get_raw_file_name(b.id), "source1");
}

#[test]
fn line_and_column_are_one_based() {
    let mut sm = SourceManager::new();
    let buf = sm.assign_named_text("top.sv", "first\nsecond line\n", None);

    let start = SourceLocation::new(buf.id, 0u32);
    assert_eq!(sm.get_line_number(start), 1);
    assert_eq!(sm.get_column_number(start), 1);

    // Offset 8 is the 'c' in "second".
    let second = SourceLocation::new(buf.id, 8u32);
    assert_eq!(sm.get_line_number(second), 2);
    assert_eq!(sm.get_column_number(second), 3);
    assert_eq!(sm.get_file_name(second), "top.sv");
}

#[test]
fn line_directive_overlays_reporting() {
    let mut sm = SourceManager::new();
    let buf = sm.assign_named_text("gen.sv", "a\nb\nc\nd\n", None);

    // Directive sits on raw line 2: lines after it report as coming from
    // "orig.sv" starting at line 100.
    sm.add_line_directive(SourceLocation::new(buf.id, 2u32), 100, "orig.sv", 0);

    let line1 = SourceLocation::new(buf.id, 0u32);
    assert_eq!(sm.get_line_number(line1), 1);
    assert_eq!(sm.get_file_name(line1), "gen.sv");
    assert_eq!(sm.get_line_directive_level(line1), None);

    let line3 = SourceLocation::new(buf.id, 4u32);
    assert_eq!(sm.get_raw_line_number(line3), 3);
    assert_eq!(sm.get_line_number(line3), 100);
    assert_eq!(sm.get_file_name(line3), "orig.sv");
    assert_eq!(sm.get_line_directive_level(line3), Some(0));

    let line4 = SourceLocation::new(buf.id, 6u32);
    assert_eq!(sm.get_line_number(line4), 101);

    // Columns never change.
    assert_eq!(sm.get_column_number(line3), 1);
}

#[test]
fn non_monotonic_line_directives_are_dropped() {
    let mut sm = SourceManager::new();
    let buf = sm.assign_named_text("gen.sv", "a\nb\nc\nd\n", None);

    sm.add_line_directive(SourceLocation::new(buf.id, 4u32), 50, "x.sv", 0);
    // Earlier raw line arriving later: ignored.
    sm.add_line_directive(SourceLocation::new(buf.id, 2u32), 10, "y.sv", 0);

    let line4 = SourceLocation::new(buf.id, 6u32);
    assert_eq!(sm.get_file_name(line4), "x.sv");
    assert_eq!(sm.get_line_number(line4), 50);
}

#[test]
fn expansion_chain_round_trip() {
    let mut sm = SourceManager::new();
    let buf = sm.assign_named_text("m.sv", "`define W 8\nwire [`W-1:0] w;\n", None);

    // Pretend `W at offset 18 expanded the body token at offset 10.
    let original = SourceLocation::new(buf.id, 10u32);
    let use_start = SourceLocation::new(buf.id, 18u32);
    let use_site = SourceRange::new(use_start, use_start.offset_by(2u32));
    let exp = sm.create_expansion_loc(
        original,
        use_site,
        ExpansionKind::MacroBody,
        Some(SmolStr::new("W")),
    );

    assert!(sm.is_macro_loc(exp));
    assert!(!sm.is_file_loc(exp));
    assert!(!sm.is_macro_arg_loc(exp));
    assert!(sm.is_preprocessed_loc(exp));

    assert_eq!(sm.get_expansion_loc(exp), use_start);
    assert_eq!(sm.get_expansion_range(exp), use_site);
    assert_eq!(sm.get_original_loc(exp), original);
    assert_eq!(sm.get_fully_expanded_loc(exp), use_start);
    assert_eq!(sm.get_fully_original_loc(exp), original);
    assert_eq!(sm.get_macro_name(exp), Some(SmolStr::new("W")));

    // Offsets into the expansion buffer shift the original location.
    let shifted = exp.offset_by(1u32);
    assert_eq!(sm.get_original_loc(shifted), original.offset_by(1u32));
}

#[test]
fn macro_arg_loc_reports_outer_macro_name() {
    let mut sm = SourceManager::new();
    let buf = sm.assign_named_text("m.sv", "`define ID(x) x\n`ID(42)\n", None);

    let body = SourceLocation::new(buf.id, 14u32);
    let use_start = SourceLocation::new(buf.id, 16u32);
    let body_exp = sm.create_expansion_loc(
        body,
        SourceRange::new(use_start, use_start.offset_by(7u32)),
        ExpansionKind::MacroBody,
        Some(SmolStr::new("ID")),
    );

    let actual = SourceLocation::new(buf.id, 20u32);
    let arg_exp = sm.create_expansion_loc(
        actual,
        SourceRange::new(body_exp, body_exp.offset_by(1u32)),
        ExpansionKind::MacroArg,
        None,
    );

    assert!(sm.is_macro_arg_loc(arg_exp));
    assert_eq!(sm.get_macro_name(arg_exp), Some(SmolStr::new("ID")));
    // The argument's original location is the use site.
    assert_eq!(sm.get_fully_original_loc(arg_exp), actual);
    // Fully expanding funnels through the body expansion to the file.
    assert_eq!(sm.get_fully_expanded_loc(arg_exp), use_start);
}

#[test]
fn compilation_unit_order_within_one_buffer() {
    let mut sm = SourceManager::new();
    let buf = sm.assign_text("wire a;\nwire b;\n");
    let early = SourceLocation::new(buf.id, 1u32);
    let late = SourceLocation::new(buf.id, 9u32);
    assert!(sm.is_before_in_compilation_unit(early, late));
    assert!(!sm.is_before_in_compilation_unit(late, early));
    assert!(!sm.is_before_in_compilation_unit(early, early));
}

#[test]
fn compilation_unit_order_across_includes() {
    let mut sm = SourceManager::new();
    let top = sm.assign_named_text("top.sv", "before\n`include \"inc.svh\"\nafter\n", None);

    // The include directive starts at offset 7.
    let inc_site = SourceLocation::new(top.id, 7u32);
    let inc = sm.assign_named_text("inc.svh", "included text\n", Some(inc_site));

    assert_eq!(sm.get_included_from(inc.id), Some(inc_site));
    assert!(sm.is_included_file_loc(SourceLocation::new(inc.id, 0u32)));

    let before = SourceLocation::new(top.id, 0u32);
    let inside = SourceLocation::new(inc.id, 4u32);
    let after = SourceLocation::new(top.id, 26u32);

    assert!(sm.is_before_in_compilation_unit(before, inside));
    assert!(sm.is_before_in_compilation_unit(inside, after));
    assert!(!sm.is_before_in_compilation_unit(inside, before));
    assert!(!sm.is_before_in_compilation_unit(after, inside));
}

#[test]
fn compilation_unit_order_of_expanded_tokens() {
    let mut sm = SourceManager::new();
    let buf = sm.assign_named_text("m.sv", "`define P 1+2\nx = `P;\n", None);

    let body = SourceLocation::new(buf.id, 10u32);
    let use_start = SourceLocation::new(buf.id, 18u32);
    let exp = sm.create_expansion_loc(
        body,
        SourceRange::new(use_start, use_start.offset_by(2u32)),
        ExpansionKind::MacroBody,
        Some(SmolStr::new("P")),
    );

    // Tokens inside one expansion keep their body order.
    let one = exp;
    let plus = exp.offset_by(1u32);
    assert!(sm.is_before_in_compilation_unit(one, plus));
    assert!(!sm.is_before_in_compilation_unit(plus, one));

    // Expanded tokens sit between the surrounding file tokens.
    let x = SourceLocation::new(buf.id, 14u32);
    let semi = SourceLocation::new(buf.id, 20u32);
    assert!(sm.is_before_in_compilation_unit(x, one));
    assert!(sm.is_before_in_compilation_unit(plus, semi));
}
