use crate::Keyword;

/// Language version selecting the active reserved-word set.
///
/// Chosen by the caller at construction and adjusted mid-stream by
/// `` `begin_keywords "<version>" `` / `` `end_keywords ``.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeywordVersion {
    V1364_2001,
    V1800_2005,
    V1800_2009,
    V1800_2012,
    V1800_2017,
    V1800_2023,
}

impl KeywordVersion {
    /// Parses the quoted version string of a `begin_keywords directive.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1364-2001" | "1364-2001-noconfig" | "1364-2005" => Some(Self::V1364_2001),
            "1800-2005" => Some(Self::V1800_2005),
            "1800-2009" => Some(Self::V1800_2009),
            "1800-2012" => Some(Self::V1800_2012),
            "1800-2017" => Some(Self::V1800_2017),
            "1800-2023" => Some(Self::V1800_2023),
            _ => None,
        }
    }
}

/// Classify an identifier lexeme against the active keyword version.
///
/// Words reserved only by a later version than `version` stay plain
/// identifiers.
pub fn classify(word: &str, version: KeywordVersion) -> Option<Keyword> {
    let (kw, since) = lookup(word)?;
    (since <= version).then_some(kw)
}

fn lookup(word: &str) -> Option<(Keyword, KeywordVersion)> {
    use Keyword::*;
    use KeywordVersion as V;

    let entry = match word {
        // Verilog-2001 core.
        "always" => (Always, V::V1364_2001),
        "assign" => (Assign, V::V1364_2001),
        "begin" => (Begin, V::V1364_2001),
        "case" => (Case, V::V1364_2001),
        "casex" => (Casex, V::V1364_2001),
        "casez" => (Casez, V::V1364_2001),
        "deassign" => (Deassign, V::V1364_2001),
        "default" => (Default, V::V1364_2001),
        "disable" => (Disable, V::V1364_2001),
        "edge" => (Edge, V::V1364_2001),
        "else" => (Else, V::V1364_2001),
        "end" => (End, V::V1364_2001),
        "endcase" => (Endcase, V::V1364_2001),
        "endfunction" => (Endfunction, V::V1364_2001),
        "endgenerate" => (Endgenerate, V::V1364_2001),
        "endmodule" => (Endmodule, V::V1364_2001),
        "endtask" => (Endtask, V::V1364_2001),
        "event" => (Event, V::V1364_2001),
        "for" => (For, V::V1364_2001),
        "force" => (Force, V::V1364_2001),
        "forever" => (Forever, V::V1364_2001),
        "fork" => (Fork, V::V1364_2001),
        "function" => (Function, V::V1364_2001),
        "generate" => (Generate, V::V1364_2001),
        "genvar" => (Genvar, V::V1364_2001),
        "if" => (If, V::V1364_2001),
        "initial" => (Initial, V::V1364_2001),
        "inout" => (Inout, V::V1364_2001),
        "input" => (Input, V::V1364_2001),
        "integer" => (Integer, V::V1364_2001),
        "join" => (Join, V::V1364_2001),
        "localparam" => (Localparam, V::V1364_2001),
        "macromodule" => (Macromodule, V::V1364_2001),
        "module" => (Module, V::V1364_2001),
        "negedge" => (Negedge, V::V1364_2001),
        "output" => (Output, V::V1364_2001),
        "parameter" => (Parameter, V::V1364_2001),
        "posedge" => (Posedge, V::V1364_2001),
        "real" => (Real, V::V1364_2001),
        "realtime" => (Realtime, V::V1364_2001),
        "reg" => (Reg, V::V1364_2001),
        "release" => (Release, V::V1364_2001),
        "repeat" => (Repeat, V::V1364_2001),
        "signed" => (Signed, V::V1364_2001),
        "supply0" => (Supply0, V::V1364_2001),
        "supply1" => (Supply1, V::V1364_2001),
        "task" => (Task, V::V1364_2001),
        "time" => (Time, V::V1364_2001),
        "tri" => (Tri, V::V1364_2001),
        "tri0" => (Tri0, V::V1364_2001),
        "tri1" => (Tri1, V::V1364_2001),
        "trireg" => (Trireg, V::V1364_2001),
        "unsigned" => (Unsigned, V::V1364_2001),
        "uwire" => (Uwire, V::V1364_2001),
        "wait" => (Wait, V::V1364_2001),
        "wand" => (Wand, V::V1364_2001),
        "while" => (While, V::V1364_2001),
        "wire" => (Wire, V::V1364_2001),
        "wor" => (Wor, V::V1364_2001),

        // SystemVerilog 1800-2005.
        "always_comb" => (AlwaysComb, V::V1800_2005),
        "always_ff" => (AlwaysFf, V::V1800_2005),
        "always_latch" => (AlwaysLatch, V::V1800_2005),
        "assert" => (Assert, V::V1800_2005),
        "assume" => (Assume, V::V1800_2005),
        "automatic" => (Automatic, V::V1364_2001),
        "bit" => (Bit, V::V1800_2005),
        "break" => (Break, V::V1800_2005),
        "byte" => (Byte, V::V1800_2005),
        "chandle" => (Chandle, V::V1800_2005),
        "class" => (Class, V::V1800_2005),
        "const" => (Const, V::V1800_2005),
        "continue" => (Continue, V::V1800_2005),
        "cover" => (Cover, V::V1800_2005),
        "do" => (Do, V::V1800_2005),
        "endclass" => (Endclass, V::V1800_2005),
        "endinterface" => (Endinterface, V::V1800_2005),
        "endpackage" => (Endpackage, V::V1800_2005),
        "endprogram" => (Endprogram, V::V1800_2005),
        "endproperty" => (Endproperty, V::V1800_2005),
        "endsequence" => (Endsequence, V::V1800_2005),
        "enum" => (Enum, V::V1800_2005),
        "export" => (Export, V::V1800_2005),
        "extern" => (Extern, V::V1800_2005),
        "final" => (Final, V::V1800_2005),
        "foreach" => (Foreach, V::V1800_2005),
        "import" => (Import, V::V1800_2005),
        "inside" => (Inside, V::V1800_2005),
        "int" => (Int, V::V1800_2005),
        "interface" => (Interface, V::V1800_2005),
        "join_any" => (JoinAny, V::V1800_2005),
        "join_none" => (JoinNone, V::V1800_2005),
        "local" => (Local, V::V1800_2005),
        "logic" => (Logic, V::V1800_2005),
        "longint" => (Longint, V::V1800_2005),
        "new" => (New, V::V1800_2005),
        "null" => (Null, V::V1800_2005),
        "package" => (Package, V::V1800_2005),
        "packed" => (Packed, V::V1800_2005),
        "priority" => (Priority, V::V1800_2005),
        "program" => (Program, V::V1800_2005),
        "property" => (Property, V::V1800_2005),
        "protected" => (Protected, V::V1800_2005),
        "pure" => (Pure, V::V1800_2005),
        "ref" => (Ref, V::V1800_2005),
        "return" => (Return, V::V1800_2005),
        "sequence" => (Sequence, V::V1800_2005),
        "shortint" => (Shortint, V::V1800_2005),
        "shortreal" => (Shortreal, V::V1800_2005),
        "static" => (Static, V::V1800_2005),
        "string" => (String, V::V1800_2005),
        "struct" => (Struct, V::V1800_2005),
        "super" => (Super, V::V1800_2005),
        "this" => (This, V::V1800_2005),
        "typedef" => (Typedef, V::V1800_2005),
        "union" => (Union, V::V1800_2005),
        "unique" => (Unique, V::V1800_2005),
        "var" => (Var, V::V1800_2005),
        "virtual" => (Virtual, V::V1800_2005),
        "void" => (Void, V::V1800_2005),

        // 1800-2009.
        "let" => (Let, V::V1800_2009),
        "unique0" => (Unique0, V::V1800_2009),

        // 1800-2012.
        "interconnect" => (Interconnect, V::V1800_2012),
        "nettype" => (Nettype, V::V1800_2012),

        _ => return None,
    };
    Some(entry)
}
