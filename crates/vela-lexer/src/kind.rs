/// Lexical classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EndOfFile,
    /// Synthetic terminator produced in directive mode at the first
    /// unescaped newline (or EOF).
    EndOfDirective,
    Unknown,

    Identifier,
    SystemIdentifier,
    EscapedIdentifier,
    Keyword(Keyword),

    IntLiteral,
    RealLiteral,
    TimeLiteral,
    UnbasedUnsizedLiteral,
    StringLiteral,
    IncludeFileName,

    /// `` `name `` — a directive or macro use; never emitted to consumers.
    Directive,
    /// `` `" `` — stringify marker inside a macro body.
    MacroQuote,
    /// ```` `` ```` — token-paste marker inside a macro body.
    MacroPaste,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Dot,
    DotStar,
    Colon,
    ColonColon,
    Question,
    Hash,
    HashHash,
    At,
    Dollar,
    Apostrophe,
    TickBrace,

    Plus,
    PlusPlus,
    PlusEq,
    Minus,
    MinusMinus,
    MinusEq,
    MinusGt,
    Star,
    StarStar,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Eq,
    EqEq,
    EqEqEq,
    EqEqQuestion,
    Bang,
    BangEq,
    BangEqEq,
    BangEqQuestion,
    Lt,
    LtEq,
    LtLt,
    LtLtEq,
    LtLtLt,
    LtLtLtEq,
    LtMinusGt,
    Gt,
    GtEq,
    GtGt,
    GtGtEq,
    GtGtGt,
    GtGtGtEq,
    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,
    CaretTilde,
    Tilde,
    TildeAmp,
    TildePipe,
    TildeCaret,
}

/// Reserved words, classified from identifier lexemes against the active
/// keyword version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Data types and qualifiers.
    Bit,
    Logic,
    Reg,
    Byte,
    Shortint,
    Int,
    Longint,
    Integer,
    Time,
    Real,
    Realtime,
    Shortreal,
    String,
    Chandle,
    Event,
    Void,
    Enum,
    Struct,
    Union,
    Packed,
    Signed,
    Unsigned,
    Typedef,
    Parameter,
    Localparam,
    Const,
    Var,
    Genvar,
    Automatic,
    Static,

    // Nets.
    Wire,
    Tri,
    Tri0,
    Tri1,
    Trireg,
    Wand,
    Wor,
    Supply0,
    Supply1,
    Uwire,
    Nettype,
    Interconnect,

    // Design units and blocks.
    Module,
    Endmodule,
    Macromodule,
    Interface,
    Endinterface,
    Package,
    Endpackage,
    Program,
    Endprogram,
    Class,
    Endclass,
    Function,
    Endfunction,
    Task,
    Endtask,
    Generate,
    Endgenerate,
    Begin,
    End,
    Fork,
    Join,
    JoinAny,
    JoinNone,

    // Statements and flow.
    If,
    Else,
    Case,
    Casex,
    Casez,
    Endcase,
    Default,
    For,
    Foreach,
    While,
    Do,
    Repeat,
    Forever,
    Return,
    Break,
    Continue,
    Disable,
    Wait,
    Assign,
    Deassign,
    Force,
    Release,
    Initial,
    Final,
    Always,
    AlwaysComb,
    AlwaysFf,
    AlwaysLatch,
    Posedge,
    Negedge,
    Edge,
    Unique,
    Unique0,
    Priority,
    Inside,
    Let,

    // Ports and membership.
    Input,
    Output,
    Inout,
    Ref,
    Import,
    Export,
    Extern,
    Virtual,
    Pure,
    Local,
    Protected,
    New,
    Null,
    This,
    Super,

    // Assertions.
    Assert,
    Assume,
    Cover,
    Property,
    Endproperty,
    Sequence,
    Endsequence,
}

impl Keyword {
    /// The source spelling of the keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bit => "bit",
            Self::Logic => "logic",
            Self::Reg => "reg",
            Self::Byte => "byte",
            Self::Shortint => "shortint",
            Self::Int => "int",
            Self::Longint => "longint",
            Self::Integer => "integer",
            Self::Time => "time",
            Self::Real => "real",
            Self::Realtime => "realtime",
            Self::Shortreal => "shortreal",
            Self::String => "string",
            Self::Chandle => "chandle",
            Self::Event => "event",
            Self::Void => "void",
            Self::Enum => "enum",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Packed => "packed",
            Self::Signed => "signed",
            Self::Unsigned => "unsigned",
            Self::Typedef => "typedef",
            Self::Parameter => "parameter",
            Self::Localparam => "localparam",
            Self::Const => "const",
            Self::Var => "var",
            Self::Genvar => "genvar",
            Self::Automatic => "automatic",
            Self::Static => "static",
            Self::Wire => "wire",
            Self::Tri => "tri",
            Self::Tri0 => "tri0",
            Self::Tri1 => "tri1",
            Self::Trireg => "trireg",
            Self::Wand => "wand",
            Self::Wor => "wor",
            Self::Supply0 => "supply0",
            Self::Supply1 => "supply1",
            Self::Uwire => "uwire",
            Self::Nettype => "nettype",
            Self::Interconnect => "interconnect",
            Self::Module => "module",
            Self::Endmodule => "endmodule",
            Self::Macromodule => "macromodule",
            Self::Interface => "interface",
            Self::Endinterface => "endinterface",
            Self::Package => "package",
            Self::Endpackage => "endpackage",
            Self::Program => "program",
            Self::Endprogram => "endprogram",
            Self::Class => "class",
            Self::Endclass => "endclass",
            Self::Function => "function",
            Self::Endfunction => "endfunction",
            Self::Task => "task",
            Self::Endtask => "endtask",
            Self::Generate => "generate",
            Self::Endgenerate => "endgenerate",
            Self::Begin => "begin",
            Self::End => "end",
            Self::Fork => "fork",
            Self::Join => "join",
            Self::JoinAny => "join_any",
            Self::JoinNone => "join_none",
            Self::If => "if",
            Self::Else => "else",
            Self::Case => "case",
            Self::Casex => "casex",
            Self::Casez => "casez",
            Self::Endcase => "endcase",
            Self::Default => "default",
            Self::For => "for",
            Self::Foreach => "foreach",
            Self::While => "while",
            Self::Do => "do",
            Self::Repeat => "repeat",
            Self::Forever => "forever",
            Self::Return => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Disable => "disable",
            Self::Wait => "wait",
            Self::Assign => "assign",
            Self::Deassign => "deassign",
            Self::Force => "force",
            Self::Release => "release",
            Self::Initial => "initial",
            Self::Final => "final",
            Self::Always => "always",
            Self::AlwaysComb => "always_comb",
            Self::AlwaysFf => "always_ff",
            Self::AlwaysLatch => "always_latch",
            Self::Posedge => "posedge",
            Self::Negedge => "negedge",
            Self::Edge => "edge",
            Self::Unique => "unique",
            Self::Unique0 => "unique0",
            Self::Priority => "priority",
            Self::Inside => "inside",
            Self::Let => "let",
            Self::Input => "input",
            Self::Output => "output",
            Self::Inout => "inout",
            Self::Ref => "ref",
            Self::Import => "import",
            Self::Export => "export",
            Self::Extern => "extern",
            Self::Virtual => "virtual",
            Self::Pure => "pure",
            Self::Local => "local",
            Self::Protected => "protected",
            Self::New => "new",
            Self::Null => "null",
            Self::This => "this",
            Self::Super => "super",
            Self::Assert => "assert",
            Self::Assume => "assume",
            Self::Cover => "cover",
            Self::Property => "property",
            Self::Endproperty => "endproperty",
            Self::Sequence => "sequence",
            Self::Endsequence => "endsequence",
        }
    }
}
