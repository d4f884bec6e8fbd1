use core::fmt;

/// Identity code for a diagnostic: a dotted namespace plus a number that
/// is unique within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    pub namespace: &'static str,
    pub number: u32,
}

impl DiagnosticCode {
    // Lexer errors.
    pub const UNTERMINATED_BLOCK_COMMENT: Self = Self {
        namespace: "vela.lex",
        number: 1,
    };
    pub const INVALID_ESCAPE: Self = Self {
        namespace: "vela.lex",
        number: 2,
    };
    pub const MALFORMED_LITERAL: Self = Self {
        namespace: "vela.lex",
        number: 3,
    };
    pub const LITERAL_WIDTH_TRUNCATED: Self = Self {
        namespace: "vela.lex",
        number: 4,
    };
    pub const UNTERMINATED_STRING: Self = Self {
        namespace: "vela.lex",
        number: 5,
    };
    pub const UNKNOWN_CHARACTER: Self = Self {
        namespace: "vela.lex",
        number: 6,
    };

    // Directive errors.
    pub const DIRECTIVE_SYNTAX: Self = Self {
        namespace: "vela.preprocess",
        number: 1,
    };
    pub const UNKNOWN_DIRECTIVE: Self = Self {
        namespace: "vela.preprocess",
        number: 2,
    };
    pub const ENDIF_WITHOUT_IFDEF: Self = Self {
        namespace: "vela.preprocess",
        number: 3,
    };
    pub const ELSE_WITHOUT_IFDEF: Self = Self {
        namespace: "vela.preprocess",
        number: 4,
    };
    pub const ELSE_AFTER_ELSE: Self = Self {
        namespace: "vela.preprocess",
        number: 5,
    };
    pub const UNMATCHED_CONDITIONAL: Self = Self {
        namespace: "vela.preprocess",
        number: 6,
    };
    pub const UNKNOWN_KEYWORD_VERSION: Self = Self {
        namespace: "vela.preprocess",
        number: 7,
    };
    pub const UNMATCHED_END_KEYWORDS: Self = Self {
        namespace: "vela.preprocess",
        number: 8,
    };

    // Include errors.
    pub const INCLUDE_NOT_FOUND: Self = Self {
        namespace: "vela.include",
        number: 1,
    };
    pub const SOURCE_STACK_OVERFLOW: Self = Self {
        namespace: "vela.include",
        number: 2,
    };

    // Macro errors.
    pub const MACRO_ARITY_MISMATCH: Self = Self {
        namespace: "vela.macro",
        number: 1,
    };
    pub const ILLEGAL_MACRO_NAME: Self = Self {
        namespace: "vela.macro",
        number: 2,
    };
    pub const RECURSIVE_MACRO: Self = Self {
        namespace: "vela.macro",
        number: 3,
    };
    pub const EXPECTED_MACRO_ARGS: Self = Self {
        namespace: "vela.macro",
        number: 4,
    };
    pub const UNBALANCED_MACRO_ARGS: Self = Self {
        namespace: "vela.macro",
        number: 5,
    };
    pub const INVALID_TOKEN_PASTE: Self = Self {
        namespace: "vela.macro",
        number: 6,
    };

    // Type errors.
    pub const PACKED_MEMBER_NOT_INTEGRAL: Self = Self {
        namespace: "vela.type",
        number: 1,
    };
    pub const PACKED_MEMBER_HAS_INITIALIZER: Self = Self {
        namespace: "vela.type",
        number: 2,
    };
    pub const INVALID_ENUM_BASE: Self = Self {
        namespace: "vela.type",
        number: 3,
    };
    pub const PACKED_DIMS_ON_PREDEFINED: Self = Self {
        namespace: "vela.type",
        number: 4,
    };
    pub const PACKED_DIMS_ON_NON_INTEGRAL: Self = Self {
        namespace: "vela.type",
        number: 5,
    };
    pub const PACKED_UNION_WIDTH: Self = Self {
        namespace: "vela.type",
        number: 6,
    };
    pub const ENUM_VALUE_UNKNOWN: Self = Self {
        namespace: "vela.type",
        number: 7,
    };
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.namespace, self.number)
    }
}
