use smol_str::SmolStr;
use vela_lexer::KeywordVersion;

mod macros;
pub use macros::{MacroDefinition, MacroFormal, MacroTable};

mod expander;

mod preprocessor;
pub use preprocessor::Preprocessor;

/// Recorded `` `timescale`` state: the raw unit and precision literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeScale {
    pub unit: SmolStr,
    pub precision: SmolStr,
}

/// Caller-supplied configuration, applied at construction.
#[derive(Debug, Clone)]
pub struct PreprocessorOptions {
    /// Object-like macros installed before lexing begins, as
    /// `(name, body text)` pairs.
    pub predefines: Vec<(SmolStr, SmolStr)>,
    /// Initial keyword version; `` `begin_keywords`` overrides it
    /// mid-stream and `` `resetall`` restores it.
    pub keyword_version: KeywordVersion,
    /// Hard cap on include/expansion nesting. Exceeding it is fatal.
    pub max_source_depth: usize,
}

impl Default for PreprocessorOptions {
    fn default() -> Self {
        Self {
            predefines: Vec::new(),
            keyword_version: KeywordVersion::V1800_2023,
            max_source_depth: 8192,
        }
    }
}
