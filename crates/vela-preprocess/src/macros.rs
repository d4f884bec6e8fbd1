use smol_str::SmolStr;
use vela_lexer::Token;
use vela_source::SourceLocation;

/// One formal parameter of a function-like macro, with its optional
/// default token sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroFormal {
    pub name: SmolStr,
    pub default: Option<Vec<Token>>,
}

/// A stored `define: name, optional formal list, and the body tokens as
/// lexed at the definition site (their locations still point there).
#[derive(Debug, Clone, PartialEq)]
pub struct MacroDefinition {
    pub name: SmolStr,
    pub formals: Option<Vec<MacroFormal>>,
    pub body: Vec<Token>,
    pub location: SourceLocation,
}

impl MacroDefinition {
    /// Object-like macros have no formal list at all; `NAME()` is a
    /// function-like macro with zero formals.
    pub fn is_function_like(&self) -> bool {
        self.formals.is_some()
    }
}

/// Per-compilation macro namespace. Names are case-sensitive and the last
/// `define wins. Kept sorted by name for deterministic iteration.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    entries: Vec<MacroDefinition>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.find(name).is_ok()
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.find(name).ok().map(|i| &self.entries[i])
    }

    pub fn define(&mut self, def: MacroDefinition) {
        match self.find(&def.name) {
            Ok(i) => self.entries[i] = def,
            Err(i) => self.entries.insert(i, def),
        }
    }

    /// Removes a definition; silent when the name is not defined.
    pub fn undef(&mut self, name: &str) {
        if let Ok(i) = self.find(name) {
            self.entries.remove(i);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, name: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|d| d.name.as_str().cmp(name))
    }
}
