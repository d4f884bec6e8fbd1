use smol_str::SmolStr;
use vela_source::SourceLocation;

use crate::DiagnosticCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A structured diagnostic: code identity, the location it anchors to, and
/// message arguments. Rendering (file/line text, expansion backtraces) is
/// a formatter concern and queries the source manager separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub location: SourceLocation,
    pub args: Vec<SmolStr>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Error,
            code,
            location,
            args: Vec::new(),
        }
    }

    pub fn warning(code: DiagnosticCode, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            location,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<SmolStr>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Ordered sink for the diagnostics of one compilation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.list.push(diag);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.list.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.list
    }
}

/// A terminating condition: the whole preprocessing call unwinds with this
/// diagnostic and no partial token is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fatal {
    pub diagnostic: Diagnostic,
}

impl Fatal {
    pub fn new(diagnostic: Diagnostic) -> Self {
        Self { diagnostic }
    }
}
