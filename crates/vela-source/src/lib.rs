pub use text_size::{TextRange, TextSize};

mod line_index;
pub use line_index::{LineCol, LineIndex};

mod manager;
pub use manager::{ExpansionKind, SourceBuffer, SourceManager};

/// Identifies one registered buffer: either a loaded file or a macro
/// expansion slot. Allocated densely by the [`SourceManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// A position in the compilation: `(buffer, byte offset)`.
///
/// Locations are opaque to every component except the source manager,
/// which can translate them back to file/line/column and reconstruct the
/// macro-expansion chain that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub buffer: BufferId,
    pub offset: TextSize,
}

impl SourceLocation {
    pub fn new(buffer: BufferId, offset: impl Into<TextSize>) -> Self {
        Self {
            buffer,
            offset: offset.into(),
        }
    }

    /// The same buffer, `delta` bytes further along.
    pub fn offset_by(self, delta: impl Into<TextSize>) -> Self {
        Self {
            buffer: self.buffer,
            offset: self.offset + delta.into(),
        }
    }
}

/// A half-open `[start, end)` pair of locations.
///
/// Both endpoints normally lie in the same buffer; nothing enforces that,
/// since an expansion range can legitimately span spliced sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// A zero-length range at `loc`.
    pub fn empty(loc: SourceLocation) -> Self {
        Self {
            start: loc,
            end: loc,
        }
    }
}
