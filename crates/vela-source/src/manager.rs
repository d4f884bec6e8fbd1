use std::cell::OnceCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use smol_str::SmolStr;

use crate::{BufferId, LineIndex, SourceLocation, SourceRange};

/// A registered buffer handle: the identifier plus the backing text.
///
/// The text is shared, so lexers can hold on to it while the manager is
/// mutated to register further buffers.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    pub id: BufferId,
    pub text: Arc<str>,
}

/// How an expansion buffer maps its locations.
///
/// `MacroBody`: the original location is inside the macro definition and
/// the expansion range covers the use site. `MacroArg`: the original
/// location is the actual argument at the use site and the expansion range
/// covers the formal parameter's occurrence inside the expanded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionKind {
    MacroBody,
    MacroArg,
}

// A `line directive overlays the reported file/line for everything after
// the raw line it appeared on.
#[derive(Debug, Clone)]
struct LineDirective {
    name: SmolStr,
    line_in_file: u32,
    line_of_directive: u32,
    level: u8,
}

// Contents and metadata of one loaded file. Shared between buffer entries
// when the same file is included along different paths.
struct FileData {
    name: SmolStr,
    text: Arc<str>,
    line_index: OnceCell<LineIndex>,
    line_directives: Vec<LineDirective>,
    directory: Option<PathBuf>,
}

impl FileData {
    fn new(name: SmolStr, text: Arc<str>, directory: Option<PathBuf>) -> Self {
        Self {
            name,
            text,
            line_index: OnceCell::new(),
            line_directives: Vec::new(),
            directory,
        }
    }

    fn line_index(&self) -> &LineIndex {
        self.line_index.get_or_init(|| LineIndex::new(&self.text))
    }

    // Nearest directive strictly above `raw_line`, since a directive
    // applies to the lines that follow it.
    fn previous_line_directive(&self, raw_line: u32) -> Option<&LineDirective> {
        let idx = self
            .line_directives
            .partition_point(|d| d.line_in_file < raw_line);
        idx.checked_sub(1).map(|i| &self.line_directives[i])
    }
}

struct FileInfo {
    data: usize,
    included_from: Option<SourceLocation>,
}

struct ExpansionInfo {
    original: SourceLocation,
    range: SourceRange,
    kind: ExpansionKind,
    macro_name: Option<SmolStr>,
}

enum BufferEntry {
    File(FileInfo),
    Expansion(ExpansionInfo),
}

/// The single authority for source identity.
///
/// Owns every file buffer and expansion slot of one compilation, assigns
/// [`BufferId`]s, resolves include paths, and translates opaque
/// [`SourceLocation`]s into file/line/column coordinates and expansion
/// chains. All other components mint locations only through this type.
pub struct SourceManager {
    entries: Vec<BufferEntry>,
    files: Vec<FileData>,
    lookup: HashMap<PathBuf, usize>,
    user_directories: Vec<PathBuf>,
    system_directories: Vec<PathBuf>,
    unnamed_count: u32,
}

impl SourceManager {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            files: Vec::new(),
            lookup: HashMap::new(),
            user_directories: Vec::new(),
            system_directories: Vec::new(),
            unnamed_count: 0,
        }
    }

    /// Adds a search directory for quoted includes.
    pub fn add_user_directory(&mut self, path: impl Into<PathBuf>) {
        self.user_directories.push(path.into());
    }

    /// Adds a search directory for angle-bracket includes.
    pub fn add_system_directory(&mut self, path: impl Into<PathBuf>) {
        self.system_directories.push(path.into());
    }

    /// Registers in-memory text under a synthetic name.
    pub fn assign_text(&mut self, text: &str) -> SourceBuffer {
        let name = format!("source{}", self.unnamed_count);
        self.unnamed_count += 1;
        self.assign_named_text(&name, text, None)
    }

    /// Registers in-memory text pretending it came from `name`.
    pub fn assign_named_text(
        &mut self,
        name: &str,
        text: &str,
        included_from: Option<SourceLocation>,
    ) -> SourceBuffer {
        let data = FileData::new(SmolStr::new(name), Arc::from(text), None);
        self.files.push(data);
        self.create_file_entry(self.files.len() - 1, included_from)
    }

    /// Reads a top-level source file from disk, caching by canonical path.
    pub fn read_source(&mut self, path: &Path) -> io::Result<SourceBuffer> {
        self.open_cached(path, None)
    }

    /// Resolves an include path and reads the file.
    ///
    /// Quoted includes (`is_system == false`) search the including file's
    /// directory, then user directories, then system directories.
    /// Angle-bracket includes search system directories only. Absolute
    /// paths bypass the search. Returns `None` when no candidate exists;
    /// the caller reports that as a recoverable diagnostic.
    pub fn read_header(
        &mut self,
        path: &str,
        included_from: SourceLocation,
        is_system: bool,
    ) -> Option<SourceBuffer> {
        let rel = Path::new(path);
        if rel.is_absolute() {
            return self.open_cached(rel, Some(included_from)).ok();
        }

        if is_system {
            for dir in self.system_directories.clone() {
                if let Ok(buf) = self.open_cached(&dir.join(rel), Some(included_from)) {
                    return Some(buf);
                }
            }
            return None;
        }

        let includer_dir = self
            .file_data(self.get_fully_expanded_loc(included_from).buffer)
            .and_then(|fd| fd.directory.clone());
        if let Some(dir) = includer_dir
            && let Ok(buf) = self.open_cached(&dir.join(rel), Some(included_from))
        {
            return Some(buf);
        }

        for dir in self
            .user_directories
            .iter()
            .chain(&self.system_directories)
            .cloned()
            .collect::<Vec<_>>()
        {
            if let Ok(buf) = self.open_cached(&dir.join(rel), Some(included_from)) {
                return Some(buf);
            }
        }
        None
    }

    /// Allocates a fresh expansion buffer and returns a location at its
    /// start. The expander offsets subsequent tokens into the buffer.
    pub fn create_expansion_loc(
        &mut self,
        original: SourceLocation,
        range: SourceRange,
        kind: ExpansionKind,
        macro_name: Option<SmolStr>,
    ) -> SourceLocation {
        self.entries.push(BufferEntry::Expansion(ExpansionInfo {
            original,
            range,
            kind,
            macro_name,
        }));
        SourceLocation::new(BufferId(self.entries.len() as u32 - 1), 0u32)
    }

    pub fn is_file_loc(&self, loc: SourceLocation) -> bool {
        matches!(self.entry(loc.buffer), Some(BufferEntry::File(_)))
    }

    pub fn is_macro_loc(&self, loc: SourceLocation) -> bool {
        matches!(self.entry(loc.buffer), Some(BufferEntry::Expansion(_)))
    }

    pub fn is_macro_arg_loc(&self, loc: SourceLocation) -> bool {
        matches!(
            self.entry(loc.buffer),
            Some(BufferEntry::Expansion(e)) if e.kind == ExpansionKind::MacroArg
        )
    }

    /// Whether the location lives in a file that was pulled in by an
    /// include directive.
    pub fn is_included_file_loc(&self, loc: SourceLocation) -> bool {
        matches!(
            self.entry(loc.buffer),
            Some(BufferEntry::File(f)) if f.included_from.is_some()
        )
    }

    pub fn is_preprocessed_loc(&self, loc: SourceLocation) -> bool {
        self.is_macro_loc(loc) || self.is_included_file_loc(loc)
    }

    /// One step toward the use site: the start of the expansion range.
    pub fn get_expansion_loc(&self, loc: SourceLocation) -> SourceLocation {
        match self.entry(loc.buffer) {
            Some(BufferEntry::Expansion(e)) => e.range.start,
            _ => loc,
        }
    }

    /// The full use-site range recorded for a macro location.
    pub fn get_expansion_range(&self, loc: SourceLocation) -> SourceRange {
        match self.entry(loc.buffer) {
            Some(BufferEntry::Expansion(e)) => e.range,
            _ => SourceRange::empty(loc),
        }
    }

    /// One step toward where the text was written: the original location
    /// plus the offset into the expansion buffer.
    pub fn get_original_loc(&self, loc: SourceLocation) -> SourceLocation {
        match self.entry(loc.buffer) {
            Some(BufferEntry::Expansion(e)) => e.original.offset_by(loc.offset),
            _ => loc,
        }
    }

    /// Fixed point of [`get_expansion_loc`](Self::get_expansion_loc):
    /// always a file location.
    pub fn get_fully_expanded_loc(&self, mut loc: SourceLocation) -> SourceLocation {
        while self.is_macro_loc(loc) {
            loc = self.get_expansion_loc(loc);
        }
        loc
    }

    /// Fixed point of [`get_original_loc`](Self::get_original_loc):
    /// always a file location.
    pub fn get_fully_original_loc(&self, mut loc: SourceLocation) -> SourceLocation {
        while self.is_macro_loc(loc) {
            loc = self.get_original_loc(loc);
        }
        loc
    }

    /// Where the buffer was included from, for file buffers opened by an
    /// include directive.
    pub fn get_included_from(&self, buffer: BufferId) -> Option<SourceLocation> {
        match self.entry(buffer) {
            Some(BufferEntry::File(f)) => f.included_from,
            _ => None,
        }
    }

    /// The macro whose expansion produced this location, if any.
    ///
    /// Argument locations resolve through the parameter occurrence in the
    /// body expansion, which carries the enclosing macro's name.
    pub fn get_macro_name(&self, mut loc: SourceLocation) -> Option<SmolStr> {
        loop {
            match self.entry(loc.buffer)? {
                BufferEntry::Expansion(e) => match (&e.kind, &e.macro_name) {
                    (_, Some(name)) => return Some(name.clone()),
                    (ExpansionKind::MacroArg, None) | (ExpansionKind::MacroBody, None) => {
                        loc = e.range.start
                    }
                },
                BufferEntry::File(_) => return None,
            }
        }
    }

    /// Strict order in "compilation unit space": the hypothetical flat
    /// file with all includes and macros expanded in place.
    ///
    /// Locations in the same buffer compare by offset. Otherwise both
    /// expansion/include chains are walked to a common ancestor buffer and
    /// compared there; include order falls out of the include directive's
    /// own position in the including file.
    pub fn is_before_in_compilation_unit(
        &self,
        left: SourceLocation,
        right: SourceLocation,
    ) -> bool {
        if left.buffer == right.buffer {
            return left.offset < right.offset;
        }

        let mut left_chain = HashMap::new();
        let mut loc = left;
        let left_root = loop {
            left_chain.insert(loc.buffer, loc);
            match self.up_one(loc) {
                Some(up) => loc = up,
                None => break loc.buffer,
            }
        };

        let mut loc = right;
        loop {
            if let Some(&l) = left_chain.get(&loc.buffer) {
                return l.offset < loc.offset;
            }
            match self.up_one(loc) {
                Some(up) => loc = up,
                // Disjoint root buffers: registration order decides.
                None => return left_root < loc.buffer,
            }
        }
    }

    /// 1-based line number, with any `line directive overlay applied.
    pub fn get_line_number(&self, loc: SourceLocation) -> u32 {
        let file_loc = self.get_fully_expanded_loc(loc);
        let Some(fd) = self.file_data(file_loc.buffer) else {
            return 0;
        };
        let raw = fd.line_index().line_col(file_loc.offset).line + 1;
        match fd.previous_line_directive(raw) {
            Some(d) => d.line_of_directive + (raw - d.line_in_file) - 1,
            None => raw,
        }
    }

    /// 1-based line number ignoring line directives.
    pub fn get_raw_line_number(&self, loc: SourceLocation) -> u32 {
        let file_loc = self.get_fully_expanded_loc(loc);
        match self.file_data(file_loc.buffer) {
            Some(fd) => fd.line_index().line_col(file_loc.offset).line + 1,
            None => 0,
        }
    }

    /// 1-based column number. Line directives never alter columns.
    pub fn get_column_number(&self, loc: SourceLocation) -> u32 {
        let file_loc = self.get_fully_expanded_loc(loc);
        match self.file_data(file_loc.buffer) {
            Some(fd) => fd.line_index().line_col(file_loc.offset).col + 1,
            None => 0,
        }
    }

    /// Reported file name, honoring any `line directive overlay.
    pub fn get_file_name(&self, loc: SourceLocation) -> SmolStr {
        let file_loc = self.get_fully_expanded_loc(loc);
        let Some(fd) = self.file_data(file_loc.buffer) else {
            return SmolStr::default();
        };
        if fd.line_directives.is_empty() {
            return fd.name.clone();
        }
        let raw = fd.line_index().line_col(file_loc.offset).line + 1;
        match fd.previous_line_directive(raw) {
            Some(d) => d.name.clone(),
            None => fd.name.clone(),
        }
    }

    /// Level of the `line directive governing `loc`, if one applies.
    /// Level 1 marks include entry and 2 include exit; formatters use this
    /// to rebuild include stacks across overlaid names.
    pub fn get_line_directive_level(&self, loc: SourceLocation) -> Option<u8> {
        let file_loc = self.get_fully_expanded_loc(loc);
        let fd = self.file_data(file_loc.buffer)?;
        let raw = fd.line_index().line_col(file_loc.offset).line + 1;
        fd.previous_line_directive(raw).map(|d| d.level)
    }

    /// On-disk file name of the buffer, ignoring line directives.
    pub fn get_raw_file_name(&self, buffer: BufferId) -> SmolStr {
        self.file_data(buffer)
            .map(|fd| fd.name.clone())
            .unwrap_or_default()
    }

    /// Backing text of a file buffer.
    pub fn get_source_text(&self, buffer: BufferId) -> Option<Arc<str>> {
        self.file_data(buffer).map(|fd| fd.text.clone())
    }

    /// Records a `line directive at `loc`. Entries must arrive in raw-line
    /// order; stale (non-monotonic) entries are dropped.
    pub fn add_line_directive(
        &mut self,
        loc: SourceLocation,
        line_of_directive: u32,
        name: &str,
        level: u8,
    ) {
        let file_loc = self.get_fully_expanded_loc(loc);
        let Some(BufferEntry::File(info)) = self.entry(file_loc.buffer) else {
            return;
        };
        let data = info.data;
        let line_in_file = self.files[data].line_index().line_col(file_loc.offset).line + 1;
        let directives = &mut self.files[data].line_directives;
        if directives
            .last()
            .is_some_and(|d| d.line_in_file >= line_in_file)
        {
            return;
        }
        directives.push(LineDirective {
            name: SmolStr::new(name),
            line_in_file,
            line_of_directive,
            level,
        });
    }

    fn entry(&self, buffer: BufferId) -> Option<&BufferEntry> {
        self.entries.get(buffer.0 as usize)
    }

    fn file_data(&self, buffer: BufferId) -> Option<&FileData> {
        match self.entry(buffer)? {
            BufferEntry::File(f) => Some(&self.files[f.data]),
            BufferEntry::Expansion(_) => None,
        }
    }

    // Next step up the combined expansion/include chain.
    fn up_one(&self, loc: SourceLocation) -> Option<SourceLocation> {
        match self.entry(loc.buffer)? {
            BufferEntry::Expansion(e) => Some(e.range.start),
            BufferEntry::File(f) => f.included_from,
        }
    }

    fn create_file_entry(
        &mut self,
        data: usize,
        included_from: Option<SourceLocation>,
    ) -> SourceBuffer {
        let text = self.files[data].text.clone();
        self.entries.push(BufferEntry::File(FileInfo {
            data,
            included_from,
        }));
        SourceBuffer {
            id: BufferId(self.entries.len() as u32 - 1),
            text,
        }
    }

    // Loads a file, reusing previously read contents for the same
    // canonical path. Each include site still gets its own buffer entry.
    fn open_cached(
        &mut self,
        path: &Path,
        included_from: Option<SourceLocation>,
    ) -> io::Result<SourceBuffer> {
        let canonical = std::fs::canonicalize(path)?;
        if let Some(&data) = self.lookup.get(&canonical) {
            return Ok(self.create_file_entry(data, included_from));
        }

        let text = std::fs::read_to_string(&canonical)?;
        let name = canonical
            .file_name()
            .map(|n| SmolStr::new(n.to_string_lossy()))
            .unwrap_or_default();
        let directory = canonical.parent().map(Path::to_path_buf);
        self.files
            .push(FileData::new(name, Arc::from(text.as_str()), directory));
        let data = self.files.len() - 1;
        self.lookup.insert(canonical, data);
        Ok(self.create_file_entry(data, included_from))
    }
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}
