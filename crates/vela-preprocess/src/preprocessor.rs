use smol_str::SmolStr;
use vela_diag::{Diagnostic, DiagnosticCode, Diagnostics, Fatal};
use vela_lexer::{Keyword, KeywordVersion, Lexer, LexerMode, Token, TokenKind, TokenValue, Trivia};
use vela_source::{BufferId, SourceBuffer, SourceLocation, SourceManager, SourceRange};

use crate::expander::MacroExpander;
use crate::macros::{MacroDefinition, MacroFormal, MacroTable};
use crate::{PreprocessorOptions, TimeScale};

// Directive names the dispatcher owns; a macro may not shadow these.
const DIRECTIVE_NAMES: &[&str] = &[
    "define",
    "undef",
    "undefineall",
    "resetall",
    "include",
    "ifdef",
    "ifndef",
    "elsif",
    "else",
    "endif",
    "line",
    "timescale",
    "default_nettype",
    "begin_keywords",
    "end_keywords",
];

// One entry of the source stack: a raw lexer over a buffer, or a macro
// expansion being drained.
enum Source {
    Lexer(Lexer),
    Macro(MacroExpander),
}

// State of one nested `ifdef/`else/`endif. At most one branch per frame
// is ever active; once a branch has been taken no later sibling activates.
struct BranchFrame {
    any_taken: bool,
    current_active: bool,
    has_else: bool,
}

/// The top-level token source.
///
/// `next` drives the source stack: the top entry produces raw tokens,
/// directives are intercepted and dispatched, and everything that survives
/// conditional compilation is handed to the consumer with directive trivia
/// attached.
pub struct Preprocessor<'a> {
    sm: &'a mut SourceManager,
    diags: &'a mut Diagnostics,
    macros: MacroTable,
    predefines: Vec<MacroDefinition>,
    source_stack: Vec<Source>,
    branch_stack: Vec<BranchFrame>,
    keyword_stack: Vec<KeywordVersion>,
    keyword_version: KeywordVersion,
    default_version: KeywordVersion,
    timescale: Option<TimeScale>,
    default_nettype: Option<SmolStr>,
    lookahead: Option<Token>,
    max_depth: usize,
    done: bool,
}

impl<'a> Preprocessor<'a> {
    pub fn new(
        sm: &'a mut SourceManager,
        diags: &'a mut Diagnostics,
        options: PreprocessorOptions,
    ) -> Self {
        let mut pp = Self {
            sm,
            diags,
            macros: MacroTable::new(),
            predefines: Vec::new(),
            source_stack: Vec::new(),
            branch_stack: Vec::new(),
            keyword_stack: Vec::new(),
            keyword_version: options.keyword_version,
            default_version: options.keyword_version,
            timescale: None,
            default_nettype: None,
            lookahead: None,
            max_depth: options.max_source_depth,
            done: false,
        };
        pp.lex_predefines(&options.predefines);
        pp
    }

    /// Pushes a registered buffer as the next source to lex.
    pub fn push_source(&mut self, buffer: &SourceBuffer) {
        debug_assert!(self.source_stack.len() < self.max_depth);
        self.source_stack.push(Source::Lexer(Lexer::new(buffer)));
    }

    /// Registers `text` as an anonymous buffer and pushes it.
    pub fn push_text(&mut self, text: &str) {
        let buffer = self.sm.assign_text(text);
        self.push_source(&buffer);
    }

    pub fn keyword_version(&self) -> KeywordVersion {
        self.keyword_version
    }

    pub fn timescale(&self) -> Option<&TimeScale> {
        self.timescale.as_ref()
    }

    pub fn default_nettype(&self) -> Option<&str> {
        self.default_nettype.as_deref()
    }

    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Yields the next user-visible token.
    ///
    /// Directive tokens never escape: they are dispatched here and left
    /// behind as trivia on the next emitted token. After the bottom source
    /// reaches EOF this keeps returning `EndOfFile`.
    pub fn next(&mut self) -> Result<Token, Fatal> {
        let mut leading: Vec<Trivia> = Vec::new();
        loop {
            let mut tok = self.next_raw(LexerMode::Normal)?;
            match tok.kind {
                TokenKind::Directive => {
                    leading.append(&mut tok.trivia);
                    leading.push(Trivia::directive(tok.text.clone()));
                    self.handle_directive(&tok)?;
                }
                TokenKind::EndOfFile => {
                    if !self.done && !self.branch_stack.is_empty() {
                        self.diags.push(Diagnostic::error(
                            DiagnosticCode::UNMATCHED_CONDITIONAL,
                            tok.location,
                        ));
                        self.branch_stack.clear();
                    }
                    self.done = true;
                    return Ok(attach_leading(tok, leading));
                }
                _ if !self.emitting() => {}
                _ => return Ok(attach_leading(tok, leading)),
            }
        }
    }

    // Output is suppressed whenever any frame's branch is inactive.
    fn emitting(&self) -> bool {
        self.branch_stack.iter().all(|f| f.current_active)
    }

    // Raw token fetch from the top of the source stack, popping drained
    // entries. Mode only matters for lexer sources.
    fn next_raw(&mut self, mode: LexerMode) -> Result<Token, Fatal> {
        if let Some(tok) = self.lookahead.take() {
            return Ok(tok);
        }
        loop {
            let depth = self.source_stack.len();
            let Some(top) = self.source_stack.last_mut() else {
                return Ok(Token::new(
                    TokenKind::EndOfFile,
                    "",
                    SourceLocation::new(BufferId(0), 0u32),
                ));
            };
            let produced = match top {
                Source::Macro(exp) => {
                    if exp.is_active() {
                        exp.next()
                    } else {
                        None
                    }
                }
                Source::Lexer(lexer) => {
                    let tok = lexer.next(mode, self.keyword_version, self.diags)?;
                    if tok.kind == TokenKind::EndOfFile && depth > 1 {
                        None
                    } else {
                        Some(tok)
                    }
                }
            };
            match produced {
                Some(tok) => return Ok(tok),
                None => {
                    self.source_stack.pop();
                }
            }
        }
    }

    fn checked_push(&mut self, source: Source, loc: SourceLocation) -> Result<(), Fatal> {
        if self.source_stack.len() >= self.max_depth {
            return Err(Fatal::new(Diagnostic::error(
                DiagnosticCode::SOURCE_STACK_OVERFLOW,
                loc,
            )));
        }
        self.source_stack.push(source);
        Ok(())
    }

    // Reads directive-mode tokens through the end of the logical line.
    fn collect_directive_line(&mut self) -> Result<Vec<Token>, Fatal> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_raw(LexerMode::Directive)?;
            match tok.kind {
                TokenKind::EndOfDirective => return Ok(tokens),
                TokenKind::EndOfFile => {
                    self.lookahead = Some(tok);
                    return Ok(tokens);
                }
                _ => tokens.push(tok),
            }
        }
    }

    fn handle_directive(&mut self, dir: &Token) -> Result<(), Fatal> {
        match dir.directive_name().unwrap_or_default() {
            "define" => self.handle_define(dir),
            "undef" => self.handle_undef(dir),
            "undefineall" => self.handle_undefineall(),
            "resetall" => self.handle_resetall(),
            "include" => self.handle_include(dir),
            "ifdef" => self.handle_ifdef(dir, false),
            "ifndef" => self.handle_ifdef(dir, true),
            "elsif" => self.handle_elsif(dir),
            "else" => self.handle_else(dir),
            "endif" => self.handle_endif(dir),
            "line" => self.handle_line(dir),
            "timescale" => self.handle_timescale(dir),
            "default_nettype" => self.handle_default_nettype(dir),
            "begin_keywords" => self.handle_begin_keywords(dir),
            "end_keywords" => self.handle_end_keywords(dir),
            _ => self.handle_macro_usage(dir),
        }
    }

    fn handle_define(&mut self, dir: &Token) -> Result<(), Fatal> {
        let line = self.collect_directive_line()?;

        let Some(name_tok) = line.first().filter(|t| is_name(t)) else {
            if self.emitting() {
                self.error_arg(DiagnosticCode::DIRECTIVE_SYNTAX, dir.location, "define");
            }
            return Ok(());
        };
        if DIRECTIVE_NAMES.contains(&name_tok.text.as_str()) {
            if self.emitting() {
                self.error_arg(
                    DiagnosticCode::ILLEGAL_MACRO_NAME,
                    name_tok.location,
                    name_tok.text.clone(),
                );
            }
            return Ok(());
        }

        // A formal list only exists when the paren hugs the name.
        let mut formals = None;
        let mut body_start = 1;
        if matches!(line.get(1), Some(t) if t.kind == TokenKind::LParen && t.trivia.is_empty()) {
            let (parsed, next) = self.parse_formals(&line, 2);
            formals = Some(parsed);
            body_start = next;
        }

        if self.emitting() {
            self.macros.define(MacroDefinition {
                name: name_tok.text.clone(),
                formals,
                body: line[body_start..].to_vec(),
                location: name_tok.location,
            });
        }
        Ok(())
    }

    // Parses `name [= default] (, name [= default])* )` from a collected
    // directive line, starting at index `i` (just past the open paren).
    fn parse_formals(&mut self, line: &[Token], mut i: usize) -> (Vec<MacroFormal>, usize) {
        let mut formals = Vec::new();
        loop {
            match line.get(i) {
                None => {
                    self.error_arg(
                        DiagnosticCode::DIRECTIVE_SYNTAX,
                        line.last().map(|t| t.location).unwrap_or_else(|| {
                            SourceLocation::new(BufferId(0), 0u32)
                        }),
                        "define",
                    );
                    break;
                }
                Some(t) if t.kind == TokenKind::RParen => {
                    i += 1;
                    break;
                }
                Some(t) if t.kind == TokenKind::Comma => i += 1,
                Some(t) if is_name(t) => {
                    let name = t.text.clone();
                    i += 1;
                    let mut default = None;
                    if matches!(line.get(i), Some(e) if e.kind == TokenKind::Eq) {
                        i += 1;
                        let mut depth = 0usize;
                        let mut tokens = Vec::new();
                        while let Some(d) = line.get(i) {
                            match d.kind {
                                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                                    depth += 1
                                }
                                TokenKind::RParen | TokenKind::Comma if depth == 0 => break,
                                TokenKind::RParen
                                | TokenKind::RBracket
                                | TokenKind::RBrace => depth = depth.saturating_sub(1),
                                _ => {}
                            }
                            tokens.push(d.clone());
                            i += 1;
                        }
                        default = Some(tokens);
                    }
                    formals.push(MacroFormal { name, default });
                }
                Some(t) => {
                    self.error_arg(DiagnosticCode::DIRECTIVE_SYNTAX, t.location, "define");
                    i += 1;
                }
            }
        }
        (formals, i)
    }

    fn handle_undef(&mut self, dir: &Token) -> Result<(), Fatal> {
        let line = self.collect_directive_line()?;
        match line.first().filter(|t| is_name(t)) {
            Some(name_tok) => {
                if self.emitting() {
                    self.macros.undef(&name_tok.text);
                }
            }
            None => {
                if self.emitting() {
                    self.error_arg(DiagnosticCode::DIRECTIVE_SYNTAX, dir.location, "undef");
                }
            }
        }
        Ok(())
    }

    fn handle_undefineall(&mut self) -> Result<(), Fatal> {
        let _ = self.collect_directive_line()?;
        if self.emitting() {
            self.macros.clear();
            for def in self.predefines.clone() {
                self.macros.define(def);
            }
        }
        Ok(())
    }

    fn handle_resetall(&mut self) -> Result<(), Fatal> {
        let _ = self.collect_directive_line()?;
        if self.emitting() {
            self.macros.clear();
            for def in self.predefines.clone() {
                self.macros.define(def);
            }
            self.timescale = None;
            self.default_nettype = None;
            self.keyword_stack.clear();
            self.keyword_version = self.default_version;
        }
        Ok(())
    }

    fn handle_include(&mut self, dir: &Token) -> Result<(), Fatal> {
        let fname = self.next_raw(LexerMode::IncludeFileName)?;
        if fname.kind != TokenKind::IncludeFileName {
            if self.emitting() {
                self.error_arg(DiagnosticCode::DIRECTIVE_SYNTAX, dir.location, "include");
            }
            if fname.kind != TokenKind::EndOfDirective {
                self.lookahead = Some(fname);
                let _ = self.collect_directive_line()?;
            }
            return Ok(());
        }
        let _ = self.collect_directive_line()?;

        if !self.emitting() {
            return Ok(());
        }

        let is_system = fname.text.starts_with('<');
        let path = match &fname.value {
            Some(TokenValue::Str(p)) => p.clone(),
            _ => SmolStr::default(),
        };
        match self.sm.read_header(&path, dir.location, is_system) {
            Some(buffer) => {
                let lexer = Lexer::new(&buffer);
                self.checked_push(Source::Lexer(lexer), fname.location)?;
            }
            None => {
                self.error_arg(DiagnosticCode::INCLUDE_NOT_FOUND, fname.location, path);
            }
        }
        Ok(())
    }

    fn handle_ifdef(&mut self, dir: &Token, invert: bool) -> Result<(), Fatal> {
        let line = self.collect_directive_line()?;
        let active = match line.first().filter(|t| is_name(t)) {
            Some(name_tok) => self.macros.is_defined(&name_tok.text) != invert,
            None => {
                self.error_arg(
                    DiagnosticCode::DIRECTIVE_SYNTAX,
                    dir.location,
                    dir.text.clone(),
                );
                false
            }
        };
        self.branch_stack.push(BranchFrame {
            any_taken: active,
            current_active: active,
            has_else: false,
        });
        Ok(())
    }

    fn handle_elsif(&mut self, dir: &Token) -> Result<(), Fatal> {
        let line = self.collect_directive_line()?;
        let defined = match line.first().filter(|t| is_name(t)) {
            Some(name_tok) => self.macros.is_defined(&name_tok.text),
            None => {
                self.error_arg(
                    DiagnosticCode::DIRECTIVE_SYNTAX,
                    dir.location,
                    dir.text.clone(),
                );
                false
            }
        };

        let Some(frame) = self.branch_stack.last_mut() else {
            self.error_arg(
                DiagnosticCode::ELSE_WITHOUT_IFDEF,
                dir.location,
                dir.text.clone(),
            );
            return Ok(());
        };
        if frame.has_else {
            self.error_arg(
                DiagnosticCode::ELSE_AFTER_ELSE,
                dir.location,
                dir.text.clone(),
            );
            return Ok(());
        }
        if frame.any_taken {
            frame.current_active = false;
        } else {
            frame.current_active = defined;
            frame.any_taken = defined;
        }
        Ok(())
    }

    fn handle_else(&mut self, dir: &Token) -> Result<(), Fatal> {
        let _ = self.collect_directive_line()?;
        let Some(frame) = self.branch_stack.last_mut() else {
            self.error_arg(
                DiagnosticCode::ELSE_WITHOUT_IFDEF,
                dir.location,
                dir.text.clone(),
            );
            return Ok(());
        };
        if frame.has_else {
            self.error_arg(
                DiagnosticCode::ELSE_AFTER_ELSE,
                dir.location,
                dir.text.clone(),
            );
            return Ok(());
        }
        frame.has_else = true;
        frame.current_active = !frame.any_taken;
        frame.any_taken = true;
        Ok(())
    }

    fn handle_endif(&mut self, dir: &Token) -> Result<(), Fatal> {
        let _ = self.collect_directive_line()?;
        if self.branch_stack.pop().is_none() {
            self.error(DiagnosticCode::ENDIF_WITHOUT_IFDEF, dir.location);
        }
        Ok(())
    }

    fn handle_line(&mut self, dir: &Token) -> Result<(), Fatal> {
        let line = self.collect_directive_line()?;

        let number = line
            .first()
            .filter(|t| t.kind == TokenKind::IntLiteral)
            .and_then(int_value);
        let name = line.get(1).and_then(|t| match &t.value {
            Some(TokenValue::Str(s)) if t.kind == TokenKind::StringLiteral => Some(s.clone()),
            _ => None,
        });
        let level = line
            .get(2)
            .filter(|t| t.kind == TokenKind::IntLiteral)
            .and_then(int_value)
            .filter(|&l| l <= 2);

        match (number, name, level) {
            (Some(number), Some(name), Some(level)) if line.len() == 3 => {
                if self.emitting() {
                    self.sm
                        .add_line_directive(dir.location, number as u32, &name, level as u8);
                }
            }
            _ => {
                if self.emitting() {
                    self.error_arg(DiagnosticCode::DIRECTIVE_SYNTAX, dir.location, "line");
                }
            }
        }
        Ok(())
    }

    fn handle_timescale(&mut self, dir: &Token) -> Result<(), Fatal> {
        let line = self.collect_directive_line()?;
        let shape_ok = line.len() == 3
            && line[0].kind == TokenKind::TimeLiteral
            && line[1].kind == TokenKind::Slash
            && line[2].kind == TokenKind::TimeLiteral;
        if !self.emitting() {
            return Ok(());
        }
        if shape_ok {
            self.timescale = Some(TimeScale {
                unit: line[0].text.clone(),
                precision: line[2].text.clone(),
            });
        } else {
            self.error_arg(DiagnosticCode::DIRECTIVE_SYNTAX, dir.location, "timescale");
        }
        Ok(())
    }

    fn handle_default_nettype(&mut self, dir: &Token) -> Result<(), Fatal> {
        let line = self.collect_directive_line()?;
        let net = line.first().filter(|t| {
            matches!(
                t.kind,
                TokenKind::Keyword(
                    Keyword::Wire
                        | Keyword::Tri
                        | Keyword::Tri0
                        | Keyword::Tri1
                        | Keyword::Trireg
                        | Keyword::Wand
                        | Keyword::Wor
                        | Keyword::Uwire
                )
            ) || (t.kind == TokenKind::Identifier && t.text == "none")
        });
        if !self.emitting() {
            return Ok(());
        }
        match net {
            Some(t) if line.len() == 1 => self.default_nettype = Some(t.text.clone()),
            _ => self.error_arg(
                DiagnosticCode::DIRECTIVE_SYNTAX,
                dir.location,
                "default_nettype",
            ),
        }
        Ok(())
    }

    fn handle_begin_keywords(&mut self, dir: &Token) -> Result<(), Fatal> {
        let line = self.collect_directive_line()?;
        let version = line.first().and_then(|t| match &t.value {
            Some(TokenValue::Str(s)) if t.kind == TokenKind::StringLiteral => {
                KeywordVersion::from_str(s)
            }
            _ => None,
        });
        if !self.emitting() {
            return Ok(());
        }
        match version {
            Some(v) => {
                self.keyword_stack.push(self.keyword_version);
                self.keyword_version = v;
            }
            None => {
                let arg = line
                    .first()
                    .map(|t| t.text.clone())
                    .unwrap_or_default();
                self.error_arg(DiagnosticCode::UNKNOWN_KEYWORD_VERSION, dir.location, arg);
            }
        }
        Ok(())
    }

    fn handle_end_keywords(&mut self, dir: &Token) -> Result<(), Fatal> {
        let _ = self.collect_directive_line()?;
        if !self.emitting() {
            return Ok(());
        }
        match self.keyword_stack.pop() {
            Some(v) => self.keyword_version = v,
            None => self.error(DiagnosticCode::UNMATCHED_END_KEYWORDS, dir.location),
        }
        Ok(())
    }

    fn handle_macro_usage(&mut self, dir: &Token) -> Result<(), Fatal> {
        if !self.emitting() {
            return Ok(());
        }
        let name = dir.directive_name().unwrap_or_default();
        let Some(def) = self.macros.get(name) else {
            self.error_arg(
                DiagnosticCode::UNKNOWN_DIRECTIVE,
                dir.location,
                dir.text.clone(),
            );
            return Ok(());
        };
        let def = def.clone();

        // A macro appearing inside its own expansion is not re-expanded.
        if self
            .source_stack
            .iter()
            .any(|s| matches!(s, Source::Macro(e) if e.name() == def.name.as_str()))
        {
            self.error_arg(DiagnosticCode::RECURSIVE_MACRO, dir.location, def.name.clone());
            return Ok(());
        }

        let mut use_end = dir.range().end;
        let args = if def.is_function_like() {
            let Some((actuals, end)) = self.parse_macro_args(dir)? else {
                return Ok(());
            };
            use_end = end;
            let Some(bound) = self.bind_arguments(&def, actuals, dir) else {
                return Ok(());
            };
            Some(bound)
        } else {
            None
        };

        let use_site = SourceRange::new(dir.location, use_end);
        let expander = MacroExpander::new(
            self.sm,
            &def,
            args,
            use_site,
            self.keyword_version,
            self.diags,
        );
        self.checked_push(Source::Macro(expander), dir.location)
    }

    // Collects `( ... )` actual arguments. Commas split arguments only at
    // the outermost level; `()`, `[]`, `{}`, and `begin`/`end` pairs nest.
    fn parse_macro_args(
        &mut self,
        dir: &Token,
    ) -> Result<Option<(Vec<Vec<Token>>, SourceLocation)>, Fatal> {
        let open = self.next_raw(LexerMode::Normal)?;
        if open.kind != TokenKind::LParen {
            self.error_arg(
                DiagnosticCode::EXPECTED_MACRO_ARGS,
                dir.location,
                dir.text.clone(),
            );
            self.lookahead = Some(open);
            return Ok(None);
        }

        let mut actuals: Vec<Vec<Token>> = Vec::new();
        let mut current: Vec<Token> = Vec::new();
        let mut delims: Vec<TokenKind> = Vec::new();
        loop {
            let tok = self.next_raw(LexerMode::Normal)?;
            match tok.kind {
                TokenKind::EndOfFile => {
                    self.error(DiagnosticCode::UNBALANCED_MACRO_ARGS, dir.location);
                    self.lookahead = Some(tok);
                    return Ok(None);
                }
                TokenKind::RParen if delims.is_empty() => {
                    let end = tok.range().end;
                    actuals.push(current);
                    return Ok(Some((actuals, end)));
                }
                TokenKind::Comma if delims.is_empty() => {
                    actuals.push(std::mem::take(&mut current));
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    delims.push(tok.kind);
                    current.push(tok);
                }
                TokenKind::Keyword(Keyword::Begin) => {
                    delims.push(tok.kind);
                    current.push(tok);
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    let matched = matches!(
                        (delims.last(), tok.kind),
                        (Some(TokenKind::LParen), TokenKind::RParen)
                            | (Some(TokenKind::LBracket), TokenKind::RBracket)
                            | (Some(TokenKind::LBrace), TokenKind::RBrace)
                    );
                    if matched {
                        delims.pop();
                        current.push(tok);
                    } else {
                        self.error(DiagnosticCode::UNBALANCED_MACRO_ARGS, tok.location);
                    }
                }
                TokenKind::Keyword(Keyword::End) => {
                    if delims.last() == Some(&TokenKind::Keyword(Keyword::Begin)) {
                        delims.pop();
                    }
                    current.push(tok);
                }
                _ => current.push(tok),
            }
        }
    }

    // Matches actuals to formals, filling in defaults. An omitted or empty
    // actual takes the default when one exists; an empty actual with no
    // default substitutes nothing; a missing actual with no default is an
    // arity error.
    fn bind_arguments(
        &mut self,
        def: &MacroDefinition,
        mut actuals: Vec<Vec<Token>>,
        dir: &Token,
    ) -> Option<Vec<(SmolStr, Vec<Token>)>> {
        let formals = def.formals.as_deref().unwrap_or(&[]);
        if formals.is_empty() && actuals.len() == 1 && actuals[0].is_empty() {
            actuals.clear();
        }
        if actuals.len() > formals.len() {
            self.arity_error(def, actuals.len(), dir);
            return None;
        }

        let mut bound = Vec::with_capacity(formals.len());
        for (i, formal) in formals.iter().enumerate() {
            let provided = actuals.get(i);
            let tokens = match provided {
                Some(ts) if !ts.is_empty() => ts.clone(),
                _ => match &formal.default {
                    Some(d) => d.clone(),
                    None if provided.is_some() => Vec::new(),
                    None => {
                        self.arity_error(def, actuals.len(), dir);
                        return None;
                    }
                },
            };
            bound.push((formal.name.clone(), tokens));
        }
        Some(bound)
    }

    fn arity_error(&mut self, def: &MacroDefinition, got: usize, dir: &Token) {
        let expected = def.formals.as_deref().unwrap_or(&[]).len();
        self.diags.push(
            Diagnostic::error(DiagnosticCode::MACRO_ARITY_MISMATCH, dir.location)
                .with_arg(def.name.clone())
                .with_arg(expected.to_string())
                .with_arg(got.to_string()),
        );
    }

    fn lex_predefines(&mut self, predefines: &[(SmolStr, SmolStr)]) {
        for (name, value) in predefines {
            let buffer = self
                .sm
                .assign_named_text(&format!("<predefine:{name}>"), value, None);
            let mut lexer = Lexer::new(&buffer);
            let mut body = Vec::new();
            loop {
                match lexer.next(LexerMode::Normal, self.keyword_version, self.diags) {
                    Ok(tok) if tok.kind == TokenKind::EndOfFile => break,
                    Ok(tok) => body.push(tok),
                    Err(fatal) => {
                        self.diags.push(fatal.diagnostic);
                        body.clear();
                        break;
                    }
                }
            }
            let def = MacroDefinition {
                name: name.clone(),
                formals: None,
                body,
                location: SourceLocation::new(buffer.id, 0u32),
            };
            self.predefines.push(def.clone());
            self.macros.define(def);
        }
    }

    fn error(&mut self, code: DiagnosticCode, loc: SourceLocation) {
        self.diags.push(Diagnostic::error(code, loc));
    }

    fn error_arg(&mut self, code: DiagnosticCode, loc: SourceLocation, arg: impl Into<SmolStr>) {
        self.diags.push(Diagnostic::error(code, loc).with_arg(arg));
    }
}

fn is_name(tok: &Token) -> bool {
    matches!(tok.kind, TokenKind::Identifier | TokenKind::Keyword(_))
}

fn int_value(tok: &Token) -> Option<u64> {
    match &tok.value {
        Some(TokenValue::Integer(v)) => v.to_u64(),
        _ => None,
    }
}

fn attach_leading(mut tok: Token, mut leading: Vec<Trivia>) -> Token {
    if !leading.is_empty() {
        leading.append(&mut tok.trivia);
        tok.trivia = leading;
    }
    tok
}
