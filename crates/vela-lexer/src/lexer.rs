use std::sync::Arc;

use smol_str::SmolStr;
use vela_diag::{Diagnostic, DiagnosticCode, Diagnostics, Fatal};
use vela_source::{BufferId, SourceBuffer, SourceLocation};

use crate::keywords::{KeywordVersion, classify};
use crate::value::{Base, BitVector, TokenValue};
use crate::{LexerMode, Token, TokenKind, Trivia, TriviaKind};

/// Produces a lazy token sequence over one buffer until EOF.
///
/// The caller picks a [`LexerMode`] per fetch; the keyword version is also
/// per-fetch because `` `begin_keywords `` can change it mid-buffer. The
/// lexer shares the buffer text with the source manager, so it stays valid
/// while further buffers are registered.
pub struct Lexer {
    buffer: BufferId,
    text: Arc<str>,
    pos: usize,
}

impl Lexer {
    pub fn new(buffer: &SourceBuffer) -> Self {
        Self {
            buffer: buffer.id,
            text: buffer.text.clone(),
            pos: 0,
        }
    }

    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    /// Lexes the next token, attaching any leading trivia.
    ///
    /// The only fatal condition is a block comment left open at EOF.
    pub fn next(
        &mut self,
        mode: LexerMode,
        version: KeywordVersion,
        diags: &mut Diagnostics,
    ) -> Result<Token, Fatal> {
        let mut trivia = Vec::new();
        if let Some(mut tok) = self.scan_trivia(mode, &mut trivia)? {
            tok.trivia = trivia;
            return Ok(tok);
        }

        if self.pos >= self.text.len() {
            let kind = match mode {
                LexerMode::Normal => TokenKind::EndOfFile,
                _ => TokenKind::EndOfDirective,
            };
            let mut tok = Token::new(kind, "", self.loc(self.pos));
            tok.trivia = trivia;
            return Ok(tok);
        }

        let start = self.pos;
        let (kind, value) = if mode == LexerMode::IncludeFileName
            && matches!(self.peek(0), Some(b'"') | Some(b'<'))
        {
            self.lex_include_file_name(diags)
        } else {
            self.lex_token(version, diags)
        };

        let mut tok = Token::new(kind, &self.text[start..self.pos], self.loc(start));
        tok.trivia = trivia;
        tok.value = value;
        Ok(tok)
    }

    fn peek(&self, n: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + n).copied()
    }

    fn loc(&self, at: usize) -> SourceLocation {
        SourceLocation::new(self.buffer, at as u32)
    }

    // Collects whitespace, comments, and line continuations. In directive
    // mode an unescaped newline is left unconsumed and an EndOfDirective
    // token is synthesized in its place.
    fn scan_trivia(
        &mut self,
        mode: LexerMode,
        out: &mut Vec<Trivia>,
    ) -> Result<Option<Token>, Fatal> {
        loop {
            let start = self.pos;
            match self.peek(0) {
                Some(b'\n') if mode != LexerMode::Normal => {
                    return Ok(Some(Token::new(
                        TokenKind::EndOfDirective,
                        "",
                        self.loc(self.pos),
                    )));
                }
                Some(c) if c.is_ascii_whitespace() => {
                    while let Some(c) = self.peek(0) {
                        if !c.is_ascii_whitespace() {
                            break;
                        }
                        if c == b'\n' && mode != LexerMode::Normal {
                            break;
                        }
                        self.pos += 1;
                    }
                    self.push_trivia(out, TriviaKind::Whitespace, start);
                }
                Some(b'/') if self.peek(1) == Some(b'/') => {
                    while let Some(c) = self.peek(0) {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                    self.push_trivia(out, TriviaKind::LineComment, start);
                }
                Some(b'/') if self.peek(1) == Some(b'*') => {
                    match self.text[self.pos + 2..].find("*/") {
                        Some(i) => self.pos += i + 4,
                        None => {
                            return Err(Fatal::new(Diagnostic::error(
                                DiagnosticCode::UNTERMINATED_BLOCK_COMMENT,
                                self.loc(start),
                            )));
                        }
                    }
                    self.push_trivia(out, TriviaKind::BlockComment, start);
                }
                Some(b'\\') if self.peek(1) == Some(b'\n') => {
                    self.pos += 2;
                    self.push_trivia(out, TriviaKind::LineContinuation, start);
                }
                Some(b'\\') if self.peek(1) == Some(b'\r') && self.peek(2) == Some(b'\n') => {
                    self.pos += 3;
                    self.push_trivia(out, TriviaKind::LineContinuation, start);
                }
                _ => return Ok(None),
            }
        }
    }

    fn push_trivia(&self, out: &mut Vec<Trivia>, kind: TriviaKind, start: usize) {
        out.push(Trivia::new(kind, &self.text[start..self.pos]));
    }

    fn lex_include_file_name(&mut self, diags: &mut Diagnostics) -> (TokenKind, Option<TokenValue>) {
        let start = self.pos;
        let close = if self.peek(0) == Some(b'<') { b'>' } else { b'"' };
        self.pos += 1;
        loop {
            match self.peek(0) {
                Some(c) if c == close => {
                    self.pos += 1;
                    break;
                }
                Some(b'\n') | None => {
                    diags.push(Diagnostic::error(
                        DiagnosticCode::UNTERMINATED_STRING,
                        self.loc(start),
                    ));
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        let inner_end = if self.text.as_bytes()[self.pos - 1] == close && self.pos > start + 1 {
            self.pos - 1
        } else {
            self.pos
        };
        let path = SmolStr::new(&self.text[start + 1..inner_end]);
        (TokenKind::IncludeFileName, Some(TokenValue::Str(path)))
    }

    fn lex_token(
        &mut self,
        version: KeywordVersion,
        diags: &mut Diagnostics,
    ) -> (TokenKind, Option<TokenValue>) {
        let Some(c) = self.peek(0) else {
            return (TokenKind::EndOfFile, None);
        };

        if c == b'`' {
            return (self.lex_backtick(diags), None);
        }
        if c.is_ascii_alphabetic() || c == b'_' {
            return (self.lex_ident(version), None);
        }
        if c.is_ascii_digit() {
            return self.lex_number(diags);
        }
        if c == b'"' {
            return self.lex_string(diags);
        }
        if c == b'\'' {
            return self.lex_tick(diags);
        }
        if c == b'\\' {
            return (self.lex_escaped_ident(), None);
        }
        if c == b'$' {
            if matches!(self.peek(1), Some(n) if n.is_ascii_alphabetic() || n == b'_' || n == b'$')
            {
                self.pos += 1;
                while matches!(self.peek(0), Some(n) if n.is_ascii_alphanumeric() || n == b'_' || n == b'$')
                {
                    self.pos += 1;
                }
                return (TokenKind::SystemIdentifier, None);
            }
            self.pos += 1;
            return (TokenKind::Dollar, None);
        }
        if let Some(kind) = self.lex_operator() {
            return (kind, None);
        }

        diags.push(Diagnostic::error(
            DiagnosticCode::UNKNOWN_CHARACTER,
            self.loc(self.pos),
        ));
        // Consume a whole character so slicing stays on UTF-8 boundaries.
        let len = self.text[self.pos..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.pos += len;
        (TokenKind::Unknown, None)
    }

    fn lex_backtick(&mut self, diags: &mut Diagnostics) -> TokenKind {
        match self.peek(1) {
            Some(b'"') => {
                self.pos += 2;
                TokenKind::MacroQuote
            }
            Some(b'`') => {
                self.pos += 2;
                TokenKind::MacroPaste
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                self.pos += 2;
                while matches!(self.peek(0), Some(n) if n.is_ascii_alphanumeric() || n == b'_') {
                    self.pos += 1;
                }
                TokenKind::Directive
            }
            _ => {
                diags.push(Diagnostic::error(
                    DiagnosticCode::UNKNOWN_CHARACTER,
                    self.loc(self.pos),
                ));
                self.pos += 1;
                TokenKind::Unknown
            }
        }
    }

    fn lex_ident(&mut self, version: KeywordVersion) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(0), Some(c) if c.is_ascii_alphanumeric() || c == b'_' || c == b'$')
        {
            self.pos += 1;
        }
        match classify(&self.text[start..self.pos], version) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Identifier,
        }
    }

    fn lex_escaped_ident(&mut self) -> TokenKind {
        self.pos += 1;
        let start = self.pos;
        while matches!(self.peek(0), Some(c) if !c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        if self.pos == start {
            return TokenKind::Unknown;
        }
        TokenKind::EscapedIdentifier
    }

    fn lex_string(&mut self, diags: &mut Diagnostics) -> (TokenKind, Option<TokenValue>) {
        let start = self.pos;
        self.pos += 1;
        let mut decoded = String::new();
        loop {
            match self.peek(0) {
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => self.lex_escape(&mut decoded, diags),
                Some(b'\n') | None => {
                    diags.push(Diagnostic::error(
                        DiagnosticCode::UNTERMINATED_STRING,
                        self.loc(start),
                    ));
                    break;
                }
                Some(c) => {
                    decoded.push(c as char);
                    self.pos += 1;
                }
            }
        }
        (
            TokenKind::StringLiteral,
            Some(TokenValue::Str(SmolStr::new(decoded))),
        )
    }

    // Decodes one backslash escape inside a string literal.
    fn lex_escape(&mut self, decoded: &mut String, diags: &mut Diagnostics) {
        let esc_at = self.pos;
        self.pos += 1;
        match self.peek(0) {
            // Escaped newline splices the string across lines.
            Some(b'\n') => self.pos += 1,
            Some(b'\r') if self.peek(1) == Some(b'\n') => self.pos += 2,
            Some(b'n') => {
                decoded.push('\n');
                self.pos += 1;
            }
            Some(b't') => {
                decoded.push('\t');
                self.pos += 1;
            }
            Some(b'\\') => {
                decoded.push('\\');
                self.pos += 1;
            }
            Some(b'"') => {
                decoded.push('"');
                self.pos += 1;
            }
            Some(b'v') => {
                decoded.push('\x0b');
                self.pos += 1;
            }
            Some(b'f') => {
                decoded.push('\x0c');
                self.pos += 1;
            }
            Some(b'a') => {
                decoded.push('\x07');
                self.pos += 1;
            }
            Some(b'x') => {
                self.pos += 1;
                let mut value = 0u32;
                let mut any = false;
                while let Some(c) = self.peek(0) {
                    let Some(d) = (c as char).to_digit(16) else {
                        break;
                    };
                    value = (value * 16 + d) & 0xff;
                    any = true;
                    self.pos += 1;
                }
                if any {
                    decoded.push(value as u8 as char);
                } else {
                    diags.push(Diagnostic::error(
                        DiagnosticCode::INVALID_ESCAPE,
                        self.loc(esc_at),
                    ));
                }
            }
            Some(c @ b'0'..=b'7') => {
                let mut value = 0u32;
                let mut count = 0;
                let mut cur = c;
                while count < 3 && (b'0'..=b'7').contains(&cur) {
                    value = value * 8 + (cur - b'0') as u32;
                    self.pos += 1;
                    count += 1;
                    cur = self.peek(0).unwrap_or(b' ');
                }
                decoded.push((value & 0xff) as u8 as char);
            }
            Some(c) => {
                diags.push(Diagnostic::error(
                    DiagnosticCode::INVALID_ESCAPE,
                    self.loc(esc_at),
                ));
                decoded.push(c as char);
                self.pos += 1;
            }
            None => diags.push(Diagnostic::error(
                DiagnosticCode::INVALID_ESCAPE,
                self.loc(esc_at),
            )),
        }
    }

    fn lex_tick(&mut self, diags: &mut Diagnostics) -> (TokenKind, Option<TokenValue>) {
        match self.peek(1) {
            Some(b'{') => {
                self.pos += 2;
                (TokenKind::TickBrace, None)
            }
            Some(c @ (b'0' | b'1' | b'x' | b'X' | b'z' | b'Z')) if !self.ident_continues(2) => {
                self.pos += 2;
                let value = match c {
                    b'0' => BitVector::zero(1, false),
                    b'1' => BitVector::from_u64(1, false, 1),
                    b'x' | b'X' => BitVector::filled_x(1, false),
                    _ => BitVector::filled_z(1, false),
                };
                (
                    TokenKind::UnbasedUnsizedLiteral,
                    Some(TokenValue::Integer(value)),
                )
            }
            Some(c) if Base::from_char(c).is_some() => self.lex_based(None, diags),
            Some(b's' | b'S') if matches!(self.peek(2), Some(c) if Base::from_char(c).is_some()) => {
                self.lex_based(None, diags)
            }
            _ => {
                self.pos += 1;
                (TokenKind::Apostrophe, None)
            }
        }
    }

    // Lexes `'[s]<base><digits>` with `declared` carrying a size prefix
    // already consumed by lex_number. The cursor sits on the apostrophe.
    fn lex_based(
        &mut self,
        declared: Option<u32>,
        diags: &mut Diagnostics,
    ) -> (TokenKind, Option<TokenValue>) {
        let lit_start = self.pos;
        self.pos += 1;
        let signed = matches!(self.peek(0), Some(b's' | b'S'));
        if signed {
            self.pos += 1;
        }
        let Some(base) = self.peek(0).and_then(Base::from_char) else {
            diags.push(Diagnostic::error(
                DiagnosticCode::MALFORMED_LITERAL,
                self.loc(lit_start),
            ));
            return (TokenKind::Unknown, None);
        };
        self.pos += 1;

        let digit_start = self.pos;
        while matches!(
            self.peek(0),
            Some(c) if c.is_ascii_hexdigit() || matches!(c, b'_' | b'x' | b'X' | b'z' | b'Z' | b'?')
        ) {
            self.pos += 1;
        }

        let digits = &self.text[digit_start..self.pos];
        match BitVector::parse(base, digits, declared, signed) {
            Some(parsed) => {
                if parsed.truncated {
                    diags.push(Diagnostic::warning(
                        DiagnosticCode::LITERAL_WIDTH_TRUNCATED,
                        self.loc(lit_start),
                    ));
                }
                (
                    TokenKind::IntLiteral,
                    Some(TokenValue::Integer(parsed.value)),
                )
            }
            None => {
                diags.push(Diagnostic::error(
                    DiagnosticCode::MALFORMED_LITERAL,
                    self.loc(lit_start),
                ));
                (TokenKind::IntLiteral, None)
            }
        }
    }

    fn lex_number(&mut self, diags: &mut Diagnostics) -> (TokenKind, Option<TokenValue>) {
        let start = self.pos;
        while matches!(self.peek(0), Some(c) if c.is_ascii_digit() || c == b'_') {
            self.pos += 1;
        }

        // Fractional part makes it a real (or time) literal.
        if self.peek(0) == Some(b'.') && matches!(self.peek(1), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
            while matches!(self.peek(0), Some(c) if c.is_ascii_digit() || c == b'_') {
                self.pos += 1;
            }
            self.scan_exponent();
            return self.finish_real(start, diags);
        }

        // Exponent without a decimal point, e.g. `23E10`.
        if matches!(self.peek(0), Some(b'e' | b'E')) {
            let sign = matches!(self.peek(1), Some(b'+' | b'-')) as usize;
            if matches!(self.peek(1 + sign), Some(c) if c.is_ascii_digit()) {
                self.scan_exponent();
                return self.finish_real(start, diags);
            }
        }

        if let Some(len) = self.time_suffix_len() {
            let numeric: String = self.text[start..self.pos]
                .chars()
                .filter(|&c| c != '_')
                .collect();
            self.pos += len;
            let value = numeric.parse::<f64>().ok().map(TokenValue::Real);
            return (TokenKind::TimeLiteral, value);
        }

        // A size prefix directly followed by a based literal.
        if self.peek(0) == Some(b'\'') {
            let after = match self.peek(1) {
                Some(b's' | b'S') => self.peek(2),
                other => other,
            };
            if after.is_some_and(|c| Base::from_char(c).is_some()) {
                let size_text: String = self.text[start..self.pos]
                    .chars()
                    .filter(|&c| c != '_')
                    .collect();
                let declared = match size_text.parse::<u32>() {
                    Ok(0) | Err(_) => {
                        diags.push(Diagnostic::error(
                            DiagnosticCode::MALFORMED_LITERAL,
                            self.loc(start),
                        ));
                        None
                    }
                    Ok(w) => Some(w),
                };
                return self.lex_based(declared, diags);
            }
        }

        // Plain unsized decimal.
        let digits = &self.text[start..self.pos];
        let value = BitVector::parse(Base::Decimal, digits, None, true)
            .map(|p| TokenValue::Integer(p.value));
        (TokenKind::IntLiteral, value)
    }

    fn scan_exponent(&mut self) {
        if matches!(self.peek(0), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            while matches!(self.peek(0), Some(c) if c.is_ascii_digit() || c == b'_') {
                self.pos += 1;
            }
        }
    }

    fn finish_real(&mut self, start: usize, diags: &mut Diagnostics) -> (TokenKind, Option<TokenValue>) {
        if let Some(len) = self.time_suffix_len() {
            let numeric: String = self.text[start..self.pos]
                .chars()
                .filter(|&c| c != '_')
                .collect();
            self.pos += len;
            return (
                TokenKind::TimeLiteral,
                numeric.parse::<f64>().ok().map(TokenValue::Real),
            );
        }
        let numeric: String = self.text[start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        match numeric.parse::<f64>() {
            Ok(v) => (TokenKind::RealLiteral, Some(TokenValue::Real(v))),
            Err(_) => {
                diags.push(Diagnostic::error(
                    DiagnosticCode::MALFORMED_LITERAL,
                    self.loc(start),
                ));
                (TokenKind::RealLiteral, None)
            }
        }
    }

    // `s ms us ns ps fs` directly after the numeric part.
    fn time_suffix_len(&self) -> Option<usize> {
        let len = match self.peek(0) {
            Some(b's') => 1,
            Some(b'f' | b'm' | b'n' | b'p' | b'u') if self.peek(1) == Some(b's') => 2,
            _ => return None,
        };
        if self.ident_continues(len) {
            return None;
        }
        Some(len)
    }

    fn ident_continues(&self, n: usize) -> bool {
        matches!(self.peek(n), Some(c) if c.is_ascii_alphanumeric() || c == b'_')
    }

    // Longest-match operator and punctuation dispatch.
    fn lex_operator(&mut self) -> Option<TokenKind> {
        use TokenKind::*;
        let rest = &self.text.as_bytes()[self.pos..];
        let (kind, len) = match rest {
            [b'<', b'<', b'<', b'=', ..] => (LtLtLtEq, 4),
            [b'>', b'>', b'>', b'=', ..] => (GtGtGtEq, 4),

            [b'=', b'=', b'=', ..] => (EqEqEq, 3),
            [b'=', b'=', b'?', ..] => (EqEqQuestion, 3),
            [b'!', b'=', b'=', ..] => (BangEqEq, 3),
            [b'!', b'=', b'?', ..] => (BangEqQuestion, 3),
            [b'<', b'<', b'<', ..] => (LtLtLt, 3),
            [b'>', b'>', b'>', ..] => (GtGtGt, 3),
            [b'<', b'<', b'=', ..] => (LtLtEq, 3),
            [b'>', b'>', b'=', ..] => (GtGtEq, 3),
            [b'<', b'-', b'>', ..] => (LtMinusGt, 3),

            [b'=', b'=', ..] => (EqEq, 2),
            [b'!', b'=', ..] => (BangEq, 2),
            [b'<', b'=', ..] => (LtEq, 2),
            [b'>', b'=', ..] => (GtEq, 2),
            [b'<', b'<', ..] => (LtLt, 2),
            [b'>', b'>', ..] => (GtGt, 2),
            [b'&', b'&', ..] => (AmpAmp, 2),
            [b'|', b'|', ..] => (PipePipe, 2),
            [b'*', b'*', ..] => (StarStar, 2),
            [b'+', b'+', ..] => (PlusPlus, 2),
            [b'-', b'-', ..] => (MinusMinus, 2),
            [b'+', b'=', ..] => (PlusEq, 2),
            [b'-', b'=', ..] => (MinusEq, 2),
            [b'*', b'=', ..] => (StarEq, 2),
            [b'/', b'=', ..] => (SlashEq, 2),
            [b'%', b'=', ..] => (PercentEq, 2),
            [b'&', b'=', ..] => (AmpEq, 2),
            [b'|', b'=', ..] => (PipeEq, 2),
            [b'^', b'=', ..] => (CaretEq, 2),
            [b'~', b'&', ..] => (TildeAmp, 2),
            [b'~', b'|', ..] => (TildePipe, 2),
            [b'~', b'^', ..] => (TildeCaret, 2),
            [b'^', b'~', ..] => (CaretTilde, 2),
            [b'-', b'>', ..] => (MinusGt, 2),
            [b':', b':', ..] => (ColonColon, 2),
            [b'.', b'*', ..] => (DotStar, 2),
            [b'#', b'#', ..] => (HashHash, 2),

            [b'+', ..] => (Plus, 1),
            [b'-', ..] => (Minus, 1),
            [b'*', ..] => (Star, 1),
            [b'/', ..] => (Slash, 1),
            [b'%', ..] => (Percent, 1),
            [b'=', ..] => (Eq, 1),
            [b'!', ..] => (Bang, 1),
            [b'<', ..] => (Lt, 1),
            [b'>', ..] => (Gt, 1),
            [b'&', ..] => (Amp, 1),
            [b'|', ..] => (Pipe, 1),
            [b'^', ..] => (Caret, 1),
            [b'~', ..] => (Tilde, 1),
            [b'?', ..] => (Question, 1),
            [b':', ..] => (Colon, 1),
            [b';', ..] => (Semicolon, 1),
            [b',', ..] => (Comma, 1),
            [b'.', ..] => (Dot, 1),
            [b'(', ..] => (LParen, 1),
            [b')', ..] => (RParen, 1),
            [b'[', ..] => (LBracket, 1),
            [b']', ..] => (RBracket, 1),
            [b'{', ..] => (LBrace, 1),
            [b'}', ..] => (RBrace, 1),
            [b'#', ..] => (Hash, 1),
            [b'@', ..] => (At, 1),
            _ => return None,
        };
        self.pos += len;
        Some(kind)
    }
}

/// Re-lexes pasted macro text as a standalone token.
///
/// Returns the token only when the whole text forms exactly one clean
/// token with no trivia and no diagnostics; the caller treats anything
/// else as an invalid paste.
pub fn relex_single(text: &str, version: KeywordVersion) -> Option<Token> {
    let buffer = SourceBuffer {
        id: BufferId(u32::MAX),
        text: Arc::from(text),
    };
    let mut lexer = Lexer::new(&buffer);
    let mut diags = Diagnostics::new();
    let tok = lexer.next(LexerMode::Normal, version, &mut diags).ok()?;
    let eof = lexer.next(LexerMode::Normal, version, &mut diags).ok()?;
    let clean = eof.kind == TokenKind::EndOfFile
        && eof.trivia.is_empty()
        && tok.trivia.is_empty()
        && tok.text == text
        && diags.is_empty();
    clean.then_some(tok)
}
