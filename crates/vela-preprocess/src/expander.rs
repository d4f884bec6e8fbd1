use smol_str::SmolStr;
use vela_diag::{Diagnostic, DiagnosticCode, Diagnostics};
use vela_lexer::{KeywordVersion, Token, TokenKind, TokenValue, relex_single};
use vela_source::{ExpansionKind, SourceLocation, SourceManager, SourceRange};

use crate::macros::MacroDefinition;

/// Produces the token stream of one macro use.
///
/// The whole expansion is computed up front (substitution, stringify,
/// paste, location rewriting) and then drained one token at a time
/// through [`next`](Self::next).
pub(crate) struct MacroExpander {
    name: SmolStr,
    tokens: Vec<Token>,
    index: usize,
}

impl MacroExpander {
    pub(crate) fn new(
        sm: &mut SourceManager,
        def: &MacroDefinition,
        args: Option<Vec<(SmolStr, Vec<Token>)>>,
        use_site: SourceRange,
        version: KeywordVersion,
        diags: &mut Diagnostics,
    ) -> Self {
        Self {
            name: def.name.clone(),
            tokens: expand(sm, def, args.as_deref(), use_site, version, diags),
            index: 0,
        }
    }

    /// The macro this frame expands; the preprocessor refuses to open a
    /// second frame for the same name.
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_active(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub(crate) fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.index)?.clone();
        self.index += 1;
        Some(tok)
    }
}

fn expand(
    sm: &mut SourceManager,
    def: &MacroDefinition,
    args: Option<&[(SmolStr, Vec<Token>)]>,
    use_site: SourceRange,
    version: KeywordVersion,
    diags: &mut Diagnostics,
) -> Vec<Token> {
    if def.body.is_empty() {
        return Vec::new();
    }

    // All body tokens share one expansion buffer; each keeps its offset
    // relative to the first body token, so positions inside the expansion
    // stay distinct and the original location is recoverable by adding
    // the offset back.
    let base = def.body[0].location;
    let exp_base = sm.create_expansion_loc(
        base,
        use_site,
        ExpansionKind::MacroBody,
        Some(def.name.clone()),
    );
    let body_loc = |loc: SourceLocation| {
        if loc.buffer == base.buffer {
            exp_base.offset_by(loc.offset - base.offset)
        } else {
            exp_base
        }
    };

    let mut stream: Vec<Token> = Vec::new();
    for tok in &def.body {
        if matches!(tok.kind, TokenKind::Identifier | TokenKind::Keyword(_))
            && let Some((_, actual)) = args.and_then(|a| a.iter().find(|(n, _)| *n == tok.text))
        {
            push_argument(sm, &mut stream, tok, actual, body_loc(tok.location));
            continue;
        }
        let mut out = tok.clone();
        out.location = body_loc(tok.location);
        stream.push(out);
    }

    let stream = apply_stringify(stream, diags);
    apply_paste(stream, version, diags)
}

// Splices an actual argument in place of a formal reference. The argument
// tokens get a MacroArg expansion buffer whose range is the formal's
// occurrence inside the body expansion.
fn push_argument(
    sm: &mut SourceManager,
    stream: &mut Vec<Token>,
    formal_tok: &Token,
    actual: &[Token],
    param_loc: SourceLocation,
) {
    let Some(first) = actual.first() else {
        return;
    };
    let param_range = SourceRange::new(param_loc, param_loc.offset_by(formal_tok.len()));
    let arg_base =
        sm.create_expansion_loc(first.location, param_range, ExpansionKind::MacroArg, None);

    for (i, tok) in actual.iter().enumerate() {
        let mut out = tok.clone();
        out.location = if tok.location.buffer == first.location.buffer {
            arg_base.offset_by(tok.location.offset - first.location.offset)
        } else {
            arg_base
        };
        if i == 0 {
            out.trivia = formal_tok.trivia.clone();
        }
        stream.push(out);
    }
}

// Collapses `` `" ... `" `` sequences into a single string literal built
// from the enclosed (already substituted) token texts.
fn apply_stringify(stream: Vec<Token>, diags: &mut Diagnostics) -> Vec<Token> {
    if !stream.iter().any(|t| t.kind == TokenKind::MacroQuote) {
        return stream;
    }

    let mut out = Vec::with_capacity(stream.len());
    let mut iter = stream.into_iter();
    while let Some(tok) = iter.next() {
        if tok.kind != TokenKind::MacroQuote {
            out.push(tok);
            continue;
        }

        let mut pieces = String::new();
        let mut closed = false;
        let mut count = 0usize;
        for inner in iter.by_ref() {
            if inner.kind == TokenKind::MacroQuote {
                closed = true;
                break;
            }
            if count > 0 && !inner.trivia.is_empty() {
                pieces.push(' ');
            }
            pieces.push_str(&inner.text);
            count += 1;
        }
        if !closed {
            diags.push(
                Diagnostic::error(DiagnosticCode::DIRECTIVE_SYNTAX, tok.location)
                    .with_arg("unterminated macro stringification"),
            );
        }

        let mut lit = Token::new(
            TokenKind::StringLiteral,
            format!("\"{pieces}\""),
            tok.location,
        );
        lit.trivia = tok.trivia;
        lit.value = Some(TokenValue::Str(SmolStr::new(&pieces)));
        out.push(lit);
    }
    out
}

// Joins the operands of every ```` `` ```` marker and re-lexes the joined
// text. A paste that does not form one clean token leaves its operands in
// place.
fn apply_paste(stream: Vec<Token>, version: KeywordVersion, diags: &mut Diagnostics) -> Vec<Token> {
    if !stream.iter().any(|t| t.kind == TokenKind::MacroPaste) {
        return stream;
    }

    let mut out: Vec<Token> = Vec::with_capacity(stream.len());
    let mut iter = stream.into_iter();
    while let Some(tok) = iter.next() {
        if tok.kind != TokenKind::MacroPaste {
            out.push(tok);
            continue;
        }

        let prev = out.pop();
        let next = iter.next();
        match (prev, next) {
            (Some(prev), Some(next)) => {
                let joined = format!("{}{}", prev.text, next.text);
                match relex_single(&joined, version) {
                    Some(mut merged) => {
                        merged.location = prev.location;
                        merged.trivia = prev.trivia;
                        out.push(merged);
                    }
                    None => {
                        diags.push(
                            Diagnostic::error(DiagnosticCode::INVALID_TOKEN_PASTE, tok.location)
                                .with_arg(joined),
                        );
                        out.push(prev);
                        out.push(next);
                    }
                }
            }
            (prev, next) => {
                diags.push(Diagnostic::error(
                    DiagnosticCode::INVALID_TOKEN_PASTE,
                    tok.location,
                ));
                out.extend(prev);
                out.extend(next);
            }
        }
    }
    out
}
