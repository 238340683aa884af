//! Zero-copy lexer for Python-like source.
//!
//! Produces *logical lines* of [`TokenAt`] values that borrow `&'src str`
//! slices directly from the source buffer, plus the lexical findings the
//! scan cannot recover from token shape alone:
//!
//! - UNCLOSED_STRING at the opening quote (single-line and triple-quoted)
//! - UNCLOSED_BRACKET once per unmatched opener, at end of scan
//! - MIXED_TABS_SPACES per offending leading-whitespace run
//! - INVALID_NUMBER for literals with more than one decimal point
//!
//! Physical lines join into one logical line inside `(`, `[`, `{` and after
//! a trailing `\`. Comments and blank lines are skipped for token purposes
//! but keep their byte offsets, so line numbers stay accurate.
//!
//! Unlike a full tokenizer this one does not emit INDENT/DEDENT: each
//! logical line records the width of its leading whitespace and the
//! [`crate::indent::IndentTracker`] turns widths into events.

pub mod token;

pub use token::{Token, TokenAt, is_block_keyword, is_continuation_keyword, is_keyword};

use crate::location::offset_to_line_col;
use crate::types::{Diagnostic, DiagnosticKind};

/// Leading whitespace of a logical line's first physical line.
#[derive(Debug, Clone, Copy)]
pub struct IndentInfo {
    /// Width in columns, tabs advancing to the next multiple of 8.
    pub width: usize,
    /// Byte offset of the start of the physical line.
    pub offset: u32,
}

/// One logical line: bracket- and backslash-continued physical lines joined.
#[derive(Debug)]
pub struct LogicalLine<'src> {
    pub indent: IndentInfo,
    pub tokens: Vec<TokenAt<'src>>,
}

impl LogicalLine<'_> {
    /// Byte offset just past the last token, used for "end of line" anchors.
    pub fn end(&self) -> u32 {
        self.tokens.last().map(|t| t.end()).unwrap_or(self.indent.offset)
    }
}

#[derive(Debug)]
pub struct LexOutput<'src> {
    pub lines: Vec<LogicalLine<'src>>,
    pub findings: Vec<Diagnostic>,
}

/// Tokenize `source` into logical lines plus lexical findings.
pub fn tokenize<'src>(source: &'src str, filename: &str) -> LexOutput<'src> {
    Lexer::new(source).run(filename)
}

struct Pending {
    kind: DiagnosticKind,
    offset: u32,
    message: String,
    fix: Option<String>,
}

struct Lexer<'src> {
    src: &'src [u8],
    /// The same buffer as `&str`, for safe UTF-8 slicing without `unsafe`.
    src_str: &'src str,
    pos: usize,
    /// Open brackets: (opening byte, byte offset). Emptiness decides whether
    /// a newline terminates the logical line.
    brackets: Vec<(u8, u32)>,
    pending: Vec<Pending>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            src: source.as_bytes(),
            src_str: source,
            pos: 0,
            brackets: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn run(mut self, filename: &str) -> LexOutput<'src> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line() {
            if !line.tokens.is_empty() {
                lines.push(line);
            }
        }

        // One finding per unmatched opener, at its own offset.
        for &(b, off) in &self.brackets {
            let close = match b {
                b'(' => ')',
                b'[' => ']',
                _ => '}',
            };
            self.pending.push(Pending {
                kind: DiagnosticKind::UnclosedBracket,
                offset: off,
                message: format!("`{}` was never closed", b as char),
                fix: Some(format!("add a matching `{close}`")),
            });
        }

        let pending = std::mem::take(&mut self.pending);
        let findings = pending
            .into_iter()
            .map(|p| {
                let (line, col) = offset_to_line_col(p.offset as usize, self.src_str);
                let d = Diagnostic::new(filename, line, col, p.kind, p.message);
                match p.fix {
                    Some(fix) => d.with_fix(fix),
                    None => d,
                }
            })
            .collect();

        LexOutput { lines, findings }
    }

    // ── line assembly ─────────────────────────────────────────────────────

    fn next_line(&mut self) -> Option<LogicalLine<'src>> {
        let indent = self.scan_indent()?;
        let mut tokens = Vec::new();

        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            match b {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    if self.brackets.is_empty() {
                        break;
                    }
                    // implicit continuation inside brackets
                }
                b'\\' => {
                    // explicit continuation: consume `\` and the line break
                    self.pos += 1;
                    if self.src.get(self.pos) == Some(&b'\r') {
                        self.pos += 1;
                    }
                    if self.src.get(self.pos) == Some(&b'\n') {
                        self.pos += 1;
                    }
                }
                b'#' => {
                    while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ if self.is_string_start() => tokens.push(self.lex_string()),
                _ if b.is_ascii_digit()
                    || (b == b'.'
                        && self
                            .src
                            .get(self.pos + 1)
                            .is_some_and(|c| c.is_ascii_digit())) =>
                {
                    tokens.push(self.lex_number())
                }
                _ if b.is_ascii_alphabetic() || b == b'_' => tokens.push(self.lex_name()),
                _ => tokens.push(self.lex_operator()),
            }
        }

        Some(LogicalLine { indent, tokens })
    }

    /// Skip blank and comment-only lines, then measure the leading
    /// whitespace of the next line with content. `None` at end of input.
    fn scan_indent(&mut self) -> Option<IndentInfo> {
        loop {
            let start = self.pos;
            let mut width = 0usize;
            let mut tabs = false;
            let mut spaces = false;
            while self.pos < self.src.len() {
                match self.src[self.pos] {
                    b' ' => {
                        width += 1;
                        spaces = true;
                        self.pos += 1;
                    }
                    b'\t' => {
                        // tab stop at 8
                        width = (width + 8) & !7;
                        tabs = true;
                        self.pos += 1;
                    }
                    _ => break,
                }
            }

            if self.pos >= self.src.len() {
                return None;
            }
            match self.src[self.pos] {
                b'\n' => {
                    self.pos += 1;
                    continue;
                }
                b'\r' => {
                    self.pos += 1;
                    if self.src.get(self.pos) == Some(&b'\n') {
                        self.pos += 1;
                    }
                    continue;
                }
                b'#' => {
                    while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                    continue;
                }
                _ => {
                    if tabs && spaces {
                        self.pending.push(Pending {
                            kind: DiagnosticKind::MixedTabsSpaces,
                            offset: start as u32,
                            message: "indentation mixes tabs and spaces".to_string(),
                            fix: Some("use 4 spaces per indentation level".to_string()),
                        });
                    }
                    return Some(IndentInfo {
                        width,
                        offset: start as u32,
                    });
                }
            }
        }
    }

    // ── identifiers / keywords ────────────────────────────────────────────

    fn lex_name(&mut self) -> TokenAt<'src> {
        let start = self.pos;
        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        // Only ASCII bytes were consumed, so `start..pos` is a valid
        // char-boundary slice.
        let s = &self.src_str[start..self.pos];
        let token = if is_keyword(s) {
            Token::Keyword(s)
        } else {
            Token::Name(s)
        };
        TokenAt {
            token,
            offset: start as u32,
            len: (self.pos - start) as u32,
        }
    }

    // ── numbers ───────────────────────────────────────────────────────────

    fn lex_number(&mut self) -> TokenAt<'src> {
        let start = self.pos;
        let mut dots = 0usize;
        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            if b == b'.' {
                dots += 1;
                self.pos += 1;
            } else if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else if (b == b'+' || b == b'-')
                && matches!(self.src[self.pos - 1], b'e' | b'E')
                && self
                    .src
                    .get(self.pos + 1)
                    .is_some_and(|c| c.is_ascii_digit())
            {
                // exponent sign in a float literal
                self.pos += 1;
            } else {
                break;
            }
        }
        if dots > 1 {
            self.pending.push(Pending {
                kind: DiagnosticKind::InvalidNumber,
                offset: start as u32,
                message: "number literal has more than one decimal point".to_string(),
                fix: Some("remove the extra '.'".to_string()),
            });
        }
        TokenAt {
            token: Token::Number,
            offset: start as u32,
            len: (self.pos - start) as u32,
        }
    }

    // ── strings ───────────────────────────────────────────────────────────

    fn is_string_start(&self) -> bool {
        match self.src[self.pos] {
            b'"' | b'\'' => true,
            b'r' | b'R' | b'b' | b'B' | b'u' | b'U' | b'f' | b'F' => {
                let next = self.src.get(self.pos + 1).copied().unwrap_or(0);
                match next {
                    b'"' | b'\'' => true,
                    b'r' | b'R' | b'b' | b'B' | b'f' | b'F' => {
                        // two-letter prefix: rb, br, rf, fr, ...
                        let nn = self.src.get(self.pos + 2).copied().unwrap_or(0);
                        nn == b'"' || nn == b'\''
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn lex_string(&mut self) -> TokenAt<'src> {
        let start = self.pos;

        // prefix letters (r, b, u, f and two-letter combinations)
        let mut prefix = 0;
        while prefix < 2 {
            match self.src.get(self.pos) {
                Some(b'r' | b'R' | b'b' | b'B' | b'u' | b'U' | b'f' | b'F') => {
                    self.pos += 1;
                    prefix += 1;
                }
                _ => break,
            }
        }

        let quote_off = self.pos;
        let q = self.src[self.pos];
        let triple =
            self.src.get(self.pos + 1) == Some(&q) && self.src.get(self.pos + 2) == Some(&q);
        self.pos += if triple { 3 } else { 1 };

        let mut closed = false;
        if triple {
            while self.pos < self.src.len() {
                let b = self.src[self.pos];
                if b == b'\\' {
                    self.pos += 2;
                    continue;
                }
                if b == q
                    && self.src.get(self.pos + 1) == Some(&q)
                    && self.src.get(self.pos + 2) == Some(&q)
                {
                    self.pos += 3;
                    closed = true;
                    break;
                }
                self.pos += 1;
            }
        } else {
            while self.pos < self.src.len() {
                let b = self.src[self.pos];
                if b == b'\\' {
                    self.pos += 2;
                    continue;
                }
                if b == q {
                    self.pos += 1;
                    closed = true;
                    break;
                }
                if b == b'\n' {
                    // leave the newline for the line loop
                    break;
                }
                self.pos += 1;
            }
        }

        if !closed {
            let what = if triple { "triple-quoted string" } else { "string" };
            let delim = if triple {
                format!("{0}{0}{0}", q as char)
            } else {
                (q as char).to_string()
            };
            self.pending.push(Pending {
                kind: DiagnosticKind::UnclosedString,
                offset: quote_off as u32,
                message: format!("{what} opened with `{delim}` was never closed"),
                fix: Some(format!("add a closing `{delim}`")),
            });
        }

        // The span starts at an ASCII byte and ends at a quote, newline, or
        // EOF, so it is always a valid char-boundary slice.
        let end = self.pos.min(self.src.len());
        self.pos = end;
        let raw = &self.src_str[start..end];
        TokenAt {
            token: Token::Str(raw),
            offset: start as u32,
            len: (end - start) as u32,
        }
    }

    // ── operators / punctuation ───────────────────────────────────────────

    fn lex_operator(&mut self) -> TokenAt<'src> {
        let start = self.pos;
        let b = self.src[self.pos];
        self.pos += 1;
        let token = match b {
            b'(' => {
                self.brackets.push((b'(', start as u32));
                Token::LParen
            }
            b')' => {
                self.close_bracket(b'(');
                Token::RParen
            }
            b'[' => {
                self.brackets.push((b'[', start as u32));
                Token::LBracket
            }
            b']' => {
                self.close_bracket(b'[');
                Token::RBracket
            }
            b'{' => {
                self.brackets.push((b'{', start as u32));
                Token::LBrace
            }
            b'}' => {
                self.close_bracket(b'{');
                Token::RBrace
            }
            b',' => Token::Comma,
            b':' => {
                if self.src.get(self.pos) == Some(&b'=') {
                    // walrus: its colon never terminates a header
                    self.pos += 1;
                    Token::Op
                } else {
                    Token::Colon
                }
            }
            b'=' => {
                if self.src.get(self.pos) == Some(&b'=') {
                    self.pos += 1;
                    Token::Op
                } else {
                    Token::Eq
                }
            }
            b'*' => {
                if self.src.get(self.pos) == Some(&b'*') {
                    self.pos += 1;
                    if self.src.get(self.pos) == Some(&b'=') {
                        self.pos += 1;
                        Token::Op
                    } else {
                        Token::DblStar
                    }
                } else if self.src.get(self.pos) == Some(&b'=') {
                    self.pos += 1;
                    Token::Op
                } else {
                    Token::Star
                }
            }
            b'+' | b'-' | b'/' | b'%' | b'&' | b'|' | b'^' | b'<' | b'>' | b'!' | b'@' => {
                // absorb compound forms: ->, //, //=, <<=, >>=, !=, +=, ...
                while matches!(self.src.get(self.pos), Some(b'=' | b'<' | b'>' | b'/')) {
                    self.pos += 1;
                }
                Token::Op
            }
            _ => Token::Op,
        };
        TokenAt {
            token,
            offset: start as u32,
            len: (self.pos - start) as u32,
        }
    }

    fn close_bracket(&mut self, open: u8) {
        // Stray or mismatched closers are ignored here; any opener left on
        // the stack is reported once at end of scan.
        if self.brackets.last().map(|&(b, _)| b) == Some(open) {
            self.brackets.pop();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
