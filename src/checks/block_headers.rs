//! Block-header validation.
//!
//! Three rules over the logical lines and their indentation events:
//!
//! 1. A compound-statement header (`if`, `for`, `def`, ...) must end with a
//!    colon outside any brackets, else MISSING_COLON at the line end.
//! 2. When the colon is the last token of the line, the next logical line
//!    must be indented, else BAD_INDENT (including a missing body at end of
//!    input, and indents that nothing introduced).
//! 3. `elif`/`else`/`except`/`finally` must continue a compatible block at
//!    the same indentation width, else DANGLING_ELSE.

use crate::indent::{Change, IndentEvent};
use crate::lexer::{LogicalLine, Token, is_block_keyword, is_continuation_keyword};
use crate::location::offset_to_line_col;
use crate::types::{Diagnostic, DiagnosticKind};
use std::collections::HashMap;

/// What a continuation keyword may attach to. `root` is the keyword that
/// opened the chain at this width, `last` the most recent link.
fn pairs_with(kw: &str, root: &str, last: &str) -> bool {
    let root_ok = match kw {
        "elif" => root == "if",
        "else" => matches!(root, "if" | "for" | "while" | "try"),
        "except" | "finally" => root == "try",
        _ => false,
    };
    let seq_ok = match kw {
        "elif" => matches!(last, "if" | "elif"),
        "else" => matches!(last, "if" | "elif" | "for" | "while" | "try" | "except"),
        "except" => matches!(last, "try" | "except"),
        "finally" => matches!(last, "try" | "except" | "else"),
        _ => false,
    };
    root_ok && seq_ok
}

/// The block keyword starting this line, seen through a leading `async`.
fn header_keyword<'src>(line: &LogicalLine<'src>) -> Option<(&'src str, usize)> {
    match line.tokens.first().map(|t| &t.token) {
        Some(Token::Keyword("async")) => match line.tokens.get(1).map(|t| &t.token) {
            Some(Token::Keyword(k)) if is_block_keyword(k) => Some((*k, 1)),
            _ => None,
        },
        Some(Token::Keyword(k)) if is_block_keyword(k) => Some((*k, 0)),
        _ => None,
    }
}

/// Index of the last colon outside any brackets, if one exists. Annotation
/// and slice colons sit inside `()`/`[]` and never match; the walrus `:=`
/// is lexed as a plain operator.
fn top_level_colon(line: &LogicalLine<'_>) -> Option<usize> {
    let mut depth = 0i32;
    let mut found = None;
    for (j, t) in line.tokens.iter().enumerate() {
        match t.token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth = (depth - 1).max(0),
            Token::Colon if depth == 0 => found = Some(j),
            _ => {}
        }
    }
    found
}

/// True when line `i - 1` legitimately introduces an indented line: it ends
/// with a colon, or it is a (possibly broken) block header that has already
/// been reported.
fn prev_opens_block(lines: &[LogicalLine<'_>], i: usize) -> bool {
    if i == 0 {
        return false;
    }
    let prev = &lines[i - 1];
    matches!(prev.tokens.last().map(|t| &t.token), Some(Token::Colon))
        || header_keyword(prev).is_some()
}

pub fn check_block_headers(
    lines: &[LogicalLine<'_>],
    events: &[IndentEvent],
    filename: &str,
    source: &str,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    // Per indentation width: (root keyword, most recent link) of the open
    // header chain, used to resolve continuation keywords.
    let mut chain: HashMap<usize, (&str, &str)> = HashMap::new();

    for (i, line) in lines.iter().enumerate() {
        let width = line.indent.width;
        // dedenting below a width invalidates every chain recorded deeper
        chain.retain(|&w, _| w <= width);

        if events[i].change == Change::Indent && !prev_opens_block(lines, i) {
            let (l, c) = offset_to_line_col(line.tokens[0].offset as usize, source);
            diags.push(
                Diagnostic::new(filename, l, c, DiagnosticKind::BadIndent, "unexpected indent")
                    .with_fix("align with the enclosing block"),
            );
        }

        let Some((kw, kw_idx)) = header_keyword(line) else {
            chain.remove(&width);
            continue;
        };

        // `class = 1` is an assignment to a keyword, not a header; the
        // identifier check owns that report.
        if matches!(
            line.tokens.get(kw_idx + 1).map(|t| &t.token),
            Some(Token::Eq)
        ) {
            chain.remove(&width);
            continue;
        }

        if is_continuation_keyword(kw) {
            let paired = chain
                .get(&width)
                .is_some_and(|&(root, last)| pairs_with(kw, root, last));
            if !paired {
                let tok = &line.tokens[kw_idx];
                let (l, c) = offset_to_line_col(tok.offset as usize, source);
                diags.push(
                    Diagnostic::new(
                        filename,
                        l,
                        c,
                        DiagnosticKind::DanglingElse,
                        format!("`{kw}` has no matching block header at this indentation"),
                    )
                    .with_fix("align it with the block it belongs to, or remove it"),
                );
            }
            match chain.get_mut(&width) {
                Some(entry) if paired => entry.1 = kw,
                _ => {
                    chain.insert(width, (kw, kw));
                }
            }
        } else {
            chain.insert(width, (kw, kw));
        }

        let Some(colon_idx) = top_level_colon(line) else {
            let (l, c) = offset_to_line_col(line.end() as usize, source);
            diags.push(
                Diagnostic::new(
                    filename,
                    l,
                    c,
                    DiagnosticKind::MissingColon,
                    format!("missing ':' at end of `{kw}` statement"),
                )
                .with_fix("add ':' after the header"),
            );
            // without the colon there is no body contract to verify
            continue;
        };

        if colon_idx == line.tokens.len() - 1 {
            let body_missing_at = match lines.get(i + 1) {
                Some(_) if events[i + 1].change == Change::Indent => None,
                Some(next) => Some(next.tokens[0].offset),
                None => Some(line.end()),
            };
            if let Some(off) = body_missing_at {
                let (l, c) = offset_to_line_col(off as usize, source);
                diags.push(
                    Diagnostic::new(
                        filename,
                        l,
                        c,
                        DiagnosticKind::BadIndent,
                        format!("expected an indented block after `{kw}` statement"),
                    )
                    .with_fix("indent the body by 4 spaces"),
                );
            }
        }
    }

    diags
}

// ── Tests ─────────────────────────────────────────────────────────────────
