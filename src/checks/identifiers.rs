//! Reserved keywords used as assignment targets.
//!
//! `class = 1` parses as a broken compound statement in real Python; here it
//! is reported for what the author meant: a variable whose name is taken.
//! Only the assignment-target position is flagged; a keyword anywhere else
//! is either legitimate or some other check's problem.

use crate::lexer::{LogicalLine, Token};
use crate::location::offset_to_line_col;
use crate::types::{Diagnostic, DiagnosticKind};

pub fn check_keyword_assignments(
    lines: &[LogicalLine<'_>],
    filename: &str,
    source: &str,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for line in lines {
        for pair in line.tokens.windows(2) {
            if let (Token::Keyword(kw), Token::Eq) = (&pair[0].token, &pair[1].token) {
                let (l, c) = offset_to_line_col(pair[0].offset as usize, source);
                diags.push(
                    Diagnostic::new(
                        filename,
                        l,
                        c,
                        DiagnosticKind::InvalidIdentifier,
                        format!("`{kw}` is a reserved keyword and cannot be assigned"),
                    )
                    .with_fix(format!("pick a different name (e.g. `{kw}_`)")),
                );
            }
        }
    }
    diags
}

// ── Tests ─────────────────────────────────────────────────────────────────
