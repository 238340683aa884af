//! Literal-shape validation: tuples and dicts.
//!
//! Pure functions over a single logical line's token span. Bracket balance
//! is the lexer's invariant: a group with no closer on the line was already
//! reported there, so these checks skip it rather than re-diagnose.

use crate::lexer::{LogicalLine, Token, TokenAt};
use crate::location::offset_to_line_col;
use crate::types::{Diagnostic, DiagnosticKind};

/// Index of the token closing the group opened at `open`, scanning by
/// nesting depth. `None` when the group never closes on this line.
fn matching_close(tokens: &[TokenAt<'_>], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (j, t) in tokens.iter().enumerate().skip(open) {
        match t.token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a bracket group's interior at top-level commas.
fn split_entries<'a, 'src>(inner: &'a [TokenAt<'src>]) -> Vec<&'a [TokenAt<'src>]> {
    let mut entries = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (j, t) in inner.iter().enumerate() {
        match t.token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth -= 1,
            Token::Comma if depth == 0 => {
                entries.push(&inner[start..j]);
                start = j + 1;
            }
            _ => {}
        }
        // the lexer guarantees balance within a closed group
        debug_assert!(depth >= 0, "closer without opener inside a closed group");
    }
    if start < inner.len() {
        entries.push(&inner[start..]);
    }
    entries
}

fn top_level_colon(entry: &[TokenAt<'_>]) -> Option<usize> {
    let mut depth = 0i32;
    for (j, t) in entry.iter().enumerate() {
        match t.token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth -= 1,
            Token::Colon if depth == 0 => return Some(j),
            _ => {}
        }
    }
    None
}

fn has_top_level_for(inner: &[TokenAt<'_>]) -> bool {
    let mut depth = 0i32;
    for t in inner {
        match t.token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth -= 1,
            Token::Keyword("for") if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// `name = (value)`: a parenthesized single value spanning the whole
/// right-hand side. Legal, but the trailing-comma tuple is close enough
/// that the intent is ambiguous; advisory only.
pub fn check_singleton_tuples(
    lines: &[LogicalLine<'_>],
    filename: &str,
    source: &str,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for line in lines {
        let tokens = &line.tokens;
        for (j, t) in tokens.iter().enumerate() {
            if t.token != Token::LParen {
                continue;
            }
            // only the whole-RHS form: `= ( ... )` ending the line
            if j == 0 || tokens[j - 1].token != Token::Eq {
                continue;
            }
            let Some(close) = matching_close(tokens, j) else {
                continue;
            };
            if close != tokens.len() - 1 || close != j + 2 {
                continue;
            }
            if matches!(
                tokens[j + 1].token,
                Token::Number | Token::Str(_) | Token::Name(_)
            ) {
                let (l, c) = offset_to_line_col(t.offset as usize, source);
                diags.push(
                    Diagnostic::new(
                        filename,
                        l,
                        c,
                        DiagnosticKind::SingletonTupleMissingComma,
                        "parenthesized single value is not a tuple",
                    )
                    .with_fix("add a trailing comma for a one-element tuple, or drop the parentheses"),
                );
            }
        }
    }
    diags
}

/// Dict-literal entry checks: every entry needs a top-level colon, and keys
/// that are bare identifiers are advisory-flagged (valid only when the name
/// is a defined variable).
pub fn check_dict_literals(
    lines: &[LogicalLine<'_>],
    filename: &str,
    source: &str,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for line in lines {
        let tokens = &line.tokens;
        for (j, t) in tokens.iter().enumerate() {
            if t.token != Token::LBrace {
                continue;
            }
            let Some(close) = matching_close(tokens, j) else {
                continue;
            };
            let inner = &tokens[j + 1..close];
            // dict/set comprehensions have their own grammar
            if has_top_level_for(inner) {
                continue;
            }
            let entries = split_entries(inner);
            // no colon anywhere → a set literal, not a dict
            if !entries.iter().any(|e| top_level_colon(e).is_some()) {
                continue;
            }

            for entry in entries {
                if entry.is_empty() {
                    continue;
                }
                if entry[0].token == Token::DblStar {
                    continue;
                }
                let Some(colon_idx) = top_level_colon(entry) else {
                    let (l, c) = offset_to_line_col(entry[0].offset as usize, source);
                    diags.push(
                        Diagnostic::new(
                            filename,
                            l,
                            c,
                            DiagnosticKind::MissingDictColon,
                            "dict entry is missing ':' between key and value",
                        )
                        .with_fix("write the entry as key: value"),
                    );
                    continue;
                };
                let key = &entry[..colon_idx];
                if key.len() != 1 {
                    // tuple keys, calls, arithmetic: out of scope
                    continue;
                }
                match &key[0].token {
                    Token::Str(_) | Token::Number => {}
                    Token::Keyword("True" | "False" | "None") => {}
                    Token::Name(n) => {
                        let (l, c) = offset_to_line_col(key[0].offset as usize, source);
                        diags.push(
                            Diagnostic::new(
                                filename,
                                l,
                                c,
                                DiagnosticKind::UnquotedDictKey,
                                format!(
                                    "dict key `{n}` is unquoted; valid only if `{n}` is a defined variable"
                                ),
                            )
                            .with_fix(format!("write \"{n}\" if a string key was intended")),
                        );
                    }
                    _ => {
                        let (l, c) = offset_to_line_col(key[0].offset as usize, source);
                        diags.push(
                            Diagnostic::new(
                                filename,
                                l,
                                c,
                                DiagnosticKind::UnquotedDictKey,
                                "dict key is neither a string nor an identifier",
                            )
                            .with_fix("quote the key or use a hashable literal"),
                        );
                    }
                }
            }
        }
    }
    diags
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn tuples(src: &str) -> Vec<Diagnostic> {
        let out = tokenize(src, "test.py");
        check_singleton_tuples(&out.lines, "test.py", src)
    }

    fn dicts(src: &str) -> Vec<Diagnostic> {
        let out = tokenize(src, "test.py");
        check_dict_literals(&out.lines, "test.py", src)
    }

    // ── singleton tuples ──────────────────────────────────────────────────

    #[test]
    fn test_parenthesized_literal_advisory() {
        let diags = tuples("single = (1)\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::SingletonTupleMissingComma);
    }

    #[test]
    fn test_trailing_comma_accepted() {
        assert!(tuples("single = (1,)\n").is_empty());
    }

    #[test]
    fn test_real_tuple_accepted() {
        assert!(tuples("endpoint = ('api.example.com', 443)\n").is_empty());
    }

    #[test]
    fn test_call_parens_not_flagged() {
        assert!(tuples("result = compute(1)\n").is_empty());
    }

    #[test]
    fn test_grouping_inside_expression_not_flagged() {
        assert!(tuples("x = (1) + 2\n").is_empty());
    }

    #[test]
    fn test_parenthesized_expression_not_flagged() {
        // more than one token inside: grouping, not an ambiguous tuple
        assert!(tuples("x = (a + b)\n").is_empty());
    }

    #[test]
    fn test_empty_tuple_accepted() {
        assert!(tuples("empty = ()\n").is_empty());
    }

    #[test]
    fn test_generator_expression_not_flagged() {
        assert!(tuples("gen = (i for i in items)\n").is_empty());
    }

    // ── dict literals ─────────────────────────────────────────────────────

    #[test]
    fn test_string_keys_accepted() {
        assert!(dicts("config = {'host': '0.0.0.0', 'port': 8080}\n").is_empty());
    }

    #[test]
    fn test_number_and_bool_keys_accepted() {
        assert!(dicts("codes = {200: 'ok', 404: 'missing', True: 1}\n").is_empty());
    }

    #[test]
    fn test_missing_dict_colon() {
        let diags = dicts("config = {'host' '0.0.0.0', 'port': 8080}\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MissingDictColon);
    }

    #[test]
    fn test_bare_identifier_key_advisory() {
        let diags = dicts("payload = {name: 'web-01', 'port': 80}\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnquotedDictKey);
        assert!(diags[0].message.contains("`name`"));
    }

    #[test]
    fn test_set_literal_not_a_dict() {
        assert!(dicts("ports = {80, 443, 8080}\n").is_empty());
    }

    #[test]
    fn test_dict_comprehension_skipped() {
        assert!(dicts("inv = {v: k for k, v in pairs}\n").is_empty());
    }

    #[test]
    fn test_set_comprehension_skipped() {
        assert!(dicts("seen = {x for x in items}\n").is_empty());
    }

    #[test]
    fn test_spread_entry_skipped() {
        assert!(dicts("merged = {**base, 'extra': 1}\n").is_empty());
    }

    #[test]
    fn test_nested_dict_checked() {
        let diags = dicts("cfg = {'db': {host: 'localhost'}}\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnquotedDictKey);
    }

    #[test]
    fn test_tuple_key_accepted() {
        assert!(dicts("grid = {(0, 1): 'a', (1, 0): 'b'}\n").is_empty());
    }

    #[test]
    fn test_empty_dict_accepted() {
        assert!(dicts("d = {}\n").is_empty());
    }

    #[test]
    fn test_unclosed_brace_skipped_gracefully() {
        // the lexer owns the unclosed-bracket report
        assert!(dicts("d = {'a': 1,\n").is_empty());
    }

    #[test]
    fn test_multiline_dict_checked_as_one_line() {
        let src = "config = {\n    'app': 'my-api',\n    debug: False,\n}\n";
        let diags = dicts(src);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnquotedDictKey);
        assert_eq!(diags[0].line, 3);
    }
}
