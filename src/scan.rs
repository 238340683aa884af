//! The per-file pipeline and the batch driver.
//!
//! One scan is single-threaded and single-pass: lexer, then the indentation
//! tracker, then the statement-level validators, then the reporter. A batch
//! of files runs each scan as an independent unit under rayon; no component
//! holds state across files.

use crate::checks::block_headers::check_block_headers;
use crate::checks::identifiers::check_keyword_assignments;
use crate::checks::literals::{check_dict_literals, check_singleton_tuples};
use crate::indent::IndentTracker;
use crate::lexer;
use crate::location::offset_to_line_col;
use crate::report::Reporter;
use crate::types::{Diagnostic, DiagnosticKind};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

/// Result of scanning a batch of files.
///
/// Unreadable inputs are collected, not propagated: one bad path must not
/// abort the rest of the batch, but it is fatal for the exit code.
pub struct ScanOutcome {
    pub diagnostics: Vec<Diagnostic>,
    pub io_errors: Vec<(PathBuf, String)>,
}

pub fn scan_files(files: &[PathBuf]) -> ScanOutcome {
    let results: Vec<Result<Vec<Diagnostic>, (PathBuf, String)>> = files
        .par_iter()
        .map(|path| match fs::read_to_string(path) {
            Ok(source) => {
                let filename = path.to_string_lossy().to_string();
                let diags = scan_source(&source, &filename);
                Ok(filter_noqa(diags, &source))
            }
            Err(e) => Err((path.clone(), e.to_string())),
        })
        .collect();

    let mut outcome = ScanOutcome {
        diagnostics: Vec::new(),
        io_errors: Vec::new(),
    };
    for r in results {
        match r {
            Ok(diags) => outcome.diagnostics.extend(diags),
            Err(err) => outcome.io_errors.push(err),
        }
    }
    outcome
}

/// Scan one buffer. Never fails: broken syntax is the output, not an error.
pub fn scan_source(source: &str, filename: &str) -> Vec<Diagnostic> {
    let lexer::LexOutput { lines, findings } = lexer::tokenize(source, filename);

    let mut tracker = IndentTracker::new();
    let events: Vec<_> = lines
        .iter()
        .map(|l| tracker.advance(l.indent.width))
        .collect();

    let mut reporter = Reporter::new();
    reporter.extend(findings);

    // non-matching dedents surface as indentation errors
    for (line, event) in lines.iter().zip(&events) {
        if event.inconsistent {
            let off = line.tokens[0].offset;
            let (l, c) = offset_to_line_col(off as usize, source);
            reporter.push(
                Diagnostic::new(
                    filename,
                    l,
                    c,
                    DiagnosticKind::BadIndent,
                    "unindent does not match any outer indentation level",
                )
                .with_fix("dedent to a width used by an enclosing block"),
            );
        }
    }

    // Statement-level validators. rayon::join is opportunistic: with the
    // file-level par_iter saturating the pool these run sequentially at
    // zero overhead; on a single large file the work is stolen.
    let ((d_headers, d_idents), (d_tuples, d_dicts)) = rayon::join(
        || {
            rayon::join(
                || check_block_headers(&lines, &events, filename, source),
                || check_keyword_assignments(&lines, filename, source),
            )
        },
        || {
            rayon::join(
                || check_singleton_tuples(&lines, filename, source),
                || check_dict_literals(&lines, filename, source),
            )
        },
    );
    reporter.extend(d_headers);
    reporter.extend(d_idents);
    reporter.extend(d_tuples);
    reporter.extend(d_dicts);

    reporter.finish()
}

// ── noqa filtering ────────────────────────────────────────────────────────

/// Remove diagnostics suppressed by a `# noqa` comment on their line.
///
/// Supported forms:
/// - `# noqa`              — suppresses every code on that line
/// - `# noqa: WD001`       — suppresses only WD001
/// - `# noqa: WD001,WD004` — suppresses the listed codes
fn filter_noqa(diags: Vec<Diagnostic>, source: &str) -> Vec<Diagnostic> {
    diags
        .into_iter()
        .filter(|d| !is_suppressed_by_noqa(source, d.line, d.kind.code()))
        .collect()
}

fn is_suppressed_by_noqa(source: &str, line: usize, code: &str) -> bool {
    let line_content = source.lines().nth(line.saturating_sub(1)).unwrap_or("");
    let Some(idx) = line_content.find("# noqa") else {
        return false;
    };
    let after = line_content[idx + 6..].trim_start();
    if after.is_empty() || !after.starts_with(':') {
        return true;
    }
    after[1..].split(',').any(|c| c.trim() == code)
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use std::fs;
    use tempfile::TempDir;

    // ── the six reference scenarios ───────────────────────────────────────

    #[test]
    fn test_scenario_clean_block() {
        assert!(scan_source("if True:\n    print(1)\n", "t.py").is_empty());
    }

    #[test]
    fn test_scenario_body_not_indented() {
        let diags = scan_source("if True:\nprint(1)\n", "t.py");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::BadIndent);
        assert_eq!(diags[0].line, 2);
    }

    #[test]
    fn test_scenario_missing_colon() {
        let diags = scan_source("if True\n    print(1)\n", "t.py");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MissingColon);
        assert_eq!(diags[0].line, 1);
    }

    #[test]
    fn test_scenario_unclosed_string() {
        let diags = scan_source("x = 'abc\n", "t.py");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnclosedString);
        assert_eq!((diags[0].line, diags[0].col), (1, 5));
    }

    #[test]
    fn test_scenario_unclosed_bracket() {
        let diags = scan_source("lst = [1, 2, 3\n", "t.py");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnclosedBracket);
        assert_eq!((diags[0].line, diags[0].col), (1, 7));
    }

    #[test]
    fn test_scenario_dangling_else() {
        let diags = scan_source("else:\n    pass\n", "t.py");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::DanglingElse);
        assert_eq!(diags[0].line, 1);
    }

    // ── whole-pipeline properties ─────────────────────────────────────────

    #[test]
    fn test_well_formed_module_is_clean() {
        let src = concat!(
            "import os\n",
            "\n",
            "def check_disk(path, threshold=85):\n",
            "    usage = get_usage(path)\n",
            "    if usage > threshold:\n",
            "        return 'WARNING'\n",
            "    return 'OK'\n",
            "\n",
            "class HealthChecker:\n",
            "    def run(self):\n",
            "        for server in self.servers:\n",
            "            if server.port == 443:\n",
            "                restart(server)\n",
            "        return True\n",
        );
        assert!(scan_source(src, "t.py").is_empty());
    }

    #[test]
    fn test_mixed_tabs_reported_once_per_line() {
        let diags = scan_source("if a:\n\t x = 1\n\t y = 2\n", "t.py");
        let mixed: Vec<_> = diags
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MixedTabsSpaces)
            .collect();
        assert_eq!(mixed.len(), 2);
        assert_eq!(mixed[0].line, 2);
        assert_eq!(mixed[1].line, 3);
    }

    #[test]
    fn test_inconsistent_dedent_reported() {
        let diags = scan_source("if a:\n        x = 1\n    y = 2\n", "t.py");
        assert!(
            diags
                .iter()
                .any(|d| d.kind == DiagnosticKind::BadIndent && d.line == 3)
        );
    }

    #[test]
    fn test_diagnostics_sorted_by_position() {
        let src = "else:\n    pass\nx = 'open\nlst = [1\n";
        let diags = scan_source(src, "t.py");
        let positions: Vec<_> = diags.iter().map(|d| (d.line, d.col)).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_every_location_is_in_bounds() {
        let broken = [
            "if True\nprint(1)\n",
            "x = 'abc\n",
            "lst = [1, 2\n",
            "else:\n    pass\n",
            "class = 1\n",
            "d = {k 1}\n",
            "if a:\n\t x = 1\n",
            "v = 1.2.3\n",
            "    indented\n",
        ];
        for src in broken {
            for d in scan_source(src, "t.py") {
                let line = src.lines().nth(d.line - 1).unwrap_or_else(|| {
                    panic!("line {} out of bounds for {src:?}", d.line)
                });
                assert!(
                    d.col <= line.len() + 1,
                    "col {} out of bounds on line {:?} of {src:?}",
                    d.col,
                    line
                );
            }
        }
    }

    #[test]
    fn test_severity_tagged_on_output() {
        let diags = scan_source("single = (1)\n", "t.py");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Advisory);
    }

    #[test]
    fn test_multiple_issues_in_one_file() {
        let src = "if ready\n    start()\nelse:\n    x = 'oops\n";
        let diags = scan_source(src, "t.py");
        let kinds: Vec<_> = diags.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DiagnosticKind::MissingColon));
        assert!(kinds.contains(&DiagnosticKind::UnclosedString));
    }

    // ── noqa ──────────────────────────────────────────────────────────────

    #[test]
    fn test_bare_noqa_suppresses_all() {
        let diags = filter_noqa(
            scan_source("x = 'abc  # noqa\n", "t.py"),
            "x = 'abc  # noqa\n",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_noqa_specific_code_suppresses() {
        let src = "single = (1)  # noqa: WD008\n";
        let diags = filter_noqa(scan_source(src, "t.py"), src);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_noqa_wrong_code_does_not_suppress() {
        let src = "single = (1)  # noqa: WD001\n";
        let diags = filter_noqa(scan_source(src, "t.py"), src);
        assert_eq!(diags.len(), 1);
    }

    // ── batch scanning ────────────────────────────────────────────────────

    #[test]
    fn test_scan_files_collects_across_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "if x\n    pass\n").unwrap();
        fs::write(dir.path().join("b.py"), "y = 'open\n").unwrap();
        let files = vec![dir.path().join("a.py"), dir.path().join("b.py")];
        let outcome = scan_files(&files);
        assert_eq!(outcome.diagnostics.len(), 2);
        assert!(outcome.io_errors.is_empty());
    }

    #[test]
    fn test_scan_files_clean_batch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "x = 1\nprint(x)\n").unwrap();
        let outcome = scan_files(&[dir.path().join("a.py")]);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_unreadable_file_does_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.py"), "if x\n    pass\n").unwrap();
        let missing = dir.path().join("missing.py");
        let outcome = scan_files(&[missing.clone(), dir.path().join("good.py")]);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.io_errors.len(), 1);
        assert_eq!(outcome.io_errors[0].0, missing);
    }
}
