//! Diagnostic collection and ordering.
//!
//! Validators produce diagnostics in whatever order they walk the source;
//! the reporter gives callers a single stable contract: sorted by
//! (line, col), exact (kind, location) repeats removed. It never rejects
//! input; malformed source is precisely what the diagnostics describe.

use crate::types::Diagnostic;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct Reporter {
    diags: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.diags.push(diag);
    }

    pub fn extend(&mut self, diags: Vec<Diagnostic>) {
        self.diags.extend(diags);
    }

    /// Sorted, deduplicated diagnostics.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diags
            .sort_by(|a, b| {
                a.line
                    .cmp(&b.line)
                    .then(a.col.cmp(&b.col))
                    .then(a.kind.cmp(&b.kind))
            });
        self.diags
            .dedup_by(|a, b| a.kind == b.kind && a.line == b.line && a.col == b.col);
        self.diags
    }
}

/// Per-kind counts keyed by stable code, for tooling integration.
pub fn summary(diags: &[Diagnostic]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for d in diags {
        *counts.entry(d.kind.code()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiagnosticKind;

    fn diag(line: usize, col: usize, kind: DiagnosticKind) -> Diagnostic {
        Diagnostic::new("t.py", line, col, kind, "msg")
    }

    #[test]
    fn test_sorted_by_line_then_col() {
        let mut r = Reporter::new();
        r.push(diag(3, 1, DiagnosticKind::MissingColon));
        r.push(diag(1, 9, DiagnosticKind::UnclosedString));
        r.push(diag(1, 2, DiagnosticKind::BadIndent));
        let out = r.finish();
        let locs: Vec<_> = out.iter().map(|d| (d.line, d.col)).collect();
        assert_eq!(locs, vec![(1, 2), (1, 9), (3, 1)]);
    }

    #[test]
    fn test_exact_repeats_deduplicated() {
        let mut r = Reporter::new();
        r.push(diag(2, 5, DiagnosticKind::BadIndent));
        r.push(diag(2, 5, DiagnosticKind::BadIndent));
        let out = r.finish();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_different_kinds_at_same_location_kept() {
        let mut r = Reporter::new();
        r.push(diag(2, 5, DiagnosticKind::BadIndent));
        r.push(diag(2, 5, DiagnosticKind::MissingColon));
        let out = r.finish();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_empty_reporter_finishes_empty() {
        assert!(Reporter::new().finish().is_empty());
    }

    #[test]
    fn test_summary_counts_per_kind() {
        let diags = vec![
            diag(1, 1, DiagnosticKind::MissingColon),
            diag(2, 1, DiagnosticKind::MissingColon),
            diag(3, 1, DiagnosticKind::UnclosedString),
        ];
        let s = summary(&diags);
        assert_eq!(s.get("WD001"), Some(&2));
        assert_eq!(s.get("WD004"), Some(&1));
        assert_eq!(s.get("WD002"), None);
    }
}
