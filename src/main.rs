mod banner;

use clap::Parser;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;
use std::process;
use warden::types::{Diagnostic, Severity};
use warden::{discovery, report, scan};

#[derive(Parser)]
#[command(
    name = "warden",
    about = "Fast Python syntax checker",
    version,
    long_about = "Warden scans Python source for the syntax mistakes that stop a script \
                  before it runs: missing colons, broken indentation, unterminated \
                  strings and brackets, malformed literals, and keywords used as names.\n\n\
                  Run `warden` with no arguments to see an overview of all rules and usage."
)]
struct Cli {
    /// Paths to check (files or directories).
    /// Omit to see the welcome screen; pass `.` to check the current directory.
    #[arg()]
    paths: Vec<PathBuf>,

    /// Only report the given comma-separated rule codes (e.g. --select WD001,WD004).
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// Exclude directories or files whose path contains any of the given
    /// comma-separated names (e.g. --exclude tests,migrations,vendor).
    /// Hidden directories (.git, .venv, __pycache__, etc.) are always excluded
    /// regardless of this flag.
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Drop advisory diagnostics (WD006, WD008) and report only hard errors.
    #[arg(long)]
    errors_only: bool,

    /// Emit results as JSON instead of the default text format.
    #[arg(long)]
    json: bool,

    /// Exit with code 0 even when issues are found (useful in CI with --json).
    #[arg(long)]
    no_exit_code: bool,
}

fn main() {
    let cli = Cli::parse();

    // ── no paths → show animated welcome screen ───────────────────────────────
    if cli.paths.is_empty() {
        banner::show_welcome();
        return;
    }

    let exclude: Vec<String> = cli.exclude.unwrap_or_default();

    // ── input discovery ───────────────────────────────────────────────────────
    let mut files = Vec::new();
    for path in &cli.paths {
        if path.is_file() {
            files.push(path.clone());
        } else {
            match discovery::discover_python_files(path, &exclude) {
                Ok(found) => files.extend(found),
                Err(e) => {
                    eprintln!("{}: {e}", "error".red().bold());
                    process::exit(2);
                }
            }
        }
    }

    // ── scanning ──────────────────────────────────────────────────────────────
    let outcome = scan::scan_files(&files);
    let mut diagnostics = outcome.diagnostics;

    // ── filter by severity and --select ───────────────────────────────────────
    if cli.errors_only {
        diagnostics.retain(|d| d.severity == Severity::Error);
    }
    if let Some(ref selected) = cli.select {
        diagnostics.retain(|d| selected.iter().any(|s| s.as_str() == d.kind.code()));
    }

    // ── sort: file → line → col ───────────────────────────────────────────────
    diagnostics.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.line.cmp(&b.line))
            .then(a.col.cmp(&b.col))
    });

    // ── output ────────────────────────────────────────────────────────────────
    if cli.json {
        print_json(&diagnostics);
    } else {
        for d in &diagnostics {
            println!("{d}");
        }
        if diagnostics.is_empty() {
            println!("{}", "No syntax issues found".green());
        } else {
            let count = diagnostics.len();
            println!("{}", format!("Found {count} issue(s)").yellow().bold());
        }
    }

    // ── unreadable inputs: reported once each, fatal for the exit code ────────
    for (path, reason) in &outcome.io_errors {
        eprintln!(
            "{}: cannot read {}: {reason}",
            "error".red().bold(),
            path.display()
        );
    }
    if !outcome.io_errors.is_empty() {
        process::exit(2);
    }

    // ── exit code ─────────────────────────────────────────────────────────────
    if !cli.no_exit_code && !diagnostics.is_empty() {
        process::exit(1);
    }
}

/// Emit valid, well-formatted JSON using serde_json.
fn print_json(diagnostics: &[Diagnostic]) {
    let output = json!({
        "diagnostics": diagnostics,
        "count":       diagnostics.len(),
        "summary":     report::summary(diagnostics),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).expect("serde_json::Value is always serialisable")
    );
}
