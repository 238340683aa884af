//! Input discovery: walk directory trees and collect `.py` files.
//!
//! The walker respects `.gitignore`/`.ignore` at every level, skips hidden
//! entries (`.git`, `.venv`, `.mypy_cache`, ...), and always skips the
//! conventional virtual-environment, cache, and build directories in
//! [`ALWAYS_EXCLUDE`] even when they are neither hidden nor gitignored.
//! Callers can add their own name patterns via `exclude`.

use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Directory names never worth checking, `.gitignore` or not.
const ALWAYS_EXCLUDE: &[&str] = &[
    // virtual environments
    "venv",
    "env",
    ".venv",
    ".env",
    "virtualenv",
    // Python caches
    "__pycache__",
    ".mypy_cache",
    ".ruff_cache",
    ".pytest_cache",
    // build / dist
    "build",
    "dist",
    ".eggs",
    // version control
    ".git",
    ".hg",
    ".svn",
    // monorepo noise
    "node_modules",
    ".tox",
    ".nox",
];

fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    for component in path.components() {
        let Component::Normal(name) = component else {
            continue;
        };
        let name = name.to_string_lossy();
        if ALWAYS_EXCLUDE.contains(&name.as_ref()) {
            return true;
        }
        if exclude
            .iter()
            .any(|pat| name == pat.as_str() || name.contains(pat.as_str()))
        {
            return true;
        }
    }
    false
}

/// Collect every checkable `.py` file reachable from `root`.
///
/// The returned paths are not guaranteed to be in any particular order.
pub fn discover_python_files(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        // apply .gitignore rules even without a .git root
        .require_git(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            continue;
        }
        if is_excluded(path, exclude) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

// ── Tests ─────────────────────────────────────────────────────────────────
