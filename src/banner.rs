//! Animated welcome screen shown when `warden` is invoked with no arguments.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::thread;
use std::time::Duration;

// ── ASCII logo (WARDEN in box-drawing block font) ─────────────────────────────

const LOGO: &[&str] = &[
    " ██╗    ██╗ █████╗ ██████╗ ██████╗ ███████╗███╗   ██╗",
    " ██║    ██║██╔══██╗██╔══██╗██╔══██╗██╔════╝████╗  ██║",
    " ██║ █╗ ██║███████║██████╔╝██║  ██║█████╗  ██╔██╗ ██║",
    " ██║███╗██║██╔══██║██╔══██╗██║  ██║██╔══╝  ██║╚██╗██║",
    " ╚███╔███╔╝██║  ██║██║  ██║██████╔╝███████╗██║ ╚████║",
    "  ╚══╝╚══╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═════╝ ╚══════╝╚═╝  ╚═══╝",
];

// ── Rule catalogue ────────────────────────────────────────────────────────────

const RULES: &[(&str, &str, &str)] = &[
    ("WD001", "Missing colon", "if ready  # header needs ':'"),
    ("WD002", "Bad indentation", "if x:\\nprint(1)  # body not indented"),
    ("WD003", "Tabs mixed with spaces", "\\t    x = 1"),
    ("WD004", "Unclosed string", "msg = 'hello"),
    ("WD005", "Unclosed bracket", "lst = [1, 2, 3"),
    ("WD006", "Unquoted dict key", "{host: 1}  # advisory"),
    ("WD007", "Missing dict colon", "{'host' '0.0.0.0'}"),
    ("WD008", "Tuple missing comma", "single = (1)  # advisory"),
    ("WD009", "Keyword used as name", "class = 1"),
    ("WD010", "Dangling else", "else: with no matching if"),
    ("WD011", "Malformed number", "v = 1.2.3"),
];

// ── Helpers ───────────────────────────────────────────────────────────────────

#[inline]
fn sleep(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

#[inline]
fn flush() {
    let _ = io::stdout().flush();
}

#[inline]
fn hide_cursor() {
    print!("\x1b[?25l");
    flush();
}

#[inline]
fn show_cursor() {
    print!("\x1b[?25h");
    flush();
}

/// Print without a trailing newline and flush immediately.
macro_rules! pf {
    ($($arg:tt)*) => {{
        print!($($arg)*);
        flush();
    }};
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Display the welcome screen.  Animates when stdout is a TTY; falls back to a
/// plain static print otherwise (e.g. piped output, CI, `--no-color` envs).
pub fn show_welcome() {
    if io::stdout().is_terminal() {
        // Restore cursor if we panic mid-animation.
        let _ = std::panic::catch_unwind(animated_welcome);
        show_cursor();
    } else {
        static_welcome();
    }
}

// ── Animated path (TTY) ───────────────────────────────────────────────────────

fn animated_welcome() {
    hide_cursor();

    // ── spinner intro ─────────────────────────────────────────────────────────
    let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    for (i, frame) in frames.iter().enumerate() {
        pf!(
            "\r  {}  {}",
            frame.yellow().bold(),
            "Raising warden…".truecolor(120, 120, 120)
        );
        sleep(if i < 3 { 90 } else { 55 });
    }
    pf!("\r{}\r", " ".repeat(60));

    println!();

    // ── logo lines (revealed top-to-bottom) ───────────────────────────────────
    for (i, line) in LOGO.iter().enumerate() {
        // Gradient: brighter amber toward the middle rows.
        let coloured = match i {
            0 | 5 => line.truecolor(150, 100, 10).bold(),
            1 | 4 => line.truecolor(190, 130, 20).bold(),
            _ => line.truecolor(225, 160, 30).bold(),
        };
        println!("  {coloured}");
        sleep(35);
    }

    println!();

    // ── tagline (character-by-character typing effect) ────────────────────────
    let version = env!("CARGO_PKG_VERSION");
    let tagline = format!("🛡  Fast Python syntax checker  —  v{version}");

    pf!("  ");
    for ch in tagline.chars() {
        pf!("{}", ch.to_string().white().bold());
        sleep(15);
    }
    println!();
    println!();

    // ── horizontal divider ────────────────────────────────────────────────────
    let rule = "─".repeat(70);
    println!("  {}", rule.truecolor(60, 60, 60));
    println!();
    sleep(60);

    // ── rules ─────────────────────────────────────────────────────────────────
    println!("  {}", "Rules".bold().underline());
    println!();

    for (code, name, example) in RULES {
        pf!(
            "    {} ",
            code.to_string().on_truecolor(40, 40, 40).yellow().bold()
        );
        pf!("  {:<26}", name.white().bold());
        pf!("  {}", format!("# {example}").truecolor(90, 90, 90));
        println!();
        sleep(50);
    }

    println!();

    // ── divider ───────────────────────────────────────────────────────────────
    println!("  {}", rule.truecolor(60, 60, 60));
    println!();
    sleep(40);

    // ── usage ─────────────────────────────────────────────────────────────────
    println!("  {}", "Usage".bold().underline());
    println!();

    let cmds: &[(&str, &str)] = &[
        ("warden .", "check the current directory"),
        ("warden src/ scripts/", "check specific paths"),
        (
            "warden --select WD001,WD004",
            "only missing colons & unclosed strings",
        ),
        ("warden --exclude tests,vendor", "skip directories by name"),
        ("warden --errors-only", "hide advisory diagnostics"),
        ("warden --json", "emit structured JSON output"),
        ("warden --no-exit-code", "always exit 0  (useful in CI)"),
    ];

    for (cmd, desc) in cmds {
        println!(
            "    {}  {}",
            format!("{cmd:<40}").green().bold(),
            desc.truecolor(120, 120, 120),
        );
        sleep(35);
    }

    println!();

    // ── closing divider ───────────────────────────────────────────────────────
    println!("  {}", rule.truecolor(60, 60, 60));
    println!();

    show_cursor();
}

// ── Static / non-TTY path ─────────────────────────────────────────────────────

fn static_welcome() {
    let version = env!("CARGO_PKG_VERSION");

    for line in LOGO {
        println!("  {line}");
    }

    println!();
    println!("  Warden v{version}  —  Fast Python syntax checker");
    println!();
    println!("  Rules:");
    for (code, name, _example) in RULES {
        println!("    {code}  {name}");
    }
    println!();
    println!("  Usage:  warden [PATH …] [OPTIONS]");
    println!("          warden .                          check current directory");
    println!("          warden --select WD001,WD004       filter by rule");
    println!("          warden --json                     JSON output");
    println!("          warden --help                     full help text");
    println!();
}
