//! Shared CLI helpers — path expansion, status-line rendering, banner.

use std::path::PathBuf;

use colored::Colorize;

use querybot_core::format::BOLD;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Turn chat bold toggles into terminal bold.
pub fn render_status_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for (i, part) in line.split(BOLD).enumerate() {
        if i % 2 == 1 {
            out.push_str(&part.bold().to_string());
        } else {
            out.push_str(part);
        }
    }
    out
}

/// Print a status line, raw or terminal-rendered.
pub fn print_status_line(line: &str, raw: bool) {
    if raw {
        println!("{line}");
    } else {
        println!("{}", render_status_line(line));
    }
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🔎 Querybot".cyan().bold(), version.dimmed());
    println!(
        "{}",
        "Type a chat line (e.g. \"!w oslo\"), \"help\", or \"exit\" to quit.".dimmed()
    );
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
