use colored::Colorize;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Disable colours when stderr is not a terminal or `NO_COLOR` is set.
pub fn init_colors() {
    if std::env::var_os("NO_COLOR").is_some() || !std::io::stderr().is_terminal() {
        colored::control::set_override(false);
    }
}

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

// Diagnostics go to stderr so stdout stays clean for `--json` output.

pub fn success(msg: &str) {
    if !is_quiet() {
        eprintln!("{} {}", "✓".green().bold(), msg);
    }
}

pub fn info(msg: &str) {
    if !is_quiet() {
        eprintln!("{} {}", "ℹ".blue().bold(), msg);
    }
}

pub fn warning(msg: &str) {
    if !is_quiet() {
        eprintln!("{} {}", "⚠".yellow().bold(), msg);
    }
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Only shown with `--verbose`.
pub fn debug(msg: &str) {
    if is_verbose() && !is_quiet() {
        eprintln!("{} {}", "·".bright_black(), msg.bright_black());
    }
}

pub fn keyval(key: &str, val: &str) {
    println!("{}: {}", key.bold(), val);
}

pub fn indent(msg: &str, level: usize) {
    let spaces = " ".repeat(level * 2);
    println!("{}{}", spaces, msg);
}
