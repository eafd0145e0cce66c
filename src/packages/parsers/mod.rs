//! # Shared Output Parsing Helpers
//!
//! Text-format building blocks reused by the backend parsers. Everything here
//! is a pure function of its input: no I/O, no executor, no errors for
//! malformed lines (they are dropped).
//!
//! - [`size`]: human size strings (`1.2 MiB`, `691 k`) to bytes
//! - [`fields`]: `Key : value` blocks with continuation lines
//! - [`deps`]: dependency lists with version constraints stripped
//! - [`table`]: `|`-separated tables with a header row
//! - [`repo_file`]: INI-style `.repo` files

pub mod deps;
pub mod fields;
pub mod repo_file;
pub mod size;
pub mod table;

pub use deps::{parse_dependency_list, strip_constraint};
pub use fields::{FieldBlock, parse_field_blocks};
pub use size::parse_size;
pub use table::{TableRow, parse_pipe_table};

/// Status lines package managers print around their data.
const BANNER_PREFIXES: &[&str] = &[
    "Last metadata expiration check",
    "Security:",
    "Updating Subscription Management repositories",
    "Unable to read consumer identity",
    "This system is not registered",
    "Loaded plugins",
    "Loading mirror speeds",
    "Determining fastest mirrors",
    "Loading repository data",
    "Reading installed packages",
    "Retrieving repository",
    "Listing...",
    "Listing... Done",
    "WARNING: apt does not have a stable CLI interface",
    "Sorting...",
    "Full Text Search...",
];

/// True for known non-data banner lines.
pub fn is_banner_line(line: &str) -> bool {
    let trimmed = line.trim();
    BANNER_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// Non-blank, non-banner lines.
pub fn data_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .filter(|line| !line.trim().is_empty() && !is_banner_line(line))
}

/// Remove an inline `[installed...]` marker.
///
/// Returns the line without the marker and whether one was present. Handles
/// `[installed]`, `[installed: 1.2-3]`, `[installed,automatic]` and
/// `[Installed]`.
pub fn strip_installed_marker(line: &str) -> (String, bool) {
    // ASCII folding keeps byte offsets valid for slicing `line`.
    let lower = line.to_ascii_lowercase();
    if let Some(start) = lower.find("[installed")
        && let Some(len) = lower[start..].find(']')
    {
        let mut stripped = String::with_capacity(line.len());
        stripped.push_str(line[..start].trim_end());
        let rest = line[start + len + 1..].trim();
        if !rest.is_empty() {
            stripped.push(' ');
            stripped.push_str(rest);
        }
        return (stripped, true);
    }
    (line.to_string(), false)
}

/// Cut text at section header lines such as `Installed Packages`.
///
/// Headers match case-insensitively on the whole trimmed line. Text before
/// the first header is returned under `None`; empty sections are dropped.
pub fn split_sections<'h>(text: &str, headers: &[&'h str]) -> Vec<(Option<&'h str>, String)> {
    let mut sections: Vec<(Option<&'h str>, String)> = vec![(None, String::new())];
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(header) = headers.iter().find(|h| h.eq_ignore_ascii_case(trimmed)) {
            sections.push((Some(*header), String::new()));
            continue;
        }
        if let Some((_, body)) = sections.last_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }
    sections.retain(|(_, body)| !body.trim().is_empty());
    sections
}

/// Split `name.arch` at the last dot when the suffix looks like an arch.
pub fn split_name_arch(token: &str) -> (&str, &str) {
    const ARCHES: &[&str] = &[
        "x86_64", "noarch", "i686", "i386", "aarch64", "armv7hl", "ppc64le", "s390x", "src",
        "riscv64",
    ];
    match token.rsplit_once('.') {
        Some((name, arch)) if ARCHES.contains(&arch) && !name.is_empty() => (name, arch),
        _ => (token, ""),
    }
}
