use crate::core::types::{Package, Repository};
use crate::packages::parsers::{TableRow, parse_field_blocks, parse_pipe_table, parse_size};

fn cell(row: &TableRow, columns: &[&str]) -> String {
    row.get_any(columns).unwrap_or("").to_string()
}

/// The status column reads `i` or `i+` for installed packages.
fn status_installed(row: &TableRow) -> bool {
    row.get("S").is_some_and(|s| s.starts_with('i'))
}

/// `zypper search`: pipe table, columns located by header. Patterns,
/// products and source packages are skipped.
pub fn parse_search(text: &str) -> Vec<Package> {
    parse_pipe_table(text)
        .iter()
        .filter(|row| row.get("Type").is_none_or(|t| t == "package"))
        .filter_map(|row| {
            let name = row.get("Name")?;
            if name.is_empty() {
                return None;
            }
            Some(Package {
                name: name.to_string(),
                version: cell(row, &["Version"]),
                installed: status_installed(row),
                repository: cell(row, &["Repository"]),
                description: cell(row, &["Summary"]),
                architecture: cell(row, &["Arch"]),
                ..Default::default()
            })
        })
        .collect()
}

/// True when `zypper info` printed its not-found notice (it exits 0).
pub fn is_info_not_found(text: &str) -> bool {
    text.lines().any(|line| {
        let line = line.trim();
        line.starts_with("package '") && line.ends_with("' not found.")
    })
}

/// `zypper info`: one `Key : value` block under an `Information for` header.
pub fn parse_info(text: &str) -> Vec<Package> {
    parse_field_blocks(text, ':')
        .iter()
        .filter_map(|block| {
            let name = block.get("Name")?.trim();
            if name.is_empty() {
                return None;
            }
            Some(Package {
                name: name.to_string(),
                version: block.get("Version").unwrap_or("").to_string(),
                installed: block
                    .get("Installed")
                    .is_some_and(|v| v.starts_with("Yes")),
                repository: block.get("Repository").unwrap_or("").to_string(),
                description: block
                    .get_any(&["Summary", "Description"])
                    .and_then(|d| d.lines().next())
                    .unwrap_or("")
                    .to_string(),
                size_bytes: block
                    .get_any(&["Installed Size", "Size"])
                    .map(parse_size)
                    .unwrap_or(0),
                architecture: block.get("Arch").unwrap_or("").to_string(),
                dependencies: Vec::new(),
            })
        })
        .collect()
}

/// `zypper list-updates`: version is the `Available Version` column.
pub fn parse_updates(text: &str) -> Vec<Package> {
    parse_pipe_table(text)
        .iter()
        .filter_map(|row| {
            let name = row.get("Name")?;
            if name.is_empty() {
                return None;
            }
            Some(Package {
                name: name.to_string(),
                version: cell(row, &["Available Version", "Version"]),
                installed: true,
                repository: cell(row, &["Repository"]),
                architecture: cell(row, &["Arch"]),
                ..Default::default()
            })
        })
        .collect()
}

/// `zypper packages --unneeded`: package names only.
pub fn parse_unneeded(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in parse_pipe_table(text) {
        if let Some(name) = row.get("Name")
            && !name.is_empty()
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }
    names
}

fn yes(value: &str) -> bool {
    // GPG Check cells carry a marker prefix, e.g. `(r ) Yes`
    value.trim().ends_with("Yes")
}

/// `zypper repos --details`: alias, enabled flag, priority, type and URI.
pub fn parse_repos(text: &str) -> Vec<Repository> {
    parse_pipe_table(text)
        .iter()
        .filter_map(|row| {
            let alias = row.get("Alias")?;
            if alias.is_empty() {
                return None;
            }
            Some(Repository {
                name: alias.to_string(),
                url: cell(row, &["URI", "URL"]),
                enabled: row.get("Enabled").is_some_and(yes),
                gpg_key: None,
                repo_type: cell(row, &["Type"]),
                components: Vec::new(),
                distribution: String::new(),
                priority: row
                    .get("Priority")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(0),
            })
        })
        .collect()
}
