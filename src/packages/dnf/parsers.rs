use crate::core::types::Package;
use crate::packages::parsers::fields::FieldBlock;
use crate::packages::parsers::{
    data_lines, parse_dependency_list, parse_field_blocks, parse_size, split_name_arch,
    split_sections,
};

const INFO_SECTIONS: &[&str] = &[
    "Installed Packages",
    "Available Packages",
    "Available Upgrades",
    "Extra Packages",
    "Recently Added Packages",
];

/// `dnf search`: `name.arch : summary` lines under `=====` banners.
pub fn parse_search(text: &str) -> Vec<Package> {
    let mut packages: Vec<Package> = Vec::new();
    for line in data_lines(text) {
        if line.starts_with('=') || line.starts_with(char::is_whitespace) {
            continue;
        }
        let Some((token, summary)) = line.split_once(" : ") else {
            continue;
        };
        let (name, arch) = split_name_arch(token.trim());
        if name.is_empty() || packages.iter().any(|p| p.name == name && p.architecture == arch) {
            continue;
        }
        packages.push(Package {
            name: name.to_string(),
            architecture: arch.to_string(),
            description: summary.trim().to_string(),
            ..Default::default()
        });
    }
    packages
}

/// True when `dnf search` reported that nothing matched.
pub fn is_no_match(text: &str) -> bool {
    text.contains("No matches found")
}

/// `[epoch:]version-release`; a zero or missing epoch is omitted.
pub fn compose_version(epoch: Option<&str>, version: &str, release: Option<&str>) -> String {
    let mut composed = String::new();
    if let Some(epoch) = epoch.map(str::trim)
        && !epoch.is_empty()
        && epoch != "0"
    {
        composed.push_str(epoch);
        composed.push(':');
    }
    composed.push_str(version);
    if let Some(release) = release.map(str::trim)
        && !release.is_empty()
    {
        composed.push('-');
        composed.push_str(release);
    }
    composed
}

fn package_from_info(block: &FieldBlock, installed: bool) -> Option<Package> {
    let name = block.get("Name")?.trim();
    if name.is_empty() {
        return None;
    }

    let repository = match block.get_any(&["Repository", "Repo"]) {
        Some("@System") | Some("installed") | None => block.get("From repo").unwrap_or(""),
        Some(repo) => repo,
    };

    Some(Package {
        name: name.to_string(),
        version: compose_version(
            block.get("Epoch"),
            block.get("Version").unwrap_or(""),
            block.get("Release"),
        ),
        installed,
        repository: repository.to_string(),
        description: block
            .get_any(&["Summary", "Description"])
            .and_then(|d| d.lines().next())
            .unwrap_or("")
            .to_string(),
        size_bytes: block
            .get_any(&["Installed Size", "Installed size", "Size", "Download Size"])
            .map(parse_size)
            .unwrap_or(0),
        architecture: block
            .get_any(&["Architecture", "Arch"])
            .unwrap_or("")
            .to_string(),
        dependencies: block
            .get("Requires")
            .map(parse_dependency_list)
            .unwrap_or_default(),
    })
}

/// `dnf info`: key/value blocks under `Installed Packages` /
/// `Available Packages` headers. Installed records come first.
pub fn parse_info(text: &str) -> Vec<Package> {
    let mut packages = Vec::new();
    for (header, body) in split_sections(text, INFO_SECTIONS) {
        let installed = header.is_some_and(|h| h == "Installed Packages");
        packages.extend(
            parse_field_blocks(&body, ':')
                .iter()
                .filter_map(|block| package_from_info(block, installed)),
        );
    }
    packages.sort_by_key(|p| !p.installed);
    packages
}

/// `dnf check-update`: `name.arch  version  repo` rows.
///
/// Long names wrap the rest of the row onto the next line; those are
/// rejoined. Parsing stops at `Obsoleting Packages`.
pub fn parse_check_update(text: &str) -> Vec<Package> {
    let mut packages = Vec::new();
    let mut pending: Option<String> = None;

    for line in data_lines(text) {
        if line.trim_start().starts_with("Obsoleting Packages") {
            break;
        }
        let joined = match pending.take() {
            Some(head) if line.starts_with(char::is_whitespace) => format!("{} {}", head, line.trim()),
            _ => line.to_string(),
        };
        let fields: Vec<&str> = joined.split_whitespace().collect();
        match fields.len() {
            1 => pending = Some(fields[0].to_string()),
            n if n >= 3 => {
                let (name, arch) = split_name_arch(fields[0]);
                packages.push(Package {
                    name: name.to_string(),
                    version: fields[1].to_string(),
                    repository: fields[2].to_string(),
                    architecture: arch.to_string(),
                    installed: true,
                    ..Default::default()
                });
            }
            _ => {}
        }
    }
    packages
}
