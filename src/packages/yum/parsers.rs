use crate::core::types::Package;
use crate::packages::dnf::parsers::{compose_version, parse_check_update as parse_dnf_check_update};
use crate::packages::parsers::fields::FieldBlock;
use crate::packages::parsers::{
    data_lines, parse_dependency_list, parse_field_blocks, parse_size, split_name_arch,
    split_sections,
};

const INFO_SECTIONS: &[&str] = &["Installed Packages", "Available Packages", "Updated Packages"];

/// yum chatter that `data_lines` does not already drop.
fn is_yum_noise(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("* ")
        || trimmed.starts_with('=')
        || trimmed.starts_with("Name and summary matches only")
        || trimmed.starts_with("Warning: No matches found")
}

/// True when yum reported that nothing matched the search.
pub fn is_no_match(text: &str) -> bool {
    text.contains("No matches found") || text.contains("No Matches found")
}

/// `yum search`: `name.arch : summary` under `N/S matched` separators.
pub fn parse_search(text: &str) -> Vec<Package> {
    let mut packages: Vec<Package> = Vec::new();
    for line in data_lines(text) {
        if is_yum_noise(line) || line.starts_with(char::is_whitespace) {
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

fn package_from_info(block: &FieldBlock, section_installed: bool) -> Option<Package> {
    let name = block.get("Name")?.trim();
    if name.is_empty() {
        return None;
    }

    // Installed records say `Repo : installed` and name the origin in `From repo`.
    let repo = block.get("Repo").unwrap_or("");
    let installed = section_installed || repo == "installed";
    let repository = if repo == "installed" || repo.is_empty() {
        block.get("From repo").unwrap_or("")
    } else {
        repo
    };

    Some(Package {
        name: name.to_string(),
        version: compose_version(
            block.get("Epoch"),
            block.get("Version").unwrap_or(""),
            block.get("Release"),
        ),
        installed,
        repository: repository.trim_start_matches('@').to_string(),
        description: block
            .get_any(&["Summary", "Description"])
            .and_then(|d| d.lines().next())
            .unwrap_or("")
            .to_string(),
        size_bytes: block.get("Size").map(parse_size).unwrap_or(0),
        architecture: block
            .get_any(&["Arch", "Architecture"])
            .unwrap_or("")
            .to_string(),
        dependencies: block
            .get("Requires")
            .map(parse_dependency_list)
            .unwrap_or_default(),
    })
}

/// `yum info`: like dnf's, with `Repo : installed` marking installed records.
pub fn parse_info(text: &str) -> Vec<Package> {
    let cleaned = strip_noise(text);
    let mut packages = Vec::new();
    for (header, body) in split_sections(&cleaned, INFO_SECTIONS) {
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

/// `yum check-update`: dnf's row format behind yum's plugin and mirror lines.
pub fn parse_check_update(text: &str) -> Vec<Package> {
    parse_dnf_check_update(&strip_noise(text))
}

fn strip_noise(text: &str) -> String {
    let mut kept = String::with_capacity(text.len());
    for line in text.lines().filter(|l| !is_yum_noise(l)) {
        kept.push_str(line);
        kept.push('\n');
    }
    kept
}
