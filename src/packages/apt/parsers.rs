use crate::core::types::{Package, Repository};
use crate::packages::parsers::fields::FieldBlock;
use crate::packages::parsers::repo_file::{LocatedRepository, split_grep_line};
use crate::packages::parsers::{data_lines, parse_dependency_list, parse_field_blocks, parse_size};
use std::path::Path;

/// `dpkg-query -W -f=` format for [`parse_installed`].
pub const INSTALLED_FORMAT: &str =
    "${Package}\\t${Version}\\t${Architecture}\\t${Installed-Size}\\t${db:Status-Abbrev}\\n";

/// `${Status}` of a fully installed package is `install ok installed`.
pub fn is_installed_status(status: &str) -> bool {
    status.split_whitespace().nth(2) == Some("installed")
}

/// `apt-cache search`: `name - short description` per line.
pub fn parse_search(text: &str) -> Vec<Package> {
    data_lines(text)
        .filter_map(|line| {
            let (name, description) = line.split_once(" - ")?;
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return None;
            }
            Some(Package {
                name: name.to_string(),
                description: description.trim().to_string(),
                ..Default::default()
            })
        })
        .collect()
}

/// `apt-cache show`: one RFC-822 stanza per available version.
pub fn parse_show(text: &str) -> Vec<Package> {
    parse_field_blocks(text, ':')
        .iter()
        .filter_map(package_from_stanza)
        .collect()
}

fn package_from_stanza(block: &FieldBlock) -> Option<Package> {
    let name = block.get("Package")?.trim();
    if name.is_empty() {
        return None;
    }

    // Installed-Size is KiB; Size is the .deb in bytes.
    let size_bytes = match block.get("Installed-Size") {
        Some(kib) => parse_size(kib) * 1024,
        None => block.get("Size").map(parse_size).unwrap_or(0),
    };

    let mut dependencies = Vec::new();
    for key in ["Pre-Depends", "Depends"] {
        for dep in block.get(key).map(parse_dependency_list).unwrap_or_default() {
            if !dependencies.contains(&dep) {
                dependencies.push(dep);
            }
        }
    }

    let description = block
        .get_any(&["Description", "Description-en"])
        .and_then(|d| d.lines().next())
        .unwrap_or("")
        .to_string();

    Some(Package {
        name: name.to_string(),
        version: block.get("Version").unwrap_or("").to_string(),
        installed: block
            .get("Status")
            .is_some_and(is_installed_status),
        description,
        size_bytes,
        architecture: block.get("Architecture").unwrap_or("").to_string(),
        dependencies,
        ..Default::default()
    })
}

/// Parse `dpkg-query -W -f=INSTALLED_FORMAT` output.
///
/// Needs name, version and arch. When the status column is present, only
/// packages whose current state is installed (`ii`, `hi`) are kept, so
/// removed-but-configured packages do not show up.
pub fn parse_installed(text: &str) -> Vec<Package> {
    text.lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 3 || fields[0].trim().is_empty() {
                return None;
            }
            if let Some(status) = fields.get(4)
                && status.trim().chars().nth(1) != Some('i')
            {
                return None;
            }
            Some(Package {
                name: fields[0].trim().to_string(),
                version: fields[1].trim().to_string(),
                architecture: fields[2].trim().to_string(),
                size_bytes: fields.get(3).map(|s| parse_size(s) * 1024).unwrap_or(0),
                installed: true,
                ..Default::default()
            })
        })
        .collect()
}

/// `apt list --upgradable`:
/// `curl/jammy-updates 7.81.0-1ubuntu1.16 amd64 [upgradable from: 7.81.0-1ubuntu1.15]`
pub fn parse_upgradable(text: &str) -> Vec<Package> {
    data_lines(text)
        .filter(|line| !line.starts_with("WARNING") && !line.starts_with("N:"))
        .filter_map(|line| {
            let line = match line.find(" [") {
                Some(idx) => &line[..idx],
                None => line,
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                return None;
            }
            let (name, suite) = fields[0].split_once('/')?;
            if name.is_empty() {
                return None;
            }
            Some(Package {
                name: name.to_string(),
                version: fields[1].to_string(),
                installed: true,
                repository: suite.split(',').next().unwrap_or("").to_string(),
                architecture: fields[2].to_string(),
                ..Default::default()
            })
        })
        .collect()
}

/// Parse `grep -rsH ^` output over the apt source directories.
///
/// `.sources` files (and plain content with `Types:` lines) are read as
/// deb822 stanzas; everything else as one-line `deb` entries. Repositories
/// are named after the file they live in.
pub fn parse_sources(text: &str) -> Vec<LocatedRepository> {
    let mut files: Vec<(String, String)> = Vec::new();
    for raw in text.lines() {
        let (file, content) = split_grep_line(raw);
        match files.last_mut() {
            Some((current, body)) if current == file => {
                body.push_str(content);
                body.push('\n');
            }
            _ => files.push((file.to_string(), format!("{}\n", content))),
        }
    }

    let mut repos = Vec::new();
    for (file, body) in &files {
        let deb822 = file.ends_with(".sources")
            || body.lines().any(|l| l.trim_start().starts_with("Types:"));
        if deb822 {
            repos.extend(parse_deb822(file, body));
        } else {
            repos.extend(parse_one_line(file, body));
        }
    }
    repos
}

fn repository_name(file: &str, url: &str) -> String {
    let stem = Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    if !stem.is_empty() {
        return stem.to_string();
    }
    url.split("://")
        .nth(1)
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or("")
        .to_string()
}

/// One-line format: `[# ]deb[-src] [opts] uri suite [components...]`.
pub fn parse_one_line(file: &str, body: &str) -> Vec<LocatedRepository> {
    body.lines()
        .filter_map(|line| {
            let mut line = line.trim();
            let mut enabled = true;
            if let Some(rest) = line.strip_prefix('#') {
                let rest = rest.trim_start();
                if !(rest.starts_with("deb ") || rest.starts_with("deb-src ")) {
                    return None;
                }
                enabled = false;
                line = rest;
            }

            let (repo_type, rest) = line.split_once(char::is_whitespace)?;
            if repo_type != "deb" && repo_type != "deb-src" {
                return None;
            }

            let mut rest = rest.trim_start();
            let mut gpg_key = None;
            if let Some(options) = rest.strip_prefix('[') {
                let (options, after) = options.split_once(']')?;
                gpg_key = options
                    .split_whitespace()
                    .find_map(|opt| opt.strip_prefix("signed-by="))
                    .map(str::to_string);
                rest = after.trim_start();
            }

            let fields: Vec<&str> = rest.split_whitespace().collect();
            if fields.len() < 2 {
                return None;
            }

            let repository = Repository {
                name: repository_name(file, fields[0]),
                url: fields[0].to_string(),
                enabled,
                gpg_key,
                repo_type: repo_type.to_string(),
                components: fields[2..].iter().map(|c| c.to_string()).collect(),
                distribution: fields[1].to_string(),
                priority: 0,
            };
            Some(LocatedRepository {
                file: file.to_string(),
                repository,
            })
        })
        .collect()
}

/// deb822 format: `Types:`/`URIs:`/`Suites:`/`Components:` stanzas.
pub fn parse_deb822(file: &str, body: &str) -> Vec<LocatedRepository> {
    let cleaned: String = body
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    parse_field_blocks(&cleaned, ':')
        .iter()
        .filter_map(|block| {
            let url = block.get("URIs")?.split_whitespace().next()?.to_string();
            let enabled = !block
                .get("Enabled")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("no"));
            let repository = Repository {
                name: repository_name(file, &url),
                enabled,
                gpg_key: block
                    .get("Signed-By")
                    .and_then(|k| k.lines().next())
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string),
                repo_type: block
                    .get("Types")
                    .and_then(|t| t.split_whitespace().next())
                    .unwrap_or("deb")
                    .to_string(),
                components: block
                    .get("Components")
                    .map(|c| c.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
                distribution: block.get("Suites").unwrap_or("").trim().to_string(),
                priority: 0,
                url,
            };
            Some(LocatedRepository {
                file: file.to_string(),
                repository,
            })
        })
        .collect()
}

/// One-line `deb` entry for a new `.list` file.
pub fn render_source_line(repo: &Repository) -> String {
    let mut line = String::new();
    if !repo.enabled {
        line.push_str("# ");
    }
    line.push_str(if repo.repo_type == "deb-src" { "deb-src" } else { "deb" });
    if let Some(key) = &repo.gpg_key {
        line.push_str(&format!(" [signed-by={}]", key));
    }
    line.push(' ');
    line.push_str(&repo.url);
    line.push(' ');
    line.push_str(if repo.distribution.is_empty() { "./" } else { &repo.distribution });
    for component in &repo.components {
        line.push(' ');
        line.push_str(component);
    }
    line.push('\n');
    line
}

/// `dpkg --verify` prints one line per changed file; none means intact.
pub fn verify_clean(text: &str) -> bool {
    text.lines().all(|l| l.trim().is_empty())
}
