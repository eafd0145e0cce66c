use crate::core::types::{Package, Repository};
use crate::packages::parsers::{
    data_lines, parse_dependency_list, parse_field_blocks, parse_size, strip_installed_marker,
};

/// Section name pacman reserves for global options.
pub const OPTIONS_SECTION: &str = "options";

/// `pacman -Ss`: `repo/name version [(groups)] [installed]` followed by an
/// indented description line.
pub fn parse_search(text: &str) -> Vec<Package> {
    let mut packages: Vec<Package> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if let Some(last) = packages.last_mut()
                && last.description.is_empty()
            {
                last.description = line.trim().to_string();
            }
            continue;
        }

        let (stripped, installed) = strip_installed_marker(line);
        let mut fields = stripped.split_whitespace();
        let (Some(qualified), Some(version)) = (fields.next(), fields.next()) else {
            continue;
        };
        let (repository, name) = qualified.split_once('/').unwrap_or(("", qualified));
        if name.is_empty() {
            continue;
        }
        packages.push(Package {
            name: name.to_string(),
            version: version.to_string(),
            repository: repository.to_string(),
            installed,
            ..Default::default()
        });
    }
    packages
}

/// `pacman -Qi` / `pacman -Si` blocks. `installed` is true for `-Qi`.
pub fn parse_info(text: &str, installed: bool) -> Vec<Package> {
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
                installed,
                repository: block.get("Repository").unwrap_or("").to_string(),
                description: block.get("Description").unwrap_or("").to_string(),
                size_bytes: block
                    .get_any(&["Installed Size", "Download Size"])
                    .map(parse_size)
                    .unwrap_or(0),
                architecture: block.get("Architecture").unwrap_or("").to_string(),
                dependencies: block
                    .get("Depends On")
                    .map(parse_dependency_list)
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// `pacman -Q`: `name version` per line.
pub fn parse_installed(text: &str) -> Vec<Package> {
    data_lines(text)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let version = fields.next()?;
            Some(Package {
                name: name.to_string(),
                version: version.to_string(),
                installed: true,
                ..Default::default()
            })
        })
        .collect()
}

/// `pacman -Qu`: `name old -> new`. Packages held by `IgnorePkg` are dropped.
pub fn parse_upgradable(text: &str) -> Vec<Package> {
    data_lines(text)
        .filter(|line| !line.trim_end().ends_with("[ignored]"))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let version = match fields.as_slice() {
                [_, _, "->", new, ..] => *new,
                [_, version] => *version,
                _ => return None,
            };
            Some(Package {
                name: fields[0].to_string(),
                version: version.to_string(),
                installed: true,
                ..Default::default()
            })
        })
        .collect()
}

fn section_header(line: &str) -> Option<&str> {
    let name = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        None
    } else {
        Some(name)
    }
}

/// Parse the repository sections of `pacman.conf`.
///
/// `[name]` opens an enabled section and `#[name]` a commented-out one,
/// whose `#Key = value` lines are read as if uncommented. `Server` gives the
/// URL; a section with only an `Include` uses the included mirrorlist path.
pub fn parse_conf(text: &str) -> Vec<Repository> {
    let mut repos: Vec<Repository> = Vec::new();
    let mut in_repo = false;
    let mut include = String::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (commented, body) = match line.strip_prefix('#') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, line),
        };

        if let Some(name) = section_header(body) {
            close_section(&mut repos, &mut include);
            in_repo = name != OPTIONS_SECTION;
            if in_repo {
                repos.push(Repository {
                    name: name.to_string(),
                    enabled: !commented,
                    ..Default::default()
                });
            }
            continue;
        }

        if !in_repo {
            continue;
        }
        let Some(repo) = repos.last_mut() else {
            continue;
        };
        // Inside an active section, commented keys are really off.
        if commented == repo.enabled {
            continue;
        }
        let Some((key, value)) = body.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Server" if repo.url.is_empty() => repo.url = value.to_string(),
            "Include" if include.is_empty() => include = value.to_string(),
            _ => {}
        }
    }
    close_section(&mut repos, &mut include);
    repos
}

fn close_section(repos: &mut [Repository], include: &mut String) {
    if let Some(last) = repos.last_mut()
        && last.url.is_empty()
    {
        last.url = std::mem::take(include);
    }
    include.clear();
}

/// Render a section for appending to `pacman.conf`.
///
/// Without a signing key the repository is marked `Optional TrustAll`.
/// Disabled repositories are written commented out.
pub fn render_section(repo: &Repository) -> String {
    let mut lines = vec![format!("[{}]", repo.name)];
    if repo.gpg_key.is_none() {
        lines.push("SigLevel = Optional TrustAll".to_string());
    }
    lines.push(format!("Server = {}", repo.url));

    let prefix = if repo.enabled { "" } else { "#" };
    let mut out = String::from("\n");
    for line in lines {
        out.push_str(prefix);
        out.push_str(&line);
        out.push('\n');
    }
    out
}
