use crate::core::types::Repository;

/// A repository together with the file it was defined in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedRepository {
    pub file: String,
    pub repository: Repository,
}

/// Split a `grep -H` line into `(path, content)`.
///
/// Lines that do not start with an absolute path are returned with an
/// empty path, so plain file content can be parsed too.
pub fn split_grep_line(line: &str) -> (&str, &str) {
    if line.starts_with('/')
        && let Some((path, content)) = line.split_once(':')
    {
        return (path, content);
    }
    ("", line)
}

/// Parse INI-style `.repo` definitions (`[id]` sections with `key=value`).
///
/// Accepts either raw file content or `grep -rH ^` output covering several
/// files. A section with an empty id is dropped; `enabled` defaults to true.
pub fn parse_repo_files(text: &str) -> Vec<LocatedRepository> {
    let mut repos = Vec::new();
    let mut current: Option<LocatedRepository> = None;

    for raw in text.lines() {
        let (file, line) = split_grep_line(raw);
        let trimmed = line.trim();

        if let Some(open) = &current
            && open.file != file
        {
            push_if_named(&mut repos, current.take());
        }

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if let Some(id) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            push_if_named(&mut repos, current.take());
            let mut repository = Repository::new(id.trim(), "");
            repository.repo_type = "rpm-md".to_string();
            current = Some(LocatedRepository {
                file: file.to_string(),
                repository,
            });
            continue;
        }

        // Indented lines continue a multi-valued key (extra baseurls); skip.
        if line.starts_with(char::is_whitespace) {
            continue;
        }

        let Some(open) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        apply_key(&mut open.repository, key.trim(), value.trim());
    }

    push_if_named(&mut repos, current);
    repos
}

fn apply_key(repo: &mut Repository, key: &str, value: &str) {
    match key.to_lowercase().as_str() {
        "baseurl" => {
            let first = value.split_whitespace().next().unwrap_or("");
            repo.url = first.to_string();
        }
        "mirrorlist" | "metalink" => {
            if repo.url.is_empty() {
                repo.url = value.to_string();
            }
        }
        "enabled" => repo.enabled = is_truthy(value),
        "gpgkey" => {
            let first = value.split_whitespace().next().unwrap_or("");
            if !first.is_empty() {
                repo.gpg_key = Some(first.to_string());
            }
        }
        "priority" => repo.priority = value.parse().unwrap_or(repo.priority),
        "type" => repo.repo_type = value.to_string(),
        _ => {}
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "yes" | "true" | "on"
    )
}

fn push_if_named(repos: &mut Vec<LocatedRepository>, repo: Option<LocatedRepository>) {
    if let Some(repo) = repo
        && !repo.repository.name.is_empty()
    {
        repos.push(repo);
    }
}

/// Render a repository as a `.repo` file section.
pub fn render_repo_file(repo: &Repository) -> String {
    let mut out = format!("[{}]\nname={}\nbaseurl={}\n", repo.name, repo.name, repo.url);
    out.push_str(&format!("enabled={}\n", u8::from(repo.enabled)));
    match &repo.gpg_key {
        Some(key) => {
            out.push_str("gpgcheck=1\n");
            out.push_str(&format!("gpgkey={}\n", key));
        }
        None => out.push_str("gpgcheck=0\n"),
    }
    if repo.priority != 0 {
        out.push_str(&format!("priority={}\n", repo.priority));
    }
    out
}
