/// Reduce one dependency expression to its bare package name.
///
/// Strips parenthesised constraints (`libc6 (>= 2.34)`), inline operators
/// (`openssl>=1.1`, `libcurl.so=4-64`), apt's `:any` qualifier and takes the
/// first of several `|` alternatives.
pub fn strip_constraint(dep: &str) -> String {
    let first_alternative = dep.split('|').next().unwrap_or("");
    let without_parens = first_alternative
        .split('(')
        .next()
        .unwrap_or("")
        .trim();

    let end = without_parens
        .find(['<', '>', '=', ' '])
        .unwrap_or(without_parens.len());
    let name = &without_parens[..end];
    let name = name.strip_suffix(":any").unwrap_or(name);

    name.trim().to_string()
}

/// Parse a dependency field into an ordered list of bare names.
///
/// Comma-separated values (apt) and whitespace-separated values (pacman)
/// are both accepted; `None` means no dependencies.
pub fn parse_dependency_list(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    let items: Vec<&str> = if value.contains(',') {
        value.split(',').collect()
    } else {
        value.split_whitespace().collect()
    };

    let mut names: Vec<String> = Vec::new();
    for item in items {
        let name = strip_constraint(item);
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
