//! Input validation for names that end up in argument vectors
//!
//! Commands are never run through a shell, so the remaining risks are names
//! that look like options (`--root=/`), names that escape a directory when
//! they become part of a repository file path, and repository fields that
//! smuggle extra lines into root-owned config files.

use crate::core::types::Repository;
use crate::error::{DistroPkgError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Allows: alphanumeric, dash, underscore, dot, plus, at sign, colon (apt
/// arch qualifiers), equals (apt version pins), tilde, slash (repo/name)
static SAFE_PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9@._+:=~/-]+$").expect("Invalid regex pattern"));

/// Repository names become file names, so no slash
static SAFE_REPOSITORY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._+:@-]+$").expect("Invalid regex pattern"));

/// Key ids: fingerprints, short ids or user ids given as an email address
static SAFE_KEY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9@._+<>-]+$").expect("Invalid regex pattern"));

const MAX_NAME_LEN: usize = 256;

/// Validate a package name before it is passed to a backend
pub fn validate_package_name(name: &str) -> Result<()> {
    check_common(name, "Package")?;

    if !SAFE_PACKAGE_NAME.is_match(name) {
        return Err(DistroPkgError::InvalidName(format!(
            "Package name contains invalid characters: {}",
            name
        )));
    }

    if name.contains("..") {
        return Err(DistroPkgError::InvalidName(format!(
            "Package name cannot contain path traversal: {}",
            name
        )));
    }

    Ok(())
}

/// Validate a list of package names
pub fn validate_package_names(names: &[String]) -> Result<()> {
    for name in names {
        validate_package_name(name)?;
    }
    Ok(())
}

/// Validate a repository name (also used as a file stem)
pub fn validate_repository_name(name: &str) -> Result<()> {
    check_common(name, "Repository")?;

    if !SAFE_REPOSITORY_NAME.is_match(name) || name.contains("..") {
        return Err(DistroPkgError::InvalidName(format!(
            "Repository name contains invalid characters: {}",
            name
        )));
    }

    Ok(())
}

/// Validate a free-text search query (must not look like an option)
pub fn validate_query(query: &str) -> Result<()> {
    check_common(query, "Search query")
}

/// Validate a signing key id before handing it to a keyring tool
pub fn validate_key_id(key: &str) -> Result<()> {
    check_common(key, "Key")?;

    if !SAFE_KEY_ID.is_match(key) {
        return Err(DistroPkgError::InvalidName(format!(
            "Key id contains invalid characters: {}",
            key
        )));
    }

    Ok(())
}

/// Validate a key file path or URL handed to an import command
pub fn validate_key_source(source: &str) -> Result<()> {
    check_common(source, "Key")?;

    check_single_token(source, "Key location")
}

/// Validate a repository URL before it is written into a config file or
/// passed to a backend. Whitespace and control characters are rejected
/// since a newline would start a new section or key.
pub fn validate_repository_url(url: &str) -> Result<()> {
    check_common(url, "Repository URL")?;
    check_single_token(url, "Repository URL")
}

/// Validate the fields of a repository definition that end up in config
/// files: URL, suite and components. Backends check the key themselves
/// since it is a key id for some and a location for others.
pub fn validate_repository_fields(repo: &Repository) -> Result<()> {
    validate_repository_url(&repo.url)?;

    if !repo.distribution.is_empty() {
        check_common(&repo.distribution, "Distribution")?;
        check_single_token(&repo.distribution, "Distribution")?;
    }

    for component in &repo.components {
        check_common(component, "Component")?;
        check_single_token(component, "Component")?;
    }

    Ok(())
}

fn check_single_token(value: &str, what: &str) -> Result<()> {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(DistroPkgError::InvalidName(format!(
            "{} cannot contain whitespace or control characters: {:?}",
            what, value
        )));
    }
    Ok(())
}

fn check_common(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DistroPkgError::InvalidName(format!(
            "{} name cannot be empty",
            what
        )));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(DistroPkgError::InvalidName(format!(
            "{} name too long (max {} chars): {}...",
            what,
            MAX_NAME_LEN,
            name.chars().take(50).collect::<String>()
        )));
    }

    if name.starts_with('-') {
        return Err(DistroPkgError::InvalidName(format!(
            "{} name cannot start with '-': {}",
            what, name
        )));
    }

    Ok(())
}

/// Escape a literal for use inside a `sed -E` address or pattern
pub fn sed_escape(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(
            c,
            '.' | '+' | '*' | '?' | '[' | ']' | '(' | ')' | '{' | '}' | '|' | '^' | '$' | '\\' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests;
