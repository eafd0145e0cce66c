use super::*;

#[test]
fn test_valid_package_names() {
    assert!(validate_package_name("curl").is_ok());
    assert!(validate_package_name("python3.12").is_ok());
    assert!(validate_package_name("gcc-c++").is_ok());
    assert!(validate_package_name("libc6:amd64").is_ok());
    assert!(validate_package_name("curl=7.81.0-1ubuntu1.15").is_ok());
    assert!(validate_package_name("extra/curl").is_ok());
    assert!(validate_package_name("font-config~beta").is_ok());
}

#[test]
fn test_option_injection_blocked() {
    assert!(validate_package_name("--root=/").is_err());
    assert!(validate_package_name("-y").is_err());
    assert!(validate_repository_name("-d").is_err());
}

#[test]
fn test_shell_metacharacters_blocked() {
    assert!(validate_package_name("foo; rm -rf /").is_err());
    assert!(validate_package_name("foo | cat").is_err());
    assert!(validate_package_name("foo$(cat)").is_err());
    assert!(validate_package_name("foo && echo").is_err());
}

#[test]
fn test_path_traversal_blocked() {
    assert!(validate_package_name("../../../etc/passwd").is_err());
    assert!(validate_repository_name("..").is_err());
    assert!(validate_repository_name("foo/bar").is_err());
}

#[test]
fn test_empty_and_long_names() {
    assert!(validate_package_name("").is_err());
    assert!(validate_package_name(&"a".repeat(300)).is_err());
    assert!(validate_repository_name("").is_err());
}

#[test]
fn test_repository_names() {
    assert!(validate_repository_name("docker-ce-stable").is_ok());
    assert!(validate_repository_name("rpmfusion-free").is_ok());
    assert!(validate_repository_name("home:user:branch").is_ok());
}

#[test]
fn test_list_validation_stops_at_first_bad_name() {
    let names = vec!["curl".to_string(), "bad name".to_string()];
    assert!(matches!(
        validate_package_names(&names),
        Err(DistroPkgError::InvalidName(_))
    ));
}

#[test]
fn test_sed_escape() {
    assert_eq!(sed_escape("core-testing"), "core-testing");
    assert_eq!(sed_escape("gcc++.x"), "gcc\\+\\+\\.x");
    assert_eq!(sed_escape("a/b"), "a\\/b");
}

#[test]
fn test_search_query_cannot_look_like_option() {
    assert!(validate_query("python3 http").is_ok());
    assert!(validate_query("--installed").is_err());
    assert!(validate_query("").is_err());
}

#[test]
fn test_key_ids() {
    assert!(validate_key_id("3056513887B78AEB").is_ok());
    assert!(validate_key_id("0x3056513887B78AEB").is_ok());
    assert!(validate_key_id("builder@example.org").is_ok());
    assert!(validate_key_id("--keyserver").is_err());
    assert!(validate_key_id("abc;rm").is_err());
}

#[test]
fn test_key_sources() {
    assert!(validate_key_source("https://download.opensuse.org/repositories/home:/u/repodata/repomd.xml.key").is_ok());
    assert!(validate_key_source("/etc/pki/rpm-gpg/RPM-GPG-KEY").is_ok());
    assert!(validate_key_source("-v").is_err());
    assert!(validate_key_source("a key").is_err());
}

#[test]
fn test_repository_urls() {
    assert!(validate_repository_url("https://repo.example.org/$repo/os/$arch").is_ok());
    assert!(validate_repository_url("dir:///srv/rpms").is_ok());
    assert!(validate_repository_url("").is_err());
    assert!(validate_repository_url("--root=/").is_err());
    assert!(validate_repository_url("https://example.org/$arch\n[options]\nSigLevel = Never").is_err());
    assert!(validate_repository_url("https://example.org/a\rb").is_err());
    assert!(validate_repository_url("https://example.org/a b").is_err());
    assert!(validate_key_source("/etc/keys/k.asc\ngpgcheck=0").is_err());
}

#[test]
fn test_repository_fields() {
    let mut repo = Repository::new("docker", "https://download.docker.com/linux/debian");
    repo.distribution = "bookworm".into();
    repo.components = vec!["stable".into()];
    assert!(validate_repository_fields(&repo).is_ok());

    let mut flat = Repository::new("local", "file:///srv/debs");
    flat.distribution.clear();
    assert!(validate_repository_fields(&flat).is_ok());

    let mut bad_suite = repo.clone();
    bad_suite.distribution = "bookworm\ndeb http://evil.example.org/ ./".into();
    assert!(validate_repository_fields(&bad_suite).is_err());

    let mut bad_component = repo.clone();
    bad_component.components = vec!["main contrib".into()];
    assert!(validate_repository_fields(&bad_component).is_err());

    let mut empty_component = repo;
    empty_component.components = vec![String::new()];
    assert!(validate_repository_fields(&empty_component).is_err());
}
