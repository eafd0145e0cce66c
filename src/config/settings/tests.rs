use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.timeout, 600);
    assert_eq!(settings.elevation, "auto");
    assert!(!settings.verbose);
    assert_eq!(settings.family, None);
    assert_eq!(settings.timeout(), Some(Duration::from_secs(600)));
}

#[test]
fn test_parse_all_keys() {
    let settings = Settings::parse(
        r#"
// distropkg settings
settings {
    timeout 120
    elevation "doas"
    verbose #true
    family "rhel"
}
"#,
    )
    .unwrap();
    assert_eq!(settings.timeout, 120);
    assert_eq!(settings.elevation, "doas");
    assert!(settings.verbose);
    assert_eq!(settings.family, Some(Family::Rhel));
}

#[test]
fn test_partial_file_keeps_defaults() {
    let settings = Settings::parse("settings {\n    verbose #true\n}\n").unwrap();
    assert!(settings.verbose);
    assert_eq!(settings.timeout, DEFAULT_TIMEOUT_SECS);
    assert_eq!(settings.elevation, "auto");
}

#[test]
fn test_zero_timeout_disables_deadline() {
    let settings = Settings::parse("settings {\n    timeout 0\n}\n").unwrap();
    assert_eq!(settings.timeout(), None);
}

#[test]
fn test_unknown_key() {
    let err = Settings::parse("settings {\n    colour \"always\"\n}\n").unwrap_err();
    assert!(matches!(err, DistroPkgError::ConfigError(ref m) if m.contains("colour")));
}

#[test]
fn test_unknown_top_level_node() {
    let err = Settings::parse("options {\n    timeout 5\n}\n").unwrap_err();
    assert!(matches!(err, DistroPkgError::ConfigError(_)));
}

#[test]
fn test_wrong_value_types() {
    for content in [
        "settings {\n    timeout \"soon\"\n}\n",
        "settings {\n    timeout -5\n}\n",
        "settings {\n    verbose \"yes\"\n}\n",
        "settings {\n    elevation \"su\"\n}\n",
        "settings {\n    family \"gentoo\"\n}\n",
        "settings {\n    family\n}\n",
    ] {
        let err = Settings::parse(content).unwrap_err();
        assert!(
            matches!(err, DistroPkgError::ConfigError(_)),
            "expected ConfigError for {:?}, got {:?}",
            content,
            err
        );
    }
}

#[test]
fn test_malformed_kdl() {
    let err = Settings::parse("settings {\n    timeout 5\n").unwrap_err();
    assert!(matches!(err, DistroPkgError::KdlError(_)));
}

#[test]
fn test_load_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.kdl")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "settings {{\n    elevation \"none\"\n    timeout 30\n}}").unwrap();
    let settings = Settings::load_from(file.path()).unwrap();
    assert_eq!(settings.elevation, "none");
    assert_eq!(settings.timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn test_serializes_to_json() {
    let settings = Settings {
        family: Some(Family::Suse),
        ..Default::default()
    };
    let json = serde_json::to_value(&settings).unwrap();
    assert_eq!(json["family"], "suse");
    assert_eq!(json["timeout"], 600);
}
