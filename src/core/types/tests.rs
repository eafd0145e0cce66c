use super::*;

#[test]
fn test_family_from_str() {
    assert_eq!("debian".parse::<Family>(), Ok(Family::Debian));
    assert_eq!("RHEL".parse::<Family>(), Ok(Family::Rhel));
    assert_eq!("fedora".parse::<Family>(), Ok(Family::Rhel));
    assert_eq!(" arch ".parse::<Family>(), Ok(Family::Arch));
    assert_eq!("opensuse".parse::<Family>(), Ok(Family::Suse));
    assert!("gentoo".parse::<Family>().is_err());
}

#[test]
fn test_backend_family_mapping() {
    assert_eq!(BackendKind::Apt.family(), Family::Debian);
    assert_eq!(BackendKind::Dnf.family(), Family::Rhel);
    assert_eq!(BackendKind::Yum.family(), Family::Rhel);
    assert_eq!(BackendKind::Pacman.family(), Family::Arch);
    assert_eq!(BackendKind::Zypper.family(), Family::Suse);
}

#[test]
fn test_repository_enabled_by_default() {
    let repo = Repository::new("docker", "https://download.docker.com/linux/ubuntu");
    assert!(repo.enabled);
    assert!(repo.gpg_key.is_none());
    assert_eq!(repo.priority, 0);
}

#[test]
fn test_package_display() {
    assert_eq!(Package::new("curl").to_string(), "curl");
    assert_eq!(
        Package::new("curl").with_version("8.5.0-1").to_string(),
        "curl (8.5.0-1)"
    );
}

#[test]
fn test_repository_serializes_type_field() {
    let mut repo = Repository::new("extra", "https://mirror/extra");
    repo.repo_type = "pacman".into();
    let json = serde_json::to_value(&repo).expect("serialize");
    assert_eq!(json["type"], "pacman");
    assert_eq!(json["enabled"], true);
}
