// Integration tests for backend selection and factory construction

use distropkg::core::distro::{Distribution, parse_os_release};
use distropkg::core::types::{BackendKind, Family};
use distropkg::error::DistroPkgError;
use distropkg::execution::{Context, ElevationMethod, RecordingExecutor, SystemElevator};
use distropkg::packages::{ManagerFactory, select_backend};
use std::sync::Arc;

fn factory_for(distro: Distribution) -> ManagerFactory {
    ManagerFactory::new(
        Arc::new(RecordingExecutor::new()),
        Arc::new(SystemElevator::new(true, None)),
        Arc::new(distro),
    )
}

fn rhel(id: &str, version: &str) -> Distribution {
    Distribution::new(id, version, Some(Family::Rhel))
}

mod selection {
    use super::*;

    #[test]
    fn centos_seven_uses_yum() {
        assert_eq!(select_backend(&rhel("centos", "7.9")).unwrap(), BackendKind::Yum);
    }

    #[test]
    fn centos_eight_uses_dnf() {
        assert_eq!(select_backend(&rhel("centos", "8")).unwrap(), BackendKind::Dnf);
    }

    #[test]
    fn unparseable_versions_use_dnf() {
        for version in ["", "stream", "rawhide", ".9"] {
            assert_eq!(
                select_backend(&rhel("centos", version)).unwrap(),
                BackendKind::Dnf,
                "version {:?}",
                version
            );
        }
    }

    #[test]
    fn fedora_ignores_version() {
        for version in ["", "5", "7", "41"] {
            assert_eq!(select_backend(&rhel("fedora", version)).unwrap(), BackendKind::Dnf);
        }
    }

    #[test]
    fn missing_family_is_unsupported() {
        let err = select_backend(&Distribution::new("slackware", "15.0", None)).unwrap_err();
        assert!(matches!(err, DistroPkgError::UnsupportedDistribution(_)));
    }
}

mod os_release {
    use super::*;

    #[test]
    fn rocky_via_id_like() {
        let distro = parse_os_release(
            "NAME=\"Rocky Linux\"\nID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\nVERSION_ID=\"9.3\"\n",
        );
        assert_eq!(distro.family, Some(Family::Rhel));
        assert_eq!(select_backend(&distro).unwrap(), BackendKind::Dnf);
    }

    #[test]
    fn centos_seven_file() {
        let distro = parse_os_release(
            "NAME=\"CentOS Linux\"\nVERSION=\"7 (Core)\"\nID=\"centos\"\nID_LIKE=\"rhel fedora\"\nVERSION_ID=\"7\"\n",
        );
        assert_eq!(select_backend(&distro).unwrap(), BackendKind::Yum);
    }

    #[test]
    fn opensuse_tumbleweed() {
        let distro = parse_os_release(
            "NAME=\"openSUSE Tumbleweed\"\nID=\"opensuse-tumbleweed\"\nID_LIKE=\"opensuse suse\"\nVERSION_ID=\"20240101\"\n",
        );
        assert_eq!(select_backend(&distro).unwrap(), BackendKind::Zypper);
    }

    #[test]
    fn arch_without_version() {
        let distro = parse_os_release("NAME=\"Arch Linux\"\nID=arch\nBUILD_ID=rolling\n");
        assert_eq!(select_backend(&distro).unwrap(), BackendKind::Pacman);
    }
}

mod construction {
    use super::*;

    #[test]
    fn repeated_calls_build_distinct_instances() {
        let factory = factory_for(Distribution::default());
        for family in [Family::Debian, Family::Rhel, Family::Arch, Family::Suse] {
            let first = factory.create_for_family(family);
            let second = factory.create_for_family(family);
            assert!(!std::ptr::addr_eq(first.as_ref(), second.as_ref()));
            assert_eq!(first.name(), second.name());
            assert_eq!(first.family(), second.family());
            assert_eq!(first.family(), family);
        }
    }

    #[test]
    fn create_for_distribution_follows_selection() {
        let factory = factory_for(Distribution::default());
        let manager = factory
            .create_for_distribution(&rhel("ol", "7.9"))
            .unwrap();
        assert_eq!(manager.kind(), BackendKind::Yum);
    }

    #[test]
    fn create_detects_with_collaborator() {
        let factory = factory_for(Distribution::new("debian", "12", Some(Family::Debian)));
        let manager = factory.create(&Context::new()).unwrap();
        assert_eq!(manager.name(), "apt");
    }

    #[test]
    fn concurrent_construction() {
        let factory = Arc::new(factory_for(rhel("almalinux", "9.4")));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let factory = Arc::clone(&factory);
                std::thread::spawn(move || {
                    factory
                        .create(&Context::new())
                        .map(|m| m.kind())
                        .unwrap_or(BackendKind::Apt)
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), BackendKind::Dnf);
        }
    }

    #[test]
    fn sudo_prefix_only_when_not_root() {
        let exec = Arc::new(RecordingExecutor::new());
        let factory = ManagerFactory::new(
            exec.clone(),
            Arc::new(SystemElevator::new(false, Some(ElevationMethod::Doas))),
            Arc::new(Distribution::default()),
        );
        let manager = factory.create_kind(BackendKind::Zypper);
        manager.clean(&Context::new()).unwrap();
        assert_eq!(exec.lines(), vec!["doas zypper --non-interactive clean --all"]);
    }
}
