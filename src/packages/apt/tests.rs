use super::*;
use crate::execution::{ElevationMethod, RecordingExecutor, SystemElevator};
use std::sync::Arc;

fn manager() -> (Arc<RecordingExecutor>, AptManager) {
    let exec = Arc::new(RecordingExecutor::new());
    let runner = Runner::new(
        exec.clone(),
        Arc::new(SystemElevator::new(false, Some(ElevationMethod::Sudo))),
    );
    (exec, AptManager::new(runner))
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

const SOURCES: &str = "\
/etc/apt/sources.list:deb http://deb.debian.org/debian bookworm main contrib
/etc/apt/sources.list:# deb-src http://deb.debian.org/debian bookworm main
/etc/apt/sources.list:# a plain comment
/etc/apt/sources.list.d/docker.list:deb [arch=amd64 signed-by=/etc/apt/keyrings/docker.gpg] https://download.docker.com/linux/debian bookworm stable
/etc/apt/sources.list.d/old.list:# deb http://old.example.org/debian buster main
/etc/apt/sources.list.d/ubuntu.sources:Types: deb
/etc/apt/sources.list.d/ubuntu.sources:URIs: http://archive.ubuntu.com/ubuntu/
/etc/apt/sources.list.d/ubuntu.sources:Suites: noble noble-updates
/etc/apt/sources.list.d/ubuntu.sources:Components: main restricted
/etc/apt/sources.list.d/ubuntu.sources:Signed-By: /usr/share/keyrings/ubuntu-archive-keyring.gpg
/etc/apt/sources.list.d/ubuntu.sources:
/etc/apt/sources.list.d/vscode.sources:Types: deb
/etc/apt/sources.list.d/vscode.sources:URIs: https://packages.microsoft.com/repos/code
/etc/apt/sources.list.d/vscode.sources:Suites: stable
/etc/apt/sources.list.d/vscode.sources:Components: main
/etc/apt/sources.list.d/vscode.sources:Enabled: no
";

// Parsers

#[test]
fn test_parse_search() {
    let text = "\
curl - command line tool for transferring data with URL syntax
libcurl4 - easy-to-use client-side URL transfer library (OpenSSL flavour)
garbage line without separator
";
    let packages = parsers::parse_search(text);
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].name, "curl");
    assert_eq!(
        packages[0].description,
        "command line tool for transferring data with URL syntax"
    );
    assert!(!packages[0].installed);
}

#[test]
fn test_parse_show_stanza() {
    let text = "\
Package: curl
Version: 7.88.1-10+deb12u5
Installed-Size: 500
Architecture: amd64
Depends: libc6 (>= 2.34), libcurl4 (= 7.88.1-10+deb12u5), zlib1g (>= 1:1.1.4)
Pre-Depends: dpkg (>= 1.19)
Size: 315680
Description: command line tool for transferring data with URL syntax
 curl is a command line tool for transferring data with URL syntax.

Package: curl
Version: 7.88.1-10
Architecture: amd64
";
    let packages = parsers::parse_show(text);
    assert_eq!(packages.len(), 2);
    let curl = &packages[0];
    assert_eq!(curl.version, "7.88.1-10+deb12u5");
    assert_eq!(curl.size_bytes, 500 * 1024);
    assert_eq!(curl.dependencies, vec!["dpkg", "libc6", "libcurl4", "zlib1g"]);
    assert_eq!(
        curl.description,
        "command line tool for transferring data with URL syntax"
    );
}

#[test]
fn test_parse_show_falls_back_to_download_size() {
    let packages = parsers::parse_show("Package: tiny\nVersion: 1\nSize: 2048\n");
    assert_eq!(packages[0].size_bytes, 2048);
}

#[test]
fn test_parse_installed_skips_config_only() {
    let text = "\
bash\t5.2.15-2+b2\tamd64\t7160\tii
oldpkg\t1.0-1\tamd64\t12\trc
held\t2.0\tall\t\thi
short\tline
";
    let packages = parsers::parse_installed(text);
    let found: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(found, vec!["bash", "held"]);
    assert_eq!(packages[0].size_bytes, 7160 * 1024);
    assert_eq!(packages[1].size_bytes, 0);
    assert!(packages.iter().all(|p| p.installed));
}

#[test]
fn test_parse_upgradable() {
    let text = "\
Listing...
curl/jammy-updates,jammy-security 7.81.0-1ubuntu1.16 amd64 [upgradable from: 7.81.0-1ubuntu1.15]
libcurl4/jammy-updates 7.81.0-1ubuntu1.16 amd64 [upgradable from: 7.81.0-1ubuntu1.15]
";
    let packages = parsers::parse_upgradable(text);
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].name, "curl");
    assert_eq!(packages[0].repository, "jammy-updates");
    assert_eq!(packages[0].version, "7.81.0-1ubuntu1.16");
    assert_eq!(packages[0].architecture, "amd64");
}

#[test]
fn test_parse_sources_both_formats() {
    let repos = parsers::parse_sources(SOURCES);
    let listed: Vec<(&str, bool)> = repos
        .iter()
        .map(|r| (r.repository.name.as_str(), r.repository.enabled))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("sources", true),
            ("sources", false),
            ("docker", true),
            ("old", false),
            ("ubuntu", true),
            ("vscode", false),
        ]
    );

    let docker = &repos[2].repository;
    assert_eq!(docker.url, "https://download.docker.com/linux/debian");
    assert_eq!(docker.distribution, "bookworm");
    assert_eq!(docker.components, vec!["stable"]);
    assert_eq!(docker.gpg_key.as_deref(), Some("/etc/apt/keyrings/docker.gpg"));
    assert_eq!(repos[1].repository.repo_type, "deb-src");

    let ubuntu = &repos[4];
    assert_eq!(ubuntu.file, "/etc/apt/sources.list.d/ubuntu.sources");
    assert_eq!(ubuntu.repository.distribution, "noble noble-updates");
    assert_eq!(ubuntu.repository.components, vec!["main", "restricted"]);
}

#[test]
fn test_parse_sources_empty() {
    assert!(parsers::parse_sources("").is_empty());
}

#[test]
fn test_render_source_line() {
    let mut repo = Repository::new("docker", "https://download.docker.com/linux/debian");
    repo.distribution = "bookworm".into();
    repo.components = vec!["stable".into()];
    repo.gpg_key = Some("/etc/apt/keyrings/docker.gpg".into());
    assert_eq!(
        parsers::render_source_line(&repo),
        "deb [signed-by=/etc/apt/keyrings/docker.gpg] https://download.docker.com/linux/debian bookworm stable\n"
    );

    let flat = Repository::new("local", "file:/srv/debs");
    assert_eq!(parsers::render_source_line(&flat), "deb file:/srv/debs ./\n");
}

// Manager

#[test]
fn test_install_builds_noninteractive_command() {
    let (exec, apt) = manager();
    let options = InstallOptions {
        reinstall: true,
        quiet: true,
        ..Default::default()
    };
    apt.install(&Context::new(), &options, &names(&["curl", "wget"]))
        .unwrap();
    assert_eq!(
        exec.lines(),
        vec!["sudo apt-get install -y -q --reinstall curl wget"]
    );
}

#[test]
fn test_install_force_and_skip_verify() {
    let (exec, apt) = manager();
    let options = InstallOptions {
        force: true,
        skip_verify: true,
        allow_downgrade: true,
        download_only: true,
        ..Default::default()
    };
    apt.install(&Context::new(), &options, &names(&["htop"]))
        .unwrap();
    assert_eq!(
        exec.lines(),
        vec![
            "sudo apt-get install -y --allow-downgrades --download-only --allow-unauthenticated -o Dpkg::Options::=--force-confnew htop"
        ]
    );
}

#[test]
fn test_empty_install_and_remove_run_nothing() {
    let (exec, apt) = manager();
    let ctx = Context::new();
    apt.install(&ctx, &InstallOptions::default(), &[]).unwrap();
    apt.remove(&ctx, &RemoveOptions::default(), &[]).unwrap();
    assert_eq!(exec.count(), 0);
}

#[test]
fn test_install_unknown_package_is_classified() {
    let (exec, apt) = manager();
    exec.respond_exit(
        "apt-get install",
        100,
        "Reading package lists...\n",
        "E: Unable to locate package nosuchpkg\n",
    );
    let err = apt
        .install(
            &Context::new(),
            &InstallOptions::default(),
            &names(&["curl", "nosuchpkg"]),
        )
        .unwrap_err();

    assert!(err.is(ErrorKind::PackageNotFound));
    match err {
        crate::error::DistroPkgError::Package(e) => {
            assert_eq!(e.target(), Some("nosuchpkg"));
            assert_eq!(e.operation(), Operation::Install);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_install_lock_contention() {
    let (exec, apt) = manager();
    exec.respond_exit(
        "apt-get install",
        100,
        "",
        "E: Could not get lock /var/lib/dpkg/lock-frontend. It is held by process 1234 (apt)\n",
    );
    let err = apt
        .install(&Context::new(), &InstallOptions::default(), &names(&["curl"]))
        .unwrap_err();
    assert!(err.is(ErrorKind::LockUnavailable));
}

#[test]
fn test_invalid_name_never_reaches_executor() {
    let (exec, apt) = manager();
    let err = apt
        .install(&Context::new(), &InstallOptions::default(), &names(&["--root=/"]))
        .unwrap_err();
    assert!(matches!(err, crate::error::DistroPkgError::InvalidName(_)));
    assert_eq!(exec.count(), 0);
}

#[test]
fn test_remove_purge_with_autoremove() {
    let (exec, apt) = manager();
    let options = RemoveOptions {
        purge: true,
        auto_remove: true,
        ..Default::default()
    };
    apt.remove(&Context::new(), &options, &names(&["nginx"]))
        .unwrap();
    assert_eq!(exec.lines(), vec!["sudo apt-get purge -y --auto-remove nginx"]);
}

#[test]
fn test_upgrade_all_or_selected() {
    let (exec, apt) = manager();
    let ctx = Context::new();
    apt.upgrade(&ctx, &UpdateOptions::default(), &[]).unwrap();
    apt.upgrade(&ctx, &UpdateOptions::default(), &names(&["curl"]))
        .unwrap();
    assert_eq!(
        exec.lines(),
        vec![
            "sudo apt-get upgrade -y",
            "sudo apt-get install --only-upgrade -y curl"
        ]
    );
}

#[test]
fn test_update_network_failure() {
    let (exec, apt) = manager();
    exec.respond_exit(
        "apt-get update",
        100,
        "",
        "Err:1 http://deb.debian.org/debian bookworm InRelease\n  Temporary failure resolving 'deb.debian.org'\n",
    );
    let err = apt
        .update(&Context::new(), &UpdateOptions::default())
        .unwrap_err();
    assert!(err.is(ErrorKind::NetworkUnavailable));
}

#[test]
fn test_is_installed_states() {
    let (exec, apt) = manager();
    exec.respond_ok("-f=${Status} bash", "install ok installed");
    exec.respond_ok("-f=${Status} oldpkg", "deinstall ok config-files");
    exec.respond_exit(
        "-f=${Status} nope",
        1,
        "",
        "dpkg-query: no packages found matching nope\n",
    );
    exec.respond_exit("-f=${Status} broken", 2, "", "dpkg-query: error: parsing file\n");
    let ctx = Context::new();

    assert!(apt.is_installed(&ctx, "bash").unwrap());
    assert!(!apt.is_installed(&ctx, "oldpkg").unwrap());
    assert!(!apt.is_installed(&ctx, "nope").unwrap());
    assert!(apt.is_installed(&ctx, "broken").is_err());
    assert_eq!(exec.invocations()[0].command, "dpkg-query");
}

#[test]
fn test_search_exact_and_annotated() {
    let (exec, apt) = manager();
    exec.respond_ok(
        "apt-cache search",
        "curl - command line tool\ncurlftpfs - FTP filesystem\n",
    );
    exec.respond_ok("-f=${Status} curl", "install ok installed");
    let options = SearchOptions {
        exact: true,
        include_installed: true,
        limit: None,
    };

    let packages = apt.search(&Context::new(), "curl", &options).unwrap();
    assert_eq!(packages.len(), 1);
    assert!(packages[0].installed);
    assert_eq!(exec.lines()[0], "apt-cache search --names-only curl");
}

#[test]
fn test_search_no_matches_is_empty() {
    let (_, apt) = manager();
    let packages = apt
        .search(&Context::new(), "zzzz", &SearchOptions::default())
        .unwrap();
    assert!(packages.is_empty());
}

#[test]
fn test_search_limit() {
    let (exec, apt) = manager();
    exec.respond_ok("apt-cache search", "a - one\nb - two\nc - three\n");
    let options = SearchOptions {
        limit: Some(2),
        ..Default::default()
    };
    let packages = apt.search(&Context::new(), "x", &options).unwrap();
    assert_eq!(packages.len(), 2);
}

#[test]
fn test_info_not_found() {
    let (exec, apt) = manager();
    exec.respond_exit(
        "apt-cache show",
        100,
        "",
        "N: Unable to locate package ghost\nE: No packages found\n",
    );
    let err = apt.info(&Context::new(), "ghost").unwrap_err();
    assert!(err.is(ErrorKind::PackageNotFound));
}

#[test]
fn test_info_marks_installed() {
    let (exec, apt) = manager();
    exec.respond_ok("apt-cache show", "Package: bash\nVersion: 5.2\nArchitecture: amd64\n");
    exec.respond_ok("-f=${Status} bash", "install ok installed");
    let package = apt.info(&Context::new(), "bash").unwrap();
    assert_eq!(package.name, "bash");
    assert!(package.installed);
}

#[test]
fn test_list_repositories_reads_grep_output() {
    let (exec, apt) = manager();
    exec.respond_ok("grep -rsH", SOURCES);
    let repos = apt.list_repositories(&Context::new()).unwrap();
    assert_eq!(repos.len(), 6);
    assert!(!exec.lines()[0].starts_with("sudo"));
}

#[test]
fn test_add_repository_writes_list_file() {
    let (exec, apt) = manager();
    let mut repo = Repository::new("nodesource", "https://deb.nodesource.com/node_20.x");
    repo.distribution = "nodistro".into();
    repo.components = vec!["main".into()];

    apt.add_repository(&Context::new(), &repo).unwrap();

    let calls = exec.invocations();
    let tee = calls.last().unwrap();
    assert_eq!(tee.line(), "sudo tee /etc/apt/sources.list.d/nodesource.list");
    assert_eq!(
        tee.input_text().as_deref(),
        Some("deb https://deb.nodesource.com/node_20.x nodistro main\n")
    );
}

#[test]
fn test_add_existing_repository_fails() {
    let (exec, apt) = manager();
    exec.respond_ok("grep -rsH", SOURCES);
    let repo = Repository::new("docker", "https://download.docker.com/linux/debian");
    let err = apt.add_repository(&Context::new(), &repo).unwrap_err();
    assert!(err.is(ErrorKind::RepositoryExists));
    assert!(exec.lines().iter().all(|l| !l.contains("tee")));
}

#[test]
fn test_remove_repository() {
    let (exec, apt) = manager();
    exec.respond_ok("grep -rsH", SOURCES);
    let ctx = Context::new();

    apt.remove_repository(&ctx, "docker").unwrap();
    assert_eq!(
        exec.lines().last().unwrap(),
        "sudo rm -f /etc/apt/sources.list.d/docker.list"
    );

    assert!(
        apt.remove_repository(&ctx, "missing")
            .unwrap_err()
            .is(ErrorKind::RepositoryNotFound)
    );
    assert!(
        apt.remove_repository(&ctx, "sources")
            .unwrap_err()
            .is(ErrorKind::Unsupported)
    );
}

#[test]
fn test_disable_one_line_repository() {
    let (exec, apt) = manager();
    exec.respond_ok("grep -rsH", SOURCES);
    apt.disable_repository(&Context::new(), "docker").unwrap();

    let sed = exec.invocations().pop().unwrap();
    assert_eq!(sed.command, "sudo");
    assert_eq!(sed.args[0], "sed");
    assert!(sed.args.iter().any(|a| a.starts_with("s/^(deb(-src)?")));
    assert_eq!(sed.args.last().unwrap(), "/etc/apt/sources.list.d/docker.list");
}

#[test]
fn test_enable_deb822_repository_drops_enabled_line() {
    let (exec, apt) = manager();
    exec.respond_ok("grep -rsH", SOURCES);
    apt.enable_repository(&Context::new(), "vscode").unwrap();

    let sed = exec.invocations().pop().unwrap();
    assert_eq!(
        sed.args,
        vec![
            "sed",
            "-i",
            "-E",
            "-e",
            "/^Enabled:/d",
            "/etc/apt/sources.list.d/vscode.sources"
        ]
    );
}

#[test]
fn test_enable_already_enabled_is_noop() {
    let (exec, apt) = manager();
    exec.respond_ok("grep -rsH", SOURCES);
    apt.enable_repository(&Context::new(), "docker").unwrap();
    assert_eq!(exec.count(), 1);
}

#[test]
fn test_enable_mixed_file_is_not_skipped() {
    let (exec, apt) = manager();
    exec.respond_ok(
        "grep -rsH",
        "\
/etc/apt/sources.list.d/extras.list:deb http://a.example.org/debian bookworm main
/etc/apt/sources.list.d/extras.list:# deb http://b.example.org/debian bookworm main
",
    );
    apt.enable_repository(&Context::new(), "extras").unwrap();

    let sed = exec.invocations().pop().unwrap();
    assert_eq!(
        sed.args,
        vec![
            "sed",
            "-i",
            "-E",
            "-e",
            r"s/^#[[:space:]]*(deb(-src)?[[:space:]])/\1/",
            "/etc/apt/sources.list.d/extras.list"
        ]
    );
}

#[test]
fn test_disable_fully_disabled_file_is_noop() {
    let (exec, apt) = manager();
    exec.respond_ok("grep -rsH", SOURCES);
    apt.disable_repository(&Context::new(), "old").unwrap();
    assert_eq!(exec.count(), 1);
}

#[test]
fn test_toggle_unknown_repository() {
    let (exec, apt) = manager();
    exec.respond_ok("grep -rsH", SOURCES);
    let err = apt.enable_repository(&Context::new(), "nope").unwrap_err();
    assert!(err.is(ErrorKind::RepositoryNotFound));
}

#[test]
fn test_clean_and_autoremove() {
    let (exec, apt) = manager();
    let ctx = Context::new();
    apt.clean(&ctx).unwrap();
    apt.auto_remove(&ctx).unwrap();
    assert_eq!(
        exec.lines(),
        vec!["sudo apt-get clean", "sudo apt-get autoremove -y"]
    );
}

#[test]
fn test_verify() {
    let (exec, apt) = manager();
    exec.respond_exit("dpkg --verify changed", 1, "??5?????? c /etc/changed.conf\n", "");
    exec.respond_exit(
        "dpkg --verify ghost",
        1,
        "",
        "dpkg: package 'ghost' is not installed\n",
    );
    let ctx = Context::new();
    assert!(apt.verify(&ctx, "bash").unwrap());
    assert!(!apt.verify(&ctx, "changed").unwrap());
    assert!(
        apt.verify(&ctx, "ghost")
            .unwrap_err()
            .is(ErrorKind::PackageNotInstalled)
    );
}

#[test]
fn test_cancelled_context_aborts() {
    let (exec, apt) = manager();
    let ctx = Context::new();
    ctx.cancel();
    let err = apt
        .install(&ctx, &InstallOptions::default(), &names(&["curl"]))
        .unwrap_err();
    assert!(matches!(
        err,
        crate::error::DistroPkgError::Execution(crate::error::ExecutionError::Cancelled)
    ));
    assert_eq!(exec.count(), 0);
}
