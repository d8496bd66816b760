//! End-to-end installer runs against mocked host boundaries

use docker_installer::host::{CommandOutput, CommandRunner, PrivilegeCheck};
use docker_installer::{ArtifactFetcher, Error, FetchOutcome, InstallConfig, Installer};
use mockall::{mock, Sequence};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

mock! {
    Privilege {}
    impl PrivilegeCheck for Privilege {
        fn is_elevated(&self) -> docker_installer::Result<bool>;
    }
}

mock! {
    Fetcher {}
    impl ArtifactFetcher for Fetcher {
        fn fetch(&self, source: &str, destination: &Path) -> docker_installer::Result<FetchOutcome>;
    }
}

mock! {
    Runner {}
    impl CommandRunner for Runner {
        fn run(&self, program: &Path, args: &[String]) -> docker_installer::Result<CommandOutput>;
    }
}

fn exit(code: i32, stdout: &str) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

fn elevated(yes: bool) -> MockPrivilege {
    let mut privilege = MockPrivilege::new();
    privilege.expect_is_elevated().times(1).returning(move || Ok(yes));
    privilege
}

fn test_config(temp: &TempDir) -> InstallConfig {
    InstallConfig::builder()
        .parent_url("https://example.test/")
        .install_dir(temp.path().join("System32"))
        .data_root(temp.path().join("docker"))
        .readiness_timeout(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(20))
        .build()
}

/// Fetcher that writes a placeholder binary for each expected URL
fn example_fetcher(install_dir: PathBuf) -> MockFetcher {
    let mut fetcher = MockFetcher::new();
    let mut seq = Sequence::new();
    for name in ["docker.exe", "dockerd.exe"] {
        let url = format!("https://example.test/{}", name);
        let dest = install_dir.join(name);
        fetcher
            .expect_fetch()
            .withf(move |source, destination| source == url && destination == dest)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, destination| {
                std::fs::write(destination, b"MZ")?;
                Ok(FetchOutcome::Downloaded { bytes: 2 })
            });
    }
    fetcher
}

#[test]
fn test_example_install_end_to_end() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);
    std::fs::create_dir_all(&config.install_dir).unwrap();

    let cli = config.cli_path();
    let daemon = config.daemon_path();
    let version_calls = Arc::new(AtomicU32::new(0));
    let counter = version_calls.clone();

    let mut seq = Sequence::new();
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(move |program, args| {
            program == daemon && args == ["--register-service", "--service-name", "docker"]
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(exit(0, "")));
    runner
        .expect_run()
        .withf(|program, args| {
            program == Path::new("powershell")
                && args.last().map(String::as_str) == Some("Start-Service -Name 'docker'")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(exit(0, "")));
    let version_cli = cli.clone();
    runner
        .expect_run()
        .withf(move |program, args| program == version_cli && args == ["version"])
        .times(3)
        .in_sequence(&mut seq)
        .returning(move |_, _| {
            // Daemon answers on the third probe
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(exit(if n == 3 { 0 } else { 1 }, ""))
        });
    runner
        .expect_run()
        .withf(move |program, args| program == cli && args == ["images"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(exit(0, "REPOSITORY   TAG   IMAGE ID   CREATED   SIZE\n")));

    let installer = Installer::new(config.clone())
        .unwrap()
        .with_privilege_check(elevated(true))
        .with_fetcher(example_fetcher(config.install_dir.clone()))
        .with_runner(runner);

    let report = installer.run().unwrap();

    assert_eq!(version_calls.load(Ordering::SeqCst), 3);
    assert_eq!(report.readiness.attempts, 3);
    assert_eq!(report.artifacts.cli, FetchOutcome::Downloaded { bytes: 2 });
    assert!(report.images.starts_with("REPOSITORY"));
    assert_eq!(report.config_path, temp.path().join("docker").join("config").join("daemon.json"));
    assert_eq!(
        std::fs::read_to_string(&report.config_path).unwrap(),
        r#"{"hosts":["npipe://"]}"#
    );
}

#[test]
fn test_non_admin_touches_nothing() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);

    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().never();
    let mut runner = MockRunner::new();
    runner.expect_run().never();

    let installer = Installer::new(config.clone())
        .unwrap()
        .with_privilege_check(elevated(false))
        .with_fetcher(fetcher)
        .with_runner(runner);

    let err = installer.run().unwrap_err();

    assert!(matches!(err, Error::InsufficientPrivileges));
    assert!(!config.daemon_config_path().exists());
    assert!(!config.data_root.exists());
}

#[test]
fn test_registration_failure_aborts() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);
    std::fs::create_dir_all(&config.install_dir).unwrap();

    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|_, args| args.first().map(String::as_str) == Some("--register-service"))
        .times(1)
        .returning(|_, _| {
            Ok(CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "Access is denied.".to_string(),
            })
        });

    let installer = Installer::new(config.clone())
        .unwrap()
        .with_privilege_check(elevated(true))
        .with_fetcher(example_fetcher(config.install_dir.clone()))
        .with_runner(runner);

    let err = installer.run().unwrap_err();

    match err {
        Error::ServiceRegistration(msg) => assert!(msg.contains("Access is denied.")),
        other => panic!("unexpected error: {other}"),
    }
    // No cleanup: config stays behind
    assert!(config.daemon_config_path().exists());
}

#[test]
fn test_readiness_timeout() {
    let temp = TempDir::new().unwrap();
    let timeout = Duration::from_millis(300);
    let interval = Duration::from_millis(50);
    let config = InstallConfig::builder()
        .install_dir(temp.path())
        .readiness_timeout(timeout)
        .poll_interval(interval)
        .build();

    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|_, args| args == ["version"])
        .returning(|_, _| Ok(exit(1, "")));
    runner.expect_run().withf(|_, args| args == ["images"]).never();

    let installer = Installer::new(config).unwrap().with_runner(runner);

    let start = Instant::now();
    let err = installer.wait_until_ready().unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, Error::ReadinessTimeout { .. }));
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout + interval + Duration::from_millis(500));
}
