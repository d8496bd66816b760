//! Orchestrates the installation steps
//!
//! Steps run strictly in order and the first failure aborts the run.
//! Nothing already done is rolled back.

use crate::config::InstallConfig;
use crate::docker::DockerCli;
use crate::fetch::{ArtifactFetcher, FetchOutcome, HttpFetcher};
use crate::host::{self, CommandRunner, Elevated, PrivilegeCheck, SystemRunner, TokenPrivilege};
use crate::readiness::{Poller, Readiness};
use crate::{service, Result};
use std::path::PathBuf;

/// Outcome of the artifact fetch step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Artifacts {
    pub cli: FetchOutcome,
    pub daemon: FetchOutcome,
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub artifacts: Artifacts,
    pub config_path: PathBuf,
    pub readiness: Readiness,
    pub images: String,
}

pub struct Installer {
    config: InstallConfig,
    privilege: Box<dyn PrivilegeCheck>,
    fetcher: Box<dyn ArtifactFetcher>,
    runner: Box<dyn CommandRunner>,
}

impl Installer {
    /// Create an installer wired to the real host
    pub fn new(config: InstallConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            privilege: Box::new(TokenPrivilege),
            fetcher: Box::new(HttpFetcher::new()?),
            runner: Box::new(SystemRunner),
        })
    }

    pub fn with_privilege_check(mut self, check: impl PrivilegeCheck + 'static) -> Self {
        self.privilege = Box::new(check);
        self
    }

    pub fn with_fetcher(mut self, fetcher: impl ArtifactFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    pub fn check_privileges(&self) -> Result<Elevated> {
        host::check_privileges(self.privilege.as_ref())
    }

    /// Place `docker.exe` and `dockerd.exe` into the install directory
    pub fn fetch_artifacts(&self, _elevated: &Elevated) -> Result<Artifacts> {
        let cli = self
            .fetcher
            .fetch(&self.config.cli_source(), &self.config.cli_path())?;
        let daemon = self
            .fetcher
            .fetch(&self.config.daemon_source(), &self.config.daemon_path())?;

        tracing::info!(
            ?cli,
            ?daemon,
            dir = %self.config.install_dir.display(),
            "Artifacts in place"
        );
        Ok(Artifacts { cli, daemon })
    }

    pub fn install_service(&self, elevated: &Elevated) -> Result<()> {
        service::install_service(elevated, self.runner.as_ref(), &self.config)
    }

    /// Poll `docker version` until the daemon answers or the budget runs out
    pub fn wait_until_ready(&self) -> Result<Readiness> {
        let cli = DockerCli::new(self.config.cli_path());
        let runner = self.runner.as_ref();

        Poller::new(self.config.readiness_timeout, self.config.poll_interval)
            .run(|| cli.version(runner))
    }

    pub fn report_images(&self) -> Result<String> {
        DockerCli::new(self.config.cli_path()).images(self.runner.as_ref())
    }

    /// Run every step in order
    pub fn run(&self) -> Result<InstallReport> {
        let elevated = self.check_privileges()?;
        let artifacts = self.fetch_artifacts(&elevated)?;
        self.install_service(&elevated)?;
        let readiness = self.wait_until_ready()?;
        let images = self.report_images()?;

        Ok(InstallReport {
            artifacts,
            config_path: self.config.daemon_config_path(),
            readiness,
            images,
        })
    }
}
