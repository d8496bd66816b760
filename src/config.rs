//! Installer configuration with builder pattern

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Nightly Windows builds of the Docker engine
pub const DEFAULT_PARENT_URL: &str = "https://master.dockerproject.org/windows/x86_64/";

pub const DEFAULT_SERVICE_NAME: &str = "docker";

/// Local named-pipe endpoint the daemon listens on
pub const DEFAULT_HOST: &str = "npipe://";

pub const CLI_BINARY: &str = "docker.exe";
pub const DAEMON_BINARY: &str = "dockerd.exe";

/// Contents of `daemon.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    pub hosts: Vec<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            hosts: vec![DEFAULT_HOST.to_string()],
        }
    }
}

impl DaemonConfig {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub parent_url: String,
    pub install_dir: PathBuf,
    pub data_root: PathBuf,
    pub service_name: String,
    pub hosts: Vec<String>,
    pub readiness_timeout: Duration,
    pub poll_interval: Duration,
    pub cli_binary: String,
    pub daemon_binary: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            parent_url: DEFAULT_PARENT_URL.to_string(),
            install_dir: default_install_dir(),
            data_root: default_data_root(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            hosts: vec![DEFAULT_HOST.to_string()],
            readiness_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            cli_binary: CLI_BINARY.to_string(),
            daemon_binary: DAEMON_BINARY.to_string(),
        }
    }
}

/// `%SystemRoot%\System32`
pub fn default_install_dir() -> PathBuf {
    std::env::var_os("SystemRoot")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Windows"))
        .join("System32")
}

/// `%ProgramData%\docker`
pub fn default_data_root() -> PathBuf {
    std::env::var_os("ProgramData")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\ProgramData"))
        .join("docker")
}

impl InstallConfig {
    pub fn builder() -> InstallConfigBuilder {
        InstallConfigBuilder::default()
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.parent_url.is_empty() {
            return Err(crate::Error::Config("parent_url cannot be empty".into()));
        }
        if self.service_name.trim().is_empty() {
            return Err(crate::Error::Config("service_name cannot be empty".into()));
        }
        if self.hosts.is_empty() {
            return Err(crate::Error::Config("at least one host is required".into()));
        }
        if self.hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(crate::Error::Config("host entries cannot be empty".into()));
        }
        if self.readiness_timeout.is_zero() {
            return Err(crate::Error::Config("readiness_timeout must be positive".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(crate::Error::Config("poll_interval must be positive".into()));
        }
        Ok(())
    }

    /// Locator of the CLI binary: `<parent_url>docker.exe`
    pub fn cli_source(&self) -> String {
        format!("{}{}", self.parent_url, self.cli_binary)
    }

    /// Locator of the daemon binary: `<parent_url>dockerd.exe`
    pub fn daemon_source(&self) -> String {
        format!("{}{}", self.parent_url, self.daemon_binary)
    }

    pub fn cli_path(&self) -> PathBuf {
        self.install_dir.join(&self.cli_binary)
    }

    pub fn daemon_path(&self) -> PathBuf {
        self.install_dir.join(&self.daemon_binary)
    }

    pub fn daemon_config_path(&self) -> PathBuf {
        self.data_root.join("config").join("daemon.json")
    }

    pub fn daemon_config(&self) -> DaemonConfig {
        DaemonConfig {
            hosts: self.hosts.clone(),
        }
    }
}

#[derive(Default)]
pub struct InstallConfigBuilder {
    config: InstallConfig,
}

impl InstallConfigBuilder {
    pub fn parent_url(mut self, url: impl Into<String>) -> Self {
        self.config.parent_url = url.into();
        self
    }

    pub fn install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.install_dir = dir.into();
        self
    }

    pub fn data_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_root = dir.into();
        self
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.config.service_name = name.into();
        self
    }

    /// Replace the daemon listen addresses
    pub fn hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Listen on `host` in addition to the current addresses
    pub fn add_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        if !self.config.hosts.contains(&host) {
            self.config.hosts.push(host);
        }
        self
    }

    pub fn readiness_timeout(mut self, timeout: Duration) -> Self {
        self.config.readiness_timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn build(self) -> InstallConfig {
        self.config
    }

    pub fn build_validated(self) -> crate::Result<InstallConfig> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
