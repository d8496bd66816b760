//! Wrappers for the Docker CLI and daemon binaries

use crate::host::CommandRunner;
use crate::{Error, Result};
use std::path::PathBuf;

/// `docker.exe`
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
}

impl DockerCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Handshake with the daemon; `Ok(true)` when `docker version` exits 0
    pub fn version(&self, runner: &dyn CommandRunner) -> Result<bool> {
        let output = runner.run(&self.binary, &["version".to_string()])?;
        Ok(output.success())
    }

    /// Output of `docker images`
    pub fn images(&self, runner: &dyn CommandRunner) -> Result<String> {
        let output = runner.run(&self.binary, &["images".to_string()])?;
        if !output.success() {
            return Err(Error::Command(format!(
                "{} images: {}",
                self.binary.display(),
                output.describe()
            )));
        }
        Ok(output.stdout)
    }
}

/// `dockerd.exe`
#[derive(Debug, Clone)]
pub struct Dockerd {
    binary: PathBuf,
}

impl Dockerd {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn register_args(service_name: &str) -> Vec<String> {
        vec![
            "--register-service".to_string(),
            "--service-name".to_string(),
            service_name.to_string(),
        ]
    }

    /// Register the daemon with the Windows service manager
    pub fn register_service(&self, runner: &dyn CommandRunner, service_name: &str) -> Result<()> {
        let output = runner
            .run(&self.binary, &Self::register_args(service_name))
            .map_err(|e| Error::ServiceRegistration(e.to_string()))?;

        if !output.success() {
            return Err(Error::ServiceRegistration(format!(
                "{} --register-service: {}",
                self.binary.display(),
                output.describe()
            )));
        }
        Ok(())
    }
}
