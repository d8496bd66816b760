//! Daemon configuration and Windows service setup

use crate::config::{DaemonConfig, InstallConfig};
use crate::docker::Dockerd;
use crate::host::commands::{escape_ps, powershell_args, POWERSHELL};
use crate::host::{CommandRunner, Elevated};
use crate::{Error, Result};
use std::path::Path;

/// Write `daemon.json`, creating its directory if needed
pub fn write_daemon_config(path: &Path, config: &DaemonConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, config.to_json()?)?;
    tracing::info!(path = %path.display(), hosts = ?config.hosts, "Wrote daemon configuration");
    Ok(())
}

/// Start a registered service through the service manager
pub fn start_service(runner: &dyn CommandRunner, service_name: &str) -> Result<()> {
    let script = format!("Start-Service -Name '{}'", escape_ps(service_name));
    let output = runner
        .run(Path::new(POWERSHELL), &powershell_args(&script))
        .map_err(|e| Error::ServiceRegistration(e.to_string()))?;

    if !output.success() {
        return Err(Error::ServiceRegistration(format!(
            "Start-Service {}: {}",
            service_name,
            output.describe()
        )));
    }
    tracing::info!(service = %service_name, "Service started");
    Ok(())
}

/// Write the config, register the daemon and start it
pub fn install_service(
    _elevated: &Elevated,
    runner: &dyn CommandRunner,
    config: &InstallConfig,
) -> Result<()> {
    write_daemon_config(&config.daemon_config_path(), &config.daemon_config())?;

    Dockerd::new(config.daemon_path()).register_service(runner, &config.service_name)?;
    tracing::info!(service = %config.service_name, "Service registered");

    start_service(runner, &config.service_name)
}
