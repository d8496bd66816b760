//! docker-installer CLI

use clap::{Args, Parser, Subcommand};
use docker_installer::config::{
    default_data_root, default_install_dir, DEFAULT_PARENT_URL, DEFAULT_SERVICE_NAME,
};
use docker_installer::{FetchOutcome, InstallConfig, Installer, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "docker-installer")]
#[command(about = "Install the Docker engine as a Windows service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: InstallOptions,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch binaries, register and start the service (default)
    Install,
    /// Only wait for an installed daemon to answer
    Wait,
    /// Print the daemon.json that would be written
    Config,
}

#[derive(Args)]
struct InstallOptions {
    /// Location of docker.exe and dockerd.exe (URL or directory, with trailing separator)
    #[arg(long, global = true, env = "DOCKER_PARENT_URL", default_value = DEFAULT_PARENT_URL)]
    parent_url: String,
    /// Directory the binaries are placed in (default: %SystemRoot%\System32)
    #[arg(long, global = true)]
    install_dir: Option<PathBuf>,
    /// Docker data root (default: %ProgramData%\docker)
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,
    /// Windows service name
    #[arg(long, global = true, default_value = DEFAULT_SERVICE_NAME)]
    service_name: String,
    /// Extra daemon listen address, added to npipe:// (repeatable)
    #[arg(long = "host", global = true)]
    hosts: Vec<String>,
    /// Seconds to wait for the daemon to answer
    #[arg(long, global = true, default_value = "60")]
    timeout_secs: u64,
    /// Milliseconds between readiness probes
    #[arg(long, global = true, default_value = "1000")]
    poll_interval_ms: u64,
}

impl InstallOptions {
    fn into_config(self) -> Result<InstallConfig> {
        let builder = InstallConfig::builder()
            .parent_url(self.parent_url)
            .install_dir(self.install_dir.unwrap_or_else(default_install_dir))
            .data_root(self.data_root.unwrap_or_else(default_data_root))
            .service_name(self.service_name)
            .readiness_timeout(Duration::from_secs(self.timeout_secs))
            .poll_interval(Duration::from_millis(self.poll_interval_ms));

        self.hosts
            .into_iter()
            .fold(builder, |builder, host| builder.add_host(host))
            .build_validated()
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docker_installer=info".parse().expect("static directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = cli.options.into_config().and_then(|config| match cli.command {
        Some(Commands::Install) | None => cmd_install(config),
        Some(Commands::Wait) => cmd_wait(config),
        Some(Commands::Config) => cmd_config(&config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_install(config: InstallConfig) -> Result<()> {
    let installer = Installer::new(config)?;
    let config = installer.config();

    let elevated = installer.check_privileges()?;

    println!("Fetching {} and {}...", config.cli_source(), config.daemon_source());
    let artifacts = installer.fetch_artifacts(&elevated)?;
    println!("  {}: {}", config.cli_path().display(), describe(artifacts.cli));
    println!("  {}: {}", config.daemon_path().display(), describe(artifacts.daemon));

    println!("Registering service '{}'...", config.service_name);
    installer.install_service(&elevated)?;
    println!("  Config: {}", config.daemon_config_path().display());

    println!(
        "Waiting for Docker daemon (up to {}s)...",
        config.readiness_timeout.as_secs()
    );
    let readiness = installer.wait_until_ready()?;
    println!(
        "  Ready after {} attempt(s), {:.1}s",
        readiness.attempts,
        readiness.elapsed.as_secs_f64()
    );

    println!("\nImages:");
    print!("{}", installer.report_images()?);
    println!("\nDocker is installed.");

    Ok(())
}

fn cmd_wait(config: InstallConfig) -> Result<()> {
    let installer = Installer::new(config)?;
    println!(
        "Waiting for Docker daemon (up to {}s)...",
        installer.config().readiness_timeout.as_secs()
    );
    let readiness = installer.wait_until_ready()?;
    println!("Ready after {} attempt(s).", readiness.attempts);
    Ok(())
}

fn cmd_config(config: &InstallConfig) -> Result<()> {
    println!("# {}", config.daemon_config_path().display());
    println!("{}", config.daemon_config().to_json()?);
    Ok(())
}

fn describe(outcome: FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Unchanged => "already in place".to_string(),
        FetchOutcome::Copied { bytes } => format!("copied {} bytes", bytes),
        FetchOutcome::Downloaded { bytes } => format!("downloaded {} bytes", bytes),
    }
}
