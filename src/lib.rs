//! Docker engine installer for Windows
//!
//! Downloads `docker.exe` and `dockerd.exe`, writes a default
//! `daemon.json`, registers the daemon as a Windows service, starts it and
//! waits until it answers `docker version`.
//!
//! # Example
//!
//! ```no_run
//! use docker_installer::{InstallConfig, Installer};
//!
//! let config = InstallConfig::builder()
//!     .parent_url("https://example.test/")
//!     .build_validated()?;
//!
//! let report = Installer::new(config)?.run()?;
//! println!("{}", report.images);
//! # Ok::<(), docker_installer::Error>(())
//! ```

pub mod config;
pub mod docker;
pub mod error;
pub mod fetch;
pub mod host;
pub mod installer;
pub mod readiness;
pub mod service;

pub use config::{DaemonConfig, InstallConfig};
pub use error::{Error, Result};
pub use fetch::{ArtifactFetcher, FetchOutcome, HttpFetcher};
pub use installer::{InstallReport, Installer};
pub use readiness::{Readiness, ReadinessState};
