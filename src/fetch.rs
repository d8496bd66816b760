//! Artifact retrieval from a local path or a URL

use crate::{Error, Result};
use reqwest::blocking::Client;
use reqwest::tls::Version;
use reqwest::Url;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// What a fetch actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Source and destination are the same file
    Unchanged,
    Copied { bytes: u64 },
    Downloaded { bytes: u64 },
}

#[cfg_attr(test, mockall::automock)]
pub trait ArtifactFetcher {
    /// Produce a byte-identical copy of `source` at `destination`
    fn fetch(&self, source: &str, destination: &Path) -> Result<FetchOutcome>;
}

/// Copies local files and downloads `http`/`https` URLs
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        // SSL 3.0 and TLS 1.0 are never negotiated. No overall timeout:
        // the daemon binary is large and a slow link is still a good link.
        let client = Client::builder()
            .min_tls_version(Version::TLS_1_1)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None::<Duration>)
            .user_agent(concat!("docker-installer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn download(&self, url: Url, destination: &Path) -> Result<u64> {
        tracing::info!(%url, destination = %destination.display(), "Downloading");

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::transfer(url.as_str(), e))?;

        let mut file = File::create(destination).map_err(|e| Error::transfer(url.as_str(), e))?;
        let bytes = response
            .copy_to(&mut file)
            .map_err(|e| Error::transfer(url.as_str(), e))?;
        file.sync_all().map_err(|e| Error::transfer(url.as_str(), e))?;

        Ok(bytes)
    }
}

impl ArtifactFetcher for HttpFetcher {
    fn fetch(&self, source: &str, destination: &Path) -> Result<FetchOutcome> {
        if Path::new(source) == destination {
            tracing::debug!(path = %destination.display(), "Source is destination");
            return Ok(FetchOutcome::Unchanged);
        }

        match resolve(source)? {
            Source::Local(path) => copy_local(&path, destination),
            Source::Remote(url) => {
                let bytes = self.download(url, destination)?;
                Ok(FetchOutcome::Downloaded { bytes })
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Source {
    Local(PathBuf),
    Remote(Url),
}

/// Classify a locator: existing local path first, then absolute URL
fn resolve(source: &str) -> Result<Source> {
    let path = Path::new(source);
    if !source.is_empty() && path.exists() {
        return Ok(Source::Local(path.to_path_buf()));
    }

    let url = Url::parse(source).map_err(|_| Error::InvalidSource(source.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(Source::Remote(url)),
        "file" => url
            .to_file_path()
            .ok()
            .filter(|p| p.exists())
            .map(Source::Local)
            .ok_or_else(|| Error::InvalidSource(source.to_string())),
        _ => Err(Error::InvalidSource(source.to_string())),
    }
}

fn copy_local(source: &Path, destination: &Path) -> Result<FetchOutcome> {
    if same_file(source, destination) {
        tracing::debug!(path = %source.display(), "Source is destination, nothing to copy");
        return Ok(FetchOutcome::Unchanged);
    }

    tracing::info!(source = %source.display(), destination = %destination.display(), "Copying");
    let bytes = std::fs::copy(source, destination)?;
    Ok(FetchOutcome::Copied { bytes })
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
