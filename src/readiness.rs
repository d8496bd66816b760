//! Readiness polling
//!
//! Polls silently on a fixed interval and fails loudly once when the time
//! budget runs out.

use crate::{Error, Result};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Waiting,
    Ready,
    TimedOut,
}

impl std::fmt::Display for ReadinessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadinessState::Waiting => write!(f, "Waiting"),
            ReadinessState::Ready => write!(f, "Ready"),
            ReadinessState::TimedOut => write!(f, "TimedOut"),
        }
    }
}

/// Summary of a successful wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub attempts: u32,
    pub elapsed: Duration,
}

/// One-shot poller
///
/// Starts in `Waiting`; the first transition to `Ready` or `TimedOut` is
/// final and later steps never call the probe again.
#[derive(Debug)]
pub struct Poller {
    timeout: Duration,
    interval: Duration,
    state: ReadinessState,
    attempts: u32,
    started: Option<Instant>,
    elapsed: Duration,
}

impl Poller {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            state: ReadinessState::Waiting,
            attempts: 0,
            started: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn state(&self) -> ReadinessState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Make one attempt and return the resulting state.
    ///
    /// `Ok(false)` and errors leave the poller `Waiting` after sleeping one
    /// interval, unless the budget is spent. A probe program that does not
    /// exist can never become ready and is returned as an error.
    pub fn step<F>(&mut self, probe: &mut F) -> Result<ReadinessState>
    where
        F: FnMut() -> Result<bool>,
    {
        if self.state != ReadinessState::Waiting {
            return Ok(self.state);
        }
        let started = *self.started.get_or_insert_with(Instant::now);
        self.attempts += 1;

        match probe() {
            Ok(true) => {
                self.elapsed = started.elapsed();
                self.state = ReadinessState::Ready;
                tracing::info!(
                    attempts = self.attempts,
                    elapsed_ms = self.elapsed.as_millis() as u64,
                    "Daemon ready"
                );
                return Ok(self.state);
            }
            Ok(false) => {
                tracing::debug!(attempt = self.attempts, "Daemon not ready yet");
            }
            Err(e) if e.is_missing_program() => return Err(e),
            Err(e) => {
                tracing::debug!(attempt = self.attempts, error = %e, "Readiness probe failed");
            }
        }

        self.elapsed = started.elapsed();
        if self.elapsed >= self.timeout {
            self.state = ReadinessState::TimedOut;
            return Ok(self.state);
        }

        std::thread::sleep(self.interval);
        Ok(self.state)
    }

    /// Step until the daemon is ready or the timeout elapses
    pub fn run<F>(mut self, mut probe: F) -> Result<Readiness>
    where
        F: FnMut() -> Result<bool>,
    {
        loop {
            match self.step(&mut probe)? {
                ReadinessState::Waiting => continue,
                ReadinessState::Ready => {
                    return Ok(Readiness {
                        attempts: self.attempts,
                        elapsed: self.elapsed,
                    })
                }
                ReadinessState::TimedOut => {
                    return Err(Error::ReadinessTimeout {
                        waited: self.elapsed,
                        attempts: self.attempts,
                    })
                }
            }
        }
    }
}

/// Convenience wrapper around [`Poller`]
pub fn wait_for_ready<F>(timeout: Duration, interval: Duration, probe: F) -> Result<Readiness>
where
    F: FnMut() -> Result<bool>,
{
    Poller::new(timeout, interval).run(probe)
}
