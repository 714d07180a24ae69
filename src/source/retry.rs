use super::{FetchError, ProfileSource};
use crate::{sounding::Sounding, station::Station};
use chrono::NaiveDateTime;
use std::{
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

/// How hard to try a source that reports transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the first retry, doubled after each retry.
    pub initial_backoff: Duration,
    /// Upper bound on the delay between attempts.
    pub max_backoff: Duration,
    /// Total time allowed for one station.
    pub budget: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            budget: Duration::from_secs(60),
        }
    }
}

/// Wraps a source, retrying transient failures with exponential backoff.
///
/// `NotAvailable` and `Corrupt` are returned right away. When the attempts or the time budget run
/// out the last transient error is returned.
#[derive(Debug, Clone)]
pub struct RetryingSource<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: ProfileSource> RetryingSource<S> {
    /// Wrap `inner` with a retry policy.
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        RetryingSource { inner, policy }
    }

    /// The wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ProfileSource> ProfileSource for RetryingSource<S> {
    fn fetch(&self, time: NaiveDateTime, station: &Station) -> Result<Sounding, FetchError> {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut backoff = self.policy.initial_backoff;
        let mut attempt = 1;

        loop {
            let err = match self.inner.fetch(time, station) {
                Ok(snd) => return Ok(snd),
                Err(err) if err.is_transient() => err,
                Err(err) => return Err(err),
            };

            if attempt >= max_attempts {
                debug!(station = %station.code, attempt, "out of attempts");
                return Err(err);
            }

            if start.elapsed() + backoff > self.policy.budget {
                debug!(station = %station.code, attempt, "out of time");
                return Err(err);
            }

            warn!(
                station = %station.code,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "source busy, retrying"
            );

            thread::sleep(backoff);
            backoff = (backoff * 2).min(self.policy.max_backoff);
            attempt += 1;
        }
    }
}
