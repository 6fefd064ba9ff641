// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Retry logic with exponential backoff for reconcile attempts.
//!
//! Retryable reconcile errors (API conflicts, missing dependencies, transient RPC
//! failures) are retried in place with exponential backoff. Non-retryable errors fail
//! fast: the resource is left alone until a new event passes its controller's event
//! filter, e.g. a spec change or a finalizer edit.

use crate::constants::{
    RETRY_BACKOFF_MULTIPLIER, RETRY_INITIAL_INTERVAL_MILLIS, RETRY_MAX_ELAPSED_TIME_SECS,
    RETRY_MAX_INTERVAL_SECS, RETRY_RANDOMIZATION_FACTOR,
};
use crate::errors::ReconcileError;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Simple exponential backoff with randomization (jitter) to prevent thundering herd.
pub struct ExponentialBackoff {
    /// Current interval duration
    current_interval: Duration,
    /// Maximum interval duration
    max_interval: Duration,
    /// Maximum total elapsed time
    max_elapsed_time: Option<Duration>,
    /// Backoff multiplier (typically 2.0 for doubling)
    multiplier: f64,
    /// Randomization factor (e.g., 0.1 for ±10%)
    randomization_factor: f64,
    /// Start time for tracking total elapsed time
    start_time: Instant,
}

impl ExponentialBackoff {
    fn new(
        initial_interval: Duration,
        max_interval: Duration,
        max_elapsed_time: Option<Duration>,
        multiplier: f64,
        randomization_factor: f64,
    ) -> Self {
        Self {
            current_interval: initial_interval,
            max_interval,
            max_elapsed_time,
            multiplier,
            randomization_factor,
            start_time: Instant::now(),
        }
    }

    /// Get the next backoff interval, or None if max elapsed time is exceeded.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if let Some(max_elapsed) = self.max_elapsed_time {
            if self.start_time.elapsed() >= max_elapsed {
                return None;
            }
        }

        let interval = self.current_interval;
        let jittered = self.apply_jitter(interval);

        let next = interval.as_secs_f64() * self.multiplier;
        self.current_interval = Duration::from_secs_f64(next).min(self.max_interval);

        Some(jittered)
    }

    fn apply_jitter(&self, interval: Duration) -> Duration {
        if self.randomization_factor == 0.0 {
            return interval;
        }

        let secs = interval.as_secs_f64();
        let delta = secs * self.randomization_factor;
        let min = secs - delta;
        let max = secs + delta;

        let mut rng = rand::thread_rng();
        let jittered = rng.gen_range(min..=max);

        Duration::from_secs_f64(jittered.max(0.0))
    }
}

/// Create the default exponential backoff configuration for reconcile retries.
///
/// # Retry Schedule
///
/// With these settings, retries occur at approximately:
///
/// 1. 100ms
/// 2. 200ms
/// 3. 400ms
/// 4. 800ms
/// 5. 1.6s
/// 6. 3.2s
/// 7. 6.4s
/// 8. 12.8s
/// 9. 25.6s
/// 10. 30s (capped at max interval)
///     11-30. 30s intervals until 5 minutes elapsed
#[must_use]
pub fn default_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_millis(RETRY_INITIAL_INTERVAL_MILLIS),
        Duration::from_secs(RETRY_MAX_INTERVAL_SECS),
        Some(Duration::from_secs(RETRY_MAX_ELAPSED_TIME_SECS)),
        RETRY_BACKOFF_MULTIPLIER,
        RETRY_RANDOMIZATION_FACTOR,
    )
}

/// Run a reconcile attempt, retrying retryable errors with exponential backoff.
///
/// Fails immediately on non-retryable errors. Gives up once the backoff budget is
/// exhausted; the next watch event for the resource starts a fresh budget.
///
/// # Errors
///
/// Returns the last error if:
/// - A non-retryable error is encountered
/// - Max elapsed retry time is exceeded (5 minutes)
pub async fn retry_reconcile<F, Fut>(
    mut operation: F,
    operation_name: &str,
) -> Result<(), ReconcileError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<(), ReconcileError>>,
{
    let mut backoff = default_backoff();
    let start_time = Instant::now();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(()) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt,
                        elapsed = ?start_time.elapsed(),
                        "reconcile succeeded after retries"
                    );
                } else {
                    debug!(operation = operation_name, "reconcile succeeded");
                }
                return Ok(());
            }
            Err(err) if !err.is_retryable() => {
                error!(
                    operation = operation_name,
                    error = format!("{err:#}"),
                    "non-retryable reconcile error, failing immediately"
                );
                return Err(err);
            }
            Err(err) => {
                if let Some(duration) = backoff.next_backoff() {
                    warn!(
                        operation = operation_name,
                        attempt,
                        retry_after = ?duration,
                        error = format!("{err:#}"),
                        "retryable reconcile error, will retry"
                    );
                    tokio::time::sleep(duration).await;
                } else {
                    error!(
                        operation = operation_name,
                        attempt,
                        elapsed = ?start_time.elapsed(),
                        error = format!("{err:#}"),
                        "backoff exhausted, giving up until the next event"
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
