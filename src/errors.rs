// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Reconcile error taxonomy.
//!
//! Two error flavors flow through the reconcilers:
//!
//! - **Retryable** - transient conditions (API conflicts, missing dependencies that may
//!   appear later, most RPC failures). The caller retries with exponential backoff.
//! - **Non-retryable** - terminal conditions (validation failures, unrecoverable
//!   degradations, unsupported protocols). The caller surfaces the error to the user and
//!   does not retry until a new event arrives, e.g. a spec change or finalizer edit.
//!
//! The flavor is a tagged variant so that "is this retryable?" remains answerable no
//! matter how deep the causal chain under it is wrapped with `anyhow` context.

use thiserror::Error;

/// Error returned by a reconcile attempt, tagged with retry behavior.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A transient error. The reconcile should be retried with exponential backoff.
    #[error(transparent)]
    Retryable(#[from] anyhow::Error),

    /// A terminal error. The reconcile must not be retried until a new event arrives.
    #[error(transparent)]
    NonRetryable(anyhow::Error),
}

impl ReconcileError {
    /// Wrap a cause as a retryable error.
    pub fn retryable(err: impl Into<anyhow::Error>) -> Self {
        ReconcileError::Retryable(err.into())
    }

    /// Wrap a cause as a non-retryable (terminal) error.
    pub fn non_retryable(err: impl Into<anyhow::Error>) -> Self {
        ReconcileError::NonRetryable(err.into())
    }

    /// True if the error should be retried with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReconcileError::Retryable(_))
    }

    /// Prefix the error message while preserving the retry flavor.
    ///
    /// Used by the BucketAccess reconciler to mark status errors as Controller-originated,
    /// since the status could otherwise be written by either agent.
    #[must_use]
    pub fn context(self, msg: &'static str) -> Self {
        match self {
            ReconcileError::Retryable(err) => ReconcileError::Retryable(err.context(msg)),
            ReconcileError::NonRetryable(err) => ReconcileError::NonRetryable(err.context(msg)),
        }
    }
}

impl From<kube::Error> for ReconcileError {
    /// API server errors are retryable by default: conflicts, timeouts, and transient
    /// server failures all resolve with backoff. Terminal conditions are tagged
    /// explicitly by the reconcilers.
    fn from(err: kube::Error) -> Self {
        ReconcileError::Retryable(err.into())
    }
}

/// Result type for reconcile operations.
pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
