//! # Fault-Isolated Calls
//!
//! Every contract read in a snapshot goes through [`try_call`], which collapses
//! any failure (revert, ABI mismatch, transport error) into
//! [`CallOutcome::Reverted`]. Callers branch on the outcome before using a
//! value; each field picks its own default.

use ethers::types::Address;
use log::{debug, error};
use std::fmt::Display;
use std::future::Future;

use crate::metrics;

/// Result of a single read-only contract call.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    Success(T),
    Reverted,
}

impl<T> CallOutcome<T> {
    pub fn is_reverted(&self) -> bool {
        matches!(self, CallOutcome::Reverted)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CallOutcome<U> {
        match self {
            CallOutcome::Success(value) => CallOutcome::Success(f(value)),
            CallOutcome::Reverted => CallOutcome::Reverted,
        }
    }

    /// Explicit conversion for fields whose default is "absent".
    pub fn ok(self) -> Option<T> {
        match self {
            CallOutcome::Success(value) => Some(value),
            CallOutcome::Reverted => None,
        }
    }

    /// Emit the revert diagnostic (contract + call) and pass the outcome through.
    pub fn on_revert(self, target: Address, call: &'static str) -> Self {
        if self.is_reverted() {
            error!("{:?} call {} reverted", target, call);
            metrics::increment_call_reverted(call);
        }
        self
    }
}

impl<T> From<Option<T>> for CallOutcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => CallOutcome::Success(v),
            None => CallOutcome::Reverted,
        }
    }
}

/// Await a contract read and fold its error into `Reverted`. Never fails.
pub async fn try_call<T, E, F>(call: F) -> CallOutcome<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match call.await {
        Ok(value) => CallOutcome::Success(value),
        Err(e) => {
            debug!("contract read failed: {}", e);
            CallOutcome::Reverted
        }
    }
}
