//! Upstream failure classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What went wrong with an upstream call.
///
/// Billing and policy rejections are *hard* failures: the target is disabled
/// on a separate deadline rather than cooled down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Upstream throttled us (429).
    RateLimit,
    /// Upstream broke (5xx, connection errors).
    ServerError,
    /// No answer before the deadline, or the call was cancelled.
    Timeout,
    /// Quota or payment problem (402).
    Billing,
    /// Access refused by upstream policy (401, 403, 451).
    Policy,
}

impl FailureKind {
    /// Whether this failure disables the target instead of cooling it down.
    pub fn is_hard(self) -> bool {
        matches!(self, FailureKind::Billing | FailureKind::Policy)
    }

    /// Stable label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::RateLimit => "rate_limit",
            FailureKind::ServerError => "server_error",
            FailureKind::Timeout => "timeout",
            FailureKind::Billing => "billing",
            FailureKind::Policy => "policy",
        }
    }

    /// Map an upstream HTTP status to a failure, if it is one.
    ///
    /// Other 4xx codes are the client's fault and do not count against the target.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            402 => Some(FailureKind::Billing),
            401 | 403 | 451 => Some(FailureKind::Policy),
            408 | 504 => Some(FailureKind::Timeout),
            429 => Some(FailureKind::RateLimit),
            500..=599 => Some(FailureKind::ServerError),
            _ => None,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
