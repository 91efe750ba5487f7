//! Timeout enforcement for upstream calls.
//!
//! A call that misses its deadline is dropped (cancelling it) and reported as
//! [`FailureKind::Timeout`], which the health tracker treats like any failure.

use std::future::Future;
use std::time::Duration;

use crate::health::FailureKind;

/// Run `call`, failing with [`FailureKind::Timeout`] once `deadline` passes.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, FailureKind>
where
    F: Future<Output = Result<T, FailureKind>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(FailureKind::Timeout),
    }
}
