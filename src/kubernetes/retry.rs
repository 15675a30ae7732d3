// SPDX-License-Identifier: Apache-2.0

//! Bounded retry for optimistic-concurrency writes.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::constants::retry::CONFLICT_BACKOFF_MS;
use crate::error::{Result, RotatorError};

/// Run a fetch-modify-submit operation under a bounded conflict-retry loop.
///
/// The operation must re-fetch the object on every invocation so each
/// attempt submits against a freshly read version token. A 409 rejection
/// restarts the operation after a short backoff; any other error aborts
/// immediately. Once `max_attempts` conflicts have been burned the last
/// one is surfaced as [`RotatorError::ConflictExhausted`].
pub async fn with_conflict_retry<T, F, Fut>(max_attempts: usize, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_conflict() => {
                if attempt >= max_attempts {
                    return Err(RotatorError::ConflictExhausted {
                        attempts: attempt,
                        last: e.to_string(),
                    });
                }
                debug!(attempt, "Write conflict, retrying with fresh read");
                sleep(Duration::from_millis(CONFLICT_BACKOFF_MS * attempt as u64)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
