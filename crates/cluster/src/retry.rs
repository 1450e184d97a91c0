// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A small constant-delay retry helper for the poll-until-ready loops used
//! when dialing a freshly-created pod.

use std::future::Future;
use std::time::Duration;

/// Run `attempt` up to `max_attempts` times, sleeping `delay` between
/// attempts, returning the last `Ok`/`Err` once either an attempt succeeds
/// or attempts are exhausted.
pub async fn retry<T, E, F, Fut>(max_attempts: usize, delay: Duration, mut attempt: F) -> Result<T, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut result = attempt(0).await;
    for i in 1..max_attempts {
        if result.is_ok() {
            break;
        }
        tokio::time::sleep(delay).await;
        result = attempt(i).await;
    }
    result
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
