//! Timestamp and wall-clock budget utilities

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert whole minutes to a duration
pub fn minutes(minutes: u64) -> Duration {
    Duration::from_secs(minutes * 60)
}

/// Run `fut` under a wall-clock budget.
///
/// Expiry is reported as [`Error::Timeout`]; the future is dropped, there is
/// no further cancellation.
pub async fn within_budget<F, T>(what: &str, budget: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(what, budget_secs = budget.as_secs(), "Wall-clock budget exceeded");
            Err(Error::Timeout {
                what: what.to_string(),
                budget,
            })
        }
    }
}
