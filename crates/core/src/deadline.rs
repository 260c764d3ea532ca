//! Per-operation deadlines for storage calls.

use std::future::Future;
use std::time::Duration;

use crate::error::CoreError;

/// Deadline applied to every storage operation.
pub const STORAGE_OP_TIMEOUT: Duration = Duration::from_secs(3);

/// Run `fut`, failing with [`CoreError::Timeout`] once `limit` elapses.
///
/// On expiry the future is dropped, which cancels the underlying work. A
/// dropped `sqlx` transaction rolls back, so nothing partial is committed.
pub async fn with_deadline<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation,
                limit_ms = limit.as_millis() as u64,
                "Storage deadline exceeded"
            );
            Err(CoreError::Timeout { operation })
        }
    }
}
