//! Timeout helpers for external calls
//!
//! The parser process and the remote renderer are the only places that can
//! block on something outside this process. Both are bounded.
//!
//! ```ignore
//! use gherkify::timeout::with_timeout;
//!
//! let output = with_timeout(
//!     Duration::from_secs(30),
//!     async { run_parser().await },
//!     "gherkin parser",
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::types::{GherkifyError, Result};

/// Execute an async operation with a timeout
///
/// Returns [`GherkifyError::Timeout`] if the operation does not complete
/// within `timeout`.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(GherkifyError::timeout(operation_name, timeout)),
    }
}
