//! Per-session state kept outside the process

use async_trait::async_trait;

use crate::error::AppResult;

/// Session-scoped counters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Count a visit for `session_id` and return how many visits the session
    /// had before this one.
    async fn record_visit(&self, session_id: &str) -> AppResult<i64>;
}
