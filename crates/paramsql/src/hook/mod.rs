//! Build hooks: an injected diagnostics sink for the statement builder.
//!
//! A [`QueryBuilder`](crate::QueryBuilder) can carry any number of hooks. After every
//! successful `build` each hook receives a [`BuildContext`] with the action, a snapshot of
//! the clause state and the compiled statement. Hooks observe only; a builder without
//! hooks behaves identically.
//!
//! # Example
//!
//! ```
//! use paramsql::QueryBuilder;
//! use paramsql::hook::{RecordingHook, StatsHook};
//! use std::sync::Arc;
//!
//! let stats = Arc::new(StatsHook::new());
//! let log = Arc::new(RecordingHook::new());
//!
//! let mut qb = QueryBuilder::table("users");
//! qb.with_hook(stats.clone()).with_hook(log.clone());
//! qb.and_where([("status", "active")]);
//! qb.build()?;
//!
//! assert_eq!(stats.stats().select_queries, 1);
//! assert_eq!(log.entries()[0].output.sql, "SELECT * FROM users WHERE status = ?");
//! # Ok::<(), paramsql::Error>(())
//! ```

mod hooks;
mod types;

#[cfg(feature = "tracing")]
mod tracing_hook;

#[cfg(test)]
mod tests;

pub use hooks::{BuildRecord, BuildStats, CompositeHook, NoopHook, RecordingHook, StatsHook};
pub use types::{BuildContext, BuildHook, ClauseSnapshot};

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingHook;

#[cfg(feature = "tracing")]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
