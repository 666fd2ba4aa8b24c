use super::truncate_sql_bytes;
use super::types::{BuildContext, BuildHook};
use tracing::Level;

/// A `tracing`-based hook that emits every built statement.
///
/// Events go to target `paramsql.sql` with the action, parameter count and SQL as fields.
/// With `include_params` the bind values are attached as a debug field too.
///
/// Enable via the crate feature: `paramsql = { features = ["tracing"] }` (on by default).
#[derive(Debug, Clone)]
pub struct TracingHook {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Attach bind values to the event.
    pub include_params: bool,
}

impl Default for TracingHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
            include_params: false,
        }
    }
}

impl TracingHook {
    /// Create a new hook with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Attach bind values to each event. Off by default since values may be sensitive.
    pub fn with_params(mut self) -> Self {
        self.include_params = true;
        self
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

impl BuildHook for TracingHook {
    fn on_build(&self, ctx: &BuildContext<'_>) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(&ctx.output.sql);
        let action = ctx.action.as_str();
        if self.include_params {
            emit_at_level!(
                self.level,
                target: "paramsql.sql",
                action,
                table = %ctx.input.table,
                param_count = ctx.param_count(),
                sql = %sql,
                params = ?ctx.output.params,
            );
        } else {
            emit_at_level!(
                self.level,
                target: "paramsql.sql",
                action,
                table = %ctx.input.table,
                param_count = ctx.param_count(),
                sql = %sql,
            );
        }
    }
}
