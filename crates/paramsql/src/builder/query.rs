use super::assemble::{Built, assemble};
use super::spec::{Action, Join, JoinType, QuerySpec, Select, SetField};
use crate::condition::{Condition, Joiner, compile};
use crate::error::Result;
use crate::hook::{BuildContext, BuildHook};
use crate::ident::safe_identifier;
use crate::raw::Raw;
use crate::value::Value;
use std::sync::Arc;

/// Fluent statement builder.
///
/// Holds the clause state for one table. Mutators return `&mut Self` so calls can be
/// chained; [`build`](Self::build) only reads the state, so a builder can be built any
/// number of times and reused after explicit `clear_*` calls.
///
/// ```
/// use paramsql::{Condition, QueryBuilder};
///
/// let mut qb = QueryBuilder::table_as("users", "u");
/// qb.select_cols(&["u.id", "u.name", "r.name AS role"])
///     .left_join("roles", "r", "u.role_id = r.id")
///     .and_where([
///         ("u.status", Condition::eq("active")),
///         ("u.age", Condition::op("BETWEEN", [18, 65])?),
///     ])
///     .order_by("u.created_at DESC")
///     .limit(20);
///
/// let built = qb.build()?;
/// assert_eq!(
///     built.sql,
///     "SELECT u.id, u.name, r.name AS role FROM users AS u \
///      LEFT JOIN roles AS r ON u.role_id = r.id \
///      WHERE u.status = ? AND u.age BETWEEN ? AND ? \
///      ORDER BY u.created_at DESC LIMIT 20"
/// );
/// assert_eq!(built.params.len(), 3);
/// # Ok::<(), paramsql::Error>(())
/// ```
#[derive(Clone)]
pub struct QueryBuilder {
    spec: QuerySpec,
    hooks: Vec<Arc<dyn BuildHook>>,
}

impl std::fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("spec", &self.spec)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl QueryBuilder {
    /// Create a builder for `table`.
    pub fn table(table: &str) -> Self {
        Self::table_as(table, "")
    }

    /// Create a builder for `table AS alias`. An empty alias means unaliased.
    pub fn table_as(table: &str, alias: &str) -> Self {
        Self {
            spec: QuerySpec::new(table, alias),
            hooks: Vec::new(),
        }
    }

    // ==================== Static helpers ====================

    /// Raw SQL expression, inlined without binding.
    ///
    /// # Safety
    ///
    /// Trusted input only. See [`Raw::new`].
    pub fn raw(sql: impl Into<String>) -> Raw {
        Raw::new(sql)
    }

    /// Raw SQL expression with `{name}` identifier slots validated before substitution.
    pub fn raw_safe<I, V>(template: &str, identifiers: &[(&str, &str)], bindings: I) -> Result<Raw>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Raw::with_identifiers(template, identifiers, bindings)
    }

    /// Validate a user-provided column/table name.
    pub fn safe_identifier(identifier: &str) -> Result<&str> {
        safe_identifier(identifier)
    }

    // ==================== Table / columns ====================

    /// Set (or replace) the table alias.
    pub fn alias(&mut self, alias: &str) -> &mut Self {
        self.spec.table_alias = alias.to_string();
        self
    }

    /// Set SELECT columns (string form, supports complex expressions). `"*"` resets to the wildcard.
    pub fn select(&mut self, cols: &str) -> &mut Self {
        self.spec.select = if cols.trim() == "*" || cols.is_empty() {
            Select::All
        } else {
            Select::Columns(vec![cols.to_string()])
        };
        self
    }

    /// Set SELECT columns (array form, good for constants).
    pub fn select_cols(&mut self, cols: &[&str]) -> &mut Self {
        self.spec.select = if cols.is_empty() {
            Select::All
        } else {
            Select::Columns(cols.iter().map(|s| s.to_string()).collect())
        };
        self
    }

    // ==================== Actions ====================

    /// Turn this into a `SELECT COUNT(*) AS cnt` statement.
    pub fn count(&mut self) -> &mut Self {
        self.count_column("*")
    }

    /// Turn this into a `SELECT COUNT(<column>) AS cnt` statement.
    pub fn count_column(&mut self, column: &str) -> &mut Self {
        self.spec.action = Action::Count;
        self.spec.count_column = column.to_string();
        self
    }

    /// Turn this into an INSERT and merge `data` into the SET list.
    pub fn insert<I, K, V>(&mut self, data: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SetField>,
    {
        self.spec.action = Action::Insert;
        self.merge(data)
    }

    /// Turn this into an UPDATE and merge `data` into the SET list.
    pub fn update<I, K, V>(&mut self, data: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SetField>,
    {
        self.spec.action = Action::Update;
        self.merge(data)
    }

    /// Merge a single SET column without changing the action.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<SetField>) -> &mut Self {
        self.merge([(column.into(), value.into())])
    }

    /// Turn this into a DELETE.
    pub fn delete(&mut self) -> &mut Self {
        self.spec.action = Action::Delete;
        self
    }

    /// Merge data for `ON DUPLICATE KEY UPDATE` (INSERT only).
    pub fn on_duplicate_key_update<I, K, V>(&mut self, data: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SetField>,
    {
        QuerySpec::merge_set(
            &mut self.spec.on_duplicate,
            data.into_iter().map(|(k, v)| (k.into(), v.into())),
        );
        self
    }

    fn merge<I, K, V>(&mut self, data: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SetField>,
    {
        QuerySpec::merge_set(
            &mut self.spec.set_data,
            data.into_iter().map(|(k, v)| (k.into(), v.into())),
        );
        self
    }

    // ==================== Joins ====================

    /// Add a JOIN. An empty `alias` defaults to the first letter of `table`.
    pub fn join(&mut self, kind: JoinType, table: &str, alias: &str, on: &str) -> &mut Self {
        self.spec.joins.push(Join::new(kind, table, alias, on));
        self
    }

    /// Add INNER JOIN.
    pub fn inner_join(&mut self, table: &str, alias: &str, on: &str) -> &mut Self {
        self.join(JoinType::Inner, table, alias, on)
    }

    /// Add LEFT JOIN.
    pub fn left_join(&mut self, table: &str, alias: &str, on: &str) -> &mut Self {
        self.join(JoinType::Left, table, alias, on)
    }

    /// Add RIGHT JOIN.
    pub fn right_join(&mut self, table: &str, alias: &str, on: &str) -> &mut Self {
        self.join(JoinType::Right, table, alias, on)
    }

    /// Add FULL JOIN.
    pub fn full_join(&mut self, table: &str, alias: &str, on: &str) -> &mut Self {
        self.join(JoinType::Full, table, alias, on)
    }

    // ==================== Conditions ====================

    /// Add conditions joined with AND.
    ///
    /// Entries are `(column, condition)`; anything convertible into a [`Condition`] works,
    /// so plain values mean equality.
    pub fn and_where<I, C, T>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
        T: Into<Condition>,
    {
        self.push_where(conditions, Joiner::And, false)
    }

    /// Add one parenthesized group whose conditions are joined with OR.
    ///
    /// The group itself is AND-ed with everything else.
    pub fn or_where<I, C, T>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
        T: Into<Condition>,
    {
        self.push_where(conditions, Joiner::Or, true)
    }

    fn push_where<I, C, T>(&mut self, conditions: I, joiner: Joiner, group: bool) -> &mut Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
        T: Into<Condition>,
    {
        let entries: Vec<(String, Condition)> = conditions
            .into_iter()
            .map(|(c, t)| (c.into(), t.into()))
            .collect();

        if let Some(frag) = compile(&entries, joiner) {
            let sql = if group {
                format!("({})", frag.sql)
            } else {
                frag.sql
            };
            self.spec.where_fragments.push(sql);
            self.spec.where_params.extend(frag.params);
        }
        self
    }

    // ==================== Grouping / ordering / paging ====================

    /// Set GROUP BY (caller-formed expression).
    pub fn group_by(&mut self, group_by: &str) -> &mut Self {
        self.spec.group_by = Some(group_by.to_string());
        self
    }

    /// Set ORDER BY (e.g. `"id DESC"`).
    pub fn order_by(&mut self, order_by: &str) -> &mut Self {
        self.spec.order_by = Some(order_by.to_string());
        self
    }

    /// Set LIMIT. `0` means no LIMIT clause.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.spec.limit = limit;
        self
    }

    /// Set OFFSET. Only emitted together with a non-zero LIMIT.
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.spec.offset = offset;
        self
    }

    /// Page-based pagination (1-based `page`).
    pub fn paginate(&mut self, page: u64, per_page: u64) -> &mut Self {
        let page = page.max(1);
        self.spec.limit = per_page;
        self.spec.offset = (page - 1).saturating_mul(per_page);
        self
    }

    // ==================== Resets ====================

    /// Clear WHERE conditions and their params.
    pub fn clear_where(&mut self) -> &mut Self {
        self.spec.clear_where();
        self
    }

    /// Reset SELECT columns to `*`.
    pub fn clear_select(&mut self) -> &mut Self {
        self.spec.clear_select();
        self
    }

    pub fn clear_join(&mut self) -> &mut Self {
        self.spec.clear_join();
        self
    }

    pub fn clear_group_by(&mut self) -> &mut Self {
        self.spec.clear_group_by();
        self
    }

    pub fn clear_order_by(&mut self) -> &mut Self {
        self.spec.clear_order_by();
        self
    }

    /// Clear LIMIT and OFFSET.
    pub fn clear_limit(&mut self) -> &mut Self {
        self.spec.clear_limit();
        self
    }

    /// Clear SET and ON DUPLICATE KEY UPDATE data.
    pub fn clear_data(&mut self) -> &mut Self {
        self.spec.clear_data();
        self
    }

    /// Reset every clause category (action back to SELECT). Table, alias and hooks are kept.
    pub fn clear_all(&mut self) -> &mut Self {
        self.spec.clear_all();
        self
    }

    // ==================== Hooks ====================

    /// Register a build hook.
    pub fn with_hook(&mut self, hook: Arc<dyn BuildHook>) -> &mut Self {
        self.hooks.push(hook);
        self
    }

    pub fn clear_hooks(&mut self) -> &mut Self {
        self.hooks.clear();
        self
    }

    // ==================== Output ====================

    /// Read-only view of the accumulated clause state.
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Compile the statement.
    ///
    /// Does not modify the builder: calling it again without changes returns the same
    /// SQL and params.
    pub fn build(&self) -> Result<Built> {
        let built = match assemble(&self.spec) {
            Ok(built) => built,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    target: "paramsql.sql",
                    action = self.spec.action.as_str(),
                    table = %self.spec.table,
                    error = %err,
                    "build failed"
                );
                return Err(err);
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "paramsql.sql",
            action = self.spec.action.as_str(),
            param_count = built.params.len(),
            sql = %built.sql,
            "built statement"
        );

        if !self.hooks.is_empty() {
            let ctx = BuildContext::new(&self.spec, &built);
            for hook in &self.hooks {
                hook.on_build(&ctx);
            }
        }

        Ok(built)
    }
}
