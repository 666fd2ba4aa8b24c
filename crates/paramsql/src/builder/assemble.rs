//! Statement assembly: turns a [`QuerySpec`] into SQL text and its bind values.
//!
//! Nothing here mutates the [`QuerySpec`], so assembling the same state twice gives
//! byte-identical output.

use super::spec::{Action, QuerySpec, SetData, SetField};
use crate::error::{Error, Result};
use crate::value::Value;
use serde::Serialize;

/// A compiled statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Built {
    /// SQL text with positional `?` placeholders.
    pub sql: String,
    /// Bind values, in placeholder order.
    pub params: Vec<Value>,
}

impl Built {
    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// Render the SQL with each placeholder replaced by its parameter as a literal.
    ///
    /// Debug output only. Never execute the result.
    pub fn interpolated(&self) -> String {
        let mut out = String::with_capacity(self.sql.len() + self.params.len() * 8);
        let mut params = self.params.iter();
        for ch in self.sql.chars() {
            if ch == '?' {
                match params.next() {
                    Some(p) => out.push_str(&p.to_sql_literal()),
                    None => out.push('?'),
                }
            } else {
                out.push(ch);
            }
        }
        out
    }
}

/// Assemble the statement described by `spec`.
pub fn assemble(spec: &QuerySpec) -> Result<Built> {
    match spec.action {
        Action::Select => Ok(select(spec)),
        Action::Count => Ok(count(spec)),
        Action::Insert => insert(spec),
        Action::Update => update(spec),
        Action::Delete => Ok(delete(spec)),
    }
}

fn select(spec: &QuerySpec) -> Built {
    let mut sql = format!(
        "SELECT {} FROM {}",
        spec.select.to_sql(),
        spec.table_with_alias()
    );
    push_joins(&mut sql, spec);
    push_where(&mut sql, spec);
    push_group_by(&mut sql, spec);

    if let Some(order_by) = non_empty(spec.order_by.as_deref()) {
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }

    if spec.limit > 0 {
        sql.push_str(&format!(" LIMIT {}", spec.limit));
        if spec.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", spec.offset));
        }
    }

    Built {
        sql,
        params: spec.where_params.clone(),
    }
}

fn count(spec: &QuerySpec) -> Built {
    let mut sql = format!(
        "SELECT COUNT({}) AS cnt FROM {}",
        spec.count_column,
        spec.table_with_alias()
    );
    push_joins(&mut sql, spec);
    push_where(&mut sql, spec);
    push_group_by(&mut sql, spec);

    Built {
        sql,
        params: spec.where_params.clone(),
    }
}

fn insert(spec: &QuerySpec) -> Result<Built> {
    if spec.set_data.is_empty() {
        return Err(Error::EmptyMutationData(Action::Insert));
    }

    let mut params = Vec::new();
    let mut sql = format!("INSERT INTO {} SET ", spec.table);
    push_set_list(&mut sql, &mut params, &spec.set_data);

    if !spec.on_duplicate.is_empty() {
        sql.push_str(" ON DUPLICATE KEY UPDATE ");
        push_set_list(&mut sql, &mut params, &spec.on_duplicate);
    }

    Ok(Built { sql, params })
}

fn update(spec: &QuerySpec) -> Result<Built> {
    if spec.set_data.is_empty() {
        return Err(Error::EmptyMutationData(Action::Update));
    }

    let mut params = Vec::new();
    let mut sql = format!("UPDATE {} SET ", spec.table);
    push_set_list(&mut sql, &mut params, &spec.set_data);

    // SET values first, then WHERE values.
    if push_where(&mut sql, spec) {
        params.extend_from_slice(&spec.where_params);
    }

    Ok(Built { sql, params })
}

fn delete(spec: &QuerySpec) -> Built {
    let mut sql = format!("DELETE FROM {}", spec.table_with_alias());
    push_where(&mut sql, spec);

    Built {
        sql,
        params: spec.where_params.clone(),
    }
}

fn push_joins(sql: &mut String, spec: &QuerySpec) {
    for join in &spec.joins {
        sql.push(' ');
        sql.push_str(&join.to_sql());
    }
}

/// Returns whether a WHERE clause was written.
fn push_where(sql: &mut String, spec: &QuerySpec) -> bool {
    if spec.where_fragments.is_empty() {
        return false;
    }
    sql.push_str(" WHERE ");
    sql.push_str(&spec.where_fragments.join(" AND "));
    true
}

fn push_group_by(sql: &mut String, spec: &QuerySpec) {
    if let Some(group_by) = non_empty(spec.group_by.as_deref()) {
        sql.push_str(" GROUP BY ");
        sql.push_str(group_by);
    }
}

fn push_set_list(sql: &mut String, params: &mut Vec<Value>, data: &SetData) {
    for (i, (column, field)) in data.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(column);
        sql.push_str(" = ");
        match field {
            SetField::Value(v) => {
                sql.push('?');
                params.push(v.clone());
            }
            SetField::Raw(raw) => {
                sql.push_str(raw.sql());
                params.extend_from_slice(raw.bindings());
            }
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
