//! Predicate compilation for WHERE clauses.
//!
//! A WHERE call takes an ordered list of `(column, Condition)` entries. [`Condition`] is a
//! closed set of shapes; the string-operator form (`("IN", [1, 2, 3])`) is resolved into one
//! of them by [`Condition::op`] before anything is compiled, so malformed operands fail at
//! the call site instead of producing broken SQL.
//!
//! # Example
//! ```
//! use paramsql::{Condition, Joiner, Raw, compile};
//!
//! let frag = compile(
//!     &[
//!         ("status".to_string(), Condition::eq("active")),
//!         ("id".to_string(), Condition::op("in", [1, 2, 3])?),
//!         ("deleted_at".to_string(), Condition::op("IS", None::<i64>)?),
//!         ("updated_at".to_string(), Condition::cmp_raw("<", Raw::new("NOW()"))),
//!     ],
//!     Joiner::And,
//! )
//! .unwrap();
//! assert_eq!(
//!     frag.sql,
//!     "status = ? AND id IN (?, ?, ?) AND deleted_at IS NULL AND updated_at < NOW()"
//! );
//! assert_eq!(frag.params.len(), 4);
//! # Ok::<(), paramsql::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::raw::Raw;
use crate::value::Value;

/// Right-hand side of a string-operator condition, before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single bind value (including `Null`).
    Value(Value),
    /// A sequence of values (`IN`, `NOT IN`, `BETWEEN`).
    List(Vec<Value>),
    /// A raw SQL fragment, inlined.
    Raw(Raw),
}

impl From<Raw> for Operand {
    fn from(raw: Raw) -> Self {
        Operand::Raw(raw)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(values: [T; N]) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_from_scalar {
    ($target:ident: $($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for $target {
                fn from(v: $ty) -> Self {
                    $target::Value(Value::from(v))
                }
            }
        )*
    };
}
pub(crate) use impl_from_scalar;

impl_from_scalar!(Operand: bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String, &String);
impl_from_scalar!(Operand: uuid::Uuid, chrono::NaiveDate, chrono::NaiveDateTime, chrono::DateTime<chrono::Utc>, serde_json::Value);

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(Value::from(v))
    }
}

/// A single column predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `col = ?`
    Eq(Value),
    /// `col = <raw>`
    RawEq(Raw),
    /// `col <op> ?`
    Cmp(String, Value),
    /// `col <op> <raw>`
    CmpRaw(String, Raw),
    /// `col BETWEEN ? AND ?`
    Between(Value, Value),
    /// `col IN (?, ...)`
    In(Vec<Value>),
    /// `col NOT IN (?, ...)`
    NotIn(Vec<Value>),
    /// `col IS NULL`
    IsNull,
    /// `col IS NOT NULL`
    IsNotNull,
}

impl Condition {
    /// Resolve an `(operator, operand)` pair.
    ///
    /// The operator is matched case-insensitively for the special forms (`BETWEEN`, `IN`,
    /// `NOT IN`, `IS`, `IS NOT`). Any other operator is emitted as given (trimmed).
    ///
    /// Errors with [`Error::InvalidArgument`] when `BETWEEN` does not get exactly two
    /// values, or when a list is given to an operator that takes a single value.
    pub fn op(operator: &str, operand: impl Into<Operand>) -> Result<Self> {
        let operator = operator.trim();
        let upper = operator.to_ascii_uppercase();
        let operand = operand.into();

        match (upper.as_str(), operand) {
            ("BETWEEN", Operand::List(values)) => {
                let count = values.len();
                let mut it = values.into_iter();
                match (it.next(), it.next(), it.next()) {
                    (Some(lo), Some(hi), None) => Ok(Condition::Between(lo, hi)),
                    _ => Err(Error::invalid_argument(format!(
                        "BETWEEN expects exactly 2 values, got {count}"
                    ))),
                }
            }
            ("BETWEEN", _) => Err(Error::invalid_argument(
                "BETWEEN expects a 2-element list [low, high]",
            )),
            ("IN", Operand::List(values)) => Ok(Condition::In(values)),
            ("NOT IN", Operand::List(values)) => Ok(Condition::NotIn(values)),
            ("IS", Operand::Value(Value::Null)) => Ok(Condition::IsNull),
            ("IS NOT", Operand::Value(Value::Null)) => Ok(Condition::IsNotNull),
            (_, Operand::Value(value)) => Ok(Condition::Cmp(operator.to_string(), value)),
            (_, Operand::Raw(raw)) => Ok(Condition::CmpRaw(operator.to_string(), raw)),
            (_, Operand::List(values)) => Err(Error::invalid_argument(format!(
                "operator '{operator}' takes a single value, got a list of {}",
                values.len()
            ))),
        }
    }

    /// Implicit equality with a bind value.
    pub fn eq(value: impl Into<Value>) -> Self {
        Condition::Eq(value.into())
    }

    /// Implicit equality with a raw expression.
    pub fn raw(raw: Raw) -> Self {
        Condition::RawEq(raw)
    }

    /// Comparison with an arbitrary operator (`<`, `>=`, `LIKE`, `!=`, ...).
    pub fn cmp(operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Cmp(operator.into(), value.into())
    }

    /// Comparison against a raw expression.
    pub fn cmp_raw(operator: impl Into<String>, raw: Raw) -> Self {
        Condition::CmpRaw(operator.into(), raw)
    }

    pub fn like(pattern: impl Into<Value>) -> Self {
        Condition::Cmp("LIKE".to_string(), pattern.into())
    }

    pub fn between(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Condition::Between(low.into(), high.into())
    }

    pub fn in_list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Condition::In(values.into_iter().map(Into::into).collect())
    }

    pub fn not_in<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Condition::NotIn(values.into_iter().map(Into::into).collect())
    }

    pub fn is_null() -> Self {
        Condition::IsNull
    }

    pub fn is_not_null() -> Self {
        Condition::IsNotNull
    }

    /// Append `<column> ...` to `sql` and this condition's values to `params`.
    pub fn write(&self, column: &str, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            Condition::Eq(v) => {
                push_parts(sql, &[column, " = ?"]);
                params.push(v.clone());
            }
            Condition::RawEq(raw) => {
                push_parts(sql, &[column, " = ", raw.sql()]);
                params.extend_from_slice(raw.bindings());
            }
            Condition::Cmp(op, v) => {
                push_parts(sql, &[column, " ", op, " ?"]);
                params.push(v.clone());
            }
            Condition::CmpRaw(op, raw) => {
                push_parts(sql, &[column, " ", op, " ", raw.sql()]);
                params.extend_from_slice(raw.bindings());
            }
            Condition::Between(lo, hi) => {
                push_parts(sql, &[column, " BETWEEN ? AND ?"]);
                params.push(lo.clone());
                params.push(hi.clone());
            }
            Condition::In(values) | Condition::NotIn(values) => {
                let negated = matches!(self, Condition::NotIn(_));
                if values.is_empty() {
                    // Empty IN list - always false / true
                    sql.push_str(if negated { "1=1" } else { "1=0" });
                    return;
                }
                sql.push_str(column);
                sql.push_str(if negated { " NOT IN (" } else { " IN (" });
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    sql.push('?');
                    params.push(v.clone());
                }
                sql.push(')');
            }
            Condition::IsNull => push_parts(sql, &[column, " IS NULL"]),
            Condition::IsNotNull => push_parts(sql, &[column, " IS NOT NULL"]),
        }
    }
}

fn push_parts(sql: &mut String, parts: &[&str]) {
    for part in parts {
        sql.push_str(part);
    }
}

impl From<Raw> for Condition {
    fn from(raw: Raw) -> Self {
        Condition::RawEq(raw)
    }
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        Condition::Eq(value)
    }
}

macro_rules! impl_condition_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Condition {
                fn from(v: $ty) -> Self {
                    Condition::Eq(Value::from(v))
                }
            }
        )*
    };
}

impl_condition_from_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String, &String);
impl_condition_from_scalar!(uuid::Uuid, chrono::NaiveDate, chrono::NaiveDateTime, chrono::DateTime<chrono::Utc>);

/// How the entries of one WHERE call are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    And,
    Or,
}

impl Joiner {
    pub fn as_sql(self) -> &'static str {
        match self {
            Joiner::And => " AND ",
            Joiner::Or => " OR ",
        }
    }
}

/// A compiled boolean SQL fragment and the values its placeholders consume.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Compile `(column, condition)` entries, in order, joined with `joiner`.
///
/// Returns `None` when `conditions` is empty.
pub fn compile<C: AsRef<str>>(conditions: &[(C, Condition)], joiner: Joiner) -> Option<Fragment> {
    if conditions.is_empty() {
        return None;
    }

    let mut frag = Fragment::default();
    for (i, (column, condition)) in conditions.iter().enumerate() {
        if i > 0 {
            frag.sql.push_str(joiner.as_sql());
        }
        condition.write(column.as_ref(), &mut frag.sql, &mut frag.params);
    }
    Some(frag)
}
