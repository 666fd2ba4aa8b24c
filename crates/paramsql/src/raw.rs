//! Raw SQL expressions (the escape hatch).
//!
//! A [`Raw`] is inlined verbatim wherever it is used as a value: in a SET clause, as
//! the right-hand side of a condition. Its own bindings are spliced into the parameter
//! stream at that exact position, so `?` markers inside the fragment line up with the
//! surrounding placeholders.
//!
//! # Example
//! ```
//! use paramsql::Raw;
//!
//! let now = Raw::new("NOW()");
//! let floor = Raw::with_bindings("GREATEST(?, points - ?)", [0i64, 100]);
//! let sum = Raw::with_identifiers("COALESCE(SUM({col}), ?)", &[("col", "total_amount")], [0i64])?;
//! assert_eq!(sum.sql(), "COALESCE(SUM(total_amount), ?)");
//! # Ok::<(), paramsql::Error>(())
//! ```

use crate::error::Result;
use crate::ident::safe_identifier;
use crate::value::Value;
use serde::Serialize;

/// A literal SQL fragment plus the values bound to the `?` markers it contains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Raw {
    sql: String,
    bindings: Vec<Value>,
}

impl Raw {
    /// Create a raw expression without bindings.
    ///
    /// # Safety
    ///
    /// The fragment is concatenated into the statement as-is. Only pass trusted SQL
    /// (function calls, arithmetic on known columns). For user-provided column names use
    /// [`Raw::with_identifiers`].
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    /// Create a raw expression whose `?` markers are bound to `bindings`, in order.
    ///
    /// Same trust requirements as [`Raw::new`] for the fragment itself.
    pub fn with_bindings<I, V>(sql: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            sql: sql.into(),
            bindings: bindings.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a raw expression from a template with `{name}` identifier slots.
    ///
    /// Every identifier is validated before substitution; the first invalid one aborts
    /// with [`crate::Error::InvalidIdentifier`]. Substitution is literal replacement of
    /// each `{name}` token. Bindings are attached unchanged.
    pub fn with_identifiers<I, V>(
        template: &str,
        identifiers: &[(&str, &str)],
        bindings: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut sql = template.to_string();
        for (name, identifier) in identifiers {
            let identifier = safe_identifier(identifier)?;
            sql = sql.replace(&format!("{{{name}}}"), identifier);
        }
        Ok(Self::with_bindings(sql, bindings))
    }

    /// The SQL fragment.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The values bound to this fragment.
    pub fn bindings(&self) -> &[Value] {
        &self.bindings
    }

    pub fn has_bindings(&self) -> bool {
        !self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_without_bindings() {
        let raw = Raw::new("(SELECT AVG(price) FROM products)");
        assert_eq!(raw.sql(), "(SELECT AVG(price) FROM products)");
        assert!(!raw.has_bindings());
    }

    #[test]
    fn raw_with_bindings_keeps_order() {
        let raw = Raw::with_bindings("COALESCE(amount, ?) + ?", [0i64, 5]);
        assert_eq!(raw.bindings(), &[Value::Int(0), Value::Int(5)]);
    }

    #[test]
    fn identifiers_substituted_everywhere() {
        let raw = Raw::with_identifiers(
            "CASE WHEN {col} > ? THEN {col} ELSE {fallback} END",
            &[("col", "score"), ("fallback", "t.base_score")],
            [10i64],
        )
        .unwrap();
        assert_eq!(
            raw.sql(),
            "CASE WHEN score > ? THEN score ELSE t.base_score END"
        );
        assert_eq!(raw.bindings(), &[Value::Int(10)]);
    }

    #[test]
    fn invalid_identifier_rejected() {
        let err = Raw::with_identifiers(
            "SUM({col})",
            &[("col", "amount); DROP TABLE orders; --")],
            Vec::<Value>::new(),
        )
        .unwrap_err();
        assert!(err.is_invalid_identifier());
    }

    #[test]
    fn unknown_slot_left_untouched() {
        let raw = Raw::with_identifiers("{a} + {b}", &[("a", "x")], Vec::<Value>::new()).unwrap();
        assert_eq!(raw.sql(), "x + {b}");
    }
}
