//! Safe SQL identifier handling.
//!
//! Identifiers cannot be bound as parameters, so anything user-controlled that ends up
//! as a column or table name has to pass through [`Ident::parse`] (or the
//! [`safe_identifier`] shorthand) first.
//!
//! Accepted grammar: `[A-Za-z_][A-Za-z0-9_]*`, optionally followed by `.` and a second
//! part of the same shape (`table.column`). No quoting, no whitespace, no third part.
//!
//! # Example
//! ```
//! use paramsql::Ident;
//!
//! let col = Ident::parse("orders.total_amount")?;
//! assert_eq!(col.table(), Some("orders"));
//! assert_eq!(col.name(), "total_amount");
//! assert!(Ident::parse("col; DROP TABLE x--").is_err());
//! # Ok::<(), paramsql::Error>(())
//! ```

use crate::error::{Error, Result};
use std::fmt;

/// A validated column or table reference, optionally table-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    raw: String,
    dot: Option<usize>,
}

impl Ident {
    /// Parse and validate an identifier.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::invalid_identifier(s, "identifier cannot be empty"));
        }

        let mut dot = None;
        let mut segment_start = true;

        for (i, c) in s.char_indices() {
            if c == '.' {
                if segment_start {
                    return Err(Error::invalid_identifier(s, "empty identifier segment"));
                }
                if dot.is_some() {
                    return Err(Error::invalid_identifier(
                        s,
                        "at most one '.' (table.column) is allowed",
                    ));
                }
                dot = Some(i);
                segment_start = true;
                continue;
            }

            if segment_start {
                // First char: letter or underscore.
                if !(c == '_' || c.is_ascii_alphabetic()) {
                    return Err(Error::invalid_identifier(
                        s,
                        format!("invalid identifier start character '{c}'"),
                    ));
                }
                segment_start = false;
            } else if !(c == '_' || c.is_ascii_alphanumeric()) {
                return Err(Error::invalid_identifier(
                    s,
                    format!("invalid character '{c}' in identifier"),
                ));
            }
        }

        if segment_start {
            return Err(Error::invalid_identifier(s, "trailing '.' in identifier"));
        }

        Ok(Self {
            raw: s.to_string(),
            dot,
        })
    }

    /// The table qualifier, if any.
    pub fn table(&self) -> Option<&str> {
        self.dot.map(|i| &self.raw[..i])
    }

    /// The unqualified name (the part after the dot, or the whole identifier).
    pub fn name(&self) -> &str {
        match self.dot {
            Some(i) => &self.raw[i + 1..],
            None => &self.raw,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_string(self) -> String {
        self.raw
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl std::str::FromStr for Ident {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Validate `identifier` and hand it back unchanged.
///
/// Use this for user-provided column names that end up in `order_by`, `group_by` or raw
/// fragments.
pub fn safe_identifier(identifier: &str) -> Result<&str> {
    Ident::parse(identifier)?;
    Ok(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        let ident = Ident::parse("users").unwrap();
        assert_eq!(ident.as_str(), "users");
        assert_eq!(ident.table(), None);
        assert_eq!(ident.name(), "users");
    }

    #[test]
    fn ident_qualified() {
        let ident = Ident::parse("u.created_at").unwrap();
        assert_eq!(ident.table(), Some("u"));
        assert_eq!(ident.name(), "created_at");
        assert_eq!(ident.to_string(), "u.created_at");
    }

    #[test]
    fn ident_underscore_and_digits() {
        assert!(Ident::parse("_tmp1").is_ok());
        assert!(Ident::parse("t2.col_3").is_ok());
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(Ident::parse("").is_err());
    }

    #[test]
    fn ident_rejects_start_digit() {
        assert!(Ident::parse("1table").is_err());
        assert!(Ident::parse("users.1col").is_err());
    }

    #[test]
    fn ident_rejects_space() {
        assert!(Ident::parse("my table").is_err());
        assert!(Ident::parse(" users").is_err());
    }

    #[test]
    fn ident_rejects_three_parts() {
        assert!(Ident::parse("schema.table.column").is_err());
    }

    #[test]
    fn ident_rejects_double_dot() {
        assert!(Ident::parse("schema..table").is_err());
    }

    #[test]
    fn ident_rejects_leading_and_trailing_dot() {
        assert!(Ident::parse(".users").is_err());
        assert!(Ident::parse("users.").is_err());
    }

    #[test]
    fn ident_rejects_injection() {
        for bad in [
            "col; DROP TABLE x--",
            "name'",
            "\"quoted\"",
            "id OR 1=1",
            "col$",
            "naïve",
        ] {
            let err = Ident::parse(bad).unwrap_err();
            assert!(err.is_invalid_identifier(), "{bad} should be rejected");
        }
    }

    #[test]
    fn safe_identifier_returns_input() {
        assert_eq!(safe_identifier("total_amount").unwrap(), "total_amount");
        assert!(safe_identifier("total amount").is_err());
    }
}
