//! # paramsql
//!
//! A parameterized SQL statement compiler.
//!
//! ## Features
//!
//! - **Values are always bound**: every value becomes a positional `?` placeholder, with
//!   its bind value appended in placeholder order
//! - **Closed predicate set**: operator/operand pairs are resolved into a [`Condition`]
//!   at the call site, so a malformed operand fails before any SQL is produced
//! - **Identifier validation**: [`safe_identifier`] and [`Raw::with_identifiers`] for
//!   names that come from user input
//! - **Raw escape hatch**: [`Raw`] fragments are inlined verbatim with their own bindings
//! - **Safe defaults**: INSERT and UPDATE without SET data fail at `build`
//! - **Build hooks**: per-builder diagnostics (stats, recording, `tracing` output)
//!
//! ## Example
//!
//! ```
//! use paramsql::{Condition, QueryBuilder, Raw, Value};
//!
//! // SELECT
//! let mut qb = QueryBuilder::table("users");
//! qb.and_where([("status", "active"), ("role", "admin")])
//!     .or_where([("team", Condition::op("IN", [1, 2])?)])
//!     .order_by("created_at DESC")
//!     .limit(10);
//! let built = qb.build()?;
//! assert_eq!(
//!     built.sql,
//!     "SELECT * FROM users WHERE status = ? AND role = ? AND (team IN (?, ?)) \
//!      ORDER BY created_at DESC LIMIT 10"
//! );
//!
//! // INSERT
//! let mut qb = QueryBuilder::table("users");
//! qb.insert([("name", "John")])
//!     .set("created_at", Raw::new("NOW()"));
//! let built = qb.build()?;
//! assert_eq!(built.sql, "INSERT INTO users SET name = ?, created_at = NOW()");
//! assert_eq!(built.params, vec![Value::from("John")]);
//! # Ok::<(), paramsql::Error>(())
//! ```

pub mod builder;
pub mod condition;
pub mod error;
pub mod hook;
pub mod ident;
pub mod raw;
pub mod value;

pub use builder::{
    Action, Built, Join, JoinType, QueryBuilder, QuerySpec, Select, SetData, SetField, assemble,
};
pub use condition::{Condition, Fragment, Joiner, Operand, compile};
pub use error::{Error, Result};
pub use hook::{BuildContext, BuildHook};
pub use ident::{Ident, safe_identifier};
pub use raw::Raw;
pub use value::Value;
