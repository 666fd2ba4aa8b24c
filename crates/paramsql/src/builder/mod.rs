//! Statement builder.
//!
//! ## Design
//!
//! - SQL is still explicit (strings) for columns, joins and ordering; values never are.
//! - Every value becomes a positional `?` placeholder with its bind value appended in
//!   placeholder order. Raw expressions are the one deliberate exception.
//! - Safe defaults: INSERT and UPDATE without SET data fail at `build`.
//! - [`QueryBuilder`] owns a mutable [`QuerySpec`]; [`assemble`] is the pure step that
//!   reads it.

pub mod assemble;
pub mod query;
pub mod spec;

pub use assemble::{Built, assemble};
pub use query::QueryBuilder;
pub use spec::{Action, Join, JoinType, QuerySpec, Select, SetData, SetField};
