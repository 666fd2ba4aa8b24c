use crate::condition::impl_from_scalar;
use crate::error::{Error, Result};
use crate::raw::Raw;
use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Statement kind produced by `build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    Count,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Select,
        Action::Insert,
        Action::Update,
        Action::Delete,
        Action::Count,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Select => "select",
            Action::Insert => "insert",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Count => "count",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnsupportedAction(s.to_string()))
    }
}

/// JOIN flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        }
    }
}

/// One JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Join {
    pub kind: JoinType,
    pub table: String,
    pub alias: String,
    pub on: String,
}

impl Join {
    /// An empty `alias` defaults to the first character of `table`.
    pub fn new(kind: JoinType, table: &str, alias: &str, on: &str) -> Self {
        let alias = if alias.is_empty() {
            table.chars().next().map(String::from).unwrap_or_default()
        } else {
            alias.to_string()
        };
        Self {
            kind,
            table: table.to_string(),
            alias,
            on: on.to_string(),
        }
    }

    pub fn to_sql(&self) -> String {
        format!(
            "{} JOIN {} AS {} ON {}",
            self.kind.as_sql(),
            self.table,
            self.alias,
            self.on
        )
    }
}

/// SELECT list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Select {
    /// `*`
    #[default]
    All,
    /// Column expressions, emitted comma-separated in order.
    Columns(Vec<String>),
}

impl Select {
    pub fn to_sql(&self) -> String {
        match self {
            Select::All => "*".to_string(),
            Select::Columns(cols) => cols.join(", "),
        }
    }
}

/// A SET clause value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SetField {
    /// Parameterized value
    Value(Value),
    /// Raw SQL expression (plus its own bindings)
    Raw(Raw),
}

impl From<Raw> for SetField {
    fn from(raw: Raw) -> Self {
        SetField::Raw(raw)
    }
}

impl From<Value> for SetField {
    fn from(value: Value) -> Self {
        SetField::Value(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for SetField {
    fn from(v: Option<T>) -> Self {
        SetField::Value(Value::from(v))
    }
}

impl_from_scalar!(SetField: bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String, &String);
impl_from_scalar!(SetField: uuid::Uuid, chrono::NaiveDate, chrono::NaiveDateTime, chrono::DateTime<chrono::Utc>, serde_json::Value);

/// Ordered `column -> value` data for SET clauses.
///
/// Re-inserting a column keeps its original position and takes the latest value.
pub type SetData = IndexMap<String, SetField>;

/// All clause state of one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub(crate) action: Action,
    pub(crate) table: String,
    pub(crate) table_alias: String,
    pub(crate) select: Select,
    pub(crate) joins: Vec<Join>,
    pub(crate) where_fragments: Vec<String>,
    pub(crate) where_params: Vec<Value>,
    pub(crate) group_by: Option<String>,
    pub(crate) order_by: Option<String>,
    pub(crate) limit: u64,
    pub(crate) offset: u64,
    pub(crate) set_data: SetData,
    pub(crate) on_duplicate: SetData,
    pub(crate) count_column: String,
}

impl QuerySpec {
    pub fn new(table: &str, alias: &str) -> Self {
        Self {
            action: Action::default(),
            table: table.to_string(),
            table_alias: alias.to_string(),
            select: Select::default(),
            joins: Vec::new(),
            where_fragments: Vec::new(),
            where_params: Vec::new(),
            group_by: None,
            order_by: None,
            limit: 0,
            offset: 0,
            set_data: SetData::new(),
            on_duplicate: SetData::new(),
            count_column: "*".to_string(),
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }

    pub fn select(&self) -> &Select {
        &self.select
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn where_fragments(&self) -> &[String] {
        &self.where_fragments
    }

    pub fn where_params(&self) -> &[Value] {
        &self.where_params
    }

    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn set_data(&self) -> &SetData {
        &self.set_data
    }

    pub fn on_duplicate(&self) -> &SetData {
        &self.on_duplicate
    }

    pub fn count_column(&self) -> &str {
        &self.count_column
    }

    /// `table` or `table AS alias`.
    pub(crate) fn table_with_alias(&self) -> String {
        if self.table_alias.is_empty() {
            self.table.clone()
        } else {
            format!("{} AS {}", self.table, self.table_alias)
        }
    }

    pub(crate) fn merge_set<I>(target: &mut SetData, data: I)
    where
        I: IntoIterator<Item = (String, SetField)>,
    {
        for (column, value) in data {
            target.insert(column, value);
        }
    }

    // ==================== Resets ====================

    pub fn clear_where(&mut self) {
        self.where_fragments.clear();
        self.where_params.clear();
    }

    pub fn clear_select(&mut self) {
        self.select = Select::All;
    }

    pub fn clear_join(&mut self) {
        self.joins.clear();
    }

    pub fn clear_group_by(&mut self) {
        self.group_by = None;
    }

    pub fn clear_order_by(&mut self) {
        self.order_by = None;
    }

    pub fn clear_limit(&mut self) {
        self.limit = 0;
        self.offset = 0;
    }

    pub fn clear_data(&mut self) {
        self.set_data.clear();
        self.on_duplicate.clear();
    }

    /// Reset every clause category. The table and its alias are kept.
    pub fn clear_all(&mut self) {
        let table = std::mem::take(&mut self.table);
        let alias = std::mem::take(&mut self.table_alias);
        *self = Self::new(&table, &alias);
    }
}
