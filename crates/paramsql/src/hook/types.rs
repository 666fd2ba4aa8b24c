use crate::builder::{Action, Built, Join, QuerySpec, SetData};
use serde::Serialize;

/// Clause state of a builder at the moment it was built.
///
/// This is what the builder was asked to do, before assembly. Paired with the
/// [`Built`] output it explains where every placeholder came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseSnapshot {
    pub table: String,
    pub alias: String,
    pub select: String,
    pub joins: Vec<Join>,
    #[serde(rename = "where")]
    pub where_fragments: Vec<String>,
    pub group_by: Option<String>,
    pub order_by: Option<String>,
    pub limit: u64,
    pub offset: u64,
    pub set_data: SetData,
}

impl From<&QuerySpec> for ClauseSnapshot {
    fn from(spec: &QuerySpec) -> Self {
        Self {
            table: spec.table().to_string(),
            alias: spec.table_alias().to_string(),
            select: spec.select().to_sql(),
            joins: spec.joins().to_vec(),
            where_fragments: spec.where_fragments().to_vec(),
            group_by: spec.group_by().map(str::to_string),
            order_by: spec.order_by().map(str::to_string),
            limit: spec.limit(),
            offset: spec.offset(),
            set_data: spec.set_data().clone(),
        }
    }
}

/// Everything a hook gets to see about one successful build.
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    pub action: Action,
    pub input: ClauseSnapshot,
    pub output: &'a Built,
}

impl<'a> BuildContext<'a> {
    pub fn new(spec: &QuerySpec, output: &'a Built) -> Self {
        Self {
            action: spec.action(),
            input: ClauseSnapshot::from(spec),
            output,
        }
    }

    pub fn param_count(&self) -> usize {
        self.output.params.len()
    }
}

/// Observer notified after every successful `build`.
///
/// Hooks are purely observational: they cannot change the statement, and a builder
/// without hooks produces exactly the same output.
pub trait BuildHook: Send + Sync {
    fn on_build(&self, ctx: &BuildContext<'_>);
}
