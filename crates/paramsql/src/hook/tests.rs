use super::*;
use crate::builder::{Action, QueryBuilder, SetField};
use crate::raw::Raw;
use std::sync::Arc;

fn users_query() -> QueryBuilder {
    let mut qb = QueryBuilder::table_as("users", "u");
    qb.select("u.id, u.name")
        .and_where([("u.status", "active")])
        .order_by("u.id")
        .limit(10);
    qb
}

#[test]
fn test_no_hook_and_noop_hook_give_same_output() {
    let plain = users_query();
    let mut hooked = users_query();
    hooked.with_hook(Arc::new(NoopHook));

    assert_eq!(plain.build().unwrap(), hooked.build().unwrap());
}

#[test]
fn test_stats_hook_counts_per_action() {
    let stats = Arc::new(StatsHook::new());

    let mut qb = users_query();
    qb.with_hook(stats.clone());
    qb.build().unwrap();
    qb.build().unwrap();

    qb.count();
    qb.build().unwrap();

    qb.clear_all().delete();
    qb.build().unwrap();

    qb.insert([("name", "x")]);
    qb.build().unwrap();

    let s = stats.stats();
    assert_eq!(s.total_queries, 5);
    assert_eq!(s.select_queries, 2);
    assert_eq!(s.count_queries, 1);
    assert_eq!(s.delete_queries, 1);
    assert_eq!(s.insert_queries, 1);
    assert_eq!(s.update_queries, 0);
    // 1 + 1 + 1 where params, 0 for the delete, 1 set param
    assert_eq!(s.total_params, 4);

    stats.reset();
    assert_eq!(stats.stats(), BuildStats::default());
}

#[test]
fn test_failed_build_is_not_reported() {
    let stats = Arc::new(StatsHook::new());
    let log = Arc::new(RecordingHook::new());

    let mut qb = QueryBuilder::table("users");
    qb.with_hook(stats.clone()).with_hook(log.clone());
    qb.update(Vec::<(&str, i32)>::new());

    assert!(qb.build().is_err());
    assert_eq!(stats.stats().total_queries, 0);
    assert!(log.is_empty());
}

#[test]
fn test_recording_hook_keeps_input_and_output() {
    let log = Arc::new(RecordingHook::new());

    let mut qb = QueryBuilder::table("users");
    qb.with_hook(log.clone());
    qb.update([
        ("name", SetField::from("alice")),
        ("updated_at", SetField::from(Raw::new("NOW()"))),
    ])
    .and_where([("id", 3)]);
    qb.build().unwrap();

    qb.clear_all();
    qb.build().unwrap();

    let entries = log.entries();
    assert_eq!(entries.len(), 2);

    let first = &entries[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.action, Action::Update);
    assert_eq!(first.input.table, "users");
    assert_eq!(first.input.where_fragments, vec!["id = ?".to_string()]);
    assert_eq!(first.input.set_data.len(), 2);
    assert_eq!(
        first.output.sql,
        "UPDATE users SET name = ?, updated_at = NOW() WHERE id = ?"
    );
    assert_eq!(first.output.params.len(), 2);

    assert_eq!(entries[1].id, 2);
    assert_eq!(entries[1].action, Action::Select);
    assert!(entries[1].elapsed >= first.elapsed);

    log.reset();
    assert!(log.is_empty());
}

#[test]
fn test_recording_hook_capacity() {
    let log = Arc::new(RecordingHook::new().with_capacity(2));
    let mut qb = QueryBuilder::table("t");
    qb.with_hook(log.clone());
    for _ in 0..5 {
        qb.build().unwrap();
    }

    let ids: Vec<u64> = log.entries().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 5]);
}

#[test]
fn test_recording_hook_json_export() {
    let log = Arc::new(RecordingHook::new());
    let mut qb = QueryBuilder::table("users");
    qb.with_hook(log.clone());
    qb.and_where([("id", 1)]);
    qb.build().unwrap();

    let json: serde_json::Value = serde_json::from_str(&log.to_json().unwrap()).unwrap();
    let record = &json[0];
    assert_eq!(record["id"], 1);
    assert_eq!(record["action"], "select");
    assert_eq!(record["input"]["table"], "users");
    assert_eq!(record["input"]["where"][0], "id = ?");
    assert_eq!(record["output"]["sql"], "SELECT * FROM users WHERE id = ?");
    assert_eq!(record["output"]["params"][0], 1);
    assert!(record["elapsed"].is_f64());
}

#[test]
fn test_composite_hook_fans_out() {
    let stats = Arc::new(StatsHook::new());
    let log = Arc::new(RecordingHook::new());
    let composite = CompositeHook::new()
        .add(NoopHook)
        .add_arc(stats.clone())
        .add_arc(log.clone());
    assert_eq!(composite.len(), 3);

    let mut qb = users_query();
    qb.with_hook(Arc::new(composite));
    qb.build().unwrap();

    assert_eq!(stats.stats().total_queries, 1);
    assert_eq!(log.len(), 1);
}

#[test]
fn test_hooks_survive_clear_all_and_clone() {
    let stats = Arc::new(StatsHook::new());
    let mut qb = QueryBuilder::table("users");
    qb.with_hook(stats.clone());

    qb.clear_all();
    qb.build().unwrap();

    let copy = qb.clone();
    copy.build().unwrap();
    assert_eq!(stats.stats().total_queries, 2);

    qb.clear_hooks();
    qb.build().unwrap();
    assert_eq!(stats.stats().total_queries, 2);
}

#[test]
fn test_snapshot_serializes_joins() {
    let log = Arc::new(RecordingHook::new());
    let mut qb = QueryBuilder::table_as("users", "u");
    qb.with_hook(log.clone())
        .left_join("roles", "r", "u.role_id = r.id");
    qb.build().unwrap();

    let value = serde_json::to_value(&log.entries()[0].input).unwrap();
    assert_eq!(value["alias"], "u");
    assert_eq!(value["select"], "*");
    assert_eq!(value["joins"][0]["kind"], "LEFT");
    assert_eq!(value["joins"][0]["alias"], "r");
}

#[cfg(feature = "tracing")]
mod tracing_capture {
    use super::*;
    use std::io;
    use std::sync::Mutex;
    use tracing::Level;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture<F: FnOnce()>(max_level: Level, f: F) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(max_level)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        out.contents()
    }

    #[test]
    fn test_tracing_hook_emits_event() {
        let logs = capture(Level::DEBUG, || {
            let mut qb = QueryBuilder::table("users");
            qb.with_hook(Arc::new(TracingHook::new()));
            qb.and_where([("id", 1)]);
            qb.build().unwrap();
        });

        assert!(logs.contains("paramsql.sql"));
        assert!(logs.contains("action="));
        assert!(logs.contains("select"));
        assert!(logs.contains("param_count=1"));
        assert!(logs.contains("SELECT * FROM users WHERE id = ?"));
    }

    #[test]
    fn test_tracing_hook_truncates_and_filters_by_level() {
        let logs = capture(Level::INFO, || {
            let mut qb = QueryBuilder::table("a_rather_long_table_name");
            qb.with_hook(Arc::new(TracingHook::new().max_sql_length(10)));
            qb.build().unwrap();
        });
        // DEBUG events are filtered out at INFO.
        assert!(logs.is_empty());

        let logs = capture(Level::INFO, || {
            let mut qb = QueryBuilder::table("a_rather_long_table_name");
            qb.with_hook(Arc::new(
                TracingHook::new().level(Level::INFO).max_sql_length(10),
            ));
            qb.build().unwrap();
        });
        assert!(logs.contains("sql=SELECT * F..."));
        assert!(!logs.contains("FROM a_rather_long_table_name"));
    }

    #[test]
    fn test_tracing_hook_with_params() {
        let logs = capture(Level::DEBUG, || {
            let mut qb = QueryBuilder::table("users");
            qb.with_hook(Arc::new(TracingHook::new().no_truncate().with_params()));
            qb.and_where([("name", "zed")]);
            qb.build().unwrap();
        });
        assert!(logs.contains("params="));
        assert!(logs.contains("zed"));
    }

    #[test]
    fn test_truncate_sql_bytes_respects_char_boundary() {
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
        assert_eq!(truncate_sql_bytes("abc", 10), "abc");
    }
}
