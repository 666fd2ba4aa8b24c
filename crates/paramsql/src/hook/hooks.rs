use super::types::{BuildContext, BuildHook, ClauseSnapshot};
use crate::builder::{Action, Built};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A no-op hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl BuildHook for NoopHook {
    fn on_build(&self, _ctx: &BuildContext<'_>) {}
}

/// Fans one build event out to several hooks, in registration order.
#[derive(Clone, Default)]
pub struct CompositeHook {
    hooks: Vec<Arc<dyn BuildHook>>,
}

impl CompositeHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook.
    pub fn add(mut self, hook: impl BuildHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Add a shared hook (keep a clone of the `Arc` to read it back later).
    pub fn add_arc(mut self, hook: Arc<dyn BuildHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for CompositeHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeHook")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl BuildHook for CompositeHook {
    fn on_build(&self, ctx: &BuildContext<'_>) {
        for hook in &self.hooks {
            hook.on_build(ctx);
        }
    }
}

/// Counts builds, in total and per action.
#[derive(Debug, Default)]
pub struct StatsHook {
    total: AtomicU64,
    select_count: AtomicU64,
    insert_count: AtomicU64,
    update_count: AtomicU64,
    delete_count: AtomicU64,
    count_count: AtomicU64,
    total_params: AtomicU64,
}

/// Snapshot of [`StatsHook`] counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub total_queries: u64,
    pub select_queries: u64,
    pub insert_queries: u64,
    pub update_queries: u64,
    pub delete_queries: u64,
    pub count_queries: u64,
    /// Sum of bind parameters over all builds.
    pub total_params: u64,
}

impl StatsHook {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, action: Action) -> &AtomicU64 {
        match action {
            Action::Select => &self.select_count,
            Action::Insert => &self.insert_count,
            Action::Update => &self.update_count,
            Action::Delete => &self.delete_count,
            Action::Count => &self.count_count,
        }
    }

    /// Get a snapshot of current statistics.
    pub fn stats(&self) -> BuildStats {
        BuildStats {
            total_queries: self.total.load(Ordering::Relaxed),
            select_queries: self.select_count.load(Ordering::Relaxed),
            insert_queries: self.insert_count.load(Ordering::Relaxed),
            update_queries: self.update_count.load(Ordering::Relaxed),
            delete_queries: self.delete_count.load(Ordering::Relaxed),
            count_queries: self.count_count.load(Ordering::Relaxed),
            total_params: self.total_params.load(Ordering::Relaxed),
        }
    }

    /// Reset all statistics.
    pub fn reset(&self) {
        for counter in [
            &self.total,
            &self.select_count,
            &self.insert_count,
            &self.update_count,
            &self.delete_count,
            &self.count_count,
            &self.total_params,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl BuildHook for StatsHook {
    fn on_build(&self, ctx: &BuildContext<'_>) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.counter(ctx.action).fetch_add(1, Ordering::Relaxed);
        self.total_params
            .fetch_add(ctx.param_count() as u64, Ordering::Relaxed);
    }
}

/// One entry kept by [`RecordingHook`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildRecord {
    /// 1-based sequence number.
    pub id: u64,
    pub action: Action,
    pub input: ClauseSnapshot,
    pub output: Built,
    /// Time since the hook was created (or last reset).
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

/// Keeps every build it sees, for debug panels and tests.
#[derive(Debug)]
pub struct RecordingHook {
    started: Mutex<Instant>,
    records: Mutex<Vec<BuildRecord>>,
    capacity: Option<usize>,
}

impl Default for RecordingHook {
    fn default() -> Self {
        Self {
            started: Mutex::new(Instant::now()),
            records: Mutex::new(Vec::new()),
            capacity: None,
        }
    }
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` records, dropping the oldest first.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn entries(&self) -> Vec<BuildRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all records and restart the clock.
    pub fn reset(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.started.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Export all records as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries())
    }
}

impl BuildHook for RecordingHook {
    fn on_build(&self, ctx: &BuildContext<'_>) {
        let elapsed = self
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed();
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let id = records.last().map_or(1, |r| r.id + 1);
        records.push(BuildRecord {
            id,
            action: ctx.action,
            input: ctx.input.clone(),
            output: ctx.output.clone(),
            elapsed,
        });
        if let Some(cap) = self.capacity {
            if records.len() > cap {
                let excess = records.len() - cap;
                records.drain(..excess);
            }
        }
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}
