//! Run counters.
//!
//! A [`Stats`] is created once per scan and handed by reference to every
//! stage that counts work. Increments are atomic so files may be processed
//! on several threads at once. [`Stats::stop`] freezes the counters into a
//! [`StatsReport`] for the summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Live counters for one scan.
#[derive(Debug)]
pub struct Stats {
    started_at: DateTime<Utc>,
    started: Instant,
    files: AtomicUsize,
    modules: AtomicUsize,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    /// Start counting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
            files: AtomicUsize::new(0),
            modules: AtomicUsize::new(0),
        }
    }

    /// Record one processed file.
    pub fn add_file(&self) {
        self.files.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the classified modules of one file.
    pub fn add_modules(&self, count: usize) {
        self.modules.fetch_add(count, Ordering::Relaxed);
    }

    /// Files processed so far.
    #[must_use]
    pub fn files(&self) -> usize {
        self.files.load(Ordering::Relaxed)
    }

    /// Modules classified so far.
    #[must_use]
    pub fn modules(&self) -> usize {
        self.modules.load(Ordering::Relaxed)
    }

    /// Freeze the counters and compute the run duration.
    #[must_use]
    pub fn stop(&self) -> StatsReport {
        StatsReport {
            files: self.files(),
            modules: self.modules(),
            started_at: Some(self.started_at),
            ended_at: Some(Utc::now()),
            duration_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Finalized counters of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Files processed
    pub files: usize,
    /// Modules classified
    pub modules: usize,
    /// When counting started
    pub started_at: Option<DateTime<Utc>>,
    /// When the counters were frozen
    pub ended_at: Option<DateTime<Utc>>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl StatsReport {
    /// One line summary of the counters.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Number of Files: {}. Number of Modules {}", self.files, self.modules)
    }

    /// Human readable duration, e.g. "1.234s".
    #[must_use]
    pub fn took(&self) -> String {
        format!("{:.3}s", std::time::Duration::from_millis(self.duration_ms).as_secs_f64())
    }

    /// Fold another run's counters into this one, widening the time window.
    pub fn merge(&mut self, other: &Self) {
        self.files += other.files;
        self.modules += other.modules;
        self.started_at = match (self.started_at, other.started_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.ended_at = match (self.ended_at, other.ended_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.duration_ms += other.duration_ms;
    }
}
