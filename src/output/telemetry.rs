//! Run telemetry: stage timing, progress cadence, final summary
//!
//! Telemetry is purely observational. It accumulates per-stage durations and
//! counts, emits a progress line at a fixed entry cadence, and produces the
//! end-of-run summary. Nothing here influences pipeline control flow or the
//! corpus content.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Pipeline stages tracked by telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Seed/section scanning and link collection
    Discovery,
    /// Entry page retrieval
    Fetch,
    /// Field extraction and record construction
    Extract,
    /// Corpus line serialization and append
    Write,
}

/// Accumulates stage timings and counts for one harvest run
#[derive(Debug)]
pub struct Telemetry {
    report_every: u64,
    started: Instant,
    started_at: DateTime<Utc>,
    durations: HashMap<Stage, Duration>,
    counts: HashMap<Stage, u64>,
}

impl Telemetry {
    /// Creates telemetry reporting progress every `report_every` entries
    pub fn new(report_every: u64) -> Self {
        Self {
            report_every: report_every.max(1),
            started: Instant::now(),
            started_at: Utc::now(),
            durations: HashMap::new(),
            counts: HashMap::new(),
        }
    }

    /// Adds an observed duration to a stage's running total
    pub fn record_duration(&mut self, stage: Stage, elapsed: Duration) {
        *self.durations.entry(stage).or_default() += elapsed;
    }

    /// Adds `n` to a stage's running count
    pub fn record_count(&mut self, stage: Stage, n: u64) {
        *self.counts.entry(stage).or_insert(0) += n;
    }

    /// Total accumulated duration for a stage
    pub fn duration(&self, stage: Stage) -> Duration {
        self.durations.get(&stage).copied().unwrap_or_default()
    }

    /// Total accumulated count for a stage
    pub fn count(&self, stage: Stage) -> u64 {
        self.counts.get(&stage).copied().unwrap_or(0)
    }

    /// Logs per-entry timing and a cadence progress line
    ///
    /// Every entry gets a debug line; every `report_every`-th completion gets
    /// an info line with the running rate, mirroring the corpus scraper this
    /// pipeline grew out of.
    pub fn entry_finished(&self, completed: u64, total: u64, entry_elapsed: Duration) {
        tracing::debug!(
            "Processed entry {}/{} in {:.2}s",
            completed,
            total,
            entry_elapsed.as_secs_f64()
        );

        if completed % self.report_every == 0 || completed == total {
            let elapsed = self.started.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                completed as f64 / elapsed
            } else {
                0.0
            };
            tracing::info!(
                "Progress: {}/{} entries, {:.2} entries/sec",
                completed,
                total,
                rate
            );
        }
    }

    /// Produces the final run summary from the accumulated counters
    pub fn summarize(
        &self,
        discovered: u64,
        written: u64,
        skipped_fetch: u64,
        skipped_parse: u64,
    ) -> RunSummary {
        RunSummary {
            started_at: self.started_at,
            finished_at: Utc::now(),
            elapsed: self.started.elapsed(),
            discovered,
            written,
            skipped_fetch,
            skipped_parse,
            fetch_time: self.duration(Stage::Fetch),
            discovery_time: self.duration(Stage::Discovery),
        }
    }
}

/// Final statistics for a completed harvest run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,

    /// Unique entry links found during discovery
    pub discovered: u64,

    /// Records appended to the corpus
    pub written: u64,

    /// Entries skipped on fetch failure (non-200 or transport)
    pub skipped_fetch: u64,

    /// Entries skipped on extraction failure (missing title)
    pub skipped_parse: u64,

    /// Accumulated entry fetch time across workers
    pub fetch_time: Duration,

    /// Wall-clock time spent in discovery
    pub discovery_time: Duration,
}

impl RunSummary {
    /// Total entries skipped for any reason
    pub fn skipped(&self) -> u64 {
        self.skipped_fetch + self.skipped_parse
    }

    /// Written records per wall-clock second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.written as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints the run summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Run:");
    println!("  Started:  {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Elapsed:  {:.2}s", summary.elapsed.as_secs_f64());
    println!();

    println!("Entries:");
    println!("  Discovered: {}", summary.discovered);
    println!("  Written:    {}", summary.written);
    println!(
        "  Skipped:    {} ({} fetch, {} parse)",
        summary.skipped(),
        summary.skipped_fetch,
        summary.skipped_parse
    );
    println!();

    println!("Timing:");
    println!(
        "  Discovery:  {:.2}s",
        summary.discovery_time.as_secs_f64()
    );
    println!("  Fetch:      {:.2}s total", summary.fetch_time.as_secs_f64());
    println!("  Throughput: {:.2} entries/sec", summary.throughput());
}
