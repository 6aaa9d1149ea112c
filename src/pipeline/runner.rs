//! Harvest orchestration
//!
//! The [`Harvester`] drives a run through its phases:
//!
//! 1. `Discovering` - the link frontier is built to completion across every
//!    configured discovery pass before any entry is processed
//! 2. `Processing` - entries run fetch -> extract -> build on a bounded
//!    worker pool; completed records funnel through a single writer task
//! 3. `Finalizing` - the writer is flushed and the summary reported
//! 4. `Done`
//!
//! Entry-level failures are isolated: a failed fetch or parse skips that
//! entry and the run continues. Only structural failures (no discoverable
//! entries, an unusable output file) abort the run.
//!
//! Although workers complete in wall-clock order, the writer holds
//! early-arriving records in a reorder buffer and appends strictly in
//! discovery order, so identical inputs produce byte-identical corpora.

use crate::config::Config;
use crate::output::{print_summary, CorpusWriter, Stage, Telemetry};
use crate::pipeline::extractor::extract;
use crate::pipeline::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::pipeline::frontier::{DiscoveredLink, LinkFrontier};
use crate::pipeline::record::{build_record, Record};
use crate::url::LinkPredicate;
use crate::vocab::ControlledVocabulary;
use crate::HarvestError;
use reqwest::Client;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Phases of a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Building the deduplicated entry frontier
    Discovering,
    /// Fetching, extracting, and writing entries
    Processing,
    /// Flushing output and reporting the summary
    Finalizing,
    /// Terminal; no resumption state is persisted
    Done,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovering => "discovering",
            Self::Processing => "processing",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Final accounting for a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestReport {
    /// Unique entry links discovered
    pub discovered: u64,

    /// Records written to the corpus
    pub written: u64,

    /// Entries skipped on fetch failure (non-200 or transport)
    pub skipped_fetch: u64,

    /// Entries skipped on extraction failure (missing title)
    pub skipped_parse: u64,

    /// Entries left unprocessed by a cooperative cancellation
    pub cancelled: u64,
}

impl HarvestReport {
    /// Entries that reached a terminal outcome (written or skipped)
    pub fn processed(&self) -> u64 {
        self.written + self.skipped_fetch + self.skipped_parse
    }
}

/// Per-entry processing outcome, reported to the writer task
enum EntryOutcome {
    Record(Box<Record>),
    SkippedFetch,
    SkippedParse,
}

/// One worker's result for one entry
struct EntryResult {
    idx: usize,
    outcome: EntryOutcome,
    fetch_elapsed: Duration,
    extract_elapsed: Duration,
    elapsed: Duration,
}

/// Shared read-only context for entry workers
struct WorkerContext {
    client: Client,
    category: String,
    tags: Vec<String>,
    cancel: Arc<AtomicBool>,
}

/// Orchestrates one harvest run from configuration to corpus file
pub struct Harvester {
    config: Config,
    client: Client,
    vocabulary: ControlledVocabulary,
    cancel: Arc<AtomicBool>,
    phase: RunPhase,
}

impl Harvester {
    /// Creates a harvester, loading the vocabulary and validating tags
    ///
    /// # Arguments
    ///
    /// * `config` - A validated run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - Vocabulary unusable, tags unknown, or the
    ///   HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let vocabulary = match &config.tagging.vocabulary_path {
            Some(path) => ControlledVocabulary::load_from_file(Path::new(path))
                .map_err(HarvestError::Config)?,
            None => ControlledVocabulary::builtin(),
        };

        vocabulary
            .validate_tags(&config.tagging.tags)
            .map_err(HarvestError::Config)?;

        let client = build_http_client(&config.fetch)?;

        Ok(Self {
            config,
            client,
            vocabulary,
            cancel: Arc::new(AtomicBool::new(false)),
            phase: RunPhase::Discovering,
        })
    }

    /// The controlled vocabulary in effect for this run
    pub fn vocabulary(&self) -> &ControlledVocabulary {
        &self.vocabulary
    }

    /// Current run phase
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Flag that aborts the run cooperatively when set
    ///
    /// Checked before each entry fetch; entries already in flight finish or
    /// time out on their own without corrupting the corpus.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn set_phase(&mut self, phase: RunPhase) {
        tracing::debug!("Run phase: {} -> {}", self.phase.as_str(), phase.as_str());
        self.phase = phase;
    }

    /// Runs the full pipeline and returns the final accounting
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestReport)` - Run completed (possibly with per-entry skips)
    /// * `Err(HarvestError)` - Zero entries discovered, or the corpus file
    ///   could not be created/written/flushed
    pub async fn run(&mut self) -> Result<HarvestReport, HarvestError> {
        self.set_phase(RunPhase::Discovering);
        let mut telemetry = Telemetry::new(self.config.fetch.report_every);
        let frontier = self.discover(&mut telemetry).await;

        if frontier.is_empty() {
            return Err(HarvestError::NoEntriesFound {
                seed_count: self.config.discovery.seed_count(),
            });
        }

        self.set_phase(RunPhase::Processing);
        let links = frontier.into_links();
        let total = links.len();
        tracing::info!(
            "Processing {} entries with {} concurrent fetches",
            total,
            self.config.fetch.concurrent_fetches
        );

        let writer = CorpusWriter::create(Path::new(&self.config.output.corpus_path))?;
        let (tx, rx) = mpsc::channel::<EntryResult>(self.config.fetch.concurrent_fetches * 2);
        let writer_handle = tokio::spawn(write_records(writer, rx, telemetry, total as u64));

        let context = Arc::new(WorkerContext {
            client: self.client.clone(),
            category: self.config.tagging.category.clone(),
            tags: self.config.tagging.tags.clone(),
            cancel: Arc::clone(&self.cancel),
        });
        let semaphore = Arc::new(Semaphore::new(self.config.fetch.concurrent_fetches));

        let mut workers = JoinSet::new();
        for (idx, link) in links.into_iter().enumerate() {
            let context = Arc::clone(&context);
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            workers.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                if let Some(result) = process_entry(&context, &link, idx).await {
                    // A closed channel means the writer died; its error
                    // surfaces through the writer handle below.
                    let _ = tx.send(result).await;
                }
            });
        }
        drop(tx);

        while workers.join_next().await.is_some() {}

        self.set_phase(RunPhase::Finalizing);
        let (telemetry, written, skipped_fetch, skipped_parse) = writer_handle
            .await
            .map_err(|_| HarvestError::WriterClosed)??;

        let discovered = total as u64;
        let cancelled = discovered - written - skipped_fetch - skipped_parse;
        if cancelled > 0 {
            tracing::warn!("Run cancelled with {} entries unprocessed", cancelled);
        }

        let summary = telemetry.summarize(discovered, written, skipped_fetch, skipped_parse);
        print_summary(&summary);
        tracing::info!(
            "Harvest complete: {}/{} entries written to {} in {:.2}s",
            written,
            discovered,
            self.config.output.corpus_path,
            summary.elapsed.as_secs_f64()
        );

        self.set_phase(RunPhase::Done);
        Ok(HarvestReport {
            discovered,
            written,
            skipped_fetch,
            skipped_parse,
            cancelled,
        })
    }

    /// Runs every configured discovery pass into one shared frontier
    ///
    /// A single frontier spans all passes, so a URL reachable both directly
    /// and through a section index is retained once, at its first discovery
    /// position.
    async fn discover(&self, telemetry: &mut Telemetry) -> LinkFrontier {
        let discovery = &self.config.discovery;
        let started = Instant::now();
        let entry_predicate = LinkPredicate::new(discovery.entry_markers.clone());
        let mut frontier = LinkFrontier::new();

        if !discovery.entry_seeds.is_empty() {
            frontier
                .discover_entries(&self.client, &discovery.entry_seeds, &entry_predicate)
                .await;
        }

        if !discovery.section_seeds.is_empty() {
            let section_predicate = LinkPredicate::new(discovery.section_markers.clone());
            frontier
                .discover_via_sections(
                    &self.client,
                    &discovery.section_seeds,
                    &section_predicate,
                    &entry_predicate,
                )
                .await;
        }

        telemetry.record_duration(Stage::Discovery, started.elapsed());
        telemetry.record_count(Stage::Discovery, frontier.len() as u64);
        tracing::info!(
            "Discovered {} unique entry link(s) in {:.2}s",
            frontier.len(),
            started.elapsed().as_secs_f64()
        );

        frontier
    }
}

/// Processes one entry: fetch, extract, build
///
/// Returns None when the run was cancelled before this entry started; the
/// writer then never sees its index and accounts it as unprocessed.
async fn process_entry(
    context: &WorkerContext,
    link: &DiscoveredLink,
    idx: usize,
) -> Option<EntryResult> {
    if context.cancel.load(Ordering::SeqCst) {
        return None;
    }

    let started = Instant::now();
    let url = link.url.as_str();

    let fetch_started = Instant::now();
    let fetched = fetch_page(&context.client, url).await;
    let fetch_elapsed = fetch_started.elapsed();

    let mut extract_elapsed = Duration::ZERO;
    let outcome = match fetched {
        FetchOutcome::Success { body, .. } => {
            let extract_started = Instant::now();
            let extracted = extract(&body, url);
            extract_elapsed = extract_started.elapsed();

            match extracted {
                Ok(fields) => EntryOutcome::Record(Box::new(build_record(
                    fields,
                    &context.category,
                    &context.tags,
                ))),
                Err(e) => {
                    tracing::warn!("Skipping entry {}: {}", url, e);
                    EntryOutcome::SkippedParse
                }
            }
        }
        FetchOutcome::HttpStatus { status, .. } => {
            tracing::warn!("Skipping entry {}: HTTP {}", url, status);
            EntryOutcome::SkippedFetch
        }
        FetchOutcome::Transport { error, .. } => {
            tracing::warn!("Skipping entry {}: {}", url, error);
            EntryOutcome::SkippedFetch
        }
    };

    Some(EntryResult {
        idx,
        outcome,
        fetch_elapsed,
        extract_elapsed,
        elapsed: started.elapsed(),
    })
}

/// Single writer task: appends records in discovery order
///
/// Results arrive in completion order; records are buffered until every
/// lower-indexed entry has reported, then written. Skipped entries release
/// their index without producing a line. On channel close (all workers done
/// or cancelled), any records stranded past a cancellation gap are drained
/// in index order so the partial corpus is still deterministic.
async fn write_records(
    mut writer: CorpusWriter,
    mut rx: mpsc::Receiver<EntryResult>,
    mut telemetry: Telemetry,
    total: u64,
) -> Result<(Telemetry, u64, u64, u64), HarvestError> {
    let mut pending: BTreeMap<usize, Option<Record>> = BTreeMap::new();
    let mut next_idx = 0usize;
    let mut completed = 0u64;
    let mut skipped_fetch = 0u64;
    let mut skipped_parse = 0u64;

    while let Some(result) = rx.recv().await {
        completed += 1;
        telemetry.record_duration(Stage::Fetch, result.fetch_elapsed);
        telemetry.record_duration(Stage::Extract, result.extract_elapsed);
        telemetry.record_count(Stage::Fetch, 1);

        let slot = match result.outcome {
            EntryOutcome::Record(record) => Some(*record),
            EntryOutcome::SkippedFetch => {
                skipped_fetch += 1;
                None
            }
            EntryOutcome::SkippedParse => {
                skipped_parse += 1;
                None
            }
        };
        pending.insert(result.idx, slot);

        while let Some(slot) = pending.remove(&next_idx) {
            if let Some(record) = slot {
                let write_started = Instant::now();
                writer.append(&record)?;
                telemetry.record_duration(Stage::Write, write_started.elapsed());
                telemetry.record_count(Stage::Write, 1);
            }
            next_idx += 1;
        }

        telemetry.entry_finished(completed, total, result.elapsed);
    }

    // Cancellation leaves index gaps; drain the stragglers in order.
    for (_, slot) in pending {
        if let Some(record) = slot {
            writer.append(&record)?;
            telemetry.record_count(Stage::Write, 1);
        }
    }

    let written = writer.finish()?;
    Ok((telemetry, written, skipped_fetch, skipped_parse))
}
