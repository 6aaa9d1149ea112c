//! The crawl-and-extract pipeline
//!
//! This module contains the core ingestion logic, including:
//! - HTTP fetching with outcome classification
//! - Link discovery and frontier deduplication
//! - Field extraction with sentinel fallbacks
//! - Record construction
//! - Run orchestration across a bounded worker pool

pub mod extractor;
mod fetcher;
mod frontier;
pub mod record;
mod runner;

pub use extractor::{extract, ExtractedFields, NOT_AVAILABLE};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use frontier::{DiscoveredLink, LinkFrontier};
pub use record::{build_record, leading_sentence, Record};
pub use runner::{Harvester, HarvestReport, RunPhase};
