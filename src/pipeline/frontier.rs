//! Link frontier: discovery and deduplication of entry URLs
//!
//! Discovery walks one or more seed pages, resolves every anchor against the
//! page it was found on, filters with a [`LinkPredicate`], and accumulates
//! the survivors in an ordered, deduplicated frontier. Two depths are
//! supported:
//!
//! - direct: seed page -> entry pages
//! - sectioned: seed page -> section-index pages -> entry pages
//!
//! Both depths (and repeated calls) share one `seen` set, so a URL reachable
//! through several seeds or passes enters the frontier exactly once, at its
//! first discovery position.

use crate::pipeline::fetcher::{fetch_page, FetchOutcome};
use crate::url::{resolve_href, LinkPredicate};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// An entry URL together with the page it was first discovered under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Absolute URL of the entry page
    pub url: Url,

    /// URL of the seed or section page that linked to it
    pub origin: String,
}

/// Ordered, deduplicated set of discovered entry links
#[derive(Debug, Default)]
pub struct LinkFrontier {
    seen: HashSet<String>,
    links: Vec<DiscoveredLink>,
}

impl LinkFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a link, returning true if it was not already present
    ///
    /// First discovery wins: a duplicate insert leaves the original position
    /// and origin untouched.
    pub fn insert(&mut self, url: Url, origin: &str) -> bool {
        if !self.seen.insert(url.as_str().to_string()) {
            return false;
        }
        self.links.push(DiscoveredLink {
            url,
            origin: origin.to_string(),
        });
        true
    }

    /// Number of unique links discovered so far
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The discovered links in first-discovery order
    pub fn links(&self) -> &[DiscoveredLink] {
        &self.links
    }

    /// Consumes the frontier, yielding links in first-discovery order
    pub fn into_links(self) -> Vec<DiscoveredLink> {
        self.links
    }

    /// Depth (a): scans seed pages whose anchors link directly to entries
    ///
    /// Each seed is fetched and parsed; anchors resolving to URLs that match
    /// `entry` are inserted. A seed that fails to fetch or parse is logged
    /// and skipped; remaining seeds still contribute.
    pub async fn discover_entries(
        &mut self,
        client: &Client,
        seeds: &[String],
        entry: &LinkPredicate,
    ) {
        for seed in seeds {
            let Some((base, anchors)) = scan_page(client, seed).await else {
                continue;
            };

            let before = self.len();
            for url in anchors {
                if entry.matches(url.as_str()) {
                    self.insert(url, base.as_str());
                }
            }
            tracing::debug!(
                "Seed {} contributed {} new entry link(s)",
                seed,
                self.len() - before
            );
        }
    }

    /// Depth (b): scans seed pages for section indexes, then sections for entries
    ///
    /// Section pages found under multiple seeds are scanned once per run;
    /// entry links dedup through the same frontier as every other pass.
    pub async fn discover_via_sections(
        &mut self,
        client: &Client,
        seeds: &[String],
        section: &LinkPredicate,
        entry: &LinkPredicate,
    ) {
        let mut section_pages: Vec<Url> = Vec::new();
        let mut section_seen: HashSet<String> = HashSet::new();

        for seed in seeds {
            let Some((_, anchors)) = scan_page(client, seed).await else {
                continue;
            };

            for url in anchors {
                if section.matches(url.as_str()) && section_seen.insert(url.as_str().to_string()) {
                    section_pages.push(url);
                }
            }
        }

        tracing::info!("Discovered {} section page(s)", section_pages.len());

        for section_url in &section_pages {
            let Some((base, anchors)) = scan_page(client, section_url.as_str()).await else {
                continue;
            };

            for url in anchors {
                if entry.matches(url.as_str()) {
                    self.insert(url, base.as_str());
                }
            }
        }
    }
}

/// Fetches a page and returns its base URL plus all resolvable anchor URLs
///
/// Returns None on any fetch or URL failure; the failure is logged here so
/// callers can simply continue with their remaining pages.
async fn scan_page(client: &Client, page_url: &str) -> Option<(Url, Vec<Url>)> {
    let base = match Url::parse(page_url) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Skipping malformed discovery URL {}: {}", page_url, e);
            return None;
        }
    };

    match fetch_page(client, page_url).await {
        FetchOutcome::Success { body, .. } => {
            let anchors = collect_anchors(&body, &base);
            Some((base, anchors))
        }
        FetchOutcome::HttpStatus { status, .. } => {
            tracing::warn!("Discovery page {} returned HTTP {}", page_url, status);
            None
        }
        FetchOutcome::Transport { error, .. } => {
            tracing::warn!("Discovery page {} unreachable: {}", page_url, error);
            None
        }
    }
}

/// Extracts all anchor hrefs from an HTML body, resolved against `base`
fn collect_anchors(body: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(body);
    let mut anchors = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_href(href, base) {
                    anchors.push(url);
                }
            }
        }
    }

    anchors
}
