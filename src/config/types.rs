use serde::Deserialize;

/// Main configuration structure for a harvest run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    pub discovery: DiscoveryConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub tagging: TaggingConfig,
}

/// HTTP fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Overall request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Number of entry pages fetched concurrently
    #[serde(rename = "concurrent-fetches", default = "default_concurrent_fetches")]
    pub concurrent_fetches: usize,

    /// Emit a progress line every N processed entries
    #[serde(rename = "report-every", default = "default_report_every")]
    pub report_every: u64,
}

/// Link discovery configuration
///
/// Two discovery depths are supported and may be combined: `entry-seeds`
/// pages link directly to entry pages, while `section-seeds` pages link to
/// section indexes whose anchors are in turn scanned for entry links. All
/// passes share one deduplicated frontier.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Seed pages whose anchors are entry links
    #[serde(rename = "entry-seeds", default)]
    pub entry_seeds: Vec<String>,

    /// Seed pages whose anchors are section-index links
    #[serde(rename = "section-seeds", default)]
    pub section_seeds: Vec<String>,

    /// Substrings a URL must contain to count as an entry link
    #[serde(rename = "entry-markers")]
    pub entry_markers: Vec<String>,

    /// Substrings a URL must contain to count as a section-index link
    #[serde(rename = "section-markers", default)]
    pub section_markers: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the line-delimited JSON corpus file
    #[serde(rename = "corpus-path")]
    pub corpus_path: String,
}

/// Tag assignment configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TaggingConfig {
    /// Category label stamped on every record of the run
    #[serde(default = "default_category")]
    pub category: String,

    /// Thematic tags assigned to every record of the run
    ///
    /// Must all belong to the controlled vocabulary.
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,

    /// Optional TOML file replacing the built-in vocabulary
    #[serde(rename = "vocabulary-path", default)]
    pub vocabulary_path: Option<String>,
}

fn default_user_agent() -> String {
    format!("etcsl-harvest/{} (corpus ingestion)", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_concurrent_fetches() -> usize {
    4
}

fn default_report_every() -> u64 {
    10
}

fn default_category() -> String {
    "Mythology".to_string()
}

fn default_tags() -> Vec<String> {
    vec![
        "Justice".to_string(),
        "Freedom".to_string(),
        "Innovation".to_string(),
    ]
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            concurrent_fetches: default_concurrent_fetches(),
            report_every: default_report_every(),
        }
    }
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            category: default_category(),
            tags: default_tags(),
            vocabulary_path: None,
        }
    }
}

impl DiscoveryConfig {
    /// Total number of seed pages across both discovery depths
    pub fn seed_count(&self) -> usize {
        self.entry_seeds.len() + self.section_seeds.len()
    }
}
