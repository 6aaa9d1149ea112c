//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests for seed, section, and entry pages
//! - Outcome classification (success / non-200 / transport failure)
//!
//! A fetch is a single attempt: no retries are performed here. Retry policy,
//! if a caller wants one, belongs to the caller.

use crate::config::FetchConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
///
/// Only `Success` carries page content, and only status-200 responses become
/// `Success`; everything else is a recoverable per-page failure that the
/// orchestrator logs and skips.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Status 200 with the body captured
    Success {
        /// The URL that was fetched
        url: String,
        /// HTTP status code (always 200)
        status: u16,
        /// Page body content
        body: String,
    },

    /// Response received but with a non-200 status
    HttpStatus {
        /// The URL that was fetched
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// Transport failure (connection refused, timeout, TLS error, ...)
    Transport {
        /// The URL that was fetched
        url: String,
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Returns true if this outcome carries usable page content
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The URL this outcome refers to
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::HttpStatus { url, .. } | Self::Transport { url, .. } => {
                url
            }
        }
    }
}

/// Builds the HTTP client used for every request of a run
///
/// # Arguments
///
/// * `config` - The fetch configuration (user agent, timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET attempt and classifies the outcome
///
/// # Outcome classification
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 200 | Success, body captured |
/// | Any other status | HttpStatus (recoverable, caller skips) |
/// | Timeout | Transport "request timeout" |
/// | Connection refused / DNS / TLS | Transport "connection failed" |
/// | Body read failure | Transport with the underlying error |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The absolute URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();

            if status != StatusCode::OK {
                return FetchOutcome::HttpStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchOutcome::Success {
                    url: url.to_string(),
                    status: status.as_u16(),
                    body,
                },
                Err(e) => FetchOutcome::Transport {
                    url: url.to_string(),
                    error: format!("failed to read body: {}", e),
                },
            }
        }
        Err(e) => {
            // Classify transport errors for readable skip logs
            let error = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                "connection failed".to_string()
            } else {
                e.to_string()
            };

            FetchOutcome::Transport {
                url: url.to_string(),
                error,
            }
        }
    }
}
