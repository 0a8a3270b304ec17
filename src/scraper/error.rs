//! Shared error type for URL resolution, fetching, and artifact output.

use std::path::PathBuf;
use thiserror::Error;

/// Error for source resolution, HTTP, and the crawl's fatal file operations.
///
/// Per-chapter failures are not represented here: the crawler recovers them
/// locally and records them in the run report instead of propagating.
#[derive(Debug, Error)]
pub enum ScraperError {
    // URL validation
    #[error("Invalid URL: {input}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Refusing non-https URL (scheme '{scheme}'): {input}")]
    InsecureScheme { input: String, scheme: String },

    #[error("Unsupported host '{host}'. Supported: kakuyomu.jp, ncode.syosetu.com.")]
    UnsupportedHost { host: String },

    // HTTP and network
    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus {
        status: u16,
        url: String,
        /// Optional context (e.g. "listing page", "chapter 5") for programmatic use.
        context: Option<String>,
    },

    #[error("Failed to read response body: {source}")]
    BodyRead { source: reqwest::Error },

    // Artifact output (fatal only for the output directory and the listing
    // artifacts; chapter write failures are recovered per chapter)
    #[error("Cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
