//! Data model for one crawl run.
//!
//! The crawler builds a [CrawlReport] append-only during a run; it is printed
//! as the run summary and never persisted (the file-system artifacts are the
//! durable output).

use std::path::PathBuf;

/// Title and cleaned body extracted from one fetched page.
///
/// `title` falls back to [UNKNOWN_TITLE] when no strategy matched. An empty
/// `body` means extraction failed, not an empty chapter; callers check it
/// explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub body: String,
}

/// Sentinel title when every title strategy came up empty.
pub const UNKNOWN_TITLE: &str = "unknown";

/// Outcome of one chapter attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStatus {
    /// Fetched, extracted, artifact written.
    Ok,
    /// Network or HTTP failure; no artifact.
    FetchFailed,
    /// Fetched but no body strategy matched; no artifact.
    ExtractionFailed,
}

/// One entry per attempted chapter, in discovery order.
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    /// 1-based position in the discovered link set. Artifact numbering uses
    /// this ordinal, so a failed chapter leaves a gap rather than renumbering
    /// the rest.
    pub ordinal: usize,
    pub url: String,
    pub status: ChapterStatus,
    /// Present only when the chapter page was fetched and a title strategy
    /// (or the sentinel) ran.
    pub title: Option<String>,
}

/// Outcome of one run: what was discovered, what was attempted, what was
/// written.
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub listing_url: String,
    /// Listing-page title ([UNKNOWN_TITLE] when nothing matched).
    pub title: String,
    /// Full discovered chapter-link set, deduplicated and ordered.
    pub links: Vec<String>,
    pub records: Vec<ChapterRecord>,
    /// Every file written this run, with its byte size.
    pub artifacts: Vec<(PathBuf, u64)>,
}

impl CrawlReport {
    /// Chapters that produced an artifact.
    pub fn chapters_written(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == ChapterStatus::Ok)
            .count()
    }

    /// Chapters that failed (fetch or extraction).
    pub fn chapters_failed(&self) -> usize {
        self.records.len() - self.chapters_written()
    }
}
