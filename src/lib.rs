//! novelgrab: CLI downloader for Kakuyomu and Syosetu web novels, outputting
//! plain text per chapter.

pub mod cli;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod scraper;
pub mod text;

// Re-exports for CLI and consumers.
pub use crawler::{run_crawl, CrawlOptions};
pub use model::{ChapterRecord, ChapterStatus, CrawlReport, Extracted, UNKNOWN_TITLE};
pub use scraper::{
    adapter_for, resolve_source, Fetch, PoliteClient, PoliteClientBuilder, ScraperError, Site,
    SiteAdapter,
};
