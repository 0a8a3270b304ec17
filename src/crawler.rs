//! Crawl orchestration: listing fetch, main-content extraction, chapter
//! discovery, and the sequential chapter download loop.
//!
//! One run walks FETCH_LISTING -> EXTRACT_MAIN -> DISCOVER_CHAPTERS ->
//! DOWNLOAD_CHAPTERS -> REPORT. Only the listing fetch and the listing
//! artifacts are fatal; each chapter fails on its own and the loop moves on.
//! Requests are strictly sequential; the client's politeness delay is the
//! spacing between them.

use crate::model::{ChapterRecord, ChapterStatus, CrawlReport, Extracted};
use crate::scraper::{adapter_for, Fetch, ScraperError, Site, SiteAdapter};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for one crawl run.
pub struct CrawlOptions<'a> {
    /// Root output directory; artifacts land under `{root}/{site label}/`.
    pub output_root: PathBuf,
    /// Cap on chapter downloads; None downloads the full discovered set.
    pub chapter_limit: Option<usize>,
    /// Called as (attempted, total) before each chapter download.
    pub progress: Option<&'a dyn Fn(u32, u32)>,
}

/// Listing-page artifact: raw HTML, overwritten each run.
const LISTING_FILE: &str = "index.html";
/// Extracted listing body, written only when extraction matched.
const CONTENT_FILE: &str = "content.txt";

fn chapter_file(ordinal: usize) -> String {
    format!("chapter_{:03}.txt", ordinal)
}

fn extract(adapter: &dyn SiteAdapter, html: &str) -> Extracted {
    Extracted {
        title: adapter.extract_title(html),
        body: adapter.extract_body(html),
    }
}

/// Write one artifact and record its path and size in the report.
fn write_artifact(
    dir: &Path,
    name: &str,
    contents: &str,
    report: &mut CrawlReport,
) -> Result<(), ScraperError> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|e| ScraperError::WriteArtifact {
        path: path.clone(),
        source: e,
    })?;
    report.artifacts.push((path, contents.len() as u64));
    Ok(())
}

/// Run one crawl against an already-resolved source.
///
/// Fatal errors: listing fetch, output-directory creation, and the listing
/// artifacts. Everything per-chapter is recovered, logged to stderr with the
/// chapter ordinal, and recorded in the returned report.
pub fn run_crawl<F: Fetch>(
    site: Site,
    url: &str,
    fetcher: &mut F,
    options: &CrawlOptions<'_>,
) -> Result<CrawlReport, ScraperError> {
    let adapter = adapter_for(site);
    let dir = options.output_root.join(site.label());

    let mut report = CrawlReport {
        listing_url: url.to_string(),
        ..CrawlReport::default()
    };

    // FETCH_LISTING: the one fetch nothing downstream can do without.
    let listing_html = fetcher.fetch(url, Some("listing page"))?;
    fs::create_dir_all(&dir).map_err(|e| ScraperError::CreateDir {
        path: dir.clone(),
        source: e,
    })?;
    write_artifact(&dir, LISTING_FILE, &listing_html, &mut report)?;

    // EXTRACT_MAIN
    let main = extract(adapter, &listing_html);
    report.title = main.title;
    if main.body.is_empty() {
        eprintln!("No main content matched on the listing page; {} not written.", CONTENT_FILE);
    } else {
        write_artifact(&dir, CONTENT_FILE, &main.body, &mut report)?;
    }

    // DISCOVER_CHAPTERS: an empty set means the listing page is the sole
    // content unit and the run is already complete.
    report.links = adapter.extract_chapter_links(&listing_html);
    if report.links.is_empty() {
        return Ok(report);
    }

    // DOWNLOAD_CHAPTERS: ordinals follow discovery order even when capped or
    // when a chapter fails, so artifact numbers identify chapters stably.
    let total = match options.chapter_limit {
        Some(limit) => report.links.len().min(limit),
        None => report.links.len(),
    };
    let selected: Vec<String> = report.links.iter().take(total).cloned().collect();
    for (i, chapter_url) in selected.iter().enumerate() {
        let ordinal = i + 1;
        if let Some(ref p) = options.progress {
            p(ordinal as u32, total as u32);
        }

        let chapter_html = match fetcher.fetch(chapter_url, Some(&format!("chapter {}", ordinal))) {
            Ok(html) => html,
            Err(e) => {
                eprintln!("Chapter {}: {}. Skipped.", ordinal, e);
                report.records.push(ChapterRecord {
                    ordinal,
                    url: chapter_url.clone(),
                    status: ChapterStatus::FetchFailed,
                    title: None,
                });
                continue;
            }
        };

        let chapter = extract(adapter, &chapter_html);
        if chapter.body.is_empty() {
            eprintln!(
                "Chapter {}: no body strategy matched at {}. Skipped.",
                ordinal, chapter_url
            );
            report.records.push(ChapterRecord {
                ordinal,
                url: chapter_url.clone(),
                status: ChapterStatus::ExtractionFailed,
                title: Some(chapter.title),
            });
            continue;
        }

        let name = chapter_file(ordinal);
        if let Err(e) = write_artifact(&dir, &name, &chapter.body, &mut report) {
            eprintln!("Chapter {}: {}. Skipped.", ordinal, e);
            report.records.push(ChapterRecord {
                ordinal,
                url: chapter_url.clone(),
                status: ChapterStatus::ExtractionFailed,
                title: Some(chapter.title),
            });
            continue;
        }
        report.records.push(ChapterRecord {
            ordinal,
            url: chapter_url.clone(),
            status: ChapterStatus::Ok,
            title: Some(chapter.title),
        });
    }

    Ok(report)
}
