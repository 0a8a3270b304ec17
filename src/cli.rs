//! CLI parsing and the run boundary. Parses args, resolves the source, runs
//! the crawl, prints the summary. Maps errors to exit codes.

use crate::config;
use crate::crawler::{run_crawl, CrawlOptions};
use crate::model::CrawlReport;
use crate::scraper::{resolve_source, PoliteClient, ScraperError};
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default chapter-download cap when neither --limit nor --all is given.
/// Conservative sample mode; use --all for the full set.
const DEFAULT_CHAPTER_LIMIT: usize = 3;
const DEFAULT_OUTPUT_DIR: &str = "out";

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Scraper(#[from] ScraperError),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Scraper(_) => 2,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "novelgrab")]
#[command(about = "Download a Kakuyomu or Syosetu novel as plain-text chapter files")]
#[command(
    after_help = "Config file keys (output_dir, user_agent, request_delay_secs, timeout_secs, chapter_limit) live in novelgrab.toml. CLI flags override config."
)]
pub struct Args {
    /// Work URL (Kakuyomu work page or Syosetu novel page).
    pub url: String,

    /// Root output directory. Artifacts land under {dir}/{site}/. Default: ./out.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Download at most N chapters (default 3).
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Download every discovered chapter (overrides --limit).
    #[arg(long)]
    pub all: bool,

    /// Delay between requests in seconds (overrides config; default 1).
    #[arg(long)]
    pub delay: Option<u64>,

    /// Request timeout in seconds (overrides config; default: none).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// HTTP User-Agent (overrides config).
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Suppress progress and summary output (errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Print verbose error chain.
    #[arg(long)]
    pub verbose: bool,
}

fn print_summary(report: &CrawlReport) {
    println!("Title: {}", report.title);
    println!("Chapters discovered: {}", report.links.len());
    for url in &report.links {
        println!("  {}", url);
    }
    if !report.records.is_empty() {
        println!(
            "Chapters written: {} ({} failed)",
            report.chapters_written(),
            report.chapters_failed()
        );
    }
    println!("Artifacts:");
    for (path, size) in &report.artifacts {
        println!("  {} ({} bytes)", path.display(), size);
    }
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
///
/// A run that completes with individual chapter failures is still a success:
/// those failures are scoped per chapter and already reported on stderr.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let site = resolve_source(&args.url).map_err(|e| match &e {
        ScraperError::InvalidUrl { input, reason } => CliRunError::InvalidInput(format!(
            "Expected a work URL. Example: https://kakuyomu.jp/works/12345... Invalid: {}: {}",
            input, reason
        )),
        ScraperError::InsecureScheme { .. } | ScraperError::UnsupportedHost { .. } => {
            CliRunError::InvalidInput(e.to_string())
        }
        _ => CliRunError::Scraper(e),
    })?;

    let config = config::load_config().map_err(CliRunError::InvalidInput)?;

    let output_root: PathBuf = args
        .output
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let delay_secs = args
        .delay
        .or_else(|| config.as_ref().and_then(|c| c.request_delay_secs));
    let timeout_secs = args
        .timeout
        .or_else(|| config.as_ref().and_then(|c| c.timeout_secs));
    let user_agent = args
        .user_agent
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.user_agent.clone()));

    let mut builder = PoliteClient::builder();
    if let Some(secs) = delay_secs {
        builder = builder.delay_secs(secs);
    }
    if let Some(secs) = timeout_secs {
        builder = builder.timeout_secs(secs);
    }
    if let Some(ua) = user_agent {
        builder = builder.user_agent(ua);
    }
    let mut client = builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))?;

    let chapter_limit = if args.all {
        None
    } else {
        Some(
            args.limit
                .or_else(|| config.as_ref().and_then(|c| c.chapter_limit))
                .unwrap_or(DEFAULT_CHAPTER_LIMIT),
        )
    };

    let progress_state: RefCell<Option<indicatif::ProgressBar>> = RefCell::new(None);
    let progress_cb = |n: u32, total: u32| {
        if total == 0 {
            return;
        }
        let mut state = progress_state.borrow_mut();
        let pb = state.get_or_insert_with(|| {
            let bar = indicatif::ProgressBar::new(total as u64);
            bar.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template("{spinner} {msg} [{bar:40}] {pos}/{len} ({elapsed})")
                    .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
            );
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        pb.set_position(n as u64);
        pb.set_message(format!("Fetching chapter {}/{}", n, total));
    };
    let progress: Option<&dyn Fn(u32, u32)> = if args.quiet { None } else { Some(&progress_cb) };

    let crawl_opts = CrawlOptions {
        output_root,
        chapter_limit,
        progress,
    };
    let report = run_crawl(site, &args.url, &mut client, &crawl_opts)?;

    if let Some(pb) = progress_state.borrow_mut().take() {
        pb.disable_steady_tick();
        pb.finish_and_clear();
    }

    if !args.quiet {
        print_summary(&report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_run_error_exit_codes() {
        assert_eq!(CliRunError::InvalidInput("x".into()).exit_code(), 1);
        assert_eq!(
            CliRunError::Scraper(ScraperError::UnsupportedHost { host: "x".into() }).exit_code(),
            2
        );
    }

    #[test]
    fn args_require_url() {
        assert!(Args::try_parse_from(["novelgrab"]).is_err());
    }

    #[test]
    fn args_parse_url_and_flags() {
        let args =
            Args::try_parse_from(["novelgrab", "https://kakuyomu.jp/works/1", "--all", "-q"])
                .expect("parse");
        assert_eq!(args.url, "https://kakuyomu.jp/works/1");
        assert!(args.all);
        assert!(args.quiet);
        assert!(args.limit.is_none());
    }

    #[test]
    fn args_limit_flag() {
        let args = Args::try_parse_from([
            "novelgrab",
            "https://ncode.syosetu.com/n1234ab/",
            "--limit",
            "7",
        ])
        .expect("parse");
        assert_eq!(args.limit, Some(7));
        assert!(!args.all);
    }

    #[test]
    fn help_short_circuits_with_display_help() {
        let err = Args::try_parse_from(["novelgrab", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn run_rejects_unsupported_host_as_invalid_input() {
        let args = Args::try_parse_from(["novelgrab", "https://example.com/works/1", "-q"])
            .expect("parse");
        match run(&args) {
            Err(e @ CliRunError::InvalidInput(_)) => assert_eq!(e.exit_code(), 1),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn run_rejects_http_scheme_as_invalid_input() {
        let args = Args::try_parse_from(["novelgrab", "http://kakuyomu.jp/works/1", "-q"])
            .expect("parse");
        match run(&args) {
            Err(CliRunError::InvalidInput(msg)) => assert!(msg.contains("non-https")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }
}
