//! Kakuyomu adapter. Work pages at /works/{id}, episodes at
//! /works/{id}/episodes/{id}.
//!
//! The episode body wrapper (div.widget-episodeBody) does not nest further
//! divs, so the simple delimiter strategy is the robust case here; the
//! per-sentence paragraph collection is the last resort.

use crate::extract::{collect_paragraphs, delimiter_chain};
use crate::model::UNKNOWN_TITLE;
use crate::scraper::{absolutize, strip_title_suffix, SiteAdapter};
use crate::text::normalize_body;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

const BASE: &str = "https://kakuyomu.jp";
const TITLE_SUFFIXES: &[&str] = &[" - カクヨム"];
const BODY_CLASS: &str = "widget-episodeBody";
const SENTENCE_CLASS: &str = "js-episode-sentence";
const HEADING_SELECTOR: &str = ".widget-episodeTitle";

pub struct KakuyomuAdapter;

/// Parse a fixed selector literal; None means the literal itself is bad, and
/// the strategy chain falls through instead of panicking.
fn selector(sel: &str) -> Option<Selector> {
    Selector::parse(sel).ok()
}

/// True for an episode href, relative or absolute: /works/{digits}/episodes/{digits}.
/// Matches any work id, not one specific work.
fn is_episode_href(href: &str) -> bool {
    let path = href.strip_prefix(BASE).unwrap_or(href);
    let mut parts = path.trim_start_matches('/').trim_end_matches('/').split('/');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next(), parts.next()),
        (Some("works"), Some(work), Some("episodes"), Some(ep), None)
            if !work.is_empty() && work.bytes().all(|b| b.is_ascii_digit())
                && !ep.is_empty() && ep.bytes().all(|b| b.is_ascii_digit())
    )
}

impl SiteAdapter for KakuyomuAdapter {
    fn extract_title(&self, html: &str) -> String {
        let doc = Html::parse_document(html);
        selector("title")
            .and_then(|sel| doc.select(&sel).next())
            .map(|e| strip_title_suffix(e.text().collect::<String>().trim(), TITLE_SUFFIXES))
            .filter(|s| !s.is_empty())
            .or_else(|| {
                selector(HEADING_SELECTOR)
                    .and_then(|sel| doc.select(&sel).next())
                    .map(|e| e.text().collect::<String>().trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }

    fn extract_body(&self, html: &str) -> String {
        delimiter_chain(html, "div", BODY_CLASS)
            .or_else(|| collect_paragraphs(html, "p", SENTENCE_CLASS))
            .map(|raw| normalize_body(&raw))
            .unwrap_or_default()
    }

    fn extract_chapter_links(&self, html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let mut links = BTreeSet::new();
        if let Some(sel) = selector("a[href]") {
            for a in doc.select(&sel) {
                if let Some(href) = a.value().attr("href") {
                    if is_episode_href(href) {
                        if let Some(abs) = absolutize(BASE, href) {
                            links.insert(abs);
                        }
                    }
                }
            }
        }
        // BTreeSet gives exact-string dedup and lexicographic URL order.
        links.into_iter().collect()
    }
}
