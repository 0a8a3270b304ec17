//! Syosetu (ncode.syosetu.com) adapter. Works at /{ncode}/, chapters at
//! /{ncode}/{n}/.
//!
//! The body wrapper (div.p-novel__body) nests further divs of the same tag
//! name, so the counter-based balanced scan is required; the simple
//! first-close strategy would truncate at the inner wrapper's close.

use crate::extract::{balanced_scan, collect_paragraphs};
use crate::model::UNKNOWN_TITLE;
use crate::scraper::{absolutize, strip_title_suffix, SiteAdapter};
use crate::text::normalize_body;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

const BASE: &str = "https://ncode.syosetu.com";
const TITLE_SUFFIXES: &[&str] = &[" - 小説家になろう"];
const BODY_CLASS: &str = "p-novel__body";
const PARAGRAPH_CLASS: &str = "p-novel__text";
const HEADING_SELECTOR: &str = "h1.p-novel__title";

pub struct SyosetuAdapter;

fn selector(sel: &str) -> Option<Selector> {
    Selector::parse(sel).ok()
}

/// True for an ncode: 'n', then digits and lowercase letters with at least
/// one digit (e.g. n4830bu). The digit requirement keeps ordinary words
/// starting with 'n' out.
fn is_ncode(s: &str) -> bool {
    match s.strip_prefix('n') {
        Some(rest) => {
            rest.len() >= 2
                && rest.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
                && rest.bytes().any(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// True for a chapter href, relative or absolute: /{ncode}/{digits}/.
fn is_chapter_href(href: &str) -> bool {
    let path = href.strip_prefix(BASE).unwrap_or(href);
    let mut parts = path.trim_start_matches('/').trim_end_matches('/').split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(code), Some(num), None)
            if is_ncode(code) && !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit())
    )
}

impl SiteAdapter for SyosetuAdapter {
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
        balanced_scan(html, "div", BODY_CLASS)
            .or_else(|| collect_paragraphs(html, "p", PARAGRAPH_CLASS))
            .map(|raw| normalize_body(&raw))
            .unwrap_or_default()
    }

    fn extract_chapter_links(&self, html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let mut links = BTreeSet::new();
        if let Some(sel) = selector("a[href]") {
            for a in doc.select(&sel) {
                if let Some(href) = a.value().attr("href") {
                    if is_chapter_href(href) {
                        if let Some(abs) = absolutize(BASE, href) {
                            links.insert(abs);
                        }
                    }
                }
            }
        }
        links.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADAPTER: SyosetuAdapter = SyosetuAdapter;

    #[test]
    fn title_from_document_title_with_suffix_stripped() {
        let html =
            "<html><head><title>無職転生 - 小説家になろう</title></head><body></body></html>";
        assert_eq!(ADAPTER.extract_title(html), "無職転生");
    }

    #[test]
    fn title_falls_back_to_chapter_heading() {
        let html = r#"<body><h1 class="p-novel__title">プロローグ</h1></body>"#;
        assert_eq!(ADAPTER.extract_title(html), "プロローグ");
    }

    #[test]
    fn title_sentinel_when_nothing_matches() {
        assert_eq!(ADAPTER.extract_title("<body></body>"), UNKNOWN_TITLE);
    }

    #[test]
    fn body_survives_nested_divs_in_wrapper() {
        // The inner div closes first; the balanced scan must not stop there.
        let html = concat!(
            "<div class=\"p-novel__body\">\n",
            "<div class=\"js-novel-text p-novel__text\">\n",
            "<p>一文目。</p>\n",
            "<p>二文目。</p>\n",
            "</div>\n",
            "<p>あとがき</p>\n",
            "</div>"
        );
        assert_eq!(ADAPTER.extract_body(html), "一文目。\n二文目。\nあとがき");
    }

    #[test]
    fn body_falls_back_to_paragraph_class() {
        let html = r#"<p class="p-novel__text">甲</p><p class="p-novel__text">乙</p>"#;
        assert_eq!(ADAPTER.extract_body(html), "甲\n乙");
    }

    #[test]
    fn body_empty_when_no_strategy_matches() {
        assert_eq!(ADAPTER.extract_body("<div class=\"other\">x</div>"), "");
    }

    #[test]
    fn ncode_shapes() {
        assert!(is_ncode("n4830bu"));
        assert!(is_ncode("n1234"));
        assert!(!is_ncode("novelview"));
        assert!(!is_ncode("x4830bu"));
        assert!(!is_ncode("n"));
        assert!(!is_ncode("N4830BU"));
    }

    #[test]
    fn chapter_href_shapes() {
        assert!(is_chapter_href("/n4830bu/1/"));
        assert!(is_chapter_href("/n4830bu/128"));
        assert!(is_chapter_href("https://ncode.syosetu.com/n4830bu/1/"));
        assert!(!is_chapter_href("/n4830bu/"));
        assert!(!is_chapter_href("/n4830bu/1/2/"));
        assert!(!is_chapter_href("/novelview/infotop/ncode/n4830bu/"));
    }

    #[test]
    fn chapter_links_deduplicate_repeats() {
        let html = r#"
            <a href="/n4830bu/1/">first</a>
            <a href="/n4830bu/1/">first again</a>
            <a href="/n4830bu/1/">and again</a>
        "#;
        let links = ADAPTER.extract_chapter_links(html);
        assert_eq!(links, vec!["https://ncode.syosetu.com/n4830bu/1/".to_string()]);
    }

    #[test]
    fn chapter_links_lexicographic_order() {
        let html = r#"
            <a href="/n4830bu/2/">two</a>
            <a href="/n4830bu/10/">ten</a>
            <a href="/n4830bu/1/">one</a>
        "#;
        let links = ADAPTER.extract_chapter_links(html);
        assert_eq!(
            links,
            vec![
                "https://ncode.syosetu.com/n4830bu/1/".to_string(),
                "https://ncode.syosetu.com/n4830bu/10/".to_string(),
                "https://ncode.syosetu.com/n4830bu/2/".to_string(),
            ]
        );
    }
}
