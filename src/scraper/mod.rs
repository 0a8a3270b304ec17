//! Site adapters and source resolution. Allow-list, adapter trait, shared
//! client, and the two concrete adapters.

mod client;
mod error;

pub mod kakuyomu;
pub mod syosetu;

pub use client::{Fetch, PoliteClient, PoliteClientBuilder};
pub use error::ScraperError;

use reqwest::Url;

/// Supported source site. Each carries a canonical domain (matched exactly),
/// a base URL for resolving relative chapter links, and an output-namespace
/// label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Kakuyomu,
    Syosetu,
}

impl Site {
    /// Canonical domain; host comparison is exact and case-sensitive.
    pub fn domain(self) -> &'static str {
        match self {
            Site::Kakuyomu => "kakuyomu.jp",
            Site::Syosetu => "ncode.syosetu.com",
        }
    }

    /// Base URL for resolving relative chapter links.
    pub fn base_url(self) -> &'static str {
        match self {
            Site::Kakuyomu => "https://kakuyomu.jp",
            Site::Syosetu => "https://ncode.syosetu.com",
        }
    }

    /// Directory name under the output root for this site's artifacts.
    pub fn label(self) -> &'static str {
        match self {
            Site::Kakuyomu => "kakuyomu",
            Site::Syosetu => "syosetu",
        }
    }

    /// Exact-match lookup in the allow-list.
    pub fn from_host(host: &str) -> Option<Site> {
        match host {
            "kakuyomu.jp" => Some(Site::Kakuyomu),
            "ncode.syosetu.com" => Some(Site::Syosetu),
            _ => None,
        }
    }
}

/// Extraction capability set each site implements.
///
/// All three operations are pure functions of the HTML text. Absence of a
/// match is a value, never a panic or error: `extract_title` falls back to
/// [crate::model::UNKNOWN_TITLE], `extract_body` returns an empty string,
/// `extract_chapter_links` an empty vec.
pub trait SiteAdapter {
    /// Page title: document `<title>` minus the site suffix, then the site's
    /// heading element, then the sentinel.
    fn extract_title(&self, html: &str) -> String;

    /// Cleaned body text via the site's strategy chain, or empty when no
    /// strategy matched (callers treat empty as extraction failure).
    fn extract_body(&self, html: &str) -> String;

    /// Absolute chapter URLs: deduplicated by exact string equality and
    /// ordered by lexicographic sort of the URL string.
    fn extract_chapter_links(&self, html: &str) -> Vec<String>;
}

/// Registry: the adapter instance for a site.
pub fn adapter_for(site: Site) -> &'static dyn SiteAdapter {
    match site {
        Site::Kakuyomu => &kakuyomu::KakuyomuAdapter,
        Site::Syosetu => &syosetu::SyosetuAdapter,
    }
}

/// Classify an input URL against the allow-list. Rejects unparsable URLs,
/// any scheme but https, and hosts that do not exactly equal a registered
/// domain. Runs before any network activity.
pub fn resolve_source(url_input: &str) -> Result<Site, ScraperError> {
    let url = Url::parse(url_input).map_err(|e| ScraperError::InvalidUrl {
        input: url_input.to_string(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "https" {
        return Err(ScraperError::InsecureScheme {
            input: url_input.to_string(),
            scheme: url.scheme().to_string(),
        });
    }
    let host = url.host_str().ok_or_else(|| ScraperError::InvalidUrl {
        input: url_input.to_string(),
        reason: "URL has no host".to_string(),
    })?;
    Site::from_host(host).ok_or_else(|| ScraperError::UnsupportedHost {
        host: host.to_string(),
    })
}

/// Strip a known site suffix from the end of a document title (e.g.
/// " - カクヨム") so titles containing the separator elsewhere are preserved.
pub fn strip_title_suffix(s: &str, suffixes: &[&str]) -> String {
    let mut t = s.trim();
    for suffix in suffixes {
        if t.ends_with(suffix) {
            t = t[..t.len() - suffix.len()].trim();
            break;
        }
    }
    t.to_string()
}

/// Resolve an href (relative or absolute) against a site base URL.
/// Returns None for unparsable input.
pub(crate) fn absolutize(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_title_suffix_removes_trailing_suffix_only() {
        assert_eq!(
            strip_title_suffix("第1話 - 朝 - カクヨム", &[" - カクヨム"]),
            "第1話 - 朝"
        );
        assert_eq!(
            strip_title_suffix("転生したら - 小説家になろう", &[" - 小説家になろう"]),
            "転生したら"
        );
        assert_eq!(strip_title_suffix("no suffix here", &[" - カクヨム"]), "no suffix here");
    }

    #[test]
    fn resolve_kakuyomu() -> Result<(), ScraperError> {
        let site = resolve_source("https://kakuyomu.jp/works/16816452221055686807")?;
        assert_eq!(site, Site::Kakuyomu);
        Ok(())
    }

    #[test]
    fn resolve_syosetu() -> Result<(), ScraperError> {
        let site = resolve_source("https://ncode.syosetu.com/n4830bu/")?;
        assert_eq!(site, Site::Syosetu);
        Ok(())
    }

    #[test]
    fn resolve_rejects_http_scheme() {
        let result = resolve_source("http://kakuyomu.jp/works/1");
        match result {
            Err(ScraperError::InsecureScheme { scheme, .. }) => assert_eq!(scheme, "http"),
            other => panic!("expected InsecureScheme, got {:?}", other),
        }
    }

    #[test]
    fn resolve_rejects_unknown_host() {
        let result = resolve_source("https://example.com/works/1");
        match result {
            Err(ScraperError::UnsupportedHost { host }) => assert_eq!(host, "example.com"),
            other => panic!("expected UnsupportedHost, got {:?}", other),
        }
    }

    #[test]
    fn resolve_host_match_is_exact_not_substring() {
        // Subdomains and lookalikes are outside the allow-list.
        assert!(resolve_source("https://www.kakuyomu.jp/works/1").is_err());
        assert!(resolve_source("https://kakuyomu.jp.evil.example/works/1").is_err());
        assert!(resolve_source("https://syosetu.com/n1234ab/").is_err());
    }

    #[test]
    fn resolve_rejects_unparsable() {
        match resolve_source("not-a-url") {
            Err(ScraperError::InvalidUrl { input, .. }) => assert_eq!(input, "not-a-url"),
            other => panic!("expected InvalidUrl, got {:?}", other),
        }
    }

    #[test]
    fn absolutize_relative_and_absolute() {
        assert_eq!(
            absolutize("https://kakuyomu.jp", "/works/1/episodes/2").as_deref(),
            Some("https://kakuyomu.jp/works/1/episodes/2")
        );
        assert_eq!(
            absolutize("https://ncode.syosetu.com", "https://ncode.syosetu.com/n1234ab/1/")
                .as_deref(),
            Some("https://ncode.syosetu.com/n1234ab/1/")
        );
    }
}
