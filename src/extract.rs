//! Body-extraction strategies shared by the site adapters.
//!
//! These operate on raw HTML text with an explicit tag-occurrence counter
//! rather than a parse tree, because the supported sites serve markup that
//! real parsers "repair" in ways that move the content boundary. Known
//! limitations: self-closing tags, comments, and attributes containing
//! tag-like substrings are not understood. Adapters try strategies in order
//! and take the first match.

/// True when `html[at..]` starts an opening tag of `tag` (or a closing tag
/// when `closing` is set). The character after the tag name must end the
/// name, so `div` never matches `<divider`.
fn is_tag_at(html: &str, at: usize, tag: &str, closing: bool) -> bool {
    let rest = &html[at..];
    let prefix_len = if closing {
        if !rest.starts_with("</") {
            return false;
        }
        2
    } else {
        if !rest.starts_with('<') || rest.starts_with("</") {
            return false;
        }
        1
    };
    let after = &rest[prefix_len..];
    if !after.starts_with(tag) {
        return false;
    }
    match after[tag.len()..].chars().next() {
        Some(c) => !(c.is_ascii_alphanumeric() || c == '-'),
        None => false,
    }
}

/// True when the opening-tag markup (everything between `<` and `>`) carries
/// `class` as a whole token of its class attribute.
fn has_class(tag_markup: &str, class: &str) -> bool {
    for quote in ['"', '\''] {
        let needle = format!("class={}", quote);
        if let Some(start) = tag_markup.find(&needle) {
            let value_start = start + needle.len();
            let value = match tag_markup[value_start..].find(quote) {
                Some(end) => &tag_markup[value_start..value_start + end],
                None => &tag_markup[value_start..],
            };
            return value.split_whitespace().any(|t| t == class);
        }
    }
    false
}

/// Locate the first opening `tag` carrying `class`. Returns the byte offset
/// just past the opening tag's `>`.
fn find_marker(html: &str, tag: &str, class: &str) -> Option<usize> {
    let mut idx = 0;
    while let Some(rel) = html[idx..].find('<') {
        let at = idx + rel;
        if is_tag_at(html, at, tag, false) {
            if let Some(gt_rel) = html[at..].find('>') {
                if has_class(&html[at..at + gt_rel], class) {
                    return Some(at + gt_rel + 1);
                }
            }
        }
        idx = at + 1;
    }
    None
}

/// Byte offset of the first closing `tag` at or after `from`.
fn find_closing(html: &str, from: usize, tag: &str) -> Option<usize> {
    let mut idx = from;
    while let Some(rel) = html[idx..].find('<') {
        let at = idx + rel;
        if is_tag_at(html, at, tag, true) {
            return Some(at);
        }
        idx = at + 1;
    }
    None
}

/// Simple boundary: content of the first `tag` carrying `class`, up to that
/// tag name's first closing tag. Under-counts when the wrapper nests further
/// elements of the same tag name; use [balanced_scan] for those sites.
pub fn delimiter_chain(html: &str, tag: &str, class: &str) -> Option<String> {
    let content_start = find_marker(html, tag, class)?;
    let end = find_closing(html, content_start, tag)?;
    Some(html[content_start..end].to_string())
}

/// Counter-based boundary: starting at the marker with the counter at 1,
/// every further opening `tag` is +1 and every closing `tag` is -1; the
/// boundary is the close where the counter reaches 0. Handles arbitrarily
/// nested same-name elements. Returns None when the counter never reaches 0.
pub fn balanced_scan(html: &str, tag: &str, class: &str) -> Option<String> {
    let content_start = find_marker(html, tag, class)?;
    let mut depth: u32 = 1;
    let mut idx = content_start;
    while let Some(rel) = html[idx..].find('<') {
        let at = idx + rel;
        if is_tag_at(html, at, tag, false) {
            depth += 1;
        } else if is_tag_at(html, at, tag, true) {
            depth -= 1;
            if depth == 0 {
                return Some(html[content_start..at].to_string());
            }
        }
        idx = at + 1;
    }
    None
}

/// Last resort: every `tag` carrying `class` anywhere in the document, inner
/// content in document order, one element per line. None when nothing
/// matches.
pub fn collect_paragraphs(html: &str, tag: &str, class: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    let mut idx = 0;
    while let Some(content_rel) = find_marker(&html[idx..], tag, class) {
        let content_start = idx + content_rel;
        match find_closing(html, content_start, tag) {
            Some(end) => {
                parts.push(&html[content_start..end]);
                idx = end + 1;
            }
            None => break,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
