//! Site-independent text cleanup: entity decoding, tag stripping, line cleanup.
//!
//! These are textual scrubs, not an HTML parser. `strip_tags` removes every
//! `<`..`>` span and will therefore mis-strip literal `<`/`>` characters that
//! are not markup; that matches the behavior of the extraction chain, which
//! only ever feeds it markup slices.

/// Decode the fixed set of HTML entities the supported sites emit.
///
/// `&amp;` is decoded last, so a single pass never turns `&amp;lt;` into `<`.
/// Unknown entities pass through unchanged.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Remove every substring from a `<` to the next `>`, left to right.
/// An unterminated `<` leaves the rest of the input intact.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                // No closing '>': not a tag, keep the remainder as-is.
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Trim each line and drop the ones that become empty.
pub fn clean_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full cleanup pipeline for an extracted body slice: line-break tags become
/// newlines, then tags are stripped, entities decoded, and lines cleaned.
///
/// Tag stripping runs before entity decoding: decoding first could
/// reintroduce literal `<`/`>` that the stripper would then eat as markup.
pub fn normalize_body(raw: &str) -> String {
    let with_breaks = raw
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("<BR>", "\n");
    clean_lines(&decode_entities(&strip_tags(&with_breaks)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_entities_table() {
        assert_eq!(
            decode_entities("a&nbsp;b &lt;tag&gt; &quot;q&quot; it&#039;s &apos;x&apos; A&amp;B"),
            "a b <tag> \"q\" it's 'x' A&B"
        );
    }

    #[test]
    fn decode_entities_unknown_pass_through() {
        assert_eq!(decode_entities("&copy; &hellip;"), "&copy; &hellip;");
    }

    #[test]
    fn decode_entities_idempotent_on_decoded_text() {
        let decoded = decode_entities("a &lt;b&gt; &amp; c");
        assert_eq!(decode_entities(&decoded), decoded);
    }

    #[test]
    fn decode_entities_single_pass_no_double_decode() {
        // &amp;lt; is the escaped form of &lt; and must decode to the literal
        // entity text, not to '<'.
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn strip_tags_removes_markup() {
        assert_eq!(strip_tags("<p>hello</p> <b>world</b>"), "hello world");
    }

    #[test]
    fn strip_tags_identity_without_angle_brackets() {
        let s = "plain text, no markup at all";
        assert_eq!(strip_tags(s), s);
    }

    #[test]
    fn strip_tags_unterminated_open_kept() {
        assert_eq!(strip_tags("a < b"), "a < b");
        assert_eq!(strip_tags("<p>x</p> 1 < 2"), "x 1 < 2");
    }

    #[test]
    fn clean_lines_trims_and_drops_empties() {
        assert_eq!(clean_lines("  a  \n\n   \n b\n"), "a\nb");
    }

    #[test]
    fn normalize_body_pipeline_order() {
        // <br> first, then tags, then entities, then lines.
        let raw = "  <span>one</span><br/>  &amp; two  <br> ";
        assert_eq!(normalize_body(raw), "one\n& two");
    }

    #[test]
    fn normalize_body_does_not_restrip_decoded_brackets() {
        // &lt;b&gt; decodes to literal <b> which must survive, since
        // stripping already happened.
        assert_eq!(normalize_body("<p>&lt;b&gt; stays</p>"), "<b> stays");
    }
}
