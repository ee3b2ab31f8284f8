//! Text normalization helpers shared by the metric extractor.
//!
//! HTML is treated as a flat string: every `<...>` run is a tag, whatever its
//! nesting. None of these functions can fail on malformed markup.
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NONSPACING_MARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Mn}+").expect("valid regex"));
static SLUG_INVALID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\p{L}\p{M}\p{N}'-]+\b").expect("valid regex"));

/// Strip an HTML fragment down to its visible text.
///
/// `<script>` and `<style>` blocks are dropped with their contents, every
/// other tag becomes a space, and whitespace runs collapse to one space.
pub fn strip_html(html: &str) -> String {
    let without_blocks = SCRIPT_STYLE_RE.replace_all(html, " ");
    let without_tags = TAG_RE.replace_all(&without_blocks, " ");
    collapse_whitespace(&without_tags)
}

/// Lower-case and fold diacritics so that `"Hà Nội"` and `"ha noi"` compare equal.
///
/// Folding is NFD decomposition followed by removal of nonspacing marks.
/// `đ` has no canonical decomposition and is mapped to `d` explicitly.
pub fn normalize_vi(s: &str) -> String {
    let decomposed: String = s.to_lowercase().nfd().collect();
    NONSPACING_MARK_RE
        .replace_all(&decomposed, "")
        .replace('đ', "d")
}

/// Derive a URL slug from an arbitrary title.
pub fn to_slug(s: &str) -> String {
    let folded = normalize_vi(s);
    let cleaned = SLUG_INVALID_RE.replace_all(&folded, "");
    WHITESPACE_RE.replace_all(cleaned.trim(), "-").into_owned()
}

/// Count words in an HTML body.
///
/// Cruder than [`strip_html`]: script and style contents are counted like any
/// other text.
pub fn word_count_from_html(html: &str) -> usize {
    let text = collapse_whitespace(&TAG_RE.replace_all(html, " "));
    WORD_RE.find_iter(&text).count()
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_drops_script_and_style() {
        let html = "<style>p { color: red }</style><p>Phòng <b>trọ</b></p>\n<SCRIPT type=\"x\">\nalert(1)\n</script>  giá rẻ";
        assert_eq!(strip_html(html), "Phòng trọ giá rẻ");
    }

    #[test]
    fn test_strip_html_malformed_markup() {
        assert_eq!(strip_html("<p>open <b>never closed"), "open never closed");
        assert_eq!(strip_html("a < b and c"), "a < b and c");
        assert_eq!(strip_html("<script>unterminated"), "unterminated");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_normalize_vi() {
        assert_eq!(normalize_vi("Hà Nội"), "ha noi");
        assert_eq!(normalize_vi("Hà Đông"), "ha dong");
        assert_eq!(normalize_vi("Crème Brûlée"), "creme brulee");
        assert_eq!(normalize_vi("PHÒNG TRỌ"), "phong tro");
    }

    #[test]
    fn test_to_slug() {
        assert_eq!(to_slug("Cho thuê phòng trọ Hà Đông!"), "cho-thue-phong-tro-ha-dong");
        assert_eq!(to_slug("  Giá   rẻ -- 2024  "), "gia-re----2024");
        assert_eq!(to_slug("!!!"), "");
    }

    #[test]
    fn test_word_count_from_html() {
        assert_eq!(word_count_from_html("<p>Phòng trọ Hà Đông</p>"), 4);
        assert_eq!(word_count_from_html("<h2>It's a well-known</h2><p>fact.</p>"), 4);
        assert_eq!(word_count_from_html("<p> - </p>"), 0);
        assert_eq!(word_count_from_html(""), 0);
    }

    #[test]
    fn test_word_count_keeps_script_text() {
        let html = "<p>one two</p><script>three four</script>";
        assert_eq!(word_count_from_html(html), 4);
        assert_eq!(strip_html(html), "one two");
    }
}
