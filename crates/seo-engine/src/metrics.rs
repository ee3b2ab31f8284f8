//! Raw statistics extracted from a piece of content.
//!
//! Structural predicates run regexes over the raw HTML (case-insensitive,
//! dot matches newline). They may over- or under-match on broken markup but
//! never fail.
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::model::{ScoringConfig, ScoringInput};
use crate::normalize::{
    collapse_whitespace, normalize_vi, strip_html, to_slug, word_count_from_html,
};

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?…]+").expect("valid regex"));
static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid regex"));
static ALT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\balt\s*=\s*(?:"[^"]*[^"\s][^"]*"|'[^']*[^'\s][^']*')"#)
        .expect("valid regex")
});
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\shref\s*=\s*["']([^"']*)["']"#).expect("valid regex")
});
static H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h2\b[^>]*>(.*?)</h2\s*>").expect("valid regex"));
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").expect("valid regex"));

const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Every statistic the rule table reads, computed once per evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentMetrics {
    /// Focus keyword after diacritic folding; empty when none was given
    pub keyword: String,
    pub title_len: usize,
    pub title_has_kw: bool,
    /// Explicit slug, or the title's slug when none was given
    pub slug: String,
    pub slug_len: usize,
    pub slug_has_kw: bool,
    pub desc_len: usize,
    pub desc_has_kw: bool,
    pub total_words: usize,
    pub kw_count: usize,
    pub density: f64,
    pub sentence_count: usize,
    pub avg_sentence_len: f64,
    pub kw_in_first_paragraph: bool,
    pub has_h2: bool,
    pub kw_in_h2: bool,
    pub has_image: bool,
    pub has_image_with_alt: bool,
    pub has_internal_link: bool,
    pub has_outbound_link: bool,
    pub has_cover: bool,
    pub tag_count: usize,
}

impl ContentMetrics {
    pub fn extract(input: &ScoringInput, config: &ScoringConfig) -> Self {
        let keyword = fold_keyword(&input.focus_keyword);
        let keyword_slug = to_slug(&keyword);

        let title = input.title.trim();
        let slug = match input.slug.trim() {
            "" => to_slug(title),
            explicit => explicit.to_string(),
        };
        let excerpt = input.excerpt.trim();

        let html = input.content_html.as_str();
        let text = strip_html(html);
        let total_words = word_count_from_html(html);
        let kw_count = count_occurrences(&text, &keyword);
        let sentences = sentence_lengths(&text);

        Self {
            title_len: title.chars().count(),
            title_has_kw: contains_keyword(title, &keyword),
            slug_len: slug.chars().count(),
            slug_has_kw: !keyword_slug.is_empty() && normalize_vi(&slug).contains(&keyword_slug),
            desc_len: excerpt.chars().count(),
            desc_has_kw: contains_keyword(excerpt, &keyword),
            total_words,
            kw_count,
            density: keyword_density(kw_count, total_words),
            sentence_count: sentences.len(),
            avg_sentence_len: mean(&sentences),
            kw_in_first_paragraph: keyword_in_first_paragraph(html, &keyword),
            has_h2: has_h2(html),
            kw_in_h2: keyword_in_h2(html, &keyword),
            has_image: has_image(html),
            has_image_with_alt: has_image_with_alt(html),
            has_internal_link: has_internal_link(html, config),
            has_outbound_link: has_outbound_link(html, config),
            has_cover: input.cover.as_deref().is_some_and(|c| !c.trim().is_empty()),
            tag_count: input.tags.iter().filter(|t| !t.trim().is_empty()).count(),
            slug,
            keyword,
        }
    }

    pub fn has_keyword(&self) -> bool {
        !self.keyword.is_empty()
    }
}

/// Fold a keyword for comparison: diacritics removed, whitespace collapsed.
fn fold_keyword(keyword: &str) -> String {
    collapse_whitespace(&normalize_vi(keyword))
}

/// Substring test after folding both sides. An empty keyword never matches.
fn contains_keyword(text: &str, keyword: &str) -> bool {
    let keyword = fold_keyword(keyword);
    !keyword.is_empty() && fold_keyword(text).contains(&keyword)
}

/// Count whole-word occurrences of `keyword` in `text`, ignoring case and diacritics.
pub fn count_occurrences(text: &str, keyword: &str) -> usize {
    let keyword = fold_keyword(keyword);
    if keyword.is_empty() {
        return 0;
    }

    let body = keyword
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    // Word boundaries only where the keyword edge is itself a word character,
    // otherwise "c++" could never match.
    let lead = if keyword.chars().next().is_some_and(is_word_char) { r"\b" } else { "" };
    let tail = if keyword.chars().last().is_some_and(is_word_char) { r"\b" } else { "" };

    match Regex::new(&format!("{lead}{body}{tail}")) {
        Ok(re) => re.find_iter(&normalize_vi(text)).count(),
        Err(e) => {
            warn!(error = %e, keyword_len = keyword.len(), "keyword pattern rejected");
            0
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Keyword occurrences per hundred words.
pub fn keyword_density(occurrences: usize, total_words: usize) -> f64 {
    if total_words == 0 {
        return 0.0;
    }
    occurrences as f64 / total_words as f64 * 100.0
}

/// Words per sentence for every non-empty sentence in `text`.
fn sentence_lengths(text: &str) -> Vec<usize> {
    SENTENCE_END_RE
        .split(text)
        .map(|fragment| fragment.split_whitespace().count())
        .filter(|&words| words > 0)
        .collect()
}

pub fn sentence_count(text: &str) -> usize {
    sentence_lengths(text).len()
}

/// Mean words per sentence; `0.0` for text without sentences.
pub fn avg_sentence_length(text: &str) -> f64 {
    mean(&sentence_lengths(text))
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<usize>() as f64 / values.len() as f64
}

pub fn has_image(html: &str) -> bool {
    IMG_RE.is_match(html)
}

/// True when some `<img>` carries a non-blank `alt` attribute.
pub fn has_image_with_alt(html: &str) -> bool {
    IMG_RE.find_iter(html).any(|tag| ALT_RE.is_match(tag.as_str()))
}

fn link_hrefs(html: &str) -> impl Iterator<Item = &str> {
    HREF_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Host part of an absolute http(s) URL, lower-cased.
fn http_host(href: &str) -> Option<String> {
    let lower = href.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = host_port.split(':').next().unwrap_or_default();
    (!host.is_empty()).then(|| host.to_string())
}

fn site_host(config: &ScoringConfig) -> Option<String> {
    config
        .site_host
        .as_deref()
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| !h.is_empty())
}

fn is_site_host(host: &str, site: &str) -> bool {
    host == site || host.strip_suffix(site).is_some_and(|prefix| prefix.ends_with('.'))
}

/// An `<a>` pointing at another site over http(s). Loopback hosts and the
/// configured site host do not count.
pub fn has_outbound_link(html: &str, config: &ScoringConfig) -> bool {
    let site = site_host(config);
    link_hrefs(html).filter_map(http_host).any(|host| {
        !LOOPBACK_HOSTS.contains(&host.as_str())
            && !site.as_deref().is_some_and(|site| is_site_host(&host, site))
    })
}

/// An `<a>` with a root-relative href, or an absolute one on the site host
/// or one of its subdomains.
pub fn has_internal_link(html: &str, config: &ScoringConfig) -> bool {
    let site = site_host(config);
    link_hrefs(html).any(|href| {
        (href.starts_with('/') && !href.starts_with("//"))
            || site.as_deref().is_some_and(|site| {
                http_host(href).is_some_and(|host| is_site_host(&host, site))
            })
    })
}

pub fn has_h2(html: &str) -> bool {
    H2_RE.is_match(html)
}

pub fn keyword_in_h2(html: &str, keyword: &str) -> bool {
    H2_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .any(|inner| contains_keyword(&strip_html(inner.as_str()), keyword))
}

/// Only the first `<p>` block is inspected.
pub fn keyword_in_first_paragraph(html: &str, keyword: &str) -> bool {
    PARAGRAPH_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .is_some_and(|inner| contains_keyword(&strip_html(inner.as_str()), keyword))
}
