//! The rule table.
//!
//! Each rule is a record of plain functions over [`ContentMetrics`]. The
//! aggregator walks the table in order and never looks at a rule's identity,
//! so rules can be added or retuned here alone.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics::ContentMetrics;
use crate::model::Check;

const MIN_CONTENT_WORDS: usize = 600;
const MAX_SLUG_LEN: usize = 74;
const NO_KEYWORD_HINT: &str = "Chưa nhập từ khóa chính.";

pub struct Rule {
    pub id: &'static str,
    pub label: &'static str,
    pub weight: f64,
    /// Primary condition; a passing rule scores 1.
    passes: fn(&ContentMetrics) -> bool,
    /// Partial credit for a failing rule.
    credit: fn(&ContentMetrics) -> f64,
    hint: fn(&ContentMetrics) -> Option<String>,
}

impl Rule {
    pub fn check(&self, metrics: &ContentMetrics) -> Check {
        let ok = (self.passes)(metrics);
        let score = if ok {
            1.0
        } else {
            (self.credit)(metrics).clamp(0.0, 1.0)
        };
        Check {
            id: self.id.to_string(),
            label: self.label.to_string(),
            ok,
            score,
            weight: self.weight,
            hint: (self.hint)(metrics),
        }
    }

    pub fn info(&self) -> RuleInfo {
        RuleInfo {
            id: self.id.to_string(),
            label: self.label.to_string(),
            weight: self.weight,
        }
    }
}

/// Static description of a rule, without an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleInfo {
    pub id: String,
    pub label: String,
    pub weight: f64,
}

fn no_credit(_: &ContentMetrics) -> f64 {
    0.0
}

fn no_hint(_: &ContentMetrics) -> Option<String> {
    None
}

fn keyword_hint(m: &ContentMetrics) -> Option<String> {
    (!m.has_keyword()).then(|| NO_KEYWORD_HINT.to_string())
}

fn chars_hint(len: usize) -> Option<String> {
    Some(format!("Hiện tại: {len} ký tự."))
}

fn band(value: f64, full: (f64, f64), partial: (f64, f64)) -> f64 {
    if value >= full.0 && value <= full.1 {
        1.0
    } else if value >= partial.0 && value <= partial.1 {
        0.5
    } else {
        0.0
    }
}

pub static RULES: [Rule; 17] = [
    Rule {
        id: "title-length",
        label: "Tiêu đề dài 40–60 ký tự",
        weight: 1.2,
        passes: |m| (40..=60).contains(&m.title_len),
        credit: |m| band(m.title_len as f64, (40.0, 60.0), (35.0, 65.0)),
        hint: |m| chars_hint(m.title_len),
    },
    Rule {
        id: "title-has-kw",
        label: "Tiêu đề chứa từ khóa chính",
        weight: 1.4,
        passes: |m| m.title_has_kw,
        credit: no_credit,
        hint: keyword_hint,
    },
    Rule {
        id: "slug-length",
        label: "Đường dẫn (slug) ngắn gọn, dưới 75 ký tự",
        weight: 1.0,
        passes: |m| (1..=MAX_SLUG_LEN).contains(&m.slug_len),
        credit: no_credit,
        hint: |m| chars_hint(m.slug_len),
    },
    Rule {
        id: "slug-has-kw",
        label: "Đường dẫn (slug) chứa từ khóa chính",
        weight: 1.0,
        passes: |m| m.slug_has_kw,
        credit: no_credit,
        hint: keyword_hint,
    },
    Rule {
        id: "desc-length",
        label: "Mô tả dài 120–160 ký tự",
        weight: 1.2,
        passes: |m| (120..=160).contains(&m.desc_len),
        credit: |m| band(m.desc_len as f64, (120.0, 160.0), (100.0, 170.0)),
        hint: |m| chars_hint(m.desc_len),
    },
    Rule {
        id: "desc-has-kw",
        label: "Mô tả chứa từ khóa chính",
        weight: 1.0,
        passes: |m| m.desc_has_kw,
        credit: no_credit,
        hint: keyword_hint,
    },
    Rule {
        id: "content-words",
        label: "Nội dung có ít nhất 600 từ",
        weight: 1.4,
        passes: |m| m.total_words >= MIN_CONTENT_WORDS,
        credit: |m| (m.total_words as f64 / MIN_CONTENT_WORDS as f64).min(1.0),
        hint: |m| Some(format!("Hiện tại: {} từ.", m.total_words)),
    },
    Rule {
        id: "density",
        label: "Mật độ từ khóa 0,5–2,5%",
        weight: 1.4,
        passes: |m| m.kw_count > 0 && (0.5..=2.5).contains(&m.density),
        credit: |m| {
            if m.kw_count == 0 {
                return 0.0;
            }
            band(m.density, (0.5, 2.5), (0.3, 3.0))
        },
        hint: |m| {
            if !m.has_keyword() {
                return keyword_hint(m);
            }
            Some(format!(
                "Hiện tại: {:.2}% ({} lần / {} từ).",
                m.density, m.kw_count, m.total_words
            ))
        },
    },
    Rule {
        id: "first-paragraph-kw",
        label: "Từ khóa xuất hiện trong đoạn mở đầu",
        weight: 1.0,
        passes: |m| m.kw_in_first_paragraph,
        credit: no_credit,
        hint: keyword_hint,
    },
    Rule {
        id: "has-h2",
        label: "Có tiêu đề phụ H2",
        weight: 1.0,
        passes: |m| m.has_h2,
        credit: |_| 0.5,
        hint: no_hint,
    },
    Rule {
        id: "kw-in-h2",
        label: "Từ khóa xuất hiện trong tiêu đề H2",
        weight: 1.0,
        passes: |m| m.kw_in_h2,
        credit: no_credit,
        hint: keyword_hint,
    },
    Rule {
        id: "image-alt",
        label: "Có hình ảnh kèm thuộc tính alt",
        weight: 1.1,
        passes: |m| m.has_image && m.has_image_with_alt,
        credit: |m| if m.has_image { 0.5 } else { 0.0 },
        hint: |m| {
            (m.has_image && !m.has_image_with_alt)
                .then(|| "Có hình ảnh nhưng thiếu thuộc tính alt.".to_string())
        },
    },
    Rule {
        id: "internal-link",
        label: "Có liên kết nội bộ",
        weight: 1.0,
        passes: |m| m.has_internal_link,
        credit: no_credit,
        hint: no_hint,
    },
    Rule {
        id: "outbound-link",
        label: "Có liên kết ra ngoài",
        weight: 1.0,
        passes: |m| m.has_outbound_link,
        credit: no_credit,
        hint: no_hint,
    },
    Rule {
        id: "readability",
        label: "Câu văn ngắn gọn (trung bình ≤ 20 từ/câu)",
        weight: 1.1,
        passes: |m| m.sentence_count > 0 && m.avg_sentence_len <= 20.0,
        credit: |m| {
            if m.sentence_count > 0 && m.avg_sentence_len <= 25.0 {
                0.5
            } else {
                0.0
            }
        },
        hint: |m| {
            if m.sentence_count == 0 {
                return Some("Chưa có nội dung.".to_string());
            }
            Some(format!("Hiện tại: {:.1} từ/câu.", m.avg_sentence_len))
        },
    },
    Rule {
        id: "cover",
        label: "Có ảnh đại diện",
        weight: 1.0,
        passes: |m| m.has_cover,
        credit: no_credit,
        hint: no_hint,
    },
    Rule {
        id: "has-tags",
        label: "Có ít nhất một thẻ (tag)",
        weight: 1.0,
        passes: |m| m.tag_count > 0,
        credit: no_credit,
        hint: |m| Some(format!("Hiện tại: {} thẻ.", m.tag_count)),
    },
];

/// Describe every rule, in evaluation order.
pub fn catalog() -> Vec<RuleInfo> {
    RULES.iter().map(Rule::info).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn find(id: &str) -> Option<&'static Rule> {
        RULES.iter().find(|rule| rule.id == id)
    }

    fn check(id: &str, metrics: &ContentMetrics) -> Check {
        find(id)
            .unwrap_or_else(|| panic!("missing rule: {id}"))
            .check(metrics)
    }

    #[test]
    fn test_rule_ids_are_unique_and_ordered() {
        let ids: Vec<&str> = RULES.iter().map(|r| r.id).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), RULES.len());
        assert_eq!(ids.first(), Some(&"title-length"));
        assert_eq!(ids.last(), Some(&"has-tags"));
    }

    #[test]
    fn test_weights() {
        let weight = |id: &str| find(id).map(|r| r.weight);
        assert_eq!(weight("title-has-kw"), Some(1.4));
        assert_eq!(weight("content-words"), Some(1.4));
        assert_eq!(weight("density"), Some(1.4));
        assert_eq!(weight("title-length"), Some(1.2));
        assert_eq!(weight("desc-length"), Some(1.2));
        assert_eq!(weight("image-alt"), Some(1.1));
        assert_eq!(weight("readability"), Some(1.1));
        assert_eq!(weight("cover"), Some(1.0));
        assert!(RULES.iter().all(|r| r.weight >= 1.0 && r.weight <= 1.4));
    }

    #[test]
    fn test_catalog_matches_table() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 17);
        assert_eq!(catalog[0].id, "title-length");
        assert_eq!(catalog[0].weight, 1.2);
    }

    #[test]
    fn test_desc_length_bands() {
        let at = |len| check("desc-length", &ContentMetrics { desc_len: len, ..Default::default() });
        assert_eq!(at(120).score, 1.0);
        assert!(at(160).ok);
        assert_eq!(at(100).score, 0.5);
        assert_eq!(at(170).score, 0.5);
        assert!(!at(170).ok);
        assert_eq!(at(99).score, 0.0);
        assert_eq!(at(171).score, 0.0);
        assert_eq!(at(42).hint.as_deref(), Some("Hiện tại: 42 ký tự."));
    }

    #[test]
    fn test_slug_length() {
        let at = |len| check("slug-length", &ContentMetrics { slug_len: len, ..Default::default() });
        assert!(!at(0).ok);
        assert!(at(1).ok);
        assert!(at(74).ok);
        assert_eq!(at(75).score, 0.0);
    }

    #[test]
    fn test_density_bands() {
        let at = |density, kw_count| {
            check(
                "density",
                &ContentMetrics {
                    keyword: "ha dong".to_string(),
                    density,
                    kw_count,
                    total_words: 100,
                    ..Default::default()
                },
            )
        };
        assert!(at(0.5, 1).ok);
        assert!(at(2.5, 3).ok);
        assert_eq!(at(0.3, 1).score, 0.5);
        assert_eq!(at(3.0, 3).score, 0.5);
        assert_eq!(at(0.2, 1).score, 0.0);
        assert_eq!(at(3.5, 4).score, 0.0);
        assert_eq!(at(0.0, 0).score, 0.0);
    }

    #[test]
    fn test_keyword_rules_hint_missing_keyword() {
        let metrics = ContentMetrics::default();
        for id in ["title-has-kw", "slug-has-kw", "desc-has-kw", "density", "first-paragraph-kw", "kw-in-h2"] {
            let c = check(id, &metrics);
            assert_eq!(c.score, 0.0, "{id}");
            assert_eq!(c.hint.as_deref(), Some(NO_KEYWORD_HINT), "{id}");
        }
    }

    #[test]
    fn test_readability() {
        let at = |avg, sentences| {
            check(
                "readability",
                &ContentMetrics {
                    avg_sentence_len: avg,
                    sentence_count: sentences,
                    ..Default::default()
                },
            )
        };
        assert!(at(20.0, 3).ok);
        assert_eq!(at(25.0, 3).score, 0.5);
        assert_eq!(at(25.5, 3).score, 0.0);
        assert_eq!(at(0.0, 0).score, 0.0);
        assert_eq!(at(12.34, 2).hint.as_deref(), Some("Hiện tại: 12.3 từ/câu."));
    }

    #[test]
    fn test_has_h2_partial_when_missing() {
        let c = check("has-h2", &ContentMetrics::default());
        assert!(!c.ok);
        assert_eq!(c.score, 0.5);
    }
}
