use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::InputError;

/// Content submitted for scoring, as the post editor holds it.
///
/// Every field is optional at the boundary. Missing, `null` or wrongly typed
/// values decode to empty defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub excerpt: String,
    #[serde(default, alias = "content_html", deserialize_with = "lenient_string")]
    pub content_html: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, alias = "focus_keyword", deserialize_with = "lenient_string")]
    pub focus_keyword: String,
}

impl ScoringInput {
    /// Decode a raw JSON payload.
    pub fn from_json(payload: &str) -> Result<Self, InputError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(value)
    }

    /// Decode an already-parsed JSON value. Only the top level must be an object.
    pub fn from_value(value: Value) -> Result<Self, InputError> {
        if !value.is_object() {
            return Err(InputError::NotAnObject(json_kind(&value)));
        }
        Ok(serde_json::from_value(value)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Per-site options that influence link classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// The site's own host (e.g. "nhatro.vn"). Links to it count as internal.
    pub site_host: Option<String>,
}

impl ScoringConfig {
    pub fn with_site_host(host: impl Into<String>) -> Self {
        Self {
            site_host: Some(host.into()),
        }
    }
}

/// Outcome of one rule for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Check {
    /// Stable rule identifier, e.g. "title-length"
    pub id: String,
    /// Human-readable description of the rule
    pub label: String,
    /// Whether the rule's primary condition is fully met
    pub ok: bool,
    /// Credit in [0, 1]
    pub score: f64,
    /// Importance multiplier used by the aggregate score
    pub weight: f64,
    /// Measured value behind the grade, when the rule reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Raw statistics behind a [`ScoringResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreMeta {
    pub total_words: usize,
    /// Keyword density in percent
    pub density: f64,
    pub avg_sentence_len: f64,
    pub title_len: usize,
    pub slug_len: usize,
    pub desc_len: usize,
    pub kw_count: usize,
}

/// Badge classification of a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Average,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreBand::Good,
            50..=79 => ScoreBand::Average,
            _ => ScoreBand::Poor,
        }
    }
}

/// Full evaluation of one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringResult {
    /// Weighted score in [0, 100]
    pub score: u8,
    pub band: ScoreBand,
    /// Every rule, in rule-table order
    pub checks: Vec<Check>,
    pub good: Vec<Check>,
    pub warn: Vec<Check>,
    pub bad: Vec<Check>,
    pub meta: ScoreMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_full_payload() {
        let input = ScoringInput::from_json(
            r#"{
                "title": "Phòng trọ Hà Đông",
                "slug": "phong-tro-ha-dong",
                "excerpt": "Giá rẻ",
                "contentHtml": "<p>Xin chào</p>",
                "cover": "/uploads/a.jpg",
                "tags": ["phòng trọ", "hà đông"],
                "focusKeyword": "Hà Đông"
            }"#,
        )
        .unwrap();
        assert_eq!(input.title, "Phòng trọ Hà Đông");
        assert_eq!(input.content_html, "<p>Xin chào</p>");
        assert_eq!(input.cover.as_deref(), Some("/uploads/a.jpg"));
        assert_eq!(input.tags.len(), 2);
        assert_eq!(input.focus_keyword, "Hà Đông");
    }

    #[test]
    fn test_from_json_coalesces_bad_fields() {
        let input = ScoringInput::from_json(
            r#"{"title": null, "excerpt": 42, "cover": false, "tags": ["a", 1, null, "b"], "focus_keyword": "x"}"#,
        )
        .unwrap();
        assert_eq!(input.title, "");
        assert_eq!(input.excerpt, "");
        assert_eq!(input.slug, "");
        assert_eq!(input.cover, None);
        assert_eq!(input.tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(input.focus_keyword, "x");

        let input = ScoringInput::from_json(r#"{"tags": "not-a-list"}"#).unwrap();
        assert!(input.tags.is_empty());
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(matches!(
            ScoringInput::from_json("[1, 2]"),
            Err(InputError::NotAnObject("array"))
        ));
        assert!(matches!(
            ScoringInput::from_json("{not json"),
            Err(InputError::Json(_))
        ));
    }

    #[test]
    fn test_score_band() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Average);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Average);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Poor);
    }
}
