use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{ScoreBand, ScoringInput};
use crate::rules::RuleInfo;

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ScoreContentParams {
    /// Post title.
    pub title: Option<String>,
    /// Explicit URL slug. Derived from the title when omitted.
    pub slug: Option<String>,
    /// Meta description / excerpt.
    pub excerpt: Option<String>,
    /// Body HTML as produced by the editor.
    pub content_html: Option<String>,
    /// Cover image URL.
    pub cover: Option<String>,
    /// Post tags.
    pub tags: Option<Vec<String>>,
    /// Focus keyword the post should rank for (e.g. "phòng trọ Hà Đông").
    pub focus_keyword: Option<String>,
}

impl From<ScoreContentParams> for ScoringInput {
    fn from(params: ScoreContentParams) -> Self {
        ScoringInput {
            title: params.title.unwrap_or_default(),
            slug: params.slug.unwrap_or_default(),
            excerpt: params.excerpt.unwrap_or_default(),
            content_html: params.content_html.unwrap_or_default(),
            cover: params.cover,
            tags: params.tags.unwrap_or_default(),
            focus_keyword: params.focus_keyword.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ScorePayloadParams {
    /// Raw post JSON as submitted by the dashboard form (camelCase or snake_case keys).
    pub payload: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BatchItem {
    /// Caller-side identifier echoed back in the response (e.g. a post ID).
    pub id: Option<String>,
    #[serde(flatten)]
    pub content: ScoreContentParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ScoreBatchParams {
    /// Posts to score (max 100).
    pub items: Vec<BatchItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchScore {
    pub id: Option<String>,
    pub score: u8,
    pub band: ScoreBand,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScoreBatchResponse {
    pub results: Vec<BatchScore>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SlugifyParams {
    /// Title or phrase to turn into a slug.
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SlugifyResponse {
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalyzeTextParams {
    /// Body HTML to inspect.
    pub content_html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeTextResponse {
    /// Visible text with script/style blocks and tags removed.
    pub text: String,
    pub total_words: usize,
    pub sentence_count: usize,
    pub avg_sentence_len: f64,
    pub has_h2: bool,
    pub has_image: bool,
    pub has_image_with_alt: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RuleCatalogResponse {
    pub rules: Vec<RuleInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_into_input() {
        let params = ScoreContentParams {
            title: Some("Phòng trọ".to_string()),
            tags: Some(vec!["a".to_string()]),
            ..Default::default()
        };
        let input: ScoringInput = params.into();
        assert_eq!(input.title, "Phòng trọ");
        assert_eq!(input.tags, vec!["a".to_string()]);
        assert_eq!(input.content_html, "");
        assert_eq!(input.cover, None);
    }

    #[test]
    fn test_batch_item_flattens_content() {
        let item: BatchItem =
            serde_json::from_str(r#"{"id": "42", "title": "Nhà nguyên căn", "focus_keyword": "nhà"}"#)
                .unwrap();
        assert_eq!(item.id.as_deref(), Some("42"));
        assert_eq!(item.content.title.as_deref(), Some("Nhà nguyên căn"));
        assert_eq!(item.content.focus_keyword.as_deref(), Some("nhà"));
    }
}
