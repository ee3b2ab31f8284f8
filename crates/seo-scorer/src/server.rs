//! MCP server exposing the SEO scoring engine.
//!
//! Tools:
//! - `score_content`: score one post from typed fields
//! - `score_payload`: score one post from the raw dashboard JSON
//! - `score_batch`: score many posts, returning only score and band
//! - `slugify`: derive a slug from a title
//! - `analyze_text`: plain text and sentence statistics for a body
//! - `list_rules`: the rule table
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::{debug, info};

use seo_engine::mcp_api::{
    AnalyzeTextParams, AnalyzeTextResponse, BatchScore, RuleCatalogResponse, ScoreBatchParams,
    ScoreBatchResponse, ScoreContentParams, ScorePayloadParams, SlugifyParams, SlugifyResponse,
};
use seo_engine::{evaluate_with, metrics, normalize, rules, ScoringConfig, ScoringInput, ScoringResult};

use crate::error::AppError;
use crate::rate_limit::RateLimiter;

const MAX_BATCH_ITEMS: usize = 100;

#[derive(Clone)]
pub struct SeoScorerServer {
    scoring: Arc<ScoringConfig>,
    limiter: Option<RateLimiter>,
    tool_router: ToolRouter<SeoScorerServer>,
}

impl SeoScorerServer {
    pub fn new(scoring: ScoringConfig, limiter: Option<RateLimiter>) -> Self {
        Self {
            scoring: Arc::new(scoring),
            limiter,
            tool_router: Self::tool_router(),
        }
    }

    async fn gate(&self) -> Result<(), String> {
        if let Some(limiter) = &self.limiter {
            limiter.check().await?;
        }
        Ok(())
    }

    fn score(&self, input: &ScoringInput) -> ScoringResult {
        evaluate_with(input, &self.scoring)
    }

    fn score_payload_str(&self, payload: &str) -> Result<ScoringResult, AppError> {
        let input = ScoringInput::from_json(payload)?;
        Ok(self.score(&input))
    }
}

#[tool_router]
impl SeoScorerServer {
    #[tool(description = "Score a post's on-page SEO (0-100) from its title, slug, excerpt, body HTML, cover, tags and focus keyword. Returns every rule check split into good/warn/bad with hints.")]
    async fn score_content(
        &self,
        Parameters(params): Parameters<ScoreContentParams>,
    ) -> Result<Json<ScoringResult>, String> {
        self.gate().await?;
        let input = ScoringInput::from(params);
        let result = self.score(&input);
        debug!(score = result.score, "score_content");
        Ok(Json(result))
    }

    #[tool(description = "Score a post from the raw JSON object posted by the dashboard form. Missing or wrongly typed fields are treated as empty.")]
    async fn score_payload(
        &self,
        Parameters(params): Parameters<ScorePayloadParams>,
    ) -> Result<Json<ScoringResult>, String> {
        self.gate().await?;
        let result = self
            .score_payload_str(&params.payload)
            .map_err(|e| format!("score_payload failed: {e}"))?;
        Ok(Json(result))
    }

    #[tool(description = "Score up to 100 posts at once. Returns only the score and band per post, in input order, for refreshing stored pointSeo values.")]
    async fn score_batch(
        &self,
        Parameters(params): Parameters<ScoreBatchParams>,
    ) -> Result<Json<ScoreBatchResponse>, String> {
        if params.items.is_empty() {
            return Err("items must not be empty".to_string());
        }
        if params.items.len() > MAX_BATCH_ITEMS {
            return Err(format!(
                "too many items: {} (max {MAX_BATCH_ITEMS})",
                params.items.len()
            ));
        }
        self.gate().await?;

        let results: Vec<BatchScore> = params
            .items
            .into_iter()
            .map(|item| {
                let result = self.score(&ScoringInput::from(item.content));
                BatchScore {
                    id: item.id,
                    score: result.score,
                    band: result.band,
                }
            })
            .collect();
        info!(count = results.len(), "batch scored");

        Ok(Json(ScoreBatchResponse { results }))
    }

    #[tool(description = "Turn a title into a URL slug: lower-case, Vietnamese diacritics removed, words joined by hyphens.")]
    async fn slugify(
        &self,
        Parameters(params): Parameters<SlugifyParams>,
    ) -> Result<Json<SlugifyResponse>, String> {
        let slug = normalize::to_slug(&params.text);
        if slug.is_empty() {
            return Err("text has no characters usable in a slug".to_string());
        }
        Ok(Json(SlugifyResponse { slug }))
    }

    #[tool(description = "Strip a body's HTML to plain text and report word count, sentence statistics and image/heading presence.")]
    async fn analyze_text(
        &self,
        Parameters(params): Parameters<AnalyzeTextParams>,
    ) -> Result<Json<AnalyzeTextResponse>, String> {
        let html = params.content_html.as_str();
        let text = normalize::strip_html(html);
        Ok(Json(AnalyzeTextResponse {
            total_words: normalize::word_count_from_html(html),
            sentence_count: metrics::sentence_count(&text),
            avg_sentence_len: metrics::avg_sentence_length(&text),
            has_h2: metrics::has_h2(html),
            has_image: metrics::has_image(html),
            has_image_with_alt: metrics::has_image_with_alt(html),
            text,
        }))
    }

    #[tool(description = "List the scoring rules with their IDs, labels and weights, in evaluation order.")]
    async fn list_rules(&self) -> Result<Json<RuleCatalogResponse>, String> {
        Ok(Json(RuleCatalogResponse {
            rules: rules::catalog(),
        }))
    }
}

#[tool_handler]
impl ServerHandler for SeoScorerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "seo-scorer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "On-page SEO scorer for rental listings and blog posts. Use score_content while \
editing a post, score_payload to score the dashboard's raw post JSON, and score_batch to refresh \
stored scores. slugify and analyze_text expose the text helpers; list_rules describes the 17 \
weighted rules behind the score."
                    .to_string(),
            ),
        }
    }
}
