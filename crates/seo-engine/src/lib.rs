//! On-page SEO scoring for rental listings and blog posts.
//!
//! [`evaluate`] turns a post (title, slug, excerpt, body HTML, cover, tags,
//! focus keyword) into a 0–100 score with per-rule feedback.

pub mod error;
pub mod mcp_api;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod rules;
pub mod score;

pub use error::InputError;
pub use model::{Check, ScoreBand, ScoreMeta, ScoringConfig, ScoringInput, ScoringResult};
pub use score::{evaluate, evaluate_with};
