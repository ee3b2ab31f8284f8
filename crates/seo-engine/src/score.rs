use tracing::debug;

use crate::metrics::ContentMetrics;
use crate::model::{Check, ScoreBand, ScoreMeta, ScoringConfig, ScoringInput, ScoringResult};
use crate::rules::RULES;

/// Score content with the default configuration.
pub fn evaluate(input: &ScoringInput) -> ScoringResult {
    evaluate_with(input, &ScoringConfig::default())
}

/// Score content: extract metrics, run every rule, aggregate.
///
/// Always returns a complete result; degraded input only lowers the score.
pub fn evaluate_with(input: &ScoringInput, config: &ScoringConfig) -> ScoringResult {
    let metrics = ContentMetrics::extract(input, config);
    let checks: Vec<Check> = RULES.iter().map(|rule| rule.check(&metrics)).collect();
    let score = weighted_score(&checks);

    let (good, rest): (Vec<Check>, Vec<Check>) = checks.iter().cloned().partition(|c| c.ok);
    let (warn, bad): (Vec<Check>, Vec<Check>) = rest.into_iter().partition(|c| c.score > 0.0);

    debug!(
        score,
        good = good.len(),
        warn = warn.len(),
        bad = bad.len(),
        total_words = metrics.total_words,
        "content evaluated"
    );

    ScoringResult {
        score,
        band: ScoreBand::from_score(score),
        meta: ScoreMeta {
            total_words: metrics.total_words,
            density: metrics.density,
            avg_sentence_len: metrics.avg_sentence_len,
            title_len: metrics.title_len,
            slug_len: metrics.slug_len,
            desc_len: metrics.desc_len,
            kw_count: metrics.kw_count,
        },
        checks,
        good,
        warn,
        bad,
    }
}

fn weighted_score(checks: &[Check]) -> u8 {
    let total_weight: f64 = checks.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return 0;
    }
    let weighted_sum: f64 = checks.iter().map(|c| c.score * c.weight).sum();
    (weighted_sum / total_weight * 100.0).round().clamp(0.0, 100.0) as u8
}
