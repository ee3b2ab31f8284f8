/// Errors raised while decoding a scoring payload.
///
/// Scoring itself never fails; these only cover turning raw caller JSON into
/// a [`crate::model::ScoringInput`].
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
