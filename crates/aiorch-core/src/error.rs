//! Error taxonomy for the prompt pipeline.

use crate::shared::Intent;

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Empty prompt or unsupported mode. Client error, never retried.
    #[error("{0}")]
    Validation(String),

    /// Info provider call failed. Recovered locally with fallback data.
    #[error("{intent} provider unavailable: {reason}")]
    ProviderUnavailable { intent: Intent, reason: String },

    /// Text-generation backend unreachable, timed out or answered non-2xx.
    #[error("cannot reach the text-generation backend at {base_url}; make sure it is running ({reason})")]
    BackendUnavailable { base_url: String, reason: String },

    /// Side-data did not carry the fields its intent requires.
    #[error("{intent} data was retrieved but could not be processed")]
    MalformedPayload { intent: Intent },

    #[error("AI processing failed: {0}")]
    Unexpected(String),
}

impl OrchestratorError {
    pub fn is_validation(&self) -> bool {
        matches!(self, OrchestratorError::Validation(_))
    }
}
