//! Request dispatch: classify, fetch side-data, compose.

mod classifier;

pub use classifier::{classify, Classification, DEFAULT_LOCATION, DEFAULT_SYMBOL, DEFAULT_TOPIC};

use crate::error::OrchestratorError;
use crate::shared::{AiMode, Intent, ResultEnvelope};
use crate::side_data::SideData;
use std::sync::Arc;

const EMPTY_PROMPT: &str = "prompt is empty";

/// Fetches side-data for a classified prompt. Implementations absorb provider failures.
#[async_trait::async_trait]
pub trait InfoSource: Send + Sync {
    async fn fetch(&self, intent: Intent, parameter: &str) -> SideData;
}

/// Turns a prompt plus side-data into the final text.
#[async_trait::async_trait]
pub trait ResponseComposer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn compose(&self, prompt: &str, side_data: &SideData) -> Result<String, OrchestratorError>;
}

/// Composers keyed by the mode that selects them.
pub struct ComposerRegistry {
    composers: Vec<(AiMode, Arc<dyn ResponseComposer>)>,
}

impl ComposerRegistry {
    pub fn new() -> Self {
        Self {
            composers: Vec::new(),
        }
    }

    /// Registers `composer` for `mode`, replacing any previous one.
    pub fn register(&mut self, mode: AiMode, composer: Arc<dyn ResponseComposer>) {
        self.composers.retain(|(m, _)| *m != mode);
        self.composers.push((mode, composer));
    }

    pub fn get(&self, mode: AiMode) -> Option<Arc<dyn ResponseComposer>> {
        self.composers
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, c)| Arc::clone(c))
    }

    pub fn modes(&self) -> Vec<AiMode> {
        self.composers.iter().map(|(m, _)| *m).collect()
    }
}

impl Default for ComposerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Request dispatcher. Holds only read-only collaborators, so one instance serves all requests.
pub struct Orchestrator {
    info: Arc<dyn InfoSource>,
    composers: Arc<ComposerRegistry>,
}

impl Orchestrator {
    pub fn new(info: Arc<dyn InfoSource>, composers: Arc<ComposerRegistry>) -> Self {
        Self { info, composers }
    }

    /// Runs the pipeline and always returns an envelope; validation failures become
    /// unsuccessful envelopes too.
    pub async fn handle(&self, prompt: &str, mode: AiMode) -> ResultEnvelope {
        match self.try_handle(prompt, mode).await {
            Ok(envelope) => envelope,
            Err(e) => ResultEnvelope::failure(Intent::None.api_name(), e.to_string()),
        }
    }

    /// Like [`Orchestrator::handle`] but reports validation failures as `Err` so the
    /// transport can answer with a client error. Composer failures are still envelopes.
    pub async fn try_handle(&self, prompt: &str, mode: AiMode) -> Result<ResultEnvelope, OrchestratorError> {
        if prompt.trim().is_empty() {
            return Err(OrchestratorError::Validation(EMPTY_PROMPT.to_string()));
        }
        let composer = self.composers.get(mode).ok_or_else(|| {
            OrchestratorError::Validation(format!("unsupported AI mode: {}", mode))
        })?;

        let Classification { intent, parameter } = classify(prompt);
        tracing::info!(
            target: "aiorch::orchestrator",
            intent = %intent,
            parameter = %parameter,
            "Prompt classified"
        );

        let side_data = self.info.fetch(intent, &parameter).await;
        tracing::debug!(
            target: "aiorch::orchestrator",
            origin = ?side_data.origin,
            message = %side_data.message,
            "Side-data ready"
        );

        match composer.compose(prompt, &side_data).await {
            Ok(text) => Ok(ResultEnvelope::ok(text, intent)),
            Err(e) => {
                tracing::warn!(
                    target: "aiorch::orchestrator",
                    composer = composer.name(),
                    error = %e,
                    "Composer failed"
                );
                Ok(ResultEnvelope::failure(intent.api_name(), e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl InfoSource for CountingSource {
        async fn fetch(&self, intent: Intent, parameter: &str) -> SideData {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if intent == Intent::None {
                return SideData::no_match();
            }
            SideData::from_provider(intent, "ok", Some(serde_json::json!({ "param": parameter })))
        }
    }

    struct EchoComposer;

    #[async_trait::async_trait]
    impl ResponseComposer for EchoComposer {
        fn name(&self) -> &str {
            "Echo"
        }

        async fn compose(&self, prompt: &str, side_data: &SideData) -> Result<String, OrchestratorError> {
            let param = side_data
                .matched_data()
                .and_then(|d| d.get("param"))
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            Ok(format!("{} [{}]", prompt, param))
        }
    }

    struct DownComposer;

    #[async_trait::async_trait]
    impl ResponseComposer for DownComposer {
        fn name(&self) -> &str {
            "Down"
        }

        async fn compose(&self, _prompt: &str, _side_data: &SideData) -> Result<String, OrchestratorError> {
            Err(OrchestratorError::BackendUnavailable {
                base_url: "http://127.0.0.1:9".into(),
                reason: "connection refused".into(),
            })
        }
    }

    fn orchestrator() -> (Arc<CountingSource>, Orchestrator) {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let mut registry = ComposerRegistry::new();
        registry.register(AiMode::Agent, Arc::new(EchoComposer));
        registry.register(AiMode::Ollama, Arc::new(DownComposer));
        let orch = Orchestrator::new(source.clone(), Arc::new(registry));
        (source, orch)
    }

    #[tokio::test]
    async fn empty_prompt_fails_without_fetching() {
        let (source, orch) = orchestrator();
        for prompt in ["", "   ", "\n\t"] {
            let env = orch.handle(prompt, AiMode::Agent).await;
            assert!(!env.success());
            assert_eq!(env.error_message(), Some("prompt is empty"));
            let err = orch.try_handle(prompt, AiMode::Ollama).await.unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn agent_mode_reports_intent() {
        let (_source, orch) = orchestrator();
        let env = orch.handle("weather in Paris", AiMode::Agent).await;
        assert!(env.success());
        assert_eq!(env.api_called(), "GetWeather");
        assert_eq!(env.result(), "weather in Paris [Paris]");
    }

    #[tokio::test]
    async fn no_keyword_reports_none() {
        let (_source, orch) = orchestrator();
        let env = orch.handle("hello", AiMode::Agent).await;
        assert!(env.success());
        assert_eq!(env.api_called(), "None");
        assert_eq!(env.result(), "hello [-]");
    }

    #[tokio::test]
    async fn composer_failure_keeps_intent_and_message() {
        let (_source, orch) = orchestrator();
        let env = orch.try_handle("tesla stock", AiMode::Ollama).await.unwrap();
        assert!(!env.success());
        assert_eq!(env.api_called(), "GetStockInfo");
        assert!(env.error_message().unwrap().contains("http://127.0.0.1:9"));
    }

    #[tokio::test]
    async fn unregistered_mode_is_validation_error() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let orch = Orchestrator::new(source.clone(), Arc::new(ComposerRegistry::new()));
        let err = orch.try_handle("weather", AiMode::Agent).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn register_replaces_existing_mode() {
        let mut registry = ComposerRegistry::new();
        registry.register(AiMode::Agent, Arc::new(DownComposer));
        registry.register(AiMode::Agent, Arc::new(EchoComposer));
        assert_eq!(registry.modes(), vec![AiMode::Agent]);
        assert_eq!(registry.get(AiMode::Agent).unwrap().name(), "Echo");
        assert!(registry.get(AiMode::Ollama).is_none());
    }
}
