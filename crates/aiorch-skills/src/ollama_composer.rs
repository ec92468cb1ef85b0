//! Model-backed composer: embeds side-data into an instruction prompt and forwards it to
//! an Ollama-compatible `/api/generate` endpoint.

use aiorch_core::{
    Facts, Intent, Language, OllamaSettings, OrchestratorError, ResponseComposer, SideData,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const COMPOSER_NAME: &str = "OllamaComposer";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Non-streaming `/api/generate` response; other fields are ignored.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: String,
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    eval_count: Option<u64>,
}

pub struct OllamaComposer {
    settings: OllamaSettings,
    language: Language,
    client: reqwest::Client,
}

impl OllamaComposer {
    pub fn new(settings: OllamaSettings, language: Language) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    target: "aiorch::ollama",
                    error = %e,
                    "HTTP client build failed; using defaults without the configured timeout"
                );
                reqwest::Client::new()
            });
        Self {
            settings,
            language,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        self.settings.base_url.trim_end_matches('/')
    }

    /// Liveness probe against `/api/tags`.
    pub async fn is_available(&self) -> bool {
        match self
            .client
            .get(format!("{}/api/tags", self.base_url()))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Instruction prompt for the backend; falls back to a generic wrapper when there is no usable data.
    pub fn build_enhanced_prompt(&self, prompt: &str, side_data: &SideData) -> String {
        let Some(data) = side_data.matched_data() else {
            return self.generic_prompt(prompt);
        };
        match Facts::decode(side_data.intent, data) {
            Ok(facts) => self.facts_prompt(prompt, &facts),
            Err(_) => self.unprocessable_prompt(prompt, side_data.intent),
        }
    }

    fn generic_prompt(&self, prompt: &str) -> String {
        match self.language {
            Language::Ko => format!(
                "사용자의 질문에 자연스럽고 친근한 한국어로 답변해주세요.\n\n사용자 질문: {}\n",
                prompt
            ),
            Language::En => format!(
                "Answer the user's question in natural, friendly English.\n\nUser question: {}\n",
                prompt
            ),
        }
    }

    fn unprocessable_prompt(&self, prompt: &str, intent: Intent) -> String {
        let (ko, en) = match intent {
            Intent::Weather => ("날씨", "weather"),
            Intent::Stock => ("주식", "stock"),
            _ => ("뉴스", "news"),
        };
        match self.language {
            Language::Ko => format!(
                "사용자 질문: {}\n\n{} 정보를 가져왔지만 처리 중 문제가 발생했습니다.",
                prompt, ko
            ),
            Language::En => format!(
                "User question: {}\n\nThe {} data was retrieved but could not be processed.",
                prompt, en
            ),
        }
    }

    fn facts_prompt(&self, prompt: &str, facts: &Facts) -> String {
        match (self.language, facts) {
            (Language::Ko, Facts::Weather(w)) => format!(
                "사용자가 '{prompt}'라고 질문했습니다.\n\n\
                 다음 날씨 정보를 바탕으로 친근하고 자연스러운 한국어로 답변해주세요:\n\n\
                 위치: {}\n기온: {}\n날씨 상태: {}\n습도: {}\n바람: {}\n\n\
                 이 정보를 활용해서 '{}의 현재 날씨는 {}이고, 기온은 {}입니다' 같은 형식으로 자연스럽게 설명해주세요.",
                w.location, w.temperature, w.condition, w.humidity, w.wind_speed,
                w.location, w.condition, w.temperature
            ),
            (Language::Ko, Facts::Stock(s)) => format!(
                "사용자가 '{prompt}'라고 질문했습니다.\n\n\
                 다음 주식 정보를 바탕으로 친근하고 자연스러운 한국어로 답변해주세요:\n\n\
                 종목: {}\n현재가: {}\n변동률: {}\n거래량: {}\n시가총액: {}\n\n\
                 이 정보를 활용해서 '{} 주식의 현재가는 {}이고, 변동률은 {}입니다' 같은 형식으로 자연스럽게 설명해주세요.",
                s.symbol, s.price, s.change, s.volume, s.market_cap,
                s.symbol, s.price, s.change
            ),
            (Language::Ko, Facts::News(n)) => format!(
                "사용자가 '{prompt}'라고 질문했습니다.\n\n\
                 다음 뉴스 정보를 바탕으로 친근하고 자연스러운 한국어로 답변해주세요:\n\n\
                 주제: {}\n제목: {}\n요약: {}\n발행일: {}\n출처: {}\n\n\
                 이 정보를 활용해서 '{} 관련 최신 뉴스를 알려드리겠습니다. {}...' 같은 형식으로 자연스럽게 설명해주세요.",
                n.topic, n.headline, n.summary, n.published_date, n.source,
                n.topic, n.headline
            ),
            (Language::En, Facts::Weather(w)) => format!(
                "The user asked: '{prompt}'.\n\n\
                 Answer in friendly, natural English using the following weather information:\n\n\
                 Location: {}\nTemperature: {}\nCondition: {}\nHumidity: {}\nWind: {}\n\n\
                 Phrase it like 'The weather in {} is currently {} with a temperature of {}'.",
                w.location, w.temperature, w.condition, w.humidity, w.wind_speed,
                w.location, w.condition, w.temperature
            ),
            (Language::En, Facts::Stock(s)) => format!(
                "The user asked: '{prompt}'.\n\n\
                 Answer in friendly, natural English using the following stock information:\n\n\
                 Symbol: {}\nPrice: {}\nChange: {}\nVolume: {}\nMarket cap: {}\n\n\
                 Phrase it like '{} is trading at {}, a change of {}'.",
                s.symbol, s.price, s.change, s.volume, s.market_cap,
                s.symbol, s.price, s.change
            ),
            (Language::En, Facts::News(n)) => format!(
                "The user asked: '{prompt}'.\n\n\
                 Answer in friendly, natural English using the following news information:\n\n\
                 Topic: {}\nHeadline: {}\nSummary: {}\nPublished: {}\nSource: {}\n\n\
                 Phrase it like 'Here is the latest {} news: {}...'.",
                n.topic, n.headline, n.summary, n.published_date, n.source,
                n.topic, n.headline
            ),
        }
    }

    async fn generate(&self, enhanced_prompt: &str) -> Result<String, OrchestratorError> {
        let base_url = self.base_url();
        let unavailable = |reason: String| OrchestratorError::BackendUnavailable {
            base_url: base_url.to_string(),
            reason,
        };
        let request = GenerateRequest {
            model: &self.settings.model,
            prompt: enhanced_prompt,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(unavailable(format!("status {}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        tracing::debug!(target: "aiorch::ollama", response = %body, "Backend response");
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| OrchestratorError::Unexpected(format!("invalid backend response: {}", e)))?;
        tracing::info!(
            target: "aiorch::ollama",
            model = %parsed.model,
            done = parsed.done,
            eval_count = ?parsed.eval_count,
            "Generation finished"
        );
        Ok(parsed.response)
    }
}

#[async_trait::async_trait]
impl ResponseComposer for OllamaComposer {
    fn name(&self) -> &str {
        COMPOSER_NAME
    }

    async fn compose(&self, prompt: &str, side_data: &SideData) -> Result<String, OrchestratorError> {
        let enhanced = self.build_enhanced_prompt(prompt, side_data);
        tracing::debug!(target: "aiorch::ollama", model = %self.settings.model, prompt = %enhanced, "Enhanced prompt");
        self.generate(&enhanced).await
    }
}
