//! Info provider gateway: calls the weather / stock / news endpoints and substitutes
//! synthetic data whenever a call fails.

use aiorch_core::{
    InfoSource, Intent, OrchestratorError, ProviderSettings, SideData, DEFAULT_LOCATION,
    DEFAULT_SYMBOL, DEFAULT_TOPIC,
};
use std::time::Duration;

/// Provider response body. Field names are matched case-insensitively.
#[derive(Debug)]
struct ProviderEnvelope {
    message: String,
    data: Option<serde_json::Value>,
}

impl ProviderEnvelope {
    fn from_value(value: serde_json::Value) -> Result<Self, String> {
        let serde_json::Value::Object(fields) = value else {
            return Err("body is not a JSON object".to_string());
        };
        let mut envelope = ProviderEnvelope {
            message: String::new(),
            data: None,
        };
        for (key, value) in fields {
            if key.eq_ignore_ascii_case("message") {
                envelope.message = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
            } else if key.eq_ignore_ascii_case("data") {
                envelope.data = Some(value).filter(|v| !v.is_null());
            }
        }
        Ok(envelope)
    }
}

/// HTTP client for the sample information APIs.
pub struct SampleApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl SampleApiClient {
    pub fn new(settings: &ProviderSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    target: "aiorch::provider",
                    error = %e,
                    "HTTP client build failed; using defaults without the configured timeout"
                );
                reqwest::Client::new()
            });
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn call(&self, intent: Intent, parameter: &str) -> Result<ProviderEnvelope, OrchestratorError> {
        let (path, query_key) = match intent {
            Intent::Weather => ("weather", "location"),
            Intent::Stock => ("stock", "symbol"),
            Intent::News => ("news", "topic"),
            Intent::None => {
                return Err(OrchestratorError::Unexpected("no provider for intent None".into()))
            }
        };
        let url = format!("{}/{}", self.base_url, path);
        tracing::info!(target: "aiorch::provider", %url, %parameter, "Calling {} provider", intent);

        let unavailable = |reason: String| OrchestratorError::ProviderUnavailable { intent, reason };
        let response = self
            .client
            .get(&url)
            .query(&[(query_key, parameter)])
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("status {}", status)));
        }
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| unavailable(format!("invalid body: {}", e)))?;
        let envelope =
            ProviderEnvelope::from_value(body).map_err(|e| unavailable(format!("invalid body: {}", e)))?;
        tracing::info!(target: "aiorch::provider", message = %envelope.message, "{} provider answered", intent);
        Ok(envelope)
    }
}

#[async_trait::async_trait]
impl InfoSource for SampleApiClient {
    async fn fetch(&self, intent: Intent, parameter: &str) -> SideData {
        if intent == Intent::None {
            return SideData::no_match();
        }
        let parameter = if parameter.trim().is_empty() {
            default_parameter(intent)
        } else {
            parameter
        };
        match self.call(intent, parameter).await {
            Ok(envelope) => SideData::from_provider(intent, envelope.message, envelope.data),
            Err(e) => {
                tracing::warn!(target: "aiorch::provider", error = %e, "Using fallback data");
                fallback_side_data(intent, parameter)
            }
        }
    }
}

fn default_parameter(intent: Intent) -> &'static str {
    match intent {
        Intent::Weather => DEFAULT_LOCATION,
        Intent::Stock => DEFAULT_SYMBOL,
        Intent::News | Intent::None => DEFAULT_TOPIC,
    }
}

/// Hardcoded plausible values for `intent`, in the PascalCase fallback schema.
pub fn fallback_side_data(intent: Intent, parameter: &str) -> SideData {
    match intent {
        Intent::Weather => SideData::fallback(
            intent,
            "Weather information retrieved (fallback)",
            serde_json::json!({
                "Location": parameter,
                "Temperature": "15°C",
                "Condition": "Sunny",
                "Humidity": "60%",
                "WindSpeed": "10 km/h"
            }),
        ),
        Intent::Stock => SideData::fallback(
            intent,
            "Stock information retrieved (fallback)",
            serde_json::json!({
                "Symbol": parameter,
                "Price": "$150.25",
                "Change": "+2.5%",
                "Volume": "1,234,567",
                "MarketCap": "$2.5T"
            }),
        ),
        Intent::News => SideData::fallback(
            intent,
            "News retrieved (fallback)",
            serde_json::json!({
                "Topic": parameter,
                "Headline": format!("Latest {} news headline", parameter),
                "Summary": format!("This is a summary of the latest {} news article.", parameter),
                "PublishedDate": chrono::Local::now().format("%Y-%m-%d").to_string(),
                "Source": "Tech News Daily"
            }),
        ),
        Intent::None => SideData::no_match(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{closed_port_url, serve};
    use aiorch_core::{DataOrigin, Facts};
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    fn client(base_url: String) -> SampleApiClient {
        SampleApiClient::new(&ProviderSettings {
            base_url,
            timeout_seconds: 2,
        })
    }

    async fn weather(Query(q): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "message": "Weather information retrieved",
            "data": {
                "location": q.get("location").cloned().unwrap_or_default(),
                "temperature": "22°C",
                "condition": "Clear",
                "humidity": "50%",
                "windSpeed": "5 km/h"
            }
        }))
    }

    #[tokio::test]
    async fn live_provider_data_is_passed_through() {
        let base = serve(Router::new().route("/weather", get(weather))).await;
        let side = client(base).fetch(Intent::Weather, "New York").await;
        assert_eq!(side.origin, DataOrigin::Provider);
        assert_eq!(side.message, "Weather information retrieved");
        let Facts::Weather(w) = Facts::decode(Intent::Weather, side.matched_data().unwrap()).unwrap() else {
            panic!("expected weather facts");
        };
        assert_eq!(w.location, "New York");
        assert_eq!(w.temperature, "22°C");
    }

    #[tokio::test]
    async fn pascal_case_envelope_is_accepted() {
        let router = Router::new().route(
            "/stock",
            get(|| async {
                Json(serde_json::json!({
                    "Message": "Stock information retrieved",
                    "Data": { "symbol": "MSFT", "price": "$400", "change": "-1%", "volume": "10", "marketCap": "$3T" }
                }))
            }),
        );
        let base = serve(router).await;
        let side = client(base).fetch(Intent::Stock, "MSFT").await;
        assert_eq!(side.origin, DataOrigin::Provider);
        assert_eq!(side.message, "Stock information retrieved");
        assert!(side.matched_data().is_some());
    }

    #[tokio::test]
    async fn unreachable_provider_falls_back() {
        let side = client(closed_port_url().await).fetch(Intent::Stock, "AAPL").await;
        assert_eq!(side.origin, DataOrigin::Fallback);
        let Facts::Stock(s) = Facts::decode(Intent::Stock, side.matched_data().unwrap()).unwrap() else {
            panic!("expected stock facts");
        };
        assert_eq!(s.symbol, "AAPL");
        assert_eq!(s.price, "$150.25");
    }

    #[tokio::test]
    async fn non_2xx_falls_back() {
        let router = Router::new().route("/news", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let side = client(serve(router).await).fetch(Intent::News, "Science").await;
        assert_eq!(side.origin, DataOrigin::Fallback);
        let Facts::News(n) = Facts::decode(Intent::News, side.matched_data().unwrap()).unwrap() else {
            panic!("expected news facts");
        };
        assert_eq!(n.topic, "Science");
    }

    #[tokio::test]
    async fn undecodable_body_falls_back() {
        let router = Router::new().route("/weather", get(|| async { "not json" }));
        let side = client(serve(router).await).fetch(Intent::Weather, "").await;
        assert_eq!(side.origin, DataOrigin::Fallback);
        assert_eq!(side.data.as_ref().unwrap()["Location"], "Seoul");
    }

    #[tokio::test]
    async fn upper_case_envelope_keys_are_accepted() {
        let router = Router::new().route(
            "/weather",
            get(|| async {
                Json(serde_json::json!({
                    "MESSAGE": "Weather information retrieved",
                    "DATA": { "location": "Paris", "temperature": "18°C", "condition": "Cloudy", "humidity": "70%", "windSpeed": "8 km/h" }
                }))
            }),
        );
        let side = client(serve(router).await).fetch(Intent::Weather, "Paris").await;
        assert_eq!(side.origin, DataOrigin::Provider);
        assert_eq!(side.message, "Weather information retrieved");
        let Facts::Weather(w) = Facts::decode(Intent::Weather, side.matched_data().unwrap()).unwrap() else {
            panic!("expected weather facts");
        };
        assert_eq!(w.location, "Paris");
    }

    #[tokio::test]
    async fn slow_provider_times_out_into_fallback() {
        let router = Router::new().route(
            "/stock",
            get(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(4)).await;
                Json(serde_json::json!({ "message": "too late", "data": null }))
            }),
        );
        let slow = SampleApiClient::new(&ProviderSettings {
            base_url: serve(router).await,
            timeout_seconds: 1,
        });
        let side = slow.fetch(Intent::Stock, "NVDA").await;
        assert_eq!(side.origin, DataOrigin::Fallback);
        assert_eq!(side.data.as_ref().unwrap()["Symbol"], "NVDA");
    }

    #[tokio::test]
    async fn none_intent_short_circuits() {
        let side = client(closed_port_url().await).fetch(Intent::None, "").await;
        assert_eq!(side, SideData::no_match());
    }
}
