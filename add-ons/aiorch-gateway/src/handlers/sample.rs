//! Sample information APIs with dummy data, served under `/api/sample`.

use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Standard `{message, data}` provider body.
#[derive(Debug, Serialize)]
pub(crate) struct SampleApiResponse {
    message: String,
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeatherQuery {
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StockQuery {
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewsQuery {
    topic: Option<String>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// GET /api/sample/weather?location=
pub(crate) async fn weather(Query(q): Query<WeatherQuery>) -> Json<SampleApiResponse> {
    let location = or_default(q.location, aiorch_core::DEFAULT_LOCATION);
    tracing::info!(target: "aiorch::sample", %location, "Weather lookup");
    Json(SampleApiResponse {
        message: "Weather information retrieved".to_string(),
        data: Some(serde_json::json!({
            "location": location,
            "temperature": "15°C",
            "condition": "Sunny",
            "humidity": "60%",
            "windSpeed": "10 km/h"
        })),
    })
}

/// GET /api/sample/stock?symbol=
pub(crate) async fn stock(Query(q): Query<StockQuery>) -> Json<SampleApiResponse> {
    let symbol = or_default(q.symbol, aiorch_core::DEFAULT_SYMBOL);
    tracing::info!(target: "aiorch::sample", %symbol, "Stock lookup");
    Json(SampleApiResponse {
        message: "Stock information retrieved".to_string(),
        data: Some(serde_json::json!({
            "symbol": symbol,
            "price": "$150.25",
            "change": "+2.5%",
            "volume": "1,234,567",
            "marketCap": "$2.5T"
        })),
    })
}

/// GET /api/sample/news?topic=
pub(crate) async fn news(Query(q): Query<NewsQuery>) -> Json<SampleApiResponse> {
    let topic = or_default(q.topic, aiorch_core::DEFAULT_TOPIC);
    let published = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    tracing::info!(target: "aiorch::sample", %topic, %published, "News lookup");
    Json(SampleApiResponse {
        message: "News retrieved".to_string(),
        data: Some(serde_json::json!({
            "topic": topic,
            "headline": format!("Latest {} news", topic),
            "summary": format!("This is a summary of the latest news about {}.", topic),
            "publishedDate": published,
            "source": "Sample News API"
        })),
    })
}
