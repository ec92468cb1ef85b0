//! Side-data fetched for a prompt and its typed decoding.
//!
//! Providers answer with lowercase-first (camelCase) field names while the local fallback
//! uses PascalCase. [`Facts::decode`] tries the canonical schema first, then the fallback one.

use crate::error::OrchestratorError;
use crate::shared::Intent;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const NO_MATCH_MESSAGE: &str = "No matching API found for the given prompt";

/// Where a piece of side-data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    /// Live provider response.
    Provider,
    /// Provider failed; hardcoded synthetic values were substituted.
    Fallback,
    /// No intent matched, nothing was fetched.
    NoMatch,
}

/// Per-request enrichment data. Dropped once the response is composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideData {
    pub intent: Intent,
    pub origin: DataOrigin,
    /// Provider message (`"Weather information retrieved"`, ...).
    pub message: String,
    /// Raw `data` object of the provider envelope.
    pub data: Option<serde_json::Value>,
}

impl SideData {
    pub fn no_match() -> Self {
        Self {
            intent: Intent::None,
            origin: DataOrigin::NoMatch,
            message: NO_MATCH_MESSAGE.to_string(),
            data: None,
        }
    }

    pub fn from_provider(intent: Intent, message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            intent,
            origin: DataOrigin::Provider,
            message: message.into(),
            data,
        }
    }

    pub fn fallback(intent: Intent, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            intent,
            origin: DataOrigin::Fallback,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Payload usable for composing, or `None` when there is nothing intent-specific to say.
    pub fn matched_data(&self) -> Option<&serde_json::Value> {
        if self.intent == Intent::None || self.origin == DataOrigin::NoMatch {
            return None;
        }
        self.data.as_ref().filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherFacts {
    pub location: String,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind_speed: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WeatherFallback {
    location: String,
    temperature: String,
    condition: String,
    humidity: String,
    wind_speed: String,
}

impl From<WeatherFallback> for WeatherFacts {
    fn from(f: WeatherFallback) -> Self {
        Self {
            location: f.location,
            temperature: f.temperature,
            condition: f.condition,
            humidity: f.humidity,
            wind_speed: f.wind_speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockFacts {
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub volume: String,
    pub market_cap: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StockFallback {
    symbol: String,
    price: String,
    change: String,
    volume: String,
    market_cap: String,
}

impl From<StockFallback> for StockFacts {
    fn from(f: StockFallback) -> Self {
        Self {
            symbol: f.symbol,
            price: f.price,
            change: f.change,
            volume: f.volume,
            market_cap: f.market_cap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsFacts {
    pub topic: String,
    pub headline: String,
    pub summary: String,
    #[serde(alias = "publishedAt")]
    pub published_date: String,
    pub source: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NewsFallback {
    topic: String,
    headline: String,
    summary: String,
    published_date: String,
    source: String,
}

impl From<NewsFallback> for NewsFacts {
    fn from(f: NewsFallback) -> Self {
        Self {
            topic: f.topic,
            headline: f.headline,
            summary: f.summary,
            published_date: f.published_date,
            source: f.source,
        }
    }
}

/// Decoded side-data, one variant per intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facts {
    Weather(WeatherFacts),
    Stock(StockFacts),
    News(NewsFacts),
}

impl Facts {
    pub fn decode(intent: Intent, data: &serde_json::Value) -> Result<Self, OrchestratorError> {
        let decoded = match intent {
            Intent::Weather => two_step::<WeatherFacts, WeatherFallback>(data).map(Facts::Weather),
            Intent::Stock => two_step::<StockFacts, StockFallback>(data).map(Facts::Stock),
            Intent::News => two_step::<NewsFacts, NewsFallback>(data).map(Facts::News),
            Intent::None => None,
        };
        decoded.ok_or(OrchestratorError::MalformedPayload { intent })
    }
}

fn two_step<C, F>(data: &serde_json::Value) -> Option<C>
where
    C: DeserializeOwned,
    F: DeserializeOwned + Into<C>,
{
    C::deserialize(data)
        .ok()
        .or_else(|| F::deserialize(data).ok().map(Into::into))
}
