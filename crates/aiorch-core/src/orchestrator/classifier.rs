//! Keyword classifier: prompt -> (intent, parameter).
//!
//! Tables are scanned in declaration order, so the first listed keyword wins when a
//! prompt mentions several (weather > stock > news).

use crate::shared::Intent;

pub const DEFAULT_LOCATION: &str = "Seoul";
pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const DEFAULT_TOPIC: &str = "Technology";

const KEYWORDS: &[(&str, Intent)] = &[
    ("날씨", Intent::Weather),
    ("weather", Intent::Weather),
    ("주식", Intent::Stock),
    ("stock", Intent::Stock),
    ("뉴스", Intent::News),
    ("news", Intent::News),
];

/// (alias, display name)
const CITIES: &[(&str, &str)] = &[
    ("서울", "Seoul"),
    ("seoul", "Seoul"),
    ("부산", "Busan"),
    ("busan", "Busan"),
    ("대구", "Daegu"),
    ("daegu", "Daegu"),
    ("인천", "Incheon"),
    ("incheon", "Incheon"),
    ("광주", "Gwangju"),
    ("gwangju", "Gwangju"),
    ("대전", "Daejeon"),
    ("daejeon", "Daejeon"),
    ("울산", "Ulsan"),
    ("ulsan", "Ulsan"),
    ("제주", "Jeju"),
    ("jeju", "Jeju"),
    ("tokyo", "Tokyo"),
    ("도쿄", "Tokyo"),
    ("osaka", "Osaka"),
    ("오사카", "Osaka"),
    ("new york", "New York"),
    ("뉴욕", "New York"),
    ("london", "London"),
    ("런던", "London"),
    ("paris", "Paris"),
    ("파리", "Paris"),
    ("beijing", "Beijing"),
    ("베이징", "Beijing"),
    ("shanghai", "Shanghai"),
    ("상하이", "Shanghai"),
];

/// (company name or ticker, ticker)
const TICKERS: &[(&str, &str)] = &[
    ("애플", "AAPL"),
    ("apple", "AAPL"),
    ("aapl", "AAPL"),
    ("삼성", "005930.KS"),
    ("samsung", "005930.KS"),
    ("구글", "GOOGL"),
    ("google", "GOOGL"),
    ("googl", "GOOGL"),
    ("마이크로소프트", "MSFT"),
    ("microsoft", "MSFT"),
    ("msft", "MSFT"),
    ("테슬라", "TSLA"),
    ("tesla", "TSLA"),
    ("tsla", "TSLA"),
];

/// (topic word, topic)
const TOPICS: &[(&str, &str)] = &[
    ("기술", "Technology"),
    ("technology", "Technology"),
    ("tech", "Technology"),
    ("경제", "Economy"),
    ("economy", "Economy"),
    ("정치", "Politics"),
    ("politics", "Politics"),
    ("스포츠", "Sports"),
    ("sports", "Sports"),
    ("연예", "Entertainment"),
    ("entertainment", "Entertainment"),
    ("과학", "Science"),
    ("science", "Science"),
    ("건강", "Health"),
    ("health", "Health"),
    ("환경", "Environment"),
    ("environment", "Environment"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    /// Location, ticker or topic; empty when `intent` is [`Intent::None`].
    pub parameter: String,
}

impl Classification {
    fn none() -> Self {
        Self {
            intent: Intent::None,
            parameter: String::new(),
        }
    }
}

pub fn classify(prompt: &str) -> Classification {
    if prompt.trim().is_empty() {
        return Classification::none();
    }
    let lower = prompt.to_lowercase();

    let intent = KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|&(_, intent)| intent);

    match intent {
        Some(intent) => Classification {
            intent,
            parameter: extract_parameter(intent, &lower),
        },
        None => Classification::none(),
    }
}

fn extract_parameter(intent: Intent, lower_prompt: &str) -> String {
    let (table, default) = match intent {
        Intent::Weather => (CITIES, DEFAULT_LOCATION),
        Intent::Stock => (TICKERS, DEFAULT_SYMBOL),
        Intent::News => (TOPICS, DEFAULT_TOPIC),
        Intent::None => return String::new(),
    };
    first_entity(table, lower_prompt).unwrap_or(default).to_string()
}

fn first_entity(table: &'static [(&'static str, &'static str)], lower_prompt: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(alias, _)| lower_prompt.contains(alias))
        .map(|&(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_with_known_city() {
        let c = classify("What's the weather in Tokyo?");
        assert_eq!(c.intent, Intent::Weather);
        assert_eq!(c.parameter, "Tokyo");
    }

    #[test]
    fn every_city_alias_is_extracted() {
        for (alias, city) in CITIES {
            let c = classify(&format!("weather for {} please", alias));
            assert_eq!(c.intent, Intent::Weather, "alias {alias}");
            assert_eq!(c.parameter, *city, "alias {alias}");
        }
    }

    #[test]
    fn weather_defaults_to_seoul() {
        let c = classify("WEATHER today?");
        assert_eq!(c, Classification { intent: Intent::Weather, parameter: "Seoul".into() });
    }

    #[test]
    fn korean_keywords() {
        let c = classify("부산 날씨 알려줘");
        assert_eq!(c.intent, Intent::Weather);
        assert_eq!(c.parameter, "Busan");

        let c = classify("삼성 주식 어때?");
        assert_eq!(c.intent, Intent::Stock);
        assert_eq!(c.parameter, "005930.KS");
    }

    #[test]
    fn stock_ticker_and_default() {
        assert_eq!(classify("tell me about AAPL stock").parameter, "AAPL");
        assert_eq!(classify("Microsoft stock price").parameter, "MSFT");
        let c = classify("how is the stock market");
        assert_eq!(c.intent, Intent::Stock);
        assert_eq!(c.parameter, "AAPL");
    }

    #[test]
    fn news_topic_and_default() {
        let c = classify("latest sports news");
        assert_eq!(c.intent, Intent::News);
        assert_eq!(c.parameter, "Sports");
        assert_eq!(classify("any news?").parameter, "Technology");
    }

    #[test]
    fn declaration_order_breaks_ties() {
        assert_eq!(classify("news about the weather in London").intent, Intent::Weather);
        assert_eq!(classify("stock news").intent, Intent::Stock);
    }

    #[test]
    fn no_keyword_is_none() {
        let c = classify("hello");
        assert_eq!(c.intent, Intent::None);
        assert!(c.parameter.is_empty());
    }

    #[test]
    fn blank_prompt_is_none() {
        assert_eq!(classify("   \t\n"), Classification::none());
        assert_eq!(classify(""), Classification::none());
    }
}
