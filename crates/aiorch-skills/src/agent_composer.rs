//! Agent composer: offline, template-based responses built from side-data.

use aiorch_core::{
    Facts, Intent, Language, NewsFacts, OrchestratorError, ResponseComposer, SideData, StockFacts,
    WeatherFacts,
};

const COMPOSER_NAME: &str = "AgentComposer";

/// Deterministic responder; the output depends only on the prompt, the side-data and the language.
pub struct AgentComposer {
    language: Language,
}

impl AgentComposer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn render(&self, prompt: &str, side_data: &SideData) -> String {
        let Some(data) = side_data.matched_data() else {
            return self.no_data(prompt);
        };
        match Facts::decode(side_data.intent, data) {
            Ok(Facts::Weather(w)) => self.weather(&w),
            Ok(Facts::Stock(s)) => self.stock(&s),
            Ok(Facts::News(n)) => self.news(&n),
            Err(e) => {
                tracing::debug!(target: "aiorch::agent", error = %e, data = %data, "Side-data not usable");
                self.unprocessable(side_data.intent)
            }
        }
    }

    fn no_data(&self, prompt: &str) -> String {
        match self.language {
            Language::Ko => format!(
                "안녕하세요! '{}'에 대한 질문을 받았습니다. 하지만 관련된 특별한 데이터를 찾지 못했습니다. 일반적인 도움을 드릴 수 있습니다.",
                prompt
            ),
            Language::En => format!(
                "Hello! I received your question: '{}'. I couldn't find any relevant data for it, but I'm happy to help in general.",
                prompt
            ),
        }
    }

    fn unprocessable(&self, intent: Intent) -> String {
        match (self.language, intent) {
            (Language::Ko, Intent::Weather) => "날씨 정보를 가져왔지만 데이터 처리 중 문제가 발생했습니다.".into(),
            (Language::Ko, Intent::Stock) => "주식 정보를 가져왔지만 데이터 처리 중 문제가 발생했습니다.".into(),
            (Language::Ko, _) => "뉴스 정보를 가져왔지만 데이터 처리 중 문제가 발생했습니다.".into(),
            (Language::En, Intent::Weather) => {
                "Weather data was retrieved but could not be processed.".into()
            }
            (Language::En, Intent::Stock) => "Stock data was retrieved but could not be processed.".into(),
            (Language::En, _) => "News data was retrieved but could not be processed.".into(),
        }
    }

    fn weather(&self, w: &WeatherFacts) -> String {
        match self.language {
            Language::Ko => format!(
                "{}의 현재 날씨를 알려드리겠습니다.\n\n🌡️ 기온: {}\n☀️ 날씨: {}\n💧 습도: {}\n💨 바람: {}\n\n좋은 하루 되세요!",
                w.location, w.temperature, w.condition, w.humidity, w.wind_speed
            ),
            Language::En => format!(
                "Here is the current weather in {}.\n\n🌡️ Temperature: {}\n☀️ Condition: {}\n💧 Humidity: {}\n💨 Wind: {}\n\nHave a nice day!",
                w.location, w.temperature, w.condition, w.humidity, w.wind_speed
            ),
        }
    }

    fn stock(&self, s: &StockFacts) -> String {
        match self.language {
            Language::Ko => format!(
                "{} 주식 정보를 알려드리겠습니다.\n\n📈 현재가: {}\n📊 변동: {}\n📦 거래량: {}\n💰 시가총액: {}\n\n투자에 참고하시기 바랍니다.",
                s.symbol, s.price, s.change, s.volume, s.market_cap
            ),
            Language::En => format!(
                "Here is the latest on {}.\n\n📈 Price: {}\n📊 Change: {}\n📦 Volume: {}\n💰 Market cap: {}\n\nPlease use this as a reference for your investment decisions.",
                s.symbol, s.price, s.change, s.volume, s.market_cap
            ),
        }
    }

    fn news(&self, n: &NewsFacts) -> String {
        match self.language {
            Language::Ko => format!(
                "{} 관련 최신 뉴스를 알려드리겠습니다.\n\n📰 제목: {}\n📝 요약: {}\n📅 발행일: {}\n📺 출처: {}\n\n더 자세한 내용은 해당 뉴스 사이트를 확인해보세요.",
                n.topic, n.headline, n.summary, n.published_date, n.source
            ),
            Language::En => format!(
                "Here is the latest {} news.\n\n📰 Headline: {}\n📝 Summary: {}\n📅 Published: {}\n📺 Source: {}\n\nCheck the news site for the full story.",
                n.topic, n.headline, n.summary, n.published_date, n.source
            ),
        }
    }
}

impl Default for AgentComposer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

#[async_trait::async_trait]
impl ResponseComposer for AgentComposer {
    fn name(&self) -> &str {
        COMPOSER_NAME
    }

    async fn compose(&self, prompt: &str, side_data: &SideData) -> Result<String, OrchestratorError> {
        Ok(self.render(prompt, side_data))
    }
}
