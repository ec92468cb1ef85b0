//! aiorch-core: prompt routing core (shared types, keyword classifier, dispatcher).
//!
//! Concrete info providers and composers live in `aiorch-skills`; the HTTP host in
//! `aiorch-gateway`.

mod error;
mod orchestrator;
mod shared;
mod side_data;

pub use error::OrchestratorError;

pub use shared::{
    AiMode, CoreConfig, Intent, Language, OllamaSettings, ProviderSettings, ResultEnvelope,
};

pub use side_data::{DataOrigin, Facts, NewsFacts, SideData, StockFacts, WeatherFacts};

pub use orchestrator::{
    classify, Classification, ComposerRegistry, InfoSource, Orchestrator, ResponseComposer,
    DEFAULT_LOCATION, DEFAULT_SYMBOL, DEFAULT_TOPIC,
};
