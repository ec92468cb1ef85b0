//! Shared types used across all orchestrator crates.

use crate::error::OrchestratorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Classified purpose of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Weather,
    Stock,
    News,
    None,
}

impl Intent {
    /// Name reported in `ResultEnvelope::api_called`.
    pub fn api_name(self) -> &'static str {
        match self {
            Intent::Weather => "GetWeather",
            Intent::Stock => "GetStockInfo",
            Intent::News => "GetNews",
            Intent::None => "None",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Response-generation strategy selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiMode {
    /// Forward an enriched prompt to the local Ollama backend.
    Ollama,
    /// Offline, template-based responder.
    Agent,
}

impl AiMode {
    /// Decodes the wire form: `"Ollama"` / `"Agent"` (any case) or the numeric `0` / `1`.
    /// A missing value selects [`AiMode::Ollama`].
    pub fn from_wire(value: Option<&serde_json::Value>) -> Result<Self, OrchestratorError> {
        match value {
            None | Some(serde_json::Value::Null) => Ok(AiMode::Ollama),
            Some(serde_json::Value::String(s)) => s.parse(),
            Some(serde_json::Value::Number(n)) => match n.as_u64() {
                Some(0) => Ok(AiMode::Ollama),
                Some(1) => Ok(AiMode::Agent),
                _ => Err(OrchestratorError::Validation(format!("unsupported AI mode: {}", n))),
            },
            Some(other) => Err(OrchestratorError::Validation(format!(
                "unsupported AI mode: {}",
                other
            ))),
        }
    }
}

impl FromStr for AiMode {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" | "0" => Ok(AiMode::Ollama),
            "agent" | "1" => Ok(AiMode::Agent),
            _ => Err(OrchestratorError::Validation(format!("unsupported AI mode: {}", s))),
        }
    }
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiMode::Ollama => f.write_str("Ollama"),
            AiMode::Agent => f.write_str("Agent"),
        }
    }
}

/// Language used by the canned and instructional templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

/// Uniform result returned to callers. Immutable once built; use the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    result: String,
    api_called: String,
    success: bool,
    error_message: Option<String>,
}

impl ResultEnvelope {
    pub fn ok(result: impl Into<String>, intent: Intent) -> Self {
        Self {
            result: result.into(),
            api_called: intent.api_name().to_string(),
            success: true,
            error_message: None,
        }
    }

    /// Failed envelope. An empty message is replaced so a failure always explains itself.
    pub fn failure(api_called: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error
        };
        Self {
            result: String::new(),
            api_called: api_called.into(),
            success: false,
            error_message: Some(error),
        }
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn api_called(&self) -> &str {
        &self.api_called
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Info provider endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Base URL; `/weather`, `/stock` and `/news` are appended.
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Text-generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

/// Global application configuration. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub language: Language,
    pub provider: ProviderSettings,
    pub ollama: OllamaSettings,
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `AIORCH_*` > `AIORCH_CONFIG` path
    /// (or `config/gateway.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("AIORCH_CONFIG").unwrap_or_else(|_| "config/gateway.toml".to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// Same as [`CoreConfig::load`] with an explicit file path; a missing file is skipped.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("app_name", "AI API Orchestrator")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 5152_i64)?
            .set_default("language", "ko")?
            .set_default("provider.base_url", "http://localhost:5152/api/sample")?
            .set_default("provider.timeout_seconds", 10_i64)?
            .set_default("ollama.base_url", "http://localhost:11434")?
            .set_default("ollama.model", "phi3:mini")?
            .set_default("ollama.timeout_seconds", 30_i64)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("AIORCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        built.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn intent_api_names() {
        assert_eq!(Intent::Weather.api_name(), "GetWeather");
        assert_eq!(Intent::Stock.api_name(), "GetStockInfo");
        assert_eq!(Intent::News.api_name(), "GetNews");
        assert_eq!(Intent::None.to_string(), "None");
    }

    #[test]
    fn mode_parses_names_and_numbers() {
        assert_eq!("Agent".parse::<AiMode>().unwrap(), AiMode::Agent);
        assert_eq!("ollama".parse::<AiMode>().unwrap(), AiMode::Ollama);
        assert_eq!(AiMode::from_wire(Some(&serde_json::json!(1))).unwrap(), AiMode::Agent);
        assert_eq!(AiMode::from_wire(Some(&serde_json::json!(0))).unwrap(), AiMode::Ollama);
        assert_eq!(AiMode::from_wire(None).unwrap(), AiMode::Ollama);
    }

    #[test]
    fn unknown_mode_is_validation_error() {
        let err = AiMode::from_wire(Some(&serde_json::json!("Gpt"))).unwrap_err();
        assert!(matches!(err, OrchestratorError::Validation(_)));
        let err = AiMode::from_wire(Some(&serde_json::json!(7))).unwrap_err();
        assert!(matches!(err, OrchestratorError::Validation(_)));
        assert!(AiMode::from_wire(Some(&serde_json::json!([1]))).is_err());
    }

    #[test]
    fn failure_envelope_always_has_message() {
        let env = ResultEnvelope::failure("None", "  ");
        assert!(!env.success());
        assert_eq!(env.error_message(), Some("unknown error"));
        assert_eq!(env.result(), "");
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let env = ResultEnvelope::ok("hi", Intent::Stock);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["result"], "hi");
        assert_eq!(json["apiCalled"], "GetStockInfo");
        assert_eq!(json["success"], true);
        assert!(json["errorMessage"].is_null());
    }

    #[test]
    fn config_defaults_without_file() {
        let cfg = CoreConfig::load_from(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(cfg.ollama.model, "phi3:mini");
        assert_eq!(cfg.ollama.timeout_seconds, 30);
        assert_eq!(cfg.language, Language::Ko);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "app_name = \"Test Orchestrator\"\nlanguage = \"en\"\n\n[ollama]\nmodel = \"llama3\"\nbase_url = \"http://10.0.0.5:11434\""
        )
        .unwrap();
        let cfg = CoreConfig::load_from(file.path()).unwrap();
        assert_eq!(cfg.app_name, "Test Orchestrator");
        assert_eq!(cfg.language, Language::En);
        assert_eq!(cfg.ollama.model, "llama3");
        assert_eq!(cfg.ollama.base_url, "http://10.0.0.5:11434");
        assert_eq!(cfg.ollama.timeout_seconds, 30);
    }
}
