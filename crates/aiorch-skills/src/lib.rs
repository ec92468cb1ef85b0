//! Concrete collaborators for the orchestrator: the info provider client and the two
//! response composers.

pub use aiorch_core::{InfoSource, ResponseComposer};

mod agent_composer;
mod info_provider;
mod ollama_composer;

#[cfg(any(test, feature = "test-util"))]
pub mod test_support;

pub use agent_composer::AgentComposer;
pub use info_provider::{fallback_side_data, SampleApiClient};
pub use ollama_composer::OllamaComposer;
