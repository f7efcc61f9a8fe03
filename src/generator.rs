use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::StrategyError;
use crate::llm::{GeminiClient, GenerationRequest, TextGenerator, JSON_MIME_TYPE};
use crate::parse::parse_strategy_response;
use crate::prompt::{build_prompt, GenerationOptions};
use crate::strategy::{strategy_output_typedef, StrategyResult};
use crate::types::TypeDef;

/// Turns a topic into a validated [`StrategyResult`] with one provider call.
///
/// Holds only immutable state, so a single instance can serve concurrent
/// callers; the calls do not coordinate with each other.
#[derive(Clone)]
pub struct StrategyGenerator {
    config: GeneratorConfig,
    provider: Arc<dyn TextGenerator>,
    schema: TypeDef,
}

impl StrategyGenerator {
    pub fn new(config: GeneratorConfig, provider: Arc<dyn TextGenerator>) -> Self {
        Self {
            config,
            provider,
            schema: strategy_output_typedef(),
        }
    }

    /// Generator backed by the Gemini HTTP API at `config.base_url`.
    pub fn gemini(config: GeneratorConfig) -> Self {
        let provider = Arc::new(GeminiClient::new(config.base_url.clone()));
        Self::new(config, provider)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Single attempt: no retry, no backoff, no timeout override.
    #[tracing::instrument(skip_all, fields(model = %self.config.model, provider = self.provider.name()))]
    pub async fn generate(
        &self,
        topic: &str,
        options: &GenerationOptions,
    ) -> Result<StrategyResult, StrategyError> {
        let api_key = self
            .config
            .credential()
            .ok_or(StrategyError::MissingCredential)?;

        let prompt = build_prompt(topic, options, &self.config.language, &self.schema);
        debug!(
            prompt_chars = prompt.chars().count(),
            strategy = ?options.strategy_type,
            "prompt built, awaiting provider"
        );

        let request = GenerationRequest {
            model: &self.config.model,
            prompt: &prompt,
            response_mime_type: JSON_MIME_TYPE,
            response_schema: &self.schema,
        };

        let text = match self.provider.generate_text(api_key, &request).await? {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(StrategyError::EmptyResponse),
        };
        debug!(response_chars = text.chars().count(), "provider answered, parsing");

        let result = parse_strategy_response(&text).inspect_err(|e| {
            if let StrategyError::ResponseFormat { detail } = e {
                warn!(%detail, "failed to parse provider response");
            }
        })?;

        info!(keywords = result.keywords.len(), "strategy generated");
        Ok(result)
    }
}
