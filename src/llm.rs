use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;
use crate::types::{to_gemini_schema, TypeDef};

pub const JSON_MIME_TYPE: &str = "application/json";

/// One text-generation call, as the generator hands it to a provider.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub response_mime_type: &'a str,
    pub response_schema: &'a TypeDef,
}

/// Seam between the generator and the remote model.
///
/// `Ok(None)` means the provider answered but produced no text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate_text(
        &self,
        api_key: &str,
        request: &GenerationRequest<'_>,
    ) -> Result<Option<String>, ProviderError>;
}

// Wire types for the Gemini `generateContent` endpoint. Shared with the mock
// server so both sides agree on the envelope.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Response carrying a single text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part {
                        text: Some(text.into()),
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
        }
    }

    /// Concatenated text of the first candidate, or `None` when there is none.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        // No timeout override: the transport default applies.
        let http = Client::builder()
            .user_agent(concat!("keyword-strategist/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_text(
        &self,
        api_key: &str,
        request: &GenerationRequest<'_>,
    ) -> Result<Option<String>, ProviderError> {
        let url = self.endpoint(request.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.to_string()),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some(request.response_mime_type.to_string()),
                response_schema: Some(to_gemini_schema(request.response_schema)),
            }),
        };

        tracing::debug!(%url, "sending generateContent request");

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let raw = resp.text().await?;
        let envelope: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(envelope.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_concatenates_parts_of_first_candidate() {
        let envelope: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(envelope.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_text_is_none_without_candidates_or_parts() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), None);

        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert_eq!(blocked.text(), None);

        let no_text: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{}] } }]
        }))
        .unwrap();
        assert_eq!(no_text.text(), None);
    }

    #[test]
    fn test_request_serializes_gemini_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some("hi".to_string()),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some(JSON_MIME_TYPE.to_string()),
                response_schema: Some(json!({ "type": "OBJECT" })),
            }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:8081/");
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:8081/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
