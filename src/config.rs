use std::fmt;

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_LANGUAGE: &str = "Persian (Farsi)";

/// Settings for a [`StrategyGenerator`](crate::generator::StrategyGenerator).
///
/// Loaded once at startup and never mutated by the generator.
#[derive(Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Language for every free-text field in the model's answer.
    pub language: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_key: lookup(API_KEY_ENV),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The credential, if one is set and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GeneratorConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_from_lookup_reads_only_api_key() {
        let config = GeneratorConfig::from_lookup(|key| match key {
            "API_KEY" => Some("secret".to_string()),
            _ => Some("ignored".to_string()),
        });
        assert_eq!(config.credential(), Some("secret"));
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let config = GeneratorConfig::default().with_api_key("   ");
        assert_eq!(config.credential(), None);
        assert_eq!(GeneratorConfig::from_lookup(|_| None).credential(), None);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GeneratorConfig::default().with_api_key("secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
