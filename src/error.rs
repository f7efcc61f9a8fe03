use thiserror::Error;

/// Everything that can end a `generate` call. None of these are retried.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("API key is missing")]
    MissingCredential,

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("No data received from the provider")]
    EmptyResponse,

    /// `detail` carries the decoder/validator message for logs; it is kept
    /// out of the user-facing text.
    #[error("Invalid response format from AI")]
    ResponseFormat { detail: String },
}

impl StrategyError {
    pub fn response_format(detail: impl Into<String>) -> Self {
        StrategyError::ResponseFormat {
            detail: detail.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode provider envelope: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_format_hides_detail() {
        let err = StrategyError::response_format("expected value at line 1 column 1");
        assert_eq!(err.to_string(), "Invalid response format from AI");
    }

    #[test]
    fn test_provider_status_is_verbatim() {
        let err: StrategyError = ProviderError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Provider error: HTTP status 429: quota exceeded");
    }
}
