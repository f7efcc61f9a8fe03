//! Stand-in for the Gemini `generateContent` endpoint, used for local
//! development and by the integration tests.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::llm::{GenerateContentRequest, GenerateContentResponse};

/// Canned answer, fenced the way real models often reply.
pub const CANNED_STRATEGY: &str = r#"```json
{
  "topic": "قهوه ارگانیک",
  "summary": "تمرکز بر خریداران آماده خرید و محتوای آموزشی درباره قهوه ارگانیک.",
  "keywords": [
    {
      "keyword": "خرید قهوه ارگانیک",
      "searchVolume": "High",
      "commercialValue": "High",
      "intent": "Transactional",
      "competition": "Medium",
      "difficultyIndex": 55,
      "rationale": "کاربر آماده خرید است و رقابت متوسط است.",
      "contentFormat": "صفحه محصول",
      "suggestedTitle": "خرید قهوه ارگانیک اصل با ارسال رایگان"
    },
    {
      "keyword": "فواید قهوه ارگانیک",
      "searchVolume": "Medium",
      "commercialValue": "Low",
      "intent": "Informational",
      "competition": "Low",
      "difficultyIndex": 22,
      "rationale": "سوال رایج با رقابت کم.",
      "contentFormat": "راهنمای جامع",
      "suggestedTitle": "۱۰ فایده قهوه ارگانیک که نمی‌دانستید"
    },
    {
      "keyword": "بهترین برند قهوه ارگانیک",
      "searchVolume": "Medium",
      "commercialValue": "High",
      "intent": "Commercial",
      "competition": "High",
      "difficultyIndex": 78,
      "rationale": "مقایسه برندها پیش از خرید.",
      "contentFormat": "مقایسه و بررسی",
      "suggestedTitle": "مقایسه بهترین برندهای قهوه ارگانیک"
    }
  ]
}
```"#;

/// What the mock answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockMode {
    #[default]
    Ok,
    /// Success envelope without candidates.
    Empty,
    /// Truncated JSON text.
    Malformed,
    /// 429 quota error.
    Error,
}

impl FromStr for MockMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(MockMode::Ok),
            "empty" => Ok(MockMode::Empty),
            "malformed" => Ok(MockMode::Malformed),
            "error" => Ok(MockMode::Error),
            other => Err(format!("unknown mock mode: {other}")),
        }
    }
}

pub const DEFAULT_PORT: u16 = 8081;

/// Port from the raw `MOCK_LLM_PORT` value; unset means [`DEFAULT_PORT`].
pub fn parse_port(raw: Option<&str>) -> Result<u16, String> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|e| format!("invalid MOCK_LLM_PORT {raw:?}: {e}")),
    }
}

#[derive(Clone, Default)]
pub struct MockState {
    pub hits: Arc<AtomicUsize>,
    pub mode: MockMode,
}

impl MockState {
    pub fn new(mode: MockMode) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            mode,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/v1beta/models/:call", post(generate_content))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn generate_content(
    State(state): State<MockState>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(request): Json<GenerateContentRequest>,
) -> Response {
    let Some(model) = call.strip_suffix(":generateContent") else {
        return (StatusCode::NOT_FOUND, "unknown method").into_response();
    };

    let attempt = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    let prompt_chars: usize = request
        .contents
        .iter()
        .flat_map(|c| &c.parts)
        .filter_map(|p| p.text.as_deref())
        .map(|t| t.chars().count())
        .sum();
    tracing::info!(attempt, model, prompt_chars, mode = ?state.mode, "mock generateContent");

    let has_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty());
    if !has_key {
        return error_response(StatusCode::UNAUTHORIZED, "API key not valid");
    }

    match state.mode {
        MockMode::Ok => Json(GenerateContentResponse::from_text(CANNED_STRATEGY)).into_response(),
        MockMode::Empty => Json(GenerateContentResponse::default()).into_response(),
        MockMode::Malformed => {
            Json(GenerateContentResponse::from_text("{ \"topic\": \"x\"")).into_response()
        }
        MockMode::Error => error_response(StatusCode::TOO_MANY_REQUESTS, "Resource has been exhausted"),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "error": { "code": status.as_u16(), "message": message }
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_strategy_response;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn request(path: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json");
        if let Some(key) = key {
            builder = builder.header("x-goog-api-key", key);
        }
        builder
            .body(Body::from(
                r#"{"contents":[{"role":"user","parts":[{"text":"hi"}]}]}"#,
            ))
            .unwrap()
    }

    #[test]
    fn test_canned_strategy_parses() {
        let result = parse_strategy_response(CANNED_STRATEGY).unwrap();
        assert_eq!(result.keywords.len(), 3);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("malformed".parse::<MockMode>(), Ok(MockMode::Malformed));
        assert!("OK".parse::<MockMode>().is_err());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(None), Ok(DEFAULT_PORT));
        assert_eq!(parse_port(Some("9000")), Ok(9000));
        assert!(parse_port(Some("80a")).is_err());
        assert!(parse_port(Some("70000")).is_err());
        assert!(parse_port(Some("")).is_err());
    }

    #[tokio::test]
    async fn test_ok_mode_returns_envelope_and_counts() {
        let state = MockState::new(MockMode::Ok);
        let resp = router(state.clone())
            .oneshot(request("/v1beta/models/gemini-2.5-flash:generateContent", Some("k")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let envelope: GenerateContentResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope.text().as_deref(), Some(CANNED_STRATEGY));
        assert_eq!(state.hits(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_unauthorized() {
        let resp = router(MockState::default())
            .oneshot(request("/v1beta/models/gemini-2.5-flash:generateContent", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_method_is_not_found() {
        let state = MockState::default();
        let resp = router(state.clone())
            .oneshot(request("/v1beta/models/gemini-2.5-flash:countTokens", Some("k")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.hits(), 0);
    }
}
