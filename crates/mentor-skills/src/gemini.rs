//! Gemini `generateContent` client over reqwest.

use async_trait::async_trait;
use mentor_core::{ModelClient, ModelError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Live Gemini client. One request per call, no retries.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Builds a client whose every request is bounded by `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Request(e.to_string()))?;
        Ok(Self {
            api_key: api_key.into().trim().to_string(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ModelError::Status(status.as_u16(), text));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| ModelError::Parse(e.to_string()))?;

        // Blocked prompts come back without candidates; treat like an empty reply.
        let reply: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::Router;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> GeminiClient {
        GeminiClient::new(" test-key ", "gemini-test", base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn joins_parts_of_first_candidate() {
        let app = Router::new().fallback(|uri: Uri, headers: HeaderMap, body: Bytes| async move {
            let key_ok = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) == Some("test-key");
            let path_ok = uri.path() == "/v1beta/models/gemini-test:generateContent";
            let req: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
            let prompt_ok = req["contents"][0]["parts"][0]["text"] == "Вопрос: где расписание?";
            if !(key_ok && path_ok && prompt_ok) {
                return (StatusCode::BAD_REQUEST, "unexpected request".to_string());
            }
            let reply = serde_json::json!({
                "candidates": [
                    { "content": { "role": "model", "parts": [{ "text": "Расписание " }, { "text": "в Planfix." }] } },
                    { "content": { "parts": [{ "text": "second candidate" }] } }
                ]
            });
            (StatusCode::OK, reply.to_string())
        });
        let base = serve(app).await;
        let text = client(&format!("{}/", base)).generate("Вопрос: где расписание?").await.unwrap();
        assert_eq!(text, "Расписание в Planfix.");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let app = Router::new().fallback(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota") });
        let base = serve(app).await;
        match client(&base).generate("x").await {
            Err(ModelError::Status(429, body)) => assert_eq!(body, "quota"),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let app = Router::new().fallback(|| async { "not json" });
        let base = serve(app).await;
        assert!(matches!(client(&base).generate("x").await, Err(ModelError::Parse(_))));
    }

    #[tokio::test]
    async fn missing_candidates_is_empty() {
        let app = Router::new().fallback(|| async { r#"{"promptFeedback":{"blockReason":"SAFETY"}}"# });
        let base = serve(app).await;
        assert!(matches!(client(&base).generate("x").await, Err(ModelError::Empty)));
    }

    #[tokio::test]
    async fn whitespace_reply_is_passed_through() {
        let app = Router::new()
            .fallback(|| async { r#"{"candidates":[{"content":{"parts":[{"text":" \n"}]}}]}"# });
        let base = serve(app).await;
        assert_eq!(client(&base).generate("x").await.unwrap(), " \n");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let result = client(&format!("http://{}", addr)).generate("x").await;
        assert!(matches!(result, Err(ModelError::Request(_))));
    }
}
