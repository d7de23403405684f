use async_trait::async_trait;
use blackjack::{AdviceRequest, Advisor, GatewayError};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn advice(&self) -> Result<String, GatewayError> {
        let text = self
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
            .map(str::trim)
            .unwrap_or_default();
        if text.is_empty() {
            return Err(GatewayError::Malformed("no candidate text".to_string()));
        }
        Ok(text.to_string())
    }
}

/// Advisor backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiAdvisor {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiAdvisor {
    pub fn new(api_key: String, model: String) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(http_error)?;
        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model,
            api_key,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// The key travels in a header so it never shows up in a URL.
    fn request(&self, request: &AdviceRequest) -> reqwest::RequestBuilder {
        let body = json!({
            "contents": [{ "parts": [{ "text": request.prompt() }] }]
        });
        self.client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
    }
}

fn http_error(e: reqwest::Error) -> GatewayError {
    GatewayError::Http(e.without_url().to_string())
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn suggest_move(&self, request: &AdviceRequest) -> Result<String, GatewayError> {
        let response = self.request(request).send().await.map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http(format!("{status}: {detail}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.without_url().to_string()))?;
        parsed.advice()
    }
}
