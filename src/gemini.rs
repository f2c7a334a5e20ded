//! Blocking client for the Gemini `generateContent` endpoint.
//!
//! For request/response schemas, see the [Gemini API docs](https://ai.google.dev/api/generate-content).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{ChatError, ServiceError};
use crate::transcript::{Role, Turn};
use crate::ModelService;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A `contents[].parts` item
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

/// A `contents` item
#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
}

/// A `generateContent` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

/// A `generateContent` response body
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    }
}

/// Build the request body for a conversation. Assistant turns go out with
/// the API's `model` role.
pub fn build_request(config: &Config, turns: &[Turn]) -> GenerateRequest {
    let contents = turns
        .iter()
        .map(|turn| {
            let role = match turn.role() {
                Role::User => "user",
                Role::Assistant => "model",
            };
            text_content(Some(role), turn.text())
        })
        .collect();
    GenerateRequest {
        contents,
        system_instruction: text_content(None, &config.system_prompt),
        generation_config: GenerationConfig {
            temperature: config.temperature,
        },
    }
}

/// Pull the reply text out of a response: the joined text parts of the
/// first candidate. A reply with no usable text is an error.
pub fn extract_reply(response: GenerateResponse) -> Result<String, ServiceError> {
    let reply: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if reply.trim().is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    Ok(reply)
}

/// Turn a non-success HTTP status and body into a service error, preferring
/// the API's own `error.message` when the body carries one.
pub fn status_error(status: u16, body: &str) -> ServiceError {
    if status == 429 {
        return ServiceError::RateLimited;
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    ServiceError::Api { status, message }
}

/// Gemini API client.
pub struct GeminiClient {
    config: Config,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, ChatError> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .build()
            .map_err(ChatError::HttpClient)?;
        Ok(Self {
            config: config.clone(),
            http,
        })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl ModelService for GeminiClient {
    fn generate(&self, turns: &[Turn]) -> Result<String, ServiceError> {
        let body = build_request(&self.config, turns);
        debug!(model = %self.config.model, turns = turns.len(), "Gemini API request");

        let response = self
            .http
            .post(self.api_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), "Gemini API request failed");
            return Err(status_error(status.as_u16(), &text));
        }

        let parsed: GenerateResponse = response.json()?;
        let reply = extract_reply(parsed)?;
        debug!(chars = reply.len(), "Gemini API reply received");
        Ok(reply)
    }
}
