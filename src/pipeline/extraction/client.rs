use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::prompt::{ContentBlock, ModelRequest};
use super::ProviderError;
use crate::config::ExtractorConfig;

/// Multimodal model service abstraction (allows mocking).
///
/// Returns the raw text of the model's reply; interpreting it is the
/// normalizer's job.
pub trait ModelClient {
    fn complete(&self, request: &ModelRequest) -> Result<String, ProviderError>;
}

/// Blocking client for OpenAI-compatible `/chat/completions` endpoints.
///
/// Decoding is deterministic (temperature 0) and the reply is constrained to
/// a JSON object.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(config: &ExtractorConfig) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for `/chat/completions`.
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ChatContentPart>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ChatContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Debug, PartialEq)]
struct ImageUrl {
    url: String,
}

/// Response body from `/chat/completions` (only the parts we read).
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

fn to_content_part(block: &ContentBlock) -> ChatContentPart {
    match block {
        ContentBlock::Text(text) => ChatContentPart::Text { text: text.clone() },
        ContentBlock::Image { .. } => ChatContentPart::ImageUrl {
            image_url: ImageUrl {
                url: block.data_url().unwrap_or_default(),
            },
        },
    }
}

fn build_chat_request<'a>(model: &'a str, request: &ModelRequest) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: vec![ChatContentPart::Text {
                    text: request.system.clone(),
                }],
            },
            ChatMessage {
                role: "user",
                content: request.blocks.iter().map(to_content_part).collect(),
            },
        ],
        temperature: 0.0,
        response_format: ResponseFormat {
            kind: "json_object",
        },
    }
}

impl ModelClient for OpenAiClient {
    fn complete(&self, request: &ModelRequest) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = build_chat_request(&self.model, request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ProviderError::Connection(self.base_url.clone())
                } else {
                    ProviderError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Unauthorized,
                429 => ProviderError::RateLimited,
                code => ProviderError::Api { status: code, body },
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| ProviderError::InvalidReply(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidReply("reply carried no message content".into()))
    }
}

/// Mock model client: returns a configured reply or error and remembers the
/// last request it was given.
pub struct MockModelClient {
    reply: Result<String, ProviderError>,
    last_request: Mutex<Option<ModelRequest>>,
}

impl MockModelClient {
    pub fn new(response: &str) -> Self {
        Self {
            reply: Ok(response.to_string()),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            last_request: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<ModelRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ModelClient for MockModelClient {
    fn complete(&self, request: &ModelRequest) -> Result<String, ProviderError> {
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }
        self.reply.clone()
    }
}
