use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

const SYSTEM_PROMPT: &str = "You are a social media expert who writes engaging, platform-specific captions. You only output the caption itself, no explanations or meta-commentary.";
const GENERIC_FAILURE: &str = "API request failed";

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Please enter your OpenAI API key")]
    MissingApiKey,
    /// Non-success status from the completion API
    #[error("{0}")]
    Upstream(String),
    #[error("request to the completion API failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion API returned no caption")]
    InvalidResponse,
}

/// Tunables for the completion call
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.8,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Client for an OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    settings: CompletionSettings,
}

impl CompletionClient {
    pub fn new(settings: CompletionSettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    /// One completion call, no retries. The key is checked before anything is sent.
    pub async fn generate_caption(&self, api_key: &str, prompt: &str) -> Result<String, CaptionError> {
        if api_key.trim().is_empty() {
            return Err(CaptionError::MissingApiKey);
        }

        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let endpoint = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        debug!(endpoint = %endpoint, model = %self.settings.model, "Requesting caption");

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody {
                    error: Some(ErrorDetail {
                        message: Some(message),
                    }),
                }) => message,
                _ => GENERIC_FAILURE.to_string(),
            };
            error!(status = %status, message = %message, "Completion API returned an error");
            return Err(CaptionError::Upstream(message));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(CaptionError::InvalidResponse)
    }
}
