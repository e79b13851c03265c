//! Chat-completion client talking to a remote inference endpoint over HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    Error,
    error::inference_error,
    inference::{InferenceRequest, Model},
};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub endpoint: String,
    /// Per-request timeout. `None` waits for the endpoint indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

/// [`Model`] backed by a chat-completions endpoint. Requests are never retried.
#[derive(Debug, Clone)]
pub struct HttpModel {
    client: Client,
    endpoint: String,
}

impl HttpModel {
    pub fn new(config: InferenceConfig) -> Result<Self, Error> {
        // reqwest's blocking client times out after 30s unless told otherwise
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }
}

impl Model for HttpModel {
    fn complete(&self, request: &InferenceRequest) -> Result<String, Error> {
        let body = ChatBody {
            messages: [
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            top_p: request.top_p,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()?
            .error_for_status()?;
        let text = response.text()?;
        trace!(%text, "inference response");

        let reply: ChatReply = serde_json::from_str(&text)?;
        reply
            .into_completion()
            .ok_or_else(|| inference_error(format!("response carries no completion: {text}")))
    }
}

#[derive(Serialize)]
struct ChatBody<'a> {
    messages: [Message<'a>; 2],
    temperature: f64,
    top_p: f64,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

// Accepts both the flat `{"answer": ...}` shape and OpenAI-style `choices`
#[derive(Deserialize)]
struct ChatReply {
    answer: Option<String>,
    #[serde(default)]
    choices: Vec<ReplyChoice>,
}

#[derive(Deserialize)]
struct ReplyChoice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl ChatReply {
    fn into_completion(self) -> Option<String> {
        self.answer.or_else(|| {
            self.choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
        })
    }
}
