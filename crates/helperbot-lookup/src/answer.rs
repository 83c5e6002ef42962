//! OpenAI-compatible chat completions adapter for free-text questions.

use async_trait::async_trait;
use helperbot_core::lookup::{AnswerSource, LookupError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::check_response;

/// Default API base.
pub const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model.
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str =
    "あなたはLINEのチャットボットです。質問に日本語で簡潔に答えてください。";

const MAX_TOKENS: u32 = 500;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Posts questions to `{base}/chat/completions` with a bearer key.
#[derive(Clone)]
pub struct OpenAiAnswerClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for OpenAiAnswerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAnswerClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiAnswerClient {
    /// Creates a client.
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            model,
        }
    }
}

/// Extracts the first non-blank choice.
fn first_answer(response: ChatResponse) -> Result<String, LookupError> {
    response
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .map(|content| content.trim().to_owned())
        .find(|content| !content.is_empty())
        .ok_or(LookupError::Empty)
}

#[async_trait]
impl AnswerSource for OpenAiAnswerClient {
    #[instrument(skip(self, question), fields(model = %self.model))]
    async fn answer(&self, question: &str) -> Result<String, LookupError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            max_tokens: MAX_TOKENS,
        };
        let response = check_response(
            self.client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await,
        )?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;
        let answer = first_answer(body)?;
        debug!(chars = answer.chars().count(), "answer received");
        Ok(answer)
    }
}
