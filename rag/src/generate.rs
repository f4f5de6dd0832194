use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::build_prompt::{build_prompt_with_context, Message};
use crate::error::{RagError, Result};
use crate::http::HttpClient;

/// A loaded chat model. Implementations are read-only after construction
/// and may be shared between calls.
pub trait Generator: Send + Sync {
    fn generate(&self, messages: &[Message]) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct OllamaGenerator {
    http: HttpClient,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(http: HttpClient, base_url: &str, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

impl Generator for OllamaGenerator {
    fn generate(&self, messages: &[Message]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let req = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };
        let res = self.http.post_json::<ChatResponse, _>(&url, &req)?;
        Ok(res.message.and_then(|m| m.content).unwrap_or_default())
    }
}

pub fn try_answer(
    generator: &dyn Generator,
    system_prompt: &str,
    context: &str,
    question: &str,
) -> Result<String> {
    let messages = build_prompt_with_context(system_prompt, context, question);
    generator
        .generate(&messages)
        .map_err(RagError::into_generation)
}

/// Never fails: a model error becomes the returned text so the caller can
/// show it and keep the session going.
pub fn answer(generator: &dyn Generator, system_prompt: &str, context: &str, question: &str) -> String {
    match try_answer(generator, system_prompt, context, question) {
        Ok(text) => {
            info!(chars = text.chars().count(), "generated answer");
            text
        }
        Err(err) => {
            warn!(error = %err, "answer generation failed");
            format!("Error: {}", err)
        }
    }
}
