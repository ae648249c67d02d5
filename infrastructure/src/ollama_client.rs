use crate::config::Config;
use crate::error::{InfraError, InfraResult};
use domain::ports::{ChatModel, EmbeddingModel};
use domain::session::Message;
use domain::tool_descriptor::ToolDescriptor;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct FunctionTool<'a> {
    r#type: &'static str,
    function: &'a ToolDescriptor,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<FunctionTool<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for a local Ollama server, used for both chat and embeddings.
#[derive(Clone)]
pub struct OllamaClient {
    client: Arc<Client>,
    base_url: String,
    chat_model: String,
    embedding_model: String,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        chat_model: impl Into<String>,
        embedding_model: impl Into<String>,
    ) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_model: chat_model.into(),
            embedding_model: embedding_model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.ollama_base_url,
            &config.chat_model,
            &config.embedding_model,
        )
    }

    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// Fails when the server is unreachable; warns about models it has not pulled.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health_check(&self) -> InfraResult<()> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await?;
        let tags: TagsResponse = Self::check_status(response).await?.json().await?;
        for wanted in [&self.chat_model, &self.embedding_model] {
            if !tags.models.iter().any(|m| model_matches(&m.name, wanted)) {
                warn!(model = %wanted, "model not found on Ollama server, requests may fail");
            }
        }
        Ok(())
    }

    pub async fn generate_embedding(&self, text: &str) -> InfraResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            prompt: text,
        };
        let response = self.client.post(&url).json(&request).send().await?;
        let embedding_response: EmbeddingResponse =
            Self::check_status(response).await?.json().await?;
        Ok(embedding_response.embedding)
    }

    #[instrument(skip_all, fields(messages = messages.len(), tools = tools.len()))]
    pub async fn generate_chat(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> InfraResult<Message> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.chat_model,
            messages,
            tools: tools
                .iter()
                .map(|function| FunctionTool {
                    r#type: "function",
                    function,
                })
                .collect(),
            stream: false,
            options: ChatOptions { temperature: 0.0 },
        };
        let response = self.client.post(&url).json(&request).send().await?;
        let text = Self::check_status(response).await?.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&text)?;
        debug!(
            tool_calls = chat_response.message.tool_calls.len(),
            content_len = chat_response.message.content.len(),
            "chat response"
        );
        Ok(chat_response.message)
    }

    async fn check_status(response: reqwest::Response) -> InfraResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(InfraError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

/// Ollama lists `name:latest` for models pulled without a tag.
fn model_matches(listed: &str, wanted: &str) -> bool {
    listed == wanted || listed.strip_suffix(":latest") == Some(wanted)
}

impl ChatModel for OllamaClient {
    async fn chat(&self, messages: &[Message], tools: &[ToolDescriptor]) -> Result<Message> {
        Ok(self.generate_chat(messages, tools).await?)
    }
}

impl EmbeddingModel for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.generate_embedding(text).await?)
    }
}
