use crate::session::Message;
use crate::tool_descriptor::ToolDescriptor;
use shared::types::Result;
use std::future::Future;
use std::sync::Arc;

/// A chat model able to answer with text or with tool calls.
pub trait ChatModel: Send + Sync {
    fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> impl Future<Output = Result<Message>> + Send;
}

/// Turns text into a dense vector.
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send;
}

impl<T: ChatModel> ChatModel for Arc<T> {
    fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> impl Future<Output = Result<Message>> + Send {
        (**self).chat(messages, tools)
    }
}

impl<T: EmbeddingModel> EmbeddingModel for Arc<T> {
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send {
        (**self).embed(text)
    }
}
