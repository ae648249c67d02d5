use crate::tools::{ToolCallError, ToolSet};
use domain::ports::ChatModel;
use domain::prompts::{agent_prefix, AGENT_SUFFIX, ITERATION_LIMIT_ANSWER};
use domain::session::Message;
use domain::tool_descriptor::ToolDescriptor;
use shared::types::Result;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub dialect: String,
    /// Row limit the agent is told to use unless the user asks otherwise.
    pub top_k: usize,
    pub max_iterations: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            dialect: crate::sql_toolkit::DIALECT.to_string(),
            top_k: 10,
            max_iterations: 15,
        }
    }
}

/// SQL question answering: the model calls tools until it can answer in text.
pub struct AgentService<M> {
    model: M,
    tools: ToolSet,
    descriptors: Vec<ToolDescriptor>,
    prefix: String,
    max_iterations: usize,
}

impl<M: ChatModel> AgentService<M> {
    pub fn new(model: M, tools: ToolSet, options: AgentOptions) -> Self {
        Self {
            model,
            descriptors: tools.descriptors(),
            tools,
            prefix: agent_prefix(&options.dialect, options.top_k),
            max_iterations: options.max_iterations.max(1),
        }
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Opening transcript: instructions, the question, then the steering suffix.
    pub fn initial_messages(&self, input: &str) -> Vec<Message> {
        vec![
            Message::system(self.prefix.clone()),
            Message::user(input),
            Message::assistant(AGENT_SUFFIX),
        ]
    }

    pub async fn run_agent(&self, input: &str) -> Result<String> {
        let mut messages = self.initial_messages(input);

        for step in 1..=self.max_iterations {
            let reply = self.model.chat(&messages, &self.descriptors).await?;
            if !reply.has_tool_calls() {
                info!(steps = step, "agent finished");
                return Ok(reply.content.trim().to_string());
            }

            let calls = reply.tool_calls.clone();
            messages.push(reply);
            for call in calls {
                let name = call.function.name;
                debug!(step, tool = %name, arguments = %call.function.arguments, "tool call");
                let output = match self.tools.try_tool_call(&name, &call.function.arguments).await {
                    Ok(output) => output,
                    Err(err @ ToolCallError::NotFound { .. }) => err.to_string(),
                    Err(err) => {
                        warn!(tool = %name, error = %err, "tool call failed");
                        format!("Error: {err}")
                    }
                };
                debug!(tool = %name, output_len = output.len(), "tool output");
                messages.push(Message::tool(name, output));
            }
        }

        warn!(max_iterations = self.max_iterations, "agent hit the iteration limit");
        Ok(ITERATION_LIMIT_ANSWER.to_string())
    }
}
