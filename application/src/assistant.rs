use crate::agent_service::{AgentOptions, AgentService};
use crate::rag_service::{extract_names, KnowledgeBase, RagService};
use crate::retriever_tool::RetrieverTool;
use crate::sql_toolkit::{sql_toolkit, DIALECT};
use crate::tools::ToolSet;
use anyhow::Context;
use domain::models::ExamplePair;
use domain::ports::{ChatModel, EmbeddingModel};
use infrastructure::config::Config;
use infrastructure::finance_db::FinanceDb;
use infrastructure::ollama_client::OllamaClient;
use infrastructure::reference_data::load_example_pairs;
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub retriever_top_k: usize,
    pub sql_top_k: usize,
    pub max_iterations: usize,
}

impl From<&Config> for AssistantSettings {
    fn from(config: &Config) -> Self {
        Self {
            retriever_top_k: config.retriever_top_k,
            sql_top_k: config.sql_top_k,
            max_iterations: config.max_iterations,
        }
    }
}

/// Everything needed to answer questions, built once at startup.
pub struct FinanceAssistant<M> {
    agent: AgentService<M>,
    knowledge: KnowledgeBase,
}

impl FinanceAssistant<OllamaClient> {
    /// Connect to Ollama and the database, load the examples and build the agent.
    ///
    /// Any failure here is fatal; nothing is retried.
    pub async fn initialize(config: &Config) -> Result<Self> {
        let telemetry = Telemetry::new();
        let client = OllamaClient::from_config(config);
        client
            .health_check()
            .await
            .with_context(|| format!("cannot reach Ollama at {}", config.ollama_base_url))?;

        let db = FinanceDb::open_read_only(&config.db_path).with_context(|| {
            format!("cannot open finance database {}", config.db_path.display())
        })?;
        let pairs = load_example_pairs(&config.examples_path).with_context(|| {
            format!("cannot load example queries from {}", config.examples_path.display())
        })?;

        let assistant = Self::assemble(
            client.clone(),
            client,
            Arc::new(db),
            &pairs,
            AssistantSettings::from(config),
        )
        .await?;
        info!(
            elapsed_ms = telemetry.elapsed().as_millis() as u64,
            model = %config.chat_model,
            "assistant initialized"
        );
        Ok(assistant)
    }
}

impl<M: ChatModel + Clone + 'static> FinanceAssistant<M> {
    pub async fn assemble<E: EmbeddingModel + Clone + 'static>(
        chat: M,
        embeddings: E,
        db: Arc<FinanceDb>,
        pairs: &[ExamplePair],
        settings: AssistantSettings,
    ) -> Result<Self> {
        let rag = RagService::new(embeddings);
        let names = extract_names(&db)?;
        let knowledge = rag.build_knowledge_base(pairs, &names).await?;

        let mut tools = ToolSet::new()
            .add_tool(RetrieverTool::sql_examples(
                knowledge.examples.clone(),
                rag.embeddings().clone(),
                settings.retriever_top_k,
            ))?
            .add_tool(RetrieverTool::name_search(
                knowledge.names.clone(),
                rag.embeddings().clone(),
                settings.retriever_top_k,
            ))?;
        for tool in sql_toolkit(db, chat.clone()) {
            tools = tools.add_boxed(tool)?;
        }

        let agent = AgentService::new(
            chat,
            tools,
            AgentOptions {
                dialect: DIALECT.to_string(),
                top_k: settings.sql_top_k,
                max_iterations: settings.max_iterations,
            },
        );
        Ok(Self { agent, knowledge })
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn agent(&self) -> &AgentService<M> {
        &self.agent
    }

    pub async fn ask(&self, question: &str) -> Result<String> {
        self.agent.run_agent(question).await
    }
}
