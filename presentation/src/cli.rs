use crate::repl::{run_repl, TerminalSource, THINKING};
use application::assistant::FinanceAssistant;
use clap::Parser;
use colored::Colorize;
use infrastructure::config::Config;
use shared::types::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "finance_agent")]
#[command(about = "Ask questions about your personal finance database in plain English")]
pub struct Cli {
    /// SQLite database of transactions
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// CSV of example questions with columns `user_query` and `SQL_query`
    #[arg(long, value_name = "PATH")]
    pub examples: Option<PathBuf>,

    /// Ollama chat model used by the agent
    #[arg(long)]
    pub chat_model: Option<String>,

    /// Ollama embedding model used for similarity search
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Results returned by each similarity search tool
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Log tool calls and setup steps to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Ask a single question and exit instead of starting the prompt loop
    #[arg(trailing_var_arg = true)]
    pub question: Vec<String>,
}

impl Cli {
    /// Environment settings with command-line flags applied on top.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(examples) = &self.examples {
            config.examples_path = examples.clone();
        }
        if let Some(model) = &self.chat_model {
            config.chat_model = model.clone();
        }
        if let Some(model) = &self.embedding_model {
            config.embedding_model = model.clone();
        }
        if let Some(top_k) = self.top_k {
            config.retriever_top_k = top_k;
        }
        config
    }

    pub fn one_shot_question(&self) -> Option<String> {
        let joined = self.question.join(" ");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

pub struct CliApp {
    config: Config,
}

impl CliApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn from_env(cli: &Cli) -> Self {
        Self::new(cli.apply_to(Config::load()))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&self, cli: Cli) -> Result<()> {
        eprintln!("{}", "Loading examples and building search indexes...".cyan());
        let assistant = FinanceAssistant::initialize(&self.config).await?;

        if let Some(question) = cli.one_shot_question() {
            println!("{}", THINKING.dimmed());
            let answer = assistant.ask(&question).await?;
            println!("{}", answer);
            return Ok(());
        }

        println!(
            "{}",
            "Personal finance agent ready. Ask a question about your transactions.".green()
        );
        let mut source = TerminalSource::detect();
        let mut stdout = std::io::stdout();
        let summary = run_repl(&assistant, &mut source, &mut stdout).await?;
        info!(?summary, "input closed");
        Ok(())
    }
}
