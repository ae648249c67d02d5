use application::assistant::FinanceAssistant;
use colored::Colorize;
use dialoguer::Input;
use domain::ports::ChatModel;
use shared::types::Result;
use std::future::Future;
use std::io::{BufRead, IsTerminal, Write};
use tracing::warn;

pub const EMPTY_INPUT_REMINDER: &str = "Please enter a question. Ctrl+C to Quit.\n";
pub const THINKING: &str = "\nThinking...\n";

/// Anything that can turn a question into an answer.
pub trait Answerer {
    fn answer(&self, question: &str) -> impl Future<Output = Result<String>>;
}

impl<M: ChatModel + Clone + 'static> Answerer for FinanceAssistant<M> {
    fn answer(&self, question: &str) -> impl Future<Output = Result<String>> {
        self.ask(question)
    }
}

/// Source of user input, one line at a time. `None` means end of input.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<String>>;
}

pub struct BufReadSource<R> {
    reader: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Interactive prompt on a terminal, plain line reads when stdin is piped.
pub enum TerminalSource {
    Prompt,
    Piped(BufReadSource<std::io::StdinLock<'static>>),
}

impl TerminalSource {
    pub fn detect() -> Self {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            Self::Prompt
        } else {
            Self::Piped(BufReadSource::new(stdin.lock()))
        }
    }
}

impl LineSource for TerminalSource {
    fn next_line(&mut self) -> Result<Option<String>> {
        match self {
            Self::Prompt => {
                let line: String = Input::new()
                    .with_prompt("Question")
                    .allow_empty(true)
                    .interact_text()?;
                Ok(Some(line))
            }
            Self::Piped(source) => source.next_line(),
        }
    }
}

/// Counters from one interactive session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplSummary {
    pub answered: usize,
    pub failed: usize,
    pub skipped_empty: usize,
}

/// Read questions until end of input, answering each in turn.
///
/// Blank lines are never forwarded. A failed question is reported and the
/// loop carries on with the next one.
pub async fn run_repl<A, S, W>(answerer: &A, source: &mut S, out: &mut W) -> Result<ReplSummary>
where
    A: Answerer,
    S: LineSource,
    W: Write,
{
    let mut summary = ReplSummary::default();
    while let Some(line) = source.next_line()? {
        let question = line.trim();
        if question.is_empty() {
            writeln!(out, "{}", EMPTY_INPUT_REMINDER)?;
            summary.skipped_empty += 1;
            continue;
        }

        writeln!(out, "{}", THINKING.dimmed())?;
        out.flush()?;
        match answerer.answer(question).await {
            Ok(answer) => {
                writeln!(out, "{}", answer)?;
                summary.answered += 1;
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "question failed");
                writeln!(out, "{} {:#}", "Error:".red().bold(), err)?;
                summary.failed += 1;
            }
        }
        out.flush()?;
    }
    Ok(summary)
}
