use clap::Parser;
use presentation::cli::{Cli, CliApp};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    shared::telemetry::init_tracing(cli.verbose);
    let app = CliApp::from_env(&cli);
    app.run(cli).await
}
