use anyhow::Result;
use clap::Parser;
use terminal_lightning::{cli::Cli, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;
    terminal_lightning::run(cli).await
}
