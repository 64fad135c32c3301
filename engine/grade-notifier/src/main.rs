use anyhow::{Context, Result};
use clap::Parser;
use grade_notifier::{NotifierConfig, NotifierService};
use ingest_common::{initialize_logging, LoggingConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "grade-notifier", version, about = "Publish Canvas course grades")]
struct Cli {
    /// Enrollment term to report on (overrides CANVAS_TERM_ID)
    #[arg(long)]
    term_id: Option<i64>,

    /// Print the assembled message on stdout
    #[arg(long)]
    print: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    initialize_logging(&LoggingConfig::from_env()?)?;

    let cli = Cli::parse();

    let mut config = NotifierConfig::from_env().context("Failed to load configuration")?;
    if let Some(term_id) = cli.term_id {
        config.canvas.term_id = term_id;
    }
    info!("Loaded configuration: {:?}", config);

    let service = NotifierService::from_config(config).context("Failed to create notifier")?;
    let outcome = service.run().await?;

    if cli.print {
        println!("{}", outcome.message);
    }

    Ok(())
}
