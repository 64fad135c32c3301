use data_lake::{DataLakeConfig, PlayerRecord, SchemaCoverage};
use ingest_common::{initialize_logging, ApiFetcher, AuthHeader, LoggingConfig};
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    initialize_logging(&LoggingConfig::from_env()?)?;

    info!("Checking NFL source API");

    let config = DataLakeConfig::from_env()?;
    let fetcher = ApiFetcher::new(
        AuthHeader::subscription_key(config.get_api_key()?),
        Duration::from_secs(config.source.timeout_secs),
    )?;

    match fetcher.try_fetch(config.endpoint()?).await {
        Ok(records) => {
            info!("✅ Fetched {} records", records.len());

            let players = records.iter().filter_map(PlayerRecord::from_value);
            for (i, player) in players.take(3).enumerate() {
                info!(
                    "  {}. {} ({}) - {}",
                    i + 1,
                    player.display_name(),
                    player.position.as_deref().unwrap_or("?"),
                    player.college.as_deref().unwrap_or("no college listed")
                );
            }

            let coverage = SchemaCoverage::of(&records);
            info!(
                "Schema coverage: {} with PlayerID, {} mismatched, {} total",
                coverage.with_player_id, coverage.mismatched, coverage.total
            );
        }
        Err(e) => {
            error!("❌ Failed to fetch records: {}", e);
        }
    }

    info!("Source check completed!");
    Ok(())
}
