use tracing::info;
use tracing_subscriber::EnvFilter;
use victim_ledger::{config, indexer};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .with_target(false) // cleaner logs
        .init();

    info!("Victim ledger starting...");

    let cfg = config::load()?;
    info!("  RPC URL: {}", cfg.rpc_http_url);
    info!("  Transaction: {}", cfg.tx_hash);
    info!("  Exclude: {}", cfg.exclude_address);
    info!("  Scale: {}", cfg.scale);
    info!("  Output: {}", cfg.output_path.display());

    let ledger = indexer::run(&cfg).await?;

    info!("Done: {} victims written to {}", ledger.len(), cfg.output_path.display());
    Ok(())
}
