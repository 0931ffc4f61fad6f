use crate::{aggregator, config::Config, models::Ledger, output, parser, rpc};
use eyre::{Result, WrapErr};
use tracing::{info, warn};

/// Build the victim ledger from logs that are already fetched.
pub fn build_ledger(logs: &[rpc::Log], cfg: &Config) -> Result<Ledger> {
    let mut filter = parser::LogFilter::new(cfg.event_signature);
    if let Some(token) = cfg.token_address {
        filter = filter.with_emitter(token);
    }

    let events = parser::decode_transfers(logs, &filter)
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("decoding receipt logs")?;
    info!("Decoded {} matching transfers out of {} logs", events.len(), logs.len());

    let ledger = aggregator::aggregate(events, cfg.exclude_address, cfg.scale)?;
    Ok(ledger)
}

/// Fetch the receipt, aggregate it and write the output file.
pub async fn run(cfg: &Config) -> Result<Ledger> {
    let tx_hash = cfg.tx_hash.to_string();
    let logs = rpc::get_receipt_logs(&cfg.rpc_http_url, &tx_hash)
        .await
        .wrap_err_with(|| format!("fetching receipt {}", tx_hash))?;

    let ledger = build_ledger(&logs, cfg)?;
    if ledger.is_empty() {
        warn!("No victims found in {}", tx_hash);
    }
    match ledger.total_wei() {
        Some(total) => info!("{} victims, {} raw units in total", ledger.len(), total),
        None => warn!("{} victims, total overflows uint256", ledger.len()),
    }

    output::write_ledger(&cfg.output_path, &ledger)?;
    Ok(ledger)
}
