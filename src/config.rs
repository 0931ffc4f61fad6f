use crate::aggregator::scale_for_decimals;
use crate::error::ConfigError;
use crate::rpc::TRANSFER_TOPIC;
use alloy::primitives::{Address, B256, U256};
use dotenvy::dotenv;
use std::{env, path::PathBuf, str::FromStr};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_http_url: String,
    pub tx_hash: B256,
    pub event_signature: B256,
    pub token_address: Option<Address>, // only count logs from this contract
    pub exclude_address: Address,       // known non-victim, e.g. the exploited contract
    pub scale: U256,
    pub output_path: PathBuf,
}

pub fn load() -> Result<Config, ConfigError> {
    dotenv().ok(); // load from .env file if present

    let cfg = from_lookup(|key| env::var(key).ok())?;
    info!("Loaded config: {:?}", cfg);
    Ok(cfg)
}

/// Build a config from any variable source
pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let rpc_http_url = var("RPC_HTTP_URL")
        .or_else(|| var("ETH_RPC_URL")) // alias support
        .unwrap_or_else(|| "http://127.0.0.1:8545".to_string());

    let tx_hash = parse("TX_HASH", var("TX_HASH").ok_or(ConfigError::Missing { var: "TX_HASH" })?)?;

    let event_signature = parse(
        "EVENT_SIGNATURE",
        var("EVENT_SIGNATURE").unwrap_or_else(|| TRANSFER_TOPIC.to_string()),
    )?;

    let token_address = var("TOKEN_ADDRESS")
        .map(|v| parse("TOKEN_ADDRESS", v))
        .transpose()?;

    let exclude_address = var("EXCLUDE_ADDRESS")
        .map(|v| parse("EXCLUDE_ADDRESS", v))
        .transpose()?
        .unwrap_or(Address::ZERO);

    let scale = match var("SCALE") {
        Some(v) => {
            let scale: U256 = parse("SCALE", v.clone())?;
            if scale.is_zero() {
                return Err(ConfigError::Invalid {
                    var: "SCALE",
                    value: v,
                    reason: "must be non-zero".to_string(),
                });
            }
            scale
        }
        None => {
            let decimals: u8 = var("TOKEN_DECIMALS")
                .map(|v| parse("TOKEN_DECIMALS", v))
                .transpose()?
                .unwrap_or(18);
            scale_for_decimals(decimals).ok_or_else(|| ConfigError::Invalid {
                var: "TOKEN_DECIMALS",
                value: decimals.to_string(),
                reason: "10^decimals overflows uint256".to_string(),
            })?
        }
    };

    let output_path = var("OUTPUT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Victims.json"));

    Ok(Config {
        rpc_http_url,
        tx_hash,
        event_signature,
        token_address,
        exclude_address,
        scale,
        output_path,
    })
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TX: &str = "0xf0e4ccb4f88716fa5182da280abdb9ea10ec1c61cfc5bbe87e10bdde07c229d6";

    fn load_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = load_from(&[("TX_HASH", TX)]).unwrap();
        assert_eq!(cfg.rpc_http_url, "http://127.0.0.1:8545");
        assert_eq!(cfg.tx_hash, TX.parse::<B256>().unwrap());
        assert_eq!(cfg.event_signature, TRANSFER_TOPIC.parse::<B256>().unwrap());
        assert_eq!(cfg.token_address, None);
        assert_eq!(cfg.exclude_address, Address::ZERO);
        assert_eq!(cfg.scale, U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(cfg.output_path, PathBuf::from("Victims.json"));
    }

    #[test]
    fn tx_hash_is_required() {
        assert_eq!(
            load_from(&[]).unwrap_err(),
            ConfigError::Missing { var: "TX_HASH" }
        );
        assert_eq!(
            load_from(&[("TX_HASH", "  ")]).unwrap_err(),
            ConfigError::Missing { var: "TX_HASH" }
        );
    }

    #[test]
    fn decimals_and_scale() {
        let cfg = load_from(&[("TX_HASH", TX), ("TOKEN_DECIMALS", "9")]).unwrap();
        assert_eq!(cfg.scale, U256::from(1_000_000_000u64));

        let cfg = load_from(&[("TX_HASH", TX), ("TOKEN_DECIMALS", "9"), ("SCALE", "100")]).unwrap();
        assert_eq!(cfg.scale, U256::from(100));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let err = load_from(&[("TX_HASH", TX), ("SCALE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SCALE", .. }));
    }

    #[test]
    fn exclude_address_any_case() {
        let cfg = load_from(&[
            ("TX_HASH", TX),
            ("EXCLUDE_ADDRESS", "0x085C46B94EEA357279B301971F75EEBF5BC1377B"),
            ("RPC_HTTP_URL", "https://eth.example.org"),
        ])
        .unwrap();
        assert_eq!(
            cfg.exclude_address,
            "0x085c46b94eea357279b301971f75eebf5bc1377b".parse::<Address>().unwrap()
        );
        assert_eq!(cfg.rpc_http_url, "https://eth.example.org");
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = load_from(&[("TX_HASH", TX), ("EXCLUDE_ADDRESS", "0x1234")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "EXCLUDE_ADDRESS", .. }));

        let err = load_from(&[("TX_HASH", "0xnope")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TX_HASH", .. }));

        let err = load_from(&[("TX_HASH", TX), ("TOKEN_DECIMALS", "eighteen")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TOKEN_DECIMALS", .. }));
    }
}
