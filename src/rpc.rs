// src/rpc.rs
use crate::error::FetchError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

/// ERC20 Transfer event topic keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

const MAX_ATTEMPTS: u32 = 3;
const RETRY_PAUSE: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A raw receipt log as returned by the node. Hex fields stay as strings;
/// the parser decides what is well-formed.
#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    #[serde(default)]
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,

    #[serde(rename = "blockNumber", default)]
    pub block_number_hex: Option<String>,

    #[serde(rename = "transactionHash", default)]
    pub tx_hash: Option<String>,

    #[serde(rename = "logIndex", default)]
    pub log_index_hex: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Receipt {
    logs: Vec<Log>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

// `result` is required: only an explicit `null` means "no such receipt"
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RpcResponse {
    Error { error: RpcErrorObject },
    Success { result: serde_json::Value },
}

/// Fetch the logs of a transaction receipt.
///
/// Transport failures are retried; RPC errors and a missing receipt are not.
pub async fn get_receipt_logs(rpc_url: &str, tx_hash: &str) -> Result<Vec<Log>, FetchError> {
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

    let payload = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_getTransactionReceipt",
        "params": [tx_hash]
    });

    let mut attempt = 1;
    let text = loop {
        info!("Sending eth_getTransactionReceipt -> {} (tx {})", rpc_url, tx_hash);

        match client.post(rpc_url).json(&payload).send().await {
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await?;
                if status != StatusCode::OK {
                    return Err(status_error(status, &text));
                }
                break text;
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                warn!("RPC request failed (attempt {}): {}. Retrying...", attempt, e);
                attempt += 1;
                tokio::time::sleep(RETRY_PAUSE).await;
            }
            Err(e) => return Err(e.into()),
        }
    };
    debug!("Raw receipt response: {}", text);

    let logs = parse_receipt_response(&text, tx_hash)?;
    info!("Receipt {} carries {} logs", tx_hash, logs.len());
    Ok(logs)
}

fn parse_receipt_response(text: &str, tx_hash: &str) -> Result<Vec<Log>, FetchError> {
    match serde_json::from_str::<RpcResponse>(text)? {
        RpcResponse::Error { error } => Err(FetchError::Rpc {
            code: error.code,
            message: error.message,
        }),
        RpcResponse::Success { result } if result.is_null() => Err(FetchError::NotFound {
            tx_hash: tx_hash.to_string(),
        }),
        RpcResponse::Success { result } => {
            let receipt: Receipt = serde_json::from_value(result)?;
            Ok(receipt.logs)
        }
    }
}

/// Some providers put a JSON-RPC error object in a 4xx/5xx body
fn status_error(status: StatusCode, text: &str) -> FetchError {
    match serde_json::from_str::<RpcResponse>(text) {
        Ok(RpcResponse::Error { error }) => FetchError::Rpc {
            code: error.code,
            message: error.message,
        },
        _ => FetchError::Http { status },
    }
}
