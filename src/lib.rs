//! Rebuild a per-address ledger of token Transfer events from one transaction
//! receipt: who lost how much of a token during an exploit.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod indexer;
pub mod models;
pub mod output;
pub mod parser;
pub mod rpc;
