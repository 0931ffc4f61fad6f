// src/parser.rs
use crate::error::DecodeError;
use crate::models::TransferEvent;
use crate::rpc::Log;
use alloy::primitives::{Address, B256, U256};

/// Which receipt logs count as transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFilter {
    pub signature: B256,
    pub emitter: Option<Address>, // token contract, `None` accepts any
}

impl LogFilter {
    pub fn new(signature: B256) -> Self {
        Self { signature, emitter: None }
    }

    pub fn with_emitter(mut self, emitter: Address) -> Self {
        self.emitter = Some(emitter);
        self
    }

    fn matches(&self, log: &Log) -> bool {
        let Some(topic0) = log.topics.first() else {
            return false;
        };
        if decode_word(topic0).map(B256::from) != Some(self.signature) {
            return false;
        }
        match self.emitter {
            // an emitter that doesn't parse can't be the configured token
            Some(token) => log.address.parse::<Address>().ok() == Some(token),
            None => true,
        }
    }
}

fn decode_word(s: &str) -> Option<[u8; 32]> {
    let bytes = hex::decode(s.trim_start_matches("0x")).ok()?;
    bytes.try_into().ok()
}

fn topic_to_address(index: usize, topic: &str) -> Result<Address, DecodeError> {
    // indexed address: 32 bytes, left padded with 12 zero bytes
    let word = decode_word(topic).ok_or_else(|| DecodeError::InvalidTopic {
        index,
        reason: format!("{topic:?} is not a 32-byte hex word"),
    })?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(DecodeError::InvalidTopic {
            index,
            reason: format!("{topic} has non-zero padding for an address"),
        });
    }
    Ok(Address::from_slice(&word[12..]))
}

fn data_to_amount(index: usize, data: &str) -> Result<U256, DecodeError> {
    let bytes = hex::decode(data.trim_start_matches("0x")).map_err(|e| {
        DecodeError::InvalidData {
            index,
            reason: e.to_string(),
        }
    })?;
    let word: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| DecodeError::InvalidData {
        index,
        reason: format!("expected 32 bytes, got {}", b.len()),
    })?;
    Ok(U256::from_be_bytes(word))
}

/// Decode a single matching log into a `TransferEvent`
pub fn decode_transfer(index: usize, log: &Log) -> Result<TransferEvent, DecodeError> {
    let from_topic = log.topics.get(1).ok_or(DecodeError::MissingTopic { index })?;
    let from = topic_to_address(index, from_topic)?;
    let to = log
        .topics
        .get(2)
        .map(|t| topic_to_address(index, t))
        .transpose()?;
    let amount = data_to_amount(index, &log.data)?;

    Ok(TransferEvent { from, to, amount, index })
}

/// Lazily decode every log matching `filter`, in receipt order.
///
/// Non-matching logs are skipped. A matching log that fails to decode yields
/// an error carrying its position in `logs`.
pub fn decode_transfers<'a>(
    logs: &'a [Log],
    filter: &'a LogFilter,
) -> impl Iterator<Item = Result<TransferEvent, DecodeError>> + 'a {
    logs.iter()
        .enumerate()
        .filter(|(_, log)| filter.matches(log))
        .map(|(index, log)| decode_transfer(index, log))
}
