// src/output.rs
use crate::error::WriteError;
use crate::models::Ledger;
use std::fs;
use std::path::Path;
use tracing::info;

/// Serialize the ledger as `[{ "<address>": { amountNum, amountWei } }]`
pub fn render_ledger(ledger: &Ledger) -> Result<String, WriteError> {
    Ok(serde_json::to_string(&[ledger])?)
}

/// Write the ledger to `path`.
///
/// Goes through a sibling temp file and a rename, so `path` is either the
/// complete new ledger or untouched.
pub fn write_ledger(path: &Path, ledger: &Ledger) -> Result<(), WriteError> {
    let body = render_ledger(ledger)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    if let Err(source) = fs::write(tmp, body.as_bytes()).and_then(|_| fs::rename(tmp, path)) {
        // a failed write can leave a truncated temp file behind
        let _ = fs::remove_file(tmp);
        return Err(WriteError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    info!("Wrote {} ledger entries to {}", ledger.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{aggregate, scale_for_decimals};
    use crate::models::TransferEvent;
    use alloy::primitives::{Address, U256};

    fn sample_ledger() -> Ledger {
        let events = vec![
            TransferEvent {
                from: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".parse().unwrap(),
                to: None,
                amount: U256::from(2_000_000_000_000_000_000u128),
                index: 1,
            },
            TransferEvent {
                from: "0x085c46b94eea357279b301971f75eebf5bc1377b".parse().unwrap(),
                to: None,
                amount: U256::from(1_000_000_000_000_000_000_000_000u128),
                index: 2,
            },
        ];
        aggregate(events, Address::ZERO, scale_for_decimals(18).unwrap()).unwrap()
    }

    #[test]
    fn renders_single_element_array() {
        let json: serde_json::Value =
            serde_json::from_str(&render_ledger(&sample_ledger()).unwrap()).unwrap();

        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        let obj = arr[0].as_object().unwrap();
        assert_eq!(obj.len(), 2);

        let key: Address = "0x085c46b94eea357279b301971f75eebf5bc1377b".parse().unwrap();
        let victim = &obj[&key.to_string()];
        assert_eq!(victim["amountWei"], "1000000000000000000000000");
        assert_eq!(victim["amountNum"], "1000000");
    }

    #[test]
    fn empty_ledger_is_an_empty_object() {
        assert_eq!(render_ledger(&Ledger::new()).unwrap(), "[{}]");
    }

    #[test]
    fn rendering_is_byte_identical() {
        let a = render_ledger(&sample_ledger()).unwrap();
        let b = render_ledger(&sample_ledger()).unwrap();
        assert_eq!(a, b);
        // keys follow address order, not insertion order
        let lower = a.to_lowercase();
        let first = lower.find("0x085c").unwrap();
        let second = lower.find("0xbbbb").unwrap();
        assert!(first < second);
    }

    #[test]
    fn writes_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Victims.json");

        write_ledger(&path, &sample_ledger()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_ledger(&sample_ledger()).unwrap());
        assert!(!dir.path().join("Victims.json.tmp").exists());
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("Victims.json");

        match write_ledger(&path, &sample_ledger()) {
            Err(WriteError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory at the destination makes the rename fail
        let path = dir.path().join("Victims.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "").unwrap();

        assert!(matches!(
            write_ledger(&path, &sample_ledger()),
            Err(WriteError::Io { .. })
        ));
        assert!(!dir.path().join("Victims.json.tmp").exists());
        assert!(path.join("keep").exists());
    }
}
