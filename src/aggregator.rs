use crate::error::LedgerError;
use crate::models::{Ledger, TransferEvent};
use alloy::primitives::{aliases::U512, Address, U256};
use tracing::{debug, info};

/// Fraction digits kept for scales that are not a power of ten
const MIN_FRACTION_DIGITS: usize = 36;

/// `10^decimals` as a scale divisor
pub fn scale_for_decimals(decimals: u8) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(decimals))
}

/// `raw / scale` as a decimal string, `None` for a zero scale.
///
/// Long division on the uint256 parts, so any amount and any scale render.
/// Power-of-ten scales are exact; other scales are truncated after
/// `MIN_FRACTION_DIGITS` (or the scale's digit count, if larger).
pub fn normalize(raw: U256, scale: U256) -> Option<String> {
    if scale.is_zero() {
        return None;
    }
    let (quotient, remainder) = raw.div_rem(scale);
    let mut out = quotient.to_string();
    if remainder.is_zero() {
        return Some(out);
    }

    // widened so `rem * 10` can't overflow when scale is near uint256::MAX
    let ten = U512::from(10u8);
    let divisor = U512::from(scale);
    let mut rem = U512::from(remainder);
    let limit = scale.to_string().len().max(MIN_FRACTION_DIGITS);

    let mut fraction = String::with_capacity(limit);
    while !rem.is_zero() && fraction.len() < limit {
        let (digit, next) = (rem * ten).div_rem(divisor);
        fraction.push(char::from(b'0' + digit.as_limbs()[0] as u8)); // digit < 10
        rem = next;
    }

    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    Some(out)
}

/// Fold transfer events into per-address totals.
///
/// Events from `exclude` and zero amounts are dropped. Raw amounts are summed
/// exactly; the normalized amount is recomputed from the running raw total.
pub fn aggregate<I>(events: I, exclude: Address, scale: U256) -> Result<Ledger, LedgerError>
where
    I: IntoIterator<Item = TransferEvent>,
{
    if scale.is_zero() {
        return Err(LedgerError::ZeroScale);
    }

    let mut ledger = Ledger::new();
    let mut skipped = 0usize;

    for event in events {
        if event.from == exclude || event.amount.is_zero() {
            debug!("Skipping log {} from {} ({})", event.index, event.from, event.amount);
            skipped += 1;
            continue;
        }

        let address = event.from;
        let entry = ledger.entry_mut(address);
        entry.amount_wei = entry
            .amount_wei
            .checked_add(event.amount)
            .ok_or(LedgerError::Overflow { address })?;
        entry.amount_num = normalize(entry.amount_wei, scale).ok_or(LedgerError::ZeroScale)?;

        debug!(
            "Log {}: {} sent {} to {:?} (running total {})",
            event.index, address, event.amount, event.to, entry.amount_wei
        );
    }

    info!("Aggregated {} addresses, skipped {} events", ledger.len(), skipped);
    Ok(ledger)
}
