//! Chain-wide aggregates: totals, put-call ratio and max pain.

use crate::types::{ChainSummary, StrikeRow};

/// Σ put OI / Σ call OI. `None` when there is no call open interest.
pub fn put_call_ratio(rows: &[StrikeRow]) -> Option<f64> {
    let call_oi: u64 = rows.iter().map(|r| r.call.open_interest).sum();
    let put_oi: u64 = rows.iter().map(|r| r.put.open_interest).sum();

    if call_oi == 0 {
        return None;
    }
    Some(put_oi as f64 / call_oi as f64)
}

/// Aggregate payout option writers owe if the underlying settles at `settle`.
pub fn writer_payout(rows: &[StrikeRow], settle: f64) -> f64 {
    rows.iter()
        .map(|r| {
            let call_itm = (settle - r.strike).max(0.0);
            let put_itm = (r.strike - settle).max(0.0);
            call_itm * r.call.open_interest as f64 + put_itm * r.put.open_interest as f64
        })
        .sum()
}

/// Strike at which writers' aggregate payout is smallest.
///
/// Only strikes present in the chain are candidates; ties go to the lower
/// strike.
pub fn max_pain(rows: &[StrikeRow]) -> Option<f64> {
    rows.iter()
        .map(|r| (r.strike, writer_payout(rows, r.strike)))
        .fold(None, |best: Option<(f64, f64)>, (strike, payout)| match best {
            Some((_, best_payout)) if best_payout <= payout => best,
            _ => Some((strike, payout)),
        })
        .map(|(strike, _)| strike)
}

pub fn summarize(rows: &[StrikeRow]) -> ChainSummary {
    ChainSummary {
        total_call_oi: rows.iter().map(|r| r.call.open_interest).sum(),
        total_put_oi: rows.iter().map(|r| r.put.open_interest).sum(),
        total_call_volume: rows.iter().map(|r| r.call.volume).sum(),
        total_put_volume: rows.iter().map(|r| r.put.volume).sum(),
        pcr: put_call_ratio(rows),
        max_pain: max_pain(rows),
    }
}
