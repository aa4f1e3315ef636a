//! Text and JSON rendering of chains and the symbol table.

use anyhow::{Context, Result};
use chain::{OptionChain, OptionLeg, StrikeRow, SymbolTable};
use cli::OutputFormat;
use std::fmt::Write;

pub fn render_chain(
    chain: &OptionChain,
    show_greeks: bool,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(chain).context("Failed to serialize chain to JSON")
        }
        OutputFormat::Table => Ok(chain_table(chain, show_greeks)),
    }
}

fn chain_table(chain: &OptionChain, show_greeks: bool) -> String {
    let mut out = String::new();
    let snap = &chain.snapshot;
    let summary = chain.summary();

    let _ = writeln!(
        out,
        "{}  {:.2}  {:+.2} ({:+.2}%)  H {:.2}  L {:.2}  Vol {}",
        chain.symbol,
        snap.spot_price,
        snap.change,
        snap.change_percent,
        snap.high,
        snap.low,
        snap.volume
    );
    let _ = writeln!(
        out,
        "Expiry {} ({}d)  ATM {}  IV {}  PCR {}  Max pain {}  #{}",
        chain.expiry,
        chain.days_to_expiry,
        chain.atm_strike,
        opt(snap.implied_volatility_index, 2),
        opt(summary.pcr, 2),
        opt(summary.max_pain, 0),
        chain.sequence
    );

    let call_cols = leg_header(show_greeks);
    let mut put_cols = call_cols.clone();
    put_cols.reverse();
    let _ = writeln!(out, "{} | {:>10} | {}", call_cols.join(" "), "STRIKE", put_cols.join(" "));

    for row in &chain.rows {
        let _ = writeln!(out, "{}", row_line(row, chain.atm_strike, show_greeks));
    }

    let _ = writeln!(
        out,
        "Total OI  calls {}  puts {}   Volume  calls {}  puts {}",
        summary.total_call_oi,
        summary.total_put_oi,
        summary.total_call_volume,
        summary.total_put_volume
    );
    out
}

fn leg_header(show_greeks: bool) -> Vec<String> {
    let mut cols = vec![
        format!("{:>10}", "OI"),
        format!("{:>9}", "VOL"),
        format!("{:>6}", "IV"),
        format!("{:>9}", "CHG"),
        format!("{:>9}", "BID"),
        format!("{:>9}", "ASK"),
        format!("{:>9}", "LTP"),
    ];
    if show_greeks {
        cols.splice(
            0..0,
            [
                format!("{:>7}", "DELTA"),
                format!("{:>8}", "GAMMA"),
                format!("{:>7}", "THETA"),
                format!("{:>6}", "VEGA"),
            ],
        );
    }
    cols
}

fn leg_cells(leg: &OptionLeg, show_greeks: bool) -> Vec<String> {
    let mut cols = vec![
        format!("{:>10}", leg.open_interest),
        format!("{:>9}", leg.volume),
        format!("{:>6.2}", leg.implied_volatility),
        format!("{:>+9.2}", leg.change_from_previous),
        format!("{:>9.2}", leg.bid),
        format!("{:>9.2}", leg.ask),
        format!("{:>9.2}", leg.last_price),
    ];
    if show_greeks {
        cols.splice(
            0..0,
            [
                format!("{:>7.3}", leg.delta),
                format!("{:>8.5}", leg.gamma),
                format!("{:>7.2}", leg.theta),
                format!("{:>6}", opt(leg.vega, 2)),
            ],
        );
    }
    cols
}

fn row_line(row: &StrikeRow, atm: f64, show_greeks: bool) -> String {
    let calls = leg_cells(&row.call, show_greeks);
    let mut puts = leg_cells(&row.put, show_greeks);
    puts.reverse();

    let marker = if (row.strike - atm).abs() < 1e-9 { '*' } else { ' ' };
    format!(
        "{} | {:>9}{} | {}",
        calls.join(" "),
        row.strike,
        marker,
        puts.join(" ")
    )
}

pub fn render_symbols(table: &SymbolTable, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let symbols: Vec<_> = table.symbols().collect();
        return serde_json::to_string_pretty(&symbols).context("Failed to serialize symbol table");
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<22} {:<6} {:<12} {:>8} {:>6} {:>11} {:>6}  NEXT EXPIRY",
        "SYMBOL", "NAME", "TYPE", "SECTOR", "INTERVAL", "LOT", "REF PRICE", "VOL"
    );
    for meta in table.symbols() {
        let _ = writeln!(
            out,
            "{:<10} {:<22} {:<6} {:<12} {:>8} {:>6} {:>11.2} {:>6.2}  {}",
            meta.symbol,
            meta.display_name,
            meta.instrument_type.to_string(),
            meta.sector.as_deref().unwrap_or("-"),
            meta.strike_interval,
            meta.lot_size,
            meta.reference_price,
            meta.base_volatility(),
            meta.expiries.first().map(String::as_str).unwrap_or("-")
        );
    }
    Ok(out)
}

fn opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "-".to_string())
}
