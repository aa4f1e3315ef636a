//! Static symbol lookup table.

use crate::expiry::ExpiryGenerator;
use crate::types::SymbolMetadata;
use chrono::NaiveDate;
use config::SymbolConfig;
use std::collections::HashMap;
use tracing::debug;

/// Symbols available for selection, in configuration order.
///
/// Loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolMetadata>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    /// Build the table, generating expiries from `today` for symbols
    /// that configure none. Later duplicates of a symbol are ignored.
    pub fn from_config(symbols: &[SymbolConfig], today: NaiveDate) -> Self {
        let mut table = Self::default();

        for config in symbols {
            if table.index.contains_key(&config.symbol) {
                debug!(symbol = %config.symbol, "Skipping duplicate symbol");
                continue;
            }

            let mut metadata = SymbolMetadata::from_config(config);
            if metadata.expiries.is_empty() {
                metadata.expiries =
                    ExpiryGenerator::for_instrument(metadata.instrument_type, today);
            }

            table
                .index
                .insert(metadata.symbol.clone(), table.entries.len());
            table.entries.push(metadata);
        }

        table
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolMetadata> {
        self.index.get(symbol).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &SymbolMetadata> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InstrumentType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn test_builtin_table() {
        let table = SymbolTable::from_config(&config::default_symbols(), today());

        assert_eq!(table.len(), 7);
        let nifty = table.get("NIFTY").unwrap();
        assert_eq!(nifty.instrument_type, InstrumentType::Index);
        assert_eq!(nifty.strike_interval, 50.0);
        assert_eq!(nifty.lot_size, 75);
        assert_eq!(nifty.expiries.first().map(String::as_str), Some("2025-01-09"));

        let tcs = table.get("TCS").unwrap();
        assert_eq!(tcs.expiries, vec!["2025-01-30", "2025-02-27", "2025-03-27"]);

        assert!(table.get("nifty").is_none());
        assert!(!table.contains("UNKNOWN"));
    }

    #[test]
    fn test_configured_expiries_are_kept() {
        let mut symbols = config::default_symbols();
        symbols[0].expiries = vec!["2030-01-31".to_string()];
        let table = SymbolTable::from_config(&symbols, today());

        assert_eq!(table.get("NIFTY").unwrap().expiries, vec!["2030-01-31"]);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let mut symbols = config::default_symbols();
        let mut dup = symbols[0].clone();
        dup.lot_size = 1;
        symbols.push(dup);

        let table = SymbolTable::from_config(&symbols, today());

        assert_eq!(table.len(), 7);
        assert_eq!(table.get("NIFTY").unwrap().lot_size, 75);
        assert_eq!(table.symbols().next().unwrap().symbol, "NIFTY");
    }
}
