//! Chain state machine.
//!
//! `ChainService` holds the current selection (symbol, expiry, greeks
//! toggle) together with the live snapshot and the last generated chain.
//! It is synchronous; [`ChainWorker`](crate::worker::ChainWorker) drives
//! it on a timer.

use crate::error::{ChainError, ChainResult};
use crate::expiry::days_to_expiry;
use crate::feed::{RandomJitterFeed, SpotFeed};
use crate::generator::{GeneratorSettings, OptionChainGenerator};
use crate::symbols::SymbolTable;
use crate::types::{MarketSnapshot, OptionChain, SymbolMetadata};
use chrono::{NaiveDate, Utc};
use config::ChainSimConfig;
use observability::ChainMetrics;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Result of a selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Selection applied and the chain regenerated.
    Selected,
    /// Symbol not in the table; nothing changed.
    UnknownSymbol,
    /// Expiry not listed for the current symbol; nothing changed.
    UnknownExpiry,
}

impl SelectOutcome {
    pub fn is_selected(&self) -> bool {
        matches!(self, SelectOutcome::Selected)
    }
}

#[derive(Debug)]
struct ChainState {
    symbol: String,
    expiry: String,
    snapshot: MarketSnapshot,
    chain: OptionChain,
}

pub struct ChainService {
    table: SymbolTable,
    generator: OptionChainGenerator,
    feed: Box<dyn SpotFeed>,
    rng: StdRng,
    as_of: Option<NaiveDate>,
    state: Option<ChainState>,
    show_greeks: bool,
    sequence: u64,
    metrics: Option<ChainMetrics>,
}

impl ChainService {
    /// Service with nothing selected yet.
    pub fn new(
        table: SymbolTable,
        generator: OptionChainGenerator,
        feed: Box<dyn SpotFeed>,
        rng: StdRng,
    ) -> Self {
        Self {
            table,
            generator,
            feed,
            rng,
            as_of: None,
            state: None,
            show_greeks: false,
            sequence: 0,
            metrics: None,
        }
    }

    /// Validate `config`, build from it and select the default symbol.
    ///
    /// A seed makes both the spot walk and the grid reproducible.
    pub fn from_config(config: &ChainSimConfig, seed: Option<u64>) -> ChainResult<Self> {
        let report = config::validate_config(config);
        if !report.is_valid() {
            let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
            return Err(ChainError::ConfigError(errors.join("; ")));
        }

        let table = SymbolTable::from_config(&config.symbols, Utc::now().date_naive());
        let generator = OptionChainGenerator::new(GeneratorSettings::from(config));
        let jitter = config.refresh.jitter_pct;

        let (feed, rng) = match seed {
            Some(seed) => (
                RandomJitterFeed::seeded(jitter, seed.wrapping_add(1)),
                StdRng::seed_from_u64(seed),
            ),
            None => (RandomJitterFeed::new(jitter), StdRng::from_entropy()),
        };

        let mut service = Self::new(table, generator, Box::new(feed), rng);
        match service.select_symbol(&config.default_symbol)? {
            SelectOutcome::Selected => Ok(service),
            _ => Err(ChainError::UnknownSymbol(config.default_symbol.clone())),
        }
    }

    /// Pin "today" for expiry arithmetic.
    pub fn with_as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    pub fn with_metrics(mut self, metrics: ChainMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Switch to `symbol`, resetting the snapshot and selecting its
    /// nearest expiry. Unknown symbols leave every piece of state as is.
    #[instrument(skip(self))]
    pub fn select_symbol(&mut self, symbol: &str) -> ChainResult<SelectOutcome> {
        let Some(metadata) = self.table.get(symbol) else {
            debug!("Ignoring selection of unknown symbol");
            self.record_ignored();
            return Ok(SelectOutcome::UnknownSymbol);
        };

        let expiry = metadata
            .expiries
            .first()
            .cloned()
            .ok_or_else(|| ChainError::NoExpiries(symbol.to_string()))?;
        let snapshot = MarketSnapshot::from_metadata(metadata);

        let chain = self.regenerate(symbol, &expiry, snapshot.clone())?;
        info!(%expiry, spot = snapshot.spot_price, "Selected symbol");

        self.state = Some(ChainState {
            symbol: symbol.to_string(),
            expiry,
            snapshot,
            chain,
        });
        Ok(SelectOutcome::Selected)
    }

    /// Switch expiry for the current symbol, keeping the snapshot.
    #[instrument(skip(self))]
    pub fn select_expiry(&mut self, expiry: &str) -> ChainResult<SelectOutcome> {
        let Some(state) = self.state.as_ref() else {
            debug!("No symbol selected; ignoring expiry");
            self.record_ignored();
            return Ok(SelectOutcome::UnknownSymbol);
        };

        let listed = self
            .table
            .get(&state.symbol)
            .is_some_and(|m| m.expiries.iter().any(|e| e == expiry));
        if !listed {
            debug!(symbol = %state.symbol, "Ignoring expiry not listed for symbol");
            self.record_ignored();
            return Ok(SelectOutcome::UnknownExpiry);
        }

        let symbol = state.symbol.clone();
        let snapshot = state.snapshot.clone();
        let chain = self.regenerate(&symbol, expiry, snapshot)?;

        if let Some(state) = self.state.as_mut() {
            state.expiry = expiry.to_string();
            state.chain = chain;
        }
        Ok(SelectOutcome::Selected)
    }

    /// Display toggle only; generation is unaffected.
    pub fn set_show_greeks(&mut self, show: bool) {
        self.show_greeks = show;
    }

    pub fn show_greeks(&self) -> bool {
        self.show_greeks
    }

    /// Move spot once and regenerate the chain.
    ///
    /// Returns `None` while nothing is selected.
    pub fn tick(&mut self) -> ChainResult<Option<&OptionChain>> {
        let Some(state) = self.state.as_ref() else {
            return Ok(None);
        };

        let mut snapshot = state.snapshot.clone();
        let symbol = state.symbol.clone();
        let expiry = state.expiry.clone();

        let spot = self
            .feed
            .next_spot(&snapshot)
            .unwrap_or(snapshot.spot_price);
        let traded = self.feed.traded_volume(&snapshot);
        snapshot.apply_spot(spot, traded);

        let chain = self.regenerate(&symbol, &expiry, snapshot.clone())?;

        match self.state.as_mut() {
            Some(state) => {
                state.snapshot = snapshot;
                state.chain = chain;
                Ok(Some(&state.chain))
            }
            None => Ok(None),
        }
    }

    pub fn current(&self) -> Option<&OptionChain> {
        self.state.as_ref().map(|s| &s.chain)
    }

    pub fn snapshot(&self) -> Option<&MarketSnapshot> {
        self.state.as_ref().map(|s| &s.snapshot)
    }

    pub fn selected_symbol(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.symbol.as_str())
    }

    pub fn selected_expiry(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.expiry.as_str())
    }

    pub fn metadata(&self) -> Option<&SymbolMetadata> {
        self.selected_symbol().and_then(|s| self.table.get(s))
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn record_ignored(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_ignored_selection();
        }
    }

    /// Build a chain without touching the committed state.
    fn regenerate(
        &mut self,
        symbol: &str,
        expiry: &str,
        mut snapshot: MarketSnapshot,
    ) -> ChainResult<OptionChain> {
        let started = Instant::now();
        let days = days_to_expiry(symbol, expiry, self.today())?;
        let metadata = self
            .table
            .get(symbol)
            .ok_or_else(|| ChainError::UnknownSymbol(symbol.to_string()))?;

        let grid = self
            .generator
            .generate_rows(metadata, snapshot.spot_price, days, &mut self.rng);
        let variant = self.generator.settings().variant;
        snapshot.implied_volatility_index = grid.iv_index(variant);

        self.sequence += 1;
        let chain = OptionChain {
            symbol: symbol.to_string(),
            expiry: expiry.to_string(),
            days_to_expiry: days,
            variant,
            snapshot,
            rows: grid.rows,
            atm_strike: grid.atm_strike,
            generated_at: Utc::now(),
            sequence: self.sequence,
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_refresh(
                symbol,
                chain.snapshot.spot_price,
                chain.rows.len(),
                started.elapsed(),
            );
        }
        debug!(symbol, expiry, sequence = self.sequence, "Chain regenerated");

        Ok(chain)
    }
}

impl std::fmt::Debug for ChainService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainService")
            .field("symbols", &self.table.len())
            .field("selected", &self.selected_symbol())
            .field("expiry", &self.selected_expiry())
            .field("show_greeks", &self.show_greeks)
            .field("sequence", &self.sequence)
            .finish()
    }
}
