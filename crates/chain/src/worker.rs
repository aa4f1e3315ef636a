//! Timer-driven refresh of a [`ChainService`].
//!
//! The worker owns the only lifecycle resource in the crate: a tokio
//! interval that ticks the service and publishes each new chain on a
//! `watch` channel. `start()` spawns it, [`WorkerHandle::stop`] cancels it.

use crate::error::{ChainError, ChainResult};
use crate::service::{ChainService, SelectOutcome};
use crate::types::OptionChain;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info};

/// Latest chain as seen by subscribers.
pub type ChainUpdate = Option<Arc<OptionChain>>;

pub struct ChainWorker {
    service: Arc<RwLock<ChainService>>,
    interval: Duration,
    updates: Arc<watch::Sender<ChainUpdate>>,
}

impl ChainWorker {
    /// Wrap `service`, publishing its current chain straight away.
    pub fn new(service: ChainService, interval: Duration) -> Self {
        let initial = service.current().cloned().map(Arc::new);
        let (updates, _) = watch::channel(initial);

        Self {
            service: Arc::new(RwLock::new(service)),
            interval: interval.max(Duration::from_millis(1)),
            updates: Arc::new(updates),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ChainUpdate> {
        self.updates.subscribe()
    }

    pub fn service(&self) -> Arc<RwLock<ChainService>> {
        Arc::clone(&self.service)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Select a symbol and publish the fresh chain without waiting for
    /// the next tick. Unknown symbols publish nothing.
    pub async fn select_symbol(&self, symbol: &str) -> ChainResult<SelectOutcome> {
        let mut service = self.service.write().await;
        let outcome = service.select_symbol(symbol)?;
        if outcome.is_selected() {
            publish(&self.updates, service.current());
        }
        Ok(outcome)
    }

    pub async fn select_expiry(&self, expiry: &str) -> ChainResult<SelectOutcome> {
        let mut service = self.service.write().await;
        let outcome = service.select_expiry(expiry)?;
        if outcome.is_selected() {
            publish(&self.updates, service.current());
        }
        Ok(outcome)
    }

    pub async fn set_show_greeks(&self, show: bool) {
        self.service.write().await.set_show_greeks(show);
    }

    pub async fn show_greeks(&self) -> bool {
        self.service.read().await.show_greeks()
    }

    pub async fn current(&self) -> ChainUpdate {
        self.service.read().await.current().cloned().map(Arc::new)
    }

    /// Spawn the refresh loop. The first refresh happens one interval
    /// after start.
    pub fn start(&self) -> WorkerHandle {
        let token = CancellationToken::new();
        let service = Arc::clone(&self.service);
        let updates = Arc::clone(&self.updates);
        let period = self.interval;
        let loop_token = token.clone();

        info!(interval_ms = period.as_millis() as u64, "Starting chain worker");

        let join = tokio::spawn(async move {
            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the chain is already current
            timer.tick().await;

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => {
                        info!("Chain worker stopped");
                        return;
                    }
                    _ = timer.tick() => {
                        let mut service = service.write().await;
                        match service.tick() {
                            Ok(Some(chain)) => publish(&updates, Some(chain)),
                            Ok(None) => debug!("No symbol selected; skipping refresh"),
                            Err(e) => error!("Chain refresh failed: {}", e),
                        }
                    }
                }
            }
        });

        WorkerHandle {
            _guard: token.clone().drop_guard(),
            token,
            join,
        }
    }
}

fn publish(updates: &watch::Sender<ChainUpdate>, chain: Option<&OptionChain>) {
    if let Some(chain) = chain {
        updates.send_replace(Some(Arc::new(chain.clone())));
    }
}

/// Running refresh loop. Dropping the handle cancels the loop.
pub struct WorkerHandle {
    token: CancellationToken,
    _guard: DropGuard,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token that stops the loop when cancelled, e.g. from a signal handler.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel the timer and wait for the loop to exit.
    pub async fn stop(self) -> ChainResult<()> {
        self.token.cancel();

        self.join
            .await
            .map_err(|e| ChainError::WorkerFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::RandomJitterFeed;
    use crate::generator::OptionChainGenerator;
    use crate::symbols::SymbolTable;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn worker(interval_ms: u64) -> ChainWorker {
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let table = SymbolTable::from_config(&config::default_symbols(), today);
        let mut service = ChainService::new(
            table,
            OptionChainGenerator::default(),
            Box::new(RandomJitterFeed::seeded(0.1, 3)),
            StdRng::seed_from_u64(3),
        )
        .with_as_of(today);
        service.select_symbol("NIFTY").unwrap();

        ChainWorker::new(service, Duration::from_millis(interval_ms))
    }

    fn sequence(rx: &watch::Receiver<ChainUpdate>) -> u64 {
        rx.borrow().as_ref().map(|c| c.sequence).unwrap_or(0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_every_interval() {
        let worker = worker(3000);
        let mut rx = worker.subscribe();
        assert_eq!(sequence(&rx), 1);

        let handle = worker.start();

        rx.changed().await.unwrap();
        assert_eq!(sequence(&rx), 2);

        rx.changed().await.unwrap();
        assert_eq!(sequence(&rx), 3);

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_refresh_before_first_interval() {
        let worker = worker(3000);
        let rx = worker.subscribe();
        let handle = worker.start();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(sequence(&rx), 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(sequence(&rx), 2);

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_refresh() {
        let worker = worker(3000);
        let rx = worker.subscribe();
        let handle = worker.start();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let seen = sequence(&rx);
        assert!(!handle.is_stopped());

        handle.stop().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(sequence(&rx), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels() {
        let worker = worker(1000);
        let handle = worker.start();
        let token = handle.token();

        drop(handle);

        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_publishes_immediately() {
        let worker = worker(3000);
        let rx = worker.subscribe();

        let outcome = worker.select_symbol("BANKNIFTY").await.unwrap();

        assert_eq!(outcome, SelectOutcome::Selected);
        let chain = rx.borrow().clone().unwrap();
        assert_eq!(chain.symbol, "BANKNIFTY");
        assert_eq!(chain.sequence, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_symbol_publishes_nothing() {
        let worker = worker(3000);
        let rx = worker.subscribe();
        let before = rx.borrow().clone().unwrap();

        let outcome = worker.select_symbol("UNKNOWN").await.unwrap();

        assert_eq!(outcome, SelectOutcome::UnknownSymbol);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(worker.current().await.unwrap().sequence, before.sequence);
    }

    #[tokio::test(start_paused = true)]
    async fn test_greeks_toggle() {
        let worker = worker(3000);
        assert!(!worker.show_greeks().await);
        worker.set_show_greeks(true).await;
        assert!(worker.show_greeks().await);
    }
}
