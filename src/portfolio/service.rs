//! Portfolio service actor
//!
//! Owns the in-memory portfolio, applies commands from a channel, and runs
//! the periodic price refresh for the held token set. Fetches never block
//! command handling: each refresh is spawned and reports back through an
//! internal channel, tagged with a generation counter so a response raced
//! by a wholesale holdings replacement (import/restore) is dropped instead
//! of applied to the new holdings. Shutdown exits the loop, which drops the
//! outcome channel and with it anything still in flight.

use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

use super::storage::PortfolioStorage;
use super::store::{Command, Portfolio};
use super::types::Holding;
use crate::coingecko::{PriceFeed, TokenQuote};
use crate::errors::PortfolioError;

/// Default spacing between automatic price refreshes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Commands accepted by the service actor
#[derive(Debug)]
pub enum ServiceCommand {
    /// Apply a store command, persisting when holdings change
    Apply {
        command: Command,
        response: oneshot::Sender<Result<(), PortfolioError>>,
    },

    /// Trigger a price refresh outside the schedule
    Refresh { response: oneshot::Sender<()> },

    /// Read a copy of the current state
    GetSnapshot {
        response: oneshot::Sender<PortfolioSnapshot>,
    },

    /// Serialize the holdings as an export snapshot
    Export {
        response: oneshot::Sender<Result<String>>,
    },

    /// Replace the holdings from an export snapshot (malformed input is
    /// logged and ignored)
    Import {
        data: String,
        response: oneshot::Sender<()>,
    },

    /// Stop the actor; in-flight fetch results are discarded
    Shutdown,
}

/// Read-only copy of the service state handed to consumers
#[derive(Debug, Clone)]
pub struct PortfolioSnapshot {
    pub holdings: Vec<Holding>,
    pub total_value: Decimal,
    pub total_change_24h: Decimal,
    pub is_loading: bool,
}

/// Result of one spawned price fetch
#[derive(Debug)]
struct RefreshOutcome {
    generation: u64,
    result: Result<Vec<TokenQuote>>,
}

/// Portfolio service actor
pub struct PortfolioService {
    store: Portfolio,
    storage: PortfolioStorage,
    feed: Arc<dyn PriceFeed>,
    command_rx: mpsc::Receiver<ServiceCommand>,
    refresh_tx: mpsc::Sender<RefreshOutcome>,
    refresh_rx: mpsc::Receiver<RefreshOutcome>,
    refresh_interval: Duration,
    /// Bumped when the holdings are replaced wholesale; outcomes from
    /// older generations are dropped
    generation: u64,
}

impl PortfolioService {
    fn new(
        storage: PortfolioStorage,
        feed: Arc<dyn PriceFeed>,
        refresh_interval: Duration,
        command_rx: mpsc::Receiver<ServiceCommand>,
    ) -> Self {
        let (refresh_tx, refresh_rx) = mpsc::channel(8);
        Self {
            store: Portfolio::new(),
            storage,
            feed,
            command_rx,
            refresh_tx,
            refresh_rx,
            refresh_interval,
            generation: 0,
        }
    }

    /// Run the actor until shutdown or channel closure
    pub async fn run(mut self) -> Result<()> {
        info!("Starting portfolio service");

        let holdings = self.storage.load().await;
        let _ = self.store.apply(Command::LoadHoldings { holdings });

        // First tick fires immediately, giving the activation refresh.
        let mut ticker = interval(self.refresh_interval);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(ServiceCommand::Shutdown) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }

                Some(outcome) = self.refresh_rx.recv() => {
                    self.apply_refresh(outcome);
                }

                _ = ticker.tick() => {
                    self.spawn_refresh();
                }
            }
        }

        info!("Portfolio service stopped");
        Ok(())
    }

    fn handle_command(&mut self, command: ServiceCommand) {
        match command {
            ServiceCommand::Apply { command, response } => {
                let holdings_changed = matches!(
                    command,
                    Command::AddToken { .. }
                        | Command::RemoveToken { .. }
                        | Command::SetAmount { .. }
                        | Command::UpdatePrices { .. }
                        | Command::LoadHoldings { .. }
                );
                if matches!(command, Command::LoadHoldings { .. }) {
                    self.cancel_inflight_refresh();
                }
                let result = self.store.apply(command);
                if result.is_ok() && holdings_changed {
                    self.persist();
                }
                let _ = response.send(result);
            }

            ServiceCommand::Refresh { response } => {
                self.spawn_refresh();
                let _ = response.send(());
            }

            ServiceCommand::GetSnapshot { response } => {
                let _ = response.send(self.snapshot());
            }

            ServiceCommand::Export { response } => {
                let _ = response.send(self.store.export().map_err(Into::into));
            }

            ServiceCommand::Import { data, response } => {
                self.cancel_inflight_refresh();
                self.store.import(&data);
                self.persist();
                let _ = response.send(());
            }

            // Handled by the run loop before dispatch
            ServiceCommand::Shutdown => {}
        }
    }

    /// A wholesale holdings replacement invalidates any fetch still in
    /// flight for the previous holdings set: its quotes may be older than
    /// the replacement and must not overwrite it.
    fn cancel_inflight_refresh(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        let _ = self.store.apply(Command::SetLoading { loading: false });
    }

    /// Fire-and-forget write of the current holdings to the slot
    fn persist(&self) {
        let storage = self.storage.clone();
        let holdings = self.store.holdings().to_vec();
        tokio::spawn(async move {
            if let Err(e) = storage.save(&holdings).await {
                warn!("Failed to persist portfolio: {}", e);
            }
        });
    }

    /// Start a price fetch for the held token set, if any
    fn spawn_refresh(&mut self) {
        if self.store.is_empty() {
            debug!("Portfolio empty, skipping price refresh");
            return;
        }

        let ids = self.store.held_ids();
        let _ = self.store.apply(Command::SetLoading { loading: true });

        let feed = Arc::clone(&self.feed);
        let refresh_tx = self.refresh_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = feed.get_quotes(&ids).await;
            let _ = refresh_tx.send(RefreshOutcome { generation, result }).await;
        });
    }

    fn apply_refresh(&mut self, outcome: RefreshOutcome) {
        if outcome.generation != self.generation {
            debug!("Dropping price response from a cancelled refresh");
            return;
        }

        let _ = self.store.apply(Command::SetLoading { loading: false });

        match outcome.result {
            Ok(quotes) => {
                debug!("Applying {} fresh quotes", quotes.len());
                let _ = self.store.apply(Command::UpdatePrices { quotes });
                self.persist();
            }
            Err(e) => warn!("Price refresh failed, keeping last known prices: {}", e),
        }
    }

    fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            holdings: self.store.holdings().to_vec(),
            total_value: self.store.total_value(),
            total_change_24h: self.store.total_change_24h(),
            is_loading: self.store.is_loading(),
        }
    }
}

/// Handle for sending commands to a running portfolio service
#[derive(Clone)]
pub struct PortfolioHandle {
    command_tx: mpsc::Sender<ServiceCommand>,
}

impl PortfolioHandle {
    /// Apply a store command
    pub async fn apply(&self, command: Command) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(ServiceCommand::Apply {
                command,
                response: tx,
            })
            .await?;
        rx.await?.map_err(Into::into)
    }

    /// Trigger an out-of-schedule price refresh
    pub async fn refresh(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(ServiceCommand::Refresh { response: tx })
            .await?;
        Ok(rx.await?)
    }

    /// Get a copy of the current state
    pub async fn snapshot(&self) -> Result<PortfolioSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(ServiceCommand::GetSnapshot { response: tx })
            .await?;
        Ok(rx.await?)
    }

    /// Serialize the holdings as an export snapshot
    pub async fn export(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(ServiceCommand::Export { response: tx })
            .await?;
        rx.await?
    }

    /// Import an export snapshot
    pub async fn import(&self, data: String) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(ServiceCommand::Import { data, response: tx })
            .await?;
        Ok(rx.await?)
    }

    /// Stop the service
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx.send(ServiceCommand::Shutdown).await?;
        Ok(())
    }
}

/// Start the portfolio service and return a command handle
pub fn start_portfolio_service(
    storage: PortfolioStorage,
    feed: Arc<dyn PriceFeed>,
    refresh_interval: Duration,
) -> PortfolioHandle {
    let (command_tx, command_rx) = mpsc::channel(32);
    let service = PortfolioService::new(storage, feed, refresh_interval, command_rx);

    tokio::spawn(async move {
        if let Err(e) = service.run().await {
            error!("Portfolio service error: {}", e);
        }
    });

    PortfolioHandle { command_tx }
}
