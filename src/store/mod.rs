//! Persistence of the risk configuration
//!
//! The store is a collaborator of [`RiskPolicy`](crate::risk::RiskPolicy), never
//! called while the policy's lock is held. Persistence is best-effort: a missing
//! or unreadable file falls back to the defaults and failed saves are logged.
//! Runtime changes go through one [`ConfigWriter`] per store.

mod json_file;
mod memory;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::common::errors::Result;
use crate::risk::RiskConfig;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

/// Durable storage for the risk configuration
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the saved configuration, `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<RiskConfig>>;

    /// Save the configuration, replacing any previous one
    async fn save(&self, config: &RiskConfig) -> Result<()>;
}

/// Shared store for dynamic dispatch
pub type SharedConfigStore = Arc<dyn ConfigStore>;

/// Load the saved configuration or fall back to the defaults
///
/// A first run saves the defaults so the file exists afterwards. Derived fields
/// of a loaded configuration are recomputed.
pub async fn load_or_default(store: &dyn ConfigStore) -> RiskConfig {
    match store.load().await {
        Ok(Some(mut config)) => {
            config.normalize();
            info!(
                total_capital = config.total_capital,
                risk_per_trade_percent = config.risk_per_trade_percent,
                "Loaded risk configuration"
            );
            config
        }
        Ok(None) => {
            let config = RiskConfig::default();
            info!("No saved risk configuration found, using defaults");
            if let Err(e) = store.save(&config).await {
                warn!(error = %e, "Failed to save default risk configuration");
            }
            config
        }
        Err(e) => {
            warn!(error = %e, "Failed to load risk configuration, using defaults");
            RiskConfig::default()
        }
    }
}

/// Snapshot waiting to be written, numbered in submission order
#[derive(Debug)]
struct Pending {
    seq: u64,
    config: RiskConfig,
}

/// Background writer that persists the newest risk configuration
///
/// Snapshots are submitted without waiting. A single task owns every save, so
/// saves never overlap; snapshots that pile up while a save is running collapse
/// into the newest one. A snapshot older than the pending one (by `updated_at`)
/// is dropped. The task exits once every handle is gone, after writing whatever
/// was still pending. Save failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    pending: Arc<watch::Sender<Pending>>,
    written: watch::Receiver<u64>,
}

impl ConfigWriter {
    /// Start the writer task; `current` is treated as already saved
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: SharedConfigStore, current: RiskConfig) -> Self {
        let (pending_tx, pending_rx) = watch::channel(Pending {
            seq: 0,
            config: current,
        });
        let (written_tx, written_rx) = watch::channel(0);
        tokio::spawn(write_latest(store, pending_rx, written_tx));

        Self {
            pending: Arc::new(pending_tx),
            written: written_rx,
        }
    }

    /// Queue a snapshot, returns false when a newer one is already queued
    pub fn submit(&self, config: RiskConfig) -> bool {
        self.pending.send_if_modified(|pending| {
            if config.updated_at < pending.config.updated_at {
                return false;
            }
            pending.seq += 1;
            pending.config = config;
            true
        })
    }

    /// Wait until every snapshot submitted so far has been handed to the store
    pub async fn flush(&self) {
        let target = self.pending.borrow().seq;
        let mut written = self.written.clone();
        loop {
            let caught_up = *written.borrow_and_update() >= target;
            if caught_up || written.changed().await.is_err() {
                break;
            }
        }
    }
}

async fn write_latest(
    store: SharedConfigStore,
    mut pending: watch::Receiver<Pending>,
    written: watch::Sender<u64>,
) {
    while pending.changed().await.is_ok() {
        let (seq, config) = {
            let latest = pending.borrow_and_update();
            (latest.seq, latest.config.clone())
        };

        if let Err(e) = store.save(&config).await {
            warn!(error = %e, "Failed to persist risk configuration");
        }
        written.send_replace(seq);
    }
    debug!("Risk configuration writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::EngineError;
    use std::io::ErrorKind;

    #[tokio::test]
    async fn test_load_or_default_uses_saved_config() {
        let mut saved = RiskConfig::new(25_000.0, 1.0).unwrap();
        saved.max_risk_per_trade = 0.0;

        let mut store = MockConfigStore::new();
        store
            .expect_load()
            .times(1)
            .returning(move || Ok(Some(saved.clone())));
        store.expect_save().never();

        let config = load_or_default(&store).await;
        assert_eq!(config.total_capital, 25_000.0);
        assert_eq!(config.max_risk_per_trade, 250.0);
    }

    #[tokio::test]
    async fn test_load_or_default_saves_defaults_when_missing() {
        let mut store = MockConfigStore::new();
        store.expect_load().times(1).returning(|| Ok(None));
        store
            .expect_save()
            .times(1)
            .withf(|config| config.total_capital == 10_000.0)
            .returning(|_| Ok(()));

        let config = load_or_default(&store).await;
        assert_eq!(config.risk_per_trade_percent, 2.0);
    }

    #[test_log::test(tokio::test)]
    async fn test_load_or_default_survives_load_failure() {
        let mut store = MockConfigStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|| Err(EngineError::Io(std::io::Error::new(ErrorKind::Other, "disk on fire"))));
        store.expect_save().never();

        let config = load_or_default(&store).await;
        assert_eq!(config.total_capital, 10_000.0);
    }

    #[tokio::test]
    async fn test_load_or_default_ignores_save_failure() {
        let mut store = MockConfigStore::new();
        store.expect_load().returning(|| Ok(None));
        store
            .expect_save()
            .returning(|_| Err(EngineError::Io(std::io::Error::new(ErrorKind::Other, "read-only"))));

        let config = load_or_default(&store).await;
        assert_eq!(config.max_risk_per_trade, 200.0);
    }

    fn snapshot(capital: f64, offset_secs: i64) -> RiskConfig {
        let mut config = RiskConfig::new(capital, 2.0).unwrap();
        config.updated_at = config.created_at + chrono::Duration::seconds(offset_secs);
        config
    }

    #[tokio::test]
    async fn test_writer_persists_newest_snapshot() {
        let store = Arc::new(InMemoryStore::new());
        let writer = ConfigWriter::spawn(store.clone(), RiskConfig::default());

        for i in 1..=20 {
            assert!(writer.submit(snapshot(1_000.0 * i as f64, i)));
        }
        writer.flush().await;

        assert_eq!(store.saved().unwrap().total_capital, 20_000.0);
        assert!(store.save_count() >= 1);
    }

    #[tokio::test]
    async fn test_writer_drops_older_snapshot() {
        let store = Arc::new(InMemoryStore::new());
        let writer = ConfigWriter::spawn(store.clone(), RiskConfig::default());

        assert!(writer.submit(snapshot(30_000.0, 10)));
        assert!(!writer.submit(snapshot(15_000.0, 5)));
        writer.flush().await;

        assert_eq!(store.saved().unwrap().total_capital, 30_000.0);
    }

    #[tokio::test]
    async fn test_flush_without_submissions_returns() {
        let store = Arc::new(InMemoryStore::new());
        let writer = ConfigWriter::spawn(store.clone(), RiskConfig::default());

        writer.flush().await;

        assert_eq!(store.save_count(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn test_writer_survives_save_failures() {
        let mut store = MockConfigStore::new();
        store
            .expect_save()
            .returning(|_| Err(EngineError::Io(std::io::Error::new(ErrorKind::Other, "read-only"))));

        let writer = ConfigWriter::spawn(Arc::new(store), RiskConfig::default());
        writer.submit(snapshot(12_000.0, 1));
        writer.flush().await;

        assert!(writer.submit(snapshot(13_000.0, 2)));
        writer.flush().await;
    }
}
