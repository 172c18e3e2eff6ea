use async_trait::async_trait;
use parking_lot::Mutex;

use super::ConfigStore;
use crate::common::errors::Result;
use crate::risk::RiskConfig;

/// Store that keeps the configuration in memory only
///
/// Used when persistence is disabled and in tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    config: Mutex<Option<RiskConfig>>,
    saves: Mutex<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a configuration
    pub fn with_config(config: RiskConfig) -> Self {
        Self {
            config: Mutex::new(Some(config)),
            saves: Mutex::new(0),
        }
    }

    /// Last saved configuration
    pub fn saved(&self) -> Option<RiskConfig> {
        self.config.lock().clone()
    }

    /// Number of completed saves
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

#[async_trait]
impl ConfigStore for InMemoryStore {
    async fn load(&self) -> Result<Option<RiskConfig>> {
        Ok(self.config.lock().clone())
    }

    async fn save(&self, config: &RiskConfig) -> Result<()> {
        *self.config.lock() = Some(config.clone());
        *self.saves.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_loads_none() {
        let store = InMemoryStore::new();
        assert!(store.load().await.unwrap().is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_save_replaces_config() {
        let store = InMemoryStore::with_config(RiskConfig::default());
        let updated = RiskConfig::new(1_000.0, 5.0).unwrap();

        store.save(&updated).await.unwrap();

        assert_eq!(store.saved(), Some(updated));
        assert_eq!(store.save_count(), 1);
    }
}
