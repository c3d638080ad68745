//! Weight store.
//!
//! Holds the most recently computed weight for each hotkey per epoch, so the
//! HTTP layer can answer "what did we last decide" independently of the
//! chain. Same async-`RwLock`-guarded-`HashMap` shape as `chain::signer`'s
//! `NonceManager`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{BlockNumber, Hotkey, WeightEntry};

#[async_trait]
pub trait WeightStore: Send + Sync {
    /// Overwrite the full weight table for an epoch.
    async fn set(&self, epoch: BlockNumber, weights: HashMap<Hotkey, f64>);

    /// Merge additional weights into an epoch's table, overwriting any
    /// existing entry for the same hotkey.
    async fn add(&self, epoch: BlockNumber, weights: HashMap<Hotkey, f64>);

    /// Every stored entry across all epochs, most recent write per hotkey.
    async fn get_raw(&self) -> Vec<WeightEntry>;

    /// Weights for a specific set of hotkeys, looked up by the most recent
    /// epoch that has an entry for each one.
    async fn get_for_neurons(&self, hotkeys: &[Hotkey]) -> HashMap<Hotkey, f64>;
}

struct Entry {
    epoch: BlockNumber,
    weight: f64,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// In-process reference implementation, backing a single Pylon instance.
#[derive(Default)]
pub struct InMemoryWeightStore {
    entries: RwLock<HashMap<Hotkey, Entry>>,
}

impl InMemoryWeightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WeightStore for InMemoryWeightStore {
    async fn set(&self, epoch: BlockNumber, weights: HashMap<Hotkey, f64>) {
        let now = chrono::Utc::now();
        let mut entries = self.entries.write().await;
        entries.clear();
        for (hotkey, weight) in weights {
            entries.insert(
                hotkey,
                Entry {
                    epoch,
                    weight,
                    updated_at: now,
                },
            );
        }
    }

    async fn add(&self, epoch: BlockNumber, weights: HashMap<Hotkey, f64>) {
        let now = chrono::Utc::now();
        let mut entries = self.entries.write().await;
        for (hotkey, weight) in weights {
            entries.insert(
                hotkey,
                Entry {
                    epoch,
                    weight,
                    updated_at: now,
                },
            );
        }
    }

    async fn get_raw(&self) -> Vec<WeightEntry> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(hotkey, entry)| WeightEntry {
                hotkey: hotkey.clone(),
                epoch: entry.epoch,
                weight: entry.weight,
                updated_at: entry.updated_at,
            })
            .collect()
    }

    async fn get_for_neurons(&self, hotkeys: &[Hotkey]) -> HashMap<Hotkey, f64> {
        let entries = self.entries.read().await;
        hotkeys
            .iter()
            .filter_map(|h| entries.get(h).map(|e| (h.clone(), e.weight)))
            .collect()
    }
}

pub type SharedWeightStore = Arc<dyn WeightStore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_replaces_the_whole_table() {
        let store = InMemoryWeightStore::new();
        let mut weights = HashMap::new();
        weights.insert(Hotkey::from("a"), 1.0);
        store.set(100, weights).await;

        let mut second = HashMap::new();
        second.insert(Hotkey::from("b"), 2.0);
        store.set(200, second).await;

        let raw = store.get_raw().await;
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].hotkey.as_str(), "b");
    }

    #[tokio::test]
    async fn add_merges_without_clearing() {
        let store = InMemoryWeightStore::new();
        let mut first = HashMap::new();
        first.insert(Hotkey::from("a"), 1.0);
        store.set(100, first).await;

        let mut second = HashMap::new();
        second.insert(Hotkey::from("b"), 2.0);
        store.add(200, second).await;

        assert_eq!(store.get_raw().await.len(), 2);
    }

    #[tokio::test]
    async fn get_for_neurons_only_returns_requested_hotkeys() {
        let store = InMemoryWeightStore::new();
        let mut weights = HashMap::new();
        weights.insert(Hotkey::from("a"), 1.0);
        weights.insert(Hotkey::from("b"), 2.0);
        store.set(100, weights).await;

        let result = store.get_for_neurons(&[Hotkey::from("a"), Hotkey::from("ghost")]).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(&Hotkey::from("a")), Some(&1.0));
    }
}
