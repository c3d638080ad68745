//! Client pool, keyed by wallet identity.
//!
//! One chain client per distinct `(wallet_name, hotkey_name, path)` is kept
//! open and shared across callers; `close()` drains in-flight acquisitions
//! before tearing every client down.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tracing::warn;

use crate::chain::adapter::ChainClient;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletKey {
    pub wallet_name: String,
    pub hotkey_name: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoolState {
    Open,
    Closing,
    Closed,
}

struct Inner {
    state: PoolState,
    clients: HashMap<WalletKey, Arc<dyn ChainClient>>,
    acquisitions_in_flight: usize,
}

/// A factory for building a fresh client for a wallet key, e.g.
/// `SubxtChainClient::new` wrapped in an `ArchiveFallbackClient`.
pub type ClientFactory =
    Arc<dyn Fn(&WalletKey) -> Arc<dyn ChainClient> + Send + Sync>;

pub struct ClientPool {
    inner: Mutex<Inner>,
    drained: Notify,
    factory: ClientFactory,
}

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("pool is closed")]
    Closed,
    #[error("pool is closing")]
    Closing,
    #[error(transparent)]
    Chain(#[from] crate::chain::adapter::ChainClientError),
}

impl ClientPool {
    pub fn new(factory: ClientFactory) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: PoolState::Open,
                clients: HashMap::new(),
                acquisitions_in_flight: 0,
            }),
            drained: Notify::new(),
            factory,
        }
    }

    /// Acquire the shared client for `key`, opening and inserting it on
    /// first use. Held acquisitions block `close()` from completing.
    pub async fn acquire(&self, key: &WalletKey) -> Result<Arc<dyn ChainClient>, PoolError> {
        let mut guard = self.inner.lock().await;
        match guard.state {
            PoolState::Closed => return Err(PoolError::Closed),
            PoolState::Closing => return Err(PoolError::Closing),
            PoolState::Open => {}
        }

        if let Some(client) = guard.clients.get(key) {
            guard.acquisitions_in_flight += 1;
            let client = client.clone();
            drop(guard);
            return Ok(client);
        }

        let client = (self.factory)(key);
        client.open().await?;
        guard.clients.insert(key.clone(), client.clone());
        guard.acquisitions_in_flight += 1;
        Ok(client)
    }

    /// Release a previously acquired client. Must be called exactly once
    /// per successful `acquire`.
    pub async fn release(&self) {
        let mut guard = self.inner.lock().await;
        guard.acquisitions_in_flight = guard.acquisitions_in_flight.saturating_sub(1);
        if guard.state == PoolState::Closing && guard.acquisitions_in_flight == 0 {
            self.drained.notify_waiters();
        }
    }

    /// Five-step close protocol: transition to `closing` under the lock,
    /// release it, wait for in-flight acquisitions to drain, best-effort
    /// close every client, then transition to `closed`.
    pub async fn close(&self) {
        {
            let mut guard = self.inner.lock().await;
            if guard.state != PoolState::Open {
                return;
            }
            guard.state = PoolState::Closing;
            if guard.acquisitions_in_flight == 0 {
                self.drained.notify_waiters();
            }
        }

        loop {
            let guard = self.inner.lock().await;
            if guard.acquisitions_in_flight == 0 {
                break;
            }
            drop(guard);
            self.drained.notified().await;
        }

        let mut guard = self.inner.lock().await;
        for (key, client) in guard.clients.drain() {
            if let Err(err) = client.close().await {
                warn!(?key, error = %err, "best-effort client close failed");
            }
        }
        guard.state = PoolState::Closed;
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.state == PoolState::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChainClient;

    fn key(name: &str) -> WalletKey {
        WalletKey {
            wallet_name: name.to_string(),
            hotkey_name: "default".to_string(),
            path: "~/.bittensor/wallets".to_string(),
        }
    }

    fn mock_factory() -> ClientFactory {
        Arc::new(|_key: &WalletKey| Arc::new(MockChainClient::new()) as Arc<dyn ChainClient>)
    }

    #[tokio::test]
    async fn acquire_reuses_the_same_client_for_the_same_key() {
        let pool = ClientPool::new(mock_factory());
        let a = pool.acquire(&key("alice")).await.unwrap();
        pool.release().await;
        let b = pool.acquire(&key("alice")).await.unwrap();
        pool.release().await;
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn close_drains_and_rejects_new_acquisitions() {
        let pool = ClientPool::new(mock_factory());
        let _client = pool.acquire(&key("alice")).await.unwrap();
        pool.release().await;

        pool.close().await;
        assert!(pool.is_closed().await);
        assert!(matches!(
            pool.acquire(&key("bob")).await,
            Err(PoolError::Closed)
        ));
    }
}
