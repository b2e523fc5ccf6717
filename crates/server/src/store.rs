//! In-memory order store keyed by `order_uid`.

use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;
use shared::domain::Order;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("order {0} already exists")]
    AlreadyExists(String),
}

#[derive(Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, order_uid: &str) -> Option<Order> {
        self.orders.read().await.get(order_uid).cloned()
    }

    #[cfg(test)]
    pub async fn contains(&self, order_uid: &str) -> bool {
        self.orders.read().await.contains_key(order_uid)
    }

    pub async fn insert(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.order_uid) {
            return Err(StoreError::AlreadyExists(order.order_uid));
        }
        orders.insert(order.order_uid.clone(), order);
        Ok(())
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Loads a JSON array of orders, skipping uids that are already present.
    /// Returns how many orders were added.
    pub async fn load_seed(&self, path: &Path) -> anyhow::Result<usize> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
        let orders: Vec<Order> = serde_json::from_str(&raw)
            .with_context(|| format!("seed file '{}' is not a JSON order array", path.display()))?;

        let mut added = 0;
        for order in orders {
            match self.insert(order).await {
                Ok(()) => added += 1,
                Err(StoreError::AlreadyExists(order_uid)) => {
                    tracing::warn!(%order_uid, "duplicate order in seed file; skipped");
                }
            }
        }
        Ok(added)
    }
}
