//! Order operations behind the HTTP routes.

use chrono::{DateTime, Utc};
use shared::{domain::Order, error::ValidationError, validation::validate_order};
use thiserror::Error;

use crate::store::{OrderStore, StoreError};

#[derive(Clone, Default)]
pub struct ApiContext {
    pub store: OrderStore,
}

#[derive(Debug, Error)]
pub enum CreateOrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Conflict(#[from] StoreError),
}

pub async fn get_order(ctx: &ApiContext, order_uid: &str) -> Option<Order> {
    ctx.store.get(order_uid).await
}

pub async fn create_order(
    ctx: &ApiContext,
    order: Order,
    now: DateTime<Utc>,
) -> Result<String, CreateOrderError> {
    validate_order(&order, now)?;
    let order_uid = order.order_uid.clone();
    ctx.store.insert(order).await?;
    Ok(order_uid)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
