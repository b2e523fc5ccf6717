use serde::{Deserialize, Serialize};

pub fn order_route() -> &'static str {
    "/order"
}

pub fn add_order_route() -> &'static str {
    "/add_order"
}

pub fn health_route() -> &'static str {
    "/health"
}

/// Path of the lookup endpoint for `order_uid`, without percent-encoding.
pub fn order_path(order_uid: &str) -> String {
    format!("{}/{order_uid}", order_route())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOrderResponse {
    pub status: String,
    pub message: String,
    pub order_uid: String,
}

impl AddOrderResponse {
    pub fn created(order_uid: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: "Order created successfully".to_string(),
            order_uid: order_uid.into(),
        }
    }
}
