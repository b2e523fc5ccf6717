//! Structural checks applied to incoming orders before they are stored.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::{domain::Order, error::ValidationError};

const MAX_FUTURE_SKEW_HOURS: i64 = 24;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$").expect("static email regex")
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("static phone regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(&email.to_lowercase())
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

fn require_text(value: &str, max_len: usize, field: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(format!("{field} is required")));
    }
    if value.len() > max_len {
        return Err(ValidationError::new(format!(
            "{field} must be less than {max_len} characters"
        )));
    }
    Ok(())
}

fn require_positive(value: i64, message: impl FnOnce() -> String) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(message()));
    }
    Ok(())
}

fn require_non_negative(
    value: i64,
    message: impl FnOnce() -> String,
) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::new(message()));
    }
    Ok(())
}

/// Validates `order` against `now`, reporting the first violated rule.
pub fn validate_order(order: &Order, now: DateTime<Utc>) -> Result<(), ValidationError> {
    require_text(&order.order_uid, 255, "order UID")?;
    require_text(&order.track_number, 255, "track number")?;
    require_text(&order.entry, 50, "entry")?;
    require_text(&order.locale, 10, "locale")?;
    require_text(&order.customer_id, 255, "customer ID")?;
    require_text(&order.delivery_service, 100, "delivery service")?;

    if order.date_created == DateTime::<Utc>::default() {
        return Err(ValidationError::new("date created is required"));
    }
    if order.date_created > now + Duration::hours(MAX_FUTURE_SKEW_HOURS) {
        return Err(ValidationError::new("date created cannot be in the future"));
    }

    let delivery = &order.delivery;
    require_text(&delivery.name, 255, "delivery name")?;
    if delivery.phone.is_empty() {
        return Err(ValidationError::new("delivery phone is required"));
    }
    if !is_valid_phone(&delivery.phone) {
        return Err(ValidationError::new("delivery phone format is invalid"));
    }
    require_text(&delivery.zip, 50, "delivery zip")?;
    require_text(&delivery.city, 255, "delivery city")?;
    require_text(&delivery.address, 500, "delivery address")?;
    require_text(&delivery.region, 255, "delivery region")?;
    if delivery.email.is_empty() {
        return Err(ValidationError::new("delivery email is required"));
    }
    if !is_valid_email(&delivery.email) {
        return Err(ValidationError::new("delivery email format is invalid"));
    }

    let payment = &order.payment;
    require_text(&payment.transaction, 255, "payment transaction")?;
    require_text(&payment.currency, 10, "payment currency")?;
    require_text(&payment.provider, 100, "payment provider")?;
    require_positive(payment.amount, || "payment amount must be positive".into())?;
    require_positive(payment.payment_dt, || "payment date is required".into())?;
    require_text(&payment.bank, 100, "payment bank")?;
    require_non_negative(payment.delivery_cost, || {
        "payment delivery cost cannot be negative".into()
    })?;
    require_positive(payment.goods_total, || {
        "payment goods total must be positive".into()
    })?;
    require_non_negative(payment.custom_fee, || {
        "payment custom fee cannot be negative".into()
    })?;

    if order.items.is_empty() {
        return Err(ValidationError::new("order must have at least one item"));
    }

    for (i, item) in order.items.iter().enumerate() {
        require_positive(item.chrt_id, || format!("item {i} chrt_id must be positive"))?;
        require_text(&item.track_number, 255, &format!("item {i} track number"))?;
        require_positive(item.price, || format!("item {i} price must be positive"))?;
        require_text(&item.rid, 255, &format!("item {i} rid"))?;
        require_text(&item.name, 255, &format!("item {i} name"))?;
        require_non_negative(item.sale, || format!("item {i} sale cannot be negative"))?;
        require_text(&item.size, 50, &format!("item {i} size"))?;
        require_positive(item.total_price, || {
            format!("item {i} total price must be positive")
        })?;
        require_positive(item.nm_id, || format!("item {i} nm_id must be positive"))?;
        require_text(&item.brand, 255, &format!("item {i} brand"))?;
        require_non_negative(item.status, || {
            format!("item {i} status cannot be negative")
        })?;
    }

    Ok(())
}
