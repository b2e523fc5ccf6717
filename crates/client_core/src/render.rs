//! Turns an order record into the formatted view and the raw JSON view.
//!
//! The record stays an untyped [`Value`]: the client makes no assumption about
//! the payload beyond the paths it reads, and the raw view must reproduce the
//! body exactly. A missing leaf renders as `undefined`; a missing or null
//! `delivery` or `payment` record fails the render.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde_json::Value;

use crate::error::LookupError;

pub const UNDEFINED: &str = "undefined";
pub const INVALID_DATE: &str = "Invalid Date";

pub const ORDER_SECTION: &str = "Order Information";
pub const DELIVERY_SECTION: &str = "Delivery Information";
pub const PAYMENT_SECTION: &str = "Payment Information";

const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewField {
    pub label: &'static str,
    pub value: String,
}

/// A titled block of labeled fields. Only the items section has `entries`,
/// one field list per line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSection {
    pub title: String,
    pub fields: Vec<ViewField>,
    pub entries: Vec<Vec<ViewField>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub sections: Vec<ViewSection>,
}

impl OrderView {
    pub fn section(&self, title: &str) -> Option<&ViewSection> {
        self.sections.iter().find(|section| section.title == title)
    }

    pub fn items_section(&self) -> Option<&ViewSection> {
        self.sections
            .iter()
            .find(|section| section.title.starts_with("Items ("))
    }

    /// First top-level field with `label`, in section order.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
    }
}

impl fmt::Display for OrderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", section.title)?;
            for field in &section.fields {
                writeln!(f, "  {}: {}", field.label, field.value)?;
            }
            for (entry_idx, entry) in section.entries.iter().enumerate() {
                writeln!(f, "  #{}", entry_idx + 1)?;
                for field in entry {
                    writeln!(f, "    {}: {}", field.label, field.value)?;
                }
            }
        }
        Ok(())
    }
}

/// Result of a successful lookup: the body as received plus both views of it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOrder {
    pub record: Value,
    pub view: OrderView,
    pub raw: String,
}

/// Zone timestamps are shown in. `Local` resolves the offset per instant, so
/// dates on either side of a DST change get their own offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    Local,
    Fixed(FixedOffset),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRenderer {
    zone: DisplayZone,
}

impl Default for OrderRenderer {
    fn default() -> Self {
        Self::local()
    }
}

impl OrderRenderer {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            zone: DisplayZone::Fixed(offset),
        }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn local() -> Self {
        Self {
            zone: DisplayZone::Local,
        }
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    pub fn from_utc_flag(utc: bool) -> Self {
        if utc {
            Self::utc()
        } else {
            Self::local()
        }
    }

    pub fn render(&self, record: Value) -> Result<RenderedOrder, LookupError> {
        let view = self.format_view(&record)?;
        let raw = raw_view(&record)?;
        Ok(RenderedOrder { record, view, raw })
    }

    /// Builds the formatted view. Fails where reading a field would dereference
    /// a missing or null record: the order itself, `delivery`, `payment`, or an
    /// entry of `items`.
    pub fn format_view(&self, order: &Value) -> Result<OrderView, LookupError> {
        if order.is_null() {
            return Err(unreadable(Some(order), "order_uid"));
        }
        let delivery = require_record(order.get("delivery"), "name")?;
        let payment = require_record(order.get("payment"), "transaction")?;

        let mut sections = vec![
            ViewSection {
                title: ORDER_SECTION.to_string(),
                fields: vec![
                    text_field("Order UID", order, &["order_uid"]),
                    text_field("Track Number", order, &["track_number"]),
                    text_field("Entry", order, &["entry"]),
                    text_field("Customer ID", order, &["customer_id"]),
                    text_field("Delivery Service", order, &["delivery_service"]),
                    ViewField {
                        label: "Date Created",
                        value: self.format_date(parse_date_created(
                            order.get("date_created"),
                            self.zone,
                        )),
                    },
                ],
                entries: Vec::new(),
            },
            ViewSection {
                title: DELIVERY_SECTION.to_string(),
                fields: vec![
                    text_field("Name", delivery, &["name"]),
                    text_field("Phone", delivery, &["phone"]),
                    text_field("Zip", delivery, &["zip"]),
                    text_field("City", delivery, &["city"]),
                    text_field("Address", delivery, &["address"]),
                    text_field("Region", delivery, &["region"]),
                    text_field("Email", delivery, &["email"]),
                ],
                entries: Vec::new(),
            },
            ViewSection {
                title: PAYMENT_SECTION.to_string(),
                fields: vec![
                    text_field("Transaction", payment, &["transaction"]),
                    text_field("Currency", payment, &["currency"]),
                    text_field("Provider", payment, &["provider"]),
                    text_field("Amount", payment, &["amount"]),
                    ViewField {
                        label: "Payment Date",
                        value: self.format_date(parse_epoch_seconds(payment.get("payment_dt"))),
                    },
                    text_field("Bank", payment, &["bank"]),
                    text_field("Delivery Cost", payment, &["delivery_cost"]),
                    text_field("Goods Total", payment, &["goods_total"]),
                    text_field("Custom Fee", payment, &["custom_fee"]),
                ],
                entries: Vec::new(),
            },
        ];

        match order.get("items") {
            Some(Value::Array(items)) if !items.is_empty() => {
                let entries = items
                    .iter()
                    .map(|item| -> Result<Vec<ViewField>, LookupError> {
                        let item = require_record(Some(item), "name")?;
                        Ok(vec![
                            text_field("Name", item, &["name"]),
                            text_field("Brand", item, &["brand"]),
                            text_field("Price", item, &["price"]),
                            text_field("Total Price", item, &["total_price"]),
                            text_field("Size", item, &["size"]),
                            text_field("Status", item, &["status"]),
                        ])
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                sections.push(ViewSection {
                    title: format!("Items ({})", items.len()),
                    fields: Vec::new(),
                    entries,
                });
            }
            // A non-empty string has a length but cannot be mapped over.
            Some(Value::String(text)) if !text.is_empty() => {
                return Err(LookupError::Decode(
                    "order.items.map is not a function".to_string(),
                ));
            }
            _ => {}
        }

        Ok(OrderView { sections })
    }

    pub fn format_timestamp(&self, at: DateTime<Utc>) -> String {
        match self.zone {
            DisplayZone::Local => at.with_timezone(&Local).format(DISPLAY_FORMAT).to_string(),
            DisplayZone::Fixed(offset) => {
                at.with_timezone(&offset).format(DISPLAY_FORMAT).to_string()
            }
        }
    }

    fn format_date(&self, at: Option<DateTime<Utc>>) -> String {
        match at {
            Some(at) => self.format_timestamp(at),
            None => INVALID_DATE.to_string(),
        }
    }
}

/// Pretty JSON with two-space indentation.
pub fn raw_view(record: &Value) -> Result<String, LookupError> {
    serde_json::to_string_pretty(record).map_err(|err| LookupError::Decode(err.to_string()))
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

fn unreadable(value: Option<&Value>, key: &str) -> LookupError {
    let target = if value.is_some() { "null" } else { "undefined" };
    LookupError::Decode(format!("Cannot read properties of {target} (reading '{key}')"))
}

/// `value` when fields can be read from it; `first_key` names the first field
/// read, for the error message.
fn require_record<'a>(
    value: Option<&'a Value>,
    first_key: &str,
) -> Result<&'a Value, LookupError> {
    match value {
        Some(Value::Null) | None => Err(unreadable(value, first_key)),
        Some(record) => Ok(record),
    }
}

fn text_field(label: &'static str, value: &Value, path: &[&str]) -> ViewField {
    ViewField {
        label,
        value: display_value(lookup(value, path)),
    }
}

/// Text a value contributes when interpolated into the view.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => UNDEFINED.to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => display_number(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => display_value(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn display_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.is_finite() && (f.abs() >= 1e21 || f.abs() < 1e-6) => exponent_form(f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// `1e+21`, `-2.5e-7`: shortest digits with an explicitly signed exponent.
fn exponent_form(f: f64) -> String {
    let formatted = format!("{f:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

/// Accepts RFC 3339, a zone-less date-time (read in the display zone), a bare
/// date (read as UTC midnight), or milliseconds since the epoch. Null is the
/// epoch itself.
fn parse_date_created(value: Option<&Value>, zone: DisplayZone) -> Option<DateTime<Utc>> {
    match value? {
        Value::Null => DateTime::from_timestamp(0, 0),
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
                return Some(at.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
                return match zone {
                    DisplayZone::Local => Local
                        .from_local_datetime(&naive)
                        .earliest()
                        .map(|at| at.with_timezone(&Utc)),
                    DisplayZone::Fixed(offset) => offset
                        .from_local_datetime(&naive)
                        .single()
                        .map(|at| at.with_timezone(&Utc)),
                };
            }
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n
            .as_f64()
            .filter(|ms| ms.is_finite())
            .and_then(|ms| DateTime::from_timestamp_millis(ms as i64)),
        _ => None,
    }
}

/// Seconds since the epoch, coerced the way arithmetic coerces: null, false
/// and blank strings count as zero.
fn parse_epoch_seconds(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let seconds = match value? {
        Value::Null => 0.0,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(n) => n.as_f64()?,
        Value::String(raw) if raw.trim().is_empty() => 0.0,
        Value::String(raw) => raw.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0) as i64)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
