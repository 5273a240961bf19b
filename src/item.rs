//! Item model
//!
//! An item is a stock or a beverage as served by the backend. Only the
//! identifier and the price are interpreted; every other field is carried
//! through untouched so the screens can show whatever the backend sends.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;

/// Identifier precedence used when a collection does not configure its own
pub const DEFAULT_IDENTIFIER_KEYS: [&str; 3] = ["id", "symbol", "name"];

/// Errors raised while reading an item payload
#[derive(Debug, Error, PartialEq)]
pub enum ItemError {
    /// Payload is not valid JSON
    #[error("Malformed item JSON: {0}")]
    Json(String),
    /// Payload is valid JSON but not an object
    #[error("Item payload is not a JSON object")]
    NotAnObject,
    /// None of the identifier keys carry a usable value
    #[error("Item has none of the identifier fields {0:?}")]
    MissingIdentifier(Vec<String>),
    /// No `price` field
    #[error("Item is missing a price")]
    MissingPrice,
    /// `price` is present but not a number
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    /// `price` is below zero
    #[error("Negative price: {0}")]
    NegativePrice(Decimal),
}

/// A tradeable or orderable unit
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    identifier: String,
    price: Decimal,
    fields: Map<String, Value>,
}

impl Item {
    /// Create an item with only an `id` and a `price`
    pub fn new(identifier: impl Into<String>, price: Decimal) -> Self {
        let identifier = identifier.into();
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::String(identifier.clone()));
        fields.insert("price".to_string(), Value::String(price.to_string()));
        Self {
            identifier,
            price,
            fields,
        }
    }

    /// Build an item from a decoded JSON value
    pub fn from_value<S: AsRef<str>>(value: Value, keys: &[S]) -> Result<Self, ItemError> {
        let Value::Object(fields) = value else {
            return Err(ItemError::NotAnObject);
        };

        let identifier = resolve_identifier(&fields, keys).ok_or_else(|| {
            ItemError::MissingIdentifier(keys.iter().map(|k| k.as_ref().to_string()).collect())
        })?;
        let price = parse_price(fields.get("price").ok_or(ItemError::MissingPrice)?)?;

        Ok(Self {
            identifier,
            price,
            fields,
        })
    }

    /// Parse an item from a JSON text payload
    pub fn from_json<S: AsRef<str>>(text: &str, keys: &[S]) -> Result<Self, ItemError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ItemError::Json(e.to_string()))?;
        Self::from_value(value, keys)
    }

    /// Set an extra pass-through field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Human-facing name: `name`, then `symbol`, then the identifier
    pub fn display_name(&self) -> &str {
        ["name", "symbol"]
            .iter()
            .find_map(|key| match self.fields.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
                _ => None,
            })
            .unwrap_or(&self.identifier)
    }

    /// Look up any backend-supplied field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Shallow-merge an update for the same identifier; update fields win
    pub fn merge(&mut self, update: Item) {
        debug_assert_eq!(self.identifier, update.identifier);
        self.price = update.price;
        for (key, value) in update.fields {
            self.fields.insert(key, value);
        }
    }
}

/// Pick the identifier from the first key that carries a non-empty string or a number
pub fn resolve_identifier<S: AsRef<str>>(fields: &Map<String, Value>, keys: &[S]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(key.as_ref()) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Read a price from a JSON number or numeric string
pub fn parse_price(value: &Value) -> Result<Decimal, ItemError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(ItemError::InvalidPrice(other.to_string())),
    };

    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ItemError::InvalidPrice(text.clone()))?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(ItemError::NegativePrice(price));
    }
    Ok(price)
}

/// Parse a bulk-read payload, skipping entries that are not valid items
pub fn parse_items<S: AsRef<str>>(values: Vec<Value>, keys: &[S]) -> Vec<Item> {
    values
        .into_iter()
        .filter_map(|value| match Item::from_value(value, keys) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed item in bulk read");
                None
            }
        })
        .collect()
}
