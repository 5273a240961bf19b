//! Linked amount/quantity order form

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const INPUT_REQUIRED: &str = "Please enter either amount or quantity";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be greater than 0";
pub const QUANTITY_NOT_WHOLE: &str = "Quantity must be a positive whole number";

/// How the order is served; shown to the user, never sent to the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OrderStyle {
    #[default]
    Tap,
    Bottle,
}

impl fmt::Display for OrderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStyle::Tap => write!(f, "tap"),
            OrderStyle::Bottle => write!(f, "bottle"),
        }
    }
}

/// Form fields that can carry a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// The form as a whole
    Input,
    Amount,
    Quantity,
}

/// Field-scoped validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn set(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }

    fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().copied().collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Two linked inputs: editing one recomputes the other from the unit price
#[derive(Debug, Clone)]
pub struct PurchaseForm {
    price: Decimal,
    amount: String,
    quantity: String,
    style: OrderStyle,
    errors: FieldErrors,
}

impl PurchaseForm {
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            amount: String::new(),
            quantity: String::new(),
            style: OrderStyle::default(),
            errors: FieldErrors::default(),
        }
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn style(&self) -> OrderStyle {
        self.style
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_style(&mut self, style: OrderStyle) {
        self.style = style;
    }

    /// Edit the amount; quantity follows as `floor(amount / price)`
    pub fn set_amount(&mut self, value: &str) {
        self.amount = value.trim().to_string();
        if let Some(quantity) = self
            .recompute_source(&self.amount)
            .and_then(|amount| amount.checked_div(self.price))
        {
            self.quantity = quantity.floor().normalize().to_string();
        }
        self.errors.clear(Field::Amount);
        self.errors.clear(Field::Input);
    }

    /// Edit the quantity; amount follows as `quantity * price` with two decimals
    pub fn set_quantity(&mut self, value: &str) {
        self.quantity = value.trim().to_string();
        if let Some(amount) = self
            .recompute_source(&self.quantity)
            .and_then(|quantity| quantity.checked_mul(self.price))
        {
            let amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            self.amount = format!("{:.2}", amount);
        }
        self.errors.clear(Field::Quantity);
        self.errors.clear(Field::Input);
    }

    /// Parsed driving value, if the other field should be recomputed
    fn recompute_source(&self, text: &str) -> Option<Decimal> {
        if text.is_empty() || self.price.is_zero() {
            return None;
        }
        Decimal::from_str(text).ok()
    }

    /// Check the form and return the whole quantity to order
    ///
    /// Errors are also kept on the form until the offending field is edited.
    pub fn validate(&mut self) -> Result<u64, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.amount.is_empty() && self.quantity.is_empty() {
            errors.set(Field::Input, INPUT_REQUIRED);
        }

        if !self.amount.is_empty() {
            match Decimal::from_str(&self.amount) {
                Ok(amount) if amount > Decimal::ZERO => {}
                _ => errors.set(Field::Amount, AMOUNT_NOT_POSITIVE),
            }
        }

        let quantity = whole_quantity(&self.quantity);
        // An amount with no derived quantity (zero price) cannot be ordered either
        if quantity.is_none() && !(self.amount.is_empty() && self.quantity.is_empty()) {
            errors.set(Field::Quantity, QUANTITY_NOT_WHOLE);
        }

        self.errors = errors.clone();
        match quantity {
            Some(quantity) if errors.is_empty() => Ok(quantity),
            _ => Err(errors),
        }
    }

    /// `quantity * price`, zero while quantity is not a number
    pub fn total(&self) -> Decimal {
        Decimal::from_str(&self.quantity)
            .ok()
            .and_then(|quantity| quantity.checked_mul(self.price))
            .unwrap_or(Decimal::ZERO)
    }
}

fn whole_quantity(text: &str) -> Option<u64> {
    let quantity = Decimal::from_str(text).ok()?;
    if quantity <= Decimal::ZERO || !quantity.fract().is_zero() {
        return None;
    }
    quantity.to_u64()
}
