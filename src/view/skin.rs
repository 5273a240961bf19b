//! Per-collection presentation labels

use crate::feed::ConnectionStatus;
use crate::format::name_icon;
use colored::Color;
use serde::{Deserialize, Serialize};

/// Presentation family of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    Stocks,
    Beverages,
}

impl Skin {
    pub fn title(&self) -> &'static str {
        match self {
            Skin::Stocks => "Live Stocks",
            Skin::Beverages => "Craft Brewery",
        }
    }

    pub fn title_icon(&self) -> &'static str {
        match self {
            Skin::Stocks => "📈",
            Skin::Beverages => "🍺",
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            Skin::Stocks => "Real-time market data • Sorted by price",
            Skin::Beverages => "Fresh brews daily • Sorted by price",
        }
    }

    /// Shown while the snapshot is still empty
    pub fn loading_message(&self) -> &'static str {
        match self {
            Skin::Stocks => "Fetching real-time stock prices...",
            Skin::Beverages => "Brewing fresh beers, loading our finest selection...",
        }
    }

    pub fn status_label(&self, status: ConnectionStatus) -> &'static str {
        match (self, status) {
            (Skin::Stocks, ConnectionStatus::Connected) => "Live",
            (Skin::Stocks, ConnectionStatus::Connecting) => "Connecting...",
            (Skin::Beverages, ConnectionStatus::Connected) => "Fresh",
            (Skin::Beverages, ConnectionStatus::Connecting) => "Brewing...",
            (_, ConnectionStatus::Error) => "Error",
        }
    }

    pub fn status_color(&self, status: ConnectionStatus) -> Color {
        match status {
            ConnectionStatus::Connected => Color::Green,
            ConnectionStatus::Connecting => Color::Yellow,
            ConnectionStatus::Error => Color::Red,
        }
    }

    /// Headings of the three stat cards: count, average, maximum
    pub fn stat_headings(&self) -> [&'static str; 3] {
        match self {
            Skin::Stocks => ["Active Stocks", "Average Price", "Highest Price"],
            Skin::Beverages => ["Available Brews", "Average Price", "Premium Brew"],
        }
    }

    pub fn row_icon(&self, name: &str) -> &'static str {
        match self {
            Skin::Stocks => "📈",
            Skin::Beverages => name_icon(name),
        }
    }

    /// Whether rows carry a derived type column
    pub fn shows_type(&self) -> bool {
        matches!(self, Skin::Beverages)
    }

    pub fn accent(&self) -> Color {
        match self {
            Skin::Stocks => Color::Cyan,
            Skin::Beverages => Color::Yellow,
        }
    }
}
