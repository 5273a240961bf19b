//! tradinghub: terminal client for live stocks and craft brewery ordering
//!
//! This library provides the core components for:
//! - Item model with configurable identifier resolution
//! - REST access to the backend (collections, items, purchases)
//! - Reconnecting WebSocket transport and STOMP topic subscriptions
//! - Live feed reconciliation: merge, rank, price and position deltas
//! - List, home and purchase screens for the terminal
//! - Purchase form validation and order submission
//! - Route table and CLI
//! - Structured logging and Prometheus metrics

pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod feed;
pub mod format;
pub mod item;
pub mod purchase;
pub mod router;
pub mod stomp;
pub mod telemetry;
pub mod view;
pub mod ws;
