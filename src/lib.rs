//! Coinbase proxy gateway.
//!
//! Two endpoints sit in front of Coinbase:
//!
//! - `/exchange` relays typed actions (candles, market orders) to the Coinbase
//!   Exchange REST API, signing every request with the account's HMAC secret.
//! - `/charges` creates hosted Coinbase Commerce checkout links.

pub mod api;
pub mod commerce;
pub mod config;
pub mod connectors;
pub mod exchange;
pub mod metrics;
pub mod observability;
pub mod routing;
pub mod secret_store;
