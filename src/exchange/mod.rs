//! Coinbase Exchange proxy: action decoding, request signing, dispatch.

pub mod action;
pub mod dispatcher;
pub mod outcome;
pub mod signer;

pub use action::{CandlesRequest, ExchangeRequest, OrderRequest, OrderSide, ProxyAction};
pub use dispatcher::ExchangeProxy;
pub use outcome::{OutcomeBody, ProxyError, ProxyOutcome};
pub use signer::{sign, SigningError};
