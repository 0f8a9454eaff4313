//! # Enveloping Relay
//!
//! Gas and fee estimation engine for a meta-transaction relay: quotes the
//! total gas a user-signed relay or deploy request will be charged for and
//! gates execution on the user having committed enough value to cover it.

pub mod cli;
pub mod config;
pub mod constants;
pub mod conversions;
pub mod error;
pub mod estimation;
pub mod fees;
pub mod interactor;
pub mod metrics;
pub mod price;
pub mod relay;
pub mod rpc;
pub mod types;
pub mod version;
