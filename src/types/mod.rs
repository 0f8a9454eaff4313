//! Enveloping relay types.

mod erc20;
pub use erc20::IERC20;

pub mod relay_hub;

mod request;
pub use request::*;

mod rpc;
pub use rpc::*;

mod transfer;
pub use transfer::TokenTransfer;
