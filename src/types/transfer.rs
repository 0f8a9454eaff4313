//! Selector-based detection of ERC20 transfer invocations in forwarded call
//! data.

use crate::types::IERC20;
use alloy::{primitives::U256, sol_types::SolCall};

/// A recognized token transfer inside forwarded call data.
///
/// Classification is a pure function of the leading 4-byte selector with
/// exactly three outcomes: `transfer`, `transferFrom`, or no match. Call data
/// whose selector differs by a single bit is not a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTransfer {
    /// `transfer(address,uint256)`
    Transfer {
        /// The transferred token amount.
        amount: U256,
    },
    /// `transferFrom(address,address,uint256)`
    TransferFrom {
        /// The transferred token amount.
        amount: U256,
    },
}

impl TokenTransfer {
    /// Classifies call data and extracts the transferred amount, the last
    /// 32-byte word of both signatures.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let selector: [u8; 4] = data.get(..4)?.try_into().ok()?;
        match selector {
            IERC20::transferCall::SELECTOR => {
                let call = IERC20::transferCall::abi_decode(data).ok()?;
                Some(Self::Transfer { amount: call.amount })
            }
            IERC20::transferFromCall::SELECTOR => {
                let call = IERC20::transferFromCall::abi_decode(data).ok()?;
                Some(Self::TransferFrom { amount: call.amount })
            }
            _ => None,
        }
    }

    /// The transferred token amount.
    pub const fn amount(&self) -> U256 {
        match self {
            Self::Transfer { amount } | Self::TransferFrom { amount } => *amount,
        }
    }
}
