// 9.0.2: result types and the closed error taxonomy for engine operations.
// every precondition failure maps to exactly one of these kinds; the first
// failing check aborts the operation with no observable state change.

use crate::custody::CustodyError;
use crate::token::TokenError;
use crate::types::{AccountId, VaultId};
use crate::valuation::ValuationError;
use crate::vault::IndexFull;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("caller is not authorized")]
    NotAuthorized,

    #[error("vault {0} not found or inactive")]
    VaultNotFound(VaultId),

    #[error("insufficient collateral in vault")]
    InsufficientCollateral,

    #[error("vault is undercollateralized")]
    VaultUndercollateralized,

    #[error("vault is not eligible for liquidation")]
    LiquidationNotAllowed,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("price feed missing or stale")]
    StalePrice,

    #[error("operation would breach the minimum collateral ratio")]
    MinimumCollateralRatio,

    #[error("vault {0} already exists")]
    VaultAlreadyExists(VaultId),

    #[error("insufficient stablecoin balance")]
    InsufficientStablecoinBalance,

    #[error("token or custody transfer failed")]
    TransferFailed,

    #[error("arithmetic overflow or underflow")]
    ArithmeticOverflow,
}

impl From<ValuationError> for EngineError {
    fn from(err: ValuationError) -> Self {
        match err {
            ValuationError::StalePrice => EngineError::StalePrice,
            ValuationError::Overflow => EngineError::ArithmeticOverflow,
        }
    }
}

impl From<TokenError> for EngineError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::ZeroAmount => EngineError::InvalidAmount,
            TokenError::InsufficientBalance { .. } => EngineError::InsufficientStablecoinBalance,
            TokenError::NotSender | TokenError::SelfTransfer => EngineError::TransferFailed,
            TokenError::SupplyOverflow => EngineError::ArithmeticOverflow,
        }
    }
}

impl From<CustodyError> for EngineError {
    fn from(err: CustodyError) -> Self {
        match err {
            CustodyError::ZeroAmount => EngineError::InvalidAmount,
            CustodyError::InsufficientFunds { .. } => EngineError::TransferFailed,
            CustodyError::Overflow => EngineError::ArithmeticOverflow,
        }
    }
}

impl From<IndexFull> for EngineError {
    fn from(_: IndexFull) -> Self {
        EngineError::InvalidAmount
    }
}

/// What a completed liquidation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationOutcome {
    pub vault_id: VaultId,
    pub liquidator: AccountId,
    /// Stablecoin burned from the liquidator, the vault's entire debt.
    pub debt_repaid: u128,
    /// Collateral value claimed: debt plus the liquidation penalty.
    pub collateral_claim: u128,
    pub stx_to_liquidator: u128,
    /// Deducted from the vault and the totals but never delivered.
    pub xbtc_written_off: u128,
}
