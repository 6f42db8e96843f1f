//! Collateral valuation and health factor math.
//!
//! All ratio math is unsigned integer arithmetic on a percentage scale of
//! 100, floored toward zero. Truncation always rounds against the vault, so
//! a reported health factor never overstates safety.

use crate::oracle::PriceOracle;
use crate::types::{Asset, Tick};
use crate::vault::Vault;

/// Minimum collateralization ratio for minting and withdrawal, percent.
pub const MINIMUM_COLLATERAL_RATIO: u128 = 200;

/// Below this health factor a vault may be liquidated, percent.
pub const LIQUIDATION_RATIO: u128 = 150;

/// A liquidator's collateral claim is worth this percentage of the repaid debt.
pub const LIQUIDATION_PENALTY_PERCENT: u128 = 110;

/// Health factor reported for debt-free vaults.
pub const HEALTH_FACTOR_CEILING: u128 = 999_999;

/// Annual stability fee, percent. Declared by the protocol, not yet charged.
pub const STABILITY_FEE_PERCENT: u128 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValuationError {
    #[error("price feed missing or stale")]
    StalePrice,

    #[error("valuation arithmetic out of range")]
    Overflow,
}

/// `stx * price[STX] + xbtc * price[xBTC]`. Both feeds must be fresh even
/// when one balance is zero.
pub fn collateral_value(
    vault: &Vault,
    oracle: &PriceOracle,
    now: Tick,
) -> Result<u128, ValuationError> {
    let stx_price = oracle
        .fresh_price(Asset::Stx.symbol(), now)
        .ok_or(ValuationError::StalePrice)?;
    let xbtc_price = oracle
        .fresh_price(Asset::Xbtc.symbol(), now)
        .ok_or(ValuationError::StalePrice)?;

    let stx_value = vault
        .stx_collateral
        .checked_mul(stx_price)
        .ok_or(ValuationError::Overflow)?;
    let xbtc_value = vault
        .xbtc_collateral
        .checked_mul(xbtc_price)
        .ok_or(ValuationError::Overflow)?;

    stx_value.checked_add(xbtc_value).ok_or(ValuationError::Overflow)
}

/// `value * 100 / debt`, floored. Callers guarantee `debt > 0`.
pub fn collateral_ratio(value: u128, debt: u128) -> Result<u128, ValuationError> {
    value
        .checked_mul(100)
        .ok_or(ValuationError::Overflow)?
        .checked_div(debt)
        .ok_or(ValuationError::Overflow)
}

pub fn health_factor(
    vault: &Vault,
    oracle: &PriceOracle,
    now: Tick,
) -> Result<u128, ValuationError> {
    if vault.debt == 0 {
        return Ok(HEALTH_FACTOR_CEILING);
    }
    let value = collateral_value(vault, oracle, now)?;
    collateral_ratio(value, vault.debt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountId, VaultId};

    fn vault_with(stx: u128, xbtc: u128, debt: u128) -> Vault {
        let mut vault = Vault::new(VaultId(1), AccountId(7), stx, xbtc, Tick(0));
        vault.debt = debt;
        vault
    }

    fn oracle_with(stx_price: u128, xbtc_price: u128) -> PriceOracle {
        let mut oracle = PriceOracle::new();
        oracle.record(Asset::Stx.symbol(), stx_price, 90, Tick(0));
        oracle.record(Asset::Xbtc.symbol(), xbtc_price, 90, Tick(0));
        oracle
    }

    #[test]
    fn value_sums_both_assets() {
        let oracle = oracle_with(1_000_000, 100_000_000_000);
        let vault = vault_with(1000, 2, 0);

        let value = collateral_value(&vault, &oracle, Tick(0)).unwrap();
        assert_eq!(value, 1_000_000_000 + 200_000_000_000);
    }

    #[test]
    fn debt_free_vault_reports_ceiling() {
        let oracle = oracle_with(1, 1);
        let vault = vault_with(0, 0, 0);

        assert_eq!(health_factor(&vault, &oracle, Tick(0)).unwrap(), HEALTH_FACTOR_CEILING);
    }

    #[test]
    fn ratio_floors_toward_zero() {
        // 1_000 * 100 / 299 = 334.44..., reported as 334
        assert_eq!(collateral_ratio(1_000, 299).unwrap(), 334);
        // exact division stays exact
        assert_eq!(collateral_ratio(1_000, 500).unwrap(), 200);
    }

    #[test]
    fn stale_feed_fails_valuation_even_with_zero_balance() {
        let mut oracle = PriceOracle::new();
        oracle.record(Asset::Stx.symbol(), 1_000_000, 90, Tick(0));
        // xBTC feed never written; the vault holds no xBTC either
        let vault = vault_with(1000, 0, 100);

        assert_eq!(
            collateral_value(&vault, &oracle, Tick(0)),
            Err(ValuationError::StalePrice)
        );
        assert_eq!(
            health_factor(&vault, &oracle, Tick(0)),
            Err(ValuationError::StalePrice)
        );
    }

    #[test]
    fn valuation_overflow_is_an_error() {
        let oracle = oracle_with(u128::MAX, 1);
        let vault = vault_with(2, 0, 1);

        assert_eq!(
            collateral_value(&vault, &oracle, Tick(0)),
            Err(ValuationError::Overflow)
        );
    }
}
