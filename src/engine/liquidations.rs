//! Liquidator administration and forced settlement of unsafe vaults.

use super::core::Engine;
use super::results::{EngineError, LiquidationOutcome};
use crate::events::{EventPayload, LiquidatorSetEvent, VaultLiquidatedEvent};
use crate::types::{AccountId, Asset, VaultId};
use crate::valuation::{self, HEALTH_FACTOR_CEILING, LIQUIDATION_PENALTY_PERCENT, LIQUIDATION_RATIO};

impl Engine {
    /// Owner-only. Same self-exclusion as the oracle operator setter: the
    /// caller and the liquidator must differ, so the owner can never appoint
    /// themself.
    pub fn set_liquidator(
        &mut self,
        caller: AccountId,
        liquidator: AccountId,
        authorized: bool,
    ) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::NotAuthorized);
        }
        if liquidator == caller {
            return Err(EngineError::InvalidAmount);
        }

        self.liquidators.insert(liquidator, authorized);
        self.emit_event(EventPayload::LiquidatorSet(LiquidatorSetEvent {
            liquidator,
            authorized,
        }));
        Ok(())
    }

    /// Settles an unsafe vault. The liquidator repays the entire debt and
    /// claims collateral worth the debt plus the liquidation penalty,
    /// pro-rata across both assets. The vault is terminal afterwards.
    ///
    /// The xBTC share is deducted from the vault and the running totals but
    /// is not transferred to the liquidator: the contract has no xBTC
    /// transfer path, and the books record the deduction anyway. Kept for
    /// parity with the deployed ledger; the solvency suite pins the exact
    /// discrepancy.
    pub fn liquidate_vault(
        &mut self,
        caller: AccountId,
        vault_id: VaultId,
    ) -> Result<LiquidationOutcome, EngineError> {
        if !self.is_liquidator(caller) {
            return Err(EngineError::NotAuthorized);
        }
        let vault = self.active_vault(vault_id)?;
        let value = valuation::collateral_value(vault, &self.oracle, self.current_tick)?;
        let health = if vault.debt == 0 {
            HEALTH_FACTOR_CEILING
        } else {
            valuation::collateral_ratio(value, vault.debt)?
        };
        if health >= LIQUIDATION_RATIO {
            return Err(EngineError::LiquidationNotAllowed);
        }
        // debt is positive past the health gate: debt-free vaults report the
        // ceiling and were rejected above
        let debt = vault.debt;
        let stx = vault.stx_collateral;
        let xbtc = vault.xbtc_collateral;
        // the liquidator covers the entire debt, not the discounted amount
        if self.token.balance_of(caller) < debt {
            return Err(EngineError::InsufficientStablecoinBalance);
        }

        let claim = debt
            .checked_mul(LIQUIDATION_PENALTY_PERCENT)
            .ok_or(EngineError::ArithmeticOverflow)?
            .checked_div(100)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let stx_payout = stx
            .checked_mul(claim)
            .ok_or(EngineError::ArithmeticOverflow)?
            .checked_div(value)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let xbtc_share = xbtc
            .checked_mul(claim)
            .ok_or(EngineError::ArithmeticOverflow)?
            .checked_div(value)
            .ok_or(EngineError::ArithmeticOverflow)?;
        // a claim worth more than the vault holds must refuse, not wrap
        let new_stx = stx
            .checked_sub(stx_payout)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let new_xbtc = xbtc
            .checked_sub(xbtc_share)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let total_debt = self
            .stats
            .total_debt
            .checked_sub(debt)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let total_stx = self
            .stats
            .total_stx_collateral
            .checked_sub(stx_payout)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let total_xbtc = self
            .stats
            .total_xbtc_collateral
            .checked_sub(xbtc_share)
            .ok_or(EngineError::ArithmeticOverflow)?;
        if self.custody.held(Asset::Stx) < stx_payout {
            return Err(EngineError::TransferFailed);
        }

        self.token.burn(debt, caller)?;
        if stx_payout > 0 {
            self.custody.transfer_out(Asset::Stx, stx_payout, caller)?;
        }

        let now = self.current_tick;
        let vault = self
            .vaults
            .get_mut(&vault_id)
            .ok_or(EngineError::VaultNotFound(vault_id))?;
        vault.debt = 0;
        vault.stx_collateral = new_stx;
        vault.xbtc_collateral = new_xbtc;
        vault.active = false;
        vault.last_update = now;
        self.stats.total_debt = total_debt;
        self.stats.total_stx_collateral = total_stx;
        self.stats.total_xbtc_collateral = total_xbtc;
        self.emit_event(EventPayload::VaultLiquidated(VaultLiquidatedEvent {
            vault_id,
            liquidator: caller,
            debt_repaid: debt,
            stx_to_liquidator: stx_payout,
            xbtc_written_off: xbtc_share,
        }));
        Ok(LiquidationOutcome {
            vault_id,
            liquidator: caller,
            debt_repaid: debt,
            collateral_claim: claim,
            stx_to_liquidator: stx_payout,
            xbtc_written_off: xbtc_share,
        })
    }
}
