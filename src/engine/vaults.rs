//! Vault position operations.
//!
//! Every operation runs as validate-everything, then one custody or token
//! side effect, then commit the vault record, the running totals and the
//! journal entry together. The first failing check aborts the whole
//! operation with zero observable state change, so new totals are computed
//! with checked arithmetic before the side effect is issued.

use super::core::Engine;
use super::results::EngineError;
use crate::events::{
    CollateralAddedEvent, CollateralWithdrawnEvent, EventPayload, StablecoinBurnedEvent,
    StablecoinMintedEvent, VaultOpenedEvent,
};
use crate::types::{AccountId, Asset, VaultId};
use crate::valuation::{self, MINIMUM_COLLATERAL_RATIO};
use crate::vault::{Vault, MAX_MINT_AMOUNT, MAX_VAULT_ID};

impl Engine {
    /// Opens a vault collateralized with `stx_amount` (custody-transferred
    /// from the caller) and `xbtc_amount` (recorded on the books; xBTC never
    /// moves through custody anywhere in the protocol).
    pub fn open_vault(
        &mut self,
        caller: AccountId,
        stx_amount: u128,
        xbtc_amount: u128,
    ) -> Result<VaultId, EngineError> {
        if stx_amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let next_id = self
            .stats
            .vault_count
            .checked_add(1)
            .ok_or(EngineError::ArithmeticOverflow)?;
        if next_id >= MAX_VAULT_ID {
            return Err(EngineError::InvalidAmount);
        }
        let vault_id = VaultId(next_id);
        // ids are never reused, so this only fires on allocator corruption
        if self.vaults.contains_key(&vault_id) {
            return Err(EngineError::VaultAlreadyExists(vault_id));
        }
        if self
            .user_vaults
            .get(&caller)
            .is_some_and(|index| index.is_full())
        {
            return Err(EngineError::InvalidAmount);
        }
        let total_stx = self
            .stats
            .total_stx_collateral
            .checked_add(stx_amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let total_xbtc = self
            .stats
            .total_xbtc_collateral
            .checked_add(xbtc_amount)
            .ok_or(EngineError::ArithmeticOverflow)?;

        self.custody.transfer_in(Asset::Stx, stx_amount, caller)?;

        let now = self.current_tick;
        self.vaults
            .insert(vault_id, Vault::new(vault_id, caller, stx_amount, xbtc_amount, now));
        // capacity was checked above, the push cannot fail here
        self.user_vaults.entry(caller).or_default().try_push(vault_id)?;
        self.stats.vault_count = next_id;
        self.stats.total_stx_collateral = total_stx;
        self.stats.total_xbtc_collateral = total_xbtc;
        self.emit_event(EventPayload::VaultOpened(VaultOpenedEvent {
            vault_id,
            owner: caller,
            stx_amount,
            xbtc_amount,
        }));
        Ok(vault_id)
    }

    /// Tops up collateral. An STX amount is mandatory on every call, even
    /// when only xBTC is being added; the contract has always required it.
    pub fn add_collateral(
        &mut self,
        caller: AccountId,
        vault_id: VaultId,
        stx_amount: u128,
        xbtc_amount: u128,
    ) -> Result<(), EngineError> {
        let vault = self.active_vault(vault_id)?;
        if vault.owner != caller {
            return Err(EngineError::NotAuthorized);
        }
        if stx_amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let new_stx = vault
            .stx_collateral
            .checked_add(stx_amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let new_xbtc = vault
            .xbtc_collateral
            .checked_add(xbtc_amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let total_stx = self
            .stats
            .total_stx_collateral
            .checked_add(stx_amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let total_xbtc = self
            .stats
            .total_xbtc_collateral
            .checked_add(xbtc_amount)
            .ok_or(EngineError::ArithmeticOverflow)?;

        self.custody.transfer_in(Asset::Stx, stx_amount, caller)?;

        let now = self.current_tick;
        let vault = self
            .vaults
            .get_mut(&vault_id)
            .ok_or(EngineError::VaultNotFound(vault_id))?;
        vault.stx_collateral = new_stx;
        vault.xbtc_collateral = new_xbtc;
        vault.last_update = now;
        self.stats.total_stx_collateral = total_stx;
        self.stats.total_xbtc_collateral = total_xbtc;
        self.emit_event(EventPayload::CollateralAdded(CollateralAddedEvent {
            vault_id,
            stx_amount,
            xbtc_amount,
        }));
        Ok(())
    }

    /// Mints stablecoin against the vault. The resulting position must stay
    /// at or above the minimum collateral ratio against fresh prices.
    pub fn mint_stablecoin(
        &mut self,
        caller: AccountId,
        vault_id: VaultId,
        amount: u128,
    ) -> Result<(), EngineError> {
        let vault = self.active_vault(vault_id)?;
        if vault.owner != caller {
            return Err(EngineError::NotAuthorized);
        }
        if amount == 0 || amount >= MAX_MINT_AMOUNT {
            return Err(EngineError::InvalidAmount);
        }
        let new_debt = vault
            .debt
            .checked_add(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let value = valuation::collateral_value(vault, &self.oracle, self.current_tick)?;
        if valuation::collateral_ratio(value, new_debt)? < MINIMUM_COLLATERAL_RATIO {
            return Err(EngineError::MinimumCollateralRatio);
        }
        let total_debt = self
            .stats
            .total_debt
            .checked_add(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;

        self.token.mint(amount, caller)?;

        let now = self.current_tick;
        let vault = self
            .vaults
            .get_mut(&vault_id)
            .ok_or(EngineError::VaultNotFound(vault_id))?;
        vault.debt = new_debt;
        vault.last_update = now;
        self.stats.total_debt = total_debt;
        self.emit_event(EventPayload::StablecoinMinted(StablecoinMintedEvent {
            vault_id,
            owner: caller,
            amount,
            new_debt,
        }));
        Ok(())
    }

    /// Repays debt by burning stablecoin from the caller's balance. Repaying
    /// more than is owed is refused.
    pub fn burn_stablecoin(
        &mut self,
        caller: AccountId,
        vault_id: VaultId,
        amount: u128,
    ) -> Result<(), EngineError> {
        let vault = self.active_vault(vault_id)?;
        if vault.owner != caller {
            return Err(EngineError::NotAuthorized);
        }
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        if self.token.balance_of(caller) < amount {
            return Err(EngineError::InsufficientStablecoinBalance);
        }
        if vault.debt < amount {
            return Err(EngineError::InvalidAmount);
        }
        let new_debt = vault
            .debt
            .checked_sub(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let total_debt = self
            .stats
            .total_debt
            .checked_sub(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;

        self.token.burn(amount, caller)?;

        let now = self.current_tick;
        let vault = self
            .vaults
            .get_mut(&vault_id)
            .ok_or(EngineError::VaultNotFound(vault_id))?;
        vault.debt = new_debt;
        vault.last_update = now;
        self.stats.total_debt = total_debt;
        self.emit_event(EventPayload::StablecoinBurned(StablecoinBurnedEvent {
            vault_id,
            amount,
            new_debt,
        }));
        Ok(())
    }

    /// Withdraws STX collateral to the owner. When debt remains, the reduced
    /// position must still meet the minimum ratio. Only STX withdrawal
    /// exists; the interface has never exposed an xBTC withdrawal.
    pub fn withdraw_collateral(
        &mut self,
        caller: AccountId,
        vault_id: VaultId,
        stx_amount: u128,
    ) -> Result<(), EngineError> {
        let vault = self.active_vault(vault_id)?;
        if vault.owner != caller {
            return Err(EngineError::NotAuthorized);
        }
        if stx_amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        if vault.stx_collateral < stx_amount {
            return Err(EngineError::InsufficientCollateral);
        }
        let new_stx = vault
            .stx_collateral
            .checked_sub(stx_amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        if vault.debt > 0 {
            let mut reduced = vault.clone();
            reduced.stx_collateral = new_stx;
            let value = valuation::collateral_value(&reduced, &self.oracle, self.current_tick)?;
            if valuation::collateral_ratio(value, reduced.debt)? < MINIMUM_COLLATERAL_RATIO {
                return Err(EngineError::MinimumCollateralRatio);
            }
        }
        let total_stx = self
            .stats
            .total_stx_collateral
            .checked_sub(stx_amount)
            .ok_or(EngineError::ArithmeticOverflow)?;

        self.custody.transfer_out(Asset::Stx, stx_amount, caller)?;

        let now = self.current_tick;
        let vault = self
            .vaults
            .get_mut(&vault_id)
            .ok_or(EngineError::VaultNotFound(vault_id))?;
        vault.stx_collateral = new_stx;
        vault.last_update = now;
        self.stats.total_stx_collateral = total_stx;
        self.emit_event(EventPayload::CollateralWithdrawn(CollateralWithdrawnEvent {
            vault_id,
            stx_amount,
            remaining_stx: new_stx,
        }));
        Ok(())
    }
}
