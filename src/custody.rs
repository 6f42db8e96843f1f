// 6.0 custody.rs: collateral custody. tracks user-held balances outside the
// protocol and one protocol-held pool per asset; a transfer either moves the
// full amount or fails, so the surrounding ledger mutation can abort cleanly.

use crate::types::{AccountId, Asset};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CustodyError {
    #[error("custody amount must be positive")]
    ZeroAmount,

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u128, available: u128 },

    #[error("custody balance arithmetic out of range")]
    Overflow,
}

#[derive(Debug, Clone, Default)]
pub struct CollateralCustody {
    external: HashMap<(AccountId, Asset), u128>,
    held: HashMap<Asset, u128>,
}

impl CollateralCustody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn external_balance(&self, account: AccountId, asset: Asset) -> u128 {
        self.external.get(&(account, asset)).copied().unwrap_or(0)
    }

    /// Protocol-held pool for the asset.
    pub fn held(&self, asset: Asset) -> u128 {
        self.held.get(&asset).copied().unwrap_or(0)
    }

    /// Funds an account's external balance. Simulation and test affordance;
    /// the live system's balances come from the host chain.
    pub fn credit(&mut self, account: AccountId, asset: Asset, amount: u128) {
        let balance = self.external_balance(account, asset).saturating_add(amount);
        self.external.insert((account, asset), balance);
    }

    pub fn transfer_in(
        &mut self,
        asset: Asset,
        amount: u128,
        from: AccountId,
    ) -> Result<(), CustodyError> {
        if amount == 0 {
            return Err(CustodyError::ZeroAmount);
        }
        let available = self.external_balance(from, asset);
        let external = available
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientFunds {
                requested: amount,
                available,
            })?;
        let held = self
            .held(asset)
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;

        self.external.insert((from, asset), external);
        self.held.insert(asset, held);
        Ok(())
    }

    pub fn transfer_out(
        &mut self,
        asset: Asset,
        amount: u128,
        to: AccountId,
    ) -> Result<(), CustodyError> {
        if amount == 0 {
            return Err(CustodyError::ZeroAmount);
        }
        let available = self.held(asset);
        let held = available
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientFunds {
                requested: amount,
                available,
            })?;
        let external = self
            .external_balance(to, asset)
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;

        self.held.insert(asset, held);
        self.external.insert((to, asset), external);
        Ok(())
    }
}
