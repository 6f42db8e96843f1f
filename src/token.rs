// 5.0 token.rs: stablecoin token ledger. in-memory balances, real contract
// checks: zero amounts, self-transfers and spending someone else's balance
// are all refused the way the live fungible-token interface refuses them.

use crate::types::AccountId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token amount must be positive")]
    ZeroAmount,

    #[error("caller is not the sender")]
    NotSender,

    #[error("sender and recipient are the same account")]
    SelfTransfer,

    #[error("insufficient token balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u128, available: u128 },

    #[error("token supply arithmetic out of range")]
    SupplyOverflow,
}

#[derive(Debug, Clone, Default)]
pub struct StableTokenLedger {
    balances: HashMap<AccountId, u128>,
    total_supply: u128,
}

impl StableTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: AccountId) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn mint(&mut self, amount: u128, to: AccountId) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;

        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    pub fn burn(&mut self, amount: u128, from: AccountId) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let available = self.balance_of(from);
        let balance = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                requested: amount,
                available,
            })?;
        let supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(TokenError::SupplyOverflow)?;

        self.total_supply = supply;
        self.balances.insert(from, balance);
        Ok(())
    }

    /// `caller` is the acting principal and must be the sender; delegated
    /// transfers pass the delegate. The memo is carried, not interpreted.
    pub fn transfer(
        &mut self,
        amount: u128,
        from: AccountId,
        to: AccountId,
        caller: AccountId,
        _memo: Option<&str>,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        if from != caller {
            return Err(TokenError::NotSender);
        }
        if from == to {
            return Err(TokenError::SelfTransfer);
        }
        let available = self.balance_of(from);
        let sender_balance = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                requested: amount,
                available,
            })?;
        let recipient_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;

        self.balances.insert(from, sender_balance);
        self.balances.insert(to, recipient_balance);
        Ok(())
    }
}
