//! Running protocol totals.
//!
//! Updated transactionally by every vault and liquidation operation. There
//! is no recompute-from-ledger path: whatever the operations record is what
//! the protocol reports.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStats {
    /// Doubles as the vault id allocator: the next id is `vault_count + 1`.
    pub vault_count: u64,
    pub total_debt: u128,
    pub total_stx_collateral: u128,
    pub total_xbtc_collateral: u128,
}

/// Point-in-time view handed to callers, totals plus the token supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolSnapshot {
    pub vault_count: u64,
    pub total_debt: u128,
    pub total_stx_collateral: u128,
    pub total_xbtc_collateral: u128,
    pub token_total_supply: u128,
}

impl ProtocolStats {
    pub fn snapshot(&self, token_total_supply: u128) -> ProtocolSnapshot {
        ProtocolSnapshot {
            vault_count: self.vault_count,
            total_debt: self.total_debt,
            total_stx_collateral: self.total_stx_collateral,
            total_xbtc_collateral: self.total_xbtc_collateral,
            token_total_supply,
        }
    }
}
