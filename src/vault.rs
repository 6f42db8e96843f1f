// 4.0: vault records. a vault is one owner's collateral/debt position.
// ids are allocated sequentially and never reused; an inactive vault is
// terminal and nothing mutates it again.

use crate::types::{AccountId, Asset, Tick, VaultId};
use serde::{Deserialize, Serialize};

/// Ids stay strictly below this bound; the allocator refuses to go further.
pub const MAX_VAULT_ID: u64 = 1_000_000;

/// Upper bound on a single mint, exclusive.
pub const MAX_MINT_AMOUNT: u128 = 1_000_000_000_000;

/// Capacity of one owner's vault index.
pub const MAX_VAULTS_PER_OWNER: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub id: VaultId,
    pub owner: AccountId,
    pub stx_collateral: u128,
    pub xbtc_collateral: u128,
    pub debt: u128,
    pub last_update: Tick,
    /// Cleared exactly once, by liquidation.
    pub active: bool,
}

impl Vault {
    pub fn new(id: VaultId, owner: AccountId, stx: u128, xbtc: u128, opened_at: Tick) -> Self {
        Self {
            id,
            owner,
            stx_collateral: stx,
            xbtc_collateral: xbtc,
            debt: 0,
            last_update: opened_at,
            active: true,
        }
    }

    pub fn collateral(&self, asset: Asset) -> u128 {
        match asset {
            Asset::Stx => self.stx_collateral,
            Asset::Xbtc => self.xbtc_collateral,
        }
    }
}

// 4.1: per-owner vault index. ordered, capacity-capped; running out of slots
// is a reported error, never a silent drop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerVaultIndex {
    ids: Vec<VaultId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("owner vault index is at capacity")]
pub struct IndexFull;

impl OwnerVaultIndex {
    pub fn ids(&self) -> &[VaultId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_VAULTS_PER_OWNER
    }

    /// Appends the id, refusing when the index is at capacity.
    pub fn try_push(&mut self, id: VaultId) -> Result<(), IndexFull> {
        if self.is_full() {
            return Err(IndexFull);
        }
        self.ids.push(id);
        Ok(())
    }
}
