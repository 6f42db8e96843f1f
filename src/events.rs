// 8.0: every committed mutation appends an event. used for audit trails,
// state reconstruction, and notifying external systems. the EventPayload
// enum lists all event types.

use crate::types::{AccountId, Tick, VaultId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub tick: Tick,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, tick: Tick, payload: EventPayload) -> Self {
        Self { id, tick, payload }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    // vault lifecycle
    VaultOpened(VaultOpenedEvent),
    CollateralAdded(CollateralAddedEvent),
    StablecoinMinted(StablecoinMintedEvent),
    StablecoinBurned(StablecoinBurnedEvent),
    CollateralWithdrawn(CollateralWithdrawnEvent),

    // risk events
    VaultLiquidated(VaultLiquidatedEvent),

    // oracle events
    PriceUpdated(PriceUpdatedEvent),
    OracleOperatorSet(OracleOperatorSetEvent),

    // admin events
    LiquidatorSet(LiquidatorSetEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultOpenedEvent {
    pub vault_id: VaultId,
    pub owner: AccountId,
    pub stx_amount: u128,
    pub xbtc_amount: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralAddedEvent {
    pub vault_id: VaultId,
    pub stx_amount: u128,
    pub xbtc_amount: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StablecoinMintedEvent {
    pub vault_id: VaultId,
    pub owner: AccountId,
    pub amount: u128,
    pub new_debt: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StablecoinBurnedEvent {
    pub vault_id: VaultId,
    pub amount: u128,
    pub new_debt: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralWithdrawnEvent {
    pub vault_id: VaultId,
    pub stx_amount: u128,
    pub remaining_stx: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultLiquidatedEvent {
    pub vault_id: VaultId,
    pub liquidator: AccountId,
    pub debt_repaid: u128,
    pub stx_to_liquidator: u128,
    /// Deducted from the books without a matching delivery; see the
    /// liquidation operation.
    pub xbtc_written_off: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdatedEvent {
    pub symbol: String,
    pub price: u128,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleOperatorSetEvent {
    pub operator: AccountId,
    pub authorized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidatorSetEvent {
    pub liquidator: AccountId,
    pub authorized: bool,
}
