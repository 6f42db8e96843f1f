// 9.1 engine/core.rs: main engine. owns the vault arena, the oracle, the
// authorization sets, the running totals, the collaborator services and the
// journal. all state lives here; operations in the sibling modules mutate it
// through `&mut self`, one invocation at a time.

use super::config::EngineConfig;
use super::results::EngineError;
use crate::custody::CollateralCustody;
use crate::events::{Event, EventId, EventPayload};
use crate::oracle::PriceOracle;
use crate::stats::{ProtocolSnapshot, ProtocolStats};
use crate::token::StableTokenLedger;
use crate::types::{AccountId, Asset, Tick, VaultId};
use crate::valuation::{self, LIQUIDATION_RATIO};
use crate::vault::{OwnerVaultIndex, Vault};
use std::collections::HashMap;

#[derive(Debug)]
pub struct Engine {
    pub(super) config: EngineConfig,
    /// Fixed at construction, never reassigned.
    pub(super) owner: AccountId,
    pub(super) current_tick: Tick,
    pub(super) vaults: HashMap<VaultId, Vault>,
    pub(super) user_vaults: HashMap<AccountId, OwnerVaultIndex>,
    pub(super) oracle: PriceOracle,
    pub(super) oracle_operators: HashMap<AccountId, bool>,
    pub(super) liquidators: HashMap<AccountId, bool>,
    pub(super) stats: ProtocolStats,
    pub(super) token: StableTokenLedger,
    pub(super) custody: CollateralCustody,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
}

impl Engine {
    pub fn new(owner: AccountId, config: EngineConfig) -> Self {
        Self {
            config,
            owner,
            current_tick: Tick(0),
            vaults: HashMap::new(),
            user_vaults: HashMap::new(),
            oracle: PriceOracle::new(),
            oracle_operators: HashMap::new(),
            liquidators: HashMap::new(),
            stats: ProtocolStats::default(),
            token: StableTokenLedger::new(),
            custody: CollateralCustody::new(),
            events: Vec::new(),
            next_event_id: 1,
        }
    }

    // hosts advance ticks monotonically; the engine never rewinds them itself
    pub fn set_tick(&mut self, tick: Tick) {
        self.current_tick = tick;
    }

    pub fn advance_tick(&mut self, ticks: u64) {
        self.current_tick = Tick(self.current_tick.0.saturating_add(ticks));
    }

    pub fn tick(&self) -> Tick {
        self.current_tick
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn is_oracle_operator(&self, account: AccountId) -> bool {
        self.oracle_operators.get(&account).copied().unwrap_or(false)
    }

    pub fn is_liquidator(&self, account: AccountId) -> bool {
        self.liquidators.get(&account).copied().unwrap_or(false)
    }

    // ---- read-only query surface ----

    /// The raw record, active or not.
    pub fn get_vault(&self, vault_id: VaultId) -> Option<&Vault> {
        self.vaults.get(&vault_id)
    }

    pub fn get_user_vaults(&self, owner: AccountId) -> &[VaultId] {
        self.user_vaults
            .get(&owner)
            .map(|index| index.ids())
            .unwrap_or(&[])
    }

    pub fn protocol_stats(&self) -> ProtocolSnapshot {
        self.stats.snapshot(self.token.total_supply())
    }

    pub fn calculate_health_factor(&self, vault_id: VaultId) -> Result<u128, EngineError> {
        let vault = self.active_vault(vault_id)?;
        Ok(valuation::health_factor(vault, &self.oracle, self.current_tick)?)
    }

    /// Safe means not currently liquidatable.
    pub fn is_vault_safe(&self, vault_id: VaultId) -> Result<bool, EngineError> {
        Ok(self.calculate_health_factor(vault_id)? >= LIQUIDATION_RATIO)
    }

    // ---- collaborator access ----

    pub fn token(&self) -> &StableTokenLedger {
        &self.token
    }

    pub fn custody(&self) -> &CollateralCustody {
        &self.custody
    }

    /// Funds an account's external collateral balance. Simulation and test
    /// affordance; live balances come from the host chain.
    pub fn credit_collateral(&mut self, account: AccountId, asset: Asset, amount: u128) {
        self.custody.credit(account, asset, amount);
    }

    // ---- journal ----

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_tick, payload);
        self.next_event_id += 1;

        if self.config.verbose {
            println!("[Event {}] {:?}", event.id.0, event.payload);
        }

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }

    // ---- shared lookups ----

    /// Inactive vaults are terminal and report the same as missing ones.
    pub(super) fn active_vault(&self, vault_id: VaultId) -> Result<&Vault, EngineError> {
        match self.vaults.get(&vault_id) {
            Some(vault) if vault.active => Ok(vault),
            _ => Err(EngineError::VaultNotFound(vault_id)),
        }
    }

    // ---- inert admin surface ----
    // interface placeholders carried from the deployed contract: they gate on
    // the owner and change nothing.

    pub fn emergency_shutdown(&mut self, caller: AccountId) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::NotAuthorized);
        }
        Ok(())
    }

    pub fn update_liquidation_ratio(
        &mut self,
        caller: AccountId,
        _new_ratio: u128,
    ) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::NotAuthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: AccountId = AccountId(1);
    const STRANGER: AccountId = AccountId(2);

    fn engine() -> Engine {
        Engine::new(OWNER, EngineConfig::default())
    }

    #[test]
    fn tick_control() {
        let mut engine = engine();
        assert_eq!(engine.tick(), Tick(0));

        engine.set_tick(Tick(50));
        engine.advance_tick(10);
        assert_eq!(engine.tick(), Tick(60));
    }

    #[test]
    fn unknown_vault_queries_fail() {
        let engine = engine();

        assert!(engine.get_vault(VaultId(1)).is_none());
        assert_eq!(
            engine.calculate_health_factor(VaultId(1)),
            Err(EngineError::VaultNotFound(VaultId(1)))
        );
        assert!(engine.get_user_vaults(STRANGER).is_empty());
    }

    #[test]
    fn admin_stubs_gate_on_owner_and_do_nothing() {
        let mut engine = engine();

        assert_eq!(engine.emergency_shutdown(STRANGER), Err(EngineError::NotAuthorized));
        assert_eq!(engine.update_liquidation_ratio(STRANGER, 175), Err(EngineError::NotAuthorized));

        engine.emergency_shutdown(OWNER).unwrap();
        engine.update_liquidation_ratio(OWNER, 175).unwrap();
        // no state changed, no events recorded
        assert!(engine.events().is_empty());
        assert_eq!(engine.protocol_stats().vault_count, 0);
    }

    #[test]
    fn journal_respects_capacity() {
        let mut engine = Engine::new(
            OWNER,
            EngineConfig {
                max_events: 2,
                verbose: false,
            },
        );

        for operator in [AccountId(10), AccountId(11), AccountId(12)] {
            engine.set_oracle_operator(OWNER, operator, true).unwrap();
        }

        assert_eq!(engine.events().len(), 2);
        // oldest entry was dropped
        assert_eq!(engine.events()[0].id, EventId(2));
        assert_eq!(engine.recent_events(1)[0].id, EventId(3));
    }
}
