//! Oracle administration and price operations.

use super::core::Engine;
use super::results::EngineError;
use crate::events::{EventPayload, OracleOperatorSetEvent, PriceUpdatedEvent};
use crate::oracle::{PriceFeed, MAX_CONFIDENCE, MIN_CONFIDENCE};
use crate::types::AccountId;

impl Engine {
    /// Owner-only. An operator can never be granted by themself: the caller
    /// and the operator must differ, which also bars the owner from
    /// self-designating.
    pub fn set_oracle_operator(
        &mut self,
        caller: AccountId,
        operator: AccountId,
        authorized: bool,
    ) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::NotAuthorized);
        }
        if operator == caller {
            return Err(EngineError::InvalidAmount);
        }

        self.oracle_operators.insert(operator, authorized);
        self.emit_event(EventPayload::OracleOperatorSet(OracleOperatorSetEvent {
            operator,
            authorized,
        }));
        Ok(())
    }

    pub fn update_price(
        &mut self,
        caller: AccountId,
        symbol: &str,
        price: u128,
        confidence: u8,
    ) -> Result<(), EngineError> {
        if !self.is_oracle_operator(caller) {
            return Err(EngineError::NotAuthorized);
        }
        if price == 0
            || confidence < MIN_CONFIDENCE
            || confidence > MAX_CONFIDENCE
            || symbol.is_empty()
        {
            return Err(EngineError::InvalidAmount);
        }

        self.oracle.record(symbol, price, confidence, self.current_tick);
        self.emit_event(EventPayload::PriceUpdated(PriceUpdatedEvent {
            symbol: symbol.to_string(),
            price,
            confidence,
        }));
        Ok(())
    }

    /// The staleness-gated read every valuation goes through.
    pub fn get_price(&self, symbol: &str) -> Result<u128, EngineError> {
        self.oracle
            .fresh_price(symbol, self.current_tick)
            .ok_or(EngineError::StalePrice)
    }

    /// Raw feed inspection, ignoring staleness.
    pub fn price_feed(&self, symbol: &str) -> Option<&PriceFeed> {
        self.oracle.feed(symbol)
    }
}
