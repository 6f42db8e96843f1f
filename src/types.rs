// 1.0: all the primitives live here. ids, ticks, assets. each is a newtype so
// the compiler catches mixups between vault ids, account ids and raw numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VaultId(pub u64);

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// 1.1: monotonic tick, the block height analogue. feed timestamps and
// staleness windows compare ticks, never wall clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    /// One tick per wall-clock second, for hosts without a block height.
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp().max(0) as u64)
    }

    pub fn from_raw(tick: u64) -> Self {
        Self(tick)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Ticks since `earlier`, zero if `earlier` is in the future.
    pub fn elapsed_since(&self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

// 1.2: the two hard-coded collateral classes. the oracle is keyed by symbol,
// so each asset knows its feed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    Stx,
    Xbtc,
}

impl Asset {
    pub const ALL: [Asset; 2] = [Asset::Stx, Asset::Xbtc];

    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Stx => "STX",
            Asset::Xbtc => "xBTC",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
