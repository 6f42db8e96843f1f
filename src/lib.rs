// cdp-core: collateralized debt stablecoin core engine.
// safety-first accounting: every precondition runs before any state change,
// all arithmetic is checked, and truncation always rounds against the vault.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: AccountId, VaultId, Tick, Asset
//   2.x  oracle.rs: price feeds and the staleness gate
//   3.x  valuation.rs: collateral value and health factor math
//   4.x  vault.rs: vault records and the per-owner bounded index
//   5.x  token.rs: stablecoin token ledger (in-memory collaborator)
//   6.x  custody.rs: collateral custody (in-memory collaborator)
//   7.x  stats.rs: running protocol totals
//   8.x  events.rs: audit journal of committed mutations
//   9.x  engine/: vault operations, liquidation, oracle ops, errors

// accounting core
pub mod engine;
pub mod oracle;
pub mod stats;
pub mod types;
pub mod valuation;
pub mod vault;

// collaborator services
pub mod custody;
pub mod token;

// audit trail
pub mod events;

// re exports for convenience
pub use custody::*;
pub use engine::*;
pub use events::*;
pub use oracle::*;
pub use stats::*;
pub use token::*;
pub use types::*;
pub use valuation::*;
pub use vault::*;
