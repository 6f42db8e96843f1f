//! Stablecoin Core Simulation.
//!
//! Walks the vault ledger through its full lifecycle: opening positions,
//! minting against collateral, repaying, withdrawing, and a liquidation
//! after a price crash.

use cdp_core::*;

const OWNER: AccountId = AccountId(1);
const ORACLE_OP: AccountId = AccountId(2);
const KEEPER: AccountId = AccountId(3);
const ALICE: AccountId = AccountId(10);
const BOB: AccountId = AccountId(11);

const STX_PRICE: u128 = 1_000_000;
const XBTC_PRICE: u128 = 100_000_000_000;

fn main() {
    println!("Stablecoin Core Engine Simulation");
    println!("Two Collateral Classes, Oracle-Gated Valuation, Forced Liquidation\n");

    scenario_1_open_and_mint();
    scenario_2_repay_and_withdraw();
    scenario_3_price_crash_and_liquidation();
    scenario_4_stale_oracle();

    println!("\nAll simulations completed successfully.");
}

fn setup_engine() -> Engine {
    let mut engine = Engine::new(OWNER, EngineConfig::default());
    engine.set_oracle_operator(OWNER, ORACLE_OP, true).unwrap();
    engine.set_liquidator(OWNER, KEEPER, true).unwrap();
    engine.update_price(ORACLE_OP, "STX", STX_PRICE, 95).unwrap();
    engine.update_price(ORACLE_OP, "xBTC", XBTC_PRICE, 95).unwrap();

    engine.credit_collateral(ALICE, Asset::Stx, 1_000_000);
    engine.credit_collateral(BOB, Asset::Stx, 1_000_000);
    engine.credit_collateral(KEEPER, Asset::Stx, 1_000_000);
    engine
}

/// Opening a vault and minting against it, up to the ratio floor.
fn scenario_1_open_and_mint() {
    println!("Scenario 1: Open and Mint\n");

    let mut engine = setup_engine();

    let vault_id = engine.open_vault(ALICE, 1_000, 0).unwrap();
    println!("  Alice opens vault {} with 1,000 STX", vault_id);

    engine.mint_stablecoin(ALICE, vault_id, 400_000_000).unwrap();
    println!(
        "  Alice mints 400,000,000 units, health factor {}",
        engine.calculate_health_factor(vault_id).unwrap()
    );

    let refused = engine.mint_stablecoin(ALICE, vault_id, 250_000_001);
    println!("  A further 250,000,001 is refused: {:?}", refused.unwrap_err());

    let stats = engine.protocol_stats();
    println!(
        "  Protocol: {} vault(s), total debt {}, token supply {}\n",
        stats.vault_count, stats.total_debt, stats.token_total_supply
    );
}

/// Debt repayment and collateral withdrawal at the ratio boundary.
fn scenario_2_repay_and_withdraw() {
    println!("Scenario 2: Repay and Withdraw\n");

    let mut engine = setup_engine();
    let vault_id = engine.open_vault(BOB, 1_000, 0).unwrap();
    engine.mint_stablecoin(BOB, vault_id, 400_000_000).unwrap();

    engine.burn_stablecoin(BOB, vault_id, 400_000_000).unwrap();
    println!("  Bob repays his full 400,000,000 debt");

    engine.withdraw_collateral(BOB, vault_id, 1_000).unwrap();
    println!("  Bob withdraws all 1,000 STX from the debt-free vault");

    let vault = engine.get_vault(vault_id).unwrap();
    println!(
        "  Vault {}: collateral {}, debt {}, active {}\n",
        vault_id, vault.stx_collateral, vault.debt, vault.active
    );
}

/// A price crash pushes a vault below the liquidation threshold.
fn scenario_3_price_crash_and_liquidation() {
    println!("Scenario 3: Price Crash and Liquidation\n");

    let mut engine = setup_engine();

    // the keeper needs stablecoin to repay the vault's debt
    let keeper_vault = engine.open_vault(KEEPER, 100_000, 0).unwrap();
    engine.mint_stablecoin(KEEPER, keeper_vault, 500_000_000).unwrap();

    let vault_id = engine.open_vault(ALICE, 1_000, 0).unwrap();
    engine.mint_stablecoin(ALICE, vault_id, 400_000_000).unwrap();
    println!("  Alice's vault: 1,000 STX collateral, 400,000,000 debt");

    engine.advance_tick(10);
    engine.update_price(ORACLE_OP, "STX", 500_000, 80).unwrap();
    let health = engine.calculate_health_factor(vault_id).unwrap();
    println!("  STX halves to 500,000; health factor now {}", health);

    let outcome = engine.liquidate_vault(KEEPER, vault_id).unwrap();
    println!(
        "  Keeper repays {} and receives {} STX (claim worth {})",
        outcome.debt_repaid, outcome.stx_to_liquidator, outcome.collateral_claim
    );

    let vault = engine.get_vault(vault_id).unwrap();
    println!(
        "  Vault {} is closed: active {}, debt {}\n",
        vault_id, vault.active, vault.debt
    );
}

/// Every valuation path refuses a feed past the staleness window.
fn scenario_4_stale_oracle() {
    println!("Scenario 4: Stale Oracle\n");

    let mut engine = setup_engine();
    let vault_id = engine.open_vault(ALICE, 1_000, 0).unwrap();

    engine.advance_tick(MAX_PRICE_AGE);
    let refused = engine.mint_stablecoin(ALICE, vault_id, 1_000);
    println!(
        "  After {} ticks of silence, minting is refused: {:?}",
        MAX_PRICE_AGE,
        refused.unwrap_err()
    );

    engine.update_price(ORACLE_OP, "STX", STX_PRICE, 95).unwrap();
    engine.update_price(ORACLE_OP, "xBTC", XBTC_PRICE, 95).unwrap();
    engine.mint_stablecoin(ALICE, vault_id, 1_000).unwrap();
    println!("  Fresh feeds restore the path; mint succeeds");
}
