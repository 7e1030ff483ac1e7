//! Dutch Auction Liquidation Keeper
//!
//! Step-driven simulation driver for the keeper decision engine:
//! - Builds a small protocol world (ledger, auction houses, capacity desk)
//! - Runs one decision pass per discrete timestep for each keeper
//! - Emits the per-timestep action log as JSON, without applying anything
//!
//! Action execution and settlement belong to an external executor; this
//! binary only shows what each keeper would do.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use alloy::primitives::Address;
use keeper_core::{
    AuctionRestarter, BiddingStrategy, DiscountTaker, ExecutionCostModel, IncentiveModel,
    KeeperConfig, KeeperRegistry, LiquidationTrigger,
};
use keeper_market::{ConstantGasOracle, ConstantProductMarket, Pool, SeriesFeed};
use keeper_protocol::{
    Auction, AuctionHouse, CollateralCapacity, CollateralState, DutchAuctionHouse, LinearDecrease,
    LiquidationDesk, MemoryLedger, Rad, Ray, StairstepExponentialDecrease, Wad,
};

/// Keeper identity used for the simulated run.
const KEEPER: Address = Address::repeat_byte(0xEE);

/// Position owners in the simulated world.
const ALICE: Address = Address::repeat_byte(0x11);
const BOB: Address = Address::repeat_byte(0x22);

/// Swap pool the discount keeper sells into.
const WETH_POOL: Address = Address::repeat_byte(0xAB);

fn main() -> Result<()> {
    print_banner();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,keeper_core=debug")),
        )
        .init();

    // Load keeper config (profile via KEEPER_PROFILE, file via KEEPER_CONFIG)
    let config = KeeperConfig::from_env();
    config.log_config();

    let keepers = build_keepers(&config);

    info!(steps = config.simulation.steps, "Starting decision loop");
    for t in 0..config.simulation.steps {
        let mut all = Vec::new();
        for (name, strategy) in &keepers {
            let actions = strategy.generate_actions(t)?;
            info!(keeper = name, t, actions = actions.len(), "decision pass complete");
            all.extend(actions);
        }

        if !all.is_empty() {
            let log = serde_json::json!({ "t": t, "actions": all });
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
    }

    info!("Decision loop finished");
    Ok(())
}

/// Assemble the simulated world and one keeper of each strategy family.
fn build_keepers(config: &KeeperConfig) -> Vec<(&'static str, Box<dyn BiddingStrategy>)> {
    // WETH price slides from 150 toward 120 over the run; WBTC holds.
    let weth_feed = Arc::new(SeriesFeed::from_path(&[
        150.0, 148.0, 146.0, 143.0, 140.0, 137.0, 133.0, 130.0, 127.0, 124.0, 122.0, 120.0,
    ]));
    let wbtc_feed = Arc::new(SeriesFeed::from_path(&[2400.0; 12]));

    // WETH auctions decay linearly; WBTC uses a stairstep schedule.
    let weth_house = DutchAuctionHouse::new("WETH", weth_feed, Box::new(LinearDecrease { tau: 20 }))
        .with_incentives(Rad::from_num(100), Wad::from_f64(0.02))
        .with_expiry(8, Ray::from_f64(0.4))
        .with_sale(Auction {
            id: 1,
            collateral: "WETH".to_string(),
            owner: ALICE,
            lot: Wad::from_num(8),
            tab: Rad::from_num(1100),
            top: Ray::from_num(165),
            tic: 0,
        })
        .with_sale(Auction {
            id: 2,
            collateral: "WETH".to_string(),
            owner: BOB,
            lot: Wad::from_num(3),
            tab: Rad::from_num(400),
            top: Ray::from_num(180),
            tic: 2,
        });
    let wbtc_house = DutchAuctionHouse::new(
        "WBTC",
        wbtc_feed,
        Box::new(StairstepExponentialDecrease {
            step: 2,
            cut: Ray::from_f64(0.95),
        }),
    )
    .with_incentives(Rad::from_num(150), Wad::from_f64(0.01))
    .with_expiry(10, Ray::from_f64(0.5));

    let registry = Arc::new(KeeperRegistry::new([
        (
            "WETH".to_string(),
            Arc::new(weth_house) as Arc<dyn AuctionHouse>,
        ),
        (
            "WBTC".to_string(),
            Arc::new(wbtc_house) as Arc<dyn AuctionHouse>,
        ),
    ]));

    // Ledger: Alice holds comfortably safe positions, Bob sits under
    // water on WETH.
    let ledger = Arc::new(
        MemoryLedger::new()
            .with_collateral(
                "WETH",
                CollateralState {
                    rate: Ray::from_f64(1.04),
                    spot: Ray::from_num(95),
                    dust: Rad::from_num(500),
                },
            )
            .with_collateral(
                "WBTC",
                CollateralState {
                    rate: Ray::from_f64(1.02),
                    spot: Ray::from_num(1600),
                    dust: Rad::from_num(1000),
                },
            )
            .with_position("WETH", ALICE, Wad::from_num(50), Wad::from_num(3000))
            .with_position("WETH", BOB, Wad::from_num(40), Wad::from_num(4000))
            .with_position("WBTC", ALICE, Wad::from_num(5), Wad::from_num(6000))
            .with_balance(KEEPER, Rad::from_num(1500)),
    );

    let desk = Arc::new(
        LiquidationDesk::new(Rad::from_num(100_000))
            .with_dirt(Rad::from_num(20_000))
            .with_collateral(
                "WETH",
                CollateralCapacity {
                    hole: Rad::from_num(50_000),
                    dirt: Rad::from_num(10_000),
                    chop: Wad::from_f64(1.13),
                },
            )
            .with_collateral(
                "WBTC",
                CollateralCapacity {
                    hole: Rad::from_num(30_000),
                    dirt: Rad::zero(),
                    chop: Wad::from_f64(1.10),
                },
            ),
    );

    let swap_market = Arc::new(ConstantProductMarket::new().with_pool(
        WETH_POOL,
        Pool {
            asset: "WETH".to_string(),
            asset_reserve: Wad::from_num(40_000),
            debt_reserve: Wad::from_num(6_000_000),
            fee_factor: Wad::from_f64(0.997),
        },
    ));

    let gas_oracle = Arc::new(ConstantGasOracle::from_gwei(60));
    let cost_model = || {
        ExecutionCostModel::new(
            gas_oracle.clone(),
            config.gas_limit(),
            config.gas.reference_collateral.clone(),
        )
    };

    let taker = DiscountTaker::new(
        registry.clone(),
        ledger.clone(),
        swap_market,
        cost_model(),
        KEEPER,
        WETH_POOL,
    )
    .with_discount("WETH", config.discount_for("WETH"))
    .with_discount("WBTC", config.discount_for("WBTC"))
    .with_threshold(config.profit_threshold());

    let trigger = LiquidationTrigger::new(
        registry.clone(),
        ledger,
        desk,
        IncentiveModel::new(cost_model()),
        KEEPER,
    )
    .with_threshold(config.profit_threshold());

    let restarter = AuctionRestarter::new(registry, IncentiveModel::new(cost_model()), KEEPER)
        .with_threshold(config.profit_threshold());

    vec![
        ("discount-taker", Box::new(taker) as Box<dyn BiddingStrategy>),
        ("liquidation-trigger", Box::new(trigger)),
        ("auction-restarter", Box::new(restarter)),
    ]
}

fn print_banner() {
    println!(
        r#"
    ╦╔═┌─┐┌─┐┌─┐┌─┐┬─┐
    ╠╩╗├┤ ├┤ ├─┘├┤ ├┬┘
    ╩ ╩└─┘└─┘┴  └─┘┴└─
    Dutch Auction Keeper v0.1.0
    "#
    );
}
