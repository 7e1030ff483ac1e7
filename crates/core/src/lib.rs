//! Keeper decision engine.
//!
//! This crate provides the core of the liquidation keeper:
//! - Registry of auction houses per collateral type
//! - Bidding strategy contract with a provided auction-take path
//! - Discount strategy (take at a target discount, valued by swap proceeds)
//! - Liquidation trigger (scan unsafe positions, size under capacity)
//! - Auction restarter (reset expired price schedules)
//! - Execution cost model and strict profitability gates
//! - Keeper runtime configuration with profile support
//!
//! One call to `generate_actions` per discrete timestep per keeper: the
//! engine reads protocol and market state for that timestep and returns
//! immutable action descriptors for the external executor to apply.

mod action;
pub mod config;
mod error;
mod profit;
mod registry;
mod strategy;

pub use action::{Action, ActionKind, Stance};
pub use config::KeeperConfig;
pub use error::KeeperError;
pub use profit::{clears_threshold, ExecutionCostModel, IncentiveModel};
pub use registry::KeeperRegistry;
pub use strategy::{
    AuctionBidder, AuctionRestarter, BiddingStrategy, DiscountTaker, LiquidationTrigger,
};
