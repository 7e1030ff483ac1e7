//! Protocol state types and collaborator interfaces.
//!
//! This crate provides everything the keeper reads from the protocol:
//! - Fixed-point amount types at the three protocol scales (wad/ray/rad)
//! - The read-only ledger view (positions, rates, dust floors, balances)
//! - The Dutch auction house interface with price decay curves
//! - Liquidation capacity tracking (global and per-collateral ceilings)
//! - The per-collateral price feed interface
//!
//! In-memory reference implementations back the test suites and the
//! simulation driver; production state stores implement the same traits.

mod auction;
mod capacity;
mod error;
mod feed;
mod ledger;
pub mod numeric;

pub use auction::{
    Auction, AuctionHouse, AuctionStatus, DutchAuctionHouse, LinearDecrease, PriceCurve,
    StairstepExponentialDecrease,
};
pub use capacity::{CapacityTracker, CollateralCapacity, LiquidationDesk};
pub use error::ProtocolError;
pub use feed::PriceFeed;
pub use ledger::{CollateralState, LedgerView, MemoryLedger, Position};
pub use numeric::{Rad, Ray, Wad};
