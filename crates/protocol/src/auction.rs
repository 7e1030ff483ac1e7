//! Dutch auction house interface and reference implementation.
//!
//! An auction sells seized collateral against a fixed debt target (`tab`)
//! at a price that decays from `top` over time. The house derives each
//! auction's status from elapsed time and its decay curve; it never
//! mutates state on behalf of a keeper.

use alloy::primitives::Address;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::feed::PriceFeed;
use crate::numeric::{Rad, Ray, Wad};

/// An active collateral auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auction {
    /// Auction id, unique per auction house.
    pub id: u64,
    /// Originating collateral type.
    pub collateral: String,
    /// Owner of the liquidated position.
    pub owner: Address,
    /// Collateral remaining for sale.
    pub lot: Wad,
    /// Debt still owed.
    pub tab: Rad,
    /// Starting price of the decay schedule.
    pub top: Ray,
    /// Timestep the current schedule started.
    pub tic: u64,
}

/// Point-in-time status of an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionStatus {
    /// Whether the schedule has expired and the auction needs a restart.
    pub needs_redo: bool,
    /// Current decayed price.
    pub price: Ray,
}

/// Read-only auction house queries consumed by the keeper.
pub trait AuctionHouse: Send + Sync + Debug {
    /// Status of an auction at timestep `t`.
    fn status(&self, auction: &Auction, t: u64) -> AuctionStatus;

    /// All open auctions, in deterministic id order.
    fn auctions(&self) -> Vec<Auction>;

    /// Flat incentive paid for servicing an auction.
    fn flat_tip(&self) -> Rad;

    /// Incentive paid proportionally to the auction's tab.
    fn proportional_tip(&self) -> Wad;

    /// Ratio between the debt-accounting unit and the reference unit of
    /// value.
    fn par(&self) -> Ray;

    /// The house's collateral price feed at timestep `t`.
    fn price(&self, t: u64) -> Option<Wad>;
}

/// Price decay schedule.
pub trait PriceCurve: Send + Sync + Debug {
    /// Price after `elapsed` timesteps of decay from `top`.
    fn price(&self, top: Ray, elapsed: u64) -> Ray;

    /// Curve name for logging.
    fn curve_name(&self) -> &'static str;
}

/// Price falls linearly from `top` to zero over `tau` timesteps.
#[derive(Debug, Clone)]
pub struct LinearDecrease {
    pub tau: u64,
}

impl PriceCurve for LinearDecrease {
    fn price(&self, top: Ray, elapsed: u64) -> Ray {
        if elapsed >= self.tau {
            return Ray::zero();
        }
        top * (Ray::from_num(self.tau - elapsed) / Ray::from_num(self.tau))
    }

    fn curve_name(&self) -> &'static str {
        "LinearDecrease"
    }
}

/// Price is multiplied by `cut` every `step` timesteps.
#[derive(Debug, Clone)]
pub struct StairstepExponentialDecrease {
    pub step: u64,
    /// Per-step multiplier, below one.
    pub cut: Ray,
}

impl PriceCurve for StairstepExponentialDecrease {
    fn price(&self, top: Ray, elapsed: u64) -> Ray {
        let mut price = top;
        for _ in 0..elapsed / self.step {
            if price.is_zero() {
                break;
            }
            price = price * self.cut;
        }
        price
    }

    fn curve_name(&self) -> &'static str {
        "StairstepExponentialDecrease"
    }
}

/// In-memory Dutch auction house used by tests and the simulation driver.
#[derive(Debug)]
pub struct DutchAuctionHouse {
    collateral: String,
    sales: BTreeMap<u64, Auction>,
    curve: Box<dyn PriceCurve>,
    pip: Arc<dyn PriceFeed>,
    par: Ray,
    tip: Rad,
    chip: Wad,
    /// Max schedule duration before a restart is required.
    tail: u64,
    /// Max relative price drop before a restart is required.
    cusp: Ray,
}

impl DutchAuctionHouse {
    pub fn new(
        collateral: impl Into<String>,
        pip: Arc<dyn PriceFeed>,
        curve: Box<dyn PriceCurve>,
    ) -> Self {
        Self {
            collateral: collateral.into(),
            sales: BTreeMap::new(),
            curve,
            pip,
            par: Ray::ONE,
            tip: Rad::zero(),
            chip: Wad::zero(),
            tail: 3600,
            cusp: Ray::from_f64(0.3),
        }
    }

    pub fn with_par(mut self, par: Ray) -> Self {
        self.par = par;
        self
    }

    /// Set the flat and proportional incentives.
    pub fn with_incentives(mut self, tip: Rad, chip: Wad) -> Self {
        self.tip = tip;
        self.chip = chip;
        self
    }

    /// Set the schedule expiry bounds.
    pub fn with_expiry(mut self, tail: u64, cusp: Ray) -> Self {
        self.tail = tail;
        self.cusp = cusp;
        self
    }

    /// Record an open auction.
    pub fn with_sale(mut self, auction: Auction) -> Self {
        self.sales.insert(auction.id, auction);
        self
    }

    pub fn collateral(&self) -> &str {
        &self.collateral
    }

    pub fn curve_name(&self) -> &'static str {
        self.curve.curve_name()
    }
}

impl AuctionHouse for DutchAuctionHouse {
    fn status(&self, auction: &Auction, t: u64) -> AuctionStatus {
        let elapsed = t.saturating_sub(auction.tic);
        let price = self.curve.price(auction.top, elapsed);
        let needs_redo = elapsed > self.tail || price < auction.top * self.cusp;
        AuctionStatus { needs_redo, price }
    }

    fn auctions(&self) -> Vec<Auction> {
        self.sales.values().cloned().collect()
    }

    fn flat_tip(&self) -> Rad {
        self.tip
    }

    fn proportional_tip(&self) -> Wad {
        self.chip
    }

    fn par(&self) -> Ray {
        self.par
    }

    fn price(&self, t: u64) -> Option<Wad> {
        self.pip.peek(t)
    }
}
