//! Discount-based auction taking.

use alloy::primitives::Address;
use keeper_market::SwapMarket;
use keeper_protocol::{Auction, AuctionHouse, LedgerView, Rad, Ray, Wad};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::action::{Action, Stance};
use crate::error::KeeperError;
use crate::profit::{clears_threshold, ExecutionCostModel};
use crate::registry::KeeperRegistry;
use crate::strategy::{AuctionBidder, BiddingStrategy};

/// Takes auctions once the decayed price falls at or below the keeper's
/// desired discount off the oracle price, provided selling the purchased
/// collateral on the swap market clears the execution cost.
pub struct DiscountTaker {
    registry: Arc<KeeperRegistry>,
    ledger: Arc<dyn LedgerView>,
    swap_market: Arc<dyn SwapMarket>,
    cost_model: ExecutionCostModel,
    keeper: Address,
    /// Pool the purchased collateral would be sold into.
    pool: Address,
    discounts: BTreeMap<String, Ray>,
    threshold: Rad,
}

impl DiscountTaker {
    pub fn new(
        registry: Arc<KeeperRegistry>,
        ledger: Arc<dyn LedgerView>,
        swap_market: Arc<dyn SwapMarket>,
        cost_model: ExecutionCostModel,
        keeper: Address,
        pool: Address,
    ) -> Self {
        Self {
            registry,
            ledger,
            swap_market,
            cost_model,
            keeper,
            pool,
            discounts: BTreeMap::new(),
            threshold: Rad::zero(),
        }
    }

    /// Set the desired discount for a collateral type.
    pub fn with_discount(mut self, collateral: impl Into<String>, discount: Ray) -> Self {
        self.discounts.insert(collateral.into(), discount);
        self
    }

    /// Set the profit threshold.
    pub fn with_threshold(mut self, threshold: Rad) -> Self {
        self.threshold = threshold;
        self
    }

    fn desired_discount(&self, collateral: &str) -> Result<Ray, KeeperError> {
        self.discounts
            .get(collateral)
            .copied()
            .ok_or_else(|| KeeperError::UnconfiguredDiscount(collateral.to_string()))
    }

    /// Highest acceptable price for a collateral type at timestep `t`:
    /// the oracle price over the protocol ratio, times the desired
    /// discount. `None` when the feed has no observation.
    fn max_price(
        &self,
        house: &dyn AuctionHouse,
        collateral: &str,
        t: u64,
    ) -> Result<Option<Ray>, KeeperError> {
        let Some(val) = house.price(t) else {
            warn!(collateral, t, "no price observation, skipping collateral type");
            return Ok(None);
        };
        let par = Wad::from_ray(house.par());
        if par.is_zero() {
            warn!(collateral, "zero protocol ratio, skipping collateral type");
            return Ok(None);
        }
        let discount = self.desired_discount(collateral)?;
        Ok(Some(Ray::from_wad(val / par) * discount))
    }

    /// Whether taking this auction and selling the proceeds clears the
    /// execution cost plus the keeper's threshold.
    fn is_profitable(&self, auction: &Auction, t: u64) -> Result<bool, KeeperError> {
        let Some(cost) = self.cost_model.cost(&self.registry, t)? else {
            return Ok(false);
        };
        let stance = self.compute_stance(auction, t)?;
        let Some(quote) =
            self.swap_market
                .slippage_quote(self.pool, &auction.collateral, stance.amount, t)
        else {
            warn!(
                collateral = %auction.collateral,
                auction_id = auction.id,
                "no swap quote, skipping auction"
            );
            return Ok(false);
        };
        Ok(clears_threshold(quote.proceeds, cost, self.threshold))
    }
}

impl AuctionBidder for DiscountTaker {
    fn keeper(&self) -> Address {
        self.keeper
    }

    fn find_targets(&self, t: u64) -> Result<Vec<Auction>, KeeperError> {
        let mut targets = Vec::new();
        for collateral in self.registry.ids() {
            let house = self.registry.house(collateral)?;
            let Some(bound) = self.max_price(house.as_ref(), collateral, t)? else {
                continue;
            };
            for auction in house.auctions() {
                let status = house.status(&auction, t);
                if status.needs_redo || status.price > bound {
                    continue;
                }
                if self.is_profitable(&auction, t)? {
                    debug!(
                        collateral,
                        auction_id = auction.id,
                        price = %status.price,
                        bound = %bound,
                        "auction takeable"
                    );
                    targets.push(auction);
                }
            }
        }
        Ok(targets)
    }

    fn compute_stance(&self, target: &Auction, t: u64) -> Result<Stance, KeeperError> {
        let house = self.registry.house(&target.collateral)?;
        let Some(max_price) = self.max_price(house.as_ref(), &target.collateral, t)? else {
            return Err(KeeperError::MissingPrice {
                collateral: target.collateral.clone(),
                t,
            });
        };

        let balance = self.ledger.balance(self.keeper);
        let desired_value = Rad::from_wad(target.lot * max_price);
        let amount = if desired_value <= balance {
            target.lot
        } else {
            // partial take: whatever the balance affords at the limit price
            Wad::from_rad(balance / Rad::from_ray(max_price))
        };

        Ok(Stance {
            amount,
            max_price,
            who: self.keeper,
            data: Vec::new(),
        })
    }
}

impl BiddingStrategy for DiscountTaker {
    fn generate_actions(&self, t: u64) -> Result<Vec<Action>, KeeperError> {
        self.take_actions(t)
    }
}
