//! Stalled auction restarts.

use alloy::primitives::Address;
use keeper_protocol::Rad;
use std::sync::Arc;
use tracing::debug;

use crate::action::Action;
use crate::error::KeeperError;
use crate::profit::IncentiveModel;
use crate::registry::KeeperRegistry;
use crate::strategy::BiddingStrategy;

/// Restarts auctions whose price schedule has expired, where the restart
/// incentive clears the execution cost.
pub struct AuctionRestarter {
    registry: Arc<KeeperRegistry>,
    incentives: IncentiveModel,
    keeper: Address,
    threshold: Rad,
}

impl AuctionRestarter {
    pub fn new(registry: Arc<KeeperRegistry>, incentives: IncentiveModel, keeper: Address) -> Self {
        Self {
            registry,
            incentives,
            keeper,
            threshold: Rad::zero(),
        }
    }

    /// Set the profit threshold.
    pub fn with_threshold(mut self, threshold: Rad) -> Self {
        self.threshold = threshold;
        self
    }
}

impl BiddingStrategy for AuctionRestarter {
    fn generate_actions(&self, t: u64) -> Result<Vec<Action>, KeeperError> {
        let mut actions = Vec::new();
        for collateral in self.registry.ids() {
            let house = self.registry.house(collateral)?;
            for auction in house.auctions() {
                if !house.status(&auction, t).needs_redo {
                    continue;
                }
                if self
                    .incentives
                    .is_profitable(&self.registry, collateral, auction.tab, self.threshold, t)?
                {
                    debug!(collateral, auction_id = auction.id, "restarting auction");
                    actions.push(Action::Restart {
                        collateral: collateral.to_string(),
                        auction_id: auction.id,
                        keeper: self.keeper,
                        t,
                    });
                }
            }
        }
        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keeper_market::{ConstantFeed, ConstantGasOracle};
    use keeper_protocol::{
        Auction, AuctionHouse, DutchAuctionHouse, LinearDecrease, Ray, Wad,
    };

    use crate::profit::ExecutionCostModel;

    const KEEPER: Address = Address::repeat_byte(0xEE);

    fn auction(id: u64, tic: u64) -> Auction {
        Auction {
            id,
            collateral: "WETH".to_string(),
            owner: Address::repeat_byte(1),
            lot: Wad::from_num(10),
            tab: Rad::from_num(1000),
            top: Ray::from_num(150),
            tic,
        }
    }

    fn restarter(tip: Rad, chip: Wad, sales: Vec<Auction>) -> AuctionRestarter {
        let mut house = DutchAuctionHouse::new(
            "WETH",
            Arc::new(ConstantFeed(Wad::from_num(150))),
            Box::new(LinearDecrease { tau: 1000 }),
        )
        .with_expiry(100, Ray::from_f64(0.3))
        .with_incentives(tip, chip);
        for sale in sales {
            house = house.with_sale(sale);
        }
        let registry = Arc::new(KeeperRegistry::new([(
            "WETH".to_string(),
            Arc::new(house) as Arc<dyn AuctionHouse>,
        )]));
        let incentives = IncentiveModel::new(ExecutionCostModel::new(
            Arc::new(ConstantGasOracle::from_gwei(100)),
            Wad::from_num(300_000),
            "WETH",
        ));
        AuctionRestarter::new(registry, incentives, KEEPER)
    }

    #[test]
    fn only_expired_auctions_are_restarted() {
        // at t = 150: auction 1 (tic 0) is 150 steps old, past the 100
        // tail; auction 2 (tic 120) is still live
        let restarter = restarter(
            Rad::from_num(100),
            Wad::from_f64(0.02),
            vec![auction(1, 0), auction(2, 120)],
        );

        let actions = restarter.generate_actions(150).unwrap();
        assert_eq!(
            actions,
            vec![Action::Restart {
                collateral: "WETH".to_string(),
                auction_id: 1,
                keeper: KEEPER,
                t: 150,
            }]
        );
    }

    #[test]
    fn active_auctions_produce_nothing() {
        let restarter = restarter(
            Rad::from_num(100),
            Wad::from_f64(0.02),
            vec![auction(1, 0)],
        );
        assert!(restarter.generate_actions(10).unwrap().is_empty());
    }

    #[test]
    fn unprofitable_restart_is_withheld() {
        // no incentives at all: gas cost can never be cleared
        let restarter = restarter(Rad::zero(), Wad::zero(), vec![auction(1, 0)]);
        assert!(restarter.generate_actions(150).unwrap().is_empty());
    }

    #[test]
    fn actions_come_out_in_collateral_order() {
        let house = |id: &str, auction_id: u64| {
            let mut sale = auction(auction_id, 0);
            sale.collateral = id.to_string();
            Arc::new(
                DutchAuctionHouse::new(
                    id,
                    Arc::new(ConstantFeed(Wad::from_num(150))),
                    Box::new(LinearDecrease { tau: 1000 }),
                )
                .with_expiry(100, Ray::from_f64(0.3))
                .with_incentives(Rad::from_num(100), Wad::from_f64(0.02))
                .with_sale(sale),
            ) as Arc<dyn AuctionHouse>
        };
        // registered out of order; iteration is sorted
        let registry = Arc::new(KeeperRegistry::new([
            ("WETH".to_string(), house("WETH", 4)),
            ("WBTC".to_string(), house("WBTC", 9)),
        ]));
        let incentives = IncentiveModel::new(ExecutionCostModel::new(
            Arc::new(ConstantGasOracle::from_gwei(100)),
            Wad::from_num(300_000),
            "WETH",
        ));
        let restarter = AuctionRestarter::new(registry, incentives, KEEPER);

        let order: Vec<(String, u64)> = restarter
            .generate_actions(150)
            .unwrap()
            .into_iter()
            .map(|a| match a {
                Action::Restart {
                    collateral,
                    auction_id,
                    ..
                } => (collateral, auction_id),
                other => panic!("expected restart action, got {other:?}"),
            })
            .collect();
        assert_eq!(order, vec![("WBTC".to_string(), 9), ("WETH".to_string(), 4)]);
    }
}
