//! Profitability modeling.
//!
//! Both strategy families compare an estimated value against an estimated
//! execution cost: the discount strategy values a take by its swap-market
//! proceeds, the incentive strategies value triggering or restarting by
//! the protocol's flat-plus-proportional reward. The cost side is shared:
//! a fixed gas budget priced by the gas oracle and converted into debt
//! units through the reference collateral's price feed.

use keeper_market::GasOracle;
use keeper_protocol::{Rad, Wad};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::KeeperError;
use crate::registry::KeeperRegistry;

/// Strict profitability test: value minus cost must strictly exceed the
/// threshold. Stated without subtraction so unsigned amounts cannot
/// underflow when the cost dominates.
pub fn clears_threshold(value: Rad, cost: Rad, threshold: Rad) -> bool {
    value > cost + threshold
}

/// Estimates the execution cost of one on-chain operation, in debt units.
pub struct ExecutionCostModel {
    gas_oracle: Arc<dyn GasOracle>,
    /// Gas budget of the operation, fixed per configuration.
    /// TODO: sample per-operation gas from observed usage rather than
    /// assuming one figure for every operation kind.
    gas_limit: Wad,
    /// Collateral type whose price feed converts the gas token into debt
    /// units.
    reference_collateral: String,
}

impl ExecutionCostModel {
    pub fn new(
        gas_oracle: Arc<dyn GasOracle>,
        gas_limit: Wad,
        reference_collateral: impl Into<String>,
    ) -> Self {
        Self {
            gas_oracle,
            gas_limit,
            reference_collateral: reference_collateral.into(),
        }
    }

    /// Execution cost at timestep `t`, or `None` when the gas oracle or
    /// the reference price feed has no observation. Callers must treat
    /// `None` as "cannot establish profitability", never as zero cost.
    pub fn cost(&self, registry: &KeeperRegistry, t: u64) -> Result<Option<Rad>, KeeperError> {
        let house = registry.house(&self.reference_collateral)?;

        let Some(reference_price) = house.price(t) else {
            warn!(
                collateral = %self.reference_collateral,
                t,
                "no reference price observation, cannot price gas"
            );
            return Ok(None);
        };
        let Some(gas_wei) = self.gas_oracle.peek(t) else {
            warn!(t, "no gas price observation, cannot price gas");
            return Ok(None);
        };

        let par = Wad::from_ray(house.par());
        if par.is_zero() {
            warn!(collateral = %self.reference_collateral, "zero protocol ratio, cannot price gas");
            return Ok(None);
        }

        // Gas price arrives as a wei count; one application of the wei
        // factor reads it in native-token units, then the reference price
        // over par converts it into debt units per gas unit.
        let gas_price = gas_wei * Wad::WEI * (reference_price / par);
        let cost = Rad::from_wad(self.gas_limit * gas_price);
        debug!(t, cost = %cost, "estimated execution cost");
        Ok(Some(cost))
    }
}

/// Incentive-based profitability: values an operation by the auction
/// house's flat tip plus the tab-proportional tip.
pub struct IncentiveModel {
    cost_model: ExecutionCostModel,
}

impl IncentiveModel {
    pub fn new(cost_model: ExecutionCostModel) -> Self {
        Self { cost_model }
    }

    /// Expected incentive for servicing a tab on this collateral type.
    pub fn expected_incentive(
        &self,
        registry: &KeeperRegistry,
        collateral: &str,
        tab: Rad,
    ) -> Result<Rad, KeeperError> {
        let house = registry.house(collateral)?;
        Ok(house.flat_tip() + tab * house.proportional_tip())
    }

    /// Whether the incentive for servicing `tab` strictly clears the
    /// execution cost plus `threshold`. Unknown cost reads as not
    /// profitable.
    pub fn is_profitable(
        &self,
        registry: &KeeperRegistry,
        collateral: &str,
        tab: Rad,
        threshold: Rad,
        t: u64,
    ) -> Result<bool, KeeperError> {
        let Some(cost) = self.cost_model.cost(registry, t)? else {
            return Ok(false);
        };
        let value = self.expected_incentive(registry, collateral, tab)?;
        Ok(clears_threshold(value, cost, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use keeper_market::{ConstantFeed, ConstantGasOracle, SeriesGasOracle};
    use keeper_protocol::{AuctionHouse, DutchAuctionHouse, LinearDecrease, Ray};

    fn registry_with(house: DutchAuctionHouse) -> KeeperRegistry {
        KeeperRegistry::new([(
            house.collateral().to_string(),
            Arc::new(house) as Arc<dyn AuctionHouse>,
        )])
    }

    fn reference_house(price: u64, tip: Rad, chip: Wad) -> DutchAuctionHouse {
        DutchAuctionHouse::new(
            "WETH",
            Arc::new(ConstantFeed(Wad::from_num(price))),
            Box::new(LinearDecrease { tau: 100 }),
        )
        .with_incentives(tip, chip)
    }

    #[test]
    fn gate_is_strict_and_monotonic() {
        let threshold = Rad::from_num(10);
        assert!(clears_threshold(Rad::from_num(21), Rad::from_num(10), Rad::zero()));
        // profit == threshold is never accepted
        assert!(!clears_threshold(Rad::from_num(20), Rad::from_num(10), threshold));
        assert!(clears_threshold(
            Rad::from_raw(Rad::from_num(20).raw() + U256::from(1)),
            Rad::from_num(10),
            threshold
        ));
        // monotonic in value, anti-monotonic in cost
        assert!(!clears_threshold(Rad::from_num(19), Rad::from_num(10), threshold));
        assert!(!clears_threshold(Rad::from_num(21), Rad::from_num(12), threshold));
    }

    #[test]
    fn cost_converts_wei_through_reference_price() {
        let registry = registry_with(reference_house(150, Rad::zero(), Wad::zero()));
        // 100 gwei, 300k gas, reference price 150, par 1:
        // 3e5 * 1e11 wei = 3e16 wei = 0.03 native = 4.5 debt units
        let model = ExecutionCostModel::new(
            Arc::new(ConstantGasOracle::from_gwei(100)),
            Wad::from_num(300_000),
            "WETH",
        );
        let cost = model.cost(&registry, 0).unwrap().unwrap();
        assert_eq!(cost, Rad::from_f64(4.5));
    }

    #[test]
    fn par_scales_cost_down() {
        let house = reference_house(150, Rad::zero(), Wad::zero()).with_par(Ray::from_num(2));
        let registry = registry_with(house);
        let model = ExecutionCostModel::new(
            Arc::new(ConstantGasOracle::from_gwei(100)),
            Wad::from_num(300_000),
            "WETH",
        );
        let cost = model.cost(&registry, 0).unwrap().unwrap();
        assert_eq!(cost, Rad::from_f64(2.25));
    }

    #[test]
    fn missing_gas_data_yields_unknown_cost() {
        let registry = registry_with(reference_house(150, Rad::zero(), Wad::zero()));
        let model = ExecutionCostModel::new(
            Arc::new(SeriesGasOracle::new(vec![])),
            Wad::from_num(300_000),
            "WETH",
        );
        assert_eq!(model.cost(&registry, 0).unwrap(), None);
    }

    #[test]
    fn unregistered_reference_collateral_is_an_error() {
        let registry = registry_with(reference_house(150, Rad::zero(), Wad::zero()));
        let model = ExecutionCostModel::new(
            Arc::new(ConstantGasOracle::from_gwei(100)),
            Wad::from_num(300_000),
            "WSTETH",
        );
        assert!(matches!(
            model.cost(&registry, 0),
            Err(KeeperError::UnregisteredCollateral(_))
        ));
    }

    #[test]
    fn incentive_scenario_flat_plus_proportional() {
        // flat tip 5, proportional tip 2% of a 1000 tab => value 25
        let house = reference_house(100, Rad::from_num(5), Wad::from_f64(0.02));
        let registry = registry_with(house);
        // 200 gwei * 400k gas * price 100 => cost 8
        let cost_model = ExecutionCostModel::new(
            Arc::new(ConstantGasOracle::from_gwei(200)),
            Wad::from_num(400_000),
            "WETH",
        );
        let incentives = IncentiveModel::new(cost_model);

        let value = incentives
            .expected_incentive(&registry, "WETH", Rad::from_num(1000))
            .unwrap();
        assert_eq!(value, Rad::from_num(25));

        // profit 17 > 0
        assert!(incentives
            .is_profitable(&registry, "WETH", Rad::from_num(1000), Rad::zero(), 0)
            .unwrap());
        // profit == threshold is rejected
        assert!(!incentives
            .is_profitable(&registry, "WETH", Rad::from_num(1000), Rad::from_num(17), 0)
            .unwrap());
    }

    #[test]
    fn unknown_cost_is_never_profitable() {
        let house = reference_house(100, Rad::from_num(1_000_000), Wad::zero());
        let registry = registry_with(house);
        let cost_model = ExecutionCostModel::new(
            Arc::new(SeriesGasOracle::new(vec![])),
            Wad::from_num(300_000),
            "WETH",
        );
        let incentives = IncentiveModel::new(cost_model);
        assert!(!incentives
            .is_profitable(&registry, "WETH", Rad::from_num(1000), Rad::zero(), 0)
            .unwrap());
    }
}
