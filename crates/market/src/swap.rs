//! Swap market slippage model.
//!
//! Estimates the proceeds of selling seized collateral into the debt
//! asset, including price impact, so the discount strategy can value a
//! prospective take before bidding.

use alloy::primitives::Address;
use keeper_protocol::{Rad, Wad};
use std::collections::BTreeMap;
use tracing::debug;

/// Result of a slippage quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlippageQuote {
    /// Expected proceeds in debt units.
    pub proceeds: Rad,
    /// Relative shortfall against the pool's marginal price, for
    /// reporting only.
    pub price_impact: f64,
}

/// Swap market queries consumed by the keeper.
///
/// Quotes are pure functions of the timestep. `None` means the market
/// cannot price the sale (unknown pool or asset mismatch); callers treat
/// the candidate as unvaluable and skip it.
pub trait SwapMarket: Send + Sync {
    fn slippage_quote(
        &self,
        pool: Address,
        from_asset: &str,
        amount: Wad,
        t: u64,
    ) -> Option<SlippageQuote>;
}

/// One constant-product pool: collateral reserve against debt reserve.
#[derive(Debug, Clone)]
pub struct Pool {
    /// Collateral asset sold into the pool.
    pub asset: String,
    /// Collateral-side reserve.
    pub asset_reserve: Wad,
    /// Debt-side reserve.
    pub debt_reserve: Wad,
    /// Fraction of input kept by the trade after fees (e.g. 0.997).
    pub fee_factor: Wad,
}

/// Constant-product swap market used by tests and the simulation driver.
#[derive(Debug, Default)]
pub struct ConstantProductMarket {
    pools: BTreeMap<Address, Pool>,
}

impl ConstantProductMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(mut self, address: Address, pool: Pool) -> Self {
        self.pools.insert(address, pool);
        self
    }
}

impl SwapMarket for ConstantProductMarket {
    fn slippage_quote(
        &self,
        pool: Address,
        from_asset: &str,
        amount: Wad,
        _t: u64,
    ) -> Option<SlippageQuote> {
        let pool_state = self.pools.get(&pool)?;
        if pool_state.asset != from_asset {
            debug!(pool = %pool, from_asset, "pool does not trade this asset");
            return None;
        }
        if amount.is_zero() {
            return Some(SlippageQuote {
                proceeds: Rad::zero(),
                price_impact: 0.0,
            });
        }

        let amount_in = amount * pool_state.fee_factor;
        let out = (pool_state.debt_reserve * amount_in) / (pool_state.asset_reserve + amount_in);

        let marginal = pool_state.debt_reserve.to_f64() / pool_state.asset_reserve.to_f64();
        let realized = out.to_f64() / amount.to_f64();
        let price_impact = (1.0 - realized / marginal).max(0.0);

        Some(SlippageQuote {
            proceeds: Rad::from_wad(out),
            price_impact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> (Address, ConstantProductMarket) {
        let address = Address::repeat_byte(0xAB);
        let market = ConstantProductMarket::new().with_pool(
            address,
            Pool {
                asset: "WETH".to_string(),
                asset_reserve: Wad::from_num(1_000),
                debt_reserve: Wad::from_num(150_000),
                fee_factor: Wad::from_f64(0.997),
            },
        );
        (address, market)
    }

    #[test]
    fn small_trade_near_marginal_price() {
        let (address, market) = market();
        let quote = market
            .slippage_quote(address, "WETH", Wad::from_num(1), 0)
            .unwrap();
        // marginal price 150; 1 unit in returns just under 150 out
        assert!(quote.proceeds < Rad::from_num(150));
        assert!(quote.proceeds > Rad::from_num(149));
        assert!(quote.price_impact < 0.005);
    }

    #[test]
    fn large_trade_pays_impact() {
        let (address, market) = market();
        let small = market
            .slippage_quote(address, "WETH", Wad::from_num(1), 0)
            .unwrap();
        let large = market
            .slippage_quote(address, "WETH", Wad::from_num(500), 0)
            .unwrap();
        assert!(large.price_impact > small.price_impact);
        // 500 in against 1000 reserve cannot realize the marginal price
        assert!(large.proceeds < Rad::from_num(500 * 150));
    }

    #[test]
    fn unknown_pool_and_asset_mismatch() {
        let (address, market) = market();
        assert!(market
            .slippage_quote(Address::repeat_byte(0xCD), "WETH", Wad::ONE, 0)
            .is_none());
        assert!(market.slippage_quote(address, "WBTC", Wad::ONE, 0).is_none());
    }

    #[test]
    fn zero_amount_quotes_zero() {
        let (address, market) = market();
        let quote = market.slippage_quote(address, "WETH", Wad::zero(), 0).unwrap();
        assert_eq!(quote.proceeds, Rad::zero());
    }
}
