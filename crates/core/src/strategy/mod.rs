//! Bidding strategies.
//!
//! Every strategy implements [`BiddingStrategy`]: one call per discrete
//! timestep, returning the full list of actions the keeper would execute.
//! The auction-taking strategies additionally implement [`AuctionBidder`],
//! whose provided `take_actions` turns discovered targets into take
//! actions; trigger and restart strategies generate their action lists
//! directly. Requiring the capabilities as trait methods means an
//! unconfigured strategy fails at construction, not at runtime.

mod discount;
mod restart;
mod trigger;

pub use discount::DiscountTaker;
pub use restart::AuctionRestarter;
pub use trigger::LiquidationTrigger;

use alloy::primitives::Address;
use keeper_protocol::{Auction, Wad};

use crate::action::{Action, Stance};
use crate::error::KeeperError;

/// Per-timestep action generation.
///
/// Implementations are pure with respect to protocol state: they read
/// the ledger, auction houses, and market feeds for timestep `t` and
/// return action descriptors without applying them.
pub trait BiddingStrategy: Send + Sync {
    fn generate_actions(&self, t: u64) -> Result<Vec<Action>, KeeperError>;
}

/// Auction-taking capabilities: target discovery plus a bidding model.
pub trait AuctionBidder {
    /// Identity actions are attributed to.
    fn keeper(&self) -> Address;

    /// Auctions worth taking at timestep `t`.
    fn find_targets(&self, t: u64) -> Result<Vec<Auction>, KeeperError>;

    /// Bidding model: amount and limit price for one target.
    fn compute_stance(&self, target: &Auction, t: u64) -> Result<Stance, KeeperError>;

    /// Provided take path: every discovered target with a strictly
    /// positive stance amount becomes a take action.
    fn take_actions(&self, t: u64) -> Result<Vec<Action>, KeeperError> {
        let mut actions = Vec::new();
        for target in self.find_targets(t)? {
            let stance = self.compute_stance(&target, t)?;
            if stance.amount > Wad::zero() {
                actions.push(Action::Take {
                    collateral: target.collateral.clone(),
                    auction_id: target.id,
                    amount: stance.amount,
                    max_price: stance.max_price,
                    who: stance.who,
                    data: stance.data,
                    t,
                    sender: self.keeper(),
                });
            }
        }
        Ok(actions)
    }
}
