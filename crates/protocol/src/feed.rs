//! Price feed interface.

use crate::numeric::Wad;
use std::fmt::Debug;

/// A per-collateral price feed, read as a pure function of the timestep.
///
/// Returns `None` when no observation exists for `t`; callers decide how
/// to degrade (the keeper strategies skip the affected collateral type
/// for that timestep).
pub trait PriceFeed: Send + Sync + Debug {
    /// Current price in debt units per unit of collateral.
    fn peek(&self, t: u64) -> Option<Wad>;
}
