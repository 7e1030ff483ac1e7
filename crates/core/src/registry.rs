//! Keeper registry: per-collateral auction house lookup.

use keeper_protocol::AuctionHouse;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::KeeperError;

/// Maps collateral type ids to their auction houses.
///
/// Built once at keeper construction and read-only afterwards. Iteration
/// is in sorted id order so a timestep's actions come out in a
/// reproducible order.
pub struct KeeperRegistry {
    houses: BTreeMap<String, Arc<dyn AuctionHouse>>,
}

impl KeeperRegistry {
    pub fn new(entries: impl IntoIterator<Item = (String, Arc<dyn AuctionHouse>)>) -> Self {
        Self {
            houses: entries.into_iter().collect(),
        }
    }

    /// The auction house for a collateral type.
    pub fn house(&self, collateral: &str) -> Result<&Arc<dyn AuctionHouse>, KeeperError> {
        self.houses
            .get(collateral)
            .ok_or_else(|| KeeperError::UnregisteredCollateral(collateral.to_string()))
    }

    /// Registered collateral type ids, in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.houses.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.houses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.houses.is_empty()
    }
}

impl std::fmt::Debug for KeeperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeeperRegistry")
            .field("collateral", &self.houses.keys().collect::<Vec<_>>())
            .finish()
    }
}
