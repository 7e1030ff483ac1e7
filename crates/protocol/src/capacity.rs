//! Liquidation capacity tracking.
//!
//! Global and per-collateral ceilings bound how much debt may be pushed
//! into liquidation at once. The keeper reads remaining room to size
//! liquidation triggers; utilization is maintained by the external
//! liquidation module.

use std::collections::BTreeMap;

use crate::error::ProtocolError;
use crate::numeric::{Rad, Wad};

/// Read-only capacity queries consumed by the keeper.
pub trait CapacityTracker: Send + Sync {
    /// Global ceiling minus current utilization, clamped at zero.
    fn global_room(&self) -> Rad;

    /// Per-collateral ceiling minus current utilization, clamped at zero.
    fn local_room(&self, collateral: &str) -> Result<Rad, ProtocolError>;

    /// Liquidation penalty multiplier of a collateral type.
    fn chop(&self, collateral: &str) -> Result<Wad, ProtocolError>;
}

/// Per-collateral capacity parameters.
#[derive(Debug, Clone)]
pub struct CollateralCapacity {
    /// Per-collateral debt ceiling.
    pub hole: Rad,
    /// Current utilization against `hole`.
    pub dirt: Rad,
    /// Liquidation penalty multiplier, at least one.
    pub chop: Wad,
}

/// In-memory capacity tracker used by tests and the simulation driver.
#[derive(Debug, Default)]
pub struct LiquidationDesk {
    hole: Rad,
    dirt: Rad,
    collateral: BTreeMap<String, CollateralCapacity>,
}

impl LiquidationDesk {
    pub fn new(hole: Rad) -> Self {
        Self {
            hole,
            dirt: Rad::zero(),
            collateral: BTreeMap::new(),
        }
    }

    /// Set global utilization.
    pub fn with_dirt(mut self, dirt: Rad) -> Self {
        self.dirt = dirt;
        self
    }

    /// Register a collateral type's capacity parameters.
    pub fn with_collateral(mut self, id: impl Into<String>, capacity: CollateralCapacity) -> Self {
        self.collateral.insert(id.into(), capacity);
        self
    }

    fn capacity(&self, collateral: &str) -> Result<&CollateralCapacity, ProtocolError> {
        self.collateral
            .get(collateral)
            .ok_or_else(|| ProtocolError::UnknownCollateral(collateral.to_string()))
    }
}

impl CapacityTracker for LiquidationDesk {
    fn global_room(&self) -> Rad {
        self.hole.saturating_sub(self.dirt)
    }

    fn local_room(&self, collateral: &str) -> Result<Rad, ProtocolError> {
        let capacity = self.capacity(collateral)?;
        Ok(capacity.hole.saturating_sub(capacity.dirt))
    }

    fn chop(&self, collateral: &str) -> Result<Wad, ProtocolError> {
        Ok(self.capacity(collateral)?.chop)
    }
}
