//! Read-only view of the protocol ledger.
//!
//! The ledger owns collateral and debt accounting per position and per
//! collateral type. Keepers only ever read it: mutation happens through
//! the external executor after a timestep's decisions are returned.

use alloy::primitives::Address;
use std::collections::BTreeMap;

use crate::error::ProtocolError;
use crate::numeric::{Rad, Ray, Wad};

/// A single position: an owner's locked collateral and outstanding debt
/// under one collateral type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Position owner.
    pub owner: Address,
    /// Locked collateral quantity.
    pub ink: Wad,
    /// Outstanding debt quantity (normalized; multiply by the collateral
    /// type's rate for the current debt value).
    pub art: Wad,
}

/// Ledger-side parameters of one collateral type.
#[derive(Debug, Clone)]
pub struct CollateralState {
    /// Debt accumulator rate.
    pub rate: Ray,
    /// Liquidation price with safety margin applied.
    pub spot: Ray,
    /// Minimum debt a position may retain after partial liquidation.
    pub dust: Rad,
}

/// Read-only ledger queries consumed by the keeper.
///
/// Per-collateral lookups fail with [`ProtocolError::UnknownCollateral`]
/// for unconfigured collateral types; per-owner lookups on a configured
/// collateral type return zero for owners with no position.
pub trait LedgerView: Send + Sync {
    /// Outstanding normalized debt of a position.
    fn debt(&self, collateral: &str, owner: Address) -> Result<Wad, ProtocolError>;

    /// Locked collateral of a position.
    fn collateral(&self, collateral: &str, owner: Address) -> Result<Wad, ProtocolError>;

    /// Debt accumulator rate of a collateral type.
    fn rate(&self, collateral: &str) -> Result<Ray, ProtocolError>;

    /// Liquidation spot price of a collateral type.
    fn spot(&self, collateral: &str) -> Result<Ray, ProtocolError>;

    /// Dust floor of a collateral type.
    fn dust_floor(&self, collateral: &str) -> Result<Rad, ProtocolError>;

    /// The owner's high-precision debt-unit balance.
    fn balance(&self, owner: Address) -> Rad;

    /// All positions under a collateral type, in deterministic owner order.
    fn positions(&self, collateral: &str) -> Result<Vec<Position>, ProtocolError>;
}

/// In-memory ledger used by tests and the simulation driver.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    collateral: BTreeMap<String, CollateralState>,
    positions: BTreeMap<String, BTreeMap<Address, Position>>,
    balances: BTreeMap<Address, Rad>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collateral type.
    pub fn with_collateral(mut self, id: impl Into<String>, state: CollateralState) -> Self {
        let id = id.into();
        self.positions.entry(id.clone()).or_default();
        self.collateral.insert(id, state);
        self
    }

    /// Record a position. The collateral type must already be registered.
    pub fn with_position(mut self, id: &str, owner: Address, ink: Wad, art: Wad) -> Self {
        let book = self
            .positions
            .get_mut(id)
            .unwrap_or_else(|| panic!("collateral type not configured: {id}"));
        book.insert(owner, Position { owner, ink, art });
        self
    }

    /// Credit an owner's debt-unit balance.
    pub fn with_balance(mut self, owner: Address, amount: Rad) -> Self {
        self.balances.insert(owner, amount);
        self
    }

    fn state(&self, collateral: &str) -> Result<&CollateralState, ProtocolError> {
        self.collateral
            .get(collateral)
            .ok_or_else(|| ProtocolError::UnknownCollateral(collateral.to_string()))
    }

    fn position(&self, collateral: &str, owner: Address) -> Result<Option<&Position>, ProtocolError> {
        self.positions
            .get(collateral)
            .ok_or_else(|| ProtocolError::UnknownCollateral(collateral.to_string()))
            .map(|book| book.get(&owner))
    }
}

impl LedgerView for MemoryLedger {
    fn debt(&self, collateral: &str, owner: Address) -> Result<Wad, ProtocolError> {
        Ok(self.position(collateral, owner)?.map(|p| p.art).unwrap_or_default())
    }

    fn collateral(&self, collateral: &str, owner: Address) -> Result<Wad, ProtocolError> {
        Ok(self.position(collateral, owner)?.map(|p| p.ink).unwrap_or_default())
    }

    fn rate(&self, collateral: &str) -> Result<Ray, ProtocolError> {
        Ok(self.state(collateral)?.rate)
    }

    fn spot(&self, collateral: &str) -> Result<Ray, ProtocolError> {
        Ok(self.state(collateral)?.spot)
    }

    fn dust_floor(&self, collateral: &str) -> Result<Rad, ProtocolError> {
        Ok(self.state(collateral)?.dust)
    }

    fn balance(&self, owner: Address) -> Rad {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    fn positions(&self, collateral: &str) -> Result<Vec<Position>, ProtocolError> {
        self.positions
            .get(collateral)
            .ok_or_else(|| ProtocolError::UnknownCollateral(collateral.to_string()))
            .map(|book| book.values().cloned().collect())
    }
}
