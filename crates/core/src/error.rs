//! Keeper error types.

use keeper_protocol::ProtocolError;
use thiserror::Error;

/// Errors surfaced while generating a timestep's actions.
///
/// All variants signal configuration faults rather than market
/// conditions; callers should treat them as fatal for the run instead of
/// retrying mid-timestep. Missing market data is not an error (affected
/// collateral types are skipped for the timestep).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeeperError {
    /// No auction house registered for the collateral type.
    #[error("collateral type not registered: {0}")]
    UnregisteredCollateral(String),

    /// No desired discount configured for the collateral type.
    #[error("no desired discount configured for collateral type: {0}")]
    UnconfiguredDiscount(String),

    /// A stance was requested for a timestep with no price observation.
    /// Strategies check the feed during discovery, so this indicates a
    /// stance computed outside the discovery flow.
    #[error("no price observation for {collateral} at timestep {t}")]
    MissingPrice { collateral: String, t: u64 },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
