//! Protocol-side error types.

use thiserror::Error;

/// Errors raised by protocol state lookups.
///
/// These signal configuration faults (a collateral type the caller never
/// registered), not runtime conditions, and callers should not attempt
/// recovery mid-timestep.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The collateral type was never configured on this component.
    #[error("collateral type not configured: {0}")]
    UnknownCollateral(String),
}
