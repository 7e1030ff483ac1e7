//! Action descriptors emitted by keeper strategies.
//!
//! An action names the external protocol operation to invoke and carries
//! its arguments in the operation's exact positional order. Actions are
//! transient, single-timestep value objects: the executor applies them
//! after the decision pass completes, then discards them.

use alloy::primitives::Address;
use keeper_protocol::{Ray, Wad};
use serde::Serialize;

/// Action discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    StartLiquidation,
    Take,
    Restart,
}

/// A single keeper decision for one timestep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Start a liquidation auction against an unsafe position.
    StartLiquidation {
        collateral: String,
        owner: Address,
        keeper: Address,
        t: u64,
    },
    /// Buy collateral from an active auction at or below `max_price`.
    Take {
        collateral: String,
        auction_id: u64,
        amount: Wad,
        max_price: Ray,
        who: Address,
        data: Vec<u8>,
        t: u64,
        sender: Address,
    },
    /// Reset an expired auction's price schedule. `collateral` doubles as
    /// the restart bookkeeping metadata.
    Restart {
        collateral: String,
        auction_id: u64,
        keeper: Address,
        t: u64,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::StartLiquidation { .. } => ActionKind::StartLiquidation,
            Action::Take { .. } => ActionKind::Take,
            Action::Restart { .. } => ActionKind::Restart,
        }
    }

    /// The collateral type the action targets.
    pub fn collateral(&self) -> &str {
        match self {
            Action::StartLiquidation { collateral, .. }
            | Action::Take { collateral, .. }
            | Action::Restart { collateral, .. } => collateral,
        }
    }
}

/// Ephemeral result of a bidding model run: how much to take from an
/// auction and at what limit price. Recomputed from scratch every
/// timestep, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stance {
    /// Collateral amount to take.
    pub amount: Wad,
    /// Highest acceptable price.
    pub max_price: Ray,
    /// Beneficiary of the purchased collateral.
    pub who: Address,
    /// Opaque payload forwarded to the take operation.
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_collateral_accessors() {
        let action = Action::Restart {
            collateral: "WETH".to_string(),
            auction_id: 3,
            keeper: Address::repeat_byte(9),
            t: 7,
        };
        assert_eq!(action.kind(), ActionKind::Restart);
        assert_eq!(action.collateral(), "WETH");
    }

    #[test]
    fn serializes_with_screaming_kind_tag() {
        let action = Action::StartLiquidation {
            collateral: "WETH".to_string(),
            owner: Address::repeat_byte(1),
            keeper: Address::repeat_byte(9),
            t: 4,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["kind"], "START_LIQUIDATION");
        assert_eq!(json["collateral"], "WETH");
        assert_eq!(json["t"], 4);
    }
}
