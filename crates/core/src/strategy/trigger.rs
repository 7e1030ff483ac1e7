//! Liquidation triggering.

use alloy::primitives::Address;
use keeper_protocol::{CapacityTracker, LedgerView, Rad, Wad};
use std::sync::Arc;
use tracing::debug;

use crate::action::Action;
use crate::error::KeeperError;
use crate::profit::IncentiveModel;
use crate::registry::KeeperRegistry;
use crate::strategy::BiddingStrategy;

/// Scans positions for undercollateralization and starts liquidations
/// where the protocol incentive clears the execution cost.
pub struct LiquidationTrigger {
    registry: Arc<KeeperRegistry>,
    ledger: Arc<dyn LedgerView>,
    desk: Arc<dyn CapacityTracker>,
    incentives: IncentiveModel,
    keeper: Address,
    threshold: Rad,
}

impl LiquidationTrigger {
    pub fn new(
        registry: Arc<KeeperRegistry>,
        ledger: Arc<dyn LedgerView>,
        desk: Arc<dyn CapacityTracker>,
        incentives: IncentiveModel,
        keeper: Address,
    ) -> Self {
        Self {
            registry,
            ledger,
            desk,
            incentives,
            keeper,
            threshold: Rad::zero(),
        }
    }

    /// Set the profit threshold.
    pub fn with_threshold(mut self, threshold: Rad) -> Self {
        self.threshold = threshold;
        self
    }

    /// The tab a liquidation started now would create: the liquidatable
    /// debt slice under global and per-collateral remaining capacity,
    /// valued at the current rate and penalized by chop.
    ///
    /// If the residual debt after a partial liquidation would fall under
    /// the dust floor, the full position is liquidated instead, even
    /// where that overshoots remaining capacity.
    pub fn expected_tab(&self, collateral: &str, owner: Address) -> Result<Rad, KeeperError> {
        let art = self.ledger.debt(collateral, owner)?;
        let rate = self.ledger.rate(collateral)?;
        let dust = self.ledger.dust_floor(collateral)?;
        let chop = self.desk.chop(collateral)?;

        let room = self
            .desk
            .global_room()
            .min(self.desk.local_room(collateral)?);

        let mut dart = art.min(Wad::from_rad(room / Rad::from_ray(rate)) / chop);
        if Rad::from_ray(rate * (art - dart)) < dust {
            dart = art;
        }

        let due = Rad::from_ray(rate * dart);
        Ok(due * Rad::from_wad(chop))
    }

    /// Whether a position is undercollateralized at current marks.
    fn is_unsafe(&self, collateral: &str, ink: Wad, art: Wad) -> Result<bool, KeeperError> {
        let spot = self.ledger.spot(collateral)?;
        let rate = self.ledger.rate(collateral)?;
        Ok(Rad::from_wad(ink * spot) < Rad::from_wad(art * rate))
    }
}

impl BiddingStrategy for LiquidationTrigger {
    fn generate_actions(&self, t: u64) -> Result<Vec<Action>, KeeperError> {
        let mut actions = Vec::new();
        for collateral in self.registry.ids() {
            for position in self.ledger.positions(collateral)? {
                if !self.is_unsafe(collateral, position.ink, position.art)? {
                    continue;
                }
                // value the incentive against the tab this trigger would
                // create, as if the auction were already pending
                let tab = self.expected_tab(collateral, position.owner)?;
                if self
                    .incentives
                    .is_profitable(&self.registry, collateral, tab, self.threshold, t)?
                {
                    debug!(
                        collateral,
                        owner = %position.owner,
                        tab = %tab,
                        "starting liquidation"
                    );
                    actions.push(Action::StartLiquidation {
                        collateral: collateral.to_string(),
                        owner: position.owner,
                        keeper: self.keeper,
                        t,
                    });
                }
            }
        }
        Ok(actions)
    }
}
