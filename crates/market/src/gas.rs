//! Gas price oracle.

use keeper_protocol::Wad;
use std::fmt::Debug;

/// Gas price per gas unit, denominated in wei, as a pure function of the
/// timestep. Returns `None` when no observation exists for `t`.
pub trait GasOracle: Send + Sync + Debug {
    fn peek(&self, t: u64) -> Option<Wad>;
}

/// An oracle pinned at one gas price.
#[derive(Debug, Clone)]
pub struct ConstantGasOracle(pub Wad);

impl ConstantGasOracle {
    /// Convenience constructor from a gwei figure.
    pub fn from_gwei(gwei: u64) -> Self {
        Self(Wad::from_num(gwei * 1_000_000_000))
    }
}

impl GasOracle for ConstantGasOracle {
    fn peek(&self, _t: u64) -> Option<Wad> {
        Some(self.0)
    }
}

/// An oracle backed by a per-timestep gas price path.
#[derive(Debug, Clone)]
pub struct SeriesGasOracle {
    series: Vec<Wad>,
}

impl SeriesGasOracle {
    pub fn new(series: Vec<Wad>) -> Self {
        Self { series }
    }
}

impl GasOracle for SeriesGasOracle {
    fn peek(&self, t: u64) -> Option<Wad> {
        self.series.get(t as usize).copied()
    }
}
