//! Price feed implementations.
//!
//! Feeds are pure functions of the timestep so that a timestep's
//! decisions replay identically.

use keeper_protocol::{PriceFeed, Wad};

/// A feed pinned at one price.
#[derive(Debug, Clone)]
pub struct ConstantFeed(pub Wad);

impl PriceFeed for ConstantFeed {
    fn peek(&self, _t: u64) -> Option<Wad> {
        Some(self.0)
    }
}

/// A feed backed by a per-timestep price path. Timesteps past the end of
/// the path have no observation.
#[derive(Debug, Clone)]
pub struct SeriesFeed {
    series: Vec<Wad>,
}

impl SeriesFeed {
    pub fn new(series: Vec<Wad>) -> Self {
        Self { series }
    }

    /// Build from a float path; scenario ingestion only.
    pub fn from_path(path: &[f64]) -> Self {
        Self::new(path.iter().copied().map(Wad::from_f64).collect())
    }
}

impl PriceFeed for SeriesFeed {
    fn peek(&self, t: u64) -> Option<Wad> {
        self.series.get(t as usize).copied()
    }
}
