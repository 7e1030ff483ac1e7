//! Market data consumed by the keeper: price feeds, the gas oracle, and
//! the swap-market slippage model. All implementations are deterministic
//! functions of the timestep.

mod gas;
mod price;
mod swap;

pub use gas::{ConstantGasOracle, GasOracle, SeriesGasOracle};
pub use price::{ConstantFeed, SeriesFeed};
pub use swap::{ConstantProductMarket, Pool, SlippageQuote, SwapMarket};
