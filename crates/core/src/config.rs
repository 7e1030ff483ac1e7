//! Keeper configuration with profile support.
//!
//! Each keeper instance owns its configuration exclusively: discount
//! targets, profit threshold, and the gas budget used for cost
//! estimation. Profiles cover the common setups; a TOML file named by
//! `KEEPER_CONFIG` overrides them.

use keeper_protocol::{Rad, Ray, Wad};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main configuration structure for one keeper instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Profile name (for logging/identification)
    #[serde(default = "default_profile_name")]
    pub profile: String,

    /// Execution cost estimation parameters
    #[serde(default)]
    pub gas: GasCostConfig,

    /// Bidding parameters
    #[serde(default)]
    pub bidding: BiddingConfig,

    /// Simulation driver parameters
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_profile_name() -> String {
    "default".to_string()
}

/// Execution cost estimation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasCostConfig {
    /// Gas budget assumed per on-chain operation
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,

    /// Collateral type whose price feed converts gas into debt units
    #[serde(default = "default_reference_collateral")]
    pub reference_collateral: String,
}

fn default_gas_limit() -> u64 {
    300_000
}
fn default_reference_collateral() -> String {
    "WETH".to_string()
}

impl Default for GasCostConfig {
    fn default() -> Self {
        Self {
            gas_limit: default_gas_limit(),
            reference_collateral: default_reference_collateral(),
        }
    }
}

/// Bidding parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiddingConfig {
    /// Minimum profit (in debt units) an action must strictly exceed
    #[serde(default)]
    pub profit_threshold: f64,

    /// Discount target applied to collateral types without an override
    #[serde(default = "default_discount")]
    pub default_discount: f64,

    /// Per-collateral discount targets
    #[serde(default)]
    pub desired_discounts: BTreeMap<String, f64>,
}

fn default_discount() -> f64 {
    0.95
}

impl Default for BiddingConfig {
    fn default() -> Self {
        Self {
            profit_threshold: 0.0,
            default_discount: default_discount(),
            desired_discounts: BTreeMap::new(),
        }
    }
}

/// Simulation driver parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of timesteps to run
    #[serde(default = "default_steps")]
    pub steps: u64,
}

fn default_steps() -> u64 {
    12
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
        }
    }
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            profile: default_profile_name(),
            gas: GasCostConfig::default(),
            bidding: BiddingConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl KeeperConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Create a cautious profile: deeper discounts, real profit floor.
    pub fn cautious() -> Self {
        Self {
            profile: "cautious".to_string(),
            bidding: BiddingConfig {
                profit_threshold: 50.0,
                default_discount: 0.90,
                desired_discounts: BTreeMap::new(),
            },
            ..Self::default()
        }
    }

    /// Create an aggressive profile: shallow discounts, any profit.
    pub fn aggressive() -> Self {
        Self {
            profile: "aggressive".to_string(),
            bidding: BiddingConfig {
                profit_threshold: 0.0,
                default_discount: 0.99,
                desired_discounts: BTreeMap::new(),
            },
            ..Self::default()
        }
    }

    /// Get profile from KEEPER_PROFILE, or a file named by KEEPER_CONFIG,
    /// or the default.
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var("KEEPER_CONFIG") {
            match Self::from_file(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path, error = %e, "failed to load config file, using profile")
                }
            }
        }
        let profile = std::env::var("KEEPER_PROFILE").unwrap_or_else(|_| "default".to_string());
        match profile.to_lowercase().as_str() {
            "cautious" => Self::cautious(),
            "aggressive" | "aggro" => Self::aggressive(),
            _ => Self::default(),
        }
    }

    /// Gas budget as a wad.
    pub fn gas_limit(&self) -> Wad {
        Wad::from_num(self.gas.gas_limit)
    }

    /// Profit threshold in high-precision debt units.
    pub fn profit_threshold(&self) -> Rad {
        Rad::from_f64(self.bidding.profit_threshold)
    }

    /// Discount target for a collateral type, falling back to the
    /// default target.
    pub fn discount_for(&self, collateral: &str) -> Ray {
        let discount = self
            .bidding
            .desired_discounts
            .get(collateral)
            .copied()
            .unwrap_or(self.bidding.default_discount);
        Ray::from_f64(discount)
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        tracing::info!(profile = %self.profile, "Keeper configuration loaded");
        tracing::info!(
            gas_limit = self.gas.gas_limit,
            reference_collateral = %self.gas.reference_collateral,
            "Cost estimation"
        );
        tracing::info!(
            profit_threshold = self.bidding.profit_threshold,
            default_discount = self.bidding.default_discount,
            overrides = self.bidding.desired_discounts.len(),
            "Bidding parameters"
        );
    }
}
