//! Portfolio Configuration Module
//!
//! Loads protocol parameters from TOML files with environment-specific
//! overrides and `PORTFOLIO_`-prefixed environment variables.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use types::{PRECISION_1E18, TOTAL_WEIGHT_BPS, U256};

/// Main portfolio configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PortfolioConfig {
    pub fees: FeeConfig,
    pub supply: SupplyConfig,
    pub precision: PrecisionConfig,
}

/// Fees charged in portfolio shares
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct FeeConfig {
    /// Share of freshly minted tokens kept as entry fee (100 = 1%)
    pub entry_fee_bps: u32,
    /// Share of redeemed tokens kept as exit fee
    pub exit_fee_bps: u32,
}

/// Share supply parameters
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SupplyConfig {
    /// Shares minted by the very first deposit
    #[serde(with = "u256_string")]
    pub initial_portfolio_amount: U256,
    /// Smallest nonzero balance a holder may keep
    #[serde(with = "u256_string")]
    pub min_portfolio_token_holding: U256,
}

/// Fixed-point scale for reported proportions
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PrecisionConfig {
    #[serde(with = "u256_string")]
    pub least_proportion_scale: U256,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            // 100 portfolio tokens at 18 decimals
            initial_portfolio_amount: U256::from(100u64) * U256::from(PRECISION_1E18),
            // 0.01 portfolio tokens
            min_portfolio_token_holding: U256::from(10_000_000_000_000_000u64),
        }
    }
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            least_proportion_scale: U256::from(PRECISION_1E18),
        }
    }
}

impl PortfolioConfig {
    /// Load configuration from files with environment overrides
    ///
    /// Layers, lowest priority first: built-in defaults, the base file,
    /// `environments/<env>.toml` next to the base file, `PORTFOLIO_` variables
    /// (`PORTFOLIO_FEES__ENTRY_FEE_BPS=50`).
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = match base_path {
            Some(path) => expand_path(path)?,
            None => PathBuf::from("config/portfolio.toml"),
        };

        let defaults =
            Config::try_from(&PortfolioConfig::default()).context("Failed to encode defaults")?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::from(base.as_path()).required(true));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = base
                .parent()
                .unwrap_or(Path::new("."))
                .join("environments")
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("PORTFOLIO")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: PortfolioConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        debug!(?config, "portfolio configuration loaded");
        Ok(config)
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PortfolioConfig =
            toml::from_str(content).context("Failed to parse portfolio config")?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML, amounts as decimal strings
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize portfolio config")
    }

    /// Reject parameter combinations the accounting layer cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.fees.entry_fee_bps > TOTAL_WEIGHT_BPS {
            bail!(
                "entry_fee_bps {} exceeds {}",
                self.fees.entry_fee_bps,
                TOTAL_WEIGHT_BPS
            );
        }
        if self.fees.exit_fee_bps > TOTAL_WEIGHT_BPS {
            bail!(
                "exit_fee_bps {} exceeds {}",
                self.fees.exit_fee_bps,
                TOTAL_WEIGHT_BPS
            );
        }
        if self.supply.initial_portfolio_amount.is_zero() {
            bail!("initial_portfolio_amount must be nonzero");
        }
        if self.precision.least_proportion_scale.is_zero() {
            bail!("least_proportion_scale must be nonzero");
        }
        Ok(())
    }
}

/// Convenience function to load configuration with the default path
pub fn load_config(environment: Option<&str>) -> Result<PortfolioConfig> {
    PortfolioConfig::load(None, environment)
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw).context("Failed to expand config path")?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// `U256` as a decimal string; integers are accepted on input
mod u256_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use types::U256;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(U256::from(value)),
            Raw::Text(text) => U256::from_dec_str(text.trim())
                .map_err(|err| D::Error::custom(format!("invalid amount '{}': {:?}", text, err))),
        }
    }
}
