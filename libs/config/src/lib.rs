//! # Portfolio Configuration
//!
//! Protocol parameters consumed by the fee-aware accounting layer.
//!
//! ## Features
//!
//! - **Fees**: entry and exit fees in basis points
//! - **Supply**: initial mint for the first deposit, minimum holder balance
//! - **Precision**: fixed-point scale for reported proportions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use config::PortfolioConfig;
//! use std::path::Path;
//!
//! let config = PortfolioConfig::load(Some(Path::new("config/portfolio.toml")), Some("bsc"))?;
//! println!("entry fee: {} bps", config.fees.entry_fee_bps);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod portfolio_config;

pub use portfolio_config::{FeeConfig, PortfolioConfig, PrecisionConfig, SupplyConfig};
