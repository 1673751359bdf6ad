//! Keeper configuration

use anyhow::{Context, Result};
use bulwark_backstop::BackstopConfig;
use bulwark_common::{AccountId, DAY, RATE_SCALE};
use bulwark_treasury::{SpreadParams, TreasuryConfig};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "BULWARK_KEEPER_CONFIG";
const DEFAULT_PATH: &str = "keeper-config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Polling interval in seconds
    pub poll_interval_secs: u64,

    /// Maximum expired positions unlocked per tick
    pub max_unlocks_per_tick: usize,

    pub treasury: TreasurySection,
    pub backstop: BackstopSection,
    pub strategies: Vec<StrategySection>,

    /// Balances minted at startup for a local run
    pub seed: SeedSection,
}

/// Amounts are u64 in the file; TOML integers are 64-bit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasurySection {
    pub benchmark: u64,
    pub backstop_credit: u64,
    pub total_cap: Option<u64>,
    pub replenish_on_shortfall: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackstopSection {
    pub epoch_duration_secs: u64,
    pub window_secs: u64,
    /// Risk→settlement rate, scaled by 1e9
    pub initial_rate: u64,
    pub history_len: usize,
    /// Base58 account id of the converter, if any
    pub converter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySection {
    pub id: u32,
    pub name: String,
    pub min_period_secs: u64,
    pub max_period_secs: u64,
    pub limit: Option<u64>,
    /// Reference price for the strategy's feed, scaled by 1e8
    pub reference_price: u64,
    pub spread: SpreadParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSection {
    pub treasury_settlement: u64,
    pub converter_settlement: u64,
}

impl KeeperConfig {
    /// Load configuration from the TOML file named by `BULWARK_KEEPER_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_PATH.to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let config_str = std::fs::read_to_string(expanded.as_ref())
            .context(format!("Failed to read config file: {}", path))?;

        let config: KeeperConfig = toml::from_str(&config_str).context("Failed to parse config TOML")?;
        config.treasury_config().context("Invalid [treasury] section")?;
        config.backstop_config().context("Invalid [backstop] section")?;
        Ok(config)
    }

    /// Configuration for a single-process local run
    pub fn default_local() -> Self {
        Self {
            poll_interval_secs: 5,
            max_unlocks_per_tick: 32,
            treasury: TreasurySection {
                benchmark: 10_000_000_000,
                backstop_credit: 0,
                total_cap: None,
                replenish_on_shortfall: true,
            },
            backstop: BackstopSection {
                epoch_duration_secs: 7 * DAY,
                window_secs: 5 * DAY,
                initial_rate: RATE_SCALE as u64,
                history_len: 16,
                converter: None,
            },
            strategies: vec![StrategySection {
                id: 1,
                name: "eth-call-spread-10".to_string(),
                min_period_secs: DAY,
                max_period_secs: 30 * DAY,
                limit: Some(50_000_000_000),
                reference_price: 2_000 * 100_000_000,
                spread: SpreadParams::default(),
            }],
            seed: SeedSection {
                treasury_settlement: 100_000_000_000,
                converter_settlement: 0,
            },
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_local();
        let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        std::fs::write(path, toml_str).context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }

    pub fn treasury_config(&self) -> Result<TreasuryConfig> {
        let config = TreasuryConfig {
            benchmark: u128::from(self.treasury.benchmark),
            backstop_credit: u128::from(self.treasury.backstop_credit),
            total_cap: self.treasury.total_cap.map(u128::from),
            replenish_on_shortfall: self.treasury.replenish_on_shortfall,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn backstop_config(&self) -> Result<BackstopConfig> {
        let converter = match &self.backstop.converter {
            Some(s) => Some(s.parse::<AccountId>()?),
            None => None,
        };
        let config = BackstopConfig {
            epoch_duration: self.backstop.epoch_duration_secs,
            window: self.backstop.window_secs,
            initial_rate: u128::from(self.backstop.initial_rate),
            history_len: self.backstop.history_len,
            converter,
        };
        config.validate()?;
        Ok(config)
    }
}
