use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::model::company::{default_roster, Company};
use crate::scenario::{CrisisEvent, CrisisSchedule};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub market: MarketConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub starting_balance: f64,
    pub total_days: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_balance: 10_000.0,
            total_days: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub prehistory_days: usize,
    /// Maximum daily move fraction for the random walk.
    pub daily_move_pct: f64,
    pub candle_jitter: f64,
    pub shock_jitter_high: f64,
    pub shock_jitter_low: f64,
    pub companies: Vec<Company>,
    pub crisis_events: Vec<CrisisEvent>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            prehistory_days: 6,
            daily_move_pct: 0.05,
            candle_jitter: 5.0,
            shock_jitter_high: 3.0,
            shock_jitter_low: 8.0,
            companies: default_roster(),
            crisis_events: CrisisSchedule::default_2008().events().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            market: MarketConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load `config/default.toml` when present, otherwise fall back to the
    /// built-in constants. Every load path is validated.
    pub fn load() -> Result<Self> {
        let path = Path::new("config/default.toml");
        let config = if path.exists() {
            Self::load_from_path(path)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let payload = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&payload)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.starting_balance <= 0.0 {
            bail!("session.starting_balance must be > 0");
        }
        if self.session.total_days == 0 {
            bail!("session.total_days must be > 0");
        }
        if self.market.prehistory_days == 0 {
            bail!("market.prehistory_days must be > 0");
        }
        if self.market.daily_move_pct <= 0.0 || self.market.daily_move_pct >= 1.0 {
            bail!("market.daily_move_pct must be in (0, 1)");
        }
        if self.market.candle_jitter < 0.0
            || self.market.shock_jitter_high < 0.0
            || self.market.shock_jitter_low < 0.0
        {
            bail!("candle jitter magnitudes must be >= 0");
        }
        if self.market.companies.is_empty() {
            bail!("market.companies must not be empty");
        }
        for (i, company) in self.market.companies.iter().enumerate() {
            if company.name.trim().is_empty() {
                bail!("company #{} has an empty name", i);
            }
            if company.start_price <= 0.0 {
                bail!("company '{}' has a non-positive start price", company.name);
            }
            if self.market.companies[i + 1..]
                .iter()
                .any(|other| other.name == company.name)
            {
                bail!("duplicate company name '{}'", company.name);
            }
        }
        for event in &self.market.crisis_events {
            if event.price_shock <= 0.0 {
                bail!(
                    "crisis event on day {} has a non-positive price shock",
                    event.day
                );
            }
            if event.day == 0 || event.day > self.session.total_days {
                bail!(
                    "crisis event day {} is outside the playable range 1..={}",
                    event.day,
                    self.session.total_days
                );
            }
        }
        Ok(())
    }

    pub fn crisis_schedule(&self) -> CrisisSchedule {
        CrisisSchedule::new(self.market.crisis_events.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.market.companies.len(), 12);
        assert_eq!(config.market.crisis_events.len(), 3);
        assert_eq!(config.session.total_days, 20);
    }

    #[test]
    fn parse_partial_toml_keeps_defaults() {
        let toml_str = r#"
[session]
starting_balance = 5000.0
total_days = 10

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!((config.session.starting_balance - 5000.0).abs() < f64::EPSILON);
        assert_eq!(config.session.total_days, 10);
        assert_eq!(config.logging.level, "debug");
        // untouched sections fall back to the built-ins
        assert_eq!(config.market.prehistory_days, 6);
        assert_eq!(config.market.companies.len(), 12);
    }

    #[test]
    fn parse_custom_roster_and_events() {
        let toml_str = r#"
[market]
prehistory_days = 3

[[market.companies]]
name = "Acme"
abbr = "ACME"
start_price = 42.0

[[market.crisis_events]]
day = 2
headline = "Anvil Shortage"
body = "Supply chains collapse."
price_shock = 0.5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.market.companies.len(), 1);
        let schedule = config.crisis_schedule();
        assert!(schedule.event_for_day(2).is_some());
        assert!(schedule.event_for_day(5).is_none());
    }

    #[test]
    fn validation_rejects_bad_inputs() {
        let mut config = Config::default();
        config.session.total_days = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.market.companies[0].start_price = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        let dup = config.market.companies[0].clone();
        config.market.companies.push(dup);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.market.crisis_events[0].day = 99;
        assert!(config.validate().is_err());
    }
}
