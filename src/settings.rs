//! Application settings.
//!
//! Read from an optional `household.toml` (or the file given with
//! `--config`), then overridden by `HOUSEHOLD__SECTION__KEY` environment
//! variables, e.g. `HOUSEHOLD__SERVER__BIND=0.0.0.0:8080`.

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::forms::DEFAULT_SUBMIT_DELAY;

const DEFAULT_CONFIG_FILE: &str = "household";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level for the `household` targets
    pub level: String,
    /// Budget the dashboard compares spend against
    pub monthly_budget: Decimal,
    /// Delay of the simulated form submission
    pub submit_delay_ms: u64,
    /// Directory holding `expenses.json` / `tasks.json` overrides
    pub data_dir: Option<PathBuf>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            monthly_budget: Decimal::new(350000, 2),
            submit_delay_ms: DEFAULT_SUBMIT_DELAY.as_millis() as u64,
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    /// Load settings; an explicit `path` must exist, the default file may not
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("HOUSEHOLD").separator("__"))
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        if settings.app.monthly_budget.is_sign_negative() {
            return Err(Error::NegativeBudget(settings.app.monthly_budget));
        }
        Ok(settings)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.app.submit_delay_ms)
    }

    /// `EnvFilter` directive for the configured level
    pub fn log_directive(&self) -> String {
        format!(
            "household={level},household_server={level},tower_http={level}",
            level = self.app.level
        )
    }
}
