use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use planme_core::planner::PlannerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const CONFIG_FILE: &str = "planme.toml";
pub const ENV_PREFIX: &str = "PLANME_";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Window used by `plan` when --horizon is not given
    pub horizon_days: u32,
    /// Occurrences printed by `preview` when --limit is not given
    pub preview_count: usize,
    /// Count cap applied by the planner before its time filter
    pub max_to_generate: usize,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        let planner = PlannerConfig::default();
        Self {
            horizon_days: planner.horizon_days,
            preview_count: 10,
            max_to_generate: planner.max_to_generate,
            output: OutputFormat::Table,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn planner(&self) -> PlannerConfig {
        PlannerConfig {
            horizon_days: self.horizon_days,
            max_to_generate: self.max_to_generate,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid output format: '{0}'. Expected 'table' or 'json'")]
pub struct ParseOutputFormatError(String);

impl OutputFormat {
    /// `--json` always wins over the configured format.
    pub fn resolve(json_flag: bool, configured: OutputFormat) -> OutputFormat {
        if json_flag {
            OutputFormat::Json
        } else {
            configured
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ParseOutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ParseOutputFormatError(s.to_string())),
        }
    }
}
