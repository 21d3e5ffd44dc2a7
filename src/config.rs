// ⚙️ Configuration - Environment-driven settings for the binaries

use crate::fees::FeeSchedule;
use anyhow::{Context as AnyhowContext, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "parking.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// SQLite database file (`PARKING_DB_PATH`)
    pub db_path: PathBuf,

    /// Seconds per billable unit (`PARKING_UNIT_SECONDS`), overrides the schedule
    pub unit_seconds: Option<u64>,

    /// Optional JSON fee schedule (`PARKING_FEE_SCHEDULE`)
    pub fee_schedule_path: Option<PathBuf>,

    /// HTTP listen address (`PARKING_BIND_ADDR`)
    pub bind_addr: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            unit_seconds: None,
            fee_schedule_path: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LedgerConfig::default();

        if let Some(path) = lookup("PARKING_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("PARKING_UNIT_SECONDS") {
            let unit_seconds: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("PARKING_UNIT_SECONDS must be a positive integer (got {:?})", raw))?;
            if unit_seconds == 0 {
                anyhow::bail!("PARKING_UNIT_SECONDS must be greater than zero");
            }
            config.unit_seconds = Some(unit_seconds);
        }

        if let Some(path) = lookup("PARKING_FEE_SCHEDULE") {
            config.fee_schedule_path = Some(PathBuf::from(path));
        }

        if let Some(addr) = lookup("PARKING_BIND_ADDR") {
            config.bind_addr = addr;
        }

        Ok(config)
    }

    /// Effective schedule: the file if given, else defaults.
    ///
    /// `PARKING_UNIT_SECONDS` wins over the file's `unit_seconds` when set.
    pub fn fee_schedule(&self) -> Result<FeeSchedule> {
        let mut schedule = match &self.fee_schedule_path {
            Some(path) => FeeSchedule::from_file(path)?,
            None => FeeSchedule::default(),
        };

        if let Some(unit_seconds) = self.unit_seconds {
            schedule.unit_seconds = unit_seconds;
        }

        Ok(schedule)
    }
}
