// 💰 Fee Calculator - Tiered, size-dependent billing
// Rates as data: every constant lives in FeeSchedule and can be loaded from JSON

use crate::model::SizeClass;
use anyhow::{Context as AnyhowContext, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Seconds in one billable unit in production
pub const PRODUCTION_UNIT_SECONDS: u64 = 3600;

// ============================================================================
// FEE SCHEDULE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Length of one billable unit ("1 hour") in seconds
    pub unit_seconds: u64,

    /// Units in a full-day block
    pub day_units: u64,

    /// Charge per full-day block
    pub day_rate: u64,

    /// Units covered by the flat charge
    pub flat_units: u64,

    /// Flat charge, applied once per session
    pub flat_rate: u64,

    /// Per-unit rate for the remainder, indexed by size class (small, medium, large)
    pub hourly_rates: [u64; 3],
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            unit_seconds: PRODUCTION_UNIT_SECONDS,
            day_units: 24,
            day_rate: 5000,
            flat_units: 3,
            flat_rate: 40,
            hourly_rates: [20, 60, 100],
        }
    }
}

impl FeeSchedule {
    /// Default rates with a different unit length (e.g. 10s for accelerated testing)
    pub fn with_unit_seconds(unit_seconds: u64) -> Self {
        FeeSchedule {
            unit_seconds,
            ..FeeSchedule::default()
        }
    }

    /// Load a schedule from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read fee schedule: {:?}", path.as_ref()))?;

        let schedule: FeeSchedule =
            serde_json::from_str(&content).context("Failed to parse fee schedule JSON")?;

        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<()> {
        if self.unit_seconds == 0 {
            anyhow::bail!("unit_seconds must be greater than zero");
        }
        if self.day_units == 0 {
            anyhow::bail!("day_units must be greater than zero");
        }
        Ok(())
    }

    fn hourly_rate(&self, size: SizeClass) -> u64 {
        match size {
            SizeClass::Small => self.hourly_rates[0],
            SizeClass::Medium => self.hourly_rates[1],
            SizeClass::Large => self.hourly_rates[2],
        }
    }
}

// ============================================================================
// FEE CALCULATOR
// ============================================================================

/// Billed amount for one parking interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub elapsed_units: u64,
    pub fee: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FeeCalculator {
    schedule: FeeSchedule,
}

impl FeeCalculator {
    pub fn new(schedule: FeeSchedule) -> Self {
        FeeCalculator { schedule }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Whole billable units between two instants, rounded to nearest.
    ///
    /// Order does not matter; the span is taken as absolute.
    pub fn elapsed_units(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
        let millis = (end - start).num_milliseconds().unsigned_abs();
        let unit_millis = self.schedule.unit_seconds.max(1) as f64 * 1000.0;
        (millis as f64 / unit_millis).round() as u64
    }

    /// Fee owed for `units` billable units.
    ///
    /// Full days first, then the flat charge (once), then the remainder at
    /// the vehicle's own size rate.
    pub fn fee_for_units(&self, units: u64, size: SizeClass) -> u64 {
        let s = &self.schedule;
        let day_units = s.day_units.max(1);

        let days = units / day_units;
        let remaining = (units % day_units).saturating_sub(s.flat_units);

        days * s.day_rate + s.flat_rate + remaining * s.hourly_rate(size)
    }

    pub fn compute_fee(&self, start: DateTime<Utc>, end: DateTime<Utc>, size: SizeClass) -> Charge {
        let elapsed_units = self.elapsed_units(start, end);
        Charge {
            elapsed_units,
            fee: self.fee_for_units(elapsed_units, size),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
