// 🅿️ Parking Model - Map, Slots, Vehicles
// Plain data exchanged with the store; all behavior lives in slots/fees/ledger

use crate::error::{LedgerError, LedgerResult};
use anyhow::{Context as AnyhowContext, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Minimum number of entrances a map must have to be accepted
pub const MIN_ENTRANCES: usize = 3;

// ============================================================================
// SIZE CLASS
// ============================================================================

/// Capacity class shared by vehicles and slots.
///
/// Serialized as the bare integer (0, 1, 2). A vehicle fits a slot when
/// `vehicle.size <= slot.size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SizeClass {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl SizeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }

    /// True if a vehicle of class `self` fits a slot of class `slot`
    pub fn fits(&self, slot: SizeClass) -> bool {
        *self <= slot
    }
}

impl TryFrom<u8> for SizeClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SizeClass::Small),
            1 => Ok(SizeClass::Medium),
            2 => Ok(SizeClass::Large),
            other => Err(format!("size can only be 0, 1 or 2 (got {})", other)),
        }
    }
}

impl From<SizeClass> for u8 {
    fn from(size: SizeClass) -> u8 {
        size as u8
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

// ============================================================================
// SLOTS & COORDINATES
// ============================================================================

/// A single parking space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub size: SizeClass,

    /// Cost to reach this slot from its entrance
    pub distance: f64,

    /// Id of the vehicle occupying the slot (None = empty)
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant: Option<u64>,
}

impl Slot {
    pub fn new(size: SizeClass, distance: f64) -> Self {
        Slot {
            size,
            distance,
            occupant: None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Position of a slot inside the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCoord {
    pub entrance: usize,
    pub slot: usize,
}

impl fmt::Display for SlotCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entrance, self.slot)
    }
}

// ============================================================================
// PARKING MAP
// ============================================================================

/// Ordered entrances, each an ordered list of slots.
///
/// Serializes as a bare nested array: `[[{size, distance}, ...], ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParkingMap {
    entrances: Vec<Vec<Slot>>,
}

/// Occupancy of one entrance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntranceOccupancy {
    pub entrance: usize,
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
}

impl ParkingMap {
    /// Build a map from entrances, enforcing the acceptance rules
    pub fn new(entrances: Vec<Vec<Slot>>) -> LedgerResult<Self> {
        let map = ParkingMap { entrances };
        map.validate()?;
        Ok(map)
    }

    /// Accept a map from untyped JSON input.
    ///
    /// Rejects the whole map on the first problem; nothing is partially applied.
    pub fn from_value(value: serde_json::Value) -> LedgerResult<Self> {
        let entrances = match &value {
            serde_json::Value::Null => {
                return Err(LedgerError::InvalidInput("missing parameter 'map'".to_string()))
            }
            serde_json::Value::Array(entrances) => entrances,
            _ => return Err(LedgerError::InvalidInput("map must be an array".to_string())),
        };

        if entrances.len() < MIN_ENTRANCES {
            return Err(LedgerError::InvalidInput(format!(
                "map must have at least {} entrances (got {})",
                MIN_ENTRANCES,
                entrances.len()
            )));
        }

        if let Some(i) = entrances.iter().position(|e| !e.is_array()) {
            return Err(LedgerError::InvalidInput(format!("entrance {} must be an array of slots", i)));
        }

        let map: ParkingMap = serde_json::from_value(value)
            .map_err(|e| LedgerError::InvalidInput(format!("malformed slot: {}", e)))?;

        map.validate()?;
        Ok(map)
    }

    /// Load a map from a JSON file (either a bare array or `{ "map": [...] }`)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read map file: {:?}", path.as_ref()))?;

        let mut value: serde_json::Value =
            serde_json::from_str(&content).context("Failed to parse map JSON")?;

        if let Some(inner) = value.get_mut("map") {
            value = inner.take();
        }

        Ok(ParkingMap::from_value(value)?)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.entrances.len() < MIN_ENTRANCES {
            return Err(LedgerError::InvalidInput(format!(
                "map must have at least {} entrances (got {})",
                MIN_ENTRANCES,
                self.entrances.len()
            )));
        }

        for (coord, slot) in self.iter() {
            if !slot.distance.is_finite() || slot.distance < 0.0 {
                return Err(LedgerError::InvalidInput(format!(
                    "slot {} has invalid distance {}",
                    coord, slot.distance
                )));
            }
        }

        Ok(())
    }

    pub fn entrances(&self) -> &[Vec<Slot>] {
        &self.entrances
    }

    pub fn slot(&self, coord: SlotCoord) -> Option<&Slot> {
        self.entrances.get(coord.entrance)?.get(coord.slot)
    }

    pub fn slot_mut(&mut self, coord: SlotCoord) -> Option<&mut Slot> {
        self.entrances.get_mut(coord.entrance)?.get_mut(coord.slot)
    }

    /// Iterate slots in scan order (entrance first, then slot)
    pub fn iter(&self) -> impl Iterator<Item = (SlotCoord, &Slot)> {
        self.entrances.iter().enumerate().flat_map(|(e, slots)| {
            slots
                .iter()
                .enumerate()
                .map(move |(s, slot)| (SlotCoord { entrance: e, slot: s }, slot))
        })
    }

    /// Empty every slot
    pub fn clear_occupants(&mut self) {
        for slot in self.entrances.iter_mut().flatten() {
            slot.occupant = None;
        }
    }

    pub fn occupancy(&self) -> Vec<EntranceOccupancy> {
        self.entrances
            .iter()
            .enumerate()
            .map(|(entrance, slots)| {
                let occupied = slots.iter().filter(|s| !s.is_free()).count();
                EntranceOccupancy {
                    entrance,
                    total: slots.len(),
                    occupied,
                    free: slots.len() - occupied,
                }
            })
            .collect()
    }
}

// ============================================================================
// VEHICLES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Parked,
    Unparked,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Parked => "parked",
            VehicleStatus::Unparked => "unparked",
        }
    }
}

/// A vehicle record in the registry.
///
/// Identity is `id`; every park/unpark mutates the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: u64,
    pub name: String,
    pub size: SizeClass,
    pub status: VehicleStatus,

    /// Start of the current (or most recent) billable interval
    pub park_time: DateTime<Utc>,

    /// Set on exit, cleared on re-entry
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpark_time: Option<DateTime<Utc>>,

    /// Present only while parked
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parked_at: Option<SlotCoord>,
}

impl Vehicle {
    /// New record, parked at `coord` since `now`
    pub fn new(id: u64, name: String, size: SizeClass, coord: SlotCoord, now: DateTime<Utc>) -> Self {
        Vehicle {
            id,
            name,
            size,
            status: VehicleStatus::Parked,
            park_time: now,
            unpark_time: None,
            parked_at: Some(coord),
        }
    }

    pub fn is_parked(&self) -> bool {
        self.status == VehicleStatus::Parked
    }
}

/// Spec for a vehicle entering for the first time.
///
/// `size` is kept raw so out-of-range values are reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVehicle {
    #[serde(default)]
    pub name: String,
    pub size: u8,
}

impl NewVehicle {
    pub fn new(name: impl Into<String>, size: u8) -> Self {
        NewVehicle {
            name: name.into(),
            size,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
