// 🗄️ Store - The ledger's storage collaborator
// Two named structures (map, vehicles) plus an append-only audit trail

use crate::error::StoreError;
use crate::model::{ParkingMap, Vehicle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event for audit trail ("Every change is an event")
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
}

impl Event {
    pub fn new(event_type: &str, entity_id: &str, data: serde_json::Value, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            event_type: event_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
        }
    }
}

/// Get/put access to the structures the ledger works on.
///
/// Backends are interchangeable; the ledger never touches disk or network itself.
pub trait ParkingStore {
    fn get_map(&self) -> Result<Option<ParkingMap>, StoreError>;

    fn put_map(&mut self, map: &ParkingMap) -> Result<(), StoreError>;

    fn get_vehicles(&self) -> Result<Vec<Vehicle>, StoreError>;

    fn put_vehicles(&mut self, vehicles: &[Vehicle]) -> Result<(), StoreError>;

    /// Write map and registry back as one unit.
    ///
    /// Backends that can do this atomically should override it.
    fn commit(&mut self, map: &ParkingMap, vehicles: &[Vehicle]) -> Result<(), StoreError> {
        self.put_map(map)?;
        self.put_vehicles(vehicles)
    }

    /// Record an audit event. Backends without an audit trail drop it.
    fn append_event(&mut self, _event: &Event) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Option<ParkingMap>,
    vehicles: Vec<Vehicle>,
    events: Vec<Event>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

impl ParkingStore for MemoryStore {
    fn get_map(&self) -> Result<Option<ParkingMap>, StoreError> {
        Ok(self.map.clone())
    }

    fn put_map(&mut self, map: &ParkingMap) -> Result<(), StoreError> {
        self.map = Some(map.clone());
        Ok(())
    }

    fn get_vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        Ok(self.vehicles.clone())
    }

    fn put_vehicles(&mut self, vehicles: &[Vehicle]) -> Result<(), StoreError> {
        self.vehicles = vehicles.to_vec();
        Ok(())
    }

    fn append_event(&mut self, event: &Event) -> Result<(), StoreError> {
        self.events.push(event.clone());
        Ok(())
    }
}
